// ==========================================
// 间接成本配置系统 - 编辑器数据模型
// ==========================================
// 职责: 工作副本中的工序/成本表示
// 标识: Persisted(服务端ID) 或 Pending(本地ID)，本地ID不可能发往服务端
// ==========================================

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::api::dto::{CostInput, OperationDto};
use crate::domain::{CostsByRange, VolumeRange};

/// 本地ID（编辑器会话内单调递增）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LocalId(pub(crate) u64);

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "local-{}", self.0)
    }
}

/// 工序标识
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum OperationKey {
    /// 已持久化的工序（服务端ID）
    Persisted(String),
    /// 本地新增、尚未保存的工序
    Pending(LocalId),
}

impl OperationKey {
    pub fn persisted_id(&self) -> Option<&str> {
        match self {
            OperationKey::Persisted(id) => Some(id),
            OperationKey::Pending(_) => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, OperationKey::Pending(_))
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKey::Persisted(id) => f.write_str(id),
            OperationKey::Pending(local) => write!(f, "{}", local),
        }
    }
}

/// 成本条目标识
///
/// Pending 由 (本地ID, 区间, 序号) 组成；本地ID在会话内唯一，因此不会冲突
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum CostKey {
    Persisted(String),
    Pending {
        local: LocalId,
        range: VolumeRange,
        index: usize,
    },
}

/// 可编辑的成本条目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditableCost {
    pub key: CostKey,
    pub volume_range: VolumeRange,
    pub cost: f64,
}

/// 可编辑的工序
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditableOperation {
    pub key: OperationKey,
    pub name: String,
    pub description: Option<String>,
    pub plant_id: String,
    pub costs: Vec<EditableCost>,
}

impl EditableOperation {
    /// 由服务端工序构造（成本字符串解析为数值）
    pub fn from_dto(dto: OperationDto) -> Self {
        let costs = dto
            .costs
            .into_iter()
            .map(|c| EditableCost {
                cost: parse_wire_cost(&c.cost, &c.id),
                key: CostKey::Persisted(c.id),
                volume_range: c.volume_range,
            })
            .collect();

        Self {
            key: OperationKey::Persisted(dto.id),
            name: dto.name,
            description: dto.description,
            plant_id: dto.plant_id,
            costs,
        }
    }

    /// 新建本地工序：8 个区间全部预置为 0
    pub fn pending(local: LocalId, plant_id: String, name: String) -> Self {
        let costs = VolumeRange::ALL
            .iter()
            .enumerate()
            .map(|(index, range)| EditableCost {
                key: CostKey::Pending {
                    local,
                    range: *range,
                    index,
                },
                volume_range: *range,
                cost: 0.0,
            })
            .collect();

        Self {
            key: OperationKey::Pending(local),
            name,
            description: None,
            plant_id,
            costs,
        }
    }

    /// 指定区间的成本；缺失视为 0
    pub fn cost_for(&self, range: VolumeRange) -> f64 {
        self.costs
            .iter()
            .find(|c| c.volume_range == range)
            .map(|c| c.cost)
            .unwrap_or(0.0)
    }

    pub fn costs_by_range(&self) -> CostsByRange {
        CostsByRange::from_entries(self.costs.iter().map(|c| (c.volume_range, c.cost)))
    }

    /// 名称或任一区间成本与对照不同
    pub fn differs_from(&self, other: &EditableOperation) -> bool {
        self.name != other.name
            || VolumeRange::ALL
                .iter()
                .any(|range| self.cost_for(*range) != other.cost_for(*range))
    }

    /// 全量 8 区间成本输入（缺失补 0）
    pub fn to_cost_inputs(&self) -> Vec<CostInput> {
        VolumeRange::ALL
            .iter()
            .map(|range| CostInput {
                volume_range: *range,
                cost: self.cost_for(*range),
            })
            .collect()
    }
}

/// 解析服务端十进制字符串成本；无法解析时按 0 处理
pub fn parse_wire_cost(raw: &str, cost_id: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            warn!(cost_id, raw, "成本值无法解析，按 0 处理");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::IndirectCostDto;

    fn wire_cost(id: &str, range: VolumeRange, cost: &str) -> IndirectCostDto {
        IndirectCostDto {
            id: id.to_string(),
            operation_id: "op-1".to_string(),
            volume_range: range,
            cost: cost.to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn test_from_dto_parses_costs() {
        let dto = OperationDto {
            id: "op-1".to_string(),
            name: "Impresión".to_string(),
            description: None,
            plant_id: "p1".to_string(),
            costs: vec![
                wire_cost("c1", VolumeRange::Range1T, "0.18"),
                wire_cost("c2", VolumeRange::Range3T, "abc"),
            ],
            created_at: String::new(),
            updated_at: String::new(),
        };

        let op = EditableOperation::from_dto(dto);
        assert_eq!(op.key, OperationKey::Persisted("op-1".to_string()));
        assert_eq!(op.cost_for(VolumeRange::Range1T), 0.18);
        assert_eq!(op.cost_for(VolumeRange::Range3T), 0.0);
        assert_eq!(op.cost_for(VolumeRange::Range30T), 0.0);
        assert_eq!(op.to_cost_inputs().len(), 8);
    }

    #[test]
    fn test_pending_operation_cost_keys_unique() {
        let op = EditableOperation::pending(LocalId(7), "p1".to_string(), "Corte".to_string());
        assert!(op.key.is_pending());
        assert_eq!(op.costs.len(), 8);

        let keys: std::collections::HashSet<_> = op.costs.iter().map(|c| c.key.clone()).collect();
        assert_eq!(keys.len(), 8);
        assert!(op.costs.iter().all(|c| c.cost == 0.0));
    }

    #[test]
    fn test_differs_from_treats_missing_as_zero() {
        let mut a = EditableOperation::pending(LocalId(1), "p".to_string(), "A".to_string());
        let mut b = a.clone();
        b.costs.retain(|c| c.volume_range != VolumeRange::Range5T);
        assert!(!a.differs_from(&b));

        a.costs[0].cost = 1.0;
        assert!(a.differs_from(&b));
    }
}
