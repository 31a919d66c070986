// ==========================================
// 间接成本配置系统 - 工序与间接成本领域模型
// ==========================================
// 对齐: operation 表 / indirect_cost 表
// 约束: 每个 (operation_id, volume_range) 至多一条 IndirectCost
// ==========================================

use crate::domain::types::{CostsByRange, VolumeRange};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Operation - 工序 (如 印刷 / 复合 / 制袋)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub operation_id: String,        // 工序ID (UUID)
    pub plant_id: String,            // 所属工厂
    pub name: String,                // 名称
    pub description: Option<String>, // 描述
    pub costs: Vec<IndirectCost>,    // 各运量区间的间接成本
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Operation {
    /// 创建新的工序实体（不含成本）
    pub fn new(plant_id: String, name: String, description: Option<String>) -> Self {
        let now = chrono::Local::now().naive_local();
        Self {
            operation_id: uuid::Uuid::new_v4().to_string(),
            plant_id,
            name,
            description,
            costs: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 按区间取成本行（缺失按 0）
    pub fn costs_by_range(&self) -> CostsByRange {
        CostsByRange::from_entries(self.costs.iter().map(|c| (c.volume_range, c.cost)))
    }
}

// ==========================================
// IndirectCost - 间接成本
// ==========================================
// 红线: cost >= 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndirectCost {
    pub cost_id: String,           // 成本ID (UUID)
    pub operation_id: String,      // 所属工序
    pub volume_range: VolumeRange, // 运量区间
    pub cost: f64,                 // 单位成本
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl IndirectCost {
    pub fn new(operation_id: String, volume_range: VolumeRange, cost: f64) -> Self {
        let now = chrono::Local::now().naive_local();
        Self {
            cost_id: uuid::Uuid::new_v4().to_string(),
            operation_id,
            volume_range,
            cost,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_costs_by_range_fills_missing_with_zero() {
        let mut op = Operation::new("p1".to_string(), "Impresión".to_string(), None);
        op.costs
            .push(IndirectCost::new(op.operation_id.clone(), VolumeRange::Range3T, 0.14));

        let costs = op.costs_by_range();
        assert_eq!(costs.get(VolumeRange::Range3T), 0.14);
        assert_eq!(costs.get(VolumeRange::Range300Kg), 0.0);
    }
}
