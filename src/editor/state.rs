// ==========================================
// 间接成本配置系统 - 编辑状态
// ==========================================
// 组成: 快照 (最近一次服务端结果) / 工作副本 / 待新增 / 待删除
// 约束: has_changes 每次从上述状态重新计算，不缓存脏标记
// 约束: SavePlan 只由本模块生成，本地ID不会进入任何请求
// ==========================================

use std::collections::BTreeSet;

use crate::api::dto::{CreateOperationInput, UpdateOperationInput};
use crate::domain::VolumeRange;
use crate::editor::error::{EditorError, EditorResult};
use crate::editor::model::{CostKey, EditableCost, EditableOperation, LocalId, OperationKey};

// ==========================================
// SavePlan - 保存批次
// ==========================================

/// 一次保存需要发出的全部变更（按执行顺序分组）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavePlan {
    /// 待新增工序（插入顺序）
    pub creates: Vec<CreateOperationInput>,
    /// 有改动的已存在工序（工作副本顺序，全量 8 区间成本）
    pub updates: Vec<UpdateOperationInput>,
    /// 待删除工序ID
    pub removals: Vec<String>,
}

impl SavePlan {
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.updates.is_empty() && self.removals.is_empty()
    }

    pub fn call_count(&self) -> usize {
        self.creates.len() + self.updates.len() + self.removals.len()
    }
}

// ==========================================
// EditorState
// ==========================================
#[derive(Debug, Default)]
pub struct EditorState {
    snapshot: Vec<EditableOperation>,
    working: Vec<EditableOperation>,
    pending_new: Vec<EditableOperation>,
    pending_removal: BTreeSet<String>,
    next_local: u64,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &[EditableOperation] {
        &self.snapshot
    }

    pub fn pending_new(&self) -> &[EditableOperation] {
        &self.pending_new
    }

    pub fn pending_removal(&self) -> &BTreeSet<String> {
        &self.pending_removal
    }

    /// 以服务端结果替换快照与工作副本（待处理集合不变）
    pub fn load(&mut self, operations: Vec<EditableOperation>) {
        self.working = operations.clone();
        self.snapshot = operations;
    }

    /// 保存的变更已全部成功但未能重新拉取时，用各请求的返回结果重建快照与工作副本
    ///
    /// 已删除的工序移出视图，返回结果按ID替换原工序，其余（新增）追加在后
    pub fn apply_saved(&mut self, removed: &[String], saved: Vec<EditableOperation>) {
        let mut operations: Vec<EditableOperation> = self
            .working
            .drain(..)
            .filter(|op| {
                op.key
                    .persisted_id()
                    .map_or(true, |id| !removed.iter().any(|r| r == id))
            })
            .collect();

        for op in saved {
            match operations.iter_mut().find(|existing| existing.key == op.key) {
                Some(existing) => *existing = op,
                None => operations.push(op),
            }
        }

        self.clear_pending();
        self.load(operations);
    }

    /// 清空全部状态（切换工厂）
    pub fn clear(&mut self) {
        self.snapshot.clear();
        self.working.clear();
        self.clear_pending();
    }

    pub fn clear_pending(&mut self) {
        self.pending_new.clear();
        self.pending_removal.clear();
    }

    /// 丢弃改动：工作副本恢复为快照，清空待处理集合
    pub fn reset(&mut self) {
        self.working = self.snapshot.clone();
        self.clear_pending();
    }

    fn allocate_local(&mut self) -> LocalId {
        self.next_local += 1;
        LocalId(self.next_local)
    }

    fn find_mut(&mut self, key: &OperationKey) -> Option<&mut EditableOperation> {
        match key {
            OperationKey::Pending(_) => self.pending_new.iter_mut().find(|op| &op.key == key),
            OperationKey::Persisted(_) => self.working.iter_mut().find(|op| &op.key == key),
        }
    }

    /// 修改某区间成本：已有条目则替换，否则以本地标识追加
    pub fn update_cost(
        &mut self,
        key: &OperationKey,
        range: VolumeRange,
        cost: f64,
    ) -> EditorResult<()> {
        let operation = self
            .find_mut(key)
            .ok_or_else(|| EditorError::UnknownOperation(key.to_string()))?;
        if let Some(entry) = operation.costs.iter_mut().find(|c| c.volume_range == range) {
            entry.cost = cost;
            return Ok(());
        }

        // 只有追加时才分配本地标识
        let local = self.allocate_local();
        if let Some(operation) = self.find_mut(key) {
            let index = operation.costs.len();
            operation.costs.push(EditableCost {
                key: CostKey::Pending {
                    local,
                    range,
                    index,
                },
                volume_range: range,
                cost,
            });
        }
        Ok(())
    }

    pub fn rename(&mut self, key: &OperationKey, name: String) -> EditorResult<()> {
        let operation = self
            .find_mut(key)
            .ok_or_else(|| EditorError::UnknownOperation(key.to_string()))?;
        operation.name = name;
        Ok(())
    }

    /// 追加一个本地新工序，返回其标识
    pub fn add(&mut self, plant_id: &str, name: String) -> OperationKey {
        let local = self.allocate_local();
        let operation = EditableOperation::pending(local, plant_id.to_string(), name);
        let key = operation.key.clone();
        self.pending_new.push(operation);
        key
    }

    /// 删除工序：本地新工序直接丢弃，已存在工序加入待删除集合
    pub fn remove(&mut self, key: &OperationKey) -> EditorResult<()> {
        match key {
            OperationKey::Pending(_) => {
                let before = self.pending_new.len();
                self.pending_new.retain(|op| &op.key != key);
                if self.pending_new.len() == before {
                    return Err(EditorError::UnknownOperation(key.to_string()));
                }
            }
            OperationKey::Persisted(id) => {
                if !self.working.iter().any(|op| &op.key == key) {
                    return Err(EditorError::UnknownOperation(id.clone()));
                }
                self.pending_removal.insert(id.clone());
            }
        }
        Ok(())
    }

    fn is_removed(&self, operation: &EditableOperation) -> bool {
        operation
            .key
            .persisted_id()
            .is_some_and(|id| self.pending_removal.contains(id))
    }

    fn snapshot_of(&self, key: &OperationKey) -> Option<&EditableOperation> {
        self.snapshot.iter().find(|op| &op.key == key)
    }

    /// 合并视图：工作副本（去掉待删除）+ 待新增（插入顺序）
    pub fn merged(&self) -> Vec<&EditableOperation> {
        self.working
            .iter()
            .filter(|op| !self.is_removed(op))
            .chain(self.pending_new.iter())
            .collect()
    }

    pub fn has_changes(&self) -> bool {
        if !self.pending_new.is_empty() || !self.pending_removal.is_empty() {
            return true;
        }

        let surviving: Vec<&EditableOperation> =
            self.working.iter().filter(|op| !self.is_removed(op)).collect();
        if surviving.len() != self.snapshot.len() {
            return true;
        }

        surviving.iter().any(|op| match self.snapshot_of(&op.key) {
            Some(original) => op.differs_from(original),
            None => true,
        })
    }

    /// 由当前状态计算保存批次
    pub fn save_plan(&self, plant_id: &str) -> SavePlan {
        let creates = self
            .pending_new
            .iter()
            .map(|op| CreateOperationInput {
                name: op.name.clone(),
                description: op.description.clone(),
                plant_id: plant_id.to_string(),
                costs: Some(op.to_cost_inputs()),
            })
            .collect();

        let updates = self
            .working
            .iter()
            .filter(|op| !self.is_removed(op))
            .filter_map(|op| {
                let id = op.key.persisted_id()?;
                let original = self.snapshot_of(&op.key)?;
                op.differs_from(original).then(|| UpdateOperationInput {
                    id: id.to_string(),
                    name: Some(op.name.clone()),
                    description: None,
                    costs: Some(op.to_cost_inputs()),
                })
            })
            .collect();

        SavePlan {
            creates,
            updates,
            removals: self.pending_removal.iter().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persisted(id: &str, name: &str) -> EditableOperation {
        EditableOperation {
            key: OperationKey::Persisted(id.to_string()),
            name: name.to_string(),
            description: None,
            plant_id: "p1".to_string(),
            costs: VolumeRange::ALL
                .iter()
                .map(|r| EditableCost {
                    key: CostKey::Persisted(format!("{}-{}", id, r.as_str())),
                    volume_range: *r,
                    cost: 0.0,
                })
                .collect(),
        }
    }

    fn loaded(ids: &[&str]) -> EditorState {
        let mut state = EditorState::new();
        state.load(ids.iter().map(|id| persisted(id, id)).collect());
        state
    }

    #[test]
    fn test_edit_back_to_original_clears_changes() {
        let mut state = loaded(&["op-1"]);
        let key = OperationKey::Persisted("op-1".to_string());

        state.update_cost(&key, VolumeRange::Range1T, 0.5).unwrap();
        state.update_cost(&key, VolumeRange::Range1T, 0.7).unwrap();
        assert!(state.has_changes());
        assert_eq!(state.merged()[0].cost_for(VolumeRange::Range1T), 0.7);

        state.update_cost(&key, VolumeRange::Range1T, 0.0).unwrap();
        assert!(!state.has_changes());
    }

    #[test]
    fn test_missing_cost_entry_is_appended() {
        let mut state = EditorState::new();
        let mut op = persisted("op-1", "A");
        op.costs.clear();
        state.load(vec![op]);

        let key = OperationKey::Persisted("op-1".to_string());
        state.update_cost(&key, VolumeRange::Range20T, 3.0).unwrap();

        let merged = state.merged();
        assert_eq!(merged[0].costs.len(), 1);
        assert!(matches!(merged[0].costs[0].key, CostKey::Pending { .. }));
        assert!(state.has_changes());
    }

    #[test]
    fn test_add_then_remove_pending_leaves_no_changes() {
        let mut state = loaded(&["op-1"]);
        let key = state.add("p1", "X".to_string());
        assert!(state.has_changes());
        assert_eq!(state.merged().len(), 2);

        state.remove(&key).unwrap();
        assert!(state.pending_new().is_empty());
        assert!(!state.has_changes());
        assert!(state.save_plan("p1").is_empty());
    }

    #[test]
    fn test_remove_persisted_hides_from_merged_view() {
        let mut state = loaded(&["op-1", "op-2"]);
        state
            .remove(&OperationKey::Persisted("op-1".to_string()))
            .unwrap();

        let ids: Vec<String> = state.merged().iter().map(|op| op.key.to_string()).collect();
        assert_eq!(ids, vec!["op-2"]);
        assert!(state.has_changes());

        let unknown = state.remove(&OperationKey::Persisted("nope".to_string()));
        assert!(matches!(unknown, Err(EditorError::UnknownOperation(_))));
    }

    #[test]
    fn test_reset_restores_snapshot() {
        let mut state = loaded(&["op-1", "op-2"]);
        let op1 = OperationKey::Persisted("op-1".to_string());
        state.update_cost(&op1, VolumeRange::Range300Kg, 9.0).unwrap();
        state.rename(&op1, "Renamed".to_string()).unwrap();
        state.add("p1", "New".to_string());
        state
            .remove(&OperationKey::Persisted("op-2".to_string()))
            .unwrap();

        state.reset();

        let merged: Vec<EditableOperation> = state.merged().into_iter().cloned().collect();
        assert_eq!(merged, state.snapshot().to_vec());
        assert!(state.pending_new().is_empty());
        assert!(state.pending_removal().is_empty());
        assert!(!state.has_changes());
    }

    #[test]
    fn test_save_plan_groups_in_order() {
        let mut state = loaded(&["op-1", "op-2", "op-3"]);
        let new_key = state.add("p1", "Nueva".to_string());
        state.update_cost(&new_key, VolumeRange::Range300Kg, 10.0).unwrap();
        state
            .update_cost(
                &OperationKey::Persisted("op-2".to_string()),
                VolumeRange::Range1T,
                0.18,
            )
            .unwrap();
        state
            .remove(&OperationKey::Persisted("op-3".to_string()))
            .unwrap();

        let plan = state.save_plan("p1");
        assert_eq!(plan.call_count(), 3);

        assert_eq!(plan.creates[0].name, "Nueva");
        assert_eq!(plan.creates[0].plant_id, "p1");
        let create_costs = plan.creates[0].costs.as_ref().unwrap();
        assert_eq!(create_costs.len(), 8);
        assert_eq!(create_costs[0].cost, 10.0);

        assert_eq!(plan.updates[0].id, "op-2");
        assert_eq!(plan.updates[0].costs.as_ref().unwrap().len(), 8);

        assert_eq!(plan.removals, vec!["op-3".to_string()]);
    }

    #[test]
    fn test_replacing_cost_does_not_consume_local_id() {
        let mut state = loaded(&["op-1"]);
        let key = OperationKey::Persisted("op-1".to_string());
        state.update_cost(&key, VolumeRange::Range1T, 0.5).unwrap();
        let missing = OperationKey::Persisted("nope".to_string());
        assert!(state.update_cost(&missing, VolumeRange::Range1T, 0.5).is_err());

        let added = state.add("p1", "A".to_string());
        assert_eq!(added, OperationKey::Pending(LocalId(1)));
    }

    #[test]
    fn test_apply_saved_drops_removed_and_keeps_saved() {
        let mut state = loaded(&["op-1", "op-2"]);
        let op1 = OperationKey::Persisted("op-1".to_string());
        state.update_cost(&op1, VolumeRange::Range3T, 0.4).unwrap();
        state
            .remove(&OperationKey::Persisted("op-2".to_string()))
            .unwrap();
        state.add("p1", "Corte".to_string());

        let mut updated = persisted("op-1", "op-1");
        updated.costs[3].cost = 0.4;
        let created = persisted("srv-1", "Corte");
        state.apply_saved(&["op-2".to_string()], vec![updated, created]);

        let ids: Vec<String> = state.merged().iter().map(|op| op.key.to_string()).collect();
        assert_eq!(ids, vec!["op-1", "srv-1"]);
        assert_eq!(state.merged()[0].cost_for(VolumeRange::Range3T), 0.4);
        assert!(state.pending_new().is_empty());
        assert!(state.pending_removal().is_empty());
        assert!(!state.has_changes());
    }

    #[test]
    fn test_local_ids_unique_across_clear() {
        let mut state = EditorState::new();
        let a = state.add("p1", "A".to_string());
        state.clear();
        let b = state.add("p1", "B".to_string());
        assert_ne!(a, b);
    }
}
