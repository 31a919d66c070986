// ==========================================
// 间接成本配置系统 - 成本编辑器
// ==========================================
// 职责: 选择工厂 → 本地编辑 → 批量保存 的对账核心
// 保存顺序: 新增 → 更新 → 删除 → 清空待处理 → 重新拉取
// 并发: save_changes 持有 &mut self，保存期间无法切换工厂
// ==========================================

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::api::dto::{OperationDto, PlantDto};
use crate::domain::VolumeRange;
use crate::editor::cache::EntityCache;
use crate::editor::error::{EditorError, EditorResult};
use crate::editor::gateway::CostGateway;
use crate::editor::model::{EditableOperation, OperationKey};
use crate::editor::state::{EditorState, SavePlan};

/// 编辑器对外状态（供表现层订阅）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditorStatus {
    pub is_loading: bool,
    pub is_saving: bool,
}

pub struct CostEditor {
    gateway: Arc<dyn CostGateway>,
    cache: EntityCache,
    plants: Vec<PlantDto>,
    selected_plant_id: Option<String>,
    state: EditorState,
    status: watch::Sender<EditorStatus>,
    last_error: Option<EditorError>,
    needs_refresh: bool,
}

impl CostEditor {
    pub fn new(gateway: Arc<dyn CostGateway>) -> Self {
        let (status, _) = watch::channel(EditorStatus::default());
        Self {
            gateway,
            cache: EntityCache::new(),
            plants: Vec::new(),
            selected_plant_id: None,
            state: EditorState::new(),
            status,
            last_error: None,
            needs_refresh: false,
        }
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn plants(&self) -> &[PlantDto] {
        &self.plants
    }

    pub fn selected_plant_id(&self) -> Option<&str> {
        self.selected_plant_id.as_deref()
    }

    pub fn selected_plant(&self) -> Option<&PlantDto> {
        let plant_id = self.selected_plant_id.as_deref()?;
        self.plants.iter().find(|p| p.id == plant_id)
    }

    /// 合并视图：工作副本（不含待删除）+ 待新增
    pub fn operations(&self) -> Vec<&EditableOperation> {
        self.state.merged()
    }

    pub fn has_changes(&self) -> bool {
        self.state.has_changes()
    }

    /// 当前状态对应的保存批次（不发出请求）
    pub fn pending_plan(&self) -> Option<SavePlan> {
        let plant_id = self.selected_plant_id.as_deref()?;
        Some(self.state.save_plan(plant_id))
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn status(&self) -> EditorStatus {
        *self.status.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<EditorStatus> {
        self.status.subscribe()
    }

    pub fn last_error(&self) -> Option<&EditorError> {
        self.last_error.as_ref()
    }

    /// 保存成功但重新拉取失败后为 true，视图来自本次保存的返回结果
    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    // ==========================================
    // 加载
    // ==========================================

    /// 拉取工厂列表
    pub async fn load_plants(&mut self) -> EditorResult<&[PlantDto]> {
        if let Some(cached) = self.cache.plants() {
            self.plants = cached.to_vec();
        }

        self.set_loading(true);
        let result = self.gateway.list_plants().await;
        self.set_loading(false);

        match result {
            Ok(plants) => {
                debug!(count = plants.len(), "工厂列表已加载");
                self.cache.put_plants(plants.clone());
                self.plants = plants;
                Ok(&self.plants)
            }
            Err(e) => Err(self.record(e.into())),
        }
    }

    /// 切换工厂
    ///
    /// # 说明
    /// - 直接丢弃未保存的改动（不做确认）
    /// - 缓存中有该工厂的结果时先用于展示，再以网络结果整体替换
    pub async fn select_plant(&mut self, plant_id: &str) -> EditorResult<()> {
        if self.state.has_changes() {
            warn!(
                from = ?self.selected_plant_id,
                to = plant_id,
                "切换工厂，未保存的改动已丢弃"
            );
        }

        self.selected_plant_id = Some(plant_id.to_string());
        self.state.clear();
        self.needs_refresh = false;

        if let Some(cached) = self.cache.operations(plant_id) {
            let operations = decode_operations(cached.to_vec());
            self.state.load(operations);
        }

        info!(plant_id, "已选择工厂");
        self.fetch_operations(plant_id).await
    }

    /// 重新拉取当前工厂的工序（待处理集合保持不变）
    pub async fn refresh(&mut self) -> EditorResult<()> {
        let plant_id = self
            .selected_plant_id
            .clone()
            .ok_or(EditorError::NoPlantSelected)?;
        self.fetch_operations(&plant_id).await
    }

    async fn fetch_operations(&mut self, plant_id: &str) -> EditorResult<()> {
        self.set_loading(true);
        let result = self.gateway.operations_by_plant(plant_id).await;
        self.set_loading(false);

        match result {
            Ok(operations) => {
                self.apply_fetched(plant_id, operations);
                Ok(())
            }
            Err(e) => Err(self.record(e.into())),
        }
    }

    fn apply_fetched(&mut self, plant_id: &str, operations: Vec<OperationDto>) {
        debug!(plant_id, count = operations.len(), "工序列表已加载");
        self.needs_refresh = false;
        self.cache.put_operations(plant_id, operations.clone());
        self.state.load(decode_operations(operations));
    }

    // ==========================================
    // 本地编辑
    // ==========================================

    /// 修改成本（调用方负责解析输入，见 parse_cost_input）
    pub fn update_operation_cost(
        &mut self,
        key: &OperationKey,
        range: VolumeRange,
        cost: f64,
    ) -> EditorResult<()> {
        self.state.update_cost(key, range, cost)
    }

    pub fn rename_operation(&mut self, key: &OperationKey, name: &str) -> EditorResult<()> {
        self.state.rename(key, name.to_string())
    }

    /// 新增工序（未选择工厂时不做任何事）
    ///
    /// 名称校验由调用方完成，见 validate_new_operation_name
    pub fn add_operation(&mut self, name: &str) -> Option<OperationKey> {
        let plant_id = self.selected_plant_id.as_deref()?;
        let key = self.state.add(plant_id, name.to_string());
        debug!(%key, name, "新增工序（待保存）");
        Some(key)
    }

    pub fn remove_operation(&mut self, key: &OperationKey) -> EditorResult<()> {
        self.state.remove(key)?;
        debug!(%key, "删除工序（待保存）");
        Ok(())
    }

    /// 放弃改动（不发请求）
    pub fn reset_changes(&mut self) {
        self.state.reset();
    }

    // ==========================================
    // 保存
    // ==========================================

    /// 批量保存
    ///
    /// # 返回
    /// - true: 全部请求成功，待处理集合已清空并重新拉取
    /// - false: 某一步失败，后续步骤未执行，待处理状态保持原样（可重试）
    pub async fn save_changes(&mut self) -> bool {
        let Some(plant_id) = self.selected_plant_id.clone() else {
            self.record(EditorError::NoPlantSelected);
            return false;
        };

        let plan = self.state.save_plan(&plant_id);
        info!(
            plant_id = %plant_id,
            creates = plan.creates.len(),
            updates = plan.updates.len(),
            removals = plan.removals.len(),
            "开始保存"
        );

        self.set_saving(true);
        let result = self.apply_plan(&plant_id, plan).await;
        self.set_saving(false);

        match result {
            Ok(()) => {
                self.last_error = None;
                info!(plant_id = %plant_id, "保存完成");
                true
            }
            Err(e) => {
                error!(plant_id = %plant_id, error = %e, "保存失败");
                self.record(e);
                false
            }
        }
    }

    async fn apply_plan(&mut self, plant_id: &str, plan: SavePlan) -> EditorResult<()> {
        let mut saved = Vec::with_capacity(plan.creates.len() + plan.updates.len());
        for input in plan.creates {
            saved.push(self.gateway.create_operation(input).await?);
        }
        for input in plan.updates {
            saved.push(self.gateway.update_operation(input).await?);
        }
        for operation_id in &plan.removals {
            self.gateway.remove_operation(operation_id).await?;
        }

        self.state.clear_pending();
        self.cache.invalidate(plant_id);

        match self.gateway.operations_by_plant(plant_id).await {
            Ok(operations) => {
                self.apply_fetched(plant_id, operations);
                Ok(())
            }
            Err(e) => {
                // 变更已生效，视图改用各请求的返回结果，等待下一次 refresh
                warn!(plant_id, error = %e, "保存后重新拉取失败，使用本次返回结果");
                self.state
                    .apply_saved(&plan.removals, decode_operations(saved));
                self.needs_refresh = true;
                Err(e.into())
            }
        }
    }

    fn set_loading(&self, loading: bool) {
        self.status.send_modify(|s| s.is_loading = loading);
    }

    fn set_saving(&self, saving: bool) {
        self.status.send_modify(|s| s.is_saving = saving);
    }

    fn record(&mut self, err: EditorError) -> EditorError {
        self.last_error = Some(err.clone());
        err
    }
}

fn decode_operations(operations: Vec<OperationDto>) -> Vec<EditableOperation> {
    operations
        .into_iter()
        .map(EditableOperation::from_dto)
        .collect()
}
