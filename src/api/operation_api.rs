// ==========================================
// 间接成本配置系统 - 工序 API
// ==========================================
// 职责: 工序及其区间成本的查询与管理
// 说明: 返回的工序对象内嵌成本数组 (反规范化)
// 说明: updateOperation 的 costs 为 upsert 语义，不因省略而删除
// ==========================================

use std::sync::Arc;

use chrono::Local;
use tracing::{debug, info};

use crate::api::dto::{
    CostInput, CreateOperationInput, OperationDto, RemovedDto, UpdateOperationInput,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::InputValidator;
use crate::domain::{IndirectCost, Operation};
use crate::repository::{OperationRepository, PlantRepository};

// ==========================================
// OperationApi
// ==========================================

/// 工序 API
///
/// 职责：
/// 1. 查询工序（全部、按工厂、按ID）
/// 2. 创建工序（可携带初始成本）
/// 3. 更新工序名称/描述并 upsert 成本
/// 4. 删除工序（成本级联删除）
pub struct OperationApi {
    operation_repo: Arc<OperationRepository>,
    plant_repo: Arc<PlantRepository>,
    validator: InputValidator,
}

impl OperationApi {
    /// 创建新的 OperationApi 实例
    pub fn new(
        operation_repo: Arc<OperationRepository>,
        plant_repo: Arc<PlantRepository>,
        validator: InputValidator,
    ) -> Self {
        Self {
            operation_repo,
            plant_repo,
            validator,
        }
    }

    /// 查询全部工序（按名称排序）
    pub fn list_operations(&self) -> ApiResult<Vec<OperationDto>> {
        let operations = self.operation_repo.list_all()?;
        Ok(operations.into_iter().map(Into::into).collect())
    }

    /// 查询某工厂的工序
    ///
    /// # 参数
    /// - `plant_id`: 工厂ID
    ///
    /// # 返回
    /// - `Vec<OperationDto>`: 按名称排序，工厂不存在时为空列表
    pub fn operations_by_plant(&self, plant_id: &str) -> ApiResult<Vec<OperationDto>> {
        let operations = self.operation_repo.list_by_plant(plant_id)?;
        debug!(plant_id, count = operations.len(), "查询工厂工序");
        Ok(operations.into_iter().map(Into::into).collect())
    }

    /// 按ID查询工序
    pub fn get_operation(&self, operation_id: &str) -> ApiResult<OperationDto> {
        Ok(self.require_operation(operation_id)?.into())
    }

    /// 创建工序
    ///
    /// # 参数
    /// - `input`: 名称、可选描述、所属工厂、可选初始成本
    ///
    /// # 返回
    /// - `OperationDto`: 新建的工序（含成本）
    /// - `ApiError::NotFound`: 工厂不存在
    /// - `ApiError::InvalidInput`: 名称/描述/成本校验失败
    pub fn create_operation(&self, input: CreateOperationInput) -> ApiResult<OperationDto> {
        let name = self.validator.validate_operation_name(&input.name)?;
        let description = self
            .validator
            .validate_description(input.description.as_deref())?;
        let costs = input.costs.unwrap_or_default();
        self.validator.validate_costs(&costs)?;

        if self.plant_repo.find_by_id(&input.plant_id)?.is_none() {
            return Err(ApiError::NotFound(format!(
                "工厂(id={})不存在",
                input.plant_id
            )));
        }

        let mut operation = Operation::new(input.plant_id, name, description);
        operation.costs = to_indirect_costs(&operation.operation_id, &costs);
        operation.costs.sort_by_key(|c| c.volume_range);
        self.operation_repo.insert_with_costs(&operation)?;

        info!(
            operation_id = %operation.operation_id,
            plant_id = %operation.plant_id,
            costs = operation.costs.len(),
            "工序已创建"
        );
        Ok(operation.into())
    }

    /// 更新工序
    ///
    /// # 说明
    /// - name/description 为 None 时保持不变
    /// - costs 存在时逐条 upsert (operation_id, volume_range)，未出现的区间保持原值
    pub fn update_operation(&self, input: UpdateOperationInput) -> ApiResult<OperationDto> {
        let mut operation = self.require_operation(&input.id)?;

        if let Some(name) = input.name.as_deref() {
            operation.name = self.validator.validate_operation_name(name)?;
        }
        if input.description.is_some() {
            operation.description = self
                .validator
                .validate_description(input.description.as_deref())?;
        }
        let costs = input.costs.unwrap_or_default();
        self.validator.validate_costs(&costs)?;
        operation.updated_at = Local::now().naive_local();

        let new_costs = to_indirect_costs(&operation.operation_id, &costs);
        if self.operation_repo.update_with_costs(&operation, &new_costs)? == 0 {
            return Err(ApiError::NotFound(format!("工序(id={})不存在", input.id)));
        }

        info!(
            operation_id = %operation.operation_id,
            costs = new_costs.len(),
            "工序已更新"
        );
        Ok(self.require_operation(&input.id)?.into())
    }

    /// 删除工序（成本由外键级联删除）
    pub fn remove_operation(&self, operation_id: &str) -> ApiResult<RemovedDto> {
        self.require_operation(operation_id)?;
        self.operation_repo.delete(operation_id)?;

        info!(operation_id, "工序已删除");
        Ok(RemovedDto {
            id: operation_id.to_string(),
        })
    }

    fn require_operation(&self, operation_id: &str) -> ApiResult<Operation> {
        self.operation_repo
            .find_by_id(operation_id)?
            .ok_or_else(|| ApiError::NotFound(format!("工序(id={})不存在", operation_id)))
    }
}

fn to_indirect_costs(operation_id: &str, costs: &[CostInput]) -> Vec<IndirectCost> {
    costs
        .iter()
        .map(|input| IndirectCost::new(operation_id.to_string(), input.volume_range, input.cost))
        .collect()
}
