// ==========================================
// 间接成本配置系统 - 工厂 API
// ==========================================
// 职责: 工厂的查询与管理
// 说明: plant(id) 查询携带其工序及成本明细
// ==========================================

use std::sync::Arc;

use chrono::Local;
use tracing::info;

use crate::api::dto::{
    CreatePlantInput, OperationDto, PlantDto, PlantWithOperationsDto, RemovedDto,
    UpdatePlantInput,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::InputValidator;
use crate::domain::Plant;
use crate::repository::{OperationRepository, PlantRepository};

// ==========================================
// PlantApi
// ==========================================

/// 工厂 API
///
/// 职责：
/// 1. 查询工厂列表、单个工厂（含工序）
/// 2. 创建/更新/删除工厂（删除级联到工序与成本）
pub struct PlantApi {
    plant_repo: Arc<PlantRepository>,
    operation_repo: Arc<OperationRepository>,
    validator: InputValidator,
}

impl PlantApi {
    /// 创建新的 PlantApi 实例
    pub fn new(
        plant_repo: Arc<PlantRepository>,
        operation_repo: Arc<OperationRepository>,
        validator: InputValidator,
    ) -> Self {
        Self {
            plant_repo,
            operation_repo,
            validator,
        }
    }

    /// 查询全部工厂（按名称排序）
    pub fn list_plants(&self) -> ApiResult<Vec<PlantDto>> {
        let plants = self.plant_repo.list_all()?;
        Ok(plants.into_iter().map(Into::into).collect())
    }

    /// 查询单个工厂及其工序
    ///
    /// # 参数
    /// - `plant_id`: 工厂ID
    ///
    /// # 返回
    /// - `PlantWithOperationsDto`: 工厂信息 + 工序（按名称排序，携带成本）
    /// - `ApiError::NotFound`: 工厂不存在
    pub fn get_plant(&self, plant_id: &str) -> ApiResult<PlantWithOperationsDto> {
        let plant = self.require_plant(plant_id)?;
        let operations = self.operation_repo.list_by_plant(plant_id)?;

        Ok(PlantWithOperationsDto {
            plant: plant.into(),
            operations: operations.into_iter().map(OperationDto::from).collect(),
        })
    }

    /// 按简码查询工厂（CLI 使用）
    pub fn find_plant_by_code(&self, code: &str) -> ApiResult<Option<PlantDto>> {
        Ok(self.plant_repo.find_by_code(code.trim())?.map(Into::into))
    }

    /// 创建工厂
    ///
    /// # 说明
    /// - 简码唯一，重复时返回 BusinessRuleViolation
    pub fn create_plant(&self, input: CreatePlantInput) -> ApiResult<PlantDto> {
        let name = self.validator.validate_plant_name(&input.name)?;
        let code = self.validator.validate_plant_code(&input.code)?;
        let description = self
            .validator
            .validate_description(input.description.as_deref())?;

        let plant = Plant::new(name, code, description);
        self.plant_repo.insert(&plant)?;

        info!(plant_id = %plant.plant_id, code = %plant.code, "工厂已创建");
        Ok(plant.into())
    }

    /// 更新工厂（None 字段保持不变）
    pub fn update_plant(&self, input: UpdatePlantInput) -> ApiResult<PlantDto> {
        let mut plant = self.require_plant(&input.id)?;

        if let Some(name) = input.name.as_deref() {
            plant.name = self.validator.validate_plant_name(name)?;
        }
        if let Some(code) = input.code.as_deref() {
            plant.code = self.validator.validate_plant_code(code)?;
        }
        if input.description.is_some() {
            plant.description = self
                .validator
                .validate_description(input.description.as_deref())?;
        }
        plant.updated_at = Local::now().naive_local();

        if self.plant_repo.update(&plant)? == 0 {
            return Err(ApiError::NotFound(format!("工厂(id={})不存在", input.id)));
        }

        info!(plant_id = %plant.plant_id, "工厂已更新");
        Ok(plant.into())
    }

    /// 删除工厂（级联删除其工序与成本）
    pub fn remove_plant(&self, plant_id: &str) -> ApiResult<RemovedDto> {
        self.require_plant(plant_id)?;
        self.plant_repo.delete(plant_id)?;

        info!(plant_id, "工厂已删除");
        Ok(RemovedDto {
            id: plant_id.to_string(),
        })
    }

    fn require_plant(&self, plant_id: &str) -> ApiResult<Plant> {
        self.plant_repo
            .find_by_id(plant_id)?
            .ok_or_else(|| ApiError::NotFound(format!("工厂(id={})不存在", plant_id)))
    }
}
