// ==========================================
// 间接成本配置系统 - 编辑器网关
// ==========================================
// 职责: 定义编辑器访问 API 层的 trait (依赖倒置)
// 实现者: LocalGateway (进程内 PlantApi / OperationApi)
//         测试中的记录型 mock
// ==========================================

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::api::dto::{
    CreateOperationInput, OperationDto, PlantDto, RemovedDto, UpdateOperationInput,
};
use crate::api::{OperationApi, PlantApi};
use crate::editor::error::GatewayResult;

// ==========================================
// CostGateway Trait
// ==========================================
#[async_trait]
pub trait CostGateway: Send + Sync {
    /// 查询全部工厂
    async fn list_plants(&self) -> GatewayResult<Vec<PlantDto>>;

    /// 查询某工厂的工序（含成本）
    async fn operations_by_plant(&self, plant_id: &str) -> GatewayResult<Vec<OperationDto>>;

    async fn create_operation(&self, input: CreateOperationInput) -> GatewayResult<OperationDto>;

    /// 更新工序；costs 逐条 upsert
    async fn update_operation(&self, input: UpdateOperationInput) -> GatewayResult<OperationDto>;

    async fn remove_operation(&self, operation_id: &str) -> GatewayResult<RemovedDto>;
}

// ==========================================
// LocalGateway - 进程内实现
// ==========================================
pub struct LocalGateway {
    plant_api: Arc<PlantApi>,
    operation_api: Arc<OperationApi>,
}

impl LocalGateway {
    pub fn new(plant_api: Arc<PlantApi>, operation_api: Arc<OperationApi>) -> Self {
        Self {
            plant_api,
            operation_api,
        }
    }
}

#[async_trait]
impl CostGateway for LocalGateway {
    async fn list_plants(&self) -> GatewayResult<Vec<PlantDto>> {
        Ok(self.plant_api.list_plants()?)
    }

    async fn operations_by_plant(&self, plant_id: &str) -> GatewayResult<Vec<OperationDto>> {
        Ok(self.operation_api.operations_by_plant(plant_id)?)
    }

    async fn create_operation(&self, input: CreateOperationInput) -> GatewayResult<OperationDto> {
        debug!(name = %input.name, plant_id = %input.plant_id, "createOperation");
        Ok(self.operation_api.create_operation(input)?)
    }

    async fn update_operation(&self, input: UpdateOperationInput) -> GatewayResult<OperationDto> {
        debug!(operation_id = %input.id, "updateOperation");
        Ok(self.operation_api.update_operation(input)?)
    }

    async fn remove_operation(&self, operation_id: &str) -> GatewayResult<RemovedDto> {
        debug!(operation_id, "removeOperation");
        Ok(self.operation_api.remove_operation(operation_id)?)
    }
}
