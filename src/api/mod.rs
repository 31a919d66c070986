// ==========================================
// 间接成本配置系统 - API 层
// ==========================================
// 职责: 提供工厂/工序的查询与变更接口
// 调用方: 编辑器网关 (LocalGateway)、命令行
// ==========================================

pub mod dto;
pub mod error;
pub mod operation_api;
pub mod plant_api;
pub mod validator;

// 重导出核心类型
pub use dto::{
    CostInput, CreateOperationInput, CreatePlantInput, IndirectCostDto, OperationDto, PlantDto,
    PlantWithOperationsDto, RemovedDto, UpdateOperationInput, UpdatePlantInput,
};
pub use error::{ApiError, ApiResult};
pub use operation_api::OperationApi;
pub use plant_api::PlantApi;
pub use validator::InputValidator;
