// ==========================================
// 间接成本配置系统 - API 传输对象
// ==========================================
// 字段命名: camelCase (与前端 / 接口契约一致)
// 成本字段: 以十进制字符串传输 (cost: "0.18")，消费方负责解析
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::{IndirectCost, Operation, Plant, VolumeRange};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// ==========================================
// 响应 DTO
// ==========================================

/// 工厂响应 DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantDto {
    pub id: String,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Plant> for PlantDto {
    fn from(plant: Plant) -> Self {
        Self {
            id: plant.plant_id,
            name: plant.name,
            code: plant.code,
            description: plant.description,
            created_at: plant.created_at.format(TIMESTAMP_FORMAT).to_string(),
            updated_at: plant.updated_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// 工厂 + 工序明细（plant(id) 查询）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantWithOperationsDto {
    #[serde(flatten)]
    pub plant: PlantDto,
    pub operations: Vec<OperationDto>,
}

/// 工序响应 DTO（内嵌成本数组）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub plant_id: String,
    pub costs: Vec<IndirectCostDto>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Operation> for OperationDto {
    fn from(operation: Operation) -> Self {
        Self {
            id: operation.operation_id,
            name: operation.name,
            description: operation.description,
            plant_id: operation.plant_id,
            costs: operation.costs.into_iter().map(Into::into).collect(),
            created_at: operation.created_at.format(TIMESTAMP_FORMAT).to_string(),
            updated_at: operation.updated_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// 间接成本响应 DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndirectCostDto {
    pub id: String,
    pub operation_id: String,
    pub volume_range: VolumeRange,
    pub cost: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<IndirectCost> for IndirectCostDto {
    fn from(cost: IndirectCost) -> Self {
        Self {
            id: cost.cost_id,
            operation_id: cost.operation_id,
            volume_range: cost.volume_range,
            cost: cost.cost.to_string(),
            created_at: cost.created_at.format(TIMESTAMP_FORMAT).to_string(),
            updated_at: cost.updated_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// 删除响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedDto {
    pub id: String,
}

// ==========================================
// 请求 DTO
// ==========================================

/// 单个区间成本输入
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostInput {
    pub volume_range: VolumeRange,
    pub cost: f64,
}

/// 创建工序请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOperationInput {
    pub name: String,
    pub description: Option<String>,
    pub plant_id: String,
    pub costs: Option<Vec<CostInput>>,
}

/// 更新工序请求
///
/// - None 字段保持不变
/// - costs 存在时逐条 upsert，未出现的区间不删除
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOperationInput {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub costs: Option<Vec<CostInput>>,
}

/// 创建工厂请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlantInput {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
}

/// 更新工厂请求（None 字段保持不变）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlantInput {
    pub id: String,
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
}
