// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层/编辑器集成测试的通用环境
// ==========================================

#[path = "../test_helpers.rs"]
mod test_helpers;

use tempfile::NamedTempFile;

use indirect_costs::api::{CostInput, CreateOperationInput, CreatePlantInput, OperationDto, PlantDto};
use indirect_costs::app::AppState;
use indirect_costs::domain::VolumeRange;
use indirect_costs::editor::CostEditor;

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 基于临时数据库文件的完整 AppState
pub struct ApiTestEnv {
    pub db_path: String,
    pub state: AppState,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 创建新的API测试环境
    pub fn new() -> Result<Self, String> {
        let (temp_file, db_path) = test_helpers::create_test_db()
            .map_err(|e| format!("创建测试数据库失败: {}", e))?;
        let state = AppState::new(db_path.clone())?;

        Ok(Self {
            db_path,
            state,
            _temp_file: temp_file,
        })
    }

    /// 创建工厂
    pub fn create_plant(&self, name: &str, code: &str) -> PlantDto {
        self.state
            .plant_api
            .create_plant(CreatePlantInput {
                name: name.to_string(),
                code: code.to_string(),
                description: None,
            })
            .expect("创建工厂失败")
    }

    /// 创建工序（8 个区间统一成本）
    pub fn create_operation(&self, plant_id: &str, name: &str, cost: f64) -> OperationDto {
        self.state
            .operation_api
            .create_operation(CreateOperationInput {
                name: name.to_string(),
                description: None,
                plant_id: plant_id.to_string(),
                costs: Some(uniform_costs(cost)),
            })
            .expect("创建工序失败")
    }

    /// 基于进程内网关的编辑器
    pub fn editor(&self) -> CostEditor {
        self.state.editor()
    }

    pub fn open_connection(&self) -> rusqlite::Connection {
        test_helpers::open_test_connection(&self.db_path).expect("无法打开测试数据库")
    }

    pub fn count_rows(&self, table: &str) -> i64 {
        test_helpers::count_rows(&self.open_connection(), table).expect("统计失败")
    }
}

/// 8 个区间统一成本
pub fn uniform_costs(cost: f64) -> Vec<CostInput> {
    VolumeRange::ALL
        .iter()
        .map(|range| CostInput {
            volume_range: *range,
            cost,
        })
        .collect()
}

/// 从工序 DTO 取某区间成本（缺失为 None）
pub fn wire_cost(operation: &OperationDto, range: VolumeRange) -> Option<f64> {
    operation
        .costs
        .iter()
        .find(|c| c.volume_range == range)
        .and_then(|c| c.cost.parse::<f64>().ok())
}
