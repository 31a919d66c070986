// ==========================================
// 间接成本配置系统 - 应用状态
// ==========================================
// 职责: 打开共享连接，组装 Repository / API / 网关
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{InputValidator, OperationApi, PlantApi};
use crate::config::{ConfigManager, ValidationLimits};
use crate::db::{ensure_schema_version, open_sqlite_connection, SchemaStatus};
use crate::editor::{CostEditor, LocalGateway};
use crate::repository::{IndirectCostRepository, OperationRepository, PlantRepository};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 工厂API
    pub plant_api: Arc<PlantApi>,

    /// 工序API
    pub operation_api: Arc<OperationApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 启动时读取的校验上下限
    pub limits: ValidationLimits,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（":memory:" 可用于测试）
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    ///
    /// # 说明
    /// 按外键依赖顺序建表: plant → operation → indirect_cost
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接）
        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        match ensure_schema_version(&conn) {
            Ok(SchemaStatus::Current) => {}
            Ok(SchemaStatus::Newer(version)) => {
                tracing::warn!(version, "数据库由更新版本的程序创建，继续启动")
            }
            Err(e) => tracing::warn!("schema_version 写入失败(将继续启动): {}", e),
        }
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let plant_repo = Arc::new(
            PlantRepository::new(conn.clone())
                .map_err(|e| format!("无法创建PlantRepository: {}", e))?,
        );
        let operation_repo = Arc::new(
            OperationRepository::new(conn.clone())
                .map_err(|e| format!("无法创建OperationRepository: {}", e))?,
        );
        IndirectCostRepository::new(conn.clone())
            .map_err(|e| format!("无法创建IndirectCostRepository: {}", e))?;

        // 配置管理器
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let limits = config_manager
            .get_validation_limits()
            .map_err(|e| format!("无法读取校验配置: {}", e))?;
        let validator = InputValidator::new(limits);

        // ==========================================
        // 初始化API层
        // ==========================================
        let plant_api = Arc::new(PlantApi::new(
            plant_repo.clone(),
            operation_repo.clone(),
            validator,
        ));
        let operation_api = Arc::new(OperationApi::new(operation_repo, plant_repo, validator));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            plant_api,
            operation_api,
            config_manager,
            limits,
        })
    }

    /// 进程内网关
    pub fn gateway(&self) -> Arc<LocalGateway> {
        Arc::new(LocalGateway::new(
            self.plant_api.clone(),
            self.operation_api.clone(),
        ))
    }

    /// 基于进程内网关创建编辑器
    pub fn editor(&self) -> CostEditor {
        CostEditor::new(self.gateway())
    }
}

/// 默认数据库路径
///
/// 优先级: INDIRECT_COSTS_DB 环境变量 → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("INDIRECT_COSTS_DB") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./indirect_costs.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("indirect-costs");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("indirect_costs.db");
        }
    }

    path.to_string_lossy().to_string()
}
