// ==========================================
// 间接成本配置系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 工厂工序 × 运量区间 的间接成本维护
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 编辑器 - 客户端对账核心
pub mod editor;

// 应用层 - 组装与演示数据
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{CostsByRange, IndirectCost, Operation, Plant, VolumeRange};

// API
pub use api::{ApiError, ApiResult, OperationApi, PlantApi};

// 编辑器
pub use editor::{CostEditor, CostGateway, EditorError, LocalGateway, OperationKey};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "间接成本配置系统";
