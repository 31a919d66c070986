// ==========================================
// 间接成本配置系统 - 配置层
// ==========================================
// 职责: 系统配置管理 (校验上下限等)
// 存储: config_kv 表
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, ValidationLimits};
