// ==========================================
// 间接成本配置系统 - 应用层
// ==========================================
// 职责: 组装各层实例，提供演示数据写入
// ==========================================

pub mod seed;
pub mod state;

// 重导出
pub use seed::{seed_demo_data, SeedSummary};
pub use state::{get_default_db_path, AppState};
