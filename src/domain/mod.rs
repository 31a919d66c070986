// ==========================================
// 间接成本配置系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑
// ==========================================

pub mod operation;
pub mod plant;
pub mod types;

// 重导出核心类型
pub use operation::{IndirectCost, Operation};
pub use plant::Plant;
pub use types::{CostsByRange, VolumeRange};
