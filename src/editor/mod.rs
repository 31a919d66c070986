// ==========================================
// 间接成本配置系统 - 编辑器 (客户端对账核心)
// ==========================================
// 职责: 维护快照/工作副本/待新增/待删除，计算改动并批量保存
// 依赖: 只通过 CostGateway 访问 API 层
// ==========================================

pub mod cache;
pub mod cost_editor;
pub mod error;
pub mod gateway;
pub mod input;
pub mod model;
pub mod state;

pub use cache::EntityCache;
pub use cost_editor::{CostEditor, EditorStatus};
pub use error::{EditorError, EditorResult, GatewayError, GatewayResult};
pub use gateway::{CostGateway, LocalGateway};
pub use input::{parse_cost_input, validate_new_operation_name, NameValidationError};
pub use model::{CostKey, EditableCost, EditableOperation, LocalId, OperationKey};
pub use state::{EditorState, SavePlan};
