// ==========================================
// 间接成本配置系统 - 编辑器错误类型
// ==========================================
// GatewayError: 编辑器看到的 API 调用失败 (未找到 / 被拒绝 / 传输 / 解码)
// EditorError: 编辑器自身的错误 (未选工厂、未知工序、网关失败)
// ==========================================

use thiserror::Error;

use crate::api::error::ApiError;

/// 网关错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 服务端校验或业务规则拒绝
    #[error("请求被拒绝: {0}")]
    Rejected(String),

    /// 连接/存储层失败
    #[error("调用失败: {0}")]
    Transport(String),

    #[error("响应解析失败: {0}")]
    Decode(String),
}

impl From<ApiError> for GatewayError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound(msg) => GatewayError::NotFound(msg),
            ApiError::InvalidInput(msg) | ApiError::BusinessRuleViolation(msg) => {
                GatewayError::Rejected(msg)
            }
            ApiError::DatabaseError(msg) => GatewayError::Transport(msg),
            ApiError::DataCorrupted(msg) => GatewayError::Decode(msg),
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// 编辑器错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("尚未选择工厂")]
    NoPlantSelected,

    #[error("工序不存在: {0}")]
    UnknownOperation(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub type EditorResult<T> = Result<T, EditorError>;
