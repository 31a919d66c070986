// ==========================================
// 间接成本配置系统 - API层错误类型
// ==========================================
// 职责: 将仓储错误归并为调用方可区分的几类
// 约束冲突 → BusinessRuleViolation / InvalidInput
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("存储数据损坏: {0}")]
    DataCorrupted(String),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::CheckViolation(msg) => ApiError::InvalidInput(msg),
            RepositoryError::CorruptRow { column, message } => {
                ApiError::DataCorrupted(format!("第{}列: {}", column, message))
            }
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "Operation".to_string(),
            id: "op-1".to_string(),
        };
        match ApiError::from(repo_err) {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Operation"));
                assert!(msg.contains("op-1"));
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }

        let api_err = ApiError::from(RepositoryError::UniqueConstraintViolation(
            "plant.code".to_string(),
        ));
        assert!(matches!(api_err, ApiError::BusinessRuleViolation(_)));

        let api_err = ApiError::from(RepositoryError::CheckViolation("cost >= 0".to_string()));
        assert!(matches!(api_err, ApiError::InvalidInput(_)));
    }
}
