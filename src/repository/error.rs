// ==========================================
// 间接成本配置系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类依据: SQLite 约束失败信息 (UNIQUE / FOREIGN KEY / CHECK)
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    // ===== 约束错误 =====
    /// 如工厂代码重复
    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    /// 如工序指向不存在的工厂
    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),

    /// 如负成本、非法运量区间
    #[error("检查约束违反: {0}")]
    CheckViolation(String),

    // ===== 数据质量错误 =====
    /// 库内已存数据无法映射为领域类型
    #[error("数据损坏 (column={column}): {message}")]
    CorruptRow { column: usize, message: String },
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else if msg.contains("CHECK") {
                    RepositoryError::CheckViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::FromSqlConversionFailure(column, _, source) => {
                RepositoryError::CorruptRow {
                    column,
                    message: source.to_string(),
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::types::Type;

    #[test]
    fn test_constraint_failures_are_classified() {
        let failure = |msg: &str| {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT),
                Some(msg.to_string()),
            )
        };

        assert!(matches!(
            RepositoryError::from(failure("UNIQUE constraint failed: plant.code")),
            RepositoryError::UniqueConstraintViolation(_)
        ));
        assert!(matches!(
            RepositoryError::from(failure("FOREIGN KEY constraint failed")),
            RepositoryError::ForeignKeyViolation(_)
        ));
        assert!(matches!(
            RepositoryError::from(failure("CHECK constraint failed: cost >= 0")),
            RepositoryError::CheckViolation(_)
        ));
    }

    #[test]
    fn test_conversion_failure_is_corrupt_row() {
        let err = rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Text,
            "未知运量区间: RANGE_2T".into(),
        );
        match RepositoryError::from(err) {
            RepositoryError::CorruptRow { column, message } => {
                assert_eq!(column, 2);
                assert!(message.contains("RANGE_2T"));
            }
            other => panic!("Expected CorruptRow, got {:?}", other),
        }
    }
}
