// ==========================================
// 间接成本配置系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    /// 服务端工序名称最大长度
    pub const OPERATION_NAME_MAX_LEN: &str = "operation.name.max_len";
    /// 前端新增工序名称最小长度（trim 后）
    pub const OPERATION_NAME_CLIENT_MIN_LEN: &str = "operation.name.client_min_len";
    /// 前端新增工序名称最大长度（trim 后）
    pub const OPERATION_NAME_CLIENT_MAX_LEN: &str = "operation.name.client_max_len";
    pub const PLANT_NAME_MAX_LEN: &str = "plant.name.max_len";
    pub const PLANT_CODE_MAX_LEN: &str = "plant.code.max_len";
    pub const DESCRIPTION_MAX_LEN: &str = "description.max_len";
}

// ==========================================
// ValidationLimits - 校验上下限
// ==========================================
// 注意: 服务端 100 与前端 255 的名称上限不一致，两者分别配置，不做合并
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationLimits {
    pub operation_name_max_len: usize,
    pub operation_name_client_min_len: usize,
    pub operation_name_client_max_len: usize,
    pub plant_name_max_len: usize,
    pub plant_code_max_len: usize,
    pub description_max_len: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            operation_name_max_len: 100,
            operation_name_client_min_len: 2,
            operation_name_client_max_len: 255,
            plant_name_max_len: 100,
            plant_code_max_len: 10,
            description_max_len: 500,
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 从已有连接创建 ConfigManager（会确保 config_kv 表存在）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        let manager = Self { conn };
        manager.ensure_table()?;
        Ok(manager)
    }

    fn ensure_table(&self) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS config_kv (
                scope_id TEXT NOT NULL DEFAULT 'global',
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (scope_id, key)
            );
            "#,
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 的配置值（upsert）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(key, value, "配置已更新");
        Ok(())
    }

    /// 列出 global scope 的全部配置（按键排序）
    pub fn list_configs(&self) -> Result<Vec<(String, String)>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// 读取正整数配置；缺失或格式错误时使用默认值
    fn get_usize_or_default(&self, key: &str, default: usize) -> Result<usize, Box<dyn Error>> {
        match self.get_config_value(key)? {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(v) if v > 0 => Ok(v),
                _ => {
                    tracing::warn!(key, raw = %raw, default, "配置值无效，使用默认值");
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }

    /// 获取校验上下限
    pub fn get_validation_limits(&self) -> Result<ValidationLimits, Box<dyn Error>> {
        let defaults = ValidationLimits::default();
        Ok(ValidationLimits {
            operation_name_max_len: self.get_usize_or_default(
                config_keys::OPERATION_NAME_MAX_LEN,
                defaults.operation_name_max_len,
            )?,
            operation_name_client_min_len: self.get_usize_or_default(
                config_keys::OPERATION_NAME_CLIENT_MIN_LEN,
                defaults.operation_name_client_min_len,
            )?,
            operation_name_client_max_len: self.get_usize_or_default(
                config_keys::OPERATION_NAME_CLIENT_MAX_LEN,
                defaults.operation_name_client_max_len,
            )?,
            plant_name_max_len: self
                .get_usize_or_default(config_keys::PLANT_NAME_MAX_LEN, defaults.plant_name_max_len)?,
            plant_code_max_len: self
                .get_usize_or_default(config_keys::PLANT_CODE_MAX_LEN, defaults.plant_code_max_len)?,
            description_max_len: self.get_usize_or_default(
                config_keys::DESCRIPTION_MAX_LEN,
                defaults.description_max_len,
            )?,
        })
    }
}
