// ==========================================
// 间接成本配置系统 - 工厂领域模型
// ==========================================
// 对齐: plant 表
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Plant - 工厂 / 厂区
// ==========================================
// 通过外键拥有 0..n 个工序 (Operation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub plant_id: String,            // 工厂ID (UUID)
    pub name: String,                // 名称
    pub code: String,                // 简码 (如 PLN)
    pub description: Option<String>, // 描述
    pub created_at: NaiveDateTime,   // 创建时间
    pub updated_at: NaiveDateTime,   // 更新时间
}

impl Plant {
    /// 创建新的工厂实体（自动生成 UUID 和时间戳）
    pub fn new(name: String, code: String, description: Option<String>) -> Self {
        let now = chrono::Local::now().naive_local();
        Self {
            plant_id: uuid::Uuid::new_v4().to_string(),
            name,
            code,
            description,
            created_at: now,
            updated_at: now,
        }
    }
}
