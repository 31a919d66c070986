// ==========================================
// 间接成本配置系统 - 工厂仓储
// ==========================================
// 职责: 管理 plant 表
// 说明: 删除工厂时级联删除其工序及成本 (ON DELETE CASCADE)
// ==========================================

use crate::domain::Plant;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

pub struct PlantRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PlantRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 确保表存在（如果不存在则创建）
    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS plant (
              plant_id TEXT PRIMARY KEY,
              name TEXT NOT NULL,
              code TEXT NOT NULL UNIQUE,
              description TEXT,
              created_at TEXT NOT NULL,
              updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_plant_name ON plant(name);
            "#,
        )?;
        Ok(())
    }

    pub fn insert(&self, plant: &Plant) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO plant (plant_id, name, code, description, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                plant.plant_id,
                plant.name,
                plant.code,
                plant.description,
                plant.created_at,
                plant.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn find_by_id(&self, plant_id: &str) -> RepositoryResult<Option<Plant>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT plant_id, name, code, description, created_at, updated_at
            FROM plant
            WHERE plant_id = ?1
            "#,
        )?;

        match stmt.query_row(params![plant_id], map_row) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 按简码查找（CLI 允许用简码选择工厂）
    pub fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Plant>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT plant_id, name, code, description, created_at, updated_at
            FROM plant
            WHERE code = ?1
            "#,
        )?;

        match stmt.query_row(params![code], map_row) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 列出所有工厂（按名称排序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Plant>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT plant_id, name, code, description, created_at, updated_at
            FROM plant
            ORDER BY name ASC
            "#,
        )?;

        let rows = stmt
            .query_map([], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 覆盖更新（返回受影响行数）
    pub fn update(&self, plant: &Plant) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE plant
            SET name = ?2,
                code = ?3,
                description = ?4,
                updated_at = ?5
            WHERE plant_id = ?1
            "#,
            params![
                plant.plant_id,
                plant.name,
                plant.code,
                plant.description,
                plant.updated_at,
            ],
        )?;
        Ok(affected)
    }

    pub fn delete(&self, plant_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM plant WHERE plant_id = ?1", params![plant_id])?;
        Ok(affected)
    }
}

fn map_row(row: &Row<'_>) -> SqliteResult<Plant> {
    Ok(Plant {
        plant_id: row.get(0)?,
        name: row.get(1)?,
        code: row.get(2)?,
        description: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
