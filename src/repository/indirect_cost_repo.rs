// ==========================================
// 间接成本配置系统 - 间接成本仓储
// ==========================================
// 职责: 管理 indirect_cost 表
// 约束: UNIQUE(operation_id, volume_range)，写入一律 upsert
// 说明: 行级函数接收 &Connection，便于在工序仓储的事务内复用
// ==========================================

use crate::domain::{IndirectCost, VolumeRange};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

pub struct IndirectCostRepository {
    conn: Arc<Mutex<Connection>>,
}

impl IndirectCostRepository {
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
            CREATE TABLE IF NOT EXISTS indirect_cost (
              cost_id TEXT PRIMARY KEY,
              operation_id TEXT NOT NULL REFERENCES operation(operation_id) ON DELETE CASCADE,
              volume_range TEXT NOT NULL CHECK(volume_range IN (
                'RANGE_300KG', 'RANGE_500KG', 'RANGE_1T', 'RANGE_3T',
                'RANGE_5T', 'RANGE_10T', 'RANGE_20T', 'RANGE_30T'
              )),
              cost REAL NOT NULL CHECK(cost >= 0),
              created_at TEXT NOT NULL,
              updated_at TEXT NOT NULL,
              UNIQUE(operation_id, volume_range)
            );

            CREATE INDEX IF NOT EXISTS idx_indirect_cost_operation
              ON indirect_cost(operation_id);
            "#,
        )?;
        Ok(())
    }
}

// 测试用的单表读写（生产路径经由 OperationRepository 的事务）
#[cfg(test)]
impl IndirectCostRepository {
    /// 创建或更新单条成本（按 operation_id + volume_range）
    pub fn upsert(&self, cost: &IndirectCost) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        upsert_cost(&conn, cost)?;
        Ok(())
    }

    /// 查询某工序的全部成本（按区间顺序）
    pub fn list_by_operation(&self, operation_id: &str) -> RepositoryResult<Vec<IndirectCost>> {
        let conn = self.get_conn()?;
        Ok(query_costs_for_operation(&conn, operation_id)?)
    }

    /// 按 (工序, 区间) 查找
    pub fn find_by_key(
        &self,
        operation_id: &str,
        volume_range: VolumeRange,
    ) -> RepositoryResult<Option<IndirectCost>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT cost_id, operation_id, volume_range, cost, created_at, updated_at
            FROM indirect_cost
            WHERE operation_id = ?1 AND volume_range = ?2
            "#,
        )?;

        match stmt.query_row(params![operation_id, volume_range.as_str()], map_row) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

// ==========================================
// 行级函数（可在事务内调用）
// ==========================================

/// upsert 单条成本；冲突时只更新 cost / updated_at，保留原 cost_id
pub(crate) fn upsert_cost(conn: &Connection, cost: &IndirectCost) -> SqliteResult<usize> {
    conn.execute(
        r#"
        INSERT INTO indirect_cost (
            cost_id, operation_id, volume_range, cost, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(operation_id, volume_range) DO UPDATE SET
            cost = excluded.cost,
            updated_at = excluded.updated_at
        "#,
        params![
            cost.cost_id,
            cost.operation_id,
            cost.volume_range.as_str(),
            cost.cost,
            cost.created_at,
            cost.updated_at,
        ],
    )
}

pub(crate) fn query_costs_for_operation(
    conn: &Connection,
    operation_id: &str,
) -> SqliteResult<Vec<IndirectCost>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT cost_id, operation_id, volume_range, cost, created_at, updated_at
        FROM indirect_cost
        WHERE operation_id = ?1
        "#,
    )?;

    let mut rows = stmt
        .query_map(params![operation_id], map_row)?
        .collect::<SqliteResult<Vec<_>>>()?;
    rows.sort_by_key(|c| c.volume_range);
    Ok(rows)
}

/// 一次查出某工厂下所有工序的成本（避免 N+1）
pub(crate) fn query_costs_for_plant(
    conn: &Connection,
    plant_id: &str,
) -> SqliteResult<Vec<IndirectCost>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT c.cost_id, c.operation_id, c.volume_range, c.cost, c.created_at, c.updated_at
        FROM indirect_cost c
        JOIN operation o ON o.operation_id = c.operation_id
        WHERE o.plant_id = ?1
        "#,
    )?;

    let mut rows = stmt
        .query_map(params![plant_id], map_row)?
        .collect::<SqliteResult<Vec<_>>>()?;
    rows.sort_by_key(|c| c.volume_range);
    Ok(rows)
}

fn map_row(row: &Row<'_>) -> SqliteResult<IndirectCost> {
    let raw_range: String = row.get(2)?;
    let volume_range = VolumeRange::parse(&raw_range).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Text,
            format!("未知运量区间: {}", raw_range).into(),
        )
    })?;

    Ok(IndirectCost {
        cost_id: row.get(0)?,
        operation_id: row.get(1)?,
        volume_range,
        cost: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
