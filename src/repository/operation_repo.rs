// ==========================================
// 间接成本配置系统 - 工序仓储
// ==========================================
// 职责: 管理 operation 表，读取时携带其 indirect_cost 明细
// 说明: 工序 + 成本的写入在同一事务内完成
// ==========================================

use crate::domain::{IndirectCost, Operation};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::indirect_cost_repo::{
    query_costs_for_operation, query_costs_for_plant, upsert_cost,
};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub struct OperationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OperationRepository {
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
            CREATE TABLE IF NOT EXISTS operation (
              operation_id TEXT PRIMARY KEY,
              plant_id TEXT NOT NULL REFERENCES plant(plant_id) ON DELETE CASCADE,
              name TEXT NOT NULL,
              description TEXT,
              created_at TEXT NOT NULL,
              updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_operation_plant ON operation(plant_id);
            CREATE INDEX IF NOT EXISTS idx_operation_name ON operation(name);
            "#,
        )?;
        Ok(())
    }

    /// 插入工序及其初始成本（事务）
    pub fn insert_with_costs(&self, operation: &Operation) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            r#"
            INSERT INTO operation (operation_id, plant_id, name, description, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                operation.operation_id,
                operation.plant_id,
                operation.name,
                operation.description,
                operation.created_at,
                operation.updated_at,
            ],
        )?;

        for cost in &operation.costs {
            upsert_cost(&tx, cost)?;
        }

        tx.commit()?;
        Ok(())
    }

    /// 更新工序主数据并 upsert 成本（事务）
    ///
    /// # 说明
    /// - costs 为全量替换语义中的“写入集合”：逐条 upsert，不删除未出现的区间
    /// - 返回 operation 表受影响行数（0 表示工序不存在）
    pub fn update_with_costs(
        &self,
        operation: &Operation,
        costs: &[IndirectCost],
    ) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let affected = tx.execute(
            r#"
            UPDATE operation
            SET name = ?2,
                description = ?3,
                updated_at = ?4
            WHERE operation_id = ?1
            "#,
            params![
                operation.operation_id,
                operation.name,
                operation.description,
                operation.updated_at,
            ],
        )?;

        if affected == 0 {
            // 工序不存在时不写成本，直接回滚
            return Ok(0);
        }

        for cost in costs {
            upsert_cost(&tx, cost)?;
        }

        tx.commit()?;
        Ok(affected)
    }

    pub fn find_by_id(&self, operation_id: &str) -> RepositoryResult<Option<Operation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT operation_id, plant_id, name, description, created_at, updated_at
            FROM operation
            WHERE operation_id = ?1
            "#,
        )?;

        let mut operation = match stmt.query_row(params![operation_id], map_row) {
            Ok(v) => v,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        operation.costs = query_costs_for_operation(&conn, operation_id)?;
        Ok(Some(operation))
    }

    /// 列出某工厂的工序（按名称排序，携带成本）
    pub fn list_by_plant(&self, plant_id: &str) -> RepositoryResult<Vec<Operation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT operation_id, plant_id, name, description, created_at, updated_at
            FROM operation
            WHERE plant_id = ?1
            ORDER BY name ASC
            "#,
        )?;

        let operations = stmt
            .query_map(params![plant_id], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        let costs = query_costs_for_plant(&conn, plant_id)?;

        Ok(attach_costs(operations, costs))
    }

    /// 列出全部工序（按名称排序，携带成本）
    pub fn list_all(&self) -> RepositoryResult<Vec<Operation>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT operation_id, plant_id, name, description, created_at, updated_at
            FROM operation
            ORDER BY name ASC
            "#,
        )?;

        let operations = stmt
            .query_map([], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        let mut with_costs = Vec::with_capacity(operations.len());
        for mut operation in operations {
            operation.costs = query_costs_for_operation(&conn, &operation.operation_id)?;
            with_costs.push(operation);
        }
        Ok(with_costs)
    }

    /// 删除工序（成本由外键级联删除）
    pub fn delete(&self, operation_id: &str) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM operation WHERE operation_id = ?1",
            params![operation_id],
        )?;
        Ok(affected)
    }
}

fn attach_costs(operations: Vec<Operation>, costs: Vec<IndirectCost>) -> Vec<Operation> {
    let mut by_operation: HashMap<String, Vec<IndirectCost>> = HashMap::new();
    for cost in costs {
        by_operation
            .entry(cost.operation_id.clone())
            .or_default()
            .push(cost);
    }

    operations
        .into_iter()
        .map(|mut operation| {
            operation.costs = by_operation
                .remove(&operation.operation_id)
                .unwrap_or_default();
            operation
        })
        .collect()
}

fn map_row(row: &Row<'_>) -> SqliteResult<Operation> {
    Ok(Operation {
        operation_id: row.get(0)?,
        plant_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        costs: Vec::new(),
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
