// ==========================================
// 生产订单跟踪系统 - 生产订单数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 并发: 读-改-写在同一个 IMMEDIATE 事务内完成
// ==========================================

use crate::clock::format_date;
use crate::domain::order::ProductionOrder;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row, TransactionBehavior};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = "SELECT id, total, produzidas, finalizada, data_finalizacao FROM ordem_producao";

// ==========================================
// ProductionOrderRepository - 生产订单仓储
// ==========================================
/// 生产订单仓储
/// 职责: 管理 ordem_producao 表的读写
pub struct ProductionOrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductionOrderRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入新订单，返回带存储分配 id 的订单
    pub fn insert(&self, order: &ProductionOrder) -> RepositoryResult<ProductionOrder> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO ordem_producao (total, produzidas, finalizada, data_finalizacao)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                order.target,
                order.produced,
                order.completed,
                order.completion_date.map(format_date),
            ],
        )?;

        Ok(ProductionOrder {
            id: conn.last_insert_rowid(),
            ..order.clone()
        })
    }

    /// 按主键查询
    ///
    /// # 返回
    /// - Ok(Some(ProductionOrder)): 找到订单
    /// - Ok(None): 未找到
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ProductionOrder>> {
        let conn = self.get_conn()?;
        let order = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                map_order_row,
            )
            .optional()?;
        Ok(order)
    }

    /// 查询全部订单（按 id 升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<ProductionOrder>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY id ASC", SELECT_COLUMNS))?;
        let orders = stmt
            .query_map([], map_order_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(orders)
    }

    /// 查询指定完工日期的订单（字符串精确匹配 YYYY-MM-DD）
    pub fn find_by_completion_date(&self, date: NaiveDate) -> RepositoryResult<Vec<ProductionOrder>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE data_finalizacao = ?1 ORDER BY id ASC",
            SELECT_COLUMNS
        ))?;
        let orders = stmt
            .query_map(params![format_date(date)], map_order_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(orders)
    }

    /// 已完工订单数
    pub fn count_completed(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM ordem_producao WHERE finalizada = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// 全部订单已产件数之和
    pub fn sum_produced(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let total = conn.query_row(
            "SELECT COALESCE(SUM(produzidas), 0) FROM ordem_producao",
            [],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// 在单个事务内读取、修改并写回一条订单
    ///
    /// # 参数
    /// - `id`: 订单ID
    /// - `mutate`: 修改闭包，返回 true 表示需要写回
    ///
    /// # 返回
    /// - Ok(Some((order, written))): 修改后的订单及是否写回
    /// - Ok(None): 订单不存在（事务回滚，无副作用）
    ///
    /// # 说明
    /// IMMEDIATE 事务在读取前即持有写锁，
    /// 同一订单的并发修改不会出现丢失更新。
    pub fn update_with<F>(&self, id: i64, mutate: F) -> RepositoryResult<Option<(ProductionOrder, bool)>>
    where
        F: FnOnce(&mut ProductionOrder) -> bool,
    {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let current = tx
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id],
                map_order_row,
            )
            .optional()?;

        let mut order = match current {
            Some(order) => order,
            None => return Ok(None),
        };

        let written = mutate(&mut order);
        if written {
            tx.execute(
                r#"
                UPDATE ordem_producao
                SET produzidas = ?1, finalizada = ?2, data_finalizacao = ?3
                WHERE id = ?4
                "#,
                params![
                    order.produced,
                    order.completed,
                    order.completion_date.map(format_date),
                    order.id,
                ],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(Some((order, written)))
    }
}

fn map_order_row(row: &Row<'_>) -> SqliteResult<ProductionOrder> {
    Ok(ProductionOrder {
        id: row.get(0)?,
        target: row.get(1)?,
        produced: row.get(2)?,
        completed: row.get(3)?,
        completion_date: row.get::<_, Option<NaiveDate>>(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn setup() -> ProductionOrderRepository {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ProductionOrderRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn test_insert_分配递增id() {
        let repo = setup();
        let a = repo.insert(&ProductionOrder::new(3)).unwrap();
        let b = repo.insert(&ProductionOrder::new(4)).unwrap();

        assert!(a.id > 0);
        assert!(b.id > a.id);
        assert_eq!(repo.find_by_id(b.id).unwrap(), Some(b));
    }

    #[test]
    fn test_find_by_id_不存在() {
        let repo = setup();
        assert_eq!(repo.find_by_id(42).unwrap(), None);
    }

    #[test]
    fn test_update_with_不存在不写入() {
        let repo = setup();
        let result = repo.update_with(7, |_| true).unwrap();
        assert!(result.is_none());
        assert!(repo.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_update_with_写回与日期查询() {
        let repo = setup();
        let order = repo.insert(&ProductionOrder::new(5)).unwrap();
        repo.insert(&ProductionOrder::new(6)).unwrap();

        let (updated, written) = repo
            .update_with(order.id, |o| {
                o.produced = 2;
                o.completed = true;
                o.completion_date = Some(day(14));
                true
            })
            .unwrap()
            .unwrap();
        assert!(written);
        assert_eq!(updated.produced, 2);

        let stored = repo.find_by_id(order.id).unwrap().unwrap();
        assert_eq!(stored, updated);

        assert_eq!(repo.find_by_completion_date(day(14)).unwrap().len(), 1);
        assert!(repo.find_by_completion_date(day(13)).unwrap().is_empty());
        assert_eq!(repo.count_completed().unwrap(), 1);
        assert_eq!(repo.sum_produced().unwrap(), 2);
    }

    #[test]
    fn test_update_with_闭包返回false不写回() {
        let repo = setup();
        let order = repo.insert(&ProductionOrder::new(5)).unwrap();

        let (_, written) = repo
            .update_with(order.id, |o| {
                o.produced = 99;
                false
            })
            .unwrap()
            .unwrap();
        assert!(!written);
        assert_eq!(repo.find_by_id(order.id).unwrap().unwrap().produced, 0);
    }

    #[test]
    fn test_sum_produced_空表为0() {
        let repo = setup();
        assert_eq!(repo.sum_produced().unwrap(), 0);
        assert_eq!(repo.count_completed().unwrap(), 0);
    }
}
