// SPDX-License-Identifier: Apache-2.0

use crate::{decode_ts, encode_ts, Store, StoreError};
use chrono::Utc;
use lumina_model::{LineItem, Order, OrderId, OrderStatus, UserId};
use rusqlite::{params, OptionalExtension, Row};

const ORDER_COLUMNS: &str = "id, user_id, items, total, status, payment_intent, created_at";

fn order_from_row(row: &Row<'_>) -> Result<Order, StoreError> {
    let id: String = row.get(0).map_err(StoreError::from)?;
    let user: String = row.get(1).map_err(StoreError::from)?;
    let items: String = row.get(2).map_err(StoreError::from)?;
    let status: String = row.get(4).map_err(StoreError::from)?;
    let created_at: String = row.get(6).map_err(StoreError::from)?;
    let items: Vec<LineItem> = serde_json::from_str(&items)
        .map_err(|e| StoreError::Corrupt(format!("order items: {e}")))?;
    Ok(Order {
        id: OrderId::parse(&id).map_err(|e| StoreError::Corrupt(e.to_string()))?,
        user: UserId::parse(&user).map_err(|e| StoreError::Corrupt(e.to_string()))?,
        items,
        total: row.get(3).map_err(StoreError::from)?,
        status: OrderStatus::parse(&status).map_err(|e| StoreError::Corrupt(e.to_string()))?,
        payment_intent: row.get(5).map_err(StoreError::from)?,
        created_at: decode_ts(&created_at)?,
    })
}

impl Store {
    /// Creates an order in `Pending`. Line items are captured verbatim as a
    /// document column; the total is the caller's figure, not recomputed.
    pub async fn create_order(
        &self,
        user: UserId,
        items: Vec<LineItem>,
        total: f64,
    ) -> Result<Order, StoreError> {
        self.with_conn(move |conn| {
            let order = Order {
                id: OrderId::new(),
                user,
                items,
                total,
                status: OrderStatus::Pending,
                payment_intent: None,
                created_at: Utc::now(),
            };
            let items_doc = serde_json::to_string(&order.items)
                .map_err(|e| StoreError::Corrupt(format!("order items: {e}")))?;
            conn.execute(
                "INSERT INTO orders(id, user_id, items, total, status, payment_intent, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6)",
                params![
                    order.id.to_string(),
                    order.user.to_string(),
                    items_doc,
                    order.total,
                    order.status.as_str(),
                    encode_ts(order.created_at),
                ],
            )?;
            Ok(order)
        })
        .await
    }

    pub async fn set_payment_intent(
        &self,
        order: OrderId,
        intent_id: String,
    ) -> Result<(), StoreError> {
        self.with_conn(move |conn| {
            conn.execute(
                "UPDATE orders SET payment_intent = ?2 WHERE id = ?1",
                params![order.to_string(), intent_id],
            )?;
            Ok(())
        })
        .await
    }

    pub async fn order_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        self.with_conn(move |conn| {
            conn.query_row(
                &format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"),
                params![id.to_string()],
                |row| Ok(order_from_row(row)),
            )
            .optional()?
            .transpose()
        })
        .await
    }

    pub async fn orders_for_user(&self, user: UserId) -> Result<Vec<Order>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt.query_map(params![user.to_string()], |row| Ok(order_from_row(row)))?;
            let mut orders = Vec::new();
            for row in rows {
                orders.push(row??);
            }
            Ok(orders)
        })
        .await
    }

    /// Guarded in-place status transition. Only flips the row when it is
    /// still in `from`; reports whether the transition happened.
    pub async fn transition_order(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, StoreError> {
        self.with_conn(move |conn| {
            let changed = conn.execute(
                "UPDATE orders SET status = ?3 WHERE id = ?1 AND status = ?2",
                params![id.to_string(), from.as_str(), to.as_str()],
            )?;
            Ok(changed > 0)
        })
        .await
    }
}
