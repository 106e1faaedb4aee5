// src/db/order_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::orders::{Order, OrderItem, OrderKind, OrderStatus, Payment, PaymentMethod, PaymentStatus},
};

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  ORDERS
    // =========================================================================

    pub async fn create_order<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        kind: OrderKind,
        client_id: Uuid,
        stay_id: Option<Uuid>,
        notes: Option<&str>,
        total: Decimal,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (tenant_id, kind, client_id, stay_id, notes, total)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(kind)
        .bind(client_id)
        .bind(stay_id)
        .bind(notes)
        .bind(total)
        .fetch_one(executor)
        .await?;

        Ok(order)
    }

    pub async fn get_order_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<Option<Order>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM orders
            WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
            FOR UPDATE
            "#,
        )
        .bind(tenant_id)
        .bind(order_id)
        .fetch_optional(executor)
        .await?;

        Ok(order)
    }

    pub async fn get_order(
        &self,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<Option<Order>, AppError> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL",
        )
        .bind(tenant_id)
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    pub async fn set_order_total<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
        total: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE orders SET total = $1, updated_at = NOW() WHERE tenant_id = $2 AND id = $3",
        )
        .bind(total)
        .bind(tenant_id)
        .bind(order_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn set_order_payment_state<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
        paid_amount: Decimal,
        payment_status: PaymentStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE orders
            SET paid_amount = $1, payment_status = $2, updated_at = NOW()
            WHERE tenant_id = $3 AND id = $4
            "#,
        )
        .bind(paid_amount)
        .bind(payment_status)
        .bind(tenant_id)
        .bind(order_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn set_order_status<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
        status: OrderStatus,
        closed_at: Option<DateTime<Utc>>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE orders
            SET status = $1, closed_at = $2, updated_at = NOW()
            WHERE tenant_id = $3 AND id = $4
            "#,
        )
        .bind(status)
        .bind(closed_at)
        .bind(tenant_id)
        .bind(order_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// O rótulo desnormalizado da mesa no pedido; muda sempre junto com
    /// o `current_order_id` da mesa, na mesma transação.
    pub async fn set_order_table_label<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
        table_label: Option<&str>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE orders
            SET table_label = $1, updated_at = NOW()
            WHERE tenant_id = $2 AND id = $3
            "#,
        )
        .bind(table_label)
        .bind(tenant_id)
        .bind(order_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn soft_delete_order<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE orders SET deleted_at = NOW() WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(order_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn list_orders(
        &self,
        tenant_id: Uuid,
        kind: Option<OrderKind>,
    ) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM orders
            WHERE tenant_id = $1
              AND ($2::order_kind IS NULL OR kind = $2)
              AND deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .bind(tenant_id)
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Visão completa para leitura: cabeçalho + linhas + pagamentos.
    pub async fn get_order_detail(
        &self,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<Option<crate::models::orders::OrderDetail>, AppError> {
        let Some(header) = self.get_order(tenant_id, order_id).await? else {
            return Ok(None);
        };
        let items = self.list_items(&self.pool, tenant_id, order_id).await?;
        let payments = self.list_payments(&self.pool, tenant_id, order_id).await?;

        Ok(Some(crate::models::orders::OrderDetail {
            header,
            items,
            payments,
        }))
    }

    // =========================================================================
    //  ORDER ITEMS
    // =========================================================================

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
        product_id: Uuid,
        quantity: i32,
        unit_price: Decimal,
        total: Decimal,
    ) -> Result<OrderItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, OrderItem>(
            r#"
            INSERT INTO order_items (tenant_id, order_id, product_id, quantity, unit_price, total)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price)
        .bind(total)
        .fetch_one(executor)
        .await?;

        Ok(item)
    }

    pub async fn find_item<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
        item_id: Uuid,
    ) -> Result<Option<OrderItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE tenant_id = $1 AND order_id = $2 AND id = $3",
        )
        .bind(tenant_id)
        .bind(order_id)
        .bind(item_id)
        .fetch_optional(executor)
        .await?;

        Ok(item)
    }

    /// Usado pela fusão de linhas (supermercado/lavanderia).
    pub async fn find_item_by_product<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<OrderItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, OrderItem>(
            "SELECT * FROM order_items WHERE tenant_id = $1 AND order_id = $2 AND product_id = $3",
        )
        .bind(tenant_id)
        .bind(order_id)
        .bind(product_id)
        .fetch_optional(executor)
        .await?;

        Ok(item)
    }

    pub async fn update_item<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        item_id: Uuid,
        quantity: i32,
        total: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE order_items SET quantity = $1, total = $2 WHERE tenant_id = $3 AND id = $4",
        )
        .bind(quantity)
        .bind(total)
        .bind(tenant_id)
        .bind(item_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Linhas são removidas fisicamente; o histórico auditável fica no
    /// pedido (soft delete) e nos pagamentos.
    pub async fn delete_item<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        item_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM order_items WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(item_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn list_items<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<Vec<OrderItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT * FROM order_items
            WHERE tenant_id = $1 AND order_id = $2
            ORDER BY created_at
            "#,
        )
        .bind(tenant_id)
        .bind(order_id)
        .fetch_all(executor)
        .await?;

        Ok(items)
    }

    pub async fn count_items<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM order_items WHERE tenant_id = $1 AND order_id = $2",
        )
        .bind(tenant_id)
        .bind(order_id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    // =========================================================================
    //  PAYMENTS (append-only)
    // =========================================================================

    pub async fn insert_payment<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Option<Uuid>,
        reservation_id: Option<Uuid>,
        amount: Decimal,
        method: PaymentMethod,
        reference: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments
                (tenant_id, order_id, reservation_id, amount, method, reference, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(order_id)
        .bind(reservation_id)
        .bind(amount)
        .bind(method)
        .bind(reference)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    pub async fn list_payments<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<Vec<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT * FROM payments
            WHERE tenant_id = $1 AND order_id = $2
            ORDER BY created_at
            "#,
        )
        .bind(tenant_id)
        .bind(order_id)
        .fetch_all(executor)
        .await?;

        Ok(payments)
    }
}
