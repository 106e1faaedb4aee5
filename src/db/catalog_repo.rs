// src/db/catalog_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{Client, Product, ProductCategory, Tenant},
};
use rust_decimal::Decimal;

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  TENANTS
    // =========================================================================

    pub async fn create_tenant<'e, E>(&self, executor: E, name: &str) -> Result<Tenant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(executor)
        .await?;

        Ok(tenant)
    }

    // =========================================================================
    //  CLIENTS (hóspedes)
    // =========================================================================

    pub async fn create_client<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        full_name: &str,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (tenant_id, full_name, email, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(full_name)
        .bind(email)
        .bind(phone)
        .fetch_one(executor)
        .await?;

        Ok(client)
    }

    pub async fn get_client<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        client_id: Uuid,
    ) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE tenant_id = $1 AND id = $2 AND is_active IS NOT FALSE",
        )
        .bind(tenant_id)
        .bind(client_id)
        .fetch_optional(executor)
        .await?;

        Ok(client)
    }

    pub async fn list_clients(&self, tenant_id: Uuid) -> Result<Vec<Client>, AppError> {
        let clients = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients WHERE tenant_id = $1 ORDER BY full_name",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }

    // =========================================================================
    //  PRODUCTS
    // =========================================================================

    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        name: &str,
        category: ProductCategory,
        price: Decimal,
        stock: i32,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (tenant_id, name, category, price, stock)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(category)
        .bind(price)
        .bind(stock)
        .fetch_one(executor)
        .await?;

        Ok(product)
    }

    /// Trava a linha do produto até o commit. Todo ajuste de estoque passa
    /// por aqui primeiro, para duas vendas concorrentes não lerem o mesmo
    /// saldo.
    pub async fn get_product_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE tenant_id = $1 AND id = $2 AND is_active IS NOT FALSE
            FOR UPDATE
            "#,
        )
        .bind(tenant_id)
        .bind(product_id)
        .fetch_optional(executor)
        .await?;

        Ok(product)
    }

    /// Delta positivo devolve estoque, negativo consome. O CHECK de
    /// stock >= 0 no banco é a última linha de defesa; o service valida
    /// antes para devolver um erro de domínio em vez de 500.
    pub async fn adjust_stock<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        product_id: Uuid,
        delta: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE products
            SET stock = stock + $1
            WHERE tenant_id = $2 AND id = $3
            "#,
        )
        .bind(delta)
        .bind(tenant_id)
        .bind(product_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn list_products(
        &self,
        tenant_id: Uuid,
        category: Option<ProductCategory>,
    ) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE tenant_id = $1
              AND ($2::product_category IS NULL OR category = $2)
            ORDER BY name
            "#,
        )
        .bind(tenant_id)
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}
