// src/db/resource_repo.rs
//
// Recursos físicos (quartos, instalações, mesas). Os métodos *_for_update
// existem porque toda decisão de alocação precisa travar a linha do
// recurso ANTES de avaliar conflitos (ver services/allocator.rs).

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::resources::{DiningTable, Room, RoomStatus, SportFacility, TableStatus},
};

#[derive(Clone)]
pub struct ResourceRepository {
    pool: PgPool,
}

impl ResourceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  ROOMS
    // =========================================================================

    pub async fn create_room<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        label: &str,
        price_per_night: Decimal,
    ) -> Result<Room, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let room = sqlx::query_as::<_, Room>(
            r#"
            INSERT INTO rooms (tenant_id, label, price_per_night)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(label)
        .bind(price_per_night)
        .fetch_one(executor)
        .await?;

        Ok(room)
    }

    pub async fn get_room_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        room_id: Uuid,
    ) -> Result<Option<Room>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let room = sqlx::query_as::<_, Room>(
            r#"
            SELECT * FROM rooms
            WHERE tenant_id = $1 AND id = $2 AND is_active IS NOT FALSE
            FOR UPDATE
            "#,
        )
        .bind(tenant_id)
        .bind(room_id)
        .fetch_optional(executor)
        .await?;

        Ok(room)
    }

    /// Reprojeta o status do quarto. É uma visão em cache derivada das
    /// hospedagens; nunca fonte de verdade.
    pub async fn set_room_status<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        room_id: Uuid,
        status: RoomStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE rooms SET status = $1 WHERE tenant_id = $2 AND id = $3")
            .bind(status)
            .bind(tenant_id)
            .bind(room_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn list_rooms(&self, tenant_id: Uuid) -> Result<Vec<Room>, AppError> {
        let rooms =
            sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE tenant_id = $1 ORDER BY label")
                .bind(tenant_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rooms)
    }

    // =========================================================================
    //  SPORT FACILITIES
    // =========================================================================

    pub async fn create_facility<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        name: &str,
        capacity: i32,
        price_per_hour: Decimal,
    ) -> Result<SportFacility, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let facility = sqlx::query_as::<_, SportFacility>(
            r#"
            INSERT INTO sport_facilities (tenant_id, name, capacity, price_per_hour)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(capacity)
        .bind(price_per_hour)
        .fetch_one(executor)
        .await?;

        Ok(facility)
    }

    pub async fn get_facility_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        facility_id: Uuid,
    ) -> Result<Option<SportFacility>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let facility = sqlx::query_as::<_, SportFacility>(
            r#"
            SELECT * FROM sport_facilities
            WHERE tenant_id = $1 AND id = $2 AND is_active IS NOT FALSE
            FOR UPDATE
            "#,
        )
        .bind(tenant_id)
        .bind(facility_id)
        .fetch_optional(executor)
        .await?;

        Ok(facility)
    }

    pub async fn list_facilities(&self, tenant_id: Uuid) -> Result<Vec<SportFacility>, AppError> {
        let facilities = sqlx::query_as::<_, SportFacility>(
            "SELECT * FROM sport_facilities WHERE tenant_id = $1 ORDER BY name",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(facilities)
    }

    // =========================================================================
    //  TABLES (restaurante)
    // =========================================================================

    pub async fn create_table<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        label: &str,
    ) -> Result<DiningTable, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let table = sqlx::query_as::<_, DiningTable>(
            r#"
            INSERT INTO dining_tables (tenant_id, label)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(label)
        .fetch_one(executor)
        .await?;

        Ok(table)
    }

    pub async fn get_table_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        table_id: Uuid,
    ) -> Result<Option<DiningTable>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let table = sqlx::query_as::<_, DiningTable>(
            "SELECT * FROM dining_tables WHERE tenant_id = $1 AND id = $2 FOR UPDATE",
        )
        .bind(tenant_id)
        .bind(table_id)
        .fetch_optional(executor)
        .await?;

        Ok(table)
    }

    /// Um pedido ativo só pode estar vinculado a uma mesa; a checagem do
    /// `assign` consulta este lado do vínculo, nunca um ponteiro vivo.
    pub async fn find_table_by_order<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<Option<DiningTable>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let table = sqlx::query_as::<_, DiningTable>(
            "SELECT * FROM dining_tables WHERE tenant_id = $1 AND current_order_id = $2",
        )
        .bind(tenant_id)
        .bind(order_id)
        .fetch_optional(executor)
        .await?;

        Ok(table)
    }

    pub async fn set_table_state<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        table_id: Uuid,
        status: TableStatus,
        current_order_id: Option<Uuid>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE dining_tables
            SET status = $1, current_order_id = $2
            WHERE tenant_id = $3 AND id = $4
            "#,
        )
        .bind(status)
        .bind(current_order_id)
        .bind(tenant_id)
        .bind(table_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn list_tables(&self, tenant_id: Uuid) -> Result<Vec<DiningTable>, AppError> {
        let tables = sqlx::query_as::<_, DiningTable>(
            "SELECT * FROM dining_tables WHERE tenant_id = $1 ORDER BY label",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tables)
    }
}
