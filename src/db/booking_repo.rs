// src/db/booking_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::bookings::{ReservationStatus, SportReservation, Stay, StayStatus},
    services::allocator::BookingWindow,
};

#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  STAYS (hospedagens)
    // =========================================================================

    pub async fn create_stay<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        room_id: Uuid,
        client_id: Uuid,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
        total: Decimal,
    ) -> Result<Stay, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stay = sqlx::query_as::<_, Stay>(
            r#"
            INSERT INTO stays (tenant_id, room_id, client_id, check_in, check_out, total)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(room_id)
        .bind(client_id)
        .bind(check_in)
        .bind(check_out)
        .bind(total)
        .fetch_one(executor)
        .await?;

        Ok(stay)
    }

    pub async fn get_stay_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        stay_id: Uuid,
    ) -> Result<Option<Stay>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stay = sqlx::query_as::<_, Stay>(
            r#"
            SELECT * FROM stays
            WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
            FOR UPDATE
            "#,
        )
        .bind(tenant_id)
        .bind(stay_id)
        .fetch_optional(executor)
        .await?;

        Ok(stay)
    }

    /// Janelas que ainda bloqueiam o quarto. O filtro de status é o
    /// espelho em SQL de `StayStatus::blocks_room`: tudo que não foi
    /// cancelado (CHECKED_OUT segue ocupando a janela histórica). Cada
    /// hospedagem consome exatamente 1 vaga.
    pub async fn active_stay_windows<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        room_id: Uuid,
    ) -> Result<Vec<BookingWindow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let windows = sqlx::query_as::<_, BookingWindow>(
            r#"
            SELECT id, check_in AS starts_at, check_out AS ends_at, 1 AS quantity
            FROM stays
            WHERE tenant_id = $1
              AND room_id = $2
              AND status <> 'CANCELLED'
              AND deleted_at IS NULL
            "#,
        )
        .bind(tenant_id)
        .bind(room_id)
        .fetch_all(executor)
        .await?;

        Ok(windows)
    }

    pub async fn set_stay_status<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        stay_id: Uuid,
        status: StayStatus,
        actual_check_in: Option<DateTime<Utc>>,
        actual_check_out: Option<DateTime<Utc>>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE stays
            SET status = $1,
                actual_check_in = COALESCE($2, actual_check_in),
                actual_check_out = COALESCE($3, actual_check_out),
                updated_at = NOW()
            WHERE tenant_id = $4 AND id = $5
            "#,
        )
        .bind(status)
        .bind(actual_check_in)
        .bind(actual_check_out)
        .bind(tenant_id)
        .bind(stay_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn reschedule_stay<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        stay_id: Uuid,
        room_id: Uuid,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
        total: Decimal,
    ) -> Result<Stay, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let stay = sqlx::query_as::<_, Stay>(
            r#"
            UPDATE stays
            SET room_id = $1, check_in = $2, check_out = $3, total = $4, updated_at = NOW()
            WHERE tenant_id = $5 AND id = $6
            RETURNING *
            "#,
        )
        .bind(room_id)
        .bind(check_in)
        .bind(check_out)
        .bind(total)
        .bind(tenant_id)
        .bind(stay_id)
        .fetch_one(executor)
        .await?;

        Ok(stay)
    }

    /// Soft delete: marca e preserva para auditoria, nunca apaga.
    pub async fn soft_delete_stay<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        stay_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE stays SET deleted_at = NOW() WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(stay_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn get_stay(&self, tenant_id: Uuid, stay_id: Uuid) -> Result<Option<Stay>, AppError> {
        let stay = sqlx::query_as::<_, Stay>(
            "SELECT * FROM stays WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL",
        )
        .bind(tenant_id)
        .bind(stay_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(stay)
    }

    pub async fn list_stays(&self, tenant_id: Uuid) -> Result<Vec<Stay>, AppError> {
        let stays = sqlx::query_as::<_, Stay>(
            "SELECT * FROM stays WHERE tenant_id = $1 AND deleted_at IS NULL ORDER BY check_in",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stays)
    }

    // =========================================================================
    //  SPORT RESERVATIONS
    // =========================================================================

    pub async fn create_reservation<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        facility_id: Uuid,
        client_id: Uuid,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        quantity: i32,
        total: Decimal,
    ) -> Result<SportReservation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservation = sqlx::query_as::<_, SportReservation>(
            r#"
            INSERT INTO sport_reservations
                (tenant_id, facility_id, client_id, starts_at, ends_at, quantity, total)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(facility_id)
        .bind(client_id)
        .bind(starts_at)
        .bind(ends_at)
        .bind(quantity)
        .bind(total)
        .fetch_one(executor)
        .await?;

        Ok(reservation)
    }

    pub async fn get_reservation_for_update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        reservation_id: Uuid,
    ) -> Result<Option<SportReservation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservation = sqlx::query_as::<_, SportReservation>(
            r#"
            SELECT * FROM sport_reservations
            WHERE tenant_id = $1 AND id = $2 AND deleted_at IS NULL
            FOR UPDATE
            "#,
        )
        .bind(tenant_id)
        .bind(reservation_id)
        .fetch_optional(executor)
        .await?;

        Ok(reservation)
    }

    /// Janelas que consomem capacidade. O filtro de status é o espelho em
    /// SQL de `ReservationStatus::consumes_capacity`: CANCELLED e
    /// COMPLETED ficam fora.
    pub async fn active_reservation_windows<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        facility_id: Uuid,
    ) -> Result<Vec<BookingWindow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let windows = sqlx::query_as::<_, BookingWindow>(
            r#"
            SELECT id, starts_at, ends_at, quantity
            FROM sport_reservations
            WHERE tenant_id = $1
              AND facility_id = $2
              AND status NOT IN ('CANCELLED', 'COMPLETED')
              AND deleted_at IS NULL
            "#,
        )
        .bind(tenant_id)
        .bind(facility_id)
        .fetch_all(executor)
        .await?;

        Ok(windows)
    }

    pub async fn set_reservation_status<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        reservation_id: Uuid,
        status: ReservationStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE sport_reservations
            SET status = $1, updated_at = NOW()
            WHERE tenant_id = $2 AND id = $3
            "#,
        )
        .bind(status)
        .bind(tenant_id)
        .bind(reservation_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn reschedule_reservation<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        reservation_id: Uuid,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        quantity: i32,
        total: Decimal,
    ) -> Result<SportReservation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservation = sqlx::query_as::<_, SportReservation>(
            r#"
            UPDATE sport_reservations
            SET starts_at = $1, ends_at = $2, quantity = $3, total = $4, updated_at = NOW()
            WHERE tenant_id = $5 AND id = $6
            RETURNING *
            "#,
        )
        .bind(starts_at)
        .bind(ends_at)
        .bind(quantity)
        .bind(total)
        .bind(tenant_id)
        .bind(reservation_id)
        .fetch_one(executor)
        .await?;

        Ok(reservation)
    }

    pub async fn set_reservation_paid_amount<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        reservation_id: Uuid,
        paid_amount: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE sport_reservations
            SET paid_amount = $1, updated_at = NOW()
            WHERE tenant_id = $2 AND id = $3
            "#,
        )
        .bind(paid_amount)
        .bind(tenant_id)
        .bind(reservation_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn soft_delete_reservation<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        reservation_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE sport_reservations SET deleted_at = NOW() WHERE tenant_id = $1 AND id = $2",
        )
        .bind(tenant_id)
        .bind(reservation_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn list_reservations(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<SportReservation>, AppError> {
        let reservations = sqlx::query_as::<_, SportReservation>(
            r#"
            SELECT * FROM sport_reservations
            WHERE tenant_id = $1 AND deleted_at IS NULL
            ORDER BY starts_at
            "#,
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }
}
