// src/services/stay_service.rs
//
// Ciclo de vida da hospedagem: CONFIRMED -> CHECKED_IN -> CHECKED_OUT,
// com cancelamento a partir dos dois primeiros. Toda operação roda em UMA
// transação; a criação e a remarcação travam a linha do quarto antes de
// consultar o alocador, senão duas requisições concorrentes podem gravar
// janelas sobrepostas.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BookingRepository, CatalogRepository, ResourceRepository},
    models::{
        bookings::{Stay, StayStatus},
        resources::{Room, RoomStatus},
    },
    services::allocator,
};

#[derive(Clone)]
pub struct StayService {
    bookings: BookingRepository,
    resources: ResourceRepository,
    catalog: CatalogRepository,
}

impl StayService {
    pub fn new(
        bookings: BookingRepository,
        resources: ResourceRepository,
        catalog: CatalogRepository,
    ) -> Self {
        Self {
            bookings,
            resources,
            catalog,
        }
    }

    // Diárias cobradas: dias entre as datas, mínimo 1.
    fn compute_total(room: &Room, check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> Decimal {
        let nights = (check_out - check_in).num_days().max(1);
        room.price_per_night * Decimal::from(nights)
    }

    pub async fn create_stay<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        room_id: Uuid,
        client_id: Uuid,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> Result<Stay, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // 1. Trava o quarto. A partir daqui nenhuma outra transação
        //    consegue checar conflito neste quarto até o commit.
        let room = self
            .resources
            .get_room_for_update(&mut *tx, tenant_id, room_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quarto".into()))?;

        self.catalog
            .get_client(&mut *tx, tenant_id, client_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cliente".into()))?;

        // 2. Hospedagem nova não pode começar no passado.
        if check_in < Utc::now() {
            return Err(AppError::InvalidInput(
                "A data de entrada não pode estar no passado.".into(),
            ));
        }

        // 3. Decisão pura de alocação. Quarto é recurso exclusivo.
        let windows = self
            .bookings
            .active_stay_windows(&mut *tx, tenant_id, room_id)
            .await?;
        let report = allocator::check_conflict(check_in, check_out, &windows, None)?;
        allocator::ensure_exclusive(&report)?;

        // 4. Grava e reprojeta o status do quarto, tudo na mesma transação.
        let total = Self::compute_total(&room, check_in, check_out);
        let stay = self
            .bookings
            .create_stay(&mut *tx, tenant_id, room_id, client_id, check_in, check_out, total)
            .await?;
        self.resources
            .set_room_status(&mut *tx, tenant_id, room_id, RoomStatus::Reserved)
            .await?;

        tx.commit().await?;
        Ok(stay)
    }

    pub async fn check_in<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        stay_id: Uuid,
    ) -> Result<Stay, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let mut stay = self
            .bookings
            .get_stay_for_update(&mut *tx, tenant_id, stay_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Hospedagem".into()))?;

        if !stay.status.can_transition_to(StayStatus::CheckedIn) {
            return Err(AppError::InvalidState(format!(
                "Check-in não é permitido a partir de {:?}.",
                stay.status
            )));
        }

        let now = Utc::now();
        self.bookings
            .set_stay_status(&mut *tx, tenant_id, stay_id, StayStatus::CheckedIn, Some(now), None)
            .await?;
        self.resources
            .set_room_status(&mut *tx, tenant_id, stay.room_id, RoomStatus::Occupied)
            .await?;

        tx.commit().await?;

        stay.status = StayStatus::CheckedIn;
        stay.actual_check_in = Some(now);
        Ok(stay)
    }

    pub async fn check_out<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        stay_id: Uuid,
    ) -> Result<Stay, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let mut stay = self
            .bookings
            .get_stay_for_update(&mut *tx, tenant_id, stay_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Hospedagem".into()))?;

        if !stay.status.can_transition_to(StayStatus::CheckedOut) {
            return Err(AppError::InvalidState(format!(
                "Check-out não é permitido a partir de {:?}.",
                stay.status
            )));
        }

        let now = Utc::now();
        self.bookings
            .set_stay_status(&mut *tx, tenant_id, stay_id, StayStatus::CheckedOut, None, Some(now))
            .await?;
        self.resources
            .set_room_status(&mut *tx, tenant_id, stay.room_id, RoomStatus::Available)
            .await?;

        tx.commit().await?;

        stay.status = StayStatus::CheckedOut;
        stay.actual_check_out = Some(now);
        Ok(stay)
    }

    /// Cancelamento de hospedagem é incondicional quanto a pagamento
    /// (diferente de pedidos); só o estado da máquina manda.
    pub async fn cancel<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        stay_id: Uuid,
    ) -> Result<Stay, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let mut stay = self
            .bookings
            .get_stay_for_update(&mut *tx, tenant_id, stay_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Hospedagem".into()))?;

        if !stay.status.can_transition_to(StayStatus::Cancelled) {
            return Err(AppError::InvalidState(format!(
                "Cancelamento não é permitido a partir de {:?}.",
                stay.status
            )));
        }

        self.bookings
            .set_stay_status(&mut *tx, tenant_id, stay_id, StayStatus::Cancelled, None, None)
            .await?;
        self.resources
            .set_room_status(&mut *tx, tenant_id, stay.room_id, RoomStatus::Available)
            .await?;

        tx.commit().await?;

        stay.status = StayStatus::Cancelled;
        Ok(stay)
    }

    /// Remarcação de datas e/ou quarto. Reavalia o alocador excluindo a
    /// própria hospedagem para ela não conflitar consigo mesma.
    pub async fn update_stay<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        stay_id: Uuid,
        new_room_id: Uuid,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> Result<Stay, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let stay = self
            .bookings
            .get_stay_for_update(&mut *tx, tenant_id, stay_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Hospedagem".into()))?;

        if stay.status != StayStatus::Confirmed {
            return Err(AppError::InvalidState(
                "Só é possível remarcar antes do check-in.".into(),
            ));
        }

        let room = self
            .resources
            .get_room_for_update(&mut *tx, tenant_id, new_room_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quarto".into()))?;

        let windows = self
            .bookings
            .active_stay_windows(&mut *tx, tenant_id, new_room_id)
            .await?;
        let report = allocator::check_conflict(check_in, check_out, &windows, Some(stay_id))?;
        allocator::ensure_exclusive(&report)?;

        let total = Self::compute_total(&room, check_in, check_out);
        let updated = self
            .bookings
            .reschedule_stay(&mut *tx, tenant_id, stay_id, new_room_id, check_in, check_out, total)
            .await?;

        // Trocou de quarto: o antigo volta a ficar disponível.
        if stay.room_id != new_room_id {
            self.resources
                .set_room_status(&mut *tx, tenant_id, stay.room_id, RoomStatus::Available)
                .await?;
            self.resources
                .set_room_status(&mut *tx, tenant_id, new_room_id, RoomStatus::Reserved)
                .await?;
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Remoção (soft delete) só a partir de estado terminal; o registro
    /// fica para auditoria.
    pub async fn delete_stay<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        stay_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let stay = self
            .bookings
            .get_stay_for_update(&mut *tx, tenant_id, stay_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Hospedagem".into()))?;

        if !stay.status.is_terminal() {
            return Err(AppError::InvalidState(
                "Só é possível remover hospedagens encerradas ou canceladas.".into(),
            ));
        }

        self.bookings
            .soft_delete_stay(&mut *tx, tenant_id, stay_id)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn get_stay(&self, tenant_id: Uuid, stay_id: Uuid) -> Result<Stay, AppError> {
        self.bookings
            .get_stay(tenant_id, stay_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Hospedagem".into()))
    }

    pub async fn list_stays(&self, tenant_id: Uuid) -> Result<Vec<Stay>, AppError> {
        self.bookings.list_stays(tenant_id).await
    }
}
