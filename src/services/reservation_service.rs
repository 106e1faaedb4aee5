// src/services/reservation_service.rs
//
// Reservas de instalações esportivas. Diferente do quarto, a instalação
// tem capacidade N configurada no cadastro do recurso (nunca uma
// constante no código): a admissão soma as quantidades das reservas
// conflitantes e compara com essa capacidade.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BookingRepository, CatalogRepository, OrderRepository, ResourceRepository},
    models::{
        bookings::{ReservationStatus, SportReservation},
        orders::{self, PaymentMethod},
        resources::SportFacility,
    },
    services::allocator,
};

#[derive(Clone)]
pub struct ReservationService {
    bookings: BookingRepository,
    resources: ResourceRepository,
    catalog: CatalogRepository,
    // Pagamentos moram no repositório de pedidos (tabela única,
    // append-only, vinculada a pedido OU reserva).
    orders: OrderRepository,
}

impl ReservationService {
    pub fn new(
        bookings: BookingRepository,
        resources: ResourceRepository,
        catalog: CatalogRepository,
        orders: OrderRepository,
    ) -> Self {
        Self {
            bookings,
            resources,
            catalog,
            orders,
        }
    }

    // Preço por hora x duração x vagas. Decimal de ponta a ponta.
    fn compute_total(
        facility: &SportFacility,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        quantity: i32,
    ) -> Decimal {
        let minutes = (ends_at - starts_at).num_minutes();
        let hours = Decimal::from(minutes) / Decimal::from(60);
        facility.price_per_hour * hours * Decimal::from(quantity)
    }

    pub async fn create_reservation<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        facility_id: Uuid,
        client_id: Uuid,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        quantity: i32,
    ) -> Result<SportReservation, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // 1. Trava a instalação antes de olhar as janelas.
        let facility = self
            .resources
            .get_facility_for_update(&mut *tx, tenant_id, facility_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Instalação esportiva".into()))?;

        self.catalog
            .get_client(&mut *tx, tenant_id, client_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cliente".into()))?;

        if starts_at < Utc::now() {
            return Err(AppError::InvalidInput(
                "A reserva não pode começar no passado.".into(),
            ));
        }

        // 2. Admissão por capacidade configurada do recurso.
        let windows = self
            .bookings
            .active_reservation_windows(&mut *tx, tenant_id, facility_id)
            .await?;
        let report = allocator::check_conflict(starts_at, ends_at, &windows, None)?;
        allocator::ensure_capacity(&report, quantity, facility.capacity)?;

        let total = Self::compute_total(&facility, starts_at, ends_at, quantity);
        let reservation = self
            .bookings
            .create_reservation(
                &mut *tx, tenant_id, facility_id, client_id, starts_at, ends_at, quantity, total,
            )
            .await?;

        tx.commit().await?;
        Ok(reservation)
    }

    /// Transições nomeadas (confirmar, iniciar, concluir, cancelar); a
    /// máquina de estados em models::bookings decide a legalidade.
    pub async fn transition<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        reservation_id: Uuid,
        next: ReservationStatus,
    ) -> Result<SportReservation, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let mut reservation = self
            .bookings
            .get_reservation_for_update(&mut *tx, tenant_id, reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva".into()))?;

        if !reservation.status.can_transition_to(next) {
            return Err(AppError::InvalidState(format!(
                "Transição de {:?} para {:?} não é permitida.",
                reservation.status, next
            )));
        }

        self.bookings
            .set_reservation_status(&mut *tx, tenant_id, reservation_id, next)
            .await?;

        tx.commit().await?;

        reservation.status = next;
        Ok(reservation)
    }

    pub async fn update_reservation<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        reservation_id: Uuid,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        quantity: i32,
    ) -> Result<SportReservation, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let reservation = self
            .bookings
            .get_reservation_for_update(&mut *tx, tenant_id, reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva".into()))?;

        if !matches!(
            reservation.status,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        ) {
            return Err(AppError::InvalidState(
                "Só é possível remarcar reservas pendentes ou confirmadas.".into(),
            ));
        }

        let facility = self
            .resources
            .get_facility_for_update(&mut *tx, tenant_id, reservation.facility_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Instalação esportiva".into()))?;

        // Reavalia excluindo a própria reserva.
        let windows = self
            .bookings
            .active_reservation_windows(&mut *tx, tenant_id, reservation.facility_id)
            .await?;
        let report =
            allocator::check_conflict(starts_at, ends_at, &windows, Some(reservation_id))?;
        allocator::ensure_capacity(&report, quantity, facility.capacity)?;

        let total = Self::compute_total(&facility, starts_at, ends_at, quantity);
        let updated = self
            .bookings
            .reschedule_reservation(
                &mut *tx, tenant_id, reservation_id, starts_at, ends_at, quantity, total,
            )
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Pagamento de reserva segue as mesmas regras do razão de pedidos:
    /// valor positivo, sem estourar o total, registro append-only.
    pub async fn record_payment<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        reservation_id: Uuid,
        amount: Decimal,
        method: PaymentMethod,
        reference: Option<&str>,
        notes: Option<&str>,
    ) -> Result<SportReservation, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let mut reservation = self
            .bookings
            .get_reservation_for_update(&mut *tx, tenant_id, reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva".into()))?;

        if reservation.status == ReservationStatus::Cancelled {
            return Err(AppError::InvalidState(
                "Reserva cancelada não recebe pagamento.".into(),
            ));
        }

        let (new_paid, _) =
            orders::apply_payment(reservation.total, reservation.paid_amount, amount)?;

        self.orders
            .insert_payment(
                &mut *tx,
                tenant_id,
                None,
                Some(reservation_id),
                amount,
                method,
                reference,
                notes,
            )
            .await?;
        self.bookings
            .set_reservation_paid_amount(&mut *tx, tenant_id, reservation_id, new_paid)
            .await?;

        tx.commit().await?;

        reservation.paid_amount = new_paid;
        Ok(reservation)
    }

    pub async fn delete_reservation<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        reservation_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let reservation = self
            .bookings
            .get_reservation_for_update(&mut *tx, tenant_id, reservation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva".into()))?;

        if !reservation.status.is_terminal() {
            return Err(AppError::InvalidState(
                "Só é possível remover reservas concluídas ou canceladas.".into(),
            ));
        }

        self.bookings
            .soft_delete_reservation(&mut *tx, tenant_id, reservation_id)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn list_reservations(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<SportReservation>, AppError> {
        self.bookings.list_reservations(tenant_id).await
    }
}
