// src/handlers/reservations.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        policy::{self, Operation},
    },
    config::AppState,
    middleware::{roles::RoleContext, tenancy::TenantContext},
    models::{
        bookings::{ReservationStatus, SportReservation},
        orders::PaymentMethod,
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationPayload {
    pub facility_id: Uuid,
    pub client_id: Uuid,
    #[schema(example = "2026-09-10T18:00:00Z")]
    pub starts_at: DateTime<Utc>,
    #[schema(example = "2026-09-10T20:00:00Z")]
    pub ends_at: DateTime<Utc>,
    #[validate(range(min = 1, message = "mínimo 1"))]
    #[schema(example = 2)]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationPayload {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[validate(range(min = 1, message = "mínimo 1"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayReservationPayload {
    #[schema(example = "80.00")]
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

// POST /api/reservations
#[utoipa::path(
    post,
    path = "/api/reservations",
    tag = "Reservations",
    request_body = CreateReservationPayload,
    responses(
        (status = 201, description = "Reserva criada (PENDING)", body = SportReservation),
        (status = 400, description = "Janela inválida ou no passado"),
        (status = 404, description = "Instalação ou cliente não encontrado"),
        (status = 409, description = "Capacidade da instalação excedida")
    ),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn create_reservation(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Json(payload): Json<CreateReservationPayload>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::CreateReservation)?;
    payload.validate()?;

    let reservation = app_state
        .reservation_service
        .create_reservation(
            &app_state.db_pool,
            tenant.0,
            payload.facility_id,
            payload.client_id,
            payload.starts_at,
            payload.ends_at,
            payload.quantity,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

// PUT /api/reservations/{reservation_id}
#[utoipa::path(
    put,
    path = "/api/reservations/{reservation_id}",
    tag = "Reservations",
    request_body = UpdateReservationPayload,
    responses(
        (status = 200, description = "Reserva remarcada", body = SportReservation),
        (status = 409, description = "Capacidade excedida na nova janela")
    ),
    params(
        ("reservation_id" = Uuid, Path, description = "ID da reserva"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn update_reservation(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path(reservation_id): Path<Uuid>,
    Json(payload): Json<UpdateReservationPayload>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::UpdateReservation)?;
    payload.validate()?;

    let reservation = app_state
        .reservation_service
        .update_reservation(
            &app_state.db_pool,
            tenant.0,
            reservation_id,
            payload.starts_at,
            payload.ends_at,
            payload.quantity,
        )
        .await?;

    Ok(Json(reservation))
}

// As quatro transições nomeadas compartilham o mesmo miolo.
async fn transition(
    app_state: AppState,
    tenant: TenantContext,
    role: crate::common::policy::StaffRole,
    reservation_id: Uuid,
    next: ReservationStatus,
) -> Result<Json<SportReservation>, AppError> {
    policy::authorize(role, Operation::TransitionReservation)?;

    let reservation = app_state
        .reservation_service
        .transition(&app_state.db_pool, tenant.0, reservation_id, next)
        .await?;

    Ok(Json(reservation))
}

// POST /api/reservations/{reservation_id}/confirm
#[utoipa::path(
    post,
    path = "/api/reservations/{reservation_id}/confirm",
    tag = "Reservations",
    responses(
        (status = 200, description = "Reserva confirmada", body = SportReservation),
        (status = 400, description = "Transição ilegal")
    ),
    params(
        ("reservation_id" = Uuid, Path, description = "ID da reserva"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn confirm_reservation(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path(reservation_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    transition(app_state, tenant, role, reservation_id, ReservationStatus::Confirmed).await
}

// POST /api/reservations/{reservation_id}/start
#[utoipa::path(
    post,
    path = "/api/reservations/{reservation_id}/start",
    tag = "Reservations",
    responses(
        (status = 200, description = "Uso da instalação iniciado", body = SportReservation),
        (status = 400, description = "Transição ilegal")
    ),
    params(
        ("reservation_id" = Uuid, Path, description = "ID da reserva"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn start_reservation(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path(reservation_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    transition(app_state, tenant, role, reservation_id, ReservationStatus::InProgress).await
}

// POST /api/reservations/{reservation_id}/complete
#[utoipa::path(
    post,
    path = "/api/reservations/{reservation_id}/complete",
    tag = "Reservations",
    responses(
        (status = 200, description = "Reserva concluída", body = SportReservation),
        (status = 400, description = "Transição ilegal")
    ),
    params(
        ("reservation_id" = Uuid, Path, description = "ID da reserva"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn complete_reservation(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path(reservation_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    transition(app_state, tenant, role, reservation_id, ReservationStatus::Completed).await
}

// POST /api/reservations/{reservation_id}/cancel
#[utoipa::path(
    post,
    path = "/api/reservations/{reservation_id}/cancel",
    tag = "Reservations",
    responses(
        (status = 200, description = "Reserva cancelada", body = SportReservation),
        (status = 400, description = "Transição ilegal")
    ),
    params(
        ("reservation_id" = Uuid, Path, description = "ID da reserva"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn cancel_reservation(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path(reservation_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    transition(app_state, tenant, role, reservation_id, ReservationStatus::Cancelled).await
}

// POST /api/reservations/{reservation_id}/payments
#[utoipa::path(
    post,
    path = "/api/reservations/{reservation_id}/payments",
    tag = "Reservations",
    request_body = PayReservationPayload,
    responses(
        (status = 200, description = "Pagamento registrado", body = SportReservation),
        (status = 400, description = "Valor inválido ou acima do saldo")
    ),
    params(
        ("reservation_id" = Uuid, Path, description = "ID da reserva"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn pay_reservation(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path(reservation_id): Path<Uuid>,
    Json(payload): Json<PayReservationPayload>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::PayReservation)?;

    let reservation = app_state
        .reservation_service
        .record_payment(
            &app_state.db_pool,
            tenant.0,
            reservation_id,
            payload.amount,
            payload.method,
            payload.reference.as_deref(),
            payload.notes.as_deref(),
        )
        .await?;

    Ok(Json(reservation))
}

// DELETE /api/reservations/{reservation_id}
#[utoipa::path(
    delete,
    path = "/api/reservations/{reservation_id}",
    tag = "Reservations",
    responses(
        (status = 204, description = "Reserva marcada como removida"),
        (status = 400, description = "Reserva ainda em aberto")
    ),
    params(
        ("reservation_id" = Uuid, Path, description = "ID da reserva"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn delete_reservation(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path(reservation_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::DeleteReservation)?;

    app_state
        .reservation_service
        .delete_reservation(&app_state.db_pool, tenant.0, reservation_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/reservations
#[utoipa::path(
    get,
    path = "/api/reservations",
    tag = "Reservations",
    responses((status = 200, description = "Reservas do tenant", body = [SportReservation])),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn list_reservations(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _role: RoleContext,
) -> Result<impl IntoResponse, AppError> {
    let reservations = app_state
        .reservation_service
        .list_reservations(tenant.0)
        .await?;
    Ok(Json(reservations))
}
