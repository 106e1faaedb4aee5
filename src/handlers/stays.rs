// src/handlers/stays.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
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
    models::bookings::Stay,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStayPayload {
    pub room_id: Uuid,
    pub client_id: Uuid,
    #[schema(example = "2026-09-10T14:00:00Z")]
    pub check_in: DateTime<Utc>,
    #[schema(example = "2026-09-14T11:00:00Z")]
    pub check_out: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStayPayload {
    pub room_id: Uuid,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
}

// POST /api/stays
#[utoipa::path(
    post,
    path = "/api/stays",
    tag = "Stays",
    request_body = CreateStayPayload,
    responses(
        (status = 201, description = "Hospedagem confirmada, quarto reservado", body = Stay),
        (status = 400, description = "Datas inválidas"),
        (status = 404, description = "Quarto ou cliente não encontrado"),
        (status = 409, description = "Quarto já ocupado no período")
    ),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn create_stay(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Json(payload): Json<CreateStayPayload>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::CreateStay)?;
    payload.validate()?;

    let stay = app_state
        .stay_service
        .create_stay(
            &app_state.db_pool,
            tenant.0,
            payload.room_id,
            payload.client_id,
            payload.check_in,
            payload.check_out,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(stay)))
}

// PUT /api/stays/{stay_id}
#[utoipa::path(
    put,
    path = "/api/stays/{stay_id}",
    tag = "Stays",
    request_body = UpdateStayPayload,
    responses(
        (status = 200, description = "Hospedagem remarcada", body = Stay),
        (status = 409, description = "Nova janela conflita")
    ),
    params(
        ("stay_id" = Uuid, Path, description = "ID da hospedagem"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn update_stay(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path(stay_id): Path<Uuid>,
    Json(payload): Json<UpdateStayPayload>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::UpdateStay)?;
    payload.validate()?;

    let stay = app_state
        .stay_service
        .update_stay(
            &app_state.db_pool,
            tenant.0,
            stay_id,
            payload.room_id,
            payload.check_in,
            payload.check_out,
        )
        .await?;

    Ok(Json(stay))
}

// POST /api/stays/{stay_id}/check-in
#[utoipa::path(
    post,
    path = "/api/stays/{stay_id}/check-in",
    tag = "Stays",
    responses(
        (status = 200, description = "Hóspede em casa, quarto ocupado", body = Stay),
        (status = 400, description = "Transição ilegal")
    ),
    params(
        ("stay_id" = Uuid, Path, description = "ID da hospedagem"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn check_in_stay(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path(stay_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::CheckInStay)?;

    let stay = app_state
        .stay_service
        .check_in(&app_state.db_pool, tenant.0, stay_id)
        .await?;

    Ok(Json(stay))
}

// POST /api/stays/{stay_id}/check-out
#[utoipa::path(
    post,
    path = "/api/stays/{stay_id}/check-out",
    tag = "Stays",
    responses(
        (status = 200, description = "Hospedagem encerrada, quarto liberado", body = Stay),
        (status = 400, description = "Transição ilegal")
    ),
    params(
        ("stay_id" = Uuid, Path, description = "ID da hospedagem"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn check_out_stay(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path(stay_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::CheckOutStay)?;

    let stay = app_state
        .stay_service
        .check_out(&app_state.db_pool, tenant.0, stay_id)
        .await?;

    Ok(Json(stay))
}

// POST /api/stays/{stay_id}/cancel
#[utoipa::path(
    post,
    path = "/api/stays/{stay_id}/cancel",
    tag = "Stays",
    responses(
        (status = 200, description = "Hospedagem cancelada", body = Stay),
        (status = 400, description = "Transição ilegal")
    ),
    params(
        ("stay_id" = Uuid, Path, description = "ID da hospedagem"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn cancel_stay(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path(stay_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::CancelStay)?;

    let stay = app_state
        .stay_service
        .cancel(&app_state.db_pool, tenant.0, stay_id)
        .await?;

    Ok(Json(stay))
}

// DELETE /api/stays/{stay_id}
#[utoipa::path(
    delete,
    path = "/api/stays/{stay_id}",
    tag = "Stays",
    responses(
        (status = 204, description = "Hospedagem marcada como removida"),
        (status = 400, description = "Hospedagem ainda em aberto")
    ),
    params(
        ("stay_id" = Uuid, Path, description = "ID da hospedagem"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn delete_stay(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path(stay_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::DeleteStay)?;

    app_state
        .stay_service
        .delete_stay(&app_state.db_pool, tenant.0, stay_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/stays/{stay_id}
#[utoipa::path(
    get,
    path = "/api/stays/{stay_id}",
    tag = "Stays",
    responses((status = 200, description = "Hospedagem", body = Stay)),
    params(
        ("stay_id" = Uuid, Path, description = "ID da hospedagem"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn get_stay(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _role: RoleContext,
    Path(stay_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let stay = app_state.stay_service.get_stay(tenant.0, stay_id).await?;
    Ok(Json(stay))
}

// GET /api/stays
#[utoipa::path(
    get,
    path = "/api/stays",
    tag = "Stays",
    responses((status = 200, description = "Hospedagens do tenant", body = [Stay])),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn list_stays(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _role: RoleContext,
) -> Result<impl IntoResponse, AppError> {
    let stays = app_state.stay_service.list_stays(tenant.0).await?;
    Ok(Json(stays))
}
