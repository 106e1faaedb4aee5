// src/handlers/tables.rs

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        policy::{self, Operation},
    },
    config::AppState,
    middleware::{roles::RoleContext, tenancy::TenantContext},
    models::resources::DiningTable,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignTablePayload {
    pub order_id: Uuid,
}

// POST /api/tables/{table_id}/assign
#[utoipa::path(
    post,
    path = "/api/tables/{table_id}/assign",
    tag = "Tables",
    request_body = AssignTablePayload,
    responses(
        (status = 200, description = "Mesa ocupada e vinculada ao pedido", body = DiningTable),
        (status = 400, description = "Mesa indisponível ou pedido encerrado"),
        (status = 409, description = "Pedido já vinculado a outra mesa")
    ),
    params(
        ("table_id" = Uuid, Path, description = "ID da mesa"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn assign_table(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path(table_id): Path<Uuid>,
    Json(payload): Json<AssignTablePayload>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::AssignTable)?;

    let table = app_state
        .table_service
        .assign(&app_state.db_pool, tenant.0, table_id, payload.order_id)
        .await?;

    Ok(Json(table))
}

// POST /api/tables/{table_id}/clear
#[utoipa::path(
    post,
    path = "/api/tables/{table_id}/clear",
    tag = "Tables",
    responses(
        (status = 200, description = "Mesa liberada", body = DiningTable),
        (status = 400, description = "Pedido vinculado ainda em aberto")
    ),
    params(
        ("table_id" = Uuid, Path, description = "ID da mesa"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn clear_table(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path(table_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::ClearTable)?;

    let table = app_state
        .table_service
        .clear(&app_state.db_pool, tenant.0, table_id)
        .await?;

    Ok(Json(table))
}

// POST /api/tables/{table_id}/reserve
#[utoipa::path(
    post,
    path = "/api/tables/{table_id}/reserve",
    tag = "Tables",
    responses(
        (status = 200, description = "Mesa reservada", body = DiningTable),
        (status = 400, description = "Mesa não está disponível")
    ),
    params(
        ("table_id" = Uuid, Path, description = "ID da mesa"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn reserve_table(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path(table_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::ReserveTable)?;

    let table = app_state
        .table_service
        .reserve(&app_state.db_pool, tenant.0, table_id)
        .await?;

    Ok(Json(table))
}

// POST /api/tables/{table_id}/unreserve
#[utoipa::path(
    post,
    path = "/api/tables/{table_id}/unreserve",
    tag = "Tables",
    responses(
        (status = 200, description = "Reserva da mesa desfeita", body = DiningTable),
        (status = 400, description = "Mesa não está reservada")
    ),
    params(
        ("table_id" = Uuid, Path, description = "ID da mesa"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn unreserve_table(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path(table_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::ReserveTable)?;

    let table = app_state
        .table_service
        .unreserve(&app_state.db_pool, tenant.0, table_id)
        .await?;

    Ok(Json(table))
}

// GET /api/tables
#[utoipa::path(
    get,
    path = "/api/tables",
    tag = "Tables",
    responses((status = 200, description = "Mesas do salão", body = [DiningTable])),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn list_tables(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _role: RoleContext,
) -> Result<impl IntoResponse, AppError> {
    let tables = app_state.table_service.list_tables(tenant.0).await?;
    Ok(Json(tables))
}
