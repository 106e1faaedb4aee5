// src/handlers/setup.rs
//
// Cadastro básico da pousada: quartos, quadras, mesas, produtos e clientes.
// São operações de back-office, todas atrás de ManageCatalog.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
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
        catalog::{Client, Product, ProductCategory, Tenant},
        resources::{DiningTable, Room, SportFacility},
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantPayload {
    #[validate(length(min = 1, message = "nome é obrigatório"))]
    #[schema(example = "Pousada Mar Azul")]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientPayload {
    #[validate(length(min = 1, message = "nome é obrigatório"))]
    pub full_name: String,
    #[validate(email(message = "e-mail inválido"))]
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomPayload {
    #[validate(length(min = 1, message = "identificação é obrigatória"))]
    #[schema(example = "101")]
    pub label: String,
    #[schema(example = "250.00")]
    pub price_per_night: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFacilityPayload {
    #[validate(length(min = 1, message = "nome é obrigatório"))]
    #[schema(example = "Quadra de tênis")]
    pub name: String,
    #[validate(range(min = 1, message = "capacidade mínima é 1"))]
    #[schema(example = 4)]
    pub capacity: i32,
    #[schema(example = "40.00")]
    pub price_per_hour: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTablePayload {
    #[validate(length(min = 1, message = "identificação é obrigatória"))]
    #[schema(example = "Mesa 7")]
    pub label: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "nome é obrigatório"))]
    pub name: String,
    pub category: ProductCategory,
    #[schema(example = "12.50")]
    pub price: Decimal,
    #[validate(range(min = 0, message = "estoque não pode ser negativo"))]
    pub stock: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    pub category: Option<ProductCategory>,
}

// POST /api/tenants
#[utoipa::path(
    post,
    path = "/api/tenants",
    tag = "Setup",
    request_body = CreateTenantPayload,
    responses((status = 201, description = "Pousada cadastrada", body = Tenant))
)]
pub async fn create_tenant(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateTenantPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tenant = app_state
        .catalog_repo
        .create_tenant(&app_state.db_pool, &payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(tenant)))
}

// POST /api/setup/clients
#[utoipa::path(
    post,
    path = "/api/setup/clients",
    tag = "Setup",
    request_body = CreateClientPayload,
    responses((status = 201, description = "Cliente cadastrado", body = Client)),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Json(payload): Json<CreateClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::ManageCatalog)?;
    payload.validate()?;

    let client = app_state
        .catalog_repo
        .create_client(
            &app_state.db_pool,
            tenant.0,
            &payload.full_name,
            payload.email.as_deref(),
            payload.phone.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(client)))
}

// GET /api/setup/clients
#[utoipa::path(
    get,
    path = "/api/setup/clients",
    tag = "Setup",
    responses((status = 200, description = "Clientes da pousada", body = [Client])),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _role: RoleContext,
) -> Result<impl IntoResponse, AppError> {
    let clients = app_state.catalog_repo.list_clients(tenant.0).await?;
    Ok(Json(clients))
}

// POST /api/setup/rooms
#[utoipa::path(
    post,
    path = "/api/setup/rooms",
    tag = "Setup",
    request_body = CreateRoomPayload,
    responses((status = 201, description = "Quarto cadastrado", body = Room)),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn create_room(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Json(payload): Json<CreateRoomPayload>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::ManageCatalog)?;
    payload.validate()?;

    let room = app_state
        .resource_repo
        .create_room(&app_state.db_pool, tenant.0, &payload.label, payload.price_per_night)
        .await?;

    Ok((StatusCode::CREATED, Json(room)))
}

// GET /api/setup/rooms
#[utoipa::path(
    get,
    path = "/api/setup/rooms",
    tag = "Setup",
    responses((status = 200, description = "Quartos da pousada", body = [Room])),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn list_rooms(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _role: RoleContext,
) -> Result<impl IntoResponse, AppError> {
    let rooms = app_state.resource_repo.list_rooms(tenant.0).await?;
    Ok(Json(rooms))
}

// POST /api/setup/facilities
#[utoipa::path(
    post,
    path = "/api/setup/facilities",
    tag = "Setup",
    request_body = CreateFacilityPayload,
    responses((status = 201, description = "Instalação cadastrada", body = SportFacility)),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn create_facility(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Json(payload): Json<CreateFacilityPayload>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::ManageCatalog)?;
    payload.validate()?;

    let facility = app_state
        .resource_repo
        .create_facility(
            &app_state.db_pool,
            tenant.0,
            &payload.name,
            payload.capacity,
            payload.price_per_hour,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(facility)))
}

// GET /api/setup/facilities
#[utoipa::path(
    get,
    path = "/api/setup/facilities",
    tag = "Setup",
    responses((status = 200, description = "Instalações esportivas", body = [SportFacility])),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn list_facilities(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _role: RoleContext,
) -> Result<impl IntoResponse, AppError> {
    let facilities = app_state.resource_repo.list_facilities(tenant.0).await?;
    Ok(Json(facilities))
}

// POST /api/setup/tables
#[utoipa::path(
    post,
    path = "/api/setup/tables",
    tag = "Setup",
    request_body = CreateTablePayload,
    responses((status = 201, description = "Mesa cadastrada", body = DiningTable)),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn create_table(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Json(payload): Json<CreateTablePayload>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::ManageCatalog)?;
    payload.validate()?;

    let table = app_state
        .resource_repo
        .create_table(&app_state.db_pool, tenant.0, &payload.label)
        .await?;

    Ok((StatusCode::CREATED, Json(table)))
}

// POST /api/setup/products
#[utoipa::path(
    post,
    path = "/api/setup/products",
    tag = "Setup",
    request_body = CreateProductPayload,
    responses((status = 201, description = "Produto cadastrado", body = Product)),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::ManageCatalog)?;
    payload.validate()?;

    let product = app_state
        .catalog_repo
        .create_product(
            &app_state.db_pool,
            tenant.0,
            &payload.name,
            payload.category,
            payload.price,
            payload.stock,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

// GET /api/setup/products?category=RESTAURANT
#[utoipa::path(
    get,
    path = "/api/setup/products",
    tag = "Setup",
    params(
        ListProductsQuery,
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    ),
    responses((status = 200, description = "Produtos da pousada", body = [Product]))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _role: RoleContext,
    Query(query): Query<ListProductsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state
        .catalog_repo
        .list_products(tenant.0, query.category)
        .await?;
    Ok(Json(products))
}
