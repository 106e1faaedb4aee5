// src/handlers/orders.rs

use axum::{
    extract::{Path, Query, State},
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
    models::orders::{
        ItemDraft, Order, OrderDetail, OrderKind, Payment, PaymentMethod,
    },
};

#[derive(Debug, serde::Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "mínimo 1"))]
    #[schema(example = 2)]
    pub quantity: i32,
}

impl From<ItemPayload> for ItemDraft {
    fn from(payload: ItemPayload) -> Self {
        ItemDraft {
            product_id: payload.product_id,
            quantity: payload.quantity,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    pub kind: OrderKind,
    pub client_id: Uuid,
    pub stay_id: Option<Uuid>,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "pedido precisa de ao menos um item"), nested)]
    pub items: Vec<ItemPayload>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddItemsPayload {
    #[validate(length(min = 1, message = "informe ao menos um item"), nested)]
    pub items: Vec<ItemPayload>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemQuantityPayload {
    #[validate(range(min = 1, message = "mínimo 1"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayOrderPayload {
    #[schema(example = "25.00")]
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersQuery {
    pub kind: Option<OrderKind>,
}

// POST /api/orders
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado com itens e total", body = OrderDetail),
        (status = 400, description = "Estadia encerrada ou item inválido"),
        (status = 404, description = "Cliente, estadia ou produto não encontrado"),
        (status = 409, description = "Estoque insuficiente (restaurante)")
    ),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::CreateOrder)?;
    payload.validate()?;

    let drafts = payload.items.into_iter().map(ItemDraft::from).collect();
    let detail = app_state
        .order_service
        .create_order(
            &app_state.db_pool,
            tenant.0,
            payload.kind,
            payload.client_id,
            payload.stay_id,
            payload.notes.as_deref(),
            drafts,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

// POST /api/orders/{order_id}/items
#[utoipa::path(
    post,
    path = "/api/orders/{order_id}/items",
    tag = "Orders",
    request_body = AddItemsPayload,
    responses(
        (status = 200, description = "Itens adicionados, total recalculado", body = Order),
        (status = 400, description = "Pedido já encerrado"),
        (status = 409, description = "Estoque insuficiente (restaurante)")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do pedido"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn add_order_items(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<AddItemsPayload>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::MutateOrderItems)?;
    payload.validate()?;

    let drafts = payload.items.into_iter().map(ItemDraft::from).collect();
    let order = app_state
        .order_service
        .add_items(&app_state.db_pool, tenant.0, order_id, drafts)
        .await?;

    Ok(Json(order))
}

// PUT /api/orders/{order_id}/items/{item_id}
#[utoipa::path(
    put,
    path = "/api/orders/{order_id}/items/{item_id}",
    tag = "Orders",
    request_body = UpdateItemQuantityPayload,
    responses(
        (status = 200, description = "Quantidade ajustada, total recalculado", body = Order),
        (status = 400, description = "Quantidade inválida ou pedido encerrado"),
        (status = 409, description = "Estoque insuficiente para o acréscimo")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do pedido"),
        ("item_id" = Uuid, Path, description = "ID do item"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn update_order_item(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path((order_id, item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateItemQuantityPayload>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::MutateOrderItems)?;
    payload.validate()?;

    let order = app_state
        .order_service
        .update_item_quantity(&app_state.db_pool, tenant.0, order_id, item_id, payload.quantity)
        .await?;

    Ok(Json(order))
}

// DELETE /api/orders/{order_id}/items/{item_id}
#[utoipa::path(
    delete,
    path = "/api/orders/{order_id}/items/{item_id}",
    tag = "Orders",
    responses(
        (status = 200, description = "Item removido, total recalculado", body = Order),
        (status = 400, description = "Último item do pedido; cancele o pedido em vez disso")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do pedido"),
        ("item_id" = Uuid, Path, description = "ID do item"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn remove_order_item(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path((order_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::MutateOrderItems)?;

    let order = app_state
        .order_service
        .remove_item(&app_state.db_pool, tenant.0, order_id, item_id)
        .await?;

    Ok(Json(order))
}

// POST /api/orders/{order_id}/payments
#[utoipa::path(
    post,
    path = "/api/orders/{order_id}/payments",
    tag = "Orders",
    request_body = PayOrderPayload,
    responses(
        (status = 201, description = "Pagamento registrado", body = Payment),
        (status = 400, description = "Valor inválido, acima do saldo ou pedido cancelado")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do pedido"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn pay_order(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<PayOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::PayOrder)?;

    let payment = app_state
        .order_service
        .record_payment(
            &app_state.db_pool,
            tenant.0,
            order_id,
            payload.amount,
            payload.method,
            payload.reference.as_deref(),
            payload.notes.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(payment)))
}

// POST /api/orders/{order_id}/cancel
#[utoipa::path(
    post,
    path = "/api/orders/{order_id}/cancel",
    tag = "Orders",
    responses(
        (status = 200, description = "Pedido cancelado, estoque devolvido", body = Order),
        (status = 400, description = "Pedido com pagamento ou já encerrado")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do pedido"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn cancel_order(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::CancelOrder)?;

    let order = app_state
        .order_service
        .cancel_order(&app_state.db_pool, tenant.0, order_id)
        .await?;

    Ok(Json(order))
}

// DELETE /api/orders/{order_id}
#[utoipa::path(
    delete,
    path = "/api/orders/{order_id}",
    tag = "Orders",
    responses(
        (status = 204, description = "Pedido marcado como removido"),
        (status = 400, description = "Pedido ainda em aberto")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do pedido"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn delete_order(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    RoleContext(role): RoleContext,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    policy::authorize(role, Operation::DeleteOrder)?;

    app_state
        .order_service
        .delete_order(&app_state.db_pool, tenant.0, order_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// GET /api/orders/{order_id}
#[utoipa::path(
    get,
    path = "/api/orders/{order_id}",
    tag = "Orders",
    responses(
        (status = 200, description = "Pedido com itens e pagamentos", body = OrderDetail),
        (status = 404, description = "Pedido não encontrado")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do pedido"),
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    )
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _role: RoleContext,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state
        .order_service
        .get_order_detail(tenant.0, order_id)
        .await?;
    Ok(Json(detail))
}

// GET /api/orders?kind=RESTAURANT
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    params(
        ListOrdersQuery,
        ("x-tenant-id" = Uuid, Header, description = "ID da pousada"),
        ("x-role" = String, Header, description = "Papel do operador")
    ),
    responses((status = 200, description = "Pedidos do tenant", body = [Order]))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    tenant: TenantContext,
    _role: RoleContext,
    Query(query): Query<ListOrdersQuery>,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state.order_service.list_orders(tenant.0, query.kind).await?;
    Ok(Json(orders))
}
