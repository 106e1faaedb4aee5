// src/models/resources.rs
//
// Recursos reserváveis: quartos, instalações esportivas e mesas.
// O status de cada recurso é uma VISÃO derivada das reservas/pedidos
// ativos; todas as transições que mudam reserva/pedido reprojetam o
// status na mesma transação.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "room_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Available,
    Reserved,
    Occupied,
    Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "table_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Available,
    Reserved,
    Occupied,
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[schema(example = "101")]
    pub label: String,
    #[schema(example = "250.00")]
    pub price_per_night: Decimal,
    pub status: RoomStatus,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SportFacility {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[schema(example = "Quadra de tênis")]
    pub name: String,
    // Capacidade vem da configuração do recurso. Nunca uma constante.
    #[schema(example = 4)]
    pub capacity: i32,
    #[schema(example = "80.00")]
    pub price_per_hour: Decimal,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiningTable {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[schema(example = "M05")]
    pub label: String,
    pub status: TableStatus,
    // No máximo um pedido ativo vinculado por vez. O pedido carrega o
    // rótulo da mesa (desnormalizado); os dois lados mudam juntos.
    pub current_order_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
}
