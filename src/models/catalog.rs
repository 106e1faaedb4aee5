// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums ---

// A categoria restringe qual tipo de pedido pode referenciar o produto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "product_category", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductCategory {
    Restaurant,
    Supermarket,
    Laundry,
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: Uuid,
    #[schema(example = "Pousada Mar Azul")]
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
}

// Registro de hóspedes. O CRM completo ficou de fora; aqui só o que os
// ciclos de vida referenciam.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[schema(example = "Maria da Silva")]
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    #[schema(example = "Água mineral 500ml")]
    pub name: String,
    pub category: ProductCategory,
    #[schema(example = "4.50")]
    pub price: Decimal,
    // Contador inteiro, nunca negativo (CHECK no banco).
    #[schema(example = 120)]
    pub stock: i32,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}
