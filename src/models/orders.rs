// src/models/orders.rs
//
// O razão (ledger) do pedido: itens precificados, total agregado e estado
// de pagamento parcial. A aritmética pura mora aqui; os services apenas a
// aplicam dentro de uma transação junto com os ajustes de estoque.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::catalog::ProductCategory;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKind {
    Restaurant,
    Supermarket,
    Laundry,
}

impl OrderKind {
    /// Só o restaurante reserva estoque no momento da criação/adição.
    /// Supermercado e lavanderia precificam sem mexer no estoque.
    pub fn reserves_stock(self) -> bool {
        matches!(self, Self::Restaurant)
    }

    /// Supermercado e lavanderia fundem linhas do mesmo produto;
    /// o restaurante sempre anexa uma linha nova (duas porções do mesmo
    /// prato em momentos diferentes são linhas diferentes na comanda).
    pub fn merges_duplicate_lines(self) -> bool {
        !matches!(self, Self::Restaurant)
    }

    /// Peculiaridade documentada: pedido de restaurante quitado avança
    /// sozinho para COMPLETED. Os outros tipos não.
    pub fn auto_completes_on_paid(self) -> bool {
        matches!(self, Self::Restaurant)
    }

    /// Delta de estoque para a quantidade reservada de uma linha mudar de
    /// `old_quantity` para `new_quantity`: positivo devolve ao estoque,
    /// negativo consome. Tipos que não reservam estoque devolvem sempre 0.
    pub fn stock_delta(self, old_quantity: i32, new_quantity: i32) -> i32 {
        if self.reserves_stock() {
            old_quantity - new_quantity
        } else {
            0
        }
    }

    pub fn required_category(self) -> ProductCategory {
        match self {
            Self::Restaurant => ProductCategory::Restaurant,
            Self::Supermarket => ProductCategory::Supermarket,
            Self::Laundry => ProductCategory::Laundry,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
}

impl PaymentStatus {
    /// PAID exige igualdade exata (Decimal, nunca float).
    pub fn derive(paid_amount: Decimal, total: Decimal) -> Self {
        if paid_amount == total {
            Self::Paid
        } else if paid_amount > Decimal::ZERO {
            Self::Partial
        } else {
            Self::Pending
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub kind: OrderKind,
    pub client_id: Uuid,
    // Vínculo opcional com a hospedagem (consumo na conta do quarto).
    pub stay_id: Option<Uuid>,
    // Rótulo desnormalizado da mesa vinculada, para exibição.
    pub table_label: Option<String>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    // Invariante: total == soma dos totais das linhas, sempre.
    #[schema(example = "25.00")]
    pub total: Decimal,
    #[schema(example = "0.00")]
    pub paid_amount: Decimal,
    pub notes: Option<String>,
    #[schema(ignore)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    #[schema(example = 2)]
    pub quantity: i32,
    // Preço congelado no momento da adição; mudança no catálogo não
    // reprecifica linhas já lançadas.
    #[schema(example = "10.00")]
    pub unit_price: Decimal,
    #[schema(example = "20.00")]
    pub total: Decimal,
    pub created_at: Option<DateTime<Utc>>,
}

// Registro imutável, append-only. A soma dos pagamentos de um pedido é
// igual ao paid_amount dele.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub order_id: Option<Uuid>,
    pub reservation_id: Option<Uuid>,
    #[schema(example = "20.00")]
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(flatten)]
    pub header: Order,
    pub items: Vec<OrderItem>,
    pub payments: Vec<Payment>,
}

// --- Aritmética pura do razão ---

/// Item ainda não persistido (vem do payload de criação/adição).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub product_id: Uuid,
    pub quantity: i32,
}

pub fn line_total(quantity: i32, unit_price: Decimal) -> Decimal {
    unit_price * Decimal::from(quantity)
}

/// Prepara os rascunhos de item conforme o tipo do pedido: tipos que
/// fundem linhas somam as quantidades do mesmo produto (mantendo a ordem
/// da primeira aparição); o restaurante mantém as linhas como vieram.
/// Quantidade não positiva é rejeitada antes de qualquer escrita.
pub fn coalesce_drafts(kind: OrderKind, drafts: Vec<ItemDraft>) -> Result<Vec<ItemDraft>, AppError> {
    if drafts.is_empty() {
        return Err(AppError::InvalidInput(
            "O pedido precisa de pelo menos um item.".into(),
        ));
    }
    for d in &drafts {
        if d.quantity < 1 {
            return Err(AppError::InvalidInput(
                "Quantidade do item deve ser no mínimo 1.".into(),
            ));
        }
    }

    if !kind.merges_duplicate_lines() {
        return Ok(drafts);
    }

    let mut merged: Vec<ItemDraft> = Vec::with_capacity(drafts.len());
    for d in drafts {
        match merged.iter_mut().find(|m| m.product_id == d.product_id) {
            Some(existing) => existing.quantity += d.quantity,
            None => merged.push(d),
        }
    }
    Ok(merged)
}

/// Valida e aplica um pagamento sobre (total, paid_amount), devolvendo o
/// novo valor pago e o status derivado. Sem efeito em caso de erro.
pub fn apply_payment(
    total: Decimal,
    paid_amount: Decimal,
    amount: Decimal,
) -> Result<(Decimal, PaymentStatus), AppError> {
    if amount <= Decimal::ZERO {
        return Err(AppError::InvalidInput(
            "Valor do pagamento deve ser positivo.".into(),
        ));
    }
    let new_paid = paid_amount + amount;
    if new_paid > total {
        return Err(AppError::InvalidInput(format!(
            "Pagamento excede o saldo do pedido (total {}, já pago {}).",
            total, paid_amount
        )));
    }
    Ok((new_paid, PaymentStatus::derive(new_paid, total)))
}

/// Reavalia o razão depois de uma mudança de total (item adicionado,
/// removido ou requantificado): o total nunca fica abaixo do que já foi
/// pago (estorno é externo), e o status de pagamento é re-derivado do par
/// (pago, novo total) — um pedido quitado que ganha itens volta a PARTIAL.
pub fn rebalance_total(
    new_total: Decimal,
    paid_amount: Decimal,
) -> Result<PaymentStatus, AppError> {
    if new_total < paid_amount {
        return Err(AppError::InvalidState(format!(
            "O total ({}) não pode ficar abaixo do valor já pago ({}); estorne o pagamento antes.",
            new_total, paid_amount
        )));
    }
    Ok(PaymentStatus::derive(paid_amount, new_total))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn draft(product_id: Uuid, quantity: i32) -> ItemDraft {
        ItemDraft { product_id, quantity }
    }

    #[test]
    fn total_da_linha_e_exato() {
        assert_eq!(line_total(2, dec("10.00")), dec("20.00"));
        assert_eq!(line_total(3, dec("0.10")), dec("0.30"));
    }

    #[test]
    fn cenario_do_razao_soma_e_remove() {
        // [(X, 2, 10.00), (Y, 1, 5.00)] -> total 25.00; remove Y -> 20.00.
        let x = line_total(2, dec("10.00"));
        let y = line_total(1, dec("5.00"));
        let total = x + y;
        assert_eq!(total, dec("25.00"));
        assert_eq!(total - y, dec("20.00"));
    }

    #[test]
    fn supermercado_funde_linhas_do_mesmo_produto() {
        let p = Uuid::new_v4();
        let q = Uuid::new_v4();
        let merged = coalesce_drafts(
            OrderKind::Supermarket,
            vec![draft(p, 2), draft(q, 1), draft(p, 3)],
        )
        .unwrap();
        assert_eq!(merged, vec![draft(p, 5), draft(q, 1)]);
    }

    #[test]
    fn restaurante_mantem_linhas_separadas() {
        let p = Uuid::new_v4();
        let drafts = vec![draft(p, 1), draft(p, 1)];
        let kept = coalesce_drafts(OrderKind::Restaurant, drafts.clone()).unwrap();
        assert_eq!(kept, drafts);
    }

    #[test]
    fn pedido_sem_itens_e_rejeitado() {
        let err = coalesce_drafts(OrderKind::Laundry, vec![]).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn quantidade_zero_e_rejeitada() {
        let err = coalesce_drafts(OrderKind::Laundry, vec![draft(Uuid::new_v4(), 0)]).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn pagamento_parcial_e_quitacao() {
        let (paid, status) = apply_payment(dec("25.00"), dec("0.00"), dec("10.00")).unwrap();
        assert_eq!(paid, dec("10.00"));
        assert_eq!(status, PaymentStatus::Partial);

        let (paid, status) = apply_payment(dec("25.00"), paid, dec("15.00")).unwrap();
        assert_eq!(paid, dec("25.00"));
        assert_eq!(status, PaymentStatus::Paid);
    }

    #[test]
    fn pagamento_acima_do_total_e_rejeitado_sem_efeito() {
        // total 25.00, pagar 30.00 -> erro, nada muda.
        let err = apply_payment(dec("25.00"), dec("0.00"), dec("30.00")).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn pagamento_nao_positivo_e_rejeitado() {
        assert!(apply_payment(dec("25.00"), dec("0.00"), dec("0.00")).is_err());
        assert!(apply_payment(dec("25.00"), dec("0.00"), dec("-1.00")).is_err());
    }

    #[test]
    fn status_de_pagamento_derivado() {
        assert_eq!(
            PaymentStatus::derive(dec("0.00"), dec("10.00")),
            PaymentStatus::Pending
        );
        assert_eq!(
            PaymentStatus::derive(dec("5.00"), dec("10.00")),
            PaymentStatus::Partial
        );
        assert_eq!(
            PaymentStatus::derive(dec("10.00"), dec("10.00")),
            PaymentStatus::Paid
        );
    }

    #[test]
    fn remover_linha_nao_deixa_total_abaixo_do_pago() {
        // Pedido de 25.00 com 20.00 pagos: remover a linha de 10.00
        // deixaria total 15.00 < pago 20.00. Rejeita sem efeito.
        let err = rebalance_total(dec("15.00"), dec("20.00")).unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[test]
    fn adicionar_item_em_pedido_quitado_rederiva_o_status() {
        // Quitado (25.00/25.00) ganha mais 10.00 de itens: o status volta
        // a PARTIAL, nunca fica PAID com saldo em aberto.
        assert_eq!(
            rebalance_total(dec("35.00"), dec("25.00")).unwrap(),
            PaymentStatus::Partial
        );
    }

    #[test]
    fn total_reduzido_ate_o_valor_pago_quita_o_pedido() {
        assert_eq!(
            rebalance_total(dec("20.00"), dec("20.00")).unwrap(),
            PaymentStatus::Paid
        );
        assert_eq!(
            rebalance_total(dec("30.00"), dec("20.00")).unwrap(),
            PaymentStatus::Partial
        );
    }

    #[test]
    fn delta_de_estoque_por_tipo() {
        // Só o restaurante movimenta estoque; os demais tipos sempre 0.
        assert_eq!(OrderKind::Restaurant.stock_delta(0, 3), -3);
        assert_eq!(OrderKind::Restaurant.stock_delta(3, 0), 3);
        assert_eq!(OrderKind::Restaurant.stock_delta(2, 5), -3);
        assert_eq!(OrderKind::Supermarket.stock_delta(0, 3), 0);
        assert_eq!(OrderKind::Laundry.stock_delta(3, 0), 0);
    }

    #[test]
    fn adicionar_e_remover_devolve_o_estoque_ao_nivel_original() {
        // Ida e volta: consumir na adição e devolver na remoção anula.
        let consumed = OrderKind::Restaurant.stock_delta(0, 4);
        let restored = OrderKind::Restaurant.stock_delta(4, 0);
        assert_eq!(consumed, -4);
        assert_eq!(consumed + restored, 0);
    }

    #[test]
    fn so_restaurante_reserva_estoque_e_autocompleta() {
        assert!(OrderKind::Restaurant.reserves_stock());
        assert!(!OrderKind::Supermarket.reserves_stock());
        assert!(!OrderKind::Laundry.reserves_stock());

        assert!(OrderKind::Restaurant.auto_completes_on_paid());
        assert!(!OrderKind::Supermarket.auto_completes_on_paid());
        assert!(!OrderKind::Laundry.auto_completes_on_paid());
    }
}
