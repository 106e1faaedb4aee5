// src/services/order_service.rs
//
// O razão do pedido. Cada operação mutante roda em UMA transação cobrindo
// o total do pedido, as linhas e o ajuste de estoque: falhou no meio, nada
// vale. O invariante `total == soma das linhas` é mantido por delta
// (total = total - linha_antiga + linha_nova), nunca por recomputação
// tardia fora da transação.
//
// Assimetrias por tipo (de propósito, ver models::orders::OrderKind):
//   - restaurante reserva estoque na criação/adição; os outros não;
//   - supermercado/lavanderia fundem linhas do mesmo produto; o
//     restaurante sempre anexa;
//   - restaurante quitado vira COMPLETED sozinho; os outros não.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BookingRepository, CatalogRepository, OrderRepository},
    models::{
        catalog::Product,
        orders::{
            self, ItemDraft, Order, OrderDetail, OrderKind, OrderStatus, Payment, PaymentMethod,
            PaymentStatus,
        },
    },
};

#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    catalog: CatalogRepository,
    bookings: BookingRepository,
}

impl OrderService {
    pub fn new(
        orders: OrderRepository,
        catalog: CatalogRepository,
        bookings: BookingRepository,
    ) -> Self {
        Self {
            orders,
            catalog,
            bookings,
        }
    }

    /// Trava o produto, valida categoria/tenant e, quando o tipo reserva
    /// estoque, valida saldo e consome `quantity` unidades.
    async fn take_product<E>(
        &self,
        executor: &mut E,
        tenant_id: Uuid,
        kind: OrderKind,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Product, AppError>
    where
        for<'c> &'c mut E: Executor<'c, Database = Postgres>,
    {
        let product = self
            .catalog
            .get_product_for_update(&mut *executor, tenant_id, product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Produto".into()))?;

        if product.category != kind.required_category() {
            return Err(AppError::InvalidInput(format!(
                "O produto '{}' não pertence à categoria deste tipo de pedido.",
                product.name
            )));
        }

        let delta = kind.stock_delta(0, quantity);
        if delta != 0 {
            if product.stock < -delta {
                return Err(AppError::InvalidInput(format!(
                    "Estoque insuficiente para '{}' (disponível {}, pedido {}).",
                    product.name, product.stock, quantity
                )));
            }
            self.catalog
                .adjust_stock(&mut *executor, tenant_id, product_id, delta)
                .await?;
        }

        Ok(product)
    }

    pub async fn create_order<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        kind: OrderKind,
        client_id: Uuid,
        stay_id: Option<Uuid>,
        notes: Option<&str>,
        drafts: Vec<ItemDraft>,
    ) -> Result<OrderDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.catalog
            .get_client(&mut *tx, tenant_id, client_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cliente".into()))?;

        // Consumo na conta do quarto: a hospedagem precisa existir e
        // estar em aberto.
        if let Some(stay_id) = stay_id {
            let stay = self
                .bookings
                .get_stay_for_update(&mut *tx, tenant_id, stay_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Hospedagem".into()))?;
            if stay.status.is_terminal() {
                return Err(AppError::InvalidState(
                    "Não é possível lançar pedido em hospedagem encerrada.".into(),
                ));
            }
        }

        // 1. Funde rascunhos duplicados conforme o tipo e valida quantidades.
        let drafts = orders::coalesce_drafts(kind, drafts)?;

        // 2. Precifica cada linha com o preço atual do catálogo (snapshot)
        //    e reserva estoque quando o tipo exige.
        let mut priced: Vec<(Uuid, i32, Decimal, Decimal)> = Vec::with_capacity(drafts.len());
        let mut total = Decimal::ZERO;
        for draft in &drafts {
            let product = self
                .take_product(&mut *tx, tenant_id, kind, draft.product_id, draft.quantity)
                .await?;
            let line = orders::line_total(draft.quantity, product.price);
            total += line;
            priced.push((draft.product_id, draft.quantity, product.price, line));
        }

        // 3. Grava cabeçalho e linhas. total == soma das linhas por construção.
        let order = self
            .orders
            .create_order(&mut *tx, tenant_id, kind, client_id, stay_id, notes, total)
            .await?;

        let mut items = Vec::with_capacity(priced.len());
        for (product_id, quantity, unit_price, line) in priced {
            let item = self
                .orders
                .insert_item(&mut *tx, tenant_id, order.id, product_id, quantity, unit_price, line)
                .await?;
            items.push(item);
        }

        tx.commit().await?;

        Ok(OrderDetail {
            header: order,
            items,
            payments: vec![],
        })
    }

    pub async fn add_items<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
        drafts: Vec<ItemDraft>,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let order = self
            .orders
            .get_order_for_update(&mut *tx, tenant_id, order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Pedido".into()))?;

        if order.status.is_terminal() {
            return Err(AppError::InvalidState(
                "Pedido encerrado não aceita novos itens.".into(),
            ));
        }

        let drafts = orders::coalesce_drafts(order.kind, drafts)?;

        // O total anda por delta; cada ramo abaixo soma exatamente o que
        // mudou na linha correspondente.
        let mut delta = Decimal::ZERO;
        for draft in &drafts {
            let product = self
                .take_product(&mut *tx, tenant_id, order.kind, draft.product_id, draft.quantity)
                .await?;

            let existing = if order.kind.merges_duplicate_lines() {
                self.orders
                    .find_item_by_product(&mut *tx, tenant_id, order_id, draft.product_id)
                    .await?
            } else {
                None
            };

            match existing {
                // Fusão: soma quantidade e recomputa a linha mantendo o
                // preço congelado da primeira adição.
                Some(line) => {
                    let new_quantity = line.quantity + draft.quantity;
                    let new_total = orders::line_total(new_quantity, line.unit_price);
                    self.orders
                        .update_item(&mut *tx, tenant_id, line.id, new_quantity, new_total)
                        .await?;
                    delta += new_total - line.total;
                }
                None => {
                    let line_total = orders::line_total(draft.quantity, product.price);
                    self.orders
                        .insert_item(
                            &mut *tx,
                            tenant_id,
                            order_id,
                            draft.product_id,
                            draft.quantity,
                            product.price,
                            line_total,
                        )
                        .await?;
                    delta += line_total;
                }
            }
        }

        // Itens novos podem reabrir um pedido quitado: re-deriva o status
        // de pagamento junto com o total, na mesma transação.
        let new_total = order.total + delta;
        let payment_status = orders::rebalance_total(new_total, order.paid_amount)?;
        self.orders
            .set_order_total(&mut *tx, tenant_id, order_id, new_total)
            .await?;
        if payment_status != order.payment_status {
            self.orders
                .set_order_payment_state(&mut *tx, tenant_id, order_id, order.paid_amount, payment_status)
                .await?;
        }

        tx.commit().await?;

        let mut order = order;
        order.total = new_total;
        order.payment_status = payment_status;
        Ok(order)
    }

    pub async fn update_item_quantity<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        if quantity < 1 {
            return Err(AppError::InvalidInput(
                "Quantidade deve ser no mínimo 1; para zerar, remova o item.".into(),
            ));
        }

        let mut tx = executor.begin().await?;

        let order = self
            .orders
            .get_order_for_update(&mut *tx, tenant_id, order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Pedido".into()))?;

        if order.status.is_terminal() {
            return Err(AppError::InvalidState(
                "Pedido encerrado não aceita alteração de itens.".into(),
            ));
        }

        let item = self
            .orders
            .find_item(&mut *tx, tenant_id, order_id, item_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Item do pedido".into()))?;

        // total = total - linha antiga + linha nova; nunca abaixo do que
        // já foi pago. Decide antes de qualquer escrita.
        let new_line_total = orders::line_total(quantity, item.unit_price);
        let new_total = order.total - item.total + new_line_total;
        let payment_status = orders::rebalance_total(new_total, order.paid_amount)?;

        // Ajuste de estoque pela diferença, só para tipos que reservam.
        let delta = order.kind.stock_delta(item.quantity, quantity);
        if delta != 0 {
            let product = self
                .catalog
                .get_product_for_update(&mut *tx, tenant_id, item.product_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Produto".into()))?;
            if delta < 0 && product.stock < -delta {
                return Err(AppError::InvalidInput(format!(
                    "Estoque insuficiente para '{}' (disponível {}, adicional {}).",
                    product.name, product.stock, -delta
                )));
            }
            self.catalog
                .adjust_stock(&mut *tx, tenant_id, item.product_id, delta)
                .await?;
        }

        self.orders
            .update_item(&mut *tx, tenant_id, item_id, quantity, new_line_total)
            .await?;
        self.orders
            .set_order_total(&mut *tx, tenant_id, order_id, new_total)
            .await?;
        if payment_status != order.payment_status {
            self.orders
                .set_order_payment_state(&mut *tx, tenant_id, order_id, order.paid_amount, payment_status)
                .await?;
        }

        tx.commit().await?;

        let mut order = order;
        order.total = new_total;
        order.payment_status = payment_status;
        Ok(order)
    }

    pub async fn remove_item<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
        item_id: Uuid,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let order = self
            .orders
            .get_order_for_update(&mut *tx, tenant_id, order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Pedido".into()))?;

        if order.status.is_terminal() {
            return Err(AppError::InvalidState(
                "Pedido encerrado não aceita alteração de itens.".into(),
            ));
        }

        let item = self
            .orders
            .find_item(&mut *tx, tenant_id, order_id, item_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Item do pedido".into()))?;

        // Pedido nunca fica vazio: a última linha não sai, cancela-se o
        // pedido inteiro.
        let count = self.orders.count_items(&mut *tx, tenant_id, order_id).await?;
        if count <= 1 {
            return Err(AppError::InvalidInput(
                "O pedido precisa de pelo menos um item; cancele o pedido em vez de esvaziá-lo."
                    .into(),
            ));
        }

        // O total encolhe, mas nunca abaixo do que já foi pago.
        let new_total = order.total - item.total;
        let payment_status = orders::rebalance_total(new_total, order.paid_amount)?;

        // Linha fora, estoque de volta ao nível anterior à adição.
        let delta = order.kind.stock_delta(item.quantity, 0);
        if delta != 0 {
            self.catalog
                .adjust_stock(&mut *tx, tenant_id, item.product_id, delta)
                .await?;
        }

        self.orders.delete_item(&mut *tx, tenant_id, item_id).await?;

        self.orders
            .set_order_total(&mut *tx, tenant_id, order_id, new_total)
            .await?;
        if payment_status != order.payment_status {
            self.orders
                .set_order_payment_state(&mut *tx, tenant_id, order_id, order.paid_amount, payment_status)
                .await?;
        }

        tx.commit().await?;

        let mut order = order;
        order.total = new_total;
        order.payment_status = payment_status;
        Ok(order)
    }

    pub async fn record_payment<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
        amount: Decimal,
        method: PaymentMethod,
        reference: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let order = self
            .orders
            .get_order_for_update(&mut *tx, tenant_id, order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Pedido".into()))?;

        if order.status == OrderStatus::Cancelled {
            return Err(AppError::InvalidState(
                "Pedido cancelado não recebe pagamento.".into(),
            ));
        }

        // Valida e deriva o novo estado antes de qualquer escrita.
        let (new_paid, payment_status) =
            orders::apply_payment(order.total, order.paid_amount, amount)?;

        let payment = self
            .orders
            .insert_payment(
                &mut *tx,
                tenant_id,
                Some(order_id),
                None,
                amount,
                method,
                reference,
                notes,
            )
            .await?;
        self.orders
            .set_order_payment_state(&mut *tx, tenant_id, order_id, new_paid, payment_status)
            .await?;

        // Peculiaridade do restaurante: quitou, fechou a comanda.
        if payment_status == PaymentStatus::Paid
            && order.kind.auto_completes_on_paid()
            && order.status == OrderStatus::Pending
        {
            self.orders
                .set_order_status(
                    &mut *tx,
                    tenant_id,
                    order_id,
                    OrderStatus::Completed,
                    Some(Utc::now()),
                )
                .await?;
        }

        tx.commit().await?;
        Ok(payment)
    }

    pub async fn cancel_order<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let order = self
            .orders
            .get_order_for_update(&mut *tx, tenant_id, order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Pedido".into()))?;

        if order.status.is_terminal() {
            return Err(AppError::InvalidState(
                "Pedido já está encerrado.".into(),
            ));
        }
        if order.paid_amount > Decimal::ZERO {
            return Err(AppError::InvalidState(
                "Pedido com pagamento registrado exige estorno externo antes do cancelamento."
                    .into(),
            ));
        }

        // Devolve todo o estoque reservado pelas linhas. Só acontece uma
        // vez: um segundo cancel cai no guarda de estado terminal acima.
        if order.kind.reserves_stock() {
            let items = self.orders.list_items(&mut *tx, tenant_id, order_id).await?;
            for item in items {
                let delta = order.kind.stock_delta(item.quantity, 0);
                self.catalog
                    .adjust_stock(&mut *tx, tenant_id, item.product_id, delta)
                    .await?;
            }
        }

        self.orders
            .set_order_status(&mut *tx, tenant_id, order_id, OrderStatus::Cancelled, Some(Utc::now()))
            .await?;

        tx.commit().await?;

        let mut order = order;
        order.status = OrderStatus::Cancelled;
        Ok(order)
    }

    pub async fn delete_order<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let order = self
            .orders
            .get_order_for_update(&mut *tx, tenant_id, order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Pedido".into()))?;

        if !order.status.is_terminal() {
            return Err(AppError::InvalidState(
                "Só é possível remover pedidos concluídos ou cancelados.".into(),
            ));
        }

        self.orders.soft_delete_order(&mut *tx, tenant_id, order_id).await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn get_order_detail(
        &self,
        tenant_id: Uuid,
        order_id: Uuid,
    ) -> Result<OrderDetail, AppError> {
        self.orders
            .get_order_detail(tenant_id, order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Pedido".into()))
    }

    pub async fn list_orders(
        &self,
        tenant_id: Uuid,
        kind: Option<OrderKind>,
    ) -> Result<Vec<Order>, AppError> {
        self.orders.list_orders(tenant_id, kind).await
    }
}
