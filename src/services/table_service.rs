// src/services/table_service.rs
//
// Vínculo mesa <-> pedido: duas chaves independentes (current_order_id na
// mesa, table_label no pedido) mantidas coerentes pela MESMA transação de
// assign/clear. A leitura resolve o vínculo por consulta, nunca por
// ponteiro vivo de mão dupla.

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{OrderRepository, ResourceRepository},
    models::resources::{DiningTable, TableStatus},
};

#[derive(Clone)]
pub struct TableService {
    resources: ResourceRepository,
    orders: OrderRepository,
}

impl TableService {
    pub fn new(resources: ResourceRepository, orders: OrderRepository) -> Self {
        Self { resources, orders }
    }

    pub async fn assign<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        table_id: Uuid,
        order_id: Uuid,
    ) -> Result<DiningTable, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let mut table = self
            .resources
            .get_table_for_update(&mut *tx, tenant_id, table_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Mesa".into()))?;

        if table.status != TableStatus::Available {
            return Err(AppError::InvalidState(format!(
                "Mesa {} não está disponível.",
                table.label
            )));
        }

        let order = self
            .orders
            .get_order_for_update(&mut *tx, tenant_id, order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Pedido".into()))?;

        if order.status.is_terminal() {
            return Err(AppError::InvalidState(
                "Pedido encerrado não pode ocupar mesa.".into(),
            ));
        }

        // O pedido não pode estar vinculado a outra mesa.
        if let Some(other) = self
            .resources
            .find_table_by_order(&mut *tx, tenant_id, order_id)
            .await?
        {
            if other.id != table_id {
                return Err(AppError::Conflict(format!(
                    "Pedido já está vinculado à mesa {}.",
                    other.label
                )));
            }
        }

        // Os dois lados do vínculo mudam juntos.
        self.resources
            .set_table_state(&mut *tx, tenant_id, table_id, TableStatus::Occupied, Some(order_id))
            .await?;
        self.orders
            .set_order_table_label(&mut *tx, tenant_id, order_id, Some(&table.label))
            .await?;

        tx.commit().await?;

        table.status = TableStatus::Occupied;
        table.current_order_id = Some(order_id);
        Ok(table)
    }

    /// Libera a mesa. Só depois que o pedido vinculado encerrou
    /// (COMPLETED ou CANCELLED).
    pub async fn clear<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        table_id: Uuid,
    ) -> Result<DiningTable, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let mut table = self
            .resources
            .get_table_for_update(&mut *tx, tenant_id, table_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Mesa".into()))?;

        let order_id = table.current_order_id.ok_or_else(|| {
            AppError::InvalidState(format!("Mesa {} não tem pedido vinculado.", table.label))
        })?;

        let order = self
            .orders
            .get_order_for_update(&mut *tx, tenant_id, order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Pedido".into()))?;

        if !order.status.is_terminal() {
            return Err(AppError::InvalidState(
                "O pedido da mesa ainda está aberto; conclua ou cancele antes de liberar.".into(),
            ));
        }

        self.orders
            .set_order_table_label(&mut *tx, tenant_id, order_id, None)
            .await?;
        self.resources
            .set_table_state(&mut *tx, tenant_id, table_id, TableStatus::Available, None)
            .await?;

        tx.commit().await?;

        table.status = TableStatus::Available;
        table.current_order_id = None;
        Ok(table)
    }

    pub async fn reserve<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        table_id: Uuid,
    ) -> Result<DiningTable, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        self.toggle(executor, tenant_id, table_id, TableStatus::Available, TableStatus::Reserved)
            .await
    }

    pub async fn unreserve<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        table_id: Uuid,
    ) -> Result<DiningTable, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        self.toggle(executor, tenant_id, table_id, TableStatus::Reserved, TableStatus::Available)
            .await
    }

    // AVAILABLE <-> RESERVED; mesa ocupada não alterna.
    async fn toggle<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        table_id: Uuid,
        from: TableStatus,
        to: TableStatus,
    ) -> Result<DiningTable, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let mut table = self
            .resources
            .get_table_for_update(&mut *tx, tenant_id, table_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Mesa".into()))?;

        if table.status != from {
            return Err(AppError::InvalidState(format!(
                "Mesa {} está {:?}; esperava {:?}.",
                table.label, table.status, from
            )));
        }

        self.resources
            .set_table_state(&mut *tx, tenant_id, table_id, to, None)
            .await?;

        tx.commit().await?;

        table.status = to;
        Ok(table)
    }

    pub async fn list_tables(&self, tenant_id: Uuid) -> Result<Vec<DiningTable>, AppError> {
        self.resources.list_tables(tenant_id).await
    }
}
