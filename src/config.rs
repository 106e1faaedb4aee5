// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{BookingRepository, CatalogRepository, OrderRepository, ResourceRepository},
    services::{
        order_service::OrderService, reservation_service::ReservationService,
        stay_service::StayService, table_service::TableService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub catalog_repo: CatalogRepository,
    pub resource_repo: ResourceRepository,
    pub stay_service: StayService,
    pub reservation_service: ReservationService,
    pub order_service: OrderService,
    pub table_service: TableService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // Monta o gráfico de dependências: repositórios compartilham o pool,
        // serviços compartilham os repositórios.
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let resource_repo = ResourceRepository::new(db_pool.clone());
        let booking_repo = BookingRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());

        let stay_service = StayService::new(
            booking_repo.clone(),
            resource_repo.clone(),
            catalog_repo.clone(),
        );
        let reservation_service = ReservationService::new(
            booking_repo.clone(),
            resource_repo.clone(),
            catalog_repo.clone(),
            order_repo.clone(),
        );
        let order_service = OrderService::new(
            order_repo.clone(),
            catalog_repo.clone(),
            booking_repo.clone(),
        );
        let table_service = TableService::new(resource_repo.clone(), order_repo.clone());

        Ok(Self {
            db_pool,
            catalog_repo,
            resource_repo,
            stay_service,
            reservation_service,
            order_service,
            table_service,
        })
    }
}
