//src/main.rs

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let stay_routes = Router::new()
        .route("/", post(handlers::stays::create_stay).get(handlers::stays::list_stays))
        .route(
            "/{stay_id}",
            get(handlers::stays::get_stay)
                .put(handlers::stays::update_stay)
                .delete(handlers::stays::delete_stay),
        )
        .route("/{stay_id}/check-in", post(handlers::stays::check_in_stay))
        .route("/{stay_id}/check-out", post(handlers::stays::check_out_stay))
        .route("/{stay_id}/cancel", post(handlers::stays::cancel_stay));

    let reservation_routes = Router::new()
        .route(
            "/",
            post(handlers::reservations::create_reservation)
                .get(handlers::reservations::list_reservations),
        )
        .route(
            "/{reservation_id}",
            axum::routing::put(handlers::reservations::update_reservation)
                .delete(handlers::reservations::delete_reservation),
        )
        .route("/{reservation_id}/confirm", post(handlers::reservations::confirm_reservation))
        .route("/{reservation_id}/start", post(handlers::reservations::start_reservation))
        .route("/{reservation_id}/complete", post(handlers::reservations::complete_reservation))
        .route("/{reservation_id}/cancel", post(handlers::reservations::cancel_reservation))
        .route("/{reservation_id}/payments", post(handlers::reservations::pay_reservation));

    let order_routes = Router::new()
        .route("/", post(handlers::orders::create_order).get(handlers::orders::list_orders))
        .route(
            "/{order_id}",
            get(handlers::orders::get_order).delete(handlers::orders::delete_order),
        )
        .route("/{order_id}/items", post(handlers::orders::add_order_items))
        .route(
            "/{order_id}/items/{item_id}",
            axum::routing::put(handlers::orders::update_order_item)
                .delete(handlers::orders::remove_order_item),
        )
        .route("/{order_id}/payments", post(handlers::orders::pay_order))
        .route("/{order_id}/cancel", post(handlers::orders::cancel_order));

    let table_routes = Router::new()
        .route("/", get(handlers::tables::list_tables))
        .route("/{table_id}/assign", post(handlers::tables::assign_table))
        .route("/{table_id}/clear", post(handlers::tables::clear_table))
        .route("/{table_id}/reserve", post(handlers::tables::reserve_table))
        .route("/{table_id}/unreserve", post(handlers::tables::unreserve_table));

    let setup_routes = Router::new()
        .route(
            "/clients",
            post(handlers::setup::create_client).get(handlers::setup::list_clients),
        )
        .route(
            "/rooms",
            post(handlers::setup::create_room).get(handlers::setup::list_rooms),
        )
        .route(
            "/facilities",
            post(handlers::setup::create_facility).get(handlers::setup::list_facilities),
        )
        .route("/tables", post(handlers::setup::create_table))
        .route(
            "/products",
            post(handlers::setup::create_product).get(handlers::setup::list_products),
        );

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/tenants", post(handlers::setup::create_tenant))
        .nest("/api/stays", stay_routes)
        .nest("/api/reservations", reservation_routes)
        .nest("/api/orders", order_routes)
        .nest("/api/tables", table_routes)
        .nest("/api/setup", setup_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
