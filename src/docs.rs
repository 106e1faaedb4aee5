// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Stays ---
        handlers::stays::create_stay,
        handlers::stays::update_stay,
        handlers::stays::check_in_stay,
        handlers::stays::check_out_stay,
        handlers::stays::cancel_stay,
        handlers::stays::delete_stay,
        handlers::stays::get_stay,
        handlers::stays::list_stays,

        // --- Reservations ---
        handlers::reservations::create_reservation,
        handlers::reservations::update_reservation,
        handlers::reservations::confirm_reservation,
        handlers::reservations::start_reservation,
        handlers::reservations::complete_reservation,
        handlers::reservations::cancel_reservation,
        handlers::reservations::pay_reservation,
        handlers::reservations::delete_reservation,
        handlers::reservations::list_reservations,

        // --- Orders ---
        handlers::orders::create_order,
        handlers::orders::add_order_items,
        handlers::orders::update_order_item,
        handlers::orders::remove_order_item,
        handlers::orders::pay_order,
        handlers::orders::cancel_order,
        handlers::orders::delete_order,
        handlers::orders::get_order,
        handlers::orders::list_orders,

        // --- Tables ---
        handlers::tables::assign_table,
        handlers::tables::clear_table,
        handlers::tables::reserve_table,
        handlers::tables::unreserve_table,
        handlers::tables::list_tables,

        // --- Setup ---
        handlers::setup::create_tenant,
        handlers::setup::create_client,
        handlers::setup::list_clients,
        handlers::setup::create_room,
        handlers::setup::list_rooms,
        handlers::setup::create_facility,
        handlers::setup::list_facilities,
        handlers::setup::create_table,
        handlers::setup::create_product,
        handlers::setup::list_products,
    ),
    components(
        schemas(
            // --- Catálogo ---
            models::catalog::Tenant,
            models::catalog::Client,
            models::catalog::Product,
            models::catalog::ProductCategory,

            // --- Recursos ---
            models::resources::Room,
            models::resources::RoomStatus,
            models::resources::SportFacility,
            models::resources::DiningTable,
            models::resources::TableStatus,

            // --- Hospedagens e reservas ---
            models::bookings::Stay,
            models::bookings::StayStatus,
            models::bookings::SportReservation,
            models::bookings::ReservationStatus,

            // --- Pedidos ---
            models::orders::Order,
            models::orders::OrderKind,
            models::orders::OrderStatus,
            models::orders::OrderItem,
            models::orders::OrderDetail,
            models::orders::Payment,
            models::orders::PaymentStatus,
            models::orders::PaymentMethod,

            // --- Payloads ---
            handlers::stays::CreateStayPayload,
            handlers::stays::UpdateStayPayload,
            handlers::reservations::CreateReservationPayload,
            handlers::reservations::UpdateReservationPayload,
            handlers::reservations::PayReservationPayload,
            handlers::orders::CreateOrderPayload,
            handlers::orders::ItemPayload,
            handlers::orders::AddItemsPayload,
            handlers::orders::UpdateItemQuantityPayload,
            handlers::orders::PayOrderPayload,
            handlers::tables::AssignTablePayload,
            handlers::setup::CreateTenantPayload,
            handlers::setup::CreateClientPayload,
            handlers::setup::CreateRoomPayload,
            handlers::setup::CreateFacilityPayload,
            handlers::setup::CreateTablePayload,
            handlers::setup::CreateProductPayload,
        )
    ),
    tags(
        (name = "Stays", description = "Hospedagens (check-in, check-out, cancelamento)"),
        (name = "Reservations", description = "Reservas de instalações esportivas"),
        (name = "Orders", description = "Pedidos de restaurante, mercadinho e lavanderia"),
        (name = "Tables", description = "Mesas do restaurante"),
        (name = "Setup", description = "Cadastro da pousada (quartos, quadras, mesas, produtos, clientes)")
    )
)]
pub struct ApiDoc;
