pub mod allocator;
pub mod order_service;
pub mod reservation_service;
pub mod stay_service;
pub mod table_service;
