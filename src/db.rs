pub mod booking_repo;
pub use booking_repo::BookingRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod resource_repo;
pub use resource_repo::ResourceRepository;
