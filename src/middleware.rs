pub mod roles;
pub mod tenancy;
