// src/handlers.rs

pub mod orders;
pub mod reservations;
pub mod setup;
pub mod stays;
pub mod tables;
