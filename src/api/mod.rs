/*
 * Responsibility
 * - HTTP surface: DTOs, extractors, handlers and the route table
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
