/*
 * Responsibility
 * - request/response DTOs, grouped by resource
 */
pub mod envelope;
pub mod locations;
pub mod materials;
