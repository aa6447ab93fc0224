/*
 * Responsibility
 * - Custom extractors shared by handlers
 */
pub mod auth_ctx;

pub use auth_ctx::CurrentUser;
