/*
 * Responsibility
 * - Router-level layers, applied in app.rs from the inside out:
 *   auth (gate + policy) → security headers → CORS → http (request id, trace, limits)
 */
pub mod auth;
pub mod cors;
pub mod http;
pub mod security_headers;
