/*!
 * Authorization context extractor
 *
 * Responsibility:
 * - hand the request's AuthzContext (installed by the Gate) to handlers
 * - the context type itself lives in services::auth; only the axum glue is here
 *
 * Public API:
 * - CurrentUser
 */

mod core;

pub use core::CurrentUser;
