/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Clone is cheap (PgPool is an Arc internally)
 *
 * Notes
 * - The identity client and route policy are not here; the auth layers carry their own state.
 */
use sqlx::PgPool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
}

impl AppState {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}
