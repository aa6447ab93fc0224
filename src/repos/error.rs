/*
 * Responsibility
 * - What a repo reports upward
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    // A stored value that no longer maps onto the domain (e.g. unknown enum literal).
    #[error("corrupt row: {0}")]
    Corrupt(String),
}
