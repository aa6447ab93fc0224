/*
 * Responsibility
 * - crate root for the materials API (the binary only calls app::run)
 */
pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
