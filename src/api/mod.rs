/*
 * Responsibility
 * - entry point of the HTTP API (routes() re-export)
 */
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
