/*
 * Responsibility
 * - public surface of the middleware layer
 * - auth::basic (Basic auth gate), cors, http (request id / limits / tracing)
 */
pub mod auth;
pub mod cors;
pub mod http;
