/*
 * Responsibility
 * - POST /hello
 * - fixed JSON body + Link header + 201 Created
 */
use axum::{
    Json,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;

pub const LINK: &str = "http://luisrei.com";

#[derive(Debug, Serialize)]
pub struct HelloResponse {
    pub hello: &'static str,
    pub number: u32,
}

pub async fn hello() -> impl IntoResponse {
    let body = HelloResponse {
        hello: "world",
        number: 3,
    };

    (StatusCode::CREATED, [(header::LINK, LINK)], Json(body))
}
