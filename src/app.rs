/*
 * Responsibility
 * - load Config → build AppState → assemble the Router
 * - apply middleware (http / CORS; the Basic auth gate lives in api::routes)
 * - serve with axum::serve() until Ctrl-C / SIGTERM, then drain in-flight requests
 */
use std::{panic, process};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{api, config::Config, middleware, state::AppState};

fn init_tracing() {
    // RUST_LOG wins when set, e.g.
    // RUST_LOG=info,hello_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: crash so it gets noticed
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("loading configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {} (realm {:?})",
        config.app_env,
        config.addr,
        config.basic_auth_realm
    );

    let state = AppState::from(&config);
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = api::routes(state.clone()).with_state(state);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    wait_for_shutdown(ctrl_c, terminate).await;
    tracing::info!("shutdown signal received");
}

/// Resolves as soon as either signal future resolves.
async fn wait_for_shutdown<C, T>(ctrl_c: C, terminate: T)
where
    C: std::future::Future<Output = ()>,
    T: std::future::Future<Output = ()>,
{
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
        response::Response,
    };
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::api::handlers::{hello::LINK, secrets::SECRET_MESSAGE};

    fn app() -> Router {
        let config = Config::from_lookup(|_| None).unwrap();
        build_router(AppState::from(&config), &config)
    }

    fn request(method: Method, uri: &str, authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn basic(user: &str, pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")))
    }

    async fn body_bytes(res: Response) -> Vec<u8> {
        to_bytes(res.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    async fn assert_challenge(res: Response) {
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            res.headers()[header::WWW_AUTHENTICATE],
            "Basic realm=\"Example\""
        );
        let body: Value = serde_json::from_slice(&body_bytes(res).await).unwrap();
        assert_eq!(body, json!({ "message": "Authenticate." }));
    }

    #[tokio::test]
    async fn hello_returns_created_with_link_and_fixed_body() {
        let res = app()
            .oneshot(request(Method::POST, "/hello", None))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.headers()[header::LINK], LINK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
        let body: Value = serde_json::from_slice(&body_bytes(res).await).unwrap();
        assert_eq!(body, json!({ "hello": "world", "number": 3 }));
    }

    #[tokio::test]
    async fn hello_ignores_request_body_and_auth() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/hello")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, basic("nobody", "nothing"))
            .body(Body::from(r#"{"anything": true}"#))
            .unwrap();

        let res = app().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn hello_only_accepts_post() {
        let res = app()
            .oneshot(request(Method::GET, "/hello", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn shutdown_fires_on_terminate_alone() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let terminate = async move {
            let _ = rx.await;
        };

        let waiter = tokio::spawn(wait_for_shutdown(std::future::pending::<()>(), terminate));
        tx.send(()).unwrap();

        tokio::time::timeout(std::time::Duration::from_secs(5), waiter)
            .await
            .expect("shutdown did not fire on terminate")
            .unwrap();
    }

    #[tokio::test]
    async fn shutdown_fires_on_ctrl_c_alone() {
        tokio::time::timeout(
            std::time::Duration::from_secs(5),
            wait_for_shutdown(async {}, std::future::pending::<()>()),
        )
        .await
        .expect("shutdown did not fire on ctrl-c");
    }

    #[tokio::test]
    async fn secrets_rejects_other_methods_before_auth() {
        for auth in [None, Some(basic("admin", "secret"))] {
            let res = app()
                .oneshot(request(Method::POST, "/secrets", auth.as_deref()))
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert!(!res.headers().contains_key(header::WWW_AUTHENTICATE));
        }
    }

    #[tokio::test]
    async fn secrets_without_credentials_is_challenged() {
        let res = app()
            .oneshot(request(Method::GET, "/secrets", None))
            .await
            .unwrap();
        assert_challenge(res).await;
    }

    #[tokio::test]
    async fn secrets_with_valid_credentials_returns_message() {
        let auth = basic("admin", "secret");
        let res = app()
            .oneshot(request(Method::GET, "/secrets", Some(&auth)))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert!(!res.headers().contains_key(header::WWW_AUTHENTICATE));
        assert_eq!(body_bytes(res).await, SECRET_MESSAGE.as_bytes());
    }

    #[tokio::test]
    async fn secrets_with_any_other_credentials_is_challenged() {
        let app = app();
        for (user, pass) in [
            ("admin", "wrong"),
            ("guest", "secret"),
            ("secret", "admin"),
            ("ADMIN", "secret"),
            ("admin", "SECRET"),
            ("", ""),
        ] {
            let auth = basic(user, pass);
            let res = app
                .clone()
                .oneshot(request(Method::GET, "/secrets", Some(&auth)))
                .await
                .unwrap();
            assert_challenge(res).await;
        }
    }

    #[tokio::test]
    async fn secrets_with_malformed_authorization_is_challenged() {
        let app = app();
        for auth in [
            "Bearer some-token",
            "Basic not*base64",
            "Basic",
            format!("Basic {}", STANDARD.encode("adminsecret")).as_str(),
        ] {
            let res = app
                .clone()
                .oneshot(request(Method::GET, "/secrets", Some(auth)))
                .await
                .unwrap();
            assert_challenge(res).await;
        }
    }

    #[tokio::test]
    async fn repeated_requests_get_identical_responses() {
        let app = app();
        let auth = basic("admin", "secret");

        let mut seen = Vec::new();
        for _ in 0..3 {
            let hello = app
                .clone()
                .oneshot(request(Method::POST, "/hello", None))
                .await
                .unwrap();
            let hello = (hello.status(), body_bytes(hello).await);

            let denied = app
                .clone()
                .oneshot(request(Method::GET, "/secrets", None))
                .await
                .unwrap();
            let denied = (denied.status(), body_bytes(denied).await);

            let allowed = app
                .clone()
                .oneshot(request(Method::GET, "/secrets", Some(&auth)))
                .await
                .unwrap();
            let allowed = (allowed.status(), body_bytes(allowed).await);

            seen.push((hello, denied, allowed));
        }

        assert!(seen.windows(2).all(|w| w[0] == w[1]));
    }

    #[tokio::test]
    async fn configured_realm_and_credentials_are_used() {
        let config = Config::from_lookup(|key| match key {
            "BASIC_AUTH_REALM" => Some("Staff".to_string()),
            "BASIC_AUTH_USERNAME" => Some("root".to_string()),
            "BASIC_AUTH_PASSWORD" => Some("pa:ss".to_string()),
            _ => None,
        })
        .unwrap();
        let app = build_router(AppState::from(&config), &config);

        let res = app
            .clone()
            .oneshot(request(Method::GET, "/secrets", None))
            .await
            .unwrap();
        assert_eq!(
            res.headers()[header::WWW_AUTHENTICATE],
            "Basic realm=\"Staff\""
        );

        let auth = basic("root", "pa:ss");
        let res = app
            .oneshot(request(Method::GET, "/secrets", Some(&auth)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_and_unknown_routes() {
        let app = app();

        let res = app
            .clone()
            .oneshot(request(Method::GET, "/health", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = serde_json::from_slice(&body_bytes(res).await).unwrap();
        assert_eq!(body, json!({ "status": "ok" }));

        let res = app
            .oneshot(request(Method::GET, "/nope", None))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
