//! Gated axum server.
//!
//! Loads the gate configuration from `REQUEST_GATE_CONFIG` (or defaults)
//! and serves a handful of routes behind the gate.
//!
//! Run with: `cargo run --example gated_server`
//!
//! Identity is taken from the `x-demo-user` / `x-demo-role` headers in
//! place of real token verification:
//!
//! ```text
//! curl -i localhost:3000/login                                       # 200
//! curl -i localhost:3000/dashboard                                   # 401
//! curl -i -H 'x-demo-user: a' -H 'x-demo-role: editor' localhost:3000/admin  # 307 -> /home
//! curl -i -H 'x-demo-user: a' -H 'x-demo-role: admin'  localhost:3000/admin  # 200
//! ```

use axum::{extract::Request, http::request::Parts, routing::get, Router};
use request_gate::{GateConfig, Identity};
use tracing_subscriber::EnvFilter;

fn demo_identity(parts: &Parts) -> Option<Identity> {
    let header = |name: &str| parts.headers.get(name).and_then(|v| v.to_str().ok());
    let user = header("x-demo-user")?;
    let identity = Identity::new(user);
    Some(match header("x-demo-role") {
        Some(role) => identity.with_role(role),
        None => identity,
    })
}

async fn whoami(request: Request) -> String {
    match request.extensions().get::<Identity>() {
        Some(identity) => format!(
            "hello {} (role: {})\n",
            identity.subject().unwrap_or("?"),
            identity.role().unwrap_or("none")
        ),
        None => "hello stranger\n".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let state = GateConfig::from_env()?.build_with(demo_identity)?;

    let app = state.apply(
        Router::new()
            .route("/login", get(|| async { "login page\n" }))
            .route("/api/auth/{*rest}", get(|| async { "auth endpoint\n" }))
            .route("/home", get(whoami))
            .route("/dashboard", get(whoami))
            .route("/admin", get(whoami))
            .route("/admin/{*rest}", get(whoami))
            .fallback(whoami),
    );

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
