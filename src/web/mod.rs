//! Web framework integration surface.
//!
//! This module wires the [`RequestGate`](crate::RequestGate) into an axum
//! application. It handles:
//! - Skipping paths matched by the [`ExclusionMatcher`](crate::ExclusionMatcher)
//! - Obtaining the Identity Context through an [`IdentitySupplier`]
//! - Running the pre-check, then the full disposition logic
//! - Turning a [`Disposition`](crate::Disposition) into a response
//!
//! Token verification is not done here. An upstream layer verifies the
//! caller and exposes the result through the supplier.
//!
//! # Example
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use request_gate::GateConfig;
//!
//! # fn main() -> Result<(), request_gate::Error> {
//! let state = GateConfig::from_env()?.build()?;
//!
//! let app: Router = state.apply(
//!     Router::new()
//!         .route("/login", get(|| async { "login" }))
//!         .route("/admin", get(|| async { "admin" })),
//! );
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

mod extract;
mod middleware;
mod state;

pub use extract::{ExtensionIdentity, IdentitySupplier};
pub use middleware::{gate_request, REQUEST_ID_HEADER};
pub use state::GateState;
