//! The interception layer.
//!
//! [`gate_request`] is an axum middleware that runs the gate in front of
//! the application. For each request it:
//!
//! ```text
//! path excluded?           -> forward untouched
//! identity <- supplier
//! pre-check fails?         -> 401 Unauthorized
//! evaluate(path, identity)
//!   Allow                  -> forward, Identity in extensions
//!   Redirect(target)       -> 307 Location: target
//!   Deny                   -> 401 Unauthorized
//! ```

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use uuid::Uuid;

use crate::disposition::Disposition;
use crate::logging::GateLog;

use super::GateState;

/// Header carrying a caller-provided request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Middleware running the request gate.
///
/// Install with `axum::middleware::from_fn_with_state(state, gate_request)`
/// or [`GateState::apply`].
pub async fn gate_request(State(state): State<GateState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let request_id = request_id(request.headers());
    let log = GateLog::new(&request_id, &path);

    if state.exclusions().is_excluded(&path) {
        log.excluded();
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let identity = state.supplier().identify(&parts);
    let gate = state.gate();

    if !gate.is_request_authorized(identity.as_ref(), &path) {
        log.unauthenticated(gate.classify(&path));
        return unauthorized();
    }

    let disposition = gate.evaluate(&path, identity.as_ref());
    log.decision(gate.classify(&path), identity.as_ref(), &disposition);

    match disposition {
        Disposition::Allow => {
            let mut request = Request::from_parts(parts, body);
            if let Some(identity) = identity {
                request.extensions_mut().insert(identity);
            }
            next.run(request).await
        }
        Disposition::Redirect(target) => Redirect::temporary(&target).into_response(),
        Disposition::Deny => unauthorized(),
    }
}

fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::now_v7().to_string())
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
}
