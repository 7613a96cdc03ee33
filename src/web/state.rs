use std::sync::Arc;

use axum::Router;

use crate::gate::RequestGate;
use crate::matcher::ExclusionMatcher;

use super::{gate_request, IdentitySupplier};

/// Immutable runtime state shared by every gated request.
///
/// Cheap to clone: every field is behind an `Arc`. Built once at startup,
/// normally through [`GateConfig::build`](crate::GateConfig::build).
#[derive(Clone)]
pub struct GateState {
    gate: Arc<RequestGate>,
    exclusions: Arc<ExclusionMatcher>,
    supplier: Arc<dyn IdentitySupplier>,
}

impl GateState {
    /// Assembles the state from its parts.
    pub fn new(
        gate: RequestGate,
        exclusions: ExclusionMatcher,
        supplier: impl IdentitySupplier,
    ) -> Self {
        Self {
            gate: Arc::new(gate),
            exclusions: Arc::new(exclusions),
            supplier: Arc::new(supplier),
        }
    }

    /// Returns the gate.
    pub fn gate(&self) -> &RequestGate {
        &self.gate
    }

    /// Returns the exclusion matcher.
    pub fn exclusions(&self) -> &ExclusionMatcher {
        &self.exclusions
    }

    /// Returns the identity supplier.
    pub fn supplier(&self) -> &dyn IdentitySupplier {
        self.supplier.as_ref()
    }

    /// Wraps every route of `router` with [`gate_request`].
    ///
    /// Like any `Router::layer`, only routes and fallback registered before
    /// this call are gated.
    pub fn apply<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(axum::middleware::from_fn_with_state(
            self.clone(),
            gate_request,
        ))
    }
}

impl std::fmt::Debug for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateState")
            .field("gate", &self.gate)
            .field("exclusions", &self.exclusions.as_str())
            .finish_non_exhaustive()
    }
}
