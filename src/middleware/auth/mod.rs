//! Authentication and authorization layers.
//!
//! `apply` wraps a router so that every request passes the gate first (context install,
//! never rejects) and the route policy second (the only 401/403 source).

pub mod gate;
pub mod policy;

use std::sync::Arc;

use axum::{Router, middleware};

use crate::services::auth::IdentityClient;

pub use gate::{GateError, GateState, is_bypassed};
pub use policy::{Access, Decision, PolicyError, RoutePolicy};

pub fn apply<S>(
    router: Router<S>,
    identity: Arc<dyn IdentityClient>,
    policy: Arc<RoutePolicy>,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // The layer added last runs first.
    router
        .layer(middleware::from_fn_with_state(policy, policy::enforce))
        .layer(middleware::from_fn_with_state(
            GateState::new(identity),
            gate::gate,
        ))
}
