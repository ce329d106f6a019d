//! Axum router wiring, per node role.
//!
//! Every role serves the ops routes; the role picks which component surface
//! is mounted beside them. The dispatcher has no surface of its own (its
//! consumers are background tasks), so it serves ops only.

use axum::routing::{get, post};
use axum::Router;

use crate::config::NodeRole;
use crate::{agent, app_state::AppState, broker, controller, functions, ops, trigger};

pub fn build_router(state: AppState) -> Router {
    let role_routes = match state.cfg().node.role {
        NodeRole::Broker => Router::new()
            .route("/publish/:topic", post(broker::http::publish))
            .route("/subscribe/:topic", get(broker::http::subscribe)),
        NodeRole::Controller => Router::new()
            .route("/ack/:topic", post(controller::http::ack))
            .route("/pending/:topic", get(controller::http::pending))
            // Static routes (ops included) win over this capture.
            .route("/:level", get(controller::http::level)),
        NodeRole::Trigger => Router::new().route("/trigger", get(trigger::handle)),
        NodeRole::Functions => Router::new()
            .route("/fn/:name", get(functions::http::invoke).post(functions::http::invoke)),
        NodeRole::Agent => Router::new().route("/use_score", get(agent::use_score)),
        NodeRole::Dispatcher => Router::new(),
    };

    role_routes
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
