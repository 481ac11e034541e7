//! Fallback transport router.
//!
//! Delivers a logical request through an ordered list of routes until one
//! succeeds or all are exhausted. Attempts are strictly sequential and
//! stateless: no route is tried twice within one `send`, and nothing from a
//! failed attempt carries into the next one. Every successful body passes
//! through the relay-envelope transform before being returned.

use reqwest::Method;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::dispatch::HttpDispatch;
use crate::envelope::unwrap_relay_envelope;
use crate::routes::Route;
use swapkit_core::SwapError;

/// A logical request: the target URL plus everything needed to reproduce
/// the call identically on any route.
#[derive(Clone, Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

/// Outcome of one route attempt. Logged for observability, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Succeeded,
    HttpStatus(u16),
    TransportError(String),
    TimedOut,
    BadPayload(String),
}

#[derive(Debug, Clone)]
pub struct RouteAttempt {
    pub route: String,
    pub outcome: AttemptOutcome,
}

pub struct TransportRouter {
    dispatch: Arc<dyn HttpDispatch>,
    routes: Vec<Route>,
    attempt_timeout: Duration,
}

impl TransportRouter {
    pub fn new(
        dispatch: Arc<dyn HttpDispatch>,
        routes: Vec<Route>,
        attempt_timeout: Duration,
    ) -> Self {
        Self {
            dispatch,
            routes,
            attempt_timeout,
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Deliver `request` through the configured routes in order.
    ///
    /// Returns the parsed (and envelope-unwrapped) JSON payload of the first
    /// successful attempt, or `AllRoutesExhausted` once every route has
    /// failed or timed out.
    pub async fn send(&self, request: &ApiRequest) -> Result<serde_json::Value, SwapError> {
        let mut attempts: Vec<RouteAttempt> = Vec::with_capacity(self.routes.len());

        for route in &self.routes {
            let concrete = route.resolve(&request.url);
            tracing::debug!(route = route.label(), url = %request.url, "attempting transport route");

            let outcome = timeout(
                self.attempt_timeout,
                self.dispatch.execute_json(
                    request.method.clone(),
                    &concrete,
                    &request.headers,
                    request.body.as_ref(),
                ),
            )
            .await;

            let reply = match outcome {
                Err(_) => {
                    tracing::warn!(route = route.label(), "route attempt timed out");
                    attempts.push(RouteAttempt {
                        route: route.label().to_string(),
                        outcome: AttemptOutcome::TimedOut,
                    });
                    continue;
                }
                Ok(Err(e)) => {
                    tracing::warn!(route = route.label(), error = %e, "route attempt failed");
                    attempts.push(RouteAttempt {
                        route: route.label().to_string(),
                        outcome: AttemptOutcome::TransportError(e.to_string()),
                    });
                    continue;
                }
                Ok(Ok(reply)) => reply,
            };

            if !reply.is_success() {
                tracing::warn!(
                    route = route.label(),
                    status = reply.status,
                    "route returned non-success status"
                );
                attempts.push(RouteAttempt {
                    route: route.label().to_string(),
                    outcome: AttemptOutcome::HttpStatus(reply.status),
                });
                continue;
            }

            let parsed: serde_json::Value = match serde_json::from_str(&reply.body) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(route = route.label(), error = %e, "route body was not JSON");
                    attempts.push(RouteAttempt {
                        route: route.label().to_string(),
                        outcome: AttemptOutcome::BadPayload(e.to_string()),
                    });
                    continue;
                }
            };

            match unwrap_relay_envelope(parsed) {
                Ok(value) => {
                    attempts.push(RouteAttempt {
                        route: route.label().to_string(),
                        outcome: AttemptOutcome::Succeeded,
                    });
                    tracing::debug!(
                        route = route.label(),
                        attempts = attempts.len(),
                        "transport route succeeded"
                    );
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(
                        route = route.label(),
                        error = %e,
                        "relay envelope held invalid JSON"
                    );
                    attempts.push(RouteAttempt {
                        route: route.label().to_string(),
                        outcome: AttemptOutcome::BadPayload(e.to_string()),
                    });
                    continue;
                }
            }
        }

        let failed: Vec<&str> = attempts.iter().map(|a| a.route.as_str()).collect();
        tracing::warn!(routes = ?failed, "all transport routes exhausted");
        Err(SwapError::AllRoutesExhausted {
            attempts: attempts.len(),
        })
    }
}
