//! The authorization pipeline.
//!
//! Every resource request runs the same stages in order, stopping at the
//! first failure:
//!
//! ```text
//! authenticate ─► authorize (read | write) ─► store operation ─► respond
//!                                                   │
//!                                                   └─► emit event (writes)
//! ```
//!
//! No stage starts before the previous one has produced its result, so a
//! store operation never happens without a successful authorization, and an
//! authorization never happens without a successful authentication.

use crate::error::GatewayError;
use crate::policy::{Authentication, Subject};
use crate::router::{Intent, ResourceRoute, Topic};
use crate::state::AppState;
use axum::{
    body::Body,
    http::{header, request::Parts, Request, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures::StreamExt;
use retainer_store::{RetainedEvent, RetainedRecord};
use tracing::{debug, error, info, warn};

/// Successful pipeline result
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Success {
    /// Payload of the first retained record for the topic
    Read(Bytes),
    /// The topic's retained record was replaced
    Written(Topic),
}

impl IntoResponse for Success {
    fn into_response(self) -> Response {
        match self {
            Self::Read(payload) => (StatusCode::OK, payload).into_response(),
            Self::Written(topic) => (
                StatusCode::NO_CONTENT,
                [(header::LOCATION, topic.location())],
                (),
            )
                .into_response(),
        }
    }
}

/// Terminal result of one request through the pipeline
pub type Outcome = Result<Success, GatewayError>;

/// Run a routed resource request through the pipeline
pub async fn process(state: &AppState, route: ResourceRoute, request: Request<Body>) -> Outcome {
    let (parts, body) = request.into_parts();

    // Authentication runs exactly once, whatever the method.
    let subject = authenticate(state, &parts).await?;

    match route.intent {
        Intent::Read => read_resource(state, &subject, route.topic).await,
        Intent::Write => {
            let payload = buffer_body(body, state.config.max_body_size).await?;
            write_resource(state, &subject, route.topic, payload).await
        }
        Intent::Unsupported => {
            debug!(method = %parts.method, topic = %route.topic, "method not handled");
            Err(GatewayError::RouteNotFound)
        }
    }
}

async fn authenticate(state: &AppState, parts: &Parts) -> Result<Subject, GatewayError> {
    match state.policies.authenticator.authenticate(parts).await {
        Ok(Authentication::Authenticated(subject)) => Ok(subject),
        Ok(Authentication::Denied) => {
            info!("authentication denied");
            Err(GatewayError::Unauthenticated)
        }
        Err(e) => {
            warn!(error = %e, "authentication error");
            Err(GatewayError::Authentication(e))
        }
    }
}

async fn read_resource(state: &AppState, subject: &Subject, topic: Topic) -> Outcome {
    match state.policies.read_authorizer.authorize_read(subject, &topic).await {
        Ok(true) => {}
        Ok(false) => {
            info!(topic = %topic, "not authorized");
            return Err(GatewayError::Unauthorized);
        }
        Err(e) => {
            warn!(error = %e, topic = %topic, "read authorization error");
            return Err(GatewayError::Authorization(e));
        }
    }

    // Only the first retained record is served.
    let mut records = state.store.lookup(topic.as_str());
    match records.next().await {
        Some(Ok(record)) => Ok(Success::Read(record.payload)),
        Some(Err(e)) => {
            error!(error = %e, topic = %topic, "retained lookup failed");
            Err(GatewayError::Store(e))
        }
        None => Err(GatewayError::RecordNotFound(topic.to_string())),
    }
}

/// Buffer the whole request body; an absent body becomes an empty payload
async fn buffer_body(body: Body, limit: usize) -> Result<Bytes, GatewayError> {
    axum::body::to_bytes(body, limit).await.map_err(|e| {
        warn!(error = %e, "failed to read request body");
        GatewayError::Body(e)
    })
}

async fn write_resource(state: &AppState, subject: &Subject, topic: Topic, payload: Bytes) -> Outcome {
    match state
        .policies
        .write_authorizer
        .authorize_write(subject, &topic, &payload)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            info!(topic = %topic, "not authorized");
            return Err(GatewayError::Unauthorized);
        }
        Err(e) => {
            warn!(error = %e, topic = %topic, "write authorization error");
            return Err(GatewayError::Authorization(e));
        }
    }

    let record = RetainedRecord::new(topic.as_str(), payload.clone());
    if let Err(e) = state.store.write(record).await {
        error!(error = %e, topic = %topic, "retained write failed");
        return Err(GatewayError::Store(e));
    }

    debug!(topic = %topic, size = payload.len(), "retained record updated");
    state.events.emit(RetainedEvent::new(topic.as_str(), payload));

    Ok(Success::Written(topic))
}
