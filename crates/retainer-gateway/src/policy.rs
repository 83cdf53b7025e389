//! Authentication and authorization strategies.
//!
//! The gateway asks three independent strategies for a decision on every
//! resource request: who is calling, may they read this topic, may they
//! write this payload to it. Each strategy is optional; [`Policies::default`]
//! installs [`AllowAll`] for all three, which leaves the gateway open.

use crate::router::Topic;
use async_trait::async_trait;
use axum::http::request::Parts;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Failure of a policy backend (as opposed to a denial)
#[derive(Error, Debug)]
pub enum AuthError {
    /// The strategy lacks configuration it needs
    #[error("policy misconfigured: {0}")]
    Misconfigured(String),

    /// The strategy's backend failed to answer
    #[error("policy backend failure: {0}")]
    Backend(String),
}

/// Identity produced by authentication and handed to the authorizers.
///
/// The gateway itself never looks inside a subject.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Subject {
    /// Identity, if the authenticator established one
    pub id: Option<String>,
    /// Granted scopes
    pub scopes: Vec<String>,
    /// Expiration time
    pub expires_at: Option<DateTime<Utc>>,
}

impl Subject {
    /// The empty subject
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Create a subject with an identity and scopes
    pub fn new(id: impl Into<String>, scopes: Vec<String>) -> Self {
        Self {
            id: Some(id.into()),
            scopes,
            expires_at: None,
        }
    }

    /// Set the expiration time
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Check if the subject has expired
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() > at)
    }

    /// Check if the subject holds a scope
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}

/// Result of authenticating a request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Authentication {
    Authenticated(Subject),
    Denied,
}

/// Establishes who is making a request
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Authenticate a request from its head; the body is not available yet.
    async fn authenticate(&self, request: &Parts) -> Result<Authentication, AuthError>;
}

/// Decides whether a subject may read a topic
#[async_trait]
pub trait ReadAuthorizer: Send + Sync {
    async fn authorize_read(&self, subject: &Subject, topic: &Topic) -> Result<bool, AuthError>;
}

/// Decides whether a subject may write a payload to a topic
#[async_trait]
pub trait WriteAuthorizer: Send + Sync {
    /// `payload` is the fully buffered request body.
    async fn authorize_write(
        &self,
        subject: &Subject,
        topic: &Topic,
        payload: &Bytes,
    ) -> Result<bool, AuthError>;
}

/// Strategy that authenticates everybody as [`Subject::anonymous`] and
/// authorizes everything
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

#[async_trait]
impl Authenticator for AllowAll {
    async fn authenticate(&self, _request: &Parts) -> Result<Authentication, AuthError> {
        Ok(Authentication::Authenticated(Subject::anonymous()))
    }
}

#[async_trait]
impl ReadAuthorizer for AllowAll {
    async fn authorize_read(&self, _subject: &Subject, _topic: &Topic) -> Result<bool, AuthError> {
        Ok(true)
    }
}

#[async_trait]
impl WriteAuthorizer for AllowAll {
    async fn authorize_write(
        &self,
        _subject: &Subject,
        _topic: &Topic,
        _payload: &Bytes,
    ) -> Result<bool, AuthError> {
        Ok(true)
    }
}

/// The strategies consulted for each resource request
#[derive(Clone)]
pub struct Policies {
    pub authenticator: Arc<dyn Authenticator>,
    pub read_authorizer: Arc<dyn ReadAuthorizer>,
    pub write_authorizer: Arc<dyn WriteAuthorizer>,
}

impl Default for Policies {
    fn default() -> Self {
        Self {
            authenticator: Arc::new(AllowAll),
            read_authorizer: Arc::new(AllowAll),
            write_authorizer: Arc::new(AllowAll),
        }
    }
}

impl Policies {
    /// Replace the authenticator
    pub fn with_authenticator(mut self, authenticator: impl Authenticator + 'static) -> Self {
        self.authenticator = Arc::new(authenticator);
        self
    }

    /// Replace the read authorizer
    pub fn with_read_authorizer(mut self, authorizer: impl ReadAuthorizer + 'static) -> Self {
        self.read_authorizer = Arc::new(authorizer);
        self
    }

    /// Replace the write authorizer
    pub fn with_write_authorizer(mut self, authorizer: impl WriteAuthorizer + 'static) -> Self {
        self.write_authorizer = Arc::new(authorizer);
        self
    }
}
