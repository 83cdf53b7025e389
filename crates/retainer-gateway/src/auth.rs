//! Access-token authentication and scope-based authorization

use crate::policy::{
    AuthError, Authentication, Authenticator, ReadAuthorizer, Subject, WriteAuthorizer,
};
use crate::router::Topic;
use async_trait::async_trait;
use axum::http::{header, request::Parts};
use bytes::Bytes;
use chrono::DateTime;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Query parameter accepted as an alternative to the Authorization header
pub const ACCESS_TOKEN_PARAM: &str = "access_token";

/// Scope granting every operation on every topic
pub const WILDCARD_SCOPE: &str = "*";

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time
    pub exp: i64,
    /// Issued at
    pub iat: Option<i64>,
    /// Space separated scopes, e.g. `read:sensors/# write:sensors/+/cmd`
    #[serde(default)]
    pub scope: String,
}

/// Validate a JWT token and extract claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    decode::<Claims>(token, &key, &validation).map(|data| data.claims)
}

/// Convert claims to a subject
pub fn claims_to_subject(claims: Claims) -> Subject {
    let scopes = claims.scope.split_whitespace().map(str::to_string).collect();
    let subject = Subject::new(claims.sub, scopes);

    match DateTime::from_timestamp(claims.exp, 0) {
        Some(expires_at) => subject.with_expiry(expires_at),
        None => subject,
    }
}

/// Extract bearer token from Authorization header
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("bearer "))
}

/// Find the access token of a request: Authorization header first, then
/// the `access_token` query parameter
fn request_token(request: &Parts) -> Option<&str> {
    if let Some(header) = request
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        return extract_bearer_token(header);
    }

    request.uri.query().and_then(|query| {
        query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(name, _)| *name == ACCESS_TOKEN_PARAM)
            .map(|(_, value)| value)
    })
}

/// Authenticates requests carrying an HS256 access token
#[derive(Clone, Debug, Default)]
pub struct JwtAuthenticator {
    secret: Option<String>,
}

impl JwtAuthenticator {
    /// Create an authenticator; without a secret every attempt is an error
    pub fn new(secret: Option<String>) -> Self {
        Self { secret }
    }
}

#[async_trait]
impl Authenticator for JwtAuthenticator {
    async fn authenticate(&self, request: &Parts) -> Result<Authentication, AuthError> {
        let secret = self
            .secret
            .as_deref()
            .ok_or_else(|| AuthError::Misconfigured("JWT secret not configured".to_string()))?;

        let Some(token) = request_token(request) else {
            tracing::debug!("no access token presented");
            return Ok(Authentication::Denied);
        };

        match validate_token(token, secret) {
            Ok(claims) => {
                let subject = claims_to_subject(claims);
                if subject.is_expired() {
                    return Ok(Authentication::Denied);
                }
                Ok(Authentication::Authenticated(subject))
            }
            Err(e) => {
                tracing::debug!("Token validation failed: {}", e);
                Ok(Authentication::Denied)
            }
        }
    }
}

/// Match a topic against an MQTT-style filter.
///
/// `+` matches exactly one level, `#` matches the remaining levels
/// (including none) and may only appear last.
pub fn topic_matches(filter: &str, topic: &str) -> bool {
    let mut levels = topic.split('/');

    for part in filter.split('/') {
        match part {
            "#" => return true,
            "+" => {
                if levels.next().is_none() {
                    return false;
                }
            }
            literal => {
                if levels.next() != Some(literal) {
                    return false;
                }
            }
        }
    }

    levels.next().is_none()
}

/// Grants reads for `read:<filter>` scopes and writes for `write:<filter>`
/// scopes; [`WILDCARD_SCOPE`] grants both
#[derive(Clone, Copy, Debug, Default)]
pub struct ScopeAuthorizer;

impl ScopeAuthorizer {
    fn permits(subject: &Subject, action: &str, topic: &Topic) -> bool {
        if subject.has_scope(WILDCARD_SCOPE) {
            return true;
        }
        subject.scopes.iter().any(|scope| {
            scope
                .strip_prefix(action)
                .and_then(|rest| rest.strip_prefix(':'))
                .is_some_and(|filter| topic_matches(filter, topic.as_str()))
        })
    }
}

#[async_trait]
impl ReadAuthorizer for ScopeAuthorizer {
    async fn authorize_read(&self, subject: &Subject, topic: &Topic) -> Result<bool, AuthError> {
        Ok(Self::permits(subject, "read", topic))
    }
}

#[async_trait]
impl WriteAuthorizer for ScopeAuthorizer {
    async fn authorize_write(
        &self,
        subject: &Subject,
        topic: &Topic,
        _payload: &Bytes,
    ) -> Result<bool, AuthError> {
        Ok(Self::permits(subject, "write", topic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn create_test_token(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(scope: &str, expires_in: Duration) -> Claims {
        Claims {
            sub: "user123".to_string(),
            exp: (Utc::now() + expires_in).timestamp(),
            iat: Some(Utc::now().timestamp()),
            scope: scope.to_string(),
        }
    }

    fn parts(uri: &str, authorization: Option<&str>) -> Parts {
        let mut builder = Request::get(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_validate_token() {
        let token = create_test_token(&claims("read:#", Duration::hours(1)), SECRET);
        let validated = validate_token(&token, SECRET).unwrap();

        assert_eq!(validated.sub, "user123");
        assert!(validate_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_expired_token() {
        let token = create_test_token(&claims("", -Duration::hours(1)), SECRET);
        assert!(validate_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_claims_to_subject() {
        let subject = claims_to_subject(claims("read:a/# write:a/b", Duration::hours(1)));

        assert_eq!(subject.id.as_deref(), Some("user123"));
        assert_eq!(subject.scopes, vec!["read:a/#", "write:a/b"]);
        assert!(!subject.is_expired());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("Basic xyz"), None);
    }

    #[tokio::test]
    async fn test_jwt_authenticator_header_and_query() {
        let auth = JwtAuthenticator::new(Some(SECRET.to_string()));
        let token = create_test_token(&claims("read:#", Duration::hours(1)), SECRET);

        let from_header = auth
            .authenticate(&parts("/resources/x", Some(&format!("Bearer {token}"))))
            .await
            .unwrap();
        assert!(matches!(from_header, Authentication::Authenticated(_)));

        let from_query = auth
            .authenticate(&parts(&format!("/resources/x?access_token={token}"), None))
            .await
            .unwrap();
        assert!(matches!(from_query, Authentication::Authenticated(ref s) if s.id.as_deref() == Some("user123")));
    }

    #[tokio::test]
    async fn test_jwt_authenticator_denials() {
        let auth = JwtAuthenticator::new(Some(SECRET.to_string()));

        let missing = auth.authenticate(&parts("/resources/x", None)).await.unwrap();
        assert_eq!(missing, Authentication::Denied);

        let garbage = auth
            .authenticate(&parts("/resources/x", Some("Bearer not-a-jwt")))
            .await
            .unwrap();
        assert_eq!(garbage, Authentication::Denied);

        let wrong_scheme = auth
            .authenticate(&parts("/resources/x", Some("Basic dXNlcjpwYXNz")))
            .await
            .unwrap();
        assert_eq!(wrong_scheme, Authentication::Denied);
    }

    #[tokio::test]
    async fn test_jwt_authenticator_without_secret_errors() {
        let auth = JwtAuthenticator::new(None);
        let result = auth.authenticate(&parts("/resources/x", None)).await;

        assert!(matches!(result, Err(AuthError::Misconfigured(_))));
    }

    #[test]
    fn test_topic_matches() {
        assert!(topic_matches("hello", "hello"));
        assert!(!topic_matches("hello", "hello/world"));
        assert!(topic_matches("home/+/temp", "home/kitchen/temp"));
        assert!(!topic_matches("home/+/temp", "home/kitchen/humidity"));
        assert!(!topic_matches("home/+", "home"));
        assert!(topic_matches("home/#", "home"));
        assert!(topic_matches("home/#", "home/a/b/c"));
        assert!(topic_matches("#", "anything/at/all"));
        assert!(!topic_matches("home/kitchen", "home"));
    }

    #[tokio::test]
    async fn test_scope_authorizer() {
        let subject = Subject::new(
            "user",
            vec!["read:sensors/#".to_string(), "write:sensors/+/cmd".to_string()],
        );
        let reading = Topic::new("sensors/1/temp").unwrap();
        let command = Topic::new("sensors/1/cmd").unwrap();
        let other = Topic::new("lights/1").unwrap();

        assert!(ScopeAuthorizer.authorize_read(&subject, &reading).await.unwrap());
        assert!(!ScopeAuthorizer.authorize_read(&subject, &other).await.unwrap());
        assert!(ScopeAuthorizer
            .authorize_write(&subject, &command, &Bytes::new())
            .await
            .unwrap());
        assert!(!ScopeAuthorizer
            .authorize_write(&subject, &reading, &Bytes::new())
            .await
            .unwrap());

        let admin = Subject::new("admin", vec![WILDCARD_SCOPE.to_string()]);
        assert!(ScopeAuthorizer
            .authorize_write(&admin, &other, &Bytes::new())
            .await
            .unwrap());

        assert!(!ScopeAuthorizer
            .authorize_read(&Subject::anonymous(), &reading)
            .await
            .unwrap());
    }
}
