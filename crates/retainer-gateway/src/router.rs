//! Resource routing: decides whether a request addresses a retained
//! resource and what it intends to do with it.
//!
//! Classification happens once per request, before any authentication.
//! Paths outside `/resources/` and unsupported methods both end in 404, so
//! callers cannot tell a missing route from a refused method.

use axum::http::Method;
use std::fmt;

/// Path prefix marking a request as addressing a retained resource
pub const RESOURCE_PREFIX: &str = "/resources/";

/// Non-empty topic name taken verbatim from the request path
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Topic(String);

impl Topic {
    /// Create a topic, rejecting the empty string
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        if name.is_empty() {
            None
        } else {
            Some(Self(name))
        }
    }

    /// Topic name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resource path for this topic, as sent in `Location`
    pub fn location(&self) -> String {
        format!("{}{}", RESOURCE_PREFIX, self.0)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a request wants to do with a resource
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// GET
    Read,
    /// PUT or POST
    Write,
    /// Anything else; answered with 404 after authentication
    Unsupported,
}

impl Intent {
    /// Classify a method
    pub fn from_method(method: &Method) -> Self {
        if method == Method::GET {
            Self::Read
        } else if method == Method::PUT || method == Method::POST {
            Self::Write
        } else {
            Self::Unsupported
        }
    }
}

/// A request matched against the resource prefix
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceRoute {
    pub intent: Intent,
    pub topic: Topic,
}

/// Routing decision for a request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Resource(ResourceRoute),
    NotAResource,
}

/// Classify a request by method and path.
///
/// `path` must exclude the query string. The topic is the remainder after
/// [`RESOURCE_PREFIX`], used without decoding or normalization.
pub fn classify(method: &Method, path: &str) -> Route {
    let topic = path.strip_prefix(RESOURCE_PREFIX).and_then(Topic::new);

    match topic {
        Some(topic) => Route::Resource(ResourceRoute {
            intent: Intent::from_method(method),
            topic,
        }),
        None => Route::NotAResource,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(intent: Intent, topic: &str) -> Route {
        Route::Resource(ResourceRoute {
            intent,
            topic: Topic::new(topic).unwrap(),
        })
    }

    #[test]
    fn test_method_intents() {
        assert_eq!(classify(&Method::GET, "/resources/hello"), resource(Intent::Read, "hello"));
        assert_eq!(classify(&Method::PUT, "/resources/hello"), resource(Intent::Write, "hello"));
        assert_eq!(classify(&Method::POST, "/resources/hello"), resource(Intent::Write, "hello"));
        assert_eq!(
            classify(&Method::DELETE, "/resources/hello"),
            resource(Intent::Unsupported, "hello")
        );
        assert_eq!(
            classify(&Method::HEAD, "/resources/hello"),
            resource(Intent::Unsupported, "hello")
        );
    }

    #[test]
    fn test_topic_is_verbatim_remainder() {
        assert_eq!(
            classify(&Method::GET, "/resources/home/kitchen/temp"),
            resource(Intent::Read, "home/kitchen/temp")
        );
        assert_eq!(
            classify(&Method::GET, "/resources/a%20b"),
            resource(Intent::Read, "a%20b")
        );
        assert_eq!(
            classify(&Method::GET, "/resources//leading"),
            resource(Intent::Read, "/leading")
        );
    }

    #[test]
    fn test_not_a_resource() {
        for path in ["", "/", "/resources", "/resources/", "/resource/x", "/api/resources/x"] {
            assert_eq!(classify(&Method::GET, path), Route::NotAResource, "path {path:?}");
        }
    }

    #[test]
    fn test_topic_rejects_empty() {
        assert!(Topic::new("").is_none());
        let topic = Topic::new("hello").unwrap();
        assert_eq!(topic.location(), "/resources/hello");
        assert_eq!(topic.to_string(), "hello");
    }
}
