//! # Retainer Gateway
//!
//! HTTP gateway exposing a pub/sub broker's retained messages as resources.
//!
//! This crate provides:
//! - **Resource API**: `GET` reads and `PUT`/`POST` writes on `/resources/{topic}`
//! - **Authorization pipeline**: authenticate, authorize, then touch the store
//! - **Pluggable policies**: allow-all by default, access tokens and scopes built in
//! - **CORS**: preflight handling and headers on every response
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   HTTP Clients                      │
//! └─────────────────────────┬───────────────────────────┘
//!                           │
//! ┌─────────────────────────▼───────────────────────────┐
//! │                 Retainer Gateway                    │
//! ├─────────────────────────────────────────────────────┤
//! │    CORS    │  Request ID  │  Logging  │  Router     │
//! ├─────────────────────────────────────────────────────┤
//! │  Authenticate ─► Authorize ─► Store ─► Respond      │
//! ├─────────────────────────────────────────────────────┤
//! │                  retainer-store                     │
//! │        (RetainedStore, EventSink)                   │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod pipeline;
pub mod policy;
pub mod router;
pub mod routes;
pub mod server;
pub mod state;

pub use config::GatewayConfig;
pub use error::{ErrorCode, GatewayError};
pub use pipeline::{Outcome, Success};
pub use policy::{
    AllowAll, AuthError, Authentication, Authenticator, Policies, ReadAuthorizer, Subject,
    WriteAuthorizer,
};
pub use router::{Intent, Topic};
pub use server::{run_server, start, ServerHandle};
pub use state::AppState;
