//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, outermost)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions, in-memory store)
//! 4. Auth extractor (`RequireShopSession`) on protected routes

pub mod auth;
pub mod session;

pub use auth::RequireShopSession;
pub use session::create_session_layer;
