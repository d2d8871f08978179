//! # API Module
//!
//! HTTP endpoints for the local callback server used during authentication.
//!
//! - [`callback`] - handles the OAuth callback from Spotify's authorization
//!   server and completes the PKCE token exchange
//! - [`health`] - returns application status and version for quick checks
//!
//! Both endpoints are plain async functions wired into an [`axum`] router by
//! [`crate::server::start_api_server`].

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
