//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API used by
//! sprandcli: the OAuth 2.0 PKCE authentication flow and the production
//! implementation of the [`crate::catalog::CatalogGateway`] trait.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI, Generator Engine)
//!          ↓
//! Catalog Gateway trait (crate::catalog)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 PKCE)
//!     └── SpotifyGateway (tracks, albums, artists, playlists, playback)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Error handling
//!
//! The gateway handles rate limiting by respecting `Retry-After` on 429
//! responses (waiting for delays up to 120 seconds) and retries 502 Bad
//! Gateway responses after a 10-second delay. 404 responses are mapped to
//! [`crate::catalog::GatewayError::NotFound`] so the aggregator can report
//! inaccessible playlists; all other failures propagate as HTTP/API errors
//! for the engine to absorb or surface per its own policy.
//!
//! ## API Coverage
//!
//! - `GET /playlists/{id}/tracks` - playlist entries with pagination
//! - `GET /tracks/{id}` - track details and available markets
//! - `GET /albums/{id}/tracks` - album track listings with pagination
//! - `GET /artists/{id}/top-tracks` - artist top tracks per market
//! - `GET /artists/{id}/albums` - artist discography with pagination
//! - `POST /users/{user_id}/playlists` - playlist creation
//! - `POST /playlists/{id}/tracks` - playlist population
//! - `GET /me/player/devices`, `PUT /me/player/{shuffle,repeat,play}` -
//!   playback control for the autoplay feature
//! - `POST /api/token` - token exchange and refresh (see [`auth`])

pub mod auth;
mod gateway;

pub use gateway::SpotifyGateway;
