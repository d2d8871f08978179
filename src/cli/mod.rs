//! # CLI Module
//!
//! This module provides the command-line interface layer for sprandcli, a
//! Spotify API client that generates randomized playlists from the user's
//! own playlists. Each submodule implements one user-facing command and
//! coordinates between the gateway, the generation engine, and user
//! interaction.
//!
//! ## Commands
//!
//! - [`auth`] - initiates the Spotify OAuth authentication flow with PKCE
//! - [`generate`] - runs one playlist generation end to end, with a
//!   determinate progress bar driven by the engine's progress callback
//! - [`featured`] - lists the configured featured playlists
//!
//! ## Data Flow
//!
//! ```text
//! CLI Layer (argument handling, progress bar, result presentation)
//!     ↓
//! Generator Engine (crate::generator)
//!     ↓
//! Catalog Gateway (crate::spotify)
//!     ↓
//! Spotify Web API
//! ```
//!
//! The generate command spawns the engine run on its own tokio task so the
//! progress-reporting context never blocks on catalog calls; the
//! `indicatif::ProgressBar` handle is cloneable and thread-safe, which makes
//! it a valid progress callback target from the worker task.
//!
//! ## Usage Patterns
//!
//! ```bash
//! sprandcli auth                            # Authenticate with Spotify
//! sprandcli generate                        # 15 songs from the reference playlists
//! sprandcli generate --songs 30 --play      # bigger playlist, start playback
//! sprandcli featured                        # list featured playlists
//! sprandcli generate --featured 2           # generate from featured playlist #2
//! ```

mod auth;
mod featured;
mod generate;

pub use auth::auth;
pub use featured::featured;
pub use generate::generate;
