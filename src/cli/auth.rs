use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{spotify, types::PkceToken};

/// Runs the PKCE authorization flow for the `auth` subcommand.
///
/// The shared state is filled in by the callback server once Spotify
/// redirects back; all the actual work lives in [`spotify::auth`].
pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) {
    spotify::auth::auth(shared_state).await;
}
