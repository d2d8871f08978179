use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tokio::{sync::Mutex, time::sleep};

use crate::{
    catalog::{
        ArtistRef, CatalogGateway, CreatedPlaylist, GatewayError, PlaylistTrackEntry, TrackDetail,
    },
    config,
    management::TokenManager,
    types::{
        AddTracksRequest, AlbumTracksResponse, ArtistAlbumsResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, DevicesResponse, PlaylistItemsResponse, StartPlaybackRequest,
        TopTracksResponse, TrackResponse,
    },
    warning,
};

/// Production [`CatalogGateway`] backed by the Spotify Web API.
///
/// Holds the reqwest client and the token manager; the token is refreshed
/// proactively before each request when close to expiry. All listing
/// endpoints follow Spotify's `next` URLs until exhausted, so callers always
/// receive fully materialized sequences.
pub struct SpotifyGateway {
    client: Client,
    token: Mutex<TokenManager>,
    user_id: String,
}

impl SpotifyGateway {
    /// Loads the cached token and builds a gateway for the configured user.
    ///
    /// Fails when no token cache exists; the caller should direct the user
    /// to `sprandcli auth`.
    pub async fn load() -> Result<Self, String> {
        let token_mgr = TokenManager::load().await?;
        Ok(Self {
            client: Client::new(),
            token: Mutex::new(token_mgr),
            user_id: config::spotify_user(),
        })
    }

    async fn bearer(&self) -> String {
        self.token.lock().await.get_valid_token().await
    }

    /// GET with the standard retry policy: honor Retry-After on 429
    /// (up to 120 seconds), retry 502 after 10 seconds, map 404 to NotFound.
    async fn get(&self, api_url: &str) -> Result<Response, GatewayError> {
        loop {
            let token = self.bearer().await;
            let response = self.client.get(api_url).bearer_auth(token).send().await;

            let response = match response {
                Ok(resp) => {
                    if resp.status() == StatusCode::NOT_FOUND {
                        return Err(GatewayError::NotFound);
                    }
                    if resp.status() == StatusCode::TOO_MANY_REQUESTS {
                        if let Some(retry_after) = resp.headers().get("retry-after") {
                            let retry_after = retry_after
                                .to_str()
                                .unwrap_or("0")
                                .parse::<u64>()
                                .unwrap_or(0);
                            if retry_after <= 120 {
                                sleep(Duration::from_secs(retry_after)).await;
                                continue; // retry
                            }
                            warning!(
                                "Retry after has reached an abnormal high of {} seconds.",
                                retry_after
                            );
                        }
                    }
                    match resp.error_for_status() {
                        Ok(valid_response) => valid_response,
                        Err(err) => {
                            if let Some(status) = err.status() {
                                if status == StatusCode::BAD_GATEWAY {
                                    sleep(Duration::from_secs(10)).await;
                                    continue; // retry
                                }
                                return Err(GatewayError::Api(status.as_u16()));
                            }
                            return Err(GatewayError::Http(err));
                        }
                    }
                }
                Err(err) => return Err(GatewayError::Http(err)), // network or reqwest error
            };

            return Ok(response);
        }
    }

    async fn check(response: Response) -> Result<Response, GatewayError> {
        if response.status() == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound);
        }
        match response.error_for_status() {
            Ok(valid_response) => Ok(valid_response),
            Err(err) => match err.status() {
                Some(status) => Err(GatewayError::Api(status.as_u16())),
                None => Err(GatewayError::Http(err)),
            },
        }
    }

    async fn put(&self, api_url: &str) -> Result<(), GatewayError> {
        let token = self.bearer().await;
        let response = self.client.put(api_url).bearer_auth(token).send().await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogGateway for SpotifyGateway {
    async fn playlist_track_entries(
        &self,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistTrackEntry>, GatewayError> {
        let mut entries = Vec::new();
        let mut next = Some(format!(
            "{uri}/playlists/{id}/tracks?additional_types=track&limit=100",
            uri = &config::spotify_apiurl(),
            id = playlist_id
        ));

        while let Some(api_url) = next {
            let response = self.get(&api_url).await?;
            let page = response.json::<PlaylistItemsResponse>().await?;

            for item in page.items {
                if let Some(track) = item.track {
                    entries.push(PlaylistTrackEntry {
                        id: track.id,
                        is_local: track.is_local,
                    });
                }
            }
            next = page.next;
        }

        Ok(entries)
    }

    async fn track(&self, track_id: &str) -> Result<TrackDetail, GatewayError> {
        let api_url = format!(
            "{uri}/tracks/{id}",
            uri = &config::spotify_apiurl(),
            id = track_id
        );
        let response = self.get(&api_url).await?;
        let json = response.json::<TrackResponse>().await?;

        Ok(TrackDetail {
            name: json.name,
            artists: json
                .artists
                .into_iter()
                .map(|a| ArtistRef {
                    id: a.id,
                    name: a.name,
                })
                .collect(),
            album_id: json.album.id,
            available_markets: json.available_markets,
        })
    }

    async fn album_track_ids(&self, album_id: &str) -> Result<Vec<String>, GatewayError> {
        let mut track_ids = Vec::new();
        let mut next = Some(format!(
            "{uri}/albums/{id}/tracks?limit=50",
            uri = &config::spotify_apiurl(),
            id = album_id
        ));

        while let Some(api_url) = next {
            let response = self.get(&api_url).await?;
            let page = response.json::<AlbumTracksResponse>().await?;
            track_ids.extend(page.items.into_iter().filter_map(|t| t.id));
            next = page.next;
        }

        Ok(track_ids)
    }

    async fn artist_top_track_ids(
        &self,
        artist_id: &str,
        market: &str,
    ) -> Result<Vec<String>, GatewayError> {
        let api_url = format!(
            "{uri}/artists/{id}/top-tracks?market={market}",
            uri = &config::spotify_apiurl(),
            id = artist_id,
            market = market
        );
        let response = self.get(&api_url).await?;
        let json = response.json::<TopTracksResponse>().await?;

        Ok(json.tracks.into_iter().filter_map(|t| t.id).collect())
    }

    async fn artist_album_ids(
        &self,
        artist_id: &str,
        market: &str,
    ) -> Result<Vec<String>, GatewayError> {
        let mut album_ids = Vec::new();
        let mut next = Some(format!(
            "{uri}/artists/{id}/albums?include_groups=album,single&market={market}&limit=50",
            uri = &config::spotify_apiurl(),
            id = artist_id,
            market = market
        ));

        while let Some(api_url) = next {
            let response = self.get(&api_url).await?;
            let page = response.json::<ArtistAlbumsResponse>().await?;
            album_ids.extend(page.items.into_iter().filter_map(|a| a.id));
            next = page.next;
        }

        Ok(album_ids)
    }

    async fn create_playlist(&self, name: &str) -> Result<CreatedPlaylist, GatewayError> {
        let api_url = format!(
            "{uri}/users/{user}/playlists",
            uri = &config::spotify_apiurl(),
            user = self.user_id
        );
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: "Randomly generated playlist.".to_string(),
            public: false,
            collaborative: false,
        };

        let token = self.bearer().await;
        let response = self
            .client
            .post(&api_url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        let response = Self::check(response).await?;
        let json = response.json::<CreatePlaylistResponse>().await?;

        Ok(CreatedPlaylist {
            id: json.id,
            url: json.external_urls.spotify,
        })
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), GatewayError> {
        let api_url = format!(
            "{uri}/playlists/{id}/tracks",
            uri = &config::spotify_apiurl(),
            id = playlist_id
        );

        // The endpoint accepts at most 100 URIs per request.
        for chunk in track_ids.chunks(100) {
            let body = AddTracksRequest {
                uris: chunk
                    .iter()
                    .map(|id| format!("spotify:track:{}", id))
                    .collect(),
            };

            let token = self.bearer().await;
            let response = self
                .client
                .post(&api_url)
                .bearer_auth(token)
                .json(&body)
                .send()
                .await?;
            Self::check(response).await?;
        }

        Ok(())
    }

    async fn playback_device_ids(&self) -> Result<Vec<String>, GatewayError> {
        let api_url = format!("{uri}/me/player/devices", uri = &config::spotify_apiurl());
        let response = self.get(&api_url).await?;
        let json = response.json::<DevicesResponse>().await?;

        Ok(json.devices.into_iter().filter_map(|d| d.id).collect())
    }

    async fn set_shuffle(&self, device_id: &str, state: bool) -> Result<(), GatewayError> {
        let api_url = format!(
            "{uri}/me/player/shuffle?state={state}&device_id={device}",
            uri = &config::spotify_apiurl(),
            state = state,
            device = device_id
        );
        self.put(&api_url).await
    }

    async fn set_repeat_context(&self, device_id: &str) -> Result<(), GatewayError> {
        let api_url = format!(
            "{uri}/me/player/repeat?state=context&device_id={device}",
            uri = &config::spotify_apiurl(),
            device = device_id
        );
        self.put(&api_url).await
    }

    async fn start_playback(
        &self,
        device_id: &str,
        context_uri: &str,
    ) -> Result<(), GatewayError> {
        let api_url = format!(
            "{uri}/me/player/play?device_id={device}",
            uri = &config::spotify_apiurl(),
            device = device_id
        );
        let body = StartPlaybackRequest {
            context_uri: context_uri.to_string(),
        };

        let token = self.bearer().await;
        let response = self
            .client
            .put(&api_url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
