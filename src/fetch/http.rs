//! HTTP host adapter
//!
//! Talks to the hosted batch thumbnail endpoints over reqwest. Each call
//! sends one comma-joined id list plus a size string and deserializes the
//! `{ data: [...] }` envelope the host wraps every batch response in.

use super::{
    FetchError, FetchResult, FetcherCapabilities, ThumbnailFetcher, ThumbnailResult,
    ThumbnailState,
};
use serde::Deserialize;
use url::Url;

/// reqwest-backed host adapter
///
/// The three endpoints live under one base URL:
///
/// - `v1/games/multiget/thumbnails` — wide game tiles, nested per universe
/// - `v1/games/icons` — square game icons, flat entries
/// - `v1/users/avatar-headshot` — avatar headshots, flat entries
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base: Url,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Vec<T>,
}

/// Flat response entry used by the icon and avatar endpoints
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEntry {
    target_id: u64,
    state: ThumbnailState,
    #[serde(default)]
    image_url: Option<String>,
}

/// Per-universe entry of the game thumbnail endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireGameSet {
    universe_id: u64,
    #[serde(default)]
    thumbnails: Vec<WireGameThumbnail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireGameThumbnail {
    state: ThumbnailState,
    #[serde(default)]
    image_url: Option<String>,
}

fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl From<WireEntry> for ThumbnailResult {
    fn from(entry: WireEntry) -> Self {
        Self {
            target_id: entry.target_id,
            state: entry.state,
            image_url: entry.image_url,
        }
    }
}

/// The game thumbnail endpoint nests several shots per universe; the
/// loader binds one image per entity, so take the lead shot.
fn flatten_game_sets(sets: Vec<WireGameSet>) -> Vec<ThumbnailResult> {
    sets.into_iter()
        .filter_map(|set| {
            set.thumbnails.into_iter().next().map(|thumb| ThumbnailResult {
                target_id: set.universe_id,
                state: thumb.state,
                image_url: thumb.image_url,
            })
        })
        .collect()
}

impl HttpFetcher {
    /// Create an adapter rooted at `base_url`
    pub fn new(base_url: &str) -> FetchResult<Self> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create an adapter with a caller-supplied client (proxies, timeouts)
    pub fn with_client(client: reqwest::Client, base_url: &str) -> FetchResult<Self> {
        let base =
            Url::parse(base_url).map_err(|error| FetchError::InvalidBaseUrl(error.to_string()))?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> FetchResult<Url> {
        self.base
            .join(path)
            .map_err(|error| FetchError::InvalidBaseUrl(error.to_string()))
    }

    async fn get_envelope<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> FetchResult<Vec<T>> {
        let url = self.endpoint(path)?;
        let envelope: Envelope<T> = self
            .client
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(envelope.data)
    }
}

#[async_trait::async_trait]
impl ThumbnailFetcher for HttpFetcher {
    fn capabilities(&self) -> FetcherCapabilities {
        FetcherCapabilities::all()
    }

    async fn fetch_game_thumbnails(
        &self,
        universe_ids: &[u64],
        size: &str,
    ) -> FetchResult<Vec<ThumbnailResult>> {
        let ids = join_ids(universe_ids);
        let sets: Vec<WireGameSet> = self
            .get_envelope(
                "v1/games/multiget/thumbnails",
                &[
                    ("universeIds", ids.as_str()),
                    ("size", size),
                    ("format", "Png"),
                ],
            )
            .await?;
        Ok(flatten_game_sets(sets))
    }

    async fn fetch_game_icons(
        &self,
        universe_ids: &[u64],
        size: &str,
    ) -> FetchResult<Vec<ThumbnailResult>> {
        let ids = join_ids(universe_ids);
        let entries: Vec<WireEntry> = self
            .get_envelope(
                "v1/games/icons",
                &[
                    ("universeIds", ids.as_str()),
                    ("size", size),
                    ("format", "Png"),
                ],
            )
            .await?;
        Ok(entries.into_iter().map(Into::into).collect())
    }

    async fn fetch_user_avatars(
        &self,
        user_ids: &[u64],
        size: &str,
    ) -> FetchResult<Vec<ThumbnailResult>> {
        let ids = join_ids(user_ids);
        let entries: Vec<WireEntry> = self
            .get_envelope(
                "v1/users/avatar-headshot",
                &[
                    ("userIds", ids.as_str()),
                    ("size", size),
                    ("format", "Png"),
                    ("isCircular", "false"),
                ],
            )
            .await?;
        Ok(entries.into_iter().map(Into::into).collect())
    }

    fn adapter_name(&self) -> &'static str {
        "Http"
    }
}
