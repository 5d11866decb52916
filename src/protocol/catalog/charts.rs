//! Catalog charts.
//!
//! A chart request names the entity kinds to chart, optionally narrowed to
//! a genre and capped in size. The service may answer with several charts
//! per kind (e.g. `most-played` and `top`), each an ordered list.
//!
//! # Wire Format
//!
//! ```json
//! {
//!     "results": {
//!         "songs": [{
//!             "chart": "most-played",
//!             "name": "Top Songs",
//!             "orderId": "most-played:songs",
//!             "href": "/v1/catalog/us/charts?types=songs&chart=most-played",
//!             "next": "/v1/catalog/us/charts?types=songs&chart=most-played&offset=20",
//!             "data": [...]
//!         }],
//!         "albums": [...],
//!         "playlists": [...],
//!         "music-videos": [...]
//!     }
//! }
//! ```
//!
//! The service only includes keys for kinds it has results for, so an
//! absent key decodes as no charts. A key that is present but not an array
//! of charts is a decode error.

use std::{collections::BTreeSet, num::NonZeroU32, ops::Deref};

use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use super::{query, Album, Collection, Entity, EntityKind, ItemId, MusicVideo, Playlist, Song};
use crate::{
    error::{Error, Result},
    protocol,
    storefront::Storefront,
};

/// A request for one or more catalog charts.
///
/// Immutable once built: kinds are deduplicated and kept sorted.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ChartRequest {
    kinds: BTreeSet<EntityKind>,
    genre: Option<ItemId>,
    limit: Option<NonZeroU32>,
}

impl ChartRequest {
    /// Creates a request for charts of the given kinds.
    ///
    /// # Errors
    ///
    /// Returns a `MalformedRequest` error if `kinds` is empty or contains a
    /// kind the service does not chart.
    pub fn new<I>(kinds: I) -> Result<Self>
    where
        I: IntoIterator<Item = EntityKind>,
    {
        let kinds: BTreeSet<_> = kinds.into_iter().collect();
        if kinds.is_empty() {
            return Err(Error::malformed_request(
                "chart request needs at least one kind",
            ));
        }

        if let Some(kind) = kinds.iter().find(|kind| !kind.is_chartable()) {
            return Err(Error::malformed_request(format!("{kind} are not charted")));
        }

        Ok(Self {
            kinds,
            genre: None,
            limit: None,
        })
    }

    /// Narrows the charts to a genre.
    ///
    /// # Errors
    ///
    /// Returns a `MalformedRequest` error if `genre` is empty.
    pub fn with_genre(mut self, genre: impl Into<ItemId>) -> Result<Self> {
        let genre = genre.into();
        if genre.is_empty() {
            return Err(Error::malformed_request("genre must not be empty"));
        }

        self.genre = Some(genre);
        Ok(self)
    }

    /// Caps the number of items per chart.
    #[must_use]
    pub fn with_limit(mut self, limit: NonZeroU32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn kinds(&self) -> &BTreeSet<EntityKind> {
        &self.kinds
    }

    #[must_use]
    pub fn genre(&self) -> Option<&ItemId> {
        self.genre.as_ref()
    }

    #[must_use]
    pub fn limit(&self) -> Option<NonZeroU32> {
        self.limit
    }

    /// Builds the request URL for `storefront`.
    ///
    /// # Errors
    ///
    /// Returns a `MalformedRequest` error if the base URL cannot take a path.
    pub fn url(&self, base_url: &Url, storefront: &Storefront) -> Result<Url> {
        query::chart_url(
            base_url,
            storefront,
            &self.kinds,
            self.genre.as_ref(),
            self.limit,
        )
    }
}

/// One ranked chart of a single entity kind.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chart<T> {
    /// Chart identifier, e.g. `most-played`
    pub chart: String,

    /// Display name, e.g. "Top Songs"
    pub name: String,

    #[serde(default)]
    pub order_id: Option<String>,

    /// Ranked items
    #[serde(flatten)]
    pub items: Collection<T>,
}

impl<T> Deref for Chart<T> {
    type Target = Collection<T>;

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

/// The charts returned for a [`ChartRequest`].
///
/// Kinds that were not requested, or that the service had no charts for,
/// are empty.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct ChartResponse {
    pub songs: Vec<Chart<Song>>,
    pub playlists: Vec<Chart<Playlist>>,
    pub music_videos: Vec<Chart<MusicVideo>>,
    pub albums: Vec<Chart<Album>>,
}

/// Outer envelope of a chart response.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    results: Option<Map<String, Value>>,
}

impl ChartResponse {
    /// Whether no charts were returned at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
            && self.playlists.is_empty()
            && self.music_videos.is_empty()
            && self.albums.is_empty()
    }

    /// Decodes a chart response body.
    ///
    /// # Errors
    ///
    /// Returns a `Decode` error if the body is not JSON, or if a key is
    /// present with the wrong shape. The message names the failing key.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let envelope: Envelope = protocol::json(body, "charts")?;
        let mut results = envelope.results.unwrap_or_default();

        let response = Self {
            songs: charts_of(&mut results)?,
            playlists: charts_of(&mut results)?,
            music_videos: charts_of(&mut results)?,
            albums: charts_of(&mut results)?,
        };

        if !results.is_empty() {
            let keys: Vec<_> = results.keys().collect();
            debug!("charts: ignoring unknown keys {keys:?}");
        }

        Ok(response)
    }
}

/// Takes the charts of `T` out of the results.
///
/// Absence and presence are handled separately: a missing or `null` key is
/// no charts, anything else must decode.
fn charts_of<T: Entity>(results: &mut Map<String, Value>) -> Result<Vec<Chart<T>>> {
    let key = T::KIND.keyword();
    match results.remove(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| Error::decode(format!("charts `{key}`: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn request_collapses_duplicates() {
        let request = ChartRequest::new([
            EntityKind::Song,
            EntityKind::Album,
            EntityKind::Song,
        ])
        .unwrap();
        assert_eq!(request.kinds().len(), 2);
    }

    #[test]
    fn request_rejects_empty_and_unchartable() {
        let err = ChartRequest::new([]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedRequest);

        let err = ChartRequest::new([EntityKind::Song, EntityKind::RecordLabel]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedRequest);
    }

    #[test]
    fn request_url() {
        let request = ChartRequest::new([EntityKind::Song, EntityKind::Album])
            .unwrap()
            .with_genre("1234")
            .unwrap()
            .with_limit(NonZeroU32::new(5).unwrap());

        let url = request
            .url(
                &Url::parse("https://api.music.apple.com").unwrap(),
                &"us".parse().unwrap(),
            )
            .unwrap();
        assert_eq!(url.query(), Some("types=albums,songs&genre=1234&limit=5"));
    }

    #[test]
    fn empty_genre_is_rejected() {
        let err = ChartRequest::new([EntityKind::Song])
            .unwrap()
            .with_genre("")
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedRequest);
    }

    #[test]
    fn missing_keys_decode_empty() {
        let response = ChartResponse::from_slice(
            br#"{"results":{"songs":[{"chart":"most-played","name":"Top Songs","data":[{"id":"1","type":"songs","attributes":{"name":"One"}}]}]}}"#,
        )
        .unwrap();

        assert_eq!(response.songs.len(), 1);
        assert_eq!(response.songs[0].chart, "most-played");
        assert_eq!(response.songs[0].len(), 1);
        assert!(response.playlists.is_empty());
        assert!(response.music_videos.is_empty());
        assert!(response.albums.is_empty());
    }

    #[test]
    fn hyphenated_key_decodes() {
        let response = ChartResponse::from_slice(
            br#"{"results":{"music-videos":[{"chart":"most-played","name":"Top Music Videos","data":[]}]}}"#,
        )
        .unwrap();
        assert_eq!(response.music_videos.len(), 1);
        assert!(response.music_videos[0].is_empty());
    }

    #[test]
    fn empty_results_decode_empty() {
        for body in [&br#"{"results":{}}"#[..], br#"{}"#, br#"{"results":{"albums":null}}"#] {
            let response = ChartResponse::from_slice(body).unwrap();
            assert!(response.is_empty());
            assert_eq!(response, ChartResponse::default());
        }
    }

    #[test]
    fn wrong_shape_is_decode_error() {
        let err = ChartResponse::from_slice(br#"{"results":{"songs":"oops"}}"#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Decode);
        assert!(err.to_string().contains("`songs`"), "{err}");

        let err = ChartResponse::from_slice(br#"{"results":[]}"#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Decode);

        let err = ChartResponse::from_slice(b"not json").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Decode);
    }

    #[test]
    fn responses_compare_structurally() {
        let body = br#"{"results":{"albums":[{"chart":"most-played","name":"Top Albums","next":"/v1/catalog/us/charts?offset=20","data":[{"id":"1440881047","type":"albums"}]}]}}"#;
        let left = ChartResponse::from_slice(body).unwrap();
        let right = ChartResponse::from_slice(body).unwrap();
        assert_eq!(left, right);
        assert!(left.albums[0].has_next());
    }
}
