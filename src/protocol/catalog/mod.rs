//! Catalog entities and the shapes that carry them.
//!
//! The catalog service answers in a uniform resource format. Every entity
//! is an object with an `id`, an `href`, optional `attributes`, and
//! optional `relationships` or `views` that hold further entities:
//!
//! ```json
//! {
//!     "id": "1440881047",
//!     "type": "albums",
//!     "href": "/v1/catalog/us/albums/1440881047",
//!     "attributes": { "name": "...", "artistName": "..." },
//!     "relationships": { "tracks": { "href": "...", "data": [...] } }
//! }
//! ```
//!
//! Lists of entities, whether a resource lookup, a relationship, or one
//! chart segment, are decoded into a [`Collection`].
//!
//! # Entity Kinds
//!
//! [`EntityKind`] is the closed set of catalog types this crate knows. Each
//! kind has exactly one wire keyword, used both in query parameters and as
//! the response key under which entities of that kind are returned.

pub mod album;
pub mod charts;
pub mod music_video;
pub mod playlist;
pub mod query;
pub mod record_label;
pub mod resource;
pub mod song;

pub use album::{Album, Track};
pub use charts::{Chart, ChartRequest, ChartResponse};
pub use music_video::MusicVideo;
pub use playlist::Playlist;
pub use query::MatchField;
pub use record_label::{RecordLabel, RecordLabels};
pub use resource::{Lookup, ResourceRequest};
pub use song::Song;

use std::{fmt, ops::Deref, str::FromStr};

use serde::Deserialize;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use url::Url;

use crate::error::Error;

/// Catalog entity types.
///
/// Adding a kind means adding a variant here and its keyword in
/// [`EntityKind::keyword`]; the match there keeps the table total.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
)]
pub enum EntityKind {
    Album,
    MusicVideo,
    Playlist,
    RecordLabel,
    Song,
}

impl EntityKind {
    const ALBUMS: &'static str = "albums";
    const MUSIC_VIDEOS: &'static str = "music-videos";
    const PLAYLISTS: &'static str = "playlists";
    const RECORD_LABELS: &'static str = "record-labels";
    const SONGS: &'static str = "songs";

    /// All known kinds.
    pub const ALL: [Self; 5] = [
        Self::Album,
        Self::MusicVideo,
        Self::Playlist,
        Self::RecordLabel,
        Self::Song,
    ];

    /// Kinds the service publishes charts for.
    pub const CHARTS: [Self; 4] = [Self::Album, Self::MusicVideo, Self::Playlist, Self::Song];

    /// The wire keyword of this kind, e.g. `music-videos`.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Album => Self::ALBUMS,
            Self::MusicVideo => Self::MUSIC_VIDEOS,
            Self::Playlist => Self::PLAYLISTS,
            Self::RecordLabel => Self::RECORD_LABELS,
            Self::Song => Self::SONGS,
        }
    }

    /// Whether charts can be requested for this kind.
    #[must_use]
    pub fn is_chartable(self) -> bool {
        Self::CHARTS.contains(&self)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.keyword() == s)
            .ok_or_else(|| Error::malformed_request(format!("unknown entity kind `{s}`")))
    }
}

/// A catalog entity that can be decoded from the service.
pub trait Entity: for<'de> Deserialize<'de> + fmt::Debug + Clone + Send + Sync + 'static {
    /// The kind this entity is returned as.
    const KIND: EntityKind;

    /// The catalog identifier of this entity.
    fn id(&self) -> &ItemId;
}

/// A catalog identifier, opaque to this crate.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl Deref for ItemId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// An ordered, homogeneous list of entities.
///
/// Items keep the order the service returned them in. `next` points at a
/// further page when the service truncated the list; it is surfaced but
/// never followed.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
pub struct Collection<T> {
    /// Items in service order
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,

    /// Location of this collection
    #[serde(default)]
    pub href: Option<String>,

    /// Location of the next page, if any
    #[serde(default)]
    pub next: Option<String>,
}

impl<T> Collection<T> {
    /// Whether the service has more items than were returned.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            href: None,
            next: None,
        }
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(data: Vec<T>) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }
}

impl<T> Deref for Collection<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

/// A reference to a related resource that this crate does not model, such
/// as an artist, genre or station.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
pub struct Reference {
    pub id: ItemId,

    #[serde(rename = "type")]
    pub typ: String,

    #[serde(default)]
    pub href: Option<String>,
}

/// Artwork of an entity.
///
/// The `url` is a template with `{w}` and `{h}` placeholders.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    pub url: String,

    #[serde(default)]
    pub width: Option<u32>,

    #[serde(default)]
    pub height: Option<u32>,

    /// Average background color as a hex string
    #[serde(default)]
    pub bg_color: Option<String>,

    #[serde(default)]
    pub text_color1: Option<String>,

    #[serde(default)]
    pub text_color2: Option<String>,
}

impl Artwork {
    /// Fills in the template for the given resolution.
    #[must_use]
    pub fn url(&self, width: u32, height: u32) -> String {
        self.url
            .replace("{w}", &width.to_string())
            .replace("{h}", &height.to_string())
    }
}

/// Editorial text attached to an entity.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Deserialize)]
pub struct EditorialNotes {
    #[serde(default)]
    pub standard: Option<String>,

    #[serde(default)]
    pub short: Option<String>,

    #[serde(default)]
    pub tagline: Option<String>,
}

/// A preview clip of a song or music video.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
pub struct Preview {
    pub url: Url,
}
