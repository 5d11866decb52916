//! Albums in the catalog.
//!
//! Album and playlist track lists may mix songs and music videos, so they
//! are decoded as [`Track`]s, tagged by the entity `type`.

use serde::Deserialize;
use url::Url;

use super::{
    Artwork, Collection, EditorialNotes, Entity, EntityKind, ItemId, MusicVideo, RecordLabel,
    Reference, Song,
};

#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
pub struct Album {
    pub id: ItemId,

    #[serde(default)]
    pub href: Option<String>,

    #[serde(default)]
    pub attributes: Option<AlbumAttributes>,

    #[serde(default)]
    pub relationships: AlbumRelationships,
}

impl Entity for Album {
    const KIND: EntityKind = EntityKind::Album;

    fn id(&self) -> &ItemId {
        &self.id
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumAttributes {
    pub name: String,

    #[serde(default)]
    pub artist_name: String,

    #[serde(default)]
    pub artwork: Option<Artwork>,

    #[serde(default)]
    pub content_rating: Option<String>,

    #[serde(default)]
    pub copyright: Option<String>,

    #[serde(default)]
    pub editorial_notes: Option<EditorialNotes>,

    #[serde(default)]
    pub genre_names: Vec<String>,

    #[serde(default)]
    pub is_complete: bool,

    #[serde(default)]
    pub is_single: bool,

    /// Name of the releasing label, as printed
    #[serde(default)]
    pub record_label: Option<String>,

    #[serde(default)]
    pub release_date: Option<String>,

    #[serde(default)]
    pub track_count: Option<u32>,

    #[serde(default)]
    pub upc: Option<String>,

    #[serde(default)]
    pub url: Option<Url>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AlbumRelationships {
    #[serde(default)]
    pub artists: Option<Collection<Reference>>,

    #[serde(default)]
    pub genres: Option<Collection<Reference>>,

    #[serde(default)]
    pub library: Option<Collection<Reference>>,

    #[serde(default)]
    pub record_labels: Option<Collection<RecordLabel>>,

    #[serde(default)]
    pub tracks: Option<Collection<Track>>,
}

/// An item of a track list.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(tag = "type")]
pub enum Track {
    #[serde(rename = "songs")]
    Song(Song),

    #[serde(rename = "music-videos")]
    MusicVideo(MusicVideo),
}

impl Track {
    #[must_use]
    pub fn id(&self) -> &ItemId {
        match self {
            Self::Song(song) => song.id(),
            Self::MusicVideo(video) => video.id(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Song(_) => Song::KIND,
            Self::MusicVideo(_) => MusicVideo::KIND,
        }
    }
}
