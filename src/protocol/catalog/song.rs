//! Songs in the catalog.
//!
//! # Wire Format
//!
//! ```json
//! {
//!     "id": "1440881330",
//!     "type": "songs",
//!     "href": "/v1/catalog/us/songs/1440881330",
//!     "attributes": {
//!         "name": "Song Title",
//!         "artistName": "Artist Name",
//!         "albumName": "Album Title",
//!         "durationInMillis": 215000,
//!         "genreNames": ["Pop", "Music"],
//!         "isrc": "USUM71900001",
//!         "releaseDate": "2019-05-17"
//!     }
//! }
//! ```

use std::time::Duration;

use serde::Deserialize;
use serde_with::{serde_as, DurationMilliSeconds};
use url::Url;

use super::{
    Album, Artwork, Collection, Entity, EntityKind, ItemId, MusicVideo, Preview, Reference,
};

#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
pub struct Song {
    pub id: ItemId,

    #[serde(default)]
    pub href: Option<String>,

    /// Absent when the song is only referenced from another entity
    #[serde(default)]
    pub attributes: Option<SongAttributes>,

    #[serde(default)]
    pub relationships: SongRelationships,
}

impl Entity for Song {
    const KIND: EntityKind = EntityKind::Song;

    fn id(&self) -> &ItemId {
        &self.id
    }
}

#[serde_as]
#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongAttributes {
    pub name: String,

    #[serde(default)]
    pub artist_name: String,

    #[serde(default)]
    pub album_name: Option<String>,

    #[serde(default)]
    pub artwork: Option<Artwork>,

    #[serde(default)]
    pub composer_name: Option<String>,

    #[serde(default)]
    pub content_rating: Option<String>,

    #[serde(default)]
    pub disc_number: Option<u32>,

    #[serde(rename = "durationInMillis")]
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    pub duration: Option<Duration>,

    #[serde(default)]
    pub genre_names: Vec<String>,

    #[serde(default)]
    pub has_lyrics: bool,

    #[serde(default)]
    pub isrc: Option<String>,

    #[serde(default)]
    pub previews: Vec<Preview>,

    /// `YYYY-MM-DD`, or just `YYYY` for some older releases
    #[serde(default)]
    pub release_date: Option<String>,

    #[serde(default)]
    pub track_number: Option<u32>,

    #[serde(default)]
    pub url: Option<Url>,
}

/// Relationships a song can be expanded with.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SongRelationships {
    #[serde(default)]
    pub albums: Option<Collection<Album>>,

    #[serde(default)]
    pub artists: Option<Collection<Reference>>,

    #[serde(default)]
    pub composers: Option<Collection<Reference>>,

    #[serde(default)]
    pub genres: Option<Collection<Reference>>,

    #[serde(default)]
    pub library: Option<Collection<Reference>>,

    #[serde(default)]
    pub music_videos: Option<Collection<MusicVideo>>,

    #[serde(default)]
    pub station: Option<Collection<Reference>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_full_song() {
        let song: Song = serde_json::from_str(
            r#"{
                "id": "1440881330",
                "type": "songs",
                "href": "/v1/catalog/us/songs/1440881330",
                "attributes": {
                    "name": "Song Title",
                    "artistName": "Artist Name",
                    "albumName": "Album Title",
                    "durationInMillis": 215000,
                    "genreNames": ["Pop", "Music"],
                    "hasLyrics": true,
                    "previews": [{"url": "https://audio-ssl.itunes.apple.com/preview.m4a"}]
                },
                "relationships": {
                    "albums": {"href": "/v1/catalog/us/songs/1440881330/albums", "data": [{"id": "1440881047", "type": "albums"}]}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(song.id(), &ItemId::from("1440881330"));
        let attributes = song.attributes.unwrap();
        assert_eq!(attributes.duration, Some(Duration::from_millis(215_000)));
        assert_eq!(attributes.genre_names, ["Pop", "Music"]);
        assert!(attributes.has_lyrics);
        assert_eq!(attributes.previews.len(), 1);

        let albums = song.relationships.albums.unwrap();
        assert_eq!(&*albums[0].id, "1440881047");
        assert!(albums[0].attributes.is_none());
    }

    #[test]
    fn decode_reference_only() {
        let song: Song = serde_json::from_str(r#"{"id": "1", "type": "songs"}"#).unwrap();
        assert!(song.attributes.is_none());
        assert_eq!(song.relationships, SongRelationships::default());
    }
}
