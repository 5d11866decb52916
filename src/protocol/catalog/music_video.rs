//! Music videos in the catalog.

use std::time::Duration;

use serde::Deserialize;
use serde_with::{serde_as, DurationMilliSeconds};
use url::Url;

use super::{Album, Artwork, Collection, Entity, EntityKind, ItemId, Preview, Reference, Song};

#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
pub struct MusicVideo {
    pub id: ItemId,

    #[serde(default)]
    pub href: Option<String>,

    #[serde(default)]
    pub attributes: Option<MusicVideoAttributes>,

    #[serde(default)]
    pub relationships: MusicVideoRelationships,
}

impl Entity for MusicVideo {
    const KIND: EntityKind = EntityKind::MusicVideo;

    fn id(&self) -> &ItemId {
        &self.id
    }
}

#[serde_as]
#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicVideoAttributes {
    pub name: String,

    #[serde(default)]
    pub artist_name: String,

    #[serde(default)]
    pub album_name: Option<String>,

    #[serde(default)]
    pub artwork: Option<Artwork>,

    #[serde(default)]
    pub content_rating: Option<String>,

    #[serde(rename = "durationInMillis")]
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    pub duration: Option<Duration>,

    #[serde(default)]
    pub genre_names: Vec<String>,

    #[serde(default)]
    #[serde(rename = "has4K")]
    pub has_4k: bool,

    #[serde(default)]
    #[serde(rename = "hasHDR")]
    pub has_hdr: bool,

    #[serde(default)]
    pub isrc: Option<String>,

    #[serde(default)]
    pub previews: Vec<Preview>,

    #[serde(default)]
    pub release_date: Option<String>,

    #[serde(default)]
    pub url: Option<Url>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Deserialize)]
pub struct MusicVideoRelationships {
    #[serde(default)]
    pub albums: Option<Collection<Album>>,

    #[serde(default)]
    pub artists: Option<Collection<Reference>>,

    #[serde(default)]
    pub genres: Option<Collection<Reference>>,

    #[serde(default)]
    pub library: Option<Collection<Reference>>,

    #[serde(default)]
    pub songs: Option<Collection<Song>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_video_flags() {
        let video: MusicVideo = serde_json::from_str(
            r#"{
                "id": "1445036431",
                "type": "music-videos",
                "attributes": {
                    "name": "Video Title",
                    "artistName": "Artist Name",
                    "has4K": true,
                    "hasHDR": false,
                    "durationInMillis": 240500
                }
            }"#,
        )
        .unwrap();

        let attributes = video.attributes.unwrap();
        assert!(attributes.has_4k);
        assert!(!attributes.has_hdr);
        assert_eq!(attributes.duration, Some(Duration::from_millis(240_500)));
    }
}
