//! Playlists in the catalog.

use serde::Deserialize;
use url::Url;

use super::{
    album::Track, Artwork, Collection, EditorialNotes, Entity, EntityKind, ItemId, Reference,
};

#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
pub struct Playlist {
    pub id: ItemId,

    #[serde(default)]
    pub href: Option<String>,

    #[serde(default)]
    pub attributes: Option<PlaylistAttributes>,

    #[serde(default)]
    pub relationships: PlaylistRelationships,
}

impl Entity for Playlist {
    const KIND: EntityKind = EntityKind::Playlist;

    fn id(&self) -> &ItemId {
        &self.id
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistAttributes {
    pub name: String,

    #[serde(default)]
    pub artwork: Option<Artwork>,

    #[serde(default)]
    pub curator_name: Option<String>,

    #[serde(default)]
    pub description: Option<EditorialNotes>,

    /// Whether this playlist is itself a chart
    #[serde(default)]
    pub is_chart: bool,

    #[serde(default)]
    pub last_modified_date: Option<String>,

    /// `editorial`, `external`, `personal-mix` or `user-shared`
    #[serde(default)]
    pub playlist_type: Option<String>,

    #[serde(default)]
    pub url: Option<Url>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Deserialize)]
pub struct PlaylistRelationships {
    #[serde(default)]
    pub curator: Option<Collection<Reference>>,

    #[serde(default)]
    pub library: Option<Collection<Reference>>,

    #[serde(default)]
    pub tracks: Option<Collection<Track>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_chart_playlist() {
        let playlist: Playlist = serde_json::from_str(
            r#"{
                "id": "pl.d25f5d1181894928af76c85c967f8f31",
                "type": "playlists",
                "attributes": {
                    "name": "Today's Hits",
                    "curatorName": "Apple Music Hits",
                    "isChart": true,
                    "playlistType": "editorial",
                    "description": {"standard": "The biggest songs right now."}
                },
                "relationships": {
                    "tracks": {"data": [{"id": "1", "type": "songs"}]}
                }
            }"#,
        )
        .unwrap();

        let attributes = playlist.attributes.unwrap();
        assert!(attributes.is_chart);
        assert_eq!(attributes.curator_name.as_deref(), Some("Apple Music Hits"));
        assert_eq!(playlist.relationships.tracks.unwrap()[0].kind(), EntityKind::Song);
    }
}
