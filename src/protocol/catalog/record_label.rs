//! Record labels in the catalog.
//!
//! Record labels carry no relationships. Their releases come back as
//! views, which are only populated when requested through property
//! expansion (`latest-releases`, `top-releases`).
//!
//! # Wire Format
//!
//! ```json
//! {
//!     "id": "1543411840",
//!     "type": "record-labels",
//!     "attributes": {
//!         "name": "Label Name",
//!         "description": { "standard": "..." },
//!         "artwork": { "url": "https://.../{w}x{h}bb.jpg" },
//!         "url": "https://music.apple.com/us/label/1543411840"
//!     },
//!     "views": {
//!         "latest-releases": { "data": [...] },
//!         "top-releases": { "data": [...] }
//!     }
//! }
//! ```

use serde::Deserialize;
use url::Url;

use super::{Album, Artwork, Collection, EditorialNotes, Entity, EntityKind, ItemId};

/// A collection of record labels.
pub type RecordLabels = Collection<RecordLabel>;

#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
pub struct RecordLabel {
    pub id: ItemId,

    #[serde(default)]
    pub href: Option<String>,

    #[serde(default)]
    pub attributes: Option<RecordLabelAttributes>,

    #[serde(default)]
    pub views: RecordLabelViews,
}

impl Entity for RecordLabel {
    const KIND: EntityKind = EntityKind::RecordLabel;

    fn id(&self) -> &ItemId {
        &self.id
    }
}

impl RecordLabel {
    /// The label name, if attributes were returned.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.attributes.as_ref().map(|attributes| attributes.name.as_str())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Deserialize)]
pub struct RecordLabelAttributes {
    pub name: String,

    #[serde(default)]
    pub artwork: Option<Artwork>,

    #[serde(default)]
    pub description: Option<EditorialNotes>,

    #[serde(default)]
    pub url: Option<Url>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RecordLabelViews {
    #[serde(default)]
    pub latest_releases: Option<Collection<Album>>,

    #[serde(default)]
    pub top_releases: Option<Collection<Album>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_views() {
        let label: RecordLabel = serde_json::from_str(
            r#"{
                "id": "1543411840",
                "type": "record-labels",
                "attributes": {
                    "name": "Label Name",
                    "description": {"standard": "About the label."}
                },
                "views": {
                    "latest-releases": {"data": [{"id": "1", "type": "albums"}, {"id": "2", "type": "albums"}]},
                    "top-releases": {"data": []}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(label.name(), Some("Label Name"));
        assert_eq!(label.views.latest_releases.unwrap().len(), 2);
        assert!(label.views.top_releases.unwrap().is_empty());
    }

    #[test]
    fn views_absent_without_expansion() {
        let label: RecordLabel =
            serde_json::from_str(r#"{"id": "1543411840", "attributes": {"name": "Label Name"}}"#)
                .unwrap();
        assert_eq!(label.views, RecordLabelViews::default());
    }
}
