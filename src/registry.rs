//! Property expansion for catalog requests.
//!
//! A request can ask the service to resolve related resources inline, such
//! as the tracks of an album or the latest releases of a record label.
//! Which properties exist depends on the entity kind, so every request is
//! checked against a [`PropertyRegistry`] before it is built. An unknown
//! property is an error rather than silently dropped: the caller would
//! otherwise wait for a relationship that never arrives.
//!
//! # Example
//!
//! ```rust
//! use musicatalog::{
//!     protocol::catalog::EntityKind,
//!     registry::{Properties, Property, PropertyRegistry},
//! };
//!
//! let registry = PropertyRegistry::default();
//!
//! let keywords = registry.resolve(EntityKind::RecordLabel, &Properties::All)?;
//! assert_eq!(keywords, ["latest-releases", "top-releases"]);
//!
//! let requested = Properties::from([Property::Tracks]);
//! assert!(registry.resolve(EntityKind::RecordLabel, &requested).is_err());
//! ```

use std::{
    collections::{btree_map::Entry, BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};

use crate::{
    error::{Error, Result},
    protocol::catalog::EntityKind,
};

/// A relationship or view the service can resolve inline.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Property {
    Albums,
    Artists,
    Composers,
    Curator,
    Genres,
    LatestReleases,
    Library,
    MusicVideos,
    RecordLabels,
    Songs,
    Station,
    TopReleases,
    Tracks,
}

impl Property {
    pub const ALL: [Self; 13] = [
        Self::Albums,
        Self::Artists,
        Self::Composers,
        Self::Curator,
        Self::Genres,
        Self::LatestReleases,
        Self::Library,
        Self::MusicVideos,
        Self::RecordLabels,
        Self::Songs,
        Self::Station,
        Self::TopReleases,
        Self::Tracks,
    ];

    /// The wire keyword of this property, e.g. `latest-releases`.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Albums => "albums",
            Self::Artists => "artists",
            Self::Composers => "composers",
            Self::Curator => "curator",
            Self::Genres => "genres",
            Self::LatestReleases => "latest-releases",
            Self::Library => "library",
            Self::MusicVideos => "music-videos",
            Self::RecordLabels => "record-labels",
            Self::Songs => "songs",
            Self::Station => "station",
            Self::TopReleases => "top-releases",
            Self::Tracks => "tracks",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

impl FromStr for Property {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|property| property.keyword() == s)
            .ok_or_else(|| Error::unsupported_property(format!("unknown property `{s}`")))
    }
}

/// The properties a request asks to expand.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Properties {
    /// Exactly these properties; empty means no expansion.
    Specific(BTreeSet<Property>),

    /// Every property registered for the kind at the time of the request.
    All,
}

impl Properties {
    /// No expansion.
    #[must_use]
    pub fn none() -> Self {
        Self::Specific(BTreeSet::new())
    }
}

impl Default for Properties {
    fn default() -> Self {
        Self::none()
    }
}

impl FromIterator<Property> for Properties {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        Self::Specific(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Property; N]> for Properties {
    fn from(properties: [Property; N]) -> Self {
        properties.into_iter().collect()
    }
}

/// Which properties each entity kind supports.
///
/// Built once and then shared read-only, typically behind an `Arc`.
/// Registration takes `&mut self`, so concurrent registration is ruled out
/// by the borrow checker; registering a kind twice is an error so that
/// independently written entity modules cannot clobber each other.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PropertyRegistry {
    properties: BTreeMap<EntityKind, BTreeSet<Property>>,
}

impl PropertyRegistry {
    /// Creates a registry without any kinds.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            properties: BTreeMap::new(),
        }
    }

    /// Registers the properties of a kind.
    ///
    /// # Errors
    ///
    /// Returns an `AlreadyExists` error if `kind` is already registered.
    pub fn register<I>(&mut self, kind: EntityKind, properties: I) -> Result<()>
    where
        I: IntoIterator<Item = Property>,
    {
        match self.properties.entry(kind) {
            Entry::Occupied(_) => Err(Error::already_exists(format!(
                "properties of {kind} are already registered"
            ))),
            Entry::Vacant(entry) => {
                let properties = entry.insert(properties.into_iter().collect());
                trace!("registered properties of {kind}: {properties:?}");
                Ok(())
            }
        }
    }

    /// Whether `kind` has been registered.
    #[must_use]
    pub fn contains(&self, kind: EntityKind) -> bool {
        self.properties.contains_key(&kind)
    }

    /// All properties registered for `kind`; empty if it is not registered.
    #[must_use]
    pub fn all_properties(&self, kind: EntityKind) -> BTreeSet<Property> {
        self.properties.get(&kind).cloned().unwrap_or_default()
    }

    /// Resolves requested properties to their wire keywords.
    ///
    /// [`Properties::All`] is expanded against the registry as it is now.
    /// Keywords are returned sorted and without duplicates.
    ///
    /// # Errors
    ///
    /// Returns an `UnsupportedProperty` error if a requested property is
    /// not registered for `kind`.
    pub fn resolve(&self, kind: EntityKind, requested: &Properties) -> Result<Vec<&'static str>> {
        let registered = self.properties.get(&kind);

        let keywords: BTreeSet<_> = match requested {
            Properties::All => registered
                .into_iter()
                .flatten()
                .map(|property| property.keyword())
                .collect(),
            Properties::Specific(properties) => properties
                .iter()
                .map(|property| {
                    if registered.is_some_and(|registered| registered.contains(property)) {
                        Ok(property.keyword())
                    } else {
                        Err(Error::unsupported_property(format!(
                            "`{property}` is not a property of {kind}"
                        )))
                    }
                })
                .collect::<Result<_>>()?,
        };

        Ok(keywords.into_iter().collect())
    }
}

impl Default for PropertyRegistry {
    /// Creates a registry with the properties the catalog service supports.
    #[allow(clippy::enum_glob_use)]
    fn default() -> Self {
        use Property::*;

        let known = [
            (
                EntityKind::Album,
                vec![Artists, Genres, Library, RecordLabels, Tracks],
            ),
            (
                EntityKind::MusicVideo,
                vec![Albums, Artists, Genres, Library, Songs],
            ),
            (EntityKind::Playlist, vec![Curator, Library, Tracks]),
            (EntityKind::RecordLabel, vec![LatestReleases, TopReleases]),
            (
                EntityKind::Song,
                vec![
                    Albums,
                    Artists,
                    Composers,
                    Genres,
                    Library,
                    MusicVideos,
                    Station,
                ],
            ),
        ];

        Self {
            properties: known
                .into_iter()
                .map(|(kind, properties)| (kind, properties.into_iter().collect()))
                .collect(),
        }
    }
}
