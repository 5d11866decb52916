//! Resource lookups by identifier.
//!
//! A resource request fetches entities of one kind, either a single one or
//! a batch, optionally asking the service to expand related resources
//! inline.
//!
//! # Wire Format
//!
//! ```json
//! {
//!     "href": "/v1/catalog/us/record-labels?ids=1543411840",
//!     "next": "/v1/catalog/us/record-labels?ids=1543411840&offset=1",
//!     "data": [{ "id": "1543411840", "type": "record-labels", ... }]
//! }
//! ```
//!
//! Items are returned in service order, which need not match the order of
//! the requested identifiers. A lookup without matches may omit `data`
//! entirely; that decodes as an empty collection.

use std::{fmt, marker::PhantomData};

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::{query, Collection, Entity, ItemId, MatchField};
use crate::{
    error::{Error, Result},
    protocol,
    registry::{Properties, PropertyRegistry},
    storefront::Storefront,
};

/// Identifiers to look up.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Lookup {
    One(ItemId),
    Many(Vec<ItemId>),
}

impl Lookup {
    #[must_use]
    pub fn identifiers(&self) -> &[ItemId] {
        match self {
            Self::One(id) => std::slice::from_ref(id),
            Self::Many(ids) => ids,
        }
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<_> = self.identifiers().iter().map(|id| &**id).collect();
        write!(f, "{}", ids.join(","))
    }
}

/// A request for entities of kind `E`.
pub struct ResourceRequest<E> {
    match_field: MatchField,
    lookup: Lookup,
    properties: Properties,
    entity: PhantomData<fn() -> E>,
}

impl<E: Entity> ResourceRequest<E> {
    fn new(match_field: MatchField, lookup: Lookup) -> Self {
        Self {
            match_field,
            lookup,
            properties: Properties::none(),
            entity: PhantomData,
        }
    }

    /// Looks up a single entity by identifier.
    #[must_use]
    pub fn one(id: impl Into<ItemId>) -> Self {
        Self::new(MatchField::Id, Lookup::One(id.into()))
    }

    /// Looks up a batch of entities by identifier.
    ///
    /// # Errors
    ///
    /// Returns a `MalformedRequest` error if `ids` is empty.
    pub fn many<I>(ids: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<ItemId>,
    {
        Self::matching(MatchField::Id, ids)
    }

    /// Looks up a batch of entities by another attribute.
    ///
    /// # Errors
    ///
    /// Returns a `MalformedRequest` error if `values` is empty.
    pub fn matching<I>(match_field: MatchField, values: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<ItemId>,
    {
        let values: Vec<ItemId> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(Error::malformed_request(format!(
                "batch lookup of {} needs at least one identifier",
                E::KIND
            )));
        }

        Ok(Self::new(match_field, Lookup::Many(values)))
    }

    /// Sets the properties to expand.
    #[must_use]
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    #[must_use]
    pub fn lookup(&self) -> &Lookup {
        &self.lookup
    }

    #[must_use]
    pub fn match_field(&self) -> &MatchField {
        &self.match_field
    }

    #[must_use]
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Checks that the identifiers and match field can be sent as is.
    ///
    /// # Errors
    ///
    /// Returns a `MalformedRequest` error if an identifier is empty or
    /// contains `,`, or the filter field is empty.
    pub fn validate(&self) -> Result<()> {
        query::check_lookup(&self.match_field, self.lookup.identifiers())
    }

    /// Resolves the requested properties to their wire keywords.
    ///
    /// # Errors
    ///
    /// Returns an `UnsupportedProperty` error if a property is not
    /// registered for `E`.
    pub fn extend(&self, registry: &PropertyRegistry) -> Result<Vec<&'static str>> {
        registry.resolve(E::KIND, &self.properties)
    }

    /// Builds the request URL for `storefront` with resolved `extend`
    /// keywords.
    ///
    /// # Errors
    ///
    /// Returns a `MalformedRequest` error if [`ResourceRequest::validate`]
    /// fails or the base URL cannot take a path.
    pub fn url(&self, base_url: &Url, storefront: &Storefront, extend: &[&str]) -> Result<Url> {
        query::resource_url(
            base_url,
            storefront,
            E::KIND,
            &self.match_field,
            self.lookup.identifiers(),
            extend,
        )
    }
}

// Not derived: `E` itself need not be `Clone` or `Debug`.
impl<E> Clone for ResourceRequest<E> {
    fn clone(&self) -> Self {
        Self {
            match_field: self.match_field.clone(),
            lookup: self.lookup.clone(),
            properties: self.properties.clone(),
            entity: PhantomData,
        }
    }
}

impl<E: Entity> fmt::Debug for ResourceRequest<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRequest")
            .field("kind", &E::KIND)
            .field("match_field", &self.match_field)
            .field("lookup", &self.lookup)
            .field("properties", &self.properties)
            .finish()
    }
}

/// Outer envelope of a resource response.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,

    #[serde(default)]
    href: Option<String>,

    #[serde(default)]
    next: Option<String>,
}

/// Decodes a resource response body into entities of kind `E`.
///
/// # Errors
///
/// Returns a `Decode` error if the body is not JSON, or if `data` is
/// present but not an array of `E`.
pub fn decode<E: Entity>(body: &[u8]) -> Result<Collection<E>> {
    let envelope: Envelope = protocol::json(body, E::KIND.keyword())?;

    let data = match envelope.data {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| Error::decode(format!("{} `data`: {e}", E::KIND)))?,
    };

    Ok(Collection {
        data,
        href: envelope.href,
        next: envelope.next,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        protocol::catalog::{RecordLabel, Song},
        registry::Property,
    };

    fn base_url() -> Url {
        Url::parse("https://api.music.apple.com").unwrap()
    }

    #[test]
    fn empty_batch_is_malformed() {
        let err = ResourceRequest::<RecordLabel>::many(Vec::<ItemId>::new()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedRequest);
    }

    #[test]
    fn single_lookup_url() {
        let request = ResourceRequest::<RecordLabel>::one("1543411840")
            .with_properties(Properties::All);
        let extend = request.extend(&PropertyRegistry::default()).unwrap();
        let url = request
            .url(&base_url(), &"gb".parse().unwrap(), &extend)
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.music.apple.com/v1/catalog/gb/record-labels?ids=1543411840&extend=latest-releases,top-releases"
        );
    }

    #[test]
    fn filter_lookup_url() {
        let request = ResourceRequest::<Song>::matching(
            MatchField::Filter("isrc".to_owned()),
            ["USUM71900001", "USUM71900002"],
        )
        .unwrap();
        let url = request.url(&base_url(), &"us".parse().unwrap(), &[]).unwrap();

        assert_eq!(url.path(), "/v1/catalog/us/songs");
        assert_eq!(url.query(), Some("filter[isrc]=USUM71900001,USUM71900002"));
    }

    #[test]
    fn single_lookup_stays_single() {
        // `1,2` would otherwise go out as a batch of two.
        let request = ResourceRequest::<RecordLabel>::one("1,2");
        assert_eq!(request.validate().unwrap_err().kind, ErrorKind::MalformedRequest);
        let err = request.url(&base_url(), &"us".parse().unwrap(), &[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedRequest);
    }

    #[test]
    fn unregistered_property_is_rejected() {
        let request = ResourceRequest::<RecordLabel>::one("1")
            .with_properties(Properties::from([Property::Station]));
        let err = request.extend(&PropertyRegistry::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedProperty);
    }

    #[test]
    fn decode_keeps_service_order() {
        let labels = decode::<RecordLabel>(
            br#"{"data":[{"id":"2","type":"record-labels"},{"id":"1","type":"record-labels"}],"next":"/v1/catalog/us/record-labels?offset=2"}"#,
        )
        .unwrap();

        let ids: Vec<_> = labels.iter().map(|label| label.id.to_string()).collect();
        assert_eq!(ids, ["2", "1"]);
        assert!(labels.has_next());
    }

    #[test]
    fn missing_data_decodes_empty() {
        for body in [&b"{}"[..], br#"{"data":null}"#, br#"{"data":[]}"#] {
            assert!(decode::<Song>(body).unwrap().is_empty());
        }
    }

    #[test]
    fn malformed_data_is_decode_error() {
        let err = decode::<Song>(br#"{"data":{"id":"1"}}"#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Decode);
        assert!(err.to_string().contains("`data`"), "{err}");

        let err = decode::<Song>(br#"{"data":[{"type":"songs"}]}"#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Decode);
    }
}
