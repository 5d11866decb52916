//! Request URL construction.
//!
//! Builds the fully-qualified URLs of catalog queries:
//!
//! ```text
//! GET /v1/catalog/{storefront}/charts?types={csv}&genre={id}&limit={n}
//! GET /v1/catalog/{storefront}/{kind}?ids={csv}&extend={csv}
//! GET /v1/catalog/{storefront}/{kind}?filter[{field}]={csv}&extend={csv}
//! ```
//!
//! Builders are pure. Entity kinds are written in keyword order, whatever
//! order they were requested in, so equal requests produce byte-identical
//! URLs. Optional parameters are omitted when unset.
//!
//! Each value is percent-encoded on its own and lists are joined with a
//! literal `,`, so the separator is never encoded. A value that itself
//! contains `,` is refused: it would turn one identifier into several.

use std::{collections::BTreeSet, num::NonZeroU32};

use url::{form_urlencoded, Url};

use super::{EntityKind, ItemId};
use crate::{
    error::{Error, Result},
    storefront::Storefront,
};

/// How a resource request selects entities.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum MatchField {
    /// By catalog identifier, sent as `ids`.
    #[default]
    Id,

    /// By another attribute such as `isrc` or `upc`, sent as `filter[{field}]`.
    Filter(String),
}

impl MatchField {
    fn parameter(&self) -> Result<String> {
        match self {
            Self::Id => Ok("ids".to_owned()),
            Self::Filter(field) => {
                if field.is_empty() {
                    return Err(Error::malformed_request("filter field must not be empty"));
                }
                Ok(format!("filter[{}]", encode(field)))
            }
        }
    }
}

/// Path segment of the chart endpoint.
const CHARTS: &str = "charts";

/// Separator of list values.
const SEPARATOR: char = ',';

/// Returns `{base_url}/v1/catalog/{storefront}/{endpoint}` without a query.
fn catalog_url(base_url: &Url, storefront: &Storefront, endpoint: &str) -> Result<Url> {
    let mut url = base_url.clone();
    url.set_query(None);
    url.set_fragment(None);

    url.path_segments_mut()
        .map_err(|()| Error::malformed_request(format!("`{base_url}` cannot be a base URL")))?
        .pop_if_empty()
        .extend(["v1", "catalog", storefront.as_str(), endpoint]);

    Ok(url)
}

/// Percent-encodes a single query value.
fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Encodes values and joins them with a literal separator.
///
/// Refuses empty lists, empty values and values containing the separator.
fn csv<'a, I>(values: I, what: &str) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let values: Vec<_> = values.into_iter().collect();
    if values.is_empty() {
        return Err(Error::malformed_request(format!("{what} must not be empty")));
    }

    let mut encoded = Vec::with_capacity(values.len());
    for value in values {
        if value.is_empty() {
            return Err(Error::malformed_request(format!(
                "{what} must not contain empty values"
            )));
        }
        if value.contains(SEPARATOR) {
            return Err(Error::malformed_request(format!(
                "{what} must not contain `{SEPARATOR}`: `{value}`"
            )));
        }
        encoded.push(encode(value));
    }

    Ok(encoded.join(&SEPARATOR.to_string()))
}

/// Sets the query of `url` from already-encoded name and value pairs.
fn set_query(url: &mut Url, pairs: &[(String, String)]) {
    let query: Vec<_> = pairs
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    url.set_query(Some(&query.join("&")));
}

/// Builds the URL of a chart query.
///
/// # Errors
///
/// Returns a `MalformedRequest` error if `kinds` is empty, `genre` is
/// empty, or the base URL cannot take a path.
pub fn chart_url(
    base_url: &Url,
    storefront: &Storefront,
    kinds: &BTreeSet<EntityKind>,
    genre: Option<&ItemId>,
    limit: Option<NonZeroU32>,
) -> Result<Url> {
    let keywords: BTreeSet<_> = kinds.iter().map(|kind| kind.keyword()).collect();
    let mut pairs = vec![("types".to_owned(), csv(keywords, "chart types")?)];

    if let Some(genre) = genre {
        if genre.is_empty() {
            return Err(Error::malformed_request("genre must not be empty"));
        }
        pairs.push(("genre".to_owned(), encode(genre)));
    }

    if let Some(limit) = limit {
        pairs.push(("limit".to_owned(), limit.to_string()));
    }

    let mut url = catalog_url(base_url, storefront, CHARTS)?;
    set_query(&mut url, &pairs);

    Ok(url)
}

/// Checks the selection of a resource lookup without building a URL.
///
/// # Errors
///
/// Returns a `MalformedRequest` error on the same inputs as
/// [`resource_url`] does, bar the base URL.
pub fn check_lookup(match_field: &MatchField, identifiers: &[ItemId]) -> Result<()> {
    match_field.parameter()?;
    csv(identifiers.iter().map(|id| &**id), "identifiers")?;
    Ok(())
}

/// Builds the URL of a resource lookup.
///
/// `extend` holds resolved property keywords; nothing is sent when empty.
///
/// # Errors
///
/// Returns a `MalformedRequest` error if `identifiers` is empty, holds an
/// empty identifier or one containing `,`, or the base URL cannot take a
/// path.
pub fn resource_url(
    base_url: &Url,
    storefront: &Storefront,
    kind: EntityKind,
    match_field: &MatchField,
    identifiers: &[ItemId],
    extend: &[&str],
) -> Result<Url> {
    let mut pairs = vec![(
        match_field.parameter()?,
        csv(identifiers.iter().map(|id| &**id), "identifiers")?,
    )];

    if !extend.is_empty() {
        pairs.push(("extend".to_owned(), csv(extend.iter().copied(), "properties")?));
    }

    let mut url = catalog_url(base_url, storefront, kind.keyword())?;
    set_query(&mut url, &pairs);

    Ok(url)
}
