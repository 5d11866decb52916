//! Catalog client.
//!
//! Ties the pieces of a catalog query together. Every fetch is a single
//! round trip:
//!
//! 1. Validate the request and resolve expansion properties
//! 2. Resolve the storefront
//! 3. Build the URL
//! 4. Execute it on the [`Transport`]
//! 5. Decode the response
//!
//! Request errors (`MalformedRequest`, `UnsupportedProperty`) are raised in
//! step 1, before the storefront resolver or the network are touched.
//! There is no caching, no pagination and no retrying: `next` links are
//! surfaced on the returned collections but never followed.
//!
//! Single lookups and batch lookups deliberately differ on misses: a single
//! lookup without a match fails with `NotFound`, while a batch lookup
//! returns whatever subset the service found. Callers that need to know
//! which identifiers are missing diff the result against their input.
//!
//! # Example
//!
//! ```rust
//! use musicatalog::{catalog::Client, config::Config, protocol::catalog::*};
//!
//! let client = Client::from_config(&Config::from_file("catalog.toml")?)?;
//!
//! let request = ChartRequest::new([EntityKind::Song, EntityKind::Album])?
//!     .with_limit(NonZeroU32::new(10).unwrap());
//! let charts = client.charts(&request).await?;
//!
//! let label = client.record_label_with_all("1543411840").await?;
//! ```

use std::{fmt, sync::Arc};

use url::Url;

use crate::{
    config::Config,
    error::{Error, Result},
    http,
    protocol::catalog::{
        resource, ChartRequest, ChartResponse, Collection, Entity, EntityKind, ItemId,
        RecordLabel, RecordLabels, ResourceRequest,
    },
    registry::{Properties, PropertyRegistry},
    storefront::{StorefrontResolver, UserStorefront},
    transport::Transport,
};

/// Payload of the `NotFound` error of a single lookup.
///
/// Reach it through [`Error::downcast`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NotFound {
    pub kind: EntityKind,
    pub id: ItemId,
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.kind, self.id)
    }
}

impl std::error::Error for NotFound {}

/// Client for catalog charts and resources.
///
/// Cheap to share: all collaborators are behind `Arc`s and no state is
/// mutated by a fetch, so concurrent fetches are fully independent.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    storefront: Arc<dyn StorefrontResolver>,
    registry: Arc<PropertyRegistry>,
    base_url: Url,
}

impl Client {
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        storefront: Arc<dyn StorefrontResolver>,
        registry: Arc<PropertyRegistry>,
        base_url: Url,
    ) -> Self {
        Self {
            transport,
            storefront,
            registry,
            base_url,
        }
    }

    /// Creates a client on the HTTP transport with the default property
    /// registry.
    ///
    /// Uses the configured storefront when set, and otherwise resolves the
    /// storefront of the user account.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidConfig` error if neither a storefront nor a user
    /// token is configured, or any error of [`http::Client::new`].
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(http::Client::new(config)?);

        let storefront: Arc<dyn StorefrontResolver> =
            match (&config.storefront, &config.music_user_token) {
                (Some(storefront), _) => Arc::new(storefront.clone()),
                (None, Some(_)) => Arc::new(UserStorefront::new(
                    Arc::clone(&transport),
                    config.base_url.clone(),
                )),
                (None, None) => {
                    return Err(Error::invalid_config(
                        "either a storefront or a music user token is required",
                    ))
                }
            };

        Ok(Self::new(
            transport,
            storefront,
            Arc::new(PropertyRegistry::default()),
            config.base_url.clone(),
        ))
    }

    #[must_use]
    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    /// Fetches catalog charts.
    ///
    /// # Errors
    ///
    /// Returns an error if the storefront cannot be resolved, the request
    /// fails, or the response cannot be decoded.
    pub async fn charts(&self, request: &ChartRequest) -> Result<ChartResponse> {
        let storefront = self.storefront.current_storefront().await?;
        let url = request.url(&self.base_url, &storefront)?;

        debug!("fetching charts: {url}");
        let body = self.transport.get(url).await?;

        ChartResponse::from_slice(&body)
    }

    /// Executes a resource request.
    ///
    /// # Errors
    ///
    /// Returns a `MalformedRequest` error if an identifier cannot be sent,
    /// or an `UnsupportedProperty` error if a requested property is not
    /// registered for `E`, both before any call. Otherwise returns an
    /// error if the storefront cannot be resolved, the request fails, or
    /// the response cannot be decoded.
    pub async fn resource<E: Entity>(&self, request: &ResourceRequest<E>) -> Result<Collection<E>> {
        request.validate()?;
        let extend = request.extend(&self.registry)?;

        let storefront = self.storefront.current_storefront().await?;
        let url = request.url(&self.base_url, &storefront, &extend)?;

        debug!("fetching {}: {url}", E::KIND);
        let body = self.transport.get(url).await?;

        resource::decode(&body)
    }

    /// Fetches a single entity by identifier.
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` error carrying a [`NotFound`] if the service
    /// has no match for `id`, and any error of [`Client::resource`].
    pub async fn fetch_one<E: Entity>(
        &self,
        id: impl Into<ItemId>,
        properties: Properties,
    ) -> Result<E> {
        let id = id.into();
        let request = ResourceRequest::<E>::one(id.clone()).with_properties(properties);

        self.resource(&request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(NotFound { kind: E::KIND, id }))
    }

    /// Fetches a batch of entities by identifier.
    ///
    /// Entities are returned in service order. Identifiers without a match
    /// are left out rather than failing the batch.
    ///
    /// # Errors
    ///
    /// Returns a `MalformedRequest` error if `ids` is empty, and any error
    /// of [`Client::resource`].
    pub async fn fetch_many<E, I>(&self, ids: I, properties: Properties) -> Result<Collection<E>>
    where
        E: Entity,
        I: IntoIterator,
        I::Item: Into<ItemId>,
    {
        let request = ResourceRequest::<E>::many(ids)?.with_properties(properties);
        let entities = self.resource(&request).await?;

        let requested = request.lookup().identifiers().len();
        if entities.len() < requested {
            debug!("{} of {requested} {} found", entities.len(), E::KIND);
        }

        Ok(entities)
    }

    /// Fetches a record label.
    ///
    /// # Errors
    ///
    /// See [`Client::fetch_one`].
    pub async fn record_label(
        &self,
        id: impl Into<ItemId>,
        properties: Properties,
    ) -> Result<RecordLabel> {
        self.fetch_one(id, properties).await
    }

    /// Fetches a record label with all of its views.
    ///
    /// # Errors
    ///
    /// See [`Client::fetch_one`].
    pub async fn record_label_with_all(&self, id: impl Into<ItemId>) -> Result<RecordLabel> {
        self.record_label(id, Properties::All).await
    }

    /// Fetches a batch of record labels.
    ///
    /// # Errors
    ///
    /// See [`Client::fetch_many`].
    pub async fn record_labels<I>(&self, ids: I, properties: Properties) -> Result<RecordLabels>
    where
        I: IntoIterator,
        I::Item: Into<ItemId>,
    {
        self.fetch_many(ids, properties).await
    }

    /// Fetches a batch of record labels with all of their views.
    ///
    /// # Errors
    ///
    /// See [`Client::fetch_many`].
    pub async fn record_labels_with_all<I>(&self, ids: I) -> Result<RecordLabels>
    where
        I: IntoIterator,
        I::Item: Into<ItemId>,
    {
        self.record_labels(ids, Properties::All).await
    }
}

#[cfg(test)]
mod tests {
    use std::{
        num::NonZeroU32,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
    };

    use async_trait::async_trait;
    use ::http::StatusCode;

    use super::*;
    use crate::{
        error::ErrorKind,
        protocol::catalog::{EntityKind, Song},
        registry::Property,
        storefront::Storefront,
        transport::TransportError,
    };

    /// Answers every request with the same response and records the URLs.
    struct MockTransport {
        response: std::result::Result<&'static str, StatusCode>,
        urls: Mutex<Vec<Url>>,
    }

    impl MockTransport {
        fn ok(body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(body),
                urls: Mutex::new(Vec::new()),
            })
        }

        fn status(status: StatusCode) -> Arc<Self> {
            Arc::new(Self {
                response: Err(status),
                urls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.urls.lock().unwrap().len()
        }

        fn last_url(&self) -> Url {
            self.urls.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn get(&self, url: Url) -> Result<Vec<u8>> {
            self.urls.lock().unwrap().push(url);
            match self.response {
                Ok(body) => Ok(body.as_bytes().to_vec()),
                Err(status) => Err(Error::transport(TransportError::status(
                    status,
                    r#"{"errors":[{"status":"401"}]}"#,
                ))),
            }
        }
    }

    /// Resolves to a fixed storefront, or fails, and counts calls.
    struct MockResolver {
        storefront: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl MockResolver {
        fn new(storefront: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                storefront,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StorefrontResolver for MockResolver {
        async fn current_storefront(&self) -> Result<Storefront> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.storefront {
                Some(code) => code.parse(),
                None => Err(Error::not_found("no storefront for user")),
            }
        }
    }

    fn client(transport: &Arc<MockTransport>, resolver: &Arc<MockResolver>) -> Client {
        Client::new(
            Arc::clone(transport) as _,
            Arc::clone(resolver) as _,
            Arc::new(PropertyRegistry::default()),
            Url::parse("https://api.music.apple.com").unwrap(),
        )
    }

    const LABELS: &str = r#"{"data":[
        {"id":"1543411840","type":"record-labels","attributes":{"name":"Label Name"},
         "views":{"latest-releases":{"data":[{"id":"1","type":"albums"}]},"top-releases":{"data":[]}}}
    ]}"#;

    #[tokio::test]
    async fn charts_round_trip() {
        let transport = MockTransport::ok(
            r#"{"results":{"songs":[{"chart":"most-played","name":"Top Songs","data":[{"id":"1","type":"songs"}]}]}}"#,
        );
        let resolver = MockResolver::new(Some("us"));
        let request = ChartRequest::new([EntityKind::Song, EntityKind::Album])
            .unwrap()
            .with_genre("1234")
            .unwrap()
            .with_limit(NonZeroU32::new(5).unwrap());

        let charts = client(&transport, &resolver).charts(&request).await.unwrap();

        assert_eq!(
            transport.last_url().as_str(),
            "https://api.music.apple.com/v1/catalog/us/charts?types=albums,songs&genre=1234&limit=5"
        );
        assert_eq!(charts.songs.len(), 1);
        assert!(charts.albums.is_empty());
        assert!(charts.playlists.is_empty());
        assert!(charts.music_videos.is_empty());
    }

    #[tokio::test]
    async fn record_label_with_all_views() {
        let transport = MockTransport::ok(LABELS);
        let resolver = MockResolver::new(Some("us"));

        let label = client(&transport, &resolver)
            .record_label_with_all("1543411840")
            .await
            .unwrap();

        let url = transport.last_url();
        assert_eq!(url.path(), "/v1/catalog/us/record-labels");
        assert_eq!(url.query(), Some("ids=1543411840&extend=latest-releases,top-releases"));
        assert_eq!(label.name(), Some("Label Name"));
        assert_eq!(label.views.latest_releases.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn fetch_one_without_match_is_not_found() {
        let transport = MockTransport::ok(r#"{"data":[]}"#);
        let resolver = MockResolver::new(Some("us"));

        let err = client(&transport, &resolver)
            .fetch_one::<Song>("1", Properties::none())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.to_string().contains("`1`"), "{err}");
        assert_eq!(
            err.downcast::<NotFound>(),
            Some(&NotFound {
                kind: EntityKind::Song,
                id: ItemId::from("1"),
            })
        );
    }

    #[tokio::test]
    async fn separator_in_identifier_makes_no_calls() {
        let transport = MockTransport::ok(LABELS);
        let resolver = MockResolver::new(Some("us"));

        let err = client(&transport, &resolver)
            .record_label("1543411840,1543411841", Properties::none())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedRequest);
        assert_eq!(transport.calls(), 0);
        assert_eq!(resolver.calls(), 0);
    }

    #[tokio::test]
    async fn fetch_many_without_match_is_empty() {
        let transport = MockTransport::ok(r#"{"data":[]}"#);
        let resolver = MockResolver::new(Some("us"));

        let songs = client(&transport, &resolver)
            .fetch_many::<Song, _>(["1", "2"], Properties::none())
            .await
            .unwrap();
        assert!(songs.is_empty());
    }

    #[tokio::test]
    async fn fetch_many_returns_partial_batch() {
        let transport = MockTransport::ok(LABELS);
        let resolver = MockResolver::new(Some("us"));

        let labels = client(&transport, &resolver)
            .record_labels_with_all(["1543411840", "404"])
            .await
            .unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].id.to_string(), "1543411840");
        assert_eq!(
            transport.last_url().query(),
            Some("ids=1543411840,404&extend=latest-releases,top-releases")
        );
    }

    #[tokio::test]
    async fn unsupported_property_makes_no_calls() {
        let transport = MockTransport::ok(LABELS);
        let resolver = MockResolver::new(Some("us"));

        let err = client(&transport, &resolver)
            .record_label("1543411840", Properties::from([Property::Tracks]))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedProperty);
        assert_eq!(transport.calls(), 0);
        assert_eq!(resolver.calls(), 0);
    }

    #[tokio::test]
    async fn empty_batch_makes_no_calls() {
        let transport = MockTransport::ok(LABELS);
        let resolver = MockResolver::new(Some("us"));

        let err = client(&transport, &resolver)
            .record_labels(Vec::<ItemId>::new(), Properties::none())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedRequest);
        assert_eq!(transport.calls(), 0);
        assert_eq!(resolver.calls(), 0);
    }

    #[tokio::test]
    async fn resolver_errors_propagate_unchanged() {
        let transport = MockTransport::ok(LABELS);
        let resolver = MockResolver::new(None);

        let err = client(&transport, &resolver)
            .record_label_with_all("1543411840")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(resolver.calls(), 1);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn transport_errors_propagate_unchanged() {
        let transport = MockTransport::status(StatusCode::UNAUTHORIZED);
        let resolver = MockResolver::new(Some("us"));
        let request = ChartRequest::new([EntityKind::Playlist]).unwrap();

        let err = client(&transport, &resolver)
            .charts(&request)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Transport);
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn malformed_payload_is_decode_error() {
        let transport = MockTransport::ok(r#"{"results":{"songs":"oops"}}"#);
        let resolver = MockResolver::new(Some("us"));
        let request = ChartRequest::new([EntityKind::Song]).unwrap();

        let err = client(&transport, &resolver)
            .charts(&request)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Decode);
    }

    #[tokio::test]
    async fn concurrent_fetches_are_independent() {
        let transport = MockTransport::ok(LABELS);
        let resolver = MockResolver::new(Some("nl"));
        let client = client(&transport, &resolver);

        let (one, many) = tokio::join!(
            client.record_label("1543411840", Properties::none()),
            client.record_labels(["1543411840"], Properties::from([Property::TopReleases])),
        );
        assert_eq!(one.unwrap().id.to_string(), "1543411840");
        assert_eq!(many.unwrap().len(), 1);
        assert_eq!(transport.calls(), 2);
        assert_eq!(resolver.calls(), 2);
    }

    #[test]
    fn config_needs_a_storefront_source() {
        let config = Config::with_developer_token("token").unwrap();
        let err = Client::from_config(&config).err().unwrap();
        assert_eq!(err.kind, ErrorKind::InvalidConfig);
    }
}
