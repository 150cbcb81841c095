//! `Client` builder and the per-surface wiring.
//!
//! A client ties the layers together for one surface: the HTTP gateway,
//! the credential store that surface uses, the session manager on top of
//! both, and a resolver for the catalog's image references.

use std::path::PathBuf;

use ocop_media::{ImageRef, Resolver};
use ocop_protocol::Credential;
use ocop_session::{
    Access, AuthGateway, CredentialStore, FileCredentialStore,
    MemoryCredentialStore, SessionManager, SessionState, StoreError,
};
use ocop_transport::HttpGateway;

use crate::{ClientConfig, OcopError, Surface};

// ---------------------------------------------------------------------------
// ConfiguredStore
// ---------------------------------------------------------------------------

/// The credential store picked by [`ClientConfig`]: a file when a path is
/// in effect, memory otherwise.
#[derive(Debug)]
pub enum ConfiguredStore {
    /// Survives restarts.
    File(FileCredentialStore),
    /// Lost on exit.
    Memory(MemoryCredentialStore),
}

impl ConfiguredStore {
    /// Picks the store for `config`.
    pub fn for_config(config: &ClientConfig) -> Self {
        match config.effective_credential_path() {
            Some(path) => Self::File(FileCredentialStore::new(path)),
            None => Self::Memory(MemoryCredentialStore::new()),
        }
    }
}

impl CredentialStore for ConfiguredStore {
    fn get(&self) -> Result<Option<Credential>, StoreError> {
        match self {
            Self::File(store) => store.get(),
            Self::Memory(store) => store.get(),
        }
    }

    fn set(&self, credential: &Credential) -> Result<(), StoreError> {
        match self {
            Self::File(store) => store.set(credential),
            Self::Memory(store) => store.set(credential),
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        match self {
            Self::File(store) => store.clear(),
            Self::Memory(store) => store.clear(),
        }
    }
}

// ---------------------------------------------------------------------------
// ClientBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring a [`Client`].
///
/// # Example
///
/// ```rust,no_run
/// use ocop::prelude::*;
///
/// # async fn run() -> Result<(), OcopError> {
/// let client = Client::builder()
///     .base_url("https://shop.ocop.vn/api")
///     .surface(Surface::Storefront)
///     .build()?;
/// client.start().await;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the API base URL.
    pub fn base_url(mut self, url: &str) -> Self {
        self.config.api_base_url = url.to_string();
        self
    }

    /// Sets which surface this client runs as.
    pub fn surface(mut self, surface: Surface) -> Self {
        self.config.surface = surface;
        self
    }

    /// Persists the credential at `path`, on any surface.
    pub fn credential_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.credential_path = Some(path.into());
        self
    }

    /// Validates the configuration and wires up the client.
    ///
    /// Nothing touches the network here; call [`Client::start`] for that.
    ///
    /// # Errors
    /// Invalid configuration, or the HTTP client could not be created.
    pub fn build(self) -> Result<Client, OcopError> {
        Client::from_config(&self.config)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// One client surface: its session and its image resolver.
pub struct Client<G = HttpGateway, S = ConfiguredStore> {
    session: SessionManager<G, S>,
    resolver: Resolver,
    surface: Surface,
}

impl Client {
    /// Creates a new builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Wires up a client from `config`.
    ///
    /// # Errors
    /// See [`ClientBuilder::build`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, OcopError> {
        config.validate()?;

        let gateway = HttpGateway::builder(&config.api_base_url)
            .timeout(config.request_timeout())
            .build()?;
        let store = ConfiguredStore::for_config(config);

        tracing::debug!(
            surface = %config.surface,
            base_url = %gateway.base_url(),
            persistent = matches!(store, ConfiguredStore::File(_)),
            "client configured"
        );

        Ok(Self::from_parts(
            SessionManager::new(gateway, store),
            Resolver::new(&config.resolver_config()),
            config.surface,
        ))
    }
}

impl<G, S> Client<G, S>
where
    G: AuthGateway,
    S: CredentialStore,
{
    /// Assembles a client from already-built pieces. Tests use this with
    /// fake gateways.
    pub fn from_parts(
        session: SessionManager<G, S>,
        resolver: Resolver,
        surface: Surface,
    ) -> Self {
        Self {
            session,
            resolver,
            surface,
        }
    }

    /// The session manager. Login, logout and state reads go through here.
    pub fn session(&self) -> &SessionManager<G, S> {
        &self.session
    }

    /// The image resolver.
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Which surface this client runs as.
    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Whether this surface's protected screens may be shown right now.
    pub fn access(&self) -> Access {
        self.session
            .snapshot()
            .access(self.surface.required_role())
    }

    /// Reconciles the stored credential with the server. Call once at
    /// startup.
    pub async fn start(&self) -> SessionState {
        let state = self.session.check_auth().await;
        tracing::info!(surface = %self.surface, state = %state, "client started");
        state
    }

    /// Resolves a single image reference.
    pub fn image_url(&self, reference: Option<&str>) -> String {
        self.resolver.resolve(reference)
    }

    /// Resolves a product's cover image.
    pub fn cover_image_url(&self, images: &[ImageRef]) -> String {
        self.resolver.resolve_primary(images)
    }
}
