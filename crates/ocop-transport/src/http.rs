//! HTTP gateway implementation using `reqwest`.

use std::time::Duration;

use ocop_protocol::{
    AuthFailure, Codec, Credential, JsonCodec, LoginGrant, LoginRequest,
    Principal, interpret,
};
use ocop_session::AuthGateway;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};

use crate::{DEFAULT_TIMEOUT, Endpoints, TransportError, normalize_base_url};

/// An [`AuthGateway`] over the backend's REST API.
///
/// Status codes and bodies are mapped like this:
///
/// | response                               | result                         |
/// |----------------------------------------|--------------------------------|
/// | no response (connect error, timeout)   | `NetworkFailure`               |
/// | 401 / 403                              | `InvalidCredentials` + message |
/// | 5xx                                    | `ServerError` + message        |
/// | anything else                          | whatever the envelope says     |
pub struct HttpGateway<C: Codec = JsonCodec> {
    client: reqwest::Client,
    base_url: String,
    endpoints: Endpoints,
    codec: C,
}

impl HttpGateway<JsonCodec> {
    /// Creates a gateway with default endpoints and timeout.
    ///
    /// # Errors
    /// See [`HttpGatewayBuilder::build`].
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::builder(base_url).build()
    }

    /// Starts configuring a gateway rooted at `base_url`
    /// (e.g. `http://localhost:5000/api`).
    pub fn builder(base_url: &str) -> HttpGatewayBuilder {
        HttpGatewayBuilder::new(base_url)
    }
}

impl<C: Codec> HttpGateway<C> {
    /// The normalized API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request and reads the whole body. Anything that prevents a
    /// complete response from arriving is a network failure.
    async fn exchange(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(StatusCode, Vec<u8>), AuthFailure> {
        let response = request
            .header(ACCEPT, self.codec.content_type())
            .send()
            .await
            .map_err(network_failure)?;
        let status = response.status();
        let body = response.bytes().await.map_err(network_failure)?;
        tracing::debug!(%status, bytes = body.len(), "auth response received");
        Ok((status, body.to_vec()))
    }

    /// Applies the status-code half of the mapping. Returns `Ok(())` when
    /// the body should decide.
    fn check_status(
        &self,
        status: StatusCode,
        body: &[u8],
    ) -> Result<(), AuthFailure> {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AuthFailure::invalid_credentials(interpret::message(
                &self.codec,
                body,
            )));
        }
        if status.is_server_error() {
            return Err(AuthFailure::server_error(interpret::message(
                &self.codec,
                body,
            )));
        }
        Ok(())
    }
}

impl<C: Codec> AuthGateway for HttpGateway<C> {
    async fn login(
        &self,
        identifier: &str,
        secret: &str,
    ) -> Result<LoginGrant, AuthFailure> {
        let body = self.codec.encode(&LoginRequest::new(identifier, secret))?;
        let url = self.url(&self.endpoints.login);
        tracing::debug!(%url, "sending login request");

        let request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, self.codec.content_type())
            .body(body);
        let (status, body) = self.exchange(request).await?;

        self.check_status(status, &body)?;
        interpret::login(&self.codec, &body)
    }

    async fn who_am_i(
        &self,
        credential: &Credential,
    ) -> Result<Principal, AuthFailure> {
        let url = self.url(&self.endpoints.who_am_i);
        tracing::debug!(%url, "sending who-am-i request");

        let request = self
            .client
            .get(&url)
            .header(AUTHORIZATION, credential.bearer());
        let (status, body) = self.exchange(request).await?;

        self.check_status(status, &body)?;
        interpret::who_am_i(&self.codec, &body)
    }
}

fn network_failure(e: reqwest::Error) -> AuthFailure {
    tracing::debug!(error = %e, timeout = e.is_timeout(), "auth request failed");
    AuthFailure::network()
}

// ---------------------------------------------------------------------------
// HttpGatewayBuilder
// ---------------------------------------------------------------------------

/// Builder for [`HttpGateway`].
///
/// ```rust,no_run
/// use std::time::Duration;
/// use ocop_transport::HttpGateway;
///
/// let gateway = HttpGateway::builder("http://localhost:5000/api")
///     .timeout(Duration::from_secs(5))
///     .build()?;
/// # Ok::<(), ocop_transport::TransportError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HttpGatewayBuilder {
    base_url: String,
    timeout: Duration,
    endpoints: Endpoints,
}

impl HttpGatewayBuilder {
    /// Creates a builder with default endpoints and timeout.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            timeout: DEFAULT_TIMEOUT,
            endpoints: Endpoints::default(),
        }
    }

    /// Sets the per-request timeout. A timed-out request is a network
    /// failure.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the endpoint paths.
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Builds the gateway with [`JsonCodec`].
    ///
    /// # Errors
    /// - [`TransportError::InvalidBaseUrl`] — empty or non-`http(s)` base
    /// - [`TransportError::Client`] — the HTTP client couldn't be built
    pub fn build(self) -> Result<HttpGateway<JsonCodec>, TransportError> {
        self.build_with_codec(JsonCodec)
    }

    /// Builds the gateway with a custom codec.
    ///
    /// # Errors
    /// Same as [`build`](Self::build).
    pub fn build_with_codec<C: Codec>(
        self,
        codec: C,
    ) -> Result<HttpGateway<C>, TransportError> {
        let base_url = normalize_base_url(&self.base_url)?;
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(TransportError::Client)?;

        tracing::info!(%base_url, "HTTP auth gateway ready");
        Ok(HttpGateway {
            client,
            base_url,
            endpoints: self.endpoints,
            codec,
        })
    }
}
