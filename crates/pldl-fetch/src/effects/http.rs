use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Asynchronous HTTP client abstraction.
///
/// This trait provides the minimal interface needed for range fetching.
/// Implementations handle their own redirect following, TLS and timeout
/// configuration, and must turn non-success statuses into errors.
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - Mock implementations for testing
pub trait HttpClient: Send + Sync {
    /// Error type for HTTP operations.
    type Error: std::error::Error + Send + 'static;

    /// Issue a GET and return the response body as a stream.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    /// * `headers` - Headers to include, `Range` among them when resuming
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (DNS failure, connection error,
    /// HTTP error status, etc.).
    fn stream(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> impl Future<Output = Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;
    use reqwest::{Client, Proxy, StatusCode};

    const DEFAULT_USER_AGENT: &str = concat!("pldl/", env!("CARGO_PKG_VERSION"));

    /// Settings applied when building the underlying `reqwest::Client`.
    ///
    /// Every proxy is used for all schemes; an unparsable proxy URL fails
    /// the build.
    #[derive(Debug, Clone, Default)]
    pub struct ClientSetting {
        pub proxies: Option<Vec<String>>,
        pub user_agent: Option<String>,
    }

    impl ClientSetting {
        pub fn build(self) -> Result<Client, reqwest::Error> {
            let mut cb = Client::builder()
                .user_agent(self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()));

            for u in self.proxies.into_iter().flatten() {
                cb = cb.proxy(Proxy::all(u)?);
            }

            cb.build()
        }
    }

    /// Production HTTP client implementation using reqwest.
    pub struct ReqwestClient {
        client: Client,
    }

    impl ReqwestClient {
        /// Create a new ReqwestClient with default configuration.
        pub fn new() -> Result<Self, reqwest::Error> {
            Self::with_setting(ClientSetting::default())
        }

        pub fn with_setting(setting: ClientSetting) -> Result<Self, reqwest::Error> {
            Ok(Self {
                client: setting.build()?,
            })
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn stream(
            &self,
            url: &str,
            headers: &[(String, String)],
        ) -> Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error> {
            let mut request = self.client.get(url);

            for (key, value) in headers {
                request = request.header(key, value);
            }

            let response = request.send().await?;
            if response.status() == StatusCode::RANGE_NOT_SATISFIABLE && resumes_past_zero(headers) {
                // The staged prefix already covers the whole resource.
                tracing::debug!(url, "range starts past the end, nothing left to fetch");
                return Ok(Box::pin(futures_util::stream::empty::<Result<Bytes, Self::Error>>()));
            }

            let response = response.error_for_status()?;
            tracing::debug!(status = %response.status(), url, "response received");

            Ok(Box::pin(response.bytes_stream()))
        }
    }
}

/// Whether `headers` ask for a range that does not start at byte zero.
#[cfg(any(feature = "reqwest", test))]
fn resumes_past_zero(headers: &[(String, String)]) -> bool {
    headers
        .iter()
        .any(|(k, v)| k.eq_ignore_ascii_case("range") && v != "bytes=0-")
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::{ClientSetting, ReqwestClient};
