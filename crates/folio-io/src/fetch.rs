//! Stylesheet fetching.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Result type for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Errors that can occur while retrieving a stylesheet's text.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL scheme is not one this fetcher handles.
    #[error("unsupported scheme `{0}`")]
    UnsupportedScheme(String),

    /// The HTTP request itself failed.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP status {status} for {url}")]
    Status { status: u16, url: Url },

    /// A `file://` URL could not be read.
    #[error("could not read {url}: {source}")]
    Io {
        url: Url,
        #[source]
        source: std::io::Error,
    },

    /// A `file://` URL does not map to a local path.
    #[error("`{0}` is not a loadable file path")]
    InvalidFilePath(Url),
}

/// Retrieves the text of one stylesheet. Implementations must be usable
/// from several resolver threads at once.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> FetchResult<String>;
}

/// HTTP(S) fetcher on a blocking reqwest client. Non-http(s) schemes are
/// refused before any request is made.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> FetchResult<Self> {
        Self::with_timeout(Duration::from_secs(15))
    }

    pub fn with_timeout(timeout: Duration) -> FetchResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> FetchResult<String> {
        let scheme = url.scheme().to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(FetchError::UnsupportedScheme(scheme));
        }
        let response = self.client.get(url.as_str()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.clone(),
            });
        }
        Ok(response.text()?)
    }
}

/// Fetcher for `file://` URLs, used for local stylesheets and their
/// relative imports.
#[derive(Debug, Default)]
pub struct FileFetcher;

impl Fetcher for FileFetcher {
    fn fetch(&self, url: &Url) -> FetchResult<String> {
        if url.scheme() != "file" {
            return Err(FetchError::UnsupportedScheme(url.scheme().to_owned()));
        }
        let path = url
            .to_file_path()
            .map_err(|_| FetchError::InvalidFilePath(url.clone()))?;
        std::fs::read_to_string(&path).map_err(|source| FetchError::Io {
            url: url.clone(),
            source,
        })
    }
}

/// Dispatches to the file or HTTP fetcher by URL scheme, so a local sheet
/// can import a remote one and vice versa.
pub struct SchemeFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl SchemeFetcher {
    pub fn new() -> FetchResult<Self> {
        Ok(Self {
            http: HttpFetcher::new()?,
            file: FileFetcher,
        })
    }

    pub fn with_timeout(timeout: Duration) -> FetchResult<Self> {
        Ok(Self {
            http: HttpFetcher::with_timeout(timeout)?,
            file: FileFetcher,
        })
    }
}

impl Fetcher for SchemeFetcher {
    fn fetch(&self, url: &Url) -> FetchResult<String> {
        match url.scheme() {
            "file" => self.file.fetch(url),
            _ => self.http.fetch(url),
        }
    }
}
