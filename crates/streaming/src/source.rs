//! Text transports for dataset candidates.
//!
//! A locator is either a remote URL (`http://`, `https://`) or a local path
//! (optionally `file://`). Implementations:
//! - `HttpTransport`: reqwest client, non-2xx is an error
//! - `FileTransport`: local files, relative paths resolved against a root
//! - `RoutingTransport`: dispatches by locator scheme
//! - `MemoryTransport`: fixed responses, for tests and embedding
//!
//! New transports can be added by implementing the `Transport` trait.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

/// Error type for transport operations.
#[derive(Debug)]
pub struct DataSourceError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {source}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for DataSourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl DataSourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// True for `http://` and `https://` locators.
pub fn is_remote(locator: &str) -> bool {
    let l = locator.trim_start();
    l.starts_with("http://") || l.starts_with("https://")
}

/// Fetches the full text behind a locator.
///
/// Implementations must be `Send + Sync` for use across async tasks.
pub trait Transport: Send + Sync {
    fn fetch_text<'a>(&'a self, locator: &'a str) -> BoxFuture<'a, Result<String, DataSourceError>>;
}

/// HTTP(S) transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, DataSourceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataSourceError::with_source("failed to build HTTP client", e))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn fetch_text<'a>(&'a self, locator: &'a str) -> BoxFuture<'a, Result<String, DataSourceError>> {
        Box::pin(async move {
            let resp = self
                .client
                .get(locator)
                .send()
                .await
                .map_err(|e| DataSourceError::with_source("HTTP request failed", e))?;

            if !resp.status().is_success() {
                return Err(DataSourceError::new(format!(
                    "HTTP error: {}",
                    resp.status()
                )));
            }

            resp.text()
                .await
                .map_err(|e| DataSourceError::with_source("failed to read response", e))
        })
    }
}

/// Local filesystem transport.
#[derive(Debug, Clone, Default)]
pub struct FileTransport {
    root: Option<PathBuf>,
}

impl FileTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative locators against `root`.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self {
            root: Some(root.as_ref().to_path_buf()),
        }
    }

    fn resolve(&self, locator: &str) -> PathBuf {
        let raw = locator.trim();
        let raw = raw.strip_prefix("file://").unwrap_or(raw);
        let path = Path::new(raw);
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Transport for FileTransport {
    fn fetch_text<'a>(&'a self, locator: &'a str) -> BoxFuture<'a, Result<String, DataSourceError>> {
        let path = self.resolve(locator);
        Box::pin(async move {
            tokio::fs::read_to_string(&path).await.map_err(|e| {
                DataSourceError::with_source(format!("failed to read {}", path.display()), e)
            })
        })
    }
}

/// Sends remote locators to one transport and everything else to another.
#[derive(Clone)]
pub struct RoutingTransport {
    remote: Arc<dyn Transport>,
    local: Arc<dyn Transport>,
}

impl RoutingTransport {
    pub fn new(remote: Arc<dyn Transport>, local: Arc<dyn Transport>) -> Self {
        Self { remote, local }
    }
}

impl Transport for RoutingTransport {
    fn fetch_text<'a>(&'a self, locator: &'a str) -> BoxFuture<'a, Result<String, DataSourceError>> {
        if is_remote(locator) {
            self.remote.fetch_text(locator)
        } else {
            self.local.fetch_text(locator)
        }
    }
}

/// In-memory transport. Unknown locators fail like a missing file.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    responses: HashMap<String, Result<String, String>>,
    requests: Mutex<Vec<String>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, locator: impl Into<String>, text: impl Into<String>) -> Self {
        self.responses.insert(locator.into(), Ok(text.into()));
        self
    }

    pub fn with_failure(mut self, locator: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses.insert(locator.into(), Err(message.into()));
        self
    }

    /// Locators requested so far, in order.
    pub async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

impl Transport for MemoryTransport {
    fn fetch_text<'a>(&'a self, locator: &'a str) -> BoxFuture<'a, Result<String, DataSourceError>> {
        Box::pin(async move {
            self.requests.lock().await.push(locator.to_string());
            match self.responses.get(locator) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(message)) => Err(DataSourceError::new(message.clone())),
                None => Err(DataSourceError::new(format!("no such locator: {locator}"))),
            }
        })
    }
}
