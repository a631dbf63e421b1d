//! Exposed remote `.git` directory
//!
//! A remote is anything that can hand out the index and individual loose
//! objects. [`HttpRemote`] reads them from a web server that publishes the
//! `.git` directory as plain files.

use crate::artifacts::errors::FetchError;
use crate::artifacts::objects::object;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Source of the raw files making up a `.git` directory
pub trait ObjectSource: Send + Sync + 'static {
    /// Raw bytes of the index file
    fn fetch_index(&self) -> impl Future<Output = Result<Bytes, FetchError>> + Send;

    /// Inflated payload of a loose object, framing header included
    fn fetch_object(
        &self,
        oid: &ObjectId,
    ) -> impl Future<Output = Result<Bytes, FetchError>> + Send;
}

/// Loose-object access over plain HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpRemote {
    /// Published `.git` root, always ending with `/`
    base: Url,
    client: reqwest::Client,
}

impl HttpRemote {
    /// Create a remote for the `.git` directory published at `base`
    ///
    /// No timeout is applied unless one is given.
    pub fn new(base: &str, timeout: Option<Duration>) -> Result<Self, FetchError> {
        static APP_USER_AGENT: &str =
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

        let base = normalize_base(base)?;

        let mut builder = reqwest::Client::builder().user_agent(APP_USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|source| FetchError::Request {
            url: base.clone(),
            source,
        })?;

        Ok(HttpRemote { base, client })
    }

    async fn get(&self, url: Url) -> Result<Bytes, FetchError> {
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus { url, status });
        }

        response
            .bytes()
            .await
            .map_err(|source| FetchError::Request { url, source })
    }
}

impl ObjectSource for HttpRemote {
    async fn fetch_index(&self) -> Result<Bytes, FetchError> {
        let url = self.base.join("index")?;
        self.get(url).await
    }

    async fn fetch_object(&self, oid: &ObjectId) -> Result<Bytes, FetchError> {
        let url = self.base.join(&oid.to_url_path())?;
        let body = self.get(url).await?;

        object::inflate(&*body).map_err(FetchError::Inflate)
    }
}

/// Parse the published root and make sure it ends with `/`
///
/// Without the trailing slash, joining `index` would replace the last path
/// segment instead of descending into it.
pub fn normalize_base(base: &str) -> Result<Url, FetchError> {
    let mut url = Url::parse(base)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
