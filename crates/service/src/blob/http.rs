//! S3-compatible object store client (path-style addressing).
//!
//! Objects live at `{endpoint}/{container}/{name}`; the object URL is the
//! photo reference handed back to the service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, StatusCode};
use tracing::{debug, error, info, instrument};

use super::{check_name, BlobError, BlobStore, PhotoUpload};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct HttpBlobStore {
    http: Client,
    container: String,
    container_url: String,
    access_token: Option<String>,
}

impl HttpBlobStore {
    pub fn new(endpoint: &str, container: &str, access_token: Option<String>) -> Result<Self, BlobError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BlobError::Transport(e.to_string()))?;
        Ok(Self::with_client(http, endpoint, container, access_token))
    }

    pub fn from_config(cfg: &configs::BlobConfig) -> Result<Self, BlobError> {
        Self::new(&cfg.endpoint, &cfg.container, cfg.access_token.clone())
    }

    pub fn with_client(http: Client, endpoint: &str, container: &str, access_token: Option<String>) -> Self {
        let container_url = format!("{}/{}", endpoint.trim_end_matches('/'), container);
        Self { http, container: container.to_string(), container_url, access_token }
    }

    pub fn object_url(&self, name: &str) -> String {
        format!("{}/{}", self.container_url, name)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> Result<reqwest::Response, BlobError> {
        self.authorize(req)
            .send()
            .await
            .map_err(|e| BlobError::Transport(e.to_string()))
    }
}

async fn status_error(resp: reqwest::Response) -> BlobError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    BlobError::Status { status, body }
}

/// A 404 whose body names a missing bucket/container rather than a missing key.
fn is_missing_container(body: &str) -> bool {
    body.contains("NoSuchBucket") || body.contains("ContainerNotFound")
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    #[instrument(skip(self), fields(container = %self.container))]
    async fn ensure_container(&self) -> Result<(), BlobError> {
        let resp = self.send(self.http.put(&self.container_url)).await?;
        match resp.status() {
            s if s.is_success() => {
                info!("blob container created");
                Ok(())
            }
            StatusCode::CONFLICT => {
                debug!("blob container already exists");
                Ok(())
            }
            _ => {
                let err = status_error(resp).await;
                error!(error = %err, "blob container creation failed");
                Err(err)
            }
        }
    }

    #[instrument(skip(self, photo), fields(blob = %name, bytes = photo.len()))]
    async fn upload(&self, photo: PhotoUpload, name: &str) -> Result<String, BlobError> {
        check_name(name)?;
        let url = self.object_url(name);
        info!(container = %self.container, "uploading blob");
        let req = self
            .http
            .put(&url)
            .header(header::CONTENT_TYPE, photo.content_type.as_str())
            .body(photo.content);
        let resp = self.send(req).await?;
        if !resp.status().is_success() {
            let err = status_error(resp).await;
            error!(error = %err, "blob upload failed");
            return Err(err);
        }
        info!("blob uploaded");
        Ok(url)
    }

    #[instrument(skip(self), fields(blob = %name))]
    async fn delete(&self, name: &str) -> Result<(), BlobError> {
        check_name(name)?;
        info!("attempting to delete blob");
        let resp = self.send(self.http.delete(self.object_url(name))).await?;
        match resp.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => {
                let body = resp.text().await.unwrap_or_default();
                if is_missing_container(&body) {
                    error!(container = %self.container, "blob container missing on delete");
                    return Err(BlobError::NotFound(name.to_string()));
                }
                debug!("blob already absent");
                Ok(())
            }
            _ => {
                let err = status_error(resp).await;
                error!(error = %err, "blob delete failed");
                Err(err)
            }
        }
    }

    #[instrument(skip(self), fields(blob = %name))]
    async fn get_url(&self, name: &str) -> Result<String, BlobError> {
        check_name(name)?;
        let url = self.object_url(name);
        let resp = self.send(self.http.head(&url)).await?;
        match resp.status() {
            s if s.is_success() => Ok(url),
            StatusCode::NOT_FOUND => {
                error!("blob does not exist");
                Err(BlobError::NotFound(name.to_string()))
            }
            _ => Err(status_error(resp).await),
        }
    }
}
