//! HttpImageFetcher - reqwest による画像取得
//!
//! # フロー
//! 1. HEAD で存在確認（リダイレクト最大 5 回、2xx/3xx を許容）→ 最終 URL を確定
//! 2. 最終 URL に GET、本文を上限（4 MiB）まで読む
//! 3. content-type が `image/` で始まること、宣言サイズと実サイズが上限以内であることを検証

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, redirect};

use super::describe;
use crate::config::HttpLimits;
use crate::domain::{ImageError, ImageFailure, ImagePayload};
use crate::ports::ImageSource;

pub struct HttpImageFetcher {
    client: Client,
    max_bytes: u64,
}

impl HttpImageFetcher {
    pub fn new(limits: &HttpLimits) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .redirect(redirect::Policy::limited(limits.max_redirects))
            .timeout(limits.request_timeout)
            .user_agent(concat!("offerpost/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            max_bytes: limits.max_image_bytes,
        })
    }

    /// Existence check; returns the URL after redirects.
    async fn resolve(&self, url: &str) -> Result<String, ImageError> {
        let resp = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|e| ImageError::new(url, ImageFailure::Request(describe(&e))))?;

        let status = resp.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(ImageError::new(url, ImageFailure::Status(status.as_u16())));
        }
        Ok(resp.url().to_string())
    }

    async fn download(&self, url: &str) -> Result<ImagePayload, ImageError> {
        let fail = |reason| ImageError::new(url, reason);

        let mut resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fail(ImageFailure::Request(describe(&e))))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(fail(ImageFailure::Status(status.as_u16())));
        }

        let content_type = image_content_type(&resp).map_err(fail)?;

        if let Some(declared) = resp.content_length()
            && declared > self.max_bytes
        {
            return Err(fail(ImageFailure::DeclaredTooLarge {
                declared,
                limit: self.max_bytes,
            }));
        }

        let mut bytes = Vec::new();
        while let Some(chunk) = resp
            .chunk()
            .await
            .map_err(|e| fail(ImageFailure::Request(describe(&e))))?
        {
            if (bytes.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(fail(ImageFailure::BodyTooLarge {
                    limit: self.max_bytes,
                }));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(ImagePayload::new(bytes, content_type))
    }
}

fn image_content_type(resp: &Response) -> Result<String, ImageFailure> {
    let value = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ImageFailure::MissingContentType)?;

    if !value.to_ascii_lowercase().starts_with("image/") {
        return Err(ImageFailure::NotAnImage(value.to_string()));
    }
    Ok(value.to_string())
}

#[async_trait]
impl ImageSource for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<ImagePayload, ImageError> {
        let resolved = self.resolve(url).await?;
        if resolved != url {
            tracing::debug!(%url, %resolved, "image redirected");
        }
        self.download(&resolved).await
    }
}
