//! GraphPhotoApi - ページへの写真投稿（multipart POST）
//!
//! `POST {graph_base}/{page_id}/photos`
//! - `source`: 画像ファイル（content-type + 合成ファイル名）
//! - `message`: キャプション
//! - `Authorization: Bearer <token>`
//!
//! 1 回の呼び出し = 1 回の POST。リトライは Publisher 側。

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::describe;
use crate::config::Config;
use crate::domain::{PostId, PublishError};
use crate::ports::{PhotoApi, PhotoPost};

pub struct GraphPhotoApi {
    client: Client,
    endpoint: String,
    access_token: String,
    max_upload_bytes: u64,
}

#[derive(Debug, Deserialize)]
struct PhotoResponse {
    #[serde(default)]
    post_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

impl PhotoResponse {
    /// `post_id` is the feed story; `id` (the photo) is the fallback.
    fn into_post_id(self) -> Option<PostId> {
        self.post_id
            .into_iter()
            .chain(self.id)
            .find(|id| !id.trim().is_empty())
            .map(PostId::new)
    }
}

impl GraphPhotoApi {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.http.request_timeout)
            .user_agent(concat!("offerpost/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.photos_endpoint(),
            access_token: config.access_token.clone(),
            max_upload_bytes: config.http.max_upload_bytes,
        })
    }

    fn build_form(&self, post: PhotoPost<'_>) -> Result<Form, PublishError> {
        let size = (post.image.len() + post.caption.len()) as u64;
        if size > self.max_upload_bytes {
            return Err(PublishError::PayloadTooLarge {
                size,
                limit: self.max_upload_bytes,
            });
        }

        let image = Part::bytes(post.image.bytes.clone())
            .file_name(post.filename.to_string())
            .mime_str(post.image.mime())
            .map_err(|e| PublishError::Transport(describe(&e)))?;

        Ok(Form::new()
            .part("source", image)
            .text("message", post.caption.to_string()))
    }
}

#[async_trait]
impl PhotoApi for GraphPhotoApi {
    async fn create_photo_post(&self, post: PhotoPost<'_>) -> Result<PostId, PublishError> {
        let form = self.build_form(post)?;

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PublishError::Transport(describe(&e)))?;

        let status = resp.status();
        let headers: Vec<(String, String)> = resp
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = resp
            .text()
            .await
            .map_err(|e| PublishError::Transport(describe(&e)))?;

        if !status.is_success() {
            return Err(PublishError::Status {
                status: status.as_u16(),
                body,
                headers,
            });
        }

        serde_json::from_str::<PhotoResponse>(&body)
            .ok()
            .and_then(PhotoResponse::into_post_id)
            .ok_or(PublishError::MissingPostId { body })
    }
}
