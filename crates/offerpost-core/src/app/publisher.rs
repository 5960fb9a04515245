//! Publisher - 1 件のオファーを投稿する
//!
//! # フロー（1 attempt）
//! 1. メイン画像を取得、失敗したら代替画像
//! 2. multipart（画像 + キャプション）で投稿
//! 3. post id が返れば ledger に記録
//!
//! 失敗した attempt は `RetryPolicy` に従って線形バックオフで再試行し、
//! 上限に達したらその回はあきらめる（`None`）。

use std::sync::Arc;

use crate::domain::{ImageError, ImagePayload, Offer, OfferId, PostId, PublishError};
use crate::ports::{Clock, ImageSource, PhotoApi, PhotoPost};
use crate::retry::RetryPolicy;
use crate::store::Ledger;

use super::caption::CaptionTemplate;

pub struct Publisher {
    images: Arc<dyn ImageSource>,
    api: Arc<dyn PhotoApi>,
    ledger: Arc<Ledger>,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
    caption: CaptionTemplate,
}

impl Publisher {
    pub fn new(
        images: Arc<dyn ImageSource>,
        api: Arc<dyn PhotoApi>,
        ledger: Arc<Ledger>,
        clock: Arc<dyn Clock>,
        retry: RetryPolicy,
        caption: CaptionTemplate,
    ) -> Self {
        Self {
            images,
            api,
            ledger,
            clock,
            retry,
            caption,
        }
    }

    /// Publish `offer`, retrying per the policy.
    ///
    /// Returns the remote post id, or `None` once every attempt has failed.
    /// Successful posts are recorded in the ledger before returning.
    pub async fn publish(&self, offer: &Offer) -> Option<PostId> {
        let offer_id = OfferId::for_offer(offer);
        let caption = self.caption.render(offer);
        let mut attempt = 1;

        loop {
            match self.attempt(offer, &caption).await {
                Ok(post_id) => {
                    tracing::info!(%offer_id, %post_id, attempt, title = %offer.title, "published offer");
                    if let Err(err) = self.ledger.append(offer, &post_id).await {
                        tracing::error!(%offer_id, %post_id, error = %err, "published but failed to record in ledger");
                    }
                    return Some(post_id);
                }
                Err(err) if self.retry.should_retry(attempt) => {
                    let delay = self.retry.next_delay(attempt);
                    tracing::warn!(%offer_id, attempt, error = %err, ?delay, "publish attempt failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    log_give_up(&offer_id, attempt, &err);
                    return None;
                }
            }
        }
    }

    async fn attempt(&self, offer: &Offer, caption: &str) -> Result<PostId, PublishError> {
        let image = self.fetch_image(offer).await?;
        let filename = format!("{}.{}", self.clock.now().timestamp_millis(), image.subtype());

        self.api
            .create_photo_post(PhotoPost {
                image: &image,
                filename: &filename,
                caption,
            })
            .await
    }

    async fn fetch_image(&self, offer: &Offer) -> Result<ImagePayload, ImageError> {
        match self.images.fetch(&offer.image_url).await {
            Ok(image) => Ok(image),
            Err(err) => match offer.alternate_image() {
                Some(alternate) => {
                    tracing::warn!(error = %err, %alternate, "primary image rejected, trying alternate");
                    self.images.fetch(alternate).await
                }
                None => Err(err),
            },
        }
    }
}

fn log_give_up(offer_id: &OfferId, attempts: u32, err: &PublishError) {
    match err {
        PublishError::Status {
            status,
            body,
            headers,
        } => tracing::error!(
            %offer_id,
            attempts,
            status,
            %body,
            ?headers,
            "giving up on offer"
        ),
        other => tracing::error!(%offer_id, attempts, error = %other, "giving up on offer"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ImageFailure;
    use crate::test_support::{FakeImageSource, FakePhotoApi, fixed_clock, offer};
    use std::time::Duration;
    use tempfile::{TempDir, tempdir};

    struct Harness {
        _dir: TempDir,
        ledger: Arc<Ledger>,
        api: Arc<FakePhotoApi>,
        images: Arc<FakeImageSource>,
        publisher: Publisher,
    }

    fn harness(images: FakeImageSource, api: FakePhotoApi) -> Harness {
        let dir = tempdir().unwrap();
        let clock: Arc<dyn Clock> = Arc::new(fixed_clock());
        let ledger = Arc::new(Ledger::new(dir.path().join("published_offers.json"), clock.clone()));
        let images = Arc::new(images);
        let api = Arc::new(api);
        let publisher = Publisher::new(
            images.clone(),
            api.clone(),
            ledger.clone(),
            clock,
            RetryPolicy::linear_v1(),
            CaptionTemplate::new("https://promo", "disclosure"),
        );
        Harness {
            _dir: dir,
            ledger,
            api,
            images,
            publisher,
        }
    }

    #[tokio::test]
    async fn success_records_in_ledger() {
        let tv = offer("Smart TV", "https://a/tv");
        let h = harness(
            FakeImageSource::default().with_image(&tv.image_url, "image/webp"),
            FakePhotoApi::default(),
        );

        let post_id = h.publisher.publish(&tv).await;

        assert_eq!(post_id, Some(PostId::new("post_1")));
        assert!(h.ledger.contains(&tv).await);
        let posts = h.api.posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].filename, "1714555800000.webp");
        assert_eq!(posts[0].content_type, "image/webp");
        assert!(posts[0].caption.contains("Smart TV"));
    }

    #[tokio::test(start_paused = true)]
    async fn retries_with_linear_backoff_then_succeeds() {
        let tv = offer("Smart TV", "https://a/tv");
        let api = FakePhotoApi::failing_times(2);
        api.push(Ok(PostId::new("page_third")));
        let h = harness(
            FakeImageSource::default().with_image(&tv.image_url, "image/jpeg"),
            api,
        );

        let post_id = h.publisher.publish(&tv).await;

        assert_eq!(post_id, Some(PostId::new("page_third")));
        let posts = h.api.posts();
        assert_eq!(posts.len(), 3);
        let gaps: Vec<Duration> = posts.windows(2).map(|w| w[1].at - w[0].at).collect();
        // 5s after the first failure, 10s after the second
        assert_eq!(gaps, vec![Duration::from_secs(5), Duration::from_secs(10)]);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_three_attempts() {
        let tv = offer("Smart TV", "https://a/tv");
        let h = harness(
            FakeImageSource::default().with_image(&tv.image_url, "image/jpeg"),
            FakePhotoApi::failing_times(3),
        );

        assert_eq!(h.publisher.publish(&tv).await, None);
        assert_eq!(h.api.call_count(), 3);
        assert!(!h.ledger.contains(&tv).await);
    }

    #[tokio::test]
    async fn falls_back_to_alternate_image() {
        let mut tv = offer("Smart TV", "https://a/tv");
        tv.alt_image_url = Some("https://cdn/alt.png".to_string());
        let h = harness(
            FakeImageSource::default().with_image("https://cdn/alt.png", "image/png"),
            FakePhotoApi::default(),
        );

        assert!(h.publisher.publish(&tv).await.is_some());
        assert_eq!(
            h.images.calls(),
            vec![tv.image_url.clone(), "https://cdn/alt.png".to_string()]
        );
        assert_eq!(h.api.posts()[0].filename, "1714555800000.png");
    }

    #[tokio::test(start_paused = true)]
    async fn image_failure_never_reaches_api_or_ledger() {
        let tv = offer("Smart TV", "https://a/tv");
        let h = harness(FakeImageSource::default(), FakePhotoApi::default());

        assert_eq!(h.publisher.publish(&tv).await, None);
        assert_eq!(h.api.call_count(), 0);
        assert_eq!(h.images.calls().len(), 3);
        assert!(h.ledger.entries().await.is_empty());
    }

    #[test]
    fn image_error_converts_into_publish_error() {
        let err: PublishError = ImageError::new("u", ImageFailure::NotAnImage("text/html".into())).into();
        assert!(err.to_string().contains("text/html"));
    }
}
