//! Test helpers (sample offers, scripted port fakes, log capture).

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tracing_subscriber::fmt::MakeWriter;

use crate::domain::{
    ImageError, ImageFailure, ImagePayload, Offer, PostId, PublishError,
};
use crate::ports::{FixedClock, ImageSource, PhotoApi, PhotoPost};

pub fn offer_json(title: &str, link: &str) -> serde_json::Value {
    serde_json::json!({
        "titulo": title,
        "precio_actual": 1299,
        "precio_original": 2599,
        "descuento": 50,
        "enlace": link,
        "vendidos": 37,
        "imagen": format!("{link}/img.webp"),
    })
}

pub fn offer(title: &str, link: &str) -> Offer {
    serde_json::from_value(offer_json(title, link)).unwrap()
}

pub fn fixed_clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap())
}

/// Image source answering from a per-URL table; unknown URLs are 404s.
#[derive(Default)]
pub struct FakeImageSource {
    images: HashMap<String, ImagePayload>,
    calls: Mutex<Vec<String>>,
}

impl FakeImageSource {
    pub fn with_image(mut self, url: &str, content_type: &str) -> Self {
        self.images
            .insert(url.to_string(), ImagePayload::new(b"img".to_vec(), content_type));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageSource for FakeImageSource {
    async fn fetch(&self, url: &str) -> Result<ImagePayload, ImageError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| ImageError::new(url, ImageFailure::Status(404)))
    }
}

/// What the fake API saw for one call.
#[derive(Debug, Clone)]
pub struct RecordedPost {
    pub filename: String,
    pub caption: String,
    pub content_type: String,
    pub at: tokio::time::Instant,
}

/// Photo API replaying scripted results; once the script runs out every
/// call succeeds with `post_<n>`.
#[derive(Default)]
pub struct FakePhotoApi {
    script: Mutex<VecDeque<Result<PostId, PublishError>>>,
    posts: Mutex<Vec<RecordedPost>>,
}

impl FakePhotoApi {
    pub fn failing_times(n: usize) -> Self {
        let api = Self::default();
        for i in 0..n {
            api.push(Err(PublishError::Status {
                status: 500,
                body: format!("boom {i}"),
                headers: Vec::new(),
            }));
        }
        api
    }

    pub fn push(&self, result: Result<PostId, PublishError>) {
        self.script.lock().unwrap().push_back(result);
    }

    pub fn posts(&self) -> Vec<RecordedPost> {
        self.posts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }
}

#[async_trait]
impl PhotoApi for FakePhotoApi {
    async fn create_photo_post(&self, post: PhotoPost<'_>) -> Result<PostId, PublishError> {
        let n = {
            let mut posts = self.posts.lock().unwrap();
            posts.push(RecordedPost {
                filename: post.filename.to_string(),
                caption: post.caption.to_string(),
                content_type: post.image.content_type.clone(),
                at: tokio::time::Instant::now(),
            });
            posts.len()
        };
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(PostId::new(format!("post_{n}"))))
    }
}

/// In-memory log sink for asserting on emitted events.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Number of lines logged at `level` ("ERROR", "WARN", ...).
    pub fn count(&self, level: &str) -> usize {
        let tag = format!(" {level} ");
        self.contents().lines().filter(|line| line.contains(&tag)).count()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Capture events on the current thread until the guard drops. Use with the
/// default current-thread `#[tokio::test]` runtime.
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
