//! Domain model (offers, ids, images, outcomes, errors).
//!
//! 外部 I/O を持たない純粋な型だけを置く。

pub mod errors;
pub mod ids;
pub mod image;
pub mod offer;
pub mod outcome;

pub use self::errors::{ConfigError, ImageError, ImageFailure, PublishError, StoreError};
pub use self::ids::{OfferId, PostId};
pub use self::image::ImagePayload;
pub use self::offer::Offer;
pub use self::outcome::PublishOutcome;
