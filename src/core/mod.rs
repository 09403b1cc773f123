//! Core value types and the ordered sample store

pub mod motion;
pub mod time;
pub mod timeline;

pub use motion::{Motion, Sample};
pub use time::{Duration, Instant};
pub use timeline::Timeline;
