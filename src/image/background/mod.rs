//! Remove background from logos.
//!
//! Each pixel is judged on its own by a [`PixelRule`]. Rejected pixels become
//! fully transparent `(0, 0, 0, 0)`, kept pixels pass through untouched,
//! alpha included. There is no edge smoothing and no neighborhood analysis.

mod error;
mod pixel;
mod process;
mod rule;

pub use error::TranscodeError;
pub use process::{Summary, preview, transcode};
pub use rule::RulePreset;
