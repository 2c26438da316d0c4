//! Pixel classification rules.
//!
//! A rule decides per pixel whether it belongs to the foreground (kept as-is)
//! or the background (replaced with [`Pixel::TRANSPARENT`]). Rules look at a
//! single pixel only; they never see neighbors.
//!
//! The thresholds below are fixed. Comparisons are strict, so a pixel sitting
//! exactly on a threshold falls on the "not matched" side.

use std::fmt;

use serde::Deserialize;

use super::pixel::Pixel;

/// Channels below this value count as dark.
const DARK_LIMIT: u8 = 50;
/// Channels above this value count as white.
const WHITE_LIMIT: u8 = 200;
/// Red above this value may count as red.
const RED_LIMIT: u8 = 150;
/// Red must exceed both green and blue by more than this margin.
const RED_MARGIN: u16 = 50;

/// Per-pixel foreground/background predicate.
pub trait PixelRule {
    /// Returns `true` if the pixel is kept, `false` if it becomes transparent.
    fn is_foreground(&self, pixel: Pixel) -> bool;
}

impl<F> PixelRule for F
where
    F: Fn(Pixel) -> bool,
{
    #[inline]
    fn is_foreground(&self, pixel: Pixel) -> bool {
        self(pixel)
    }
}

/// Drops near-black pixels, keeps everything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct DarkBackground;

impl PixelRule for DarkBackground {
    #[inline]
    fn is_foreground(&self, pixel: Pixel) -> bool {
        !(pixel.r < DARK_LIMIT && pixel.g < DARK_LIMIT && pixel.b < DARK_LIMIT)
    }
}

/// Keeps near-white and clearly red pixels, drops everything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhiteRed;

impl WhiteRed {
    #[inline]
    fn is_white(pixel: Pixel) -> bool {
        pixel.r > WHITE_LIMIT && pixel.g > WHITE_LIMIT && pixel.b > WHITE_LIMIT
    }

    #[inline]
    fn is_red(pixel: Pixel) -> bool {
        // widened so `g + 50` cannot wrap
        let (r, g, b) = (pixel.r as u16, pixel.g as u16, pixel.b as u16);
        pixel.r > RED_LIMIT && r > g + RED_MARGIN && r > b + RED_MARGIN
    }
}

impl PixelRule for WhiteRed {
    #[inline]
    fn is_foreground(&self, pixel: Pixel) -> bool {
        Self::is_white(pixel) || Self::is_red(pixel)
    }
}

/// Built-in rule selector, used by the CLI and `nobg.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RulePreset {
    /// Near-black background: `r < 50 && g < 50 && b < 50` is dropped.
    #[default]
    DarkBackground,
    /// White text plus red accent on any background.
    WhiteRed,
}

impl RulePreset {
    pub const fn name(self) -> &'static str {
        match self {
            Self::DarkBackground => "dark-background",
            Self::WhiteRed => "white-red",
        }
    }
}

impl PixelRule for RulePreset {
    #[inline]
    fn is_foreground(&self, pixel: Pixel) -> bool {
        match self {
            Self::DarkBackground => DarkBackground.is_foreground(pixel),
            Self::WhiteRed => WhiteRed.is_foreground(pixel),
        }
    }
}

impl fmt::Display for RulePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
