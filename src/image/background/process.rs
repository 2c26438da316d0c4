use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageError, ImageFormat, ImageReader, RgbaImage};

use crate::image::background::error::TranscodeError;
use crate::image::background::pixel::Pixel;
use crate::image::background::rule::PixelRule;

/// Pixel counts from one classification pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub width: u32,
    pub height: u32,
    /// Foreground pixels passed through unchanged.
    pub kept: usize,
    /// Background pixels replaced with the transparent sentinel.
    pub cleared: usize,
}

impl Summary {
    #[cfg(test)]
    pub const fn total(&self) -> usize {
        self.kept + self.cleared
    }
}

/// Remove background from an image file and write PNG output.
///
/// The PNG is fully encoded in memory before `output` is touched, so a
/// failure never leaves a truncated file behind. Missing parent directories
/// of `output` are an error, not created.
pub fn transcode<R>(input: &Path, output: &Path, rule: &R) -> Result<Summary, TranscodeError>
where
    R: PixelRule + ?Sized,
{
    let img = open_image(input)?;
    let (processed, summary) = process_image(img, rule);
    let bytes = encode_png(&processed)?;

    fs::write(output, bytes).map_err(|err| TranscodeError::OutputWrite(output.to_path_buf(), err))?;
    Ok(summary)
}

/// Classify an image file without writing anything.
pub fn preview<R>(input: &Path, rule: &R) -> Result<Summary, TranscodeError>
where
    R: PixelRule + ?Sized,
{
    let img = open_image(input)?;
    Ok(process_image(img, rule).1)
}

/// Normalize to RGBA8, then clear every pixel the rule rejects.
pub fn process_image<R>(img: DynamicImage, rule: &R) -> (RgbaImage, Summary)
where
    R: PixelRule + ?Sized,
{
    let mut output = img.into_rgba8();
    let summary = apply_rule(&mut output, rule);
    (output, summary)
}

/// Apply `rule` in place, in row-major scan order.
pub fn apply_rule<R>(img: &mut RgbaImage, rule: &R) -> Summary
where
    R: PixelRule + ?Sized,
{
    let (width, height) = img.dimensions();
    let mut cleared = 0;

    for px in img.pixels_mut() {
        if !rule.is_foreground(Pixel::from(*px)) {
            *px = Pixel::TRANSPARENT.into();
            cleared += 1;
        }
    }

    let total = width as usize * height as usize;
    Summary {
        width,
        height,
        kept: total - cleared,
        cleared,
    }
}

fn open_image(input: &Path) -> Result<DynamicImage, TranscodeError> {
    if !input.exists() {
        return Err(TranscodeError::InputNotFound(input.to_path_buf()));
    }

    // Sniff the format from content so a mislabeled extension still decodes.
    ImageReader::open(input)
        .and_then(ImageReader::with_guessed_format)
        .map_err(ImageError::IoError)
        .and_then(ImageReader::decode)
        .map_err(|err| TranscodeError::from_open(input.to_path_buf(), err))
}

fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, TranscodeError> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(TranscodeError::Encode)?;
    Ok(buf.into_inner())
}
