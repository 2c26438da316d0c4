use image::Rgba;

/// A single RGBA pixel with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    /// Fully transparent sentinel written in place of background pixels.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque pixel (alpha = 255).
    #[cfg(test)]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, u8::MAX)
    }
}

impl From<Rgba<u8>> for Pixel {
    #[inline]
    fn from(Rgba([r, g, b, a]): Rgba<u8>) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Pixel> for Rgba<u8> {
    #[inline]
    fn from(pixel: Pixel) -> Self {
        Rgba([pixel.r, pixel.g, pixel.b, pixel.a])
    }
}
