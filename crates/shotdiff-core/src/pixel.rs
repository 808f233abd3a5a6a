//! RGBA pixel type.
//!
//! Screenshots are compared as straight (non-premultiplied) 8-bit RGBA.
//! Every decoded image is normalized to this layout, so a [`Pixel`] is
//! always four bytes in R, G, B, A order.

/// A single straight-alpha RGBA pixel.
///
/// # Example
///
/// ```rust
/// use shotdiff_core::Pixel;
///
/// let px = Pixel::rgba(255, 128, 0, 255);
/// assert_eq!(px.r(), 255);
/// assert_eq!(px.channels(), [255, 128, 0, 255]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Pixel(pub [u8; 4]);

impl Pixel {
    /// Opaque white.
    pub const WHITE: Pixel = Pixel([255, 255, 255, 255]);
    /// Opaque black.
    pub const BLACK: Pixel = Pixel([0, 0, 0, 255]);
    /// Opaque red, the highlight color of annotated images.
    pub const RED: Pixel = Pixel([255, 0, 0, 255]);
    /// Fully transparent black.
    pub const TRANSPARENT: Pixel = Pixel([0, 0, 0, 0]);

    /// Creates a pixel from its four channels.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Creates an opaque pixel.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        self.0[0]
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        self.0[1]
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        self.0[2]
    }

    /// Alpha channel.
    #[inline]
    pub const fn a(self) -> u8 {
        self.0[3]
    }

    /// Returns the channels as an array.
    #[inline]
    pub const fn channels(self) -> [u8; 4] {
        self.0
    }
}

impl From<[u8; 4]> for Pixel {
    #[inline]
    fn from(channels: [u8; 4]) -> Self {
        Self(channels)
    }
}

impl From<Pixel> for [u8; 4] {
    #[inline]
    fn from(px: Pixel) -> Self {
        px.0
    }
}
