use serde::{Deserialize, Serialize};

/// Width/height accessors of an image payload.
pub trait ImageSize {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    /// Black image of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }
}

fn clamp_u32(v: usize) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}

impl ImageSize for GrayImage {
    fn width(&self) -> u32 {
        clamp_u32(self.width)
    }

    fn height(&self) -> u32 {
        clamp_u32(self.height)
    }
}

#[cfg(feature = "image")]
impl ImageSize for ::image::GrayImage {
    fn width(&self) -> u32 {
        ::image::GrayImage::width(self)
    }

    fn height(&self) -> u32 {
        ::image::GrayImage::height(self)
    }
}

/// Time-synchronized left/right frames.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StereoPair<I> {
    pub left: I,
    pub right: I,
}

impl<I> StereoPair<I> {
    pub fn new(left: I, right: I) -> Self {
        Self { left, right }
    }
}
