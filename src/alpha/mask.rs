use crate::foundation::{
    error::{TexelError, TexelResult},
    image::{CH_A, ImageF32},
};

/// Binary known/unknown partition of an image's pixels.
///
/// Built from the alpha channel of an RGBA image: a pixel is *known* when
/// its alpha is sufficiently near 1.0, *unknown* otherwise. Reconstruction
/// passes mutate the mask as they fill pixels; it lives for one
/// reconstruction call and is discarded afterwards.
#[derive(Clone, Debug)]
pub struct AlphaMask {
    known: Vec<bool>,
    width: u32,
    height: u32,
}

impl AlphaMask {
    /// Alpha at or above this value counts as known.
    ///
    /// Antialiased edge pixels fall below it, are treated as unknown, and
    /// get re-filled from solid neighbors by the reconstruction passes.
    pub const KNOWN_MIN: f32 = 0.999;

    /// Binarize the alpha channel of a 4-channel image.
    ///
    /// Fails with [`TexelError::Shape`] unless the image has exactly 4
    /// channels.
    pub fn binarize(img: &ImageF32) -> TexelResult<Self> {
        if img.channels() != 4 {
            return Err(TexelError::shape(format!(
                "alpha mask requires a 4-channel image, got {} channels",
                img.channels()
            )));
        }
        let known = img
            .data()
            .chunks_exact(4)
            .map(|px| px[CH_A] >= Self::KNOWN_MIN)
            .collect();
        Ok(Self {
            known,
            width: img.width(),
            height: img.height(),
        })
    }

    /// Mask width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Mask height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the pixel at `(x, y)` is known.
    pub fn is_known(&self, x: u32, y: u32) -> bool {
        self.known[self.index(x, y)]
    }

    /// Number of unknown pixels remaining.
    pub fn unknown_count(&self) -> usize {
        self.known.iter().filter(|&&k| !k).count()
    }

    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub(crate) fn known_at(&self, idx: usize) -> bool {
        self.known[idx]
    }

    pub(crate) fn mark_known(&mut self, idx: usize) {
        self.known[idx] = true;
    }

    pub(crate) fn len(&self) -> usize {
        self.known.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/alpha/mask.rs"]
mod tests;
