use rayon::prelude::*;

use crate::foundation::error::{TexelError, TexelResult};

/// Index of the blue channel.
///
/// Channel order is BGR(A), inherited from the vision library used by the
/// surrounding node framework for file I/O. Downstream nodes assume it.
pub const CH_B: usize = 0;
/// Index of the green channel.
pub const CH_G: usize = 1;
/// Index of the red channel.
pub const CH_R: usize = 2;
/// Index of the alpha channel (4-channel images only).
pub const CH_A: usize = 3;

/// Owned floating-point pixel buffer.
///
/// Samples are row-major, interleaved, tightly packed
/// (`len == width * height * channels`) with 1, 3, or 4 channels. Standard
/// images hold samples normalized to `[0, 1]`; operations may assume that
/// invariant after [`ImageF32::normalize`] has run.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageF32 {
    data: Vec<f32>,
    width: u32,
    height: u32,
    channels: usize,
}

impl ImageF32 {
    /// Allocate a zero-filled image.
    pub fn new(width: u32, height: u32, channels: usize) -> TexelResult<Self> {
        let len = checked_len(width, height, channels)?;
        Ok(Self {
            data: vec![0.0; len],
            width,
            height,
            channels,
        })
    }

    /// Allocate an image with every sample set to `value`.
    pub fn filled(width: u32, height: u32, channels: usize, value: f32) -> TexelResult<Self> {
        let len = checked_len(width, height, channels)?;
        Ok(Self {
            data: vec![value; len],
            width,
            height,
            channels,
        })
    }

    /// Wrap an existing sample buffer.
    ///
    /// Fails with [`TexelError::Shape`] when the buffer length does not match
    /// `width * height * channels` or the channel count is not 1, 3, or 4.
    pub fn from_data(
        data: Vec<f32>,
        width: u32,
        height: u32,
        channels: usize,
    ) -> TexelResult<Self> {
        let len = checked_len(width, height, channels)?;
        if data.len() != len {
            return Err(TexelError::shape(format!(
                "sample buffer length {} does not match {width}x{height}x{channels}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of interleaved channels (1, 3, or 4).
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Shape query in `(height, width, channels)` order.
    pub fn shape(&self) -> (u32, u32, usize) {
        (self.height, self.width, self.channels)
    }

    /// Borrow the raw sample buffer.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutably borrow the raw sample buffer.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consume the image, returning the raw sample buffer.
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Read one sample. Panics on out-of-bounds coordinates.
    pub fn sample(&self, x: u32, y: u32, c: usize) -> f32 {
        self.data[self.sample_index(x, y, c)]
    }

    /// Write one sample. Panics on out-of-bounds coordinates.
    pub fn set_sample(&mut self, x: u32, y: u32, c: usize, value: f32) {
        let idx = self.sample_index(x, y, c);
        self.data[idx] = value;
    }

    pub(crate) fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels
    }

    fn sample_index(&self, x: u32, y: u32, c: usize) -> usize {
        debug_assert!(x < self.width && y < self.height && c < self.channels);
        self.pixel_index(x, y) + c
    }

    /// Extract one channel as a new single-channel image.
    pub fn plane(&self, c: usize) -> TexelResult<ImageF32> {
        if c >= self.channels {
            return Err(TexelError::shape(format!(
                "channel {c} out of range for a {}-channel image",
                self.channels
            )));
        }
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize);
        out.extend(self.data.iter().skip(c).step_by(self.channels));
        ImageF32::from_data(out, self.width, self.height, 1)
    }

    /// Clamp every sample to `[0, 1]`, snapping non-finite samples to 0.
    ///
    /// Establishes the normalization invariant the operations in this crate
    /// assume on entry.
    pub fn normalize(&mut self) {
        let row_len = self.width as usize * self.channels;
        self.data.par_chunks_mut(row_len).for_each(|row| {
            for v in row {
                *v = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
            }
        });
    }
}

fn checked_len(width: u32, height: u32, channels: usize) -> TexelResult<usize> {
    if width == 0 || height == 0 {
        return Err(TexelError::shape("image dimensions must be non-zero"));
    }
    if !matches!(channels, 1 | 3 | 4) {
        return Err(TexelError::shape(format!(
            "channel count must be 1, 3, or 4, got {channels}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| TexelError::shape("image buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/image.rs"]
mod tests;
