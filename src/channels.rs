use crate::foundation::{
    error::{TexelError, TexelResult},
    image::{CH_A, ImageF32},
};

/// Split an image into four single-channel planes in channel order.
///
/// Channels the input lacks are padded with all-ones planes, so a
/// 3-channel image yields its B/G/R planes plus a solid alpha plane.
/// Typically used for splitting off an alpha (transparency) layer.
pub fn split_channels(img: &ImageF32) -> [ImageF32; 4] {
    let solid = || {
        ImageF32::filled(img.width(), img.height(), 1, 1.0)
            .expect("source image dimensions are already validated")
    };
    let plane = |c: usize| {
        if c < img.channels() {
            img.plane(c)
                .expect("channel index is in range for the source image")
        } else {
            solid()
        }
    };
    [plane(0), plane(1), plane(2), plane(3)]
}

/// Merge the channels of 1–4 images into one ≤4-channel image.
///
/// Channels are concatenated in argument order. A 2-channel result
/// duplicates its second channel to form a valid 3-channel image (grayscale
/// plus a repeated plane, as the original graph editor does); more than 4
/// accumulated channels are truncated to 4.
///
/// Fails with [`TexelError::Shape`] when no image is given, the images
/// differ in size, or a supported channel count cannot be formed.
pub fn merge_channels(imgs: &[&ImageF32]) -> TexelResult<ImageF32> {
    let Some(first) = imgs.first() else {
        return Err(TexelError::shape("merge_channels requires at least one image"));
    };
    let (width, height) = (first.width(), first.height());
    for img in imgs {
        if img.width() != width || img.height() != height {
            return Err(TexelError::shape(
                "all images to be merged must be the same resolution",
            ));
        }
    }

    let total: usize = imgs.iter().map(|img| img.channels()).sum();
    let channels = match total {
        1 => 1,
        2 | 3 => 3,
        _ => 4,
    };

    let pixel_count = width as usize * height as usize;
    let mut data = vec![0.0f32; pixel_count * channels];
    let mut written = 0usize;
    for img in imgs {
        let src = img.data();
        let src_ch = img.channels();
        for c in 0..src_ch {
            if written >= channels {
                break;
            }
            for i in 0..pixel_count {
                data[i * channels + written] = src[i * src_ch + c];
            }
            written += 1;
        }
    }
    // A lone 2-channel concatenation repeats its last plane.
    if total == 2 {
        for i in 0..pixel_count {
            data[i * 3 + 2] = data[i * 3 + 1];
        }
    }

    ImageF32::from_data(data, width, height, channels)
}

/// Split an image into its RGB color part and a single-channel alpha plane.
///
/// Single-channel input is replicated to three channels; images without an
/// alpha channel get a solid (opaque) alpha plane.
pub fn split_transparency(img: &ImageF32) -> (ImageF32, ImageF32) {
    let (width, height) = (img.width(), img.height());
    let pixel_count = width as usize * height as usize;
    let src = img.data();
    let ch = img.channels();

    let mut color = vec![0.0f32; pixel_count * 3];
    for i in 0..pixel_count {
        for c in 0..3 {
            color[i * 3 + c] = src[i * ch + c.min(ch - 1)];
        }
    }
    let color = ImageF32::from_data(color, width, height, 3)
        .expect("buffer length matches by construction");

    let alpha = if ch == 4 {
        img.plane(CH_A)
            .expect("4-channel image has an alpha plane")
    } else {
        ImageF32::filled(width, height, 1, 1.0)
            .expect("source image dimensions are already validated")
    };

    (color, alpha)
}

/// Merge an RGB image and a single-channel alpha plane into a 4-channel
/// image.
///
/// Single-channel color input is replicated to three channels; a 4-channel
/// color input contributes only its first three channels. The alpha input's
/// first channel is used.
///
/// Fails with [`TexelError::Shape`] when the inputs differ in size.
pub fn merge_transparency(color: &ImageF32, alpha: &ImageF32) -> TexelResult<ImageF32> {
    if color.width() != alpha.width() || color.height() != alpha.height() {
        return Err(TexelError::shape(
            "color and alpha must be the same resolution",
        ));
    }

    let (width, height) = (color.width(), color.height());
    let pixel_count = width as usize * height as usize;
    let src = color.data();
    let ch = color.channels();
    let a = alpha.data();
    let a_ch = alpha.channels();

    let mut data = vec![0.0f32; pixel_count * 4];
    for i in 0..pixel_count {
        for c in 0..3 {
            data[i * 4 + c] = src[i * ch + c.min(ch - 1)];
        }
        data[i * 4 + CH_A] = a[i * a_ch];
    }

    ImageF32::from_data(data, width, height, 4)
}

#[cfg(test)]
#[path = "../tests/unit/channels.rs"]
mod tests;
