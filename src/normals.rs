use rayon::prelude::*;

use crate::foundation::{
    error::{TexelError, TexelResult},
    image::{CH_G, CH_R, ImageF32},
};

/// Reconstructed Z is clamped to this minimum before slope division.
/// Slopes are undefined at z = 0; the clamp avoids a division by zero
/// without materially changing the visual result.
const MIN_SLOPE_Z: f32 = 0.001;

/// Decode a stored channel value into a signed normal component in `[-1, 1]`.
fn decode(v: f32) -> f32 {
    2.0 * v.clamp(0.0, 1.0) - 1.0
}

/// Encode a signed normal component into the stored `[0, 1]` range.
fn encode(v: f32) -> f32 {
    (v + 1.0) * 0.5
}

/// Reconstruct a unit normal from its X/Y components.
///
/// When `x² + y² > 1` (denormalized input) X and Y are scaled back onto the
/// unit circle and Z becomes 0; otherwise `z = sqrt(1 - x² - y²)`. The
/// radicand is clamped non-negative for float safety. Z is always `>= 0`.
fn reconstruct_unit(x: f32, y: f32) -> (f32, f32, f32) {
    let l_sq = x * x + y * y;
    if l_sq > 1.0 {
        let inv = 1.0 / l_sq.sqrt();
        (x * inv, y * inv, 0.0)
    } else {
        (x, y, (1.0 - l_sq).max(0.0).sqrt())
    }
}

fn require_normal_map(img: &ImageF32, name: &str) -> TexelResult<()> {
    if img.channels() < 3 {
        return Err(TexelError::shape(format!(
            "{name} must have at least 3 channels, a normal map cannot be single-channel"
        )));
    }
    Ok(())
}

/// Combine two normal maps by summing the surface slopes they encode.
///
/// Adding normals directly is not a valid way to combine bump information;
/// adding the slopes of the heightfields they implicitly represent is.
/// Strengths are clamped to `[0, 1]` and weight each map's slope
/// contribution; a strength of 0 nulls that map's contribution entirely
/// rather than passing the other map through.
///
/// Only the encoded X/Y channels of the inputs are consulted. The output is
/// a 3-channel map of the same size whose decoded vectors are unit length
/// with `z > 0` by construction.
///
/// Fails with [`TexelError::Shape`] when either input is single-channel or
/// the inputs differ in size (the caller pre-matches sizes; no resizing is
/// performed here).
#[tracing::instrument(skip(n, m))]
pub fn combine_normals(
    n: &ImageF32,
    n_strength: f32,
    m: &ImageF32,
    m_strength: f32,
) -> TexelResult<ImageF32> {
    require_normal_map(n, "normal map 1")?;
    require_normal_map(m, "normal map 2")?;
    if n.width() != m.width() || n.height() != m.height() {
        return Err(TexelError::shape(format!(
            "normal maps must match in size, got {}x{} and {}x{}",
            n.width(),
            n.height(),
            m.width(),
            m.height()
        )));
    }

    let n_strength = n_strength.clamp(0.0, 1.0);
    let m_strength = m_strength.clamp(0.0, 1.0);

    let width = n.width();
    let mut out = ImageF32::new(width, n.height(), 3)?;
    let row_len = width as usize * 3;
    let n_data = n.data();
    let m_data = m.data();
    let n_ch = n.channels();
    let m_ch = m.channels();

    out.data_mut()
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width as usize {
                let n_px = (y * width as usize + x) * n_ch;
                let m_px = (y * width as usize + x) * m_ch;

                let (n_x, n_y, n_z) =
                    reconstruct_unit(decode(n_data[n_px + CH_R]), decode(n_data[n_px + CH_G]));
                let (m_x, m_y, m_z) =
                    reconstruct_unit(decode(m_data[m_px + CH_R]), decode(m_data[m_px + CH_G]));

                let n_f = n_strength / n_z.max(MIN_SLOPE_Z);
                let m_f = m_strength / m_z.max(MIN_SLOPE_Z);
                let a = n_x * n_f + m_x * m_f;
                let b = n_y * n_f + m_y * m_f;

                // Unit by construction: (a*r)² + (b*r)² + r² = 1.
                let r = 1.0 / (a * a + b * b + 1.0).sqrt();

                let px = x * 3;
                row[px] = r; // z, already in stored range
                row[px + CH_G] = encode(b * r);
                row[px + CH_R] = encode(a * r);
            }
        });

    Ok(out)
}

/// Re-normalize an encoded normal map from its X/Y channels alone.
///
/// Decodes X/Y, reconstructs Z assuming a unit normal, and re-encodes as a
/// 3-channel map. Fails with [`TexelError::Shape`] on single-channel input.
#[tracing::instrument(skip(img))]
pub fn normalize_normal_map(img: &ImageF32) -> TexelResult<ImageF32> {
    require_normal_map(img, "normal map")?;

    let width = img.width();
    let mut out = ImageF32::new(width, img.height(), 3)?;
    let row_len = width as usize * 3;
    let data = img.data();
    let ch = img.channels();

    out.data_mut()
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width as usize {
                let src = (y * width as usize + x) * ch;
                let (nx, ny, nz) =
                    reconstruct_unit(decode(data[src + CH_R]), decode(data[src + CH_G]));
                let px = x * 3;
                row[px] = nz;
                row[px + CH_G] = encode(ny);
                row[px + CH_R] = encode(nx);
            }
        });

    Ok(out)
}

#[cfg(test)]
#[path = "../tests/unit/normals.rs"]
mod tests;
