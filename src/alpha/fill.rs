use rayon::prelude::*;

use crate::alpha::mask::AlphaMask;
use crate::foundation::{
    error::{TexelError, TexelResult},
    image::{CH_A, ImageF32},
};

/// Extension radius used after the fragment-blur pre-pass.
const EXTEND_AFTER_BLUR_RADIUS: u32 = 8;
/// Extension radius when no fragment-blur pre-pass runs. Wider, to cover
/// larger transparent regions directly from their boundary.
const EXTEND_ONLY_RADIUS: u32 = 40;
/// Fragment-blur box kernel radii are `2^0 .. 2^(SCALE_COUNT-1)`.
const FRAGMENT_SCALE_COUNT: u32 = 6;
/// Blurred coverage below this is numerically meaningless and leaves the
/// pixel unknown.
const COVERAGE_EPS: f32 = 1e-4;

/// 8-neighborhood in row-major scan order. Also the tie-break priority when
/// several equally-near known pixels compete during edge extension.
const NEIGHBORS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Strategy for reconstructing colors in transparent regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMethod {
    /// Texture-aware: masked fragment blur approximates interior colors of
    /// enclosed transparent regions, then edge extension (radius 8) crisps
    /// the boundary rim.
    FragmentBlurThenExtend,
    /// Plain edge extension with radius 40.
    EdgeExtendOnly,
}

impl FillMethod {
    /// Parse the node framework's string selector.
    ///
    /// Fails with [`TexelError::InvalidMethod`] on an unrecognized selector.
    pub fn parse(kind: &str) -> TexelResult<Self> {
        let kind = kind.trim().to_ascii_lowercase();
        if kind.is_empty() {
            return Err(TexelError::invalid_method("fill method must be non-empty"));
        }
        match kind.as_str() {
            "fragment_blur_then_extend" | "extend_texture" | "texture" => {
                Ok(Self::FragmentBlurThenExtend)
            }
            "edge_extend_only" | "extend_color" | "color" => Ok(Self::EdgeExtendOnly),
            other => Err(TexelError::invalid_method(format!(
                "unknown fill method '{other}'"
            ))),
        }
    }
}

/// Fill the transparent pixels of an RGBA image with nearby colors.
///
/// Consumes the input and uses it as scratch space. The alpha channel is
/// binarized into an explicit [`AlphaMask`] (known iff alpha is near 1.0)
/// which the passes mutate as they fill pixels; partial coverage never
/// survives a pass, so the mask stays crisp between passes.
///
/// Pixels no pass reaches are composited against black, so every output
/// pixel is fully defined. Returns a 3-channel BGR image of the same size.
///
/// Edge extension assigns each reached pixel the color of one specific
/// nearest known pixel; when several are equally near, the first in
/// row-major neighbor order wins (deterministic for fixed input).
///
/// Fails with [`TexelError::Shape`] unless the input has exactly 4 channels.
#[tracing::instrument(skip(img))]
pub fn fill_alpha(mut img: ImageF32, method: FillMethod) -> TexelResult<ImageF32> {
    if img.channels() != 4 {
        return Err(TexelError::shape(format!(
            "fill_alpha requires a 4-channel image, got {} channels",
            img.channels()
        )));
    }

    let mut mask = AlphaMask::binarize(&img)?;
    match method {
        FillMethod::FragmentBlurThenExtend => {
            fragment_blur(&mut img, &mut mask);
            edge_extend(&mut img, &mut mask, EXTEND_AFTER_BLUR_RADIUS);
        }
        FillMethod::EdgeExtendOnly => {
            edge_extend(&mut img, &mut mask, EXTEND_ONLY_RADIUS);
        }
    }
    tracing::debug!(unknown = mask.unknown_count(), "alpha reconstruction done");

    finalize_rgb(&img, &mask)
}

/// Masked pyramid diffusion: bleed known color into unknown regions.
///
/// For each scale, box-blur the mask-premultiplied color and the coverage
/// plane, then give every still-unknown pixel with usable blurred coverage
/// the renormalized color and mark it known for the next scale. Unknown
/// pixels never influence output except transitively through reached known
/// pixels. Islands of known color merge across gaps of up to roughly the
/// summed kernel radii.
fn fragment_blur(img: &mut ImageF32, mask: &mut AlphaMask) {
    let w = img.width() as usize;
    let h = img.height() as usize;
    let mut premult = vec![0.0f32; w * h * 3];
    let mut coverage = vec![0.0f32; w * h];

    for scale in 0..FRAGMENT_SCALE_COUNT {
        let radius = 1usize << scale;

        let data = img.data();
        for i in 0..w * h {
            if mask.known_at(i) {
                coverage[i] = 1.0;
                premult[i * 3..i * 3 + 3].copy_from_slice(&data[i * 4..i * 4 + 3]);
            } else {
                coverage[i] = 0.0;
                premult[i * 3..i * 3 + 3].fill(0.0);
            }
        }

        let blurred = box_blur(&premult, w, h, 3, radius);
        let blurred_cov = box_blur(&coverage, w, h, 1, radius);

        let data = img.data_mut();
        let mut filled = 0usize;
        for i in 0..w * h {
            if mask.known_at(i) || blurred_cov[i] <= COVERAGE_EPS {
                continue;
            }
            let inv = 1.0 / blurred_cov[i];
            for c in 0..3 {
                data[i * 4 + c] = (blurred[i * 3 + c] * inv).clamp(0.0, 1.0);
            }
            data[i * 4 + CH_A] = 1.0;
            mask.mark_known(i);
            filled += 1;
        }
        tracing::debug!(radius, filled, "fragment blur scale");
    }
}

/// Separable edge-clamped box blur over an interleaved `ch`-channel plane.
fn box_blur(src: &[f32], w: usize, h: usize, ch: usize, radius: usize) -> Vec<f32> {
    let mut tmp = vec![0.0f32; src.len()];
    let mut out = vec![0.0f32; src.len()];
    let row_len = w * ch;
    let norm = 1.0 / (2 * radius + 1) as f32;

    tmp.par_chunks_mut(row_len).enumerate().for_each(|(y, dst)| {
        let row = &src[y * row_len..(y + 1) * row_len];
        for x in 0..w {
            for c in 0..ch {
                let mut acc = 0.0f32;
                for k in 0..=2 * radius {
                    let sx = (x + k).saturating_sub(radius).min(w - 1);
                    acc += row[sx * ch + c];
                }
                dst[x * ch + c] = acc * norm;
            }
        }
    });

    out.par_chunks_mut(row_len).enumerate().for_each(|(y, dst)| {
        for x in 0..w {
            for c in 0..ch {
                let mut acc = 0.0f32;
                for k in 0..=2 * radius {
                    let sy = (y + k).saturating_sub(radius).min(h - 1);
                    acc += tmp[sy * row_len + x * ch + c];
                }
                dst[x * ch + c] = acc * norm;
            }
        }
    });

    out
}

/// Multi-source ring propagation: every unknown pixel within `radius` rings
/// of a known pixel receives the color of its nearest known pixel. Ring `k`
/// reads only pixels filled in rings `< k`, so fills within one ring never
/// feed each other. The radius bounds ring count, not Euclidean distance.
fn edge_extend(img: &mut ImageF32, mask: &mut AlphaMask, radius: u32) {
    let w = img.width() as i64;
    let h = img.height() as i64;

    // Ring index per pixel: 0 for seeds, MAX for unreached.
    let mut dist = vec![u32::MAX; mask.len()];
    let mut prev_ring = Vec::new();
    for i in 0..mask.len() {
        if mask.known_at(i) {
            dist[i] = 0;
            prev_ring.push(i);
        }
    }

    for ring in 1..=radius {
        let mut candidates = Vec::new();
        for &p in &prev_ring {
            let x = (p as i64) % w;
            let y = (p as i64) / w;
            for (dx, dy) in NEIGHBORS {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= w || ny >= h {
                    continue;
                }
                let n = (ny * w + nx) as usize;
                if dist[n] == u32::MAX {
                    candidates.push(n);
                }
            }
        }
        candidates.sort_unstable();
        candidates.dedup();

        let data = img.data_mut();
        let mut next_ring = Vec::with_capacity(candidates.len());
        for &p in &candidates {
            let x = (p as i64) % w;
            let y = (p as i64) / w;
            // First known neighbor from an earlier ring wins the tie-break.
            let source = NEIGHBORS.iter().find_map(|&(dx, dy)| {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= w || ny >= h {
                    return None;
                }
                let n = (ny * w + nx) as usize;
                (dist[n] < ring).then_some(n)
            });
            let Some(s) = source else { continue };
            for c in 0..3 {
                data[p * 4 + c] = data[s * 4 + c];
            }
            data[p * 4 + CH_A] = 1.0;
            dist[p] = ring;
            mask.mark_known(p);
            next_ring.push(p);
        }

        if next_ring.is_empty() {
            break;
        }
        prev_ring = next_ring;
    }
}

/// Composite against black where still unknown, drop alpha, return BGR.
fn finalize_rgb(img: &ImageF32, mask: &AlphaMask) -> TexelResult<ImageF32> {
    let w = img.width() as usize;
    let mut out = ImageF32::new(img.width(), img.height(), 3)?;
    let src = img.data();

    out.data_mut()
        .par_chunks_mut(w * 3)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..w {
                let i = y * w + x;
                let a = if mask.known_at(i) { 1.0 } else { 0.0 };
                for c in 0..3 {
                    row[x * 3 + c] = src[i * 4 + c] * a;
                }
            }
        });

    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/alpha/fill.rs"]
mod tests;
