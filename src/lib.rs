//! Texelkit is the numeric core of a node-based image-processing toolkit.
//!
//! The surrounding node framework (graph editor, catalog server, file I/O)
//! hands this crate normalized floating-point pixel buffers and receives
//! new ones back; nothing here performs I/O or holds state across calls.
//!
//! # Operations
//!
//! 1. **Normal combination**: [`combine_normals`] converts two encoded
//!    normal maps into surface slopes, sums the slopes, and re-derives a
//!    unit normal; [`normalize_normal_map`] re-normalizes a single map.
//! 2. **Alpha reconstruction**: [`fill_alpha`] rebuilds colors in
//!    transparent regions of an RGBA image, from interior fragments first
//!    ([`FillMethod::FragmentBlurThenExtend`]) or by edge extension alone
//!    ([`FillMethod::EdgeExtendOnly`]).
//! 3. **Channel plumbing**: [`split_channels`], [`merge_channels`],
//!    [`split_transparency`], [`merge_transparency`].
//!
//! # Conventions
//!
//! - Samples are `f32` normalized to `[0, 1]`; channel order is BGR(A).
//! - Operations are deterministic and synchronous: they run to completion
//!   or fail immediately with a [`TexelError`].
//! - Operations that use their input as scratch take it by value
//!   ([`fill_alpha`]); everything else borrows.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod alpha;
mod channels;
mod foundation;
mod normals;

pub use alpha::fill::{FillMethod, fill_alpha};
pub use alpha::mask::AlphaMask;
pub use channels::{merge_channels, merge_transparency, split_channels, split_transparency};
pub use foundation::error::{TexelError, TexelResult};
pub use foundation::image::{CH_A, CH_B, CH_G, CH_R, ImageF32};
pub use normals::{combine_normals, normalize_normal_map};
