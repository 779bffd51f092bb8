use super::*;

const TOL: f32 = 1e-5;

fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < TOL, "{a} != {b}");
}

/// Constant map encoding the same (x, y, z) at every pixel, BGR order.
fn const_map(width: u32, height: u32, x: f32, y: f32, z: f32) -> ImageF32 {
    let mut data = Vec::new();
    for _ in 0..width as usize * height as usize {
        data.extend_from_slice(&[z, encode(y), encode(x)]);
    }
    ImageF32::from_data(data, width, height, 3).unwrap()
}

fn flat_map(width: u32, height: u32) -> ImageF32 {
    const_map(width, height, 0.0, 0.0, 1.0)
}

fn decode_at(img: &ImageF32, x: u32, y: u32) -> (f32, f32, f32) {
    (
        decode(img.sample(x, y, CH_R)),
        decode(img.sample(x, y, CH_G)),
        img.sample(x, y, 0),
    )
}

#[test]
fn encode_decode_roundtrip() {
    for v in [-1.0f32, -0.25, 0.0, 0.6, 1.0] {
        assert_close(decode(encode(v)), v);
    }
}

#[test]
fn reconstruct_unit_rescales_denormalized_input() {
    let (x, y, z) = reconstruct_unit(0.6, 0.0);
    assert_close(x, 0.6);
    assert_close(y, 0.0);
    assert_close(z, 0.8);

    let (x, y, z) = reconstruct_unit(1.0, 1.0);
    assert_close(x * x + y * y + z * z, 1.0);
    assert_close(z, 0.0);
}

#[test]
fn combining_with_zero_strength_flat_is_identity() {
    let n = const_map(3, 2, 0.6, 0.0, 0.8);
    let out = combine_normals(&n, 1.0, &flat_map(3, 2), 0.0).unwrap();
    let (x, y, z) = decode_at(&out, 1, 1);
    assert_close(x, 0.6);
    assert_close(y, 0.0);
    assert_close(z, 0.8);
}

#[test]
fn zero_strength_nulls_contribution_rather_than_passing_through() {
    // Strength 0 drops the map's slope entirely; it does not preserve the
    // zero-strength map itself.
    let n = const_map(2, 2, 0.6, 0.0, 0.8);
    let out = combine_normals(&n, 0.0, &flat_map(2, 2), 1.0).unwrap();
    let (x, y, z) = decode_at(&out, 0, 0);
    assert_close(x, 0.0);
    assert_close(y, 0.0);
    assert_close(z, 1.0);
}

#[test]
fn both_strengths_zero_yield_flat() {
    let n = const_map(2, 2, 0.6, 0.0, 0.8);
    let m = const_map(2, 2, 0.0, -0.28, 0.96);
    let out = combine_normals(&n, 0.0, &m, 0.0).unwrap();
    let (x, y, z) = decode_at(&out, 1, 0);
    assert_close(x, 0.0);
    assert_close(y, 0.0);
    assert_close(z, 1.0);
}

#[test]
fn two_flat_maps_combine_to_flat() {
    let out = combine_normals(&flat_map(4, 4), 1.0, &flat_map(4, 4), 1.0).unwrap();
    let (x, y, z) = decode_at(&out, 2, 3);
    assert_close(x, 0.0);
    assert_close(y, 0.0);
    assert_close(z, 1.0);
}

#[test]
fn output_is_unit_length_with_nonnegative_z() {
    let n = const_map(3, 3, 0.6, 0.0, 0.8);
    let m = const_map(3, 3, -0.28, 0.28, 0.9184);
    let out = combine_normals(&n, 0.7, &m, 0.9).unwrap();
    for y in 0..3 {
        for x in 0..3 {
            let (nx, ny, nz) = decode_at(&out, x, y);
            assert_close(nx * nx + ny * ny + nz * nz, 1.0);
            assert!(nz >= 0.0);
        }
    }
}

#[test]
fn combine_is_commutative_in_its_pairs() {
    let a = const_map(3, 2, 0.6, 0.0, 0.8);
    let b = const_map(3, 2, 0.0, -0.28, 0.96);
    let ab = combine_normals(&a, 0.8, &b, 0.3).unwrap();
    let ba = combine_normals(&b, 0.3, &a, 0.8).unwrap();
    assert_eq!(ab, ba);
}

#[test]
fn single_channel_input_is_a_shape_error() {
    let gray = ImageF32::new(2, 2, 1).unwrap();
    assert!(matches!(
        combine_normals(&gray, 1.0, &flat_map(2, 2), 1.0),
        Err(TexelError::Shape(_))
    ));
    assert!(matches!(
        combine_normals(&flat_map(2, 2), 1.0, &gray, 1.0),
        Err(TexelError::Shape(_))
    ));
    assert!(matches!(
        normalize_normal_map(&gray),
        Err(TexelError::Shape(_))
    ));
}

#[test]
fn mismatched_sizes_are_a_shape_error() {
    assert!(matches!(
        combine_normals(&flat_map(2, 2), 1.0, &flat_map(3, 2), 1.0),
        Err(TexelError::Shape(_))
    ));
}

#[test]
fn normalize_uses_only_xy_channels() {
    // Denormalized X/Y and a garbage Z channel; output must be unit with
    // Z reconstructed from X/Y alone.
    let mut img = const_map(2, 2, 0.0, 0.0, 0.0);
    for y in 0..2 {
        for x in 0..2 {
            img.set_sample(x, y, CH_R, 1.0); // x = 1
            img.set_sample(x, y, CH_G, 1.0); // y = 1
            img.set_sample(x, y, 0, 0.123); // ignored
        }
    }
    let out = normalize_normal_map(&img).unwrap();
    let (nx, ny, nz) = decode_at(&out, 1, 1);
    assert_close(nx * nx + ny * ny + nz * nz, 1.0);
    assert_close(nx, ny);
    assert_close(nz, 0.0);
}

#[test]
fn strengths_are_clamped_to_unit_range() {
    let n = const_map(2, 2, 0.6, 0.0, 0.8);
    let clamped = combine_normals(&n, 5.0, &flat_map(2, 2), -1.0).unwrap();
    let unit = combine_normals(&n, 1.0, &flat_map(2, 2), 0.0).unwrap();
    assert_eq!(clamped, unit);
}
