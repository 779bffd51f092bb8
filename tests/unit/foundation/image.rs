use super::*;

#[test]
fn from_data_validates_length_and_channels() {
    assert!(ImageF32::from_data(vec![0.0; 12], 2, 2, 3).is_ok());
    assert!(matches!(
        ImageF32::from_data(vec![0.0; 11], 2, 2, 3),
        Err(TexelError::Shape(_))
    ));
    assert!(matches!(
        ImageF32::from_data(vec![0.0; 8], 2, 2, 2),
        Err(TexelError::Shape(_))
    ));
    assert!(matches!(
        ImageF32::new(0, 4, 3),
        Err(TexelError::Shape(_))
    ));
}

#[test]
fn shape_is_height_width_channels() {
    let img = ImageF32::new(7, 3, 4).unwrap();
    assert_eq!(img.shape(), (3, 7, 4));
}

#[test]
fn sample_roundtrip_respects_interleaving() {
    let mut img = ImageF32::new(4, 2, 3).unwrap();
    img.set_sample(2, 1, CH_R, 0.5);
    assert_eq!(img.sample(2, 1, CH_R), 0.5);
    // Row-major interleaved layout: (y * w + x) * ch + c = (1*4 + 2)*3 + 2.
    assert_eq!(img.data()[20], 0.5);
}

#[test]
fn plane_extracts_one_channel() {
    let data = vec![
        0.1, 0.2, 0.3, //
        0.4, 0.5, 0.6,
    ];
    let img = ImageF32::from_data(data, 2, 1, 3).unwrap();
    let g = img.plane(CH_G).unwrap();
    assert_eq!(g.shape(), (1, 2, 1));
    assert_eq!(g.data(), &[0.2, 0.5]);
    assert!(matches!(img.plane(3), Err(TexelError::Shape(_))));
}

#[test]
fn normalize_clamps_and_snaps_non_finite() {
    let mut img = ImageF32::from_data(vec![-0.5, 0.25, 1.5, f32::NAN], 2, 2, 1).unwrap();
    img.normalize();
    assert_eq!(img.data(), &[0.0, 0.25, 1.0, 0.0]);
}

#[test]
fn filled_sets_every_sample() {
    let img = ImageF32::filled(3, 2, 1, 1.0).unwrap();
    assert!(img.data().iter().all(|&v| v == 1.0));
}
