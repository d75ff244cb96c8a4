use super::*;

#[test]
fn reflect_repeats_edge_pixel() {
    // fedcba|abcdefgh|hgfedcb
    let len = 8;
    assert_eq!(reflect_index(-1, len), 0);
    assert_eq!(reflect_index(-2, len), 1);
    assert_eq!(reflect_index(-6, len), 5);
    assert_eq!(reflect_index(8, len), 7);
    assert_eq!(reflect_index(9, len), 6);
    assert_eq!(reflect_index(3, len), 3);
}

#[test]
fn reflect_folds_margins_wider_than_len() {
    let len = 3;
    let got: Vec<usize> = (-7..10).map(|i| reflect_index(i, len)).collect();
    // ... 0 1 2 | 2 1 0 | 0 1 2 | 2 1 0 ...
    assert_eq!(
        got,
        vec![0, 0, 1, 2, 2, 1, 0, 0, 1, 2, 2, 1, 0, 0, 1, 2, 2]
    );
}

#[test]
fn reflect101_skips_edge_pixel() {
    // gfedcb|abcdefgh|gfedcba
    let len = 8;
    assert_eq!(reflect101_index(-1, len), 1);
    assert_eq!(reflect101_index(-2, len), 2);
    assert_eq!(reflect101_index(8, len), 6);
    assert_eq!(reflect101_index(9, len), 5);
    assert_eq!(reflect101_index(0, len), 0);
    assert_eq!(reflect101_index(7, len), 7);
}

#[test]
fn single_pixel_axis_always_maps_to_zero() {
    for i in -5..5 {
        assert_eq!(reflect_index(i, 1), 0);
        assert_eq!(reflect101_index(i, 1), 0);
    }
}

#[test]
fn lerp_endpoints_are_exact() {
    assert_eq!(lerp_u8(10, 200, 0.0), 10);
    assert_eq!(lerp_u8(10, 200, 1.0), 200);
    assert_eq!(lerp_u8(255, 0, 0.5), 127);
}

#[test]
fn lerp_of_identical_samples_can_land_one_below() {
    let t = (1.0f64 / 180.0) as f32;
    assert_eq!(lerp_u8(13, 13, t), 12);
    assert_eq!(lerp_u8(13, 13, 0.0), 13);
    assert_eq!(lerp_u8(13, 13, 1.0), 13);
}
