use super::*;

fn gradient(width: u32, height: u32) -> RgbFrame {
    let data = (0..width * height * 3).map(|i| (i * 7 % 256) as u8).collect();
    RgbFrame::from_raw(width, height, data).unwrap()
}

#[test]
fn blend_endpoints_return_inputs() {
    let a = gradient(9, 4);
    let b = RgbFrame::solid(9, 4, [200, 10, 99]);
    assert_eq!(blend(&a, &b, 0.0).unwrap(), a);
    assert_eq!(blend(&a, &b, 1.0).unwrap(), b);
}

#[test]
fn red_and_blue_midpoint_is_purple() {
    let red = RgbFrame::solid(3, 3, [255, 0, 0]);
    let blue = RgbFrame::solid(3, 3, [0, 0, 255]);
    let out = blend(&red, &blue, 0.5).unwrap();
    assert!(out.data.chunks_exact(3).all(|px| px == [127, 0, 127]));
}

#[test]
fn blend_is_monotonic_between_endpoints() {
    let a = RgbFrame::solid(1, 1, [0, 0, 0]);
    let b = RgbFrame::solid(1, 1, [255, 255, 255]);
    let mut last = 0u8;
    for k in 0..=20 {
        let t = k as f32 / 20.0;
        let v = blend(&a, &b, t).unwrap().data[0];
        assert!(v >= last);
        last = v;
    }
    assert_eq!(last, 255);
}

#[test]
fn large_frames_take_parallel_path_and_match_serial() {
    let a = gradient(300, 200);
    let b = RgbFrame::solid(300, 200, [5, 250, 128]);
    let out = blend(&a, &b, 0.3).unwrap();
    for (i, &v) in out.data.iter().enumerate() {
        assert_eq!(v, lerp_u8(a.data[i], b.data[i], 0.3));
    }
}

#[test]
fn blend_rejects_size_mismatch() {
    let a = RgbFrame::solid(2, 2, [1, 1, 1]);
    let b = RgbFrame::solid(2, 3, [1, 1, 1]);
    let err = blend(&a, &b, 0.5).unwrap_err();
    assert!(matches!(err, MorphError::DimensionMismatch(_)));
}

#[test]
fn blend_rejects_out_of_range_t() {
    let a = RgbFrame::solid(1, 1, [1, 1, 1]);
    assert!(blend(&a, &a, -0.1).is_err());
    assert!(blend(&a, &a, 1.5).is_err());
    assert!(blend(&a, &a, f32::NAN).is_err());
}
