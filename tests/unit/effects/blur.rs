use super::*;

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6];
    let out = blur_rgb8(&src, 1, 2, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_constant_image_is_identity() {
    let (w, h) = (4u32, 3u32);
    let px = [10u8, 20u8, 30u8];
    let src = px.repeat((w * h) as usize);
    let out = blur_rgb8(&src, w, h, 3, 2.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_radius_wider_than_image_still_folds() {
    let frame = RgbFrame::solid(3, 2, [90, 0, 200]);
    let out = blur_rgb8(&frame.data, 3, 2, 40, 15.0).unwrap();
    assert_eq!(out, frame.data);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (7u32, 7u32);
    let mut src = vec![0u8; (w * h * 3) as usize];
    let center = ((3 * w + 3) * 3) as usize;
    src[center..center + 3].copy_from_slice(&[255, 255, 255]);

    let out = blur_rgb8(&src, w, h, 2, 1.2).unwrap();

    let nonzero = out.chunks_exact(3).filter(|px| px[0] != 0).count();
    assert!(nonzero > 1);

    let sum_r: u32 = out.chunks_exact(3).map(|px| u32::from(px[0])).sum();
    assert!((sum_r as i32 - 255).abs() <= 6);
}

#[test]
fn blur_rejects_mismatched_buffer() {
    let err = blur_rgb8(&[0u8; 5], 2, 1, 1, 1.0).unwrap_err();
    assert!(matches!(err, MorphError::DimensionMismatch(_)));
}

#[test]
fn blur_rejects_non_positive_sigma() {
    let src = vec![0u8; 12];
    assert!(blur_rgb8(&src, 2, 2, 1, 0.0).is_err());
    assert!(blur_rgb8(&src, 2, 2, 1, f32::NAN).is_err());
}

#[test]
fn auto_radius_matches_six_sigma_kernel() {
    assert_eq!(auto_kernel_radius(100.0), 300);
    assert_eq!(auto_kernel_radius(1.2), 4);
    assert_eq!(auto_kernel_radius(0.1), 1);
}

#[test]
fn gaussian_blur_preserves_frame_shape() {
    let frame = RgbFrame::solid(5, 4, [1, 2, 3]);
    let out = gaussian_blur_rgb8(&frame, 2.0).unwrap();
    assert_eq!((out.width, out.height), (5, 4));
    assert_eq!(out, frame);
}
