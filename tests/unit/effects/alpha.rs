use super::*;

fn checker(width: u32, height: u32) -> RgbFrame {
    let mut frame = RgbFrame::solid(width, height, [0, 0, 0]);
    for (i, px) in frame.data.chunks_exact_mut(3).enumerate() {
        if i % 2 == 0 {
            px.copy_from_slice(&[12, 0, 0]);
        }
    }
    frame
}

#[test]
fn mask_values_are_binary() {
    let frame = checker(5, 3);
    let mask = build_alpha(&frame);
    assert_eq!(mask.data.len(), 15);
    assert!(mask.data.iter().all(|&a| a == 0 || a == 255));
    assert_eq!(mask.opaque_count(), 8);
}

#[test]
fn pure_black_frame_is_fully_transparent() {
    let mask = build_alpha(&RgbFrame::solid(4, 4, [0, 0, 0]));
    assert!(mask.data.iter().all(|&a| a == 0));
}

#[test]
fn non_black_frame_is_fully_opaque() {
    let mask = build_alpha(&RgbFrame::solid(4, 4, [0, 0, 1]));
    assert!(mask.data.iter().all(|&a| a == 255));
}

#[test]
fn any_single_nonzero_channel_is_opaque() {
    let frame = RgbFrame::from_raw(3, 1, vec![1, 0, 0, 0, 1, 0, 0, 0, 1]).unwrap();
    assert_eq!(build_alpha(&frame).data, vec![255, 255, 255]);
}

#[test]
fn attach_then_strip_reproduces_frame() {
    let frame = checker(6, 2);
    let rgba = with_alpha(&frame).unwrap();
    assert_eq!(rgba.data.len(), 6 * 2 * 4);
    assert_eq!(rgba.data[3], 255);
    assert_eq!(rgba.data[7], 0);
    assert_eq!(rgba.to_rgb(), frame);
}

#[test]
fn attach_rejects_mismatched_mask() {
    let frame = RgbFrame::solid(4, 4, [9, 9, 9]);
    let mask = build_alpha(&RgbFrame::solid(4, 3, [9, 9, 9]));
    let err = attach_alpha(&frame, &mask).unwrap_err();
    assert!(matches!(err, MorphError::DimensionMismatch(_)));
}
