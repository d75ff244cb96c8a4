use super::*;

fn timing(fps: u32, hold: f64, morph: f64) -> TimelineTiming {
    TimelineTiming {
        fps: Fps::whole(fps).unwrap(),
        hold_secs: hold,
        morph_secs: morph,
    }
}

#[test]
fn three_images_at_defaults_is_1260_frames() {
    let plan = plan_timeline(3, &TimelineTiming::default()).unwrap();
    assert_eq!(plan.hold_frames, 300);
    assert_eq!(plan.morph_frames, 180);
    assert_eq!(plan.total_frames, 2 * (300 + 180) + 300);
    assert_eq!(plan.total_frames, 1260);
    assert_eq!(plan.frames().count(), 1260);
    assert_eq!(plan.held_frames(), 900);
}

#[test]
fn segment_order_alternates_hold_and_morph() {
    let plan = plan_timeline(3, &timing(10, 1.0, 0.5)).unwrap();
    assert_eq!(
        plan.segments,
        vec![
            Segment::Hold {
                image: 0,
                frames: 10
            },
            Segment::Morph {
                from: 0,
                to: 1,
                frames: 5
            },
            Segment::Hold {
                image: 1,
                frames: 10
            },
            Segment::Morph {
                from: 1,
                to: 2,
                frames: 5
            },
            Segment::Hold {
                image: 2,
                frames: 10
            },
        ]
    );
}

#[test]
fn empty_timeline_is_rejected() {
    assert!(plan_timeline(0, &TimelineTiming::default()).is_err());
}

#[test]
fn zero_total_frames_is_rejected() {
    assert!(plan_timeline(1, &timing(30, 0.0, 2.0)).is_err());
    assert!(plan_timeline(4, &timing(30, 0.0, 0.0)).is_err());
}

#[test]
fn single_image_is_only_the_final_hold() {
    let plan = plan_timeline(1, &TimelineTiming::default()).unwrap();
    assert_eq!(plan.total_frames, 300);
    assert!(
        plan.frames()
            .all(|(_, src)| src == FrameSource::Still { image: 0 })
    );
}

#[test]
fn morph_ramp_starts_at_zero_and_never_reaches_one() {
    let plan = plan_timeline(2, &timing(4, 0.0, 1.0)).unwrap();
    let ts: Vec<f32> = plan
        .frames()
        .filter_map(|(_, src)| match src {
            FrameSource::Blend { t, .. } => Some(t),
            FrameSource::Still { .. } => None,
        })
        .collect();
    assert_eq!(ts, vec![0.0, 0.25, 0.5, 0.75]);
}

#[test]
fn frame_indices_are_dense_and_ordered() {
    let plan = plan_timeline(2, &timing(3, 1.0, 1.0)).unwrap();
    for (expected, (idx, _)) in plan.frames().enumerate() {
        assert_eq!(idx, FrameIndex(expected as u64));
    }
}

#[test]
fn source_at_agrees_with_iteration() {
    let plan = plan_timeline(3, &timing(5, 1.0, 0.6)).unwrap();
    for (idx, src) in plan.frames() {
        assert_eq!(plan.source_at(idx).unwrap(), src);
    }
    assert!(plan.source_at(FrameIndex(plan.total_frames)).is_err());
}

#[test]
fn plan_serializes_segment_kinds() {
    let plan = plan_timeline(2, &timing(1, 1.0, 1.0)).unwrap();
    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["total_frames"], 3);
    assert_eq!(json["segments"][1]["kind"], "morph");
    assert_eq!(json["segments"][1]["to"], 1);
}

#[test]
fn huge_durations_are_rejected_not_wrapped() {
    let err = plan_timeline(2, &timing(60, 1e20, 3.0)).unwrap_err();
    assert!(matches!(err, MorphError::Validation(_)), "{err}");

    // Each hold fits in a u64 on its own, the two of them do not.
    let err = plan_timeline(2, &timing(1, 9.3e18, 0.0)).unwrap_err();
    assert!(err.to_string().contains("overflows"), "{err}");
}
