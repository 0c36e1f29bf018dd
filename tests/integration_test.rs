// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Integration tests for the feature pipeline

use pose_features::{
    BodyPart, FEATURE_DIM, FeaturePipeline, Joint, NUM_KEYPOINTS, NormStats, PipelineConfig, Point,
    WeightConfig, calculate_normalization_params, extract_static_features, generate_dynamic_weights,
    normalize_keypoints, sanitize_value, z_score_normalize,
};

fn torso_frame() -> Vec<Option<Point>> {
    let mut kps = vec![Some([0.0, 0.0]); NUM_KEYPOINTS];
    kps[Joint::LeftShoulder.index()] = Some([100.0, 100.0]);
    kps[Joint::RightShoulder.index()] = Some([200.0, 100.0]);
    kps[Joint::LeftHip.index()] = Some([120.0, 300.0]);
    kps[Joint::RightHip.index()] = Some([180.0, 300.0]);
    kps
}

fn full_frame() -> Vec<Option<Point>> {
    vec![
        Some([320.0, 80.0]),
        Some([330.0, 70.0]),
        Some([310.0, 70.0]),
        Some([345.0, 75.0]),
        Some([295.0, 75.0]),
        Some([370.0, 140.0]),
        Some([270.0, 140.0]),
        Some([400.0, 210.0]),
        Some([240.0, 210.0]),
        Some([420.0, 280.0]),
        Some([220.0, 270.0]),
        Some([350.0, 300.0]),
        Some([290.0, 300.0]),
        Some([355.0, 400.0]),
        Some([285.0, 400.0]),
        Some([360.0, 500.0]),
        Some([280.0, 500.0]),
    ]
}

/// Root lands on `[300, 300]` and scale on `100`, so each joint normalizes to
/// the body-frame coordinate noted beside it.
fn golden_frame() -> Vec<Option<Point>> {
    vec![
        Some([300.0, 50.0]),  // nose
        Some([290.0, 40.0]),  // left eye
        Some([310.0, 40.0]),  // right eye
        Some([280.0, 45.0]),  // left ear
        Some([320.0, 45.0]),  // right ear
        Some([250.0, 100.0]), // left shoulder  (-0.5, -2.0)
        Some([350.0, 100.0]), // right shoulder ( 0.5, -2.0)
        Some([250.0, 200.0]), // left elbow     (-0.5, -1.0)
        Some([450.0, 100.0]), // right elbow    ( 1.5, -2.0)
        Some([350.0, 250.0]), // left wrist     ( 0.5, -0.5)
        Some([425.0, 0.0]),   // right wrist    ( 1.25, -3.0)
        Some([270.0, 300.0]), // left hip       (-0.3, 0.0)
        Some([330.0, 300.0]), // right hip      ( 0.3, 0.0)
        Some([270.0, 400.0]), // left knee      (-0.3, 1.0)
        Some([390.0, 380.0]), // right knee     ( 0.9, 0.8)
        Some([220.0, 500.0]), // left ankle     (-0.8, 2.0)
        Some([310.0, 440.0]), // right ankle    ( 0.1, 1.4)
    ]
}

#[test]
fn test_golden_feature_layout() {
    let deg = f64::to_degrees;
    let expected: [f64; FEATURE_DIM] = [
        // joint angles, vertex in the middle
        deg((2.0f64 / 3.0).atan()),
        90.0 + deg(0.5f64.atan()),
        deg((4.0f64 / 3.0).atan()),
        deg(4.0f64.atan()),
        deg(0.25f64.atan()),
        180.0 - deg(0.5f64.atan()),
        45.0,
        90.0,
        90.0 + deg(0.1f64.atan()),
        90.0 - deg(0.1f64.atan()),
        // vertical offsets
        1.5,
        1.0,
        -1.0,
        0.0,
        1.0,
        2.0,
        0.8,
        1.4,
        // horizontal offsets
        1.0,
        0.0,
        0.75,
        1.0,
        0.0,
        -0.5,
        0.6,
        -0.2,
        // cross-body distances
        6.8125f64.sqrt(),
        5.0f64.sqrt(),
        1.0,
        0.6,
        1.48f64.sqrt(),
        1.17f64.sqrt(),
    ];

    let result = FeaturePipeline::default().process(&golden_frame());
    assert_eq!(result.params.root, [300.0, 300.0]);
    assert!((result.params.scale - 100.0).abs() < 1e-12);

    for (i, (got, want)) in result.features.iter().zip(&expected).enumerate() {
        let tol = if i < 10 { 1e-3 } else { 1e-9 };
        assert!((got - want).abs() < tol, "feature {i}: got {got}, expected {want}");
    }
}

#[test]
fn test_torso_scenario() {
    let frame = torso_frame();
    let params = calculate_normalization_params(&frame);
    assert_eq!(params.root, [150.0, 300.0]);
    assert!((params.scale - 100.0).abs() < 1e-12);

    let features = extract_static_features(&normalize_keypoints(&frame, Some(&params)));
    assert!((features[28] - 1.0).abs() < 1e-12);
}

#[test]
fn test_full_frame_features_finite() {
    let result = FeaturePipeline::default().process(&full_frame());
    assert_eq!(result.features.len(), FEATURE_DIM);
    assert!(result.features.iter().all(|v| v.is_finite()));
    for angle in &result.features[..10] {
        assert!((0.0..=180.0).contains(angle));
    }
}

#[test]
fn test_hip_fallback_to_shoulders() {
    let mut frame = torso_frame();
    frame[Joint::LeftHip.index()] = Some([0.0, 0.0]);
    frame[Joint::RightHip.index()] = Some([0.0, 0.0]);
    let params = calculate_normalization_params(&frame);
    assert_eq!(params.root, [150.0, 100.0]);
}

#[test]
fn test_normalization_roundtrip() {
    let frame = full_frame();
    let params = calculate_normalization_params(&frame);
    let normalized = normalize_keypoints(&frame, Some(&params));

    for joint in Joint::ALL {
        let raw = frame[joint.index()].unwrap();
        let expected = [
            (raw[0] - params.root[0]) / params.scale,
            (raw[1] - params.root[1]) / params.scale,
        ];
        assert_eq!(normalized.get(joint), expected);
    }
}

#[test]
fn test_translation_and_scale_invariance() {
    let frame = full_frame();
    let moved: Vec<Option<Point>> = frame
        .iter()
        .map(|p| p.map(|[x, y]| [x * 0.5 + 40.0, y * 0.5 - 10.0]))
        .collect();

    let pipeline = FeaturePipeline::default();
    let a = pipeline.process(&frame).features;
    let b = pipeline.process(&moved).features;
    for (x, y) in a.iter().zip(&b) {
        assert!((x - y).abs() < 1e-6, "{x} vs {y}");
    }
}

#[test]
fn test_dynamic_weights_left_arm() {
    assert_eq!(generate_dynamic_weights(&[], &WeightConfig::default()), [1.0; FEATURE_DIM]);

    let weights = generate_dynamic_weights(&[BodyPart::LeftArm], &WeightConfig::default());
    let high: Vec<usize> = (0..FEATURE_DIM).filter(|i| (weights[*i] - 5.0).abs() < 1e-12).collect();
    assert_eq!(high, vec![0, 1, 10, 11, 18, 19]);
    assert!(weights[28] >= 1.0 && weights[29] >= 1.0);
    for i in [26, 27, 30, 31] {
        assert!(weights[i] >= 0.5);
    }
    for i in (2..10).chain(12..18).chain(20..26) {
        assert!((weights[i] - 0.1).abs() < 1e-12);
    }
}

#[test]
fn test_zscore_zero_std() {
    let features = FeaturePipeline::default().process(&full_frame()).features;
    let stats = NormStats::new(vec![0.0; FEATURE_DIM], vec![0.0; FEATURE_DIM]);
    let out = z_score_normalize(&features, Some(&stats));
    assert!(out.iter().all(|v| v.is_finite()));
}

#[test]
fn test_sanitize_scenarios() {
    assert_eq!(sanitize_value(f64::NAN), 0.0);
    assert_eq!(sanitize_value(f64::INFINITY), 10.0);
    assert_eq!(sanitize_value(f64::NEG_INFINITY), -10.0);
    assert_eq!(sanitize_value(42.5), 42.5);
}

#[test]
fn test_pipeline_with_stats_and_parts() {
    let config = PipelineConfig::new()
        .with_stats(NormStats::new(vec![0.0; FEATURE_DIM], vec![2.0; FEATURE_DIM]))
        .with_active_parts(vec![BodyPart::Torso, BodyPart::RightLeg]);
    let result = FeaturePipeline::new(config).process(&full_frame());

    let zscored = result.zscored.unwrap();
    for (z, f) in zscored.iter().zip(&result.features) {
        assert!((z - f / 2.0).abs() < 1e-12);
    }
    assert!((result.weights[6] - 5.0).abs() < 1e-12);
    assert!((result.weights[29] - 5.0).abs() < 1e-12);
}

#[test]
fn test_malformed_frame_is_well_formed_output() {
    let pipeline = FeaturePipeline::default();
    let result = pipeline.process(&[Some([1.0, 2.0]); 5]);
    assert_eq!(result.features.len(), FEATURE_DIM);
    assert!(result.features[..10].iter().all(|v| (v - 180.0).abs() < 1e-12));
    assert!(result.features[10..].iter().all(|v| *v == 0.0));
}
