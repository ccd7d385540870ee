use super::*;

#[test]
fn empty_object_yields_documented_defaults() {
    let cfg = CompositorConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, CompositorConfig::default());
    assert_eq!(cfg.target, TargetSpec::default());
    assert_eq!((cfg.target.width, cfg.target.height), (1080, 1920));
    assert_eq!(cfg.target.padding_inset, 40);
    assert_eq!(cfg.overlay_style, OverlayStyle::FullBleed);
    assert_eq!(cfg.output_format, OutputFormat::Lossless);
    assert_eq!(cfg.output_quality, 0.9);
    assert_eq!(cfg.background, Rgba8::WHITE);
    assert_eq!(cfg.asset_timeout(), Duration::from_millis(5000));
    assert_eq!(cfg.filename_prefix, "framed-photo");
    assert_eq!(cfg.fallback_logo.lines.len(), 3);
    assert_eq!(cfg.fallback_logo.lines[1].text, "Community");
    cfg.validate().unwrap();
}

#[test]
fn partial_json_overrides_only_given_fields() {
    let json = r##"{
        "target": { "padding_inset": 24 },
        "overlay_style": "bordered",
        "output_format": "lossy",
        "output_quality": 0.5,
        "background": "#000000",
        "assets": { "root": "assets" }
    }"##;
    let cfg = CompositorConfig::from_reader(json.as_bytes()).unwrap();
    assert_eq!(cfg.target.width, 1080);
    assert_eq!(cfg.target.padding_inset, 24);
    assert_eq!(cfg.overlay_style, OverlayStyle::Bordered);
    assert_eq!(cfg.output_format, OutputFormat::Lossy);
    assert_eq!(cfg.background, Rgba8::BLACK);
    assert_eq!(cfg.assets.root, PathBuf::from("assets"));
    assert_eq!(cfg.assets.logo, "logo/logo.png");
}

#[test]
fn unknown_fields_are_rejected() {
    let err = CompositorConfig::from_reader(r##"{"colour": "#fff"}"##.as_bytes()).unwrap_err();
    assert!(matches!(err, SnapframeError::Config(_)));
}

#[test]
fn missing_file_is_config_error() {
    let err = CompositorConfig::from_path("no/such/config.json").unwrap_err();
    assert!(err.to_string().contains("no/such/config.json"));
}

#[test]
fn validate_rejects_bad_values() {
    let bad = [
        CompositorConfig {
            target: TargetSpec {
                width: 0,
                ..TargetSpec::default()
            },
            ..CompositorConfig::default()
        },
        CompositorConfig {
            target: TargetSpec {
                width: 80,
                height: 200,
                padding_inset: 40,
            },
            ..CompositorConfig::default()
        },
        CompositorConfig {
            output_quality: 1.5,
            ..CompositorConfig::default()
        },
        CompositorConfig {
            output_quality: f32::NAN,
            ..CompositorConfig::default()
        },
        CompositorConfig {
            logo_region: LogoRegion {
                width: 2000.0,
                ..LogoRegion::default()
            },
            ..CompositorConfig::default()
        },
        CompositorConfig {
            asset_timeout_ms: 0,
            ..CompositorConfig::default()
        },
        CompositorConfig {
            filename_prefix: "a/b".to_owned(),
            ..CompositorConfig::default()
        },
    ];
    for cfg in bad {
        assert!(
            matches!(cfg.validate(), Err(SnapframeError::Config(_))),
            "{cfg:?}"
        );
    }
}

#[test]
fn inset_and_logo_region_geometry() {
    let target = TargetSpec::default();
    assert_eq!(target.inset_rect(), Rect::new(40.0, 40.0, 1040.0, 1880.0));
    assert_eq!(
        LogoRegion::default().rect(&target),
        Rect::new(440.0, 60.0, 640.0, 120.0)
    );
}

#[test]
fn photo_rect_and_frame_fallback_follow_style() {
    let full = CompositorConfig::default();
    assert_eq!(full.photo_rect(), full.target.rect());
    assert!(format!("{:?}", full.frame_fallback()).contains("OmitOverlay"));

    let bordered = CompositorConfig {
        overlay_style: OverlayStyle::Bordered,
        ..CompositorConfig::default()
    };
    assert_eq!(bordered.photo_rect(), bordered.target.inset_rect());
    assert!(format!("{:?}", bordered.frame_fallback()).contains("GradientBorderFallback"));
}

#[test]
fn config_round_trips_through_json() {
    let cfg = CompositorConfig::default();
    let json = serde_json::to_string(&cfg).unwrap();
    assert!(json.contains("\"#0c8596\""));
    assert_eq!(CompositorConfig::from_reader(json.as_bytes()).unwrap(), cfg);
}
