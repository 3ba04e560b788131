use super::*;

#[test]
fn defaults_match_the_fixed_script_parameters() {
    let cfg = PipelineConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.input, PathBuf::from("car_sales_2000_2024.csv"));
    assert_eq!(cfg.output, PathBuf::from("car_sales_ranking_smooth.gif"));
    assert_eq!(cfg.steps_per_year, 10);
    assert_eq!(cfg.frame_delay_ms, 100);
    assert_eq!(cfg.loop_mode, LoopMode::Infinite);
    assert!(!cfg.threading.parallel);
}

#[test]
fn json_overrides_only_listed_fields() {
    let cfg = PipelineConfig::from_json_str(
        r#"{
            "input": "data/sales.csv",
            "steps_per_year": 4,
            "loop_mode": { "finite": 2 },
            "style": { "dpi": 72 },
            "threading": { "parallel": true, "threads": 2 }
        }"#,
    )
    .unwrap();

    assert_eq!(cfg.input, PathBuf::from("data/sales.csv"));
    assert_eq!(cfg.output, PathBuf::from(DEFAULT_OUTPUT));
    assert_eq!(cfg.steps_per_year, 4);
    assert_eq!(cfg.loop_mode, LoopMode::Finite(2));
    assert_eq!(cfg.style.dpi, 72.0);
    assert_eq!(cfg.style.width_in, 15.0);
    assert_eq!(cfg.threading.threads, Some(2));
    assert_eq!(cfg.threading.chunk_size, 32);
    cfg.validate().unwrap();
}

#[test]
fn unknown_keys_and_bad_json_are_serde_errors() {
    assert!(matches!(
        PipelineConfig::from_json_str(r#"{ "stepz": 3 }"#),
        Err(BarRaceError::Serde(_))
    ));
    assert!(matches!(
        PipelineConfig::from_json_str("{"),
        Err(BarRaceError::Serde(_))
    ));
}

#[test]
fn validate_rejects_degenerate_values() {
    let zero_steps = PipelineConfig {
        steps_per_year: 0,
        ..PipelineConfig::default()
    };
    assert!(zero_steps.validate().is_err());

    let zero_delay = PipelineConfig {
        frame_delay_ms: 0,
        ..PipelineConfig::default()
    };
    assert!(zero_delay.validate().is_err());

    let bad_speed = PipelineConfig {
        gif_speed: 31,
        ..PipelineConfig::default()
    };
    assert!(bad_speed.validate().is_err());

    let zero_threads = PipelineConfig {
        threading: RenderThreading {
            parallel: true,
            threads: Some(0),
            chunk_size: 8,
        },
        ..PipelineConfig::default()
    };
    assert!(zero_threads.validate().is_err());
}

#[test]
fn from_path_reads_json_files() {
    let dir = PathBuf::from("target").join("unit_pipeline_config");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("cfg.json");
    std::fs::write(&path, r#"{ "frame_delay_ms": 50 }"#).unwrap();

    assert_eq!(PipelineConfig::from_path(&path).unwrap().frame_delay_ms, 50);
    assert!(PipelineConfig::from_path(&dir.join("missing.json")).is_err());
}
