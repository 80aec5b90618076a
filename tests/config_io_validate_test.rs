use voltaic::config::Config;

#[test]
fn save_and_reload_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("voltaic_config.yaml");

    let mut config = Config::default();
    config.vehicle.odometer_km = 1042;
    config.vehicle.mode = "Eco".to_string();
    config.charging.decay_interval_secs = 4;
    config.save_to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.vehicle.odometer_km, 1042);
    assert_eq!(loaded.vehicle.mode, "Eco");
    assert_eq!(loaded.charging.decay_interval_secs, 4);
    assert!(loaded.validate().is_ok());
}

#[test]
fn from_file_rejects_malformed_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "vehicle: [not, a, map]").unwrap();

    assert!(Config::from_file(&path).is_err());
}

#[test]
fn missing_file_is_an_error() {
    assert!(Config::from_file("/nonexistent/voltaic.yaml").is_err());
}

#[test]
fn validation_flags_each_bad_field() {
    let mut config = Config::default();
    config.vehicle.rated_range_km = 0;
    let err = config.validate().unwrap_err().to_string();
    assert!(err.contains("rated_range_km"));

    let mut config = Config::default();
    config.charging.tick_interval_ms = 0;
    let err = config.validate().unwrap_err().to_string();
    assert!(err.contains("tick_interval_ms"));

    let mut config = Config::default();
    config.charging.progress_step = 1.5;
    let err = config.validate().unwrap_err().to_string();
    assert!(err.contains("progress_step"));
}
