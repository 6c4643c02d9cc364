use classroom_assistant::infrastructure::observability::{DEFAULT_FILTER, TracingConfig};
use classroom_assistant::presentation::config::{Environment, LoggingSettings};

#[test]
fn given_logging_settings_when_building_config_then_carries_level_and_format() {
    let logging = LoggingSettings {
        level: "warn,classroom_assistant=info".to_string(),
        enable_json: true,
    };

    let config = TracingConfig::from_settings(Environment::Prod, &logging);

    assert_eq!(config.environment, "Prod");
    assert_eq!(config.level.as_deref(), Some("warn,classroom_assistant=info"));
    assert!(config.json_format);
}

#[test]
fn given_blank_level_when_building_config_then_falls_back_to_default_filter() {
    let config = TracingConfig::from_settings(Environment::Local, &LoggingSettings::default());

    assert_eq!(config.level, None);
    assert!(!config.json_format);
    assert!(DEFAULT_FILTER.contains("classroom_assistant=debug"));
}
