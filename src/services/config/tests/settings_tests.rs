use super::*;
use crate::types::MapperError;

#[test]
fn test_defaults_are_valid() {
    let settings = MapperSettings::default();
    assert!(settings.validate().is_ok());
    assert_eq!(settings.batch_size, DEFAULT_BATCH_SIZE);
    assert_eq!(settings.fuzzy_threshold, DEFAULT_FUZZY_THRESHOLD);
    assert_eq!(settings.date_pivot_year, DEFAULT_DATE_PIVOT_YEAR);
}

#[test]
fn test_zero_batch_size_rejected() {
    let settings = MapperSettings {
        batch_size: 0,
        ..MapperSettings::default()
    };
    assert!(matches!(settings.validate(), Err(MapperError::Config(_))));
}

#[test]
fn test_threshold_out_of_range_rejected() {
    let settings = MapperSettings {
        fuzzy_threshold: 1.5,
        ..MapperSettings::default()
    };
    assert!(matches!(settings.validate(), Err(MapperError::Config(_))));

    let settings = MapperSettings {
        fuzzy_threshold: -0.1,
        ..MapperSettings::default()
    };
    assert!(settings.validate().is_err());
}

#[test]
fn test_pivot_out_of_range_rejected() {
    let settings = MapperSettings {
        date_pivot_year: 120,
        ..MapperSettings::default()
    };
    assert!(matches!(settings.validate(), Err(MapperError::Config(_))));
}

// Env overrides are exercised in one test to avoid parallel tests racing
// on the process environment.
#[test]
fn test_from_env_overrides_and_rejects_invalid() {
    std::env::set_var(ENV_BATCH_SIZE, "8");
    std::env::set_var(ENV_FUZZY_THRESHOLD, "0.9");
    std::env::set_var(ENV_DATE_PIVOT, "50");

    let settings = MapperSettings::from_env().unwrap();
    assert_eq!(settings.batch_size, 8);
    assert_eq!(settings.fuzzy_threshold, 0.9);
    assert_eq!(settings.date_pivot_year, 50);

    std::env::set_var(ENV_BATCH_SIZE, "not-a-number");
    assert!(matches!(
        MapperSettings::from_env(),
        Err(MapperError::Config(_))
    ));

    // Set-but-out-of-range values fail validation, not parsing.
    std::env::set_var(ENV_BATCH_SIZE, "0");
    assert!(MapperSettings::from_env().is_err());

    std::env::remove_var(ENV_BATCH_SIZE);
    std::env::remove_var(ENV_FUZZY_THRESHOLD);
    std::env::remove_var(ENV_DATE_PIVOT);

    let settings = MapperSettings::from_env().unwrap();
    assert_eq!(settings, MapperSettings::default());
}
