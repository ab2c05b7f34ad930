use maid_mayhem::{config::GameConfig, error::GameError};
use speculoos::prelude::*;

#[test]
fn test_defaults_without_environment() {
    figment::Jail::expect_with(|_| {
        let config = GameConfig::load().expect("Defaults should load");
        assert_that(&config).is_equal_to(GameConfig::default());
        Ok(())
    });
}

#[test]
fn test_environment_overrides_defaults() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("MAYHEM_DURATION_SECS", "30");
        jail.set_env("MAYHEM_MAX_FOOD_ITEMS", "3");
        jail.set_env("MAYHEM_SEED", "42");
        jail.set_env("MAYHEM_MUTED", "true");

        let config = GameConfig::load().expect("Overrides should load");
        assert_that(&config.duration_secs).is_equal_to(30);
        assert_that(&config.max_food_items).is_equal_to(3);
        assert_that(&config.seed).is_equal_to(Some(42));
        assert_that(&config.muted).is_true();
        assert_that(&config.spawn_interval_ms).is_equal_to(2000);
        Ok(())
    });
}

#[test]
fn test_out_of_range_values_rejected() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("MAYHEM_SMOOTHING_FACTOR", "1.5");
        assert!(matches!(GameConfig::load(), Err(GameError::Config(_))));
        Ok(())
    });
}

#[test]
fn test_unparseable_values_rejected() {
    figment::Jail::expect_with(|jail| {
        jail.set_env("MAYHEM_DURATION_SECS", "soon");
        assert!(matches!(GameConfig::load(), Err(GameError::Config(_))));
        Ok(())
    });
}
