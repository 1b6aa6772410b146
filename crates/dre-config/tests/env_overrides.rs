use dre_config::DreConfig;
use figment::Jail;
use pretty_assertions::assert_eq;

#[test]
fn env_vars_map_to_nested_sections() {
    Jail::expect_with(|jail| {
        jail.set_env("DRE_AWS__REGION", "eu-west-1");
        jail.set_env("DRE_STORAGE__LEDGER_KEY", "env.json");
        jail.set_env("DRE_DETECTOR__MIN_CONFIDENCE", "80.5");

        let config = DreConfig::load().expect("config loads");
        assert_eq!(config.aws.region, "eu-west-1");
        assert_eq!(config.storage.ledger_key, "env.json");
        assert!((config.detector.min_confidence - 80.5).abs() < f32::EPSILON);
        Ok(())
    });
}

#[test]
fn env_beats_project_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".dre")?;
        jail.create_file(
            ".dre/config.toml",
            r#"
[general]
state = "TX"
"#,
        )?;
        jail.set_env("DRE_GENERAL__STATE", "CA");

        let config = DreConfig::load().expect("config loads");
        assert_eq!(config.general.state, "CA");
        Ok(())
    });
}
