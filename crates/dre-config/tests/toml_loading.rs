//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed files and env vars.

use dre_config::DreConfig;
use dre_core::UploadPolicy;
use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;

#[test]
fn loads_storage_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[storage]
region = "us-west-2"
access_key_id = "AKIA"
secret_access_key = "secret"
uploads_bucket = "uploads"
ledger_bucket = "ledger"
ledger_key = "feedback.json"
ledger_max_attempts = 2
"#,
        )?;

        let config: DreConfig = Figment::from(Serialized::defaults(DreConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.storage.region, "us-west-2");
        assert_eq!(config.storage.uploads_bucket, "uploads");
        assert_eq!(config.storage.ledger_bucket, "ledger");
        assert_eq!(config.storage.ledger_key, "feedback.json");
        assert_eq!(config.storage.ledger_max_attempts, 2);
        assert!(config.storage.is_configured());
        Ok(())
    });
}

#[test]
fn partial_section_keeps_remaining_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[bedrock]
synthesis_model_id = "anthropic.claude-3-sonnet-20240229-v1:0"

[general]
upload_policy = "validate_then_store"
default_matches = 2
"#,
        )?;

        let config: DreConfig = Figment::from(Serialized::defaults(DreConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(
            config.bedrock.synthesis_model_id,
            "anthropic.claude-3-sonnet-20240229-v1:0"
        );
        assert_eq!(
            config.bedrock.description_model_id,
            "anthropic.claude-3-haiku-20240307-v1:0"
        );
        assert_eq!(config.bedrock.embedding_dimension, 1024);
        assert_eq!(config.bedrock.stream_idle_timeout_secs, 30);
        assert_eq!(config.general.upload_policy, UploadPolicy::ValidateThenStore);
        assert_eq!(config.general.default_matches, 2);
        assert_eq!(config.general.state, "FL");
        Ok(())
    });
}

#[test]
fn catalog_replaced_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[catalog.makes]
Toyota = ["Corolla", "Camry"]
"#,
        )?;

        let config: DreConfig = Figment::from(Serialized::defaults(DreConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!(config.catalog.validate("Toyota", "Camry").is_ok());
        assert_eq!(config.catalog.models("Toyota").map(<[String]>::len), Some(2));
        Ok(())
    });
}

#[test]
fn project_config_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".dre")?;
        jail.create_file(
            ".dre/config.toml",
            r#"
[search]
endpoint = "search.local:9200"
index = "claims"
"#,
        )?;

        let config = DreConfig::load().expect("config loads");
        assert_eq!(config.search.index, "claims");
        assert_eq!(config.search.endpoint_url(), "https://search.local:9200");
        Ok(())
    });
}
