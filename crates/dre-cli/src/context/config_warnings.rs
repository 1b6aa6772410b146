use dre_config::DreConfig;

/// Sections paired with the env prefix that configures them.
const SECTIONS: [(&str, &str, &str); 5] = [
    ("storage", "DRE_STORAGE", "DRE_STORAGE__ACCESS_KEY_ID"),
    ("bedrock", "DRE_BEDROCK", "DRE_BEDROCK__SYNTHESIS_MODEL_ID"),
    ("detector", "DRE_DETECTOR", "DRE_DETECTOR__REQUIRED_LABEL"),
    ("search", "DRE_SEARCH", "DRE_SEARCH__ENDPOINT"),
    ("cdn", "DRE_CDN", "DRE_CDN__DISTRIBUTION_DOMAIN"),
];

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &DreConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &DreConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let missing = config.unconfigured_sections();

    SECTIONS
        .iter()
        .filter(|(section, prefix, _)| {
            missing.contains(section) && has_env_prefix(&env_keys, prefix)
        })
        .map(|(section, prefix, example)| {
            format!(
                "{section} config appears default while {prefix}* env vars exist. Use double underscores (example: {example})."
            )
        })
        .collect()
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use dre_config::DreConfig;

    use super::collect_unconfigured_warnings;

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn warns_for_single_underscore_keys() {
        let warnings = collect_unconfigured_warnings(
            &DreConfig::default(),
            env(&[
                ("DRE_STORAGE_ACCESS_KEY_ID", "AKIA"),
                ("DRE_SEARCH_ENDPOINT", "search.example.com"),
            ]),
        );

        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].starts_with("storage config appears default"));
        assert!(warnings[1].contains("DRE_SEARCH__ENDPOINT"));
    }

    #[test]
    fn no_env_means_no_warning() {
        let warnings = collect_unconfigured_warnings(&DreConfig::default(), Vec::new());
        assert!(warnings.is_empty());
    }

    #[test]
    fn configured_sections_do_not_warn() {
        let mut config = DreConfig::default();
        config.search.endpoint = "search.example.com".into();
        let warnings =
            collect_unconfigured_warnings(&config, env(&[("DRE_SEARCH__ENDPOINT", "x")]));
        assert!(warnings.is_empty());
    }
}
