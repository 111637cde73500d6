use plugin_signature::Environment;
use plugingate_engine::config::Config;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_config_parsing_round_trip(
        log_level in "error|warn|info|debug|trace",
        env in prop_oneof![
            Just(Environment::Development),
            Just(Environment::Production),
            Just(Environment::Test),
        ],
        allow in proptest::collection::btree_set("[a-z][a-z0-9-]{0,12}", 0..5),
    ) {
        let mut config = Config::default();
        config.core.log_level = log_level;
        config.core.env = env;
        config.plugins.allow_loading_unsigned_plugins = allow.into_iter().collect();

        let toml_string = config.to_toml().expect("Failed to serialize Config to string");
        let parsed = Config::from_toml(&toml_string).expect("Failed to deserialize TOML to Config");

        prop_assert_eq!(config, parsed);
    }

    #[test]
    fn test_comma_separated_allow_list(ids in proptest::collection::vec("[a-z]{1,8}", 1..6)) {
        let toml_string = format!(
            "[plugins]\nallow_loading_unsigned_plugins = \"{}\"\n",
            ids.join(" , ")
        );
        let config = Config::from_toml(&toml_string).unwrap();
        let policy = config.signature_policy();

        for id in &ids {
            prop_assert!(policy.is_allow_listed(id));
        }
        prop_assert!(config.plugins.allow_loading_unsigned_plugins.len() <= ids.len());
    }
}
