use std::path::PathBuf;

use fleet_discovery::{load_config, ConfigError, DEFAULT_CLONE_TIMEOUT_SECS};

const ENV_VARS: [&str; 2] = [
    "FLEET_DISCOVERY_GIT_BINARY",
    "FLEET_DISCOVERY_CLONE_TIMEOUT_SECS",
];

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/config")
}

#[test]
fn load_config_from_fixture() {
    temp_env::with_vars_unset(ENV_VARS, || {
        let config = load_config(Some(&fixtures_root().join("discovery.toml"))).unwrap();

        assert_eq!(config.git_binary, "/usr/bin/git");
        assert_eq!(config.clone_timeout_secs, 15);
        assert_eq!(config.temp_prefix, "fleet-test-");
        assert_eq!(config.debug_log_capacity, 10);
        assert_eq!(config.temp_root(), std::env::temp_dir());
    });
}

#[test]
fn environment_overrides_fixture() {
    temp_env::with_vars(
        [
            ("FLEET_DISCOVERY_GIT_BINARY", None),
            ("FLEET_DISCOVERY_CLONE_TIMEOUT_SECS", Some("90")),
        ],
        || {
            let config = load_config(Some(&fixtures_root().join("discovery.toml"))).unwrap();
            assert_eq!(config.clone_timeout_secs, 90);
            assert_eq!(config.git_binary, "/usr/bin/git");
        },
    );
}

#[test]
fn rejects_unknown_keys() {
    temp_env::with_vars_unset(ENV_VARS, || {
        let result = load_config(Some(&fixtures_root().join("unknown-key.toml")));
        assert!(matches!(result, Err(ConfigError::TomlError { .. })));
    });
}

#[test]
fn missing_file_uses_defaults() {
    temp_env::with_vars_unset(ENV_VARS, || {
        let config = load_config(Some(&fixtures_root().join("absent.toml"))).unwrap();
        assert_eq!(config.clone_timeout_secs, DEFAULT_CLONE_TIMEOUT_SECS);
        assert_eq!(config.git_binary, "git");
    });
}
