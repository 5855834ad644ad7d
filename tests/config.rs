// tests/config.rs
use marketplace_pricer::config::{
    PricerConfig, ENV_API_KEY, ENV_API_URL, ENV_CONFIG_PATH, ENV_TIMEOUT_SECS,
};
use marketplace_pricer::error::ConfigError;
use std::{env, fs};

fn clear_env() {
    for k in [ENV_CONFIG_PATH, ENV_API_KEY, ENV_API_URL, ENV_TIMEOUT_SECS] {
        env::remove_var(k);
    }
}

#[test]
fn load_from_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("pricer.toml");
    fs::write(
        &p,
        r#"
[gateway]
base_url = "https://gw.example/"
api_key = "from-file"
timeout_secs = 12
"#,
    )
    .unwrap();
    let cfg = PricerConfig::load_from(&p).unwrap();
    assert_eq!(cfg.gateway.base_url, "https://gw.example/");
    assert_eq!(cfg.gateway.api_key, "from-file");
    assert_eq!(cfg.gateway.timeout().as_secs(), 12);
}

#[serial_test::serial]
#[test]
fn default_uses_env_path_then_fallbacks_then_overrides() {
    // Isolate CWD so the repo's own config/ is not read
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    clear_env();

    // 1) Nothing at all -> defaults, but no key
    assert!(matches!(
        PricerConfig::load_default(),
        Err(ConfigError::MissingApiKey)
    ));

    // 2) Key from env only
    env::set_var(ENV_API_KEY, "env-key");
    let cfg = PricerConfig::load_default().unwrap();
    assert_eq!(cfg.gateway.api_key, "env-key");
    assert_eq!(cfg.gateway.base_url, "http://api.scraperapi.com");
    env::remove_var(ENV_API_KEY);

    // 3) Fallback file in ./config/ with "ENV" key placeholder
    fs::create_dir_all(tmp.path().join("config")).unwrap();
    fs::write(
        tmp.path().join("config/pricer.toml"),
        "[gateway]\napi_key = \"ENV\"\ntimeout_secs = 7\n",
    )
    .unwrap();
    assert!(matches!(
        PricerConfig::load_default(),
        Err(ConfigError::MissingApiKey)
    ));
    env::set_var(ENV_API_KEY, "resolved");
    let cfg = PricerConfig::load_default().unwrap();
    assert_eq!(cfg.gateway.api_key, "resolved");
    assert_eq!(cfg.gateway.timeout_secs, 7);

    // 4) Env overrides for url and timeout
    env::set_var(ENV_API_URL, "https://proxy.example");
    env::set_var(ENV_TIMEOUT_SECS, "3");
    let cfg = PricerConfig::load_default().unwrap();
    assert_eq!(cfg.gateway.base_url, "https://proxy.example");
    assert_eq!(cfg.gateway.timeout_secs, 3);

    env::set_var(ENV_TIMEOUT_SECS, "soon");
    assert!(matches!(
        PricerConfig::load_default(),
        Err(ConfigError::InvalidEnv { .. })
    ));
    env::remove_var(ENV_TIMEOUT_SECS);

    // 5) Explicit path wins, and must exist
    let explicit = tmp.path().join("other.toml");
    fs::write(&explicit, "[gateway]\napi_key = \"x\"\ntimeout_secs = 9\n").unwrap();
    env::set_var(ENV_CONFIG_PATH, explicit.display().to_string());
    let cfg = PricerConfig::load_default().unwrap();
    assert_eq!(cfg.gateway.timeout_secs, 9);

    env::set_var(ENV_CONFIG_PATH, tmp.path().join("nope.toml").display().to_string());
    assert!(matches!(
        PricerConfig::load_default(),
        Err(ConfigError::MissingFile(_))
    ));

    clear_env();
    env::set_current_dir(&old).unwrap();
}

#[test]
fn broken_toml_is_reported() {
    assert!(matches!(
        PricerConfig::from_toml_str("[gateway\napi_key = 1"),
        Err(ConfigError::Toml(_))
    ));
}
