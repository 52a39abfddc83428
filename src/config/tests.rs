use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::time::Duration;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_sheetmatch_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("SHEETMATCH_PORT");
        env::remove_var("SHEETMATCH_BIND_ADDR");
        env::remove_var("SHEETMATCH_DATABASE_URL");
        env::remove_var("SHEETMATCH_PRODUCTS_TABLE");
        env::remove_var("GEMINI_API_KEY");
        env::remove_var("SHEETMATCH_GEMINI_BASE_URL");
        env::remove_var("SHEETMATCH_EMBEDDING_MODEL");
        env::remove_var("SHEETMATCH_VISION_MODEL");
        env::remove_var("SHEETMATCH_REQUEST_TIMEOUT_SECS");
        env::remove_var("SHEETMATCH_MATCH_CONCURRENCY");
        env::remove_var("SHEETMATCH_BACKFILL_DELAY_MS");
        env::remove_var("SHEETMATCH_MAX_IMAGE_BYTES");
        env::remove_var("SHEETMATCH_QUERY_CACHE_CAPACITY");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    assert_eq!(config.products_table, "products");
    assert!(config.gemini_api_key.is_none());
    assert_eq!(config.embedding_model, "text-embedding-004");
    assert_eq!(config.backfill_delay, Duration::from_millis(500));
    assert_eq!(config.match_concurrency, 4);
}

#[test]
fn test_socket_addr() {
    let config = Config::default();
    assert_eq!(config.socket_addr(), "127.0.0.1:8080");

    let config = Config {
        port: 3000,
        bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
fn test_debug_redacts_api_key() {
    let config = Config {
        gemini_api_key: Some("super-secret".to_string()),
        ..Default::default()
    };
    let rendered = format!("{:?}", config);
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_sheetmatch_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.port, 8080);
    assert!(!config.has_gemini_key());
    assert_eq!(config.query_cache_capacity, 1024);
}

#[test]
#[serial]
fn test_from_env_custom_values() {
    clear_sheetmatch_env();

    with_env_vars(
        &[
            ("SHEETMATCH_PORT", "3000"),
            ("SHEETMATCH_BIND_ADDR", "0.0.0.0"),
            ("SHEETMATCH_DATABASE_URL", "postgres://db.internal/catalog"),
            ("SHEETMATCH_PRODUCTS_TABLE", "dental_products"),
            ("GEMINI_API_KEY", "  key-123  "),
            ("SHEETMATCH_REQUEST_TIMEOUT_SECS", "5"),
            ("SHEETMATCH_MATCH_CONCURRENCY", "8"),
            ("SHEETMATCH_BACKFILL_DELAY_MS", "250"),
        ],
        || {
            let config = Config::from_env().expect("should parse");

            assert_eq!(config.port, 3000);
            assert_eq!(config.socket_addr(), "0.0.0.0:3000");
            assert_eq!(config.database_url, "postgres://db.internal/catalog");
            assert_eq!(config.products_table, "dental_products");
            assert_eq!(config.gemini_api_key.as_deref(), Some("key-123"));
            assert_eq!(config.request_timeout, Duration::from_secs(5));
            assert_eq!(config.match_concurrency, 8);
            assert_eq!(config.backfill_delay, Duration::from_millis(250));
        },
    );
}

#[test]
#[serial]
fn test_blank_api_key_is_treated_as_missing() {
    clear_sheetmatch_env();

    with_env_vars(&[("GEMINI_API_KEY", "   ")], || {
        let config = Config::from_env().expect("should parse");
        assert!(config.gemini_api_key.is_none());
    });
}

#[test]
#[serial]
fn test_invalid_port_zero() {
    clear_sheetmatch_env();

    with_env_vars(&[("SHEETMATCH_PORT", "0")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
        assert!(err.to_string().contains("invalid port"));
    });
}

#[test]
#[serial]
fn test_invalid_port_not_number() {
    clear_sheetmatch_env();

    with_env_vars(&[("SHEETMATCH_PORT", "not_a_port")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::PortParseError { .. }));
    });
}

#[test]
#[serial]
fn test_invalid_bind_addr() {
    clear_sheetmatch_env();

    with_env_vars(&[("SHEETMATCH_BIND_ADDR", "not.an.ip.address")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
    });
}

#[test]
#[serial]
fn test_invalid_numeric_setting_is_an_error() {
    clear_sheetmatch_env();

    with_env_vars(&[("SHEETMATCH_BACKFILL_DELAY_MS", "soon")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NumberParseError {
                name: "SHEETMATCH_BACKFILL_DELAY_MS",
                ..
            }
        ));
    });
}

#[test]
fn test_validate_success_with_defaults() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validate_zero_concurrency() {
    let config = Config {
        match_concurrency: 0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn test_validate_zero_timeout() {
    let config = Config {
        request_timeout: Duration::ZERO,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn test_validate_rejects_injected_table_name() {
    let config = Config {
        products_table: "products; DROP TABLE products".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidTableName { .. })
    ));
}

#[test]
fn test_plain_identifier() {
    assert!(is_plain_identifier("products"));
    assert!(is_plain_identifier("_p2"));
    assert!(!is_plain_identifier(""));
    assert!(!is_plain_identifier("2products"));
    assert!(!is_plain_identifier("public.products"));
}
