//! Configuration read from the process environment.

use std::env;
use std::sync::Mutex;

use tyk_operator::config::{env_keys, OperatorConfig, OperatorMode};
use tyk_operator::errors::OperatorError;
use tyk_operator::Universal;

// Use a mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const KEYS: &[&str] = &[
    env_keys::TYK_MODE,
    env_keys::TYK_URL,
    env_keys::TYK_AUTH,
    env_keys::TYK_ORG,
    env_keys::USER_OWNERS,
    env_keys::HTTP_TIMEOUT,
];

/// Run `f` with `vars` set, restoring the previous environment afterwards.
fn with_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

    let saved: Vec<(&str, Option<String>)> = KEYS.iter().map(|k| (*k, env::var(k).ok())).collect();
    for key in KEYS {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    f();

    for (key, value) in saved {
        match value {
            Some(value) => env::set_var(key, value),
            None => env::remove_var(key),
        }
    }
}

#[test]
fn test_gateway_config_from_env() {
    with_env(
        &[
            (env_keys::TYK_MODE, "ce"),
            (env_keys::TYK_URL, " http://gateway:8080 "),
            (env_keys::TYK_AUTH, "secret"),
            (env_keys::TYK_ORG, "org"),
            (env_keys::HTTP_TIMEOUT, "5"),
        ],
        || {
            let config = OperatorConfig::from_env().unwrap();
            assert_eq!(config.mode, OperatorMode::Gateway);
            assert_eq!(config.url, "http://gateway:8080");
            assert_eq!(config.timeout_seconds, 5);

            let client = Universal::from_config(&config).unwrap();
            assert_eq!(client.mode(), OperatorMode::Gateway);
        },
    );
}

#[test]
fn test_dashboard_owners_from_env() {
    with_env(
        &[
            (env_keys::TYK_MODE, "pro"),
            (env_keys::TYK_URL, "http://dashboard:3000"),
            (env_keys::TYK_AUTH, "key"),
            (env_keys::TYK_ORG, "org"),
            (env_keys::USER_OWNERS, "a, b,,c"),
        ],
        || {
            let config = OperatorConfig::from_env().unwrap();
            assert_eq!(config.mode, OperatorMode::Dashboard);
            assert_eq!(config.user_owners, vec!["a", "b", "c"]);
        },
    );
}

#[test]
fn test_missing_required_vars() {
    with_env(&[(env_keys::TYK_MODE, "ce")], || {
        let err = OperatorConfig::from_env().unwrap_err();
        assert!(matches!(err, OperatorError::Config { .. }));
        let message = err.to_string();
        assert!(message.contains(env_keys::TYK_URL));
        assert!(message.contains(env_keys::TYK_ORG));
    });
}

#[test]
fn test_unknown_mode_rejected() {
    with_env(
        &[
            (env_keys::TYK_MODE, "enterprise"),
            (env_keys::TYK_URL, "http://gateway:8080"),
            (env_keys::TYK_AUTH, "secret"),
            (env_keys::TYK_ORG, "org"),
        ],
        || {
            assert!(OperatorConfig::from_env().is_err());
        },
    );
}
