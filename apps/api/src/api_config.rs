use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use tenantdesk_core::AppError;
use tracing_subscriber::EnvFilter;

/// Runtime settings read from the environment.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub database_max_connections: u32,
    pub frontend_url: String,
    pub bootstrap_token: String,
    pub _session_secret: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok(), env::args().nth(1).as_deref())
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        first_argument: Option<&str>,
    ) -> Result<Self, AppError> {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| AppError::Validation(format!("{name} is required")))
        };

        let database_url = required("DATABASE_URL")?;
        let bootstrap_token = required("AUTH_BOOTSTRAP_TOKEN")?;
        let session_secret = required("SESSION_SECRET")?;
        if session_secret.len() < 32 {
            return Err(AppError::Validation(
                "SESSION_SECRET must be at least 32 characters".to_owned(),
            ));
        }

        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());
        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = lookup("API_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);
        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(10);
        let cookie_secure = lookup("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|| "false".to_owned())
            .eq_ignore_ascii_case("true");

        Ok(Self {
            migrate_only: first_argument == Some("migrate"),
            database_url,
            database_max_connections,
            frontend_url,
            bootstrap_token,
            _session_secret: session_secret,
            api_host,
            api_port,
            cookie_secure,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tenantdesk_core::AppError;

    use super::ApiConfig;

    fn load(values: &[(&str, &str)], argument: Option<&str>) -> Result<ApiConfig, AppError> {
        let values: HashMap<String, String> = values
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ApiConfig::from_lookup(|name| values.get(name).cloned(), argument)
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("DATABASE_URL", "postgres://localhost/tenantdesk"),
        ("AUTH_BOOTSTRAP_TOKEN", "bootstrap"),
        ("SESSION_SECRET", "0123456789abcdef0123456789abcdef"),
    ];

    #[test]
    fn defaults_apply_when_optional_values_are_absent() {
        let config = load(&REQUIRED, None).unwrap_or_else(|_| unreachable!());

        assert_eq!(config.api_host, "127.0.0.1");
        assert_eq!(config.api_port, 3001);
        assert_eq!(config.frontend_url, "http://localhost:3000");
        assert_eq!(config.database_max_connections, 10);
        assert!(!config.cookie_secure);
        assert!(!config.migrate_only);
    }

    #[test]
    fn short_session_secret_is_rejected() {
        let mut values = REQUIRED.to_vec();
        values[2] = ("SESSION_SECRET", "too-short");

        assert!(matches!(load(&values, None), Err(AppError::Validation(_))));
    }

    #[test]
    fn missing_database_url_is_rejected() {
        assert!(matches!(
            load(&REQUIRED[1..], None),
            Err(AppError::Validation(message)) if message.contains("DATABASE_URL")
        ));
    }

    #[test]
    fn migrate_argument_enables_migrate_only() {
        let config = load(&REQUIRED, Some("migrate")).unwrap_or_else(|_| unreachable!());
        assert!(config.migrate_only);
    }
}
