use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub db_max_connections: u32,
    /// bcrypt cost factor for new password hashes.
    pub password_cost: u32,
    pub image: ImageRelayConfig,
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct ImageRelayConfig {
    pub timeout: Duration,
    pub max_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;

        let host: IpAddr = env_or("REMOTRACK_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid REMOTRACK_HOST: {e}"))?;

        let port: u16 = env_or("REMOTRACK_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid REMOTRACK_PORT: {e}"))?;

        let max_body_size: usize = env_or("REMOTRACK_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid REMOTRACK_MAX_BODY_SIZE: {e}"))?;

        let db_max_connections: u32 = env_or("REMOTRACK_DB_MAX_CONNECTIONS", "10")
            .parse()
            .map_err(|e| format!("Invalid REMOTRACK_DB_MAX_CONNECTIONS: {e}"))?;

        let password_cost = parse_password_cost(&env_or("REMOTRACK_PASSWORD_COST", "12"))?;

        let timeout_secs: u64 = env_or("REMOTRACK_IMAGE_TIMEOUT_SECS", "10")
            .parse()
            .map_err(|e| format!("Invalid REMOTRACK_IMAGE_TIMEOUT_SECS: {e}"))?;

        let max_bytes: usize = env_or("REMOTRACK_IMAGE_MAX_BYTES", "10485760")
            .parse()
            .map_err(|e| format!("Invalid REMOTRACK_IMAGE_MAX_BYTES: {e}"))?;

        let log_level = env_or("REMOTRACK_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            host,
            port,
            max_body_size,
            db_max_connections,
            password_cost,
            image: ImageRelayConfig {
                timeout: Duration::from_secs(timeout_secs),
                max_bytes,
            },
            log_level,
        })
    }
}

fn parse_password_cost(raw: &str) -> Result<u32, String> {
    let cost: u32 = raw
        .parse()
        .map_err(|e| format!("Invalid REMOTRACK_PASSWORD_COST: {e}"))?;
    if !(4..=31).contains(&cost) {
        return Err(format!(
            "Invalid REMOTRACK_PASSWORD_COST: {cost} is outside bcrypt's 4..=31 range"
        ));
    }
    Ok(cost)
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_cost_bounds() {
        assert_eq!(parse_password_cost("12"), Ok(12));
        assert_eq!(parse_password_cost("4"), Ok(4));
        assert!(parse_password_cost("3").is_err());
        assert!(parse_password_cost("32").is_err());
        assert!(parse_password_cost("twelve").is_err());
    }
}
