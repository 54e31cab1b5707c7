use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_protected_per_min: u32,
    pub rate_payroll_per_min: u32,

    pub api_prefix: String,

    // Role salary template cache
    pub template_cache_ttl: Duration,
    pub template_cache_capacity: u64,

    pub log_dir: String,
}

fn var_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("{key}={raw} is not valid, using default");
            default
        }),
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),

            rate_protected_per_min: var_or("RATE_PROTECTED_PER_MIN", 1000),
            rate_payroll_per_min: var_or("RATE_PAYROLL_PER_MIN", 60),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            template_cache_ttl: Duration::from_secs(var_or("TEMPLATE_CACHE_TTL_SECS", 300)),
            template_cache_capacity: var_or("TEMPLATE_CACHE_CAPACITY", 1000),

            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
        }
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            database_url: String::new(),
            jwt_secret: crate::auth::jwt::tests::SECRET.to_string(),
            server_addr: "127.0.0.1:0".to_string(),
            rate_protected_per_min: 10_000,
            rate_payroll_per_min: 10_000,
            api_prefix: "/api".to_string(),
            template_cache_ttl: Duration::from_secs(1),
            template_cache_capacity: 10,
            log_dir: "logs".to_string(),
        }
    }
}
