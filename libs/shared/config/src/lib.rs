use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub medical_services_url: String,
    pub booking_api_url: Option<String>,
    pub simulated_latency_ms: u64,
    pub session_store_path: Option<String>,
    pub calendar_cell_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            medical_services_url: "http://localhost:8080/api".to_string(),
            booking_api_url: None,
            simulated_latency_ms: 1500,
            session_store_path: None,
            calendar_cell_limit: 3,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            host: env::var("HOST").unwrap_or_else(|_| {
                warn!("HOST not set, using {}", defaults.host);
                defaults.host.clone()
            }),
            port: parse_or_default("PORT", defaults.port),
            medical_services_url: env::var("MEDICAL_SERVICES_URL")
                .unwrap_or_else(|_| {
                    warn!("MEDICAL_SERVICES_URL not set, using default");
                    defaults.medical_services_url.clone()
                }),
            booking_api_url: env::var("BOOKING_API_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            simulated_latency_ms: parse_or_default("SIMULATED_LATENCY_MS", defaults.simulated_latency_ms),
            session_store_path: env::var("SESSION_STORE_PATH")
                .ok()
                .filter(|path| !path.trim().is_empty()),
            calendar_cell_limit: parse_or_default("CALENDAR_CELL_LIMIT", defaults.calendar_cell_limit),
        };

        if !config.is_booking_backend_configured() {
            warn!("BOOKING_API_URL not set - bookings are served by the in-memory mock");
        }

        config
    }

    pub fn is_booking_backend_configured(&self) -> bool {
        self.booking_api_url.is_some()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using {}", key, raw, default);
            default
        }),
        Err(_) => {
            warn!("{} not set, using {}", key, default);
            default
        }
    }
}
