use anyhow::Context;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_EVENT_BUFFER: usize = 1000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// "development" for local runs, anything else is treated as production.
    pub environment: String,
    pub frontend_url: Option<String>,
    pub event_buffer_size: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a port number, got {:?}", raw))?,
            Err(_) => DEFAULT_PORT,
        };
        let event_buffer_size = match std::env::var("EVENT_BUFFER_SIZE") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("EVENT_BUFFER_SIZE must be a positive integer, got {:?}", raw))?,
            Err(_) => DEFAULT_EVENT_BUFFER,
        };
        Ok(Self {
            port,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            frontend_url: std::env::var("FRONTEND_URL").ok().filter(|url| !url.is_empty()),
            event_buffer_size,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            environment: "development".to_string(),
            frontend_url: None,
            event_buffer_size: DEFAULT_EVENT_BUFFER,
        }
    }
}
