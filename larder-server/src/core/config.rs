/// Server configuration
///
/// # Environment variables
///
/// Every knob can be overridden through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | Runtime environment |
/// | STORE_BASE_URL | https://sheets.googleapis.com | Spreadsheet API base URL |
/// | STORE_SPREADSHEET_ID | (unset) | Spreadsheet holding catalog and stock |
/// | STORE_API_TOKEN | (unset) | Bearer token for the spreadsheet API |
/// | PRODUCTS_RANGE | Products!A1:Z | Catalog sheet range |
/// | STOCK_RANGE | Stock!A1:Z | Stock sheet range |
/// | STOCK_SHEET_GID | 0 | Numeric id of the stock tab (row deletion) |
/// | CACHE_TTL_SECS | 30 | Snapshot time-to-live |
/// | REQUEST_TIMEOUT_MS | 10000 | Per-request store timeout (ms) |
/// | PRINTER_ADDR | (unset) | Label printer address, e.g. 192.168.1.50:9100 |
/// | LOGO_PATH | (unset) | Logo image printed on labels |
///
/// Without STORE_SPREADSHEET_ID and STORE_API_TOKEN the server runs on the
/// in-memory store; useful for development, useless in production.
///
/// # Example
///
/// ```ignore
/// STORE_SPREADSHEET_ID=1abc STORE_API_TOKEN=ya29... HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Spreadsheet API base URL
    pub store_base_url: String,
    /// Spreadsheet id, unset means in-memory store
    pub spreadsheet_id: Option<String>,
    /// Bearer token for the spreadsheet API
    pub store_api_token: Option<String>,
    /// Catalog sheet range
    pub products_range: String,
    /// Stock sheet range
    pub stock_range: String,
    /// Numeric sheet id of the stock tab, needed for row deletion
    pub stock_sheet_gid: u64,
    /// Snapshot time-to-live in seconds
    pub cache_ttl_secs: u64,
    /// Store request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Network label printer address
    pub printer_addr: Option<String>,
    /// Logo image path for labels
    pub logo_path: Option<String>,
}

impl Config {
    /// Load configuration from the environment, with defaults
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            store_base_url: std::env::var("STORE_BASE_URL")
                .unwrap_or_else(|_| "https://sheets.googleapis.com".into()),
            spreadsheet_id: std::env::var("STORE_SPREADSHEET_ID").ok(),
            store_api_token: std::env::var("STORE_API_TOKEN").ok(),
            products_range: std::env::var("PRODUCTS_RANGE")
                .unwrap_or_else(|_| "Products!A1:Z".into()),
            stock_range: std::env::var("STOCK_RANGE").unwrap_or_else(|_| "Stock!A1:Z".into()),
            stock_sheet_gid: std::env::var("STOCK_SHEET_GID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            cache_ttl_secs: std::env::var("CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10000),
            printer_addr: std::env::var("PRINTER_ADDR").ok(),
            logo_path: std::env::var("LOGO_PATH").ok(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
