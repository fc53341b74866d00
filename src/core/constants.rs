//! Constants for the service identity, environment variables and endpoints
//!
//! The service identifier lives here as a literal so it can never be picked
//! up from the environment or a configuration file.

/// Identifier this application registers under with the event API
pub const SERVICE_ID: &str = "ajlist";

/// SDK identification sent with every event API request
pub const SDK_HEADER_VALUE: &str = concat!("rust:v", env!("CARGO_PKG_VERSION"));

/// Environment variable names
pub mod env {
    /// Gemini API key (required)
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

    /// Gemini API base URL override
    pub const GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";

    /// Default Gemini model for inference requests
    pub const GEMINI_MODEL: &str = "GEMINI_MODEL";

    /// Event API key
    pub const EVENT_KEY: &str = "INNGEST_EVENT_KEY";

    /// Base URL shared by the event and dashboard APIs
    pub const BASE_URL: &str = "INNGEST_BASE_URL";

    /// Event API base URL; takes precedence over `INNGEST_BASE_URL`
    pub const EVENT_API_BASE_URL: &str = "INNGEST_EVENT_API_BASE_URL";

    /// Dev mode switch: `1`/`true`, or the URL of a dev server
    pub const DEV: &str = "INNGEST_DEV";

    /// Branch environment name
    pub const ENVIRONMENT: &str = "INNGEST_ENV";

    /// Request timeout in seconds
    pub const REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT";

    /// Logging level
    pub const LOG_LEVEL: &str = "LOG_LEVEL";

    /// Path to an optional TOML configuration file
    pub const CONFIG_PATH: &str = "CONFIG_PATH";
}

/// Default endpoints
pub mod endpoint {
    /// Hosted event API
    pub const EVENT_API: &str = "https://inn.gs";

    /// Local dev server
    pub const DEV_SERVER: &str = "http://localhost:8288";

    /// Gemini generative language API
    pub const GEMINI: &str = "https://generativelanguage.googleapis.com/v1beta";
}

/// HTTP header names
pub mod header {
    /// SDK identification header
    pub const SDK: &str = "x-inngest-sdk";

    /// Branch environment header
    pub const ENVIRONMENT: &str = "x-inngest-env";

    /// Gemini API key header
    pub const GOOG_API_KEY: &str = "x-goog-api-key";
}

/// Event key used against a dev server, which does not check keys
pub const DEV_EVENT_KEY: &str = "NO_EVENT_KEY_SET";

/// Default Gemini model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
