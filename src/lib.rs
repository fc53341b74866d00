//! ajlist event client
//!
//! Builds the process-wide client the ajlist service uses to publish events
//! and run AI inference. The client always identifies as `"ajlist"` and
//! carries the Gemini API key from `GEMINI_API_KEY`.
//!
//! Startup code calls [`AppContext::bootstrap`] once; everything else reads
//! the client through the returned context or [`shared::get`].

pub mod core;

pub use crate::core::client::{Client, ClientError};
pub use crate::core::config::{ClientConfig, ClientConfigBuilder, ConfigError};
pub use crate::core::constants::SERVICE_ID;
pub use crate::core::event::{Event, SendEventResponse};
pub use crate::core::provider::{
    AiProvider, InferenceMessage, InferenceRequest, InferenceResponse, ProviderError,
};
pub use crate::core::shared::{self, AppContext};
