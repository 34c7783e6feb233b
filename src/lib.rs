//! APUSH Coach - essay feedback service for the APUSH study app
//!
//! Accepts a student's essay over HTTP, validates it, builds a coaching
//! prompt from fixed bilingual rubric and unit metadata, asks a
//! text-generation provider for feedback, and returns the reply as one
//! trimmed string.
//!
//! # Architecture
//!
//! - **Types**: request/result data (`EssayFeedbackRequest`, `UnitId`, ...)
//! - **Validation**: untyped JSON to a typed request or field diagnostics
//! - **Curriculum / Prompts**: static tables and message composition
//! - **Services**: provider client and the feedback gateway
//! - **API**: axum router for the essay and health endpoints
//!
//! # Example
//!
//! ```ignore
//! use apush_coach_core::{validate_request, EnvGatewaySource, GatewaySource};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let request = validate_request(&serde_json::json!({
//!         "unitId": 6,
//!         "essayType": "LEQ",
//!         "essayText": std::fs::read_to_string("essay.txt")?,
//!     }))?;
//!
//!     let gateway = EnvGatewaySource::new(None)?.gateway()?;
//!     println!("{}", gateway.generate(&request).await?.output);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod curriculum;
pub mod error;
pub mod prompts;
pub mod services;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{CoachError, Result};
pub use prompts::{compose, FeedbackPrompt};
pub use services::{
    EnvGatewaySource, FeedbackGateway, FeedbackProvider, GatewaySource, GenerationOptions,
    ProviderReply,
};
pub use types::{EssayFeedbackRequest, EssayFeedbackResult, EssayType, Language, UnitId};
pub use validation::{validate_request, ValidationErrors};
