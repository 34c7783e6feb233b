//! Services layer for the essay coach
//!
//! Provides the provider integration and the feedback gateway built on it.

pub mod feedback;
pub mod llm;

pub use feedback::{normalize_reply, EnvGatewaySource, FeedbackGateway, GatewaySource};
pub use llm::{FeedbackProvider, GenerationOptions, OpenAiProvider, ProviderReply, ProviderSettings};
