//! AI Integration Layer
//!
//! Text-completion provider abstraction and response post-processing.

pub mod normalize;
pub mod provider;

pub use normalize::normalize;
pub use provider::{
    AnthropicProvider, CompletionProvider, ProviderConfig, SharedProvider, create_provider,
};
