//! # metagen - SEO Metadata Generation with a Hosted Language Model
//!
//! This crate turns raw webpage content into search-engine metadata (a title,
//! a meta description and a keyword list) by prompting a hosted text
//! generation model, and can also ask the model for content improvement
//! suggestions. Every model call is retried with exponential backoff, and
//! when the model cannot help, deterministic fallbacks derived from the
//! content take over, so callers always get a usable answer.
//!
//! ## Features
//!
//! - Text normalization: keyword extraction and description cleanup
//! - Retry with exponential backoff for any fallible async operation
//! - Hosted inference client with optional client-side rate limiting
//! - Metadata generation with lenient JSON parsing and content fallbacks
//! - Content analysis with a generic suggestion list as fallback
//! - Visible-text extraction from HTML pages
//!
//! ## Example
//!
//! ```rust,no_run
//! use metagen::config::Config;
//! use metagen::service::SeoService;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let service = SeoService::from_config(config)?;
//!
//!     let metadata = service
//!         .generate_llm_metadata(
//!             "https://example.com/bread",
//!             "Baking bread at home is easy. Start with flour, water and yeast.",
//!         )
//!         .await;
//!
//!     println!("{}", metadata.title);
//!     println!("{}", metadata.description);
//!     println!("{}", metadata.keywords);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod normalizer;
pub mod retry;

pub mod analyzer;
pub mod config;
pub mod extract;
pub mod inference;
pub mod metadata;
pub mod service;

pub use error::{Error, Result};
pub use metadata::PageMetadata;
pub use service::SeoService;

/// Re-export of commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::inference::{GenerationParams, TextGenerator};
    pub use crate::metadata::PageMetadata;
    pub use crate::service::SeoService;
}
