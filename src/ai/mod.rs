//! AI-assisted listing analysis.
//!
//! Every capability is a chain: configured third-party providers are tried in
//! order and the chain always ends in local heuristics or templates, so a
//! provider outage degrades quality but never fails a business operation.

pub mod config;
pub mod description;
pub mod duplicates;
pub mod error;
pub mod heuristics;
pub mod huggingface;
pub mod image_analysis;
pub mod moderation;
pub mod openai;
pub mod provider;
pub mod review;
pub mod roboflow;
pub mod similarity;
#[cfg(test)]
pub(crate) mod test_support;
pub mod ultralytics;

pub use config::*;
pub use description::*;
pub use duplicates::*;
pub use error::*;
pub use image_analysis::*;
pub use moderation::*;
pub use provider::*;
pub use review::*;
