pub mod classifier;
pub mod config;
pub mod error;
pub mod rules;
pub mod server;
pub mod vision;

pub use classifier::{classify, Classification, UNKNOWN_CATEGORY, UNKNOWN_DISPOSAL};
pub use config::Config;
pub use error::{Error, Result};
pub use rules::{CategoryRule, RuleTable};
pub use vision::{Label, VisionClient};
