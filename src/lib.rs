pub mod cache;
pub mod clock;
pub mod config;
pub mod conversation;
pub mod error;
pub mod format;
pub mod gateway;
pub mod intent;
pub mod metrics;
pub mod providers;
pub mod rate_limit;
pub mod router;
pub mod server;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use conversation::ChatSession;
pub use error::{ChatError, ChatResult};
pub use types::{ApiSelector, Message, Origin, Params};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
