mod config;
pub use config::*;

mod types;
pub use types::*;

mod fetcher;
pub use fetcher::*;
