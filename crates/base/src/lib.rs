pub mod errors;

mod logger;
pub use logger::*;

mod time;
pub use time::*;

mod format;
pub use format::*;
