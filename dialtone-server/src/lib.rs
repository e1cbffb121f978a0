mod app;
mod config;
mod router;
mod signaling;

pub use app::*;
pub use config::*;
pub use router::*;
pub use signaling::*;
