mod call;
mod config;
mod error;
mod signaling;
mod transport;

pub use call::*;
pub use config::*;
pub use error::*;
pub use signaling::*;
pub use transport::*;
