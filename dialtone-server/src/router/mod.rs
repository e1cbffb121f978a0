mod route_outcome;
mod signaling_router;

pub use route_outcome::*;
pub use signaling_router::*;
