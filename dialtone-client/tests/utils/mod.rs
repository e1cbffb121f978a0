pub mod call_helpers;
pub mod mock_signaling;

pub use call_helpers::*;
pub use mock_signaling::*;
pub use mock_transport::*;
