mod call_command;
mod call_event;
mod call_handle;
mod call_machine;
mod call_session;
mod call_state;

pub use call_command::*;
pub use call_event::*;
pub use call_handle::*;
pub use call_machine::*;
pub use call_session::*;
pub use call_state::*;
