mod relay_command;
mod relay_coordinator;
mod relay_handle;
mod room_registry;

pub use relay_command::*;
pub use relay_coordinator::*;
pub use relay_handle::*;
pub use room_registry::*;
