pub use meshcall_core::{PeerId, RoomId};

pub mod model {
    pub use meshcall_core::model::*;
    pub use meshcall_core::utils;
}

#[cfg(feature = "server")]
pub mod server {
    pub use meshcall_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use meshcall_client::*;
}
