pub mod fake_engine;

pub use fake_engine::*;
pub use recording_sink::*;
