mod handle_events_impl;
mod participant_command;
mod participant_config;
mod participant_controller;
mod participant_handle;
mod roster;

pub use participant_command::{ParticipantCommand, ParticipantSnapshot};
pub use participant_config::ParticipantConfig;
pub use participant_controller::ParticipantController;
pub use participant_handle::ParticipantHandle;
pub use roster::{Roster, RosterEntry};
