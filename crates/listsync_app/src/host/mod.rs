//! Terminal host view: stdin commands in, rendered list out.
mod app;
mod commands;
mod effects;
mod render;

pub use app::run;

use listsync_core::Msg;

use commands::HostCommand;

/// Everything the host loop reacts to.
#[derive(Debug)]
pub enum HostEvent {
    Input(HostCommand),
    InputError(String),
    Msg(Msg),
    Tick,
}
