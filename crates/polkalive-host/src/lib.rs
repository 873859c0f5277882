//! Receiving side of the polkalive fabric.
//!
//! - [`HostState`]: authoritative dispatcher for every cross-window task
//! - [`MainProcess`]: serves the main window's bound channels and fans out pushes
//! - [`BackgroundWorker`]: the same dispatcher behind the extension runtime
//! - [`Shell`]: bootstrap that wires windows to the host per configuration

pub mod background;
pub mod main_process;
pub mod push;
pub mod shell;
pub mod state;

pub use background::BackgroundWorker;
pub use main_process::{MainBroadcaster, MainProcess};
pub use push::{Audience, Push};
pub use shell::Shell;
pub use state::{HostState, Outcome};
