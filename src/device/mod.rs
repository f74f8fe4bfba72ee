//! Device capabilities: camera, speaker, microphone.
//!
//! Everything the host OS does for us lives behind [`DeviceCapability`];
//! the Termux implementation shells out through [`CommandExecutor`].

pub mod capability;
pub mod executor;
pub mod termux;

pub use capability::{DeviceCapability, MockDevice};
pub use executor::{CommandExecutor, MockCommandExecutor, SystemCommandExecutor};
pub use termux::TermuxDevice;
