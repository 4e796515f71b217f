//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels.

pub mod buttons;
pub mod control;
pub mod dial;

pub use buttons::{button_task, encoder_button_task, fine_step_task};
pub use control::{control_task, FirmwareTurntable};
pub use dial::dial_task;
