//! # Controller configuration.
//!
//! ## Sentinel values
//! - `usb_delay_path = None` → the USB storage probe is skipped
//! - `bus_capacity = 0` → clamped to 1

use std::path::PathBuf;

/// Default location of the USB storage driver's enumeration delay parameter.
pub const USB_DELAY_PATH: &str = "/sys/module/usb_storage/parameters/delay_use";

/// Configuration for the controller.
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// File exposing the USB storage enumeration delay, in whole seconds.
    ///
    /// When the file exists, construction waits that long so USB-attached
    /// install media can appear. A missing file is not an error.
    pub usb_delay_path: Option<PathBuf>,

    /// Capacity of the event bus broadcast ring buffer.
    pub bus_capacity: usize,

    /// Prefix of task logger lines; the task number is appended (`"{prefix} task {n}:"`).
    pub log_prefix: String,

    /// Whether task loggers also write to the console.
    pub console: bool,
}

impl ControllerConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Logger prefix for the task at 1-based position `number`.
    #[inline]
    pub fn task_prefix(&self, number: usize) -> String {
        format!("{} task {number}:", self.log_prefix)
    }
}

impl Default for ControllerConfig {
    /// Default configuration:
    ///
    /// - `usb_delay_path = /sys/module/usb_storage/parameters/delay_use`
    /// - `bus_capacity = 1024`
    /// - `log_prefix = "[seqvisor]"`
    /// - `console = true`
    fn default() -> Self {
        Self {
            usb_delay_path: Some(PathBuf::from(USB_DELAY_PATH)),
            bus_capacity: 1024,
            log_prefix: "[seqvisor]".to_string(),
            console: true,
        }
    }
}
