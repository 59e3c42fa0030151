//! # Persistent machine state.
//!
//! [`State`] is the long-lived view of the machine the controller runs on.
//! Only the platform descriptor is modelled here; the platform [`Mode`] decides,
//! among other things, whether the event listener waits for power events.

use std::fmt;

/// Operating mode of the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Cloud provider instance.
    Cloud,
    /// Restricted container environment (no power events, no disks).
    Container,
    /// Bare metal.
    #[default]
    Metal,
    /// Bare metal with an interactive installer.
    Interactive,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Cloud => "cloud",
            Mode::Container => "container",
            Mode::Metal => "metal",
            Mode::Interactive => "interactive",
        }
    }

    /// Whether the mode is a restricted container environment.
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self, Mode::Container)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform the machine runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    name: String,
    mode: Mode,
}

impl Platform {
    pub fn new(name: impl Into<String>, mode: Mode) -> Self {
        Self {
            name: name.into(),
            mode,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::new("metal", Mode::Metal)
    }
}

/// Machine state shared by every task.
#[derive(Debug, Clone, Default)]
pub struct State {
    platform: Platform,
}

impl State {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }
}
