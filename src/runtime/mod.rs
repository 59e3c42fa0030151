//! # Runtime context handed to every task.
//!
//! [`Runtime`] bundles the machine [`State`] and an optional parsed
//! [`Configurator`]. It is built once, attached to the controller at
//! construction, and cloned (cheaply, `Arc`-backed) into every task unit.
//!
//! Mutation discipline for anything reachable from the runtime belongs to the
//! tasks; the controller only reads the platform mode.

mod configurator;
mod state;

pub use configurator::{ConfigParser, Configurator};
pub use state::{Mode, Platform, State};

use std::fmt;
use std::sync::Arc;

use crate::error::BuildError;

/// Shared machine state and configuration.
#[derive(Clone)]
pub struct Runtime {
    state: Arc<State>,
    config: Option<Arc<dyn Configurator>>,
}

impl Runtime {
    pub fn new(config: Option<Arc<dyn Configurator>>, state: State) -> Self {
        Self {
            state: Arc::new(state),
            config,
        }
    }

    /// Builds a runtime, parsing `bytes` only when they are supplied.
    ///
    /// Absent bytes leave the runtime unconfigured, which is a valid state
    /// (e.g. a machine waiting for its configuration).
    pub fn from_bytes<P: ConfigParser>(
        state: State,
        bytes: Option<&[u8]>,
        parser: &P,
    ) -> Result<Self, BuildError> {
        let config = bytes
            .map(|b| parser.parse(b))
            .transpose()
            .map_err(BuildError::Config)?;

        Ok(Self::new(config, state))
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn config(&self) -> Option<&Arc<dyn Configurator>> {
        self.config.as_ref()
    }

    /// Shorthand for `state().platform().mode()`.
    pub fn mode(&self) -> Mode {
        self.state.platform().mode()
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("state", &self.state)
            .field("config", &self.config.as_ref().map(|c| c.version()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use super::*;
    use crate::error::BoxError;

    struct Fixed(&'static str);

    impl Configurator for Fixed {
        fn version(&self) -> &str {
            self.0
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn parse(bytes: &[u8]) -> Result<Arc<dyn Configurator>, BoxError> {
        match bytes {
            b"v1alpha1" => Ok(Arc::new(Fixed("v1alpha1"))),
            _ => Err("unknown version".into()),
        }
    }

    #[test]
    fn no_bytes_means_no_config() {
        let rt = Runtime::from_bytes(State::default(), None, &parse).unwrap();
        assert!(rt.config().is_none());
        assert_eq!(rt.mode(), Mode::Metal);
    }

    #[test]
    fn bytes_are_parsed_and_downcastable() {
        let rt = Runtime::from_bytes(State::default(), Some(b"v1alpha1"), &parse).unwrap();
        let cfg = rt.config().unwrap();
        assert_eq!(cfg.version(), "v1alpha1");
        assert!(cfg.as_any().downcast_ref::<Fixed>().is_some());
    }

    #[test]
    fn parse_failure_is_reported() {
        let err = Runtime::from_bytes(State::default(), Some(b"garbage"), &parse).unwrap_err();
        assert_eq!(err.to_string(), "failed to parse config: unknown version");
    }

    #[test]
    fn clones_share_state() {
        let rt = Runtime::new(
            None,
            State::new(Platform::new("docker", Mode::Container)),
        );
        let other = rt.clone();
        assert!(std::ptr::eq(rt.state(), other.state()));
        assert!(other.mode().is_container());
    }
}
