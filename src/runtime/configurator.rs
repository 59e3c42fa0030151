//! # Parsed machine configuration.
//!
//! The configuration format itself lives outside this crate. The controller only
//! needs an opaque [`Configurator`] that task factories can downcast, and a
//! [`ConfigParser`] that produces one from raw bytes.

use std::any::Any;
use std::sync::Arc;

use crate::error::BoxError;

/// Parsed machine configuration.
pub trait Configurator: Send + Sync + 'static {
    /// Configuration schema version.
    fn version(&self) -> &str;

    /// Access to the concrete type, for downcasting inside tasks.
    fn as_any(&self) -> &dyn Any;
}

/// Turns raw configuration bytes into a [`Configurator`].
///
/// Implemented for closures:
/// ```rust
/// use std::{any::Any, sync::Arc};
/// use seqvisor::{ConfigParser, Configurator};
///
/// struct V1;
/// impl Configurator for V1 {
///     fn version(&self) -> &str { "v1" }
///     fn as_any(&self) -> &dyn Any { self }
/// }
///
/// let parser = |_b: &[u8]| Ok::<_, seqvisor::BoxError>(Arc::new(V1) as Arc<dyn Configurator>);
/// let cfg = parser.parse(b"version: v1").unwrap();
/// assert_eq!(cfg.version(), "v1");
/// ```
pub trait ConfigParser {
    fn parse(&self, bytes: &[u8]) -> Result<Arc<dyn Configurator>, BoxError>;
}

impl<F> ConfigParser for F
where
    F: Fn(&[u8]) -> Result<Arc<dyn Configurator>, BoxError>,
{
    fn parse(&self, bytes: &[u8]) -> Result<Arc<dyn Configurator>, BoxError> {
        (self)(bytes)
    }
}
