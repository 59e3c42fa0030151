//! USB storage enumeration delay probe.
//!
//! Install media attached over USB may enumerate after the controller starts.
//! The kernel exposes the USB storage driver's own delay; waiting the same
//! amount before first use keeps the install disk detectable.

use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use crate::error::BuildError;

/// Waits for the delay advertised at `path`, if the file exists.
///
/// Returns the delay that was applied.
pub(crate) async fn wait_for_usb_delay(path: &Path) -> Result<Duration, BuildError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Duration::ZERO),
        Err(source) => {
            return Err(BuildError::UsbDelay {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let value = raw.trim_end_matches('\n');
    let secs: u64 = value.parse().map_err(|source| BuildError::UsbDelayValue {
        value: value.to_string(),
        source,
    })?;

    tracing::info!(seconds = secs, "waiting {secs} second(s) for USB storage");
    let delay = Duration::from_secs(secs);
    tokio::time::sleep(delay).await;

    Ok(delay)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn probe(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test(start_paused = true)]
    async fn missing_probe_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let delay = wait_for_usb_delay(&dir.path().join("delay_use")).await.unwrap();
        assert_eq!(delay, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_advertised_seconds() {
        let file = probe("5\n");
        let started = tokio::time::Instant::now();

        let delay = wait_for_usb_delay(file.path()).await.unwrap();

        assert_eq!(delay, Duration::from_secs(5));
        assert!(started.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn non_numeric_probe_is_rejected() {
        let file = probe("soon\n");
        let err = wait_for_usb_delay(file.path()).await.unwrap_err();
        assert!(matches!(err, BuildError::UsbDelayValue { ref value, .. } if value == "soon"));
    }
}
