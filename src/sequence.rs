//! # Sequences and their payloads.
//!
//! A [`Sequence`] names one top-level operation the machine can perform.
//! [`SequenceData`] is the per-invocation payload: only [`Sequence::Upgrade`]
//! and [`Sequence::Reset`] carry one, every other sequence expects
//! [`SequenceData::None`].
//!
//! ```rust
//! use seqvisor::{Sequence, SequenceData, UpgradeRequest};
//!
//! assert_eq!(Sequence::Shutdown.to_string(), "shutdown");
//!
//! let data = SequenceData::Upgrade(UpgradeRequest::new("ghcr.io/acme/installer:v1.2.0"));
//! assert!(data.matches(Sequence::Upgrade));
//! assert!(!data.matches(Sequence::Reset));
//! ```

use std::fmt;

/// Named top-level operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sequence {
    Boot,
    Initialize,
    Install,
    Shutdown,
    Reboot,
    Upgrade,
    Reset,
}

impl Sequence {
    /// Every sequence, in declaration order.
    pub const ALL: [Sequence; 7] = [
        Sequence::Boot,
        Sequence::Initialize,
        Sequence::Install,
        Sequence::Shutdown,
        Sequence::Reboot,
        Sequence::Upgrade,
        Sequence::Reset,
    ];

    /// Human-readable name used in logs and errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sequence::Boot => "boot",
            Sequence::Initialize => "initialize",
            Sequence::Install => "install",
            Sequence::Shutdown => "shutdown",
            Sequence::Reboot => "reboot",
            Sequence::Upgrade => "upgrade",
            Sequence::Reset => "reset",
        }
    }

    /// Payload tag this sequence requires.
    pub fn expected_data(&self) -> &'static str {
        match self {
            Sequence::Upgrade => SequenceData::UPGRADE,
            Sequence::Reset => SequenceData::RESET,
            _ => SequenceData::NONE,
        }
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request to replace the running installation with a new image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpgradeRequest {
    /// Installer image reference.
    pub image: String,
    /// Keep the ephemeral data partition.
    pub preserve: bool,
    /// Stage the upgrade and apply it on the next reboot.
    pub stage: bool,
    /// Skip pre-upgrade health checks.
    pub force: bool,
}

impl UpgradeRequest {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Self::default()
        }
    }
}

/// Request to wipe machine state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResetRequest {
    /// Leave the cluster cleanly before wiping.
    pub graceful: bool,
    /// Reboot instead of powering off once the reset finishes.
    pub reboot: bool,
}

/// Payload supplied with a sequence invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SequenceData {
    #[default]
    None,
    Upgrade(UpgradeRequest),
    Reset(ResetRequest),
}

impl SequenceData {
    pub const NONE: &'static str = "none";
    pub const UPGRADE: &'static str = "upgrade";
    pub const RESET: &'static str = "reset";

    /// Short tag naming the variant.
    pub fn tag(&self) -> &'static str {
        match self {
            SequenceData::None => Self::NONE,
            SequenceData::Upgrade(_) => Self::UPGRADE,
            SequenceData::Reset(_) => Self::RESET,
        }
    }

    /// Whether this payload satisfies `sequence`'s requirement.
    ///
    /// Sequences without a payload accept anything; the payload is ignored.
    pub fn matches(&self, sequence: Sequence) -> bool {
        match sequence {
            Sequence::Upgrade => matches!(self, SequenceData::Upgrade(_)),
            Sequence::Reset => matches!(self, SequenceData::Reset(_)),
            _ => true,
        }
    }

    pub fn as_upgrade(&self) -> Option<&UpgradeRequest> {
        match self {
            SequenceData::Upgrade(req) => Some(req),
            _ => None,
        }
    }

    pub fn as_reset(&self) -> Option<&ResetRequest> {
        match self {
            SequenceData::Reset(req) => Some(req),
            _ => None,
        }
    }
}

impl From<UpgradeRequest> for SequenceData {
    fn from(req: UpgradeRequest) -> Self {
        SequenceData::Upgrade(req)
    }
}

impl From<ResetRequest> for SequenceData {
    fn from(req: ResetRequest) -> Self {
        SequenceData::Reset(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_lowercase() {
        let names: Vec<_> = Sequence::ALL.iter().map(Sequence::as_str).collect();
        assert_eq!(
            names,
            ["boot", "initialize", "install", "shutdown", "reboot", "upgrade", "reset"]
        );
    }

    #[test]
    fn payload_sequences_require_their_tag() {
        let upgrade = SequenceData::from(UpgradeRequest::new("img"));
        let reset = SequenceData::from(ResetRequest::default());

        assert!(upgrade.matches(Sequence::Upgrade));
        assert!(!reset.matches(Sequence::Upgrade));
        assert!(!SequenceData::None.matches(Sequence::Upgrade));

        assert!(reset.matches(Sequence::Reset));
        assert!(!upgrade.matches(Sequence::Reset));
        assert!(!SequenceData::None.matches(Sequence::Reset));
    }

    #[test]
    fn payload_free_sequences_ignore_data() {
        let upgrade = SequenceData::from(UpgradeRequest::new("img"));
        for seq in [
            Sequence::Boot,
            Sequence::Initialize,
            Sequence::Install,
            Sequence::Shutdown,
            Sequence::Reboot,
        ] {
            assert!(SequenceData::None.matches(seq));
            assert!(upgrade.matches(seq));
            assert_eq!(seq.expected_data(), SequenceData::NONE);
        }
    }
}
