//! Test-kind variants for a compatibility test package.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of test a package resolves to, carrying the data that kind
/// needs. Exactly one kind applies to a package.
///
/// Legacy package configuration encoded the choice as three independent
/// booleans; [`TestKind::from_flags`] folds those into a variant using the
/// same fixed priority the legacy harness applied, so descriptors arriving
/// from flag-based sources resolve identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    /// Executed directly by the orchestrating process from a jar of tests.
    HostSide { jar_path: String },
    /// API signature check. Recognized but not implemented.
    Signature,
    /// Reference application test. Recognized but not implemented.
    ReferenceApp,
    /// Executed inside an installed package on a target device, driven by
    /// a named runner.
    Instrumentation { app_namespace: String, runner: String },
}

impl TestKind {
    /// Fold the legacy flag triple into a variant.
    ///
    /// Priority order: host-side > signature > reference-app >
    /// instrumentation. The payload fields not selected by the winning
    /// flag are ignored.
    pub fn from_flags(
        is_host_side: bool,
        is_signature: bool,
        is_reference_app: bool,
        jar_path: impl Into<String>,
        app_namespace: impl Into<String>,
        runner: impl Into<String>,
    ) -> Self {
        if is_host_side {
            Self::HostSide {
                jar_path: jar_path.into(),
            }
        } else if is_signature {
            Self::Signature
        } else if is_reference_app {
            Self::ReferenceApp
        } else {
            Self::Instrumentation {
                app_namespace: app_namespace.into(),
                runner: runner.into(),
            }
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HostSide { .. } => "host_side",
            Self::Signature => "signature",
            Self::ReferenceApp => "reference_app",
            Self::Instrumentation { .. } => "instrumentation",
        }
    }

    /// Whether a runner implementation exists for this kind.
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        matches!(self, Self::HostSide { .. } | Self::Instrumentation { .. })
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
