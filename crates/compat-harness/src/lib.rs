#![forbid(unsafe_code)]

//! Host-side compatibility test harness.
//!
//! Two concerns live here:
//!
//! - test-package descriptors: declarative package metadata plus a registry
//!   of known tests, resolved into a runnable test invocation (host-side
//!   jar test or on-device instrumentation test) with class/method
//!   filtering;
//! - kernel conformance: tolerance-interval verification of floating-point
//!   math kernel outputs against reference implementations.
//!
//! Resolution never aborts a run: unsupported package kinds and missing
//! install artifacts surface as a skip reason plus structured warning
//! events on the returned artifact, and the caller moves on to the next
//! package.

pub mod artifact_probe;
pub mod float_interval;
pub mod kernel_conformance;
pub mod package_descriptor;
pub mod test_kind;
pub mod test_record;

pub use artifact_probe::{ArtifactProbe, FsArtifactProbe, StaticArtifactProbe};
pub use package_descriptor::{
    DescriptorError, DiagnosticLevel, PackageDescriptor, Resolution, ResolutionEvent, SkipReason,
    TestFilter, filter_tests,
};
pub use runnable_test::{InstrumentationTest, JarHostTest, RunnableTest};
pub use test_kind::TestKind;
pub use test_record::{TestIdentifier, TestRegistry};
