//! Test-package descriptors and their resolution into runnable tests.
//!
//! A descriptor owns one package's metadata and known-test registry.
//! Resolution is a pure decision over the package kind: host-side packages
//! become [`JarHostTest`] handles, instrumentation packages become
//! [`InstrumentationTest`] handles gated on their install artifact, and
//! the unimplemented kinds skip. Every run returns a [`Resolution`]
//! artifact carrying the outcome and its structured log events; nothing
//! here errors or panics on a skippable package.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::artifact_probe::{ArtifactProbe, FsArtifactProbe};
use crate::runnable_test::{InstrumentationTest, JarHostTest, RunnableTest};
use crate::test_kind::TestKind;
use crate::test_record::{TestIdentifier, TestRegistry};

const COMPONENT: &str = "package_resolution";

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Class/method name filter applied when building the runnable test set.
///
/// An absent field matches everything; both filters must match for an
/// identifier to pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestFilter {
    pub class_name: Option<String>,
    pub method_name: Option<String>,
}

impl TestFilter {
    /// Filter that matches every test.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn for_class(class_name: impl Into<String>) -> Self {
        Self {
            class_name: Some(class_name.into()),
            method_name: None,
        }
    }

    #[must_use]
    pub fn for_method(class_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            class_name: Some(class_name.into()),
            method_name: Some(method_name.into()),
        }
    }

    #[must_use]
    pub fn matches(&self, id: &TestIdentifier) -> bool {
        let class_ok = self
            .class_name
            .as_deref()
            .is_none_or(|class| id.class_name == class);
        let method_ok = self
            .method_name
            .as_deref()
            .is_none_or(|method| id.test_name == method);
        class_ok && method_ok
    }
}

/// Filter tests by class and method name, preserving input order.
///
/// An empty result is not an error; it simply means nothing matched.
pub fn filter_tests<'a, I>(tests: I, filter: &TestFilter) -> Vec<TestIdentifier>
where
    I: IntoIterator<Item = &'a TestIdentifier>,
{
    tests
        .into_iter()
        .filter(|id| filter.matches(id))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Resolution artifact
// ---------------------------------------------------------------------------

/// Why a resolution produced no runnable test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The package kind is recognized but has no runner implementation.
    UnsupportedKind { kind: String },
    /// An install artifact the runnable test needs is not on disk.
    MissingArtifact { path: PathBuf },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedKind { kind } => write!(f, "unsupported test kind `{kind}`"),
            Self::MissingArtifact { path } => {
                write!(f, "missing artifact {}", path.display())
            }
        }
    }
}

/// Severity of a resolution log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticLevel {
    Debug,
    Warning,
}

/// Structured resolution log event with stable keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionEvent {
    pub level: DiagnosticLevel,
    pub component: String,
    /// URI of the package being resolved.
    pub package: String,
    pub event: String,
    pub outcome: String,
    pub detail: String,
}

/// Artifact of one resolver run: the runnable handle (or the reason there
/// is none) plus the events emitted while deciding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub runnable: Option<RunnableTest>,
    pub skip_reason: Option<SkipReason>,
    pub events: Vec<ResolutionEvent>,
}

impl Resolution {
    fn resolved(runnable: RunnableTest, events: Vec<ResolutionEvent>) -> Self {
        Self {
            runnable: Some(runnable),
            skip_reason: None,
            events,
        }
    }

    fn skipped(reason: SkipReason, events: Vec<ResolutionEvent>) -> Self {
        Self {
            runnable: None,
            skip_reason: Some(reason),
            events,
        }
    }

    /// Callers treat a skipped resolution as "skip this package", never as
    /// a run-ending condition.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.runnable.is_none()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ResolutionEvent> {
        self.events
            .iter()
            .filter(|e| e.level == DiagnosticLevel::Warning)
    }
}

// ---------------------------------------------------------------------------
// Descriptor
// ---------------------------------------------------------------------------

/// Metadata validation failures for a package descriptor.
///
/// The kind enum already makes invalid kind combinations unrepresentable;
/// what remains is string-field hygiene.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DescriptorError {
    #[error("package uri is empty")]
    EmptyUri,
    #[error("package `{uri}` has an empty name")]
    EmptyName { uri: String },
    #[error("host-side package `{uri}` has an empty jar path")]
    EmptyJarPath { uri: String },
    #[error("instrumentation package `{uri}` has an empty app namespace")]
    EmptyAppNamespace { uri: String },
    #[error("instrumentation package `{uri}` has an empty runner")]
    EmptyRunner { uri: String },
}

/// Container for one test package's metadata and known tests.
///
/// Knows how to translate that info into a runnable test. A descriptor is
/// built once from static package configuration, populated by repeated
/// [`add_test`](Self::add_test) calls, then queried read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    uri: String,
    name: String,
    kind: TestKind,
    registry: TestRegistry,
}

impl PackageDescriptor {
    pub fn new(uri: impl Into<String>, name: impl Into<String>, kind: TestKind) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            kind,
            registry: TestRegistry::new(),
        }
    }

    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Display name. For instrumentation packages this doubles as the apk
    /// file stem.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> &TestKind {
        &self.kind
    }

    /// The known-test registry, in insertion order.
    #[must_use]
    pub fn tests(&self) -> &TestRegistry {
        &self.registry
    }

    /// Register a known test. Duplicates are a no-op.
    pub fn add_test(&mut self, id: TestIdentifier) -> bool {
        self.registry.add(id)
    }

    #[must_use]
    pub fn is_known_test(&self, id: &TestIdentifier) -> bool {
        self.registry.contains(id)
    }

    #[must_use]
    pub fn is_known_test_class(&self, class_name: &str) -> bool {
        self.registry.contains_class(class_name)
    }

    /// Check string-field hygiene of the static metadata.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.uri.trim().is_empty() {
            return Err(DescriptorError::EmptyUri);
        }
        if self.name.trim().is_empty() {
            return Err(DescriptorError::EmptyName {
                uri: self.uri.clone(),
            });
        }
        match &self.kind {
            TestKind::HostSide { jar_path } if jar_path.trim().is_empty() => {
                Err(DescriptorError::EmptyJarPath {
                    uri: self.uri.clone(),
                })
            }
            TestKind::Instrumentation { app_namespace, .. } if app_namespace.trim().is_empty() => {
                Err(DescriptorError::EmptyAppNamespace {
                    uri: self.uri.clone(),
                })
            }
            TestKind::Instrumentation { runner, .. } if runner.trim().is_empty() => {
                Err(DescriptorError::EmptyRunner {
                    uri: self.uri.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Resolve this package against `test_case_dir` using the real
    /// filesystem for artifact existence checks.
    pub fn create_runnable_test(&self, test_case_dir: &Path, filter: &TestFilter) -> Resolution {
        self.create_runnable_test_with(&FsArtifactProbe, test_case_dir, filter)
    }

    /// Resolve this package against `test_case_dir`.
    ///
    /// Exactly one kind path executes. Unsupported kinds and missing
    /// install artifacts skip with a warning event; they never error.
    pub fn create_runnable_test_with(
        &self,
        probe: &dyn ArtifactProbe,
        test_case_dir: &Path,
        filter: &TestFilter,
    ) -> Resolution {
        let mut events = Vec::new();
        match &self.kind {
            TestKind::HostSide { jar_path } => {
                self.push_event(
                    &mut events,
                    DiagnosticLevel::Debug,
                    "resolve_host_side",
                    "ok",
                    format!("creating host test for {}", self.name),
                );
                if !probe.exists(test_case_dir, jar_path) {
                    let path = test_case_dir.join(jar_path);
                    self.push_event(
                        &mut events,
                        DiagnosticLevel::Warning,
                        "resolve_host_side",
                        "skip",
                        format!("could not find jar file {}", path.display()),
                    );
                    return Resolution::skipped(SkipReason::MissingArtifact { path }, events);
                }
                let tests = filter_tests(&self.registry, filter);
                Resolution::resolved(
                    RunnableTest::JarHost(JarHostTest {
                        run_name: self.name.clone(),
                        jar_file: test_case_dir.join(jar_path),
                        test_root: test_case_dir.to_path_buf(),
                        tests,
                    }),
                    events,
                )
            }
            TestKind::Signature | TestKind::ReferenceApp => {
                self.push_event(
                    &mut events,
                    DiagnosticLevel::Warning,
                    "resolve_unsupported",
                    "skip",
                    format!(
                        "skipping currently unsupported {} test {}",
                        self.kind.as_str(),
                        self.name
                    ),
                );
                Resolution::skipped(
                    SkipReason::UnsupportedKind {
                        kind: self.kind.as_str().to_string(),
                    },
                    events,
                )
            }
            TestKind::Instrumentation { app_namespace, runner } => {
                self.push_event(
                    &mut events,
                    DiagnosticLevel::Debug,
                    "resolve_instrumentation",
                    "ok",
                    format!("creating instrumentation test for {}", self.name),
                );
                let apk_name = format!("{}.apk", self.name);
                if !probe.exists(test_case_dir, &apk_name) {
                    let path = test_case_dir.join(&apk_name);
                    self.push_event(
                        &mut events,
                        DiagnosticLevel::Warning,
                        "resolve_instrumentation",
                        "skip",
                        format!("could not find apk file {}", path.display()),
                    );
                    return Resolution::skipped(SkipReason::MissingArtifact { path }, events);
                }
                Resolution::resolved(
                    RunnableTest::Instrumentation(InstrumentationTest {
                        app_namespace: app_namespace.clone(),
                        runner: runner.clone(),
                        class_filter: filter.class_name.clone(),
                        method_filter: filter.method_name.clone(),
                        install_file: test_case_dir.join(apk_name),
                    }),
                    events,
                )
            }
        }
    }

    fn push_event(
        &self,
        events: &mut Vec<ResolutionEvent>,
        level: DiagnosticLevel,
        event: &str,
        outcome: &str,
        detail: String,
    ) {
        events.push(ResolutionEvent {
            level,
            component: COMPONENT.to_string(),
            package: self.uri.clone(),
            event: event.to_string(),
            outcome: outcome.to_string(),
            detail,
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
