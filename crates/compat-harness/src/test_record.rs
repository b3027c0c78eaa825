//! Test identifiers and the per-package registry of known tests.
//!
//! The registry preserves insertion order for predictable iteration,
//! rejects duplicates, and derives the set of known test classes from the
//! identifiers themselves so the two views cannot drift apart.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Test identifier
// ---------------------------------------------------------------------------

/// A (class name, test name) pair uniquely naming one test case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TestIdentifier {
    pub class_name: String,
    pub test_name: String,
}

impl TestIdentifier {
    pub fn new(class_name: impl Into<String>, test_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            test_name: test_name.into(),
        }
    }
}

impl fmt::Display for TestIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.class_name, self.test_name)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Insertion-ordered, duplicate-free collection of test identifiers.
///
/// `add` is the only mutator; there is no removal. The class index is
/// derived on demand, so it is always exactly the distinct class names of
/// the registered identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRegistry {
    tests: Vec<TestIdentifier>,
}

impl TestRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a test. Duplicate insertion is a no-op; returns whether the
    /// identifier was actually added.
    pub fn add(&mut self, id: TestIdentifier) -> bool {
        if self.tests.contains(&id) {
            return false;
        }
        self.tests.push(id);
        true
    }

    /// Exact membership check.
    #[must_use]
    pub fn contains(&self, id: &TestIdentifier) -> bool {
        self.tests.contains(id)
    }

    /// Whether at least one registered identifier has this class name.
    #[must_use]
    pub fn contains_class(&self, class_name: &str) -> bool {
        self.tests.iter().any(|t| t.class_name == class_name)
    }

    /// Distinct class names across all registered identifiers.
    pub fn known_classes(&self) -> BTreeSet<&str> {
        self.tests.iter().map(|t| t.class_name.as_str()).collect()
    }

    /// Identifiers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TestIdentifier> {
        self.tests.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

impl<'a> IntoIterator for &'a TestRegistry {
    type Item = &'a TestIdentifier;
    type IntoIter = std::slice::Iter<'a, TestIdentifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.tests.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn id(class: &str, test: &str) -> TestIdentifier {
        TestIdentifier::new(class, test)
    }

    // ── identifier ─────────────────────────────────────────────────────

    #[test]
    fn identifier_equality_uses_both_fields() {
        assert_eq!(id("A", "t1"), id("A", "t1"));
        assert_ne!(id("A", "t1"), id("A", "t2"));
        assert_ne!(id("A", "t1"), id("B", "t1"));
    }

    #[test]
    fn identifier_display() {
        assert_eq!(id("android.sample.Cls", "testFoo").to_string(), "android.sample.Cls#testFoo");
    }

    #[test]
    fn identifier_serde_round_trip() {
        let original = id("A", "t1");
        let json = serde_json::to_string(&original).expect("serialize");
        let decoded: TestIdentifier = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(original, decoded);
    }

    // ── registry insertion ─────────────────────────────────────────────

    #[test]
    fn add_preserves_insertion_order() {
        let mut registry = TestRegistry::new();
        registry.add(id("B", "t2"));
        registry.add(id("A", "t1"));
        registry.add(id("C", "t3"));
        let order: Vec<String> = registry.iter().map(ToString::to_string).collect();
        assert_eq!(order, vec!["B#t2", "A#t1", "C#t3"]);
    }

    #[test]
    fn duplicate_add_is_a_no_op() {
        let mut registry = TestRegistry::new();
        assert!(registry.add(id("A", "t1")));
        assert!(!registry.add(id("A", "t1")));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.known_classes().len(), 1);
    }

    #[test]
    fn empty_registry() {
        let registry = TestRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.known_classes().is_empty());
        assert!(!registry.contains(&id("A", "t1")));
        assert!(!registry.contains_class("A"));
    }

    // ── membership ─────────────────────────────────────────────────────

    #[test]
    fn contains_is_exact() {
        let mut registry = TestRegistry::new();
        registry.add(id("A", "t1"));
        assert!(registry.contains(&id("A", "t1")));
        assert!(!registry.contains(&id("A", "t2")));
        assert!(!registry.contains(&id("B", "t1")));
    }

    #[test]
    fn contains_class_iff_some_identifier_has_it() {
        let mut registry = TestRegistry::new();
        registry.add(id("A", "t1"));
        registry.add(id("A", "t2"));
        registry.add(id("B", "t1"));
        assert!(registry.contains_class("A"));
        assert!(registry.contains_class("B"));
        assert!(!registry.contains_class("C"));
    }

    // ── derived class index ────────────────────────────────────────────

    #[test]
    fn known_classes_deduplicates() {
        let mut registry = TestRegistry::new();
        registry.add(id("A", "t1"));
        registry.add(id("A", "t2"));
        registry.add(id("B", "t1"));
        let classes = registry.known_classes();
        assert_eq!(classes.len(), 2);
        assert!(classes.contains("A"));
        assert!(classes.contains("B"));
    }

    #[test]
    fn known_classes_tracks_every_insertion() {
        let mut registry = TestRegistry::new();
        for (class, test) in [("X", "a"), ("Y", "b"), ("X", "c"), ("Z", "d")] {
            registry.add(id(class, test));
            assert!(registry.known_classes().contains(class));
        }
        assert_eq!(registry.known_classes().len(), 3);
    }

    // ── serde ──────────────────────────────────────────────────────────

    #[test]
    fn registry_serde_round_trip_keeps_order() {
        let mut registry = TestRegistry::new();
        registry.add(id("B", "t2"));
        registry.add(id("A", "t1"));
        let json = serde_json::to_string(&registry).expect("serialize");
        let decoded: TestRegistry = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(registry, decoded);
        let order: Vec<String> = decoded.iter().map(ToString::to_string).collect();
        assert_eq!(order, vec!["B#t2", "A#t1"]);
    }
}
