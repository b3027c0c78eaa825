#![no_main]

use compat_harness::{TestFilter, TestIdentifier, TestRegistry, filter_tests};
use libfuzzer_sys::fuzz_target;

const MAX_TESTS: usize = 64;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let mut registry = TestRegistry::new();
    let mut chunks = data.chunks(2);
    for chunk in chunks.by_ref().take(MAX_TESTS) {
        let class = format!("Class{}", chunk[0] % 8);
        let test = format!("test{}", chunk.get(1).copied().unwrap_or(0) % 16);
        registry.add(TestIdentifier::new(class, test));
    }

    // Derived class index always matches the identifiers themselves.
    for id in registry.iter() {
        assert!(registry.contains_class(&id.class_name));
    }
    assert!(
        registry
            .known_classes()
            .iter()
            .all(|class| registry.iter().any(|id| id.class_name == *class))
    );

    // Unfiltered pass returns every registered test in order.
    let unfiltered = filter_tests(&registry, &TestFilter::all());
    assert_eq!(unfiltered.len(), registry.len());
    assert!(unfiltered.iter().zip(registry.iter()).all(|(a, b)| a == b));

    // A class filter returns exactly the tests of that class, in order.
    let class = format!("Class{}", data[0] % 8);
    let filtered = filter_tests(&registry, &TestFilter::for_class(&class));
    let expected: Vec<&TestIdentifier> = registry
        .iter()
        .filter(|id| id.class_name == class)
        .collect();
    assert_eq!(filtered.len(), expected.len());
    assert!(filtered.iter().zip(expected).all(|(a, b)| a == b));
});
