#![no_main]
use libfuzzer_sys::fuzz_target;
use nebula_core::formula::{parse, render};
use nebula_core::test_utils::*;

fuzz_target!(|data: &[u8]| {
    let Ok(formula) = std::str::from_utf8(data) else {
        return;
    };
    let registry = nebula_registry();
    let elements = registry.elements();

    // Arbitrary input must fail cleanly or parse; never panic.
    let Ok(scalars) = parse(formula, elements) else {
        return;
    };

    // Anything that parses renders back to the same composition.
    let rendered = render(&scalars.composition, elements);
    let reparsed = parse(&rendered, elements).expect("rendered formula must parse");
    assert_eq!(reparsed.composition, scalars.composition);
    assert_eq!(reparsed.atoms, scalars.atoms);
});
