// Property-based tests for name canonicalization.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use totem_reports::names::*;

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn word() -> impl Strategy<Value = String> {
    "[A-Za-z]{1,12}"
}

fn padding() -> impl Strategy<Value = String> {
    "[ \t]{0,4}"
}

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn comma_form_key_is_lower_last_first(
        first in word(),
        last in word(),
        a in padding(),
        b in padding(),
        c in padding(),
    ) {
        let text = format!("{a}{last}{b},{c}{first}{a}");
        let name = split_time_punch_name(&text).unwrap();
        prop_assert_eq!(
            name.time_punch_key,
            format!("{}, {}", last.to_lowercase(), first.to_lowercase())
        );
    }

    #[test]
    fn whitespace_form_key_is_lower_last_first(
        first in word(),
        last in word(),
        a in padding(),
        c in padding(),
    ) {
        let text = format!("{a}{first} \t {last}{c}");
        let name = split_time_punch_name(&text).unwrap();
        prop_assert_eq!(
            name.time_punch_key,
            format!("{}, {}", last.to_lowercase(), first.to_lowercase())
        );
    }

    #[test]
    fn resplitting_canonical_form_is_idempotent(first in word(), last in word()) {
        let once = split_time_punch_name(&format!("{first} {last}")).unwrap();
        let again = split_time_punch_name(&format!("{}, {}", once.last, once.first)).unwrap();
        prop_assert_eq!(&once, &again);

        let third = split_time_punch_name(&format!("{}, {}", again.last, again.first)).unwrap();
        prop_assert_eq!(again, third);
    }

    #[test]
    fn strict_key_only_has_letters_and_separators(first in ".{0,20}", last in ".{0,20}") {
        if let Some(key) = normalize_name_key(&first, &last) {
            prop_assert!(key.chars().all(|c| c.is_alphabetic() || c == ' ' || c == '|'));
            prop_assert_eq!(key.matches('|').count(), 1);
        }
    }
}
