use apprelay::command::CommandSpec;
use proptest::prelude::*;

// Path pieces without quotes; spaces allowed only where the path is quoted.
fn quoted_path() -> impl Strategy<Value = String> {
    "[A-Za-z]:\\\\[A-Za-z0-9 _\\\\.]{1,30}"
        .prop_map(|p| p.trim().to_string())
        .prop_filter("non-empty path", |p| !p.is_empty())
}

fn bare_path() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_\\\\/.:-]{1,30}"
}

fn arguments() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 _/=-]{0,30}".prop_map(|a| a.trim().to_string())
}

proptest! {
    #[test]
    fn quoted_path_round_trips(path in quoted_path(), args in arguments()) {
        let raw = format!("\"{path}\" {args}");
        let spec = CommandSpec::parse(&raw);
        prop_assert_eq!(spec.executable_path, path);
        prop_assert_eq!(spec.arguments, args);
    }

    #[test]
    fn bare_path_splits_at_first_space(path in bare_path(), args in arguments()) {
        let raw = format!("{path} {args}");
        let spec = CommandSpec::parse(&raw);
        prop_assert_eq!(spec.executable_path, path);
        prop_assert_eq!(spec.arguments, args);
    }

    #[test]
    fn input_without_spaces_has_no_arguments(raw in "[^ \"]{0,40}") {
        let spec = CommandSpec::parse(&raw);
        prop_assert!(!spec.has_arguments());
        prop_assert_eq!(&spec.executable_path, raw.trim());
    }

    #[test]
    fn parse_never_panics(raw in ".{0,80}") {
        let spec = CommandSpec::parse(&raw);
        prop_assert!(raw.contains(spec.executable_path.as_str()));
    }
}
