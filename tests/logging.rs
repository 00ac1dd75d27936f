// tests/logging.rs

use apprelay::cli::LogLevel;
use apprelay::logging::filter_directives;

#[test]
fn cli_level_targets_the_relay_and_quiets_dependencies() {
    assert_eq!(
        filter_directives(Some(LogLevel::Debug), None),
        "warn,apprelay=debug"
    );
    // The flag wins over the environment.
    assert_eq!(
        filter_directives(Some(LogLevel::Error), Some("apprelay=trace")),
        "warn,apprelay=error"
    );
}

#[test]
fn env_value_is_used_as_filter_directives() {
    assert_eq!(
        filter_directives(None, Some(" apprelay::engine=debug,apprelay::census=trace ")),
        "apprelay::engine=debug,apprelay::census=trace"
    );
}

#[test]
fn missing_or_blank_env_falls_back_to_info() {
    assert_eq!(filter_directives(None, None), "warn,apprelay=info");
    assert_eq!(filter_directives(None, Some("   ")), "warn,apprelay=info");
}
