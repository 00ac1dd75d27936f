// tests/census.rs

use apprelay::census::{
    census_supported, platform_census, UnsupportedCensus, WindowCensus, WindowInfo,
    UNTITLED_WINDOW,
};
use apprelay::errors::RelayError;

#[test]
fn empty_titles_get_the_placeholder() {
    assert_eq!(WindowInfo::from_title("").title, UNTITLED_WINDOW);
    assert_eq!(WindowInfo::from_title("Editor").title, "Editor");
}

#[test]
fn unsupported_census_never_answers() {
    let census = UnsupportedCensus;
    assert!(matches!(
        census.count_visible_windows(1),
        Err(RelayError::CensusUnavailable)
    ));
    assert!(matches!(
        census.list_visible_windows(1),
        Err(RelayError::CensusUnavailable)
    ));
}

#[test]
fn platform_census_count_agrees_with_list() {
    let census = platform_census();
    let pid = std::process::id();

    match (
        census.list_visible_windows(pid),
        census.count_visible_windows(pid),
    ) {
        (Ok(list), Ok(count)) => {
            assert!(census_supported());
            assert_eq!(list.len(), count);
            assert!(list.iter().all(|w| !w.title.is_empty()));
        }
        (Err(_), Err(_)) => assert!(!census_supported()),
        (list, count) => panic!("census answers disagree: {list:?} vs {count:?}"),
    }
}
