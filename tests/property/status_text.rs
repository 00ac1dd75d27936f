use std::time::Duration;

use apprelay::config::validate::{MAX_STATUS_TEXT_LIMIT, MIN_STATUS_TEXT_LIMIT};
use apprelay::status::text::{compose_status_text, truncate_with_ellipsis, StatusDetail, ELLIPSIS};
use proptest::prelude::*;

proptest! {
    #[test]
    fn truncated_text_never_exceeds_limit(
        text in ".{0,300}",
        limit in MIN_STATUS_TEXT_LIMIT..=MAX_STATUS_TEXT_LIMIT,
    ) {
        let out = truncate_with_ellipsis(&text, limit);
        prop_assert!(out.chars().count() <= limit);
        if text.chars().count() <= limit {
            prop_assert_eq!(out, text);
        } else {
            prop_assert!(out.ends_with(ELLIPSIS));
        }
    }

    #[test]
    fn composed_text_never_exceeds_limit(
        title in "[^\n]{0,120}",
        primary in "[^\n]{1,80}",
        secs in 0u64..1_000_000,
        limit in MIN_STATUS_TEXT_LIMIT..=MAX_STATUS_TEXT_LIMIT,
    ) {
        let text = compose_status_text(
            &title,
            StatusDetail::Targets { primary: &primary, followup: None },
            Duration::from_secs(secs),
            limit,
        );
        prop_assert!(text.chars().count() <= limit);
    }
}
