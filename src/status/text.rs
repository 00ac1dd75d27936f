// src/status/text.rs

//! Status text composition.
//!
//! Surfaces have a hard ceiling on text length, so the text is truncated here
//! with an ellipsis marker instead of relying on the surface to cut it.

use std::time::Duration;

pub const ELLIPSIS: &str = "...";

/// Middle line of the status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusDetail<'a> {
    /// Windowed mode: visible windows of the primary, if the last census
    /// succeeded.
    Windows(Option<usize>),
    /// Exit-watching mode: the file names being relayed.
    Targets {
        primary: &'a str,
        followup: Option<&'a str>,
    },
}

/// `HH:MM:SS`; hours keep growing past 99 rather than wrapping.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Cut `text` to at most `limit` characters, ending in [`ELLIPSIS`] when
/// anything was removed.
pub fn truncate_with_ellipsis(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let keep = limit.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

pub fn compose_status_text(
    title: &str,
    detail: StatusDetail<'_>,
    elapsed: Duration,
    limit: usize,
) -> String {
    let detail = match detail {
        StatusDetail::Windows(Some(count)) => format!("windows: {count}"),
        StatusDetail::Windows(None) => "windows: ?".to_string(),
        StatusDetail::Targets {
            primary,
            followup: Some(followup),
        } => format!("{primary} -> {followup}"),
        StatusDetail::Targets {
            primary,
            followup: None,
        } => primary.to_string(),
    };

    let text = format!("{title}\n{detail}\n{}", format_elapsed(elapsed));
    truncate_with_ellipsis(&text, limit)
}
