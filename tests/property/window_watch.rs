use apprelay::engine::WindowWatch;
use proptest::prelude::*;

proptest! {
    // Completion fires exactly at the first zero after the first non-zero
    // count, and never before any window was seen.
    #[test]
    fn fires_only_after_appearance(counts in proptest::collection::vec(0usize..4, 0..40)) {
        let mut watch = WindowWatch::default();
        let first_seen = counts.iter().position(|&c| c > 0);
        let expected = first_seen.and_then(|seen| {
            counts[seen..].iter().position(|&c| c == 0).map(|off| seen + off)
        });

        let mut fired = None;
        for (i, &count) in counts.iter().enumerate() {
            if watch.observe(count) {
                fired = Some(i);
                break;
            }
        }

        prop_assert_eq!(fired, expected);
    }
}
