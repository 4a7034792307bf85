//! Property-based tests for patch state selection.
//!
//! 1. A state exists iff the diff has at least one change line.
//! 2. The selected line is always a change line, whatever line was asked for.
//! 3. An explicit line that already is a change line is kept as-is.
//! 4. Rebuilding from the same diff with no explicit line keeps the selection.
//! 5. In hunk mode the selected range lies inside the selected line's hunk.

use ctxnav_staging::{Patch, PatchLineKind, PatchState, SelectMode};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

/// A diff assembled from a few hunks of context, additions, and deletions.
fn diff_strategy() -> impl Strategy<Value = String> {
    let body_line = prop_oneof![
        Just(" ctx".to_string()),
        Just("+add".to_string()),
        Just("-del".to_string()),
    ];
    let hunk = prop::collection::vec(body_line, 0..8);
    prop::collection::vec(hunk, 0..4).prop_map(|hunks| {
        let mut lines = vec![
            "diff --git a/f b/f".to_string(),
            "--- a/f".to_string(),
            "+++ b/f".to_string(),
        ];
        for (i, body) in hunks.into_iter().enumerate() {
            lines.push(format!("@@ -{0},3 +{0},3 @@", i * 10 + 1));
            lines.extend(body);
        }
        lines.join("\n")
    })
}

fn has_change(diff: &str) -> bool {
    Patch::parse(diff)
        .lines()
        .iter()
        .any(|l| matches!(l.kind, PatchLineKind::Addition | PatchLineKind::Deletion))
}

proptest! {
    #[test]
    fn state_exists_iff_changes(diff in diff_strategy(), hunk_mode in any::<bool>()) {
        let state = PatchState::new(&diff, None, None, hunk_mode);
        prop_assert_eq!(state.is_some(), has_change(&diff));
    }

    #[test]
    fn selection_is_always_a_change(
        diff in diff_strategy(),
        requested in proptest::option::of(0usize..64),
    ) {
        if let Some(state) = PatchState::new(&diff, requested, None, false) {
            prop_assert!(state.patch().is_change(state.selected_line_idx()));
        }
    }

    #[test]
    fn explicit_change_line_is_kept(diff in diff_strategy(), pick in any::<prop::sample::Index>()) {
        let patch = Patch::parse(&diff);
        let changes: Vec<usize> = (0..patch.line_count()).filter(|&i| patch.is_change(i)).collect();
        prop_assume!(!changes.is_empty());
        let line = changes[pick.index(changes.len())];

        let state = PatchState::new(&diff, Some(line), None, false).unwrap();
        prop_assert_eq!(state.selected_line_idx(), line);
    }

    #[test]
    fn rebuild_keeps_selection(diff in diff_strategy(), requested in 0usize..64) {
        if let Some(first) = PatchState::new(&diff, Some(requested), None, false) {
            let again = PatchState::new(&diff, None, Some(&first), false).unwrap();
            prop_assert_eq!(again.selected_line_idx(), first.selected_line_idx());
        }
    }

    #[test]
    fn hunk_range_stays_in_hunk(diff in diff_strategy(), requested in 0usize..64) {
        if let Some(state) = PatchState::new(&diff, Some(requested), None, true) {
            prop_assert_eq!(state.select_mode(), SelectMode::Hunk);
            let (start, end) = state.selected_range();
            let hunk = *state.patch().hunk_containing(state.selected_line_idx()).unwrap();
            prop_assert!(start > hunk.header_idx);
            prop_assert!(end < hunk.end_idx);
            prop_assert!(start <= state.selected_line_idx() && state.selected_line_idx() <= end);
        }
    }
}
