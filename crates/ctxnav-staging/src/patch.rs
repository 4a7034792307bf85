#![forbid(unsafe_code)]

//! Line-level view of a unified diff.
//!
//! Only as much structure as the staging panels need: each line is
//! classified, and hunks are located so a selection can snap to change
//! lines or span a whole hunk.

/// Classification of one diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchLineKind {
    /// File header (`diff --git`, `index`, `---`, `+++`, mode lines).
    Header,
    /// `@@ -a,b +c,d @@` hunk header.
    HunkHeader,
    /// Unchanged context line.
    Context,
    /// Added line.
    Addition,
    /// Removed line.
    Deletion,
    /// `\ No newline at end of file` marker.
    NoNewline,
}

impl PatchLineKind {
    /// Whether the line is an addition or deletion.
    #[inline]
    pub const fn is_change(self) -> bool {
        matches!(self, Self::Addition | Self::Deletion)
    }
}

/// One line of a patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchLine {
    /// Classification.
    pub kind: PatchLineKind,
    /// Raw text, including the leading marker character.
    pub content: String,
}

/// A hunk's line span inside the patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hunk {
    /// Index of the `@@` header line.
    pub header_idx: usize,
    /// One past the last line of the hunk body.
    pub end_idx: usize,
}

impl Hunk {
    /// Whether `idx` falls on the header or inside the body.
    #[inline]
    pub const fn contains(&self, idx: usize) -> bool {
        idx >= self.header_idx && idx < self.end_idx
    }
}

/// A parsed unified diff.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Patch {
    lines: Vec<PatchLine>,
    hunks: Vec<Hunk>,
}

impl Patch {
    /// Parse diff text. Never fails; unrecognized lines count as headers
    /// outside hunks and as context inside them.
    #[must_use]
    pub fn parse(diff: &str) -> Self {
        let mut lines = Vec::new();
        let mut hunks: Vec<Hunk> = Vec::new();
        let mut in_hunk = false;

        for (idx, raw) in diff.lines().enumerate() {
            let kind = if raw.starts_with("@@") {
                if let Some(h) = hunks.last_mut().filter(|_| in_hunk) {
                    h.end_idx = idx;
                }
                hunks.push(Hunk {
                    header_idx: idx,
                    end_idx: idx + 1,
                });
                in_hunk = true;
                PatchLineKind::HunkHeader
            } else if raw.starts_with("diff ") {
                if let Some(h) = hunks.last_mut().filter(|_| in_hunk) {
                    h.end_idx = idx;
                }
                in_hunk = false;
                PatchLineKind::Header
            } else if !in_hunk {
                PatchLineKind::Header
            } else {
                match raw.as_bytes().first() {
                    Some(b'+') => PatchLineKind::Addition,
                    Some(b'-') => PatchLineKind::Deletion,
                    Some(b'\\') => PatchLineKind::NoNewline,
                    _ => PatchLineKind::Context,
                }
            };
            lines.push(PatchLine {
                kind,
                content: raw.to_string(),
            });
        }

        if let Some(h) = hunks.last_mut().filter(|_| in_hunk) {
            h.end_idx = lines.len();
        }

        Self { lines, hunks }
    }

    /// All lines.
    #[must_use]
    pub fn lines(&self) -> &[PatchLine] {
        &self.lines
    }

    /// All hunks in order.
    #[must_use]
    pub fn hunks(&self) -> &[Hunk] {
        &self.hunks
    }

    /// Number of lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Whether the line at `idx` is a change.
    #[must_use]
    pub fn is_change(&self, idx: usize) -> bool {
        self.lines.get(idx).is_some_and(|l| l.kind.is_change())
    }

    /// Index of the first change line.
    #[must_use]
    pub fn first_change_idx(&self) -> Option<usize> {
        self.lines.iter().position(|l| l.kind.is_change())
    }

    /// Nearest change line to `idx`: at or after it first, then before it.
    ///
    /// `idx` past the end is clamped to the last line.
    #[must_use]
    pub fn closest_change_idx(&self, idx: usize) -> Option<usize> {
        let last = self.lines.len().checked_sub(1)?;
        let idx = idx.min(last);
        (idx..=last)
            .find(|&i| self.is_change(i))
            .or_else(|| (0..idx).rev().find(|&i| self.is_change(i)))
    }

    /// The hunk containing `idx`.
    #[must_use]
    pub fn hunk_containing(&self, idx: usize) -> Option<&Hunk> {
        self.hunks.iter().find(|h| h.contains(idx))
    }

    /// The patch as display text, one line per row.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&line.content);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_HUNKS: &str = "\
diff --git a/src/lib.rs b/src/lib.rs
index 3b18e51..a9c8d2f 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,3 +1,3 @@
 fn a() {}
-fn b() {}
+fn b() -> u8 { 0 }
 fn c() {}
@@ -10,2 +10,3 @@
 fn x() {}
+fn y() {}
\\ No newline at end of file";

    #[test]
    fn classifies_lines() {
        let p = Patch::parse(TWO_HUNKS);
        let kinds: Vec<_> = p.lines().iter().map(|l| l.kind).collect();
        use PatchLineKind::*;
        assert_eq!(
            kinds,
            [
                Header, Header, Header, Header, HunkHeader, Context, Deletion, Addition, Context,
                HunkHeader, Context, Addition, NoNewline
            ]
        );
    }

    #[test]
    fn hunk_spans() {
        let p = Patch::parse(TWO_HUNKS);
        assert_eq!(
            p.hunks(),
            [
                Hunk {
                    header_idx: 4,
                    end_idx: 9
                },
                Hunk {
                    header_idx: 9,
                    end_idx: 13
                }
            ]
        );
        assert_eq!(p.hunk_containing(7).unwrap().header_idx, 4);
        assert_eq!(p.hunk_containing(12).unwrap().header_idx, 9);
        assert!(p.hunk_containing(2).is_none());
    }

    #[test]
    fn header_minus_lines_are_not_changes() {
        let p = Patch::parse(TWO_HUNKS);
        assert!(!p.is_change(2));
        assert_eq!(p.first_change_idx(), Some(6));
    }

    #[test]
    fn closest_change_prefers_forward() {
        let p = Patch::parse(TWO_HUNKS);
        assert_eq!(p.closest_change_idx(0), Some(6));
        assert_eq!(p.closest_change_idx(8), Some(11));
        assert_eq!(p.closest_change_idx(12), Some(11));
        assert_eq!(p.closest_change_idx(500), Some(11));
    }

    #[test]
    fn empty_and_context_only() {
        assert_eq!(Patch::parse("").first_change_idx(), None);
        assert_eq!(Patch::parse("").closest_change_idx(0), None);
        let p = Patch::parse("@@ -1 +1 @@\n same");
        assert_eq!(p.first_change_idx(), None);
    }

    #[test]
    fn render_drops_trailing_newline_only() {
        let p = Patch::parse("@@ -1 +1 @@\n-old\n+new\n");
        assert_eq!(p.render(), "@@ -1 +1 @@\n-old\n+new");
    }

    #[test]
    fn second_file_header_closes_hunk() {
        let p = Patch::parse("@@ -1 +1 @@\n+a\ndiff --git a/b b/b\n--- a/b\n@@ -1 +1 @@\n-b");
        assert_eq!(p.hunks()[0].end_idx, 2);
        assert_eq!(p.lines()[3].kind, PatchLineKind::Header);
        assert!(p.is_change(5));
    }
}
