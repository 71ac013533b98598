//! Greedy two-pass fuzzy matching.

use crate::algo::{ascii_fuzzy_index, calculate_score, index_at};
use crate::chars::{to_lower_rune, Chars};
use crate::normalize::normalize_rune;
use crate::score::tables;
use crate::slab::Slab;
use crate::Match;

/// Finds the first fuzzy occurrence of `pattern` within `text` in `O(n)`.
///
/// A forward scan locates the earliest completion of the pattern; a
/// backward scan then slides the start rightward to the latest position
/// that still admits the full pattern. The window is scored with the
/// shared rubric, so results rank on the same scale as
/// [`fuzzy_match_v2`](crate::fuzzy_match_v2) even though the alignment is
/// not guaranteed to be optimal.
///
/// When `forward` is false both passes operate on reversed indices and
/// the resulting window is mapped back.
pub fn fuzzy_match_v1(
    case_sensitive: bool,
    normalize: bool,
    forward: bool,
    text: &Chars,
    pattern: &[char],
    with_pos: bool,
    _slab: Option<&mut Slab>,
) -> Option<Match> {
    if pattern.is_empty() {
        return Some(Match {
            start: 0,
            end: 0,
            score: 0,
            positions: None,
        });
    }
    ascii_fuzzy_index(text, pattern, case_sensitive)?;

    let len_runes = text.len();
    let len_pattern = pattern.len();

    let process = |ch: char| -> char {
        let ch = if case_sensitive { ch } else { to_lower_rune(ch) };
        if normalize {
            normalize_rune(ch)
        } else {
            ch
        }
    };

    // Forward pass: earliest completion.
    let mut pidx = 0usize;
    let mut sidx = None;
    let mut eidx = None;
    for index in 0..len_runes {
        let ch = process(text.get(index_at(index, len_runes, forward)));
        let pchar = pattern[index_at(pidx, len_pattern, forward)];
        if ch == pchar {
            if sidx.is_none() {
                sidx = Some(index);
            }
            pidx += 1;
            if pidx == len_pattern {
                eidx = Some(index + 1);
                break;
            }
        }
    }
    let (mut sidx, eidx) = match (sidx, eidx) {
        (Some(s), Some(e)) => (s, e),
        _ => return None,
    };

    // Backward pass: shrink the window from the left.
    pidx -= 1;
    for index in (sidx..eidx).rev() {
        let tidx = index_at(index, len_runes, forward);
        let ch = process(text.get(tidx));
        let pchar = pattern[index_at(pidx, len_pattern, forward)];
        if ch == pchar {
            if pidx == 0 {
                sidx = index;
                break;
            }
            pidx -= 1;
        }
    }

    let (sidx, eidx) = if forward {
        (sidx, eidx)
    } else {
        (len_runes - eidx, len_runes - sidx)
    };

    let tables = tables();
    let (score, positions) = calculate_score(
        &tables,
        case_sensitive,
        normalize,
        text,
        pattern,
        sidx,
        eidx,
        with_pos,
    );
    Some(Match {
        start: sidx,
        end: eidx,
        score,
        positions,
    })
}
