//! The match functions.
//!
//! [`fuzzy_match_v1`] finds the first fuzzy occurrence of the pattern in
//! `O(n)`: a forward scan locates the earliest completion, then a backward
//! scan shrinks the window from the left.
//!
//! ```text
//!     a_____b___abc__  to find "abc"
//!     *-----*-----*>   1. forward scan
//!              <***    2. backward scan
//! ```
//!
//! Being greedy, it only ever sees the first occurrence and may miss a
//! higher-scoring one further right. [`fuzzy_match_v2`] fixes that with a
//! modified Smith-Waterman dynamic program that examines every occurrence
//! and returns the optimal alignment. Unlike the textbook algorithm,
//! omission or mismatch of a pattern character is not allowed. The cost is
//! `O(n*m)` on a match and `O(n)` otherwise, which is why v2 transparently
//! falls back to v1 when the matrix would not fit the caller's scratch
//! arena.
//!
//! ## Scoring
//!
//! Both algorithms, and the exact/prefix/suffix variants, agree on one
//! rubric:
//!
//! - Matches at special positions (start of a word, an uppercase letter in
//!   a camelCase word, a digit after a letter) earn a positional bonus on
//!   top of the per-character match score. The first pattern character's
//!   bonus is doubled, since it carries the most signal.
//! - Gaps between matched characters are penalized: a larger cost to open
//!   a gap, a smaller one to extend it. The parameters are balanced so
//!   that a boundary bonus is cancelled once a gap grows past eight
//!   characters.
//! - Characters inside a consecutive chunk inherit the strongest boundary
//!   bonus seen at the chunk start, and never less than
//!   [`BONUS_CONSECUTIVE`](crate::score::BONUS_CONSECUTIVE), so contiguous
//!   matches are not ranked below scattered ones.

mod affix;
mod exact;
mod v1;
mod v2;

pub use affix::{equal_match, prefix_match, suffix_match};
pub use exact::{exact_match_boundary, exact_match_naive};
pub use v1::fuzzy_match_v1;
pub use v2::fuzzy_match_v2;

use std::sync::atomic::{AtomicBool, Ordering};

use memchr::{memchr, memrchr2};

use crate::chars::{to_lower_rune, Chars};
use crate::normalize::normalize_rune;
use crate::score::{
    Tables, BONUS_BOUNDARY, BONUS_CONSECUTIVE, BONUS_FIRST_CHAR_MULTIPLIER, SCORE_GAP_EXTENSION,
    SCORE_GAP_START, SCORE_MATCH,
};

static DEBUG: AtomicBool = AtomicBool::new(false);

/// Makes [`fuzzy_match_v2`] dump its score and consecutive-run matrices to
/// stdout on every call. Process-wide; intended for interactive debugging.
pub fn set_debug(enabled: bool) {
    DEBUG.store(enabled, Ordering::Relaxed);
}

pub(crate) fn debug_enabled() -> bool {
    DEBUG.load(Ordering::Relaxed)
}

/// Maps a logical scan index onto a concrete offset, reversing the
/// direction when `forward` is false.
#[inline]
pub(crate) fn index_at(index: usize, max: usize, forward: bool) -> usize {
    if forward {
        index
    } else {
        max - index - 1
    }
}

//------------------------------------------------------------------------------
// ASCII prefilter

/// Finds the next occurrence of pattern byte `b` at or after `from`.
///
/// When case-insensitive and `b` is a lowercase letter, the uppercase form
/// is also accepted; within the window up to the lowercase hit, whichever
/// occurs first wins. Normalization never applies here since the text is
/// known to be pure ASCII.
fn try_skip(bytes: &[u8], case_sensitive: bool, b: u8, from: usize) -> Option<usize> {
    let tail = &bytes[from..];
    let mut idx = memchr(b, tail);
    if idx == Some(0) {
        // Can't skip any further.
        return Some(from);
    }
    if !case_sensitive && b.is_ascii_lowercase() {
        let limit = idx.unwrap_or(tail.len());
        if let Some(uidx) = memchr(b - 32, &tail[..limit]) {
            idx = Some(uidx);
        }
    }
    idx.map(|i| from + i)
}

/// One byte-wise pass proving whether `pattern` can possibly occur in
/// `input` as a subsequence, and if so, narrowing the search window.
///
/// Returns `None` when a match is impossible. On success the window starts
/// one position before the first hit (so the bonus calculation can see the
/// preceding character) and extends to one past the last occurrence of the
/// final pattern byte, letting the alignment consider trailing candidates.
/// Rune-backed texts cannot be filtered and yield the full range.
pub(crate) fn ascii_fuzzy_index(
    input: &Chars,
    pattern: &[char],
    case_sensitive: bool,
) -> Option<(usize, usize)> {
    let Some(bytes) = input.bytes() else {
        // Can't determine.
        return Some((0, input.len()));
    };

    // Not possible.
    if !pattern.iter().all(char::is_ascii) {
        return None;
    }

    let mut first_idx = 0;
    let mut idx = 0;
    let mut last_idx = 0;
    let mut b = 0u8;
    for (pidx, &pchar) in pattern.iter().enumerate() {
        b = pchar as u8;
        idx = try_skip(bytes, case_sensitive, b, idx)?;
        if pidx == 0 && idx > 0 {
            // Step back to find the right bonus point.
            first_idx = idx - 1;
        }
        last_idx = idx;
        idx += 1;
    }

    // Find the last appearance of the last pattern byte to extend the
    // search scope.
    let bu = if !case_sensitive && b.is_ascii_lowercase() {
        b - 32
    } else {
        b
    };
    let scope = &bytes[last_idx..];
    if scope.len() > 1 {
        if let Some(offset) = memrchr2(b, bu, &scope[1..]) {
            return Some((first_idx, last_idx + offset + 2));
        }
    }
    Some((first_idx, last_idx + 1))
}

//------------------------------------------------------------------------------
// Shared scoring

/// Scores the alignment of `pattern` against `text[sidx..eidx]`, walking
/// both in order.
///
/// This is the single rubric shared by v1, the exact variants, and the
/// prefix/suffix variants, so that every mode ranks on the same scale. The
/// consecutive-chunk rule mirrors the v2 matrix fill: a chunk keeps its
/// strongest boundary bonus and never drops below `BONUS_CONSECUTIVE`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn calculate_score(
    tables: &Tables,
    case_sensitive: bool,
    normalize: bool,
    text: &Chars,
    pattern: &[char],
    sidx: usize,
    eidx: usize,
    with_pos: bool,
) -> (i32, Option<Vec<usize>>) {
    let mut pidx = 0usize;
    let mut score = 0i32;
    let mut in_gap = false;
    let mut consecutive = 0usize;
    let mut first_bonus = 0i16;
    let mut pos = with_pos.then(|| Vec::with_capacity(pattern.len()));

    let mut prev_class = tables.initial_class;
    if sidx > 0 {
        prev_class = tables.char_class_of(text.get(sidx - 1));
    }
    for idx in sidx..eidx {
        let mut ch = text.get(idx);
        let class = tables.char_class_of(ch);
        if !case_sensitive {
            ch = to_lower_rune(ch);
        }
        // Pattern is already normalized.
        if normalize {
            ch = normalize_rune(ch);
        }
        if ch == pattern[pidx] {
            if let Some(pos) = pos.as_mut() {
                pos.push(idx);
            }
            score += i32::from(SCORE_MATCH);
            let mut bonus = tables.bonus_matrix[prev_class as usize][class as usize];
            if consecutive == 0 {
                first_bonus = bonus;
            } else {
                // Break consecutive chunk
                if bonus >= BONUS_BOUNDARY && bonus > first_bonus {
                    first_bonus = bonus;
                }
                bonus = bonus.max(first_bonus).max(BONUS_CONSECUTIVE);
            }
            if pidx == 0 {
                score += i32::from(bonus * BONUS_FIRST_CHAR_MULTIPLIER);
            } else {
                score += i32::from(bonus);
            }
            in_gap = false;
            consecutive += 1;
            pidx += 1;
            if pidx == pattern.len() {
                break;
            }
        } else {
            score += i32::from(if in_gap {
                SCORE_GAP_EXTENSION
            } else {
                SCORE_GAP_START
            });
            in_gap = true;
            consecutive = 0;
            first_bonus = 0;
        }
        prev_class = class;
    }
    (score, pos)
}
