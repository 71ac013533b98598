//! Anchored matching: prefix, suffix, and whole-string equality.

use crate::algo::calculate_score;
use crate::chars::{to_lower_rune, Chars};
use crate::normalize::normalize_rune;
use crate::score::{tables, BONUS_FIRST_CHAR_MULTIPLIER, SCORE_MATCH};
use crate::slab::Slab;
use crate::Match;

/// Matches when the text begins with the pattern.
///
/// Leading whitespace of the text is skipped unless the pattern itself
/// begins with whitespace.
pub fn prefix_match(
    case_sensitive: bool,
    normalize: bool,
    _forward: bool,
    text: &Chars,
    pattern: &[char],
    _with_pos: bool,
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

    let trimmed_len = if !pattern[0].is_whitespace() {
        text.leading_whitespaces()
    } else {
        0
    };

    if text.len() - trimmed_len < pattern.len() {
        return None;
    }

    for (index, &pchar) in pattern.iter().enumerate() {
        let mut ch = text.get(trimmed_len + index);
        if !case_sensitive {
            ch = to_lower_rune(ch);
        }
        if normalize {
            ch = normalize_rune(ch);
        }
        if ch != pchar {
            return None;
        }
    }

    let len_pattern = pattern.len();
    let tables = tables();
    let (score, _) = calculate_score(
        &tables,
        case_sensitive,
        normalize,
        text,
        pattern,
        trimmed_len,
        trimmed_len + len_pattern,
        false,
    );
    Some(Match {
        start: trimmed_len,
        end: trimmed_len + len_pattern,
        score,
        positions: None,
    })
}

/// Matches when the text ends with the pattern.
///
/// Trailing whitespace of the text is skipped unless the pattern itself
/// ends with whitespace.
pub fn suffix_match(
    case_sensitive: bool,
    normalize: bool,
    _forward: bool,
    text: &Chars,
    pattern: &[char],
    _with_pos: bool,
    _slab: Option<&mut Slab>,
) -> Option<Match> {
    let len_runes = text.len();
    let mut trimmed_len = len_runes;
    if pattern.is_empty() || !pattern[pattern.len() - 1].is_whitespace() {
        trimmed_len -= text.trailing_whitespaces();
    }
    if pattern.is_empty() {
        return Some(Match {
            start: trimmed_len,
            end: trimmed_len,
            score: 0,
            positions: None,
        });
    }
    let diff = trimmed_len.checked_sub(pattern.len())?;

    for (index, &pchar) in pattern.iter().enumerate() {
        let mut ch = text.get(index + diff);
        if !case_sensitive {
            ch = to_lower_rune(ch);
        }
        if normalize {
            ch = normalize_rune(ch);
        }
        if ch != pchar {
            return None;
        }
    }

    let len_pattern = pattern.len();
    let sidx = trimmed_len - len_pattern;
    let eidx = trimmed_len;
    let tables = tables();
    let (score, _) = calculate_score(
        &tables,
        case_sensitive,
        normalize,
        text,
        pattern,
        sidx,
        eidx,
        false,
    );
    Some(Match {
        start: sidx,
        end: eidx,
        score,
        positions: None,
    })
}

/// Matches when the whitespace-trimmed text equals the pattern.
///
/// The score is fixed for a given pattern length, pinned above what any
/// other mode can reach on the same pattern.
pub fn equal_match(
    case_sensitive: bool,
    normalize: bool,
    _forward: bool,
    text: &Chars,
    pattern: &[char],
    _with_pos: bool,
    _slab: Option<&mut Slab>,
) -> Option<Match> {
    let len_pattern = pattern.len();
    if len_pattern == 0 {
        return None;
    }

    // Strip leading whitespaces
    let trimmed_len = if !pattern[0].is_whitespace() {
        text.leading_whitespaces()
    } else {
        0
    };

    // Strip trailing whitespaces
    let trimmed_end_len = if !pattern[len_pattern - 1].is_whitespace() {
        text.trailing_whitespaces()
    } else {
        0
    };

    if text.len().checked_sub(trimmed_len + trimmed_end_len) != Some(len_pattern) {
        return None;
    }

    let matched = pattern.iter().enumerate().all(|(idx, &pchar)| {
        let mut ch = text.get(trimmed_len + idx);
        if !case_sensitive {
            ch = to_lower_rune(ch);
        }
        if normalize {
            // The pattern is folded too: an accented pattern may still
            // equal an unaccented text.
            normalize_rune(pchar) == normalize_rune(ch)
        } else {
            pchar == ch
        }
    });
    if !matched {
        return None;
    }

    let tables = tables();
    let score = (i32::from(SCORE_MATCH) + i32::from(tables.bonus_boundary_white))
        * len_pattern as i32
        + i32::from(BONUS_FIRST_CHAR_MULTIPLIER - 1) * i32::from(tables.bonus_boundary_white);
    Some(Match {
        start: trimmed_len,
        end: trimmed_len + len_pattern,
        score,
        positions: None,
    })
}
