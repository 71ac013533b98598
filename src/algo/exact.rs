//! Contiguous substring matching, plain and boundary-anchored.

use crate::algo::{ascii_fuzzy_index, calculate_score, index_at};
use crate::chars::{to_lower_rune, Chars};
use crate::normalize::normalize_rune;
use crate::score::{tables, CharClass, BONUS_BOUNDARY, SCORE_MATCH};
use crate::slab::Slab;
use crate::Match;

/// Searches for a contiguous occurrence of `pattern` in `text`.
///
/// Rather than stopping at the first occurrence, the scan keeps going
/// until it finds the alignment whose first character carries the highest
/// positional bonus, with an early exit once a word-boundary alignment
/// turns up. There is only one possible alignment per start offset, which
/// keeps this cheap.
pub fn exact_match_naive(
    case_sensitive: bool,
    normalize: bool,
    forward: bool,
    text: &Chars,
    pattern: &[char],
    with_pos: bool,
    slab: Option<&mut Slab>,
) -> Option<Match> {
    exact_match(
        case_sensitive,
        normalize,
        forward,
        false,
        text,
        pattern,
        with_pos,
        slab,
    )
}

/// Like [`exact_match_naive`], but an alignment only counts when both of
/// its endpoints sit on word boundaries.
///
/// Underscore boundaries rank below the other boundary types, and the
/// score carries a fixed base so boundary matches stay comparable with
/// the other match modes.
pub fn exact_match_boundary(
    case_sensitive: bool,
    normalize: bool,
    forward: bool,
    text: &Chars,
    pattern: &[char],
    with_pos: bool,
    slab: Option<&mut Slab>,
) -> Option<Match> {
    exact_match(
        case_sensitive,
        normalize,
        forward,
        true,
        text,
        pattern,
        with_pos,
        slab,
    )
}

#[allow(clippy::too_many_arguments)]
fn exact_match(
    case_sensitive: bool,
    normalize: bool,
    forward: bool,
    boundary_check: bool,
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

    let len_runes = text.len();
    let len_pattern = pattern.len();
    if len_runes < len_pattern {
        return None;
    }

    ascii_fuzzy_index(text, pattern, case_sensitive)?;

    let tables = tables();

    // Only the bonus at the first character position differentiates the
    // alignments.
    let mut pidx = 0usize;
    let mut best_pos: Option<usize> = None;
    let mut bonus: i16 = 0;
    let mut bbonus: i16 = 0;
    let mut best_bonus: i16 = -1;
    let mut index = 0usize;
    while index < len_runes {
        let index_ = index_at(index, len_runes, forward);
        let mut ch = text.get(index_);
        if !case_sensitive {
            ch = to_lower_rune(ch);
        }
        if normalize {
            ch = normalize_rune(ch);
        }
        let pidx_ = index_at(pidx, len_pattern, forward);
        let pchar = pattern[pidx_];
        let mut ok = pchar == ch;
        if ok {
            if pidx_ == 0 {
                bonus = tables.bonus_at(text, index_);
            }
            if boundary_check {
                // The boundary bonus is read at the alignment's left edge
                // when scanning forward and at its right edge otherwise.
                if forward && pidx_ == 0 {
                    bbonus = bonus;
                } else if !forward && pidx_ == len_pattern - 1 {
                    bbonus = if index_ < len_runes - 1 {
                        tables.bonus_at(text, index_ + 1)
                    } else {
                        tables.bonus_boundary_white
                    };
                }
                ok = bbonus >= BONUS_BOUNDARY;
                if ok && pidx_ == 0 {
                    ok = index_ == 0
                        || tables.char_class_of(text.get(index_ - 1)) <= CharClass::Delimiter;
                }
                if ok && pidx_ == len_pattern - 1 {
                    ok = index_ == len_runes - 1
                        || tables.char_class_of(text.get(index_ + 1)) <= CharClass::Delimiter;
                }
            }
        }
        if ok {
            pidx += 1;
            if pidx == len_pattern {
                if bonus > best_bonus {
                    best_pos = Some(index);
                    best_bonus = bonus;
                }
                if bonus >= BONUS_BOUNDARY {
                    break;
                }
                // Restart right after the first character of this
                // alignment.
                index -= pidx - 1;
                pidx = 0;
                bonus = 0;
            }
        } else {
            index -= pidx;
            pidx = 0;
            bonus = 0;
        }
        index += 1;
    }

    let best_pos = best_pos?;
    let (sidx, eidx) = if forward {
        (best_pos + 1 - len_pattern, best_pos + 1)
    } else {
        (len_runes - (best_pos + 1), len_runes - (best_pos + 1 - len_pattern))
    };
    let score = if boundary_check {
        // Underscore boundaries should be ranked lower than the other
        // types of boundaries.
        let mut score = i32::from(bonus);
        let mut deduct = i32::from(bonus - BONUS_BOUNDARY) + 1;
        if sidx > 0 && text.get(sidx - 1) == '_' {
            score -= deduct + 1;
            deduct = 1;
        }
        if eidx < len_runes && text.get(eidx) == '_' {
            score -= deduct;
        }
        // Base score so that this can compete with the other match modes.
        score
            + i32::from(SCORE_MATCH) * len_pattern as i32
            + i32::from(tables.bonus_boundary_white) * (len_pattern as i32 + 1)
    } else {
        calculate_score(
            &tables,
            case_sensitive,
            normalize,
            text,
            pattern,
            sidx,
            eidx,
            false,
        )
        .0
    };
    Some(Match {
        start: sidx,
        end: eidx,
        score,
        positions: None,
    })
}
