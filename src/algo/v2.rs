//! Optimal fuzzy matching: a modified Smith-Waterman alignment.

use crate::algo::{ascii_fuzzy_index, debug_enabled, fuzzy_match_v1};
use crate::chars::{to_lower_rune, Chars};
use crate::normalize::normalize_rune;
use crate::score::{
    tables, CharClass, BONUS_BOUNDARY, BONUS_CONSECUTIVE, BONUS_FIRST_CHAR_MULTIPLIER,
    SCORE_GAP_EXTENSION, SCORE_GAP_START, SCORE_MATCH,
};
use crate::slab::{Slab, SlabAlloc};
use crate::Match;

/// Finds the highest-scoring in-order alignment of `pattern` within
/// `text`.
///
/// Matches must cover the whole pattern; omission or mismatch of a
/// pattern character is not allowed. Gaps between matched characters
/// incur gap penalties, matches earn [`SCORE_MATCH`] plus positional
/// bonuses (doubled for the first pattern character). Ties are broken
/// toward the earlier end position when `forward` is true and the later
/// one otherwise.
///
/// When `pattern.len() * text.len()` exceeds the slab's 16-bit pool the
/// call transparently degrades to [`fuzzy_match_v1`], keeping memory
/// bounded at the cost of optimality.
///
/// The returned `start` is exact only when positions are requested; see
/// [`Match::start`].
pub fn fuzzy_match_v2(
    case_sensitive: bool,
    normalize: bool,
    forward: bool,
    text: &Chars,
    pattern: &[char],
    with_pos: bool,
    slab: Option<&mut Slab>,
) -> Option<Match> {
    let m = pattern.len();
    if m == 0 {
        return Some(Match {
            start: 0,
            end: 0,
            score: 0,
            positions: with_pos.then(Vec::new),
        });
    }
    let n = text.len();
    if m > n {
        return None;
    }

    // The O(nm) matrix can be prohibitively expensive for a long text;
    // degrade to the greedy algorithm rather than allocating past the
    // arena.
    let exceeds_slab = slab.as_deref().is_some_and(|s| n * m > s.cap16());
    if exceeds_slab {
        trace!("matrix {n}x{m} exceeds slab capacity, falling back to v1");
        return fuzzy_match_v1(case_sensitive, normalize, forward, text, pattern, with_pos, slab);
    }

    // Phase 1. Optimized search for ASCII strings.
    let (min_idx, max_idx) = ascii_fuzzy_index(text, pattern, case_sensitive)?;
    let n = max_idx - min_idx;

    let tables = tables();
    let mut arena = SlabAlloc::new(slab);

    // Score and consecutive-run length per position for the first pattern
    // character, plus the bonus at every position.
    let mut h0 = arena.alloc16(n);
    let mut c0 = arena.alloc16(n);
    let mut b = arena.alloc16(n);
    // First occurrence of each pattern character.
    let mut f = arena.alloc32(m);
    // The text window, rewritten in place by case folding and
    // normalization below.
    let mut t = arena.alloc32(n);
    text.copy_runes(&mut t, min_idx);

    // Phase 2. Calculate the bonus for each position and fill in the row
    // for the first pattern character.
    let mut max_score: i16 = 0;
    let mut max_score_pos = 0usize;
    let mut pidx = 0usize;
    let mut last_idx = 0usize;
    let pchar0 = pattern[0] as i32;
    let mut pchar = pchar0;
    let mut prev_h0: i16 = 0;
    let mut prev_class = tables.initial_class;
    let mut in_gap = false;

    for off in 0..n {
        let mut ch = t[off];
        let class;
        if (ch as u32) < 128 {
            class = tables.ascii_classes[ch as usize];
            if !case_sensitive && class == CharClass::Upper {
                ch += 32;
                t[off] = ch;
            }
        } else {
            // The window only ever holds code points copied from the
            // input, so the conversion is total in practice.
            let mut rune = char::from_u32(ch as u32).unwrap_or(char::REPLACEMENT_CHARACTER);
            class = tables.char_class_of_non_ascii(rune);
            if !case_sensitive && class == CharClass::Upper {
                rune = to_lower_rune(rune);
            }
            if normalize {
                rune = normalize_rune(rune);
            }
            ch = rune as i32;
            t[off] = ch;
        }

        let bonus = tables.bonus_matrix[prev_class as usize][class as usize];
        b[off] = bonus;
        prev_class = class;

        if ch == pchar {
            if pidx < m {
                f[pidx] = off as i32;
                pidx += 1;
                pchar = pattern[pidx.min(m - 1)] as i32;
            }
            last_idx = off;
        }

        if ch == pchar0 {
            let score = SCORE_MATCH + bonus * BONUS_FIRST_CHAR_MULTIPLIER;
            h0[off] = score;
            c0[off] = 1;
            if m == 1 && (forward && score > max_score || !forward && score >= max_score) {
                max_score = score;
                max_score_pos = off;
                if forward && bonus >= BONUS_BOUNDARY {
                    // Nothing beats a boundary hit for a single-character
                    // pattern.
                    break;
                }
            }
            in_gap = false;
        } else {
            h0[off] = if in_gap {
                (prev_h0 + SCORE_GAP_EXTENSION).max(0)
            } else {
                (prev_h0 + SCORE_GAP_START).max(0)
            };
            c0[off] = 0;
            in_gap = true;
        }
        prev_h0 = h0[off];
    }
    if pidx != m {
        return None;
    }
    if m == 1 {
        return Some(Match {
            start: min_idx + max_score_pos,
            end: min_idx + max_score_pos + 1,
            score: i32::from(max_score),
            positions: with_pos.then(|| vec![min_idx + max_score_pos]),
        });
    }

    // Phase 3. Fill in the score matrix. Unlike the original algorithm,
    // omission is not allowed, so row i only starts at the first possible
    // position of pattern character i.
    let f0 = f[0] as usize;
    let width = last_idx - f0 + 1;
    let mut h = arena.alloc16(width * m);
    h[..width].copy_from_slice(&h0[f0..=last_idx]);

    // Length of the consecutive chunk ending at each position.
    let mut c = arena.alloc16(width * m);
    c[..width].copy_from_slice(&c0[f0..=last_idx]);

    for i in 1..m {
        let fi = f[i] as usize;
        let pchar = pattern[i] as i32;
        let row = i * width;
        let mut in_gap = false;
        // Leftmost cell of the row, seeded so the gap path has a base.
        h[row + fi - f0 - 1] = 0;
        for col in fi..=last_idx {
            let off = col - f0;
            let mut s1: i16 = 0;
            let mut consecutive: i16 = 0;

            let s2 = if in_gap {
                h[row + off - 1] + SCORE_GAP_EXTENSION
            } else {
                h[row + off - 1] + SCORE_GAP_START
            };

            if pchar == t[col] {
                s1 = h[row - width + off - 1] + SCORE_MATCH;
                let mut bonus = b[col];
                consecutive = c[row - width + off - 1] + 1;
                if consecutive > 1 {
                    let fb = b[col + 1 - consecutive as usize];
                    if bonus >= BONUS_BOUNDARY && bonus > fb {
                        // Break the consecutive chunk: the new boundary
                        // outweighs what the chunk started with.
                        consecutive = 1;
                    } else {
                        bonus = bonus.max(BONUS_CONSECUTIVE.max(fb));
                    }
                }
                if s1 + bonus < s2 {
                    s1 += b[col];
                    consecutive = 0;
                } else {
                    s1 += bonus;
                }
            }
            c[row + off] = consecutive;

            in_gap = s1 < s2;
            let score = s1.max(s2).max(0);
            if i == m - 1 && (forward && score > max_score || !forward && score >= max_score) {
                max_score = score;
                max_score_pos = col;
            }
            h[row + off] = score;
        }
    }

    if debug_enabled() {
        debug_v2(&t, pattern, &f, last_idx, &h, &c);
    }

    // Phase 4. (Optional) Backtrace to find the matched positions.
    let mut positions = with_pos.then(|| Vec::with_capacity(m));
    let mut j = f0;
    if let Some(pos) = positions.as_mut() {
        let mut i = m - 1;
        j = max_score_pos;
        let mut prefer_match = true;
        loop {
            let row = i * width;
            let j0 = j - f0;
            let s = h[row + j0];

            let mut s1: i16 = 0;
            let mut s2: i16 = 0;
            if i > 0 && j >= f[i] as usize {
                s1 = h[row - width + j0 - 1];
            }
            if j > f[i] as usize {
                s2 = h[row + j0 - 1];
            }

            if s > s1 && (s > s2 || s == s2 && prefer_match) {
                pos.push(j + min_idx);
                if i == 0 {
                    break;
                }
                i -= 1;
            }
            // Stay on the diagonal when inside a consecutive chunk, or
            // when the chunk continues just below-right.
            prefer_match = c[row + j0] > 1
                || row + width + j0 + 1 < c.len() && c[row + width + j0 + 1] > 0;
            j -= 1;
        }
        pos.reverse();
    }

    // The start offset here is an upper bound unless the backtrace ran;
    // finding the exact offset without position tracking would cost an
    // extra pass.
    Some(Match {
        start: min_idx + j,
        end: min_idx + max_score_pos + 1,
        score: i32::from(max_score),
        positions,
    })
}

/// Dumps the score (`H`) and consecutive-run (`C`) matrices, aligned under
/// the text window with one row pair per pattern character.
fn debug_v2(t: &[i32], pattern: &[char], f: &[i32], last_idx: usize, h: &[i16], c: &[i16]) {
    let f0 = f[0] as usize;
    let width = last_idx - f0 + 1;

    for (i, &fi) in f.iter().enumerate() {
        let fi = fi as usize;
        let row = i * width;
        if i == 0 {
            print!("  ");
            for j in fi..=last_idx {
                print!(" {} ", char::from_u32(t[j] as u32).unwrap_or(' '));
            }
            println!();
        }
        print!("{} ", pattern[i]);
        for _ in f0..fi {
            print!(" 0 ");
        }
        for j in fi..=last_idx {
            print!("{:2} ", h[row + j - f0]);
        }
        println!();

        print!("  ");
        for (idx, &run) in c[row..row + width].iter().enumerate() {
            let run = if idx + f0 < fi { 0 } else { run };
            if run > 0 {
                print!("{run:2} ");
            } else {
                print!("   ");
            }
        }
        println!();
    }
}
