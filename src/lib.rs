//! Sift is the fuzzy scoring and matching core of an interactive filter.
//!
//! Given a query pattern and a candidate text it decides whether the text
//! matches and, if so, returns the position range, an integer score, and
//! optionally the exact character offsets that were selected. The crate
//! deliberately stops there: reading the candidate corpus, parsing the user
//! query into terms, ranking the matching candidates, and drawing a UI are
//! all left to the caller.
//!
//! Two fuzzy algorithms are provided. [`fuzzy_match_v1`] is a greedy
//! two-pass scan that finds *a* match in `O(n)`; [`fuzzy_match_v2`] is a
//! modified Smith-Waterman dynamic program that finds the *highest-scoring*
//! match in `O(n*m)`. Exact, boundary, prefix, suffix, and equal variants
//! share the same scoring rubric so their results can be ranked together.
//!
//! # Examples
//!
//! ```
//! use sift::{fuzzy_match_v2, Chars, Slab};
//!
//! let text = Chars::new("src/main.rs");
//! let pattern: Vec<char> = "smain".chars().collect();
//! let mut slab = Slab::default();
//!
//! let m = fuzzy_match_v2(false, false, true, &text, &pattern, true, Some(&mut slab)).unwrap();
//! assert_eq!((m.start, m.end), (0, 8));
//! assert_eq!(m.positions.as_deref(), Some(&[0, 4, 5, 6, 7][..]));
//! ```

#![warn(missing_docs)]

#[macro_use]
extern crate log;

pub mod algo;
pub mod chars;
pub mod normalize;
pub mod score;
pub mod slab;
pub mod translit;

pub use crate::algo::{
    equal_match, exact_match_boundary, exact_match_naive, fuzzy_match_v1, fuzzy_match_v2,
    prefix_match, set_debug, suffix_match,
};
pub use crate::chars::Chars;
pub use crate::normalize::normalize_rune;
pub use crate::score::{init, CharClass, ParseSchemeError, Scheme};
pub use crate::slab::Slab;
pub use crate::translit::{set_transliteration_index, translit_match, TransliterationIndex};

//------------------------------------------------------------------------------
// Match result

/// A successful match of a pattern within a text.
///
/// `start` and `end` delimit the matched range as a half-open interval of
/// character offsets. `positions`, present only when the caller asked for
/// it, holds the offset of every matched pattern character in ascending
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// First character offset of the matched range.
    ///
    /// For [`fuzzy_match_v2`] without position tracking this is an upper
    /// bound on the true start; only the `positions` list pins it down
    /// exactly.
    pub start: usize,
    /// One past the last character offset of the matched range.
    pub end: usize,
    /// Match quality. Higher is better; comparable across all match modes.
    pub score: i32,
    /// Offsets of the matched pattern characters, strictly increasing.
    pub positions: Option<Vec<usize>>,
}

/// Common signature shared by every match function.
///
/// Arguments are `(case_sensitive, normalize, forward, text, pattern,
/// with_pos, slab)`. Two contracts bind the caller: `pattern` must already
/// be lowercased when `case_sensitive` is false, and already normalized
/// when `normalize` is true. The match functions rely on both without
/// rechecking.
pub type MatchFn =
    fn(bool, bool, bool, &Chars, &[char], bool, Option<&mut Slab>) -> Option<Match>;

//------------------------------------------------------------------------------
// Match mode dispatch

/// The available match modes, dispatched by a caller-chosen tag.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Optimal fuzzy matching (Smith-Waterman variant, default).
    #[default]
    FuzzyV2,
    /// Greedy two-pass fuzzy matching.
    FuzzyV1,
    /// Contiguous substring search.
    Exact,
    /// Contiguous substring search anchored to word boundaries.
    ExactBoundary,
    /// Text must begin with the pattern.
    Prefix,
    /// Text must end with the pattern.
    Suffix,
    /// Text must equal the pattern.
    Equal,
    /// Delegate to the registered transliteration index.
    Translit,
}

impl MatchMode {
    /// Returns the match function implementing this mode.
    pub fn as_fn(self) -> MatchFn {
        match self {
            MatchMode::FuzzyV2 => fuzzy_match_v2,
            MatchMode::FuzzyV1 => fuzzy_match_v1,
            MatchMode::Exact => exact_match_naive,
            MatchMode::ExactBoundary => exact_match_boundary,
            MatchMode::Prefix => prefix_match,
            MatchMode::Suffix => suffix_match,
            MatchMode::Equal => equal_match,
            MatchMode::Translit => translit_match,
        }
    }
}
