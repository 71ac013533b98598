//! Character classification, match schemes, and the scoring contract.
//!
//! The scoring constants below are a public contract: downstream tooling
//! inspects score magnitudes, and parity tests reproduce them exactly.
//! The scheme-dependent parts (boundary bonus magnitudes, the delimiter
//! set, the class assumed before position 0) live in a process-wide table
//! installed by [`init`] and consulted read-only by every match call.

use std::str::FromStr;
use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard};

use thiserror::Error;

use crate::chars::Chars;

//------------------------------------------------------------------------------
// Scoring constants

/// Points awarded for each matched character.
pub const SCORE_MATCH: i16 = 16;

/// Penalty for opening a gap between matched characters.
pub const SCORE_GAP_START: i16 = -3;

/// Penalty for each additional character inside a gap.
pub const SCORE_GAP_EXTENSION: i16 = -1;

/// Bonus for a match at the start of a word.
///
/// Sized so that the bonus is cancelled once the gap between acronym
/// letters grows past eight characters, which keeps long acronym matches
/// from always beating short fuzzy ones.
pub const BONUS_BOUNDARY: i16 = SCORE_MATCH / 2;

/// Bonus for matching a non-word character.
///
/// Non-contextual, but required to seed the consecutive-chunk bonus when a
/// chunk starts with a non-word character.
pub const BONUS_NON_WORD: i16 = SCORE_MATCH / 2;

/// Edge-triggered bonus for camelCase and letter-to-digit transitions.
///
/// These transitions come without the one-character gap of a word
/// boundary (`FooBar` vs. `foo-bar`), hence the deduction.
pub const BONUS_CAMEL123: i16 = BONUS_BOUNDARY + SCORE_GAP_EXTENSION;

/// Minimum bonus for characters inside a consecutive chunk.
pub const BONUS_CONSECUTIVE: i16 = -(SCORE_GAP_START + SCORE_GAP_EXTENSION);

/// Multiplier applied to the first pattern character's positional bonus.
///
/// The first character the user types carries the most signal, but the
/// multiplier stays small enough that gap penalties are still respected.
pub const BONUS_FIRST_CHAR_MULTIPLIER: i16 = 2;

//------------------------------------------------------------------------------
// Character classes

/// Coarse character class used to index the bonus matrix.
///
/// The ordering is meaningful: classes up to [`CharClass::Delimiter`] sit
/// outside a word, which is what boundary checks test with `<=`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum CharClass {
    /// Whitespace.
    White,
    /// Anything that is neither a word character, whitespace, nor a
    /// delimiter.
    NonWord,
    /// A scheme-dependent delimiter such as `/` or `:`.
    Delimiter,
    /// Lowercase letter.
    Lower,
    /// Uppercase letter.
    Upper,
    /// Letter without case (non-Latin scripts).
    Letter,
    /// Digit or other numeric character.
    Number,
}

pub(crate) const CLASS_COUNT: usize = 7;

const ALL_CLASSES: [CharClass; CLASS_COUNT] = [
    CharClass::White,
    CharClass::NonWord,
    CharClass::Delimiter,
    CharClass::Lower,
    CharClass::Upper,
    CharClass::Letter,
    CharClass::Number,
];

const WHITE_CHARS: &str = " \t\n\x0b\x0c\r\u{85}\u{a0}";
const DEFAULT_DELIMITERS: &str = "/,:;|";

//------------------------------------------------------------------------------
// Schemes

/// Preset bundle of boundary bonus magnitudes and delimiter characters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scheme {
    /// General text.
    #[default]
    Default,
    /// File paths: the OS path separator is the only delimiter and the
    /// text is assumed to start right after one.
    Path,
    /// Shell history: no extra weight for any boundary type.
    History,
}

/// Error returned when parsing an unknown scheme name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown scheme: {0:?}")]
pub struct ParseSchemeError(String);

impl FromStr for Scheme {
    type Err = ParseSchemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Scheme::Default),
            "path" => Ok(Scheme::Path),
            "history" => Ok(Scheme::History),
            _ => Err(ParseSchemeError(s.to_string())),
        }
    }
}

//------------------------------------------------------------------------------
// Precomputed tables

/// Scheme-derived lookup tables, precomputed once per [`init`] call.
pub(crate) struct Tables {
    pub bonus_boundary_white: i16,
    pub bonus_boundary_delimiter: i16,
    pub initial_class: CharClass,
    delimiters: String,
    pub ascii_classes: [CharClass; 128],
    pub bonus_matrix: [[i16; CLASS_COUNT]; CLASS_COUNT],
}

impl Tables {
    fn for_scheme(scheme: Scheme) -> Self {
        let (bonus_boundary_white, bonus_boundary_delimiter, delimiters, initial_class) =
            match scheme {
                Scheme::Default => (
                    BONUS_BOUNDARY + 2,
                    BONUS_BOUNDARY + 1,
                    DEFAULT_DELIMITERS.to_string(),
                    CharClass::White,
                ),
                Scheme::Path => (
                    BONUS_BOUNDARY,
                    BONUS_BOUNDARY + 1,
                    path_delimiters(),
                    CharClass::Delimiter,
                ),
                Scheme::History => (
                    BONUS_BOUNDARY,
                    BONUS_BOUNDARY,
                    DEFAULT_DELIMITERS.to_string(),
                    CharClass::White,
                ),
            };

        let mut tables = Tables {
            bonus_boundary_white,
            bonus_boundary_delimiter,
            initial_class,
            delimiters,
            ascii_classes: [CharClass::NonWord; 128],
            bonus_matrix: [[0; CLASS_COUNT]; CLASS_COUNT],
        };

        for b in 0u8..=127 {
            let ch = b as char;
            tables.ascii_classes[b as usize] = if ch.is_ascii_lowercase() {
                CharClass::Lower
            } else if ch.is_ascii_uppercase() {
                CharClass::Upper
            } else if ch.is_ascii_digit() {
                CharClass::Number
            } else if WHITE_CHARS.contains(ch) {
                CharClass::White
            } else if tables.delimiters.contains(ch) {
                CharClass::Delimiter
            } else {
                CharClass::NonWord
            };
        }

        let mut matrix = [[0i16; CLASS_COUNT]; CLASS_COUNT];
        for (i, &prev) in ALL_CLASSES.iter().enumerate() {
            for (j, &cur) in ALL_CLASSES.iter().enumerate() {
                matrix[i][j] = tables.bonus_for(prev, cur);
            }
        }
        tables.bonus_matrix = matrix;
        tables
    }

    /// Bonus for matching a character of class `class` right after one of
    /// class `prev`.
    pub fn bonus_for(&self, prev: CharClass, class: CharClass) -> i16 {
        // Note that the word-boundary case below also covers a delimiter
        // following whitespace: everything above NonWord qualifies.
        if class > CharClass::NonWord {
            match prev {
                CharClass::White => return self.bonus_boundary_white,
                CharClass::Delimiter => return self.bonus_boundary_delimiter,
                CharClass::NonWord => return BONUS_BOUNDARY,
                _ => {}
            }
        }

        if prev == CharClass::Lower && class == CharClass::Upper
            || prev != CharClass::Number && class == CharClass::Number
        {
            // camelCase letter123
            return BONUS_CAMEL123;
        }

        match class {
            CharClass::NonWord | CharClass::Delimiter => BONUS_NON_WORD,
            CharClass::White => self.bonus_boundary_white,
            _ => 0,
        }
    }

    /// Positional bonus at offset `idx` of `input`.
    pub fn bonus_at(&self, input: &Chars, idx: usize) -> i16 {
        if idx == 0 {
            return self.bonus_boundary_white;
        }
        self.bonus_matrix[self.char_class_of(input.get(idx - 1)) as usize]
            [self.char_class_of(input.get(idx)) as usize]
    }

    #[inline]
    pub fn char_class_of(&self, ch: char) -> CharClass {
        if (ch as u32) < 128 {
            self.ascii_classes[ch as usize]
        } else {
            self.char_class_of_non_ascii(ch)
        }
    }

    pub fn char_class_of_non_ascii(&self, ch: char) -> CharClass {
        if ch.is_lowercase() {
            CharClass::Lower
        } else if ch.is_uppercase() {
            CharClass::Upper
        } else if ch.is_numeric() {
            CharClass::Number
        } else if ch.is_alphabetic() {
            CharClass::Letter
        } else if ch.is_whitespace() {
            CharClass::White
        } else if self.delimiters.contains(ch) {
            CharClass::Delimiter
        } else {
            CharClass::NonWord
        }
    }
}

fn path_delimiters() -> String {
    if std::path::MAIN_SEPARATOR == '/' {
        "/".to_string()
    } else {
        format!("{}/", std::path::MAIN_SEPARATOR)
    }
}

static TABLES: LazyLock<RwLock<Tables>> =
    LazyLock::new(|| RwLock::new(Tables::for_scheme(Scheme::Default)));

/// Installs the process-wide scheme tables.
///
/// Call once before matching; until then the default scheme is in effect.
/// Replacing the scheme while matchers are running is safe but changes
/// the scores of in-flight calls' successors, so callers should quiesce
/// their workers first.
pub fn init(scheme: Scheme) {
    debug!("initializing scheme tables: {scheme:?}");
    *TABLES.write().unwrap_or_else(PoisonError::into_inner) = Tables::for_scheme(scheme);
}

/// Read access to the active tables for the duration of one match call.
pub(crate) fn tables() -> RwLockReadGuard<'static, Tables> {
    TABLES.read().unwrap_or_else(PoisonError::into_inner)
}
