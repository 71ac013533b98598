//! Candidate text view consumed by the match functions.

use std::borrow::Cow;
use std::fmt;
use std::fmt::Write as _;

/// An immutable candidate text, viewed either as a raw ASCII byte slice or
/// as a decoded rune sequence.
///
/// The representation is chosen once at construction so the match functions
/// never re-scan the text for UTF-8. The ASCII form is what enables the
/// byte-wise prefilter; everything else goes through the rune form.
#[derive(Debug, Clone)]
pub struct Chars<'a> {
    repr: Repr<'a>,
}

#[derive(Debug, Clone)]
enum Repr<'a> {
    Ascii(&'a str),
    Runes(Cow<'a, [char]>),
}

impl<'a> Chars<'a> {
    /// Builds a view over `text`, picking the byte-backed representation
    /// when the text is all ASCII.
    pub fn new(text: &'a str) -> Self {
        if text.is_ascii() {
            Chars {
                repr: Repr::Ascii(text),
            }
        } else {
            Chars {
                repr: Repr::Runes(Cow::Owned(text.chars().collect())),
            }
        }
    }

    /// Builds a view over an already-decoded rune sequence.
    pub fn from_runes(runes: &'a [char]) -> Self {
        Chars {
            repr: Repr::Runes(Cow::Borrowed(runes)),
        }
    }

    /// Number of characters in the text.
    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Ascii(s) => s.len(),
            Repr::Runes(r) => r.len(),
        }
    }

    /// Returns true when the text is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Character at offset `idx`.
    ///
    /// Offsets past the end are a caller error and panic, as with slice
    /// indexing.
    #[inline]
    pub fn get(&self, idx: usize) -> char {
        match &self.repr {
            Repr::Ascii(s) => s.as_bytes()[idx] as char,
            Repr::Runes(r) => r[idx],
        }
    }

    /// Returns true when the text is backed by raw ASCII bytes.
    pub fn is_bytes(&self) -> bool {
        matches!(self.repr, Repr::Ascii(_))
    }

    /// The raw byte slice, available only for ASCII-backed texts.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.repr {
            Repr::Ascii(s) => Some(s.as_bytes()),
            Repr::Runes(_) => None,
        }
    }

    /// Copies the code points starting at `from` into `dst`, filling as
    /// much of `dst` as the text allows.
    pub fn copy_runes(&self, dst: &mut [i32], from: usize) {
        match &self.repr {
            Repr::Ascii(s) => {
                for (slot, &b) in dst.iter_mut().zip(&s.as_bytes()[from..]) {
                    *slot = i32::from(b);
                }
            }
            Repr::Runes(r) => {
                for (slot, &ch) in dst.iter_mut().zip(&r[from..]) {
                    *slot = ch as i32;
                }
            }
        }
    }

    /// Number of whitespace characters at the start of the text.
    pub fn leading_whitespaces(&self) -> usize {
        (0..self.len())
            .take_while(|&i| self.get(i).is_whitespace())
            .count()
    }

    /// Number of whitespace characters at the end of the text.
    pub fn trailing_whitespaces(&self) -> usize {
        (0..self.len())
            .rev()
            .take_while(|&i| self.get(i).is_whitespace())
            .count()
    }
}

impl<'a> From<&'a str> for Chars<'a> {
    fn from(text: &'a str) -> Self {
        Chars::new(text)
    }
}

impl fmt::Display for Chars<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Ascii(s) => f.write_str(s),
            Repr::Runes(r) => {
                for &ch in r.iter() {
                    f.write_char(ch)?;
                }
                Ok(())
            }
        }
    }
}

/// One-to-one lowercase mapping of a single rune.
///
/// Multi-character lowerings (a handful of Unicode special cases) keep
/// their first unit so the mapping stays length-preserving.
#[inline]
pub(crate) fn to_lower_rune(ch: char) -> char {
    if ch.is_ascii() {
        ch.to_ascii_lowercase()
    } else {
        ch.to_lowercase().next().unwrap_or(ch)
    }
}
