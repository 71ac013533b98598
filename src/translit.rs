//! Bridge to an external transliteration index.
//!
//! A transliteration index compiles a romanized pattern (e.g. romaji) into
//! a matcher over the candidate text and reports the matched byte range.
//! Building and owning that index — typically a dictionary-backed
//! automaton — is the collaborator's job; this module only defines the
//! seam and the match-mode adapter.

use std::ops::Range;
use std::sync::OnceLock;

use crate::chars::Chars;
use crate::slab::Slab;
use crate::Match;

/// A compiled transliteration dictionary.
///
/// `find` returns the byte range of the first occurrence of the
/// (romanized) pattern within `text`, or `None` when the pattern cannot
/// be read out of the text.
pub trait TransliterationIndex: Send + Sync {
    /// Locates `pattern` within `text`, returning the matched byte range.
    fn find(&self, text: &str, pattern: &str) -> Option<Range<usize>>;
}

static INDEX: OnceLock<Box<dyn TransliterationIndex>> = OnceLock::new();

/// Registers the process-wide transliteration index.
///
/// Only the first registration wins; returns false when an index was
/// already installed.
pub fn set_transliteration_index(index: impl TransliterationIndex + 'static) -> bool {
    let installed = INDEX.set(Box::new(index)).is_ok();
    if installed {
        debug!("transliteration index registered");
    }
    installed
}

/// Matches by delegating to the registered transliteration index.
///
/// The result is a plain byte range scored by its length; no positions
/// are ever produced. Without a registered index nothing matches. Case
/// folding and normalization are the index's business, so the usual
/// flags are ignored here.
pub fn translit_match(
    _case_sensitive: bool,
    _normalize: bool,
    _forward: bool,
    text: &Chars,
    pattern: &[char],
    _with_pos: bool,
    _slab: Option<&mut Slab>,
) -> Option<Match> {
    let index = INDEX.get()?;
    let text: String = text.to_string();
    let pattern: String = pattern.iter().collect();
    let range = index.find(&text, &pattern)?;
    Some(Match {
        start: range.start,
        end: range.end,
        score: (range.end - range.start) as i32,
        positions: None,
    })
}
