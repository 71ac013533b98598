//! End-to-end scoring expectations under the default scheme, shared by
//! both fuzzy algorithms and the simpler variants.

use sift::score::{
    BONUS_BOUNDARY, BONUS_CAMEL123, BONUS_CONSECUTIVE, BONUS_FIRST_CHAR_MULTIPLIER,
    SCORE_GAP_EXTENSION, SCORE_GAP_START, SCORE_MATCH,
};
use sift::{
    equal_match, exact_match_naive, fuzzy_match_v1, fuzzy_match_v2, prefix_match, suffix_match,
    Chars, Match, MatchFn, Slab,
};

// Default-scheme boundary magnitudes.
const BONUS_BOUNDARY_WHITE: i32 = BONUS_BOUNDARY as i32 + 2;
const BONUS_BOUNDARY_DELIMITER: i32 = BONUS_BOUNDARY as i32 + 1;

const S_MATCH: i32 = SCORE_MATCH as i32;
const GAP_START: i32 = SCORE_GAP_START as i32;
const GAP_EXT: i32 = SCORE_GAP_EXTENSION as i32;
const CAMEL: i32 = BONUS_CAMEL123 as i32;
const CONSECUTIVE: i32 = BONUS_CONSECUTIVE as i32;
const FIRST_MULT: i32 = BONUS_FIRST_CHAR_MULTIPLIER as i32;

fn run(
    f: MatchFn,
    case_sensitive: bool,
    normalize: bool,
    forward: bool,
    text: &str,
    pattern: &str,
) -> Option<Match> {
    let chars = Chars::new(text);
    let pattern: Vec<char> = if case_sensitive {
        pattern.chars().collect()
    } else {
        pattern.to_lowercase().chars().collect()
    };
    let mut slab = Slab::default();
    let result = f(
        case_sensitive,
        normalize,
        forward,
        &chars,
        &pattern,
        true,
        Some(&mut slab),
    );

    if let Some(m) = &result {
        if let Some(positions) = &m.positions {
            assert_eq!(positions.len(), pattern.len(), "one position per pattern char");
            assert!(
                positions.windows(2).all(|w| w[0] < w[1]),
                "positions must be strictly increasing: {positions:?}"
            );
            assert!(
                positions.iter().all(|&p| m.start <= p && p < m.end),
                "positions {positions:?} must lie within [{}, {})",
                m.start,
                m.end
            );
        }
    }
    result
}

fn assert_match(
    f: MatchFn,
    case_sensitive: bool,
    forward: bool,
    text: &str,
    pattern: &str,
    start: usize,
    end: usize,
    score: i32,
) {
    let m = run(f, case_sensitive, false, forward, text, pattern)
        .unwrap_or_else(|| panic!("expected {pattern:?} to match {text:?}"));
    assert_eq!(
        (m.start, m.end, m.score),
        (start, end, score),
        "wrong result for {pattern:?} in {text:?}"
    );
}

fn assert_no_match(f: MatchFn, case_sensitive: bool, forward: bool, text: &str, pattern: &str) {
    assert!(
        run(f, case_sensitive, false, forward, text, pattern).is_none(),
        "expected {pattern:?} not to match {text:?}"
    );
}

//------------------------------------------------------------------------------
// Fuzzy matching, both algorithms

#[test]
fn fuzzy_match() {
    for f in [fuzzy_match_v1 as MatchFn, fuzzy_match_v2 as MatchFn] {
        for forward in [true, false] {
            assert_match(
                f,
                false,
                forward,
                "fooBarbaz1",
                "oBZ",
                2,
                9,
                S_MATCH * 3 + CAMEL + GAP_START + GAP_EXT * 3,
            );
            assert_match(
                f,
                false,
                forward,
                "foo bar baz",
                "fbb",
                0,
                9,
                S_MATCH * 3
                    + BONUS_BOUNDARY_WHITE * FIRST_MULT
                    + BONUS_BOUNDARY_WHITE * 2
                    + 2 * GAP_START
                    + 4 * GAP_EXT,
            );
            assert_match(
                f,
                false,
                forward,
                "/AutomatorDocument.icns",
                "rdoc",
                9,
                13,
                S_MATCH * 4 + CAMEL + CONSECUTIVE * 2,
            );
            assert_match(
                f,
                false,
                forward,
                "/man1/zshcompctl.1",
                "zshc",
                6,
                10,
                S_MATCH * 4
                    + BONUS_BOUNDARY_DELIMITER * FIRST_MULT
                    + BONUS_BOUNDARY_DELIMITER * 3,
            );
            assert_match(
                f,
                false,
                forward,
                "/.oh-my-zsh/cache",
                "zshc",
                8,
                13,
                S_MATCH * 4
                    + BONUS_BOUNDARY as i32 * FIRST_MULT
                    + BONUS_BOUNDARY as i32 * 2
                    + BONUS_BOUNDARY_DELIMITER
                    + GAP_START,
            );
            assert_no_match(f, false, forward, "fooBarbaz", "fooBarbazz");
            assert_no_match(f, false, forward, "fooBarbaz", "oBz!");
        }
    }
}

#[test]
fn fuzzy_match_case_sensitive() {
    for f in [fuzzy_match_v1 as MatchFn, fuzzy_match_v2 as MatchFn] {
        assert_match(
            f,
            true,
            true,
            "fooBarbaz",
            "oBz",
            2,
            9,
            S_MATCH * 3 + CAMEL + GAP_START + GAP_EXT * 3,
        );
        assert_match(
            f,
            true,
            true,
            "Foo/Bar/Baz",
            "FBB",
            0,
            9,
            S_MATCH * 3
                + BONUS_BOUNDARY_WHITE * FIRST_MULT
                + BONUS_BOUNDARY_DELIMITER * 2
                + GAP_START * 2
                + GAP_EXT * 4,
        );
        assert_no_match(f, true, true, "fooBarbaz", "obz");
        assert_no_match(f, true, true, "fooBarbaz", "fooBarbazz");
    }
}

#[test]
fn v2_is_never_worse_than_v1() {
    let cases = [
        ("a_____b___abc__", "abc"),
        ("fooBarbaz1", "obz"),
        ("/usr/share/doc/at/ChangeLog", "changelog"),
        ("fuzzy-finder", "ff"),
        ("foobar fb", "fb"),
    ];
    for (text, pattern) in cases {
        let v1 = run(fuzzy_match_v1, false, false, true, text, pattern)
            .unwrap_or_else(|| panic!("v1 should match {pattern:?} in {text:?}"));
        let v2 = run(fuzzy_match_v2, false, false, true, text, pattern)
            .unwrap_or_else(|| panic!("v2 should match {pattern:?} in {text:?}"));
        assert!(
            v2.score >= v1.score,
            "v2={} must be at least v1={} on ({text:?}, {pattern:?})",
            v2.score,
            v1.score
        );
    }
}

#[test]
fn v2_finds_the_optimal_occurrence() {
    // The greedy algorithm settles for the first completion; v2 must take
    // the boundary-anchored one further right.
    let v1 = run(fuzzy_match_v1, false, false, true, "foobar fb", "fb").unwrap();
    assert_eq!((v1.start, v1.end), (0, 4));
    let v2 = run(fuzzy_match_v2, false, false, true, "foobar fb", "fb").unwrap();
    assert_eq!((v2.start, v2.end), (7, 9));
    assert_eq!(
        v2.score,
        S_MATCH * 2 + BONUS_BOUNDARY_WHITE * FIRST_MULT + BONUS_BOUNDARY_WHITE
    );
}

#[test]
fn forward_flag_only_breaks_ties() {
    let cases = [
        ("ab ab", "ab"),
        ("fooBarbaz1", "obz"),
        ("axbycz", "abc"),
        ("hello", "xyz"),
    ];
    for (text, pattern) in cases {
        let fwd = run(fuzzy_match_v2, false, false, true, text, pattern);
        let bwd = run(fuzzy_match_v2, false, false, false, text, pattern);
        assert_eq!(
            fwd.is_some(),
            bwd.is_some(),
            "forward must not change matching on ({text:?}, {pattern:?})"
        );
        if let (Some(fwd), Some(bwd)) = (fwd, bwd) {
            assert_eq!(fwd.score, bwd.score);
        }
    }
}

#[test]
fn matching_is_idempotent() {
    for f in [fuzzy_match_v1 as MatchFn, fuzzy_match_v2 as MatchFn] {
        let first = run(f, false, false, true, "/AutomatorDocument.icns", "rdoc");
        let second = run(f, false, false, true, "/AutomatorDocument.icns", "rdoc");
        assert_eq!(first, second);
    }
}

#[test]
fn long_text_degrades_without_failing() {
    // 20000 * 5 cells exceed the default 16-bit pool, forcing the greedy
    // fallback; the match must still be found.
    let text = format!("{}hello", "x".repeat(20_000));
    let m = run(fuzzy_match_v2, false, false, true, &text, "hello").unwrap();
    assert_eq!((m.start, m.end), (20_000, 20_005));
    assert!(m.score > 0);
}

//------------------------------------------------------------------------------
// Normalization

#[test]
fn normalizing_match() {
    for f in [fuzzy_match_v1 as MatchFn, fuzzy_match_v2 as MatchFn] {
        let m = run(f, false, true, true, "Só Danço Samba", "so").unwrap();
        assert_eq!((m.start, m.end), (0, 2));
        assert_eq!(
            m.score,
            S_MATCH * 2 + BONUS_BOUNDARY_WHITE * FIRST_MULT + BONUS_BOUNDARY_WHITE
        );
        assert_eq!(m.positions.as_deref(), Some(&[0, 1][..]));
    }

    let m = run(prefix_match, false, true, true, "Días felices", "dias").unwrap();
    assert_eq!((m.start, m.end), (0, 4));

    let m = run(equal_match, false, true, true, "Danço", "danco").unwrap();
    assert_eq!((m.start, m.end), (0, 5));
}

#[test]
fn no_normalization_without_the_flag() {
    assert!(run(fuzzy_match_v2, false, false, true, "Danço", "danco").is_none());
    assert!(run(fuzzy_match_v2, false, true, true, "Danço", "danco").is_some());
}

//------------------------------------------------------------------------------
// Exact / prefix / suffix / equal

#[test]
fn exact_match_scores_with_the_shared_rubric() {
    assert_match(
        exact_match_naive,
        false,
        true,
        "fooBarbaz",
        "oBA",
        2,
        5,
        S_MATCH * 3 + CAMEL + CONSECUTIVE,
    );
    assert_match(
        exact_match_naive,
        false,
        true,
        "foobar foob",
        "oo",
        1,
        3,
        S_MATCH * 2 + CONSECUTIVE,
    );
    assert_match(
        exact_match_naive,
        false,
        false,
        "foobar foob",
        "oo",
        8,
        10,
        S_MATCH * 2 + CONSECUTIVE,
    );
    assert_no_match(exact_match_naive, false, true, "fooBarbaz", "oBz");
}

#[test]
fn prefix_and_suffix_expectations() {
    assert_match(
        prefix_match,
        false,
        true,
        " fooBar",
        "foo",
        1,
        4,
        S_MATCH * 3 + BONUS_BOUNDARY_WHITE * FIRST_MULT + BONUS_BOUNDARY_WHITE * 2,
    );
    assert_no_match(prefix_match, false, true, "fooBar", "oo");
    assert_match(
        suffix_match,
        false,
        true,
        "fooBarbaz",
        "baz",
        6,
        9,
        S_MATCH * 3 + CONSECUTIVE * 2,
    );
    assert_no_match(suffix_match, false, true, "fooBarbaz", "bar");
}

#[test]
fn equal_match_expectations() {
    let fixed = (S_MATCH + BONUS_BOUNDARY_WHITE) * 9 + (FIRST_MULT - 1) * BONUS_BOUNDARY_WHITE;
    assert_match(equal_match, false, true, "fooBarbaz", "fooBarbaz", 0, 9, fixed);
    assert_match(equal_match, false, true, " fooBarbaz ", "fooBarbaz", 1, 10, fixed);
    assert_no_match(equal_match, false, true, "fooBarbaz", "fooBar");
    assert_no_match(equal_match, false, true, "fooBarbaz", "fooBarbazz");
}

//------------------------------------------------------------------------------
// Empty patterns

#[test]
fn empty_pattern_contract() {
    for f in [
        fuzzy_match_v1 as MatchFn,
        fuzzy_match_v2 as MatchFn,
        exact_match_naive as MatchFn,
        prefix_match as MatchFn,
    ] {
        let m = run(f, false, false, true, "foobar", "").unwrap();
        assert_eq!((m.start, m.end, m.score), (0, 0, 0));
    }
    let m = run(suffix_match, false, false, true, "foobar  ", "").unwrap();
    assert_eq!((m.start, m.end, m.score), (6, 6, 0));
    assert!(run(equal_match, false, false, true, "foobar", "").is_none());
}

//------------------------------------------------------------------------------
// Position lists

#[test]
fn positions_identify_the_matched_characters() {
    let m = run(fuzzy_match_v2, false, false, true, "fooBarbaz", "oBz").unwrap();
    assert_eq!(m.positions.as_deref(), Some(&[2, 3, 8][..]));

    let m = run(fuzzy_match_v1, false, false, true, "axbycz", "abc").unwrap();
    assert_eq!(m.positions.as_deref(), Some(&[0, 2, 4][..]));

    let text = "fooBarbaz";
    let m = run(fuzzy_match_v2, false, false, true, text, "oBz").unwrap();
    let chars: Vec<char> = text.to_lowercase().chars().collect();
    for (&p, pc) in m.positions.as_deref().unwrap().iter().zip("obz".chars()) {
        assert_eq!(chars[p], pc, "text character at a position must equal the pattern");
    }
}

//------------------------------------------------------------------------------
// Concurrent use

#[test]
fn workers_share_nothing_but_the_tables() {
    use rayon::prelude::*;

    let haystacks: Vec<String> = (0..256)
        .map(|i| format!("src/module_{i}/some_file_{}.rs", i % 7))
        .collect();
    let pattern: Vec<char> = "sfile".chars().collect();

    let expected: Vec<Option<i32>> = haystacks
        .iter()
        .map(|h| {
            fuzzy_match_v2(false, false, true, &Chars::new(h), &pattern, false, None)
                .map(|m| m.score)
        })
        .collect();

    // One slab per worker; results must be identical to the serial run.
    let scores: Vec<Option<i32>> = haystacks
        .par_iter()
        .map_init(Slab::default, |slab, h| {
            fuzzy_match_v2(false, false, true, &Chars::new(h), &pattern, true, Some(slab))
                .map(|m| m.score)
        })
        .collect();

    assert_eq!(scores, expected);
}
