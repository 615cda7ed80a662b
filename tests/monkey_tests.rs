//! Monkey tests - generated markup and unusual key sequences
//!
//! These tests feed the editor inputs nobody would type on purpose and check
//! that the passes which must be stable stay stable.

mod common;

use common::*;
use notefield::editable::markup::normalize;
use notefield::format::apply_underline_formatting;
use notefield::keymap::KeyCode;

/// Pieces that stress the markup parser: tag and entity delimiters, quotes,
/// label characters and a few complete constructs
const PIECES: &[&str] = &[
    "#", ":", "<", ">", "\"", "'", "=", "&", "/", " ", ";", "a", "1", "u", "x", "<u>", "</u>",
    "<b>", "</b>", "&amp;", "&lt;", "<!--", "-->", "#Plan:",
];

/// Deterministic xorshift, so a failing input is reproducible
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next() % n as u64) as usize
    }
}

fn generated_inputs(count: usize, max_pieces: usize) -> Vec<String> {
    let mut rng = XorShift(0x9E37_79B9_7F4A_7C15);
    (0..count)
        .map(|_| {
            let len = rng.below(max_pieces + 1);
            (0..len).map(|_| PIECES[rng.below(PIECES.len())]).collect()
        })
        .collect()
}

// ========================================================================
// Markup Stability
// ========================================================================

#[test]
fn test_underline_pass_is_idempotent_on_generated_markup() {
    for input in generated_inputs(20_000, 10) {
        let once = apply_underline_formatting(&input);
        assert_eq!(
            apply_underline_formatting(&once),
            once,
            "input: {:?}",
            input
        );
    }
}

#[test]
fn test_normalize_is_stable_on_generated_markup() {
    for input in generated_inputs(20_000, 10) {
        let once = normalize(&input);
        assert_eq!(normalize(&once), once, "input: {:?}", input);
    }
}

#[test]
fn test_quoted_attribute_names_do_not_change_on_reformat() {
    for input in ["<1\"=a\">", "<b \"x\"=1>t</b>", "<i a'=b>#S:</i>"] {
        let once = apply_underline_formatting(input);
        assert_eq!(apply_underline_formatting(&once), once, "input: {:?}", input);
    }
}

// ========================================================================
// Key Sequences
// ========================================================================

#[test]
fn test_rapid_overlay_toggling() {
    let mut host = Host::new("");
    for i in 0..100 {
        match i % 4 {
            0 => host.type_text("ch"),
            1 => {
                host.key(KeyCode::Down);
            }
            2 => {
                host.key(KeyCode::Escape);
            }
            _ => {
                host.key(KeyCode::Backspace);
                host.key(KeyCode::Backspace);
            }
        }
    }
    assert_eq!(host.value(), "");
    assert!(!host.overlay_visible());
}
