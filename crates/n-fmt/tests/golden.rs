// SPDX-License-Identifier: MIT
//
// Byte-exact output through the public API.

use n_fmt::{
    Category, Emission, FormatError, Manipulator, Session, StateValue, Tracked, bg, bg_default,
    bg_rgb, bold, clear, fg, fg_default, fg_rgb, hide, italic, pos, rpos, underline,
};
use pretty_assertions::assert_eq;

fn run(session: &Session, steps: &[Manipulator]) -> String {
    let mut out = Tracked::new(Vec::new());
    for m in steps {
        m.apply_in(session, &mut out).unwrap();
    }
    String::from_utf8(out.into_inner()).unwrap()
}

#[test]
fn every_sequence_is_spelled_exactly() {
    let cases = [
        (fg(5).unwrap(), "\x1b[38;5;5m"),
        (fg(-1).unwrap(), "\x1b[39m"),
        (fg_default(), "\x1b[39m"),
        (fg_rgb(255, 0, 128), "\x1b[38;2;255;0;128m"),
        (bg(255).unwrap(), "\x1b[48;5;255m"),
        (bg(-1).unwrap(), "\x1b[49m"),
        (bg_default(), "\x1b[49m"),
        (bg_rgb(0, 0, 0), "\x1b[48;2;0;0;0m"),
        (bold(true), "\x1b[1m"),
        (bold(false), "\x1b[22m"),
        (italic(true), "\x1b[3m"),
        (italic(false), "\x1b[23m"),
        (underline(true), "\x1b[4m"),
        (underline(false), "\x1b[24m"),
        (pos(3, 7).unwrap(), "\x1b[3;7H"),
        (rpos(-2, 4), "\x1b[2A\x1b[4C"),
        (hide(true), "\x1b[?25l"),
        (hide(false), "\x1b[?25h"),
        (clear(), "\x1b[0m"),
    ];
    for (m, expected) in cases {
        assert_eq!(run(&Session::default(), &[m]), expected, "{m:?}");
    }
}

#[test]
fn repeated_bold_is_written_once() {
    let s = Session::default();
    assert_eq!(run(&s, &[bold(true), bold(true)]), "\x1b[1m");
}

#[test]
fn bold_toggle_writes_both() {
    let s = Session::default();
    assert_eq!(run(&s, &[bold(true), bold(false)]), "\x1b[1m\x1b[22m");
}

#[test]
fn foreground_repeat_then_change() {
    let s = Session::default();
    let steps = [fg(5).unwrap(), fg(5).unwrap(), fg(6).unwrap()];
    assert_eq!(run(&s, &steps), "\x1b[38;5;5m\x1b[38;5;6m");
}

#[test]
fn color_check_ignores_unrelated_position() {
    let s = Session::default();
    let mut out = Tracked::new(Vec::new());

    let p = pos(1, 1).unwrap();
    assert_eq!(p.apply_in(&s, &mut out).unwrap(), Emission::Written);
    assert_eq!(fg(5).unwrap().apply_in(&s, &mut out).unwrap(), Emission::Written);
    assert_eq!(p.apply_in(&s, &mut out).unwrap(), Emission::Skipped);
    assert_eq!(fg(5).unwrap().apply_in(&s, &mut out).unwrap(), Emission::Skipped);
    assert_eq!(out.get_ref().as_slice(), b"\x1b[1;1H\x1b[38;5;5m");
}

#[test]
fn moving_the_cursor_forgets_colors() {
    let s = Session::default();
    let steps = [
        fg(5).unwrap(),
        bg_rgb(1, 2, 3),
        pos(2, 1).unwrap(),
        fg(5).unwrap(),
        bg_rgb(1, 2, 3),
    ];
    assert_eq!(
        run(&s, &steps),
        "\x1b[38;5;5m\x1b[48;2;1;2;3m\x1b[2;1H\x1b[38;5;5m\x1b[48;2;1;2;3m"
    );
}

#[test]
fn indexed_then_rgb_is_never_skipped() {
    let s = Session::default();
    let steps = [fg(7).unwrap(), fg_rgb(0, 0, 0), fg(7).unwrap(), fg_rgb(0, 0, 0)];
    assert_eq!(
        run(&s, &steps),
        "\x1b[38;5;7m\x1b[38;2;0;0;0m\x1b[38;5;7m\x1b[38;2;0;0;0m"
    );
}

#[test]
fn clear_makes_everything_miss() {
    let s = Session::default();
    let steps = [
        bold(true),
        underline(true),
        bg(4).unwrap(),
        clear(),
        bold(true),
        underline(true),
        bg(4).unwrap(),
    ];
    assert_eq!(
        run(&s, &steps),
        "\x1b[1m\x1b[4m\x1b[48;5;4m\x1b[0m\x1b[1m\x1b[4m\x1b[48;5;4m"
    );
}

#[test]
fn default_and_indexed_share_a_slot() {
    let s = Session::default();
    let steps = [bg(3).unwrap(), bg_default(), bg_default(), bg(3).unwrap()];
    assert_eq!(run(&s, &steps), "\x1b[48;5;3m\x1b[49m\x1b[48;5;3m");
}

#[test]
fn eviction_follows_recency() {
    let s = Session::with_capacity(2).unwrap();
    let mut out = Tracked::new(Vec::new());
    let id = out.id();

    bold(true).apply_in(&s, &mut out).unwrap();
    italic(true).apply_in(&s, &mut out).unwrap();
    // Touch bold so italic becomes the oldest.
    assert_eq!(bold(true).apply_in(&s, &mut out).unwrap(), Emission::Skipped);
    underline(true).apply_in(&s, &mut out).unwrap();

    assert_eq!(s.len(), 2);
    assert_eq!(s.cached(id, Category::BoldAttribute), Some(StateValue::Flag(true)));
    assert_eq!(s.cached(id, Category::ItalicAttribute), None);
}

#[test]
fn invalid_values_fail_at_construction() {
    assert!(matches!(
        fg(256),
        Err(FormatError::ColorIndexOutOfRange { index: 256 })
    ));
    assert!(matches!(
        bg(-2),
        Err(FormatError::ColorIndexOutOfRange { index: -2 })
    ));
    assert!(matches!(
        pos(0, 5),
        Err(FormatError::PositionOutOfRange { row: 0, col: 5 })
    ));
}

#[test]
fn tracked_streams_are_independent() {
    let s = Session::default();
    let mut a = Tracked::new(Vec::new());
    let mut b = Tracked::new(Vec::new());
    for out in [&mut a, &mut b] {
        bold(true).apply_in(&s, &mut *out).unwrap();
        bold(true).apply_in(&s, &mut *out).unwrap();
    }
    assert_eq!(a.get_ref().as_slice(), b"\x1b[1m");
    assert_eq!(b.get_ref().as_slice(), b"\x1b[1m");
}

#[test]
fn raw_writes_can_be_declared() {
    let s = Session::default();
    let mut out = Tracked::new(Vec::new());
    hide(true).apply_in(&s, &mut out).unwrap();
    // Something else showed the cursor behind the formatter's back.
    s.invalidate(out.id(), Category::CursorVisibility);
    assert_eq!(hide(true).apply_in(&s, &mut out).unwrap(), Emission::Written);
}
