// SPDX-License-Identifier: MIT
//
// n-term — terminal byte layer for n-fmt.
//
// Everything here is stateless: escape sequence encoding, the color value
// type, a frame buffer for single-syscall output, and the two OS queries a
// renderer needs (window size, is-a-tty). Deciding *whether* a sequence
// needs to be sent at all is n-fmt's job; this crate only knows how every
// sequence is spelled, byte for byte.

pub mod ansi;
pub mod color;
pub mod output;
pub mod terminal;
