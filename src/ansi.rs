//! Terminal escape sequence stripping
//!
//! Removes CSI (`ESC [ ... final`), OSC (`ESC ] ... BEL` or `ESC ] ... ESC \`) and
//! two-character `ESC x` sequences, leaving plain text.

const ESC: char = '\u{1b}';
const BEL: char = '\u{7}';

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Text,
    Escape,
    Csi,
    Osc,
    OscEscape,
}

/// Remove terminal escape sequences from `input`
pub fn strip_escapes(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut state = State::Text;

    for c in input.chars() {
        state = match state {
            State::Text => {
                if c == ESC {
                    State::Escape
                } else {
                    output.push(c);
                    State::Text
                }
            }
            State::Escape => match c {
                '[' => State::Csi,
                ']' => State::Osc,
                _ => State::Text,
            },
            // Parameter and intermediate bytes until a final byte in @..~
            State::Csi => {
                if ('\u{40}'..='\u{7e}').contains(&c) {
                    State::Text
                } else {
                    State::Csi
                }
            }
            State::Osc => match c {
                BEL => State::Text,
                ESC => State::OscEscape,
                _ => State::Osc,
            },
            State::OscEscape => {
                if c == '\\' {
                    State::Text
                } else {
                    State::Osc
                }
            }
        };
    }

    output
}
