/// Returns a printable form of `s`. Backslashes and ASCII control characters
/// are escaped. Everything else is kept as is.
pub fn escape(s: &str) -> String {
    let mut escaped = String::new();
    for ch in s.chars() {
        escape_char(ch, &mut escaped);
    }
    escaped
}

/// Interprets the escapes `\\`, `\n`, `\r`, `\t` and `\xHH` in `s`. The
/// last one produces the codepoint `U+00HH`. Any other backslash is kept
/// verbatim.
pub fn unescape(s: &str) -> String {
    #[derive(Clone, Copy, Eq, PartialEq)]
    enum State {
        /// The state after seeing a `\`.
        Escape,
        /// The state after seeing a `\x`.
        HexFirst,
        /// The state after seeing a `\x[0-9A-Fa-f]`.
        HexSecond(char),
        /// Default state.
        Literal,
    }

    let mut out = String::new();
    let mut state = State::Literal;
    for c in s.chars() {
        state = match state {
            State::Escape => match c {
                '\\' => {
                    out.push('\\');
                    State::Literal
                }
                'n' => {
                    out.push('\n');
                    State::Literal
                }
                'r' => {
                    out.push('\r');
                    State::Literal
                }
                't' => {
                    out.push('\t');
                    State::Literal
                }
                'x' => State::HexFirst,
                c => {
                    out.push('\\');
                    out.push(c);
                    State::Literal
                }
            },
            State::HexFirst if c.is_ascii_hexdigit() => State::HexSecond(c),
            State::HexFirst => {
                out.push_str("\\x");
                out.push(c);
                State::Literal
            }
            State::HexSecond(first) if c.is_ascii_hexdigit() => {
                let hi = first.to_digit(16).unwrap_or(0);
                let lo = c.to_digit(16).unwrap_or(0);
                out.push(char::from((hi * 16 + lo) as u8));
                State::Literal
            }
            State::HexSecond(first) => {
                out.push_str("\\x");
                out.push(first);
                out.push(c);
                State::Literal
            }
            State::Literal if c == '\\' => State::Escape,
            State::Literal => {
                out.push(c);
                State::Literal
            }
        };
    }
    match state {
        State::Escape => out.push('\\'),
        State::HexFirst => out.push_str("\\x"),
        State::HexSecond(c) => {
            out.push_str("\\x");
            out.push(c);
        }
        State::Literal => {}
    }
    out
}

/// Adds the given codepoint to the given string, escaping it if necessary.
fn escape_char(cp: char, into: &mut String) {
    match cp {
        '\n' => into.push_str(r"\n"),
        '\r' => into.push_str(r"\r"),
        '\t' => into.push_str(r"\t"),
        '\\' => into.push_str(r"\\"),
        cp if cp.is_ascii_control() => {
            into.push_str(&format!(r"\x{:02X}", cp as u32))
        }
        cp => into.push(cp),
    }
}
