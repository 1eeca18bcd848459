//! Clipboard copy via OSC 52.
//!
//! The escape sequence asks the terminal emulator to set the system
//! clipboard, which works over SSH where no display server is reachable.
//! Terminals that ignore OSC 52 simply drop the sequence.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::io::{self, Write};

pub fn copy(text: &str) -> io::Result<()> {
    let mut out = io::stdout();
    write_osc52(&mut out, text)?;
    out.flush()
}

fn write_osc52<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    write!(out, "\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_osc52_sequence_shape() {
        let mut buf = Vec::new();
        write_osc52(&mut buf, "hello").unwrap();

        assert_eq!(String::from_utf8(buf).unwrap(), "\x1b]52;c;aGVsbG8=\x07");
    }

    #[test]
    fn test_empty_payload() {
        let mut buf = Vec::new();
        write_osc52(&mut buf, "").unwrap();

        assert_eq!(String::from_utf8(buf).unwrap(), "\x1b]52;c;\x07");
    }
}
