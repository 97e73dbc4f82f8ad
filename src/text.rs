//! Character-stream interpreter
//!
//! Display text is not written verbatim: the scanner intercepts `\n` as a
//! jump to the second display line and a backtick escape as a reference to a
//! previously programmed custom glyph slot. The output is a stream of
//! [`TextItem`]s - data bytes for the data register, command bytes for the
//! instruction register - that the facade feeds straight to the bus.

use crate::command::LINE_TWO;
use crate::ram::MAX_CUSTOM_GLYPHS;

/// Maximum accepted text buffer length, in bytes
pub const MAX_TEXT_LEN: usize = 32;

/// Escape marker introducing a custom glyph reference
pub const GLYPH_ESCAPE: u8 = b'`';

/// One emission of the interpreter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextItem {
    /// Byte for the data register (a character cell)
    Data(u8),
    /// Byte for the instruction register
    Command(u8),
}

/// Left-to-right scanner over a text buffer
///
/// Rules, in order:
/// - `\n` becomes [`TextItem::Command`]`(LINE_TWO)`; the controller computes
///   the new bus address itself, nothing else is reset
/// - a space is emitted as data; every other whitespace byte is dropped
/// - backtick followed by a decimal digit below
///   [`MAX_CUSTOM_GLYPHS`] emits the digit's value as data (the CGRAM
///   character code), consuming both source bytes
/// - anything else, including a backtick that trails the buffer or precedes a
///   non-digit or out-of-range digit, is emitted verbatim as data
#[derive(Clone, Debug)]
pub struct TextScanner<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> TextScanner<'a> {
    /// Scan `buf`; length checking is the caller's job
    #[must_use]
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn glyph_reference(&self) -> Option<u8> {
        let next = *self.buf.get(self.pos + 1)?;
        if !next.is_ascii_digit() {
            return None;
        }
        let slot = next - b'0';
        (slot < MAX_CUSTOM_GLYPHS).then_some(slot)
    }
}

impl Iterator for TextScanner<'_> {
    type Item = TextItem;

    fn next(&mut self) -> Option<TextItem> {
        while self.pos < self.buf.len() {
            let byte = self.buf[self.pos];
            self.pos += 1;
            match byte {
                b'\n' => return Some(TextItem::Command(LINE_TWO)),
                b' ' => return Some(TextItem::Data(byte)),
                b'\t' | b'\r' | 0x0B | 0x0C => {} // dropped
                GLYPH_ESCAPE => {
                    // pos already past the marker; peek relative to it
                    self.pos -= 1;
                    if let Some(slot) = self.glyph_reference() {
                        self.pos += 2;
                        return Some(TextItem::Data(slot));
                    }
                    self.pos += 1;
                    return Some(TextItem::Data(byte));
                }
                other => return Some(TextItem::Data(other)),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn scan(input: &[u8]) -> Vec<TextItem> {
        TextScanner::new(input).collect()
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(
            scan(b"Hi!"),
            [
                TextItem::Data(b'H'),
                TextItem::Data(b'i'),
                TextItem::Data(b'!')
            ]
        );
    }

    #[test]
    fn test_newline_and_glyph_escape() {
        // 'A', jump-line command, glyph slot 2 - three emissions from five
        // source bytes.
        assert_eq!(
            scan(b"A\n`2"),
            [
                TextItem::Data(b'A'),
                TextItem::Command(0xC0),
                TextItem::Data(0x02)
            ]
        );
    }

    #[test]
    fn test_out_of_range_glyph_digit_is_verbatim() {
        assert_eq!(
            scan(b"`9"),
            [TextItem::Data(b'`'), TextItem::Data(b'9')]
        );
    }

    #[test]
    fn test_trailing_escape_is_verbatim() {
        assert_eq!(scan(b"a`"), [TextItem::Data(b'a'), TextItem::Data(b'`')]);
    }

    #[test]
    fn test_escape_before_non_digit_is_verbatim() {
        assert_eq!(
            scan(b"`x"),
            [TextItem::Data(b'`'), TextItem::Data(b'x')]
        );
    }

    #[test]
    fn test_spaces_kept_other_whitespace_dropped() {
        assert_eq!(
            scan(b"a\tb c\r"),
            [
                TextItem::Data(b'a'),
                TextItem::Data(b'b'),
                TextItem::Data(b' '),
                TextItem::Data(b'c')
            ]
        );
    }

    #[test]
    fn test_every_slot_digit_resolves() {
        for slot in 0..MAX_CUSTOM_GLYPHS {
            let input = [GLYPH_ESCAPE, b'0' + slot];
            assert_eq!(scan(&input), [TextItem::Data(slot)]);
        }
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert_eq!(scan(b""), []);
    }
}
