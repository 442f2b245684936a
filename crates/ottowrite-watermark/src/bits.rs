//! Explicit bit cursor over the watermark identifier.
//!
//! The homoglyph and whitespace encoders both consume the identifier as an
//! MSB-first bitstream. The cursor is passed through explicitly so each encoder
//! can be unit-tested per chunk, and so an exhausted stream simply stops
//! consuming rather than wrapping around.

/// Cursor over a byte slice, yielding bits most-significant first.
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> BitCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Total number of bits in the stream.
    pub fn len_bits(&self) -> usize {
        self.bytes.len() * 8
    }

    /// Bits not yet consumed.
    pub fn remaining(&self) -> usize {
        self.len_bits().saturating_sub(self.pos)
    }

    /// Consume and return the next bit, or `None` once exhausted.
    pub fn next_bit(&mut self) -> Option<bool> {
        if self.pos >= self.len_bits() {
            return None;
        }
        let byte = self.bytes[self.pos / 8];
        let bit = (byte >> (7 - self.pos % 8)) & 1;
        self.pos += 1;
        Some(bit == 1)
    }
}

impl Iterator for BitCursor<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.next_bit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_first_order() {
        let mut cursor = BitCursor::new(&[0b1010_0001]);
        let bits: Vec<bool> = (&mut cursor).collect();
        assert_eq!(
            bits,
            vec![true, false, true, false, false, false, false, true]
        );
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_exhausted_cursor_returns_none() {
        let mut cursor = BitCursor::new(&[0xFF]);
        for _ in 0..8 {
            assert!(cursor.next_bit().is_some());
        }
        assert_eq!(cursor.next_bit(), None);
        assert_eq!(cursor.next_bit(), None);
    }

    #[test]
    fn test_empty_stream() {
        let mut cursor = BitCursor::new(&[]);
        assert_eq!(cursor.len_bits(), 0);
        assert_eq!(cursor.next_bit(), None);
    }

    #[test]
    fn test_remaining_tracks_consumption() {
        let mut cursor = BitCursor::new(&[0x00, 0x00]);
        assert_eq!(cursor.remaining(), 16);
        cursor.next_bit();
        cursor.next_bit();
        cursor.next_bit();
        assert_eq!(cursor.remaining(), 13);
    }
}
