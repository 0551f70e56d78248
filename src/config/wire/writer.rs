use core::net::Ipv4Addr;

use super::macros::{impl_cursor_common, impl_put_primitive, impl_put_primitives};

/// Sequential writer producing a positional record image.
///
/// Counterpart to [`WireReader`](super::WireReader): fields are written
/// front to back in declaration order, each advancing the cursor by its
/// fixed wire width.
pub struct WireWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> WireWriter<'a> {
    /// Creates a writer positioned at the start of `buf`.
    #[inline]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    impl_cursor_common!();
    impl_put_primitives!();

    /// Writes `len` zero bytes.
    ///
    /// # Panics
    /// Panics if fewer than `len` bytes remain.
    #[inline]
    pub fn pad(&mut self, len: usize) {
        assert!(
            self.pos + len <= self.buf.len(),
            "pad past end: pos {} + len {} > len {}",
            self.pos,
            len,
            self.buf.len()
        );
        self.buf[self.pos..self.pos + len].fill(0);
        self.pos += len;
    }

    /// Writes a raw byte slice.
    ///
    /// # Panics
    /// Panics if fewer than `data.len()` bytes remain.
    #[inline]
    pub fn put_bytes(&mut self, data: &[u8]) {
        assert!(
            self.pos + data.len() <= self.buf.len(),
            "put past end: pos {} + len {} > len {}",
            self.pos,
            data.len(),
            self.buf.len()
        );
        self.buf[self.pos..self.pos + data.len()].copy_from_slice(data);
        self.pos += data.len();
    }

    /// Writes an IPv4 address as four octets in address order.
    ///
    /// # Panics
    /// Panics if fewer than 4 bytes remain.
    #[inline]
    pub fn put_ip4(&mut self, addr: Ipv4Addr) {
        self.put_bytes(&addr.octets());
    }

    /// Writes a string into a `width`-byte zero-padded region.
    ///
    /// Strings longer than `width` are truncated at a character boundary;
    /// the unused tail of the region is zero-filled.
    ///
    /// # Panics
    /// Panics if fewer than `width` bytes remain.
    pub fn put_str(&mut self, s: &str, width: usize) {
        let mut fit = 0;
        for c in s.chars() {
            let l = c.len_utf8();
            if fit + l > width {
                break;
            }
            fit += l;
        }
        self.put_bytes(&s.as_bytes()[..fit]);
        self.pad(width - fit);
    }

    /// Writes a boolean as one byte (1 or 0).
    ///
    /// # Panics
    /// Panics if the cursor is at the end of the buffer.
    #[inline]
    pub fn put_bool(&mut self, value: bool) {
        self.put_u8(value as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_primitives() {
        let mut buf = [0u8; 8];
        let mut w = WireWriter::new(&mut buf);
        w.put_u8(0x01);
        w.put_i8(-1);
        w.put_u16_le(0x1234);
        w.put_u32_le(0x12345678);
        assert!(w.is_empty());
        assert_eq!(buf, [0x01, 0xFF, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn put_str_pads_with_zeros() {
        let mut buf = [0xAAu8; 4];
        let mut w = WireWriter::new(&mut buf);
        w.put_str("ab", 4);
        assert_eq!(buf, [b'a', b'b', 0, 0]);
    }

    #[test]
    fn put_str_truncates_at_char_boundary() {
        // 'é' needs two bytes and does not fit into the second slot
        let mut buf = [0xAAu8; 2];
        let mut w = WireWriter::new(&mut buf);
        w.put_str("hé", 2);
        assert_eq!(buf, [b'h', 0]);
    }

    #[test]
    fn put_ip4_and_pad() {
        let mut buf = [0xAAu8; 8];
        let mut w = WireWriter::new(&mut buf);
        w.put_ip4(Ipv4Addr::new(10, 0, 0, 1));
        w.pad(4);
        assert_eq!(buf, [10, 0, 0, 1, 0, 0, 0, 0]);
    }

    #[test]
    #[should_panic]
    fn put_past_end_panics() {
        let mut buf = [0u8; 2];
        let mut w = WireWriter::new(&mut buf);
        w.put_u32_le(1);
    }
}
