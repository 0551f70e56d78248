use core::net::Ipv4Addr;

use super::macros::{impl_cursor_common, impl_take_primitive, impl_take_primitives};

/// Sequential reader over a positional record image.
///
/// Decoding walks the buffer front to back; every field advances the
/// cursor by its fixed wire width, so the read order must match the
/// write order exactly.
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    /// Creates a reader positioned at the start of `buf`.
    #[inline]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    impl_cursor_common!();
    impl_take_primitives!();

    /// Advances the cursor over `len` bytes without reading them.
    ///
    /// # Panics
    /// Panics if fewer than `len` bytes remain.
    #[inline]
    pub fn skip(&mut self, len: usize) {
        assert!(
            self.pos + len <= self.buf.len(),
            "skip past end: pos {} + len {} > len {}",
            self.pos,
            len,
            self.buf.len()
        );
        self.pos += len;
    }

    /// Takes `len` raw bytes as a slice borrowing from the buffer.
    ///
    /// # Panics
    /// Panics if fewer than `len` bytes remain.
    #[inline]
    pub fn take_slice(&mut self, len: usize) -> &'a [u8] {
        assert!(
            self.pos + len <= self.buf.len(),
            "take past end: pos {} + len {} > len {}",
            self.pos,
            len,
            self.buf.len()
        );
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        slice
    }

    /// Takes a fixed-size byte array.
    ///
    /// # Panics
    /// Panics if fewer than `N` bytes remain.
    #[inline]
    pub fn take_bytes<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take_slice(N));
        out
    }

    /// Takes an IPv4 address stored as four octets in address order.
    ///
    /// # Panics
    /// Panics if fewer than 4 bytes remain.
    #[inline]
    pub fn take_ip4(&mut self) -> Ipv4Addr {
        let octets: [u8; 4] = self.take_bytes();
        Ipv4Addr::from(octets)
    }

    /// Takes a `width`-byte zero-padded string region.
    ///
    /// The string ends at the first NUL byte (or spans the whole region).
    /// A region that is not valid UTF-8 is truncated at the last valid
    /// boundary; the persistence layer never rejects a record over a
    /// payload string.
    ///
    /// # Panics
    /// Panics if fewer than `width` bytes remain.
    pub fn take_str(&mut self, width: usize) -> &'a str {
        let raw = self.take_slice(width);
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        match core::str::from_utf8(&raw[..end]) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&raw[..e.valid_up_to()]).unwrap_or(""),
        }
    }

    /// Takes a boolean stored as one byte; any non-zero value is true.
    ///
    /// # Panics
    /// Panics if the cursor is at the end of the buffer.
    #[inline]
    pub fn take_bool(&mut self) -> bool {
        self.take_u8() != 0
    }
}
