/// Generates a take method for a single primitive type.
macro_rules! impl_take_primitive {
    // Single byte types - no endianness suffix
    (u8) => {
        /// Takes a `u8` at the cursor and advances it.
        ///
        /// # Panics
        /// Panics if the cursor is at the end of the buffer.
        #[inline]
        pub fn take_u8(&mut self) -> u8 {
            assert!(
                self.pos < self.buf.len(),
                "take past end: pos {} >= len {}",
                self.pos,
                self.buf.len()
            );
            let value = self.buf[self.pos];
            self.pos += 1;
            value
        }
    };
    (i8) => {
        /// Takes an `i8` at the cursor and advances it.
        ///
        /// # Panics
        /// Panics if the cursor is at the end of the buffer.
        #[inline]
        pub fn take_i8(&mut self) -> i8 {
            self.take_u8() as i8
        }
    };
    // Multi-byte types - record layout is little-endian throughout
    ($type:ty, $size:literal) => {
        paste::paste! {
            #[doc = "Takes a little-endian `" $type "` at the cursor and advances it."]
            #[doc = ""]
            #[doc = "# Panics"]
            #[doc = "Panics if fewer than " $size " bytes remain."]
            #[inline]
            pub fn [<take_ $type _le>](&mut self) -> $type {
                assert!(
                    self.pos + $size <= self.buf.len(),
                    "take past end: pos {} + size {} > len {}",
                    self.pos, $size, self.buf.len()
                );
                let value = <$type>::from_le_bytes(
                    self.buf[self.pos..self.pos + $size].try_into().unwrap(),
                );
                self.pos += $size;
                value
            }
        }
    };
}

/// Generates take methods for all primitive types the record layout uses.
macro_rules! impl_take_primitives {
    () => {
        impl_take_primitive!(u8);
        impl_take_primitive!(i8);
        impl_take_primitive!(u16, 2);
        impl_take_primitive!(i16, 2);
        impl_take_primitive!(u32, 4);
        impl_take_primitive!(i32, 4);
    };
}

/// Generates a put method for a single primitive type.
macro_rules! impl_put_primitive {
    // Single byte types - no endianness suffix
    (u8) => {
        /// Puts a `u8` at the cursor and advances it.
        ///
        /// # Panics
        /// Panics if the cursor is at the end of the buffer.
        #[inline]
        pub fn put_u8(&mut self, value: u8) {
            assert!(
                self.pos < self.buf.len(),
                "put past end: pos {} >= len {}",
                self.pos,
                self.buf.len()
            );
            self.buf[self.pos] = value;
            self.pos += 1;
        }
    };
    (i8) => {
        /// Puts an `i8` at the cursor and advances it.
        ///
        /// # Panics
        /// Panics if the cursor is at the end of the buffer.
        #[inline]
        pub fn put_i8(&mut self, value: i8) {
            self.put_u8(value as u8);
        }
    };
    // Multi-byte types - record layout is little-endian throughout
    ($type:ty, $size:literal) => {
        paste::paste! {
            #[doc = "Puts a little-endian `" $type "` at the cursor and advances it."]
            #[doc = ""]
            #[doc = "# Panics"]
            #[doc = "Panics if fewer than " $size " bytes remain."]
            #[inline]
            pub fn [<put_ $type _le>](&mut self, value: $type) {
                assert!(
                    self.pos + $size <= self.buf.len(),
                    "put past end: pos {} + size {} > len {}",
                    self.pos, $size, self.buf.len()
                );
                self.buf[self.pos..self.pos + $size].copy_from_slice(&value.to_le_bytes());
                self.pos += $size;
            }
        }
    };
}

/// Generates put methods for all primitive types the record layout uses.
macro_rules! impl_put_primitives {
    () => {
        impl_put_primitive!(u8);
        impl_put_primitive!(i8);
        impl_put_primitive!(u16, 2);
        impl_put_primitive!(i16, 2);
        impl_put_primitive!(u32, 4);
        impl_put_primitive!(i32, 4);
    };
}

/// Generates common cursor methods (position, remaining, is_empty).
macro_rules! impl_cursor_common {
    () => {
        /// Returns the current cursor position.
        #[inline]
        pub fn position(&self) -> usize {
            self.pos
        }

        /// Returns the number of bytes left after the cursor.
        #[inline]
        pub fn remaining(&self) -> usize {
            self.buf.len() - self.pos
        }

        /// Returns true if the cursor has reached the end of the buffer.
        #[inline]
        pub fn is_empty(&self) -> bool {
            self.pos == self.buf.len()
        }
    };
}

pub(super) use impl_cursor_common;
pub(super) use impl_put_primitive;
pub(super) use impl_put_primitives;
pub(super) use impl_take_primitive;
pub(super) use impl_take_primitives;
