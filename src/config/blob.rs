//! Raw auxiliary blob slots, one sector each.

use crate::config::{FlashError, flash::SectorFlash};

/// Chunk size for zero-filling a slot without a heap allocation.
const ZERO_CHUNK: usize = 64;

/// Fixed-size auxiliary slot persistence.
///
/// Slot `id` occupies the whole sector `base_sector + 1 + id`, directly
/// after the primary record's sector. Slots carry no header and no
/// validation — unlike the primary record, a slot read returns whatever
/// bytes are on flash, and the caller owns both the length and the
/// interpretation. Operations are stateless and independent of
/// [`ConfigStore`](crate::config::ConfigStore); callers must serialize
/// them with all other flash operations.
#[derive(Debug, Clone, Copy)]
pub struct BlobStore {
    base_sector: u16,
}

impl BlobStore {
    /// Creates a blob store whose slots follow the given primary sector.
    pub fn new(base_sector: u16) -> Self {
        Self { base_sector }
    }

    fn slot_sector(&self, id: u8) -> u16 {
        self.base_sector + 1 + id as u16
    }

    fn slot_offset<F: SectorFlash>(&self, id: u8) -> u32 {
        self.slot_sector(id) as u32 * F::SECTOR_SIZE as u32
    }

    /// Erases the slot's sector and programs `data` into it.
    ///
    /// # Errors
    /// [`FlashError::Bounds`] if `data` exceeds one sector, or the
    /// underlying erase/program error.
    pub fn save<F: SectorFlash>(
        &self,
        flash: &mut F,
        id: u8,
        data: &[u8],
    ) -> Result<(), FlashError> {
        if data.len() > F::SECTOR_SIZE {
            return Err(FlashError::Bounds);
        }
        critical_section::with(|_| {
            flash.erase_sector(self.slot_sector(id))?;
            flash.write(self.slot_offset::<F>(id), data)
        })
    }

    /// Reads `buf.len()` bytes from the slot, verbatim.
    ///
    /// No magic or length check is performed; a slot that was never
    /// written reads back as erased flash (`0xFF`).
    ///
    /// # Errors
    /// [`FlashError::Bounds`] if `buf` exceeds one sector, or the
    /// underlying read error.
    pub fn load<F: SectorFlash>(
        &self,
        flash: &mut F,
        id: u8,
        buf: &mut [u8],
    ) -> Result<(), FlashError> {
        if buf.len() > F::SECTOR_SIZE {
            return Err(FlashError::Bounds);
        }
        flash.read(self.slot_offset::<F>(id), buf)
    }

    /// Resets the slot to `len` zero bytes.
    ///
    /// Erases the sector and programs zeros in small fixed-size steps.
    ///
    /// # Errors
    /// [`FlashError::Bounds`] if `len` exceeds one sector, or the
    /// underlying erase/program error.
    pub fn zero<F: SectorFlash>(&self, flash: &mut F, id: u8, len: usize) -> Result<(), FlashError> {
        if len > F::SECTOR_SIZE {
            return Err(FlashError::Bounds);
        }
        critical_section::with(|_| {
            flash.erase_sector(self.slot_sector(id))?;
            let zeros = [0u8; ZERO_CHUNK];
            let mut offset = self.slot_offset::<F>(id);
            let mut remaining = len;
            while remaining > 0 {
                let n = remaining.min(ZERO_CHUNK);
                flash.write(offset, &zeros[..n])?;
                offset += n as u32;
                remaining -= n;
            }
            Ok(())
        })
    }
}
