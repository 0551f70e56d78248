use crate::config::FlashError;

/// Raw NOR flash addressed as a linear byte space divided into sectors.
///
/// A sector is the minimum erasable unit: every byte in it must be erased
/// (set to `0xFF`) before it can be reprogrammed. Implementations wrap the
/// platform flash driver; this crate never bypasses them.
///
/// Byte offsets are absolute within the device. Sector `n` covers
/// `n * SECTOR_SIZE .. (n + 1) * SECTOR_SIZE`.
pub trait SectorFlash {
    /// Size of one erase sector in bytes.
    const SECTOR_SIZE: usize;

    /// Erases the given sector, leaving every byte `0xFF`.
    fn erase_sector(&mut self, index: u16) -> Result<(), FlashError>;

    /// Reads `buf.len()` bytes starting at `offset`.
    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), FlashError>;

    /// Programs `data` starting at `offset`.
    ///
    /// The target range must have been erased since it was last programmed;
    /// NOR programming can only clear bits.
    fn write(&mut self, offset: u32, data: &[u8]) -> Result<(), FlashError>;
}
