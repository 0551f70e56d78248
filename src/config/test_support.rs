//! Test support utilities - only compiled in test builds.

use crate::config::{
    FlashError,
    flash::SectorFlash,
    identity::{Interface, PlatformIdentity},
};

/// Sector size of the mock device, matching common SPI NOR parts.
pub const SECTOR_SIZE: usize = 4096;
/// Sector count: primary record plus three blob slots.
pub const SECTOR_COUNT: usize = 4;

/// RAM-backed NOR flash model.
///
/// Erase fills a sector with `0xFF`; programming can only clear bits
/// (bytes are ANDed in), so a write without a preceding erase corrupts
/// the data exactly like real NOR would. Per-sector erase counters and
/// an ever-erased bitmap let tests assert the erase-before-program
/// discipline.
pub struct MockFlash {
    data: [u8; SECTOR_COUNT * SECTOR_SIZE],
    pub erase_counts: [u32; SECTOR_COUNT],
    pub erased: bitmaps::Bitmap<SECTOR_COUNT>,
}

impl MockFlash {
    /// A factory-fresh device: every sector erased, no history.
    pub fn new() -> Self {
        Self {
            data: [0xFF; SECTOR_COUNT * SECTOR_SIZE],
            erase_counts: [0; SECTOR_COUNT],
            erased: bitmaps::Bitmap::new(),
        }
    }

    fn span(&self, offset: u32, len: usize) -> Option<(usize, usize)> {
        let start = offset as usize;
        let end = start.checked_add(len)?;
        (end <= self.data.len()).then_some((start, end))
    }

    /// Overwrites bytes directly, bypassing NOR semantics.
    ///
    /// For corrupting stored data in tests (e.g. patching the length
    /// field to simulate a record written by an older build).
    pub fn patch(&mut self, offset: usize, bytes: &[u8]) {
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    /// Raw view of the backing memory.
    pub fn mem(&self) -> &[u8] {
        &self.data
    }
}

impl Default for MockFlash {
    fn default() -> Self {
        Self::new()
    }
}

impl SectorFlash for MockFlash {
    const SECTOR_SIZE: usize = SECTOR_SIZE;

    fn erase_sector(&mut self, index: u16) -> Result<(), FlashError> {
        let i = index as usize;
        if i >= SECTOR_COUNT {
            return Err(FlashError::Bounds);
        }
        self.data[i * SECTOR_SIZE..(i + 1) * SECTOR_SIZE].fill(0xFF);
        self.erase_counts[i] += 1;
        self.erased.set(i, true);
        Ok(())
    }

    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), FlashError> {
        let (start, end) = self.span(offset, buf.len()).ok_or(FlashError::Bounds)?;
        buf.copy_from_slice(&self.data[start..end]);
        Ok(())
    }

    fn write(&mut self, offset: u32, data: &[u8]) -> Result<(), FlashError> {
        let (start, end) = self.span(offset, data.len()).ok_or(FlashError::Bounds)?;
        for (dst, src) in self.data[start..end].iter_mut().zip(data) {
            *dst &= *src;
        }
        Ok(())
    }
}

/// Flash wrapper that fails a chosen operation kind.
pub struct FailingFlash {
    pub inner: MockFlash,
    pub fail_erase: bool,
    pub fail_read: bool,
    pub fail_program: bool,
}

impl FailingFlash {
    pub fn failing_erase() -> Self {
        Self {
            inner: MockFlash::new(),
            fail_erase: true,
            fail_read: false,
            fail_program: false,
        }
    }

    pub fn failing_read() -> Self {
        Self {
            inner: MockFlash::new(),
            fail_erase: false,
            fail_read: true,
            fail_program: false,
        }
    }

    pub fn failing_program() -> Self {
        Self {
            inner: MockFlash::new(),
            fail_erase: false,
            fail_read: false,
            fail_program: true,
        }
    }
}

impl SectorFlash for FailingFlash {
    const SECTOR_SIZE: usize = SECTOR_SIZE;

    fn erase_sector(&mut self, index: u16) -> Result<(), FlashError> {
        if self.fail_erase {
            return Err(FlashError::Erase);
        }
        self.inner.erase_sector(index)
    }

    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), FlashError> {
        if self.fail_read {
            return Err(FlashError::Read);
        }
        self.inner.read(offset, buf)
    }

    fn write(&mut self, offset: u32, data: &[u8]) -> Result<(), FlashError> {
        if self.fail_program {
            return Err(FlashError::Program);
        }
        self.inner.write(offset, data)
    }
}

pub const STA_MAC: [u8; 6] = [0x5C, 0xCF, 0x7F, 0xAA, 0xBB, 0xCC];
pub const AP_MAC: [u8; 6] = [0x5E, 0xCF, 0x7F, 0xAA, 0xBB, 0xCC];

/// Identity source with fixed per-interface addresses.
pub struct MockIdentity;

impl PlatformIdentity for MockIdentity {
    fn hardware_address(&self, interface: Interface) -> [u8; 6] {
        match interface {
            Interface::Station => STA_MAC,
            Interface::SoftAp => AP_MAC,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn programming_can_only_clear_bits() {
        let mut flash = MockFlash::new();
        flash.write(0, &[0x0F]).unwrap();
        // Without an erase, set bits cannot come back
        flash.write(0, &[0xF0]).unwrap();

        let mut out = [0u8; 1];
        flash.read(0, &mut out).unwrap();
        assert_eq!(out, [0x00]);

        flash.erase_sector(0).unwrap();
        flash.read(0, &mut out).unwrap();
        assert_eq!(out, [0xFF]);
        assert!(flash.erased.get(0));
    }

    #[test]
    fn out_of_range_access_is_rejected() {
        let mut flash = MockFlash::new();
        let end = (SECTOR_COUNT * SECTOR_SIZE) as u32;
        assert_eq!(flash.write(end, &[0]), Err(FlashError::Bounds));
        let mut buf = [0u8; 2];
        assert_eq!(flash.read(end - 1, &mut buf), Err(FlashError::Bounds));
        assert_eq!(
            flash.erase_sector(SECTOR_COUNT as u16),
            Err(FlashError::Bounds)
        );
    }
}
