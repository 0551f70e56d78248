//! A `no_std`, no-alloc configuration store for raw NOR flash.
//!
//! This crate persists a device's operating configuration across power
//! cycles on flash that is addressable only in whole erase-sectors: a
//! sector must be fully erased before any byte in it can be reprogrammed.
//!
//! # Features
//!
//! - **Versioned primary record** - magic-number presence check plus a
//!   coarse size-based schema check
//! - **Self-healing load** - a missing or incompatible record is replaced
//!   by a freshly built default and persisted in the same call
//! - **Table synchronization** - externally owned routing and ACL tables
//!   are snapshotted into the record on save and restored on load
//! - **Raw blob slots** - unvalidated per-sector auxiliary storage for
//!   data the record schema does not want to embed
//! - **Zero heap allocation** - bounded strings and tables throughout
//!
//! # Flash layout
//!
//! ```text
//! sector base          base + 1    base + 2    base + 3
//! ┌──────────────────┬───────────┬───────────┬───────────┐
//! │ SysConfig record │ blob 0    │ blob 1    │ blob 2 …  │
//! │ magic │ length │…│ (raw)     │ (raw)     │ (raw)     │
//! └──────────────────┴───────────┴───────────┴───────────┘
//! ```
//!
//! Every save erases the record's sector and rewrites the complete record;
//! there is no staging and no partial-write protection. Power loss between
//! the erase and the end of the program cycle leaves the sector without a
//! valid magic number, and the next load recovers by writing defaults.
//!
//! # Example
//!
//! ```rust
//! use sector_config::prelude::*;
//!
//! const SECTOR: usize = 4096;
//!
//! // A RAM-backed stand-in for the platform flash driver.
//! struct RamFlash {
//!     mem: [u8; 2 * SECTOR],
//! }
//!
//! impl SectorFlash for RamFlash {
//!     const SECTOR_SIZE: usize = SECTOR;
//!
//!     fn erase_sector(&mut self, index: u16) -> Result<(), FlashError> {
//!         let start = index as usize * SECTOR;
//!         self.mem[start..start + SECTOR].fill(0xFF);
//!         Ok(())
//!     }
//!
//!     fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), FlashError> {
//!         let start = offset as usize;
//!         buf.copy_from_slice(&self.mem[start..start + buf.len()]);
//!         Ok(())
//!     }
//!
//!     fn write(&mut self, offset: u32, data: &[u8]) -> Result<(), FlashError> {
//!         let start = offset as usize;
//!         self.mem[start..start + data.len()].copy_from_slice(data);
//!         Ok(())
//!     }
//! }
//!
//! struct FixedMac;
//!
//! impl PlatformIdentity for FixedMac {
//!     fn hardware_address(&self, _interface: Interface) -> [u8; 6] {
//!         [0x5C, 0xCF, 0x7F, 0x01, 0x02, 0x03]
//!     }
//! }
//!
//! let mut flash = RamFlash { mem: [0xFF; 2 * SECTOR] };
//! let mut store = ConfigStore::new(0);
//! let mut routes = Ipv4RouteTable::new();
//! let mut acl = NoAcl;
//! let mut cfg = sector_config::config::defaults::build(&FixedMac);
//!
//! // First boot: erased flash carries no record, so load self-heals.
//! assert_eq!(
//!     store.load(&mut flash, &mut cfg, &mut routes, &mut acl, &FixedMac),
//!     Err(ConfigError::NotFound)
//! );
//! assert_eq!(store.state(), StoreState::Defaulted);
//!
//! // The defaults are now on flash; subsequent loads adopt them.
//! let mut store = ConfigStore::new(0);
//! assert_eq!(
//!     store.load(&mut flash, &mut cfg, &mut routes, &mut acl, &FixedMac),
//!     Ok(())
//! );
//! assert_eq!(cfg.sta_hostname.as_str(), "ESP-010203");
//!
//! // Auxiliary data goes into raw blob slots past the record's sector.
//! let blobs = BlobStore::new(0);
//! blobs.save(&mut flash, 0, b"lease table").unwrap();
//! ```

#![deny(unsafe_code)]
#![no_std]

pub mod config;

pub mod prelude {
    pub use crate::config::prelude::*;
}
