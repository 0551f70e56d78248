//! Load/save protocol for the primary record.

use crate::config::{
    ConfigError,
    defaults,
    flash::SectorFlash,
    identity::PlatformIdentity,
    record::{MAGIC, RECORD_SIZE, SysConfig},
    tables::{AccessControlList, RoutingTable},
    wire::WireReader,
};

/// Validation state of the store after the most recent `load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreState {
    /// `load` has not been called yet.
    Unloaded,
    /// The stored record passed validation and was adopted.
    Valid,
    /// No valid record was found; a default was synthesized and persisted.
    Defaulted,
}

/// Persistence protocol for the primary configuration record.
///
/// The record occupies one full sector at `base_sector`; every save erases
/// that sector and rewrites the complete record. The flash device and the
/// live tables are collaborators passed into each call, so one device can
/// back both this store and a [`BlobStore`](crate::config::BlobStore).
///
/// A save is not atomic: power loss between the erase and the end of the
/// program cycle leaves the sector without a valid magic number, and the
/// next `load` falls back to defaults. Callers must serialize all store
/// operations; the erase+program pair itself runs inside a critical
/// section so an interrupt context cannot interleave with it.
pub struct ConfigStore {
    base_sector: u16,
    state: StoreState,
}

impl ConfigStore {
    /// Creates a store over the given primary sector.
    pub fn new(base_sector: u16) -> Self {
        Self {
            base_sector,
            state: StoreState::Unloaded,
        }
    }

    /// The validation state left behind by the most recent `load`.
    ///
    /// `save` never changes it.
    pub fn state(&self) -> StoreState {
        self.state
    }

    fn base_offset<F: SectorFlash>(&self) -> u32 {
        self.base_sector as u32 * F::SECTOR_SIZE as u32
    }

    /// Loads the stored record, falling back to defaults when invalid.
    ///
    /// Probes the magic number first with a header-only read. On a magic
    /// mismatch (erased flash, interrupted save) or a stored-length
    /// mismatch (schema drift), a default record is built, persisted via
    /// [`save`](Self::save) and adopted, and the corresponding error is
    /// returned — the store is fully usable afterwards, the error only
    /// signals that stored values were discarded. On success the embedded
    /// table snapshots are imported into the live tables.
    ///
    /// # Errors
    /// - [`ConfigError::NotFound`] - no valid magic number; defaults written.
    /// - [`ConfigError::VersionMismatch`] - stored size differs from the
    ///   current build; defaults written.
    /// - [`ConfigError::Flash`] - a flash operation failed.
    pub fn load<F, R, A, I>(
        &mut self,
        flash: &mut F,
        cfg: &mut SysConfig,
        routes: &mut R,
        acl: &mut A,
        identity: &I,
    ) -> Result<(), ConfigError>
    where
        F: SectorFlash,
        R: RoutingTable,
        A: AccessControlList,
        I: PlatformIdentity,
    {
        debug_assert!(
            RECORD_SIZE <= F::SECTOR_SIZE,
            "record must fit in one sector",
        );

        let mut header = [0u8; 4];
        flash.read(self.base_offset::<F>(), &mut header)?;

        if u32::from_le_bytes(header) != MAGIC {
            #[cfg(feature = "defmt")]
            defmt::warn!("no config found, saving defaults");
            *cfg = defaults::build(identity);
            self.save(flash, cfg, routes, acl)?;
            self.state = StoreState::Defaulted;
            return Err(ConfigError::NotFound);
        }

        let mut buf = [0u8; RECORD_SIZE];
        flash.read(self.base_offset::<F>(), &mut buf)?;

        let mut r = WireReader::new(&buf);
        r.skip(4);
        let stored_len = r.take_u32_le();
        if stored_len != RECORD_SIZE as u32 {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "stored config size {} != {}, saving defaults",
                stored_len,
                RECORD_SIZE as u32
            );
            *cfg = defaults::build(identity);
            self.save(flash, cfg, routes, acl)?;
            self.state = StoreState::Defaulted;
            return Err(ConfigError::VersionMismatch);
        }

        *cfg = SysConfig::decode(&buf);
        routes.import(cfg.routes_snapshot());
        acl.import(cfg.acl_snapshot());

        #[cfg(feature = "defmt")]
        defmt::info!("config found and loaded");
        self.state = StoreState::Valid;
        Ok(())
    }

    /// Persists the record, snapshotting the live tables into it first.
    ///
    /// Erases the primary sector and programs the complete record; the two
    /// steps run inside one critical section. The sector is observably
    /// blank in between — an accepted failure mode, recovered by the next
    /// `load` as [`ConfigError::NotFound`].
    ///
    /// # Errors
    /// [`ConfigError::Flash`] if the erase or program fails.
    pub fn save<F, R, A>(
        &mut self,
        flash: &mut F,
        cfg: &mut SysConfig,
        routes: &R,
        acl: &A,
    ) -> Result<(), ConfigError>
    where
        F: SectorFlash,
        R: RoutingTable,
        A: AccessControlList,
    {
        debug_assert!(
            RECORD_SIZE <= F::SECTOR_SIZE,
            "record must fit in one sector",
        );

        routes.export(cfg.routes_snapshot_mut());
        acl.export(cfg.acl_snapshot_mut());

        let mut buf = [0u8; RECORD_SIZE];
        cfg.encode(&mut buf);

        #[cfg(feature = "defmt")]
        defmt::info!("saving configuration");
        critical_section::with(|_| {
            flash.erase_sector(self.base_sector)?;
            flash.write(self.base_offset::<F>(), &buf)
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::record::bounded;
    use crate::config::tables::{AclRule, AclTable, Ipv4RouteTable, NoAcl, Route};
    use crate::config::test_support::{FailingFlash, MockFlash, MockIdentity};
    use crate::config::{FlashError, defaults};
    use core::net::Ipv4Addr;

    fn fixture() -> (MockFlash, SysConfig, Ipv4RouteTable, AclTable, ConfigStore) {
        (
            MockFlash::new(),
            defaults::build(&MockIdentity),
            Ipv4RouteTable::new(),
            AclTable::new(),
            ConfigStore::new(0),
        )
    }

    fn sample_route() -> Route {
        Route {
            dest: Ipv4Addr::new(10, 1, 0, 0),
            mask: Ipv4Addr::new(255, 255, 0, 0),
            gateway: Ipv4Addr::new(192, 168, 4, 2),
        }
    }

    #[test]
    fn first_boot_defaults_then_loads_clean() {
        let (mut flash, mut cfg, mut routes, mut acl, mut store) = fixture();

        // Fresh (erased) flash carries no magic number
        assert_eq!(
            store.load(&mut flash, &mut cfg, &mut routes, &mut acl, &MockIdentity),
            Err(ConfigError::NotFound)
        );
        assert_eq!(store.state(), StoreState::Defaulted);
        assert_eq!(cfg, defaults::build(&MockIdentity));

        // The defaulted record was persisted, so the next load succeeds
        let mut store = ConfigStore::new(0);
        assert_eq!(
            store.load(&mut flash, &mut cfg, &mut routes, &mut acl, &MockIdentity),
            Ok(())
        );
        assert_eq!(store.state(), StoreState::Valid);
        assert_eq!(cfg.sta_hostname.as_str(), "ESP-aabbcc");
    }

    #[test]
    fn save_then_load_round_trips_the_record() {
        let (mut flash, mut cfg, mut routes, mut acl, mut store) = fixture();

        cfg.ssid = bounded("backbone");
        cfg.web_port = 8080;
        cfg.locked = true;
        store
            .save(&mut flash, &mut cfg, &routes, &acl)
            .unwrap();
        let saved = cfg.clone();
        assert_eq!(&flash.mem()[..4], &MAGIC.to_le_bytes());

        let mut reloaded = defaults::build(&MockIdentity);
        let mut store = ConfigStore::new(0);
        store
            .load(
                &mut flash,
                &mut reloaded,
                &mut routes,
                &mut acl,
                &MockIdentity,
            )
            .unwrap();
        assert_eq!(reloaded, saved);
    }

    #[test]
    fn schema_drift_resets_to_defaults() {
        let (mut flash, mut cfg, mut routes, mut acl, mut store) = fixture();
        store
            .save(&mut flash, &mut cfg, &routes, &acl)
            .unwrap();

        // Pretend an older build wrote a shorter record
        flash.patch(4, &(RECORD_SIZE as u32 - 16).to_le_bytes());

        let mut store = ConfigStore::new(0);
        assert_eq!(
            store.load(&mut flash, &mut cfg, &mut routes, &mut acl, &MockIdentity),
            Err(ConfigError::VersionMismatch)
        );
        assert_eq!(store.state(), StoreState::Defaulted);

        // Recovery rewrote a valid record
        let mut store = ConfigStore::new(0);
        assert_eq!(
            store.load(&mut flash, &mut cfg, &mut routes, &mut acl, &MockIdentity),
            Ok(())
        );
    }

    #[test]
    fn tables_survive_a_blank_reload() {
        let (mut flash, mut cfg, mut routes, mut acl, mut store) = fixture();
        routes.add(sample_route()).unwrap();
        acl.add(AclRule {
            protocol: 17,
            src: Ipv4Addr::new(192, 168, 4, 0),
            src_mask: Ipv4Addr::new(255, 255, 255, 0),
            dst: Ipv4Addr::UNSPECIFIED,
            dst_mask: Ipv4Addr::UNSPECIFIED,
            src_port: 0,
            dst_port: 53,
            allow: true,
        })
        .unwrap();

        store
            .save(&mut flash, &mut cfg, &routes, &acl)
            .unwrap();

        // Blank process: fresh store, fresh record, fresh tables
        let mut store = ConfigStore::new(0);
        let mut reloaded = defaults::build(&MockIdentity);
        let mut fresh_routes = Ipv4RouteTable::new();
        let mut fresh_acl = AclTable::new();
        store
            .load(
                &mut flash,
                &mut reloaded,
                &mut fresh_routes,
                &mut fresh_acl,
                &MockIdentity,
            )
            .unwrap();

        assert_eq!(fresh_routes, routes);
        assert_eq!(fresh_acl, acl);
    }

    #[test]
    fn save_erases_before_programming() {
        let (mut flash, mut cfg, mut routes, mut acl, mut store) = fixture();
        store
            .save(&mut flash, &mut cfg, &routes, &acl)
            .unwrap();
        assert_eq!(flash.erase_counts[0], 1);

        // A second save erases again; load alone never erases
        store
            .save(&mut flash, &mut cfg, &routes, &acl)
            .unwrap();
        assert_eq!(flash.erase_counts[0], 2);

        store
            .load(&mut flash, &mut cfg, &mut routes, &mut acl, &MockIdentity)
            .unwrap();
        assert_eq!(flash.erase_counts[0], 2);
    }

    #[test]
    fn save_does_not_change_load_state() {
        let (mut flash, mut cfg, mut routes, mut acl, mut store) = fixture();
        assert_eq!(store.state(), StoreState::Unloaded);

        store
            .save(&mut flash, &mut cfg, &routes, &acl)
            .unwrap();
        assert_eq!(store.state(), StoreState::Unloaded);

        store
            .load(&mut flash, &mut cfg, &mut routes, &mut acl, &MockIdentity)
            .unwrap();
        assert_eq!(store.state(), StoreState::Valid);

        store
            .save(&mut flash, &mut cfg, &routes, &acl)
            .unwrap();
        assert_eq!(store.state(), StoreState::Valid);
    }

    #[test]
    fn works_with_the_no_op_acl() {
        let (mut flash, mut cfg, mut routes, _, mut store) = fixture();
        let mut acl = NoAcl;

        assert_eq!(
            store.load(&mut flash, &mut cfg, &mut routes, &mut acl, &MockIdentity),
            Err(ConfigError::NotFound)
        );
        assert_eq!(
            store.load(&mut flash, &mut cfg, &mut routes, &mut acl, &MockIdentity),
            Ok(())
        );
        assert!(cfg.acl_snapshot().iter().all(|&b| b == 0));
    }

    #[test]
    fn flash_failures_propagate() {
        let (_, mut cfg, mut routes, mut acl, mut store) = fixture();

        let mut flash = FailingFlash::failing_erase();
        assert_eq!(
            store.save(&mut flash, &mut cfg, &routes, &acl),
            Err(ConfigError::Flash(FlashError::Erase))
        );

        let mut flash = FailingFlash::failing_read();
        assert_eq!(
            store.load(&mut flash, &mut cfg, &mut routes, &mut acl, &MockIdentity),
            Err(ConfigError::Flash(FlashError::Read))
        );

        let mut flash = FailingFlash::failing_program();
        assert_eq!(
            store.save(&mut flash, &mut cfg, &routes, &acl),
            Err(ConfigError::Flash(FlashError::Program))
        );
    }

    #[test]
    fn record_not_adopted_when_defaulting_save_fails() {
        let (_, mut cfg, mut routes, mut acl, mut store) = fixture();

        // Erased flash triggers the default path, whose save fails
        let mut flash = FailingFlash::failing_erase();
        assert_eq!(
            store.load(&mut flash, &mut cfg, &mut routes, &mut acl, &MockIdentity),
            Err(ConfigError::Flash(FlashError::Erase))
        );
        assert_eq!(store.state(), StoreState::Unloaded);
    }
}
