pub mod blob;
pub mod defaults;
pub mod error;
pub mod flash;
pub mod identity;
pub mod record;
pub mod store;
pub mod tables;
pub mod wire;

#[cfg(test)]
mod test_support;

pub use blob::BlobStore;
pub use error::{ConfigError, FlashError};
pub use flash::SectorFlash;
pub use identity::{Interface, PlatformIdentity};
pub use record::{
    ACCESS_LOCAL, ACCESS_REMOTE, EnterpriseAuth, MAGIC, MqttSettings, RECORD_SIZE, RateLimit,
    SysConfig,
};
pub use store::{ConfigStore, StoreState};
pub use tables::{
    AccessControlList, AclRule, AclTable, Ipv4RouteTable, NoAcl, Route, RoutingTable,
};
pub use wire::{WireReader, WireWriter};

pub mod prelude {
    pub use super::{
        AccessControlList, AclRule, AclTable, BlobStore, ConfigError, ConfigStore, EnterpriseAuth,
        FlashError, Interface, Ipv4RouteTable, MqttSettings, NoAcl, PlatformIdentity, RateLimit,
        Route, RoutingTable, SectorFlash, StoreState, SysConfig, WireReader, WireWriter,
    };
}
