//! Shipped defaults and the factory that assembles a fresh record.
//!
//! The factory is the self-healing path: whenever no valid record is found
//! on flash (first boot, interrupted save, schema drift) the store builds
//! one of these and persists it. It is deterministic given the constants
//! below and the device's hardware addresses, and it never touches flash.

use core::fmt::Write;
use core::net::Ipv4Addr;

use heapless::String;

use crate::config::{
    identity::{Interface, PlatformIdentity},
    record::{ACCESS_LOCAL, ACCESS_REMOTE, MAGIC, NAME_LEN, RECORD_SIZE, SysConfig, bounded},
    tables::{ACL_SNAPSHOT_LEN, ROUTES_SNAPSHOT_LEN},
};

pub const DEFAULT_SSID: &str = "ssid";
pub const DEFAULT_PASSWORD: &str = "password";
pub const DEFAULT_AP_SSID: &str = "MyAP";
pub const DEFAULT_AP_PASSWORD: &str = "none";

/// Hostname prefix; the last three MAC octets are appended.
pub const HOSTNAME_PREFIX: &str = "ESP";

/// Soft-AP network address handed out to downstream clients.
pub const DEFAULT_AP_NETWORK: Ipv4Addr = Ipv4Addr::new(192, 168, 4, 1);

pub const DEFAULT_AUTOMESH_THRESHOLD: u8 = 85;
/// 802.11n.
pub const DEFAULT_PHY_MODE: u8 = 3;
pub const DEFAULT_CLOCK_MHZ: u8 = 80;
pub const DEFAULT_STATUS_LED: u8 = 2;
pub const DEFAULT_CONFIG_PORT: u16 = 7777;
pub const DEFAULT_WEB_PORT: u16 = 80;
pub const DEFAULT_VMIN_SLEEP_S: u16 = 60;

/// Watchdog value meaning "disabled".
pub const WATCHDOG_DISABLED: i16 = -1;

/// Builds a fully populated default record.
///
/// Reads the hardware address of each interface once; every other field
/// comes from the shipped constants. Optional feature sections are left
/// absent, the embedded table snapshots are cleared, and `magic`/`length`
/// are stamped with the current build's values.
pub fn build(identity: &impl PlatformIdentity) -> SysConfig {
    let sta_mac = identity.hardware_address(Interface::Station);
    let ap_mac = identity.hardware_address(Interface::SoftAp);

    let mut sta_hostname: String<NAME_LEN> = String::new();
    let _ = write!(
        sta_hostname,
        "{HOSTNAME_PREFIX}-{:02x}{:02x}{:02x}",
        sta_mac[3], sta_mac[4], sta_mac[5]
    );

    SysConfig {
        magic: MAGIC,
        length: RECORD_SIZE as u32,

        ssid: bounded(DEFAULT_SSID),
        password: bounded(DEFAULT_PASSWORD),
        auto_connect: true,
        bssid: [0; 6],
        sta_hostname,

        ap_ssid: bounded(DEFAULT_AP_SSID),
        ap_password: bounded(DEFAULT_AP_PASSWORD),
        ap_open: true,
        ap_on: true,
        ssid_hidden: false,

        lock_password: String::new(),
        locked: false,

        ap_watchdog: WATCHDOG_DISABLED,
        client_watchdog: WATCHDOG_DISABLED,

        automesh_mode: 0,
        automesh_checked: 0,
        automesh_tries: 0,
        automesh_threshold: DEFAULT_AUTOMESH_THRESHOLD,
        am_scan_time: 0,
        am_sleep_time: 0,

        nat_enable: true,
        network_addr: DEFAULT_AP_NETWORK,
        dns_addr: Ipv4Addr::UNSPECIFIED,
        own_addr: Ipv4Addr::UNSPECIFIED,
        netmask: Ipv4Addr::UNSPECIFIED,
        gateway: Ipv4Addr::UNSPECIFIED,

        phy_mode: DEFAULT_PHY_MODE,
        clock_mhz: DEFAULT_CLOCK_MHZ,
        status_led: DEFAULT_STATUS_LED,

        vmin: 0,
        vmin_sleep: DEFAULT_VMIN_SLEEP_S,

        config_port: DEFAULT_CONFIG_PORT,
        web_port: DEFAULT_WEB_PORT,
        config_access: ACCESS_LOCAL | ACCESS_REMOTE,

        enterprise: None,
        mqtt: None,
        shaper: None,

        ap_mac,
        sta_mac,
        dhcps_entries: 0,

        routes: [0; ROUTES_SNAPSHOT_LEN],
        acl: [0; ACL_SNAPSHOT_LEN],
    }
}
