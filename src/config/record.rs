//! The primary configuration record and its on-flash layout.
//!
//! The record is positional: every field occupies a fixed byte range in
//! declaration order, with no tagging. Any structural change shifts the
//! encoded size, which the stored `length` field catches as a coarse
//! version check — a mismatch discards the stored record wholesale.

use core::net::Ipv4Addr;

use heapless::String;

use crate::config::{
    tables::{ACL_SNAPSHOT_LEN, ROUTES_SNAPSHOT_LEN},
    wire::{WireReader, WireWriter},
};

/// Sentinel distinguishing a written record from erased flash.
pub const MAGIC: u32 = 0x5343_4631;

/// Width of SSID fields.
pub const SSID_LEN: usize = 32;
/// Width of password and secret fields.
pub const PASSWORD_LEN: usize = 64;
/// Width of hostnames, usernames and other short names.
pub const NAME_LEN: usize = 32;
/// Width of MQTT topic and prefix fields.
pub const TOPIC_LEN: usize = 64;

/// Local (serial console) configuration access.
pub const ACCESS_LOCAL: u8 = 1 << 0;
/// Remote (network) configuration access.
pub const ACCESS_REMOTE: u8 = 1 << 1;

const ENTERPRISE_BODY: usize = NAME_LEN + NAME_LEN + PASSWORD_LEN;
const MQTT_BODY: usize = NAME_LEN // host
    + 2 // port
    + NAME_LEN // user
    + PASSWORD_LEN
    + NAME_LEN // client id
    + TOPIC_LEN // prefix
    + TOPIC_LEN // command topic
    + TOPIC_LEN // switch topic
    + 1 // gpio out status
    + 2 // report interval
    + 2; // topic mask
const RATE_BODY: usize = 8;

/// Encoded size of the record, stamped into its `length` field.
///
/// This is the schema version in all but name: any layout change moves it,
/// and a stored record whose `length` differs is discarded on load.
pub const RECORD_SIZE: usize = 4 + 4 // magic, length
    + SSID_LEN + PASSWORD_LEN + 1 + 6 // station: ssid, password, auto_connect, bssid
    + NAME_LEN // hostname
    + SSID_LEN + PASSWORD_LEN + 1 + 1 + 1 // access point: ssid, password, open, on, hidden
    + NAME_LEN + 1 // lock password, locked
    + 2 + 2 // watchdogs
    + 4 + 2 + 2 // automesh: mode, checked, tries, threshold + scan/sleep times
    + 1 + 4 * 5 // nat flag + network, dns, own, netmask, gateway
    + 3 // phy mode, clock, status led
    + 2 + 2 // vmin, vmin sleep
    + 2 + 2 + 1 // config port, web port, access flags
    + 1 + ENTERPRISE_BODY
    + 1 + MQTT_BODY
    + 1 + RATE_BODY
    + 6 + 6 + 1 // ap mac, sta mac, dhcp lease count
    + ROUTES_SNAPSHOT_LEN
    + ACL_SNAPSHOT_LEN;

/// WPA2-Enterprise (PEAP) credentials, present only when provisioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnterpriseAuth {
    pub identity: String<NAME_LEN>,
    pub username: String<NAME_LEN>,
    pub password: String<PASSWORD_LEN>,
}

impl EnterpriseAuth {
    fn encode(&self, w: &mut WireWriter<'_>) {
        w.put_str(&self.identity, NAME_LEN);
        w.put_str(&self.username, NAME_LEN);
        w.put_str(&self.password, PASSWORD_LEN);
    }

    fn decode(r: &mut WireReader<'_>) -> Self {
        Self {
            identity: bounded(r.take_str(NAME_LEN)),
            username: bounded(r.take_str(NAME_LEN)),
            password: bounded(r.take_str(PASSWORD_LEN)),
        }
    }
}

/// Messaging-client settings, present only when the client is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttSettings {
    pub host: String<NAME_LEN>,
    pub port: u16,
    pub user: String<NAME_LEN>,
    pub password: String<PASSWORD_LEN>,
    pub client_id: String<NAME_LEN>,
    pub prefix: String<TOPIC_LEN>,
    pub command_topic: String<TOPIC_LEN>,
    pub switch_topic: String<TOPIC_LEN>,
    pub gpio_out_status: u8,
    /// Status report interval in seconds.
    pub report_interval: u16,
    /// Bit mask selecting which topics are published.
    pub topic_mask: u16,
}

impl MqttSettings {
    fn encode(&self, w: &mut WireWriter<'_>) {
        w.put_str(&self.host, NAME_LEN);
        w.put_u16_le(self.port);
        w.put_str(&self.user, NAME_LEN);
        w.put_str(&self.password, PASSWORD_LEN);
        w.put_str(&self.client_id, NAME_LEN);
        w.put_str(&self.prefix, TOPIC_LEN);
        w.put_str(&self.command_topic, TOPIC_LEN);
        w.put_str(&self.switch_topic, TOPIC_LEN);
        w.put_u8(self.gpio_out_status);
        w.put_u16_le(self.report_interval);
        w.put_u16_le(self.topic_mask);
    }

    fn decode(r: &mut WireReader<'_>) -> Self {
        Self {
            host: bounded(r.take_str(NAME_LEN)),
            port: r.take_u16_le(),
            user: bounded(r.take_str(NAME_LEN)),
            password: bounded(r.take_str(PASSWORD_LEN)),
            client_id: bounded(r.take_str(NAME_LEN)),
            prefix: bounded(r.take_str(TOPIC_LEN)),
            command_topic: bounded(r.take_str(TOPIC_LEN)),
            switch_topic: bounded(r.take_str(TOPIC_LEN)),
            gpio_out_status: r.take_u8(),
            report_interval: r.take_u16_le(),
            topic_mask: r.take_u16_le(),
        }
    }
}

/// Token-bucket rate limits, present only when shaping is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Downstream limit in kbit/s (0 = unlimited).
    pub kbps_down: u32,
    /// Upstream limit in kbit/s (0 = unlimited).
    pub kbps_up: u32,
}

impl RateLimit {
    fn encode(&self, w: &mut WireWriter<'_>) {
        w.put_u32_le(self.kbps_down);
        w.put_u32_le(self.kbps_up);
    }

    fn decode(r: &mut WireReader<'_>) -> Self {
        Self {
            kbps_down: r.take_u32_le(),
            kbps_up: r.take_u32_le(),
        }
    }
}

/// The primary configuration record.
///
/// Lives in process memory between an explicit `load` and `save`; there is
/// no staging or diffing, a save always rewrites the whole record. Optional
/// feature sections are tagged sub-records whose absent body is zero-filled
/// on flash, so the layout is one fixed description regardless of what is
/// enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysConfig {
    /// Must equal [`MAGIC`] for the record to be considered present.
    pub magic: u32,
    /// Encoded size at the time the record was written.
    pub length: u32,

    // Station
    pub ssid: String<SSID_LEN>,
    pub password: String<PASSWORD_LEN>,
    pub auto_connect: bool,
    /// Pinned BSSID, all zero when any AP with the SSID is acceptable.
    pub bssid: [u8; 6],
    pub sta_hostname: String<NAME_LEN>,

    // Access point
    pub ap_ssid: String<SSID_LEN>,
    pub ap_password: String<PASSWORD_LEN>,
    pub ap_open: bool,
    pub ap_on: bool,
    pub ssid_hidden: bool,

    // Config lock
    pub lock_password: String<NAME_LEN>,
    pub locked: bool,

    /// Seconds without AP traffic before reset, -1 disables.
    pub ap_watchdog: i16,
    /// Seconds without client traffic before reset, -1 disables.
    pub client_watchdog: i16,

    // Automesh
    pub automesh_mode: u8,
    pub automesh_checked: u8,
    pub automesh_tries: u8,
    /// RSSI threshold for uplink selection.
    pub automesh_threshold: u8,
    pub am_scan_time: u16,
    pub am_sleep_time: u16,

    // Addressing
    pub nat_enable: bool,
    /// Network of the soft AP.
    pub network_addr: Ipv4Addr,
    /// 0.0.0.0 means use DHCP-provided DNS.
    pub dns_addr: Ipv4Addr,
    /// 0.0.0.0 means obtain via DHCP.
    pub own_addr: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub gateway: Ipv4Addr,

    pub phy_mode: u8,
    /// CPU clock in MHz.
    pub clock_mhz: u8,
    /// GPIO driving the status LED.
    pub status_led: u8,

    /// Supply voltage threshold for sleep, 0 disables.
    pub vmin: u16,
    /// Sleep time in seconds when below `vmin`.
    pub vmin_sleep: u16,

    pub config_port: u16,
    pub web_port: u16,
    /// Bit set of [`ACCESS_LOCAL`] and [`ACCESS_REMOTE`].
    pub config_access: u8,

    pub enterprise: Option<EnterpriseAuth>,
    pub mqtt: Option<MqttSettings>,
    pub shaper: Option<RateLimit>,

    pub ap_mac: [u8; 6],
    pub sta_mac: [u8; 6],
    /// Number of live DHCP server leases.
    pub dhcps_entries: u8,

    pub(crate) routes: [u8; ROUTES_SNAPSHOT_LEN],
    pub(crate) acl: [u8; ACL_SNAPSHOT_LEN],
}

impl SysConfig {
    /// The embedded routing-table snapshot region.
    pub fn routes_snapshot(&self) -> &[u8] {
        &self.routes
    }

    /// Mutable access to the routing-table snapshot region.
    pub fn routes_snapshot_mut(&mut self) -> &mut [u8] {
        &mut self.routes
    }

    /// The embedded ACL snapshot region.
    pub fn acl_snapshot(&self) -> &[u8] {
        &self.acl
    }

    /// Mutable access to the ACL snapshot region.
    pub fn acl_snapshot_mut(&mut self) -> &mut [u8] {
        &mut self.acl
    }

    /// Encodes the record into the first [`RECORD_SIZE`] bytes of `out`.
    ///
    /// # Panics
    /// Panics if `out` is shorter than [`RECORD_SIZE`].
    pub fn encode(&self, out: &mut [u8]) {
        let mut w = WireWriter::new(&mut out[..RECORD_SIZE]);

        w.put_u32_le(self.magic);
        w.put_u32_le(self.length);

        w.put_str(&self.ssid, SSID_LEN);
        w.put_str(&self.password, PASSWORD_LEN);
        w.put_bool(self.auto_connect);
        w.put_bytes(&self.bssid);
        w.put_str(&self.sta_hostname, NAME_LEN);

        w.put_str(&self.ap_ssid, SSID_LEN);
        w.put_str(&self.ap_password, PASSWORD_LEN);
        w.put_bool(self.ap_open);
        w.put_bool(self.ap_on);
        w.put_bool(self.ssid_hidden);

        w.put_str(&self.lock_password, NAME_LEN);
        w.put_bool(self.locked);

        w.put_i16_le(self.ap_watchdog);
        w.put_i16_le(self.client_watchdog);

        w.put_u8(self.automesh_mode);
        w.put_u8(self.automesh_checked);
        w.put_u8(self.automesh_tries);
        w.put_u8(self.automesh_threshold);
        w.put_u16_le(self.am_scan_time);
        w.put_u16_le(self.am_sleep_time);

        w.put_bool(self.nat_enable);
        w.put_ip4(self.network_addr);
        w.put_ip4(self.dns_addr);
        w.put_ip4(self.own_addr);
        w.put_ip4(self.netmask);
        w.put_ip4(self.gateway);

        w.put_u8(self.phy_mode);
        w.put_u8(self.clock_mhz);
        w.put_u8(self.status_led);

        w.put_u16_le(self.vmin);
        w.put_u16_le(self.vmin_sleep);

        w.put_u16_le(self.config_port);
        w.put_u16_le(self.web_port);
        w.put_u8(self.config_access);

        match &self.enterprise {
            Some(e) => {
                w.put_bool(true);
                e.encode(&mut w);
            }
            None => {
                w.put_bool(false);
                w.pad(ENTERPRISE_BODY);
            }
        }
        match &self.mqtt {
            Some(m) => {
                w.put_bool(true);
                m.encode(&mut w);
            }
            None => {
                w.put_bool(false);
                w.pad(MQTT_BODY);
            }
        }
        match &self.shaper {
            Some(s) => {
                w.put_bool(true);
                s.encode(&mut w);
            }
            None => {
                w.put_bool(false);
                w.pad(RATE_BODY);
            }
        }

        w.put_bytes(&self.ap_mac);
        w.put_bytes(&self.sta_mac);
        w.put_u8(self.dhcps_entries);

        w.put_bytes(&self.routes);
        w.put_bytes(&self.acl);

        debug_assert!(w.is_empty());
    }

    /// Decodes a record from the first [`RECORD_SIZE`] bytes of `buf`.
    ///
    /// Purely structural: magic and length come out as stored and are the
    /// caller's to validate.
    ///
    /// # Panics
    /// Panics if `buf` is shorter than [`RECORD_SIZE`].
    pub fn decode(buf: &[u8]) -> Self {
        let mut r = WireReader::new(&buf[..RECORD_SIZE]);

        let magic = r.take_u32_le();
        let length = r.take_u32_le();

        let ssid = bounded(r.take_str(SSID_LEN));
        let password = bounded(r.take_str(PASSWORD_LEN));
        let auto_connect = r.take_bool();
        let bssid = r.take_bytes();
        let sta_hostname = bounded(r.take_str(NAME_LEN));

        let ap_ssid = bounded(r.take_str(SSID_LEN));
        let ap_password = bounded(r.take_str(PASSWORD_LEN));
        let ap_open = r.take_bool();
        let ap_on = r.take_bool();
        let ssid_hidden = r.take_bool();

        let lock_password = bounded(r.take_str(NAME_LEN));
        let locked = r.take_bool();

        let ap_watchdog = r.take_i16_le();
        let client_watchdog = r.take_i16_le();

        let automesh_mode = r.take_u8();
        let automesh_checked = r.take_u8();
        let automesh_tries = r.take_u8();
        let automesh_threshold = r.take_u8();
        let am_scan_time = r.take_u16_le();
        let am_sleep_time = r.take_u16_le();

        let nat_enable = r.take_bool();
        let network_addr = r.take_ip4();
        let dns_addr = r.take_ip4();
        let own_addr = r.take_ip4();
        let netmask = r.take_ip4();
        let gateway = r.take_ip4();

        let phy_mode = r.take_u8();
        let clock_mhz = r.take_u8();
        let status_led = r.take_u8();

        let vmin = r.take_u16_le();
        let vmin_sleep = r.take_u16_le();

        let config_port = r.take_u16_le();
        let web_port = r.take_u16_le();
        let config_access = r.take_u8();

        let enterprise = if r.take_bool() {
            Some(EnterpriseAuth::decode(&mut r))
        } else {
            r.skip(ENTERPRISE_BODY);
            None
        };
        let mqtt = if r.take_bool() {
            Some(MqttSettings::decode(&mut r))
        } else {
            r.skip(MQTT_BODY);
            None
        };
        let shaper = if r.take_bool() {
            Some(RateLimit::decode(&mut r))
        } else {
            r.skip(RATE_BODY);
            None
        };

        let ap_mac = r.take_bytes();
        let sta_mac = r.take_bytes();
        let dhcps_entries = r.take_u8();

        let mut routes = [0u8; ROUTES_SNAPSHOT_LEN];
        routes.copy_from_slice(r.take_slice(ROUTES_SNAPSHOT_LEN));
        let mut acl = [0u8; ACL_SNAPSHOT_LEN];
        acl.copy_from_slice(r.take_slice(ACL_SNAPSHOT_LEN));

        debug_assert!(r.is_empty());

        Self {
            magic,
            length,
            ssid,
            password,
            auto_connect,
            bssid,
            sta_hostname,
            ap_ssid,
            ap_password,
            ap_open,
            ap_on,
            ssid_hidden,
            lock_password,
            locked,
            ap_watchdog,
            client_watchdog,
            automesh_mode,
            automesh_checked,
            automesh_tries,
            automesh_threshold,
            am_scan_time,
            am_sleep_time,
            nat_enable,
            network_addr,
            dns_addr,
            own_addr,
            netmask,
            gateway,
            phy_mode,
            clock_mhz,
            status_led,
            vmin,
            vmin_sleep,
            config_port,
            web_port,
            config_access,
            enterprise,
            mqtt,
            shaper,
            ap_mac,
            sta_mac,
            dhcps_entries,
            routes,
            acl,
        }
    }
}

/// Copies a borrowed string into a bounded one, truncating at capacity.
pub(crate) fn bounded<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
