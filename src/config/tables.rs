//! Externally owned tables synchronized into the primary record.
//!
//! The routing table and access-control list live outside the store and are
//! only snapshotted into (on save) or restored from (on load) the record's
//! embedded regions. The store treats both regions as opaque bytes; the wire
//! form here belongs to the table implementations.

use core::net::Ipv4Addr;

use heapless::Vec;

use crate::config::wire::{WireReader, WireWriter};

/// Maximum number of routing entries a record snapshot can hold.
pub const MAX_ROUTES: usize = 16;

const ROUTE_WIRE: usize = 12;

/// Byte size of the routing-table snapshot region inside the record.
pub const ROUTES_SNAPSHOT_LEN: usize = 1 + MAX_ROUTES * ROUTE_WIRE;

/// Maximum number of ACL rules a record snapshot can hold.
pub const MAX_ACL_RULES: usize = 20;

const ACL_RULE_WIRE: usize = 22;

/// Byte size of the ACL snapshot region inside the record.
pub const ACL_SNAPSHOT_LEN: usize = 1 + MAX_ACL_RULES * ACL_RULE_WIRE;

/// Routing table synchronized with the record's embedded snapshot.
///
/// `export` must produce exactly the snapshot region format that `import`
/// consumes; the store calls them back to back across a power cycle.
pub trait RoutingTable {
    /// Writes the table into the snapshot region.
    ///
    /// # Panics
    /// Panics if `out` is shorter than [`ROUTES_SNAPSHOT_LEN`].
    fn export(&self, out: &mut [u8]);

    /// Replaces the table contents from the snapshot region.
    ///
    /// # Panics
    /// Panics if `data` is shorter than [`ROUTES_SNAPSHOT_LEN`].
    fn import(&mut self, data: &[u8]);
}

/// Access-control list synchronized with the record's embedded snapshot.
pub trait AccessControlList {
    /// Writes the list into the snapshot region.
    ///
    /// # Panics
    /// Panics if `out` is shorter than [`ACL_SNAPSHOT_LEN`].
    fn export(&self, out: &mut [u8]);

    /// Replaces the list contents from the snapshot region.
    ///
    /// # Panics
    /// Panics if `data` is shorter than [`ACL_SNAPSHOT_LEN`].
    fn import(&mut self, data: &[u8]);
}

/// A single IPv4 route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub dest: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub gateway: Ipv4Addr,
}

/// Fixed-capacity IPv4 routing table.
///
/// Wire form: one count byte followed by [`MAX_ROUTES`] entry slots of
/// dest/mask/gateway octets; unused slots are zero-filled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ipv4RouteTable {
    entries: Vec<Route, MAX_ROUTES>,
}

impl Ipv4RouteTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route; returns it back if the table is full.
    pub fn add(&mut self, route: Route) -> Result<(), Route> {
        self.entries.push(route)
    }

    /// Removes all routes.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of routes in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table holds no routes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the routes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.entries.iter()
    }
}

impl RoutingTable for Ipv4RouteTable {
    fn export(&self, out: &mut [u8]) {
        let mut w = WireWriter::new(&mut out[..ROUTES_SNAPSHOT_LEN]);
        w.put_u8(self.entries.len() as u8);
        for route in &self.entries {
            w.put_ip4(route.dest);
            w.put_ip4(route.mask);
            w.put_ip4(route.gateway);
        }
        w.pad(w.remaining());
    }

    fn import(&mut self, data: &[u8]) {
        let mut r = WireReader::new(&data[..ROUTES_SNAPSHOT_LEN]);
        let count = (r.take_u8() as usize).min(MAX_ROUTES);
        self.entries.clear();
        for _ in 0..count {
            let route = Route {
                dest: r.take_ip4(),
                mask: r.take_ip4(),
                gateway: r.take_ip4(),
            };
            let _ = self.entries.push(route);
        }
    }
}

/// A single access-control rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AclRule {
    /// IP protocol number (0 matches any).
    pub protocol: u8,
    pub src: Ipv4Addr,
    pub src_mask: Ipv4Addr,
    pub dst: Ipv4Addr,
    pub dst_mask: Ipv4Addr,
    /// Source port (0 matches any).
    pub src_port: u16,
    /// Destination port (0 matches any).
    pub dst_port: u16,
    /// Whether matching traffic is allowed or dropped.
    pub allow: bool,
}

/// Fixed-capacity access-control list.
///
/// Wire form mirrors [`Ipv4RouteTable`]: count byte plus fixed rule slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AclTable {
    rules: Vec<AclRule, MAX_ACL_RULES>,
}

impl AclTable {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule; returns it back if the list is full.
    pub fn add(&mut self, rule: AclRule) -> Result<(), AclRule> {
        self.rules.push(rule)
    }

    /// Removes all rules.
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Number of rules in the list.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the list holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterates over the rules in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &AclRule> {
        self.rules.iter()
    }
}

impl AccessControlList for AclTable {
    fn export(&self, out: &mut [u8]) {
        let mut w = WireWriter::new(&mut out[..ACL_SNAPSHOT_LEN]);
        w.put_u8(self.rules.len() as u8);
        for rule in &self.rules {
            w.put_u8(rule.protocol);
            w.put_ip4(rule.src);
            w.put_ip4(rule.src_mask);
            w.put_ip4(rule.dst);
            w.put_ip4(rule.dst_mask);
            w.put_u16_le(rule.src_port);
            w.put_u16_le(rule.dst_port);
            w.put_bool(rule.allow);
        }
        w.pad(w.remaining());
    }

    fn import(&mut self, data: &[u8]) {
        let mut r = WireReader::new(&data[..ACL_SNAPSHOT_LEN]);
        let count = (r.take_u8() as usize).min(MAX_ACL_RULES);
        self.rules.clear();
        for _ in 0..count {
            let rule = AclRule {
                protocol: r.take_u8(),
                src: r.take_ip4(),
                src_mask: r.take_ip4(),
                dst: r.take_ip4(),
                dst_mask: r.take_ip4(),
                src_port: r.take_u16_le(),
                dst_port: r.take_u16_le(),
                allow: r.take_bool(),
            };
            let _ = self.rules.push(rule);
        }
    }
}

/// No-op access-control collaborator for builds without ACL support.
///
/// Exports an all-zero snapshot and discards imports, so the record layout
/// stays identical whether or not an ACL is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAcl;

impl AccessControlList for NoAcl {
    fn export(&self, out: &mut [u8]) {
        out[..ACL_SNAPSHOT_LEN].fill(0);
    }

    fn import(&mut self, _data: &[u8]) {}
}
