/// Network interface whose hardware address is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Interface {
    /// Station (client) interface.
    Station,
    /// Soft access-point interface.
    SoftAp,
}

/// Source of the device's hardware addresses.
///
/// The default factory reads each interface's address once while building
/// a record; nothing else in this crate touches platform identity.
pub trait PlatformIdentity {
    /// Returns the 6-byte hardware address of the given interface.
    fn hardware_address(&self, interface: Interface) -> [u8; 6];
}
