use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;

/// A remote endpoint an action talks to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Peer {
    /// IPv4 address
    pub address: Ipv4Addr,
    /// TCP/UDP port
    pub port: u16,
}

impl Peer {
    pub fn new(address: Ipv4Addr, port: u16) -> Self {
        Self { address, port }
    }

    /// True when the address is neither the ANY nor the NONE sentinel.
    pub fn has_usable_address(&self) -> bool {
        self.address != Ipv4Addr::UNSPECIFIED && self.address != Ipv4Addr::BROADCAST
    }

    /// True when the peer may be placed in a pool.
    pub fn is_usable(&self) -> bool {
        self.has_usable_address() && self.port > 0
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}
