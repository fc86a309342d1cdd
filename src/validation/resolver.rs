use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, ToSocketAddrs};
use std::sync::Once;
use tracing::warn;

static MISSING_HOSTNAME: Once = Once::new();

/// This machine's hostname as reported by the OS, if it is non-empty UTF-8.
fn system_hostname() -> Option<String> {
    gethostname::gethostname()
        .into_string()
        .ok()
        .filter(|name| !name.is_empty())
}

/// Source of this host's own name and of hostname lookups.
///
/// Peer parsing consults it to keep a node out of its own server pool and to
/// turn host tokens into IPv4 addresses.
pub trait HostResolver {
    /// This host's name, or `None` when it cannot be determined.
    fn hostname(&self) -> Option<String>;

    /// Resolve `host` to an IPv4 address.
    fn lookup_ipv4(&self, host: &str) -> Option<Ipv4Addr>;
}

impl<R: HostResolver + ?Sized> HostResolver for &R {
    fn hostname(&self) -> Option<String> {
        (**self).hostname()
    }

    fn lookup_ipv4(&self, host: &str) -> Option<Ipv4Addr> {
        (**self).lookup_ipv4(host)
    }
}

/// Resolver backed by the operating system.
#[derive(Debug, Default, Clone)]
pub struct SystemResolver {
    hostname_override: Option<String>,
}

impl SystemResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `hostname` instead of asking the system.
    pub fn with_hostname(hostname: impl Into<String>) -> Self {
        Self {
            hostname_override: Some(hostname.into()),
        }
    }
}

impl HostResolver for SystemResolver {
    fn hostname(&self) -> Option<String> {
        if let Some(name) = &self.hostname_override {
            return Some(name.clone());
        }

        let name = system_hostname();
        if name.is_none() {
            MISSING_HOSTNAME.call_once(|| {
                warn!("Could not determine hostname, peer pools will not skip this host");
            });
        }
        name
    }

    fn lookup_ipv4(&self, host: &str) -> Option<Ipv4Addr> {
        if let Ok(addr) = host.parse::<Ipv4Addr>() {
            return Some(addr);
        }

        (host, 0)
            .to_socket_addrs()
            .ok()?
            .find_map(|addr| match addr.ip() {
                IpAddr::V4(v4) => Some(v4),
                IpAddr::V6(_) => None,
            })
    }
}

/// Resolver with a fixed hostname and lookup table.
#[derive(Debug, Default, Clone)]
pub struct StaticResolver {
    hostname: Option<String>,
    hosts: HashMap<String, Ipv4Addr>,
}

impl StaticResolver {
    pub fn new(hostname: Option<&str>) -> Self {
        Self {
            hostname: hostname.map(str::to_string),
            hosts: HashMap::new(),
        }
    }

    pub fn with_host(mut self, name: &str, addr: Ipv4Addr) -> Self {
        self.hosts.insert(name.to_ascii_lowercase(), addr);
        self
    }
}

impl HostResolver for StaticResolver {
    fn hostname(&self) -> Option<String> {
        self.hostname.clone()
    }

    fn lookup_ipv4(&self, host: &str) -> Option<Ipv4Addr> {
        host.parse::<Ipv4Addr>()
            .ok()
            .or_else(|| self.hosts.get(&host.to_ascii_lowercase()).copied())
    }
}
