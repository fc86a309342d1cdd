use crate::core::error::ActionError;
use crate::models::peer::Peer;
use crate::stores::peer_pool::PeerPool;
use crate::validation::resolver::HostResolver;
use std::net::Ipv4Addr;
use tracing::{debug, info, warn};

/// Accepted byte-size suffixes and their multipliers
const BYTE_SUFFIXES: &[(&str, u64)] = &[
    ("kb", 1_000),
    ("mb", 1_000_000),
    ("gb", 1_000_000_000),
    ("tb", 1_000_000_000_000),
    ("kib", 1 << 10),
    ("mib", 1 << 20),
    ("gib", 1 << 30),
    ("tib", 1 << 40),
];

/// Result of parsing a boolean attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParsedBoolean {
    pub value: bool,
    /// Whether the attribute held a recognized boolean literal
    pub is_found: bool,
}

/// Parse a base-10 unsigned integer the lenient way the graph format always has:
/// leading whitespace and a sign are skipped, parsing stops at the first
/// non-digit, no digits yields 0, and overflow saturates. A leading `-`
/// negates modulo 2^64, so `-1` is `u64::MAX`.
pub fn parse_decimal_u64(s: &str) -> u64 {
    let s = s.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .try_fold(0u64, |acc, b| {
            acc.checked_mul(10)?.checked_add(u64::from(b - b'0'))
        });

    match value {
        Some(v) if negative => v.wrapping_neg(),
        Some(v) => v,
        None => u64::MAX,
    }
}

/// Resolve a host token to an IPv4 address.
///
/// Unresolvable hosts come back as the NONE sentinel (255.255.255.255).
fn to_address<R: HostResolver>(host: &str, resolver: &R) -> Ipv4Addr {
    if host
        .get(..9)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("localhost"))
    {
        Ipv4Addr::LOCALHOST
    } else if host.as_bytes().starts_with(b"0.0.0.0") {
        Ipv4Addr::UNSPECIFIED
    } else {
        match resolver.lookup_ipv4(host) {
            Some(addr) => addr,
            None => {
                warn!(host = %host, "Error resolving host address");
                Ipv4Addr::BROADCAST
            }
        }
    }
}

/// Parse a single `hostname:port` peer.
///
/// Returns `Ok(None)` when the host is this machine's own hostname; a node
/// never serves itself. Port 0 (including a non-numeric port) is accepted
/// here and dropped by [`parse_peers`].
pub fn parse_peer<R: HostResolver>(
    attribute: &str,
    peer_str: &str,
    resolver: &R,
) -> Result<Option<Peer>, ActionError> {
    let (host, port_str) = peer_str.split_once(':').ok_or_else(|| {
        ActionError::InvalidContent(format!(
            "expected peer syntax 'hostname:port' for attribute '{}'",
            attribute
        ))
    })?;

    if let Some(myname) = resolver.hostname() {
        if myname.eq_ignore_ascii_case(host) {
            info!(
                attribute = attribute,
                host = %host,
                "Refusing to place my address in server pool"
            );
            return Ok(None);
        }
    }

    let address = to_address(host, resolver);

    let port = u16::try_from(parse_decimal_u64(port_str)).map_err(|_| {
        ActionError::InvalidContent(format!(
            "invalid peer '{}' for port part of attribute '{}', \
             expected 16 bit unsigned integer",
            peer_str, attribute
        ))
    })?;

    let peer = Peer::new(address, port);

    if !peer.has_usable_address() {
        return Err(ActionError::InvalidContent(format!(
            "invalid peer '{}' for host part of attribute '{}', \
             expected 'localhost', '127.0.0.1', or valid node hostname",
            peer_str, attribute
        )));
    }

    debug!(address = %address, port = port, peer = %peer_str, "Parsed peer");

    Ok(Some(peer))
}

/// Parse a comma-separated peer list into `pool`.
///
/// Stops at the first invalid element; peers added before it stay in the
/// pool, so callers discard the pool on error.
pub fn parse_peers<R: HostResolver>(
    attribute: &str,
    peers_str: &str,
    resolver: &R,
    pool: &mut PeerPool,
) -> Result<(), ActionError> {
    for token in peers_str.split(',') {
        match parse_peer(attribute, token, resolver)? {
            Some(peer) if peer.is_usable() => pool.add(peer),
            _ => {}
        }
    }

    Ok(())
}

/// Parse a byte count such as `10240` or `10 KiB`.
pub fn parse_bytes(attribute: &str, byte_str: &str) -> Result<u64, ActionError> {
    let (bytes_token, suffix_token) = match byte_str.split_once(' ') {
        Some((bytes, suffix)) => (bytes, Some(suffix)),
        None => (byte_str, None),
    };

    if let Some(c) = bytes_token.chars().find(|c| !c.is_ascii_digit()) {
        return Err(ActionError::InvalidContent(format!(
            "non-digit byte '{}' in byte string '{}' for attribute '{}', \
             expected format like '10240' or '10 KiB'",
            c, byte_str, attribute
        )));
    }

    let too_large = || {
        ActionError::InvalidContent(format!(
            "byte string '{}' for attribute '{}' does not fit in 64 bits",
            byte_str, attribute
        ))
    };

    let bytes = if bytes_token.is_empty() {
        0
    } else {
        bytes_token.parse::<u64>().map_err(|_| too_large())?
    };

    let bytes = match suffix_token {
        None => bytes,
        Some(suffix) => {
            let multiplier = BYTE_SUFFIXES
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(suffix))
                .map(|&(_, multiplier)| multiplier)
                .ok_or_else(|| {
                    ActionError::InvalidContent(format!(
                        "invalid bytes suffix '{}' in byte string '{}' for attribute '{}', \
                         expected one of: 'kib','mib','gib','tib','kb','mb','gb', or 'tb'",
                        suffix, byte_str, attribute
                    ))
                })?;
            bytes.checked_mul(multiplier).ok_or_else(too_large)?
        }
    };

    debug!(bytes = bytes, input = %byte_str, "Parsed byte string");

    Ok(bytes)
}

/// Parse `true`/`1` or `false`/`0`, ignoring case.
pub fn parse_boolean(attribute: &str, boolean_str: &str) -> Result<ParsedBoolean, ActionError> {
    let value = if boolean_str.eq_ignore_ascii_case("true") || boolean_str == "1" {
        true
    } else if boolean_str.eq_ignore_ascii_case("false") || boolean_str == "0" {
        false
    } else {
        return Err(ActionError::InvalidContent(format!(
            "invalid content for attribute '{}', expected boolean value 'true' or 'false'",
            attribute
        )));
    };

    debug!(value = value, input = %boolean_str, "Parsed boolean");

    Ok(ParsedBoolean {
        value,
        is_found: true,
    })
}
