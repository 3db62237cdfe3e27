//! IPv4 CIDR blocks.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use armnet_core::Error;

const MAX_LENGTH: u8 = 32;

/// An IPv4 network in CIDR notation, e.g. `10.0.0.0/16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ipv4Cidr {
    addr: Ipv4Addr,
    len: u8,
}

fn mask(len: u8) -> u32 {
    if len == 0 {
        0
    } else {
        u32::MAX << (MAX_LENGTH - len)
    }
}

impl Ipv4Cidr {
    /// Network address (host bits cleared).
    #[must_use]
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.addr) & mask(self.len))
    }

    /// Prefix length.
    #[must_use]
    pub const fn prefix_len(&self) -> u8 {
        self.len
    }

    /// Whether `ip` falls inside the block.
    #[must_use]
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        u32::from(ip) & mask(self.len) == u32::from(self.addr) & mask(self.len)
    }

    /// Whether `other` lies entirely inside this block.
    #[must_use]
    pub fn contains_cidr(&self, other: &Self) -> bool {
        other.len >= self.len && self.contains(other.network())
    }
}

impl FromStr for Ipv4Cidr {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidArgument(format!("`{input}` is not an IPv4 CIDR block"));
        let (addr, len) = input.trim().split_once('/').ok_or_else(invalid)?;
        let addr: Ipv4Addr = addr.parse().map_err(|_| invalid())?;
        let len: u8 = len.parse().map_err(|_| invalid())?;
        if len > MAX_LENGTH {
            return Err(invalid());
        }
        Ok(Self { addr, len })
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.len)
    }
}

/// Returns true when `ip` parses and falls inside the `cidr` string.
#[must_use]
pub fn cidr_contains(cidr: &str, ip: &str) -> bool {
    match (cidr.parse::<Ipv4Cidr>(), ip.parse::<Ipv4Addr>()) {
        (Ok(block), Ok(ip)) => block.contains(ip),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes() {
        let cidr: Ipv4Cidr = "10.1.2.3/16".parse().unwrap();
        assert_eq!(cidr.to_string(), "10.1.0.0/16");
        assert_eq!(cidr.prefix_len(), 16);
    }

    #[test]
    fn rejects_garbage() {
        assert!("10.0.0.0".parse::<Ipv4Cidr>().is_err());
        assert!("10.0.0.0/33".parse::<Ipv4Cidr>().is_err());
        assert!("nope/8".parse::<Ipv4Cidr>().is_err());
    }

    #[test]
    fn containment() {
        let cidr: Ipv4Cidr = "10.0.0.0/16".parse().unwrap();
        assert!(cidr.contains(Ipv4Addr::new(10, 0, 255, 1)));
        assert!(!cidr.contains(Ipv4Addr::new(10, 1, 0, 1)));
        assert!(cidr.contains_cidr(&"10.0.4.0/24".parse().unwrap()));
        assert!(!cidr.contains_cidr(&"10.0.0.0/8".parse().unwrap()));
        assert!("0.0.0.0/0".parse::<Ipv4Cidr>().unwrap().contains(Ipv4Addr::new(8, 8, 8, 8)));
    }

    #[test]
    fn cidr_contains_ignores_invalid_input() {
        assert!(cidr_contains("192.168.0.0/24", "192.168.0.10"));
        assert!(!cidr_contains("192.168.0.0/24", "not-an-ip"));
    }
}
