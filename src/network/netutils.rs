//! IP locality classification.
//!
//! Maps an address onto the coarse locality classes the filter reasons
//! about. IPv4-mapped IPv6 addresses are classified as their IPv4 form.

use serde::{Deserialize, Serialize};
use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
};

/// Locality of an IP address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IpScope {
    Invalid,
    HostLocal,
    LinkLocal,
    SiteLocal,
    Global,
    LocalMulticast,
    GlobalMulticast,
}

impl IpScope {
    pub const ALL: [IpScope; 7] = [
        IpScope::Invalid,
        IpScope::HostLocal,
        IpScope::LinkLocal,
        IpScope::SiteLocal,
        IpScope::Global,
        IpScope::LocalMulticast,
        IpScope::GlobalMulticast,
    ];

    pub fn is_localhost(self) -> bool {
        self == IpScope::HostLocal
    }

    /// Link-local, site-local or local multicast.
    pub fn is_lan(self) -> bool {
        matches!(self, IpScope::LinkLocal | IpScope::SiteLocal | IpScope::LocalMulticast)
    }

    pub fn is_global(self) -> bool {
        matches!(self, IpScope::Global | IpScope::GlobalMulticast)
    }
}

impl fmt::Display for IpScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Supplies the locality of an address.
///
/// `None` means the address could not be placed in any class; callers treat
/// that as the most restrictive case.
pub trait Classifier: Send + Sync {
    fn classify(&self, ip: IpAddr) -> Option<IpScope>;
}

/// The built-in classifier backed by [`classify_ip`]. Never returns `None`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NetutilsClassifier;

impl Classifier for NetutilsClassifier {
    fn classify(&self, ip: IpAddr) -> Option<IpScope> {
        Some(classify_ip(ip))
    }
}

/// Classify an address into its locality.
pub fn classify_ip(ip: IpAddr) -> IpScope {
    match ip {
        IpAddr::V4(v4) => classify_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => classify_v4(v4),
            None => classify_v6(v6),
        },
    }
}

fn classify_v4(ip: Ipv4Addr) -> IpScope {
    let [a, b, _, _] = ip.octets();
    match (a, b) {
        // 0.0.0.0/8
        (0, _) => IpScope::Invalid,
        // 127.0.0.0/8
        (127, _) => IpScope::HostLocal,
        // 169.254.0.0/16
        (169, 254) => IpScope::LinkLocal,
        // 10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16
        (10, _) => IpScope::SiteLocal,
        (172, b) if b & 0xf0 == 16 => IpScope::SiteLocal,
        (192, 168) => IpScope::SiteLocal,
        // 100.64.0.0/10 carrier-grade NAT
        (100, b) if b & 0xc0 == 64 => IpScope::SiteLocal,
        // 224.0.0.0/8
        (224, _) => IpScope::LocalMulticast,
        // 225.0.0.0 - 239.255.255.255
        (225..=239, _) => IpScope::GlobalMulticast,
        // 255.255.255.255 is a local broadcast, the rest of 240/4 is reserved
        _ if ip.is_broadcast() => IpScope::LocalMulticast,
        (240..=255, _) => IpScope::Invalid,
        _ => IpScope::Global,
    }
}

fn classify_v6(ip: Ipv6Addr) -> IpScope {
    let seg = ip.segments();
    if ip.is_unspecified() {
        IpScope::Invalid
    } else if ip.is_loopback() {
        IpScope::HostLocal
    } else if seg[0] & 0xfe00 == 0xfc00 {
        // fc00::/7
        IpScope::SiteLocal
    } else if seg[0] & 0xffc0 == 0xfe80 {
        // fe80::/10
        IpScope::LinkLocal
    } else if seg[0] & 0xff00 == 0xff00 {
        // ff0X:: with scope nibble up to site-local (5) stays local
        if seg[0] & 0x000f <= 0x5 {
            IpScope::LocalMulticast
        } else {
            IpScope::GlobalMulticast
        }
    } else {
        IpScope::Global
    }
}
