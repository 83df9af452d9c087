//! Communication scopes.
//!
//! A scope combines the traffic direction with the locality tier of the
//! remote address. It is half of the registry key and a policy dimension.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::netutils::IpScope;
use super::packet::Direction;

/// The eight canonical scope labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Scope {
    #[serde(rename = "IH")]
    IncomingHost,
    #[serde(rename = "IL")]
    IncomingLAN,
    #[serde(rename = "II")]
    IncomingInternet,
    #[serde(rename = "IX")]
    IncomingInvalid,
    #[serde(rename = "PH")]
    PeerHost,
    #[serde(rename = "PL")]
    PeerLAN,
    #[serde(rename = "PI")]
    PeerInternet,
    #[serde(rename = "PX")]
    PeerInvalid,
}

impl Scope {
    pub const ALL: [Scope; 8] = [
        Scope::IncomingHost,
        Scope::IncomingLAN,
        Scope::IncomingInternet,
        Scope::IncomingInvalid,
        Scope::PeerHost,
        Scope::PeerLAN,
        Scope::PeerInternet,
        Scope::PeerInvalid,
    ];

    /// Short stable code, used in keys, logs and serialized events.
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::IncomingHost => "IH",
            Scope::IncomingLAN => "IL",
            Scope::IncomingInternet => "II",
            Scope::IncomingInvalid => "IX",
            Scope::PeerHost => "PH",
            Scope::PeerLAN => "PL",
            Scope::PeerInternet => "PI",
            Scope::PeerInvalid => "PX",
        }
    }

    pub fn is_incoming(self) -> bool {
        matches!(
            self,
            Scope::IncomingHost | Scope::IncomingLAN | Scope::IncomingInternet | Scope::IncomingInvalid
        )
    }

    pub fn direction(self) -> Direction {
        if self.is_incoming() { Direction::Inbound } else { Direction::Outbound }
    }

    /// The label used when the remote locality is unknown.
    pub fn most_restrictive(direction: Direction) -> Scope {
        match direction {
            Direction::Inbound => Scope::IncomingInvalid,
            Direction::Outbound => Scope::PeerInvalid,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scope code '{0}'")]
pub struct UnknownScope(pub String);

impl FromStr for Scope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::ALL
            .into_iter()
            .find(|scope| scope.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownScope(s.to_owned()))
    }
}

/// Resolve the scope for a direction and the locality of the remote address
/// (source when inbound, destination when outbound).
pub fn resolve(direction: Direction, locality: IpScope) -> Scope {
    use IpScope::*;

    match (direction, locality) {
        (Direction::Inbound, HostLocal) => Scope::IncomingHost,
        (Direction::Inbound, LinkLocal | SiteLocal | LocalMulticast) => Scope::IncomingLAN,
        (Direction::Inbound, Global | GlobalMulticast) => Scope::IncomingInternet,
        (Direction::Inbound, Invalid) => Scope::IncomingInvalid,
        (Direction::Outbound, HostLocal) => Scope::PeerHost,
        (Direction::Outbound, LinkLocal | SiteLocal | LocalMulticast) => Scope::PeerLAN,
        (Direction::Outbound, Global | GlobalMulticast) => Scope::PeerInternet,
        (Direction::Outbound, Invalid) => Scope::PeerInvalid,
    }
}

/// Like [`resolve`], but an unclassifiable address lands in the direction's
/// `…Invalid` scope.
pub fn resolve_or_restrict(direction: Direction, locality: Option<IpScope>) -> Scope {
    match locality {
        Some(locality) => resolve(direction, locality),
        None => Scope::most_restrictive(direction),
    }
}
