//! Packet abstraction handed over by the capture layer.

use serde::{Deserialize, Serialize};
use std::{fmt, net::IpAddr};

/// Traffic direction relative to this host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    pub fn is_inbound(self) -> bool {
        self == Direction::Inbound
    }

    pub fn is_outbound(self) -> bool {
        self == Direction::Outbound
    }
}

/// IP protocol number, with names for the common ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IpProtocol {
    Icmp,
    Tcp,
    Udp,
    Icmpv6,
    Other(u8),
}

impl From<u8> for IpProtocol {
    fn from(n: u8) -> Self {
        match n {
            1 => IpProtocol::Icmp,
            6 => IpProtocol::Tcp,
            17 => IpProtocol::Udp,
            58 => IpProtocol::Icmpv6,
            other => IpProtocol::Other(other),
        }
    }
}

impl From<IpProtocol> for u8 {
    fn from(p: IpProtocol) -> Self {
        match p {
            IpProtocol::Icmp => 1,
            IpProtocol::Tcp => 6,
            IpProtocol::Udp => 17,
            IpProtocol::Icmpv6 => 58,
            IpProtocol::Other(n) => n,
        }
    }
}

/// Header fields the filter core needs from a packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketInfo {
    pub direction: Direction,
    pub protocol: IpProtocol,
    pub src: IpAddr,
    pub dst: IpAddr,
    pub src_port: u16,
    pub dst_port: u16,
}

impl PacketInfo {
    pub fn inbound(protocol: IpProtocol, src: IpAddr, src_port: u16, dst: IpAddr, dst_port: u16) -> Self {
        Self { direction: Direction::Inbound, protocol, src, dst, src_port, dst_port }
    }

    pub fn outbound(protocol: IpProtocol, src: IpAddr, src_port: u16, dst: IpAddr, dst_port: u16) -> Self {
        Self { direction: Direction::Outbound, protocol, src, dst, src_port, dst_port }
    }
}

/// A packet seen by the filter. Capture backends implement this for their
/// own packet types.
pub trait Packet {
    fn info(&self) -> &PacketInfo;

    fn direction(&self) -> Direction {
        self.info().direction
    }

    fn is_inbound(&self) -> bool {
        self.direction().is_inbound()
    }

    fn is_outbound(&self) -> bool {
        self.direction().is_outbound()
    }

    /// The address on the far side: source for inbound, destination for
    /// outbound traffic.
    fn remote_ip(&self) -> IpAddr {
        let info = self.info();
        match info.direction {
            Direction::Inbound => info.src,
            Direction::Outbound => info.dst,
        }
    }

    /// Port on the far side, paired with [`Packet::remote_ip`].
    fn remote_port(&self) -> u16 {
        let info = self.info();
        match info.direction {
            Direction::Inbound => info.src_port,
            Direction::Outbound => info.dst_port,
        }
    }
}

impl Packet for PacketInfo {
    fn info(&self) -> &PacketInfo {
        self
    }
}

impl fmt::Display for PacketInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = if self.direction.is_inbound() { "<-" } else { "->" };
        write!(
            f,
            "{:?} {} {} {}",
            self.protocol,
            std::net::SocketAddr::new(self.src, self.src_port),
            arrow,
            std::net::SocketAddr::new(self.dst, self.dst_port)
        )
    }
}
