//! Network side of the filter core: locality, scopes, verdicts and the
//! communication registry.

pub mod communication;
pub mod netutils;
pub mod packet;
pub mod registry;
pub mod scope;
pub mod unknown;
pub mod verdict;

pub use communication::{Communication, CommunicationEvent};
pub use netutils::{Classifier, IpScope, NetutilsClassifier, classify_ip};
pub use packet::{Direction, IpProtocol, Packet, PacketInfo};
pub use registry::{CommKey, CommunicationStore, MemoryStore, StoreError};
pub use scope::{Scope, resolve, resolve_or_restrict};
pub use unknown::UnknownAttributor;
pub use verdict::Verdict;
