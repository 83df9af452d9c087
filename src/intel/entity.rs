//! Remote-endpoint descriptors.
//!
//! Each communication owns one `Entity`. It starts empty and is filled in
//! later by the reputation subsystem (domain, geo, ASN lookups), which lives
//! outside this crate.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// What is known about the remote side of a communication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub domain: Option<String>,
    pub ip: Option<IpAddr>,
    pub protocol: Option<u8>,
    pub port: Option<u16>,
    pub country: Option<String>,
    pub asn: Option<u32>,
    /// Set once the reputation subsystem has looked at this entity.
    pub fetched: bool,
}

impl Entity {
    /// A zero-value descriptor, eligible for later enrichment.
    pub fn init() -> Self {
        Self::default()
    }

    pub fn is_enriched(&self) -> bool {
        self.fetched
    }
}

/// Produces the entity attached to every new communication.
///
/// The registry calls this on every lookup, outside its shard lock, and
/// discards the result when the record already exists. Keep it cheap.
pub trait EntityFactory: Send + Sync {
    fn new_entity(&self) -> Entity;
}

/// Hands out empty entities.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultEntityFactory;

impl EntityFactory for DefaultEntityFactory {
    fn new_entity(&self) -> Entity {
        Entity::init()
    }
}
