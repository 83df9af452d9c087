//! Attribution of packets whose owning process could not be found.
//!
//! When process identification fails, the packet is charged to the sentinel
//! "unknown" process and a scope derived from its direction and the remote
//! address. The resulting record carries a fail-closed verdict and a fixed
//! reason, and is what the pipeline enforces for untrusted traffic.

use log::Level;
use std::sync::Arc;

use crate::config::RegistryConfig;
use crate::intel::Entity;
use crate::netguard_log;
use crate::process::{Process, unknown_process};

use super::netutils::{Classifier, NetutilsClassifier};
use super::registry::{CommunicationStore, MemoryStore};
use super::scope::resolve_or_restrict;
use super::{Communication, Packet, Scope};

pub struct UnknownAttributor<C = NetutilsClassifier, S = MemoryStore> {
    classifier: C,
    store: Arc<S>,
    owner: Arc<Process>,
}

impl UnknownAttributor {
    /// Built-in classifier, an in-memory store sized from `cfg`, and the
    /// process-wide sentinel owner.
    pub fn from_config(cfg: &RegistryConfig) -> Self {
        Self::new(
            NetutilsClassifier,
            Arc::new(MemoryStore::from_config(cfg)),
            Arc::clone(unknown_process()),
        )
    }
}

impl<C, S> UnknownAttributor<C, S>
where
    C: Classifier,
    S: CommunicationStore,
{
    pub fn new(classifier: C, store: Arc<S>, owner: Arc<Process>) -> Self {
        Self { classifier, store, owner }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn owner(&self) -> &Arc<Process> {
        &self.owner
    }

    /// Scope of a packet: locality of the source address when inbound, of
    /// the destination when outbound.
    pub fn scope_of(&self, pkt: &dyn Packet) -> Scope {
        let direction = pkt.direction();
        let remote = pkt.remote_ip();
        let locality = self.classifier.classify(remote);
        if locality.is_none() {
            netguard_log!(
                Level::Warn,
                "unknown",
                "could not classify {}, using most restrictive {:?} scope",
                remote,
                direction
            );
        }
        resolve_or_restrict(direction, locality)
    }

    /// Return the communication for a packet of unknown owner. Never fails:
    /// if the store does, a fail-closed record is returned without being
    /// registered.
    pub fn attribute(&self, pkt: &dyn Packet) -> Arc<Communication> {
        let scope = self.scope_of(pkt);
        match self.store.get_or_create(&self.owner, scope, pkt) {
            Ok(comm) => comm,
            Err(e) => {
                netguard_log!(
                    Level::Error,
                    "unknown",
                    "store failed for scope {}: {}; returning unregistered fail-closed record",
                    scope,
                    e
                );
                metrics::counter!("netguard_store_failures_total").increment(1);
                Arc::new(Communication::unknown(pkt, scope, &self.owner, Entity::init()))
            }
        }
    }
}
