//! Concurrent get-or-create store of communications.
//!
//! Records are keyed by `(pid, scope)`; at most one record per key is ever
//! live. The in-memory store shards its map so packet workers on unrelated
//! flows rarely contend.
//!
//! ## Lock order
//!
//! A shard lock is held only while the key is looked up or inserted, and is
//! released before the owning process's counter is incremented. The counter
//! is a lock-free atomic, so the two shared resources are never held at the
//! same time.

use dashmap::{DashMap, mapref::entry::Entry};
use fxhash::FxBuildHasher;
use log::Level;
use std::sync::Arc;
use thiserror::Error;

use crate::config::RegistryConfig;
use crate::intel::{DefaultEntityFactory, EntityFactory};
use crate::netguard_log;
use crate::process::Process;

use super::{Communication, Packet, Scope};

/// Registry key: owning process identity plus scope.
pub type CommKey = (i32, Scope);

/// Failures a store may report. The in-memory store has none; stores backed
/// by persistence do.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The get-or-create contract shared by every communication store.
pub trait CommunicationStore: Send + Sync {
    /// Return the record for `(owner, scope)`, creating the fail-closed
    /// unknown-owner record from `pkt` if there is none. Every call, hit or
    /// miss, adds one to the owner's communication counter.
    fn get_or_create(
        &self,
        owner: &Arc<Process>,
        scope: Scope,
        pkt: &dyn Packet,
    ) -> Result<Arc<Communication>, StoreError>;

    fn get(&self, pid: i32, scope: Scope) -> Option<Arc<Communication>>;
}

/// In-memory sharded store.
pub struct MemoryStore {
    map: DashMap<CommKey, Arc<Communication>, FxBuildHasher>,
    entities: Box<dyn EntityFactory>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::from_config(&RegistryConfig::default())
    }

    /// Size the map from `[registry]`.
    pub fn from_config(cfg: &RegistryConfig) -> Self {
        Self::with_entity_factory(cfg, Box::new(DefaultEntityFactory))
    }

    /// An invalid `cfg` (not run through `validate`) is replaced by the
    /// defaults rather than trusted.
    pub fn with_entity_factory(cfg: &RegistryConfig, entities: Box<dyn EntityFactory>) -> Self {
        let fallback;
        let cfg = match cfg.validate() {
            Ok(()) => cfg,
            Err(e) => {
                netguard_log!(Level::Warn, "registry", "{}; using default sizing", e);
                fallback = RegistryConfig::default();
                &fallback
            }
        };
        netguard_log!(
            Level::Debug,
            "registry",
            "new store (capacity={}, shards={})",
            cfg.initial_capacity,
            cfg.shard_amount
        );
        Self {
            map: DashMap::with_capacity_and_hasher_and_shard_amount(
                cfg.initial_capacity,
                FxBuildHasher::default(),
                cfg.shard_amount,
            ),
            entities,
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Drop the record for one key. Used by the lifecycle manager.
    pub fn remove(&self, pid: i32, scope: Scope) -> Option<Arc<Communication>> {
        self.map.remove(&(pid, scope)).map(|(_, comm)| comm)
    }

    /// Drop every record owned by `pid`. Returns how many went away.
    pub fn remove_process(&self, pid: i32) -> usize {
        // Counted inside the closure: `retain` locks one shard at a time, so
        // `len()` may move under concurrent inserts into other shards.
        let mut removed = 0;
        self.map.retain(|(owner, _), _| {
            if *owner == pid {
                removed += 1;
                false
            } else {
                true
            }
        });
        if removed > 0 {
            netguard_log!(Level::Debug, "registry", "removed {} communication(s) of pid {}", removed, pid);
        }
        removed
    }

    /// Point-in-time copy of all records.
    pub fn communications(&self) -> Vec<Arc<Communication>> {
        self.map.iter().map(|entry| Arc::clone(entry.value())).collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunicationStore for MemoryStore {
    fn get_or_create(
        &self,
        owner: &Arc<Process>,
        scope: Scope,
        pkt: &dyn Packet,
    ) -> Result<Arc<Communication>, StoreError> {
        // Built outside the shard lock so a slow factory never stalls the
        // shard; on a hit the entity is discarded.
        let entity = self.entities.new_entity();

        // The entry guard holds the shard write lock; it is dropped at the
        // end of this match, before the counter is touched.
        let (comm, created) = match self.map.entry((owner.pid(), scope)) {
            Entry::Occupied(e) => (Arc::clone(e.get()), false),
            Entry::Vacant(e) => {
                let comm = Arc::new(Communication::unknown(pkt, scope, owner, entity));
                e.insert(Arc::clone(&comm));
                (comm, true)
            }
        };

        let count = owner.add_communication();

        if created {
            metrics::counter!("netguard_unknown_communications_total", "scope" => scope.as_str())
                .increment(1);
            metrics::counter!("netguard_registry_lookups_total", "result" => "miss").increment(1);
            netguard_log!(
                Level::Info,
                "registry",
                "new communication {} verdict={} reason=\"{}\"",
                comm,
                comm.verdict(),
                comm.reason()
            );
        } else {
            metrics::counter!("netguard_registry_lookups_total", "result" => "hit").increment(1);
            netguard_log!(Level::Trace, "registry", "reusing {} (count={})", comm, count);
        }

        Ok(comm)
    }

    fn get(&self, pid: i32, scope: Scope) -> Option<Arc<Communication>> {
        self.map.get(&(pid, scope)).map(|entry| Arc::clone(entry.value()))
    }
}
