//! Communication records.
//!
//! A `Communication` groups the flows of one process within one scope for
//! policy purposes. Records are shared (`Arc`) between every packet worker
//! that hits the same registry key, so everything except the entity is
//! immutable after construction.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    sync::{Arc, Weak},
};

use crate::constants::REASON_UNKNOWN_PROCESS;
use crate::intel::Entity;
use crate::process::Process;

use super::{Direction, Packet, Scope, Verdict};

#[derive(Debug)]
pub struct Communication {
    scope: Scope,
    entity: Mutex<Entity>,
    direction: Direction,
    verdict: Verdict,
    reason: String,
    process: Weak<Process>,
    pid: i32,
    inspect: bool,
    first_link_established: i64,
}

impl Communication {
    /// Build the fail-closed record for a packet whose owner is unknown:
    /// Drop when inbound, Block when outbound, never inspected.
    pub fn unknown(pkt: &dyn Packet, scope: Scope, process: &Arc<Process>, entity: Entity) -> Self {
        let direction = pkt.direction();
        Self {
            scope,
            entity: Mutex::new(entity),
            direction,
            verdict: Verdict::fail_closed(direction),
            reason: REASON_UNKNOWN_PROCESS.to_owned(),
            process: Arc::downgrade(process),
            pid: process.pid(),
            inspect: false,
            first_link_established: Utc::now().timestamp(),
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn inspect(&self) -> bool {
        self.inspect
    }

    /// Unix seconds at which the record was created.
    pub fn first_link_established(&self) -> i64 {
        self.first_link_established
    }

    /// Pid of the owning process, kept even if the process record is gone.
    pub fn pid(&self) -> i32 {
        self.pid
    }

    /// The owning process, if it is still alive.
    pub fn process(&self) -> Option<Arc<Process>> {
        self.process.upgrade()
    }

    /// Locks the entity, for the reputation subsystem to enrich it.
    pub fn entity(&self) -> MutexGuard<'_, Entity> {
        self.entity.lock()
    }

    /// Audit view of the record.
    pub fn to_event(&self) -> CommunicationEvent {
        CommunicationEvent {
            ts: Utc::now(),
            pid: self.pid,
            scope: self.scope,
            direction: self.direction,
            verdict: self.verdict,
            reason: self.reason.clone(),
            inspect: self.inspect,
            first_link_established: self.first_link_established,
            entity: self.entity().clone(),
        }
    }
}

impl fmt::Display for Communication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.process() {
            Some(p) => write!(f, "{}/{}", p, self.scope),
            None => write!(f, "<gone>:{}/{}", self.pid, self.scope),
        }
    }
}

/// Serializable snapshot of a communication, for logs and audit sinks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunicationEvent {
    pub ts: DateTime<Utc>,
    pub pid: i32,
    pub scope: Scope,
    pub direction: Direction,
    pub verdict: Verdict,
    pub reason: String,
    pub inspect: bool,
    pub first_link_established: i64,
    pub entity: Entity,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{IpProtocol, PacketInfo};

    fn outbound() -> PacketInfo {
        PacketInfo::outbound(
            IpProtocol::Tcp,
            "10.0.0.2".parse().unwrap(),
            40000,
            "8.8.8.8".parse().unwrap(),
            443,
        )
    }

    #[test]
    fn unknown_record_is_fail_closed() {
        let owner = Arc::new(Process::unknown());
        let comm = Communication::unknown(&outbound(), Scope::PeerInternet, &owner, Entity::init());

        assert_eq!(comm.verdict(), Verdict::Block);
        assert_eq!(comm.direction(), Direction::Outbound);
        assert_eq!(comm.reason(), REASON_UNKNOWN_PROCESS);
        assert!(!comm.inspect());
        assert!(comm.first_link_established() > 0);
        assert!(Arc::ptr_eq(&comm.process().unwrap(), &owner));
        assert_eq!(comm.to_string(), "Unknown:-1/PI");
    }

    #[test]
    fn entity_can_be_enriched_in_place() {
        let owner = Arc::new(Process::unknown());
        let comm = Communication::unknown(&outbound(), Scope::PeerInternet, &owner, Entity::init());
        {
            let mut entity = comm.entity();
            entity.domain = Some("dns.google.".into());
            entity.fetched = true;
        }
        assert!(comm.entity().is_enriched());
        assert_eq!(comm.to_event().entity.domain.as_deref(), Some("dns.google."));
    }

    #[test]
    fn weak_owner_does_not_keep_process_alive() {
        let owner = Arc::new(Process::new(77, "gone", None));
        let comm = Communication::unknown(&outbound(), Scope::PeerInternet, &owner, Entity::init());
        drop(owner);
        assert!(comm.process().is_none());
        assert_eq!(comm.pid(), 77);
        assert_eq!(comm.to_string(), "<gone>:77/PI");
    }

    #[test]
    fn event_serializes_to_json() {
        let owner = Arc::new(Process::unknown());
        let comm = Communication::unknown(&outbound(), Scope::PeerInternet, &owner, Entity::init());
        let json = serde_json::to_string(&comm.to_event()).unwrap();
        assert!(json.contains("\"scope\":\"PI\""), "{json}");
        assert!(json.contains("\"verdict\":\"Block\""), "{json}");
        let back: CommunicationEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.reason, REASON_UNKNOWN_PROCESS);
    }
}
