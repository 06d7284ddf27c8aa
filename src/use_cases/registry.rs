// Connection bookkeeping and side assignment for the single match.

use crate::domain::{Role, Side};
use axum::extract::ws::Utf8Bytes;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::mpsc;

/// How a newly joined connection is given a side once both are taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SidePolicy {
    /// A third connection co-controls `left` alongside the existing holder.
    #[default]
    OverflowToLeft,
    /// Only two controllers; later connections watch as spectators.
    Exclusive,
}

/// Result of registering a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub conn_id: u64,
    pub role: Role,
}

pub(crate) struct ConnectionEntry {
    // Bounded queue drained by the connection's socket task.
    pub(crate) outbound: mpsc::Sender<Utf8Bytes>,
    pub(crate) role: Role,
}

/// Live connections keyed by id.
///
/// Each entry holds both the outbound sink and the role, so a connection and
/// its side are always added and removed together.
pub struct ConnectionRegistry {
    policy: SidePolicy,
    next_id: u64,
    entries: HashMap<u64, ConnectionEntry>,
}

impl ConnectionRegistry {
    pub fn new(policy: SidePolicy) -> Self {
        Self {
            policy,
            next_id: 1,
            entries: HashMap::new(),
        }
    }

    /// Registers a connection and assigns its role. Never fails.
    pub fn connect(&mut self, outbound: mpsc::Sender<Utf8Bytes>) -> Assignment {
        let conn_id = self.next_id;
        self.next_id += 1;

        let role = self.choose_role();
        self.entries.insert(conn_id, ConnectionEntry { outbound, role });

        Assignment { conn_id, role }
    }

    /// Removes a connection. Returns false if it was already gone.
    pub fn disconnect(&mut self, conn_id: u64) -> bool {
        self.entries.remove(&conn_id).is_some()
    }

    pub fn role_of(&self, conn_id: u64) -> Option<Role> {
        self.entries.get(&conn_id).map(|e| e.role)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn policy(&self) -> SidePolicy {
        self.policy
    }

    /// Sides held by at least one live connection, `left` first.
    pub fn active_sides(&self) -> Vec<Side> {
        self.entries
            .values()
            .filter_map(|e| e.role.side())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn is_held(&self, side: Side) -> bool {
        self.entries.values().any(|e| e.role == Role::Player(side))
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (u64, &ConnectionEntry)> {
        self.entries.iter().map(|(id, e)| (*id, e))
    }

    fn choose_role(&self) -> Role {
        if !self.is_held(Side::Left) {
            return Role::Player(Side::Left);
        }
        if !self.is_held(Side::Right) {
            return Role::Player(Side::Right);
        }
        match self.policy {
            SidePolicy::OverflowToLeft => Role::Player(Side::Left),
            SidePolicy::Exclusive => Role::Spectator,
        }
    }
}
