use parley_core::{ConnectionId, RoomId};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Membership table owned by the relay loop.
///
/// `rooms` and `memberships` always mirror each other, and a room with no
/// members is removed rather than kept around empty.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, HashSet<ConnectionId>>,
    memberships: HashMap<ConnectionId, HashSet<RoomId>>,
}

/// What was left behind in one room after a connection went away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room_id: RoomId,
    pub remaining: Vec<ConnectionId>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `peer_id` to `room_id`, creating the room if needed.
    /// Returns `false` when the peer was already a member.
    pub fn join(&mut self, peer_id: ConnectionId, room_id: &RoomId) -> bool {
        let members = self.rooms.entry(room_id.clone()).or_insert_with(|| {
            debug!("Creating room '{}'", room_id);
            HashSet::new()
        });
        let added = members.insert(peer_id);

        self.memberships
            .entry(peer_id)
            .or_default()
            .insert(room_id.clone());

        added
    }

    /// Everyone in `room_id` except `peer_id`. Unknown rooms yield nothing.
    pub fn peers_except(&self, room_id: &RoomId, peer_id: &ConnectionId) -> Vec<ConnectionId> {
        let Some(members) = self.rooms.get(room_id) else {
            return Vec::new();
        };
        members.iter().filter(|id| *id != peer_id).copied().collect()
    }

    /// Removes `peer_id` from every room it joined and drops rooms that end up empty.
    pub fn leave_all(&mut self, peer_id: &ConnectionId) -> Vec<Departure> {
        let Some(rooms) = self.memberships.remove(peer_id) else {
            return Vec::new();
        };

        let mut departures = Vec::with_capacity(rooms.len());
        for room_id in rooms {
            let Some(members) = self.rooms.get_mut(&room_id) else {
                continue;
            };
            members.remove(peer_id);

            if members.is_empty() {
                debug!("Room '{}' is empty, dropping it", room_id);
                self.rooms.remove(&room_id);
                departures.push(Departure {
                    room_id,
                    remaining: Vec::new(),
                });
            } else {
                let remaining = members.iter().copied().collect();
                departures.push(Departure { room_id, remaining });
            }
        }
        departures
    }

    #[cfg(test)]
    pub fn rooms_of(&self, peer_id: &ConnectionId) -> Vec<RoomId> {
        self.memberships
            .get(peer_id)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn contains_room(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Number of distinct connections that are in at least one room.
    pub fn member_count(&self) -> usize {
        self.memberships.len()
    }
}
