use meshcall_core::{PeerId, RoomId};
use std::collections::{BTreeMap, BTreeSet};

/// Who is in which room. Owned by the coordinator and mutated only from its
/// event loop.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: BTreeMap<RoomId, BTreeSet<PeerId>>,
    memberships: BTreeMap<PeerId, BTreeSet<RoomId>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` without touching state if the peer is already a member.
    #[must_use]
    pub fn join(&mut self, peer_id: PeerId, room: RoomId) -> bool {
        if !self.rooms.entry(room.clone()).or_default().insert(peer_id) {
            return false;
        }

        self.memberships.entry(peer_id).or_default().insert(room);
        true
    }

    pub fn leave(&mut self, peer_id: &PeerId, room: &RoomId) -> bool {
        let Some(members) = self.rooms.get_mut(room) else {
            return false;
        };
        if !members.remove(peer_id) {
            return false;
        }
        if members.is_empty() {
            self.rooms.remove(room);
        }

        if let Some(rooms) = self.memberships.get_mut(peer_id) {
            rooms.remove(room);
            if rooms.is_empty() {
                self.memberships.remove(peer_id);
            }
        }
        true
    }

    /// Drops the peer from every room and returns the rooms it was in.
    pub fn leave_all(&mut self, peer_id: &PeerId) -> Vec<RoomId> {
        let rooms = self.rooms_of(peer_id);
        for room in &rooms {
            self.leave(peer_id, room);
        }
        rooms
    }

    pub fn members_of(&self, room: &RoomId) -> Vec<PeerId> {
        self.rooms
            .get(room)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn rooms_of(&self, peer_id: &PeerId) -> Vec<RoomId> {
        self.memberships
            .get(peer_id)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_member(&self, peer_id: &PeerId, room: &RoomId) -> bool {
        self.rooms
            .get(room)
            .is_some_and(|members| members.contains(peer_id))
    }

    /// Non-empty rooms whose id is a canonical v4 UUID. Private rooms with
    /// other names still work, they just never show up here.
    pub fn list_rooms(&self) -> Vec<RoomId> {
        self.rooms
            .keys()
            .filter(|room| room.is_discoverable())
            .cloned()
            .collect()
    }
}
