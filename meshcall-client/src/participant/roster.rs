use meshcall_core::PeerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterEntry {
    Local,
    Remote(PeerId),
}

/// Participants whose media can be shown, in arrival order. The local
/// entry always comes first.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_local(&mut self) {
        if !self.entries.contains(&RosterEntry::Local) {
            self.entries.insert(0, RosterEntry::Local);
        }
    }

    pub fn add_remote(&mut self, peer_id: PeerId) -> bool {
        let entry = RosterEntry::Remote(peer_id);
        if self.entries.contains(&entry) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn remove(&mut self, peer_id: &PeerId) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|entry| *entry != RosterEntry::Remote(*peer_id));
        self.entries.len() != before
    }

    /// Drops every remote entry.
    pub fn retain_local(&mut self) {
        self.entries.retain(|entry| *entry == RosterEntry::Local);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.entries.contains(&RosterEntry::Remote(*peer_id))
    }

    pub fn remote_ids(&self) -> Vec<PeerId> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                RosterEntry::Remote(peer_id) => Some(*peer_id),
                RosterEntry::Local => None,
            })
            .collect()
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
