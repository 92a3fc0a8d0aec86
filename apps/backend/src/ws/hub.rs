use actix::Addr;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::services::room::RoomActor;

/// Live rooms by code. Entries are added by the lobby and removed by the
/// room actor itself when it stops.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: DashMap<String, Addr<RoomActor>>,
}

/// Room codes are matched case-insensitively.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    pub fn get(&self, code: &str) -> Option<Addr<RoomActor>> {
        self.rooms
            .get(&normalize_code(code))
            .map(|entry| entry.value().clone())
    }

    /// Draw codes from `next_code` until one is free, then start the room
    /// under it. The slot is held while `start` runs, so two creators can
    /// never share a code.
    pub fn insert_new(
        &self,
        mut next_code: impl FnMut() -> String,
        start: impl FnOnce(String) -> Addr<RoomActor>,
    ) -> (String, Addr<RoomActor>) {
        loop {
            let code = normalize_code(&next_code());
            if let Entry::Vacant(slot) = self.rooms.entry(code.clone()) {
                let addr = start(code.clone());
                slot.insert(addr.clone());
                return (code, addr);
            }
        }
    }

    /// Drop `code` if it still points at `addr`.
    pub fn remove(&self, code: &str, addr: &Addr<RoomActor>) {
        self.rooms
            .remove_if(&normalize_code(code), |_, current| current == addr);
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
