use serde::Serialize;

use crate::clock::to_seconds;

pub const OVERLAY_MAX_ENTRIES: usize = 10;

pub const SPRITE_KASHES: i32 = 3;
pub const SPRITE_KEY: i32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayType {
    Sprite,
    Number,
    NumberRange,
    InventoryItem,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayPosType {
    Normal,
    FollowActor,
}

/// A short-lived HUD element. `info0`/`info1` depend on the type: sprite
/// index, numbers being counted, text id and speaking actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Overlay {
    pub kind: OverlayType,
    pub info0: i32,
    pub x: i32,
    pub y: i32,
    pub info1: i32,
    pub pos_type: OverlayPosType,
    pub life_time: i32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OverlayList {
    slots: [Option<Overlay>; OVERLAY_MAX_ENTRIES],
}

impl OverlayList {
    /// Store in the first free slot; a full list drops the request.
    #[allow(clippy::too_many_arguments)]
    pub fn add(
        &mut self,
        kind: OverlayType,
        info0: i32,
        x: i32,
        y: i32,
        info1: i32,
        pos_type: OverlayPosType,
        seconds: i32,
        now: i32,
    ) -> Option<usize> {
        let index = self.slots.iter().position(Option::is_none)?;
        self.slots[index] = Some(Overlay {
            kind,
            info0,
            x,
            y,
            info1,
            pos_type,
            life_time: now + to_seconds(seconds),
        });
        Some(index)
    }

    pub fn find_mut(&mut self, kind: OverlayType) -> Option<&mut Overlay> {
        self.slots.iter_mut().flatten().find(|overlay| overlay.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Overlay> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Free every overlay whose lifetime ended at or before `now`.
    pub fn purge_expired(&mut self, now: i32) {
        for slot in &mut self.slots {
            if slot.map_or(false, |overlay| overlay.life_time <= now) {
                *slot = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite(list: &mut OverlayList, now: i32) -> Option<usize> {
        list.add(
            OverlayType::Sprite,
            SPRITE_KEY,
            0,
            0,
            0,
            OverlayPosType::FollowActor,
            1,
            now,
        )
    }

    #[test]
    fn list_holds_ten_entries() {
        let mut list = OverlayList::default();
        for expected in 0..OVERLAY_MAX_ENTRIES {
            assert_eq!(sprite(&mut list, 0), Some(expected));
        }
        assert_eq!(sprite(&mut list, 0), None);
        assert_eq!(list.len(), OVERLAY_MAX_ENTRIES);
    }

    #[test]
    fn expired_overlays_free_their_slot() {
        let mut list = OverlayList::default();
        sprite(&mut list, 100);
        assert_eq!(list.iter().next().map(|o| o.life_time), Some(150));
        list.purge_expired(149);
        assert_eq!(list.len(), 1);
        list.purge_expired(150);
        assert!(list.is_empty());
    }
}
