use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{check_index, LifeResult};

pub const NUM_GAME_FLAGS: usize = 256;
pub const MAX_INVENTORY_ITEMS: usize = 28;
pub const INVENTORY_KEYPAD: u8 = 24;
pub const GAMEFLAG_INVENTORY_DISABLED: u8 = 70;
pub const MAX_CHOICES: usize = 10;
pub const MAX_KEYS: i32 = 99;
pub const MAX_KASHES: i32 = 999;
pub const MAX_GAS: i32 = 100;
pub const MAX_CLOVER_BOXES: i32 = 10;
pub const MAGIC_POINTS_PER_LEVEL: i32 = 20;
pub const NUM_HOLOMAP_LOCATIONS: usize = 150;

/// Story progress and inventory counters shared by every scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub game_flags: Vec<u8>,
    pub inventory_flags: Vec<u8>,
    pub keys: i32,
    pub kashes: i32,
    pub gas: i32,
    pub magic_level: i32,
    pub magic_points: i32,
    pub leafs: i32,
    pub leaf_boxes: i32,
    pub chapter: i32,
    pub choices: Vec<i16>,
    pub choice_answer: i32,
    pub holomap_locations: BTreeSet<u8>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            game_flags: vec![0; NUM_GAME_FLAGS],
            inventory_flags: vec![0; MAX_INVENTORY_ITEMS],
            keys: 0,
            kashes: 0,
            gas: 0,
            magic_level: 0,
            magic_points: 0,
            leafs: 0,
            leaf_boxes: 2,
            chapter: 0,
            choices: Vec::new(),
            choice_answer: 0,
            holomap_locations: BTreeSet::new(),
        }
    }
}

impl GameState {
    pub fn game_flag(&self, index: u8) -> u8 {
        self.game_flags.get(index as usize).copied().unwrap_or(0)
    }

    pub fn set_game_flag(&mut self, index: u8, value: u8) {
        if let Some(slot) = self.game_flags.get_mut(index as usize) {
            *slot = value;
        }
    }

    pub fn inventory_disabled(&self) -> bool {
        self.game_flag(GAMEFLAG_INVENTORY_DISABLED) != 0
    }

    /// Items are owned when their game flag is set.
    pub fn has_item(&self, item: u8) -> bool {
        (item as usize) < MAX_INVENTORY_ITEMS && self.game_flag(item) != 0
    }

    pub fn inventory_flag(&self, item: u8) -> LifeResult<u8> {
        let slot = check_index(
            "inventory item",
            i32::from(item),
            self.inventory_flags.len(),
        )?;
        Ok(self.inventory_flags[slot])
    }

    /// Mark an item as used; only items below the keypad take the mark.
    pub fn set_used_inventory(&mut self, item: u8) {
        if item < INVENTORY_KEYPAD {
            if let Some(slot) = self.inventory_flags.get_mut(item as usize) {
                *slot = 1;
            }
        }
    }

    pub fn add_keys(&mut self, delta: i32) {
        self.keys = (self.keys + delta).clamp(0, MAX_KEYS);
    }

    pub fn add_kashes(&mut self, delta: i32) {
        self.kashes = (self.kashes + delta).clamp(0, MAX_KASHES);
    }

    pub fn add_gas(&mut self, delta: i32) {
        self.gas = (self.gas + delta).clamp(0, MAX_GAS);
    }

    pub fn max_magic_points(&self) -> i32 {
        self.magic_level * MAGIC_POINTS_PER_LEVEL
    }

    pub fn set_max_magic_points(&mut self) {
        self.magic_points = self.max_magic_points();
    }

    pub fn set_magic_points(&mut self, points: i32) {
        self.magic_points = points.clamp(0, self.max_magic_points().max(0));
    }

    pub fn add_magic_points(&mut self, delta: i32) {
        self.set_magic_points(self.magic_points + delta);
    }

    pub fn add_leaf_boxes(&mut self, delta: i32) {
        self.leaf_boxes = (self.leaf_boxes + delta).min(MAX_CLOVER_BOXES);
    }

    pub fn set_leafs(&mut self, leafs: i32) {
        self.leafs = leafs.min(self.leaf_boxes);
    }

    /// Queue a dialogue option; returns false when the list is already full.
    pub fn push_choice(&mut self, text: i16) -> bool {
        if self.choices.len() >= MAX_CHOICES {
            return false;
        }
        self.choices.push(text);
        true
    }

    pub fn set_holomap_position(&mut self, location: u8) -> LifeResult<()> {
        check_index(
            "holomap location",
            i32::from(location),
            NUM_HOLOMAP_LOCATIONS,
        )?;
        self.holomap_locations.insert(location);
        Ok(())
    }

    pub fn clear_holomap_position(&mut self, location: u8) -> LifeResult<()> {
        check_index(
            "holomap location",
            i32::from(location),
            NUM_HOLOMAP_LOCATIONS,
        )?;
        self.holomap_locations.remove(&location);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_clamp_to_their_ranges() {
        let mut state = GameState::default();
        state.add_kashes(1500);
        assert_eq!(state.kashes, MAX_KASHES);
        state.add_kashes(-2000);
        assert_eq!(state.kashes, 0);
        state.add_keys(-1);
        assert_eq!(state.keys, 0);
        state.add_gas(120);
        assert_eq!(state.gas, MAX_GAS);
    }

    #[test]
    fn magic_points_follow_the_level() {
        let mut state = GameState {
            magic_level: 2,
            ..GameState::default()
        };
        state.set_max_magic_points();
        assert_eq!(state.magic_points, 40);
        state.set_magic_points(80);
        assert_eq!(state.magic_points, 40);
        state.add_magic_points(-50);
        assert_eq!(state.magic_points, 0);
    }

    #[test]
    fn choices_stop_at_ten_entries() {
        let mut state = GameState::default();
        for text in 0..10 {
            assert!(state.push_choice(text));
        }
        assert!(!state.push_choice(10));
        assert_eq!(state.choices.len(), MAX_CHOICES);
    }

    #[test]
    fn keypad_and_later_items_cannot_be_marked_used() {
        let mut state = GameState::default();
        state.set_used_inventory(3);
        state.set_used_inventory(INVENTORY_KEYPAD);
        assert_eq!(state.inventory_flag(3), Ok(1));
        assert_eq!(state.inventory_flag(INVENTORY_KEYPAD), Ok(0));
        assert!(state.inventory_flag(28).is_err());
    }

    #[test]
    fn clover_boxes_cap_the_leaf_count() {
        let mut state = GameState::default();
        state.add_leaf_boxes(20);
        assert_eq!(state.leaf_boxes, MAX_CLOVER_BOXES);
        state.set_leafs(12);
        assert_eq!(state.leafs, MAX_CLOVER_BOXES);
    }
}
