//! Opcode handlers, grouped by what they touch.

pub mod actors;
pub mod dialogue;
pub mod effects;
pub mod flow;
pub mod inventory;
