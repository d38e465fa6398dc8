//! Byte layout of actor life scripts.
//!
//! A life script is a flat sequence of `[opcode][operands]` records. Operands
//! are little-endian and branch targets are absolute `i16` offsets into the
//! same buffer. The tables here describe how many bytes every opcode consumes
//! so both the interpreter and the disassembler agree on the stream layout.

use std::io::Cursor;

use anyhow::{Context, Result, bail, ensure};
use byteorder::{LittleEndian, ReadBytesExt};
use log::debug;
use serde::Serialize;

/// Number of slots in the opcode table (0x00..=0x69).
pub const LIFE_OPCODE_COUNT: usize = 0x6A;

/// Longest PLAY_FLA movie name, including the terminating NUL.
pub const MAX_MOVIE_NAME_LEN: usize = 64;

/// Opcode bytes referenced by name outside the table.
pub mod op {
    pub const END: u8 = 0x00;
    pub const NOP: u8 = 0x01;
    pub const SNIF: u8 = 0x02;
    pub const OFFSET: u8 = 0x03;
    pub const NEVERIF: u8 = 0x04;
    pub const NO_IF: u8 = 0x06;
    pub const LABEL: u8 = 0x0A;
    pub const RETURN: u8 = 0x0B;
    pub const IF: u8 = 0x0C;
    pub const SWIF: u8 = 0x0D;
    pub const ONEIF: u8 = 0x0E;
    pub const ELSE: u8 = 0x0F;
    pub const ENDIF: u8 = 0x10;
    pub const BODY: u8 = 0x11;
    pub const BODY_OBJ: u8 = 0x12;
    pub const ANIM: u8 = 0x13;
    pub const ANIM_OBJ: u8 = 0x14;
    pub const SET_LIFE: u8 = 0x15;
    pub const SET_LIFE_OBJ: u8 = 0x16;
    pub const SET_TRACK: u8 = 0x17;
    pub const SET_TRACK_OBJ: u8 = 0x18;
    pub const MESSAGE: u8 = 0x19;
    pub const FALLABLE: u8 = 0x1A;
    pub const SET_DIRMODE: u8 = 0x1B;
    pub const SET_DIRMODE_OBJ: u8 = 0x1C;
    pub const CAM_FOLLOW: u8 = 0x1D;
    pub const SET_BEHAVIOUR: u8 = 0x1E;
    pub const SET_FLAG_CUBE: u8 = 0x1F;
    pub const COMPORTEMENT: u8 = 0x20;
    pub const SET_COMPORTEMENT: u8 = 0x21;
    pub const SET_COMPORTEMENT_OBJ: u8 = 0x22;
    pub const END_COMPORTEMENT: u8 = 0x23;
    pub const SET_FLAG_GAME: u8 = 0x24;
    pub const KILL_OBJ: u8 = 0x25;
    pub const SUICIDE: u8 = 0x26;
    pub const USE_ONE_LITTLE_KEY: u8 = 0x27;
    pub const GIVE_GOLD_PIECES: u8 = 0x28;
    pub const END_LIFE: u8 = 0x29;
    pub const STOP_L_TRACK: u8 = 0x2A;
    pub const RESTORE_L_TRACK: u8 = 0x2B;
    pub const MESSAGE_OBJ: u8 = 0x2C;
    pub const INC_CHAPTER: u8 = 0x2D;
    pub const FOUND_OBJECT: u8 = 0x2E;
    pub const SET_DOOR_LEFT: u8 = 0x2F;
    pub const SET_DOOR_RIGHT: u8 = 0x30;
    pub const SET_DOOR_UP: u8 = 0x31;
    pub const SET_DOOR_DOWN: u8 = 0x32;
    pub const GIVE_BONUS: u8 = 0x33;
    pub const CHANGE_CUBE: u8 = 0x34;
    pub const OBJ_COL: u8 = 0x35;
    pub const BRICK_COL: u8 = 0x36;
    pub const OR_IF: u8 = 0x37;
    pub const INVISIBLE: u8 = 0x38;
    pub const ZOOM: u8 = 0x39;
    pub const POS_POINT: u8 = 0x3A;
    pub const SET_MAGIC_LEVEL: u8 = 0x3B;
    pub const SUB_MAGIC_POINT: u8 = 0x3C;
    pub const SET_LIFE_POINT_OBJ: u8 = 0x3D;
    pub const SUB_LIFE_POINT_OBJ: u8 = 0x3E;
    pub const HIT_OBJ: u8 = 0x3F;
    pub const PLAY_FLA: u8 = 0x40;
    pub const PLAY_MIDI: u8 = 0x41;
    pub const INC_CLOVER_BOX: u8 = 0x42;
    pub const SET_USED_INVENTORY: u8 = 0x43;
    pub const ADD_CHOICE: u8 = 0x44;
    pub const ASK_CHOICE: u8 = 0x45;
    pub const BIG_MESSAGE: u8 = 0x46;
    pub const INIT_PINGOUIN: u8 = 0x47;
    pub const SET_HOLO_POS: u8 = 0x48;
    pub const CLR_HOLO_POS: u8 = 0x49;
    pub const ADD_FUEL: u8 = 0x4A;
    pub const SUB_FUEL: u8 = 0x4B;
    pub const SET_GRM: u8 = 0x4C;
    pub const SAY_MESSAGE: u8 = 0x4D;
    pub const SAY_MESSAGE_OBJ: u8 = 0x4E;
    pub const FULL_POINT: u8 = 0x4F;
    pub const BETA: u8 = 0x50;
    pub const GRM_OFF: u8 = 0x51;
    pub const FADE_PAL_RED: u8 = 0x52;
    pub const FADE_ALARM_RED: u8 = 0x53;
    pub const FADE_ALARM_PAL: u8 = 0x54;
    pub const FADE_RED_PAL: u8 = 0x55;
    pub const FADE_RED_ALARM: u8 = 0x56;
    pub const FADE_PAL_ALARM: u8 = 0x57;
    pub const EXPLODE_OBJ: u8 = 0x58;
    pub const BUBBLE_ON: u8 = 0x59;
    pub const BUBBLE_OFF: u8 = 0x5A;
    pub const ASK_CHOICE_OBJ: u8 = 0x5B;
    pub const SET_DARK_PAL: u8 = 0x5C;
    pub const SET_NORMAL_PAL: u8 = 0x5D;
    pub const MESSAGE_SENDELL: u8 = 0x5E;
    pub const ANIM_SET: u8 = 0x5F;
    pub const HOLOMAP_TRAJ: u8 = 0x60;
    pub const GAME_OVER: u8 = 0x61;
    pub const THE_END: u8 = 0x62;
    pub const MIDI_OFF: u8 = 0x63;
    pub const PLAY_CD_TRACK: u8 = 0x64;
    pub const PROJ_ISO: u8 = 0x65;
    pub const PROJ_3D: u8 = 0x66;
    pub const TEXT: u8 = 0x67;
    pub const CLEAR_TEXT: u8 = 0x68;
    pub const BRUTAL_EXIT: u8 = 0x69;
}

/// Control-mode value that makes SET_DIRMODE read a followed-actor byte.
pub const CONTROL_MODE_FOLLOW: u8 = 2;

pub const DIRMODE_OBJ_FOLLOW2_NOTE: &str =
    "one more byte is read at runtime if the running actor is in follow2 mode";

/// Single fixed-width operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperandKind {
    Byte,
    Actor,
    Word,
    Offset,
    Text,
}

impl OperandKind {
    pub fn size(self) -> usize {
        match self {
            OperandKind::Byte | OperandKind::Actor => 1,
            OperandKind::Word | OperandKind::Offset | OperandKind::Text => 2,
        }
    }
}

/// Operand layout following an opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Fixed(&'static [OperandKind]),
    /// condition, optional parameter, operator, literal, branch offset
    Condition,
    /// control mode, followed actor when the mode is follow
    DirMode,
    /// actor, control mode, followed actor when the mode is follow
    DirModeObj,
    /// NUL-terminated movie name
    CString,
}

/// How an opcode leaves the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    Next,
    Branch,
    Jump,
    Terminate,
}

#[derive(Debug, Clone, Copy)]
pub struct LifeOpcodeInfo {
    pub code: u8,
    pub name: &'static str,
    pub layout: Layout,
    pub flow: Flow,
}

impl LifeOpcodeInfo {
    /// Placeholder slots have an empty name and perform no work.
    pub fn is_placeholder(&self) -> bool {
        self.name.is_empty()
    }

    /// Operand size when it does not depend on the stream contents.
    pub fn fixed_operand_size(&self) -> Option<usize> {
        match self.layout {
            Layout::Fixed(kinds) => Some(kinds.iter().map(|kind| kind.size()).sum()),
            _ => None,
        }
    }
}

const NONE: &[OperandKind] = &[];
const BYTE: &[OperandKind] = &[OperandKind::Byte];
const ACTOR: &[OperandKind] = &[OperandKind::Actor];
const WORD: &[OperandKind] = &[OperandKind::Word];
const OFFSET: &[OperandKind] = &[OperandKind::Offset];
const TEXT: &[OperandKind] = &[OperandKind::Text];
const ACTOR_BYTE: &[OperandKind] = &[OperandKind::Actor, OperandKind::Byte];
const ACTOR_OFFSET: &[OperandKind] = &[OperandKind::Actor, OperandKind::Offset];
const ACTOR_TEXT: &[OperandKind] = &[OperandKind::Actor, OperandKind::Text];
const BYTE_BYTE: &[OperandKind] = &[OperandKind::Byte, OperandKind::Byte];

const fn entry(code: u8, name: &'static str, layout: Layout, flow: Flow) -> LifeOpcodeInfo {
    LifeOpcodeInfo {
        code,
        name,
        layout,
        flow,
    }
}

const fn fixed(code: u8, name: &'static str, operands: &'static [OperandKind]) -> LifeOpcodeInfo {
    entry(code, name, Layout::Fixed(operands), Flow::Next)
}

/// Every opcode slot in table order; gaps keep an empty name.
pub const LIFE_OPCODES: [LifeOpcodeInfo; LIFE_OPCODE_COUNT] = [
    entry(0x00, "END", Layout::Fixed(NONE), Flow::Terminate),
    fixed(0x01, "NOP", BYTE),
    entry(0x02, "SNIF", Layout::Condition, Flow::Jump),
    entry(0x03, "OFFSET", Layout::Fixed(OFFSET), Flow::Jump),
    entry(0x04, "NEVERIF", Layout::Condition, Flow::Jump),
    fixed(0x05, "", NONE),
    fixed(0x06, "NO_IF", NONE),
    fixed(0x07, "", NONE),
    fixed(0x08, "", NONE),
    fixed(0x09, "", NONE),
    fixed(0x0A, "LABEL", BYTE),
    entry(0x0B, "RETURN", Layout::Fixed(NONE), Flow::Terminate),
    entry(0x0C, "IF", Layout::Condition, Flow::Branch),
    entry(0x0D, "SWIF", Layout::Condition, Flow::Branch),
    entry(0x0E, "ONEIF", Layout::Condition, Flow::Branch),
    entry(0x0F, "ELSE", Layout::Fixed(OFFSET), Flow::Jump),
    fixed(0x10, "ENDIF", NONE),
    fixed(0x11, "BODY", BYTE),
    fixed(0x12, "BODY_OBJ", ACTOR_BYTE),
    fixed(0x13, "ANIM", BYTE),
    fixed(0x14, "ANIM_OBJ", ACTOR_BYTE),
    fixed(0x15, "SET_LIFE", OFFSET),
    fixed(0x16, "SET_LIFE_OBJ", ACTOR_OFFSET),
    fixed(0x17, "SET_TRACK", OFFSET),
    fixed(0x18, "SET_TRACK_OBJ", ACTOR_OFFSET),
    fixed(0x19, "MESSAGE", TEXT),
    fixed(0x1A, "FALLABLE", BYTE),
    entry(0x1B, "SET_DIRMODE", Layout::DirMode, Flow::Next),
    entry(0x1C, "SET_DIRMODE_OBJ", Layout::DirModeObj, Flow::Next),
    fixed(0x1D, "CAM_FOLLOW", ACTOR),
    fixed(0x1E, "SET_BEHAVIOUR", BYTE),
    fixed(0x1F, "SET_FLAG_CUBE", BYTE_BYTE),
    fixed(0x20, "COMPORTEMENT", BYTE),
    fixed(0x21, "SET_COMPORTEMENT", OFFSET),
    fixed(0x22, "SET_COMPORTEMENT_OBJ", ACTOR_OFFSET),
    entry(0x23, "END_COMPORTEMENT", Layout::Fixed(NONE), Flow::Terminate),
    fixed(0x24, "SET_FLAG_GAME", BYTE_BYTE),
    fixed(0x25, "KILL_OBJ", ACTOR),
    fixed(0x26, "SUICIDE", NONE),
    fixed(0x27, "USE_ONE_LITTLE_KEY", NONE),
    fixed(0x28, "GIVE_GOLD_PIECES", WORD),
    entry(0x29, "END_LIFE", Layout::Fixed(NONE), Flow::Terminate),
    fixed(0x2A, "STOP_L_TRACK", NONE),
    fixed(0x2B, "RESTORE_L_TRACK", NONE),
    fixed(0x2C, "MESSAGE_OBJ", ACTOR_TEXT),
    fixed(0x2D, "INC_CHAPTER", NONE),
    fixed(0x2E, "FOUND_OBJECT", BYTE),
    fixed(0x2F, "SET_DOOR_LEFT", WORD),
    fixed(0x30, "SET_DOOR_RIGHT", WORD),
    fixed(0x31, "SET_DOOR_UP", WORD),
    fixed(0x32, "SET_DOOR_DOWN", WORD),
    fixed(0x33, "GIVE_BONUS", BYTE),
    fixed(0x34, "CHANGE_CUBE", BYTE),
    fixed(0x35, "OBJ_COL", BYTE),
    fixed(0x36, "BRICK_COL", BYTE),
    entry(0x37, "OR_IF", Layout::Condition, Flow::Branch),
    fixed(0x38, "INVISIBLE", BYTE),
    fixed(0x39, "ZOOM", BYTE),
    fixed(0x3A, "POS_POINT", BYTE),
    fixed(0x3B, "SET_MAGIC_LEVEL", BYTE),
    fixed(0x3C, "SUB_MAGIC_POINT", BYTE),
    fixed(0x3D, "SET_LIFE_POINT_OBJ", ACTOR_BYTE),
    fixed(0x3E, "SUB_LIFE_POINT_OBJ", ACTOR_BYTE),
    fixed(0x3F, "HIT_OBJ", ACTOR_BYTE),
    entry(0x40, "PLAY_FLA", Layout::CString, Flow::Next),
    fixed(0x41, "PLAY_MIDI", BYTE),
    fixed(0x42, "INC_CLOVER_BOX", NONE),
    fixed(0x43, "SET_USED_INVENTORY", BYTE),
    fixed(0x44, "ADD_CHOICE", TEXT),
    fixed(0x45, "ASK_CHOICE", TEXT),
    fixed(0x46, "BIG_MESSAGE", TEXT),
    fixed(0x47, "INIT_PINGOUIN", ACTOR),
    fixed(0x48, "SET_HOLO_POS", BYTE),
    fixed(0x49, "CLR_HOLO_POS", BYTE),
    fixed(0x4A, "ADD_FUEL", BYTE),
    fixed(0x4B, "SUB_FUEL", BYTE),
    fixed(0x4C, "SET_GRM", BYTE),
    fixed(0x4D, "SAY_MESSAGE", TEXT),
    fixed(0x4E, "SAY_MESSAGE_OBJ", ACTOR_TEXT),
    fixed(0x4F, "FULL_POINT", NONE),
    fixed(0x50, "BETA", WORD),
    fixed(0x51, "GRM_OFF", NONE),
    fixed(0x52, "FADE_PAL_RED", NONE),
    fixed(0x53, "FADE_ALARM_RED", NONE),
    fixed(0x54, "FADE_ALARM_PAL", NONE),
    fixed(0x55, "FADE_RED_PAL", NONE),
    fixed(0x56, "FADE_RED_ALARM", NONE),
    fixed(0x57, "FADE_PAL_ALARM", NONE),
    fixed(0x58, "EXPLODE_OBJ", ACTOR),
    fixed(0x59, "BUBBLE_ON", NONE),
    fixed(0x5A, "BUBBLE_OFF", NONE),
    fixed(0x5B, "ASK_CHOICE_OBJ", ACTOR_TEXT),
    fixed(0x5C, "SET_DARK_PAL", NONE),
    fixed(0x5D, "SET_NORMAL_PAL", NONE),
    fixed(0x5E, "MESSAGE_SENDELL", NONE),
    fixed(0x5F, "ANIM_SET", BYTE),
    fixed(0x60, "HOLOMAP_TRAJ", BYTE),
    entry(0x61, "GAME_OVER", Layout::Fixed(NONE), Flow::Terminate),
    entry(0x62, "THE_END", Layout::Fixed(NONE), Flow::Terminate),
    fixed(0x63, "MIDI_OFF", NONE),
    fixed(0x64, "PLAY_CD_TRACK", BYTE),
    fixed(0x65, "PROJ_ISO", NONE),
    fixed(0x66, "PROJ_3D", NONE),
    fixed(0x67, "TEXT", TEXT),
    fixed(0x68, "CLEAR_TEXT", NONE),
    entry(0x69, "BRUTAL_EXIT", Layout::Fixed(NONE), Flow::Terminate),
];

pub fn opcode_info(code: u8) -> Option<&'static LifeOpcodeInfo> {
    LIFE_OPCODES.get(code as usize)
}

/// Width of the literal compared against a condition value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueWidth {
    Byte,
    Word,
}

impl ValueWidth {
    pub fn size(self) -> usize {
        match self {
            ValueWidth::Byte => 1,
            ValueWidth::Word => 2,
        }
    }
}

/// What a condition measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum LifeCondition {
    Col = 0x00,
    ColObj = 0x01,
    Distance = 0x02,
    Zone = 0x03,
    ZoneObj = 0x04,
    Body = 0x05,
    BodyObj = 0x06,
    Anim = 0x07,
    AnimObj = 0x08,
    Track = 0x09,
    TrackObj = 0x0A,
    FlagCube = 0x0B,
    ConeView = 0x0C,
    HitBy = 0x0D,
    Action = 0x0E,
    FlagGame = 0x0F,
    LifePoint = 0x10,
    LifePointObj = 0x11,
    NumLittleKeys = 0x12,
    NumGoldPieces = 0x13,
    Behaviour = 0x14,
    Chapter = 0x15,
    Distance3d = 0x16,
    MagicLevel = 0x17,
    MagicPoints = 0x18,
    UseInventory = 0x19,
    Choice = 0x1A,
    Fuel = 0x1B,
    CarriedBy = 0x1C,
    Cdrom = 0x1D,
}

impl TryFrom<u8> for LifeCondition {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        use LifeCondition::*;
        Ok(match value {
            0x00 => Col,
            0x01 => ColObj,
            0x02 => Distance,
            0x03 => Zone,
            0x04 => ZoneObj,
            0x05 => Body,
            0x06 => BodyObj,
            0x07 => Anim,
            0x08 => AnimObj,
            0x09 => Track,
            0x0A => TrackObj,
            0x0B => FlagCube,
            0x0C => ConeView,
            0x0D => HitBy,
            0x0E => Action,
            0x0F => FlagGame,
            0x10 => LifePoint,
            0x11 => LifePointObj,
            0x12 => NumLittleKeys,
            0x13 => NumGoldPieces,
            0x14 => Behaviour,
            0x15 => Chapter,
            0x16 => Distance3d,
            0x17 => MagicLevel,
            0x18 => MagicPoints,
            0x19 => UseInventory,
            0x1A => Choice,
            0x1B => Fuel,
            0x1C => CarriedBy,
            0x1D => Cdrom,
            other => return Err(other),
        })
    }
}

impl LifeCondition {
    pub fn name(self) -> &'static str {
        use LifeCondition::*;
        match self {
            Col => "COL",
            ColObj => "COL_OBJ",
            Distance => "DISTANCE",
            Zone => "ZONE",
            ZoneObj => "ZONE_OBJ",
            Body => "BODY",
            BodyObj => "BODY_OBJ",
            Anim => "ANIM",
            AnimObj => "ANIM_OBJ",
            Track => "L_TRACK",
            TrackObj => "L_TRACK_OBJ",
            FlagCube => "FLAG_CUBE",
            ConeView => "CONE_VIEW",
            HitBy => "HIT_BY",
            Action => "ACTION",
            FlagGame => "FLAG_GAME",
            LifePoint => "LIFE_POINT",
            LifePointObj => "LIFE_POINT_OBJ",
            NumLittleKeys => "NUM_LITTLE_KEYS",
            NumGoldPieces => "NUM_GOLD_PIECES",
            Behaviour => "BEHAVIOUR",
            Chapter => "CHAPTER",
            Distance3d => "DISTANCE_3D",
            MagicLevel => "MAGIC_LEVEL",
            MagicPoints => "MAGIC_POINTS",
            UseInventory => "USE_INVENTORY",
            Choice => "CHOICE",
            Fuel => "FUEL",
            CarriedBy => "CARRIED_BY",
            Cdrom => "CDROM",
        }
    }

    /// Conditions followed by an actor, flag or item byte.
    pub fn takes_parameter(self) -> bool {
        use LifeCondition::*;
        matches!(
            self,
            ColObj
                | Distance
                | ZoneObj
                | BodyObj
                | AnimObj
                | TrackObj
                | FlagCube
                | ConeView
                | FlagGame
                | LifePointObj
                | Distance3d
                | UseInventory
        )
    }

    pub fn value_width(self) -> ValueWidth {
        use LifeCondition::*;
        match self {
            Distance | ConeView | NumGoldPieces | Distance3d | Choice => ValueWidth::Word,
            _ => ValueWidth::Byte,
        }
    }
}

/// Comparison applied between the condition value and the literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum LifeOperator {
    Equal = 0,
    Greater = 1,
    Less = 2,
    GreaterOrEqual = 3,
    LessOrEqual = 4,
    NotEqual = 5,
}

impl TryFrom<u8> for LifeOperator {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Equal),
            1 => Ok(Self::Greater),
            2 => Ok(Self::Less),
            3 => Ok(Self::GreaterOrEqual),
            4 => Ok(Self::LessOrEqual),
            5 => Ok(Self::NotEqual),
            other => Err(other),
        }
    }
}

impl LifeOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            LifeOperator::Equal => "==",
            LifeOperator::Greater => ">",
            LifeOperator::Less => "<",
            LifeOperator::GreaterOrEqual => ">=",
            LifeOperator::LessOrEqual => "<=",
            LifeOperator::NotEqual => "!=",
        }
    }

    pub fn compare(self, current: i32, literal: i32) -> bool {
        match self {
            LifeOperator::Equal => current == literal,
            LifeOperator::Greater => current > literal,
            LifeOperator::Less => current < literal,
            LifeOperator::GreaterOrEqual => current >= literal,
            LifeOperator::LessOrEqual => current <= literal,
            LifeOperator::NotEqual => current != literal,
        }
    }
}

/// Decoded operand, tagged for JSON dumps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operand {
    Byte {
        value: u8,
    },
    Actor {
        index: u8,
    },
    Word {
        value: i16,
    },
    Offset {
        target: i16,
    },
    Text {
        id: i16,
    },
    Condition {
        condition: String,
        parameter: Option<u8>,
        operator: String,
        value: i32,
        target: i16,
    },
    Name {
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    pub offset: usize,
    pub opcode: u8,
    pub name: &'static str,
    pub operands: Vec<Operand>,
    pub len: usize,
    /// Set when the runtime may consume a different number of bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

impl Instruction {
    pub fn next_offset(&self) -> usize {
        self.offset + self.len
    }
}

/// Decode the instruction starting at `offset`.
///
/// SET_DIRMODE_OBJ is decoded from its own bytes only: the follow byte is read
/// when the requested mode is follow. The interpreter also reads it when the
/// executing actor is in follow2 mode, which a static decode cannot know, so
/// other modes carry a note on the instruction.
pub fn decode_instruction(bytes: &[u8], offset: usize) -> Result<Instruction> {
    ensure!(
        offset < bytes.len(),
        "offset {offset} is outside the {}-byte script",
        bytes.len()
    );
    let mut cursor = Cursor::new(bytes);
    cursor.set_position(offset as u64);
    let opcode = cursor.read_u8()?;
    let Some(info) = opcode_info(opcode) else {
        bail!("opcode {opcode:#04x} at offset {offset} is outside the opcode table");
    };

    let mut operands = Vec::new();
    let mut note = None;
    match info.layout {
        Layout::Fixed(kinds) => {
            for kind in kinds {
                operands.push(read_operand(&mut cursor, *kind).with_context(|| {
                    format!("reading {} operand at offset {offset}", info.name)
                })?);
            }
        }
        Layout::Condition => {
            operands.push(
                read_condition(&mut cursor)
                    .with_context(|| format!("reading {} condition at offset {offset}", info.name))?,
            );
        }
        Layout::DirMode => {
            let mode = cursor.read_u8().context("reading control mode")?;
            operands.push(Operand::Byte { value: mode });
            if mode == CONTROL_MODE_FOLLOW {
                operands.push(Operand::Actor {
                    index: cursor.read_u8().context("reading followed actor")?,
                });
            }
        }
        Layout::DirModeObj => {
            operands.push(Operand::Actor {
                index: cursor.read_u8().context("reading actor")?,
            });
            let mode = cursor.read_u8().context("reading control mode")?;
            operands.push(Operand::Byte { value: mode });
            if mode == CONTROL_MODE_FOLLOW {
                operands.push(Operand::Actor {
                    index: cursor.read_u8().context("reading followed actor")?,
                });
            } else {
                debug!("SET_DIRMODE_OBJ at {offset:04X}: length depends on the running actor");
                note = Some(DIRMODE_OBJ_FOLLOW2_NOTE);
            }
        }
        Layout::CString => {
            let mut name = Vec::new();
            loop {
                let byte = cursor.read_u8().context("reading movie name")?;
                if byte == 0 {
                    break;
                }
                name.push(byte);
                ensure!(
                    name.len() < MAX_MOVIE_NAME_LEN,
                    "movie name at offset {offset} exceeds {MAX_MOVIE_NAME_LEN} bytes"
                );
            }
            operands.push(Operand::Name {
                value: String::from_utf8_lossy(&name).into_owned(),
            });
        }
    }

    let len = cursor.position() as usize - offset;
    Ok(Instruction {
        offset,
        opcode,
        name: info.name,
        operands,
        len,
        note,
    })
}

/// Linear sweep over the whole buffer.
pub fn disassemble(bytes: &[u8]) -> Result<Vec<Instruction>> {
    let mut instructions = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        let instruction = decode_instruction(bytes, offset)?;
        offset = instruction.next_offset();
        instructions.push(instruction);
    }
    Ok(instructions)
}

/// Render an instruction the way the life debugger prints it.
pub fn format_instruction(instruction: &Instruction) -> String {
    let name = if instruction.name.is_empty() {
        "<unused>"
    } else {
        instruction.name
    };
    let args: Vec<String> = instruction.operands.iter().map(format_operand).collect();
    let line = format!(
        "{:04X}: {:02X} {}({})",
        instruction.offset,
        instruction.opcode,
        name,
        args.join(", ")
    );
    match instruction.note {
        Some(note) => format!("{line}  ; {note}"),
        None => line,
    }
}

fn format_operand(operand: &Operand) -> String {
    match operand {
        Operand::Byte { value } => value.to_string(),
        Operand::Actor { index } => format!("actor {index}"),
        Operand::Word { value } => value.to_string(),
        Operand::Offset { target } => format!("@{target:04X}"),
        Operand::Text { id } => format!("text {id}"),
        Operand::Condition {
            condition,
            parameter,
            operator,
            value,
            target,
        } => {
            let subject = match parameter {
                Some(param) => format!("{condition}({param})"),
                None => condition.clone(),
            };
            format!("{subject} {operator} {value} else @{target:04X}")
        }
        Operand::Name { value } => format!("\"{value}\""),
    }
}

fn read_operand(cursor: &mut Cursor<&[u8]>, kind: OperandKind) -> Result<Operand> {
    Ok(match kind {
        OperandKind::Byte => Operand::Byte {
            value: cursor.read_u8()?,
        },
        OperandKind::Actor => Operand::Actor {
            index: cursor.read_u8()?,
        },
        OperandKind::Word => Operand::Word {
            value: cursor.read_i16::<LittleEndian>()?,
        },
        OperandKind::Offset => Operand::Offset {
            target: cursor.read_i16::<LittleEndian>()?,
        },
        OperandKind::Text => Operand::Text {
            id: cursor.read_i16::<LittleEndian>()?,
        },
    })
}

fn read_condition(cursor: &mut Cursor<&[u8]>) -> Result<Operand> {
    let code = cursor.read_u8()?;
    let condition =
        LifeCondition::try_from(code).map_err(|code| anyhow::anyhow!("condition opcode {code}"))?;
    let parameter = if condition.takes_parameter() {
        Some(cursor.read_u8()?)
    } else {
        None
    };
    let operator_code = cursor.read_u8()?;
    let operator = LifeOperator::try_from(operator_code)
        .map(|operator| operator.symbol().to_string())
        .unwrap_or_else(|code| format!("?{code}"));
    let value = match condition.value_width() {
        ValueWidth::Byte => cursor.read_u8()? as i32,
        ValueWidth::Word => cursor.read_i16::<LittleEndian>()? as i32,
    };
    let target = cursor.read_i16::<LittleEndian>()?;
    Ok(Operand::Condition {
        condition: condition.name().to_string(),
        parameter,
        operator,
        value,
        target,
    })
}
