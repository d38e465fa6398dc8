use std::fmt;

use twine_formats::LIFE_OPCODE_COUNT;

use crate::engine::LifeEngine;
use crate::error::LifeResult;

use super::context::LifeContext;
use super::handlers::{actors, dialogue, effects, flow, inventory};

/// What the dispatcher does after a handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeSignal {
    /// Logged; execution resumes at the stream position the handler left.
    NotImplemented,
    Continue,
    /// End this invocation.
    Break,
}

pub type LifeHandler = fn(&mut LifeEngine, &mut LifeContext) -> LifeResult<LifeSignal>;

#[derive(Clone, Copy)]
pub struct LifeFunction {
    pub name: &'static str,
    pub handler: LifeHandler,
}

impl fmt::Debug for LifeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifeFunction").field("name", &self.name).finish()
    }
}

const fn func(name: &'static str, handler: LifeHandler) -> LifeFunction {
    LifeFunction { name, handler }
}

/// Dispatch table indexed by opcode byte.
pub static LIFE_FUNCTIONS: [LifeFunction; LIFE_OPCODE_COUNT] = [
    /*0x00*/ func("END", flow::end),
    /*0x01*/ func("NOP", flow::nop),
    /*0x02*/ func("SNIF", flow::snif),
    /*0x03*/ func("OFFSET", flow::offset),
    /*0x04*/ func("NEVERIF", flow::neverif),
    /*0x05*/ func("", flow::empty),
    /*0x06*/ func("NO_IF", flow::empty),
    /*0x07*/ func("", flow::empty),
    /*0x08*/ func("", flow::empty),
    /*0x09*/ func("", flow::empty),
    /*0x0A*/ func("LABEL", flow::label),
    /*0x0B*/ func("RETURN", flow::ret),
    /*0x0C*/ func("IF", flow::if_),
    /*0x0D*/ func("SWIF", flow::swif),
    /*0x0E*/ func("ONEIF", flow::oneif),
    /*0x0F*/ func("ELSE", flow::offset),
    /*0x10*/ func("ENDIF", flow::empty),
    /*0x11*/ func("BODY", actors::body),
    /*0x12*/ func("BODY_OBJ", actors::body_obj),
    /*0x13*/ func("ANIM", actors::anim),
    /*0x14*/ func("ANIM_OBJ", actors::anim_obj),
    /*0x15*/ func("SET_LIFE", flow::set_life),
    /*0x16*/ func("SET_LIFE_OBJ", flow::set_life_obj),
    /*0x17*/ func("SET_TRACK", actors::set_track),
    /*0x18*/ func("SET_TRACK_OBJ", actors::set_track_obj),
    /*0x19*/ func("MESSAGE", dialogue::message),
    /*0x1A*/ func("FALLABLE", actors::fallable),
    /*0x1B*/ func("SET_DIRMODE", actors::set_dirmode),
    /*0x1C*/ func("SET_DIRMODE_OBJ", actors::set_dirmode_obj),
    /*0x1D*/ func("CAM_FOLLOW", effects::cam_follow),
    /*0x1E*/ func("SET_BEHAVIOUR", actors::set_behaviour),
    /*0x1F*/ func("SET_FLAG_CUBE", inventory::set_flag_cube),
    /*0x20*/ func("COMPORTEMENT", flow::label),
    /*0x21*/ func("SET_COMPORTEMENT", flow::set_life),
    /*0x22*/ func("SET_COMPORTEMENT_OBJ", flow::set_life_obj),
    /*0x23*/ func("END_COMPORTEMENT", flow::ret),
    /*0x24*/ func("SET_FLAG_GAME", inventory::set_flag_game),
    /*0x25*/ func("KILL_OBJ", actors::kill_obj),
    /*0x26*/ func("SUICIDE", actors::suicide),
    /*0x27*/ func("USE_ONE_LITTLE_KEY", inventory::use_one_little_key),
    /*0x28*/ func("GIVE_GOLD_PIECES", inventory::give_gold_pieces),
    /*0x29*/ func("END_LIFE", flow::end),
    /*0x2A*/ func("STOP_L_TRACK", actors::stop_l_track),
    /*0x2B*/ func("RESTORE_L_TRACK", actors::restore_l_track),
    /*0x2C*/ func("MESSAGE_OBJ", dialogue::message_obj),
    /*0x2D*/ func("INC_CHAPTER", inventory::inc_chapter),
    /*0x2E*/ func("FOUND_OBJECT", inventory::found_object),
    /*0x2F*/ func("SET_DOOR_LEFT", actors::set_door_left),
    /*0x30*/ func("SET_DOOR_RIGHT", actors::set_door_right),
    /*0x31*/ func("SET_DOOR_UP", actors::set_door_up),
    /*0x32*/ func("SET_DOOR_DOWN", actors::set_door_down),
    /*0x33*/ func("GIVE_BONUS", inventory::give_bonus),
    /*0x34*/ func("CHANGE_CUBE", flow::change_cube),
    /*0x35*/ func("OBJ_COL", actors::obj_col),
    /*0x36*/ func("BRICK_COL", actors::brick_col),
    /*0x37*/ func("OR_IF", flow::or_if),
    /*0x38*/ func("INVISIBLE", actors::invisible),
    /*0x39*/ func("ZOOM", effects::zoom),
    /*0x3A*/ func("POS_POINT", actors::pos_point),
    /*0x3B*/ func("SET_MAGIC_LEVEL", inventory::set_magic_level),
    /*0x3C*/ func("SUB_MAGIC_POINT", inventory::sub_magic_point),
    /*0x3D*/ func("SET_LIFE_POINT_OBJ", actors::set_life_point_obj),
    /*0x3E*/ func("SUB_LIFE_POINT_OBJ", actors::sub_life_point_obj),
    /*0x3F*/ func("HIT_OBJ", actors::hit_obj),
    /*0x40*/ func("PLAY_FLA", effects::play_fla),
    /*0x41*/ func("PLAY_MIDI", effects::play_midi),
    /*0x42*/ func("INC_CLOVER_BOX", inventory::inc_clover_box),
    /*0x43*/ func("SET_USED_INVENTORY", inventory::set_used_inventory),
    /*0x44*/ func("ADD_CHOICE", dialogue::add_choice),
    /*0x45*/ func("ASK_CHOICE", dialogue::ask_choice),
    /*0x46*/ func("BIG_MESSAGE", dialogue::big_message),
    /*0x47*/ func("INIT_PINGOUIN", actors::init_pingouin),
    /*0x48*/ func("SET_HOLO_POS", inventory::set_holo_pos),
    /*0x49*/ func("CLR_HOLO_POS", inventory::clr_holo_pos),
    /*0x4A*/ func("ADD_FUEL", inventory::add_fuel),
    /*0x4B*/ func("SUB_FUEL", inventory::sub_fuel),
    /*0x4C*/ func("SET_GRM", effects::set_grm),
    /*0x4D*/ func("SAY_MESSAGE", dialogue::say_message),
    /*0x4E*/ func("SAY_MESSAGE_OBJ", dialogue::say_message_obj),
    /*0x4F*/ func("FULL_POINT", inventory::full_point),
    /*0x50*/ func("BETA", actors::beta),
    /*0x51*/ func("GRM_OFF", effects::grm_off),
    /*0x52*/ func("FADE_PAL_RED", effects::fade_pal_red),
    /*0x53*/ func("FADE_ALARM_RED", effects::fade_alarm_red),
    /*0x54*/ func("FADE_ALARM_PAL", effects::fade_alarm_pal),
    /*0x55*/ func("FADE_RED_PAL", effects::fade_red_pal),
    /*0x56*/ func("FADE_RED_ALARM", effects::fade_red_alarm),
    /*0x57*/ func("FADE_PAL_ALARM", effects::fade_pal_alarm),
    /*0x58*/ func("EXPLODE_OBJ", effects::explode_obj),
    /*0x59*/ func("BUBBLE_ON", dialogue::bubble_on),
    /*0x5A*/ func("BUBBLE_OFF", dialogue::bubble_off),
    /*0x5B*/ func("ASK_CHOICE_OBJ", dialogue::ask_choice_obj),
    /*0x5C*/ func("SET_DARK_PAL", effects::set_dark_pal),
    /*0x5D*/ func("SET_NORMAL_PAL", effects::set_normal_pal),
    /*0x5E*/ func("MESSAGE_SENDELL", dialogue::message_sendell),
    /*0x5F*/ func("ANIM_SET", actors::anim_set),
    /*0x60*/ func("HOLOMAP_TRAJ", flow::holomap_traj),
    /*0x61*/ func("GAME_OVER", flow::game_over),
    /*0x62*/ func("THE_END", flow::the_end),
    /*0x63*/ func("MIDI_OFF", effects::midi_off),
    /*0x64*/ func("PLAY_CD_TRACK", effects::play_cd_track),
    /*0x65*/ func("PROJ_ISO", effects::proj_iso),
    /*0x66*/ func("PROJ_3D", effects::proj_3d),
    /*0x67*/ func("TEXT", dialogue::text),
    /*0x68*/ func("CLEAR_TEXT", dialogue::clear_text),
    /*0x69*/ func("BRUTAL_EXIT", flow::brutal_exit),
];

pub fn life_function(opcode: u8) -> Option<&'static LifeFunction> {
    LIFE_FUNCTIONS.get(usize::from(opcode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use twine_formats::LIFE_OPCODES;

    #[test]
    fn names_follow_the_format_table() {
        for (function, info) in LIFE_FUNCTIONS.iter().zip(LIFE_OPCODES.iter()) {
            assert_eq!(function.name, info.name, "opcode {:#04x}", info.code);
        }
    }

    #[test]
    fn table_stops_at_brutal_exit() {
        assert_eq!(life_function(0x69).map(|f| f.name), Some("BRUTAL_EXIT"));
        assert!(life_function(0x6A).is_none());
    }
}
