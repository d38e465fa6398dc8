use glam::IVec3;
use twine_engine::actor::{Actor, ControlMode, HeroBehaviour, ANIM_NONE};
use twine_engine::callbacks::AnimKind;
use twine_engine::geometry::MAX_TARGET_ACTOR_DISTANCE;
use twine_engine::overlay::OverlayType;
use twine_engine::presentation::{PaletteKind, Rect};
use twine_engine::scene::Scene;
use twine_engine::{
    HostEvent, LifeConfig, LifeEngine, LifeError, LifeScript, RecordingCallbacks, SceneLoopState,
};
use twine_formats::life::{Flow, Layout};
use twine_formats::LIFE_OPCODES;

fn actor(bytes: &[u8]) -> Actor {
    Actor::with_script("actor", LifeScript::new(bytes.to_vec()))
}

fn engine_with(actors: Vec<Actor>) -> (LifeEngine, RecordingCallbacks) {
    let recorder = RecordingCallbacks::new();
    let engine = LifeEngine::new(
        LifeConfig::default(),
        Scene::new(0, actors),
        recorder.collaborators(),
    );
    (engine, recorder)
}

// SWIF FLAG_GAME(5) == 1 -> 8; INC_CHAPTER; RETURN
const SWITCH_SCRIPT: [u8; 9] = [0x0D, 0x0F, 0x05, 0x00, 0x01, 0x08, 0x00, 0x2D, 0x0B];

#[test]
fn switch_fires_once_per_rising_edge() {
    let (mut engine, _) = engine_with(vec![actor(&SWITCH_SCRIPT)]);
    engine.game.set_game_flag(5, 1);

    engine.process_life_script(0).expect("first pass");
    assert_eq!(engine.game.chapter, 1);
    assert_eq!(engine.scene.actors[0].life_script.opcode_at(0), Some(0x02));

    engine.process_life_script(0).expect("held high");
    assert_eq!(engine.game.chapter, 1);

    engine.game.set_game_flag(5, 0);
    engine.process_life_script(0).expect("falling edge");
    assert_eq!(engine.scene.actors[0].life_script.opcode_at(0), Some(0x0D));

    engine.game.set_game_flag(5, 1);
    engine.process_life_script(0).expect("rising again");
    assert_eq!(engine.game.chapter, 2);
}

#[test]
fn rewrites_stay_with_the_actor_that_ran() {
    let shared = LifeScript::new(SWITCH_SCRIPT.to_vec());
    let first = Actor::with_script("first", shared.clone());
    let second = Actor::with_script("second", shared);
    let (mut engine, _) = engine_with(vec![first, second]);
    engine.game.set_game_flag(5, 1);

    engine.process_life_script(0).expect("runs");
    let scripts = &engine.scene.actors;
    assert_eq!(scripts[0].life_script.opcode_at(0), Some(0x02));
    assert_eq!(scripts[1].life_script.opcode_at(0), Some(0x0D));
    assert_eq!(scripts[0].life_script.asset_bytes()[0], 0x0D);
    assert!(scripts[0].life_script.shares_asset_with(&scripts[1].life_script));
}

#[test]
fn oneif_turns_into_neverif() {
    let mut bytes = SWITCH_SCRIPT;
    bytes[0] = 0x0E;
    let (mut engine, _) = engine_with(vec![actor(&bytes)]);
    engine.game.set_game_flag(5, 1);

    engine.process_life_script(0).expect("first pass");
    engine.process_life_script(0).expect("second pass");
    assert_eq!(engine.game.chapter, 1);
    assert_eq!(engine.scene.actors[0].life_script.opcode_at(0), Some(0x04));
}

#[test]
fn kill_self_when_out_of_life() {
    // IF LIFE_POINT == 0 -> 8; KILL_OBJ(1); END
    let bytes = [0x0C, 0x10, 0x00, 0x00, 0x08, 0x00, 0x25, 0x01, 0x00];
    let mut victim = actor(&bytes);
    victim.life = 0;
    victim.zone = 3;
    victim.entity = 2;
    let (mut engine, _) = engine_with(vec![Actor::default(), victim]);

    engine.process_life_script(1).expect("runs");
    let victim = &engine.scene.actors[1];
    assert!(victim.is_dead());
    assert_eq!(victim.entity, -1);
    assert_eq!(victim.zone, -1);
    assert_eq!(victim.life, 0);
    assert_eq!(victim.life_cursor, -1);
}

#[test]
fn distance_is_clamped_and_height_gated() {
    // IF DISTANCE(1) == 32000 -> 9; INC_CHAPTER; RETURN
    let bytes = [0x0C, 0x02, 0x01, 0x00, 0x00, 0x7D, 0x09, 0x00, 0x2D, 0x0B];
    let mut far = Actor::default();
    far.pos = IVec3::new(40_000, 0, 0);
    let (mut engine, _) = engine_with(vec![actor(&bytes), far]);

    engine.process_life_script(0).expect("runs");
    assert_eq!(engine.scene.current_script_value, MAX_TARGET_ACTOR_DISTANCE);
    assert_eq!(engine.game.chapter, 1);

    engine.scene.actors[1].pos = IVec3::new(100, 1500, 0);
    engine.process_life_script(0).expect("runs");
    assert_eq!(engine.scene.current_script_value, MAX_TARGET_ACTOR_DISTANCE);

    engine.scene.actors[1].pos = IVec3::new(300, 1499, 400);
    engine.process_life_script(0).expect("runs");
    assert_eq!(engine.scene.current_script_value, 500);
}

#[test]
fn cone_view_ignores_a_loud_hero_direction() {
    // IF CONE_VIEW(0) == 0 -> 8; RETURN
    let bytes = [0x0C, 0x0C, 0x00, 0x00, 0x00, 0x00, 0x08, 0x00, 0x0B];
    let mut hero = Actor::default();
    hero.pos = IVec3::new(0, 0, -1000);
    let (mut engine, _) = engine_with(vec![hero, actor(&bytes)]);

    engine.process_life_script(1).expect("runs");
    assert_eq!(engine.scene.current_script_value, 1000);

    engine.hero.behaviour = HeroBehaviour::Discrete;
    engine.process_life_script(1).expect("runs");
    assert_eq!(engine.scene.current_script_value, MAX_TARGET_ACTOR_DISTANCE);

    engine.scene.actors[0].pos = IVec3::new(0, 0, 1000);
    engine.process_life_script(1).expect("runs");
    assert_eq!(engine.scene.current_script_value, 1000);
}

#[test]
fn unknown_operator_compares_false() {
    // IF LIFE_POINT ?? 0 -> 7; INC_CHAPTER; RETURN
    let bytes = [0x0C, 0x10, 0x09, 0x00, 0x07, 0x00, 0x2D, 0x0B];
    let (mut engine, _) = engine_with(vec![actor(&bytes)]);
    engine.process_life_script(0).expect("runs");
    assert_eq!(engine.game.chapter, 0);
}

#[test]
fn or_if_jumps_into_the_body() {
    // OR_IF CHAPTER == 0 -> 13; IF CHAPTER == 9 -> 14; INC_CHAPTER; RETURN
    let bytes = [
        0x37, 0x15, 0x00, 0x00, 0x0D, 0x00, 0x0C, 0x15, 0x00, 0x09, 0x0E, 0x00, 0x0B, 0x2D,
        0x0B,
    ];
    let (mut engine, _) = engine_with(vec![actor(&bytes)]);
    engine.process_life_script(0).expect("runs");
    assert_eq!(engine.game.chapter, 1);
}

#[test]
fn life_damage_floors_at_zero() {
    // SUB_LIFE_POINT_OBJ(1, 200); SET_LIFE_POINT_OBJ(0, 90); RETURN
    let bytes = [0x3E, 0x01, 0xC8, 0x3D, 0x00, 0x5A, 0x0B];
    let (mut engine, _) = engine_with(vec![actor(&bytes), Actor::default()]);
    engine.process_life_script(0).expect("runs");
    assert_eq!(engine.scene.actors[1].life, 0);
    assert_eq!(engine.scene.actors[0].life, 50);
}

#[test]
fn repeated_payments_share_one_counter() {
    // GIVE_GOLD_PIECES(10); GIVE_GOLD_PIECES(5); RETURN
    let bytes = [0x28, 0x0A, 0x00, 0x28, 0x05, 0x00, 0x0B];
    let (mut engine, _) = engine_with(vec![actor(&bytes)]);
    engine.game.kashes = 100;

    engine.process_life_script(0).expect("runs");
    assert_eq!(engine.game.kashes, 85);
    let counters: Vec<_> = engine
        .overlays
        .iter()
        .filter(|overlay| overlay.kind == OverlayType::NumberRange)
        .collect();
    assert_eq!(counters.len(), 1);
    assert_eq!(counters[0].info1, 85);
    let sprites = engine
        .overlays
        .iter()
        .filter(|overlay| overlay.kind == OverlayType::Sprite)
        .count();
    assert_eq!(sprites, 2);
}

#[test]
fn message_freezes_the_clock_only_while_shown() {
    // MESSAGE(5); RETURN
    let (mut engine, recorder) = engine_with(vec![actor(&[0x19, 0x05, 0x00, 0x0B])]);
    engine.process_life_script(0).expect("runs");

    assert!(!engine.clock.is_frozen());
    assert_eq!(engine.clock.history().len(), 2);
    assert_eq!(engine.scene.talking_actor, 0);
    let events = recorder.events();
    assert!(events.contains(&HostEvent::ProgressiveText { text: 5 }));
    assert_eq!(events.last(), Some(&HostEvent::Redraw { background: true }));
}

#[test]
fn library_fan_line_unlocks_achievement() {
    // MESSAGE(284); RETURN
    let mut actors: Vec<Actor> = (0..8).map(|_| Actor::default()).collect();
    actors.push(actor(&[0x19, 0x1C, 0x01, 0x0B]));
    let (mut engine, recorder) = engine_with(actors);
    engine.scene.current_scene = 10;

    engine.process_life_script(8).expect("runs");
    assert!(engine.achievements.contains("LBA_ACH_008"));
    assert!(recorder.events().contains(&HostEvent::Achievement {
        id: "LBA_ACH_008".to_string()
    }));
}

#[test]
fn choices_resolve_to_the_picked_text() {
    // ADD_CHOICE(10); ADD_CHOICE(11); ASK_CHOICE(12); RETURN
    let bytes = [0x44, 0x0A, 0x00, 0x44, 0x0B, 0x00, 0x45, 0x0C, 0x00, 0x0B];
    let (mut engine, recorder) = engine_with(vec![actor(&bytes)]);
    recorder.queue_choice(1);

    engine.process_life_script(0).expect("runs");
    assert_eq!(engine.game.choice_answer, 11);
    assert!(engine.game.choices.is_empty());
}

#[test]
fn dirmode_reads_follow_target_only_for_follow() {
    // SET_DIRMODE(FOLLOW, 1); RETURN
    let (mut engine, _) = engine_with(vec![actor(&[0x1B, 0x02, 0x01, 0x0B]), Actor::default()]);
    engine.process_life_script(0).expect("runs");
    assert_eq!(engine.scene.actors[0].control_mode, ControlMode::Follow);
    assert_eq!(engine.scene.actors[0].followed_actor, 1);

    // SET_DIRMODE(MANUAL); RETURN
    let (mut engine, _) = engine_with(vec![actor(&[0x1B, 0x01, 0x0B])]);
    engine.process_life_script(0).expect("runs");
    assert_eq!(engine.scene.actors[0].control_mode, ControlMode::Manual);
    assert_eq!(engine.scene.actors[0].life_cursor, 0);
}

#[test]
fn unknown_modes_are_skipped_without_desync() {
    // SET_DIRMODE(9); SET_DIRMODE_OBJ(1, 9); SET_BEHAVIOUR(7); INC_CHAPTER; RETURN
    let script = [0x1B, 0x09, 0x1C, 0x01, 0x09, 0x1E, 0x07, 0x2D, 0x0B];
    let (mut engine, recorder) = engine_with(vec![actor(&script), Actor::default()]);
    engine.process_life_script(0).expect("unknown modes are not fatal");

    assert_eq!(engine.game.chapter, 1);
    assert_eq!(engine.scene.actors[0].control_mode, ControlMode::NoMove);
    assert_eq!(engine.scene.actors[1].control_mode, ControlMode::NoMove);
    assert_eq!(engine.hero.behaviour, HeroBehaviour::Normal);
    assert!(recorder.events().is_empty());
}

#[test]
fn anim_set_leaves_the_animation_to_the_host() {
    // ANIM_SET(7); BETA(1024); RETURN
    let (mut engine, recorder) = engine_with(vec![actor(&[0x5F, 0x07, 0x50, 0x00, 0x04, 0x0B])]);
    engine.process_life_script(0).expect("runs");

    let hero = &engine.scene.actors[0];
    assert_eq!(hero.anim, ANIM_NONE);
    assert_eq!(hero.previous_anim, -1);
    assert_eq!(hero.angle, 1024);
    assert_eq!(
        recorder.events(),
        vec![
            HostEvent::InitAnim {
                actor: 0,
                anim: 7,
                anim_kind: AnimKind::Loop,
                next: 0
            },
            HostEvent::ClearRealAngle { actor: 0 },
        ]
    );
}

#[test]
fn dark_palette_waits_for_a_pending_fade() {
    // SET_DARK_PAL; RETURN
    let (mut engine, recorder) = engine_with(vec![actor(&[0x5C, 0x0B])]);
    engine.screen.fade_palette = true;
    engine.process_life_script(0).expect("runs");
    assert!(engine.screen.use_alternate_palette);
    assert!(recorder.events().is_empty());

    engine.screen.fade_palette = false;
    engine.process_life_script(0).expect("runs");
    assert_eq!(
        recorder.events(),
        vec![HostEvent::SetPalette {
            palette: PaletteKind::Dark
        }]
    );
}

#[test]
fn credits_text_scrolls_then_clears() {
    // TEXT(1); TEXT(2); CLEAR_TEXT; RETURN
    let bytes = [0x67, 0x01, 0x00, 0x67, 0x02, 0x00, 0x68, 0x0B];
    let (mut engine, recorder) = engine_with(vec![actor(&bytes)]);
    engine.process_life_script(0).expect("runs");

    assert_eq!(engine.text.credits_y, 0);
    let events = recorder.events();
    let drawn: Vec<i32> = events
        .iter()
        .filter_map(|event| match event {
            HostEvent::DrawText { y, .. } => Some(*y),
            _ => None,
        })
        .collect();
    assert_eq!(drawn, vec![0, 40]);
    assert!(events.contains(&HostEvent::FillRect {
        rect: Rect {
            left: 0,
            top: 0,
            right: 639,
            bottom: 240
        },
        color: 0
    }));
}

#[test]
fn brutal_exit_returns_to_menu() {
    let (mut engine, _) = engine_with(vec![actor(&[0x69])]);
    engine.process_life_script(0).expect("runs");
    assert_eq!(engine.loop_state, SceneLoopState::ReturnToMenu);
}

#[test]
fn opcode_past_the_table_is_fatal() {
    let (mut engine, _) = engine_with(vec![actor(&[0x6A])]);
    assert_eq!(
        engine.process_life_script(0),
        Err(LifeError::UnknownOpcode {
            actor: 0,
            offset: 0,
            opcode: 0x6A
        })
    );
}

#[test]
fn jump_outside_the_script_is_fatal() {
    let (mut engine, _) = engine_with(vec![actor(&[0x03, 0x64, 0x00])]);
    assert_eq!(
        engine.process_life_script(0),
        Err(LifeError::InvalidJump {
            target: 100,
            len: 3
        })
    );
}

/// Every straight-line opcode must consume exactly the operand bytes the
/// format table declares, or the trailing RETURN would be misread.
#[test]
fn handlers_consume_their_declared_operands() {
    for info in LIFE_OPCODES.iter() {
        if info.flow != Flow::Next || !matches!(info.layout, Layout::Fixed(_)) {
            continue;
        }
        let Some(size) = info.fixed_operand_size() else {
            continue;
        };
        let mut bytes = vec![info.code];
        bytes.extend(std::iter::repeat(0).take(size));
        bytes.push(0x0B);

        let (mut engine, _) = engine_with(vec![actor(&bytes)]);
        engine.scene.tracks = vec![IVec3::ZERO];
        engine
            .process_life_script(0)
            .unwrap_or_else(|err| panic!("{} failed: {err}", info.name));
        assert_ne!(
            engine.scene.actors[0].life_cursor,
            -1,
            "{} desynchronised the stream",
            info.name
        );
    }
}
