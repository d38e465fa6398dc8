//! Control flow, life-cursor changes and script terminators.

use log::debug;
use twine_formats::life::op;

use crate::actor::ACTOR_MAX_LIFE;
use crate::engine::{LifeEngine, SceneLoopState};
use crate::error::LifeResult;
use crate::life::conditions::evaluate_condition;
use crate::life::context::LifeContext;
use crate::life::operators::evaluate_operator;
use crate::life::table::LifeSignal;
use crate::scene::ScenePositionType;

/// Magic points restored when the ending plays.
const THE_END_MAGIC_POINTS: i32 = 80;

fn test_condition(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<bool> {
    let width = evaluate_condition(engine, ctx)?;
    evaluate_operator(engine, ctx, width)
}

fn halt(engine: &mut LifeEngine, ctx: &LifeContext) -> LifeResult<()> {
    engine.scene.actor_mut(ctx.actor_idx)?.life_cursor = -1;
    Ok(())
}

pub fn empty(_engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    Ok(LifeSignal::Continue)
}

pub fn end(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    debug!("LIFE::END()");
    halt(engine, ctx)?;
    Ok(LifeSignal::Break)
}

pub fn nop(_engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    ctx.stream.skip(1)?;
    Ok(LifeSignal::Continue)
}

/// LABEL and COMPORTEMENT markers carry an id the interpreter ignores.
pub fn label(_engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    ctx.stream.skip(1)?;
    Ok(LifeSignal::Continue)
}

/// Switch that already fired: always jumps over its body, and re-arms as
/// SWIF once the condition turns false.
pub fn snif(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    if !test_condition(engine, ctx)? {
        ctx.set_opcode(&mut engine.scene, op::SWIF)?;
    }
    let target = ctx.stream.read_i16()?;
    debug!("LIFE::SNIF -> {target}");
    ctx.stream.seek(target)?;
    Ok(LifeSignal::Continue)
}

/// OFFSET and ELSE: unconditional jump.
pub fn offset(_engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let target = ctx.stream.read_i16()?;
    debug!("LIFE::OFFSET({target})");
    ctx.stream.seek(target)?;
    Ok(LifeSignal::Continue)
}

/// The condition is still evaluated for its side effects.
pub fn neverif(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    test_condition(engine, ctx)?;
    let target = ctx.stream.read_i16()?;
    debug!("LIFE::NEVERIF -> {target}");
    ctx.stream.seek(target)?;
    Ok(LifeSignal::Continue)
}

pub fn ret(_engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    debug!("LIFE::RETURN()");
    Ok(LifeSignal::Break)
}

pub fn if_(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    if test_condition(engine, ctx)? {
        ctx.stream.skip(2)?;
    } else {
        let target = ctx.stream.read_i16()?;
        debug!("LIFE::IF false -> {target}");
        ctx.stream.seek(target)?;
    }
    Ok(LifeSignal::Continue)
}

pub fn swif(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    if test_condition(engine, ctx)? {
        ctx.stream.skip(2)?;
        ctx.set_opcode(&mut engine.scene, op::SNIF)?;
    } else {
        let target = ctx.stream.read_i16()?;
        debug!("LIFE::SWIF false -> {target}");
        ctx.stream.seek(target)?;
    }
    Ok(LifeSignal::Continue)
}

pub fn oneif(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    if test_condition(engine, ctx)? {
        ctx.stream.skip(2)?;
        ctx.set_opcode(&mut engine.scene, op::NEVERIF)?;
    } else {
        let target = ctx.stream.read_i16()?;
        debug!("LIFE::ONEIF false -> {target}");
        ctx.stream.seek(target)?;
    }
    Ok(LifeSignal::Continue)
}

/// Jumps when true, so consecutive OR_IFs short-circuit into the body.
pub fn or_if(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    if test_condition(engine, ctx)? {
        let target = ctx.stream.read_i16()?;
        debug!("LIFE::OR_IF true -> {target}");
        ctx.stream.seek(target)?;
    } else {
        ctx.stream.skip(2)?;
    }
    Ok(LifeSignal::Continue)
}

/// SET_LIFE and SET_COMPORTEMENT. Takes effect on the next invocation; the
/// running stream is unaffected.
pub fn set_life(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let cursor = ctx.stream.read_i16()?;
    debug!("LIFE::SET_LIFE({cursor})");
    engine.scene.actor_mut(ctx.actor_idx)?.life_cursor = i32::from(cursor);
    Ok(LifeSignal::Continue)
}

pub fn set_life_obj(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let other = ctx.stream.read_u8()?;
    let cursor = ctx.stream.read_i16()?;
    debug!("LIFE::SET_LIFE_OBJ({other}, {cursor})");
    engine.scene.actor_mut(usize::from(other))?.life_cursor = i32::from(cursor);
    Ok(LifeSignal::Continue)
}

pub fn change_cube(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let scene = ctx.stream.read_u8()?;
    debug!("LIFE::CHANGE_CUBE({scene})");
    engine.scene.need_change_scene = i32::from(scene);
    engine.scene.hero_position_type = ScenePositionType::Scene;
    Ok(LifeSignal::Continue)
}

pub fn holomap_traj(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let trajectory = ctx.stream.read_u8()?;
    debug!("LIFE::HOLOMAP_TRAJ({trajectory})");
    engine.scene.holomap_trajectory = i32::from(trajectory);
    Ok(LifeSignal::Continue)
}

pub fn game_over(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    debug!("LIFE::GAME_OVER()");
    let hero = engine.scene.hero_mut()?;
    hero.dynamic_flags.anim_ended = true;
    hero.set_life(0);
    engine.game.set_leafs(0);
    Ok(LifeSignal::Break)
}

pub fn the_end(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    debug!("LIFE::THE_END()");
    engine.loop_state = SceneLoopState::Finished;
    engine.game.set_leafs(0);
    engine.game.set_magic_points(THE_END_MAGIC_POINTS);
    engine.scene.current_scene = engine.config.final_battle_scene;
    engine.hero.behaviour = engine.hero.previous_behaviour;
    engine.scene.new_hero_pos.x = -1;
    let previous_angle = engine.hero.previous_angle;
    let hero = engine.scene.hero_mut()?;
    hero.set_life(ACTOR_MAX_LIFE);
    hero.angle = previous_angle;
    engine.host.scene.autosave();
    Ok(LifeSignal::Break)
}

pub fn brutal_exit(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    debug!("LIFE::BRUTAL_EXIT()");
    engine.loop_state = SceneLoopState::ReturnToMenu;
    Ok(LifeSignal::Break)
}
