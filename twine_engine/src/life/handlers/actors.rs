//! Handlers that reshape a single actor: model, animation, movement mode,
//! doors, collision and damage.

use glam::IVec3;
use log::{debug, warn};
use rand::Rng;

use crate::actor::{
    Actor, ControlMode, HeroBehaviour, ANIM_BIG_HIT, ANIM_HIT, ANIM_HIT2, ANIM_INVALID, ANIM_NONE,
    ANIM_STANDING, HERO_INDEX,
};
use crate::callbacks::AnimKind;
use crate::engine::LifeEngine;
use crate::error::LifeResult;
use crate::geometry::{ANGLE_0, ANGLE_180, ANGLE_270, ANGLE_90};
use crate::life::context::LifeContext;
use crate::life::table::LifeSignal;

/// Height above the victim's origin where hit stars spawn.
const HIT_STARS_HEIGHT: i32 = 1000;

fn change_body(engine: &mut LifeEngine, actor: usize, body: u8) -> LifeResult<()> {
    engine.scene.actor_mut(actor)?.body = i32::from(body);
    engine.host.animation.init_body(actor, i32::from(body));
    Ok(())
}

fn change_anim(
    engine: &mut LifeEngine,
    actor: usize,
    anim: i32,
    kind: AnimKind,
    next: i32,
) -> LifeResult<()> {
    let target = engine.scene.actor_mut(actor)?;
    target.previous_anim = target.anim;
    target.anim = anim;
    engine.host.animation.init_anim(actor, anim, kind, next);
    Ok(())
}

pub fn body(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let body = ctx.stream.read_u8()?;
    debug!("LIFE::BODY({body})");
    change_body(engine, ctx.actor_idx, body)?;
    Ok(LifeSignal::Continue)
}

pub fn body_obj(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let other = ctx.stream.read_u8()?;
    let body = ctx.stream.read_u8()?;
    debug!("LIFE::BODY_OBJ({other}, {body})");
    change_body(engine, usize::from(other), body)?;
    Ok(LifeSignal::Continue)
}

pub fn anim(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let anim = ctx.stream.read_u8()?;
    debug!("LIFE::ANIM({anim})");
    change_anim(engine, ctx.actor_idx, i32::from(anim), AnimKind::Loop, ANIM_STANDING)?;
    Ok(LifeSignal::Continue)
}

pub fn anim_obj(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let other = ctx.stream.read_u8()?;
    let anim = ctx.stream.read_u8()?;
    debug!("LIFE::ANIM_OBJ({other}, {anim})");
    change_anim(engine, usize::from(other), i32::from(anim), AnimKind::Loop, ANIM_STANDING)?;
    Ok(LifeSignal::Continue)
}

/// Restart an animation from scratch even if it is already playing.
pub fn anim_set(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let anim = ctx.stream.read_u8()?;
    debug!("LIFE::ANIM_SET({anim})");
    // Forget the running animation so the host restarts it from frame 0.
    let actor = engine.scene.actor_mut(ctx.actor_idx)?;
    actor.previous_anim = -1;
    actor.anim = ANIM_NONE;
    engine
        .host
        .animation
        .init_anim(ctx.actor_idx, i32::from(anim), AnimKind::Loop, ANIM_STANDING);
    Ok(LifeSignal::Continue)
}

pub fn set_track(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let cursor = ctx.stream.read_i16()?;
    debug!("LIFE::SET_TRACK({cursor})");
    engine.scene.actor_mut(ctx.actor_idx)?.track_cursor = i32::from(cursor);
    Ok(LifeSignal::Continue)
}

pub fn set_track_obj(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let other = ctx.stream.read_u8()?;
    let cursor = ctx.stream.read_i16()?;
    debug!("LIFE::SET_TRACK_OBJ({other}, {cursor})");
    engine.scene.actor_mut(usize::from(other))?.track_cursor = i32::from(cursor);
    Ok(LifeSignal::Continue)
}

pub fn stop_l_track(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let actor = engine.scene.actor_mut(ctx.actor_idx)?;
    debug!("LIFE::STOP_L_TRACK({})", actor.current_label_ptr);
    actor.paused_track_ptr = actor.current_label_ptr;
    actor.track_cursor = -1;
    Ok(LifeSignal::Continue)
}

pub fn restore_l_track(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let actor = engine.scene.actor_mut(ctx.actor_idx)?;
    debug!("LIFE::RESTORE_L_TRACK({})", actor.paused_track_ptr);
    actor.track_cursor = actor.paused_track_ptr;
    Ok(LifeSignal::Continue)
}

pub fn fallable(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let flag = ctx.stream.read_u8()?;
    debug!("LIFE::FALLABLE({flag})");
    engine.scene.actor_mut(ctx.actor_idx)?.static_flags.can_fall = flag & 1 != 0;
    Ok(LifeSignal::Continue)
}

/// A follow target byte is only present when the new mode is Follow. Unknown
/// modes are skipped with their operands.
pub fn set_dirmode(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let raw = ctx.stream.read_u8()?;
    let mode = ControlMode::try_from(raw);
    let followed = if mode == Ok(ControlMode::Follow) {
        Some(ctx.stream.read_u8()?)
    } else {
        None
    };
    let Ok(mode) = mode else {
        warn!("actor {}: SET_DIRMODE with unknown mode {raw}", ctx.actor_idx);
        return Ok(LifeSignal::Continue);
    };
    debug!("LIFE::SET_DIRMODE({mode:?}, {followed:?})");
    let actor = engine.scene.actor_mut(ctx.actor_idx)?;
    actor.control_mode = mode;
    if let Some(followed) = followed {
        actor.followed_actor = i32::from(followed);
    }
    Ok(LifeSignal::Continue)
}

/// The follow byte is read when the target switches to Follow, or when the
/// actor running the script is itself in Follow2.
pub fn set_dirmode_obj(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let other = usize::from(ctx.stream.read_u8()?);
    let raw = ctx.stream.read_u8()?;
    let mode = ControlMode::try_from(raw);
    let own_mode = engine.scene.actor(ctx.actor_idx)?.control_mode;
    let followed = if mode == Ok(ControlMode::Follow) || own_mode == ControlMode::Follow2 {
        Some(ctx.stream.read_u8()?)
    } else {
        None
    };
    let Ok(mode) = mode else {
        warn!(
            "actor {}: SET_DIRMODE_OBJ({other}) with unknown mode {raw}",
            ctx.actor_idx
        );
        return Ok(LifeSignal::Continue);
    };
    debug!("LIFE::SET_DIRMODE_OBJ({other}, {mode:?}, {followed:?})");
    let target = engine.scene.actor_mut(other)?;
    target.control_mode = mode;
    if let Some(followed) = followed {
        target.followed_actor = i32::from(followed);
    }
    Ok(LifeSignal::Continue)
}

pub fn set_behaviour(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let raw = ctx.stream.read_u8()?;
    let Ok(behaviour) = HeroBehaviour::try_from(raw) else {
        warn!("actor {}: SET_BEHAVIOUR with unknown behaviour {raw}", ctx.actor_idx);
        return Ok(LifeSignal::Continue);
    };
    debug!("LIFE::SET_BEHAVIOUR({behaviour:?})");
    change_anim(engine, HERO_INDEX, ANIM_STANDING, AnimKind::Loop, ANIM_INVALID)?;
    engine.hero.behaviour = behaviour;
    let body = engine.scene.hero()?.body;
    engine.host.animation.init_body(HERO_INDEX, body);
    Ok(LifeSignal::Continue)
}

pub fn kill_obj(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let other = usize::from(ctx.stream.read_u8()?);
    debug!("LIFE::KILL_OBJ({other})");
    engine.scene.release_carried_actors(other)?;
    engine.scene.actor_mut(other)?.kill();
    Ok(LifeSignal::Continue)
}

pub fn suicide(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    debug!("LIFE::SUICIDE()");
    engine.scene.release_carried_actors(ctx.actor_idx)?;
    engine.scene.actor_mut(ctx.actor_idx)?.kill();
    Ok(LifeSignal::Continue)
}

fn place_door(
    engine: &mut LifeEngine,
    ctx: &mut LifeContext,
    angle: i32,
    place: fn(&mut Actor, i32),
) -> LifeResult<LifeSignal> {
    let distance = i32::from(ctx.stream.read_i16()?);
    debug!("LIFE::SET_DOOR(angle {angle}, {distance})");
    let actor = engine.scene.actor_mut(ctx.actor_idx)?;
    actor.angle = angle;
    place(actor, distance);
    actor.dynamic_flags.is_sprite_moving = false;
    actor.speed = 0;
    Ok(LifeSignal::Continue)
}

pub fn set_door_left(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    place_door(engine, ctx, ANGLE_270, |actor, d| actor.pos.x = actor.last_pos.x - d)
}

pub fn set_door_right(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    place_door(engine, ctx, ANGLE_90, |actor, d| actor.pos.x = actor.last_pos.x + d)
}

pub fn set_door_up(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    place_door(engine, ctx, ANGLE_180, |actor, d| actor.pos.z = actor.last_pos.z - d)
}

pub fn set_door_down(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    place_door(engine, ctx, ANGLE_0, |actor, d| actor.pos.z = actor.last_pos.z + d)
}

pub fn obj_col(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let collision = ctx.stream.read_u8()?;
    debug!("LIFE::OBJ_COL({collision})");
    engine
        .scene
        .actor_mut(ctx.actor_idx)?
        .static_flags
        .compute_collision_with_obj = collision != 0;
    Ok(LifeSignal::Continue)
}

/// 0 disables brick collision, 1 enables it, 2 adds low collision on top.
pub fn brick_col(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let collision = ctx.stream.read_u8()?;
    debug!("LIFE::BRICK_COL({collision})");
    let flags = &mut engine.scene.actor_mut(ctx.actor_idx)?.static_flags;
    flags.compute_collision_with_bricks = matches!(collision, 1 | 2);
    flags.compute_low_collision = collision == 2;
    Ok(LifeSignal::Continue)
}

pub fn invisible(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let hidden = ctx.stream.read_u8()?;
    debug!("LIFE::INVISIBLE({hidden})");
    engine.scene.actor_mut(ctx.actor_idx)?.static_flags.is_hidden = hidden != 0;
    Ok(LifeSignal::Continue)
}

pub fn pos_point(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let track = ctx.stream.read_u8()?;
    debug!("LIFE::POS_POINT({track})");
    let pos = engine.scene.track(track)?;
    engine.scene.actor_mut(ctx.actor_idx)?.pos = pos;
    Ok(LifeSignal::Continue)
}

pub fn set_life_point_obj(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let other = ctx.stream.read_u8()?;
    let life = ctx.stream.read_u8()?;
    debug!("LIFE::SET_LIFE_POINT_OBJ({other}, {life})");
    engine.scene.actor_mut(usize::from(other))?.set_life(i32::from(life));
    Ok(LifeSignal::Continue)
}

pub fn sub_life_point_obj(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let other = ctx.stream.read_u8()?;
    let damage = ctx.stream.read_u8()?;
    debug!("LIFE::SUB_LIFE_POINT_OBJ({other}, {damage})");
    let actor = engine.scene.actor_mut(usize::from(other))?;
    actor.add_life(-i32::from(damage));
    if actor.life < 0 {
        actor.set_life(0);
    }
    Ok(LifeSignal::Continue)
}

/// Strike another actor. Hits weaker than its armor only play a flinch.
pub fn hit_obj(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let other = usize::from(ctx.stream.read_u8()?);
    let strength = i32::from(ctx.stream.read_u8()?);
    debug!("LIFE::HIT_OBJ({other}, {strength})");

    let victim = engine.scene.actor(other)?;
    if victim.life <= 0 {
        return Ok(LifeSignal::Continue);
    }
    let (armor, current_anim, pos) = (victim.armor, victim.anim, victim.pos);
    engine.scene.actor_mut(other)?.hit_by = ctx.actor_idx as i32;

    if armor <= strength {
        if current_anim != ANIM_BIG_HIT && current_anim != ANIM_HIT2 {
            let anim = if engine.rng.gen::<bool>() {
                ANIM_HIT2
            } else {
                ANIM_BIG_HIT
            };
            change_anim(engine, other, anim, AnimKind::Insert, ANIM_NONE)?;
        }
        engine
            .host
            .scene
            .hit_stars(pos + IVec3::new(0, HIT_STARS_HEIGHT, 0));
        let victim = engine.scene.actor_mut(other)?;
        victim.add_life(-strength);
        if victim.life < 0 {
            victim.set_life(0);
        }
    } else {
        change_anim(engine, other, ANIM_HIT, AnimKind::Insert, ANIM_NONE)?;
    }
    Ok(LifeSignal::Continue)
}

/// Register the mechanical penguin; it stays inert until the hero uses it.
pub fn init_pingouin(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let penguin = ctx.stream.read_u8()?;
    debug!("LIFE::INIT_PINGOUIN({penguin})");
    engine.scene.meca_penguin = i32::from(penguin);
    let actor = engine.scene.actor_mut(usize::from(penguin))?;
    actor.dynamic_flags.is_dead = true;
    actor.entity = -1;
    actor.zone = -1;
    Ok(LifeSignal::Continue)
}

pub fn beta(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let angle = ctx.stream.read_i16()?;
    debug!("LIFE::BETA({angle})");
    engine.scene.actor_mut(ctx.actor_idx)?.angle = i32::from(angle);
    // Drop any turn in progress so the new heading sticks.
    engine.host.animation.clear_real_angle(ctx.actor_idx);
    Ok(LifeSignal::Continue)
}
