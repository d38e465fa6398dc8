//! First half of every conditional: measure something and leave the result
//! in the scene's current script value.

use log::debug;
use twine_formats::{LifeCondition, ValueWidth};

use crate::actor::{HeroBehaviour, HERO_INDEX};
use crate::engine::LifeEngine;
use crate::error::{LifeError, LifeResult};
use crate::game_state::MAX_INVENTORY_ITEMS;
use crate::geometry::{
    angle_towards, clamp_angle, clamp_distance, distance_2d, distance_3d, ANGLE_360, ANGLE_45,
    ANGLE_90, MAX_TARGET_ACTOR_DISTANCE, PLANAR_HEIGHT_CUTOFF,
};
use crate::overlay::{OverlayPosType, OverlayType};

use super::context::LifeContext;

/// Read a condition and its optional parameter, store the measured value and
/// return the width of the literal it is compared against.
pub fn evaluate_condition(
    engine: &mut LifeEngine,
    ctx: &mut LifeContext,
) -> LifeResult<ValueWidth> {
    let offset = ctx.stream.pos();
    let code = ctx.stream.read_u8()?;
    let condition = LifeCondition::try_from(code).map_err(|condition| LifeError::UnknownCondition {
        actor: ctx.actor_idx,
        offset,
        condition,
    })?;
    let parameter = if condition.takes_parameter() {
        Some(ctx.stream.read_u8()?)
    } else {
        None
    };
    let param = parameter.unwrap_or(0);
    let param_idx = usize::from(param);
    let actor_idx = ctx.actor_idx;

    let value = match condition {
        LifeCondition::Col => {
            let actor = engine.scene.actor(actor_idx)?;
            if actor.life <= 0 {
                -1
            } else {
                actor.collision
            }
        }
        LifeCondition::ColObj => {
            let other = engine.scene.actor(param_idx)?;
            if other.life <= 0 {
                -1
            } else {
                other.collision
            }
        }
        LifeCondition::Distance => {
            let actor = engine.scene.actor(actor_idx)?;
            let other = engine.scene.actor(param_idx)?;
            if other.is_dead() || (actor.pos.y - other.pos.y).abs() >= PLANAR_HEIGHT_CUTOFF {
                MAX_TARGET_ACTOR_DISTANCE
            } else {
                clamp_distance(distance_2d(actor.pos, other.pos))
            }
        }
        LifeCondition::Zone => engine.scene.actor(actor_idx)?.zone,
        LifeCondition::ZoneObj => engine.scene.actor(param_idx)?.zone,
        LifeCondition::Body => engine.scene.actor(actor_idx)?.body,
        LifeCondition::BodyObj => engine.scene.actor(param_idx)?.body,
        LifeCondition::Anim => engine.scene.actor(actor_idx)?.anim,
        LifeCondition::AnimObj => engine.scene.actor(param_idx)?.anim,
        LifeCondition::Track => engine.scene.actor(actor_idx)?.label_idx,
        LifeCondition::TrackObj => engine.scene.actor(param_idx)?.label_idx,
        LifeCondition::FlagCube => i32::from(engine.scene.flag(param)?),
        LifeCondition::ConeView => cone_view(engine, actor_idx, param_idx)?,
        LifeCondition::HitBy => engine.scene.actor(actor_idx)?.hit_by,
        LifeCondition::Action => i32::from(engine.zone_action),
        LifeCondition::FlagGame => {
            if engine.game.inventory_disabled() && param_idx < MAX_INVENTORY_ITEMS {
                0
            } else {
                i32::from(engine.game.game_flag(param))
            }
        }
        LifeCondition::LifePoint => engine.scene.actor(actor_idx)?.life,
        LifeCondition::LifePointObj => engine.scene.actor(param_idx)?.life,
        LifeCondition::NumLittleKeys => engine.game.keys,
        LifeCondition::NumGoldPieces => engine.game.kashes,
        LifeCondition::Behaviour => engine.hero.behaviour.index(),
        LifeCondition::Chapter => engine.game.chapter,
        LifeCondition::Distance3d => {
            let actor = engine.scene.actor(actor_idx)?;
            let other = engine.scene.actor(param_idx)?;
            if other.is_dead() {
                MAX_TARGET_ACTOR_DISTANCE
            } else {
                clamp_distance(distance_3d(actor.pos, other.pos))
            }
        }
        LifeCondition::MagicLevel => engine.game.magic_level,
        LifeCondition::MagicPoints => engine.game.magic_points,
        LifeCondition::UseInventory => use_inventory(engine, param)?,
        LifeCondition::Choice => engine.game.choice_answer,
        LifeCondition::Fuel => engine.game.gas,
        LifeCondition::CarriedBy => engine.scene.actor(actor_idx)?.carried_by,
        LifeCondition::Cdrom => 1,
    };

    match parameter {
        Some(param) => debug!("LIFE::COND {}({param}) = {value}", condition.name()),
        None => debug!("LIFE::COND {}() = {value}", condition.name()),
    }
    engine.scene.current_script_value = value;
    Ok(condition.value_width())
}

/// Distance to `target` when it stands inside the actor's field of view.
fn cone_view(engine: &LifeEngine, actor_idx: usize, target_idx: usize) -> LifeResult<i32> {
    let actor = engine.scene.actor(actor_idx)?;
    let target = engine.scene.actor(target_idx)?;
    if target.is_dead() {
        return Ok(MAX_TARGET_ACTOR_DISTANCE);
    }

    let (angle, distance) = if (target.pos.y - actor.pos.y).abs() < PLANAR_HEIGHT_CUTOFF {
        (
            angle_towards(actor.pos, target.pos),
            clamp_distance(distance_2d(actor.pos, target.pos)),
        )
    } else {
        (0, MAX_TARGET_ACTOR_DISTANCE)
    };

    // A hero who is not sneaking is noticed from any direction.
    if target_idx == HERO_INDEX && engine.hero.behaviour != HeroBehaviour::Discrete {
        return Ok(distance);
    }

    let relative = clamp_angle(actor.angle + ANGLE_360 + ANGLE_45 - angle + ANGLE_360);
    if relative.abs() <= ANGLE_90 {
        Ok(distance)
    } else {
        Ok(MAX_TARGET_ACTOR_DISTANCE)
    }
}

fn use_inventory(engine: &mut LifeEngine, item: u8) -> LifeResult<i32> {
    if engine.game.inventory_disabled() {
        return Ok(0);
    }
    let used = engine.loop_inventory_item == Some(item)
        || (engine.game.inventory_flag(item)? == 1 && engine.game.has_item(item));
    if !used {
        return Ok(0);
    }
    let now = engine.clock.now();
    engine.overlays.add(
        OverlayType::InventoryItem,
        i32::from(item),
        0,
        0,
        0,
        OverlayPosType::Normal,
        3,
        now,
    );
    Ok(1)
}

#[cfg(test)]
mod tests {
    use glam::IVec3;

    use super::*;
    use crate::actor::Actor;
    use crate::callbacks::Collaborators;
    use crate::config::LifeConfig;
    use crate::game_state::GAMEFLAG_INVENTORY_DISABLED;
    use crate::scene::Scene;
    use crate::script::LifeScript;

    fn setup(condition: &[u8]) -> (LifeEngine, LifeContext) {
        let script = LifeScript::new(condition.to_vec());
        let actors = vec![
            Actor::with_script("hero", script.clone()),
            Actor::with_script("guard", LifeScript::default()),
        ];
        let engine = LifeEngine::new(
            LifeConfig::default(),
            Scene::new(0, actors),
            Collaborators::silent(),
        );
        (engine, LifeContext::new(0, script, 0))
    }

    #[test]
    fn far_actors_report_the_sentinel_distance() {
        let (mut engine, mut ctx) = setup(&[0x16, 1]);
        engine.scene.actors[1].pos = IVec3::new(30000, 0, 30000);
        let width = evaluate_condition(&mut engine, &mut ctx).expect("condition");
        assert_eq!(width, ValueWidth::Word);
        assert_eq!(engine.scene.current_script_value, MAX_TARGET_ACTOR_DISTANCE);
        assert_eq!(ctx.stream.pos(), 2);
    }

    #[test]
    fn dead_target_is_out_of_reach() {
        let (mut engine, mut ctx) = setup(&[0x02, 1]);
        engine.scene.actors[1].pos = IVec3::new(100, 0, 0);
        engine.scene.actors[1].dynamic_flags.is_dead = true;
        evaluate_condition(&mut engine, &mut ctx).expect("condition");
        assert_eq!(engine.scene.current_script_value, MAX_TARGET_ACTOR_DISTANCE);
    }

    #[test]
    fn disabled_inventory_hides_item_flags() {
        let (mut engine, mut ctx) = setup(&[0x0F, 3]);
        engine.game.set_game_flag(3, 1);
        engine.game.set_game_flag(GAMEFLAG_INVENTORY_DISABLED, 1);
        let width = evaluate_condition(&mut engine, &mut ctx).expect("condition");
        assert_eq!(width, ValueWidth::Byte);
        assert_eq!(engine.scene.current_script_value, 0);
    }

    #[test]
    fn unknown_condition_is_fatal() {
        let (mut engine, mut ctx) = setup(&[0x1E]);
        assert_eq!(
            evaluate_condition(&mut engine, &mut ctx),
            Err(LifeError::UnknownCondition {
                actor: 0,
                offset: 0,
                condition: 0x1E
            })
        );
    }
}
