//! Flags, inventory, money, magic and other persistent game counters.

use log::debug;

use crate::actor::ACTOR_MAX_LIFE;
use crate::clock::to_seconds;
use crate::engine::LifeEngine;
use crate::error::LifeResult;
use crate::geometry::average_value;
use crate::life::context::LifeContext;
use crate::life::table::LifeSignal;
use crate::overlay::{OverlayPosType, OverlayType, SPRITE_KASHES, SPRITE_KEY};

pub fn set_flag_cube(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let flag = ctx.stream.read_u8()?;
    let value = ctx.stream.read_u8()?;
    debug!("LIFE::SET_FLAG_CUBE({flag}, {value})");
    engine.scene.set_flag(flag, value)?;
    Ok(LifeSignal::Continue)
}

pub fn set_flag_game(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let flag = ctx.stream.read_u8()?;
    let value = ctx.stream.read_u8()?;
    debug!("LIFE::SET_FLAG_GAME({flag}, {value})");
    engine.game.set_game_flag(flag, value);
    Ok(LifeSignal::Continue)
}

pub fn use_one_little_key(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    debug!("LIFE::USE_ONE_LITTLE_KEY()");
    engine.game.add_keys(-1);
    let now = engine.clock.now();
    engine.overlays.add(
        OverlayType::Sprite,
        SPRITE_KEY,
        0,
        0,
        0,
        OverlayPosType::FollowActor,
        1,
        now,
    );
    Ok(LifeSignal::Continue)
}

/// Take money from the hero. A counter already on screen keeps rolling from
/// its current value instead of stacking a second one.
pub fn give_gold_pieces(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let amount = ctx.stream.read_i16()?;
    debug!("LIFE::GIVE_GOLD_PIECES({amount})");
    let old_kashes = engine.game.kashes;
    engine.game.add_kashes(-i32::from(amount));
    let kashes = engine.game.kashes;
    let now = engine.clock.now();

    engine.overlays.add(
        OverlayType::Sprite,
        SPRITE_KASHES,
        10,
        15,
        0,
        OverlayPosType::Normal,
        3,
        now,
    );

    if let Some(counter) = engine.overlays.find_mut(OverlayType::NumberRange) {
        let elapsed = counter.life_time - now - to_seconds(1);
        counter.info0 = average_value(counter.info1, counter.info0, 100, elapsed);
        counter.info1 = kashes;
        counter.life_time = now + to_seconds(3);
    } else {
        engine.overlays.add(
            OverlayType::NumberRange,
            old_kashes,
            50,
            20,
            kashes,
            OverlayPosType::Normal,
            3,
            now,
        );
    }
    Ok(LifeSignal::Continue)
}

pub fn inc_chapter(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    engine.game.chapter += 1;
    debug!("LIFE::INC_CHAPTER() -> {}", engine.game.chapter);
    Ok(LifeSignal::Continue)
}

pub fn found_object(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let item = ctx.stream.read_u8()?;
    debug!("LIFE::FOUND_OBJECT({item})");
    let _freeze = engine.clock.freeze();
    engine.host.scene.found_item(item);
    engine.host.screen.redraw(true);
    Ok(LifeSignal::Continue)
}

pub fn give_bonus(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let flag = ctx.stream.read_u8()?;
    debug!("LIFE::GIVE_BONUS({flag})");
    if engine.scene.actor(ctx.actor_idx)?.bonus_parameter.has_bonus() {
        engine.host.scene.extra_bonus(ctx.actor_idx);
    }
    if flag != 0 {
        engine
            .scene
            .actor_mut(ctx.actor_idx)?
            .bonus_parameter
            .given_nothing = true;
    }
    Ok(LifeSignal::Continue)
}

pub fn set_magic_level(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let level = ctx.stream.read_u8()?;
    debug!("LIFE::SET_MAGIC_LEVEL({level})");
    engine.game.magic_level = i32::from(level);
    engine.game.set_max_magic_points();
    Ok(LifeSignal::Continue)
}

pub fn sub_magic_point(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let points = ctx.stream.read_u8()?;
    debug!("LIFE::SUB_MAGIC_POINT({points})");
    engine.game.add_magic_points(-i32::from(points));
    Ok(LifeSignal::Continue)
}

pub fn inc_clover_box(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    debug!("LIFE::INC_CLOVER_BOX()");
    engine.game.add_leaf_boxes(1);
    Ok(LifeSignal::Continue)
}

pub fn set_used_inventory(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let item = ctx.stream.read_u8()?;
    debug!("LIFE::SET_USED_INVENTORY({item})");
    engine.game.set_used_inventory(item);
    Ok(LifeSignal::Continue)
}

pub fn set_holo_pos(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let location = ctx.stream.read_u8()?;
    debug!("LIFE::SET_HOLO_POS({location})");
    engine.game.set_holomap_position(location)?;
    Ok(LifeSignal::Continue)
}

pub fn clr_holo_pos(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let location = ctx.stream.read_u8()?;
    debug!("LIFE::CLR_HOLO_POS({location})");
    engine.game.clear_holomap_position(location)?;
    Ok(LifeSignal::Continue)
}

pub fn add_fuel(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let fuel = ctx.stream.read_u8()?;
    debug!("LIFE::ADD_FUEL({fuel})");
    engine.game.add_gas(i32::from(fuel));
    Ok(LifeSignal::Continue)
}

pub fn sub_fuel(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let fuel = ctx.stream.read_u8()?;
    debug!("LIFE::SUB_FUEL({fuel})");
    engine.game.add_gas(-i32::from(fuel));
    Ok(LifeSignal::Continue)
}

pub fn full_point(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    debug!("LIFE::FULL_POINT()");
    engine.scene.hero_mut()?.set_life(ACTOR_MAX_LIFE);
    engine.game.set_max_magic_points();
    Ok(LifeSignal::Continue)
}
