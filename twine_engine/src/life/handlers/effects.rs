//! Camera, palette, grid, audio and projection changes.

use glam::IVec3;
use log::debug;
use rand::Rng;
use twine_formats::life::MAX_MOVIE_NAME_LEN;

use crate::engine::LifeEngine;
use crate::error::{LifeError, LifeResult};
use crate::life::context::LifeContext;
use crate::life::table::LifeSignal;
use crate::presentation::{PaletteFade, PaletteKind, PerspectiveCamera, Projection, TextBank};

pub fn cam_follow(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let followed = ctx.stream.read_u8()?;
    debug!("LIFE::CAM_FOLLOW({followed})");
    if engine.scene.followed_actor != i32::from(followed) {
        engine.scene.actor(usize::from(followed))?;
        engine.host.screen.center_on_actor(usize::from(followed));
        engine.scene.followed_actor = i32::from(followed);
    }
    Ok(LifeSignal::Continue)
}

fn toggle_scenery_view(engine: &mut LifeEngine, enter: bool) {
    let screen = engine.host.screen.clone();
    screen.fade_to_black();
    screen.scenery_view(enter);
    engine.screen.in_scenery_view = enter;
    screen.set_palette(PaletteKind::Back);
    engine.screen.fade_palette = true;
}

/// Enter or leave the zoomed scenery view. Entering is skipped when the
/// player disabled zoom.
pub fn zoom(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let zoom = ctx.stream.read_u8()? != 0;
    debug!("LIFE::ZOOM({zoom})");
    let in_view = engine.screen.in_scenery_view;
    if zoom && !in_view && engine.config.scenery_zoom {
        toggle_scenery_view(engine, true);
    } else if !zoom && in_view {
        toggle_scenery_view(engine, false);
        engine.screen.req_bg_redraw = true;
    }
    Ok(LifeSignal::Continue)
}

/// Reads a NUL-terminated movie name, then plays it.
pub fn play_fla(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let start = ctx.stream.pos();
    let mut name = Vec::new();
    loop {
        let byte = ctx.stream.read_u8()?;
        if byte == 0 {
            break;
        }
        name.push(byte);
        if name.len() >= MAX_MOVIE_NAME_LEN {
            return Err(LifeError::MovieNameTooLong {
                offset: start,
                max: MAX_MOVIE_NAME_LEN,
            });
        }
    }
    let name = String::from_utf8_lossy(&name);
    debug!("LIFE::PLAY_FLA({name})");
    engine.host.audio.play_movie(&name);
    engine.host.screen.set_palette(PaletteKind::Current);
    engine.host.screen.clear_screen();
    Ok(LifeSignal::Continue)
}

pub fn play_midi(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let midi = ctx.stream.read_u8()?;
    debug!("LIFE::PLAY_MIDI({midi})");
    engine.host.audio.play_midi(midi);
    Ok(LifeSignal::Continue)
}

pub fn midi_off(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    debug!("LIFE::MIDI_OFF()");
    engine.host.audio.stop_midi();
    Ok(LifeSignal::Continue)
}

pub fn play_cd_track(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let track = ctx.stream.read_u8()?;
    debug!("LIFE::PLAY_CD_TRACK({track})");
    engine.host.audio.play_cd_track(track);
    Ok(LifeSignal::Continue)
}

pub fn set_grm(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let grid = ctx.stream.read_u8()?;
    debug!("LIFE::SET_GRM({grid})");
    engine.scene.ceiling_grid = i32::from(grid);
    engine.host.screen.init_ceiling_grid(i32::from(grid));
    Ok(LifeSignal::Continue)
}

pub fn grm_off(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    debug!("LIFE::GRM_OFF()");
    if engine.scene.ceiling_grid != -1 {
        engine.scene.ceiling_grid = -1;
        engine.host.screen.rebuild_grid();
        engine.host.screen.redraw(true);
    }
    Ok(LifeSignal::Continue)
}

fn fade(engine: &mut LifeEngine, fade: PaletteFade) -> LifeResult<LifeSignal> {
    debug!("LIFE::FADE({fade:?})");
    let _freeze = engine.clock.freeze();
    engine.host.screen.fade(fade);
    engine.screen.use_alternate_palette = fade.ends_on_alternate();
    Ok(LifeSignal::Continue)
}

pub fn fade_pal_red(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    fade(engine, PaletteFade::PalToRed)
}

pub fn fade_alarm_red(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    fade(engine, PaletteFade::AlarmToRed)
}

pub fn fade_alarm_pal(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    fade(engine, PaletteFade::AlarmToPal)
}

pub fn fade_red_pal(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    fade(engine, PaletteFade::RedToPal)
}

pub fn fade_red_alarm(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    fade(engine, PaletteFade::RedToAlarm)
}

pub fn fade_pal_alarm(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    fade(engine, PaletteFade::PalToAlarm)
}

/// While a fade-in is pending the palette is only recorded; the fade picks
/// it up on the next redraw.
pub fn set_dark_pal(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    debug!("LIFE::SET_DARK_PAL()");
    engine.screen.use_alternate_palette = true;
    if !engine.screen.fade_palette {
        engine.host.screen.set_palette(PaletteKind::Dark);
    }
    Ok(LifeSignal::Continue)
}

pub fn set_normal_pal(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    debug!("LIFE::SET_NORMAL_PAL()");
    engine.screen.use_alternate_palette = false;
    if !engine.screen.fade_palette {
        engine.host.screen.set_palette(PaletteKind::Main);
    }
    Ok(LifeSignal::Continue)
}

/// Spawn an explosion near another actor, jittered on every axis.
pub fn explode_obj(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let other = ctx.stream.read_u8()?;
    debug!("LIFE::EXPLODE_OBJ({other})");
    let pos = engine.scene.actor(usize::from(other))?.pos;
    let jitter = IVec3::new(
        engine.rng.gen_range(0..512) - 256,
        engine.rng.gen_range(0..256) - 128,
        engine.rng.gen_range(0..512) - 256,
    );
    engine.host.scene.extra_explode(pos + jitter);
    Ok(LifeSignal::Continue)
}

pub fn proj_iso(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    debug!("LIFE::PROJ_ISO()");
    engine.screen.projection = Projection::Isometric;
    engine.host.screen.set_projection(&engine.screen.projection);
    Ok(LifeSignal::Continue)
}

/// Credits camera: perspective projection over a frozen copy of the scene.
pub fn proj_3d(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    debug!("LIFE::PROJ_3D()");
    engine.host.screen.copy_front_to_work();
    engine.scene.grid_tile_rendering = false;
    let camera = PerspectiveCamera::credits(engine.config.screen_width, engine.config.screen_height);
    engine.screen.projection = Projection::Perspective { camera };
    engine.host.screen.set_projection(&engine.screen.projection);
    engine.host.text.init_text_bank(TextBank::Credits);
    engine.text.text_bank = Some(TextBank::Credits);
    Ok(LifeSignal::Continue)
}
