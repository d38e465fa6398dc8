//! Dialogue, choices and on-screen text.

use log::{debug, warn};

use crate::engine::LifeEngine;
use crate::error::LifeResult;
use crate::life::context::LifeContext;
use crate::life::table::LifeSignal;
use crate::overlay::{OverlayPosType, OverlayType};
use crate::presentation::{
    PaletteKind, Rect, TextClip, COLOR_BLACK, COLOR_WHITE, CREDITS_LINE_HEIGHT,
};

/// Resource entries holding Sendell's portrait and its palette.
const SENDELL_IMAGE: i32 = 25;
const SENDELL_PALETTE: i32 = 26;

/// Bubble and speaker color shared by every blocking dialogue opcode.
fn prepare_speaker(engine: &mut LifeEngine, speaker: usize) -> LifeResult<()> {
    let color = engine.scene.actor(speaker)?.talk_color;
    if engine.text.show_bubble {
        engine.host.text.draw_bubble(speaker);
    }
    engine.text.cross_color = color;
    engine.host.text.set_font_cross_color(color);
    Ok(())
}

fn speak(engine: &mut LifeEngine, speaker: usize, text: i16) -> LifeResult<()> {
    let _freeze = engine.clock.freeze();
    prepare_speaker(engine, speaker)?;
    engine.scene.talking_actor = speaker as i32;
    engine.host.text.draw_text_progressive(text);
    Ok(())
}

pub fn message(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let text = ctx.stream.read_i16()?;
    debug!("LIFE::MESSAGE({text})");
    speak(engine, ctx.actor_idx, text)?;
    let unlocked = engine
        .config
        .achievement_for(engine.scene.current_scene, ctx.actor_idx, text)
        .map(str::to_owned);
    if let Some(id) = unlocked {
        engine.host.scene.unlock_achievement(&id);
        engine.achievements.insert(id);
    }
    engine.host.screen.redraw(true);
    Ok(LifeSignal::Continue)
}

pub fn message_obj(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let other = usize::from(ctx.stream.read_u8()?);
    let text = ctx.stream.read_i16()?;
    debug!("LIFE::MESSAGE_OBJ({other}, {text})");
    speak(engine, other, text)?;
    engine.host.screen.redraw(true);
    Ok(LifeSignal::Continue)
}

/// Same as MESSAGE but uses the full-screen text box.
pub fn big_message(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let text = ctx.stream.read_i16()?;
    debug!("LIFE::BIG_MESSAGE({text})");
    set_clip(engine, TextClip::Full);
    speak(engine, ctx.actor_idx, text)?;
    set_clip(engine, TextClip::Small);
    engine.host.screen.redraw(true);
    Ok(LifeSignal::Continue)
}

fn set_clip(engine: &mut LifeEngine, clip: TextClip) {
    engine.text.clip = clip;
    engine.host.text.set_clip(clip);
}

/// Floating text over the speaker that does not wait for the player.
fn say(engine: &mut LifeEngine, speaker: usize, text: i16) {
    let now = engine.clock.now();
    engine.overlays.add(
        OverlayType::Text,
        i32::from(text),
        0,
        0,
        speaker as i32,
        OverlayPosType::FollowActor,
        2,
        now,
    );
    let _freeze = engine.clock.freeze();
    engine.host.text.init_vox(text);
}

pub fn say_message(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let text = ctx.stream.read_i16()?;
    debug!("LIFE::SAY_MESSAGE({text})");
    say(engine, ctx.actor_idx, text);
    Ok(LifeSignal::Continue)
}

pub fn say_message_obj(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let other = ctx.stream.read_u8()?;
    let text = ctx.stream.read_i16()?;
    debug!("LIFE::SAY_MESSAGE_OBJ({other}, {text})");
    engine.scene.actor(usize::from(other))?;
    say(engine, usize::from(other), text);
    Ok(LifeSignal::Continue)
}

pub fn add_choice(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let text = ctx.stream.read_i16()?;
    debug!("LIFE::ADD_CHOICE({text})");
    if !engine.game.push_choice(text) {
        warn!(
            "actor {}: choice list full, dropping text {text}",
            ctx.actor_idx
        );
    }
    Ok(LifeSignal::Continue)
}

fn ask(engine: &mut LifeEngine, speaker: usize, question: i16) -> LifeResult<()> {
    prepare_speaker(engine, speaker)?;
    if engine.game.choices.is_empty() {
        warn!("ASK_CHOICE({question}) with no queued choices");
    } else {
        let selected = engine.host.text.ask_choice(question, &engine.game.choices);
        let last = engine.game.choices.len() - 1;
        let answer = engine.game.choices[selected.min(last)];
        engine.game.choice_answer = i32::from(answer);
    }
    engine.game.choices.clear();
    engine.host.screen.redraw(true);
    Ok(())
}

pub fn ask_choice(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let question = ctx.stream.read_i16()?;
    debug!("LIFE::ASK_CHOICE({question})");
    let _freeze = engine.clock.freeze();
    ask(engine, ctx.actor_idx, question)?;
    Ok(LifeSignal::Continue)
}

pub fn ask_choice_obj(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let other = usize::from(ctx.stream.read_u8()?);
    let question = ctx.stream.read_i16()?;
    debug!("LIFE::ASK_CHOICE_OBJ({other}, {question})");
    let _freeze = engine.clock.freeze();
    if engine.screen.in_scenery_view {
        engine.screen.in_scenery_view = false;
        engine.host.screen.scenery_view(false);
    }
    ask(engine, other, question)?;
    Ok(LifeSignal::Continue)
}

pub fn bubble_on(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    engine.text.show_bubble = true;
    Ok(LifeSignal::Continue)
}

pub fn bubble_off(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    engine.text.show_bubble = false;
    Ok(LifeSignal::Continue)
}

/// Sendell's telepathic message: full-screen portrait, forced text display.
pub fn message_sendell(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    debug!("LIFE::MESSAGE_SENDELL()");
    let _freeze = engine.clock.freeze();
    let screen = engine.host.screen.clone();
    let text = engine.host.text.clone();

    screen.fade_to_black();
    screen.load_image(SENDELL_IMAGE, SENDELL_PALETTE);
    set_clip(engine, TextClip::Full);
    engine.text.cross_color = COLOR_WHITE;
    text.set_font_cross_color(COLOR_WHITE);
    engine.text.draw_text_box_background = false;
    let display_text = engine.text.display_text;
    engine.text.display_text = true;
    text.draw_text_progressive(engine.config.sendell_text_id);
    engine.text.display_text = display_text;
    engine.text.draw_text_box_background = true;
    set_clip(engine, TextClip::Small);
    screen.fade_to_black();
    screen.clear_screen();
    screen.set_palette(PaletteKind::Current);
    Ok(LifeSignal::Continue)
}

/// Credits line: drawn at the running y position until the screen fills.
pub fn text(engine: &mut LifeEngine, ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    let id = ctx.stream.read_i16()?;
    debug!("LIFE::TEXT({id})");
    let y = engine.text.credits_y;
    if y >= engine.config.screen_height - CREDITS_LINE_HEIGHT {
        return Ok(LifeSignal::Continue);
    }
    let host = engine.host.text.clone();
    let line = host.menu_text(engine.config.remap_text(id));
    let width = host.text_width(&line);
    host.set_font_color(COLOR_WHITE);
    host.draw_text(0, y, &line);
    let right = width.min(engine.config.screen_width - 1);
    engine.host.screen.copy_block(Rect {
        left: 0,
        top: y,
        right,
        bottom: y + CREDITS_LINE_HEIGHT,
    });
    engine.text.credits_y = y + CREDITS_LINE_HEIGHT;
    Ok(LifeSignal::Continue)
}

pub fn clear_text(engine: &mut LifeEngine, _ctx: &mut LifeContext) -> LifeResult<LifeSignal> {
    debug!("LIFE::CLEAR_TEXT()");
    engine.text.credits_y = 0;
    let rect = Rect {
        left: 0,
        top: 0,
        right: engine.config.screen_width - 1,
        bottom: engine.config.screen_height / 2,
    };
    engine.host.screen.fill_rect(rect, COLOR_BLACK);
    Ok(LifeSignal::Continue)
}
