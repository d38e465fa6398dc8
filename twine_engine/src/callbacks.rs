//! Narrow interfaces to the subsystems the life interpreter drives.
//!
//! Every method has a no-op default so hosts only override what they render
//! or play. Value-returning methods fall back to neutral answers.

use std::fmt;
use std::rc::Rc;

use glam::IVec3;
use serde::Serialize;

use crate::presentation::{PaletteFade, PaletteKind, Projection, Rect, TextBank, TextClip};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimKind {
    Loop,
    Insert,
}

pub trait AnimationCallback {
    fn init_anim(&self, _actor: usize, _anim: i32, _kind: AnimKind, _next: i32) {}
    fn init_body(&self, _actor: usize, _body: i32) {}
    /// Stop the interpolated turn the movement code is running.
    fn clear_real_angle(&self, _actor: usize) {}
}

pub trait TextCallback {
    fn draw_bubble(&self, _actor: usize) {}
    fn set_font_cross_color(&self, _color: i32) {}
    fn set_font_color(&self, _color: i32) {}
    fn set_clip(&self, _clip: TextClip) {}
    /// Blocks until the player dismisses the text.
    fn draw_text_progressive(&self, _text: i16) {}
    fn init_vox(&self, _text: i16) {}
    /// Index into `choices` picked by the player.
    fn ask_choice(&self, _question: i16, _choices: &[i16]) -> usize {
        0
    }
    fn menu_text(&self, text: i16) -> String {
        format!("#{text}")
    }
    fn text_width(&self, text: &str) -> i32 {
        text.chars().count() as i32 * 14
    }
    fn draw_text(&self, _x: i32, _y: i32, _text: &str) {}
    fn init_text_bank(&self, _bank: TextBank) {}
}

pub trait ScreenCallback {
    fn redraw(&self, _background: bool) {}
    fn fade(&self, _fade: PaletteFade) {}
    fn fade_to_black(&self) {}
    fn set_palette(&self, _palette: PaletteKind) {}
    fn clear_screen(&self) {}
    fn copy_front_to_work(&self) {}
    fn copy_block(&self, _rect: Rect) {}
    fn fill_rect(&self, _rect: Rect, _color: i32) {}
    fn load_image(&self, _image: i32, _palette: i32) {}
    fn scenery_view(&self, _enter: bool) {}
    fn set_projection(&self, _projection: &Projection) {}
    fn center_on_actor(&self, _actor: usize) {}
    fn init_ceiling_grid(&self, _index: i32) {}
    fn rebuild_grid(&self) {}
}

pub trait AudioCallback {
    /// Blocks until the movie finishes.
    fn play_movie(&self, _name: &str) {}
    fn play_midi(&self, _index: u8) {}
    fn stop_midi(&self) {}
    fn play_cd_track(&self, _track: u8) {}
}

pub trait SceneCallback {
    fn found_item(&self, _item: u8) {}
    fn extra_bonus(&self, _actor: usize) {}
    fn extra_explode(&self, _pos: IVec3) {}
    fn hit_stars(&self, _pos: IVec3) {}
    fn autosave(&self) {}
    fn unlock_achievement(&self, _id: &str) {}
}

macro_rules! opaque_debug {
    ($($name:ident),*) => {
        $(
            impl fmt::Debug for dyn $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(stringify!($name))
                }
            }
        )*
    };
}

opaque_debug!(
    AnimationCallback,
    TextCallback,
    ScreenCallback,
    AudioCallback,
    SceneCallback
);

/// Host that renders and plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCallbacks;

impl AnimationCallback for NullCallbacks {}
impl TextCallback for NullCallbacks {}
impl ScreenCallback for NullCallbacks {}
impl AudioCallback for NullCallbacks {}
impl SceneCallback for NullCallbacks {}

#[derive(Debug, Clone)]
pub struct Collaborators {
    pub animation: Rc<dyn AnimationCallback>,
    pub text: Rc<dyn TextCallback>,
    pub screen: Rc<dyn ScreenCallback>,
    pub audio: Rc<dyn AudioCallback>,
    pub scene: Rc<dyn SceneCallback>,
}

impl Collaborators {
    pub fn silent() -> Self {
        let null = Rc::new(NullCallbacks);
        Self {
            animation: null.clone(),
            text: null.clone(),
            screen: null.clone(),
            audio: null.clone(),
            scene: null,
        }
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::silent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_host_gives_neutral_answers() {
        let host = Collaborators::silent();
        assert_eq!(host.text.ask_choice(1, &[4, 5]), 0);
        assert_eq!(host.text.menu_text(12), "#12");
        assert_eq!(host.text.text_width("abc"), 42);
        assert_eq!(format!("{:?}", host.audio), "AudioCallback");
    }
}
