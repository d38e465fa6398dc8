//! Presentation-side state the life interpreter toggles: dialogue text
//! settings, palette and projection. Drawing itself happens in the host.

use glam::IVec3;
use serde::Serialize;

use crate::geometry::{ANGLE_0, ANGLE_315, ANGLE_334};

pub const COLOR_BLACK: i32 = 0;
pub const COLOR_WHITE: i32 = 15;

/// Line height used by the credits-style TEXT opcode.
pub const CREDITS_LINE_HEIGHT: i32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextClip {
    Small,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextBank {
    Credits,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextState {
    pub show_bubble: bool,
    pub draw_text_box_background: bool,
    pub display_text: bool,
    pub clip: TextClip,
    pub cross_color: i32,
    pub credits_y: i32,
    pub text_bank: Option<TextBank>,
}

impl TextState {
    pub fn new(display_text: bool) -> Self {
        Self {
            show_bubble: true,
            draw_text_box_background: true,
            display_text,
            clip: TextClip::Small,
            cross_color: COLOR_WHITE,
            credits_y: 0,
            text_bank: None,
        }
    }
}

/// Named palette transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteFade {
    PalToRed,
    AlarmToRed,
    AlarmToPal,
    RedToPal,
    RedToAlarm,
    PalToAlarm,
}

impl PaletteFade {
    /// Whether the alarm palette is active once the fade completes.
    pub fn ends_on_alternate(self) -> bool {
        matches!(
            self,
            PaletteFade::AlarmToRed | PaletteFade::RedToAlarm | PaletteFade::PalToAlarm
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteKind {
    Current,
    Main,
    Dark,
    /// All black; the next redraw fades the scene palette back in.
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// Camera setup used by the end-credits perspective scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PerspectiveCamera {
    pub center_x: i32,
    pub center_y: i32,
    pub depth_offset: i32,
    pub scale_x: i32,
    pub scale_y: i32,
    pub translation: IVec3,
    pub rotation: IVec3,
    pub distance: i32,
    pub light: IVec3,
}

impl PerspectiveCamera {
    pub fn credits(width: i32, height: i32) -> Self {
        Self {
            center_x: width / 2,
            center_y: height / 2,
            depth_offset: 128,
            scale_x: 1024,
            scale_y: 1024,
            translation: IVec3::new(0, 1500, 0),
            rotation: IVec3::new(25, -128, 0),
            distance: 13000,
            light: IVec3::new(ANGLE_315, ANGLE_334, ANGLE_0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Projection {
    Isometric,
    Perspective { camera: PerspectiveCamera },
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreenState {
    pub use_alternate_palette: bool,
    pub fade_palette: bool,
    pub in_scenery_view: bool,
    pub req_bg_redraw: bool,
    pub projection: Projection,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self {
            use_alternate_palette: false,
            fade_palette: false,
            in_scenery_view: false,
            req_bg_redraw: false,
            projection: Projection::Isometric,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alarm_fades_leave_the_alternate_palette_active() {
        let alternate: Vec<PaletteFade> = [
            PaletteFade::PalToRed,
            PaletteFade::AlarmToRed,
            PaletteFade::AlarmToPal,
            PaletteFade::RedToPal,
            PaletteFade::RedToAlarm,
            PaletteFade::PalToAlarm,
        ]
        .into_iter()
        .filter(|fade| fade.ends_on_alternate())
        .collect();
        assert_eq!(
            alternate,
            vec![
                PaletteFade::AlarmToRed,
                PaletteFade::RedToAlarm,
                PaletteFade::PalToAlarm
            ]
        );
    }

    #[test]
    fn credits_camera_centres_on_the_screen() {
        let camera = PerspectiveCamera::credits(640, 480);
        assert_eq!((camera.center_x, camera.center_y), (320, 240));
        assert_eq!(camera.light, IVec3::new(3584, 3804, 0));
    }
}
