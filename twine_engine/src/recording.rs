use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use glam::IVec3;
use serde::Serialize;

use crate::callbacks::{
    AnimKind, AnimationCallback, AudioCallback, Collaborators, SceneCallback, ScreenCallback,
    TextCallback,
};
use crate::presentation::{PaletteFade, PaletteKind, Projection, Rect, TextBank, TextClip};

/// One host call made by the interpreter.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostEvent {
    InitAnim {
        actor: usize,
        anim: i32,
        anim_kind: AnimKind,
        next: i32,
    },
    InitBody {
        actor: usize,
        body: i32,
    },
    ClearRealAngle {
        actor: usize,
    },
    DrawBubble {
        actor: usize,
    },
    FontCrossColor {
        color: i32,
    },
    FontColor {
        color: i32,
    },
    TextClip {
        clip: TextClip,
    },
    ProgressiveText {
        text: i16,
    },
    InitVox {
        text: i16,
    },
    AskChoice {
        question: i16,
        choices: Vec<i16>,
        selected: usize,
    },
    DrawText {
        x: i32,
        y: i32,
        text: String,
    },
    TextBank {
        bank: TextBank,
    },
    Redraw {
        background: bool,
    },
    Fade {
        fade: PaletteFade,
    },
    FadeToBlack,
    SetPalette {
        palette: PaletteKind,
    },
    ClearScreen,
    CopyFrontToWork,
    CopyBlock {
        rect: Rect,
    },
    FillRect {
        rect: Rect,
        color: i32,
    },
    LoadImage {
        image: i32,
        palette: i32,
    },
    SceneryView {
        enter: bool,
    },
    Projection {
        projection: Projection,
    },
    CenterOnActor {
        actor: usize,
    },
    CeilingGrid {
        index: i32,
    },
    RebuildGrid,
    PlayMovie {
        name: String,
    },
    PlayMidi {
        index: u8,
    },
    StopMidi,
    PlayCdTrack {
        track: u8,
    },
    FoundItem {
        item: u8,
    },
    ExtraBonus {
        actor: usize,
    },
    ExtraExplode {
        pos: IVec3,
    },
    HitStars {
        pos: IVec3,
    },
    Autosave,
    Achievement {
        id: String,
    },
}

/// Host that records every call, answering choice prompts from a queue.
#[derive(Debug, Clone, Default)]
pub struct RecordingCallbacks {
    events: Rc<RefCell<Vec<HostEvent>>>,
    choices: Rc<RefCell<VecDeque<usize>>>,
}

impl RecordingCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// Queue the answer for the next ASK_CHOICE prompt.
    pub fn queue_choice(&self, index: usize) {
        self.choices.borrow_mut().push_back(index);
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            animation: Rc::new(self.clone()),
            text: Rc::new(self.clone()),
            screen: Rc::new(self.clone()),
            audio: Rc::new(self.clone()),
            scene: Rc::new(self.clone()),
        }
    }

    fn push(&self, event: HostEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl AnimationCallback for RecordingCallbacks {
    fn init_anim(&self, actor: usize, anim: i32, kind: AnimKind, next: i32) {
        self.push(HostEvent::InitAnim {
            actor,
            anim,
            anim_kind: kind,
            next,
        });
    }

    fn init_body(&self, actor: usize, body: i32) {
        self.push(HostEvent::InitBody { actor, body });
    }

    fn clear_real_angle(&self, actor: usize) {
        self.push(HostEvent::ClearRealAngle { actor });
    }
}

impl TextCallback for RecordingCallbacks {
    fn draw_bubble(&self, actor: usize) {
        self.push(HostEvent::DrawBubble { actor });
    }

    fn set_font_cross_color(&self, color: i32) {
        self.push(HostEvent::FontCrossColor { color });
    }

    fn set_font_color(&self, color: i32) {
        self.push(HostEvent::FontColor { color });
    }

    fn set_clip(&self, clip: TextClip) {
        self.push(HostEvent::TextClip { clip });
    }

    fn draw_text_progressive(&self, text: i16) {
        self.push(HostEvent::ProgressiveText { text });
    }

    fn init_vox(&self, text: i16) {
        self.push(HostEvent::InitVox { text });
    }

    fn ask_choice(&self, question: i16, choices: &[i16]) -> usize {
        let selected = self.choices.borrow_mut().pop_front().unwrap_or(0);
        self.push(HostEvent::AskChoice {
            question,
            choices: choices.to_vec(),
            selected,
        });
        selected
    }

    fn draw_text(&self, x: i32, y: i32, text: &str) {
        self.push(HostEvent::DrawText {
            x,
            y,
            text: text.to_string(),
        });
    }

    fn init_text_bank(&self, bank: TextBank) {
        self.push(HostEvent::TextBank { bank });
    }
}

impl ScreenCallback for RecordingCallbacks {
    fn redraw(&self, background: bool) {
        self.push(HostEvent::Redraw { background });
    }

    fn fade(&self, fade: PaletteFade) {
        self.push(HostEvent::Fade { fade });
    }

    fn fade_to_black(&self) {
        self.push(HostEvent::FadeToBlack);
    }

    fn set_palette(&self, palette: PaletteKind) {
        self.push(HostEvent::SetPalette { palette });
    }

    fn clear_screen(&self) {
        self.push(HostEvent::ClearScreen);
    }

    fn copy_front_to_work(&self) {
        self.push(HostEvent::CopyFrontToWork);
    }

    fn copy_block(&self, rect: Rect) {
        self.push(HostEvent::CopyBlock { rect });
    }

    fn fill_rect(&self, rect: Rect, color: i32) {
        self.push(HostEvent::FillRect { rect, color });
    }

    fn load_image(&self, image: i32, palette: i32) {
        self.push(HostEvent::LoadImage { image, palette });
    }

    fn scenery_view(&self, enter: bool) {
        self.push(HostEvent::SceneryView { enter });
    }

    fn set_projection(&self, projection: &Projection) {
        self.push(HostEvent::Projection {
            projection: *projection,
        });
    }

    fn center_on_actor(&self, actor: usize) {
        self.push(HostEvent::CenterOnActor { actor });
    }

    fn init_ceiling_grid(&self, index: i32) {
        self.push(HostEvent::CeilingGrid { index });
    }

    fn rebuild_grid(&self) {
        self.push(HostEvent::RebuildGrid);
    }
}

impl AudioCallback for RecordingCallbacks {
    fn play_movie(&self, name: &str) {
        self.push(HostEvent::PlayMovie {
            name: name.to_string(),
        });
    }

    fn play_midi(&self, index: u8) {
        self.push(HostEvent::PlayMidi { index });
    }

    fn stop_midi(&self) {
        self.push(HostEvent::StopMidi);
    }

    fn play_cd_track(&self, track: u8) {
        self.push(HostEvent::PlayCdTrack { track });
    }
}

impl SceneCallback for RecordingCallbacks {
    fn found_item(&self, item: u8) {
        self.push(HostEvent::FoundItem { item });
    }

    fn extra_bonus(&self, actor: usize) {
        self.push(HostEvent::ExtraBonus { actor });
    }

    fn extra_explode(&self, pos: IVec3) {
        self.push(HostEvent::ExtraExplode { pos });
    }

    fn hit_stars(&self, pos: IVec3) {
        self.push(HostEvent::HitStars { pos });
    }

    fn autosave(&self) {
        self.push(HostEvent::Autosave);
    }

    fn unlock_achievement(&self, id: &str) {
        self.push(HostEvent::Achievement { id: id.to_string() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_host_tracks_calls_across_handles() {
        let recording = RecordingCallbacks::new();
        let host = recording.collaborators();
        host.audio.play_midi(3);
        host.screen.fade(PaletteFade::PalToAlarm);
        host.scene.autosave();

        assert_eq!(
            recording.events(),
            vec![
                HostEvent::PlayMidi { index: 3 },
                HostEvent::Fade {
                    fade: PaletteFade::PalToAlarm
                },
                HostEvent::Autosave,
            ]
        );
    }

    #[test]
    fn queued_choices_answer_prompts_in_order() {
        let recording = RecordingCallbacks::new();
        recording.queue_choice(2);
        let host = recording.collaborators();
        assert_eq!(host.text.ask_choice(7, &[1, 2, 3]), 2);
        assert_eq!(host.text.ask_choice(7, &[1, 2, 3]), 0);
    }

    #[test]
    fn events_serialize_with_a_kind_tag() {
        let json = serde_json::to_string(&HostEvent::InitVox { text: 12 }).expect("json");
        assert_eq!(json, r#"{"kind":"init_vox","text":12}"#);
    }
}
