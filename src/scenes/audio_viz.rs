//! Spectrum bars driven by a looping audio clip

use glam::{Vec2, Vec3};

use crate::animation::{apply_bar_scale, FrequencySource, SpectrumAnalyser, BIN_COUNT};
use crate::assets::{Asset, AssetRequest, DataPayload};
use crate::config::SceneConfig;
use crate::error::Result;
use crate::frame::FrameInfo;
use crate::graph::{Geometry, Light, Material, Node, NodeId};
use crate::input::{EventKind, Key, SceneEvent};
use crate::overlay::{OverlayElement, OverlayId};
use crate::scene::{ActiveScene, DrawContext, SceneDescriptor, Stage};

pub const NAME: &str = "audioviz";
pub const AUDIO_PATH: &str = "audio/vapor_trail.pcm";
pub const BAR_COLOR: u32 = 0x00ffff;

const LOG: &str = "gallery::audioviz";

#[derive(Debug, Default)]
pub struct AudioVizState {
    pub bars: Vec<NodeId>,
    pub analyser: Option<SpectrumAnalyser>,
    pub play_button: Option<OverlayId>,
}

pub fn descriptor() -> SceneDescriptor<AudioVizState> {
    SceneDescriptor::new(NAME, AudioVizState::default)
        .draw(draw_audio_viz)
        .on(EventKind::KeyDown, on_key_down)
        .on(EventKind::Click, on_click)
        .animate(animate)
        .config(SceneConfig {
            start_position: glam::vec3(0.0, 4.0, 20.0).into(),
            look_at: glam::vec3(0.0, 1.0, 0.0).into(),
            ..SceneConfig::default()
        })
}

pub fn create() -> Box<dyn ActiveScene> {
    Box::new(descriptor().instantiate())
}

fn draw_audio_viz(
    ctx: &mut DrawContext<'_, AudioVizState>,
    state: &mut AudioVizState,
    _data: Option<&DataPayload>,
) -> Result<()> {
    let group = ctx.add(Node::group("bars"))?;
    for i in 0..BIN_COUNT {
        let mut bar = Node::mesh(
            format!("bar-{i}"),
            Geometry::Box {
                width: 0.5,
                height: 1.0,
                depth: 0.5,
            },
            Material::color(BAR_COLOR),
        )
        .at(Vec3::new(i as f32 - (BIN_COUNT / 2) as f32, 0.0, 0.0));
        apply_bar_scale(&mut bar.transform, 0);
        state.bars.push(ctx.stage.add_to(group, bar)?);
    }
    ctx.add(Node::light("ambient", Light::ambient(0xffffff, 0.5)))?;

    state.play_button = Some(
        ctx.stage
            .overlay
            .add(OverlayElement::button("Play", Vec2::new(20.0, 20.0))),
    );

    ctx.load(AssetRequest::audio(AUDIO_PATH), on_audio_loaded);
    log::info!(target: LOG, "drew {} bars", state.bars.len());
    Ok(())
}

fn on_audio_loaded(stage: &mut Stage, state: &mut AudioVizState, asset: Asset) {
    let Some(clip) = asset.into_audio() else {
        log::warn!(target: LOG, "'{}' did not decode as audio", AUDIO_PATH);
        return;
    };
    log::info!(target: LOG, "audio ready: {:.1}s", clip.duration());
    let mut analyser = SpectrumAnalyser::new(clip);
    analyser.play();
    state.analyser = Some(analyser);
    sync_button(stage, state);
}

fn sync_button(stage: &mut Stage, state: &AudioVizState) {
    let playing = state.analyser.as_ref().is_some_and(|a| a.is_playing());
    if let Some(button) = state.play_button.and_then(|id| stage.overlay.get_mut(id)) {
        button.text = if playing { "Pause" } else { "Play" }.to_string();
    }
}

fn toggle_playback(stage: &mut Stage, state: &mut AudioVizState) {
    match state.analyser.as_mut() {
        Some(analyser) => {
            let playing = analyser.toggle();
            log::debug!(target: LOG, "playing: {}", playing);
        }
        None => log::warn!(target: LOG, "audio not loaded yet"),
    }
    sync_button(stage, state);
}

fn on_key_down(event: &SceneEvent, stage: &mut Stage, state: &mut AudioVizState) {
    if let SceneEvent::KeyDown { key: Key::Space, .. } = event {
        toggle_playback(stage, state);
    }
}

fn on_click(event: &SceneEvent, stage: &mut Stage, state: &mut AudioVizState) {
    if let SceneEvent::Click { target: Some(target), .. } = event {
        if state.play_button == Some(*target) {
            toggle_playback(stage, state);
        }
    }
}

fn animate(frame: &FrameInfo, stage: &mut Stage, state: &mut AudioVizState) {
    let Some(analyser) = state.analyser.as_mut() else {
        return;
    };
    analyser.advance(frame.delta);
    let data = analyser.frequency_data();
    for (bar, value) in state.bars.iter().zip(data) {
        if let Some(node) = stage.graph.get_mut(*bar) {
            apply_bar_scale(&mut node.transform, *value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AudioClip;
    use crate::viewport::Viewport;

    fn drawn() -> (Stage, AudioVizState) {
        let mut stage = Stage::new(Viewport::new(800, 600));
        let mut state = AudioVizState::default();
        let mut loader = crate::assets::AssetLoader::new(std::rc::Rc::new(
            crate::assets::MemorySource::new(),
        ));
        let mut callbacks = std::collections::HashMap::new();
        let mut ctx = DrawContext::new(&mut stage, &mut loader, &mut callbacks);
        draw_audio_viz(&mut ctx, &mut state, None).unwrap();
        (stage, state)
    }

    #[test]
    fn test_bars_start_at_minimum_height() {
        let (stage, state) = drawn();
        assert_eq!(state.bars.len(), 32);
        let first = stage.graph.get(state.bars[0]).unwrap();
        assert!((first.transform.scale.y - 0.1).abs() < 1e-6);
        assert!((first.transform.translation.y - 0.05).abs() < 1e-6);
        assert_eq!(first.transform.translation.x, -16.0);
    }

    #[test]
    fn test_animate_without_audio_is_a_no_op() {
        let (mut stage, mut state) = drawn();
        animate(&FrameInfo::new(1, 0.016, 0.016), &mut stage, &mut state);
        assert!(state.analyser.is_none());
    }

    #[test]
    fn test_space_toggles_playback_and_button_text() {
        let (mut stage, mut state) = drawn();
        on_audio_loaded(
            &mut stage,
            &mut state,
            Asset::Audio(AudioClip {
                sample_rate: 8000,
                samples: vec![128; 800],
            }),
        );
        let button = state.play_button.unwrap();
        assert_eq!(stage.overlay.get(button).unwrap().text, "Pause");

        let space = SceneEvent::KeyDown {
            key: Key::Space,
            shift: false,
        };
        on_key_down(&space, &mut stage, &mut state);
        assert!(!state.analyser.as_ref().unwrap().is_playing());
        assert_eq!(stage.overlay.get(button).unwrap().text, "Play");
    }
}
