use std::collections::HashMap;

use super::{DrawContext, SceneInstance, Stage};
use crate::assets::{DataKind, DataPayload, DataSourceRef};
use crate::config::SceneConfig;
use crate::error::Result;
use crate::frame::FrameInfo;
use crate::input::{EventKind, SceneEvent};

/// One-time setup step; receives resolved data when it declared a source
pub type DrawFn<S> = fn(&mut DrawContext<'_, S>, &mut S, Option<&DataPayload>) -> Result<()>;

/// Per-frame update
pub type AnimationCallback<S> = fn(&FrameInfo, &mut Stage, &mut S);

pub type EventHandler<S> = fn(&SceneEvent, &mut Stage, &mut S);

pub struct DrawFunc<S> {
    pub func: DrawFn<S>,
    pub data_source: Option<DataSourceRef>,
}

/// Static description of a demo: its draw steps, handlers, animation and config
pub struct SceneDescriptor<S> {
    pub name: &'static str,
    pub draw_funcs: Vec<DrawFunc<S>>,
    pub event_listeners: HashMap<EventKind, EventHandler<S>>,
    pub animation_callback: Option<AnimationCallback<S>>,
    pub init_state: fn() -> S,
    pub config: SceneConfig,
}

impl<S: 'static> SceneDescriptor<S> {
    pub fn new(name: &'static str, init_state: fn() -> S) -> Self {
        Self {
            name,
            draw_funcs: Vec::new(),
            event_listeners: HashMap::new(),
            animation_callback: None,
            init_state,
            config: SceneConfig::default(),
        }
    }

    pub fn draw(mut self, func: DrawFn<S>) -> Self {
        self.draw_funcs.push(DrawFunc {
            func,
            data_source: None,
        });
        self
    }

    pub fn draw_with_data(mut self, func: DrawFn<S>, id: impl Into<String>, kind: DataKind) -> Self {
        self.draw_funcs.push(DrawFunc {
            func,
            data_source: Some(DataSourceRef { id: id.into(), kind }),
        });
        self
    }

    pub fn on(mut self, kind: EventKind, handler: EventHandler<S>) -> Self {
        self.event_listeners.insert(kind, handler);
        self
    }

    pub fn animate(mut self, callback: AnimationCallback<S>) -> Self {
        self.animation_callback = Some(callback);
        self
    }

    pub fn config(mut self, config: SceneConfig) -> Self {
        self.config = config;
        self
    }

    pub fn instantiate(self) -> SceneInstance<S> {
        SceneInstance::new(self)
    }
}
