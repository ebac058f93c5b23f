use std::collections::HashMap;

use super::{DrawContext, LoadCallback, SceneDescriptor, Stage};
use crate::assets::{AssetLoader, AssetRequest, Completion, DataPayload, DataTable};
use crate::config::SceneConfig;
use crate::error::Result;
use crate::frame::FrameInfo;
use crate::input::SceneEvent;

/// Object-safe face of a running scene, independent of its state type
pub trait ActiveScene {
    fn name(&self) -> &str;

    fn config(&self) -> &SceneConfig;

    fn draw_func_count(&self) -> usize;

    /// Fails when a declared data source, after the override, is not in `data`
    fn check_data_sources(&self, data: &DataTable, data_override: Option<&str>) -> Result<()>;

    /// Runs every draw function in order. `data_override` replaces the id of
    /// each draw function that declares a data source.
    fn draw(
        &mut self,
        stage: &mut Stage,
        loader: &mut AssetLoader,
        data: &DataTable,
        data_override: Option<&str>,
    ) -> Result<()>;

    /// Hands a finished load to its callback; false when the ticket is unknown
    fn deliver(&mut self, completion: Completion, stage: &mut Stage) -> bool;

    fn animate(&mut self, frame: &FrameInfo, stage: &mut Stage);

    /// Returns false when no handler is registered for the event kind
    fn dispatch(&mut self, event: &SceneEvent, stage: &mut Stage) -> bool;

    /// Back to the initial state, forgetting pending load callbacks
    fn reset(&mut self);

    fn pending_loads(&self) -> usize;
}

/// A descriptor bound to its live state
pub struct SceneInstance<S> {
    descriptor: SceneDescriptor<S>,
    state: S,
    callbacks: HashMap<u64, LoadCallback<S>>,
}

impl<S: 'static> SceneInstance<S> {
    pub fn new(descriptor: SceneDescriptor<S>) -> Self {
        let state = (descriptor.init_state)();
        Self {
            descriptor,
            state,
            callbacks: HashMap::new(),
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    fn resolve_data(
        &self,
        index: usize,
        loader: &AssetLoader,
        data: &DataTable,
        data_override: Option<&str>,
    ) -> Result<Option<DataPayload>> {
        let Some(source) = &self.descriptor.draw_funcs[index].data_source else {
            return Ok(None);
        };
        let id = data_override.unwrap_or(&source.id);
        let (path, entry) = data.resolve(id)?;
        let kind = entry.kind.asset_kind();
        let asset = loader.load_now(&AssetRequest::new(path.clone(), kind))?;
        Ok(Some(DataPayload {
            id: id.to_string(),
            path,
            entry: entry.clone(),
            asset,
        }))
    }
}

impl<S: 'static> ActiveScene for SceneInstance<S> {
    fn name(&self) -> &str {
        self.descriptor.name
    }

    fn config(&self) -> &SceneConfig {
        &self.descriptor.config
    }

    fn draw_func_count(&self) -> usize {
        self.descriptor.draw_funcs.len()
    }

    fn check_data_sources(&self, data: &DataTable, data_override: Option<&str>) -> Result<()> {
        for source in self.descriptor.draw_funcs.iter().filter_map(|f| f.data_source.as_ref()) {
            data.resolve(data_override.unwrap_or(&source.id))?;
        }
        Ok(())
    }

    fn draw(
        &mut self,
        stage: &mut Stage,
        loader: &mut AssetLoader,
        data: &DataTable,
        data_override: Option<&str>,
    ) -> Result<()> {
        if self.descriptor.draw_funcs.is_empty() {
            log::warn!("scene '{}' has no draw functions", self.descriptor.name);
            return Ok(());
        }

        for index in 0..self.descriptor.draw_funcs.len() {
            let payload = self.resolve_data(index, loader, data, data_override)?;
            let func = self.descriptor.draw_funcs[index].func;
            let mut ctx = DrawContext::new(stage, loader, &mut self.callbacks);
            func(&mut ctx, &mut self.state, payload.as_ref())?;
        }
        log::info!(
            "drew scene '{}' ({} draw functions, {} loads pending)",
            self.descriptor.name,
            self.descriptor.draw_funcs.len(),
            self.callbacks.len()
        );
        Ok(())
    }

    fn deliver(&mut self, completion: Completion, stage: &mut Stage) -> bool {
        let Some(callback) = self.callbacks.remove(&completion.ticket.id) else {
            return false;
        };
        match completion.result {
            Ok(asset) => callback(stage, &mut self.state, asset),
            Err(e) => log::warn!(
                "scene '{}': failed to load '{}': {}",
                self.descriptor.name,
                completion.path,
                e
            ),
        }
        true
    }

    fn animate(&mut self, frame: &FrameInfo, stage: &mut Stage) {
        if let Some(callback) = self.descriptor.animation_callback {
            callback(frame, stage, &mut self.state);
        }
    }

    fn dispatch(&mut self, event: &SceneEvent, stage: &mut Stage) -> bool {
        match self.descriptor.event_listeners.get(&event.kind()) {
            Some(handler) => {
                handler(event, stage, &mut self.state);
                true
            }
            None => false,
        }
    }

    fn reset(&mut self) {
        self.state = (self.descriptor.init_state)();
        self.callbacks.clear();
    }

    fn pending_loads(&self) -> usize {
        self.callbacks.len()
    }
}
