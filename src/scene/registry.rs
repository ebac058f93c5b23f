use super::ActiveScene;
use crate::error::{GalleryError, Result};

/// Builds a fresh instance of one gallery scene
pub type SceneFactory = fn() -> Box<dyn ActiveScene>;

/// Named scene factories in menu order
#[derive(Clone)]
pub struct Gallery {
    entries: Vec<(&'static str, SceneFactory)>,
}

impl Gallery {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers or replaces a scene
    pub fn register(&mut self, name: &'static str, factory: SceneFactory) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = factory,
            None => self.entries.push((name, factory)),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| *n == name)
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn ActiveScene>> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, factory)| factory())
            .ok_or_else(|| GalleryError::UnknownScene(name.to_string()))
    }

    /// Name following `current` in menu order, wrapping around
    pub fn next_after(&self, current: &str) -> Option<&'static str> {
        let index = self.entries.iter().position(|(n, _)| *n == current);
        let next = index.map_or(0, |i| (i + 1) % self.entries.len());
        self.entries.get(next).map(|(name, _)| *name)
    }
}

impl Default for Gallery {
    fn default() -> Self {
        let mut gallery = Self::empty();
        for (name, factory) in crate::scenes::catalog() {
            gallery.register(name, factory);
        }
        gallery
    }
}

impl std::fmt::Debug for Gallery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
