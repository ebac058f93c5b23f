use std::cell::RefCell;
use std::rc::Rc;

use futures::executor::{block_on, LocalPool, LocalSpawner};
use futures::task::LocalSpawnExt;

use super::{decode, Asset, AssetRequest, AssetSource};
use crate::error::Result;

/// Identifies one issued load; `generation` ties it to an activation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub id: u64,
    pub generation: u64,
}

#[derive(Debug)]
pub struct Completion {
    pub ticket: LoadTicket,
    pub path: String,
    pub result: Result<Asset>,
}

/// Single-threaded asynchronous loader polled once per frame
pub struct AssetLoader {
    source: Rc<dyn AssetSource>,
    pool: LocalPool,
    spawner: LocalSpawner,
    completed: Rc<RefCell<Vec<Completion>>>,
    in_flight: Rc<RefCell<usize>>,
    generation: u64,
    next_id: u64,
}

impl AssetLoader {
    pub fn new(source: Rc<dyn AssetSource>) -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            source,
            pool,
            spawner,
            completed: Rc::new(RefCell::new(Vec::new())),
            in_flight: Rc::new(RefCell::new(0)),
            generation: 0,
            next_id: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Loads issued but not yet drained by [`AssetLoader::poll`]
    pub fn in_flight(&self) -> usize {
        *self.in_flight.borrow()
    }

    /// Marks every outstanding load as stale
    pub fn invalidate(&mut self) {
        self.generation += 1;
        log::debug!("asset generation now {}", self.generation);
    }

    pub fn load(&mut self, request: AssetRequest) -> LoadTicket {
        let ticket = LoadTicket {
            id: self.next_id,
            generation: self.generation,
        };
        self.next_id += 1;
        *self.in_flight.borrow_mut() += 1;

        let read = self.source.read(&request.path);
        let completed = Rc::clone(&self.completed);
        let AssetRequest { path, kind } = request;
        let task = async move {
            let result = read.await.and_then(|bytes| decode(kind, &path, bytes));
            completed.borrow_mut().push(Completion {
                ticket,
                path,
                result,
            });
        };

        if let Err(e) = self.spawner.spawn_local(task) {
            log::error!("failed to schedule asset load: {}", e);
            *self.in_flight.borrow_mut() -= 1;
        }
        ticket
    }

    /// Runs ready tasks and drains whatever finished
    pub fn poll(&mut self) -> Vec<Completion> {
        self.pool.run_until_stalled();
        let done = std::mem::take(&mut *self.completed.borrow_mut());
        let mut in_flight = self.in_flight.borrow_mut();
        *in_flight = in_flight.saturating_sub(done.len());
        done
    }

    /// Reads and decodes immediately, for data a draw function needs up front
    pub fn load_now(&self, request: &AssetRequest) -> Result<Asset> {
        let bytes = block_on(self.source.read(&request.path))?;
        decode(request.kind, &request.path, bytes)
    }
}

impl std::fmt::Debug for AssetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLoader")
            .field("generation", &self.generation)
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemorySource;

    fn loader_with(source: &MemorySource) -> AssetLoader {
        AssetLoader::new(Rc::new(source.clone()))
    }

    #[test]
    fn test_load_completes_on_poll() {
        let source = MemorySource::new();
        source.insert("a.json", br#"[1,2]"#.to_vec());
        let mut loader = loader_with(&source);

        let ticket = loader.load(AssetRequest::json("a.json"));
        assert_eq!(loader.in_flight(), 1);
        let done = loader.poll();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].ticket, ticket);
        assert!(done[0].result.is_ok());
        assert_eq!(loader.in_flight(), 0);
    }

    #[test]
    fn test_held_load_waits_for_release() {
        let source = MemorySource::new();
        source.insert("slow.json", b"{}".to_vec());
        source.hold("slow.json");
        let mut loader = loader_with(&source);

        loader.load(AssetRequest::json("slow.json"));
        assert!(loader.poll().is_empty());
        assert!(loader.poll().is_empty());
        source.release("slow.json");
        assert_eq!(loader.poll().len(), 1);
    }

    #[test]
    fn test_invalidate_bumps_generation_of_new_tickets() {
        let source = MemorySource::new();
        source.insert("a.json", b"1".to_vec());
        let mut loader = loader_with(&source);

        let old = loader.load(AssetRequest::json("a.json"));
        loader.invalidate();
        let new = loader.load(AssetRequest::json("a.json"));
        assert_eq!(old.generation + 1, new.generation);

        let done = loader.poll();
        let stale = done.iter().filter(|c| c.ticket.generation != loader.generation()).count();
        assert_eq!(stale, 1);
    }

    #[test]
    fn test_missing_asset_completes_with_error() {
        let source = MemorySource::new();
        let mut loader = loader_with(&source);
        loader.load(AssetRequest::texture("missing.png"));
        let done = loader.poll();
        assert!(done[0].result.is_err());
    }

    #[test]
    fn test_load_now() {
        let source = MemorySource::new();
        source.insert("data/periodic.json", br#"["H","Hydrogen","1.00794",1,1]"#.to_vec());
        let loader = loader_with(&source);
        let asset = loader.load_now(&AssetRequest::json("data/periodic.json")).unwrap();
        assert_eq!(asset.into_json().unwrap()[1], "Hydrogen");
    }
}
