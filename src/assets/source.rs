use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::rc::Rc;
use std::task::{Poll, Waker};

use futures::future::{self, FutureExt, LocalBoxFuture};

use crate::error::{GalleryError, Result};

/// Where asset bytes come from
pub trait AssetSource {
    fn read(&self, path: &str) -> LocalBoxFuture<'static, Result<Vec<u8>>>;
}

/// Reads files under a static asset root
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

impl AssetSource for FsSource {
    fn read(&self, path: &str) -> LocalBoxFuture<'static, Result<Vec<u8>>> {
        let full = self.root.join(path);
        let path = path.to_string();
        async move {
            std::fs::read(&full).map_err(|source| GalleryError::AssetIo { path, source })
        }
        .boxed_local()
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    files: HashMap<String, Vec<u8>>,
    held: HashSet<String>,
    wakers: Vec<Waker>,
}

/// In-memory files; held paths stay pending until released.
/// Clones share the same files.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    state: Rc<RefCell<MemoryState>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.state.borrow_mut().files.insert(path.into(), bytes.into());
    }

    pub fn hold(&self, path: impl Into<String>) {
        self.state.borrow_mut().held.insert(path.into());
    }

    pub fn release(&self, path: &str) {
        let wakers = {
            let mut state = self.state.borrow_mut();
            state.held.remove(path);
            std::mem::take(&mut state.wakers)
        };
        for waker in wakers {
            waker.wake();
        }
    }
}

impl AssetSource for MemorySource {
    fn read(&self, path: &str) -> LocalBoxFuture<'static, Result<Vec<u8>>> {
        let state = Rc::clone(&self.state);
        let path = path.to_string();
        future::poll_fn(move |cx| {
            let mut state = state.borrow_mut();
            if state.held.contains(&path) {
                state.wakers.push(cx.waker().clone());
                return Poll::Pending;
            }
            Poll::Ready(state.files.get(&path).cloned().ok_or_else(|| GalleryError::AssetIo {
                path: path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such asset"),
            }))
        })
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_memory_source_reads_inserted() {
        let source = MemorySource::new();
        source.insert("data/a.json", b"{}".to_vec());
        assert_eq!(block_on(source.read("data/a.json")).unwrap(), b"{}");
    }

    #[test]
    fn test_memory_source_missing_is_io_error() {
        let source = MemorySource::new();
        let err = block_on(source.read("nope")).unwrap_err();
        assert!(matches!(err, GalleryError::AssetIo { .. }));
    }

    #[test]
    fn test_fs_source_missing_file() {
        let source = FsSource::new("/definitely/not/a/dir");
        let err = block_on(source.read("x.json")).unwrap_err();
        match err {
            GalleryError::AssetIo { path, .. } => assert_eq!(path, "x.json"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_fs_source_reads_file() {
        let dir = std::env::temp_dir().join(format!("scene-gallery-fs-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("hello.txt"), b"hi").unwrap();
        let source = FsSource::new(&dir);
        assert_eq!(block_on(source.read("hello.txt")).unwrap(), b"hi");
        std::fs::remove_dir_all(&dir).ok();
    }
}
