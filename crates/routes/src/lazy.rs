//! Deferred page loading.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::OnceCell;

use crate::page::{Page, PageId};

type PageFuture = Pin<Box<dyn Future<Output = Arc<dyn Page>> + Send>>;
type PageFactory = Box<dyn Fn() -> PageFuture + Send + Sync>;

/// A page whose implementation is produced on first use and cached.
///
/// Concurrent first uses share one load; the factory runs at most once.
pub struct LazyPage {
    id: PageId,
    factory: PageFactory,
    loaded: OnceCell<Arc<dyn Page>>,
    loads: AtomicUsize,
}

impl LazyPage {
    pub fn new<F, Fut>(id: PageId, factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Arc<dyn Page>> + Send + 'static,
    {
        Self {
            id,
            factory: Box::new(move || -> PageFuture { Box::pin(factory()) }),
            loaded: OnceCell::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// A page that needs no loading.
    pub fn ready(page: Arc<dyn Page>) -> Self {
        let id = page.id();
        let lazy = Self::new(id, {
            let page = page.clone();
            move || {
                let page = page.clone();
                async move { page }
            }
        });
        // A fresh cell cannot be initialized already.
        let _ = lazy.loaded.set(page);
        lazy
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    /// The page if it has been loaded already.
    pub fn get(&self) -> Option<Arc<dyn Page>> {
        self.loaded.get().cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.initialized()
    }

    pub async fn load(&self) -> Arc<dyn Page> {
        self.loaded
            .get_or_init(|| {
                self.loads.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(page = %self.id, "loading page bundle");
                (self.factory)()
            })
            .await
            .clone()
    }

    /// How many times the factory ran.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl core::fmt::Debug for LazyPage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LazyPage")
            .field("id", &self.id)
            .field("loaded", &self.is_loaded())
            .finish_non_exhaustive()
    }
}
