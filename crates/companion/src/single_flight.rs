//! Per-key single-flight memoization.
//!
//! The first caller for a key registers a `OnceCell` before any work starts;
//! everyone arriving while the build runs awaits that same cell and gets the
//! same outcome, failures included. A failed cell is dropped once it resolves
//! so the next caller starts fresh.

use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;

use crate::cache::{Cache, EvictionPolicy};

type Cell<V, E> = Arc<OnceCell<Result<V, E>>>;

pub struct SingleFlight<V, E> {
    cells: Mutex<Cache<Cell<V, E>>>,
}

/// A resolved value, and whether this call was the one that built it.
#[derive(Debug, Clone)]
pub struct Resolved<V> {
    pub value: V,
    pub built: bool,
}

fn succeeded<V, E>(cell: &Cell<V, E>) -> bool {
    matches!(cell.get(), Some(Ok(_)))
}

impl<V, E> SingleFlight<V, E>
where
    V: Clone + Send + Sync,
    E: Clone + Send + Sync,
{
    pub fn new(policy: Box<dyn EvictionPolicy>) -> Self {
        Self {
            cells: Mutex::new(Cache::new(policy)),
        }
    }

    fn cell_for(&self, key: &str) -> Cell<V, E> {
        let mut cells = self.cells.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(cell) = cells.get(key) {
            return cell;
        }
        let cell = Arc::new(OnceCell::new());
        // Only built values may be evicted; in-flight cells stay pinned.
        cells.insert_where(key, cell.clone(), succeeded);
        cell
    }

    /// Return the value for `key`, running `init` only if no value exists
    /// and no other caller is already building one. Callers that joined a
    /// failing build all receive its error.
    pub async fn get_or_try_init<F, Fut>(&self, key: &str, init: F) -> Result<Resolved<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cell = self.cell_for(key);
        let mut built = false;

        let outcome = cell
            .get_or_init(|| {
                built = true;
                init()
            })
            .await
            .clone();

        match outcome {
            Ok(value) => Ok(Resolved { value, built }),
            Err(e) => {
                self.discard_failed(key, &cell);
                Err(e)
            }
        }
    }

    /// Drop `cell` if it is still the one registered for `key`.
    fn discard_failed(&self, key: &str, cell: &Cell<V, E>) {
        let mut cells = self.cells.lock().unwrap_or_else(|e| e.into_inner());
        if cells.peek(key).is_some_and(|current| Arc::ptr_eq(current, cell)) {
            cells.remove(key);
        }
    }

    /// Value for `key` if already built. Never waits.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut cells = self.cells.lock().unwrap_or_else(|e| e.into_inner());
        cells
            .get(key)
            .and_then(|cell| cell.get().and_then(|outcome| outcome.as_ref().ok().cloned()))
    }

    /// Number of registered keys, builds in flight included.
    pub fn len(&self) -> usize {
        let cells = self.cells.lock().unwrap_or_else(|e| e.into_inner());
        cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn evictions(&self) -> u64 {
        self.cells.lock().unwrap_or_else(|e| e.into_inner()).evictions()
    }

    pub fn clear(&self) {
        self.cells.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{LeastRecentlyUsed, NeverEvict};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn flight() -> SingleFlight<u32, ()> {
        SingleFlight::new(Box::new(NeverEvict))
    }

    #[tokio::test]
    async fn builds_once_then_hits() {
        let flights = flight();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let first = flights
            .get_or_try_init("a", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await
            .unwrap();
        let second = flights
            .get_or_try_init("a", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(8)
            })
            .await
            .unwrap();

        assert_eq!((first.value, first.built), (7, true));
        assert_eq!((second.value, second.built), (7, false));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(flights.get("a"), Some(7));
    }

    #[tokio::test]
    async fn failure_leaves_no_entry() {
        let flights: SingleFlight<u32, &str> = SingleFlight::new(Box::new(NeverEvict));

        let err = flights
            .get_or_try_init("a", || async { Err::<u32, _>("boom") })
            .await
            .unwrap_err();
        assert_eq!(err, "boom");
        assert!(flights.is_empty());
        assert_eq!(flights.get("a"), None);

        let retry = flights
            .get_or_try_init("a", || async { Ok(1) })
            .await
            .unwrap();
        assert!(retry.built);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_build() {
        let flights = &flight();
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let futures = (0..8).map(move |_| {
            flights.get_or_try_init("doc", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(42)
            })
        });
        let results = futures::future::join_all(futures).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| r.as_ref().map(|r| r.value) == Ok(42)));
        assert_eq!(results.iter().filter(|r| r.as_ref().is_ok_and(|r| r.built)).count(), 1);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_failure() {
        let flights: &SingleFlight<u32, String> = &SingleFlight::new(Box::new(NeverEvict));
        let counter = AtomicUsize::new(0);
        let calls = &counter;

        let futures = (0..6).map(move |_| {
            flights.get_or_try_init("doc", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                Err("ingestion failed".to_string())
            })
        });
        let results = futures::future::join_all(futures).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| r.as_ref().err().map(String::as_str) == Some("ingestion failed")));
        assert!(flights.is_empty());

        // Once resolved, the failure is forgotten.
        let retry = flights.get_or_try_init("doc", || async { Ok(5) }).await.unwrap();
        assert!(retry.built);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn bounded_flights_evict_completed_keys() {
        let flights: SingleFlight<u32, ()> = SingleFlight::new(Box::new(LeastRecentlyUsed::new(1)));
        flights
            .get_or_try_init("a", || async { Ok(1) })
            .await
            .unwrap();
        flights
            .get_or_try_init("b", || async { Ok(2) })
            .await
            .unwrap();

        assert_eq!(flights.len(), 1);
        assert_eq!(flights.get("a"), None);
        assert_eq!(flights.evictions(), 1);
    }
}
