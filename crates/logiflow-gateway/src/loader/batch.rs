//! Loader que agrupa lookups por key en un solo fetch.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use logiflow_core::GatewayError;
use parking_lot::Mutex;
use tracing::debug;

/// Error de un batch. Es `Clone` porque lo comparten todos los que
/// esperan el mismo batch.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LoadError {
    /// El backend fallo durante el fetch.
    #[error(transparent)]
    Upstream(#[from] GatewayError),

    /// El fetch fallo por otra causa.
    #[error("batch fetch failed: {0}")]
    Fetch(String),

    /// El fetch devolvio una cantidad de resultados distinta a la de keys.
    #[error("batch returned {actual} results for {expected} keys")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Funcion de batch: recibe keys sin duplicados y devuelve un resultado
/// por key, en el mismo orden.
#[async_trait]
pub trait BatchFetch<K, V>: Send + Sync {
    async fn fetch(&self, keys: Vec<K>) -> Result<Vec<V>, LoadError>;
}

/// Adapta un closure async a [`BatchFetch`].
pub struct FnBatch<F>(pub F);

#[async_trait]
impl<K, V, F, Fut> BatchFetch<K, V> for FnBatch<F>
where
    K: Send + 'static,
    V: Send + 'static,
    F: Fn(Vec<K>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<V>, LoadError>> + Send,
{
    async fn fetch(&self, keys: Vec<K>) -> Result<Vec<V>, LoadError> {
        (self.0)(keys).await
    }
}

/// Future de un `load`; se puede clonar y esperar varias veces.
pub type LoadFuture<V> = Shared<BoxFuture<'static, Result<V, LoadError>>>;

type BatchFuture<V> = Shared<BoxFuture<'static, Result<Arc<Vec<V>>, LoadError>>>;

/// Keys del batch abierto; `None` una vez despachado.
type PendingKeys<K> = Arc<Mutex<Option<Vec<K>>>>;

struct OpenBatch<K, V> {
    keys: PendingKeys<K>,
    future: BatchFuture<V>,
}

struct LoaderState<K, V> {
    memo: HashMap<K, LoadFuture<V>>,
    open: Option<OpenBatch<K, V>>,
}

/// Coalesce lookups por key dentro de un request.
///
/// Cada `load` registra su key de forma sincrona en el batch abierto. El
/// batch se despacha en el siguiente punto de suspension, lo espere alguien
/// o no (o antes, si alguien hace poll de uno de sus futures): todas las
/// llamadas hechas antes viajan en un solo fetch. Los resultados quedan
/// memoizados por key durante la vida del loader.
///
/// Un loader vive lo que dura un request. Reusarlo entre requests
/// devolveria valores viejos.
///
/// # Examples
///
/// ```no_run
/// use logiflow_gateway::loader::{BatchLoader, FnBatch, LoadError};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), LoadError> {
/// let loader = BatchLoader::new(
///     "lengths",
///     FnBatch(|keys: Vec<String>| async move {
///         Ok::<_, LoadError>(keys.iter().map(|k| k.len()).collect::<Vec<usize>>())
///     }),
/// );
///
/// let (a, b) = futures::join!(loader.load("uno".into()), loader.load("tres".into()));
/// assert_eq!((a?, b?), (3, 4));
/// # Ok(())
/// # }
/// ```
pub struct BatchLoader<K, V> {
    name: &'static str,
    fetch: Arc<dyn BatchFetch<K, V>>,
    state: Arc<Mutex<LoaderState<K, V>>>,
}

impl<K, V> BatchLoader<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str, fetch: impl BatchFetch<K, V> + 'static) -> Self {
        Self {
            name,
            fetch: Arc::new(fetch),
            state: Arc::new(Mutex::new(LoaderState {
                memo: HashMap::new(),
                open: None,
            })),
        }
    }

    /// Registra `key` y retorna su resultado futuro.
    pub fn load(&self, key: K) -> LoadFuture<V> {
        let mut state = self.state.lock();

        if let Some(existing) = state.memo.get(&key) {
            return existing.clone();
        }

        let joined = state.open.as_ref().and_then(|open| {
            let mut pending = open.keys.lock();
            pending.as_mut().map(|keys| {
                keys.push(key.clone());
                (keys.len() - 1, open.future.clone())
            })
        });

        let (index, batch) = match joined {
            Some(joined) => joined,
            None => {
                let keys: PendingKeys<K> = Arc::new(Mutex::new(Some(vec![key.clone()])));
                let future = self.dispatch(Arc::clone(&keys));
                schedule(self.name, future.clone());
                state.open = Some(OpenBatch {
                    keys,
                    future: future.clone(),
                });
                (0, future)
            },
        };

        let load = resolve(index, batch, key.clone(), Arc::downgrade(&self.state)).shared();
        state.memo.insert(key, load.clone());
        load
    }

    /// Olvida el resultado memoizado de `key`.
    pub fn clear(&self, key: &K) {
        self.state.lock().memo.remove(key);
    }

    /// Olvida todos los resultados memoizados.
    pub fn clear_all(&self) {
        self.state.lock().memo.clear();
    }

    fn dispatch(&self, keys: PendingKeys<K>) -> BatchFuture<V> {
        let fetch = Arc::clone(&self.fetch);
        let name = self.name;

        let batch: BoxFuture<'static, Result<Arc<Vec<V>>, LoadError>> = Box::pin(async move {
            // Primer poll: desde aqui ninguna key nueva entra en este batch
            let keys = keys.lock().take().unwrap_or_default();
            let expected = keys.len();
            debug!(loader = name, keys = expected, "Dispatching batch");

            let values = fetch.fetch(keys).await?;
            if values.len() != expected {
                return Err(LoadError::LengthMismatch {
                    expected,
                    actual: values.len(),
                });
            }
            Ok(Arc::new(values))
        });

        batch.shared()
    }
}

/// Despacha el batch en el siguiente punto de suspension aunque nadie
/// espere sus futures. Sin runtime el batch sale en el primer poll.
fn schedule<V>(name: &'static str, batch: BatchFuture<V>)
where
    V: Send + Sync + 'static,
{
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        debug!(loader = name, "No runtime, batch dispatches on first poll");
        return;
    };

    handle.spawn(async move {
        tokio::task::yield_now().await;
        let _ = batch.await;
    });
}

/// Extrae el resultado de una key; si falla, la key deja de estar
/// memoizada para que un `load` posterior reintente.
fn resolve<K, V>(
    index: usize,
    batch: BatchFuture<V>,
    key: K,
    state: Weak<Mutex<LoaderState<K, V>>>,
) -> BoxFuture<'static, Result<V, LoadError>>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    Box::pin(async move {
        let result = match batch.await {
            Ok(values) => values.get(index).cloned().ok_or(LoadError::LengthMismatch {
                expected: index + 1,
                actual: values.len(),
            }),
            Err(e) => Err(e),
        };

        if result.is_err() {
            if let Some(state) = state.upgrade() {
                state.lock().memo.remove(&key);
            }
        }

        result
    })
}

impl<K, V> std::fmt::Debug for BatchLoader<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchLoader")
            .field("name", &self.name)
            .finish()
    }
}
