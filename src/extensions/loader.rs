//! Module loaders and the memoising lazy resource.
//!
//! A [`Loader`] is a thunk: nothing is fetched until it is invoked.
//! [`LazyResource`] wraps one with an explicit [`ResolutionState`] machine and
//! caches the outcome, success or failure, for its whole lifetime.

use crate::error::LoadError;

use futures::FutureExt;
use futures::future::BoxFuture;
use log::{debug, warn};
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::OnceCell;

/// Future produced by a loader.
pub type LoadFuture<T> = BoxFuture<'static, Result<T, LoadError>>;

/// A deferred load. Calling it starts the fetch.
pub type Loader<T> = Arc<dyn Fn() -> LoadFuture<T> + Send + Sync>;

/// Fetches a UI fragment descriptor by its declarative path.
pub trait ModuleLoader: Send + Sync {
    fn load(&self, resource_path: &str) -> LoadFuture<Value>;
}

/// Loads JSON fragments from files under a root directory.
#[derive(Debug, Clone)]
pub struct FsModuleLoader {
    root: PathBuf,
}

impl FsModuleLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join `resource_path` onto the root, refusing anything that escapes it.
    fn resolve_path(&self, resource_path: &str) -> Result<PathBuf, LoadError> {
        let relative = Path::new(resource_path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || resource_path.is_empty() {
            return Err(LoadError::OutsideRoot {
                path: resource_path.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl ModuleLoader for FsModuleLoader {
    fn load(&self, resource_path: &str) -> LoadFuture<Value> {
        let path = resource_path.to_string();
        let full_path = self.resolve_path(resource_path);

        async move {
            let full_path = full_path?;
            let content = tokio::fs::read_to_string(&full_path)
                .await
                .map_err(|e| match e.kind() {
                    std::io::ErrorKind::NotFound => LoadError::NotFound { path: path.clone() },
                    _ => LoadError::Other {
                        path: path.clone(),
                        message: e.to_string(),
                    },
                })?;
            serde_json::from_str(&content).map_err(|e| LoadError::Malformed {
                path,
                message: e.to_string(),
            })
        }
        .boxed()
    }
}

/// Lifecycle of a single lazily loaded resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    Unresolved,
    Resolving,
    Resolved,
    Failed,
}

/// Why a lazy resource could not be produced.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ResolutionFailure {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Loader for '{path}' panicked: {message}")]
    Panicked { path: String, message: String },
}

/// A memoising wrapper around a [`Loader`].
///
/// The first `resolve` call runs the loader; concurrent callers wait for that
/// same run. Once resolved or failed, the outcome is returned from cache and
/// the loader is never invoked again.
pub struct LazyResource<T> {
    label: String,
    loader: Loader<T>,
    outcome: OnceCell<Result<Arc<T>, ResolutionFailure>>,
    resolving: AtomicBool,
}

impl<T: Send + Sync + 'static> LazyResource<T> {
    pub fn new(label: impl Into<String>, loader: Loader<T>) -> Self {
        Self {
            label: label.into(),
            loader,
            outcome: OnceCell::new(),
            resolving: AtomicBool::new(false),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> ResolutionState {
        match self.outcome.get() {
            Some(Ok(_)) => ResolutionState::Resolved,
            Some(Err(_)) => ResolutionState::Failed,
            None if self.resolving.load(Ordering::Acquire) => ResolutionState::Resolving,
            None => ResolutionState::Unresolved,
        }
    }

    /// Resolve the resource, running the loader at most once.
    pub async fn resolve(&self) -> Result<Arc<T>, ResolutionFailure> {
        self.outcome
            .get_or_init(|| async {
                let _guard = ResolvingGuard::enter(&self.resolving);
                debug!("Resolving lazy resource '{}'", self.label);

                match AssertUnwindSafe(async { (self.loader)().await })
                    .catch_unwind()
                    .await
                {
                    Ok(Ok(value)) => Ok(Arc::new(value)),
                    Ok(Err(error)) => {
                        warn!("Lazy resource '{}' failed to load: {}", self.label, error);
                        Err(ResolutionFailure::Load(error))
                    }
                    Err(panic) => {
                        let message = panic_message(panic.as_ref());
                        warn!("Loader for '{}' panicked: {}", self.label, message);
                        Err(ResolutionFailure::Panicked {
                            path: self.label.clone(),
                            message,
                        })
                    }
                }
            })
            .await
            .clone()
    }
}

impl<T> fmt::Debug for LazyResource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyResource")
            .field("label", &self.label)
            .field("resolved", &self.outcome.initialized())
            .finish()
    }
}

/// Marks a resolution in flight; cleared on completion or cancellation.
struct ResolvingGuard<'a>(&'a AtomicBool);

impl<'a> ResolvingGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
