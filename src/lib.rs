//! Developer profiles, project showcase and likes, persisted in a
//! key-value namespace.
//!
//! A [`DevHub`] owns the backend and bootstraps it on open; the
//! [`UserStore`] and [`ProjectStore`] views it hands out borrow that
//! backend for the duration of a call.

pub mod config;
pub mod core;
pub mod likes;
#[allow(clippy::module_inception)]
pub mod models;
pub mod projects;
pub mod users;

pub use crate::config::Config;
pub use crate::core::errors::{StoreError, StoreResult};
pub use crate::core::kv::{BatchOp, FileStore, JsonStore, KeyValueStore, MemoryStore};
pub use crate::likes::LikeToggle;
pub use crate::projects::ProjectStore;
pub use crate::users::UserStore;

pub struct DevHub<S: KeyValueStore> {
    store: S,
    seed_samples: bool,
}

impl<S: KeyValueStore> DevHub<S> {
    /// Takes ownership of `store` and creates any missing collection.
    pub fn open(store: S) -> StoreResult<Self> {
        Self::open_with(store, true)
    }

    pub fn open_with(store: S, seed_samples: bool) -> StoreResult<Self> {
        crate::core::db::init_seed_data(&store, seed_samples)?;
        tracing::debug!(seed_samples, "store bootstrapped");
        Ok(Self {
            store,
            seed_samples,
        })
    }

    pub fn users(&self) -> UserStore<'_, S> {
        UserStore::new(&self.store)
    }

    pub fn projects(&self) -> ProjectStore<'_, S> {
        ProjectStore::new(&self.store)
    }

    /// Clears every region, the session included, and bootstraps again.
    pub fn reset(&self) -> StoreResult<()> {
        crate::core::db::reset_db_data(&self.store, self.seed_samples)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}
