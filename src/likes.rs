//! The user/project like relation.
//!
//! Presence of `"<userId>_<projectId>"` in the likes region means that user
//! has bumped that project's `likes` counter exactly once. The toggle writes
//! the relation and the counter in a single commit so they move together.

use tracing::debug;

use crate::config::*;
use crate::core::errors::StoreResult;
use crate::core::kv::{BatchOp, JsonStore, KeyValueStore};
use crate::models::models::{LikeMap, Project};

pub fn like_key(user_id: &str, project_id: &str) -> String {
    format!("{}_{}", user_id, project_id)
}

/// Outcome of one toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeToggle {
    pub liked: bool,
    pub likes: u32,
}

pub(crate) fn load_likes<S: KeyValueStore + ?Sized>(store: &S) -> StoreResult<LikeMap> {
    Ok(store.get_json(LIKES_KEY)?.unwrap_or_default())
}

/// Flips the pair and moves the counter with it. Returns `None` when the
/// project does not exist.
pub fn toggle<S: KeyValueStore + ?Sized>(
    store: &S,
    project_id: &str,
    user_id: &str,
) -> StoreResult<Option<LikeToggle>> {
    let mut projects: Vec<Project> = store.get_json(PROJECTS_KEY)?.unwrap_or_default();
    let project = match projects.iter_mut().find(|p| p.id == project_id) {
        Some(p) => p,
        None => return Ok(None),
    };

    let mut likes = load_likes(store)?;
    let key = like_key(user_id, project_id);

    let liked = if likes.remove(&key).unwrap_or(false) {
        project.likes = project.likes.saturating_sub(1);
        false
    } else {
        likes.insert(key, true);
        project.likes += 1;
        true
    };
    let outcome = LikeToggle {
        liked,
        likes: project.likes,
    };

    store.commit(vec![
        BatchOp::set_json(PROJECTS_KEY, &projects)?,
        BatchOp::set_json(LIKES_KEY, &likes)?,
    ])?;

    debug!(%project_id, %user_id, liked, likes = outcome.likes, "like toggled");
    Ok(Some(outcome))
}

pub fn is_liked<S: KeyValueStore + ?Sized>(
    store: &S,
    project_id: &str,
    user_id: &str,
) -> StoreResult<bool> {
    if user_id.is_empty() {
        return Ok(false);
    }
    let likes = load_likes(store)?;
    Ok(likes.get(&like_key(user_id, project_id)).copied().unwrap_or(false))
}
