use crate::config::*;
use crate::core::errors::StoreResult;
use crate::core::kv::{JsonStore, KeyValueStore};
use crate::models::models::{AuthorSnapshot, Comment, LikeMap, Project, User};

#[allow(clippy::too_many_arguments)]
fn sample_project(
    n: u32,
    title: &str,
    description: &str,
    author: &str,
    tags: &[&str],
    counters: (u32, u32, u32),
    github: &str,
    live: &str,
    created_at: &str,
) -> Project {
    let (likes, comments, views) = counters;
    Project {
        id: format!("sample-{}", n),
        title: title.to_string(),
        description: description.to_string(),
        image: PLACEHOLDER_IMAGE.to_string(),
        author_id: format!("sample-user-{}", n),
        author: AuthorSnapshot {
            name: author.to_string(),
            avatar: PLACEHOLDER_AVATAR.to_string(),
        },
        tags: tags.iter().map(|t| t.to_string()).collect(),
        likes,
        comments,
        views,
        github_url: Some(github.to_string()),
        live_url: Some(live.to_string()),
        created_at: created_at.to_string(),
    }
}

pub fn sample_projects() -> Vec<Project> {
    vec![
        sample_project(
            1,
            "AI-Powered Task Manager",
            "A smart task management app that uses AI to prioritize your tasks and suggest optimal scheduling. Built with React, Node.js, and OpenAI API.",
            "Alex Chen",
            &["React", "Node.js", "AI", "TypeScript", "MongoDB"],
            (42, 8, 156),
            "https://github.com/alexchen/ai-task-manager",
            "https://ai-tasks.demo.com",
            "2024-01-15",
        ),
        sample_project(
            2,
            "Real-time Collaboration Whiteboard",
            "A collaborative whiteboard application with real-time synchronization, perfect for remote teams. Features include drawing tools, sticky notes, and video chat integration.",
            "Sarah Johnson",
            &["Vue.js", "Socket.io", "Canvas", "WebRTC"],
            (38, 12, 203),
            "https://github.com/sarahjohnson/collab-whiteboard",
            "https://whiteboard.demo.com",
            "2024-01-10",
        ),
        sample_project(
            3,
            "Cryptocurrency Portfolio Tracker",
            "Track your crypto investments with real-time price updates, portfolio analytics, and profit/loss calculations. Supports 100+ cryptocurrencies.",
            "Mike Rodriguez",
            &["React", "Python", "FastAPI", "Chart.js", "PostgreSQL"],
            (29, 6, 89),
            "https://github.com/mikerodriguez/crypto-tracker",
            "https://crypto-portfolio.demo.com",
            "2024-01-08",
        ),
    ]
}

/// Creates each collection that is missing. Existing keys are never
/// touched, so calling this repeatedly is harmless.
pub fn init_seed_data<S: KeyValueStore + ?Sized>(store: &S, seed_samples: bool) -> StoreResult<()> {
    if !store.exists(USERS_KEY)? {
        store.set_json(USERS_KEY, &Vec::<User>::new())?;
    }

    if !store.exists(PROJECTS_KEY)? {
        let projects = if seed_samples {
            sample_projects()
        } else {
            Vec::new()
        };
        tracing::debug!(count = projects.len(), "seeding projects");
        store.set_json(PROJECTS_KEY, &projects)?;
    }

    if !store.exists(COMMENTS_KEY)? {
        store.set_json(COMMENTS_KEY, &Vec::<Comment>::new())?;
    }

    if !store.exists(LIKES_KEY)? {
        store.set_json(LIKES_KEY, &LikeMap::new())?;
    }

    Ok(())
}

/// Development reset: drops every region, the session included, then
/// bootstraps again.
pub fn reset_db_data<S: KeyValueStore + ?Sized>(store: &S, seed_samples: bool) -> StoreResult<()> {
    for key in ALL_KEYS {
        store.delete(key)?;
    }
    tracing::info!("all data cleared");

    init_seed_data(store, seed_samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kv::MemoryStore;

    #[test]
    fn seeds_three_samples_once() {
        let store = MemoryStore::new();
        init_seed_data(&store, true).unwrap();

        let projects: Vec<Project> = store.get_json(PROJECTS_KEY).unwrap().unwrap();
        assert_eq!(projects.len(), 3);
        assert_eq!(projects[0].id, "sample-1");
        assert_eq!(projects[1].likes, 38);
        assert_eq!(projects[2].author.name, "Mike Rodriguez");

        let users: Vec<User> = store.get_json(USERS_KEY).unwrap().unwrap();
        assert!(users.is_empty());
        let likes: LikeMap = store.get_json(LIKES_KEY).unwrap().unwrap();
        assert!(likes.is_empty());
        assert!(store.exists(COMMENTS_KEY).unwrap());
        assert!(!store.exists(CURRENT_USER_KEY).unwrap());
    }

    #[test]
    fn never_overwrites_existing_regions() {
        let store = MemoryStore::new();
        store.set_json(PROJECTS_KEY, &Vec::<Project>::new()).unwrap();

        init_seed_data(&store, true).unwrap();
        init_seed_data(&store, true).unwrap();

        let projects: Vec<Project> = store.get_json(PROJECTS_KEY).unwrap().unwrap();
        assert!(projects.is_empty());
    }

    #[test]
    fn seeding_can_be_disabled() {
        let store = MemoryStore::new();
        init_seed_data(&store, false).unwrap();

        let projects: Vec<Project> = store.get_json(PROJECTS_KEY).unwrap().unwrap();
        assert!(projects.is_empty());
    }

    #[test]
    fn reset_clears_session_and_reseeds() {
        let store = MemoryStore::new();
        init_seed_data(&store, true).unwrap();
        store.set_json(PROJECTS_KEY, &Vec::<Project>::new()).unwrap();
        store.set_json(CURRENT_USER_KEY, &"someone").unwrap();

        reset_db_data(&store, true).unwrap();

        let projects: Vec<Project> = store.get_json(PROJECTS_KEY).unwrap().unwrap();
        assert_eq!(projects.len(), 3);
        assert!(!store.exists(CURRENT_USER_KEY).unwrap());
    }
}
