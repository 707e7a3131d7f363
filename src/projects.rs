use tracing::{debug, info};

use crate::config::*;
use crate::core::errors::StoreResult;
use crate::core::helpers::{contains_ignore_case, next_id, now_iso};
use crate::core::kv::{JsonStore, KeyValueStore};
use crate::likes::{self, LikeToggle};
use crate::models::models::{NewProject, Project, ProjectQuery, ProjectUpdate, ProjectView};
use crate::users::set_link;

/// Project records, newest first, plus the like relation over them.
pub struct ProjectStore<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> ProjectStore<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    fn load(&self) -> StoreResult<Vec<Project>> {
        Ok(self.store.get_json(PROJECTS_KEY)?.unwrap_or_default())
    }

    fn save(&self, projects: &[Project]) -> StoreResult<()> {
        self.store.set_json(PROJECTS_KEY, projects)
    }

    /// Inserts at the head of the collection. The caller vouches for
    /// `author_id`; nothing here checks it.
    pub fn create(&self, new_project: NewProject) -> StoreResult<Project> {
        let mut projects = self.load()?;

        let image = if new_project.image.trim().is_empty() {
            PLACEHOLDER_IMAGE.to_string()
        } else {
            new_project.image
        };

        let project = Project {
            id: next_id(projects.iter().map(|p| p.id.as_str())),
            title: new_project.title,
            description: new_project.description,
            image,
            author_id: new_project.author_id,
            author: new_project.author,
            tags: new_project.tags,
            likes: 0,
            comments: 0,
            views: 0,
            github_url: new_project.github_url,
            live_url: new_project.live_url,
            created_at: now_iso(),
        };

        projects.insert(0, project.clone());
        self.save(&projects)?;

        info!(project_id = %project.id, author_id = %project.author_id, "project created");
        Ok(project)
    }

    pub fn list_all(&self) -> StoreResult<Vec<Project>> {
        self.load()
    }

    pub fn get_by_id(&self, project_id: &str) -> StoreResult<Option<Project>> {
        Ok(self.load()?.into_iter().find(|p| p.id == project_id))
    }

    pub fn get_by_author(&self, author_id: &str) -> StoreResult<Vec<Project>> {
        Ok(self
            .load()?
            .into_iter()
            .filter(|p| p.author_id == author_id)
            .collect())
    }

    pub fn toggle_like(&self, project_id: &str, user_id: &str) -> StoreResult<Option<LikeToggle>> {
        likes::toggle(self.store, project_id, user_id)
    }

    pub fn is_liked(&self, project_id: &str, user_id: &str) -> StoreResult<bool> {
        likes::is_liked(self.store, project_id, user_id)
    }

    /// Counts every call; there is no per-viewer de-duplication.
    pub fn increment_views(&self, project_id: &str) -> StoreResult<Option<u32>> {
        let mut projects = self.load()?;
        let views = match projects.iter_mut().find(|p| p.id == project_id) {
            Some(p) => {
                p.views += 1;
                p.views
            }
            None => return Ok(None),
        };
        self.save(&projects)?;

        debug!(%project_id, views, "view counted");
        Ok(Some(views))
    }

    pub fn update(&self, project_id: &str, update: ProjectUpdate) -> StoreResult<Option<Project>> {
        let mut projects = self.load()?;
        let project = match projects.iter_mut().find(|p| p.id == project_id) {
            Some(p) => p,
            None => return Ok(None),
        };

        if let Some(title) = update.title {
            project.title = title;
        }
        if let Some(description) = update.description {
            project.description = description;
        }
        if let Some(image) = update.image {
            project.image = if image.trim().is_empty() {
                PLACEHOLDER_IMAGE.to_string()
            } else {
                image
            };
        }
        if let Some(tags) = update.tags {
            project.tags = tags;
        }
        set_link(&mut project.github_url, update.github_url);
        set_link(&mut project.live_url, update.live_url);

        let updated = project.clone();
        self.save(&projects)?;

        debug!(%project_id, "project updated");
        Ok(Some(updated))
    }

    /// Like entries pointing at the removed project stay behind.
    pub fn delete(&self, project_id: &str) -> StoreResult<bool> {
        let mut projects = self.load()?;
        let before = projects.len();
        projects.retain(|p| p.id != project_id);
        if projects.len() == before {
            return Ok(false);
        }
        self.save(&projects)?;

        info!(%project_id, "project deleted");
        Ok(true)
    }

    /// Every project with the viewer's like state. Anonymous viewers see
    /// nothing liked.
    pub fn list_for_viewer(&self, viewer_id: Option<&str>) -> StoreResult<Vec<ProjectView>> {
        self.annotate(self.load()?, viewer_id)
    }

    /// Pairs each project with the viewer's like state, reading the likes
    /// region once.
    pub fn annotate(
        &self,
        projects: Vec<Project>,
        viewer_id: Option<&str>,
    ) -> StoreResult<Vec<ProjectView>> {
        let liked = likes::load_likes(self.store)?;

        Ok(projects
            .into_iter()
            .map(|project| {
                let is_liked = match viewer_id {
                    Some(uid) if !uid.is_empty() => liked
                        .get(&likes::like_key(uid, &project.id))
                        .copied()
                        .unwrap_or(false),
                    _ => false,
                };
                ProjectView { project, is_liked }
            })
            .collect())
    }

    /// Text matches title, description or author name ignoring case; a tag
    /// must match one of the project's tags exactly.
    pub fn search(&self, query: &ProjectQuery) -> StoreResult<Vec<Project>> {
        let needle = query
            .text
            .as_deref()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());
        let tag = query.tag.as_deref().filter(|t| !t.is_empty());

        Ok(self
            .load()?
            .into_iter()
            .filter(|p| match &needle {
                Some(n) => {
                    contains_ignore_case(&p.title, n)
                        || contains_ignore_case(&p.description, n)
                        || contains_ignore_case(&p.author.name, n)
                }
                None => true,
            })
            .filter(|p| match tag {
                Some(t) => p.tags.iter().any(|pt| pt == t),
                None => true,
            })
            .collect())
    }

    /// Most liked first; equal counts keep stored order.
    pub fn featured(&self, limit: usize) -> StoreResult<Vec<Project>> {
        let mut projects = self.load()?;
        projects.sort_by(|a, b| b.likes.cmp(&a.likes));
        projects.truncate(limit);
        Ok(projects)
    }
}
