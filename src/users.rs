use tracing::{debug, info, warn};

use crate::config::*;
use crate::core::errors::{StoreError, StoreResult};
use crate::core::helpers::{contains_ignore_case, next_id, now_iso};
use crate::core::kv::{BatchOp, JsonStore, KeyValueStore};
use crate::models::models::{
    DeveloperQuery, DeveloperSummary, NewUser, ProfileUpdate, Project, SessionUser, User,
};

/// Accounts and the single active session.
pub struct UserStore<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

pub(crate) fn set_link(slot: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        let value = value.trim();
        *slot = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
    }
}

impl<'a, S: KeyValueStore + ?Sized> UserStore<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    fn load(&self) -> StoreResult<Vec<User>> {
        Ok(self.store.get_json(USERS_KEY)?.unwrap_or_default())
    }

    pub fn register(&self, new_user: NewUser) -> StoreResult<User> {
        let mut users = self.load()?;

        if users.iter().any(|u| u.email == new_user.email) {
            warn!(email = %new_user.email, "registration rejected: email exists");
            return Err(StoreError::DuplicateEmail);
        }

        let user = User {
            id: next_id(users.iter().map(|u| u.id.as_str())),
            email: new_user.email,
            password: new_user.password,
            name: new_user.name,
            title: new_user.title,
            bio: new_user.bio,
            location: new_user.location,
            skills: new_user.skills,
            avatar: new_user.avatar,
            github_url: new_user.github_url,
            linkedin_url: new_user.linkedin_url,
            website_url: new_user.website_url,
            created_at: now_iso(),
        };

        users.push(user.clone());
        self.store.commit(vec![
            BatchOp::set_json(USERS_KEY, &users)?,
            BatchOp::set_json(CURRENT_USER_KEY, &SessionUser::from(&user))?,
        ])?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    pub fn login(&self, email: &str, password: &str) -> StoreResult<SessionUser> {
        let users = self.load()?;

        let user = match users.iter().find(|u| u.email == email) {
            Some(u) => u,
            None => {
                warn!(%email, "login rejected: unknown email");
                return Err(StoreError::UserNotFound);
            }
        };

        if user.password != password {
            warn!(user_id = %user.id, "login rejected: wrong password");
            return Err(StoreError::InvalidCredentials);
        }

        let session = SessionUser::from(user);
        self.store.set_json(CURRENT_USER_KEY, &session)?;

        info!(user_id = %session.id, "user logged in");
        Ok(session)
    }

    pub fn logout(&self) -> StoreResult<()> {
        self.store.delete(CURRENT_USER_KEY)?;
        info!("session cleared");
        Ok(())
    }

    pub fn current_session(&self) -> StoreResult<Option<SessionUser>> {
        self.store.get_json(CURRENT_USER_KEY)
    }

    pub fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> StoreResult<User> {
        let mut users = self.load()?;

        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(StoreError::UserNotFound)?;

        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(title) = update.title {
            user.title = title;
        }
        if let Some(bio) = update.bio {
            user.bio = bio;
        }
        if let Some(location) = update.location {
            user.location = location;
        }
        if let Some(skills) = update.skills {
            user.skills = skills;
        }
        if let Some(avatar) = update.avatar {
            user.avatar = avatar;
        }
        if let Some(password) = update.password {
            user.password = password;
        }
        set_link(&mut user.github_url, update.github_url);
        set_link(&mut user.linkedin_url, update.linkedin_url);
        set_link(&mut user.website_url, update.website_url);

        let updated = user.clone();

        let mut batch = vec![BatchOp::set_json(USERS_KEY, &users)?];
        if let Some(session) = self.current_session()? {
            if session.id == updated.id {
                batch.push(BatchOp::set_json(CURRENT_USER_KEY, &SessionUser::from(&updated))?);
            }
        }
        self.store.commit(batch)?;

        debug!(user_id = %updated.id, "profile updated");
        Ok(updated)
    }

    pub fn list_all(&self) -> StoreResult<Vec<User>> {
        self.load()
    }

    pub fn get(&self, user_id: &str) -> StoreResult<Option<User>> {
        Ok(self.load()?.into_iter().find(|u| u.id == user_id))
    }

    /// Every account as a public profile with its project count, in
    /// registration order.
    pub fn directory(&self) -> StoreResult<Vec<DeveloperSummary>> {
        let users = self.load()?;
        let projects: Vec<Project> = self.store.get_json(PROJECTS_KEY)?.unwrap_or_default();

        Ok(users
            .iter()
            .map(|u| DeveloperSummary {
                profile: SessionUser::from(u),
                projects: projects.iter().filter(|p| p.author_id == u.id).count(),
            })
            .collect())
    }

    /// Directory entries whose name, title, location or a skill contains
    /// the query text, ignoring case, and that have a skill in the query
    /// category.
    pub fn search(&self, query: &DeveloperQuery) -> StoreResult<Vec<DeveloperSummary>> {
        let needle = query
            .text
            .as_deref()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());
        let category = query.category.as_deref().filter(|c| !c.is_empty());

        Ok(self
            .directory()?
            .into_iter()
            .filter(|d| match &needle {
                Some(n) => {
                    let p = &d.profile;
                    contains_ignore_case(&p.name, n)
                        || contains_ignore_case(&p.title, n)
                        || contains_ignore_case(&p.location, n)
                        || p.skills.iter().any(|s| contains_ignore_case(s, n))
                }
                None => true,
            })
            .filter(|d| match category {
                Some(c) => d.profile.skills.iter().any(|s| skill_in_category(s, c)),
                None => true,
            })
            .collect())
    }
}

const CATEGORY_TECHS: [(&str, &[&str]); 6] = [
    ("Frontend", &["React", "Vue", "Angular", "JavaScript", "TypeScript", "CSS"]),
    ("Backend", &["Node.js", "Python", "Java", "Django", "Express", "API"]),
    ("Mobile", &["React Native", "Flutter", "Swift", "Kotlin", "iOS", "Android"]),
    ("DevOps", &["Docker", "Kubernetes", "AWS", "CI/CD", "Jenkins", "Terraform"]),
    ("Data Science", &["Python", "TensorFlow", "Pandas", "ML", "AI", "Data"]),
    ("Blockchain", &["Solidity", "Web3", "Ethereum", "Crypto", "DeFi"]),
];

/// A skill belongs to a category when it names the category (any case) or
/// contains one of the category's techs (exact case).
pub fn skill_in_category(skill: &str, category: &str) -> bool {
    if contains_ignore_case(skill, &category.to_lowercase()) {
        return true;
    }
    CATEGORY_TECHS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, techs)| techs.iter().any(|tech| skill.contains(tech)))
        .unwrap_or(false)
}
