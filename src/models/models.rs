use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A stored account. This is the only shape that carries the password.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    pub created_at: String,
}

/// The redacted copy of a [`User`] held as the active session.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    pub created_at: String,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            title: user.title.clone(),
            bio: user.bio.clone(),
            location: user.location.clone(),
            skills: user.skills.clone(),
            avatar: user.avatar.clone(),
            github_url: user.github_url.clone(),
            linkedin_url: user.linkedin_url.clone(),
            website_url: user.website_url.clone(),
            created_at: user.created_at.clone(),
        }
    }
}

/// Registration input: every profile field except the assigned id and
/// creation time.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub title: String,
    pub bio: String,
    pub location: String,
    pub skills: Vec<String>,
    pub avatar: String,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub website_url: Option<String>,
}

/// Partial profile edit. `None` leaves a field untouched; an empty link
/// clears it.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub skills: Option<Vec<String>>,
    pub avatar: Option<String>,
    pub password: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub website_url: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct AuthorSnapshot {
    pub name: String,
    pub avatar: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub author_id: String,
    pub author: AuthorSnapshot,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub comments: u32,
    #[serde(default)]
    pub views: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub image: String,
    pub author_id: String,
    pub author: AuthorSnapshot,
    pub tags: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
}

impl NewProject {
    /// Starts a project owned by `author`, snapshotting their name and
    /// avatar as they are now.
    pub fn authored_by(author: &SessionUser, title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            author_id: author.id.clone(),
            author: AuthorSnapshot {
                name: author.name.clone(),
                avatar: author.avatar.clone(),
            },
            ..Default::default()
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub tags: Option<Vec<String>>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
}

/// Declared shape of the comments region. Nothing writes it yet.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub project_id: String,
    pub author_id: String,
    pub author: AuthorSnapshot,
    pub content: String,
    pub created_at: String,
}

/// `"<userId>_<projectId>"` -> presence.
pub type LikeMap = BTreeMap<String, bool>;

/// A project as seen by one viewer.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub is_liked: bool,
}

/// Directory entry: a public profile plus how many projects it authored.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperSummary {
    #[serde(flatten)]
    pub profile: SessionUser,
    pub projects: usize,
}

#[derive(Clone, Debug, Default)]
pub struct ProjectQuery {
    pub text: Option<String>,
    pub tag: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct DeveloperQuery {
    pub text: Option<String>,
    pub category: Option<String>,
}
