use std::path::PathBuf;

// === Region keys ===
pub const USERS_KEY: &str = "developerhub_users";
pub const PROJECTS_KEY: &str = "developerhub_projects";
pub const COMMENTS_KEY: &str = "developerhub_comments";
pub const CURRENT_USER_KEY: &str = "developerhub_current_user";
pub const LIKES_KEY: &str = "developerhub_likes";

pub const ALL_KEYS: [&str; 5] = [
    USERS_KEY,
    PROJECTS_KEY,
    COMMENTS_KEY,
    CURRENT_USER_KEY,
    LIKES_KEY,
];

pub const PLACEHOLDER_IMAGE: &str = "/api/placeholder/400/300";
pub const PLACEHOLDER_AVATAR: &str = "/api/placeholder/40/40";
pub const DEFAULT_DATA_FILE: &str = "developerhub.json";
pub const DEFAULT_FEATURED_LIMIT: usize = 6;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_file: PathBuf,
    pub seed_samples: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            seed_samples: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let data_file = std::env::var("DEVHUB_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_FILE));
        let seed_samples = match std::env::var("DEVHUB_SEED") {
            Ok(raw) => parse_flag(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "DEVHUB_SEED not recognized, seeding samples");
                true
            }),
            Err(_) => true,
        };

        Self {
            data_file,
            seed_samples,
        }
    }
}

/// Reads an on/off switch: `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`,
/// any case.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
