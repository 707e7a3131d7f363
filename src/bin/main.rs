#[cfg(not(target_arch = "wasm32"))]
mod native {
    extern crate devhub;

    use std::path::PathBuf;

    use anyhow::{bail, Context};
    use clap::{Parser, Subcommand};
    use serde::Serialize;

    use devhub::config::DEFAULT_FEATURED_LIMIT;
    use devhub::core::helpers::{is_valid_email, parse_tags};
    use devhub::models::models::{
        DeveloperQuery, NewProject, NewUser, ProfileUpdate, ProjectQuery, ProjectUpdate,
        SessionUser,
    };
    use devhub::{Config, DevHub, FileStore};

    #[derive(Parser)]
    #[command(name = "devhub")]
    #[command(about = "Developer profiles, projects and likes from the command line", long_about = None)]
    struct Cli {
        /// JSON file holding the whole namespace (defaults to DEVHUB_DATA_FILE)
        #[arg(long, value_name = "FILE", global = true)]
        data_file: Option<PathBuf>,

        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Subcommand)]
    enum Commands {
        #[command(about = "Create an account and start a session")]
        Register {
            #[arg(long)]
            email: String,
            #[arg(long)]
            password: String,
            #[arg(long)]
            name: String,
            #[arg(long, default_value = "")]
            title: String,
            #[arg(long, default_value = "")]
            bio: String,
            #[arg(long, default_value = "")]
            location: String,
            #[arg(long, default_value = "", help = "Comma-separated skills")]
            skills: String,
            #[arg(long, default_value = "")]
            avatar: String,
            #[arg(long)]
            github: Option<String>,
            #[arg(long)]
            linkedin: Option<String>,
            #[arg(long)]
            website: Option<String>,
        },

        #[command(about = "Start a session for an existing account")]
        Login {
            #[arg(long)]
            email: String,
            #[arg(long)]
            password: String,
        },

        #[command(about = "End the current session")]
        Logout,

        #[command(about = "Show the current session")]
        Whoami,

        #[command(about = "Edit the profile of the session user")]
        Profile {
            #[arg(long)]
            name: Option<String>,
            #[arg(long)]
            title: Option<String>,
            #[arg(long)]
            bio: Option<String>,
            #[arg(long)]
            location: Option<String>,
            #[arg(long, help = "Comma-separated skills, replaces the list")]
            skills: Option<String>,
            #[arg(long)]
            avatar: Option<String>,
            #[arg(long)]
            github: Option<String>,
            #[arg(long)]
            linkedin: Option<String>,
            #[arg(long)]
            website: Option<String>,
        },

        #[command(about = "List developers")]
        Users {
            #[arg(short, long)]
            search: Option<String>,
            /// Skill category, e.g. Frontend, Backend, Mobile, DevOps
            #[arg(short, long)]
            category: Option<String>,
        },

        #[command(about = "Show one developer and their projects")]
        User { id: String },

        #[command(about = "List projects, newest first")]
        Projects {
            #[arg(short, long)]
            search: Option<String>,
            #[arg(short, long)]
            tag: Option<String>,
            #[arg(short, long)]
            author: Option<String>,
        },

        #[command(about = "Most liked projects")]
        Featured {
            #[arg(short, long, default_value_t = DEFAULT_FEATURED_LIMIT)]
            limit: usize,
        },

        #[command(about = "Show a project and count the view")]
        Show { id: String },

        #[command(about = "Add a project owned by the session user")]
        Add {
            #[arg(long)]
            title: String,
            #[arg(long)]
            description: String,
            #[arg(long, default_value = "")]
            image: String,
            #[arg(long, default_value = "", help = "Comma-separated tags")]
            tags: String,
            #[arg(long)]
            github: Option<String>,
            #[arg(long)]
            live: Option<String>,
        },

        #[command(about = "Edit one of your projects")]
        Edit {
            id: String,
            #[arg(long)]
            title: Option<String>,
            #[arg(long)]
            description: Option<String>,
            #[arg(long)]
            image: Option<String>,
            #[arg(long, help = "Comma-separated tags, replaces the list")]
            tags: Option<String>,
            #[arg(long)]
            github: Option<String>,
            #[arg(long)]
            live: Option<String>,
        },

        #[command(about = "Delete one of your projects")]
        Delete { id: String },

        #[command(about = "Like or unlike a project")]
        Like { id: String },

        #[command(about = "Clear all data and restore the sample projects")]
        Reset,
    }

    fn init_tracing() {
        let env_filter =
            std::env::var("RUST_LOG").unwrap_or_else(|_| "devhub=info".to_string());
        let json_logs = std::env::var("LOG_FORMAT")
            .map(|v| v == "json")
            .unwrap_or(false);

        if json_logs {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .json()
                .init();
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    fn optional_text(value: String) -> Option<String> {
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    fn require_session(hub: &DevHub<FileStore>) -> anyhow::Result<SessionUser> {
        hub.users()
            .current_session()?
            .context("Please log in first")
    }

    fn require_owner(hub: &DevHub<FileStore>, project_id: &str) -> anyhow::Result<SessionUser> {
        let session = require_session(hub)?;
        let project = hub
            .projects()
            .get_by_id(project_id)?
            .context("Project not found")?;
        if project.author_id != session.id {
            bail!("You can only change your own projects");
        }
        Ok(session)
    }

    fn dispatch(hub: &DevHub<FileStore>, command: Commands) -> anyhow::Result<()> {
        match command {
            Commands::Register {
                email,
                password,
                name,
                title,
                bio,
                location,
                skills,
                avatar,
                github,
                linkedin,
                website,
            } => {
                if !is_valid_email(&email) {
                    bail!("Invalid email address");
                }
                if password.is_empty() {
                    bail!("Password is required");
                }
                if name.trim().is_empty() {
                    bail!("Name is required");
                }
                let user = hub.users().register(NewUser {
                    email,
                    password,
                    name,
                    title,
                    bio,
                    location,
                    skills: parse_tags(&skills),
                    avatar,
                    github_url: github.and_then(optional_text),
                    linkedin_url: linkedin.and_then(optional_text),
                    website_url: website.and_then(optional_text),
                })?;
                eprintln!("Welcome to DeveloperHUB!");
                print_json(&SessionUser::from(&user))
            }
            Commands::Login { email, password } => {
                let session = hub.users().login(&email, &password)?;
                eprintln!("Welcome back!");
                print_json(&session)
            }
            Commands::Logout => {
                hub.users().logout()?;
                eprintln!("Logged out successfully");
                Ok(())
            }
            Commands::Whoami => match hub.users().current_session()? {
                Some(session) => print_json(&session),
                None => {
                    eprintln!("Not logged in");
                    Ok(())
                }
            },
            Commands::Profile {
                name,
                title,
                bio,
                location,
                skills,
                avatar,
                github,
                linkedin,
                website,
            } => {
                let session = require_session(hub)?;
                let user = hub.users().update_profile(
                    &session.id,
                    ProfileUpdate {
                        name,
                        title,
                        bio,
                        location,
                        skills: skills.as_deref().map(parse_tags),
                        avatar,
                        password: None,
                        github_url: github,
                        linkedin_url: linkedin,
                        website_url: website,
                    },
                )?;
                eprintln!("Profile updated successfully");
                print_json(&SessionUser::from(&user))
            }
            Commands::Users { search, category } => {
                let developers = hub.users().search(&DeveloperQuery {
                    text: search,
                    category,
                })?;
                print_json(&developers)
            }
            Commands::User { id } => {
                let user = hub.users().get(&id)?.context("Developer not found")?;
                let projects = hub.projects().get_by_author(&id)?;
                print_json(&serde_json::json!({
                    "developer": SessionUser::from(&user),
                    "projects": projects,
                }))
            }
            Commands::Projects {
                search,
                tag,
                author,
            } => {
                let viewer = hub.users().current_session()?.map(|s| s.id);
                let projects = hub.projects();
                let matches = match author {
                    Some(author_id) => projects.get_by_author(&author_id)?,
                    None => projects.search(&ProjectQuery { text: search, tag })?,
                };
                let views = projects.annotate(matches, viewer.as_deref())?;
                print_json(&views)
            }
            Commands::Featured { limit } => print_json(&hub.projects().featured(limit)?),
            Commands::Show { id } => {
                let projects = hub.projects();
                if projects.increment_views(&id)?.is_none() {
                    bail!("Project not found");
                }
                let project = projects.get_by_id(&id)?.context("Project not found")?;
                print_json(&project)
            }
            Commands::Add {
                title,
                description,
                image,
                tags,
                github,
                live,
            } => {
                let session = require_session(hub)?;
                if title.trim().is_empty() || description.trim().is_empty() {
                    bail!("Title and description are required");
                }
                let mut new_project =
                    NewProject::authored_by(&session, title.trim(), description.trim());
                new_project.image = image.trim().to_string();
                new_project.tags = parse_tags(&tags);
                new_project.github_url = github.and_then(optional_text);
                new_project.live_url = live.and_then(optional_text);

                let project = hub.projects().create(new_project)?;
                eprintln!("Project added successfully!");
                print_json(&project)
            }
            Commands::Edit {
                id,
                title,
                description,
                image,
                tags,
                github,
                live,
            } => {
                require_owner(hub, &id)?;
                let project = hub
                    .projects()
                    .update(
                        &id,
                        ProjectUpdate {
                            title: title.map(|t| t.trim().to_string()),
                            description: description.map(|d| d.trim().to_string()),
                            image,
                            tags: tags.as_deref().map(parse_tags),
                            github_url: github,
                            live_url: live,
                        },
                    )?
                    .context("Project not found")?;
                eprintln!("Project updated successfully!");
                print_json(&project)
            }
            Commands::Delete { id } => {
                require_owner(hub, &id)?;
                if !hub.projects().delete(&id)? {
                    bail!("Project not found");
                }
                eprintln!("Project deleted");
                Ok(())
            }
            Commands::Like { id } => {
                let session = require_session(hub)?;
                let outcome = hub
                    .projects()
                    .toggle_like(&id, &session.id)?
                    .context("Project not found")?;
                print_json(&serde_json::json!({
                    "projectId": id,
                    "isLiked": outcome.liked,
                    "likes": outcome.likes,
                }))
            }
            Commands::Reset => {
                hub.reset()?;
                eprintln!("All data cleared");
                Ok(())
            }
        }
    }

    pub fn run() -> anyhow::Result<()> {
        init_tracing();
        let cli = Cli::parse();

        let mut config = Config::from_env();
        if let Some(path) = cli.data_file {
            config.data_file = path;
        }

        let store = FileStore::open(&config.data_file)?;
        let hub = DevHub::open_with(store, config.seed_samples)?;
        dispatch(&hub, cli.command)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
