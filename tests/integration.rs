use devhub::models::models::{NewProject, NewUser, ProfileUpdate};
use devhub::{DevHub, FileStore, KeyValueStore, MemoryStore, StoreError};

fn user(email: &str, password: &str, name: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password: password.to_string(),
        name: name.to_string(),
        ..Default::default()
    }
}

fn temp_data_file() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("devhub-it-{}.json", uuid::Uuid::new_v4()))
}

fn full_flow<S: KeyValueStore>(hub: &DevHub<S>) {
    // 1. Register and log back in
    let alice = hub.users().register(user("a@x.com", "secret", "Alice")).unwrap();
    hub.users().logout().unwrap();
    assert!(hub.users().current_session().unwrap().is_none());

    let session = hub.users().login("a@x.com", "secret").unwrap();
    assert_eq!(session.id, alice.id);

    // 2. Create a project
    let project = hub
        .projects()
        .create(NewProject::authored_by(&session, "Demo", "A demo project"))
        .unwrap();
    assert_eq!(project.author_id, alice.id);
    assert_eq!(project.author.name, "Alice");
    assert_eq!(hub.projects().list_all().unwrap()[0].id, project.id);

    // 3. Like, then unlike
    let liked = hub.projects().toggle_like(&project.id, &alice.id).unwrap().unwrap();
    assert_eq!(liked.likes, 1);
    assert!(hub.projects().is_liked(&project.id, &alice.id).unwrap());

    let unliked = hub.projects().toggle_like(&project.id, &alice.id).unwrap().unwrap();
    assert_eq!(unliked.likes, 0);
    assert!(!hub.projects().is_liked(&project.id, &alice.id).unwrap());
    assert_eq!(
        hub.projects().get_by_id(&project.id).unwrap().unwrap().likes,
        0
    );

    // 4. Delete
    assert!(hub.projects().delete(&project.id).unwrap());
    assert!(hub.projects().get_by_id(&project.id).unwrap().is_none());
}

#[test]
fn test_full_flow_in_memory() {
    let hub = DevHub::open(MemoryStore::new()).unwrap();
    full_flow(&hub);
}

#[test]
fn test_full_flow_on_disk() {
    let path = temp_data_file();
    let hub = DevHub::open(FileStore::open(&path).unwrap()).unwrap();
    full_flow(&hub);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_duplicate_registration() {
    let hub = DevHub::open(MemoryStore::new()).unwrap();
    hub.users().register(user("dup@x.com", "one", "First")).unwrap();

    let err = hub
        .users()
        .register(user("dup@x.com", "two", "Second"))
        .unwrap_err();

    assert!(matches!(err, StoreError::DuplicateEmail));
    assert_eq!(hub.users().list_all().unwrap().len(), 1);
}

#[test]
fn test_wrong_password_keeps_session() {
    let hub = DevHub::open(MemoryStore::new()).unwrap();
    hub.users().register(user("a@x.com", "secret", "Alice")).unwrap();
    hub.users().logout().unwrap();

    let err = hub.users().login("a@x.com", "wrong").unwrap_err();
    assert!(matches!(err, StoreError::InvalidCredentials));
    assert!(hub.users().current_session().unwrap().is_none());
}

#[test]
fn test_created_project_matches_input() {
    let hub = DevHub::open(MemoryStore::new()).unwrap();
    let input = NewProject {
        title: "Compiler".to_string(),
        description: "Toy compiler".to_string(),
        image: "https://img.example/c.png".to_string(),
        author_id: "42".to_string(),
        tags: vec!["Rust".to_string(), "Rust".to_string()],
        github_url: Some("https://github.com/x/compiler".to_string()),
        ..Default::default()
    };

    let created = hub.projects().create(input.clone()).unwrap();
    let fetched = hub.projects().get_by_id(&created.id).unwrap().unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.title, input.title);
    assert_eq!(fetched.image, input.image);
    assert_eq!(fetched.tags, input.tags);
    assert_eq!(fetched.github_url, input.github_url);
    assert_eq!((fetched.likes, fetched.comments, fetched.views), (0, 0, 0));
    assert!(!fetched.created_at.is_empty());
}

#[test]
fn test_delete_missing_project() {
    let hub = DevHub::open(MemoryStore::new()).unwrap();
    let before = hub.projects().list_all().unwrap();

    assert!(!hub.projects().delete("does-not-exist").unwrap());
    assert_eq!(hub.projects().list_all().unwrap(), before);
}

#[test]
fn test_author_snapshot_is_not_refreshed() {
    let hub = DevHub::open(MemoryStore::new()).unwrap();
    let alice = hub.users().register(user("a@x.com", "secret", "Alice")).unwrap();
    let session = hub.users().current_session().unwrap().unwrap();
    let project = hub
        .projects()
        .create(NewProject::authored_by(&session, "Demo", "Demo"))
        .unwrap();

    hub.users()
        .update_profile(
            &alice.id,
            ProfileUpdate {
                name: Some("Alicia".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    let stored = hub.projects().get_by_id(&project.id).unwrap().unwrap();
    assert_eq!(stored.author.name, "Alice");
    assert_eq!(hub.users().current_session().unwrap().unwrap().name, "Alicia");
}

#[test]
fn test_directory_counts_projects() {
    let hub = DevHub::open(MemoryStore::new()).unwrap();
    hub.users().register(user("a@x.com", "pw", "Alice")).unwrap();
    let session = hub.users().current_session().unwrap().unwrap();
    hub.projects()
        .create(NewProject::authored_by(&session, "One", "One"))
        .unwrap();
    hub.projects()
        .create(NewProject::authored_by(&session, "Two", "Two"))
        .unwrap();
    hub.users().register(user("b@x.com", "pw", "Bob")).unwrap();

    let directory = hub.users().directory().unwrap();
    assert_eq!(directory.len(), 2);
    assert_eq!(directory[0].profile.name, "Alice");
    assert_eq!(directory[0].projects, 2);
    assert_eq!(directory[1].projects, 0);
}

#[test]
fn test_reset_restores_samples() {
    let hub = DevHub::open(MemoryStore::new()).unwrap();
    hub.users().register(user("a@x.com", "pw", "Alice")).unwrap();
    hub.projects().delete("sample-1").unwrap();

    hub.reset().unwrap();

    assert!(hub.users().list_all().unwrap().is_empty());
    assert!(hub.users().current_session().unwrap().is_none());
    assert_eq!(hub.projects().list_all().unwrap().len(), 3);
}

#[test]
fn test_data_survives_reopen() {
    let path = temp_data_file();
    let alice_id = {
        let hub = DevHub::open(FileStore::open(&path).unwrap()).unwrap();
        hub.users().register(user("a@x.com", "pw", "Alice")).unwrap().id
    };

    let hub = DevHub::open(FileStore::open(&path).unwrap()).unwrap();
    assert_eq!(hub.users().current_session().unwrap().unwrap().id, alice_id);
    assert_eq!(hub.projects().list_all().unwrap().len(), 3);
    let _ = std::fs::remove_file(&path);
}
