use tasker::auth::{Accounts, HashScheme};
use tasker::config::{AuthConfig, TasksConfig};
use tasker::error::Error;
use tasker::storage::Storage;
use tasker::task::{NewTask, Priority, TaskFilter, TaskPatch, TaskStatus, TaskStore};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    accounts: Accounts,
    tasks: TaskStore,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = Storage::with_defaults(dir.path().to_path_buf());
    let auth = AuthConfig {
        scheme: HashScheme::Pbkdf2Sha256,
        iterations: 1_000,
    };
    Fixture {
        accounts: Accounts::new(storage.clone(), auth),
        tasks: TaskStore::new(storage, TasksConfig::default()),
        _dir: dir,
    }
}

fn gym() -> NewTask {
    NewTask {
        name: "Gym".to_string(),
        time: "6AM".to_string(),
        priority: Priority::new(1).expect("priority"),
        due: "2026-02-20".to_string(),
    }
}

fn complete() -> TaskPatch {
    TaskPatch {
        status: Some(TaskStatus::Completed),
        ..TaskPatch::default()
    }
}

#[test]
fn register_user() {
    let fx = fixture();
    fx.accounts.register("user", "1234").expect("register");
    assert!(fx.accounts.users().expect("users").contains_key("user"));
}

#[test]
fn login_success_after_register() {
    let fx = fixture();
    fx.accounts.register("user", "1234").expect("register");
    assert_eq!(fx.accounts.current_user().expect("session").username(), "user");
}

#[test]
fn logout_then_current_user_fails() {
    let fx = fixture();
    fx.accounts.register("user", "1234").expect("register");
    fx.accounts.logout().expect("logout");
    let err = fx.accounts.current_user().expect_err("logged out");
    assert_eq!(err.kind(), "invalid_input");
}

#[test]
fn add_update_delete_cycle() {
    let fx = fixture();
    let session = fx.accounts.register("user", "1234").expect("register");

    fx.tasks.add(&session, gym()).expect("add");
    let listed = fx.tasks.list(&session, &TaskFilter::default()).expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].task.status, TaskStatus::Pending);

    fx.tasks.update(&session, 1, complete()).expect("update");
    let filter = TaskFilter {
        status: Some(TaskStatus::Completed),
        ..TaskFilter::default()
    };
    assert_eq!(fx.tasks.list(&session, &filter).expect("list").len(), 1);

    let removed = fx.tasks.delete(&session, 1).expect("delete");
    assert_eq!(removed.name, "Gym");
    assert_eq!(removed.status, TaskStatus::Completed);
    assert!(fx.tasks.load(&session).expect("load").is_empty());
}

#[test]
fn out_of_range_indices() {
    let fx = fixture();
    let session = fx.accounts.register("user", "1234").expect("register");

    assert!(matches!(
        fx.tasks.update(&session, 5, complete()),
        Err(Error::TaskNotFound(5))
    ));
    assert!(matches!(
        fx.tasks.delete(&session, 10),
        Err(Error::TaskNotFound(10))
    ));
}

#[test]
fn filter_no_match() {
    let fx = fixture();
    let session = fx.accounts.register("user", "1234").expect("register");
    fx.tasks.add(&session, gym()).expect("add");

    let filter = TaskFilter {
        status: Some(TaskStatus::Completed),
        ..TaskFilter::default()
    };
    let err = fx.tasks.list(&session, &filter).expect_err("no match");
    assert_eq!(err.kind(), "task_not_found");
}

#[test]
fn session_is_resolved_before_task_storage() {
    let fx = fixture();
    let err = fx.accounts.current_user().expect_err("no session");
    assert!(matches!(err, Error::NotLoggedIn));
}

#[test]
fn session_survives_new_store_instances() {
    let dir = tempfile::tempdir().expect("tempdir");
    let auth = AuthConfig {
        scheme: HashScheme::Sha256,
        iterations: 1,
    };

    let first = Accounts::new(Storage::with_defaults(dir.path().to_path_buf()), auth.clone());
    first.register("user", "1234").expect("register");

    let second = Accounts::new(Storage::with_defaults(dir.path().to_path_buf()), auth);
    let session = second.current_user().expect("session");
    assert_eq!(session.username(), "user");

    let users = second.users().expect("users");
    assert!(users["user"].salt.is_none());
    assert!(users["user"].iterations.is_none());
}

#[test]
fn distinct_users_never_share_a_task_file() {
    let fx = fixture();
    let ana = fx.accounts.register("ana", "pw-a").expect("register ana");
    fx.tasks.add(&ana, gym()).expect("add");

    for alias in [" ana", "ana ", "ana\n"] {
        assert!(matches!(
            fx.accounts.register(alias, "pw-x"),
            Err(Error::InvalidInput(_))
        ));
    }

    let bo = fx.accounts.register("bo", "pw-b").expect("register bo");
    assert_ne!(fx.tasks.task_file(&ana), fx.tasks.task_file(&bo));
    assert!(fx.tasks.load(&bo).expect("load").is_empty());

    let users = fx.accounts.users().expect("users");
    assert_eq!(users.keys().collect::<Vec<_>>(), vec!["ana", "bo"]);
}
