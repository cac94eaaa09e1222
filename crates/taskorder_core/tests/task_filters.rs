use rusqlite::Connection;
use taskorder_core::db::open_db_in_memory;
use taskorder_core::{
    SqliteTaskRepository, SqliteUserRepository, Task, TaskFilter, TaskRepository, TaskStatus,
    User, UserRepository,
};
use uuid::Uuid;

const DAY_MS: i64 = 86_400_000;
const HOUR_MS: i64 = 3_600_000;

fn seed_user(conn: &Connection, name: &str) -> User {
    let repo = SqliteUserRepository::try_new(conn).unwrap();
    let user = User::new(name);
    repo.add_user(&user).unwrap();
    user
}

fn seed_task(conn: &Connection, title: &str, due_at: i64, status: TaskStatus, owner: &User) {
    let repo = SqliteTaskRepository::try_new(conn).unwrap();
    repo.create_task(
        &Task::new(title, format!("body of {title}"), due_at)
            .with_owner(owner.user_id)
            .with_status(status),
    )
    .unwrap();
}

#[test]
fn empty_filter_returns_every_enriched_task() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    seed_task(&conn, "A", 20_000 * DAY_MS, TaskStatus::Pending, &alice);
    seed_task(&conn, "B", 20_001 * DAY_MS, TaskStatus::Completed, &alice);
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let result = repo
        .filter_tasks_with_user_names(&TaskFilter::default())
        .unwrap();
    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|task| task.user_name == "alice"));
}

#[test]
fn owner_filter_restricts_to_that_owner() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    let bob = seed_user(&conn, "bob");
    seed_task(&conn, "A", 20_000 * DAY_MS, TaskStatus::Pending, &alice);
    seed_task(&conn, "B", 20_000 * DAY_MS, TaskStatus::Pending, &bob);
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let result = repo
        .filter_tasks_with_user_names(&TaskFilter {
            owner: Some(bob.user_id),
            ..TaskFilter::default()
        })
        .unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].title, "B");
    assert_eq!(result[0].user_name, "bob");
}

#[test]
fn title_substring_filter_is_case_sensitive() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    seed_task(&conn, "Weekly Report", 20_000 * DAY_MS, TaskStatus::Pending, &alice);
    seed_task(&conn, "weekly report", 20_000 * DAY_MS, TaskStatus::Pending, &alice);
    seed_task(&conn, "Standup", 20_000 * DAY_MS, TaskStatus::Pending, &alice);
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let result = repo
        .filter_tasks_with_user_names(&TaskFilter {
            title_contains: Some("Rep".to_string()),
            ..TaskFilter::default()
        })
        .unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].title, "Weekly Report");
}

#[test]
fn due_before_filter_compares_full_timestamps() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    let ceiling = 20_000 * DAY_MS + 12 * HOUR_MS;
    seed_task(&conn, "AtCeiling", ceiling, TaskStatus::Pending, &alice);
    seed_task(&conn, "JustAfter", ceiling + 1, TaskStatus::Pending, &alice);
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let result = repo
        .filter_tasks_with_user_names(&TaskFilter {
            due_before: Some(ceiling),
            ..TaskFilter::default()
        })
        .unwrap();
    // Same calendar day, later timestamp: excluded. This is the
    // full-timestamp semantic, unlike list_tasks_by_due_date.
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].title, "AtCeiling");
}

#[test]
fn status_filter_matches_exactly() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    seed_task(&conn, "A", 20_000 * DAY_MS, TaskStatus::Pending, &alice);
    seed_task(&conn, "B", 20_000 * DAY_MS, TaskStatus::InProgress, &alice);
    seed_task(&conn, "C", 20_000 * DAY_MS, TaskStatus::Completed, &alice);
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let result = repo
        .filter_tasks_with_user_names(&TaskFilter {
            status: Some(TaskStatus::InProgress),
            ..TaskFilter::default()
        })
        .unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].title, "B");
}

#[test]
fn combined_criteria_are_conjunctive() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    let bob = seed_user(&conn, "bob");
    seed_task(&conn, "Report A", 20_000 * DAY_MS, TaskStatus::Pending, &alice);
    seed_task(&conn, "Report B", 20_000 * DAY_MS, TaskStatus::Pending, &bob);
    seed_task(&conn, "Report C", 20_010 * DAY_MS, TaskStatus::Pending, &alice);
    seed_task(&conn, "Cleanup", 20_000 * DAY_MS, TaskStatus::Pending, &alice);
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let result = repo
        .filter_tasks_with_user_names(&TaskFilter {
            owner: Some(alice.user_id),
            title_contains: Some("Report".to_string()),
            due_before: Some(20_005 * DAY_MS),
            status: Some(TaskStatus::Pending),
        })
        .unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].title, "Report A");
}

#[test]
fn tasks_with_unresolvable_owner_are_excluded_from_enriched_views() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    seed_task(&conn, "Owned", 20_000 * DAY_MS, TaskStatus::Pending, &alice);
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    // Owner id that matches no user row.
    repo.create_task(&Task::new("Orphan", "no such owner", 20_000 * DAY_MS).with_owner(Uuid::new_v4()))
        .unwrap();
    // Never-assigned owner.
    repo.create_task(&Task::new("Unassigned", "no owner yet", 20_000 * DAY_MS))
        .unwrap();

    let all = repo.list_all_with_user_names().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "Owned");

    // The orphan matches every supplied filter and is still dropped.
    let filtered = repo
        .filter_tasks_with_user_names(&TaskFilter {
            title_contains: Some("Orphan".to_string()),
            ..TaskFilter::default()
        })
        .unwrap();
    assert!(filtered.is_empty());

    // The plain (unenriched) listing still sees all three rows.
    assert_eq!(repo.list_all_tasks().unwrap().len(), 3);
}

#[test]
fn due_date_ceiling_truncates_time_of_day_on_both_sides() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    // Due late on day 20000 and early on day 20001.
    seed_task(
        &conn,
        "SameDayLate",
        20_000 * DAY_MS + 23 * HOUR_MS,
        TaskStatus::Pending,
        &alice,
    );
    seed_task(
        &conn,
        "NextDayEarly",
        20_001 * DAY_MS + 10,
        TaskStatus::Pending,
        &alice,
    );
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    // Ceiling shortly after midnight of day 20000: the late task on the same
    // calendar day is included, the next calendar day is not.
    let result = repo
        .list_tasks_by_due_date(20_000 * DAY_MS + 30 * 60 * 1000)
        .unwrap();
    let titles: Vec<&str> = result.iter().map(|task| task.title.as_str()).collect();
    assert_eq!(titles, vec!["SameDayLate"]);

    let next_day = repo.list_tasks_by_due_date(20_001 * DAY_MS).unwrap();
    assert_eq!(next_day.len(), 2);
}

#[test]
fn list_by_status_and_owner_return_plain_tasks() {
    let conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    let bob = seed_user(&conn, "bob");
    seed_task(&conn, "A", 20_000 * DAY_MS, TaskStatus::Completed, &alice);
    seed_task(&conn, "B", 20_000 * DAY_MS, TaskStatus::Pending, &bob);
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let completed = repo.list_tasks_by_status(TaskStatus::Completed).unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].title, "A");

    let bobs = repo.list_tasks_by_owner(bob.user_id).unwrap();
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0].title, "B");
}
