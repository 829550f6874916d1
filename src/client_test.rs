use super::*;
use std::sync::Mutex;

use crate::error::ErrorKind;

// =============================================================================
// MOCK SERVICE
// =============================================================================

#[derive(Default)]
struct MockState {
    tasks: Vec<Task>,
    next_id: i64,
    failing: Vec<&'static str>,
    calls: Vec<String>,
    /// When set, `update` answers with this task instead of the requested one.
    update_answer: Option<TaskId>,
}

#[derive(Default)]
struct MockApi {
    state: Mutex<MockState>,
}

impl MockApi {
    fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.len() as i64 + 1;
        Self { state: Mutex::new(MockState { tasks, next_id, ..MockState::default() }) }
    }

    fn fail(&self, op: &'static str) {
        self.state.lock().expect("mock mutex should lock").failing.push(op);
    }

    fn heal(&self) {
        self.state.lock().expect("mock mutex should lock").failing.clear();
    }

    fn calls(&self) -> Vec<String> {
        self.state.lock().expect("mock mutex should lock").calls.clone()
    }

    fn server_tasks(&self) -> Vec<Task> {
        self.state.lock().expect("mock mutex should lock").tasks.clone()
    }

    fn begin(&self, call: String, op: &'static str) -> Result<std::sync::MutexGuard<'_, MockState>, ClientError> {
        let mut state = self.state.lock().expect("mock mutex should lock");
        state.calls.push(call);
        if state.failing.contains(&op) {
            return Err(ClientError::Status { status: 500, body: "boom".into() });
        }
        Ok(state)
    }
}

#[async_trait::async_trait]
impl TaskApi for MockApi {
    async fn list(&self) -> Result<Vec<Task>, ClientError> {
        let state = self.begin("list".into(), "list")?;
        Ok(state.tasks.clone())
    }

    async fn create(&self, task: &NewTask) -> Result<Task, ClientError> {
        let mut state = self.begin(format!("create {}", task.title), "create")?;
        if state.next_id == 0 {
            state.next_id = 1;
        }
        let record = Task { id: TaskId::Int(state.next_id), title: task.title.clone(), completed: task.completed };
        state.next_id += 1;
        state.tasks.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, ClientError> {
        let mut state = self.begin(format!("update {id}"), "update")?;
        let target = state.update_answer.clone().unwrap_or_else(|| id.clone());
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == target)
            .ok_or(ClientError::Status { status: 404, body: String::new() })?;
        if let Some(title) = &patch.title {
            task.title.clone_from(title);
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        Ok(task.clone())
    }

    async fn delete(&self, id: &TaskId) -> Result<(), ClientError> {
        let mut state = self.begin(format!("delete {id}"), "delete")?;
        state.tasks.retain(|t| &t.id != id);
        Ok(())
    }
}

fn task(id: i64, title: &str, completed: bool) -> Task {
    Task { id: TaskId::Int(id), title: title.into(), completed }
}

async fn loaded(tasks: Vec<Task>) -> TaskListClient<MockApi> {
    let mut client = TaskListClient::new(MockApi::with_tasks(tasks));
    client.load_all().await.unwrap();
    client
}

// =============================================================================
// LOAD
// =============================================================================

#[tokio::test]
async fn new_client_is_idle_and_empty() {
    let client = TaskListClient::new(MockApi::default());
    assert_eq!(client.load_state(), LoadState::Idle);
    assert!(client.tasks().is_empty());
    assert_eq!(client.filter(), Filter::All);
    assert!(client.api().calls().is_empty());
}

#[tokio::test]
async fn load_empty_collection_settles_loaded() {
    let client = loaded(Vec::new()).await;
    assert!(client.tasks().is_empty());
    assert!(!client.is_loading());
    assert_eq!(client.load_state(), LoadState::Loaded);
}

#[tokio::test]
async fn load_preserves_server_order() {
    let client = loaded(vec![task(3, "c", false), task(1, "a", true), task(2, "b", false)]).await;
    let ids: Vec<_> = client.tasks().iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids, [TaskId::Int(3), TaskId::Int(1), TaskId::Int(2)]);
}

#[tokio::test]
async fn failed_load_keeps_previous_cache() {
    let mut client = loaded(vec![task(1, "a", false)]).await;
    client.api().fail("list");

    let err = client.load_all().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Status);
    assert_eq!(client.load_state(), LoadState::Failed);
    assert_eq!(client.tasks(), [task(1, "a", false)]);
}

// =============================================================================
// CREATE
// =============================================================================

#[tokio::test]
async fn blank_draft_never_reaches_service() {
    let mut client = loaded(vec![task(1, "a", false)]).await;

    for blank in ["", "   ", "\t\n"] {
        client.set_draft(blank);
        let err = client.create().await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(ValidationError::EmptyTitle)));
        assert_eq!(client.draft(), blank);
    }
    assert!(client.create_task("  ").await.is_err());

    assert_eq!(client.api().calls(), ["list"]);
    assert_eq!(client.tasks().len(), 1);
}

#[tokio::test]
async fn create_appends_service_record_and_clears_draft() {
    let mut client = loaded(vec![task(1, "a", false)]).await;
    client.set_draft("  Buy milk  ");

    let created = client.create().await.unwrap().clone();
    assert_eq!(created.id, TaskId::Int(2));
    assert_eq!(created.title, "Buy milk");
    assert!(!created.completed);

    assert_eq!(client.tasks().len(), 2);
    assert_eq!(client.tasks()[1].id, client.api().server_tasks()[1].id);
    assert_eq!(client.draft(), "");
}

#[tokio::test]
async fn failed_create_keeps_draft_and_cache() {
    let mut client = loaded(Vec::new()).await;
    client.api().fail("create");
    client.set_draft("Call mom");

    assert!(client.create().await.is_err());
    assert_eq!(client.draft(), "Call mom");
    assert!(client.tasks().is_empty());
}

#[tokio::test]
async fn create_task_skips_draft() {
    let mut client = loaded(Vec::new()).await;
    client.set_draft("untouched");
    client.create_task("Water plants").await.unwrap();
    assert_eq!(client.draft(), "untouched");
    assert_eq!(client.tasks()[0].title, "Water plants");
}

// =============================================================================
// TOGGLE
// =============================================================================

#[tokio::test]
async fn toggle_twice_restores_flag() {
    let mut client = loaded(vec![task(1, "a", false)]).await;
    let id = TaskId::Int(1);

    assert!(client.toggle(&id).await.unwrap().completed);
    assert!(!client.toggle(&id).await.unwrap().completed);
    assert!(!client.task(&id).unwrap().completed);
    assert_eq!(client.api().calls(), ["list", "update 1", "update 1"]);
}

#[tokio::test]
async fn failed_toggle_does_not_flip_locally() {
    let mut client = loaded(vec![task(1, "a", false)]).await;
    client.api().fail("update");

    assert!(client.toggle(&TaskId::Int(1)).await.is_err());
    assert!(!client.task(&TaskId::Int(1)).unwrap().completed);
}

#[tokio::test]
async fn update_answering_for_another_task_leaves_cache_alone() {
    let mut client = loaded(vec![task(1, "a", false), task(2, "b", false)]).await;
    client.api().state.lock().expect("mock mutex should lock").update_answer = Some(TaskId::Int(2));

    let err = client.toggle(&TaskId::Int(1)).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
    assert_eq!(client.tasks(), [task(1, "a", false), task(2, "b", false)]);

    client.begin_edit(&TaskId::Int(1)).unwrap();
    client.set_edit_title("renamed");
    assert!(client.commit_edit().await.is_err());
    assert_eq!(client.tasks()[0].title, "a");
    assert!(client.editing().is_some());
}

#[tokio::test]
async fn typed_id_reaches_string_keyed_task() {
    let mut client = loaded(vec![Task { id: TaskId::Str("5".into()), title: "s".into(), completed: false }]).await;

    let typed: TaskId = "5".parse().unwrap();
    assert_eq!(typed, TaskId::Int(5));
    let id = client.resolve_id(&typed.to_string()).unwrap();
    assert_eq!(id, TaskId::Str("5".into()));

    assert!(client.toggle(&id).await.unwrap().completed);
    assert_eq!(client.api().calls(), ["list", "update 5"]);
}

#[tokio::test]
async fn resolve_id_matches_numeric_ids_and_reports_misses() {
    let client = loaded(vec![task(12, "n", false)]).await;
    assert_eq!(client.resolve_id("12").unwrap(), TaskId::Int(12));
    assert_eq!(client.find_by_display("12").unwrap().title, "n");
    assert!(matches!(client.resolve_id("13"), Err(ClientError::NotFound(TaskId::Int(13)))));
    assert!(client.find_by_display("abc").is_none());
}

#[tokio::test]
async fn toggle_unknown_id_sends_nothing() {
    let mut client = loaded(vec![task(1, "a", false)]).await;
    let err = client.toggle(&TaskId::Int(99)).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(TaskId::Int(99))));
    assert_eq!(client.api().calls(), ["list"]);
}

// =============================================================================
// EDIT
// =============================================================================

#[tokio::test]
async fn edit_session_commits_and_closes() {
    let mut client = loaded(vec![task(1, "old", true)]).await;
    let id = TaskId::Int(1);

    client.begin_edit(&id).unwrap();
    assert_eq!(client.editing().unwrap().title, "old");
    client.set_edit_title(" new ");

    let updated = client.commit_edit().await.unwrap().clone();
    assert_eq!(updated, task(1, "new", true));
    assert!(client.editing().is_none());
    assert_eq!(client.api().server_tasks()[0].title, "new");
}

#[tokio::test]
async fn blank_edit_keeps_session_open() {
    let mut client = loaded(vec![task(1, "old", false)]).await;
    client.begin_edit(&TaskId::Int(1)).unwrap();
    client.set_edit_title("   ");

    let err = client.commit_edit().await.unwrap_err();
    assert!(err.is_user_facing());
    assert!(client.editing().is_some());
    assert_eq!(client.tasks()[0].title, "old");
    assert_eq!(client.api().calls(), ["list"]);
}

#[tokio::test]
async fn failed_edit_keeps_session_and_title() {
    let mut client = loaded(vec![task(1, "old", false)]).await;
    client.begin_edit(&TaskId::Int(1)).unwrap();
    client.set_edit_title("new");
    client.api().fail("update");

    assert!(client.commit_edit().await.is_err());
    assert_eq!(client.editing().unwrap().title, "new");
    assert_eq!(client.tasks()[0].title, "old");

    client.api().heal();
    client.commit_edit().await.unwrap();
    assert_eq!(client.tasks()[0].title, "new");
}

#[tokio::test]
async fn commit_without_session_is_rejected() {
    let mut client = loaded(vec![task(1, "a", false)]).await;
    let err = client.commit_edit().await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(ValidationError::NotEditing)));
}

#[tokio::test]
async fn cancel_edit_discards_session() {
    let mut client = loaded(vec![task(1, "a", false)]).await;
    client.begin_edit(&TaskId::Int(1)).unwrap();
    client.cancel_edit();
    assert!(client.editing().is_none());
    assert!(client.begin_edit(&TaskId::Int(5)).is_err());
}

#[tokio::test]
async fn edit_title_updates_directly() {
    let mut client = loaded(vec![task(1, "a", false), task(2, "b", false)]).await;
    client.edit_title(&TaskId::Int(2), "bee").await.unwrap();
    assert_eq!(client.tasks()[1].title, "bee");
    assert!(client.edit_title(&TaskId::Int(2), "").await.is_err());
}

// =============================================================================
// DELETE
// =============================================================================

#[tokio::test]
async fn delete_removes_after_confirmation() {
    let mut client = loaded(vec![task(1, "a", false), task(2, "b", false)]).await;
    let removed = client.delete(&TaskId::Int(1)).await.unwrap();
    assert_eq!(removed.title, "a");
    assert_eq!(client.tasks(), [task(2, "b", false)]);
    assert_eq!(client.api().server_tasks().len(), 1);
}

#[tokio::test]
async fn failed_delete_leaves_task_visible() {
    let mut client = loaded(vec![task(1, "a", false)]).await;
    client.api().fail("delete");

    assert!(client.delete(&TaskId::Int(1)).await.is_err());
    assert_eq!(client.tasks().len(), 1);
    assert_eq!(client.visible().len(), 1);
}

#[tokio::test]
async fn delete_closes_matching_edit_session() {
    let mut client = loaded(vec![task(1, "a", false), task(2, "b", false)]).await;
    client.begin_edit(&TaskId::Int(1)).unwrap();
    client.delete(&TaskId::Int(2)).await.unwrap();
    assert!(client.editing().is_some());
    client.delete(&TaskId::Int(1)).await.unwrap();
    assert!(client.editing().is_none());
}

#[tokio::test]
async fn reload_drops_edit_for_vanished_task() {
    let mut client = loaded(vec![task(1, "a", false)]).await;
    client.begin_edit(&TaskId::Int(1)).unwrap();
    client.api().state.lock().expect("mock mutex should lock").tasks.clear();

    client.load_all().await.unwrap();
    assert!(client.editing().is_none());
}

// =============================================================================
// FILTER VIEW
// =============================================================================

#[tokio::test]
async fn filter_view_after_toggle() {
    let mut client = loaded(Vec::new()).await;
    let a = client.create_task("A").await.unwrap().id.clone();
    client.create_task("B").await.unwrap();
    client.toggle(&a).await.unwrap();

    client.set_filter(Filter::Completed);
    let titles: Vec<_> = client.visible().iter().map(|t| t.title.clone()).collect();
    assert_eq!(titles, ["A"]);

    client.set_filter(Filter::Pending);
    let titles: Vec<_> = client.visible().iter().map(|t| t.title.clone()).collect();
    assert_eq!(titles, ["B"]);

    client.set_filter(Filter::All);
    let titles: Vec<_> = client.visible().iter().map(|t| t.title.clone()).collect();
    assert_eq!(titles, ["A", "B"]);
    assert_eq!(client.tasks().len(), 2);

    assert_eq!(client.counts(), TaskCounts { total: 2, completed: 1, pending: 1 });
}
