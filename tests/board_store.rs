//! Board store against the real backend, in process

use async_trait::async_trait;
use board_dnd::{validate, ContainerId, DropEvent, EntityId, OrderError};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use taskboard_lib::commands::dispatch;
use taskboard_lib::config::ServerConfig;
use taskboard_lib::AppState;
use taskboard_ui::models::{Project, ProjectBoard};
use taskboard_ui::{Backend, BoardStore, ClientConfig};

const USER: u32 = 1;

struct TestBackend {
    state: AppState,
    /// Command that always fails, simulating a lost write
    failing: Option<&'static str>,
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl Backend for TestBackend {
    async fn invoke(&self, cmd: &str, args: Value) -> Result<Value, String> {
        self.calls.lock().unwrap().push(cmd.to_string());
        if self.failing == Some(cmd) {
            return Err("connection reset".to_string());
        }
        dispatch(&self.state, cmd, args).await
    }
}

impl TestBackend {
    fn count(&self, cmd: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == cmd).count()
    }

    async fn board(&self, project_id: EntityId) -> ProjectBoard {
        let value = dispatch(
            &self.state,
            "get_project",
            json!({"projectId": project_id, "userId": USER}),
        )
        .await
        .unwrap();
        serde_json::from_value(value).unwrap()
    }

    async fn favourites(&self) -> Vec<Project> {
        let value = dispatch(&self.state, "list_favourites", json!({"userId": USER}))
            .await
            .unwrap();
        serde_json::from_value(value).unwrap()
    }
}

async fn setup(failing: Option<&'static str>) -> (Arc<TestBackend>, BoardStore) {
    let state = AppState::open(&ServerConfig::in_memory()).await.unwrap();
    let backend = Arc::new(TestBackend {
        state,
        failing,
        calls: Mutex::new(Vec::new()),
    });
    let store = BoardStore::new(backend.clone(), USER, &ClientConfig::default());
    (backend, store)
}

/// Opens a new project holding one section per entry of `tasks_per_section`
async fn open_board(store: &mut BoardStore, tasks_per_section: &[usize]) -> EntityId {
    let project = store.create_project().await.unwrap();
    store.open_project(project.id).await.unwrap();
    for &count in tasks_per_section {
        let section = store.create_section().await.unwrap();
        for _ in 0..count {
            store.create_task(section.id).await.unwrap();
        }
    }
    project.id
}

fn task_layout(board: &ProjectBoard) -> Vec<Vec<(EntityId, u32)>> {
    board
        .sections
        .iter()
        .map(|s| s.tasks.iter().map(|t| (t.id, t.position)).collect())
        .collect()
}

#[tokio::test]
async fn reorder_first_to_last() {
    let (backend, mut store) = setup(None).await;
    let project_id = open_board(&mut store, &[3]).await;
    let board = store.board().unwrap();
    let section = board.sections[0].container();
    let before: Vec<_> = board.sections[0].tasks.iter().map(|t| t.id).collect();

    store.handle_event(DropEvent::within(section, 0, 2)).unwrap();

    let layout = task_layout(store.board().unwrap());
    assert_eq!(
        layout[0],
        vec![(before[1], 2), (before[2], 1), (before[0], 0)]
    );

    store.settle().await;
    assert_eq!(task_layout(&backend.board(project_id).await), layout);
    assert_eq!(store.failed_writes(), 0);
}

#[tokio::test]
async fn move_task_to_another_section() {
    let (backend, mut store) = setup(None).await;
    let project_id = open_board(&mut store, &[2, 1]).await;
    let board = store.board().unwrap();
    let (s1, s2) = (board.sections[0].clone(), board.sections[1].clone());
    let (t1, t2, t3) = (s1.tasks[0].id, s1.tasks[1].id, s2.tasks[0].id);

    store
        .handle_event(DropEvent::new(s1.container(), 0, s2.container(), 0))
        .unwrap();

    let board = store.board().unwrap();
    assert_eq!(task_layout(board), vec![vec![(t2, 0)], vec![(t1, 1), (t3, 0)]]);
    assert_eq!(board.sections[1].tasks[0].section_id, s2.id);

    store.settle().await;
    let stored = backend.board(project_id).await;
    assert_eq!(task_layout(&stored), task_layout(store.board().unwrap()));
    assert_eq!(stored.sections[1].tasks[0].section_id, s2.id);
}

#[tokio::test]
async fn rejected_events_change_nothing() {
    let (backend, mut store) = setup(None).await;
    open_board(&mut store, &[2]).await;
    let section = store.board().unwrap().sections[0].container();
    let before = store.state().clone();

    assert_eq!(
        store.handle_event(DropEvent::within(ContainerId::Section(999), 0, 1)),
        Err(OrderError::UnknownContainer(ContainerId::Section(999)))
    );
    assert_eq!(
        store.handle_event(DropEvent::within(section, 0, 5)),
        Err(OrderError::IndexOutOfRange { index: 5, len: 2 })
    );
    assert!(matches!(
        store.handle_event(DropEvent::new(
            ContainerId::OwnedProjects(USER),
            0,
            ContainerId::Favourites(USER),
            0
        )),
        Err(OrderError::IncompatibleContainers { .. })
    ));

    store.settle().await;
    assert_eq!(store.state(), &before);
    assert_eq!(backend.count("update_positions"), 0);
}

#[tokio::test]
async fn favourite_toggle_appends_and_closes_gap() {
    let (backend, mut store) = setup(None).await;
    let a = store.create_project().await.unwrap();
    let b = store.create_project().await.unwrap();
    let c = store.create_project().await.unwrap();
    store.toggle_favourite(a.id, true).unwrap();
    store.toggle_favourite(b.id, true).unwrap();

    store.toggle_favourite(c.id, true).unwrap();
    let favourites = &store.state().favourites;
    assert_eq!(favourites[0].id, c.id);
    assert_eq!(favourites[0].favourite_position, 2);

    store.toggle_favourite(c.id, false).unwrap();
    let positions: Vec<_> = store
        .state()
        .favourites
        .iter()
        .map(|p| (p.id, p.favourite_position))
        .collect();
    assert_eq!(positions, vec![(b.id, 1), (a.id, 0)]);
    assert!(!store.state().projects.iter().any(|p| p.id == c.id && p.favourite));

    store.settle().await;
    let stored: Vec<_> = backend
        .favourites()
        .await
        .iter()
        .map(|p| (p.id, p.favourite_position))
        .collect();
    assert_eq!(stored, positions);
}

#[tokio::test]
async fn reorder_favourites_keeps_owned_order() {
    let (backend, mut store) = setup(None).await;
    let a = store.create_project().await.unwrap();
    let b = store.create_project().await.unwrap();
    store.toggle_favourite(a.id, true).unwrap();
    store.toggle_favourite(b.id, true).unwrap();

    store
        .handle_event(DropEvent::within(ContainerId::Favourites(USER), 0, 1))
        .unwrap();
    let owned: Vec<_> = store.state().projects.iter().map(|p| p.id).collect();
    assert_eq!(owned, vec![b.id, a.id]);
    let owned_copy = &store.state().projects[1];
    assert_eq!(owned_copy.favourite_position, 1, "copies follow the view order");

    store.settle().await;
    let stored: Vec<_> = backend.favourites().await.iter().map(|p| p.id).collect();
    assert_eq!(stored, vec![a.id, b.id]);
}

#[tokio::test(start_paused = true)]
async fn title_edits_are_debounced() {
    let (backend, mut store) = setup(None).await;
    let project = store.create_project().await.unwrap();
    store.toggle_favourite(project.id, true).unwrap();

    for title in ["P", "Pl", "Pla", "Plan"] {
        store.set_project_title(project.id, title);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    // Every copy shows the latest keystroke
    assert_eq!(store.state().projects[0].title, "Plan");
    assert_eq!(store.state().favourites[0].title, "Plan");
    assert_eq!(store.pending_edits(), 1);
    assert_eq!(backend.count("update_project"), 0);

    store.settle().await;
    assert_eq!(backend.count("update_project"), 1);
    assert_eq!(backend.board(project.id).await.project.title, "Plan");
}

#[tokio::test]
async fn failed_write_keeps_local_order() {
    let (backend, mut store) = setup(Some("update_positions")).await;
    let project_id = open_board(&mut store, &[2]).await;
    let server_layout = task_layout(&backend.board(project_id).await);
    let section = store.board().unwrap().sections[0].container();

    store.handle_event(DropEvent::within(section, 0, 1)).unwrap();
    store.settle().await;

    assert_eq!(store.failed_writes(), 1);
    let local = task_layout(store.board().unwrap());
    assert_ne!(local, server_layout);
    assert_eq!(task_layout(&backend.board(project_id).await), server_layout);

    // Reopening resynchronises with the backend
    store.open_project(project_id).await.unwrap();
    assert_eq!(task_layout(store.board().unwrap()), server_layout);
}

#[tokio::test]
async fn delete_task_closes_gap() {
    let (backend, mut store) = setup(None).await;
    let project_id = open_board(&mut store, &[4]).await;
    let ids: Vec<_> = store.board().unwrap().sections[0]
        .tasks
        .iter()
        .map(|t| t.id)
        .collect();

    store.delete_task(ids[1]);

    let layout = task_layout(store.board().unwrap());
    assert_eq!(layout[0], vec![(ids[0], 2), (ids[2], 1), (ids[3], 0)]);
    assert!(validate(&layout[0]));

    store.settle().await;
    assert_eq!(task_layout(&backend.board(project_id).await), layout);
}

#[tokio::test]
async fn delete_open_project_closes_board() {
    let (backend, mut store) = setup(None).await;
    let keep = store.create_project().await.unwrap();
    let project_id = open_board(&mut store, &[1]).await;
    store.toggle_favourite(project_id, true).unwrap();
    let section = store.board().unwrap().sections[0].container();

    store.delete_project(project_id);

    assert!(store.board().is_none());
    assert!(!store.router().knows(section));
    assert!(store.state().favourites.is_empty());
    assert_eq!(store.state().projects.len(), 1);
    assert_eq!(store.state().projects[0].position, 0);

    store.settle().await;
    store.load().await.unwrap();
    assert_eq!(store.state().projects[0].id, keep.id);
    assert!(backend.favourites().await.is_empty());
}

#[tokio::test]
async fn section_and_task_edits_reach_backend() {
    let (backend, mut store) = setup(None).await;
    let project_id = open_board(&mut store, &[1]).await;
    let board = store.board().unwrap();
    let (section_id, task_id) = (board.sections[0].id, board.sections[0].tasks[0].id);

    store.set_section_title(section_id, "Doing");
    store.set_task_title(task_id, "Write tests");
    store.set_task_content(task_id, "<p>soon</p>");
    store.set_project_icon(project_id, "🚀");
    store.settle().await;

    let stored = backend.board(project_id).await;
    assert_eq!(stored.project.icon, "🚀");
    assert_eq!(stored.sections[0].title, "Doing");
    assert_eq!(stored.sections[0].tasks[0].title, "Write tests");
    assert_eq!(stored.sections[0].tasks[0].content, "<p>soon</p>");
    assert_eq!(store.failed_writes(), 0);
}

#[tokio::test]
async fn shared_project_reaches_guest() {
    let (backend, mut store) = setup(None).await;
    let project = store.create_project().await.unwrap();

    let shared = store.share_project(project.id, 2).await.unwrap();
    assert_eq!(shared.guest_id, Some(2));
    assert!(store.state().projects[0].shared);

    let mut guest = BoardStore::new(backend.clone(), 2, &ClientConfig::default());
    guest.load().await.unwrap();
    assert_eq!(guest.state().shared.len(), 1);
    guest.open_project(project.id).await.unwrap();

    guest.leave_shared(project.id).unwrap();
    assert!(guest.state().shared.is_empty());
    guest.settle().await;
    guest.load().await.unwrap();
    assert!(guest.state().shared.is_empty());
}

#[tokio::test]
async fn guest_cannot_favourite_shared_project() {
    let (backend, mut owner) = setup(None).await;
    let project = owner.create_project().await.unwrap();
    owner.share_project(project.id, 2).await.unwrap();

    let mut guest = BoardStore::new(backend.clone(), 2, &ClientConfig::default());
    guest.load().await.unwrap();
    let before = guest.state().clone();

    assert_eq!(
        guest.toggle_favourite(project.id, true),
        Err(OrderError::NotInView {
            entity: project.id,
            container: ContainerId::Favourites(2),
        })
    );
    // Unknown projects are refused the same way
    assert!(matches!(
        guest.toggle_favourite(999, true),
        Err(OrderError::NotInView { entity: 999, .. })
    ));
    guest.settle().await;

    assert_eq!(guest.state(), &before);
    assert_eq!(backend.count("toggle_membership"), 0);
    assert!(backend.favourites().await.is_empty());

    guest.load().await.unwrap();
    assert!(guest.state().favourites.is_empty());
    owner.load().await.unwrap();
    assert!(owner.state().favourites.is_empty());
}
