//! Optimistic Board Store
//!
//! Holds the lists the user sees and applies every change to them at once.
//! Structural changes are then submitted to the backend on a spawned task
//! whose outcome the UI never waits for: a failed write is logged and
//! counted, the local order is kept.

use board_dnd::{
    append_new, close_gap_on_remove, move_across_containers, position_writes,
    reorder_within_container, BoardEvent, ContainerId, ContainerRouter, EntityId,
    MembershipToggle, MoveKind, MoveSubmission, OrderError, Position, PositionWrite, RenderOrder,
    ToggleSubmission, UserId, View,
};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::commands::{self, Backend, ProjectPatch, TaskPatch};
use crate::config::ClientConfig;
use crate::debounce::{join_write, Debouncer, FieldKey};
use crate::error::{UiError, UiResult};
use crate::models::{Positioned, Project, ProjectBoard, Section, Task};

/// Everything currently shown
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    /// Projects owned by the user, in render order
    pub projects: Vec<Project>,
    /// The user's favourites, in render order
    pub favourites: Vec<Project>,
    /// Projects shared with the user, in render order
    pub shared: Vec<Project>,
    /// The open project page
    pub board: Option<ProjectBoard>,
}

pub struct BoardStore {
    user: UserId,
    state: BoardState,
    router: ContainerRouter,
    backend: Arc<dyn Backend>,
    order: RenderOrder,
    in_flight: Vec<JoinHandle<()>>,
    failed: Arc<AtomicUsize>,
    debouncer: Debouncer,
}

// ========================
// List helpers
// ========================

fn ids<T: Positioned>(items: &[T]) -> Vec<EntityId> {
    items.iter().map(Positioned::entity_id).collect()
}

fn pairs<T: Positioned>(items: &[T], container: ContainerId) -> Vec<(EntityId, Position)> {
    items
        .iter()
        .map(|item| (item.entity_id(), item.position_in(container)))
        .collect()
}

fn apply_writes<T: Positioned>(
    items: &mut [T],
    container: ContainerId,
    writes: &[PositionWrite<EntityId>],
) {
    for write in writes {
        if let Some(item) = items.iter_mut().find(|i| i.entity_id() == write.id) {
            item.set_position_in(container, write.position);
        }
    }
}

/// Replaces `items` by `reordered` and returns the position writes it implies
fn replace_ordered<T: Positioned>(
    items: &mut Vec<T>,
    reordered: Vec<T>,
    container: ContainerId,
    order: RenderOrder,
) -> Vec<PositionWrite<EntityId>> {
    let before = pairs(items, container);
    let writes = position_writes(&before, &ids(&reordered), order);
    *items = reordered;
    writes
}

/// Logs and counts a failed fire-and-forget write
fn tracked<F>(failed: Arc<AtomicUsize>, what: &'static str, write: F) -> impl Future<Output = ()>
where
    F: Future<Output = UiResult<()>>,
{
    async move {
        if let Err(e) = write.await {
            failed.fetch_add(1, Ordering::SeqCst);
            warn!(write = what, error = %e, "remote write failed, keeping local state");
        }
    }
}

impl BoardStore {
    pub fn new(backend: Arc<dyn Backend>, user: UserId, config: &ClientConfig) -> Self {
        let router = ContainerRouter::with_containers([
            ContainerId::OwnedProjects(user),
            ContainerId::Favourites(user),
            ContainerId::Shared(user),
        ]);
        Self {
            user,
            state: BoardState::default(),
            router,
            backend,
            order: config.render_order,
            in_flight: Vec::new(),
            failed: Arc::new(AtomicUsize::new(0)),
            debouncer: Debouncer::new(config.debounce_window()),
        }
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn board(&self) -> Option<&ProjectBoard> {
        self.state.board.as_ref()
    }

    pub fn router(&self) -> &ContainerRouter {
        &self.router
    }

    /// Number of fire-and-forget writes that failed so far
    pub fn failed_writes(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Number of debounced edits not yet written
    pub fn pending_edits(&self) -> usize {
        self.debouncer.pending()
    }

    /// Waits until every debounced edit and submission has completed
    pub async fn settle(&mut self) {
        self.debouncer.flush().await;
        for handle in self.in_flight.drain(..) {
            join_write(handle).await;
        }
    }

    fn spawn_write<F>(&mut self, what: &'static str, write: F)
    where
        F: Future<Output = UiResult<()>> + Send + 'static,
    {
        self.in_flight.retain(|handle| !handle.is_finished());
        let task = tracked(Arc::clone(&self.failed), what, write);
        self.in_flight.push(tokio::spawn(task));
    }

    fn debounce_write<F>(&self, key: FieldKey, what: &'static str, write: F)
    where
        F: Future<Output = UiResult<()>> + Send + 'static,
    {
        self.debouncer
            .schedule(key, tracked(Arc::clone(&self.failed), what, write));
    }

    // ========================
    // Loading
    // ========================

    /// Fetches the owned, favourite and shared project lists
    pub async fn load(&mut self) -> UiResult<()> {
        let backend = self.backend.as_ref();
        let projects = commands::list_projects(backend, self.user).await?;
        let favourites = commands::list_favourites(backend, self.user).await?;
        let shared = commands::list_shared(backend, self.user).await?;

        info!(
            projects = projects.len(),
            favourites = favourites.len(),
            shared = shared.len(),
            "project lists loaded"
        );
        self.state.projects = projects;
        self.state.favourites = favourites;
        self.state.shared = shared;
        Ok(())
    }

    /// Opens a project page, replacing the previous one
    pub async fn open_project(&mut self, project_id: EntityId) -> UiResult<()> {
        let board = commands::get_project(self.backend.as_ref(), project_id, self.user).await?;

        self.router
            .forget_where(|container| matches!(container, ContainerId::Section(_)));
        for section in &board.sections {
            self.router.register(section.container());
        }
        debug!(project = project_id, sections = board.sections.len(), "board opened");
        self.state.board = Some(board);
        Ok(())
    }

    /// Closes the project page
    pub fn close_project(&mut self) {
        self.router
            .forget_where(|container| matches!(container, ContainerId::Section(_)));
        self.state.board = None;
    }

    // ========================
    // Drag and drop, membership
    // ========================

    /// Classifies an event, applies it locally and submits it
    ///
    /// Rejected events leave every list untouched.
    pub fn handle_event(&mut self, event: impl Into<BoardEvent>) -> Result<MoveKind, OrderError> {
        let event = event.into();
        let kind = self.router.classify(&event).map_err(|e| {
            warn!(error = %e, "board event rejected");
            e
        })?;

        let applied = match kind {
            MoveKind::Reorder {
                container,
                from,
                to,
            } => self.apply_reorder(container, from, to),
            MoveKind::CrossContainer {
                source,
                destination,
                from,
                to,
            } => self.apply_cross(source, destination, from, to),
            MoveKind::MembershipToggle {
                entity,
                view,
                container,
                turned_on,
            } => self.apply_toggle(entity, view, container, turned_on),
        };
        if let Err(e) = &applied {
            warn!(?kind, error = %e, "board event ignored");
        }
        applied.map(|()| kind)
    }

    /// Flips the favourite flag of one of the user's projects
    pub fn toggle_favourite(
        &mut self,
        project_id: EntityId,
        turned_on: bool,
    ) -> Result<MoveKind, OrderError> {
        self.handle_event(MembershipToggle {
            entity: project_id,
            user: self.user,
            view: View::Favourites,
            turned_on,
        })
    }

    /// Removes a project shared with the user from their shared list
    pub fn leave_shared(&mut self, project_id: EntityId) -> Result<MoveKind, OrderError> {
        self.handle_event(MembershipToggle {
            entity: project_id,
            user: self.user,
            view: View::Shared,
            turned_on: false,
        })
    }

    fn project_list_mut(&mut self, container: ContainerId) -> Result<&mut Vec<Project>, OrderError> {
        match container {
            ContainerId::OwnedProjects(user) if user == self.user => Ok(&mut self.state.projects),
            ContainerId::Favourites(user) if user == self.user => Ok(&mut self.state.favourites),
            ContainerId::Shared(user) if user == self.user => Ok(&mut self.state.shared),
            _ => Err(OrderError::UnknownContainer(container)),
        }
    }

    fn section_mut(&mut self, section_id: EntityId) -> Option<&mut Section> {
        self.state
            .board
            .as_mut()?
            .sections
            .iter_mut()
            .find(|section| section.id == section_id)
    }

    /// Applies `f` to every loaded copy of a project
    fn for_each_copy(&mut self, project_id: EntityId, mut f: impl FnMut(&mut Project)) {
        let BoardState {
            projects,
            favourites,
            shared,
            board,
        } = &mut self.state;
        projects
            .iter_mut()
            .chain(favourites.iter_mut())
            .chain(shared.iter_mut())
            .chain(board.iter_mut().map(|b| &mut b.project))
            .filter(|project| project.id == project_id)
            .for_each(|project| f(project));
    }

    fn find_project(&self, project_id: EntityId) -> Option<&Project> {
        let BoardState {
            projects,
            favourites,
            shared,
            board,
        } = &self.state;
        projects
            .iter()
            .chain(favourites.iter())
            .chain(shared.iter())
            .chain(board.iter().map(|b| &b.project))
            .find(|project| project.id == project_id)
    }

    fn write_project_positions(&mut self, container: ContainerId, writes: &[PositionWrite<EntityId>]) {
        for write in writes {
            self.for_each_copy(write.id, |project| {
                project.set_position_in(container, write.position)
            });
        }
    }

    fn apply_reorder(
        &mut self,
        container: ContainerId,
        from: usize,
        to: usize,
    ) -> Result<(), OrderError> {
        let order = self.order;
        let submission = match container {
            ContainerId::Section(section_id) => {
                let section = self
                    .section_mut(section_id)
                    .ok_or(OrderError::UnknownContainer(container))?;
                let reordered = reorder_within_container(&section.tasks, from, to)?;
                let writes = replace_ordered(&mut section.tasks, reordered, container, order);
                apply_writes(&mut section.tasks, container, &writes);
                MoveSubmission::within(section.tasks[to].id, container, ids(&section.tasks))
            }
            _ => {
                let list = self.project_list_mut(container)?;
                let reordered = reorder_within_container(list, from, to)?;
                let writes = replace_ordered(list, reordered, container, order);
                let submission = MoveSubmission::within(list[to].id, container, ids(list));
                self.write_project_positions(container, &writes);
                submission
            }
        };

        debug!(%container, from, to, "reordered locally");
        let backend = Arc::clone(&self.backend);
        self.spawn_write("update_positions", async move {
            commands::update_positions(backend.as_ref(), &submission).await
        });
        Ok(())
    }

    fn apply_cross(
        &mut self,
        source: ContainerId,
        destination: ContainerId,
        from: usize,
        to: usize,
    ) -> Result<(), OrderError> {
        let order = self.order;
        let (ContainerId::Section(source_id), ContainerId::Section(destination_id)) =
            (source, destination)
        else {
            return Err(OrderError::IncompatibleContainers {
                from: source,
                to: destination,
            });
        };
        let board = self
            .state
            .board
            .as_mut()
            .ok_or(OrderError::UnknownContainer(source))?;
        let source_index = board
            .sections
            .iter()
            .position(|s| s.id == source_id)
            .ok_or(OrderError::UnknownContainer(source))?;
        let destination_index = board
            .sections
            .iter()
            .position(|s| s.id == destination_id)
            .ok_or(OrderError::UnknownContainer(destination))?;

        let (new_source, mut new_destination) = move_across_containers(
            &board.sections[source_index].tasks,
            &board.sections[destination_index].tasks,
            from,
            to,
        )?;
        new_destination[to].section_id = destination_id;
        let moved = new_destination[to].id;

        let source_tasks = &mut board.sections[source_index].tasks;
        let writes = replace_ordered(source_tasks, new_source, source, order);
        apply_writes(source_tasks, source, &writes);
        let source_ordered_ids = ids(source_tasks);

        let destination_tasks = &mut board.sections[destination_index].tasks;
        let writes = replace_ordered(destination_tasks, new_destination, destination, order);
        apply_writes(destination_tasks, destination, &writes);
        let destination_ordered_ids = ids(destination_tasks);

        debug!(task = moved, %source, %destination, to, "moved locally");
        let submission = MoveSubmission {
            moved_entity_id: moved,
            source_container_id: source,
            destination_container_id: destination,
            source_ordered_ids,
            destination_ordered_ids,
        };
        let backend = Arc::clone(&self.backend);
        self.spawn_write("update_positions", async move {
            commands::update_positions(backend.as_ref(), &submission).await
        });
        Ok(())
    }

    fn apply_toggle(
        &mut self,
        project_id: EntityId,
        view: View,
        container: ContainerId,
        turned_on: bool,
    ) -> Result<(), OrderError> {
        let order = self.order;
        let mut project = match self.find_project(project_id) {
            Some(project) if project.view_user(view) == Some(self.user) => project.clone(),
            // The backend files the toggle under the project's owner or guest
            _ => {
                return Err(OrderError::NotInView {
                    entity: project_id,
                    container,
                })
            }
        };
        if project.is_member_of(view) == turned_on {
            debug!(project = project_id, view = view.as_str(), "membership unchanged");
            return Ok(());
        }

        if turned_on {
            let list = self.project_list_mut(container)?;
            let position = append_new(list);
            project.set_membership(view, true);
            project.set_position_in(container, position);
            list.push(project);
            order.sort_by_position(list, |p| p.position_in(container));
            self.for_each_copy(project_id, |p| {
                p.set_membership(view, true);
                p.set_position_in(container, position);
            });
        } else {
            let list = self.project_list_mut(container)?;
            if let Some(index) = list.iter().position(|p| p.id == project_id) {
                let remaining = close_gap_on_remove(list, index)?;
                let writes = replace_ordered(list, remaining, container, order);
                self.write_project_positions(container, &writes);
            }
            self.for_each_copy(project_id, |p| {
                p.set_membership(view, false);
                p.set_position_in(container, 0);
            });
        }

        let toggle = ToggleSubmission {
            entity_id: project_id,
            view,
            turned_on,
        };
        let backend = Arc::clone(&self.backend);
        self.spawn_write("toggle_membership", async move {
            commands::toggle_membership(backend.as_ref(), &toggle)
                .await
                .map(|_| ())
        });
        Ok(())
    }

    // ========================
    // Creation (awaited)
    // ========================

    /// Creates a project, shown first in the user's list
    pub async fn create_project(&mut self) -> UiResult<Project> {
        let project = commands::create_project(self.backend.as_ref(), self.user).await?;
        let order = self.order;
        self.state.projects.push(project.clone());
        order.sort_by_position(&mut self.state.projects, |p| p.position);
        info!(project = project.id, "project created");
        Ok(project)
    }

    /// Appends a section to the open project
    pub async fn create_section(&mut self) -> UiResult<Section> {
        let project_id = self.board().ok_or(UiError::NoBoard)?.project.id;
        let section = commands::create_section(self.backend.as_ref(), project_id).await?;

        self.router.register(section.container());
        if let Some(board) = self.state.board.as_mut() {
            board.sections.push(section.clone());
        }
        Ok(section)
    }

    /// Creates a task, shown first in its section
    pub async fn create_task(&mut self, section_id: EntityId) -> UiResult<Task> {
        if self.section_mut(section_id).is_none() {
            return Err(OrderError::UnknownContainer(ContainerId::Section(section_id)).into());
        }
        let task = commands::create_task(self.backend.as_ref(), section_id).await?;

        let order = self.order;
        if let Some(section) = self.section_mut(section_id) {
            section.tasks.push(task.clone());
            order.sort_by_position(&mut section.tasks, |t| t.position);
        }
        Ok(task)
    }

    // ========================
    // Deletion (optimistic)
    // ========================

    pub fn delete_project(&mut self, project_id: EntityId) {
        let order = self.order;
        let user = self.user;
        for container in [
            ContainerId::OwnedProjects(user),
            ContainerId::Favourites(user),
            ContainerId::Shared(user),
        ] {
            let Ok(list) = self.project_list_mut(container) else {
                continue;
            };
            let Some(index) = list.iter().position(|p| p.id == project_id) else {
                continue;
            };
            if let Ok(remaining) = close_gap_on_remove(list, index) {
                let writes = replace_ordered(list, remaining, container, order);
                self.write_project_positions(container, &writes);
            }
        }

        if self.board().map(|b| b.project.id) == Some(project_id) {
            self.close_project();
        }
        self.debouncer.cancel(FieldKey::ProjectTitle(project_id));
        self.debouncer.cancel(FieldKey::ProjectDescription(project_id));

        let backend = Arc::clone(&self.backend);
        self.spawn_write("delete_project", async move {
            commands::delete_project(backend.as_ref(), project_id).await
        });
    }

    pub fn delete_section(&mut self, section_id: EntityId) {
        let removed = self.state.board.as_mut().and_then(|board| {
            let index = board.sections.iter().position(|s| s.id == section_id)?;
            Some(board.sections.remove(index))
        });
        let Some(section) = removed else {
            warn!(section = section_id, "delete of a section that is not shown");
            return;
        };

        self.router.forget(section.container());
        let task_ids = ids(&section.tasks);
        self.debouncer.cancel_where(|key| match *key {
            FieldKey::SectionTitle(id) => id == section_id,
            FieldKey::TaskTitle(id) | FieldKey::TaskContent(id) => task_ids.contains(&id),
            _ => false,
        });

        let backend = Arc::clone(&self.backend);
        self.spawn_write("delete_section", async move {
            commands::delete_section(backend.as_ref(), section_id).await
        });
    }

    pub fn delete_task(&mut self, task_id: EntityId) {
        let order = self.order;
        let Some(section) = self.state.board.as_mut().and_then(|board| {
            board
                .sections
                .iter_mut()
                .find(|s| s.tasks.iter().any(|t| t.id == task_id))
        }) else {
            warn!(task = task_id, "delete of a task that is not shown");
            return;
        };

        let container = section.container();
        if let Some(index) = section.tasks.iter().position(|t| t.id == task_id) {
            if let Ok(remaining) = close_gap_on_remove(&section.tasks, index) {
                let writes = replace_ordered(&mut section.tasks, remaining, container, order);
                apply_writes(&mut section.tasks, container, &writes);
            }
        }
        self.debouncer.cancel(FieldKey::TaskTitle(task_id));
        self.debouncer.cancel(FieldKey::TaskContent(task_id));

        let backend = Arc::clone(&self.backend);
        self.spawn_write("delete_task", async move {
            commands::delete_task(backend.as_ref(), task_id).await
        });
    }

    // ========================
    // Text edits
    // ========================

    /// Updates the title everywhere at once, writes it after the quiet window
    pub fn set_project_title(&mut self, project_id: EntityId, title: &str) {
        self.for_each_copy(project_id, |p| p.title = title.to_string());

        let backend = Arc::clone(&self.backend);
        let title = title.to_string();
        self.debounce_write(FieldKey::ProjectTitle(project_id), "update_project", async move {
            let patch = ProjectPatch {
                project_id,
                title: Some(&title),
                ..ProjectPatch::default()
            };
            commands::update_project(backend.as_ref(), &patch)
                .await
                .map(|_| ())
        });
    }

    pub fn set_project_description(&mut self, project_id: EntityId, description: &str) {
        self.for_each_copy(project_id, |p| p.description = description.to_string());

        let backend = Arc::clone(&self.backend);
        let description = description.to_string();
        self.debounce_write(
            FieldKey::ProjectDescription(project_id),
            "update_project",
            async move {
                let patch = ProjectPatch {
                    project_id,
                    description: Some(&description),
                    ..ProjectPatch::default()
                };
                commands::update_project(backend.as_ref(), &patch)
                    .await
                    .map(|_| ())
            },
        );
    }

    /// Icons are picked, not typed: written immediately
    pub fn set_project_icon(&mut self, project_id: EntityId, icon: &str) {
        self.for_each_copy(project_id, |p| p.icon = icon.to_string());

        let backend = Arc::clone(&self.backend);
        let icon = icon.to_string();
        self.spawn_write("update_project", async move {
            let patch = ProjectPatch {
                project_id,
                icon: Some(&icon),
                ..ProjectPatch::default()
            };
            commands::update_project(backend.as_ref(), &patch)
                .await
                .map(|_| ())
        });
    }

    pub fn set_section_title(&mut self, section_id: EntityId, title: &str) {
        let Some(section) = self.section_mut(section_id) else {
            warn!(section = section_id, "edit of a section that is not shown");
            return;
        };
        section.title = title.to_string();

        let backend = Arc::clone(&self.backend);
        let title = title.to_string();
        self.debounce_write(FieldKey::SectionTitle(section_id), "update_section", async move {
            commands::update_section(backend.as_ref(), section_id, &title)
                .await
                .map(|_| ())
        });
    }

    fn task_mut(&mut self, task_id: EntityId) -> Option<&mut Task> {
        self.state
            .board
            .as_mut()?
            .sections
            .iter_mut()
            .flat_map(|section| section.tasks.iter_mut())
            .find(|task| task.id == task_id)
    }

    pub fn set_task_title(&mut self, task_id: EntityId, title: &str) {
        let Some(task) = self.task_mut(task_id) else {
            warn!(task = task_id, "edit of a task that is not shown");
            return;
        };
        task.title = title.to_string();

        let backend = Arc::clone(&self.backend);
        let title = title.to_string();
        self.debounce_write(FieldKey::TaskTitle(task_id), "update_task", async move {
            let patch = TaskPatch {
                task_id,
                title: Some(&title),
                ..TaskPatch::default()
            };
            commands::update_task(backend.as_ref(), &patch).await.map(|_| ())
        });
    }

    pub fn set_task_content(&mut self, task_id: EntityId, content: &str) {
        let Some(task) = self.task_mut(task_id) else {
            warn!(task = task_id, "edit of a task that is not shown");
            return;
        };
        task.content = content.to_string();

        let backend = Arc::clone(&self.backend);
        let content = content.to_string();
        self.debounce_write(FieldKey::TaskContent(task_id), "update_task", async move {
            let patch = TaskPatch {
                task_id,
                content: Some(&content),
                ..TaskPatch::default()
            };
            commands::update_task(backend.as_ref(), &patch).await.map(|_| ())
        });
    }

    // ========================
    // Sharing
    // ========================

    /// Shares one of the user's projects; the guest's list is theirs to load
    pub async fn share_project(&mut self, project_id: EntityId, guest: UserId) -> UiResult<Project> {
        let shared = commands::share_project(self.backend.as_ref(), project_id, guest).await?;
        self.for_each_copy(project_id, |p| {
            p.guest_id = shared.guest_id;
            p.shared = shared.shared;
            p.shared_position = shared.shared_position;
        });
        Ok(shared)
    }
}
