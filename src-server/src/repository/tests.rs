//! Repository Integration Tests
//!
//! Runs the repositories against an in-memory SQLite database.

#[cfg(test)]
mod tests {
    use crate::domain::{DomainError, Project, Section, Task};
    use crate::repository::{
        init_db, DbState, ProjectPositioningOperations, ProjectRepository, ProjectViewOperations,
        Repository, SectionRepository, TaskPositioningOperations, TaskRepository,
    };
    use board_dnd::{validate, ContainerId, EntityId, MoveSubmission, RenderOrder, View};
    use std::path::PathBuf;

    struct Repos {
        db: DbState,
        projects: ProjectRepository,
        sections: SectionRepository,
        tasks: TaskRepository,
    }

    async fn setup_test_db() -> Repos {
        let db_path = PathBuf::from(":memory:");
        let db_state = init_db(&db_path).await.expect("Failed to init test DB");
        let order = RenderOrder::Descending;
        Repos {
            projects: ProjectRepository::new(db_state.connection(), order),
            sections: SectionRepository::new(db_state.connection()),
            tasks: TaskRepository::new(db_state.connection(), order),
            db: db_state,
        }
    }

    /// A project with one section holding `count` tasks; returns the section
    /// id and the task ids in render order.
    async fn section_with_tasks(repos: &Repos, count: usize) -> (EntityId, Vec<EntityId>) {
        let project = repos.projects.create(&Project::new(0, 1, 0)).await.unwrap();
        let section = repos
            .sections
            .create(&Section::new(0, project.id))
            .await
            .unwrap();
        for _ in 0..count {
            repos.tasks.create(&Task::new(0, section.id, 0)).await.unwrap();
        }
        let ids = repos.tasks.member_ids(section.id).await.unwrap();
        (section.id, ids)
    }

    async fn task_positions(repos: &Repos, section_id: EntityId) -> Vec<(EntityId, u32)> {
        repos
            .tasks
            .list_by_section(section_id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| (t.id, t.position))
            .collect()
    }

    #[tokio::test]
    async fn test_create_project_defaults_and_append() {
        let repos = setup_test_db().await;

        let first = repos.projects.create(&Project::new(0, 1, 0)).await.unwrap();
        let second = repos.projects.create(&Project::new(0, 1, 0)).await.unwrap();
        let other_user = repos.projects.create(&Project::new(0, 2, 0)).await.unwrap();

        assert_eq!(first.title, "Untitled");
        assert_eq!(first.position, 0);
        assert_eq!(second.position, 1);
        assert_eq!(other_user.position, 0, "positions are scoped per owner");

        // Newest first under the descending convention
        let listed = repos
            .projects
            .member_ids(ContainerId::OwnedProjects(1))
            .await
            .unwrap();
        assert_eq!(listed, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_update_project_keeps_positions() {
        let repos = setup_test_db().await;
        let mut project = repos.projects.create(&Project::new(0, 1, 0)).await.unwrap();

        project.title = String::new();
        project.icon = "🚀".to_string();
        project.position = 42;
        let updated = repos.projects.update(&project).await.unwrap();

        assert_eq!(updated.title, "Untitled");
        assert_eq!(updated.icon, "🚀");
        assert_eq!(updated.position, 0);
    }

    #[tokio::test]
    async fn test_reorder_first_to_last() {
        let repos = setup_test_db().await;
        let (section_id, ids) = section_with_tasks(&repos, 3).await;
        // ids are [T3, T2, T1] in render order; move T3 to the end
        let submitted = vec![ids[1], ids[2], ids[0]];

        let stored = repos.tasks.apply_order(section_id, &submitted).await.unwrap();
        assert_eq!(stored, submitted);
        assert_eq!(
            task_positions(&repos, section_id).await,
            vec![(ids[1], 2), (ids[2], 1), (ids[0], 0)]
        );
    }

    #[tokio::test]
    async fn test_resubmission_is_idempotent() {
        let repos = setup_test_db().await;
        let (section_id, ids) = section_with_tasks(&repos, 4).await;
        let submitted = vec![ids[2], ids[0], ids[3], ids[1]];

        repos.tasks.apply_order(section_id, &submitted).await.unwrap();
        let once = task_positions(&repos, section_id).await;
        repos.tasks.apply_order(section_id, &submitted).await.unwrap();
        assert_eq!(task_positions(&repos, section_id).await, once);
    }

    #[tokio::test]
    async fn test_partial_order_heals_missing_members() {
        let repos = setup_test_db().await;
        let (section_id, ids) = section_with_tasks(&repos, 3).await;

        // Client only knew two of the three tasks
        let stored = repos
            .tasks
            .apply_order(section_id, &[ids[2], ids[1]])
            .await
            .unwrap();
        assert_eq!(stored, vec![ids[2], ids[1], ids[0]]);
        assert!(validate(&task_positions(&repos, section_id).await));
    }

    #[tokio::test]
    async fn test_stray_id_is_rejected() {
        let repos = setup_test_db().await;
        let (section_id, ids) = section_with_tasks(&repos, 2).await;
        let before = task_positions(&repos, section_id).await;

        let result = repos.tasks.apply_order(section_id, &[ids[1], 999]).await;
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
        assert_eq!(task_positions(&repos, section_id).await, before);
    }

    #[tokio::test]
    async fn test_move_across_sections() {
        let repos = setup_test_db().await;
        let project = repos.projects.create(&Project::new(0, 1, 0)).await.unwrap();
        let s1 = repos.sections.create(&Section::new(0, project.id)).await.unwrap();
        let s2 = repos.sections.create(&Section::new(0, project.id)).await.unwrap();
        let t2 = repos.tasks.create(&Task::new(0, s1.id, 0)).await.unwrap();
        let t1 = repos.tasks.create(&Task::new(0, s1.id, 0)).await.unwrap();
        let t3 = repos.tasks.create(&Task::new(0, s2.id, 0)).await.unwrap();
        // S1 renders [T1, T2], S2 renders [T3]

        let submission = MoveSubmission {
            moved_entity_id: t1.id,
            source_container_id: ContainerId::Section(s1.id),
            destination_container_id: ContainerId::Section(s2.id),
            source_ordered_ids: vec![t2.id],
            destination_ordered_ids: vec![t1.id, t3.id],
        };
        repos.tasks.move_across(&submission).await.unwrap();

        assert_eq!(task_positions(&repos, s1.id).await, vec![(t2.id, 0)]);
        assert_eq!(
            task_positions(&repos, s2.id).await,
            vec![(t1.id, 1), (t3.id, 0)]
        );
        let moved = repos.tasks.find_by_id(t1.id).await.unwrap().unwrap();
        assert_eq!(moved.section_id, s2.id);

        // Replaying the same submission changes nothing
        repos.tasks.move_across(&submission).await.unwrap();
        assert_eq!(
            task_positions(&repos, s2.id).await,
            vec![(t1.id, 1), (t3.id, 0)]
        );
    }

    #[tokio::test]
    async fn test_move_into_empty_section() {
        let repos = setup_test_db().await;
        let (s1, ids) = section_with_tasks(&repos, 1).await;
        let project_id = repos.sections.find_by_id(s1).await.unwrap().unwrap().project_id;
        let s2 = repos.sections.create(&Section::new(0, project_id)).await.unwrap();

        let submission = MoveSubmission {
            moved_entity_id: ids[0],
            source_container_id: ContainerId::Section(s1),
            destination_container_id: ContainerId::Section(s2.id),
            source_ordered_ids: vec![],
            destination_ordered_ids: vec![ids[0]],
        };
        repos.tasks.move_across(&submission).await.unwrap();

        assert!(task_positions(&repos, s1).await.is_empty());
        assert_eq!(task_positions(&repos, s2.id).await, vec![(ids[0], 0)]);
    }

    #[tokio::test]
    async fn test_move_between_projects_is_rejected() {
        let repos = setup_test_db().await;
        let (s1, ids) = section_with_tasks(&repos, 1).await;
        let (s2, _) = section_with_tasks(&repos, 0).await;

        let submission = MoveSubmission {
            moved_entity_id: ids[0],
            source_container_id: ContainerId::Section(s1),
            destination_container_id: ContainerId::Section(s2),
            source_ordered_ids: vec![],
            destination_ordered_ids: vec![ids[0]],
        };
        let result = repos.tasks.move_across(&submission).await;
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_delete_task_closes_gap() {
        let repos = setup_test_db().await;
        let (section_id, ids) = section_with_tasks(&repos, 4).await;

        repos.tasks.delete(ids[1]).await.unwrap();

        let positions = task_positions(&repos, section_id).await;
        assert_eq!(positions, vec![(ids[0], 2), (ids[2], 1), (ids[3], 0)]);
        assert!(validate(&positions));
    }

    #[tokio::test]
    async fn test_create_task_requires_section() {
        let repos = setup_test_db().await;
        let result = repos.tasks.create(&Task::new(0, 77, 0)).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_project_cascades() {
        let repos = setup_test_db().await;
        let keep = repos.projects.create(&Project::new(0, 1, 0)).await.unwrap();
        let (section_id, ids) = section_with_tasks(&repos, 2).await;
        let doomed = repos.sections.find_by_id(section_id).await.unwrap().unwrap().project_id;
        let newest = repos.projects.create(&Project::new(0, 1, 0)).await.unwrap();

        repos.projects.delete(doomed).await.unwrap();

        assert!(repos.sections.find_by_id(section_id).await.unwrap().is_none());
        for id in ids {
            assert!(repos.tasks.find_by_id(id).await.unwrap().is_none());
        }
        let remaining = repos
            .projects
            .list_container(ContainerId::OwnedProjects(1))
            .await
            .unwrap();
        let positions: Vec<_> = remaining.iter().map(|p| (p.id, p.position)).collect();
        assert_eq!(positions, vec![(newest.id, 1), (keep.id, 0)]);
    }

    #[tokio::test]
    async fn test_delete_section_cascades() {
        let repos = setup_test_db().await;
        let (section_id, ids) = section_with_tasks(&repos, 2).await;

        repos.sections.delete(section_id).await.unwrap();

        assert!(repos.tasks.find_by_id(ids[0]).await.unwrap().is_none());
        assert!(matches!(
            repos.sections.delete(section_id).await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_favourite_toggle_and_reorder() {
        let repos = setup_test_db().await;
        let a = repos.projects.create(&Project::new(0, 1, 0)).await.unwrap();
        let b = repos.projects.create(&Project::new(0, 1, 0)).await.unwrap();
        let c = repos.projects.create(&Project::new(0, 1, 0)).await.unwrap();
        let favourites = ContainerId::Favourites(1);

        for project in [&a, &b, &c] {
            repos
                .projects
                .set_membership(project.id, View::Favourites, true)
                .await
                .unwrap();
        }
        assert_eq!(
            repos.projects.member_ids(favourites).await.unwrap(),
            vec![c.id, b.id, a.id]
        );

        // Toggling on twice is a no-op
        let again = repos
            .projects
            .set_membership(c.id, View::Favourites, true)
            .await
            .unwrap();
        assert_eq!(again.favourite_position, 2);

        repos
            .projects
            .apply_order(favourites, &[a.id, c.id, b.id])
            .await
            .unwrap();
        repos
            .projects
            .set_membership(c.id, View::Favourites, false)
            .await
            .unwrap();

        let listed = repos.projects.list_container(favourites).await.unwrap();
        let positions: Vec<_> = listed.iter().map(|p| (p.id, p.favourite_position)).collect();
        assert_eq!(positions, vec![(a.id, 1), (b.id, 0)]);

        // The owner's list is an independent position space
        let owned = repos
            .projects
            .member_ids(ContainerId::OwnedProjects(1))
            .await
            .unwrap();
        assert_eq!(owned, vec![c.id, b.id, a.id]);
    }

    #[tokio::test]
    async fn test_share_and_unshare() {
        let repos = setup_test_db().await;
        let project = repos.projects.create(&Project::new(0, 1, 0)).await.unwrap();

        assert!(matches!(
            repos.projects.set_membership(project.id, View::Shared, true).await,
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(
            repos.projects.share_with(project.id, 1).await,
            Err(DomainError::InvalidInput(_))
        ));

        let other = repos.projects.create(&Project::new(0, 3, 0)).await.unwrap();
        repos.projects.share_with(other.id, 2).await.unwrap();
        let shared = repos.projects.share_with(project.id, 2).await.unwrap();
        assert!(shared.shared);
        assert_eq!(shared.guest_id, Some(2));
        assert_eq!(shared.shared_position, 1);

        // Moving the share to another guest leaves the first guest's list dense
        repos.projects.share_with(project.id, 4).await.unwrap();
        let guest_two = repos
            .projects
            .list_container(ContainerId::Shared(2))
            .await
            .unwrap();
        assert_eq!(guest_two.len(), 1);
        assert_eq!(guest_two[0].shared_position, 0);

        let unshared = repos
            .projects
            .set_membership(project.id, View::Shared, false)
            .await
            .unwrap();
        assert!(!unshared.shared);
        assert!(repos
            .projects
            .member_ids(ContainerId::Shared(4))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_reindex_repairs_gaps() {
        let repos = setup_test_db().await;
        let (section_id, ids) = section_with_tasks(&repos, 3).await;
        assert_eq!(repos.tasks.next_position(section_id).await.unwrap(), 3);

        // Drift left by a writer outside the repositories
        {
            let conn = repos.db.conn.lock().await;
            conn.execute(
                "UPDATE tasks SET position = position + 5 WHERE id = ?1",
                [ids[0]],
            )
            .unwrap();
        }
        assert!(!validate(&task_positions(&repos, section_id).await));
        let owned = ContainerId::OwnedProjects(1);
        assert_eq!(repos.projects.next_position(owned).await.unwrap(), 1);

        repos.tasks.reindex_section(section_id).await.unwrap();
        repos.projects.reindex(owned).await.unwrap();
        assert_eq!(
            task_positions(&repos, section_id).await,
            vec![(ids[0], 2), (ids[1], 1), (ids[2], 0)]
        );
    }

    #[tokio::test]
    async fn test_section_order_is_creation_order() {
        let repos = setup_test_db().await;
        let project = repos.projects.create(&Project::new(0, 1, 0)).await.unwrap();
        let first = repos.sections.create(&Section::new(0, project.id)).await.unwrap();
        let second = repos.sections.create(&Section::new(0, project.id)).await.unwrap();

        let listed = repos.sections.list_by_project(project.id).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }
}
