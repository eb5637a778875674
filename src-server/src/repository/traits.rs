//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for data access.

use async_trait::async_trait;
use crate::domain::{Entity, DomainResult};

/// Core repository trait for CRUD operations
///
/// Generic over any Entity type. Position fields are never written through
/// `update`; they belong to the positioning operations.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Create a new entity (the store assigns id and position)
    async fn create(&self, entity: &T) -> DomainResult<T>;

    /// Find entity by ID
    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    /// Update an existing entity's content fields
    async fn update(&self, entity: &T) -> DomainResult<T>;

    /// Delete entity by ID, closing the gap it leaves in its containers
    async fn delete(&self, id: T::Id) -> DomainResult<()>;
}
