//! Position Batches
//!
//! Every renumbering runs in one transaction: either all sibling positions
//! are rewritten or none are.

use board_dnd::{ContainerId, EntityId, RenderOrder};
use rusqlite::{params_from_iter, Connection, ToSql, Transaction};
use tracing::{debug, error};

use crate::domain::{DomainError, DomainResult};

/// Runs `batch` in a transaction, reporting any failure as `WriteFailure`
pub(crate) fn commit_batch<F>(
    conn: &mut Connection,
    containers: &[ContainerId],
    batch: F,
) -> DomainResult<()>
where
    F: FnOnce(&Transaction<'_>) -> rusqlite::Result<()>,
{
    let result = conn.transaction().and_then(|tx| {
        batch(&tx)?;
        tx.commit()
    });

    match result {
        Ok(()) => {
            debug!(?containers, "position batch committed");
            Ok(())
        }
        Err(e) => {
            error!(?containers, error = %e, "position batch rolled back");
            Err(DomainError::WriteFailure(e.to_string()))
        }
    }
}

/// Ids selected by `sql` (one id column), in query order
pub(crate) fn query_ids(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> DomainResult<Vec<EntityId>> {
    let mut stmt = conn.prepare(sql)?;
    let ids = stmt
        .query_map(params_from_iter(params.iter()), |row| row.get::<_, EntityId>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(ids)
}

/// `ORDER BY` clause rendering `column` in `order`, newest id first on ties
pub(crate) fn order_clause(column: &str, order: RenderOrder) -> String {
    format!(
        "ORDER BY {col} {dir}, id {dir}",
        col = column,
        dir = order.sql_direction()
    )
}

/// Rejects submitted ids that are not members of the allowed set
pub(crate) fn ensure_members(
    submitted: &[EntityId],
    allowed: &[EntityId],
    container: ContainerId,
) -> DomainResult<()> {
    match submitted.iter().find(|id| !allowed.contains(id)) {
        Some(stray) => Err(DomainError::InvalidInput(format!(
            "entity {} does not belong to {}",
            stray, container
        ))),
        None => Ok(()),
    }
}
