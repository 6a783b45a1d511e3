// client.rs — RemoteStore: the page-scoped CRUD contract.

use nw_goal::{Goal, GoalPatch};

use crate::error::RemoteError;

/// The remote goal store contract, scoped by page.
///
/// Each operation returns the resulting server record or an error.
/// Authentication is entirely the implementation's concern; the engine
/// treats auth failures identically to any other remote error.
pub trait RemoteStore: Send + Sync {
    /// All goal records for a page.
    fn list_goals(&self, page_id: &str) -> Result<Vec<Goal>, RemoteError>;

    /// Create a goal; the server may assign its own id and timestamps.
    fn create_goal(&self, page_id: &str, goal: &Goal) -> Result<Goal, RemoteError>;

    /// Apply a partial update, returning the updated record.
    fn update_goal(
        &self,
        page_id: &str,
        goal_id: &str,
        patch: &GoalPatch,
    ) -> Result<Goal, RemoteError>;

    /// Delete a goal. Deleting an unknown id is not an error (safe to retry).
    fn delete_goal(&self, page_id: &str, goal_id: &str) -> Result<(), RemoteError>;
}
