// memory.rs — In-memory remote store double.
//
// MemoryRemoteStore behaves like a small goal server: it assigns its own
// ids on create and keeps records per page. A failure switch turns every
// call into an outage, which is how engine tests drive the degrade/retry
// path without a network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::Utc;
use nw_goal::{Goal, GoalPatch};

use crate::client::RemoteStore;
use crate::error::RemoteError;

/// In-memory server double with server-assigned ids and a failure switch.
#[derive(Default)]
pub struct MemoryRemoteStore {
    pages: Mutex<HashMap<String, Vec<Goal>>>,
    next_id: AtomicU64,
    failing: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn the outage on or off. While failing, every call errors.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Snapshot of a page's server-side records, for assertions.
    pub fn goals_for(&self, page_id: &str) -> Vec<Goal> {
        self.pages
            .lock()
            .expect("remote double lock poisoned")
            .get(page_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Seed a server-side record directly, bypassing the call log.
    pub fn seed(&self, page_id: &str, goal: Goal) {
        self.pages
            .lock()
            .expect("remote double lock poisoned")
            .entry(page_id.to_string())
            .or_default()
            .push(goal);
    }

    /// Every call made so far, in order, as "verb:page[:detail]".
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("remote double lock poisoned").clone()
    }

    fn record_call(&self, call: String) {
        self.calls
            .lock()
            .expect("remote double lock poisoned")
            .push(call);
    }

    fn check_available(&self) -> Result<(), RemoteError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(RemoteError::Unavailable("simulated outage".to_string()))
        } else {
            Ok(())
        }
    }
}

impl RemoteStore for MemoryRemoteStore {
    fn list_goals(&self, page_id: &str) -> Result<Vec<Goal>, RemoteError> {
        self.record_call(format!("list:{}", page_id));
        self.check_available()?;
        Ok(self.goals_for(page_id))
    }

    fn create_goal(&self, page_id: &str, goal: &Goal) -> Result<Goal, RemoteError> {
        self.record_call(format!("create:{}:{}", page_id, goal.title));
        self.check_available()?;

        let mut record = goal.clone();
        record.id = format!("srv-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        record.page_id = Some(page_id.to_string());

        self.pages
            .lock()
            .expect("remote double lock poisoned")
            .entry(page_id.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    fn update_goal(
        &self,
        page_id: &str,
        goal_id: &str,
        patch: &GoalPatch,
    ) -> Result<Goal, RemoteError> {
        self.record_call(format!("update:{}:{}", page_id, goal_id));
        self.check_available()?;

        let mut pages = self.pages.lock().expect("remote double lock poisoned");
        let goals = pages.entry(page_id.to_string()).or_default();
        match goals.iter_mut().find(|g| g.id == goal_id) {
            Some(goal) => {
                goal.apply(patch, Utc::now());
                Ok(goal.clone())
            }
            None => Err(RemoteError::Status {
                code: 404,
                body: format!("no goal {} on page {}", goal_id, page_id),
            }),
        }
    }

    fn delete_goal(&self, page_id: &str, goal_id: &str) -> Result<(), RemoteError> {
        self.record_call(format!("delete:{}:{}", page_id, goal_id));
        self.check_available()?;

        let mut pages = self.pages.lock().expect("remote double lock poisoned");
        if let Some(goals) = pages.get_mut(page_id) {
            goals.retain(|g| g.id != goal_id);
        }
        Ok(())
    }
}

/// A remote store for sessions with no configured endpoint.
///
/// Every call reports unavailability, so the engine settles into
/// local-only mode after its first remote attempt.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledRemote;

impl RemoteStore for DisabledRemote {
    fn list_goals(&self, _page_id: &str) -> Result<Vec<Goal>, RemoteError> {
        Err(RemoteError::NotConfigured)
    }

    fn create_goal(&self, _page_id: &str, _goal: &Goal) -> Result<Goal, RemoteError> {
        Err(RemoteError::NotConfigured)
    }

    fn update_goal(
        &self,
        _page_id: &str,
        _goal_id: &str,
        _patch: &GoalPatch,
    ) -> Result<Goal, RemoteError> {
        Err(RemoteError::NotConfigured)
    }

    fn delete_goal(&self, _page_id: &str, _goal_id: &str) -> Result<(), RemoteError> {
        Err(RemoteError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nw_goal::GoalDraft;

    fn goal(title: &str) -> Goal {
        Goal::from_draft(GoalDraft::titled(title, "P1"), Utc::now())
    }

    #[test]
    fn create_assigns_server_id() {
        let store = MemoryRemoteStore::new();
        let record = store.create_goal("P1", &goal("Launch")).unwrap();
        assert!(record.id.starts_with("srv-"));
        assert_eq!(store.goals_for("P1").len(), 1);
    }

    #[test]
    fn update_applies_patch_to_server_record() {
        let store = MemoryRemoteStore::new();
        let record = store.create_goal("P1", &goal("Launch")).unwrap();

        let patch = GoalPatch {
            detail: Some("ship the beta".to_string()),
            ..GoalPatch::default()
        };
        let updated = store.update_goal("P1", &record.id, &patch).unwrap();
        assert_eq!(updated.detail, "ship the beta");
    }

    #[test]
    fn update_unknown_id_is_an_error() {
        let store = MemoryRemoteStore::new();
        let result = store.update_goal("P1", "missing", &GoalPatch::default());
        assert!(matches!(result, Err(RemoteError::Status { code: 404, .. })));
    }

    #[test]
    fn delete_unknown_id_is_ok() {
        let store = MemoryRemoteStore::new();
        assert!(store.delete_goal("P1", "missing").is_ok());
    }

    #[test]
    fn failure_switch_turns_every_call_into_an_outage() {
        let store = MemoryRemoteStore::new();
        store.set_failing(true);
        assert!(store.list_goals("P1").is_err());
        assert!(store.create_goal("P1", &goal("Launch")).is_err());

        store.set_failing(false);
        assert!(store.list_goals("P1").is_ok());
    }

    #[test]
    fn call_log_records_order() {
        let store = MemoryRemoteStore::new();
        store.create_goal("P1", &goal("Launch")).unwrap();
        store.list_goals("P1").unwrap();
        let calls = store.calls();
        assert_eq!(calls[0], "create:P1:Launch");
        assert_eq!(calls[1], "list:P1");
    }

    #[test]
    fn disabled_remote_always_reports_not_configured() {
        let remote = DisabledRemote;
        assert!(matches!(
            remote.list_goals("P1"),
            Err(RemoteError::NotConfigured)
        ));
    }
}
