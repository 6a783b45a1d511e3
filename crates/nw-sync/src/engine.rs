// engine.rs — SyncEngine: the goal synchronization orchestrator.
//
// Every operation follows the same discipline: write the local snapshot
// first, synchronously, then attempt the remote mirror if the circuit
// breaker allows it. A remote success folds server-assigned fields back
// into the cache; a remote failure opens the breaker and the session
// keeps working from local truth. Subscribers always hear the final
// canonical state, whichever side produced it.
//
// Invariants owned here:
//   - no user edit is ever lost to remote unavailability
//   - within one page, two goals never share a case-insensitive title
//   - a stale server round-trip cannot overwrite a newer local edit
//
// The engine serializes all operations on one internal lock, so callers
// need no per-goal coordination of their own. Remote calls happen under
// that lock; background migration is the one exception and takes the
// lock only briefly to fold results.

use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use nw_cache::SnapshotStore;
use nw_goal::{Goal, GoalDraft, GoalPatch};
use nw_projection::DocumentHandle;
use nw_remote::RemoteStore;

use crate::breaker::{AvailabilityMode, CircuitBreaker};
use crate::clock::Clock;
use crate::hub::{GoalObserver, NotificationHub, ObserverId};

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long the engine stays local-only after a remote failure before
    /// the next remote attempt probes for recovery.
    pub retry_cooldown: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retry_cooldown: Duration::from_secs(60),
        }
    }
}

/// Filter for [`SyncEngine::list_goals`].
#[derive(Debug, Clone, Default)]
pub struct GoalFilter {
    pub page_id: Option<String>,
    pub workspace_id: Option<String>,
}

impl GoalFilter {
    pub fn for_page(page_id: impl Into<String>) -> Self {
        Self {
            page_id: Some(page_id.into()),
            workspace_id: None,
        }
    }

    pub fn matches(&self, goal: &Goal) -> bool {
        if let Some(page_id) = &self.page_id {
            if goal.page_id.as_deref() != Some(page_id.as_str()) {
                return false;
            }
        }
        if let Some(workspace_id) = &self.workspace_id {
            if goal.workspace_id.as_deref() != Some(workspace_id.as_str()) {
                return false;
            }
        }
        true
    }
}

struct EngineState {
    goals: Vec<Goal>,
    breaker: CircuitBreaker,
}

struct EngineInner {
    cache: Arc<dyn SnapshotStore>,
    remote: Arc<dyn RemoteStore>,
    clock: Arc<dyn Clock>,
    state: Mutex<EngineState>,
    hub: Mutex<NotificationHub>,
    background: Mutex<Vec<JoinHandle<()>>>,
}

/// The synchronization engine. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<EngineInner>,
}

impl SyncEngine {
    /// Build an engine from its injected collaborators. The canonical
    /// in-memory list is seeded from the cache snapshot.
    pub fn new(
        cache: Arc<dyn SnapshotStore>,
        remote: Arc<dyn RemoteStore>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        let goals = cache.load_all();
        tracing::debug!(count = goals.len(), "engine seeded from cache snapshot");
        Self {
            inner: Arc::new(EngineInner {
                cache,
                remote,
                clock,
                state: Mutex::new(EngineState {
                    goals,
                    breaker: CircuitBreaker::new(config.retry_cooldown),
                }),
                hub: Mutex::new(NotificationHub::new()),
                background: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The current availability mode, as the breaker sees it.
    pub fn availability(&self) -> AvailabilityMode {
        self.lock_state().breaker.mode()
    }

    /// Register an observer for goal-changed notifications.
    pub fn subscribe(&self, observer: impl GoalObserver + 'static) -> ObserverId {
        self.lock_hub().subscribe(observer)
    }

    /// Remove an observer. Returns false for an unknown id.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.lock_hub().unsubscribe(id)
    }

    /// List goals matching `filter`.
    ///
    /// The local cache answers first and always. When the remote store is
    /// available and the filter names a page, the server copy of that page
    /// is fetched: a non-empty result is upserted into the cache and
    /// returned; an empty result while local entries exist means the page's
    /// goals never reached the server, so they migrate in the background.
    pub fn list_goals(&self, filter: &GoalFilter) -> Vec<Goal> {
        let mut state = self.lock_state();
        let local: Vec<Goal> = state
            .goals
            .iter()
            .filter(|goal| filter.matches(goal))
            .cloned()
            .collect();

        let Some(page_id) = filter.page_id.clone() else {
            return local;
        };
        let now = self.inner.clock.now();
        if !state.breaker.allows_request(now) {
            return local;
        }

        match self.inner.remote.list_goals(&page_id) {
            Ok(server) if !server.is_empty() => {
                state.breaker.record_success();
                for record in &server {
                    match state.goals.iter_mut().find(|g| g.id == record.id) {
                        Some(existing) => fold_remote(existing, record.clone()),
                        None => state.goals.push(record.clone()),
                    }
                }
                self.persist(&state.goals);
                server
            }
            Ok(_) => {
                state.breaker.record_success();
                if !local.is_empty() {
                    tracing::info!(
                        page = %page_id,
                        count = local.len(),
                        "page has local-only goals, migrating to remote"
                    );
                    self.spawn_migration(page_id, local.clone());
                }
                local
            }
            Err(err) => {
                tracing::warn!(page = %page_id, error = %err, "remote list failed, serving local cache");
                state.breaker.record_failure(now);
                local
            }
        }
    }

    /// A single goal by id, from the canonical in-memory list.
    pub fn get_goal(&self, goal_id: &str) -> Option<Goal> {
        self.lock_state()
            .goals
            .iter()
            .find(|g| g.id == goal_id)
            .cloned()
    }

    /// Create a goal from a draft.
    ///
    /// A draft whose title matches an existing goal on the same page
    /// (case-insensitively) updates that goal instead — one page never
    /// holds two goals with the same title.
    pub fn create_goal(&self, draft: GoalDraft) -> Goal {
        let existing_id = {
            let state = self.lock_state();
            state
                .goals
                .iter()
                .find(|g| g.page_id == draft.page_id && g.title_matches(&draft.title))
                .map(|g| g.id.clone())
        };
        if let Some(id) = existing_id {
            tracing::debug!(goal = %id, title = %draft.title, "create matched existing title, updating");
            if let Some(goal) = self.update_goal(&id, patch_from_draft(&draft)) {
                return goal;
            }
            // The goal vanished between lookup and update; create it fresh.
        }

        let now = self.inner.clock.now();
        let mut goal = Goal::from_draft(draft, now);

        let mut state = self.lock_state();
        state.goals.push(goal.clone());
        self.persist(&state.goals);

        if let Some(page_id) = goal.page_id.clone() {
            if state.breaker.allows_request(now) {
                match self.inner.remote.create_goal(&page_id, &goal) {
                    Ok(record) => {
                        state.breaker.record_success();
                        let local_id = goal.id.clone();
                        if let Some(stored) = state.goals.iter_mut().find(|g| g.id == local_id) {
                            fold_remote(stored, record);
                            goal = stored.clone();
                        }
                        self.persist(&state.goals);
                    }
                    Err(err) => {
                        tracing::warn!(goal = %goal.id, error = %err, "remote create failed, keeping local copy");
                        state.breaker.record_failure(now);
                    }
                }
            }
        }
        drop(state);

        self.notify(&goal);
        goal
    }

    /// Apply a partial update to a goal.
    ///
    /// An unknown id is a non-fatal no-op returning `None`. The local
    /// snapshot is written before any remote attempt — durability precedes
    /// network risk, so no edit is ever lost to remote unavailability.
    pub fn update_goal(&self, goal_id: &str, patch: GoalPatch) -> Option<Goal> {
        let now = self.inner.clock.now();
        let mut state = self.lock_state();
        let index = state.goals.iter().position(|g| g.id == goal_id)?;

        state.goals[index].apply(&patch, now);
        self.persist(&state.goals);
        let mut goal = state.goals[index].clone();

        if let Some(page_id) = goal.page_id.clone() {
            if state.breaker.allows_request(now) {
                match self.inner.remote.update_goal(&page_id, &goal.id, &patch) {
                    Ok(record) => {
                        state.breaker.record_success();
                        fold_remote(&mut state.goals[index], record);
                        goal = state.goals[index].clone();
                        self.persist(&state.goals);
                    }
                    Err(err) => {
                        tracing::warn!(goal = %goal.id, error = %err, "remote update failed, local edit already durable");
                        state.breaker.record_failure(now);
                    }
                }
            }
        }
        drop(state);

        self.notify(&goal);
        Some(goal)
    }

    /// Delete a goal. Local removal commits unconditionally; the remote
    /// delete is best-effort and never rolls the local deletion back.
    pub fn delete_goal(&self, goal_id: &str) -> bool {
        let now = self.inner.clock.now();
        let mut state = self.lock_state();
        let Some(index) = state.goals.iter().position(|g| g.id == goal_id) else {
            return false;
        };
        let goal = state.goals.remove(index);
        self.persist(&state.goals);

        if let Some(page_id) = &goal.page_id {
            if state.breaker.allows_request(now) {
                match self.inner.remote.delete_goal(page_id, &goal.id) {
                    Ok(()) => state.breaker.record_success(),
                    Err(err) => {
                        tracing::warn!(goal = %goal.id, error = %err, "remote delete failed, local deletion stands");
                        state.breaker.record_failure(now);
                    }
                }
            }
        }
        true
    }

    /// Persist a whole goal and write its projection back into a document.
    ///
    /// Editing must never be blocked by a sync fault: an unknown id or a
    /// projection failure returns the input unchanged instead of erroring.
    pub fn synchronize(&self, goal: Goal, document: Option<&mut dyn DocumentHandle>) -> Goal {
        let canonical = match self.update_goal(&goal.id, GoalPatch::from_goal(&goal)) {
            Some(updated) => updated,
            None => {
                tracing::debug!(goal = %goal.id, "synchronize on unknown id, nothing to do");
                return goal;
            }
        };

        if let Some(document) = document {
            if let Err(err) = nw_projection::write(document, &canonical) {
                tracing::warn!(goal = %canonical.id, error = %err, "projection write failed, returning input unchanged");
                return goal;
            }
        }
        canonical
    }

    /// Seed a goal from a projection discovered in a document.
    ///
    /// Returns `None` when the document holds no projection with that
    /// title. Dedup-by-title applies: re-importing an already-known goal
    /// updates it.
    pub fn import_from_document(
        &self,
        document: &dyn DocumentHandle,
        title: &str,
        page_id: Option<String>,
    ) -> Option<Goal> {
        let projection = nw_projection::read(document, title)?;
        Some(self.create_goal(projection.into_draft(page_id)))
    }

    /// Join any background migrations spawned by [`Self::list_goals`].
    pub fn flush_background(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut background = self
                .inner
                .background
                .lock()
                .expect("engine background lock poisoned");
            background.drain(..).collect()
        };
        for handle in handles {
            if handle.join().is_err() {
                tracing::warn!("background migration thread panicked");
            }
        }
    }

    fn spawn_migration(&self, page_id: String, goals: Vec<Goal>) {
        let engine = self.clone();
        let handle = std::thread::spawn(move || {
            for goal in goals {
                engine.migrate_one(&page_id, goal);
            }
        });
        self.inner
            .background
            .lock()
            .expect("engine background lock poisoned")
            .push(handle);
    }

    /// Push one local-only goal to the remote store and fold the
    /// server-assigned record back into the cache.
    fn migrate_one(&self, page_id: &str, goal: Goal) {
        {
            let mut state = self.lock_state();
            let now = self.inner.clock.now();
            if !state.breaker.allows_request(now) {
                return;
            }
        }

        match self.inner.remote.create_goal(page_id, &goal) {
            Ok(record) => {
                let mut state = self.lock_state();
                state.breaker.record_success();
                if let Some(stored) = state.goals.iter_mut().find(|g| g.id == goal.id) {
                    fold_remote(stored, record);
                }
                self.persist(&state.goals);
            }
            Err(err) => {
                tracing::warn!(goal = %goal.id, error = %err, "background migration failed");
                let mut state = self.lock_state();
                let now = self.inner.clock.now();
                state.breaker.record_failure(now);
            }
        }
    }

    fn notify(&self, goal: &Goal) {
        self.lock_hub().notify(goal);
    }

    /// Persistence failures are logged and swallowed; the session
    /// continues in memory.
    fn persist(&self, goals: &[Goal]) {
        if let Err(err) = self.inner.cache.save_all(goals) {
            tracing::warn!(error = %err, "cache persistence failed, continuing in memory");
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, EngineState> {
        self.inner.state.lock().expect("engine state lock poisoned")
    }

    fn lock_hub(&self) -> std::sync::MutexGuard<'_, NotificationHub> {
        self.inner.hub.lock().expect("engine hub lock poisoned")
    }
}

/// Fold a server record into the local one. The local cache is
/// authoritative: a round-trip older than the local record keeps the
/// local fields and adopts only the server-assigned id.
fn fold_remote(local: &mut Goal, record: Goal) {
    if record.updated_at >= local.updated_at {
        *local = record;
    } else {
        tracing::debug!(goal = %local.id, "stale server response, keeping local fields");
        local.id = record.id;
    }
}

/// Turn a create draft into the patch used when dedup-by-title delegates
/// to update. Empty free-text and empty lists count as "not provided" so
/// a sparse re-create cannot wipe existing content.
fn patch_from_draft(draft: &GoalDraft) -> GoalPatch {
    GoalPatch {
        page_id: draft.page_id.clone(),
        workspace_id: draft.workspace_id.clone(),
        title: Some(draft.title.clone()),
        detail: non_empty(&draft.detail),
        metrics: non_empty(&draft.metrics),
        timeline: non_empty(&draft.timeline),
        priority: draft.priority.clone(),
        status: draft.status.clone(),
        due_date: draft.due_date,
        action_items: (!draft.action_items.is_empty()).then(|| draft.action_items.clone()),
        related_files: (!draft.related_files.is_empty()).then(|| draft.related_files.clone()),
        source: draft.source.clone(),
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use nw_cache::MemorySnapshotStore;
    use nw_goal::{ActionItem, Priority, Status};
    use nw_projection::{read, MemoryDocument, MemoryNode};
    use nw_remote::{MemoryRemoteStore, RemoteError};
    use std::sync::Mutex as StdMutex;

    use crate::clock::ManualClock;

    const COOLDOWN: Duration = Duration::from_secs(60);

    struct Harness {
        engine: SyncEngine,
        cache: Arc<MemorySnapshotStore>,
        remote: Arc<MemoryRemoteStore>,
        clock: Arc<ManualClock>,
    }

    fn harness() -> Harness {
        let cache = Arc::new(MemorySnapshotStore::new());
        let remote = Arc::new(MemoryRemoteStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        ));
        let engine = SyncEngine::new(
            cache.clone(),
            remote.clone(),
            clock.clone(),
            EngineConfig {
                retry_cooldown: COOLDOWN,
            },
        );
        Harness {
            engine,
            cache,
            remote,
            clock,
        }
    }

    fn draft(title: &str) -> GoalDraft {
        GoalDraft::titled(title, "P1")
    }

    #[test]
    fn create_then_list_scenario() {
        let h = harness();
        let mut d = draft("Launch");
        d.priority = Some(Priority::High);
        h.engine.create_goal(d);

        let listed = h.engine.list_goals(&GoalFilter::for_page("P1"));
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Launch");
        assert_eq!(listed[0].priority, Priority::High);
        assert_eq!(listed[0].status, Status::InProgress);
        assert_eq!(listed[0].percent_complete, 0);
    }

    #[test]
    fn create_recomputes_percent_complete() {
        let h = harness();
        let mut d = draft("Launch");
        d.action_items = vec![
            ActionItem::new("a", true),
            ActionItem::new("b", true),
            ActionItem::new("c", false),
            ActionItem::new("d", false),
        ];
        let goal = h.engine.create_goal(d);
        assert_eq!(goal.percent_complete, 50);
    }

    #[test]
    fn duplicate_title_on_same_page_updates_instead() {
        let h = harness();
        let first = h.engine.create_goal(draft("Launch"));

        let mut second = draft("LAUNCH");
        second.detail = "updated detail".to_string();
        let merged = h.engine.create_goal(second);

        assert_eq!(merged.id, first.id);
        assert_eq!(merged.detail, "updated detail");
        assert_eq!(h.engine.list_goals(&GoalFilter::for_page("P1")).len(), 1);
        // The server side converged too: one record, updated in place.
        assert_eq!(h.remote.goals_for("P1").len(), 1);
        assert_eq!(h.remote.goals_for("P1")[0].detail, "updated detail");
    }

    #[test]
    fn same_title_on_other_page_is_a_new_goal() {
        let h = harness();
        h.engine.create_goal(draft("Launch"));
        h.engine.create_goal(GoalDraft::titled("Launch", "P2"));

        assert_eq!(h.engine.list_goals(&GoalFilter::for_page("P1")).len(), 1);
        assert_eq!(h.engine.list_goals(&GoalFilter::for_page("P2")).len(), 1);
    }

    #[test]
    fn server_assigned_id_replaces_local_without_orphan() {
        let h = harness();
        let goal = h.engine.create_goal(draft("Launch"));
        assert!(goal.id.starts_with("srv-"));

        let listed = h.engine.list_goals(&GoalFilter::for_page("P1"));
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, goal.id);
        // The cache snapshot holds exactly one record under the server id.
        let snapshot = h.cache.load_all();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, goal.id);
    }

    #[test]
    fn offline_edits_lose_nothing() {
        let h = harness();
        h.remote.set_failing(true);

        let created = h.engine.create_goal(draft("Launch"));
        assert_eq!(h.engine.availability(), AvailabilityMode::LocalOnly);

        let updated = h.engine.update_goal(
            &created.id,
            GoalPatch {
                detail: Some("offline edit".to_string()),
                priority: Some(Priority::coerce("urgent")),
                ..GoalPatch::default()
            },
        );
        assert!(updated.is_some());

        let listed = h.engine.list_goals(&GoalFilter::for_page("P1"));
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].detail, "offline edit");
        // Unrecognized priority text is kept verbatim, not rejected.
        assert_eq!(listed[0].priority.as_str(), "urgent");
        assert_eq!(h.engine.availability(), AvailabilityMode::LocalOnly);
        // Durable locally despite every remote call failing.
        assert_eq!(h.cache.load_all().len(), 1);
    }

    #[test]
    fn update_unknown_id_is_a_noop() {
        let h = harness();
        let result = h.engine.update_goal("missing", GoalPatch::default());
        assert!(result.is_none());
    }

    #[test]
    fn two_subscribers_each_get_one_ordered_notification() {
        let h = harness();
        let seen: Arc<StdMutex<Vec<&str>>> = Arc::new(StdMutex::new(Vec::new()));

        {
            let seen = Arc::clone(&seen);
            h.engine.subscribe(move |_goal: &Goal| {
                seen.lock().unwrap().push("first");
                Err(crate::SyncError::Observer("boom".to_string()))
            });
        }
        {
            let seen = Arc::clone(&seen);
            h.engine.subscribe(move |_goal: &Goal| {
                seen.lock().unwrap().push("second");
                Ok(())
            });
        }

        let goal = h.engine.create_goal(draft("Launch"));
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);

        h.engine.update_goal(&goal.id, GoalPatch::default());
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["first", "second", "first", "second"]
        );
    }

    #[test]
    fn unsubscribed_observer_hears_nothing_more() {
        let h = harness();
        let count = Arc::new(StdMutex::new(0u32));
        let id = {
            let count = Arc::clone(&count);
            h.engine.subscribe(move |_goal: &Goal| {
                *count.lock().unwrap() += 1;
                Ok(())
            })
        };

        h.engine.create_goal(draft("Launch"));
        assert!(h.engine.unsubscribe(id));
        h.engine.create_goal(draft("Another"));

        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn breaker_skips_remote_until_cooldown_then_recovers() {
        let h = harness();
        let goal = h.engine.create_goal(draft("Launch"));

        h.remote.set_failing(true);
        h.engine.update_goal(&goal.id, GoalPatch::default());
        assert_eq!(h.engine.availability(), AvailabilityMode::LocalOnly);
        let calls_after_failure = h.remote.calls().len();

        // Inside the cooldown remote calls are skipped entirely.
        h.engine.update_goal(&goal.id, GoalPatch::default());
        assert_eq!(h.remote.calls().len(), calls_after_failure);

        // After the cooldown the next call probes and recovers.
        h.remote.set_failing(false);
        h.clock.advance(Duration::from_secs(61));
        h.engine.update_goal(&goal.id, GoalPatch::default());
        assert!(h.remote.calls().len() > calls_after_failure);
        assert_eq!(h.engine.availability(), AvailabilityMode::Remote);
    }

    #[test]
    fn delete_commits_locally_even_when_remote_fails() {
        let h = harness();
        let goal = h.engine.create_goal(draft("Launch"));

        h.remote.set_failing(true);
        assert!(h.engine.delete_goal(&goal.id));
        assert!(h.engine.list_goals(&GoalFilter::for_page("P1")).is_empty());
        assert_eq!(h.engine.availability(), AvailabilityMode::LocalOnly);
        // The server copy lingers until connectivity returns; local
        // deletion is never rolled back on remote failure.
        assert_eq!(h.remote.goals_for("P1").len(), 1);
    }

    #[test]
    fn delete_unknown_id_returns_false() {
        let h = harness();
        assert!(!h.engine.delete_goal("missing"));
    }

    #[test]
    fn orphaned_local_goals_migrate_when_server_page_is_empty() {
        let h = harness();
        h.remote.set_failing(true);
        let local = h.engine.create_goal(draft("Launch"));
        assert_eq!(h.engine.availability(), AvailabilityMode::LocalOnly);

        h.remote.set_failing(false);
        h.clock.advance(Duration::from_secs(61));

        // Server page is empty, local page is not: migration kicks off
        // without blocking the listing.
        let listed = h.engine.list_goals(&GoalFilter::for_page("P1"));
        assert_eq!(listed.len(), 1);
        h.engine.flush_background();

        assert_eq!(h.remote.goals_for("P1").len(), 1);
        // The server id replaced the local one — no duplicate left behind.
        let after = h.engine.list_goals(&GoalFilter::for_page("P1"));
        assert_eq!(after.len(), 1);
        assert!(after[0].id.starts_with("srv-"));
        assert_ne!(after[0].id, local.id);
    }

    #[test]
    fn list_without_page_filter_never_calls_remote() {
        let h = harness();
        h.engine.create_goal(GoalDraft {
            title: "No page".to_string(),
            ..GoalDraft::default()
        });
        let calls_before = h.remote.calls().len();
        let listed = h.engine.list_goals(&GoalFilter::default());
        assert_eq!(listed.len(), 1);
        assert_eq!(h.remote.calls().len(), calls_before);
    }

    #[test]
    fn goal_without_page_skips_remote_and_stays_remote_mode() {
        let h = harness();
        let goal = h.engine.create_goal(GoalDraft {
            title: "Scratch goal".to_string(),
            ..GoalDraft::default()
        });
        assert!(h.remote.calls().is_empty());
        assert_eq!(h.engine.availability(), AvailabilityMode::Remote);
        assert!(!goal.id.starts_with("srv-"));
    }

    #[test]
    fn synchronize_updates_cache_and_document() {
        let h = harness();
        let mut goal = h.engine.create_goal(draft("Launch"));

        let mut doc = MemoryDocument::new(vec![MemoryNode::table(vec![
            vec!["Goal", "Priority", "Due", "Status", "Detail"],
            vec!["Launch", "", "", "", "old detail"],
        ])]);

        goal.detail = "fresh detail".to_string();
        goal.priority = Priority::Critical;
        let canonical = h.engine.synchronize(goal, Some(&mut doc));

        assert_eq!(canonical.detail, "fresh detail");
        let projection = read(&doc, "Launch").unwrap();
        assert_eq!(projection.detail.as_deref(), Some("fresh detail"));
        assert_eq!(projection.priority, Some(Priority::Critical));
    }

    #[test]
    fn synchronize_unknown_id_returns_input_unchanged() {
        let h = harness();
        let goal = Goal::from_draft(draft("Never created"), h.clock.now());
        let result = h.engine.synchronize(goal.clone(), None);
        assert_eq!(result, goal);
    }

    #[test]
    fn import_from_document_seeds_fields() {
        let h = harness();
        let doc = MemoryDocument::new(vec![MemoryNode::table(vec![
            vec!["Goal", "Priority", "Due", "Status", "Detail"],
            vec!["Launch", "High", "2026-03-01", "Blocked", "from the doc"],
        ])]);

        let goal = h
            .engine
            .import_from_document(&doc, "Launch", Some("P1".to_string()))
            .unwrap();
        assert_eq!(goal.priority, Priority::High);
        assert_eq!(goal.status, Status::Blocked);
        assert_eq!(goal.detail, "from the doc");
        assert_eq!(goal.page_id.as_deref(), Some("P1"));

        assert!(h
            .engine
            .import_from_document(&doc, "Nonexistent", None)
            .is_none());
    }

    /// A remote whose update responses are always one step behind, as a
    /// slow server round-trip would be.
    struct StaleRemote;

    impl RemoteStore for StaleRemote {
        fn list_goals(&self, _page_id: &str) -> Result<Vec<Goal>, RemoteError> {
            Ok(Vec::new())
        }

        fn create_goal(&self, _page_id: &str, goal: &Goal) -> Result<Goal, RemoteError> {
            let mut record = goal.clone();
            record.id = "srv-1".to_string();
            Ok(record)
        }

        fn update_goal(
            &self,
            _page_id: &str,
            goal_id: &str,
            _patch: &GoalPatch,
        ) -> Result<Goal, RemoteError> {
            let mut record = Goal::from_draft(
                GoalDraft::titled("Launch", "P1"),
                Utc.timestamp_opt(0, 0).unwrap(),
            );
            record.id = goal_id.to_string();
            record.detail = "stale server copy".to_string();
            Ok(record)
        }

        fn delete_goal(&self, _page_id: &str, _goal_id: &str) -> Result<(), RemoteError> {
            Ok(())
        }
    }

    #[test]
    fn stale_server_response_cannot_overwrite_newer_local_edit() {
        let cache = Arc::new(MemorySnapshotStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        ));
        let engine = SyncEngine::new(
            cache,
            Arc::new(StaleRemote),
            clock.clone(),
            EngineConfig::default(),
        );

        let goal = engine.create_goal(draft("Launch"));
        clock.advance(Duration::from_secs(10));

        let updated = engine
            .update_goal(
                &goal.id,
                GoalPatch {
                    detail: Some("newer local edit".to_string()),
                    ..GoalPatch::default()
                },
            )
            .unwrap();

        // The server echoed an epoch-old record; local fields win.
        assert_eq!(updated.detail, "newer local edit");
    }
}
