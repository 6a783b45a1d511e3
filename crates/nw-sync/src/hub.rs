// hub.rs — Notification hub: fan-out of goal changes to observers.
//
// Every successful create/update delivers exactly one notification with
// the final canonical goal to all current observers, in subscription
// order. An observer's failure is logged and must not block delivery to
// the rest. Best-effort, at-most-once, in-memory only — nothing here
// survives a restart.

use nw_goal::Goal;

use crate::error::SyncError;

/// Handle returned by subscribe; pass it back to unsubscribe.
pub type ObserverId = u64;

/// Receives the canonical goal after each successful create/update.
///
/// Implemented for closures, so
/// `hub.subscribe(|goal: &Goal| { ...; Ok(()) })` works directly.
pub trait GoalObserver: Send {
    fn goal_changed(&self, goal: &Goal) -> Result<(), SyncError>;
}

impl<F> GoalObserver for F
where
    F: Fn(&Goal) -> Result<(), SyncError> + Send,
{
    fn goal_changed(&self, goal: &Goal) -> Result<(), SyncError> {
        self(goal)
    }
}

/// Ordered observer registry.
pub struct NotificationHub {
    next_id: ObserverId,
    observers: Vec<(ObserverId, Box<dyn GoalObserver>)>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            observers: Vec::new(),
        }
    }

    /// Register an observer. Delivery order is subscription order.
    pub fn subscribe(&mut self, observer: impl GoalObserver + 'static) -> ObserverId {
        self.next_id += 1;
        let id = self.next_id;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns false for an unknown id.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    /// Deliver `goal` to every observer, in order. Errors are logged and
    /// skipped.
    pub fn notify(&self, goal: &Goal) {
        for (id, observer) in &self.observers {
            if let Err(err) = observer.goal_changed(goal) {
                tracing::warn!(observer = id, goal = %goal.id, error = %err, "observer failed");
            }
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nw_goal::GoalDraft;
    use std::sync::{Arc, Mutex};

    fn goal() -> Goal {
        Goal::from_draft(GoalDraft::titled("Launch", "P1"), Utc::now())
    }

    #[test]
    fn delivers_in_subscription_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut hub = NotificationHub::new();

        for label in ["first", "second", "third"] {
            let seen = Arc::clone(&seen);
            hub.subscribe(move |_goal: &Goal| {
                seen.lock().unwrap().push(label);
                Ok(())
            });
        }

        hub.notify(&goal());
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn failing_observer_does_not_block_the_rest() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut hub = NotificationHub::new();

        {
            let seen = Arc::clone(&seen);
            hub.subscribe(move |_goal: &Goal| {
                seen.lock().unwrap().push("failing");
                Err(SyncError::Observer("boom".to_string()))
            });
        }
        {
            let seen = Arc::clone(&seen);
            hub.subscribe(move |_goal: &Goal| {
                seen.lock().unwrap().push("healthy");
                Ok(())
            });
        }

        hub.notify(&goal());
        assert_eq!(*seen.lock().unwrap(), vec!["failing", "healthy"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let seen = Arc::new(Mutex::new(0u32));
        let mut hub = NotificationHub::new();

        let id = {
            let seen = Arc::clone(&seen);
            hub.subscribe(move |_goal: &Goal| {
                *seen.lock().unwrap() += 1;
                Ok(())
            })
        };

        hub.notify(&goal());
        assert!(hub.unsubscribe(id));
        assert!(!hub.unsubscribe(id));
        hub.notify(&goal());

        assert_eq!(*seen.lock().unwrap(), 1);
    }
}
