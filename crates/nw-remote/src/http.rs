// http.rs — HttpRemoteStore: blocking HTTP adapter for the remote store.
//
// Routes, relative to the configured base URL:
//
//   GET    /pages/{page_id}/goals
//   POST   /pages/{page_id}/goals
//   PATCH  /pages/{page_id}/goals/{goal_id}
//   DELETE /pages/{page_id}/goals/{goal_id}
//
// Every failure maps onto RemoteError; callers never see reqwest types.

use std::time::Duration;

use nw_goal::{Goal, GoalPatch};
use reqwest::blocking::{Client, RequestBuilder, Response};

use crate::client::RemoteStore;
use crate::error::RemoteError;

/// Request timeout. Unreachability is detected by call failure, so this
/// only bounds how long a dead connection can stall one sync attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Blocking HTTP client for the remote goal store.
pub struct HttpRemoteStore {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpRemoteStore {
    /// Create a client for the given endpoint. `token`, when present, is
    /// sent as a bearer credential on every request.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn goals_url(&self, page_id: &str) -> String {
        format!("{}/pages/{}/goals", self.base_url, page_id)
    }

    fn goal_url(&self, page_id: &str, goal_id: &str) -> String {
        format!("{}/pages/{}/goals/{}", self.base_url, page_id, goal_id)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = self
            .authorize(request)
            .send()
            .map_err(|err| RemoteError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RemoteError::Status {
                code: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    fn decode_goal(response: Response) -> Result<Goal, RemoteError> {
        response
            .json::<Goal>()
            .map_err(|err| RemoteError::Decode(err.to_string()))
    }
}

impl RemoteStore for HttpRemoteStore {
    fn list_goals(&self, page_id: &str) -> Result<Vec<Goal>, RemoteError> {
        let response = self.send(self.client.get(self.goals_url(page_id)))?;
        response
            .json::<Vec<Goal>>()
            .map_err(|err| RemoteError::Decode(err.to_string()))
    }

    fn create_goal(&self, page_id: &str, goal: &Goal) -> Result<Goal, RemoteError> {
        let response = self.send(self.client.post(self.goals_url(page_id)).json(goal))?;
        Self::decode_goal(response)
    }

    fn update_goal(
        &self,
        page_id: &str,
        goal_id: &str,
        patch: &GoalPatch,
    ) -> Result<Goal, RemoteError> {
        let response = self.send(
            self.client
                .patch(self.goal_url(page_id, goal_id))
                .json(patch),
        )?;
        Self::decode_goal(response)
    }

    fn delete_goal(&self, page_id: &str, goal_id: &str) -> Result<(), RemoteError> {
        self.send(self.client.delete(self.goal_url(page_id, goal_id)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_page_scoped() {
        let store = HttpRemoteStore::new("https://api.notewell.dev/v1/", None);
        assert_eq!(
            store.goals_url("P1"),
            "https://api.notewell.dev/v1/pages/P1/goals"
        );
        assert_eq!(
            store.goal_url("P1", "g-7"),
            "https://api.notewell.dev/v1/pages/P1/goals/g-7"
        );
    }
}
