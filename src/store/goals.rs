//! Business goal persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::Store;

/// A user-defined business goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Unique id (UUID v4, assigned on creation).
    pub id: String,
    /// Owning session.
    pub session_id: String,
    /// Goal text.
    pub text: String,
    /// Whether the goal is done.
    #[serde(default)]
    pub completed: bool,
    /// Creation time; goals list in this order.
    pub created_at: DateTime<Utc>,
}

/// Cache key of a session's goals.
pub fn goals_key(session_id: &str) -> String {
    format!("goals_{session_id}")
}

impl Store {
    /// Create an incomplete goal and return it.
    pub async fn add_goal(&self, session_id: &str, text: &str) -> Goal {
        let goal = Goal {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_owned(),
            text: text.to_owned(),
            completed: false,
            created_at: Utc::now(),
        };
        self.attempt("add goal", self.backend.insert_goal(&goal))
            .await;
        self.update_local_goals(session_id, |goals| goals.push(goal.clone()))
            .await;
        info!(session_id, goal_id = %goal.id, "goal added");
        goal
    }

    /// Goals of a session in creation order.
    pub async fn fetch_goals(&self, session_id: &str) -> Vec<Goal> {
        let _guard = self.list_lock.lock().await;
        let mut goals = self
            .resilient_fetch(
                "fetch goals",
                &goals_key(session_id),
                Vec::new(),
                self.backend.goals(session_id),
            )
            .await;
        goals.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        goals
    }

    /// Set a goal's completion flag.
    pub async fn set_goal_completed(&self, session_id: &str, goal_id: &str, completed: bool) {
        self.attempt(
            "update goal",
            self.backend.set_goal_completed(goal_id, completed),
        )
        .await;
        self.update_local_goals(session_id, |goals| {
            for goal in goals.iter_mut().filter(|g| g.id == goal_id) {
                goal.completed = completed;
            }
        })
        .await;
        debug!(session_id, goal_id, completed, "goal updated");
    }

    /// Flip a goal's completion flag and return the updated goal.
    ///
    /// Returns `None` if no goal with `goal_id` is known.
    pub async fn toggle_goal(&self, session_id: &str, goal_id: &str) -> Option<Goal> {
        let goal = self
            .fetch_goals(session_id)
            .await
            .into_iter()
            .find(|g| g.id == goal_id)?;
        let completed = !goal.completed;
        self.set_goal_completed(session_id, goal_id, completed)
            .await;
        Some(Goal { completed, ..goal })
    }

    /// Delete a goal.
    pub async fn remove_goal(&self, session_id: &str, goal_id: &str) {
        self.attempt("remove goal", self.backend.delete_goal(goal_id))
            .await;
        self.update_local_goals(session_id, |goals| goals.retain(|g| g.id != goal_id))
            .await;
        info!(session_id, goal_id, "goal removed");
    }

    async fn update_local_goals<F>(&self, session_id: &str, update: F)
    where
        F: FnOnce(&mut Vec<Goal>),
    {
        let _guard = self.list_lock.lock().await;
        let key = goals_key(session_id);
        let mut goals: Vec<Goal> = self.recall(&key).await.unwrap_or_default();
        update(&mut goals);
        self.mirror(&key, &goals).await;
    }
}
