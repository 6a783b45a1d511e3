// goal.rs — Goal subcommands: create, list, show, update, delete.

use anyhow::{anyhow, bail};
use chrono::NaiveDate;
use clap::Subcommand;

use nw_goal::{GoalDraft, GoalPatch, Priority, Status};
use nw_sync::{GoalFilter, SyncEngine};

use crate::config::WorkspaceConfig;

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a goal. A title already on the page updates that goal.
    Create {
        /// Goal title (e.g., "Launch the beta").
        title: String,
        /// Owning page (defaults to the configured page).
        #[arg(long)]
        page: Option<String>,
        /// Detailed description.
        #[arg(long, default_value = "")]
        detail: String,
        /// Priority (Critical, High, Medium, Low, Not Set).
        #[arg(long)]
        priority: Option<String>,
        /// Status (Not Started, In Progress, Completed, Blocked).
        #[arg(long)]
        status: Option<String>,
        /// Due date (YYYY-MM-DD).
        #[arg(long)]
        due: Option<String>,
    },
    /// List goals.
    List {
        /// Filter by page.
        #[arg(long)]
        page: Option<String>,
        /// Filter by workspace.
        #[arg(long)]
        workspace: Option<String>,
    },
    /// Show details for a specific goal.
    Show {
        /// Goal id.
        id: String,
    },
    /// Update fields on a goal.
    Update {
        /// Goal id.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        detail: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        status: Option<String>,
        /// Due date (YYYY-MM-DD).
        #[arg(long)]
        due: Option<String>,
        /// Mark the action item at this index (from `show`) complete.
        #[arg(long)]
        check: Option<usize>,
        /// Mark the action item at this index incomplete.
        #[arg(long)]
        uncheck: Option<usize>,
    },
    /// Delete a goal.
    Delete {
        /// Goal id.
        id: String,
    },
}

pub fn execute(
    cmd: &GoalCommands,
    engine: &SyncEngine,
    config: &WorkspaceConfig,
) -> anyhow::Result<()> {
    match cmd {
        GoalCommands::Create {
            title,
            page,
            detail,
            priority,
            status,
            due,
        } => create_goal(
            engine,
            config,
            title,
            page.as_deref(),
            detail,
            priority.as_deref(),
            status.as_deref(),
            due.as_deref(),
        ),
        GoalCommands::List { page, workspace } => {
            list_goals(engine, page.as_deref(), workspace.as_deref())
        }
        GoalCommands::Show { id } => show_goal(engine, id),
        GoalCommands::Update {
            id,
            title,
            detail,
            priority,
            status,
            due,
            check,
            uncheck,
        } => update_goal(
            engine,
            id,
            title.as_deref(),
            detail.as_deref(),
            priority.as_deref(),
            status.as_deref(),
            due.as_deref(),
            *check,
            *uncheck,
        ),
        GoalCommands::Delete { id } => delete_goal(engine, id),
    }
}

fn parse_due(due: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(due, "%Y-%m-%d")
        .map_err(|_| anyhow!("due date must be YYYY-MM-DD, got '{}'", due))
}

#[allow(clippy::too_many_arguments)]
fn create_goal(
    engine: &SyncEngine,
    config: &WorkspaceConfig,
    title: &str,
    page: Option<&str>,
    detail: &str,
    priority: Option<&str>,
    status: Option<&str>,
    due: Option<&str>,
) -> anyhow::Result<()> {
    let page_id = page
        .map(|p| p.to_string())
        .or_else(|| config.page_id.clone());

    let draft = GoalDraft {
        title: title.to_string(),
        page_id,
        detail: detail.to_string(),
        priority: priority.map(Priority::coerce),
        status: status.map(Status::coerce),
        due_date: due.map(parse_due).transpose()?,
        ..GoalDraft::default()
    };

    let goal = engine.create_goal(draft);
    println!("Goal saved: {}", goal.id);
    println!("  Title:    {}", goal.title);
    println!("  Priority: {}", goal.priority);
    println!("  Status:   {}", goal.status);
    if let Some(page) = &goal.page_id {
        println!("  Page:     {}", page);
    }
    println!("  Sync:     {}", engine.availability());
    Ok(())
}

fn list_goals(
    engine: &SyncEngine,
    page: Option<&str>,
    workspace: Option<&str>,
) -> anyhow::Result<()> {
    let filter = GoalFilter {
        page_id: page.map(|p| p.to_string()),
        workspace_id: workspace.map(|w| w.to_string()),
    };
    let goals = engine.list_goals(&filter);

    if goals.is_empty() {
        println!("No goals found.");
        return Ok(());
    }

    println!(
        "{:<38} {:<28} {:<10} {:<14} {:>4}",
        "ID", "TITLE", "PRIORITY", "STATUS", "%"
    );
    println!("{}", "-".repeat(98));
    for g in &goals {
        println!(
            "{:<38} {:<28} {:<10} {:<14} {:>4}",
            truncate(&g.id, 36),
            truncate(&g.title, 26),
            truncate(g.priority.as_str(), 10),
            truncate(g.status.as_str(), 14),
            g.percent_complete,
        );
    }
    println!(
        "\n{} goal(s) total. Sync: {}",
        goals.len(),
        engine.availability()
    );
    Ok(())
}

fn show_goal(engine: &SyncEngine, id: &str) -> anyhow::Result<()> {
    let Some(g) = engine.get_goal(id) else {
        bail!("goal not found: {}", id);
    };

    println!("Goal:     {}", g.id);
    println!("Title:    {}", g.title);
    println!("Priority: {}", g.priority);
    println!("Status:   {}", g.status);
    println!("Progress: {}%", g.percent_complete);
    if let Some(page) = &g.page_id {
        println!("Page:     {}", page);
    }
    if let Some(due) = g.due_date {
        println!("Due:      {}", due);
    }
    if !g.detail.is_empty() {
        println!("Detail:   {}", g.detail);
    }
    if !g.metrics.is_empty() {
        println!("Metrics:  {}", g.metrics);
    }
    if !g.timeline.is_empty() {
        println!("Timeline: {}", g.timeline);
    }
    if !g.action_items.is_empty() {
        println!("Action plan:");
        for (index, item) in g.action_items.iter().enumerate() {
            let mark = if item.completed { "x" } else { " " };
            println!("  {:>2}. [{}] {}", index, mark, item.text);
        }
    }
    if !g.related_files.is_empty() {
        println!("Related files:");
        for file in &g.related_files {
            println!("  {} <{}>", file.name, file.url);
        }
    }
    println!("Created:  {}", g.created_at.to_rfc3339());
    println!("Updated:  {}", g.updated_at.to_rfc3339());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn update_goal(
    engine: &SyncEngine,
    id: &str,
    title: Option<&str>,
    detail: Option<&str>,
    priority: Option<&str>,
    status: Option<&str>,
    due: Option<&str>,
    check: Option<usize>,
    uncheck: Option<usize>,
) -> anyhow::Result<()> {
    let mut patch = GoalPatch {
        title: title.map(|t| t.to_string()),
        detail: detail.map(|d| d.to_string()),
        priority: priority.map(Priority::coerce),
        status: status.map(Status::coerce),
        due_date: due.map(parse_due).transpose()?,
        ..GoalPatch::default()
    };

    if check.is_some() || uncheck.is_some() {
        let Some(goal) = engine.get_goal(id) else {
            bail!("goal not found: {}", id);
        };
        let mut items = goal.action_items;
        for (index, completed) in [(check, true), (uncheck, false)] {
            if let Some(index) = index {
                let item = items
                    .get_mut(index)
                    .ok_or_else(|| anyhow!("no action item at index {}", index))?;
                item.completed = completed;
            }
        }
        patch.action_items = Some(items);
    }

    match engine.update_goal(id, patch) {
        Some(goal) => {
            println!("Goal updated: {} ({}%)", goal.id, goal.percent_complete);
            println!("  Sync: {}", engine.availability());
            Ok(())
        }
        None => bail!("goal not found: {}", id),
    }
}

fn delete_goal(engine: &SyncEngine, id: &str) -> anyhow::Result<()> {
    if engine.delete_goal(id) {
        println!("Deleted goal: {}", id);
        Ok(())
    } else {
        bail!("goal not found: {}", id)
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() > max {
        format!("{}...", &s[..max - 3])
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use nw_cache::MemorySnapshotStore;
    use nw_goal::ActionItem;
    use nw_remote::MemoryRemoteStore;
    use nw_sync::{EngineConfig, SystemClock};

    fn test_engine() -> SyncEngine {
        SyncEngine::new(
            Arc::new(MemorySnapshotStore::new()),
            Arc::new(MemoryRemoteStore::new()),
            Arc::new(SystemClock),
            EngineConfig::default(),
        )
    }

    fn test_config() -> WorkspaceConfig {
        let mut config = WorkspaceConfig::for_dir("/tmp/unused");
        config.page_id = Some("P1".to_string());
        config
    }

    #[test]
    fn create_uses_configured_page_and_tolerant_enums() {
        let engine = test_engine();
        let config = test_config();

        create_goal(
            &engine,
            &config,
            "Launch",
            None,
            "ship it",
            Some("high"),
            Some("somewhere odd"),
            Some("2026-03-01"),
        )
        .unwrap();

        let goals = engine.list_goals(&GoalFilter::for_page("P1"));
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].priority, Priority::High);
        // Drifted status text is stored verbatim.
        assert_eq!(goals[0].status.as_str(), "somewhere odd");
        assert_eq!(
            goals[0].due_date,
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
    }

    #[test]
    fn create_rejects_malformed_due_date() {
        let engine = test_engine();
        let config = test_config();

        let result = create_goal(
            &engine,
            &config,
            "Launch",
            None,
            "",
            None,
            None,
            Some("next tuesday"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn update_check_toggles_action_item() {
        let engine = test_engine();
        let goal = engine.create_goal(GoalDraft {
            title: "Launch".to_string(),
            page_id: Some("P1".to_string()),
            action_items: vec![
                ActionItem::new("write docs", false),
                ActionItem::new("ship", false),
            ],
            ..GoalDraft::default()
        });

        update_goal(
            &engine, &goal.id, None, None, None, None, None,
            Some(0), None,
        )
        .unwrap();

        let updated = engine.get_goal(&goal.id).unwrap();
        assert!(updated.action_items[0].completed);
        assert_eq!(updated.percent_complete, 50);
    }

    #[test]
    fn update_unknown_goal_errors() {
        let engine = test_engine();
        let result = update_goal(
            &engine, "missing", Some("x"), None, None, None, None, None, None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn delete_round_trip() {
        let engine = test_engine();
        let goal = engine.create_goal(GoalDraft::titled("Launch", "P1"));
        delete_goal(&engine, &goal.id).unwrap();
        assert!(delete_goal(&engine, &goal.id).is_err());
    }
}
