//! Scripted squad sessions
//!
//! A scenario is a TOML file describing the local account, optional settings
//! and a list of steps:
//!
//! ```toml
//! self_account = "Me.1234"
//!
//! [settings]
//! ready_check_nag = true
//! ready_check_nag_interval_seconds = 2.0
//!
//! [[steps]]
//! kind = "batch"
//! users = [
//!     { account = "Lead.1", role = "squad_leader", ready = true },
//! ]
//!
//! [[steps]]
//! kind = "advance"
//! secs = 2.5
//!
//! [[steps]]
//! kind = "tick"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use squad_ready_core::{Notification, Settings, UserUpdate};

use crate::context::CliContext;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    Batch {
        #[serde(default)]
        users: Vec<UserUpdate>,
    },
    Advance {
        secs: f32,
    },
    Tick,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub self_account: Option<String>,
    #[serde(default)]
    pub settings: Option<Settings>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Outcome of a replay: notifications tagged with the 1-based step that raised them
#[derive(Debug, Default, PartialEq)]
pub struct ReplayReport {
    pub steps: usize,
    pub notifications: Vec<(usize, Notification)>,
}

impl Scenario {
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        Self::parse(&contents).map_err(|e| format!("{}: {}", path.display(), e))
    }

    pub fn parse(contents: &str) -> Result<Self, String> {
        let scenario: Self = toml::from_str(contents).map_err(|e| e.to_string())?;
        for (i, step) in scenario.steps.iter().enumerate() {
            if let Step::Advance { secs } = step
                && !(secs.is_finite() && *secs >= 0.0)
            {
                return Err(format!("step {}: invalid advance of {}s", i + 1, secs));
            }
        }
        Ok(scenario)
    }

    /// Run against a fresh tracker with a virtual clock
    pub fn run(&self) -> ReplayReport {
        let ctx = CliContext::with_settings(self.settings.clone().unwrap_or_default());
        if let Some(name) = &self.self_account {
            ctx.tracker.set_self_account(name);
        }

        let mut report = ReplayReport {
            steps: self.steps.len(),
            ..ReplayReport::default()
        };

        for (i, step) in self.steps.iter().enumerate() {
            let raised = match step {
                Step::Batch { users } => ctx.tracker.update_users_at(users, ctx.clock.now()),
                Step::Advance { secs } => {
                    match Duration::try_from_secs_f32(*secs) {
                        Ok(by) => ctx.clock.advance(by),
                        Err(e) => tracing::warn!(step = i + 1, secs, error = %e, "skipping advance"),
                    }
                    Vec::new()
                }
                Step::Tick => ctx.tracker.tick_at(ctx.clock.now()).into_iter().collect(),
            };
            report
                .notifications
                .extend(raised.into_iter().map(|n| (i + 1, n)));
        }

        tracing::debug!(
            steps = report.steps,
            notifications = report.notifications.len(),
            "scenario replayed"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAG_SESSION: &str = r#"
self_account = ":Me.1234"

[settings]
ready_check_nag = true
ready_check_nag_interval_seconds = 2.0

[[steps]]
kind = "batch"
users = [
    { account = "Lead.1", role = "squad_leader", ready = false },
    { account = ":Me.1234", role = "member", ready = false, subgroup = 1 },
    { account = "Pug.9", role = "invited", ready = false },
]

[[steps]]
kind = "batch"
users = [{ account = "Lead.1", role = "squad_leader", ready = true }]

[[steps]]
kind = "advance"
secs = 1.0

[[steps]]
kind = "tick"

[[steps]]
kind = "advance"
secs = 1.5

[[steps]]
kind = "tick"

[[steps]]
kind = "batch"
users = [{ account = "Me.1234", role = "member", ready = true, subgroup = 1 }]

[[steps]]
kind = "tick"
"#;

    #[test]
    fn test_nag_session() {
        let scenario = Scenario::parse(NAG_SESSION).unwrap();
        let report = scenario.run();

        assert_eq!(report.steps, 8);
        assert_eq!(
            report.notifications,
            vec![
                (2, Notification::ReadyCheckStarted),
                (6, Notification::Nag),
                (7, Notification::SquadReady),
            ]
        );
    }

    #[test]
    fn test_defaults_without_settings() {
        let scenario = Scenario::parse(
            r#"
[[steps]]
kind = "batch"
users = [{ account = "Lead.1", role = "squad_leader" }]

[[steps]]
kind = "batch"
users = [{ account = "Lead.1", role = "squad_leader", ready = true }]

[[steps]]
kind = "advance"
secs = 60.0

[[steps]]
kind = "tick"
"#,
        )
        .unwrap();

        // Nag is off by default
        assert_eq!(
            scenario.run().notifications,
            vec![(2, Notification::ReadyCheckStarted)]
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(Scenario::parse("[[steps]]\nkind = \"advance\"\nsecs = -1.0\n").is_err());
        assert!(Scenario::parse("[[steps]]\nkind = \"jump\"\n").is_err());
        assert!(Scenario::from_path(Path::new("no/such/scenario.toml")).is_err());
    }
}
