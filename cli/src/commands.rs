use std::io::Write;
use std::path::Path;
use std::time::Duration;

use clap::ValueEnum;
use squad_ready_core::{Notification, UserRole, UserUpdate};

use crate::context::CliContext;
use crate::scenario::Scenario;

/// Role names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Leader,
    Lieutenant,
    Member,
    Invited,
    Applied,
    None,
}

impl From<RoleArg> for UserRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Leader => UserRole::SquadLeader,
            RoleArg::Lieutenant => UserRole::Lieutenant,
            RoleArg::Member => UserRole::Member,
            RoleArg::Invited => UserRole::Invited,
            RoleArg::Applied => UserRole::Applied,
            RoleArg::None => UserRole::None,
        }
    }
}

pub fn set_self_account(ctx: &CliContext, name: &str) {
    if ctx.tracker.set_self_account(name) {
        println!("self account: {}", name);
    } else {
        println!(
            "self account already set to {}",
            ctx.tracker.self_account().as_deref().unwrap_or("<none>")
        );
    }
}

/// Subgroup is 1-based on the command line, like the squad UI
pub fn upsert(
    ctx: &CliContext,
    account: &str,
    role: RoleArg,
    ready: bool,
    subgroup: u8,
) -> Vec<Notification> {
    let update = UserUpdate::new(account, role.into(), ready).with_subgroup(subgroup.saturating_sub(1));
    let notifications = ctx.tracker.update_users_at(&[update], ctx.clock.now());
    print_notifications(&notifications);
    notifications
}

pub fn remove(ctx: &CliContext, account: &str) -> Vec<Notification> {
    let notifications = ctx
        .tracker
        .update_users_at(&[UserUpdate::removal(account)], ctx.clock.now());
    print_notifications(&notifications);
    notifications
}

pub fn advance(ctx: &CliContext, secs: f32) -> Result<(), String> {
    let by = Duration::try_from_secs_f32(secs).map_err(|e| format!("invalid duration {secs}: {e}"))?;
    ctx.clock.advance(by);
    println!("clock: +{:.1}s", ctx.clock.elapsed().as_secs_f32());
    Ok(())
}

pub fn tick(ctx: &CliContext) -> Option<Notification> {
    let notification = ctx.tracker.tick_at(ctx.clock.now());
    match notification {
        Some(n) => print_notifications(&[n]),
        None => println!("nothing due"),
    }
    notification
}

pub fn set_nag(ctx: &CliContext, enabled: bool, interval: Option<f32>) {
    ctx.settings.update(|s| {
        s.ready_check_nag = enabled;
        if let Some(interval) = interval {
            s.ready_check_nag_interval_seconds = interval;
        }
    });
    let (enabled, interval) =
        ctx.settings.read(|s| (s.ready_check_nag, s.ready_check_nag_interval_seconds));
    println!("nag: enabled={} interval={}s", enabled, interval);
}

pub fn show_status(ctx: &CliContext) {
    let info = ctx.tracker.debug_info_at(ctx.clock.now());

    println!(
        "self: {}",
        info.self_account.as_deref().unwrap_or("<unknown>")
    );
    println!(
        "ready check: {}  self ready: {}",
        if info.in_ready_check { "in progress" } else { "idle" },
        info.self_readied
    );
    if let Some(elapsed) = info.ready_check_elapsed_secs {
        println!("elapsed: {:.1}s", elapsed);
    }
    if let Some(until) = info.time_until_nag_secs {
        println!("next nag in: {:.1}s", until);
    }
    println!(
        "ready: {}/{}",
        info.ready_count(),
        info.member_count()
    );

    if info.members.is_empty() {
        println!("No squad members");
        return;
    }

    println!("{:<30} {:<12} {:<6} Ready", "Account", "Role", "Group");
    println!("{}", "-".repeat(56));
    for member in &info.members {
        println!(
            "{:<30} {:<12} {:<6} {}",
            member.account,
            member.role.label(),
            member.subgroup,
            if member.ready { "yes" } else { "no" }
        );
    }
}

pub fn replay(path: &str) -> Result<(), String> {
    let scenario = Scenario::from_path(Path::new(path))?;
    let report = scenario.run();
    println!(
        "replayed {} steps: {} notifications",
        report.steps,
        report.notifications.len()
    );
    for (step, notification) in &report.notifications {
        println!("  step {:>3}: {:?}", step, notification);
    }
    Ok(())
}

pub fn exit() -> Result<(), String> {
    write!(std::io::stdout(), "quitting...").map_err(|e| e.to_string())?;
    std::io::stdout().flush().map_err(|e| e.to_string())
}

fn print_notifications(notifications: &[Notification]) {
    for notification in notifications {
        let text = match notification {
            Notification::ReadyCheckStarted => "ready check started",
            Notification::SquadReady => "squad ready",
            Notification::Nag => "nag",
        };
        println!("{}", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_and_complete_from_commands() {
        let ctx = CliContext::new();
        set_self_account(&ctx, "Me.1234");

        upsert(&ctx, "Lead.1", RoleArg::Leader, false, 1);
        upsert(&ctx, "Me.1234", RoleArg::Member, false, 2);
        assert_eq!(
            upsert(&ctx, "Lead.1", RoleArg::Leader, true, 1),
            vec![Notification::ReadyCheckStarted]
        );
        assert_eq!(
            upsert(&ctx, "Me.1234", RoleArg::Member, true, 2),
            vec![Notification::SquadReady]
        );
        assert_eq!(
            ctx.printer.take(),
            vec!["flash", "ready check cue", "flash", "squad ready cue"]
        );

        let info = ctx.tracker.debug_info_at(ctx.clock.now());
        assert_eq!(info.members[1].subgroup, 2);
    }

    #[test]
    fn test_nag_follows_virtual_clock() {
        let ctx = CliContext::new();
        set_self_account(&ctx, "Me.1234");
        set_nag(&ctx, true, Some(2.0));

        upsert(&ctx, "Lead.1", RoleArg::Leader, false, 1);
        upsert(&ctx, "Me.1234", RoleArg::Member, false, 1);
        upsert(&ctx, "Lead.1", RoleArg::Leader, true, 1);
        ctx.printer.take();

        advance(&ctx, 1.0).unwrap();
        assert_eq!(tick(&ctx), None);
        advance(&ctx, 1.0).unwrap();
        assert_eq!(tick(&ctx), Some(Notification::Nag));
        assert_eq!(ctx.printer.take(), vec!["flash", "ready check cue"]);

        assert!(advance(&ctx, -1.0).is_err());
    }

    #[test]
    fn test_remove_self_resets() {
        let ctx = CliContext::new();
        set_self_account(&ctx, "Me.1234");
        upsert(&ctx, "Lead.1", RoleArg::Leader, false, 1);
        upsert(&ctx, "Me.1234", RoleArg::Member, false, 1);
        upsert(&ctx, "Lead.1", RoleArg::Leader, true, 1);

        assert!(remove(&ctx, ":Me.1234").is_empty());
        assert_eq!(ctx.tracker.member_count(), 0);
    }
}
