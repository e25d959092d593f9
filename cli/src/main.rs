use std::io::Write;

use clap::{Parser, Subcommand};
use squad_ready_cli::commands::{self, RoleArg};
use squad_ready_cli::{CliContext, readline};

fn main() -> Result<(), String> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let ctx = CliContext::new();

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx) {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "Drive the ready check tracker by hand")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    SelfAccount {
        #[arg(short, long)]
        name: String,
    },
    Upsert {
        #[arg(short, long)]
        account: String,
        #[arg(short, long, value_enum)]
        role: RoleArg,
        #[arg(long)]
        ready: bool,
        /// 1-based subgroup
        #[arg(short, long, default_value_t = 1)]
        subgroup: u8,
    },
    Remove {
        #[arg(short, long)]
        account: String,
    },
    Advance {
        #[arg(short, long)]
        secs: f32,
    },
    Tick,
    Status,
    Nag {
        #[arg(short, long, action = clap::ArgAction::Set)]
        enabled: bool,
        #[arg(short, long)]
        interval: Option<f32>,
    },
    Replay {
        #[arg(short, long)]
        path: String,
    },
    Exit,
}

fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "squad-ready".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::SelfAccount { name }) => commands::set_self_account(ctx, name),
        Some(Commands::Upsert {
            account,
            role,
            ready,
            subgroup,
        }) => {
            commands::upsert(ctx, account, *role, *ready, *subgroup);
        }
        Some(Commands::Remove { account }) => {
            commands::remove(ctx, account);
        }
        Some(Commands::Advance { secs }) => commands::advance(ctx, *secs)?,
        Some(Commands::Tick) => {
            commands::tick(ctx);
        }
        Some(Commands::Status) => commands::show_status(ctx),
        Some(Commands::Nag { enabled, interval }) => commands::set_nag(ctx, *enabled, *interval),
        Some(Commands::Replay { path }) => commands::replay(path)?,
        Some(Commands::Exit) => {
            commands::exit()?;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
