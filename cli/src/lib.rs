pub mod commands;
pub mod context;
pub mod repl;
pub mod scenario;

pub use context::{CliContext, PrintingNotifier, VirtualClock};
pub use repl::readline;
