use crate::demo::{print_route_catalog, run_demo, run_roster_summary, DemoArgs, RosterArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use contractor_onboarding::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Contractor Onboarding",
    about = "Run and demonstrate the contractor onboarding workflow engine",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print every onboarding route with its documents and workflow steps
    Routes,
    /// Summarize a roster CSV export: status, route, progress and next action per contractor
    Roster(RosterArgs),
    /// Walk a synthetic contractor from draft to active along one route
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Routes => {
            print_route_catalog();
            Ok(())
        }
        Command::Roster(args) => run_roster_summary(args),
        Command::Demo(args) => run_demo(args),
    }
}
