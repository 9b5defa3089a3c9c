use anyhow::Context;
use clap::{Parser, Subcommand};
use stacks_kernel::settings::Settings;

/// Library catalog server and maintenance tasks.
#[derive(Debug, Parser)]
#[command(name = "stacks", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Insert sample books
    Seed {
        /// Number of books to insert
        #[arg(long, default_value_t = 50)]
        count: usize,
        /// Skip the well-known titles and only generate random ones
        #[arg(long)]
        generated_only: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load stacks settings")?;
    stacks_telemetry::init(&settings.telemetry)?;

    tracing::info!(env = ?settings.environment, command = ?cli.command, "stacks cli starting");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => stacks_app::app::serve(&settings).await,
        Command::Migrate => {
            let registry = stacks_app::app::build_registry();
            let db = stacks_app::app::open_database(&settings.database)?;
            let applied = stacks_app::app::migrate(&registry, &db)?;
            println!("applied {applied} migration(s)");
            Ok(())
        }
        Command::Seed {
            count,
            generated_only,
        } => {
            let inserted = stacks_app::app::seed(&settings, count, generated_only).await?;
            println!("inserted {inserted} book(s)");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default() {
        assert!(Cli::parse_from(["stacks"]).command.is_none());
    }

    #[test]
    fn seed_flags_parse() {
        let cli = Cli::parse_from(["stacks", "seed", "--count", "5", "--generated-only"]);
        assert!(matches!(
            cli.command,
            Some(Command::Seed {
                count: 5,
                generated_only: true
            })
        ));
    }
}
