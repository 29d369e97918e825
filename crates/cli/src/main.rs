use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use shelf_app::app::MigrateDirection;
use shelf_kernel::settings::Settings;

/// Operate the shelf catalogue service
#[derive(Parser, Debug)]
#[command(name = "shelf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server until SIGINT/SIGTERM
    Serve {
        /// Port to listen on (overrides server.port)
        #[arg(long, short = 'p')]
        port: Option<u16>,

        /// Skip applying pending migrations at startup
        #[arg(long)]
        no_migrate: bool,
    },
    /// Apply or revert every module's schema
    Migrate {
        #[arg(value_enum)]
        direction: Direction,
    },
    /// Check that the database is reachable
    Ping,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Direction {
    Up,
    Drop,
}

impl From<Direction> for MigrateDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => MigrateDirection::Up,
            Direction::Drop => MigrateDirection::Drop,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load shelf settings")?;
    shelf_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve { port, no_migrate } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            if no_migrate {
                settings.database.run_migrations = false;
            }
            shelf_app::app::serve(settings).await
        }
        Command::Migrate { direction } => {
            let count = shelf_app::app::migrate(&settings, direction.into()).await?;
            println!("{count} migration(s) processed");
            Ok(())
        }
        Command::Ping => {
            shelf_app::app::ping(&settings).await?;
            println!("ok");
            Ok(())
        }
    }
}
