use clap::{Parser, Subcommand};
use regform::{config::StorageConfig, db, services::RegistrationService};

#[derive(Parser)]
#[command(name = "regform-cli")]
#[command(about = "CLI tool for inspecting stored registrations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database commands
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },

    /// Registration commands
    Registrations {
        #[command(subcommand)]
        command: RegistrationCommands,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Create the registrations table if it does not exist
    Init,
}

#[derive(Subcommand)]
enum RegistrationCommands {
    /// List registrations, newest first
    List {
        /// Maximum number of registrations to display
        #[arg(short, long, default_value_t = 100)]
        limit: i64,

        /// Offset for pagination
        #[arg(short = 'o', long, default_value_t = 0)]
        offset: i64,
    },

    /// Print the number of stored registrations
    Count,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Connecting also ensures the schema exists
    let storage = StorageConfig::from_env();
    let repository = db::connect(&storage).await?;
    let registration_service = RegistrationService::new(repository);

    match cli.command {
        Commands::Db { command } => match command {
            DbCommands::Init => {
                println!(
                    "✅ Registrations table ready ({})",
                    storage.backend_name()
                );
            }
        },

        Commands::Registrations { command } => match command {
            RegistrationCommands::List { limit, offset } => {
                match registration_service
                    .list_registrations(Some(limit), Some(offset))
                    .await
                {
                    Ok(registrations) => {
                        if registrations.is_empty() {
                            println!("No registrations found.");
                        } else {
                            println!(
                                "{:<6} {:<24} {:<32} {:<16} {:<20}",
                                "ID", "Name", "Email", "Contact", "Created"
                            );
                            println!("{}", "-".repeat(100));
                            for registration in registrations {
                                let name = format!(
                                    "{} {}",
                                    registration.first_name, registration.last_name
                                );
                                println!(
                                    "{:<6} {:<24} {:<32} {:<16} {:<20}",
                                    registration.id,
                                    name,
                                    registration.email,
                                    registration.contact_number,
                                    registration.created_at.as_deref().unwrap_or("N/A")
                                );
                            }
                        }
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to list registrations: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            RegistrationCommands::Count => match registration_service.count_registrations().await {
                Ok(count) => println!("{}", count),
                Err(err) => {
                    eprintln!("❌ Failed to count registrations: {}", err);
                    std::process::exit(1);
                }
            },
        },
    }

    Ok(())
}
