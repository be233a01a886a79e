use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;

use warden_cli::admin::{self, NewAccount};
use warden_config::{DatabaseConfig, HasherConfig};
use warden_core::PasswordHasher;
use warden_db::{PgCredentialStore, init_db_pool};
use warden_models::Identity;

#[derive(Parser)]
#[command(name = "warden-cli")]
#[command(about = "Warden CLI - Account administration for Warden", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    CreateUser {
        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Display name
        #[arg(short = 'n', long)]
        name: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Allow an account to log in again
    Activate {
        #[arg(short = 'e', long)]
        email: String,
    },
    /// Block an account from logging in
    Deactivate {
        #[arg(short = 'e', long)]
        email: String,
    },
    /// Print an account's profile
    Show {
        #[arg(short = 'e', long)]
        email: String,
    },
    /// Insert accounts with generated names for local development
    Seed {
        /// Number of accounts to create
        #[arg(short = 'c', long, default_value = "10")]
        count: usize,

        /// Password shared by every seeded account
        #[arg(short = 'p', long, default_value = "password123")]
        password: String,

        /// Email domain
        #[arg(long, default_value = "example.com")]
        domain: String,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let db_config = DatabaseConfig::from_env().unwrap_or_else(|e| fail("Invalid database configuration", e));
    let hasher_config = HasherConfig::from_env().unwrap_or_else(|e| fail("Invalid hasher configuration", e));

    let pool = init_db_pool(&db_config)
        .await
        .unwrap_or_else(|e| fail("Failed to connect to database", e));
    let store = PgCredentialStore::new(pool);
    let hasher = PasswordHasher::new(hasher_config.cost, hasher_config.max_concurrency);

    match cli.command {
        Commands::CreateUser {
            email,
            name,
            password,
        } => handle_create_user(&store, &hasher, email, name, password).await,
        Commands::Activate { email } => handle_set_active(&store, &email, true).await,
        Commands::Deactivate { email } => handle_set_active(&store, &email, false).await,
        Commands::Show { email } => handle_show(&store, &email).await,
        Commands::Seed {
            count,
            password,
            domain,
        } => handle_seed(&store, &hasher, count, &password, &domain).await,
    }
}

fn fail(context: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("\n❌ {}: {}", context, err);
    std::process::exit(1);
}

fn prompt(label: &str) -> String {
    Input::new()
        .with_prompt(label)
        .interact_text()
        .unwrap_or_else(|e| fail(&format!("Failed to read {}", label.to_lowercase()), e))
}

fn print_identity(identity: &Identity) {
    println!("   ID: {}", identity.id);
    println!("   UUID: {}", identity.uuid);
    println!("   Email: {}", identity.email);
    println!("   Name: {}", identity.name);
    println!("   Active: {}", identity.is_active);
    println!("   Created: {}", identity.created_at);
}

async fn handle_create_user(
    store: &PgCredentialStore,
    hasher: &PasswordHasher,
    email: Option<String>,
    name: Option<String>,
    password: Option<String>,
) {
    let email = email.unwrap_or_else(|| prompt("Email address"));
    let name = name.unwrap_or_else(|| prompt("Name"));
    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .unwrap_or_else(|e| fail("Failed to read password", e))
    });

    let account = NewAccount {
        email,
        password,
        name,
    };

    match admin::create_user(store, hasher, account).await {
        Ok(identity) => {
            println!("\n✅ User created successfully!");
            print_identity(&identity);
        }
        Err(e) => fail("Error creating user", e),
    }
}

async fn handle_set_active(store: &PgCredentialStore, email: &str, active: bool) {
    match admin::set_active(store, email, active).await {
        Ok(identity) => {
            let state = if active { "activated" } else { "deactivated" };
            println!("\n✅ User {} {}", identity.email, state);
        }
        Err(e) => fail("Error updating user", e),
    }
}

async fn handle_show(store: &PgCredentialStore, email: &str) {
    match admin::find_user(store, email).await {
        Ok(identity) => print_identity(&identity),
        Err(e) => fail("Error looking up user", e),
    }
}

async fn handle_seed(
    store: &PgCredentialStore,
    hasher: &PasswordHasher,
    count: usize,
    password: &str,
    domain: &str,
) {
    println!("🌱 Seeding {} users...", count);
    match admin::seed_users(store, hasher, count, password, domain).await {
        Ok(created) => {
            println!("\n✅ Created {} users ({} already existed)", created, count - created);
        }
        Err(e) => fail("Error seeding users", e),
    }
}
