//! Userdesk - user records behind a simulated remote API
//!
//! `userdesk serve` exposes the gateway over HTTP; `userdesk demo` walks the
//! create / update / delete / duplicate-email scenario and prints each
//! envelope.

use clap::{Parser, Subcommand};
use serde::Serialize;
use userdesk::config::HTTP_BIND_ADDRESS_DEFAULT;
use userdesk::{
    ApiResponse, GatewayConfig, UserCreateInput, UserGateway, UserStore, UserUpdateInput,
    APP_NAME, APP_VERSION,
};

// =============================================================================
// CLI
// =============================================================================

/// In-memory user records behind a simulated remote API
#[derive(Parser, Debug)]
#[command(name = APP_NAME)]
#[command(about = "In-memory user record management with a simulated remote API")]
#[command(version)]
struct Cli {
    /// Simulated latency per call in milliseconds (overrides USERDESK_DELAY_MS)
    #[arg(long, global = true)]
    delay_ms: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the gateway as JSON over HTTP (default)
    Serve {
        /// HTTP bind address
        #[arg(short, long, default_value = HTTP_BIND_ADDRESS_DEFAULT)]
        bind: String,
    },
    /// Run the sample scenario and print every envelope
    Demo,
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .init();

    tracing::info!("{} v{}", APP_NAME, APP_VERSION);

    let config = match cli.delay_ms {
        Some(ms) => GatewayConfig::with_delay_ms(ms)?,
        None => GatewayConfig::from_env()?,
    };
    tracing::info!("Simulated latency: {:?}", config.delay);

    let gateway = UserGateway::from_store(UserStore::new(), config);

    match cli.command.unwrap_or(Commands::Serve {
        bind: HTTP_BIND_ADDRESS_DEFAULT.to_string(),
    }) {
        Commands::Serve { bind } => {
            tracing::info!("Starting HTTP server on {}", bind);

            let addr: std::net::SocketAddr = bind.parse()?;
            let app = userdesk::http::router(gateway);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
        Commands::Demo => run_demo(&gateway).await?,
    }

    Ok(())
}

async fn run_demo(gateway: &UserGateway) -> anyhow::Result<()> {
    print_step("list_users", &gateway.list_users().await)?;

    let created = gateway
        .create_user(UserCreateInput::new("Alice Johnson", "alice@example.com", 30))
        .await;
    print_step("create_user", &created)?;
    let id = created
        .data
        .map(|user| user.id)
        .ok_or_else(|| anyhow::anyhow!("demo user was not created"))?;

    print_step("update_user", &gateway.update_user(&id, UserUpdateInput::age(31)).await)?;
    print_step("delete_user", &gateway.delete_user(&id).await)?;
    print_step(
        "create_user (duplicate)",
        &gateway
            .create_user(UserCreateInput::new("X", "john@example.com", 20))
            .await,
    )?;
    print_step("list_users", &gateway.list_users().await)?;
    print_step("reset_all", &gateway.reset_all().await)?;

    Ok(())
}

fn print_step<T: Serialize>(label: &str, response: &ApiResponse<T>) -> anyhow::Result<()> {
    println!("# {}", label);
    println!("{}", serde_json::to_string_pretty(response)?);
    Ok(())
}
