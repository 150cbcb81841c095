//! A terminal stand-in for the OCOP admin surfaces.
//!
//! Each invocation is one "process start": the stored credential is
//! reconciled first, then the command runs against the resulting session.
//!
//! ```text
//! OCOP_API_URL=http://localhost:5000/api admin-shell login admin@ocop.vn admin123
//! admin-shell status
//! admin-shell image /uploads/tea.jpg
//! admin-shell logout
//! ```

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use ocop::prelude::*;
use serde_json::json;

#[derive(Parser, Debug)]
#[command(name = "admin-shell", version, about = "OCOP client session from the terminal")]
struct Args {
    /// JSON config file. `OCOP_*` variables are used when absent.
    #[arg(short, long, env = "OCOP_CONFIG")]
    config: Option<PathBuf>,

    /// Overrides the API base URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Overrides the surface (web-admin, mobile-admin, storefront).
    #[arg(long)]
    surface: Option<Surface>,

    /// Debug-level logging.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and persist the credential.
    Login { email: String, password: String },

    /// Show the reconciled session.
    #[command(alias = "whoami")]
    Status,

    /// Forget the stored credential.
    Logout,

    /// Resolve an image reference to a URL.
    Image { reference: Option<String> },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = run(args).await {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), OcopError> {
    init_tracing(args.verbose)?;

    let mut config = match &args.config {
        Some(path) => {
            let bytes = std::fs::read(path).map_err(|e| {
                OcopError::Config(format!("{}: {e}", path.display()))
            })?;
            ClientConfig::from_json(&bytes)?
        }
        None => ClientConfig::from_env()?,
    };
    if let Some(url) = args.base_url {
        config.api_base_url = url;
    }
    if let Some(surface) = args.surface {
        config.surface = surface;
    }

    let client = Client::builder().config(config).build()?;

    match args.command {
        Command::Image { reference } => {
            // Resolution is offline; no session needed.
            println!("{}", client.image_url(reference.as_deref()));
        }
        Command::Login { email, password } => {
            client.start().await;
            let principal = client.session().login(&email, &password).await?;
            println!(
                "Logged in as {} ({})",
                principal.display_name(),
                principal.role
            );
            if client.access() == Access::Denied {
                println!(
                    "Note: {} accounts can't use the {} surface",
                    principal.role,
                    client.surface()
                );
            }
        }
        Command::Status => {
            client.start().await;
            let session = client.session().snapshot();
            let summary = json!({
                "surface": client.surface().to_string(),
                "state": session.state().to_string(),
                "email": session.principal().map(|p| p.email.clone()),
                "role": session.principal().map(|p| p.role.to_string()),
                "access": format!("{:?}", client.access()),
            });
            println!("{summary:#}");
        }
        Command::Logout => {
            client.start().await;
            client.session().logout();
            println!("Logged out");
        }
    }

    Ok(())
}
