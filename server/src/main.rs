mod config;
mod http;
mod upstream;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use platform_api::Gateway;
use platform_obs::{ObsConfig, init_tracing};
use products_posts::Page;
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
    upstream::Upstream,
};

#[derive(Parser, Debug)]
#[command(name = "employee-posts", version, about = "Employee posts browser")]
struct Cli {
    /// Serve data from a JSON fixture file instead of the live API.
    #[arg(long, global = true, value_name = "FILE")]
    fixtures: Option<PathBuf>,
    /// Log at debug level unless RUST_LOG is set.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve(ServeCommand),
    /// Render the page once and print its HTML.
    Render(RenderCommand),
    /// List the employees offered in the dropdown.
    Users,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

impl From<ServeCommand> for ServeConfig {
    fn from(value: ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[derive(Args, Debug)]
struct RenderCommand {
    /// Employee to select, as the dropdown value.
    #[arg(long, value_name = "ID")]
    user_id: Option<String>,
    /// Expand the comments of this post (repeatable).
    #[arg(long = "expand", value_name = "POST_ID")]
    expand: Vec<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let obs = match (cli.verbose, std::env::var("RUST_LOG").is_ok()) {
        (true, false) => ObsConfig::default().with_filter("debug,hyper_util=info"),
        _ => ObsConfig::default(),
    };
    init_tracing(obs)?;

    let mut app_config = AppConfig::load()?;
    if let Some(path) = cli.fixtures {
        app_config.fixtures = Some(path);
    }
    let app_config = Arc::new(app_config);
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, app_config).await,
        Command::Render(cmd) => run_render(cmd, &app_config).await,
        Command::Users => list_users(&app_config).await,
    }
}

async fn load_page(config: &AppConfig) -> Result<Page<Upstream>> {
    let upstream = Upstream::from_config(config)?;
    let mut page = Page::new(Gateway::new(upstream))?;
    page.initialize().await?;
    Ok(page)
}

async fn run_server(cmd: ServeCommand, config: Arc<AppConfig>) -> Result<()> {
    let page = load_page(&config).await?;
    let state = AppState::new(page, config);
    http::serve(cmd.into(), state).await
}

async fn run_render(cmd: RenderCommand, config: &AppConfig) -> Result<()> {
    let mut page = load_page(config).await?;
    if let Some(value) = cmd.user_id {
        page.dispatch_change(value).await?;
    }
    for post_id in cmd.expand {
        if page.click_post(post_id)?.is_none() {
            warn!(post_id, "no comment toggle rendered for post");
        }
    }
    println!("{}", page.to_html());
    Ok(())
}

async fn list_users(config: &AppConfig) -> Result<()> {
    let gateway = Gateway::new(Upstream::from_config(config)?);
    let users = gateway.fetch_users().await.into_items().unwrap_or_default();
    info!(count = users.len(), "employees loaded");
    for user in users {
        println!("{}\t{}", user.id, user.name);
    }
    Ok(())
}
