use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

use bitlend::api::{Authenticator, HttpApiClient, LendingApi};
use bitlend::cli::{Cli, Command};
use bitlend::components::Render;
use bitlend::config::Config;
use bitlend::logging;
use bitlend::notifications::{render_toast, Toaster};
use bitlend::pages::{
    render_screen, DashboardPage, LoginForm, LoginOutcome, LoginPage, MarketplacePage,
};
use bitlend::query::QueryClient;
use bitlend::router::{Navigator, Route};

const DEFAULT_CONFIG_PATH: &str = "config/bitlend.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let (mut config, load_error) = match Config::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_env_overrides();
    logging::init(config.logging.file.as_deref(), cli.debug)?;

    match load_error {
        None => info!("Configuration loaded from {:?}", config_path),
        Some(e) => warn!("Using default configuration ({:?}: {})", config_path, e),
    }

    let client = Arc::new(HttpApiClient::new(&config.api)?);
    info!("Using API at {}", client.base_url());
    let api: Arc<dyn LendingApi> = client.clone();
    let queries = QueryClient::new(api, config.cache.stale_after());
    let toaster = Toaster::new(config.notifications.max_toasts);

    match cli.command.unwrap_or(Command::Dashboard) {
        Command::Dashboard => {
            let navigator = Navigator::new(Route::Dashboard);
            let page = DashboardPage::new(
                queries,
                Arc::new(toaster.clone()),
                navigator.clone(),
                config.dashboard.clone(),
            );
            let body = page.load().await.render();
            let unread = toaster.active().await.len();
            println!("{}", render_screen(&navigator.location().await, unread, &body));
        }
        Command::Marketplace { tab } => {
            let mut page = MarketplacePage::new(queries, Arc::new(toaster.clone()));
            page.select_tab(tab.into());
            let body = page.load().await.render();
            let unread = toaster.active().await.len();
            println!("{}", render_screen(&Route::Marketplace, unread, &body));
        }
        Command::Accept { id } => {
            let mut page = MarketplacePage::new(queries, Arc::new(toaster.clone()));
            page.load().await;
            match page.accept_by_id(id).await {
                Some(outcome) => info!("Accept loan {}: {:?}", id, outcome),
                None => warn!("Loan {} is not listed in the marketplace", id),
            }
        }
        Command::Login { email, password } => {
            let auth: Arc<dyn Authenticator> = client;
            let navigator = Navigator::new(Route::Login);
            let mut page = LoginPage::new(auth, navigator.clone());
            match page.submit(&LoginForm::new(email, password)).await {
                LoginOutcome::LoggedIn(session) => {
                    if let Some(cookie) = session.cookie {
                        println!("{}", cookie);
                    }
                    info!("Now at {}", navigator.location().await.path());
                }
                LoginOutcome::Invalid(_) => {
                    println!("{}", render_screen(&Route::Login, 0, &page.render()))
                }
                LoginOutcome::Failed(message) => eprintln!("Sign in failed: {}", message),
            }
        }
    }

    for toast in toaster.drain().await {
        println!("{}", render_toast(&toast));
    }

    Ok(())
}
