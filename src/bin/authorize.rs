use std::env;
use std::io::{self, Write};
use std::sync::Arc;

use linkup_client::api_client::ApiClient;
use linkup_client::app_config::AppConfig;
use linkup_client::profile_store::ProfileStore;
use linkup_client::session_manager::SessionManager;
use linkup_client::webapp_bridge::{EnvBridge, SafeWebApp, INIT_DATA_ENV};

fn read_answer(prompt: &str) -> Result<String, io::Error> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // load .env file if it exists
    let _ = dotenvy::dotenv();

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let config = AppConfig::from_env();
    println!(
        "Backend: {} ({})",
        config.api_base,
        config.environment.name()
    );

    let store = ProfileStore::new(config.profile_path.clone());
    if let Some(user) = store.load() {
        println!("Cached profile found: {} ({})", user.name, user.id);
        let answer = read_answer("Discard it and sign in again? [y/N]: ")?;
        if !matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes") {
            println!("Keeping the existing session.");
            return Ok(());
        }
        store.clear()?;
    }

    // take the init payload from the environment or ask for it
    let init_data = match env::var(INIT_DATA_ENV) {
        Ok(payload) if !payload.is_empty() => {
            println!("Using init data from {}", INIT_DATA_ENV);
            payload
        }
        _ => read_answer("Paste the Telegram init data (leave empty to continue without): ")?,
    };

    let webapp = SafeWebApp::probe(Some(Arc::new(EnvBridge::new(init_data))));
    let api = ApiClient::new(&config)?;
    let manager = SessionManager::new(&config, webapp, api, store);

    manager.initialize();
    match manager.login().await {
        Ok(user) => {
            println!("Signed in as {} ({})", user.name, user.id);
            println!("Profile cached at {}", config.profile_path.display());
            Ok(())
        }
        Err(e) => {
            eprintln!("Authorization failed: {}", e);
            Err(e.into())
        }
    }
}
