use tokio::io::{self, BufReader};
use tracing::{error, info};

use archdrive::{Browser, BrowserScreen, Config, I18n, StorageClient, Terminal};

#[tokio::main]
async fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    // Load configuration
    let config = match Config::load_with_env(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {path}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    // Initialize logging
    if let Err(e) = archdrive::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        archdrive::logging::init_console_only(&config.logging.level);
    }

    info!(api = %config.api.base_url, "ArchDrive starting");

    let client = match StorageClient::new(&config.api) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to build storage client");
            eprintln!("Failed to start: {e}");
            std::process::exit(1);
        }
    };

    let i18n = I18n::builtin(&config.locale.language);
    let goodbye = i18n.t("app.goodbye").to_string();
    let screen = BrowserScreen::new(i18n, &config.downloads.directory);
    let mut browser = Browser::new(client);
    let mut term = Terminal::new(BufReader::new(io::stdin()), io::stdout());

    match screen.run(&mut browser, &mut term).await {
        Ok(result) => {
            info!(?result, "session ended");
            println!("{goodbye}");
        }
        Err(e) => {
            error!(error = %e, "terminal error");
            eprintln!("Terminal error: {e}");
            std::process::exit(1);
        }
    }
}
