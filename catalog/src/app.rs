use anyhow::Result;
use catalog_api::{Client, CredentialStore};
use catalog_auth::Settings;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::app_core::AppCore;
use crate::commands::parse_line;
use crate::logging::init_logging;

pub struct App {
    settings: Settings,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub async fn run(&self) -> Result<()> {
        let log_path = init_logging(self.settings.log_dir.as_deref())?;
        tracing::info!(base_url = %self.settings.base_url, "catalog starting");

        let store: Arc<dyn CredentialStore> = Arc::new(self.settings.token_store()?);
        let client = match self.settings.request_timeout() {
            Some(timeout) => Client::with_timeout(&self.settings.base_url, store, timeout)?,
            None => Client::new(&self.settings.base_url, store),
        };

        let mut core = AppCore::new(client, self.settings.route_guard());
        core.navigate("/").await;

        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("Logs: {}\nType 'help' for commands.\n\n", log_path.display()).as_bytes())
            .await?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            stdout.write_all(core.render().as_bytes()).await?;
            stdout.write_all(format!("{}> ", core.location()).as_bytes()).await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match parse_line(&line) {
                Ok(Some(command)) => core.execute(command).await,
                Ok(None) => {}
                Err(message) => {
                    stdout.write_all(format!("{}\n", message).as_bytes()).await?;
                }
            }

            if core.should_quit() {
                break;
            }
        }

        tracing::info!("catalog exiting");
        Ok(())
    }
}
