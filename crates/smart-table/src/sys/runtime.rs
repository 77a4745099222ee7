use crate::events::AppEvent;
use async_channel::Sender;
use std::thread;
use tokio::runtime::Runtime;

/// Spawns the tokio thread that hosts the config watcher.
pub fn start_background_services(tx: Sender<AppEvent>) -> std::io::Result<()> {
    let rt = Runtime::new()?;

    thread::Builder::new()
        .name("smart-table-services".into())
        .spawn(move || {
            rt.block_on(async {
                tokio::spawn(crate::config::run_async_watcher(tx));

                std::future::pending::<()>().await;
            });
        })?;

    Ok(())
}
