use crate::events::AppEvent;
use crate::measure::MEASURE_INTERVAL;
use async_channel::Sender;
use std::path::PathBuf;
use std::thread;
use tokio::runtime::Runtime;

/// Runs the config watcher on a dedicated thread. With a `socket`, also
/// serves drag events on it and emits periodic ticks. Events arrive on `tx`.
pub fn start_background_services(
    config_path: PathBuf,
    socket: Option<PathBuf>,
    tx: Sender<AppEvent>,
) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime: {}", e);
                return;
            }
        };

        rt.block_on(async move {
            if let Some(socket) = socket {
                {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        crate::sys::server::run_server(socket, tx).await;
                    });
                }

                let tx = tx.clone();
                tokio::spawn(async move {
                    let mut interval = tokio::time::interval(MEASURE_INTERVAL);
                    loop {
                        interval.tick().await;
                        if tx.send(AppEvent::Tick).await.is_err() {
                            break;
                        }
                    }
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(config_path, tx).await;
                });
            }

            std::future::pending::<()>().await;
        });
    });
}
