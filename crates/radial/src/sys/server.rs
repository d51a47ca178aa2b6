use crate::events::AppEvent;
use crate::script::{ScriptStep, parse_line};
use async_channel::Sender;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

pub const DEFAULT_SOCKET_PATH: &str = "/tmp/radial.sock";

/// Accepts drag event lines (same syntax as replay scripts) on a unix socket
/// and forwards them to the editor. `wait` lines are ignored here; the
/// socket runs on wall-clock time.
pub async fn run_server(socket_path: PathBuf, tx: Sender<AppEvent>) {
    if fs_err::metadata(&socket_path).is_ok() {
        let _ = fs_err::remove_file(&socket_path);
    }

    let listener = match UnixListener::bind(&socket_path) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket {}: {}", socket_path.display(), e);
            return;
        }
    };
    log::info!("Listening on {}", socket_path.display());

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        match parse_line(&line) {
                            Ok(Some(ScriptStep::Event(event))) => {
                                if tx.send(event).await.is_err() {
                                    return;
                                }
                            }
                            Ok(Some(ScriptStep::Wait(_)) | None) => {}
                            Err(e) => log::warn!("Ignoring '{}': {}", line.trim(), e),
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}
