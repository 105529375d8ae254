use tokio::sync::oneshot;
use tracing::{error, warn};

/// Resolves with the signal name once the process is asked to stop.
pub(crate) fn shutdown_requested() -> oneshot::Receiver<&'static str> {
    let (tx, rx) = oneshot::channel();

    #[cfg(unix)]
    {
        use signal_hook::consts::{SIGINT, SIGTERM};
        use signal_hook::iterator::Signals;

        match Signals::new([SIGINT, SIGTERM]) {
            Ok(mut signals) => {
                std::thread::spawn(move || {
                    if let Some(sig) = signals.forever().next() {
                        let name = signal_hook::low_level::signal_name(sig).unwrap_or("signal");
                        tx.send(name).ok();
                    }
                });
                return rx;
            }
            Err(e) => warn!("Failed to register signal handlers, falling back to Ctrl+C: {e}"),
        }
    }

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tx.send("SIGINT").ok();
            }
            Err(e) => error!("Failed to listen for Ctrl+C: {e}"),
        }
    });

    rx
}
