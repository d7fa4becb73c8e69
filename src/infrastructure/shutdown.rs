use tokio::sync::watch;

/// Flips once when the operator interrupts the session (Ctrl-C or SIGTERM).
#[derive(Clone)]
pub struct StopSignal {
    receiver: watch::Receiver<bool>,
}

impl StopSignal {
    /// Resolves once a stop was requested; returns immediately if it already was.
    pub async fn requested(&mut self) {
        if *self.receiver.borrow() {
            return;
        }
        if self.receiver.wait_for(|stopped| *stopped).await.is_err() {
            // Every handler is gone, so no stop can arrive any more.
            std::future::pending::<()>().await;
        }
    }

    pub fn is_requested(&self) -> bool {
        *self.receiver.borrow()
    }
}

pub fn stop_channel() -> (watch::Sender<bool>, StopSignal) {
    let (sender, receiver) = watch::channel(false);
    (sender, StopSignal { receiver })
}

pub fn install_stop_handlers() -> StopSignal {
    let (sender, stop) = stop_channel();
    let ctrlc = sender.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!(target: "session", "interrupt received");
            let _ = ctrlc.send(true);
        }
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let term = sender;
        tokio::spawn(async move {
            if let Ok(mut sig) = signal(SignalKind::terminate()) {
                sig.recv().await;
                let _ = term.send(true);
            }
        });
    }

    stop
}
