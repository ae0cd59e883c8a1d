use crate::host::HostUi;
use crate::marker::MarkerCommand;
use crate::store::StoreSnapshot;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::sync::watch::Receiver as WatchReceiver;
use tokio::time::timeout;
use tracing::{debug, instrument};

/// Re-inserts the toggle button and settings panel after the host re-renders
/// its own controls. The host may rebuild its DOM at any time, so mutation
/// notifications arrive in bursts; a burst is coalesced until the subtree has
/// been quiet for the configured delay.
#[instrument(skip_all)]
pub async fn injector(
    mut mutations: Receiver<()>,
    snapshot_rx: WatchReceiver<StoreSnapshot>,
    ui: Arc<dyn HostUi>,
    marker_tx: Sender<MarkerCommand>,
    debounce: Duration,
) {
    while mutations.recv().await.is_some() {
        loop {
            match timeout(debounce, mutations.recv()).await {
                Ok(Some(())) => continue,
                Ok(None) => return,
                Err(_) => break,
            }
        }

        let snapshot = snapshot_rx.borrow().clone();
        debug!("🔁 Host subtree changed, re-ensuring controls");
        ui.ensure_toggle_button(snapshot.settings.enabled, &snapshot.settings);
        ui.ensure_settings_panel(&snapshot.settings);

        // A nominally active marker gets its self-heal pass here.
        if marker_tx.send(MarkerCommand::Sync(snapshot)).await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, Settings};
    use crate::host::fake::FakeUi;
    use pretty_assertions::assert_eq;
    use tokio::sync::{mpsc, watch};
    use tokio::task;
    use tokio::time::sleep;

    fn snapshot() -> StoreSnapshot {
        StoreSnapshot {
            coordinate: Coordinate::UNSET,
            settings: Settings::default(),
        }
    }

    #[tokio::test]
    async fn a_mutation_burst_collapses_into_one_ensure_cycle() {
        let (mutations_tx, mutations_rx) = mpsc::channel(8);
        let (_snapshot_tx, snapshot_rx) = watch::channel(snapshot());
        let (marker_tx, mut marker_rx) = mpsc::channel(8);
        let ui = Arc::new(FakeUi::default());

        task::spawn(injector(
            mutations_rx,
            snapshot_rx,
            ui.clone(),
            marker_tx,
            Duration::from_millis(20),
        ));

        for _ in 0..5 {
            mutations_tx.send(()).await.unwrap();
        }
        sleep(Duration::from_millis(80)).await;

        assert_eq!(ui.calls(), vec!["toggle_button(enabled=false)".to_string(), "settings_panel".to_string()]);
        assert!(matches!(marker_rx.try_recv(), Ok(MarkerCommand::Sync(_))));
        assert!(marker_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn separate_bursts_each_get_a_cycle() {
        let (mutations_tx, mutations_rx) = mpsc::channel(8);
        let (_snapshot_tx, snapshot_rx) = watch::channel(snapshot());
        let (marker_tx, mut marker_rx) = mpsc::channel(8);
        let ui = Arc::new(FakeUi::default());

        task::spawn(injector(
            mutations_rx,
            snapshot_rx,
            ui.clone(),
            marker_tx,
            Duration::from_millis(10),
        ));

        mutations_tx.send(()).await.unwrap();
        sleep(Duration::from_millis(50)).await;
        mutations_tx.send(()).await.unwrap();
        sleep(Duration::from_millis(50)).await;

        assert_eq!(ui.calls().len(), 4);
        assert!(marker_rx.try_recv().is_ok());
        assert!(marker_rx.try_recv().is_ok());
        assert!(marker_rx.try_recv().is_err());
    }
}
