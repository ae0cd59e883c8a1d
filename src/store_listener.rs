use crate::marker::MarkerCommand;
use crate::store::StoreSnapshot;
use tokio::sync::mpsc::Sender;
use tokio::sync::watch::Receiver;
use tracing::instrument;

/// Fans every store change out to the marker task as a full snapshot.
#[instrument(skip_all)]
pub async fn store_listener(mut rx: Receiver<StoreSnapshot>, marker_tx: Sender<MarkerCommand>) {
    while rx.changed().await.is_ok() {
        let snapshot: StoreSnapshot = rx.borrow().clone();
        if marker_tx.send(MarkerCommand::Sync(snapshot)).await.is_err() {
            return;
        }
    }
}
