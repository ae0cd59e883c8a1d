mod controller;
mod probe;
mod representation;

pub use controller::MarkerController;
pub use probe::{HandleProbe, RenderTreeProbe, resolve_host_handle};
pub use representation::Marker;

use crate::store::StoreSnapshot;
use tokio::sync::mpsc::Receiver;
use tracing::instrument;

#[derive(Debug)]
pub enum MarkerCommand {
    /// The user asked to flip visibility (hotkey or toggle button).
    Toggle,
    /// Reconcile the live marker with the latest store state.
    Sync(StoreSnapshot),
}

#[instrument(skip_all)]
pub async fn marker_task(mut rx: Receiver<MarkerCommand>, mut controller: MarkerController) {
    while let Some(command) = rx.recv().await {
        match command {
            MarkerCommand::Toggle => controller.toggle(),
            MarkerCommand::Sync(snapshot) => controller.sync(snapshot),
        }
    }
}
