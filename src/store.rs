use crate::domain::events::Event;
use crate::domain::{Coordinate, Settings};
use crate::settings_file::SettingsFile;
use tokio::sync::mpsc::Receiver;
use tokio::sync::watch::{self, Receiver as WatchReceiver, Sender as WatchSender};
use tracing::{debug, instrument, warn};

/// The process-wide state: the last observed coordinate and the current
/// settings, both plain overwrites.
#[derive(Clone, Debug, PartialEq)]
pub struct StoreSnapshot {
    pub coordinate: Coordinate,
    pub settings: Settings,
}

/// Owns the snapshot. All mutations arrive as events on a single channel and
/// fan out to watchers as full snapshots, so consumers never hold locks.
#[derive(Debug)]
pub struct Store {
    snapshot: StoreSnapshot,
    settings_file: SettingsFile,
    rx: Receiver<Event>,
    notifier_tx: WatchSender<StoreSnapshot>,
    notifier_rx: WatchReceiver<StoreSnapshot>,
}

impl Store {
    pub fn new(rx: Receiver<Event>, settings_file: SettingsFile, settings: Settings) -> Self {
        let snapshot = StoreSnapshot {
            coordinate: Coordinate::UNSET,
            settings,
        };
        let (notifier_tx, notifier_rx) = watch::channel(snapshot.clone());

        Store {
            snapshot,
            settings_file,
            rx,
            notifier_tx,
            notifier_rx,
        }
    }

    pub fn notifier(&self) -> WatchReceiver<StoreSnapshot> {
        self.notifier_rx.clone()
    }

    #[instrument(skip(self))]
    pub async fn listen(&mut self) {
        while let Some(event) = self.rx.recv().await {
            debug!("🔵 Received event: {:?}", event);
            match event {
                Event::CoordinateObserved(coordinate) => {
                    self.snapshot.coordinate = coordinate;
                    self.notify();
                }
                Event::SettingsChanged(settings) => {
                    // Persist failures keep the in-memory update.
                    if let Err(e) = self.settings_file.save(&settings).await {
                        warn!("⚠️ Could not persist settings: {}", e);
                    }
                    self.snapshot.settings = settings;
                    self.notify();
                }
            }
        }
    }

    fn notify(&self) {
        self.notifier_tx.send(self.snapshot.clone()).unwrap_or_default();
    }
}
