use crate::app_config::AppConfig;
use crate::domain::events::Event;
use crate::host::{HostPage, HostUi};
use crate::hotkey::HotkeyListener;
use crate::injector::injector;
use crate::marker::{MarkerCommand, MarkerController, marker_task};
use crate::observer::{EndpointMatcher, Tap, Transport};
use crate::settings_file::{SettingsFile, SettingsFileError};
use crate::store::Store;
use crate::store_listener::store_listener;
use std::sync::Arc;
use tokio::sync::mpsc::{self, Sender};
use tokio::task;
use tracing::info;

/// Handles through which the embedding layer feeds the agent: network traffic
/// goes through `tap()`, key presses through `hotkeys`, DOM mutation
/// notifications into `mutations`, and settings-panel edits into `events`.
pub struct Agent {
    pub events: Sender<Event>,
    pub mutations: Sender<()>,
    pub hotkeys: HotkeyListener,
    marker_tx: Sender<MarkerCommand>,
    matcher: EndpointMatcher,
}

impl Agent {
    /// Wires the store, marker task, injector and hotkey listener together
    /// and spawns their tasks. Call once per process.
    pub async fn start(config: &AppConfig, page: Arc<dyn HostPage>, ui: Arc<dyn HostUi>) -> Result<Agent, SettingsFileError> {
        let settings_file = SettingsFile::new(config.settings().file());
        let settings = settings_file.load().await?;
        info!("✅  Loaded settings");

        let (events_tx, events_rx) = mpsc::channel::<Event>(config.core().store_buffer_size());
        let mut store = Store::new(events_rx, settings_file, settings);
        let notifier_rx = store.notifier();

        let (marker_tx, marker_rx) = mpsc::channel::<MarkerCommand>(config.core().store_buffer_size());
        let controller = MarkerController::new(page, events_tx.clone(), notifier_rx.borrow().clone());

        task::spawn(async move { store.listen().await });
        info!("✅  Initialized store");

        task::spawn(store_listener(notifier_rx.clone(), marker_tx.clone()));
        info!("✅  Initialized store listener");

        task::spawn(marker_task(marker_rx, controller));
        info!("✅  Initialized marker task");

        let (mutations_tx, mutations_rx) = mpsc::channel::<()>(config.core().store_buffer_size());
        task::spawn(injector(
            mutations_rx,
            notifier_rx.clone(),
            ui,
            marker_tx.clone(),
            config.ui().debounce(),
        ));
        info!("✅  Initialized host-ui injector");

        let hotkeys = HotkeyListener::new(notifier_rx, marker_tx.clone());
        info!("🔥 {} is up and running", env!("CARGO_PKG_NAME"));

        Ok(Agent {
            events: events_tx,
            mutations: mutations_tx,
            hotkeys,
            marker_tx,
            matcher: EndpointMatcher::new(config.observer().endpoint_fragments().to_vec()),
        })
    }

    /// Wraps the host transport with the coordinate tap.
    pub fn tap<T: Transport>(&self, inner: T) -> Tap<T> {
        Tap::new(inner, self.matcher.clone(), self.events.clone())
    }

    /// Same request the hotkey makes; wired to the injected toggle button.
    pub fn request_toggle(&self) {
        let _ = self.marker_tx.try_send(MarkerCommand::Toggle);
    }
}
