use crate::marker::MarkerCommand;
use crate::store::StoreSnapshot;
use tokio::sync::mpsc::Sender;
use tokio::sync::watch::Receiver as WatchReceiver;
use tracing::{debug, warn};

/// A key press as delivered by the embedding layer.
#[derive(Clone, Copy, Debug)]
pub struct KeyEvent {
    pub key: char,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyEvent {
    pub fn plain(key: char) -> Self {
        KeyEvent {
            key,
            ctrl: false,
            alt: false,
            meta: false,
        }
    }

    pub fn has_modifier(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Whether the host page may also handle the key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyDisposition {
    Consumed,
    Pass,
}

/// The single global key binding. The bound key is read from the live
/// snapshot on every press, so persisting a new hotkey is the rebind and
/// there is never more than one binding in effect.
pub struct HotkeyListener {
    snapshot_rx: WatchReceiver<StoreSnapshot>,
    marker_tx: Sender<MarkerCommand>,
}

impl HotkeyListener {
    pub fn new(snapshot_rx: WatchReceiver<StoreSnapshot>, marker_tx: Sender<MarkerCommand>) -> Self {
        HotkeyListener { snapshot_rx, marker_tx }
    }

    pub fn on_key(&self, event: KeyEvent) -> KeyDisposition {
        if event.has_modifier() {
            return KeyDisposition::Pass;
        }

        let hotkey = self.snapshot_rx.borrow().settings.hotkey;
        if !hotkey.matches(event.key) {
            return KeyDisposition::Pass;
        }

        debug!("Hotkey '{}' pressed, requesting toggle", hotkey);
        if self.marker_tx.try_send(MarkerCommand::Toggle).is_err() {
            warn!("⚠️ Marker channel is full, dropping toggle");
        }
        KeyDisposition::Consumed
    }
}
