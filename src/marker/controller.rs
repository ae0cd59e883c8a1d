use crate::domain::events::Event;
use crate::host::{ContainerId, HostPage, MapHandleId};
use crate::marker::probe::{HandleProbe, RenderTreeProbe, resolve_host_handle};
use crate::marker::representation::Marker;
use crate::store::StoreSnapshot;
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use tracing::{debug, info, instrument, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Inactive,
    Active,
}

/// Owns the single live marker and the cached host map handle.
///
/// Visibility is reconciled, not imperative: `toggle` only publishes the new
/// desired state through the store, and `sync` brings the marker in line with
/// whatever snapshot the store hands back. Anything the host refuses is
/// tolerated and retried on a later sync.
pub struct MarkerController {
    host: Arc<dyn HostPage>,
    probes: Vec<Box<dyn HandleProbe>>,
    events_tx: Sender<Event>,
    phase: Phase,
    marker: Option<Marker>,
    handle: Option<(ContainerId, MapHandleId)>,
    snapshot: StoreSnapshot,
}

impl MarkerController {
    pub fn new(host: Arc<dyn HostPage>, events_tx: Sender<Event>, initial: StoreSnapshot) -> Self {
        MarkerController {
            host,
            probes: vec![Box::new(RenderTreeProbe)],
            events_tx,
            phase: Phase::Inactive,
            marker: None,
            handle: None,
            snapshot: initial,
        }
    }

    pub fn with_probes(mut self, probes: Vec<Box<dyn HandleProbe>>) -> Self {
        self.probes = probes;
        self
    }

    /// Flips the desired visibility. Activation requires an observed
    /// coordinate and the map view being on screen; deactivation is
    /// unconditional. A rejected activation is a silent no-op.
    #[instrument(skip(self))]
    pub fn toggle(&mut self) {
        match self.phase {
            Phase::Active => self.publish_enabled(false),
            Phase::Inactive => {
                if self.snapshot.coordinate.is_unset() {
                    debug!("No coordinate observed yet, ignoring toggle");
                    return;
                }
                if !self.host.is_map_view() {
                    debug!("Map view is not on screen, ignoring toggle");
                    return;
                }
                self.publish_enabled(true);
            }
        }
    }

    fn publish_enabled(&mut self, enabled: bool) {
        let mut settings = self.snapshot.settings.clone();
        settings.enabled = enabled;
        // The store echoes the change back through sync().
        if self.events_tx.try_send(Event::SettingsChanged(settings)).is_err() {
            warn!("⚠️ Store channel is full, dropping visibility change");
        }
    }

    /// Reconciles the live marker with the given store state.
    #[instrument(skip_all)]
    pub fn sync(&mut self, snapshot: StoreSnapshot) {
        let previous = std::mem::replace(&mut self.snapshot, snapshot);

        if !self.snapshot.settings.enabled {
            if self.phase == Phase::Active {
                info!("📍 Hiding marker");
                // The cached handle stays; only a container rebuild
                // invalidates it.
                self.destroy_marker();
                self.phase = Phase::Inactive;
            }
            return;
        }

        if self.phase == Phase::Inactive {
            info!("📍 Showing marker");
            self.phase = Phase::Active;
        }

        if self.container_changed() {
            debug!("Map container was rebuilt, dropping the cached handle");
            self.destroy_marker();
            self.handle = None;
        }

        if self.marker.is_none() {
            self.ensure_marker();
            return;
        }

        if self.snapshot.coordinate != previous.coordinate {
            self.reposition();
        }

        let style = self.snapshot.settings.style();
        if self.marker.as_ref().is_some_and(|marker| *marker.style() != style) {
            self.restyle();
        }
    }

    fn container_changed(&self) -> bool {
        match (self.handle, self.host.map_container()) {
            (Some((cached, _)), Some(current)) => cached != current,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Places a marker if the coordinate and a host handle allow it. Failure
    /// leaves the controller nominally active; the next sync retries from
    /// current conditions.
    fn ensure_marker(&mut self) {
        if self.snapshot.coordinate.is_unset() {
            debug!("No coordinate observed yet, marker stays pending");
            return;
        }
        let Some(container) = self.host.map_container() else {
            debug!("No map container, marker stays pending");
            return;
        };
        let Some(handle) = self.resolve_handle(container) else {
            debug!("Could not resolve a map handle, marker stays pending");
            return;
        };

        let style = self.snapshot.settings.style();
        let placed = if self.host.provider_available() {
            self.host
                .create_marker(handle, self.snapshot.coordinate, &style)
                .map(|id| Marker::Native {
                    id,
                    position: self.snapshot.coordinate,
                    style,
                })
        } else {
            // Degraded mode: without the provider there is no projection, so
            // the overlay sits at the container's visual center.
            self.host.place_overlay(container, &style).map(|id| Marker::Overlay {
                id,
                container,
                style,
            })
        };

        match placed {
            Ok(marker) => {
                info!(
                    "📍 Placed marker at {},{}",
                    self.snapshot.coordinate.latitude, self.snapshot.coordinate.longitude
                );
                self.marker = Some(marker);
            }
            Err(e) => {
                warn!("⚠️ Host refused the marker: {}", e);
                self.handle = None;
            }
        }
    }

    fn resolve_handle(&mut self, container: ContainerId) -> Option<MapHandleId> {
        if let Some((cached_container, handle)) = self.handle {
            if cached_container == container {
                return Some(handle);
            }
        }

        let handle = resolve_host_handle(&self.probes, self.host.as_ref(), container)?;
        self.handle = Some((container, handle));
        Some(handle)
    }

    fn reposition(&mut self) {
        let to = self.snapshot.coordinate;
        if let Some(marker) = &mut self.marker {
            if let Err(e) = marker.reposition(self.host.as_ref(), to) {
                warn!("⚠️ Could not move the marker: {}", e);
                self.destroy_marker();
                self.handle = None;
            }
        }
    }

    fn restyle(&mut self) {
        let style = self.snapshot.settings.style();
        if let Some(marker) = &mut self.marker {
            if let Err(e) = marker.restyle(self.host.as_ref(), &style) {
                warn!("⚠️ Could not restyle the marker: {}", e);
                self.destroy_marker();
                self.handle = None;
            }
        }
    }

    fn destroy_marker(&mut self) {
        if let Some(marker) = self.marker.take() {
            marker.destroy(self.host.as_ref());
        }
    }

    #[cfg(test)]
    pub(crate) fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    #[cfg(test)]
    pub(crate) fn has_marker(&self) -> bool {
        self.marker.is_some()
    }
}
