use crate::domain::{Coordinate, MarkerStyle, Settings};
use thiserror::Error;

#[cfg(test)]
pub(crate) mod fake;

/// Opaque reference to the DOM container backing the map widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContainerId(pub u64);

/// Opaque reference to a host-owned map instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapHandleId(pub u64);

/// Opaque reference to a record in the host's retained rendering state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderNodeId(pub u64);

/// Opaque reference to a marker created through the provider client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NativeMarkerId(pub u64);

/// Opaque reference to an overlay element appended to a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayId(pub u64);

/// One record of the host's retained rendering-state chain.
#[derive(Clone, Copy, Debug)]
pub struct RenderNode {
    pub map: Option<MapHandleId>,
    pub parent: Option<RenderNodeId>,
}

#[derive(Error, Debug)]
pub enum HostError {
    #[error("the host rejected the operation: {0}")]
    Rejected(String),
    #[error("the referenced host object is gone")]
    Detached,
}

/// The host page as seen by the agent. All of the version-fragile knowledge
/// about the host's markup and internals lives behind this trait; the agent
/// only ever holds the opaque ids it hands out and must tolerate every
/// operation failing.
pub trait HostPage: Send + Sync {
    /// Container backing the map widget, if currently rendered.
    fn map_container(&self) -> Option<ContainerId>;

    /// Whether the host currently shows the map view at all.
    fn is_map_view(&self) -> bool;

    /// Whether the map provider's client library is loaded.
    fn provider_available(&self) -> bool;

    /// Entry into the retained rendering-state chain for a container.
    fn render_tree(&self, container: ContainerId) -> Option<RenderNodeId>;

    fn render_node(&self, node: RenderNodeId) -> Option<RenderNode>;

    fn create_marker(
        &self,
        map: MapHandleId,
        position: Coordinate,
        style: &MarkerStyle,
    ) -> Result<NativeMarkerId, HostError>;

    fn move_marker(&self, marker: NativeMarkerId, position: Coordinate) -> Result<(), HostError>;

    fn restyle_marker(&self, marker: NativeMarkerId, style: &MarkerStyle) -> Result<(), HostError>;

    fn remove_marker(&self, marker: NativeMarkerId);

    /// Appends a fixed-position overlay anchored at the container's visual
    /// center.
    fn place_overlay(&self, container: ContainerId, style: &MarkerStyle) -> Result<OverlayId, HostError>;

    fn remove_overlay(&self, overlay: OverlayId);
}

/// Presentation glue owned by the embedding layer.
pub trait HostUi: Send + Sync {
    fn ensure_toggle_button(&self, enabled: bool, settings: &Settings);

    fn ensure_settings_panel(&self, settings: &Settings);
}
