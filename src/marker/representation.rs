use crate::domain::{Coordinate, MarkerStyle};
use crate::host::{ContainerId, HostError, HostPage, NativeMarkerId, OverlayId};

/// The single live marker, in one of its two representations. The native
/// variant is a real provider marker; the overlay variant is a degraded
/// stand-in anchored at the container center, used when the provider client
/// is not loaded and no projection is available.
#[derive(Debug)]
pub enum Marker {
    Native {
        id: NativeMarkerId,
        position: Coordinate,
        style: MarkerStyle,
    },
    Overlay {
        id: OverlayId,
        container: ContainerId,
        style: MarkerStyle,
    },
}

impl Marker {
    pub fn style(&self) -> &MarkerStyle {
        match self {
            Marker::Native { style, .. } => style,
            Marker::Overlay { style, .. } => style,
        }
    }

    pub fn position(&self) -> Option<Coordinate> {
        match self {
            Marker::Native { position, .. } => Some(*position),
            Marker::Overlay { .. } => None,
        }
    }

    /// Moves the marker in place. The overlay is anchor-fixed and ignores
    /// repositioning.
    pub fn reposition(&mut self, host: &dyn HostPage, to: Coordinate) -> Result<(), HostError> {
        match self {
            Marker::Native { id, position, .. } => {
                host.move_marker(*id, to)?;
                *position = to;
                Ok(())
            }
            Marker::Overlay { .. } => Ok(()),
        }
    }

    /// Rebuilds the style in place; the overlay has no in-place restyle and
    /// is recreated instead.
    pub fn restyle(&mut self, host: &dyn HostPage, to: &MarkerStyle) -> Result<(), HostError> {
        match self {
            Marker::Native { id, style, .. } => {
                host.restyle_marker(*id, to)?;
                *style = to.clone();
                Ok(())
            }
            Marker::Overlay { id, container, style } => {
                host.remove_overlay(*id);
                *id = host.place_overlay(*container, to)?;
                *style = to.clone();
                Ok(())
            }
        }
    }

    pub fn destroy(self, host: &dyn HostPage) {
        match self {
            Marker::Native { id, .. } => host.remove_marker(id),
            Marker::Overlay { id, .. } => host.remove_overlay(id),
        }
    }
}
