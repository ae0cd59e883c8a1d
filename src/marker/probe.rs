use crate::host::{ContainerId, HostPage, MapHandleId};
use tracing::trace;

/// Upper bound on chain steps, in case the host hands out a cyclic parent
/// chain.
const MAX_CHAIN_STEPS: usize = 1024;

/// One strategy for locating a live map instance owned by the host. The
/// version-fragile knowledge stays inside probe implementations; the
/// controller only sees an ordered list of them.
pub trait HandleProbe: Send + Sync {
    fn name(&self) -> &'static str;

    fn probe(&self, host: &dyn HostPage, container: ContainerId) -> Option<MapHandleId>;
}

/// Walks the host's retained rendering-state chain upwards from the map
/// container until a record exposing a map instance is found or the chain is
/// exhausted.
pub struct RenderTreeProbe;

impl HandleProbe for RenderTreeProbe {
    fn name(&self) -> &'static str {
        "render-tree"
    }

    fn probe(&self, host: &dyn HostPage, container: ContainerId) -> Option<MapHandleId> {
        let mut current = host.render_tree(container)?;

        for _ in 0..MAX_CHAIN_STEPS {
            let node = host.render_node(current)?;
            if let Some(map) = node.map {
                return Some(map);
            }
            current = node.parent?;
        }

        None
    }
}

/// Tries each probe in order; the first hit wins.
pub fn resolve_host_handle(
    probes: &[Box<dyn HandleProbe>],
    host: &dyn HostPage,
    container: ContainerId,
) -> Option<MapHandleId> {
    probes.iter().find_map(|probe| {
        let found = probe.probe(host, container);
        trace!(probe = probe.name(), found = found.is_some(), "Probed for a map handle");
        found
    })
}
