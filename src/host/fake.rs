use super::*;
use crate::domain::{Coordinate, MarkerStyle, Settings};
use std::sync::Mutex;

/// Scriptable host page for tests. State sits behind a mutex so the fake can
/// be shared with spawned tasks.
#[derive(Default)]
pub struct FakeHost {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    map_view: bool,
    container: Option<ContainerId>,
    provider: bool,
    chain_entry: Option<RenderNodeId>,
    chain: Vec<(RenderNodeId, RenderNode)>,
    fail_marker_ops: bool,
    next_id: u64,
    markers: Vec<(NativeMarkerId, Coordinate, MarkerStyle)>,
    overlays: Vec<(OverlayId, ContainerId, MarkerStyle)>,
    moves: Vec<(NativeMarkerId, Coordinate)>,
    restyles: Vec<(NativeMarkerId, MarkerStyle)>,
}

impl FakeHost {
    /// A host showing the map view, with the provider loaded and a two-node
    /// retained chain whose second record exposes a map instance.
    pub fn on_map_view() -> Self {
        let host = FakeHost::default();
        {
            let mut state = host.state.lock().unwrap();
            state.map_view = true;
            state.container = Some(ContainerId(1));
            state.provider = true;
            state.chain_entry = Some(RenderNodeId(1));
            state.chain = vec![
                (
                    RenderNodeId(1),
                    RenderNode {
                        map: None,
                        parent: Some(RenderNodeId(2)),
                    },
                ),
                (
                    RenderNodeId(2),
                    RenderNode {
                        map: Some(MapHandleId(7)),
                        parent: None,
                    },
                ),
            ];
            state.next_id = 100;
        }
        host
    }

    pub fn set_map_view(&self, on: bool) {
        self.state.lock().unwrap().map_view = on;
    }

    pub fn set_container(&self, container: Option<ContainerId>) {
        self.state.lock().unwrap().container = container;
    }

    pub fn set_provider(&self, on: bool) {
        self.state.lock().unwrap().provider = on;
    }

    pub fn set_chain(&self, entry: Option<RenderNodeId>, chain: Vec<(RenderNodeId, RenderNode)>) {
        let mut state = self.state.lock().unwrap();
        state.chain_entry = entry;
        state.chain = chain;
    }

    pub fn fail_marker_ops(&self, on: bool) {
        self.state.lock().unwrap().fail_marker_ops = on;
    }

    pub fn markers(&self) -> Vec<(NativeMarkerId, Coordinate, MarkerStyle)> {
        self.state.lock().unwrap().markers.clone()
    }

    pub fn overlays(&self) -> Vec<(OverlayId, ContainerId, MarkerStyle)> {
        self.state.lock().unwrap().overlays.clone()
    }

    pub fn moves(&self) -> Vec<(NativeMarkerId, Coordinate)> {
        self.state.lock().unwrap().moves.clone()
    }

    pub fn restyles(&self) -> Vec<(NativeMarkerId, MarkerStyle)> {
        self.state.lock().unwrap().restyles.clone()
    }
}

impl HostPage for FakeHost {
    fn map_container(&self) -> Option<ContainerId> {
        self.state.lock().unwrap().container
    }

    fn is_map_view(&self) -> bool {
        self.state.lock().unwrap().map_view
    }

    fn provider_available(&self) -> bool {
        self.state.lock().unwrap().provider
    }

    fn render_tree(&self, _container: ContainerId) -> Option<RenderNodeId> {
        self.state.lock().unwrap().chain_entry
    }

    fn render_node(&self, node: RenderNodeId) -> Option<RenderNode> {
        let state = self.state.lock().unwrap();
        state.chain.iter().find(|(id, _)| *id == node).map(|(_, record)| *record)
    }

    fn create_marker(
        &self,
        _map: MapHandleId,
        position: Coordinate,
        style: &MarkerStyle,
    ) -> Result<NativeMarkerId, HostError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_marker_ops {
            return Err(HostError::Rejected("marker creation disabled".to_string()));
        }
        state.next_id += 1;
        let id = NativeMarkerId(state.next_id);
        state.markers.push((id, position, style.clone()));
        Ok(id)
    }

    fn move_marker(&self, marker: NativeMarkerId, position: Coordinate) -> Result<(), HostError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_marker_ops {
            return Err(HostError::Detached);
        }
        let entry = state
            .markers
            .iter_mut()
            .find(|(id, _, _)| *id == marker)
            .ok_or(HostError::Detached)?;
        entry.1 = position;
        state.moves.push((marker, position));
        Ok(())
    }

    fn restyle_marker(&self, marker: NativeMarkerId, style: &MarkerStyle) -> Result<(), HostError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_marker_ops {
            return Err(HostError::Detached);
        }
        let entry = state
            .markers
            .iter_mut()
            .find(|(id, _, _)| *id == marker)
            .ok_or(HostError::Detached)?;
        entry.2 = style.clone();
        state.restyles.push((marker, style.clone()));
        Ok(())
    }

    fn remove_marker(&self, marker: NativeMarkerId) {
        self.state.lock().unwrap().markers.retain(|(id, _, _)| *id != marker);
    }

    fn place_overlay(&self, container: ContainerId, style: &MarkerStyle) -> Result<OverlayId, HostError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_marker_ops {
            return Err(HostError::Rejected("overlay creation disabled".to_string()));
        }
        state.next_id += 1;
        let id = OverlayId(state.next_id);
        state.overlays.push((id, container, style.clone()));
        Ok(id)
    }

    fn remove_overlay(&self, overlay: OverlayId) {
        self.state.lock().unwrap().overlays.retain(|(id, _, _)| *id != overlay);
    }
}

/// Records which controls were (re)inserted.
#[derive(Default)]
pub struct FakeUi {
    calls: Mutex<Vec<String>>,
}

impl FakeUi {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl HostUi for FakeUi {
    fn ensure_toggle_button(&self, enabled: bool, _settings: &Settings) {
        self.calls.lock().unwrap().push(format!("toggle_button(enabled={enabled})"));
    }

    fn ensure_settings_panel(&self, _settings: &Settings) {
        self.calls.lock().unwrap().push("settings_panel".to_string());
    }
}
