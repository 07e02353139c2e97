use std::collections::BTreeMap;

use glaze_render::wgpu;
use glaze_render::{Mat4, MaterialNode, RecordingContext, RenderNode, Rgba};

use crate::bridge::ShellBridge;
use crate::surface::MaterialSurface;

/// Owns one material surface item together with its paint node and drives
/// the per-frame phases in order: sync, prepare, record.
pub struct SurfaceLayer {
    item: MaterialSurface,
    node: Option<Box<dyn RenderNode>>,
    /// Placement of the item's local origin in the host coordinate space.
    pub origin: (f32, f32),
}

impl Default for SurfaceLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceLayer {
    pub fn new() -> Self {
        Self { item: MaterialSurface::new(), node: None, origin: (0.0, 0.0) }
    }

    pub fn item(&self) -> &MaterialSurface {
        &self.item
    }

    pub fn item_mut(&mut self) -> &mut MaterialSurface {
        &mut self.item
    }

    /// Once-per-frame synchronization: the single crossing point between the
    /// property side and the render side.
    pub fn sync(&mut self) {
        let old = self.node.take();
        self.node = self.item.update_paint_node(old);
    }

    pub fn has_node(&self) -> bool {
        self.node.is_some()
    }

    pub fn node_initialized(&self) -> bool {
        self.node
            .as_deref()
            .and_then(|n| n.as_any().downcast_ref::<MaterialNode>())
            .is_some_and(MaterialNode::resources_initialized)
    }

    pub fn prepare(&mut self, ctx: &mut RecordingContext<'_>) {
        if let Some(node) = &mut self.node {
            ctx.transform = Mat4::translation(self.origin.0, self.origin.1, 0.0);
            node.prepare(ctx);
        }
    }

    pub fn record<'pass>(&'pass self, pass: &mut wgpu::RenderPass<'pass>) {
        if let Some(node) = &self.node {
            node.record(pass);
        }
    }
}

/// One material surface per bridge-registered region.
///
/// Web content registers the rectangles that want glass behind them; this
/// stack mirrors the registry into surface layers, keyed by region id.
pub struct RegionStack {
    layers: BTreeMap<String, SurfaceLayer>,
    seen_revision: Option<u64>,
}

impl Default for RegionStack {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionStack {
    pub fn new() -> Self {
        Self { layers: BTreeMap::new(), seen_revision: None }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layer(&self, id: &str) -> Option<&SurfaceLayer> {
        self.layers.get(id)
    }

    /// Mirror the bridge registry into the layer set and run every layer's
    /// frame synchronization. Item properties are only re-pushed when the
    /// registry actually changed; the per-layer sync runs every frame.
    pub fn sync(&mut self, bridge: &ShellBridge, tint: Rgba) {
        if self.seen_revision != Some(bridge.regions_revision()) {
            self.seen_revision = Some(bridge.regions_revision());
            let mut stale: Vec<String> = self.layers.keys().cloned().collect();
            for region in bridge.material_regions() {
                stale.retain(|id| id != &region.id);
                let layer = self.layers.entry(region.id.clone()).or_default();
                layer.origin = (region.x, region.y);
                let item = layer.item_mut();
                item.set_size(region.width, region.height);
                item.set_corner_radius(region.corner_radius);
                item.set_material_level(region.material_level);
            }
            for id in stale {
                self.layers.remove(&id);
            }
        }
        for layer in self.layers.values_mut() {
            // theme tint can change without a registry revision; the setter
            // no-ops when the value is unchanged
            layer.item_mut().set_tint(tint);
            layer.sync();
        }
    }

    pub fn prepare(&mut self, ctx: &mut RecordingContext<'_>) {
        for layer in self.layers.values_mut() {
            layer.prepare(ctx);
        }
    }

    pub fn record<'pass>(&'pass self, pass: &mut wgpu::RenderPass<'pass>) {
        for layer in self.layers.values() {
            layer.record(pass);
        }
    }
}
