use glaze_render::{DirtyState, MaterialNode, Rect, RenderNode, Rgba};
use glaze_render::{MAX_MATERIAL_LEVEL, MIN_MATERIAL_LEVEL};

const EPSILON: f32 = 1e-6;

/// Property-owning front end of one material surface.
///
/// Setters run on the UI side and only mark state; `update_paint_node` is
/// the single authorized crossing into the render-thread-owned node, invoked
/// exactly once per frame by the host's synchronization pass.
pub struct MaterialSurface {
    tint: Rgba,
    corner_radius: f32,
    material_level: i32,
    opacity: f32,
    width: f32,
    height: f32,
    dirty: DirtyState,
    changes: u64,
}

impl Default for MaterialSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialSurface {
    pub fn new() -> Self {
        Self {
            tint: Rgba::TRANSPARENT,
            corner_radius: 0.0,
            material_level: MIN_MATERIAL_LEVEL,
            opacity: 1.0,
            width: 0.0,
            height: 0.0,
            dirty: DirtyState::empty(),
            changes: 0,
        }
    }

    pub fn tint(&self) -> Rgba {
        self.tint
    }

    pub fn set_tint(&mut self, tint: Rgba) {
        if self.tint.approx_eq(tint, EPSILON) {
            return;
        }
        self.tint = tint;
        self.note_change(DirtyState::MATERIAL);
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    pub fn set_corner_radius(&mut self, radius: f32) {
        let radius = radius.max(0.0);
        if (self.corner_radius - radius).abs() < EPSILON {
            return;
        }
        self.corner_radius = radius;
        self.note_change(DirtyState::MATERIAL);
    }

    pub fn material_level(&self) -> i32 {
        self.material_level
    }

    pub fn set_material_level(&mut self, level: i32) {
        let level = level.clamp(MIN_MATERIAL_LEVEL, MAX_MATERIAL_LEVEL);
        if self.material_level == level {
            return;
        }
        self.material_level = level;
        self.note_change(DirtyState::MATERIAL);
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        if (self.opacity - opacity).abs() < EPSILON {
            return;
        }
        self.opacity = opacity;
        self.note_change(DirtyState::MATERIAL);
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        if (self.width - width).abs() < EPSILON && (self.height - height).abs() < EPSILON {
            return;
        }
        self.width = width;
        self.height = height;
        self.note_change(DirtyState::GEOMETRY);
    }

    /// Number of effective property changes; no-op sets do not count.
    pub fn changes(&self) -> u64 {
        self.changes
    }

    pub fn dirty(&self) -> DirtyState {
        self.dirty
    }

    fn note_change(&mut self, state: DirtyState) {
        self.dirty |= state;
        self.changes += 1;
    }

    /// Per-frame paint-node handoff.
    ///
    /// With a non-empty size this reuses `old` when it is a material node,
    /// allocates otherwise, and pushes a full snapshot of the current
    /// properties into it. A degenerate size destroys the node (and with it
    /// all GPU resources) and returns `None`.
    pub fn update_paint_node(
        &mut self,
        old: Option<Box<dyn RenderNode>>,
    ) -> Option<Box<dyn RenderNode>> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let mut node = match old.and_then(|n| n.into_any().downcast::<MaterialNode>().ok()) {
            Some(node) => node,
            None => Box::new(MaterialNode::new()),
        };
        node.set_rect(Rect::new(0.0, 0.0, self.width, self.height));
        node.set_tint(self.tint);
        node.set_corner_radius(self.corner_radius);
        node.set_material_level(self.material_level);
        node.set_opacity(self.opacity);
        node.mark_dirty(DirtyState::MATERIAL | DirtyState::GEOMETRY);
        self.dirty = DirtyState::empty();
        Some(node)
    }
}
