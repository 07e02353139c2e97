use glaze_render::Rgba;
use glaze_config::WebViewConfig;
use log::debug;

/// Resource-usage tiers of the embedded web content process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    /// Full functionality.
    Active,
    /// JS suspended, DOM retained; cheap to resume.
    Frozen,
    /// Renderer resources released; content reloads on reactivation.
    Discarded,
}

/// Web content view tuned for desktop-shell usage.
///
/// Tracks the `active`/`discard_when_hidden` flags plus host visibility and
/// derives the lifecycle state the embedder should apply to its browser
/// process. The material surfaces render beneath this view; the two are
/// siblings with independent visibility.
pub struct WebContentView {
    active: bool,
    discard_when_hidden: bool,
    visible: bool,
    lifecycle: LifecycleState,
    background: Rgba,
    url: Option<String>,
    devtools_port: Option<u16>,
    changes: u64,
}

impl Default for WebContentView {
    fn default() -> Self {
        Self::new()
    }
}

impl WebContentView {
    pub fn new() -> Self {
        Self {
            active: true,
            discard_when_hidden: false,
            visible: true,
            lifecycle: LifecycleState::Active,
            // Transparency requested after content has loaded is silently
            // ignored by web engines; it must be in place from construction.
            background: Rgba::TRANSPARENT,
            url: None,
            devtools_port: None,
            changes: 0,
        }
    }

    pub fn from_config(config: &WebViewConfig) -> Self {
        let mut view = Self::new();
        view.discard_when_hidden = config.discard_when_hidden;
        view.devtools_port = config.devtools_port;
        view.update_lifecycle_state();
        view
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        self.active = active;
        self.update_lifecycle_state();
        self.changes += 1;
    }

    pub fn discard_when_hidden(&self) -> bool {
        self.discard_when_hidden
    }

    pub fn set_discard_when_hidden(&mut self, discard: bool) {
        if self.discard_when_hidden == discard {
            return;
        }
        self.discard_when_hidden = discard;
        self.update_lifecycle_state();
        self.changes += 1;
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Host visibility change. Lifecycle is only auto-managed while the view
    /// is active; an explicitly deactivated view keeps its state.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        if self.active {
            self.update_lifecycle_state();
        }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = Some(url.into());
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn devtools_port(&self) -> Option<u16> {
        self.devtools_port
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.lifecycle
    }

    /// Number of effective flag changes; no-op sets do not count.
    pub fn changes(&self) -> u64 {
        self.changes
    }

    fn update_lifecycle_state(&mut self) {
        let next = if self.active && self.visible {
            LifecycleState::Active
        } else if self.discard_when_hidden {
            LifecycleState::Discarded
        } else {
            LifecycleState::Frozen
        };
        if next != self.lifecycle {
            debug!("webview lifecycle {:?} -> {:?}", self.lifecycle, next);
            self.lifecycle = next;
        }
    }

    /// Teardown path: hide first, then discard so the embedder releases its
    /// renderer resources.
    pub fn shutdown(&mut self) {
        self.visible = false;
        self.lifecycle = LifecycleState::Discarded;
    }
}

impl Drop for WebContentView {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_active_and_transparent() {
        let view = WebContentView::new();
        assert_eq!(view.lifecycle(), LifecycleState::Active);
        assert_eq!(view.background(), Rgba::TRANSPARENT);
    }

    #[test]
    fn hidden_view_freezes_by_default() {
        let mut view = WebContentView::new();
        view.set_visible(false);
        assert_eq!(view.lifecycle(), LifecycleState::Frozen);
        view.set_visible(true);
        assert_eq!(view.lifecycle(), LifecycleState::Active);
    }

    #[test]
    fn hidden_view_discards_when_configured() {
        let mut view = WebContentView::new();
        view.set_discard_when_hidden(true);
        view.set_visible(false);
        assert_eq!(view.lifecycle(), LifecycleState::Discarded);
    }

    #[test]
    fn inactive_view_is_not_auto_managed_by_visibility() {
        let mut view = WebContentView::new();
        view.set_active(false);
        assert_eq!(view.lifecycle(), LifecycleState::Frozen);
        // while inactive, visibility flips do not touch the lifecycle
        view.set_visible(false);
        view.set_visible(true);
        assert_eq!(view.lifecycle(), LifecycleState::Frozen);
        view.set_active(true);
        assert_eq!(view.lifecycle(), LifecycleState::Active);
    }

    #[test]
    fn flag_setters_are_idempotent() {
        let mut view = WebContentView::new();
        view.set_active(true);
        view.set_discard_when_hidden(false);
        assert_eq!(view.changes(), 0);
        view.set_active(false);
        assert_eq!(view.changes(), 1);
        view.set_active(false);
        assert_eq!(view.changes(), 1);
    }

    #[test]
    fn shutdown_discards() {
        let mut view = WebContentView::new();
        view.shutdown();
        assert_eq!(view.lifecycle(), LifecycleState::Discarded);
        assert!(!view.visible());
    }

    #[test]
    fn config_seeds_flags() {
        let config = WebViewConfig { devtools_port: Some(9222), discard_when_hidden: true };
        let view = WebContentView::from_config(&config);
        assert!(view.discard_when_hidden());
        assert_eq!(view.devtools_port(), Some(9222));
        assert_eq!(view.lifecycle(), LifecycleState::Active);
    }
}
