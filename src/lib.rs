//! glaze: tinted translucent material surfaces for a desktop shell.
//!
//! Thin facade over the workspace crates. Most hosts want [`bootstrap`],
//! which wires the configuration into the shell components.

pub use glaze_config::GlazeConfig;
pub use glaze_scene::{
    BridgeError, BridgeRequest, LifecycleState, MaterialRegion, MaterialSurface, RegionStack,
    ShellBridge, SurfaceLayer, WebContentView,
};

/// Load `glaze.toml` (with environment overrides) and construct the bridge
/// and web view from it.
pub fn bootstrap() -> anyhow::Result<(GlazeConfig, ShellBridge, WebContentView)> {
    let config = GlazeConfig::load();
    let bridge = ShellBridge::from_config(&config.theme);
    let view = WebContentView::from_config(&config.webview);
    Ok((config, bridge, view))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_uses_defaults_without_a_config_file() {
        let (config, bridge, view) = bootstrap().unwrap();
        assert_eq!(config.theme.accent_color, bridge.accent_color());
        assert_eq!(view.lifecycle(), LifecycleState::Active);
    }
}
