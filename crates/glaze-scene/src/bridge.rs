use std::collections::BTreeMap;

use glaze_render::Rgba;
use log::{Level, log, warn};
use palette::Srgb;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

/// A rectangle registered by web content that wants glass behind it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRegion {
    pub id: String,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default = "default_material_level")]
    pub material_level: i32,
    #[serde(default)]
    pub corner_radius: f32,
}

fn default_material_level() -> i32 {
    glaze_render::MIN_MATERIAL_LEVEL
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BridgeError {
    #[error("region must have a non-empty `id` field")]
    MissingRegionId,
    #[error("unknown region id `{0}`")]
    UnknownRegion(String),
    #[error("`updates` must be an object")]
    MalformedUpdate,
}

/// Requests web content may send over the message channel. The envelope is
/// `{"method": ..., "params": ...}`; every call is answered with a JSON
/// value (possibly null) or an error.
#[derive(Debug, Deserialize)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
pub enum BridgeRequest {
    Log { level: String, message: String },
    GetThemeTokens,
    MaterialRegions,
    RegisterMaterialRegion(MaterialRegion),
    UnregisterMaterialRegion { id: String },
    UpdateMaterialRegion { id: String, updates: Value },
}

/// Shell-side endpoint of the web channel.
///
/// Owns the theme state and the material-region registry. Hosts poll
/// `theme_revision`/`regions_revision` to learn about changes; web content
/// talks to it through [`ShellBridge::handle`].
pub struct ShellBridge {
    dark_mode: bool,
    accent_color: String,
    regions: BTreeMap<String, MaterialRegion>,
    theme_revision: u64,
    regions_revision: u64,
}

impl Default for ShellBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellBridge {
    pub fn new() -> Self {
        Self {
            dark_mode: false,
            accent_color: "#007AFF".to_owned(),
            regions: BTreeMap::new(),
            theme_revision: 0,
            regions_revision: 0,
        }
    }

    pub fn from_config(config: &glaze_config::ThemeConfig) -> Self {
        let mut bridge = Self::new();
        bridge.dark_mode = config.dark_mode;
        if hex_rgba(&config.accent_color).is_some() {
            bridge.accent_color = config.accent_color.clone();
        } else {
            warn!("ignoring invalid accent color {:?}", config.accent_color);
        }
        bridge
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn set_dark_mode(&mut self, dark: bool) {
        if self.dark_mode == dark {
            return;
        }
        self.dark_mode = dark;
        self.theme_revision += 1;
    }

    pub fn accent_color(&self) -> &str {
        &self.accent_color
    }

    pub fn set_accent_color(&mut self, color: &str) {
        if self.accent_color == color {
            return;
        }
        if hex_rgba(color).is_none() {
            warn!("ignoring invalid accent color {color:?}");
            return;
        }
        self.accent_color = color.to_owned();
        self.theme_revision += 1;
    }

    pub fn accent_rgba(&self) -> Rgba {
        hex_rgba(&self.accent_color).unwrap_or(Rgba::TRANSPARENT)
    }

    /// Theme surface color for the current mode; the usual base for material
    /// surface tints (hosts scale the alpha).
    pub fn surface_rgba(&self) -> Rgba {
        let hex = if self.dark_mode { "#2C2C2E" } else { "#FFFFFF" };
        hex_rgba(hex).unwrap_or(Rgba::TRANSPARENT)
    }

    pub fn theme_revision(&self) -> u64 {
        self.theme_revision
    }

    pub fn regions_revision(&self) -> u64 {
        self.regions_revision
    }

    /// Route a web console message into the host log, mapping the level
    /// names used by the page side.
    pub fn log(&self, level: &str, message: &str) {
        let mapped = match level {
            "debug" => Level::Debug,
            "info" => Level::Info,
            "warn" => Level::Warn,
            "error" => Level::Error,
            other => {
                log!(target: "webview", Level::Info, "[{other}] {message}");
                return;
            }
        };
        log!(target: "webview", mapped, "{message}");
    }

    /// Theme tokens as one JSON-compatible snapshot.
    pub fn theme_tokens(&self) -> Value {
        json!({
            "colors": {
                "accent": self.accent_color,
                "background": if self.dark_mode { "#1C1C1E" } else { "#F2F2F7" },
                "surface": if self.dark_mode { "#2C2C2E" } else { "#FFFFFF" },
                "text": if self.dark_mode { "#FFFFFF" } else { "#000000" },
                "textSecondary": if self.dark_mode { "#8E8E93" } else { "#6C6C70" },
                "separator": if self.dark_mode { "#38383A" } else { "#C6C6C8" },
            },
            "spacing": { "xs": 4, "sm": 8, "md": 16, "lg": 24, "xl": 32 },
            "radius": { "sm": 4, "md": 8, "lg": 12, "xl": 16, "full": 9999 },
            "darkMode": self.dark_mode,
        })
    }

    /// Registered regions in stable id order.
    pub fn material_regions(&self) -> impl Iterator<Item = &MaterialRegion> {
        self.regions.values()
    }

    pub fn register_material_region(&mut self, region: MaterialRegion) -> Result<(), BridgeError> {
        if region.id.is_empty() {
            warn!("register_material_region: region must have an `id` field");
            return Err(BridgeError::MissingRegionId);
        }
        self.regions.insert(region.id.clone(), region);
        self.regions_revision += 1;
        Ok(())
    }

    pub fn unregister_material_region(&mut self, id: &str) {
        if self.regions.remove(id).is_some() {
            self.regions_revision += 1;
        }
    }

    pub fn update_material_region(&mut self, id: &str, updates: &Value) -> Result<(), BridgeError> {
        let Some(region) = self.regions.get_mut(id) else {
            warn!("update_material_region: unknown region id {id:?}");
            return Err(BridgeError::UnknownRegion(id.to_owned()));
        };
        let Some(fields) = updates.as_object() else {
            return Err(BridgeError::MalformedUpdate);
        };
        for (key, value) in fields {
            match (key.as_str(), value.as_f64()) {
                ("x", Some(v)) => region.x = v as f32,
                ("y", Some(v)) => region.y = v as f32,
                ("width", Some(v)) => region.width = v as f32,
                ("height", Some(v)) => region.height = v as f32,
                ("materialLevel", Some(v)) => region.material_level = v as i32,
                ("cornerRadius", Some(v)) => region.corner_radius = v as f32,
                _ => {}
            }
        }
        self.regions_revision += 1;
        Ok(())
    }

    /// Message-channel entry point: one request in, one JSON value out.
    pub fn handle(&mut self, request: BridgeRequest) -> Result<Value, BridgeError> {
        match request {
            BridgeRequest::Log { level, message } => {
                self.log(&level, &message);
                Ok(Value::Null)
            }
            BridgeRequest::GetThemeTokens => Ok(self.theme_tokens()),
            BridgeRequest::MaterialRegions => {
                Ok(serde_json::to_value(self.regions.values().collect::<Vec<_>>())
                    .unwrap_or(Value::Null))
            }
            BridgeRequest::RegisterMaterialRegion(region) => {
                self.register_material_region(region)?;
                Ok(Value::Null)
            }
            BridgeRequest::UnregisterMaterialRegion { id } => {
                self.unregister_material_region(&id);
                Ok(Value::Null)
            }
            BridgeRequest::UpdateMaterialRegion { id, updates } => {
                self.update_material_region(&id, &updates)?;
                Ok(Value::Null)
            }
        }
    }
}

fn hex_rgba(hex: &str) -> Option<Rgba> {
    let rgb: Srgb<u8> = hex.parse().ok()?;
    Some(Rgba::from_srgba_u8([rgb.red, rgb.green, rgb.blue, 255]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(id: &str) -> MaterialRegion {
        MaterialRegion {
            id: id.to_owned(),
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 40.0,
            material_level: 2,
            corner_radius: 8.0,
        }
    }

    #[test]
    fn register_requires_an_id() {
        let mut bridge = ShellBridge::new();
        assert_eq!(bridge.register_material_region(region("")), Err(BridgeError::MissingRegionId));
        assert_eq!(bridge.regions_revision(), 0);
        assert!(bridge.register_material_region(region("panel")).is_ok());
        assert_eq!(bridge.regions_revision(), 1);
    }

    #[test]
    fn unregister_notifies_only_on_removal() {
        let mut bridge = ShellBridge::new();
        bridge.register_material_region(region("panel")).unwrap();
        bridge.unregister_material_region("missing");
        assert_eq!(bridge.regions_revision(), 1);
        bridge.unregister_material_region("panel");
        assert_eq!(bridge.regions_revision(), 2);
        assert_eq!(bridge.material_regions().count(), 0);
    }

    #[test]
    fn update_merges_known_fields() {
        let mut bridge = ShellBridge::new();
        bridge.register_material_region(region("panel")).unwrap();
        bridge
            .update_material_region("panel", &json!({ "width": 250.0, "cornerRadius": 16.0 }))
            .unwrap();
        let updated = bridge.material_regions().next().unwrap();
        assert_eq!(updated.width, 250.0);
        assert_eq!(updated.corner_radius, 16.0);
        assert_eq!(updated.height, 40.0);
    }

    #[test]
    fn update_of_unknown_region_fails() {
        let mut bridge = ShellBridge::new();
        let err = bridge.update_material_region("ghost", &json!({ "x": 1.0 }));
        assert_eq!(err, Err(BridgeError::UnknownRegion("ghost".to_owned())));
    }

    #[test]
    fn theme_tokens_follow_dark_mode() {
        let mut bridge = ShellBridge::new();
        let light = bridge.theme_tokens();
        assert_eq!(light["colors"]["background"], "#F2F2F7");
        assert_eq!(light["darkMode"], false);
        bridge.set_dark_mode(true);
        let dark = bridge.theme_tokens();
        assert_eq!(dark["colors"]["background"], "#1C1C1E");
        assert_eq!(dark["colors"]["accent"], "#007AFF");
    }

    #[test]
    fn theme_setters_are_idempotent() {
        let mut bridge = ShellBridge::new();
        bridge.set_dark_mode(false);
        assert_eq!(bridge.theme_revision(), 0);
        bridge.set_dark_mode(true);
        assert_eq!(bridge.theme_revision(), 1);
        bridge.set_accent_color("#007AFF");
        assert_eq!(bridge.theme_revision(), 1);
        bridge.set_accent_color("#FF2D55");
        assert_eq!(bridge.theme_revision(), 2);
        bridge.set_accent_color("not-a-color");
        assert_eq!(bridge.accent_color(), "#FF2D55");
    }

    #[test]
    fn accent_parses_to_rgba() {
        let bridge = ShellBridge::new();
        let accent = bridge.accent_rgba();
        assert!((accent.r - 0.0).abs() < 1e-6);
        assert!((accent.b - 1.0).abs() < 1e-6);
        assert_eq!(accent.a, 1.0);
    }

    #[test]
    fn requests_round_trip_through_json() {
        let mut bridge = ShellBridge::new();
        let register: BridgeRequest = serde_json::from_value(json!({
            "method": "registerMaterialRegion",
            "params": { "id": "bar", "x": 0, "y": 0, "width": 400, "height": 32,
                        "materialLevel": 3, "cornerRadius": 12 }
        }))
        .unwrap();
        bridge.handle(register).unwrap();

        let list: BridgeRequest =
            serde_json::from_value(json!({ "method": "materialRegions" })).unwrap();
        let regions = bridge.handle(list).unwrap();
        assert_eq!(regions[0]["id"], "bar");
        assert_eq!(regions[0]["materialLevel"], 3);

        let tokens: BridgeRequest =
            serde_json::from_value(json!({ "method": "getThemeTokens" })).unwrap();
        assert_eq!(bridge.handle(tokens).unwrap()["spacing"]["md"], 16);
    }
}
