//! glaze-scene: scene items and shell collaborators around material surfaces.
//!
//! [`MaterialSurface`] is the property-owning front end of a render node;
//! its `update_paint_node` is the once-per-frame handoff into the render
//! thread. [`WebContentView`] and [`ShellBridge`] are the two shell-side
//! components the material surfaces exist to serve: the web overlay with
//! lifecycle management, and the request/response object embedded pages use
//! to register the regions that need glass behind them.

mod bridge;
mod layer;
mod surface;
mod webview;

pub use bridge::{BridgeError, BridgeRequest, MaterialRegion, ShellBridge};
pub use layer::{RegionStack, SurfaceLayer};
pub use surface::MaterialSurface;
pub use webview::{LifecycleState, WebContentView};
