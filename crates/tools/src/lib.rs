//! Developer Tooling: scene inspector and debug-panel bindings.
//!
//! # Invariants
//! - Panel sliders write straight through to the live scene object.
//! - A slider only ever touches its own target.

mod inspector;
mod panel;

pub use inspector::{ObjectInfo, SceneInspector, SceneSummary};
pub use panel::{DebugPanel, PanelError, SliderBinding};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
