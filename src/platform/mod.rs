//! Collaborators around the simulation core
//!
//! - `ui`: screen and message panel calls made by the game
//! - `input`: keyboard mapping and touch steering
//! - `assets`: image manifest and preload bookkeeping
//!
//! Browser implementations are compiled only for `wasm32`.

pub mod assets;
pub mod input;
pub mod ui;

pub use assets::{AssetError, ImageCatalog, PreloadReport};
pub use input::{KeyAction, map_key, touch_steer};
pub use ui::{RecordingUi, UiEvent, UiSink};
