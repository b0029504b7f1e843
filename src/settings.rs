//! Sketch settings and preferences
//!
//! Persisted as JSON: a file on native, LocalStorage in the browser.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::ShapeKind;

/// Sketch settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    /// Arena width in pixels
    pub width: f32,
    /// Arena height in pixels
    pub height: f32,
    /// RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,

    // === Selection defaults ===
    pub shape: ShapeKind,
    /// Shape size slider, [5, 25]
    pub size: f32,
    /// Hue slider, [0, 360)
    pub hue: f32,
    /// Random shapes dropped in at startup
    pub initial_shapes: u32,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_ARENA_WIDTH,
            height: DEFAULT_ARENA_HEIGHT,
            seed: None,

            shape: ShapeKind::Ball,
            size: DEFAULT_SIZE,
            hue: DEFAULT_HUE,
            initial_shapes: 0,

            master_volume: 0.8,
            muted: false,
        }
    }
}

impl Settings {
    /// Seed to use for this run
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or_else(crate::platform::clock_seed)
    }

    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Build a world from these settings. Setup is not user input, so the
    /// interaction log starts empty.
    pub fn build_world<S: crate::AudioSink + ?Sized>(&self, sink: &mut S) -> crate::sim::World {
        let mut world = crate::sim::World::new(self.width, self.height, self.effective_seed());
        let selection = crate::sim::Selection {
            kind: self.shape,
            size: self.size,
            hue: self.hue,
        };
        world.apply_selection(selection, sink);
        world.seed_random_shapes(self.initial_shapes, sink);
        world
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "sonic_shapes_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
