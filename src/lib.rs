//! Settings persistence and theming for the CyberShield security console.
//!
//! The core ([`store`], [`registry`], [`controller`]) only talks to an
//! injected [`storage::Storage`] and a [`surface::Surface`]; the terminal
//! front end in [`settings`] is one such surface.

pub mod config;
pub mod controller;
pub mod effects;
pub mod error;
pub mod registry;
pub mod settings;
pub mod status;
pub mod storage;
pub mod store;
pub mod surface;
pub mod theme;
pub mod ui;
pub mod value;

pub use controller::SettingsController;
pub use error::{SettingsError, StorageError};
pub use registry::{SettingKind, SettingSpec, SettingsRegistry, SliderUnit};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{ExportArtifact, SettingsStore};
pub use surface::{Controls, MemorySurface, NotificationLevel, Notifier, Surface, ThemeSink};
pub use theme::ThemeId;
pub use value::{SettingValue, SettingsMap};
