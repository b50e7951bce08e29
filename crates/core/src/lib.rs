//! Core of Showcase Gallery: the presentation model, its persisted store
//! with backward-compatible migration, the session gate, the viewer's
//! navigation state machine, admin editing commands and the export pipeline.

pub mod crop;
pub mod defaults;
pub mod editor;
pub mod error;
pub mod export;
pub mod image;
pub mod migrate;
pub mod navigation;
pub mod session;
pub mod settings;
pub mod store;
pub mod text;
pub mod types;
pub mod typewriter;
pub mod viewer;

pub use defaults::default_config;
pub use editor::{EditCommand, Editor, EditorTab, FeatureEdit, ImageTarget, ImageUpload};
pub use error::{Error, Result};
pub use export::{
    DocumentSink, ExportOptions, ExportOutput, ExportPlan, Exporter, FontProvider, ImageLoader,
    PageLayout, Rasterizer,
};
pub use migrate::MigrationReport;
pub use navigation::{Key, Navigator, ViewState};
pub use session::SessionGate;
pub use settings::Settings;
pub use store::{MemoryStorage, PresentationStore, Storage};
pub use types::{Feature, Module, ModuleColor, ModuleIcon, PresentationConfig};
pub use viewer::{Screen, Viewer};
