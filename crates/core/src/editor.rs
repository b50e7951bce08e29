//! Admin editing: typed commands that each produce a whole new configuration.
//!
//! Commands are validated against the current configuration; a rejected
//! command leaves the model untouched.

use crate::error::{Error, Result};
use crate::image;
use crate::store::{PresentationStore, Storage};
use crate::types::{
    Feature, Module, ModuleColor, ModuleIcon, PresentationConfig, MAX_FEATURES_PER_MODULE,
    MODULE_COUNT,
};
use std::fmt;
use std::sync::Arc;

/// Change to a single feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureEdit {
    SetTitle(String),
    /// Rich-text HTML.
    SetDescription(String),
    SetBeta(bool),
    SetImage(String),
}

impl FeatureEdit {
    fn apply_to(&self, feature: &mut Feature) {
        match self {
            FeatureEdit::SetTitle(title) => feature.title = title.clone(),
            FeatureEdit::SetDescription(html) => feature.description = html.clone(),
            FeatureEdit::SetBeta(beta) => feature.is_beta = *beta,
            FeatureEdit::SetImage(reference) => feature.image = reference.clone(),
        }
    }
}

/// A configuration edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    SetIntroTitle(String),
    SetIntroSubtitle(String),
    SetHeroImage(String),
    SetStatementTitle(String),
    SetStatementDescription(String),
    SetThankYouTitle(String),
    SetThankYouDescription(String),
    SetModuleName { module: usize, name: String },
    SetModuleColor { module: usize, color: ModuleColor },
    SetModuleIcon { module: usize, icon: ModuleIcon },
    ToggleModuleVisibility { module: usize },
    /// Append a placeholder feature, up to [`MAX_FEATURES_PER_MODULE`].
    AddFeature { module: usize },
    RemoveFeature { module: usize, feature: usize },
    UpdateFeature {
        module: usize,
        feature: usize,
        edit: FeatureEdit,
    },
}

impl EditCommand {
    /// Produce the configuration with this edit applied.
    pub fn apply(&self, config: &PresentationConfig) -> Result<PresentationConfig> {
        let mut next = config.clone();
        match self {
            EditCommand::SetIntroTitle(v) => next.intro_title = v.clone(),
            EditCommand::SetIntroSubtitle(v) => next.intro_subtitle = v.clone(),
            EditCommand::SetHeroImage(v) => next.hero_image = v.clone(),
            EditCommand::SetStatementTitle(v) => next.statement_title = v.clone(),
            EditCommand::SetStatementDescription(v) => next.statement_description = v.clone(),
            EditCommand::SetThankYouTitle(v) => next.thank_you_title = v.clone(),
            EditCommand::SetThankYouDescription(v) => next.thank_you_description = v.clone(),
            EditCommand::SetModuleName { module, name } => {
                module_mut(&mut next, *module)?.name = name.clone();
            }
            EditCommand::SetModuleColor { module, color } => {
                module_mut(&mut next, *module)?.color = *color;
            }
            EditCommand::SetModuleIcon { module, icon } => {
                module_mut(&mut next, *module)?.icon = *icon;
            }
            EditCommand::ToggleModuleVisibility { module } => {
                let m = module_mut(&mut next, *module)?;
                m.visible = !m.visible;
            }
            EditCommand::AddFeature { module } => {
                let m = module_mut(&mut next, *module)?;
                if !m.can_add_feature() {
                    return Err(Error::FeatureLimitReached {
                        max: MAX_FEATURES_PER_MODULE,
                    });
                }
                let id = m.features.len() as u32 + 1;
                m.features.push(Feature::placeholder(id));
            }
            EditCommand::RemoveFeature { module, feature } => {
                let m = module_mut(&mut next, *module)?;
                if *feature >= m.features.len() {
                    return Err(Error::FeatureOutOfRange {
                        module: *module,
                        feature: *feature,
                    });
                }
                m.features.remove(*feature);
            }
            EditCommand::UpdateFeature {
                module,
                feature,
                edit,
            } => {
                let f = module_mut(&mut next, *module)?
                    .features
                    .get_mut(*feature)
                    .ok_or(Error::FeatureOutOfRange {
                        module: *module,
                        feature: *feature,
                    })?;
                edit.apply_to(f);
            }
        }
        Ok(next)
    }
}

fn module_mut(config: &mut PresentationConfig, index: usize) -> Result<&mut Module> {
    config
        .modules
        .get_mut(index)
        .ok_or(Error::ModuleOutOfRange(index))
}

/// Editor tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorTab {
    Intro,
    Statement,
    Module(usize),
    ThankYou,
}

impl EditorTab {
    /// Every tab: intro, statement, the ten modules, thank-you.
    pub fn all() -> Vec<EditorTab> {
        let mut tabs = vec![EditorTab::Intro, EditorTab::Statement];
        tabs.extend((0..MODULE_COUNT).map(EditorTab::Module));
        tabs.push(EditorTab::ThankYou);
        tabs
    }

    /// Tab label; module tabs use the module's name.
    pub fn label(self, config: &PresentationConfig) -> String {
        match self {
            EditorTab::Intro => "Intro".to_string(),
            EditorTab::Statement => "Statement".to_string(),
            EditorTab::Module(i) => config
                .modules
                .get(i)
                .map(|m| m.name.clone())
                .unwrap_or_else(|| format!("Module {}", i + 1)),
            EditorTab::ThankYou => "Thank You".to_string(),
        }
    }
}

/// Where an uploaded image goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTarget {
    Hero,
    Feature { module: usize, feature: usize },
}

/// A file picked by the user, already turned into a reference (data URI or
/// blob URI) by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub mime_type: String,
    pub size: u64,
    pub reference: String,
}

impl ImageUpload {
    /// Validate the upload and build the command storing it at `target`.
    pub fn into_command(self, target: ImageTarget) -> Result<EditCommand> {
        image::validate_upload(&self.mime_type, self.size)?;
        Ok(match target {
            ImageTarget::Hero => EditCommand::SetHeroImage(self.reference),
            ImageTarget::Feature { module, feature } => EditCommand::UpdateFeature {
                module,
                feature,
                edit: FeatureEdit::SetImage(self.reference),
            },
        })
    }
}

/// Rich-text input capability: current HTML, replace it, observe edits.
pub trait RichTextControl {
    /// Current HTML value.
    fn value(&self) -> &str;

    /// Replace the content without notifying listeners.
    fn set_value(&mut self, html: &str);

    /// Register the callback invoked with the new HTML on every user edit.
    fn on_change(&mut self, callback: Box<dyn FnMut(&str)>);
}

/// In-memory [`RichTextControl`], used by non-browser hosts.
#[derive(Default)]
pub struct HtmlBuffer {
    html: String,
    listeners: Vec<Box<dyn FnMut(&str)>>,
}

impl HtmlBuffer {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            listeners: Vec::new(),
        }
    }

    /// Simulate a user edit: update the content and notify listeners.
    pub fn input(&mut self, html: &str) {
        self.html = html.to_string();
        for listener in self.listeners.iter_mut() {
            listener(html);
        }
    }
}

impl RichTextControl for HtmlBuffer {
    fn value(&self) -> &str {
        &self.html
    }

    fn set_value(&mut self, html: &str) {
        self.html = html.to_string();
    }

    fn on_change(&mut self, callback: Box<dyn FnMut(&str)>) {
        self.listeners.push(callback);
    }
}

impl fmt::Debug for HtmlBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlBuffer")
            .field("html", &self.html)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Editing session: active tab and the last inline message.
#[derive(Debug, Clone)]
pub struct Editor {
    tab: EditorTab,
    message: Option<String>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self {
            tab: EditorTab::Intro,
            message: None,
        }
    }

    pub fn tab(&self) -> EditorTab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: EditorTab) {
        self.tab = tab;
        self.message = None;
    }

    /// Inline message from the last rejected command.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Apply `command` through the store. Validation failures are kept as the
    /// inline message and returned.
    pub fn apply<S: Storage>(
        &mut self,
        store: &mut PresentationStore<S>,
        command: &EditCommand,
    ) -> Result<Arc<PresentationConfig>> {
        match store.try_update(|current| command.apply(current)) {
            Ok(config) => {
                self.message = None;
                Ok(config)
            }
            Err(e) => {
                if e.is_validation() {
                    log::info!("Edit rejected: {}", e);
                    self.message = Some(e.to_string());
                }
                Err(e)
            }
        }
    }

    /// Validate an upload and store it at `target`.
    pub fn upload<S: Storage>(
        &mut self,
        store: &mut PresentationStore<S>,
        target: ImageTarget,
        upload: ImageUpload,
    ) -> Result<Arc<PresentationConfig>> {
        match upload.into_command(target) {
            Ok(command) => self.apply(store, &command),
            Err(e) => {
                self.message = Some(e.to_string());
                Err(e)
            }
        }
    }
}
