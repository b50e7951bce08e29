//! Serde shapes exchanged with JavaScript.

use serde::{Deserialize, Serialize};
use showcase_core::export::PlannedPage;
use showcase_core::viewer::ModuleCard;
use showcase_core::{
    EditCommand, FeatureEdit, ImageTarget, ImageUpload, ModuleColor, ModuleIcon, Screen,
};

/// An admin edit as sent from the editor UI, e.g.
/// `{ "type": "setModuleName", "module": 2, "name": "Security" }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditRequest {
    SetIntroTitle { value: String },
    SetIntroSubtitle { value: String },
    SetHeroImage { value: String },
    SetStatementTitle { value: String },
    SetStatementDescription { value: String },
    SetThankYouTitle { value: String },
    SetThankYouDescription { value: String },
    SetModuleName { module: usize, name: String },
    SetModuleColor { module: usize, color: ModuleColor },
    SetModuleIcon { module: usize, icon: ModuleIcon },
    ToggleModuleVisibility { module: usize },
    AddFeature { module: usize },
    RemoveFeature { module: usize, feature: usize },
    SetFeatureTitle { module: usize, feature: usize, value: String },
    SetFeatureDescription { module: usize, feature: usize, value: String },
    SetFeatureBeta { module: usize, feature: usize, beta: bool },
    SetFeatureImage { module: usize, feature: usize, value: String },
}

impl From<EditRequest> for EditCommand {
    fn from(request: EditRequest) -> Self {
        let update = |module, feature, edit| EditCommand::UpdateFeature {
            module,
            feature,
            edit,
        };

        match request {
            EditRequest::SetIntroTitle { value } => EditCommand::SetIntroTitle(value),
            EditRequest::SetIntroSubtitle { value } => EditCommand::SetIntroSubtitle(value),
            EditRequest::SetHeroImage { value } => EditCommand::SetHeroImage(value),
            EditRequest::SetStatementTitle { value } => EditCommand::SetStatementTitle(value),
            EditRequest::SetStatementDescription { value } => {
                EditCommand::SetStatementDescription(value)
            }
            EditRequest::SetThankYouTitle { value } => EditCommand::SetThankYouTitle(value),
            EditRequest::SetThankYouDescription { value } => {
                EditCommand::SetThankYouDescription(value)
            }
            EditRequest::SetModuleName { module, name } => {
                EditCommand::SetModuleName { module, name }
            }
            EditRequest::SetModuleColor { module, color } => {
                EditCommand::SetModuleColor { module, color }
            }
            EditRequest::SetModuleIcon { module, icon } => {
                EditCommand::SetModuleIcon { module, icon }
            }
            EditRequest::ToggleModuleVisibility { module } => {
                EditCommand::ToggleModuleVisibility { module }
            }
            EditRequest::AddFeature { module } => EditCommand::AddFeature { module },
            EditRequest::RemoveFeature { module, feature } => {
                EditCommand::RemoveFeature { module, feature }
            }
            EditRequest::SetFeatureTitle {
                module,
                feature,
                value,
            } => update(module, feature, FeatureEdit::SetTitle(value)),
            EditRequest::SetFeatureDescription {
                module,
                feature,
                value,
            } => update(module, feature, FeatureEdit::SetDescription(value)),
            EditRequest::SetFeatureBeta {
                module,
                feature,
                beta,
            } => update(module, feature, FeatureEdit::SetBeta(beta)),
            EditRequest::SetFeatureImage {
                module,
                feature,
                value,
            } => update(module, feature, FeatureEdit::SetImage(value)),
        }
    }
}

/// A picked image file. Without `module` the upload targets the hero image.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub module: Option<usize>,
    #[serde(default)]
    pub feature: usize,
    pub mime_type: String,
    pub size: u64,
    /// Data URI or blob URI created by the page.
    pub reference: String,
}

impl UploadRequest {
    pub fn into_parts(self) -> (ImageTarget, ImageUpload) {
        let target = match self.module {
            Some(module) => ImageTarget::Feature {
                module,
                feature: self.feature,
            },
            None => ImageTarget::Hero,
        };
        let upload = ImageUpload {
            mime_type: self.mime_type,
            size: self.size,
            reference: self.reference,
        };
        (target, upload)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub name: String,
    pub color: ModuleColor,
    pub color_hex: &'static str,
    pub icon: ModuleIcon,
    pub feature_label: String,
}

impl From<ModuleCard> for CardView {
    fn from(card: ModuleCard) -> Self {
        Self {
            name: card.name,
            color: card.color,
            color_hex: card.color.hex(),
            icon: card.icon,
            feature_label: card.feature_label,
        }
    }
}

/// The current page, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ScreenView {
    Intro {
        title: String,
        caret: bool,
        subtitle: String,
        hero_image: String,
        cards: Option<Vec<CardView>>,
    },
    Statement {
        title: String,
        description: String,
    },
    ModuleLoading {
        module_name: String,
        color_hex: &'static str,
        icon: ModuleIcon,
    },
    Feature {
        module_name: String,
        color_hex: &'static str,
        icon: ModuleIcon,
        tabs: Vec<String>,
        feature_index: usize,
        title: String,
        description: String,
        image: String,
        is_beta: bool,
    },
    EmptyModule {
        module_name: String,
        color_hex: &'static str,
        icon: ModuleIcon,
    },
    ThankYou {
        title: String,
        description: String,
    },
}

impl From<Screen> for ScreenView {
    fn from(screen: Screen) -> Self {
        match screen {
            Screen::Intro {
                title,
                caret,
                subtitle,
                hero_image,
                cards,
            } => ScreenView::Intro {
                title,
                caret,
                subtitle,
                hero_image,
                cards: cards.map(|cards| cards.into_iter().map(CardView::from).collect()),
            },
            Screen::Statement { title, description } => {
                ScreenView::Statement { title, description }
            }
            Screen::ModuleLoading {
                module_name,
                color,
                icon,
            } => ScreenView::ModuleLoading {
                module_name,
                color_hex: color.hex(),
                icon,
            },
            Screen::Feature {
                module_name,
                color,
                icon,
                tabs,
                feature_index,
                title,
                description,
                image,
                is_beta,
            } => ScreenView::Feature {
                module_name,
                color_hex: color.hex(),
                icon,
                tabs,
                feature_index,
                title,
                description,
                image,
                is_beta,
            },
            Screen::EmptyModule {
                module_name,
                color,
                icon,
            } => ScreenView::EmptyModule {
                module_name,
                color_hex: color.hex(),
                icon,
            },
            Screen::ThankYou { title, description } => ScreenView::ThankYou { title, description },
        }
    }
}

/// One planned export page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PlanEntry {
    Intro,
    Statement,
    Feature { module: usize, feature: usize },
    ThankYou,
}

impl From<&PlannedPage> for PlanEntry {
    fn from(page: &PlannedPage) -> Self {
        match *page {
            PlannedPage::Intro => PlanEntry::Intro,
            PlannedPage::Statement => PlanEntry::Statement,
            PlannedPage::Feature { module, feature } => PlanEntry::Feature { module, feature },
            PlannedPage::ThankYou => PlanEntry::ThankYou,
        }
    }
}
