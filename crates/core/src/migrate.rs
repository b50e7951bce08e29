//! Backward-compatible migration of stored configurations.
//!
//! Stored data carries no version field; migration is purely shape-based.
//! Older saves may lack later fields, hold fewer modules, or reference
//! transient blob images. Loading always yields a complete
//! [`PresentationConfig`] with exactly [`MODULE_COUNT`] modules.

use crate::defaults;
use crate::error::Result;
use crate::image::{self, HERO_PLACEHOLDER};
use crate::types::{Feature, Module, ModuleColor, ModuleIcon, PresentationConfig, MODULE_COUNT};
use serde::{Deserialize, Serialize};

/// A configuration as found in storage, with every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredConfig {
    pub intro_title: Option<String>,
    pub intro_subtitle: Option<String>,
    pub hero_image: Option<String>,
    pub statement_title: Option<String>,
    pub statement_description: Option<String>,
    pub thank_you_title: Option<String>,
    pub thank_you_description: Option<String>,
    pub modules: Option<Vec<StoredModule>>,
}

/// A module as found in storage.
#[derive(Debug, Default, Deserialize)]
pub struct StoredModule {
    #[serde(rename = "module")]
    pub name: Option<String>,
    pub color: Option<ModuleColor>,
    pub icon: Option<String>,
    pub visible: Option<bool>,
    #[serde(default)]
    pub features: Vec<StoredFeature>,
}

/// A feature as found in storage.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFeature {
    pub id: Option<u32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub is_beta: Option<bool>,
}

/// What a migration had to change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    /// Top-level text/image fields filled from defaults.
    pub backfilled_fields: Vec<&'static str>,
    /// Modules that had no icon.
    pub backfilled_icons: usize,
    /// Modules that had no visibility flag.
    pub backfilled_visibility: usize,
    /// Modules appended from positional defaults.
    pub padded_modules: usize,
    /// Blob references replaced with placeholders.
    pub sanitized_images: usize,
}

impl MigrationReport {
    /// Whether the stored data was already in the current shape.
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Parse a stored JSON string and migrate it.
pub fn migrate_str(raw: &str) -> Result<(PresentationConfig, MigrationReport)> {
    let stored: StoredConfig = serde_json::from_str(raw)?;
    Ok(migrate(stored))
}

/// Migrate a stored configuration into the current shape.
///
/// Steps, in order: backfill top-level fields, backfill per-module icon and
/// visibility, pad modules to [`MODULE_COUNT`], sanitize blob images.
pub fn migrate(stored: StoredConfig) -> (PresentationConfig, MigrationReport) {
    let mut report = MigrationReport::default();

    let mut backfill = |value: Option<String>, field: &'static str, default: &str| match value {
        Some(v) => v,
        None => {
            report.backfilled_fields.push(field);
            default.to_string()
        }
    };

    let intro_title = backfill(stored.intro_title, "introTitle", defaults::INTRO_TITLE);
    let intro_subtitle = backfill(stored.intro_subtitle, "introSubtitle", defaults::INTRO_SUBTITLE);
    let hero_image = backfill(stored.hero_image, "heroImage", HERO_PLACEHOLDER);
    let statement_title = backfill(
        stored.statement_title,
        "statementTitle",
        defaults::STATEMENT_TITLE,
    );
    let statement_description = backfill(
        stored.statement_description,
        "statementDescription",
        defaults::STATEMENT_DESCRIPTION,
    );
    let thank_you_title = backfill(
        stored.thank_you_title,
        "thankYouTitle",
        defaults::THANK_YOU_TITLE,
    );
    let thank_you_description = backfill(
        stored.thank_you_description,
        "thankYouDescription",
        defaults::THANK_YOU_DESCRIPTION,
    );

    let mut modules: Vec<Module> = stored
        .modules
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, module)| migrate_module(index, module, &mut report))
        .collect();

    while modules.len() < MODULE_COUNT {
        match defaults::default_module(modules.len()) {
            Some(module) => {
                modules.push(module);
                report.padded_modules += 1;
            }
            None => break,
        }
    }

    let mut config = PresentationConfig {
        intro_title,
        intro_subtitle,
        hero_image,
        statement_title,
        statement_description,
        thank_you_title,
        thank_you_description,
        modules,
    };

    report.sanitized_images = sanitize_images(&mut config);

    log::debug!("Migration report: {:?}", report);
    (config, report)
}

/// Replace every blob image reference with a durable placeholder.
///
/// Returns the number of references replaced.
pub fn sanitize_images(config: &mut PresentationConfig) -> usize {
    let mut replaced = 0;

    if let Some(placeholder) = image::sanitize_blob(&config.hero_image, || {
        HERO_PLACEHOLDER.to_string()
    }) {
        config.hero_image = placeholder;
        replaced += 1;
    }

    for feature in config.modules.iter_mut().flat_map(|m| m.features.iter_mut()) {
        let title = &feature.title;
        if let Some(placeholder) =
            image::sanitize_blob(&feature.image, || image::feature_placeholder(title))
        {
            feature.image = placeholder;
            replaced += 1;
        }
    }

    replaced
}

fn migrate_module(index: usize, stored: StoredModule, report: &mut MigrationReport) -> Module {
    let fallback = defaults::default_module(index);

    let icon = match stored.icon.as_deref() {
        Some(name) if !name.is_empty() => ModuleIcon::from_name(name),
        _ => {
            report.backfilled_icons += 1;
            defaults::default_icon(index)
        }
    };

    let visible = stored.visible.unwrap_or_else(|| {
        report.backfilled_visibility += 1;
        true
    });

    let name = stored
        .name
        .or_else(|| fallback.as_ref().map(|m| m.name.clone()))
        .unwrap_or_else(|| format!("Module {}", index + 1));

    let color = stored
        .color
        .or_else(|| fallback.as_ref().map(|m| m.color))
        .unwrap_or(ModuleColor::Blue);

    let features = stored
        .features
        .into_iter()
        .enumerate()
        .map(|(i, feature)| Feature {
            id: feature.id.unwrap_or(i as u32 + 1),
            title: feature.title.unwrap_or_default(),
            description: feature.description.unwrap_or_default(),
            image: feature.image.unwrap_or_default(),
            is_beta: feature.is_beta.unwrap_or(false),
        })
        .collect();

    Module {
        name,
        color,
        icon,
        visible,
        features,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_config;

    #[test]
    fn test_migrate_current_shape_is_clean() {
        let json = serde_json::to_string(&default_config()).unwrap();
        let (config, report) = migrate_str(&json).unwrap();

        assert!(report.is_clean(), "unexpected changes: {:?}", report);
        assert_eq!(config, default_config());
    }

    #[test]
    fn test_backfill_missing_text_fields() {
        let json = r#"{
            "introTitle": "Spring Launch",
            "heroImage": "",
            "modules": []
        }"#;
        let (config, report) = migrate_str(json).unwrap();

        assert_eq!(config.intro_title, "Spring Launch");
        assert_eq!(config.hero_image, "");
        assert_eq!(config.intro_subtitle, defaults::INTRO_SUBTITLE);
        assert_eq!(config.thank_you_title, defaults::THANK_YOU_TITLE);
        assert_eq!(config.statement_title, defaults::STATEMENT_TITLE);
        assert_eq!(
            report.backfilled_fields,
            vec![
                "introSubtitle",
                "statementTitle",
                "statementDescription",
                "thankYouTitle",
                "thankYouDescription"
            ]
        );
    }

    #[test]
    fn test_explicit_empty_strings_are_kept() {
        let json = r#"{ "introSubtitle": "", "thankYouDescription": "" }"#;
        let (config, _) = migrate_str(json).unwrap();
        assert_eq!(config.intro_subtitle, "");
        assert_eq!(config.thank_you_description, "");
    }

    #[test]
    fn test_module_icon_and_visibility_backfill() {
        let json = r#"{
            "modules": [
                { "module": "Data", "color": "bg-blue-500", "features": [] },
                { "module": "Eng", "color": "bg-green-500", "icon": "", "visible": false, "features": [] },
                { "module": "Sec", "color": "bg-red-500", "icon": "Zap", "visible": true, "features": [] }
            ]
        }"#;
        let (config, report) = migrate_str(json).unwrap();

        assert_eq!(config.modules[0].icon, ModuleIcon::BarChart3);
        assert!(config.modules[0].visible);
        assert_eq!(config.modules[1].icon, ModuleIcon::Code);
        assert!(!config.modules[1].visible);
        assert_eq!(config.modules[2].icon, ModuleIcon::Zap);
        assert_eq!(report.backfilled_icons, 2);
        assert_eq!(report.backfilled_visibility, 1);
    }

    #[test]
    fn test_pads_to_ten_modules_without_touching_existing() {
        let json = r#"{
            "modules": [
                { "module": "Only", "color": "bg-pink-500", "icon": "Users", "visible": true,
                  "features": [ { "id": 7, "title": "Kept", "description": "<b>x</b>", "image": "", "isBeta": true } ] }
            ]
        }"#;
        let (config, report) = migrate_str(json).unwrap();

        assert_eq!(config.modules.len(), MODULE_COUNT);
        assert_eq!(report.padded_modules, 9);
        assert_eq!(config.modules[0].name, "Only");
        assert_eq!(config.modules[0].features[0].id, 7);
        assert!(config.modules[0].features[0].is_beta);
        assert_eq!(config.modules[1], defaults::default_module(1).unwrap());
    }

    #[test]
    fn test_never_truncates_modules() {
        let mut config = default_config();
        let extra = config.modules[0].clone();
        config.modules.push(extra);
        let json = serde_json::to_string(&config).unwrap();

        let (migrated, _) = migrate_str(&json).unwrap();
        assert_eq!(migrated.modules.len(), MODULE_COUNT + 1);
    }

    #[test]
    fn test_blob_images_replaced_data_uris_kept() {
        let mut config = default_config();
        config.hero_image = "blob:http://localhost/hero".to_string();
        config.modules[0].features[0].image = "blob:http://localhost/f".to_string();
        config.modules[0].features[1].image = "data:image/png;base64,AAAA".to_string();
        let json = serde_json::to_string(&config).unwrap();

        let (migrated, report) = migrate_str(&json).unwrap();

        assert_eq!(report.sanitized_images, 2);
        assert_eq!(migrated.hero_image, HERO_PLACEHOLDER);
        assert_eq!(
            migrated.modules[0].features[0].image,
            "/placeholder.svg?height=400&width=600&text=Advanced%20Analytics"
        );
        assert_eq!(
            migrated.modules[0].features[1].image,
            "data:image/png;base64,AAAA"
        );
    }

    #[test]
    fn test_feature_field_defaults() {
        let json = r#"{ "modules": [ { "module": "M", "features": [ { "title": "T" } ] } ] }"#;
        let (config, _) = migrate_str(json).unwrap();
        let feature = &config.modules[0].features[0];

        assert_eq!(feature.id, 1);
        assert_eq!(feature.title, "T");
        assert!(!feature.is_beta);
        assert_eq!(config.modules[0].color, ModuleColor::Blue);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(migrate_str("{ not json").is_err());
        assert!(migrate_str("42").is_err());
    }
}
