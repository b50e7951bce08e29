//! Domain types for a presentation configuration.

use serde::{Deserialize, Serialize};

/// Number of modules a configuration always holds.
pub const MODULE_COUNT: usize = 10;

/// Maximum number of features the editor lets a module hold.
pub const MAX_FEATURES_PER_MODULE: usize = 4;

/// The whole presentation: intro, statement, modules and thank-you slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationConfig {
    pub intro_title: String,
    pub intro_subtitle: String,
    /// Image reference shown beside the intro title.
    pub hero_image: String,
    pub statement_title: String,
    /// Rich-text HTML fragment.
    pub statement_description: String,
    pub thank_you_title: String,
    pub thank_you_description: String,
    /// Always [`MODULE_COUNT`] entries after load.
    pub modules: Vec<Module>,
}

impl PresentationConfig {
    /// Modules that take part in navigation and export, with their index in
    /// [`PresentationConfig::modules`].
    pub fn visible_modules(&self) -> impl Iterator<Item = (usize, &Module)> {
        self.modules.iter().enumerate().filter(|(_, m)| m.visible)
    }

    /// Number of visible modules.
    pub fn visible_module_count(&self) -> usize {
        self.modules.iter().filter(|m| m.visible).count()
    }

    /// The `n`-th visible module, with its index in the full module list.
    pub fn nth_visible_module(&self, n: usize) -> Option<(usize, &Module)> {
        self.visible_modules().nth(n)
    }

    /// Total number of features across all visible modules.
    pub fn visible_feature_count(&self) -> usize {
        self.visible_modules().map(|(_, m)| m.features.len()).sum()
    }
}

/// A named, coloured, icon-tagged group of features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Display name.
    #[serde(rename = "module")]
    pub name: String,
    pub color: ModuleColor,
    pub icon: ModuleIcon,
    /// Hidden modules keep their data but are skipped by the viewer and export.
    pub visible: bool,
    pub features: Vec<Feature>,
}

impl Module {
    /// Whether another feature may be added.
    pub fn can_add_feature(&self) -> bool {
        self.features.len() < MAX_FEATURES_PER_MODULE
    }

    /// "1 feature" / "3 features" label used on module cards.
    pub fn feature_count_label(&self) -> String {
        let count = self.features.len();
        format!("{} feature{}", count, if count == 1 { "" } else { "s" })
    }
}

/// One slide's worth of content inside a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    /// Display/ordering aid; not guaranteed unique.
    pub id: u32,
    pub title: String,
    /// Rich-text HTML fragment.
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub is_beta: bool,
}

impl Feature {
    /// Placeholder content for a freshly added feature.
    pub fn placeholder(id: u32) -> Self {
        Self {
            id,
            title: "New Feature".to_string(),
            description: "Feature description".to_string(),
            image: crate::image::NEW_FEATURE_PLACEHOLDER.to_string(),
            is_beta: false,
        }
    }
}

/// Palette tokens a module can be coloured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModuleColor {
    Blue,
    Green,
    Red,
    Purple,
    Orange,
    Indigo,
    Teal,
    Pink,
    Yellow,
    Cyan,
}

impl ModuleColor {
    /// All palette entries in editor order.
    pub const ALL: [ModuleColor; 10] = [
        Self::Blue,
        Self::Green,
        Self::Red,
        Self::Purple,
        Self::Orange,
        Self::Indigo,
        Self::Teal,
        Self::Pink,
        Self::Yellow,
        Self::Cyan,
    ];

    /// Stored token (a utility class name).
    pub fn token(self) -> &'static str {
        match self {
            Self::Blue => "bg-blue-500",
            Self::Green => "bg-green-500",
            Self::Red => "bg-red-500",
            Self::Purple => "bg-purple-500",
            Self::Orange => "bg-orange-500",
            Self::Indigo => "bg-indigo-500",
            Self::Teal => "bg-[#00BFA5]",
            Self::Pink => "bg-pink-500",
            Self::Yellow => "bg-yellow-500",
            Self::Cyan => "bg-cyan-500",
        }
    }

    /// Parse a stored token. Unknown tokens fall back to blue.
    pub fn from_token(token: &str) -> Self {
        match token {
            "bg-green-500" => Self::Green,
            "bg-red-500" => Self::Red,
            "bg-purple-500" => Self::Purple,
            "bg-orange-500" => Self::Orange,
            "bg-indigo-500" => Self::Indigo,
            "bg-[#00BFA5]" | "bg-teal-500" => Self::Teal,
            "bg-pink-500" => Self::Pink,
            "bg-yellow-500" => Self::Yellow,
            "bg-cyan-500" => Self::Cyan,
            _ => Self::Blue,
        }
    }

    /// Hex colour used when laying out exported pages.
    pub fn hex(self) -> &'static str {
        match self {
            Self::Blue => "#3b82f6",
            Self::Green => "#10b981",
            Self::Red => "#ef4444",
            Self::Purple => "#8b5cf6",
            Self::Orange => "#f97316",
            Self::Indigo => "#6366f1",
            Self::Teal => "#00BFA5",
            Self::Pink => "#ec4899",
            Self::Yellow => "#eab308",
            Self::Cyan => "#06b6d4",
        }
    }

    /// Human-readable name for the editor's colour picker.
    pub fn label(self) -> &'static str {
        match self {
            Self::Blue => "Blue",
            Self::Green => "Green",
            Self::Red => "Red",
            Self::Purple => "Purple",
            Self::Orange => "Orange",
            Self::Indigo => "Indigo",
            Self::Teal => "Teal",
            Self::Pink => "Pink",
            Self::Yellow => "Yellow",
            Self::Cyan => "Cyan",
        }
    }
}

impl From<String> for ModuleColor {
    fn from(token: String) -> Self {
        Self::from_token(&token)
    }
}

impl From<ModuleColor> for String {
    fn from(color: ModuleColor) -> Self {
        color.token().to_string()
    }
}

/// Icon tokens a module can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ModuleIcon {
    BarChart3,
    Code,
    Shield,
    Brain,
    Smartphone,
    TrendingUp,
    Users,
    Zap,
    Link,
    Bot,
    /// Neutral fallback for missing or unknown icons.
    Circle,
}

impl ModuleIcon {
    /// Icons offered by the editor (the fallback is not selectable).
    pub const SELECTABLE: [ModuleIcon; 10] = [
        Self::BarChart3,
        Self::Code,
        Self::Shield,
        Self::Brain,
        Self::Smartphone,
        Self::TrendingUp,
        Self::Users,
        Self::Zap,
        Self::Link,
        Self::Bot,
    ];

    /// Stored icon name.
    pub fn name(self) -> &'static str {
        match self {
            Self::BarChart3 => "BarChart3",
            Self::Code => "Code",
            Self::Shield => "Shield",
            Self::Brain => "Brain",
            Self::Smartphone => "Smartphone",
            Self::TrendingUp => "TrendingUp",
            Self::Users => "Users",
            Self::Zap => "Zap",
            Self::Link => "Link",
            Self::Bot => "Bot",
            Self::Circle => "Circle",
        }
    }

    /// Parse a stored icon name, falling back to [`ModuleIcon::Circle`].
    pub fn from_name(name: &str) -> Self {
        Self::SELECTABLE
            .into_iter()
            .find(|icon| icon.name() == name)
            .unwrap_or(Self::Circle)
    }

    /// Human-readable name for the editor's icon picker.
    pub fn label(self) -> &'static str {
        match self {
            Self::BarChart3 => "Bar Chart",
            Self::TrendingUp => "Trending Up",
            other => other.name(),
        }
    }
}

impl From<String> for ModuleIcon {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<ModuleIcon> for String {
    fn from(icon: ModuleIcon) -> Self {
        icon.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_tokens_roundtrip_through_serde() {
        for color in ModuleColor::ALL {
            let json = serde_json::to_string(&color).unwrap();
            let back: ModuleColor = serde_json::from_str(&json).unwrap();
            assert_eq!(back, color);
        }
    }

    #[test]
    fn test_teal_alias_and_unknown_color() {
        assert_eq!(ModuleColor::from_token("bg-teal-500"), ModuleColor::Teal);
        assert_eq!(ModuleColor::from_token("bg-lime-500"), ModuleColor::Blue);
        assert_eq!(ModuleColor::Teal.hex(), "#00BFA5");
    }

    #[test]
    fn test_unknown_icon_falls_back_to_circle() {
        let icon: ModuleIcon = serde_json::from_str("\"Rocket\"").unwrap();
        assert_eq!(icon, ModuleIcon::Circle);
        assert_eq!(ModuleIcon::from_name("Brain"), ModuleIcon::Brain);
    }

    #[test]
    fn test_feature_count_label() {
        let mut module = Module {
            name: "Security".to_string(),
            color: ModuleColor::Red,
            icon: ModuleIcon::Shield,
            visible: true,
            features: vec![Feature::placeholder(1)],
        };
        assert_eq!(module.feature_count_label(), "1 feature");
        module.features.push(Feature::placeholder(2));
        assert_eq!(module.feature_count_label(), "2 features");
    }

    #[test]
    fn test_feature_serializes_camel_case() {
        let json = serde_json::to_value(Feature::placeholder(3)).unwrap();
        assert_eq!(json["isBeta"], false);
        assert_eq!(json["id"], 3);
        assert_eq!(
            json["image"],
            "/placeholder.svg?height=400&width=600&text=New+Feature"
        );
    }
}
