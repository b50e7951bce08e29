//! Built-in default presentation.
//!
//! Used when nothing is stored yet, and positionally as the source for
//! backfilled fields and padded modules during migration.

use crate::image::HERO_PLACEHOLDER;
use crate::types::{Feature, Module, ModuleColor, ModuleIcon, PresentationConfig};

pub const INTRO_TITLE: &str = "June Release";
pub const INTRO_SUBTITLE: &str = "Discover the latest features and improvements";
pub const STATEMENT_TITLE: &str = "Our Focus This Release";
pub const STATEMENT_DESCRIPTION: &str =
    "<p>Faster insights, safer deployments and smarter tooling for every team.</p>";
pub const THANK_YOU_TITLE: &str = "Thank You";
pub const THANK_YOU_DESCRIPTION: &str = "Questions & Discussion";

/// The default configuration.
pub fn default_config() -> PresentationConfig {
    PresentationConfig {
        intro_title: INTRO_TITLE.to_string(),
        intro_subtitle: INTRO_SUBTITLE.to_string(),
        hero_image: HERO_PLACEHOLDER.to_string(),
        statement_title: STATEMENT_TITLE.to_string(),
        statement_description: STATEMENT_DESCRIPTION.to_string(),
        thank_you_title: THANK_YOU_TITLE.to_string(),
        thank_you_description: THANK_YOU_DESCRIPTION.to_string(),
        modules: default_modules(),
    }
}

/// Default module at `index`, if there is one.
pub fn default_module(index: usize) -> Option<Module> {
    default_modules().into_iter().nth(index)
}

/// Default icon for the module at `index`, falling back to the neutral icon.
pub fn default_icon(index: usize) -> ModuleIcon {
    MODULE_SEEDS
        .get(index)
        .map(|seed| seed.icon)
        .unwrap_or(ModuleIcon::Circle)
}

/// The ten default modules in positional order.
pub fn default_modules() -> Vec<Module> {
    MODULE_SEEDS.iter().map(ModuleSeed::build).collect()
}

struct ModuleSeed {
    name: &'static str,
    color: ModuleColor,
    icon: ModuleIcon,
    visible: bool,
    /// (title, description, image label, beta)
    features: &'static [(&'static str, &'static str, &'static str, bool)],
}

impl ModuleSeed {
    fn build(&self) -> Module {
        Module {
            name: self.name.to_string(),
            color: self.color,
            icon: self.icon,
            visible: self.visible,
            features: self
                .features
                .iter()
                .enumerate()
                .map(|(i, (title, description, label, beta))| Feature {
                    id: i as u32 + 1,
                    title: title.to_string(),
                    description: description.to_string(),
                    image: format!(
                        "/placeholder.svg?height=400&width=600&text={}",
                        label.replace(' ', "+")
                    ),
                    is_beta: *beta,
                })
                .collect(),
        }
    }
}

const MODULE_SEEDS: [ModuleSeed; 10] = [
    ModuleSeed {
        name: "Data Science",
        color: ModuleColor::Blue,
        icon: ModuleIcon::BarChart3,
        visible: true,
        features: &[
            (
                "Advanced Analytics",
                "Get detailed insights into your data with our powerful analytics dashboard and real-time reporting.",
                "Analytics Dashboard",
                false,
            ),
            (
                "Machine Learning",
                "Deploy and manage ML models at scale with our automated pipeline and monitoring tools.",
                "ML Pipeline",
                true,
            ),
            (
                "Data Visualization",
                "Create stunning visualizations and interactive dashboards to communicate insights effectively.",
                "Data Visualization",
                false,
            ),
        ],
    },
    ModuleSeed {
        name: "Engineering",
        color: ModuleColor::Green,
        icon: ModuleIcon::Code,
        visible: true,
        features: &[
            (
                "Seamless Integration",
                "Connect with your favorite tools and platforms through our extensive API and integration library.",
                "API Integration",
                false,
            ),
            (
                "Cloud Infrastructure",
                "Scalable cloud architecture that grows with your business needs and handles any workload.",
                "Cloud Infrastructure",
                false,
            ),
            (
                "DevOps Pipeline",
                "Automated CI/CD pipelines that ensure fast, reliable deployments with zero downtime.",
                "DevOps Pipeline",
                true,
            ),
        ],
    },
    ModuleSeed {
        name: "Security",
        color: ModuleColor::Red,
        icon: ModuleIcon::Shield,
        visible: true,
        features: &[
            (
                "Enterprise Security",
                "Bank-level security with end-to-end encryption, compliance certifications, and advanced access controls.",
                "Enterprise Security",
                false,
            ),
            (
                "Threat Detection",
                "AI-powered threat detection and response system that protects against advanced cyber attacks.",
                "Threat Detection",
                true,
            ),
            (
                "Compliance Management",
                "Automated compliance monitoring and reporting for GDPR, SOC2, and other industry standards.",
                "Compliance Management",
                false,
            ),
        ],
    },
    ModuleSeed {
        name: "AI & Machine Learning",
        color: ModuleColor::Purple,
        icon: ModuleIcon::Brain,
        visible: true,
        features: &[(
            "AI Assistant",
            "Intelligent AI assistant to help with complex tasks and decision making.",
            "AI Assistant",
            true,
        )],
    },
    ModuleSeed {
        name: "Mobile Development",
        color: ModuleColor::Orange,
        icon: ModuleIcon::Smartphone,
        visible: true,
        features: &[(
            "Cross-Platform SDK",
            "Build native mobile apps for iOS and Android with our unified SDK.",
            "Mobile SDK",
            false,
        )],
    },
    ModuleSeed {
        name: "Analytics",
        color: ModuleColor::Indigo,
        icon: ModuleIcon::TrendingUp,
        visible: false,
        features: &[(
            "Real-time Analytics",
            "Monitor your application performance with real-time analytics and insights.",
            "Analytics",
            false,
        )],
    },
    ModuleSeed {
        name: "Collaboration",
        color: ModuleColor::Pink,
        icon: ModuleIcon::Users,
        visible: false,
        features: &[(
            "Team Workspace",
            "Collaborate effectively with shared workspaces and real-time editing.",
            "Collaboration",
            true,
        )],
    },
    ModuleSeed {
        name: "Performance",
        color: ModuleColor::Yellow,
        icon: ModuleIcon::Zap,
        visible: false,
        features: &[(
            "Speed Optimization",
            "Boost your application performance with advanced optimization techniques.",
            "Performance",
            false,
        )],
    },
    ModuleSeed {
        name: "Integration",
        color: ModuleColor::Cyan,
        icon: ModuleIcon::Link,
        visible: false,
        features: &[(
            "Third-party APIs",
            "Seamlessly integrate with popular third-party services and APIs.",
            "Integration",
            false,
        )],
    },
    ModuleSeed {
        name: "Automation",
        color: ModuleColor::Teal,
        icon: ModuleIcon::Bot,
        visible: false,
        features: &[(
            "Workflow Automation",
            "Automate repetitive tasks and workflows to increase productivity.",
            "Automation",
            true,
        )],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MODULE_COUNT;

    #[test]
    fn test_default_shape() {
        let config = default_config();
        assert_eq!(config.modules.len(), MODULE_COUNT);
        assert_eq!(config.visible_module_count(), 5);

        let counts: Vec<usize> = config.modules.iter().map(|m| m.features.len()).collect();
        assert_eq!(counts, vec![3, 3, 3, 1, 1, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_default_feature_images_use_plus_labels() {
        let config = default_config();
        assert_eq!(
            config.modules[0].features[0].image,
            "/placeholder.svg?height=400&width=600&text=Analytics+Dashboard"
        );
        assert_eq!(config.modules[1].features[2].id, 3);
    }

    #[test]
    fn test_default_icon_positional_fallback() {
        assert_eq!(default_icon(2), ModuleIcon::Shield);
        assert_eq!(default_icon(42), ModuleIcon::Circle);
        assert!(default_module(9).is_some());
        assert!(default_module(10).is_none());
    }
}
