//! Viewer model: what each page displays for the current navigation state.
//!
//! Rendering itself belongs to the host (DOM, terminal...); this module
//! resolves the content, image sources and reveal flags it needs.

use crate::image::ImageErrorSet;
use crate::navigation::{ContentPhase, Key, Navigator, ViewState};
use crate::settings::NavigationTiming;
use crate::types::{ModuleColor, ModuleIcon, PresentationConfig};

/// Header shown on the intro, statement and thank-you pages.
pub const NAVIGATION_HINT: &str = "Use keyboard ↑↓ arrows to navigate";

/// A module card on the intro grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCard {
    pub name: String,
    pub color: ModuleColor,
    pub icon: ModuleIcon,
    /// "1 feature" / "3 features".
    pub feature_label: String,
}

/// Content of the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Intro {
        /// Title as typed so far.
        title: String,
        caret: bool,
        subtitle: String,
        hero_image: String,
        /// Present once the grid is revealed.
        cards: Option<Vec<ModuleCard>>,
    },
    Statement {
        title: String,
        description: String,
    },
    /// Module page during its loading state.
    ModuleLoading {
        module_name: String,
        color: ModuleColor,
        icon: ModuleIcon,
    },
    Feature {
        module_name: String,
        color: ModuleColor,
        icon: ModuleIcon,
        /// Titles of every feature in the module, in tab order.
        tabs: Vec<String>,
        feature_index: usize,
        title: String,
        description: String,
        image: String,
        is_beta: bool,
    },
    /// Module page of a module with no features.
    EmptyModule {
        module_name: String,
        color: ModuleColor,
        icon: ModuleIcon,
    },
    ThankYou {
        title: String,
        description: String,
    },
}

/// Header text for a view state.
pub fn header_text(config: &PresentationConfig, state: ViewState) -> String {
    match state {
        ViewState::Module { module_index, .. } => config.modules[module_index].name.clone(),
        _ => NAVIGATION_HINT.to_string(),
    }
}

/// Viewer session: navigation plus image failure tracking.
#[derive(Debug, Clone)]
pub struct Viewer {
    navigator: Navigator,
    errors: ImageErrorSet,
}

impl Viewer {
    /// Open the viewer on the intro page at `now`.
    pub fn new(config: &PresentationConfig, now: u64, timing: NavigationTiming) -> Self {
        Self {
            navigator: Navigator::new(config, now, timing),
            errors: ImageErrorSet::new(),
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    /// Forward a key press.
    pub fn handle_key(&mut self, key: Key, config: &PresentationConfig, now: u64) -> bool {
        self.navigator.handle_key(key, config, now)
    }

    /// Advance timers.
    pub fn tick(&mut self, now: u64) -> bool {
        self.navigator.tick(now)
    }

    /// Record an image that failed to load.
    pub fn image_failed(&mut self, reference: &str) {
        self.errors.record_failure(reference);
    }

    /// Record an image that loaded.
    pub fn image_loaded(&mut self, reference: &str) {
        self.errors.record_success(reference);
    }

    /// Header for the current page.
    pub fn header(&self, config: &PresentationConfig) -> String {
        header_text(config, self.navigator.view_state(config))
    }

    /// Resolve what the current page shows at `now`.
    pub fn screen(&self, config: &PresentationConfig, now: u64) -> Screen {
        match self.navigator.view_state(config) {
            ViewState::Intro => {
                let title = self.navigator.intro_title(now).unwrap_or_default().to_string();
                let caret = title.chars().count() < config.intro_title.chars().count();
                let cards = self.navigator.show_modules().then(|| {
                    config
                        .visible_modules()
                        .map(|(_, m)| ModuleCard {
                            name: m.name.clone(),
                            color: m.color,
                            icon: m.icon,
                            feature_label: m.feature_count_label(),
                        })
                        .collect()
                });
                Screen::Intro {
                    title,
                    caret,
                    subtitle: config.intro_subtitle.clone(),
                    hero_image: self.errors.viewer_source(&config.hero_image),
                    cards,
                }
            }
            ViewState::Statement => Screen::Statement {
                title: config.statement_title.clone(),
                description: config.statement_description.clone(),
            },
            ViewState::Module {
                module_index,
                feature_index,
                ..
            } => {
                let module = &config.modules[module_index];
                if let ContentPhase::Loading { .. } = self.navigator.phase() {
                    return Screen::ModuleLoading {
                        module_name: module.name.clone(),
                        color: module.color,
                        icon: module.icon,
                    };
                }
                match module.features.get(feature_index) {
                    Some(feature) => Screen::Feature {
                        module_name: module.name.clone(),
                        color: module.color,
                        icon: module.icon,
                        tabs: module.features.iter().map(|f| f.title.clone()).collect(),
                        feature_index,
                        title: feature.title.clone(),
                        description: feature.description.clone(),
                        image: self.errors.viewer_source(&feature.image),
                        is_beta: feature.is_beta,
                    },
                    None => Screen::EmptyModule {
                        module_name: module.name.clone(),
                        color: module.color,
                        icon: module.icon,
                    },
                }
            }
            ViewState::ThankYou => Screen::ThankYou {
                title: config.thank_you_title.clone(),
                description: config.thank_you_description.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_config;
    use crate::image::{IMAGE_ERROR_PLACEHOLDER, NO_IMAGE_PLACEHOLDER};

    #[test]
    fn test_intro_cards_revealed_after_title() {
        let config = default_config();
        let mut viewer = Viewer::new(&config, 0, NavigationTiming::default());

        match viewer.screen(&config, 600) {
            Screen::Intro {
                title,
                caret,
                cards,
                ..
            } => {
                assert_eq!(title, "J");
                assert!(caret);
                assert!(cards.is_none());
            }
            other => panic!("unexpected screen {:?}", other),
        }

        viewer.tick(1460);
        viewer.tick(2460);
        match viewer.screen(&config, 2460) {
            Screen::Intro { cards, caret, .. } => {
                let cards = cards.unwrap();
                assert!(!caret);
                assert_eq!(cards.len(), 5);
                assert_eq!(cards[0].feature_label, "3 features");
                assert_eq!(cards[3].feature_label, "1 feature");
            }
            other => panic!("unexpected screen {:?}", other),
        }
    }

    #[test]
    fn test_module_page_loading_then_feature() {
        let config = default_config();
        let mut viewer = Viewer::new(&config, 0, NavigationTiming::default());
        viewer.navigator_mut().jump_to_module(1, &config, 0);

        assert!(matches!(
            viewer.screen(&config, 10),
            Screen::ModuleLoading { .. }
        ));
        assert_eq!(viewer.header(&config), "Engineering");

        viewer.tick(600);
        match viewer.screen(&config, 600) {
            Screen::Feature {
                tabs, title, is_beta, ..
            } => {
                assert_eq!(tabs.len(), 3);
                assert_eq!(title, "Seamless Integration");
                assert!(!is_beta);
            }
            other => panic!("unexpected screen {:?}", other),
        }
    }

    #[test]
    fn test_image_sources_resolved() {
        let mut config = default_config();
        config.modules[0].features[0].image = String::new();
        config.modules[0].features[1].image = "https://cdn.test/broken.png".to_string();
        let mut viewer = Viewer::new(&config, 0, NavigationTiming::default());
        viewer.image_failed("https://cdn.test/broken.png");
        viewer.navigator_mut().jump_to_module(0, &config, 0);
        viewer.tick(600);

        match viewer.screen(&config, 600) {
            Screen::Feature { image, .. } => assert_eq!(image, NO_IMAGE_PLACEHOLDER),
            other => panic!("unexpected screen {:?}", other),
        }
        viewer.handle_key(Key::Down, &config, 700);
        match viewer.screen(&config, 700) {
            Screen::Feature { image, .. } => assert_eq!(image, IMAGE_ERROR_PLACEHOLDER),
            other => panic!("unexpected screen {:?}", other),
        }
    }

    #[test]
    fn test_headers() {
        let config = default_config();
        let viewer = Viewer::new(&config, 0, NavigationTiming::default());
        assert_eq!(viewer.header(&config), NAVIGATION_HINT);
        assert_eq!(header_text(&config, ViewState::ThankYou), NAVIGATION_HINT);
    }
}
