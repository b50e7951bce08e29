//! Page and feature navigation for the viewer.
//!
//! The page sequence is intro, statement, one page per visible module, then
//! thank-you. Within a module page the arrow keys first step through the
//! module's features before moving to the neighbouring page.
//!
//! Time is injected as a millisecond clock value; timers are deadlines
//! checked by [`Navigator::tick`], so a newer page change simply replaces an
//! older deadline.

use crate::settings::NavigationTiming;
use crate::types::PresentationConfig;
use crate::typewriter::Typewriter;

/// Arrow keys understood by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Key::Up),
            "ArrowDown" => Some(Key::Down),
            _ => None,
        }
    }
}

/// What the viewer shows for the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Intro,
    Statement,
    Module {
        /// Position among the visible modules.
        visible_index: usize,
        /// Index into `PresentationConfig::modules`.
        module_index: usize,
        feature_index: usize,
    },
    ThankYou,
}

/// Content sub-state of a module page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentPhase {
    /// Loading placeholder shown until the deadline.
    Loading { until: u64 },
    Shown,
}

/// Staged reveal on the intro page.
#[derive(Debug, Clone)]
struct IntroReveal {
    title: Typewriter,
    grid_delay_ms: u64,
    title_complete: bool,
    show_modules: bool,
}

impl IntroReveal {
    fn tick(&mut self, now: u64) -> bool {
        let mut changed = false;
        if !self.title_complete && self.title.is_complete(now) {
            self.title_complete = true;
            changed = true;
        }
        if self.title_complete
            && !self.show_modules
            && now >= self.title.completes_at() + self.grid_delay_ms
        {
            self.show_modules = true;
            changed = true;
        }
        changed
    }
}

/// Total number of pages for `config`.
pub fn total_pages(config: &PresentationConfig) -> usize {
    3 + config.visible_module_count()
}

/// Map a page index to its view state, with feature index 0.
pub fn page_state(config: &PresentationConfig, page: usize) -> ViewState {
    let last = total_pages(config) - 1;
    match page {
        0 => ViewState::Intro,
        1 => ViewState::Statement,
        p if p >= last => ViewState::ThankYou,
        p => match config.nth_visible_module(p - 2) {
            Some((module_index, _)) => ViewState::Module {
                visible_index: p - 2,
                module_index,
                feature_index: 0,
            },
            None => ViewState::ThankYou,
        },
    }
}

/// Navigation state machine.
#[derive(Debug, Clone)]
pub struct Navigator {
    page: usize,
    feature: usize,
    phase: ContentPhase,
    timing: NavigationTiming,
    intro: Option<IntroReveal>,
}

impl Navigator {
    /// Start on the intro page at `now`.
    pub fn new(config: &PresentationConfig, now: u64, timing: NavigationTiming) -> Self {
        let mut nav = Self {
            page: 0,
            feature: 0,
            phase: ContentPhase::Shown,
            timing,
            intro: None,
        };
        nav.enter_page(0, config, now);
        nav
    }

    /// Current page index.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Current feature index within a module page.
    pub fn feature_index(&self) -> usize {
        self.feature
    }

    /// Current content phase.
    pub fn phase(&self) -> ContentPhase {
        self.phase
    }

    /// Whether a module page is still in its loading state.
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, ContentPhase::Loading { .. })
    }

    /// Current view state.
    pub fn view_state(&self, config: &PresentationConfig) -> ViewState {
        match page_state(config, self.page) {
            ViewState::Module {
                visible_index,
                module_index,
                ..
            } => ViewState::Module {
                visible_index,
                module_index,
                feature_index: self.feature,
            },
            other => other,
        }
    }

    /// Whether the intro title has finished typing.
    pub fn title_complete(&self) -> bool {
        self.intro.as_ref().map_or(false, |i| i.title_complete)
    }

    /// Whether the intro module grid is revealed.
    pub fn show_modules(&self) -> bool {
        self.intro.as_ref().map_or(false, |i| i.show_modules)
    }

    /// Intro title as typed so far, or `None` off the intro page.
    pub fn intro_title(&self, now: u64) -> Option<&str> {
        self.intro.as_ref().map(|i| i.title.visible_text(now))
    }

    /// Advance timers to `now`. Returns whether anything visible changed.
    pub fn tick(&mut self, now: u64) -> bool {
        let mut changed = false;
        if let ContentPhase::Loading { until } = self.phase {
            if now >= until {
                self.phase = ContentPhase::Shown;
                changed = true;
            }
        }
        if let Some(intro) = self.intro.as_mut() {
            changed |= intro.tick(now);
        }
        changed
    }

    /// Handle an arrow key. Input is dropped while a module page is loading.
    /// Returns whether the page or feature changed.
    pub fn handle_key(&mut self, key: Key, config: &PresentationConfig, now: u64) -> bool {
        self.tick(now);
        if self.is_loading() {
            log::debug!("Dropped {:?} while loading", key);
            return false;
        }

        let feature_count = match self.view_state(config) {
            ViewState::Module { module_index, .. } => config.modules[module_index].features.len(),
            _ => 0,
        };
        let last = total_pages(config) - 1;

        match key {
            Key::Down if self.feature + 1 < feature_count => {
                self.feature += 1;
                true
            }
            Key::Up if feature_count > 0 && self.feature > 0 => {
                self.feature -= 1;
                true
            }
            Key::Down => self.change_page((self.page + 1).min(last), config, now),
            Key::Up => self.change_page(self.page.saturating_sub(1), config, now),
        }
    }

    /// Jump straight to `page`, clamped into range.
    pub fn jump_to_page(&mut self, page: usize, config: &PresentationConfig, now: u64) -> bool {
        let page = page.min(total_pages(config) - 1);
        self.change_page(page, config, now)
    }

    /// Jump to the module page of the `visible_index`-th visible module.
    pub fn jump_to_module(
        &mut self,
        visible_index: usize,
        config: &PresentationConfig,
        now: u64,
    ) -> bool {
        if visible_index >= config.visible_module_count() {
            return false;
        }
        self.change_page(visible_index + 2, config, now)
    }

    /// Select a feature tab on the current module page.
    pub fn select_feature(&mut self, index: usize, config: &PresentationConfig, now: u64) -> bool {
        self.tick(now);
        if self.is_loading() {
            return false;
        }
        match self.view_state(config) {
            ViewState::Module { module_index, .. }
                if index < config.modules[module_index].features.len() && index != self.feature =>
            {
                self.feature = index;
                true
            }
            _ => false,
        }
    }

    /// Bring the position back into range after the configuration changed.
    pub fn sync(&mut self, config: &PresentationConfig, now: u64) {
        let last = total_pages(config) - 1;
        if self.page > last {
            log::debug!("Page {} out of range after config change, clamping", self.page);
            self.enter_page(last, config, now);
            return;
        }
        if let ViewState::Module { module_index, .. } = self.view_state(config) {
            let count = config.modules[module_index].features.len();
            if self.feature >= count {
                self.feature = count.saturating_sub(1);
            }
        }
    }

    fn change_page(&mut self, page: usize, config: &PresentationConfig, now: u64) -> bool {
        if page == self.page {
            let moved = self.feature != 0;
            self.feature = 0;
            return moved;
        }
        self.enter_page(page, config, now);
        true
    }

    fn enter_page(&mut self, page: usize, config: &PresentationConfig, now: u64) {
        self.page = page;
        self.feature = 0;
        self.phase = match page_state(config, page) {
            ViewState::Module { .. } => ContentPhase::Loading {
                until: now + self.timing.module_loading_ms,
            },
            _ => ContentPhase::Shown,
        };
        self.intro = (page == 0).then(|| IntroReveal {
            title: Typewriter::new(config.intro_title.as_str(), now, &self.timing),
            grid_delay_ms: self.timing.module_grid_delay_ms,
            title_complete: false,
            show_modules: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_config;

    fn nav(config: &PresentationConfig) -> Navigator {
        Navigator::new(config, 0, NavigationTiming::default())
    }

    #[test]
    fn test_total_pages_default() {
        assert_eq!(total_pages(&default_config()), 8);
    }

    #[test]
    fn test_page_state_mapping() {
        let config = default_config();
        assert_eq!(page_state(&config, 0), ViewState::Intro);
        assert_eq!(page_state(&config, 1), ViewState::Statement);
        assert_eq!(
            page_state(&config, 4),
            ViewState::Module {
                visible_index: 2,
                module_index: 2,
                feature_index: 0
            }
        );
        assert_eq!(page_state(&config, 7), ViewState::ThankYou);
    }

    #[test]
    fn test_page_state_skips_hidden_modules() {
        let mut config = default_config();
        config.modules[1].visible = false;
        config.modules[7].visible = true;

        assert_eq!(
            page_state(&config, 3),
            ViewState::Module {
                visible_index: 1,
                module_index: 2,
                feature_index: 0
            }
        );
        assert_eq!(
            page_state(&config, 6),
            ViewState::Module {
                visible_index: 4,
                module_index: 7,
                feature_index: 0
            }
        );
    }

    #[test]
    fn test_down_steps_features_then_pages() {
        let config = default_config();
        let mut nav = nav(&config);
        nav.jump_to_page(2, &config, 0);

        assert!(!nav.handle_key(Key::Down, &config, 100));
        assert!(nav.handle_key(Key::Down, &config, 600));
        assert_eq!(nav.feature_index(), 1);
        nav.handle_key(Key::Down, &config, 700);
        assert_eq!(nav.feature_index(), 2);

        nav.handle_key(Key::Down, &config, 800);
        assert_eq!(nav.page(), 3);
        assert_eq!(nav.feature_index(), 0);
        assert!(nav.is_loading());
    }

    #[test]
    fn test_up_steps_back_within_module() {
        let config = default_config();
        let mut nav = nav(&config);
        nav.jump_to_page(2, &config, 0);
        nav.select_feature(2, &config, 600);

        nav.handle_key(Key::Up, &config, 700);
        assert_eq!(nav.feature_index(), 1);
        nav.handle_key(Key::Up, &config, 800);
        nav.handle_key(Key::Up, &config, 900);
        assert_eq!(nav.page(), 1);
        assert_eq!(nav.view_state(&config), ViewState::Statement);
    }

    #[test]
    fn test_up_then_down_returns_to_same_feature() {
        let config = default_config();
        let mut nav = nav(&config);
        nav.jump_to_module(0, &config, 0);
        nav.select_feature(2, &config, 600);
        let before = nav.view_state(&config);
        assert_eq!(
            before,
            ViewState::Module {
                visible_index: 0,
                module_index: 0,
                feature_index: 2
            }
        );

        assert!(nav.handle_key(Key::Up, &config, 700));
        assert!(nav.handle_key(Key::Down, &config, 800));
        assert_eq!(nav.view_state(&config), before);

        nav.select_feature(0, &config, 900);
        assert!(nav.handle_key(Key::Up, &config, 1000));
        assert_eq!(nav.view_state(&config), ViewState::Statement);
        assert_eq!(nav.feature_index(), 0);
    }

    #[test]
    fn test_bounds_are_no_ops() {
        let config = default_config();
        let mut nav = nav(&config);

        assert!(!nav.handle_key(Key::Up, &config, 10));
        assert_eq!(nav.page(), 0);

        nav.jump_to_page(100, &config, 20);
        assert_eq!(nav.view_state(&config), ViewState::ThankYou);
        assert!(!nav.handle_key(Key::Down, &config, 30));
        assert_eq!(nav.page(), 7);
    }

    #[test]
    fn test_new_page_change_supersedes_loading_deadline() {
        let config = default_config();
        let mut nav = nav(&config);
        nav.jump_to_module(0, &config, 0);
        nav.jump_to_module(1, &config, 500);

        nav.tick(650);
        assert!(nav.is_loading());
        nav.tick(1100);
        assert_eq!(nav.phase(), ContentPhase::Shown);
    }

    #[test]
    fn test_intro_reveal_flags() {
        let config = default_config();
        let mut nav = nav(&config);
        let done = 500 + 80 * config.intro_title.chars().count() as u64;

        nav.tick(done - 1);
        assert!(!nav.title_complete());
        assert!(nav.tick(done));
        assert!(nav.title_complete());
        assert!(!nav.show_modules());
        nav.tick(done + 1000);
        assert!(nav.show_modules());

        nav.handle_key(Key::Down, &config, done + 1100);
        assert!(!nav.title_complete());
        assert!(!nav.show_modules());
        assert_eq!(nav.intro_title(done + 1100), None);

        nav.handle_key(Key::Up, &config, done + 1200);
        assert!(!nav.show_modules());
        assert_eq!(nav.intro_title(done + 1200), Some(""));
    }

    #[test]
    fn test_select_feature_only_on_module_pages() {
        let config = default_config();
        let mut nav = nav(&config);
        assert!(!nav.select_feature(1, &config, 0));

        nav.jump_to_module(0, &config, 0);
        assert!(!nav.select_feature(1, &config, 100));
        assert!(nav.select_feature(1, &config, 600));
        assert!(!nav.select_feature(3, &config, 700));
        assert_eq!(nav.feature_index(), 1);
    }

    #[test]
    fn test_sync_clamps_after_hiding_modules() {
        let mut config = default_config();
        let mut nav = nav(&config);
        nav.jump_to_page(6, &config, 0);

        for module in config.modules.iter_mut().skip(1) {
            module.visible = false;
        }
        nav.sync(&config, 10);

        assert_eq!(nav.page(), 3);
        assert_eq!(nav.view_state(&config), ViewState::ThankYou);
    }

    #[test]
    fn test_key_from_dom() {
        assert_eq!(Key::from_dom("ArrowUp"), Some(Key::Up));
        assert_eq!(Key::from_dom("ArrowDown"), Some(Key::Down));
        assert_eq!(Key::from_dom("ArrowLeft"), None);
    }
}
