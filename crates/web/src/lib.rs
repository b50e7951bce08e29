//! WASM bindings for Showcase Gallery.
//!
//! The page drives a [`ShowcaseApp`]: it loads the presentation from
//! `localStorage`, gates admin edits on a `sessionStorage` flag, forwards
//! arrow keys and animation ticks to the viewer and exports the deck as a
//! zip of rendered pages.
//!
//! The export runs without network access. The page downloads the remote
//! images listed by `remoteImages()` and the web font with `fetch`, then
//! hands them over through `provideAsset()` and `provideFont()`.

pub mod storage;
pub mod views;

use showcase_core::export::{ExportOptions, FontProvider, PlannedPage};
use showcase_core::image::ImageRef;
use showcase_core::text::export_file_name;
use showcase_core::{
    EditCommand, Editor, ExportOutput, Exporter, Key, PresentationConfig, PresentationStore,
    SessionGate, Settings, Storage, Viewer,
};
use showcase_render::{
    EmbeddedImageLoader, Fetched, FontFace, PrefetchedAssets, SvgRenderer, ZipDocument,
};
use std::sync::Arc;
use storage::BrowserStorage;
use views::{EditRequest, PlanEntry, ScreenView, UploadRequest};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Application state independent of the browser, generic over the storage
/// backing the presentation (`S`) and the admin session (`G`).
pub struct App<S: Storage, G: Storage> {
    settings: Settings,
    store: PresentationStore<S>,
    gate: SessionGate<G>,
    editor: Editor,
    viewer: Option<Viewer>,
    assets: PrefetchedAssets,
    font: Option<FontFace>,
}

impl<S: Storage, G: Storage> App<S, G> {
    pub fn new(settings: Settings, config_storage: S, session_storage: G) -> Self {
        let store = PresentationStore::with_key(config_storage, settings.config_key.clone());
        let gate = SessionGate::with_secret(
            session_storage,
            settings.session_key.clone(),
            settings.secret.clone(),
        );
        Self {
            settings,
            store,
            gate,
            editor: Editor::new(),
            viewer: None,
            assets: PrefetchedAssets::new(),
            font: None,
        }
    }

    /// Load the presentation, check the session flag and open the viewer.
    pub fn load(&mut self, now: u64) -> Arc<PresentationConfig> {
        let config = self.store.load();
        self.gate.mount();
        self.viewer = Some(Viewer::new(&config, now, self.settings.timing));
        config
    }

    pub fn config(&self) -> Arc<PresentationConfig> {
        self.store.config()
    }

    pub fn is_authenticated(&self) -> bool {
        self.gate.is_authenticated()
    }

    pub fn authenticate(&mut self, password: &str) -> bool {
        self.gate.authenticate(password)
    }

    pub fn logout(&mut self) {
        self.gate.logout();
    }

    /// Last inline validation message from the editor.
    pub fn editor_message(&self) -> Option<&str> {
        self.editor.message()
    }

    /// Apply an admin edit. Requires an authenticated session.
    pub fn apply_edit(&mut self, command: &EditCommand, now: u64) -> Result<(), String> {
        self.require_session()?;
        let config = self
            .editor
            .apply(&mut self.store, command)
            .map_err(|e| e.to_string())?;
        self.sync_viewer(&config, now);
        Ok(())
    }

    /// Validate and store an uploaded image. Requires an authenticated session.
    pub fn upload_image(&mut self, request: UploadRequest, now: u64) -> Result<(), String> {
        self.require_session()?;
        let (target, upload) = request.into_parts();
        let config = self
            .editor
            .upload(&mut self.store, target, upload)
            .map_err(|e| e.to_string())?;
        self.sync_viewer(&config, now);
        Ok(())
    }

    pub fn handle_key(&mut self, key: &str, now: u64) -> bool {
        let Some(key) = Key::from_dom(key) else {
            return false;
        };
        let config = self.store.config();
        self.viewer
            .as_mut()
            .map(|viewer| viewer.handle_key(key, &config, now))
            .unwrap_or(false)
    }

    /// Jump to the `visible_index`-th visible module from the intro grid.
    pub fn open_module(&mut self, visible_index: usize, now: u64) -> bool {
        let config = self.store.config();
        self.viewer
            .as_mut()
            .map(|viewer| {
                viewer
                    .navigator_mut()
                    .jump_to_module(visible_index, &config, now)
            })
            .unwrap_or(false)
    }

    pub fn select_feature(&mut self, index: usize, now: u64) -> bool {
        let config = self.store.config();
        self.viewer
            .as_mut()
            .map(|viewer| viewer.navigator_mut().select_feature(index, &config, now))
            .unwrap_or(false)
    }

    /// Advance timers. Returns whether the screen changed.
    pub fn tick(&mut self, now: u64) -> bool {
        self.viewer
            .as_mut()
            .map(|viewer| viewer.tick(now))
            .unwrap_or(false)
    }

    pub fn image_failed(&mut self, reference: &str) {
        if let Some(viewer) = self.viewer.as_mut() {
            viewer.image_failed(reference);
        }
    }

    pub fn image_loaded(&mut self, reference: &str) {
        if let Some(viewer) = self.viewer.as_mut() {
            viewer.image_loaded(reference);
        }
    }

    pub fn header(&self) -> Option<String> {
        let config = self.store.config();
        self.viewer.as_ref().map(|viewer| viewer.header(&config))
    }

    pub fn screen(&self, now: u64) -> Option<ScreenView> {
        let config = self.store.config();
        self.viewer
            .as_ref()
            .map(|viewer| ScreenView::from(viewer.screen(&config, now)))
    }

    fn exporter(&self, include_statement: bool) -> Exporter {
        Exporter::new(self.settings.export).with_options(ExportOptions {
            include_statement: include_statement || self.settings.export.include_statement,
        })
    }

    pub fn export_plan(&self, include_statement: bool) -> Result<Vec<PlanEntry>, String> {
        let plan = self
            .exporter(include_statement)
            .plan(&self.store.config())
            .map_err(|e| e.to_string())?;
        Ok(plan.pages().iter().map(PlanEntry::from).collect())
    }

    /// Remote image URLs the export would embed, without the ones already
    /// provided.
    pub fn remote_images(&self, include_statement: bool) -> Result<Vec<String>, String> {
        let config = self.store.config();
        let plan = self
            .exporter(include_statement)
            .plan(&config)
            .map_err(|e| e.to_string())?;

        let mut urls: Vec<String> = Vec::new();
        for page in plan.pages() {
            let reference = match *page {
                PlannedPage::Intro => config.hero_image.as_str(),
                PlannedPage::Feature { module, feature } => config
                    .modules
                    .get(module)
                    .and_then(|m| m.features.get(feature))
                    .map(|f| f.image.as_str())
                    .unwrap_or_default(),
                PlannedPage::Statement | PlannedPage::ThankYou => continue,
            };
            let url = reference.trim();
            if ImageRef::classify(url) == ImageRef::Remote
                && !self.assets.contains(url)
                && !urls.iter().any(|u| u == url)
            {
                urls.push(url.to_string());
            }
        }
        Ok(urls)
    }

    /// Store a remote asset downloaded by the page.
    pub fn provide_asset(&mut self, url: &str, mime_type: Option<&str>, bytes: Vec<u8>) {
        self.assets.insert(url.trim(), Fetched::new(mime_type, bytes));
    }

    /// Embed `face` in exported pages and lay text out with it.
    pub fn provide_font(&mut self, face: FontFace) {
        self.font = Some(face);
    }

    pub fn export_document(
        &self,
        include_statement: bool,
        progress: impl FnMut(f64),
    ) -> Result<ExportOutput, String> {
        let config = self.store.config();
        let mut renderer = SvgRenderer::new();
        let mut font = self.font.clone();
        if let Some(face) = &font {
            renderer = renderer.with_font_face(face.clone());
        }

        self.exporter(include_statement)
            .export(
                &config,
                &mut EmbeddedImageLoader::new().with_fetcher(self.assets.clone()),
                &mut renderer,
                &mut ZipDocument::new(),
                font.as_mut().map(|f| f as &mut dyn FontProvider),
                progress,
            )
            .map_err(|e| e.to_string())
    }

    fn require_session(&self) -> Result<(), String> {
        if self.gate.is_authenticated() {
            Ok(())
        } else {
            Err("Admin session required".to_string())
        }
    }

    fn sync_viewer(&mut self, config: &PresentationConfig, now: u64) {
        if let Some(viewer) = self.viewer.as_mut() {
            viewer.navigator_mut().sync(config, now);
        }
    }
}

fn now() -> u64 {
    js_sys::Date::now() as u64
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Browser-facing handle over [`App`].
#[wasm_bindgen]
pub struct ShowcaseApp {
    inner: App<BrowserStorage, BrowserStorage>,
}

#[wasm_bindgen]
impl ShowcaseApp {
    /// Create the app. `settings` is an optional JSON object overriding
    /// storage keys, timings and export geometry.
    #[wasm_bindgen(constructor)]
    pub fn new(settings: Option<String>) -> Result<ShowcaseApp, JsValue> {
        let settings = match settings {
            Some(json) => Settings::from_json(&json)
                .map_err(|e| JsValue::from_str(&format!("Invalid settings: {}", e)))?,
            None => Settings::default(),
        };
        Ok(ShowcaseApp {
            inner: App::new(settings, BrowserStorage::local(), BrowserStorage::session()),
        })
    }

    /// Load the stored presentation and return it.
    pub fn load(&mut self) -> Result<JsValue, JsValue> {
        let config = self.inner.load(now());
        to_js(&*config)
    }

    pub fn config(&self) -> Result<JsValue, JsValue> {
        to_js(&*self.inner.config())
    }

    #[wasm_bindgen(js_name = isAuthenticated)]
    pub fn is_authenticated(&self) -> bool {
        self.inner.is_authenticated()
    }

    pub fn authenticate(&mut self, password: &str) -> bool {
        self.inner.authenticate(password)
    }

    pub fn logout(&mut self) {
        self.inner.logout();
    }

    #[wasm_bindgen(js_name = editorMessage)]
    pub fn editor_message(&self) -> Option<String> {
        self.inner.editor_message().map(str::to_string)
    }

    /// Apply an edit such as `{ type: "setIntroTitle", value: "Q3" }`.
    #[wasm_bindgen(js_name = applyEdit)]
    pub fn apply_edit(&mut self, request: JsValue) -> Result<(), JsValue> {
        let request: EditRequest = serde_wasm_bindgen::from_value(request)
            .map_err(|e| JsValue::from_str(&format!("Invalid edit: {}", e)))?;
        self.inner
            .apply_edit(&EditCommand::from(request), now())
            .map_err(|e| JsValue::from_str(&e))
    }

    #[wasm_bindgen(js_name = uploadImage)]
    pub fn upload_image(&mut self, request: JsValue) -> Result<(), JsValue> {
        let request: UploadRequest = serde_wasm_bindgen::from_value(request)
            .map_err(|e| JsValue::from_str(&format!("Invalid upload: {}", e)))?;
        self.inner
            .upload_image(request, now())
            .map_err(|e| JsValue::from_str(&e))
    }

    /// Forward a `KeyboardEvent.key`. Returns whether the view changed.
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&mut self, key: &str) -> bool {
        self.inner.handle_key(key, now())
    }

    #[wasm_bindgen(js_name = openModule)]
    pub fn open_module(&mut self, visible_index: usize) -> bool {
        self.inner.open_module(visible_index, now())
    }

    #[wasm_bindgen(js_name = selectFeature)]
    pub fn select_feature(&mut self, index: usize) -> bool {
        self.inner.select_feature(index, now())
    }

    pub fn tick(&mut self) -> bool {
        self.inner.tick(now())
    }

    #[wasm_bindgen(js_name = imageFailed)]
    pub fn image_failed(&mut self, reference: &str) {
        self.inner.image_failed(reference);
    }

    #[wasm_bindgen(js_name = imageLoaded)]
    pub fn image_loaded(&mut self, reference: &str) {
        self.inner.image_loaded(reference);
    }

    pub fn header(&self) -> Option<String> {
        self.inner.header()
    }

    pub fn screen(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.screen(now()))
    }

    #[wasm_bindgen(js_name = exportPlan)]
    pub fn export_plan(&self, include_statement: bool) -> Result<JsValue, JsValue> {
        let plan = self
            .inner
            .export_plan(include_statement)
            .map_err(|e| JsValue::from_str(&e))?;
        to_js(&plan)
    }

    /// Remote image URLs to download before `exportDocument`.
    #[wasm_bindgen(js_name = remoteImages)]
    pub fn remote_images(&self, include_statement: bool) -> Result<JsValue, JsValue> {
        let urls = self
            .inner
            .remote_images(include_statement)
            .map_err(|e| JsValue::from_str(&e))?;
        to_js(&urls)
    }

    /// Hand over a downloaded image, e.g. the body of `fetch(url)`.
    #[wasm_bindgen(js_name = provideAsset)]
    pub fn provide_asset(&mut self, url: &str, mime_type: Option<String>, bytes: Vec<u8>) {
        self.inner.provide_asset(url, mime_type.as_deref(), bytes);
    }

    /// Hand over the regular-weight font file for `family`.
    #[wasm_bindgen(js_name = provideFont)]
    pub fn provide_font(&mut self, family: &str, mime_type: &str, bytes: Vec<u8>) {
        self.inner
            .provide_font(FontFace::new(family, mime_type, bytes));
    }

    /// Stylesheet URL for the presentation typeface.
    #[wasm_bindgen(js_name = fontStylesheet)]
    pub fn font_stylesheet() -> String {
        showcase_render::font::MANROPE_STYLESHEET.to_string()
    }

    #[wasm_bindgen(js_name = exportFileName)]
    pub fn export_file_name(&self) -> String {
        export_file_name(&self.inner.config().intro_title, "zip")
    }

    /// Render the deck. `on_progress` receives a percentage after each page.
    #[wasm_bindgen(js_name = exportDocument)]
    pub fn export_document(
        &self,
        include_statement: bool,
        on_progress: Option<js_sys::Function>,
    ) -> Result<Vec<u8>, JsValue> {
        let output = self
            .inner
            .export_document(include_statement, |percent| {
                if let Some(callback) = &on_progress {
                    if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_f64(percent)) {
                        log::warn!("Progress callback failed: {:?}", e);
                    }
                }
            })
            .map_err(|e| JsValue::from_str(&e))?;
        Ok(output.bytes)
    }
}
