//! `localStorage` / `sessionStorage` behind the core [`Storage`] trait.

use showcase_core::{Error, Result, Storage};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = localStorage, js_name = getItem)]
    fn local_get_item(key: &str) -> std::result::Result<Option<String>, JsValue>;

    #[wasm_bindgen(catch, js_namespace = localStorage, js_name = setItem)]
    fn local_set_item(key: &str, value: &str) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = localStorage, js_name = removeItem)]
    fn local_remove_item(key: &str) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = sessionStorage, js_name = getItem)]
    fn session_get_item(key: &str) -> std::result::Result<Option<String>, JsValue>;

    #[wasm_bindgen(catch, js_namespace = sessionStorage, js_name = setItem)]
    fn session_set_item(key: &str, value: &str) -> std::result::Result<(), JsValue>;

    #[wasm_bindgen(catch, js_namespace = sessionStorage, js_name = removeItem)]
    fn session_remove_item(key: &str) -> std::result::Result<(), JsValue>;
}

/// Which browser storage area to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageArea {
    /// Survives restarts; holds the presentation.
    Local,
    /// Cleared with the tab; holds the admin session flag.
    Session,
}

#[derive(Debug, Clone, Copy)]
pub struct BrowserStorage {
    area: StorageArea,
}

impl BrowserStorage {
    pub fn local() -> Self {
        Self {
            area: StorageArea::Local,
        }
    }

    pub fn session() -> Self {
        Self {
            area: StorageArea::Session,
        }
    }

    pub fn area(&self) -> StorageArea {
        self.area
    }
}

fn storage_error(action: &str, e: JsValue) -> Error {
    let detail = e
        .as_string()
        .or_else(|| {
            e.dyn_ref::<js_sys::Error>()
                .map(|err| String::from(err.message()))
        })
        .unwrap_or_default();
    Error::Storage(format!("{} failed: {}", action, detail))
}

impl Storage for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        match self.area {
            StorageArea::Local => local_get_item(key),
            StorageArea::Session => session_get_item(key),
        }
        .map_err(|e| storage_error("getItem", e))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        match self.area {
            StorageArea::Local => local_set_item(key, value),
            StorageArea::Session => session_set_item(key, value),
        }
        .map_err(|e| storage_error("setItem", e))
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        match self.area {
            StorageArea::Local => local_remove_item(key),
            StorageArea::Session => session_remove_item(key),
        }
        .map_err(|e| storage_error("removeItem", e))
    }
}
