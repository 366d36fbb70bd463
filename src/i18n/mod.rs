//! Internationalization (i18n) module for ArchDrive.
//!
//! Messages live in TOML catalogs. Ukrainian and English catalogs are
//! compiled in; other locales can be loaded from a directory.
//!
//! # Usage
//!
//! ```
//! use archdrive::i18n::I18n;
//!
//! let i18n = I18n::builtin("en");
//! assert_eq!(i18n.t("browser.root"), "Root");
//!
//! let text = i18n.t_with("browser.folder_items", &[("count", "3")]);
//! assert_eq!(text, "3 items");
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

/// Default locale.
pub const DEFAULT_LOCALE: &str = "uk";

const BUILTIN_UK: &str = include_str!("../../locales/uk.toml");
const BUILTIN_EN: &str = include_str!("../../locales/en.toml");

/// I18n-related errors.
#[derive(Error, Debug)]
pub enum I18nError {
    /// Failed to read locale file.
    #[error("Failed to read locale file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML.
    #[error("Failed to parse locale file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Locale not found.
    #[error("Locale not found: {0}")]
    LocaleNotFound(String),
}

/// Result type for i18n operations.
pub type Result<T> = std::result::Result<T, I18nError>;

/// Message catalog for one locale.
#[derive(Debug, Clone)]
pub struct I18n {
    locale: String,
    /// Dotted key -> message.
    messages: HashMap<String, String>,
}

/// Primary subtag of a locale tag: `"en-US"` and `"EN"` become `"en"`.
fn primary_language(locale: &str) -> String {
    locale
        .trim()
        .split(&['-', '_', '.'][..])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

impl I18n {
    /// Load `<locales_dir>/<locale>.toml`.
    pub fn load<P: AsRef<Path>>(locale: &str, locales_dir: P) -> Result<Self> {
        let path = locales_dir.as_ref().join(format!("{locale}.toml"));
        if !path.is_file() {
            return Err(I18nError::LocaleNotFound(locale.to_string()));
        }

        Self::parse(locale, &fs::read_to_string(&path)?)
    }

    /// Parse a TOML catalog. Nested tables become dotted keys.
    pub fn parse(locale: &str, content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)?;

        let mut messages = HashMap::new();
        collect_messages(None, &table, &mut messages);

        Ok(Self {
            locale: locale.to_string(),
            messages,
        })
    }

    /// Compiled-in catalog for `locale`; unknown locales get the default one.
    pub fn builtin(locale: &str) -> Self {
        let (locale, content) = match primary_language(locale).as_str() {
            "en" => ("en", BUILTIN_EN),
            _ => (DEFAULT_LOCALE, BUILTIN_UK),
        };

        Self::parse(locale, content).unwrap_or_else(|_| Self::empty(locale))
    }

    /// Catalog without messages; every lookup returns the key.
    pub fn empty(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            messages: HashMap::new(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Message for `key`, or the key itself when missing.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.t_or(key, key)
    }

    /// Message for `key` with every `{{name}}` replaced by its value.
    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        params
            .iter()
            .fold(self.t(key).to_string(), |text, (name, value)| {
                text.replace(&format!("{{{{{name}}}}}"), value)
            })
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    /// Message for `key`, or `fallback` when missing.
    pub fn t_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.messages.get(key).map_or(fallback, String::as_str)
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::builtin(DEFAULT_LOCALE)
    }
}

/// Collect string leaves of `table` under dotted keys. Other value types
/// are not messages and are skipped.
fn collect_messages(prefix: Option<&str>, table: &toml::Table, out: &mut HashMap<String, String>) {
    for (key, value) in table {
        let full_key = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };

        match value {
            toml::Value::Table(nested) => collect_messages(Some(&full_key), nested, out),
            toml::Value::String(text) => {
                out.insert(full_key, text.clone());
            }
            _ => {}
        }
    }
}
