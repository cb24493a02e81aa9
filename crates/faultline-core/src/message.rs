//! Localizable messages
//!
//! A [`Message`] is a template plus named parameters. Placeholders are written
//! `%(name)`. Rendering happens late, against a [`CallContext`], so the same
//! message can be shown in whatever locale the reporting layer runs in.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

// constant pattern, compilation cannot fail
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%\(([A-Za-z_][A-Za-z0-9_]*)\)").expect("valid placeholder pattern"));

/// Translates message templates for a locale
pub trait MessageCatalog: Send + Sync {
    /// Translated template, or `None` to keep the original
    fn lookup(&self, locale: &str, template: &str) -> Option<String>;
}

/// Ambient context for rendering messages and translating failures
#[derive(Clone, Default)]
pub struct CallContext {
    locale: Option<String>,
    catalog: Option<Arc<dyn MessageCatalog>>,
}

impl CallContext {
    /// Context without locale or catalog
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With locale, e.g. `de`
    #[inline]
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// With message catalog
    #[inline]
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn MessageCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Current locale
    #[inline]
    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    fn translate<'a>(&self, template: &'a str) -> Cow<'a, str> {
        match (&self.locale, &self.catalog) {
            (Some(locale), Some(catalog)) => catalog
                .lookup(locale, template)
                .map_or(Cow::Borrowed(template), Cow::Owned),
            _ => Cow::Borrowed(template),
        }
    }
}

impl Debug for CallContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("locale", &self.locale)
            .field("catalog", &self.catalog.is_some())
            .finish()
    }
}

/// Template with named substitution parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    template: Cow<'static, str>,
    params: Vec<(Cow<'static, str>, String)>,
}

impl Message {
    /// Message from template
    #[inline]
    #[must_use]
    pub fn new(template: impl Into<Cow<'static, str>>) -> Self {
        Self {
            template: template.into(),
            params: Vec::new(),
        }
    }

    /// Add a substitution parameter; a later value for the same name wins
    #[must_use]
    pub fn with(mut self, name: impl Into<Cow<'static, str>>, value: impl Display) -> Self {
        let name = name.into();
        let value = value.to_string();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
        self
    }

    /// Raw template
    #[inline]
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Value bound to a parameter
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// True when the text with parameters substituted is blank
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.substitute(&self.template).trim().is_empty()
    }

    /// Render through the context's catalog, then substitute parameters.
    ///
    /// Unknown placeholders are kept verbatim.
    #[must_use]
    pub fn render(&self, context: &CallContext) -> String {
        let template = context.translate(&self.template);
        self.substitute(&template)
    }

    fn substitute(&self, template: &str) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures<'_>| {
                self.param(&caps[1])
                    .map_or_else(|| caps[0].to_string(), str::to_string)
            })
            .into_owned()
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.substitute(&self.template))
    }
}

impl From<&'static str> for Message {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Message {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
