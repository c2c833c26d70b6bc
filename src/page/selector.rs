//! Typed element selectors.
//!
//! Components never build CSS strings by hand. They describe what they are
//! looking for with a [`Selector`], which the browser backend renders to CSS
//! via [`Selector::to_css`] and the in-memory backend evaluates directly.

use std::fmt;

/// A small, typed subset of CSS selectors.
///
/// `All` is a compound selector (every part must match the same element) and
/// should only contain simple parts. `AnyOf` is a selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Id(String),
    Tag(String),
    Class(String),
    Attr(String),
    AttrEq(String, String),
    AttrPrefix(String, String),
    All(Vec<Selector>),
    AnyOf(Vec<Selector>),
}

impl Selector {
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    pub fn attr(name: impl Into<String>) -> Self {
        Self::Attr(name.into())
    }

    pub fn attr_eq(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::AttrEq(name.into(), value.into())
    }

    pub fn attr_prefix(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::AttrPrefix(name.into(), prefix.into())
    }

    /// Render as a CSS selector string.
    pub fn to_css(&self) -> String {
        match self {
            Self::Id(id) => format!("#{}", css_ident(id)),
            Self::Tag(tag) => tag.clone(),
            Self::Class(class) => format!(".{}", css_ident(class)),
            Self::Attr(name) => format!("[{name}]"),
            Self::AttrEq(name, value) => format!("[{name}=\"{}\"]", css_string(value)),
            Self::AttrPrefix(name, prefix) => format!("[{name}^=\"{}\"]", css_string(prefix)),
            Self::All(parts) => parts.iter().map(Self::to_css).collect(),
            Self::AnyOf(parts) => parts
                .iter()
                .map(Self::to_css)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Evaluate against an element described by accessor closures.
    ///
    /// Used by backends that do not have a native selector engine.
    pub fn matches_with<'a>(
        &self,
        tag: &str,
        attribute: &dyn Fn(&str) -> Option<&'a str>,
    ) -> bool {
        match self {
            Self::Id(id) => attribute("id") == Some(id.as_str()),
            Self::Tag(expected) => tag.eq_ignore_ascii_case(expected),
            Self::Class(class) => attribute("class")
                .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class)),
            Self::Attr(name) => attribute(name).is_some(),
            Self::AttrEq(name, value) => attribute(name) == Some(value.as_str()),
            Self::AttrPrefix(name, prefix) => {
                attribute(name).is_some_and(|v| v.starts_with(prefix.as_str()))
            }
            Self::All(parts) => parts.iter().all(|p| p.matches_with(tag, attribute)),
            Self::AnyOf(parts) => parts.iter().any(|p| p.matches_with(tag, attribute)),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

fn css_ident(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for (i, c) in raw.chars().enumerate() {
        let plain = c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii();
        if plain && !(i == 0 && c.is_ascii_digit()) {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }
    out
}

fn css_string(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}
