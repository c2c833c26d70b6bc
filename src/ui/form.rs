//! # Contact Form Validation
//!
//! Client-side checks on the contact form before the browser submits it to
//! the form-processing service.
//!
//! ## Rules
//!
//! | Field | Valid when | Error |
//! |-------|------------|-------|
//! | name | trimmed length >= 2 | "Please enter your name." |
//! | email | matches `^[^\s@]+@[^\s@]+\.[^\s@]+$` | "Please enter a valid email." |
//! | message | trimmed length >= 10 | "Please enter a longer message." |
//!
//! Every field is checked on every submission, so all errors show at once.
//! Lengths count UTF-16 code units, matching what the browser reports for
//! the same text. The email pattern is a shape check, not RFC validation.
//!
//! "Whitespace" here is the ECMAScript set (`\s` and `String.prototype.trim`
//! in the browser), not Unicode `White_Space`: U+FEFF counts, U+0085 does
//! not.

use super::config::SiteConfig;
use super::Behavior;
use crate::page::{Outcome, Page, PageEvent};
use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

/// Body of a character class matching ECMAScript whitespace and line
/// terminators.
const JS_WHITESPACE: &str =
    r"\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}";

/// `^[^\s@]+@[^\s@]+\.[^\s@]+$` with `\s` read the way the browser reads it.
fn email_pattern() -> String {
    let part = format!("[^{JS_WHITESPACE}@]+");
    format!(r"^{part}@{part}\.{part}$")
}

/// The three validated contact fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Message];

    pub fn error_message(self) -> &'static str {
        match self {
            Field::Name => "Please enter your name.",
            Field::Email => "Please enter a valid email.",
            Field::Message => "Please enter a longer message.",
        }
    }
}

/// Field rules with the email pattern compiled once.
#[derive(Debug, Clone)]
pub struct Validator {
    email: Regex,
}

impl Validator {
    pub fn new() -> Result<Self> {
        let email = Regex::new(&email_pattern()).context("Failed to compile email regex pattern")?;
        Ok(Self { email })
    }

    /// `None` when `raw` is acceptable for `field`, otherwise the message to
    /// show.
    pub fn check(&self, field: Field, raw: &str) -> Option<&'static str> {
        let value = trim_js(raw);
        let ok = match field {
            Field::Name => utf16_len(value) >= 2,
            Field::Email => self.email.is_match(value),
            Field::Message => utf16_len(value) >= 10,
        };
        (!ok).then(|| field.error_message())
    }
}

/// Trim the characters `String.prototype.trim` removes.
fn trim_js(raw: &str) -> &str {
    raw.trim_matches(is_js_whitespace)
}

fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{0B}'
            | '\u{0C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

/// The contact form and the ids of its fields.
#[derive(Debug, Clone)]
pub struct ContactForm<E> {
    form: E,
    field_ids: [(Field, String); 3],
    error_suffix: String,
    validator: Validator,
}

impl<E: Clone + PartialEq> ContactForm<E> {
    pub fn mount<P: Page<Element = E>>(page: &P, config: &SiteConfig) -> Result<Option<Self>> {
        let markup = &config.markup;
        let Some(form) = page.element_by_id(&markup.contact_form_id) else {
            return Ok(None);
        };
        Ok(Some(Self {
            form,
            field_ids: [
                (Field::Name, markup.name_field_id.clone()),
                (Field::Email, markup.email_field_id.clone()),
                (Field::Message, markup.message_field_id.clone()),
            ],
            error_suffix: markup.error_suffix.clone(),
            validator: Validator::new()?,
        }))
    }

    /// Check every field that has both an input and an error element, write
    /// the results into the page, and report whether submission may go
    /// ahead.
    pub fn validate<P: Page<Element = E>>(&self, page: &mut P) -> bool {
        let mut valid = true;
        for (field, id) in &self.field_ids {
            let input = page.element_by_id(id);
            let error = page.element_by_id(&format!("{id}{}", self.error_suffix));
            let (Some(input), Some(error)) = (input, error) else {
                continue;
            };
            let value = page.value(&input).unwrap_or_default();
            match self.validator.check(*field, &value) {
                Some(message) => {
                    page.set_text(&error, message);
                    page.set_attribute(&input, "aria-invalid", "true");
                    valid = false;
                }
                None => {
                    page.set_text(&error, "");
                    page.set_attribute(&input, "aria-invalid", "false");
                }
            }
        }
        if !valid {
            debug!("Contact form submission blocked by validation");
        }
        valid
    }
}

impl<P: Page> Behavior<P> for ContactForm<P::Element> {
    fn handle(&mut self, page: &mut P, event: &PageEvent<P::Element>) -> Outcome {
        match event {
            PageEvent::Submit { form } if *form == self.form => {
                if self.validate(page) {
                    Outcome::Proceed
                } else {
                    Outcome::PreventDefault
                }
            }
            _ => Outcome::Proceed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{MemoryPage, NodeId};

    fn validator() -> Validator {
        Validator::new().expect("validator")
    }

    struct Fixture {
        page: MemoryPage,
        form: NodeId,
        name: NodeId,
        email: NodeId,
        message: NodeId,
        name_error: NodeId,
        email_error: NodeId,
        message_error: NodeId,
    }

    fn fixture() -> Fixture {
        let mut page = MemoryPage::new();
        let body = page.body();
        let form = page.append(body, "form", &[("id", "contactForm")]);
        let name = page.append(form, "input", &[("id", "name")]);
        let name_error = page.append(form, "p", &[("id", "name-error")]);
        let email = page.append(form, "input", &[("id", "email")]);
        let email_error = page.append(form, "p", &[("id", "email-error")]);
        let message = page.append(form, "textarea", &[("id", "message")]);
        let message_error = page.append(form, "p", &[("id", "message-error")]);
        Fixture {
            page,
            form,
            name,
            email,
            message,
            name_error,
            email_error,
            message_error,
        }
    }

    #[test]
    fn test_name_rule() {
        let v = validator();
        assert_eq!(v.check(Field::Name, "A"), Some("Please enter your name."));
        assert_eq!(v.check(Field::Name, "Al"), None);
        assert_eq!(v.check(Field::Name, "  A  "), Some("Please enter your name."));
    }

    #[test]
    fn test_email_rule() {
        let v = validator();
        assert_eq!(v.check(Field::Email, "a@b"), Some("Please enter a valid email."));
        assert_eq!(v.check(Field::Email, "a@b.com"), None);
        assert_eq!(v.check(Field::Email, " a@b.com "), None);
        assert!(v.check(Field::Email, "a b@c.com").is_some());
        assert!(v.check(Field::Email, "a@@b.com").is_some());
        assert!(v.check(Field::Email, "").is_some());
    }

    #[test]
    fn test_email_rule_is_permissive() {
        let v = validator();
        assert_eq!(v.check(Field::Email, "x@y.z.w"), None);
        assert_eq!(v.check(Field::Email, "a.b@c.d"), None);
    }

    #[test]
    fn test_message_rule() {
        let v = validator();
        assert_eq!(
            v.check(Field::Message, "short"),
            Some("Please enter a longer message.")
        );
        assert_eq!(v.check(Field::Message, "this is long enough"), None);
        assert!(v.check(Field::Message, "   short    ").is_some());
    }

    #[test]
    fn test_lengths_count_utf16_units() {
        let v = validator();
        // One astral character is two UTF-16 code units.
        assert_eq!(v.check(Field::Name, "\u{1f600}"), None);
        assert!(v.check(Field::Name, "\u{e9}").is_some());
    }

    #[test]
    fn test_trim_matches_browser() {
        assert_eq!(trim_js("\u{feff} Ada \n"), "Ada");
        assert_eq!(trim_js("\u{3000}Ada\u{2028}"), "Ada");
        // NEL is not whitespace to the browser
        assert_eq!(trim_js("A\u{85}"), "A\u{85}");
    }

    #[test]
    fn test_whitespace_follows_browser_rules() {
        let v = validator();
        assert_eq!(v.check(Field::Name, "A\u{85}"), None);
        assert!(v.check(Field::Name, "A\u{feff}").is_some());
        assert_eq!(v.check(Field::Email, "a\u{85}b@c.com"), None);
        assert!(v.check(Field::Email, "a\u{feff}b@c.com").is_some());
        assert!(v.check(Field::Email, "a@b\u{a0}c.com").is_some());
        assert!(v.check(Field::Email, "a@b.c\u{2009}d").is_some());
        assert_eq!(v.check(Field::Email, "\u{feff}a@b.com\u{feff}"), None);
    }

    #[test]
    fn test_invalid_submission_is_blocked() {
        let mut f = fixture();
        let mut form = ContactForm::mount(&f.page, &SiteConfig::default())
            .expect("mount")
            .expect("form");
        f.page.set_value(f.name, "A");
        f.page.set_value(f.email, "a@b.com");
        f.page.set_value(f.message, "short");

        let outcome = form.handle(&mut f.page, &PageEvent::Submit { form: f.form });

        assert_eq!(outcome, Outcome::PreventDefault);
        assert_eq!(f.page.text(f.name_error), "Please enter your name.");
        assert_eq!(f.page.text(f.email_error), "");
        assert_eq!(f.page.text(f.message_error), "Please enter a longer message.");
        assert_eq!(f.page.attribute(&f.name, "aria-invalid").as_deref(), Some("true"));
        assert_eq!(f.page.attribute(&f.email, "aria-invalid").as_deref(), Some("false"));
        assert_eq!(
            f.page.attribute(&f.message, "aria-invalid").as_deref(),
            Some("true")
        );
    }

    #[test]
    fn test_valid_submission_proceeds_and_clears_errors() {
        let mut f = fixture();
        let mut form = ContactForm::mount(&f.page, &SiteConfig::default())
            .expect("mount")
            .expect("form");
        f.page.set_text(&f.name_error, "Please enter your name.");
        f.page.set_value(f.name, "Al");
        f.page.set_value(f.email, "a@b.com");
        f.page.set_value(f.message, "this is long enough");

        let outcome = form.handle(&mut f.page, &PageEvent::Submit { form: f.form });

        assert_eq!(outcome, Outcome::Proceed);
        assert_eq!(f.page.text(f.name_error), "");
        assert_eq!(f.page.attribute(&f.name, "aria-invalid").as_deref(), Some("false"));
    }

    #[test]
    fn test_field_without_error_element_is_skipped() {
        let mut page = MemoryPage::new();
        let body = page.body();
        let form_el = page.append(body, "form", &[("id", "contactForm")]);
        let name = page.append(form_el, "input", &[("id", "name")]);
        let mut form = ContactForm::mount(&page, &SiteConfig::default())
            .expect("mount")
            .expect("form");

        let outcome = form.handle(&mut page, &PageEvent::Submit { form: form_el });
        assert_eq!(outcome, Outcome::Proceed);
        assert!(!page.has_attribute(&name, "aria-invalid"));
    }

    #[test]
    fn test_other_forms_are_ignored() {
        let mut f = fixture();
        let body = f.page.body();
        let search = f.page.append(body, "form", &[("id", "search")]);
        let mut form = ContactForm::mount(&f.page, &SiteConfig::default())
            .expect("mount")
            .expect("form");

        let outcome = form.handle(&mut f.page, &PageEvent::Submit { form: search });
        assert_eq!(outcome, Outcome::Proceed);
        assert_eq!(f.page.text(f.name_error), "");
    }

    #[test]
    fn test_no_form_no_component() {
        let page = MemoryPage::new();
        let form = ContactForm::mount(&page, &SiteConfig::default()).expect("mount");
        assert!(form.is_none());
    }
}
