use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlButtonElement, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement};

use crate::config::EffectsConfig;
use crate::dom::{self, Listener};
use crate::error::Result;

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

const SENDING_HTML: &str = "<i class=\"fas fa-spinner fa-spin\"></i> Enviando...";
const SENT_HTML: &str = "<i class=\"fas fa-check\"></i> Enviado!";
const SENT_BACKGROUND: &str = "linear-gradient(45deg, #4CAF50, #45a049)";

/// Inline message shown under an invalid field.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("Este campo é obrigatório")]
    Required,
    #[error("Por favor, insira um email válido")]
    InvalidEmail,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldRules {
    pub required: bool,
    pub email: bool,
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

pub fn validate(value: &str, rules: FieldRules) -> std::result::Result<(), FieldError> {
    let value = value.trim();
    if rules.required && value.is_empty() {
        return Err(FieldError::Required);
    }
    if rules.email && !value.is_empty() && !is_valid_email(value) {
        return Err(FieldError::InvalidEmail);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Sending,
    Sent,
}

/// Simulated submission: nothing leaves the page.
#[derive(Debug)]
pub struct Submission {
    phase: SubmitPhase,
}

impl Default for Submission {
    fn default() -> Self {
        Self { phase: SubmitPhase::Idle }
    }
}

impl Submission {
    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    /// Returns false if a submission is already in flight.
    pub fn start(&mut self) -> bool {
        if self.phase != SubmitPhase::Idle {
            return false;
        }
        self.phase = SubmitPhase::Sending;
        true
    }

    pub fn complete(&mut self) {
        if self.phase == SubmitPhase::Sending {
            self.phase = SubmitPhase::Sent;
        }
    }

    pub fn reset(&mut self) {
        self.phase = SubmitPhase::Idle;
    }
}

struct Field {
    value: String,
    rules: FieldRules,
}

fn read_field(element: &Element) -> Option<Field> {
    let required = element.has_attribute("required");
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        return Some(Field {
            value: input.value(),
            rules: FieldRules {
                required,
                email: input.type_() == "email",
            },
        });
    }
    element.dyn_ref::<HtmlTextAreaElement>().map(|area| Field {
        value: area.value(),
        rules: FieldRules { required, email: false },
    })
}

fn clear_validation(field: &Element) -> Result<()> {
    field.class_list().remove_2("error", "valid")?;
    if let Some(parent) = field.parent_element() {
        if let Some(message) = parent.query_selector(".error-message")? {
            message.remove();
        }
    }
    Ok(())
}

fn show_field_error(document: &Document, field: &Element, error: FieldError) -> Result<()> {
    let Some(parent) = field.parent_element() else {
        return Ok(());
    };
    let message = document.create_element("div")?;
    message.set_class_name("error-message");
    message.set_text_content(Some(&error.to_string()));
    message.set_attribute("style", "color: #ff6b6b; font-size: 0.9rem; margin-top: 0.5rem;")?;
    parent.append_child(&message)?;
    Ok(())
}

fn validate_field(document: &Document, element: &Element) -> Result<()> {
    clear_validation(element)?;
    let Some(field) = read_field(element) else {
        return Ok(());
    };
    match validate(&field.value, field.rules) {
        Ok(()) => element.class_list().add_1("valid")?,
        Err(error) => {
            debug!("Field {} invalid: {}", element.id(), error);
            element.class_list().add_1("error")?;
            show_field_error(document, element, error)?;
        }
    }
    Ok(())
}

fn submit(form: &HtmlFormElement, submission: &Rc<RefCell<Submission>>, config: &EffectsConfig) -> Result<()> {
    if !submission.borrow_mut().start() {
        return Ok(());
    }
    let Some(button) = form
        .query_selector("button[type=\"submit\"]")?
        .and_then(|b| b.dyn_into::<HtmlButtonElement>().ok())
    else {
        submission.borrow_mut().reset();
        return Ok(());
    };

    let original = button.inner_html();
    button.set_inner_html(SENDING_HTML);
    button.set_disabled(true);
    info!("Simulating contact form submission");

    let form = form.clone();
    let submission = submission.clone();
    let reset_ms = config.submit_reset_ms;
    Timeout::new(config.submit_sending_ms, move || {
        submission.borrow_mut().complete();
        button.set_inner_html(SENT_HTML);
        let _ = button.style().set_property("background", SENT_BACKGROUND);

        Timeout::new(reset_ms, move || {
            form.reset();
            button.set_inner_html(&original);
            button.set_disabled(false);
            let _ = button.style().set_property("background", "");
            submission.borrow_mut().reset();
        })
        .forget();
    })
    .forget();
    Ok(())
}

pub fn install(document: &Document, config: &EffectsConfig) -> Result<Vec<Listener>> {
    let Some(form) = document
        .query_selector("form")?
        .and_then(|f| f.dyn_into::<HtmlFormElement>().ok())
    else {
        debug!("No form on page");
        return Ok(Vec::new());
    };

    let mut listeners = Vec::new();
    let submission = Rc::new(RefCell::new(Submission::default()));

    listeners.push(Listener::new(&form, "submit", {
        let form = form.clone();
        let config = config.clone();
        move |event: Event| {
            event.prevent_default();
            if let Err(e) = submit(&form, &submission, &config) {
                warn!("Form submission failed: {}", e);
            }
        }
    })?);

    for field in dom::query_all_in(&form, "input, textarea")? {
        listeners.push(Listener::new(&field, "blur", {
            let document = document.clone();
            let field = field.clone();
            move |_: Event| {
                if let Err(e) = validate_field(&document, &field) {
                    warn!("Field validation failed: {}", e);
                }
            }
        })?);
        listeners.push(Listener::new(&field, "input", {
            let field = field.clone();
            move |_: Event| {
                if let Err(e) = clear_validation(&field) {
                    warn!("Clearing validation failed: {}", e);
                }
            }
        })?);
    }

    info!("Form handling installed");
    Ok(listeners)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: FieldRules = FieldRules { required: true, email: false };
    const EMAIL_FIELD: FieldRules = FieldRules { required: true, email: true };
    const OPTIONAL_EMAIL: FieldRules = FieldRules { required: false, email: true };

    #[test]
    fn required_field_rejects_blank() {
        assert_eq!(validate("", REQUIRED), Err(FieldError::Required));
        assert_eq!(validate("   \t", REQUIRED), Err(FieldError::Required));
        assert_eq!(validate("Ana", REQUIRED), Ok(()));
        assert_eq!(validate("", FieldRules::default()), Ok(()));
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.pt"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@@example.com"));
    }

    #[test]
    fn email_checked_after_trim() {
        assert_eq!(validate("  ana@example.com ", EMAIL_FIELD), Ok(()));
        assert_eq!(validate("ana", EMAIL_FIELD), Err(FieldError::InvalidEmail));
        assert_eq!(validate("", EMAIL_FIELD), Err(FieldError::Required));
        assert_eq!(validate("", OPTIONAL_EMAIL), Ok(()));
    }

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(FieldError::Required.to_string(), "Este campo é obrigatório");
        assert_eq!(FieldError::InvalidEmail.to_string(), "Por favor, insira um email válido");
    }

    #[test]
    fn submission_cycle() {
        let mut submission = Submission::default();
        assert!(submission.start());
        assert_eq!(submission.phase(), SubmitPhase::Sending);
        assert!(!submission.start());
        submission.complete();
        assert_eq!(submission.phase(), SubmitPhase::Sent);
        assert!(!submission.start());
        submission.reset();
        assert!(submission.start());
    }

    #[test]
    fn complete_only_from_sending() {
        let mut submission = Submission::default();
        submission.complete();
        assert_eq!(submission.phase(), SubmitPhase::Idle);
    }
}
