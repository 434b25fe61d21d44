use std::collections::BTreeMap;

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value.trim())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    Service,
    PreferredDate,
    PreferredTime,
    Message,
}

impl Field {
    pub fn key(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Service => "service",
            Field::PreferredDate => "preferred_date",
            Field::PreferredTime => "preferred_time",
            Field::Message => "message",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStep {
    Contact = 1,
    Appointment = 2,
    Details = 3,
}

impl FormStep {
    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn title(&self) -> &'static str {
        match self {
            FormStep::Contact => "Your details",
            FormStep::Appointment => "Your visit",
            FormStep::Details => "Anything else?",
        }
    }

    fn following(&self) -> Option<FormStep> {
        match self {
            FormStep::Contact => Some(FormStep::Appointment),
            FormStep::Appointment => Some(FormStep::Details),
            FormStep::Details => None,
        }
    }

    fn preceding(&self) -> Option<FormStep> {
        match self {
            FormStep::Contact => None,
            FormStep::Appointment => Some(FormStep::Contact),
            FormStep::Details => Some(FormStep::Appointment),
        }
    }

    fn required(&self) -> &'static [Field] {
        match self {
            FormStep::Contact => &[Field::Name, Field::Email, Field::Phone],
            FormStep::Appointment => &[Field::Service, Field::PreferredDate],
            FormStep::Details => &[],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub service: String,
    pub preferred_date: String,
    pub preferred_time: String,
    pub message: String,
    pub new_patient: bool,
}

impl ContactFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Service => &self.service,
            Field::PreferredDate => &self.preferred_date,
            Field::PreferredTime => &self.preferred_time,
            Field::Message => &self.message,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Service => &mut self.service,
            Field::PreferredDate => &mut self.preferred_date,
            Field::PreferredTime => &mut self.preferred_time,
            Field::Message => &mut self.message,
        }
    }
}

fn validate_step(step: FormStep, fields: &ContactFields) -> BTreeMap<Field, &'static str> {
    let mut errors = BTreeMap::new();
    for &field in step.required() {
        if fields.get(field).trim().is_empty() {
            errors.insert(field, "This field is required");
        }
    }
    if step == FormStep::Contact
        && !errors.contains_key(&Field::Email)
        && !is_valid_email(&fields.email)
    {
        errors.insert(Field::Email, "Please enter a valid email address");
    }
    errors
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    Failed,
    Invalid,
}

/// Three-step appointment request form. Moves one step at a time; forward
/// moves are gated on the current step's fields.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiStepForm {
    step: FormStep,
    fields: ContactFields,
    errors: BTreeMap<Field, &'static str>,
    started: bool,
    submitting: bool,
    completed: bool,
}

impl Default for MultiStepForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiStepForm {
    pub fn new() -> Self {
        Self {
            step: FormStep::Contact,
            fields: ContactFields::default(),
            errors: BTreeMap::new(),
            started: false,
            submitting: false,
            completed: false,
        }
    }

    pub fn step(&self) -> FormStep {
        self.step
    }

    pub fn fields(&self) -> &ContactFields {
        &self.fields
    }

    pub fn error(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn invalid_fields(&self) -> Vec<&'static str> {
        self.errors.keys().map(Field::key).collect()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns true on the first edit of the form.
    pub fn set_field(&mut self, field: Field, value: String) -> bool {
        *self.fields.slot(field) = value;
        self.errors.remove(&field);
        !std::mem::replace(&mut self.started, true)
    }

    pub fn set_new_patient(&mut self, new_patient: bool) {
        self.fields.new_patient = new_patient;
    }

    pub fn next(&mut self) -> bool {
        let Some(following) = self.step.following() else {
            return false;
        };
        self.errors = validate_step(self.step, &self.fields);
        if !self.errors.is_empty() {
            return false;
        }
        self.step = following;
        true
    }

    pub fn previous(&mut self) -> bool {
        match self.step.preceding() {
            Some(preceding) => {
                self.step = preceding;
                self.errors.clear();
                true
            }
            None => false,
        }
    }

    /// Validates the final step and marks the form as submitting.
    pub fn begin_submit(&mut self) -> Option<ContactFields> {
        if self.step != FormStep::Details || self.submitting || self.completed {
            return None;
        }
        self.errors = validate_step(self.step, &self.fields);
        if !self.errors.is_empty() {
            return None;
        }
        self.submitting = true;
        Some(self.fields.clone())
    }

    pub fn finish_submit(&mut self, result: Result<(), String>) -> SubmitOutcome {
        self.submitting = false;
        match result {
            Ok(()) => {
                self.completed = true;
                SubmitOutcome::Sent
            }
            Err(e) => {
                warn!("Contact form submission failed: {}", e);
                SubmitOutcome::Failed
            }
        }
    }

    pub fn submit<F>(&mut self, handler: F) -> SubmitOutcome
    where
        F: FnOnce(&ContactFields) -> Result<(), String>,
    {
        match self.begin_submit() {
            Some(fields) => {
                let result = handler(&fields);
                self.finish_submit(result)
            }
            None => SubmitOutcome::Invalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_first_step() -> MultiStepForm {
        let mut form = MultiStepForm::new();
        form.set_field(Field::Name, "Ada Lovelace".to_string());
        form.set_field(Field::Email, "ada@example.com".to_string());
        form.set_field(Field::Phone, "555-0100".to_string());
        form
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("patient@clinic.com"));
        assert!(is_valid_email("  padded@clinic.co.uk "));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("two words@clinic.com"));
        assert!(!is_valid_email("missing@tld"));
    }

    #[test]
    fn next_is_gated_on_required_fields() {
        let mut form = MultiStepForm::new();
        assert!(!form.next());
        assert_eq!(form.step(), FormStep::Contact);
        assert_eq!(form.invalid_fields(), vec!["name", "email", "phone"]);

        form.set_field(Field::Name, "Ada".to_string());
        assert_eq!(form.error(Field::Name), None);
    }

    #[test]
    fn malformed_email_blocks_first_step() {
        let mut form = filled_first_step();
        form.set_field(Field::Email, "ada-at-example".to_string());
        assert!(!form.next());
        assert_eq!(form.error(Field::Email), Some("Please enter a valid email address"));
    }

    #[test]
    fn steps_move_one_at_a_time() {
        let mut form = filled_first_step();
        assert!(form.next());
        assert_eq!(form.step(), FormStep::Appointment);
        assert!(!form.next());
        form.set_field(Field::Service, "cleaning".to_string());
        form.set_field(Field::PreferredDate, "2026-11-02".to_string());
        assert!(form.next());
        assert_eq!(form.step().number(), 3);
        assert!(!form.next());
        assert!(form.previous());
        assert!(form.previous());
        assert!(!form.previous());
        assert_eq!(form.step(), FormStep::Contact);
    }

    #[test]
    fn first_edit_is_reported_once() {
        let mut form = MultiStepForm::new();
        assert!(form.set_field(Field::Name, "A".to_string()));
        assert!(!form.set_field(Field::Name, "Ad".to_string()));
    }

    #[test]
    fn submit_only_from_last_step() {
        let mut form = filled_first_step();
        assert_eq!(form.submit(|_| Ok(())), SubmitOutcome::Invalid);

        form.next();
        form.set_field(Field::Service, "whitening".to_string());
        form.set_field(Field::PreferredDate, "2026-11-02".to_string());
        form.next();

        let mut seen = None;
        let outcome = form.submit(|fields| {
            seen = Some(fields.service.clone());
            Ok(())
        });
        assert_eq!(outcome, SubmitOutcome::Sent);
        assert_eq!(seen.as_deref(), Some("whitening"));
        assert!(form.is_completed());
        assert!(!form.is_submitting());
    }

    #[test]
    fn handler_failure_is_absorbed() {
        let mut form = filled_first_step();
        form.next();
        form.set_field(Field::Service, "implants".to_string());
        form.set_field(Field::PreferredDate, "2026-11-02".to_string());
        form.next();

        assert!(form.begin_submit().is_some());
        assert!(form.is_submitting());
        assert!(form.begin_submit().is_none());
        assert_eq!(form.finish_submit(Err("offline".to_string())), SubmitOutcome::Failed);
        assert!(!form.is_submitting());
        assert!(!form.is_completed());
        assert_eq!(form.submit(|_| Ok(())), SubmitOutcome::Sent);
    }
}
