mod form;

pub use form::{ContactFields, Field, FormStep, MultiStepForm, SubmitOutcome};
