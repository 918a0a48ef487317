//! "Add memory" form: validation and simulated save.
//!
//! Submitted memories are never written back into the catalog.

pub mod submission;
pub mod validation;

pub use submission::{
    MemorySink, MemorySubmission, SimulatedOutcome, SimulatedSink, SubmissionForm,
    SubmissionReceipt, SUCCESS_DESCRIPTION, SUCCESS_TITLE,
};
pub use validation::{
    validate_fields, validate_image, FormField, ImagePreview, ImageUpload, SubmissionError,
    ValidatedFields,
};
