//! Submission flow with a simulated save.
//!
//! # Invariants
//! - The sink is never called unless every rule passed.
//! - A failed save leaves every field and the preview untouched.
//! - A successful save clears every field and the preview.

use super::validation::{
    validate_fields, validate_image, FormField, ImagePreview, ImageUpload, SubmissionError,
};
use crate::config::SiteConfig;
use async_trait::async_trait;
use chrono::NaiveDate;
use log::{info, warn};
use std::time::Duration;
use uuid::Uuid;

pub const SUCCESS_TITLE: &str = "Memória adicionada!";
pub const SUCCESS_DESCRIPTION: &str = "Sua memória foi adicionada com sucesso ao nosso memorial.";

/// Payload handed to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySubmission {
    pub title: String,
    pub date: NaiveDate,
    pub location: String,
    pub description: String,
    pub image: ImagePreview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub id: Uuid,
}

/// Destination of accepted submissions.
#[async_trait]
pub trait MemorySink: Send + Sync {
    async fn save(&self, submission: &MemorySubmission) -> Result<SubmissionReceipt, String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulatedOutcome {
    Succeed,
    Fail,
}

/// Demo sink: waits, then pretends to store. Nothing is persisted.
#[derive(Debug, Clone)]
pub struct SimulatedSink {
    delay: Duration,
    outcome: SimulatedOutcome,
}

impl SimulatedSink {
    pub fn new(delay: Duration, outcome: SimulatedOutcome) -> Self {
        Self { delay, outcome }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.simulated_save_delay, SimulatedOutcome::Succeed)
    }
}

#[async_trait]
impl MemorySink for SimulatedSink {
    async fn save(&self, submission: &MemorySubmission) -> Result<SubmissionReceipt, String> {
        tokio::time::sleep(self.delay).await;
        match self.outcome {
            SimulatedOutcome::Succeed => Ok(SubmissionReceipt { id: Uuid::new_v4() }),
            SimulatedOutcome::Fail => Err(format!(
                "simulated failure for `{}`",
                crate::logging::single_line(&submission.title, 50)
            )),
        }
    }
}

/// State of the "add memory" form.
pub struct SubmissionForm {
    config: SiteConfig,
    title: String,
    date: String,
    location: String,
    description: String,
    preview: Option<ImagePreview>,
    is_submitting: bool,
}

impl SubmissionForm {
    pub fn new(config: SiteConfig) -> Self {
        Self {
            config,
            title: String::new(),
            date: String::new(),
            location: String::new(),
            description: String::new(),
            preview: None,
            is_submitting: false,
        }
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Title => &mut self.title,
            FormField::Date => &mut self.date,
            FormField::Location => &mut self.location,
            FormField::Description => &mut self.description,
        };
        *slot = value.into();
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Date => &self.date,
            FormField::Location => &self.location,
            FormField::Description => &self.description,
        }
    }

    pub fn preview(&self) -> Option<&ImagePreview> {
        self.preview.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn is_pristine(&self) -> bool {
        FormField::ALL.iter().all(|field| self.field(*field).is_empty()) && self.preview.is_none()
    }

    /// Image input change handler. A rejected file keeps the previous preview.
    pub fn select_image(&mut self, upload: &ImageUpload) -> Result<&ImagePreview, SubmissionError> {
        match validate_image(upload, &self.config) {
            Ok(preview) => Ok(&*self.preview.insert(preview)),
            Err(err) => {
                warn!(
                    "event=image_rejected module=form status=error size={} reason={}",
                    upload.size_bytes(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Validates and locks the form for saving.
    pub fn begin_submit(&mut self) -> Result<MemorySubmission, SubmissionError> {
        if self.is_submitting {
            return Err(SubmissionError::AlreadySubmitting);
        }
        let fields = validate_fields(&self.title, &self.date, &self.location, &self.description)?;
        let image = self.preview.clone().ok_or(SubmissionError::MissingImage)?;

        self.is_submitting = true;
        Ok(MemorySubmission {
            title: fields.title,
            date: fields.date,
            location: fields.location,
            description: fields.description,
            image,
        })
    }

    /// Unlocks the form and applies the save result.
    pub fn finish_submit(
        &mut self,
        result: Result<SubmissionReceipt, String>,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        self.is_submitting = false;
        match result {
            Ok(receipt) => {
                info!(
                    "event=memory_submitted module=form status=ok receipt={}",
                    receipt.id
                );
                self.reset();
                Ok(receipt)
            }
            Err(reason) => {
                warn!(
                    "event=memory_submit_failed module=form status=error reason={}",
                    crate::logging::single_line(&reason, 120)
                );
                Err(SubmissionError::SaveFailed(reason))
            }
        }
    }

    /// Full submit: validate, save through `sink`, apply the result.
    ///
    /// Dropping the returned future mid-save unlocks the form and keeps every
    /// field, so the user can retry.
    pub async fn submit(
        &mut self,
        sink: &dyn MemorySink,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let submission = self.begin_submit()?;
        let in_flight = InFlight(&mut self.is_submitting);
        let result = sink.save(&submission).await;
        drop(in_flight);
        self.finish_submit(result)
    }

    fn reset(&mut self) {
        self.title.clear();
        self.date.clear();
        self.location.clear();
        self.description.clear();
        self.preview = None;
    }
}

/// Clears the submitting flag when dropped.
struct InFlight<'a>(&'a mut bool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

#[cfg(test)]
mod tests {
    use super::{SimulatedOutcome, SimulatedSink, SubmissionForm};
    use crate::config::SiteConfig;
    use crate::form::validation::{FormField, ImageUpload, SubmissionError};
    use std::time::Duration;

    fn filled_form() -> SubmissionForm {
        let mut form = SubmissionForm::new(SiteConfig::default());
        form.set_field(FormField::Title, "Piquenique");
        form.set_field(FormField::Date, "2022-09-10");
        form.set_field(FormField::Location, "Parque");
        form.set_field(FormField::Description, "Sanduíches e formigas.");
        form.select_image(&ImageUpload::new("p.jpg", "image/jpeg", vec![1, 2, 3]))
            .expect("valid image");
        form
    }

    #[test]
    fn begin_submit_locks_until_finished() {
        let mut form = filled_form();
        form.begin_submit().expect("valid form");
        assert!(form.is_submitting());
        assert_eq!(form.begin_submit(), Err(SubmissionError::AlreadySubmitting));

        let err = form
            .finish_submit(Err("offline".to_string()))
            .expect_err("failed save");
        assert_eq!(err.title(), "Erro ao salvar");
        assert!(!form.is_submitting());
        assert_eq!(form.field(FormField::Title), "Piquenique");
        assert!(form.preview().is_some());
    }

    #[test]
    fn rejected_image_keeps_previous_preview() {
        let mut form = filled_form();
        let before = form.preview().cloned();
        form.select_image(&ImageUpload::new("p.tiff", "image/tiff", vec![0]))
            .expect_err("tiff rejected");
        assert_eq!(form.preview().cloned(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_failure_preserves_input() {
        let mut form = filled_form();
        let sink = SimulatedSink::new(Duration::from_millis(1_500), SimulatedOutcome::Fail);
        let err = form.submit(&sink).await.expect_err("simulated failure");
        assert!(matches!(err, SubmissionError::SaveFailed(_)));
        assert!(!form.is_pristine());
        assert_eq!(form.field(FormField::Date), "2022-09-10");
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_save_unlocks_the_form() {
        let mut form = filled_form();
        let sink = SimulatedSink::new(Duration::from_millis(1_500), SimulatedOutcome::Succeed);

        let abandoned = tokio::time::timeout(Duration::from_millis(100), form.submit(&sink)).await;
        assert!(abandoned.is_err());
        assert!(!form.is_submitting());
        assert_eq!(form.field(FormField::Title), "Piquenique");

        form.submit(&sink).await.expect("retry succeeds");
        assert!(form.is_pristine());
    }
}
