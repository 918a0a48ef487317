//! Client-side rules for the "add memory" form.
//!
//! Each rule maps to its own [`SubmissionError`] variant so the view can show
//! a distinct message per failure.

use crate::config::SiteConfig;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static INLINE_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]+").expect("valid inline space regex"));

const BYTES_PER_MIB: u64 = 1024 * 1024;

/// Input fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Title,
    Date,
    Location,
    Description,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Title,
        FormField::Date,
        FormField::Location,
        FormField::Description,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Título da Memória",
            Self::Date => "Data",
            Self::Location => "Local",
            Self::Description => "Descrição",
        }
    }

    /// Character limit, if the field has one.
    pub fn max_chars(self) -> Option<usize> {
        match self {
            Self::Title => Some(50),
            Self::Date => None,
            Self::Location => Some(30),
            Self::Description => Some(200),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    InvalidFormat { mime_type: String },
    FileTooLarge { size_bytes: u64, max_bytes: u64 },
    MissingImage,
    MissingField(FormField),
    FieldTooLong { field: FormField, max_chars: usize },
    InvalidDate(String),
    AlreadySubmitting,
    /// Generic save failure; the form keeps its input.
    SaveFailed(String),
}

impl SubmissionError {
    /// Toast title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::InvalidFormat { .. } => "Formato inválido",
            Self::FileTooLarge { .. } => "Arquivo muito grande",
            Self::MissingImage => "Imagem obrigatória",
            Self::MissingField(_) => "Campo obrigatório",
            Self::FieldTooLong { .. } => "Texto muito longo",
            Self::InvalidDate(_) => "Data inválida",
            Self::AlreadySubmitting => "Aguarde",
            Self::SaveFailed(_) => "Erro ao salvar",
        }
    }

    /// Toast body.
    pub fn description(&self) -> String {
        match self {
            Self::InvalidFormat { .. } => {
                "Por favor, selecione uma imagem nos formatos: JPG, PNG, WEBP ou GIF.".to_string()
            }
            Self::FileTooLarge { max_bytes, .. } => format!(
                "A imagem deve ter no máximo {}MB.",
                max_bytes.div_ceil(BYTES_PER_MIB)
            ),
            Self::MissingImage => "Por favor, adicione uma imagem para sua memória.".to_string(),
            Self::MissingField(field) => format!("Preencha o campo {}.", field.label()),
            Self::FieldTooLong { field, max_chars } => format!(
                "O campo {} aceita no máximo {max_chars} caracteres.",
                field.label()
            ),
            Self::InvalidDate(_) => "Informe uma data válida.".to_string(),
            Self::AlreadySubmitting => "Sua memória ainda está sendo salva.".to_string(),
            Self::SaveFailed(_) => {
                "Ocorreu um erro ao salvar sua memória. Tente novamente.".to_string()
            }
        }
    }
}

impl Display for SubmissionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormat { mime_type } => write!(f, "unsupported image type `{mime_type}`"),
            Self::FileTooLarge {
                size_bytes,
                max_bytes,
            } => write!(f, "image has {size_bytes} bytes, limit is {max_bytes}"),
            Self::MissingImage => write!(f, "an image is required"),
            Self::MissingField(field) => write!(f, "field `{field:?}` is required"),
            Self::FieldTooLong { field, max_chars } => {
                write!(f, "field `{field:?}` exceeds {max_chars} characters")
            }
            Self::InvalidDate(value) => write!(f, "`{value}` is not a YYYY-MM-DD date"),
            Self::AlreadySubmitting => write!(f, "a submission is already in flight"),
            Self::SaveFailed(reason) => write!(f, "save failed: {reason}"),
        }
    }
}

impl Error for SubmissionError {}

/// File picked in the image input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Accepted image, ready to render as the form preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    data_url: String,
}

impl ImagePreview {
    /// `data:<mime>;base64,<payload>`.
    pub fn data_url(&self) -> &str {
        &self.data_url
    }
}

/// Applies the format gate, then the size gate.
pub fn validate_image(
    upload: &ImageUpload,
    config: &SiteConfig,
) -> Result<ImagePreview, SubmissionError> {
    if !config.accepts_image_type(&upload.mime_type) {
        return Err(SubmissionError::InvalidFormat {
            mime_type: upload.mime_type.clone(),
        });
    }
    if upload.size_bytes() > config.max_image_size_bytes {
        return Err(SubmissionError::FileTooLarge {
            size_bytes: upload.size_bytes(),
            max_bytes: config.max_image_size_bytes,
        });
    }

    let mime_type = upload.mime_type.trim().to_ascii_lowercase();
    Ok(ImagePreview {
        file_name: upload.file_name.clone(),
        data_url: format!("data:{mime_type};base64,{}", BASE64.encode(&upload.bytes)),
        mime_type,
        size_bytes: upload.size_bytes(),
    })
}

/// Normalized text fields of a valid submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFields {
    pub title: String,
    pub date: NaiveDate,
    pub location: String,
    pub description: String,
}

/// Checks required fields in form order and enforces character limits.
pub fn validate_fields(
    title: &str,
    date: &str,
    location: &str,
    description: &str,
) -> Result<ValidatedFields, SubmissionError> {
    let title = normalize_single_line(title);
    let location = normalize_single_line(location);
    let description = normalize_multi_line(description);
    let date = date.trim();

    for (field, value) in [
        (FormField::Title, title.as_str()),
        (FormField::Date, date),
        (FormField::Location, location.as_str()),
        (FormField::Description, description.as_str()),
    ] {
        if value.is_empty() {
            return Err(SubmissionError::MissingField(field));
        }
        if let Some(max_chars) = field.max_chars() {
            if value.chars().count() > max_chars {
                return Err(SubmissionError::FieldTooLong { field, max_chars });
            }
        }
    }

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| SubmissionError::InvalidDate(date.to_string()))?;

    Ok(ValidatedFields {
        title,
        date,
        location,
        description,
    })
}

fn normalize_single_line(value: &str) -> String {
    WHITESPACE_RE.replace_all(value.trim(), " ").into_owned()
}

fn normalize_multi_line(value: &str) -> String {
    value
        .trim()
        .lines()
        .map(|line| INLINE_SPACE_RE.replace_all(line.trim(), " ").into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}
