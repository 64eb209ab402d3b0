use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::ParsedEntity;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    Pdf,
    Docx,
    Doc,
}

impl FileType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Doc => "doc",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "doc" => Some(Self::Doc),
            _ => None,
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Name of the library that turns this format into text.
    #[must_use]
    pub fn extraction_method(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf-extract",
            Self::Docx | Self::Doc => "docx-rs",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FileType {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| Error::InvalidFileType(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStatus {
    Pending,
    Completed,
    Failed,
}

impl ParseStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for ParseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ParseStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(Error::InvalidParseStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_method: Option<String>,
}

/// A stored parse attempt and its outcome.
///
/// `parse_status` leaves `Pending` exactly once: [`Resume::complete`] attaches
/// the parsed entity, [`Resume::fail`] attaches the error message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resume {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    pub file_name: String,
    pub file_type: FileType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_data: Option<ParsedEntity>,
    pub parse_status: ParseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
    pub metadata: ResumeMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resume {
    #[must_use]
    pub fn new(file_name: String, file_type: FileType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            owner_id: None,
            file_name,
            file_type,
            raw_text: None,
            parsed_data: None,
            parse_status: ParseStatus::Pending,
            parse_error: None,
            metadata: ResumeMetadata {
                extraction_method: Some(file_type.extraction_method().to_string()),
                ..ResumeMetadata::default()
            },
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn with_owner(mut self, owner_id: Option<String>) -> Self {
        self.owner_id = owner_id;
        self
    }

    #[must_use]
    pub fn with_file_size(mut self, size: u64) -> Self {
        self.metadata.file_size = Some(size);
        self
    }

    pub fn complete(
        &mut self,
        raw_text: String,
        parsed: ParsedEntity,
        parse_time_ms: u64,
    ) -> Result<()> {
        self.transition(ParseStatus::Completed)?;
        self.raw_text = Some(raw_text);
        self.parsed_data = Some(parsed);
        self.metadata.parse_time_ms = Some(parse_time_ms);
        Ok(())
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<()> {
        self.transition(ParseStatus::Failed)?;
        self.parse_error = Some(message.into());
        Ok(())
    }

    fn transition(&mut self, to: ParseStatus) -> Result<()> {
        if self.parse_status.is_terminal() {
            return Err(Error::InvalidTransition {
                from: self.parse_status,
                to,
            });
        }
        self.parse_status = to;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Copy without the raw text, as returned by default reads.
    #[must_use]
    pub fn without_raw_text(mut self) -> Self {
        self.raw_text = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_from_name() {
        assert_eq!(FileType::from_file_name("cv.PDF"), Some(FileType::Pdf));
        assert_eq!(FileType::from_file_name("cv.docx"), Some(FileType::Docx));
        assert_eq!(FileType::from_file_name("old.doc"), Some(FileType::Doc));
        assert_eq!(FileType::from_file_name("notes.txt"), None);
        assert_eq!(FileType::from_file_name("README"), None);
        assert!("odt".parse::<FileType>().is_err());
    }

    #[test]
    fn test_new_resume_is_pending() {
        let resume = Resume::new("cv.pdf".to_string(), FileType::Pdf).with_file_size(42);
        assert_eq!(resume.parse_status, ParseStatus::Pending);
        assert_eq!(resume.metadata.file_size, Some(42));
        assert_eq!(resume.metadata.extraction_method.as_deref(), Some("pdf-extract"));
    }

    #[test]
    fn test_complete_transitions_once() {
        let mut resume = Resume::new("cv.docx".to_string(), FileType::Docx);
        resume
            .complete("text".to_string(), ParsedEntity::default(), 12)
            .unwrap();

        assert_eq!(resume.parse_status, ParseStatus::Completed);
        assert!(resume.parsed_data.is_some());
        assert!(resume.parse_error.is_none());
        assert_eq!(resume.metadata.parse_time_ms, Some(12));

        let err = resume.fail("late failure").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                from: ParseStatus::Completed,
                to: ParseStatus::Failed
            }
        ));
        assert!(resume.parse_error.is_none());
    }

    #[test]
    fn test_failed_resume_has_no_parsed_data() {
        let mut resume = Resume::new("cv.pdf".to_string(), FileType::Pdf);
        resume.fail("corrupt document").unwrap();

        assert_eq!(resume.parse_status, ParseStatus::Failed);
        assert_eq!(resume.parse_error.as_deref(), Some("corrupt document"));
        assert!(resume.parsed_data.is_none());
        assert!(resume
            .complete(String::new(), ParsedEntity::default(), 1)
            .is_err());
        assert!(resume.parsed_data.is_none());
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [ParseStatus::Pending, ParseStatus::Completed, ParseStatus::Failed] {
            assert_eq!(status.as_str().parse::<ParseStatus>().unwrap(), status);
        }
        assert!("done".parse::<ParseStatus>().is_err());
    }
}
