use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use super::extractor::{CompositeExtractor, ExtractionError, Extractor};
use super::parser::{EntityParser, ParseError};
use crate::clock::{Clock, SystemClock};
use crate::config::MAX_PAGE_SIZE;
use crate::entity::ParsedEntity;
use crate::events::{EventPublisher, NoopPublisher, RESUME_DELETED, RESUME_PARSED};
use crate::resume::{FileType, ParseStatus, Resume};
use crate::storage::{ResumePage, ResumeQuery, ResumeStore};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Storage error: {0}")]
    Store(#[source] crate::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Resume not found: {0}")]
    NotFound(Uuid),
}

impl From<crate::Error> for IngestError {
    fn from(err: crate::Error) -> Self {
        match err {
            crate::Error::ResumeNotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

pub type IngestResult<T> = Result<T, IngestError>;

/// A file staged on disk for one parse request.
#[derive(Debug, Clone)]
pub struct Upload {
    pub path: PathBuf,
    /// Name the caller supplied; its extension decides the format.
    pub file_name: String,
    pub size: u64,
    pub owner_id: Option<String>,
}

impl Upload {
    #[must_use]
    pub fn new(path: PathBuf, file_name: impl Into<String>) -> Self {
        Self {
            path,
            file_name: file_name.into(),
            size: 0,
            owner_id: None,
        }
    }

    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub fn with_owner(mut self, owner_id: Option<String>) -> Self {
        self.owner_id = owner_id;
        self
    }
}

/// Removes a staged upload when dropped.
#[derive(Debug)]
pub struct UploadGuard {
    path: PathBuf,
}

impl UploadGuard {
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl Drop for UploadGuard {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove upload");
            }
        }
    }
}

/// Drives one document from bytes to a stored [`Resume`].
pub struct ResumePipeline {
    store: Box<dyn ResumeStore>,
    extractor: Box<dyn Extractor>,
    parser: EntityParser,
    publisher: Box<dyn EventPublisher>,
    clock: Box<dyn Clock>,
    publish_events: bool,
}

impl ResumePipeline {
    pub fn new(store: Box<dyn ResumeStore>) -> IngestResult<Self> {
        Ok(Self {
            store,
            extractor: Box::new(CompositeExtractor::default()),
            parser: EntityParser::new()?,
            publisher: Box::new(NoopPublisher),
            clock: Box::new(SystemClock),
            publish_events: false,
        })
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: Box<dyn Extractor>) -> Self {
        self.extractor = extractor;
        self
    }

    #[must_use]
    pub fn with_publisher(mut self, publisher: Box<dyn EventPublisher>) -> Self {
        self.publisher = publisher;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_publish_events(mut self, publish: bool) -> Self {
        self.publish_events = publish;
        self
    }

    /// Parses a staged file. The file is removed however the call ends.
    pub async fn parse_upload(&self, upload: Upload) -> IngestResult<Resume> {
        let _guard = UploadGuard::new(&upload.path);

        let file_type = file_type_of(&upload.file_name)?;
        let resume = Resume::new(upload.file_name.clone(), file_type)
            .with_owner(upload.owner_id.clone())
            .with_file_size(upload.size);

        let start = self.clock.now();
        let extracted = self
            .extractor
            .extract_file(&upload.path, file_type)
            .await
            .map_err(IngestError::from);

        self.settle(resume, start, extracted).await
    }

    /// Same lifecycle as [`ResumePipeline::parse_upload`] for in-memory input.
    pub async fn parse_bytes(
        &self,
        data: &[u8],
        file_name: &str,
        owner_id: Option<String>,
    ) -> IngestResult<Resume> {
        let file_type = file_type_of(file_name)?;
        let resume = Resume::new(file_name.to_string(), file_type)
            .with_owner(owner_id)
            .with_file_size(data.len() as u64);

        let start = self.clock.now();
        let extracted = self
            .extractor
            .extract_bytes(data, file_type)
            .await
            .map_err(IngestError::from);

        self.settle(resume, start, extracted).await
    }

    async fn settle(
        &self,
        mut resume: Resume,
        start: Instant,
        extracted: IngestResult<String>,
    ) -> IngestResult<Resume> {
        let outcome = extracted.and_then(|text| {
            let parsed = self.parser.parse(&text)?;
            Ok((text, parsed))
        });

        match outcome {
            Ok((text, parsed)) => {
                let parse_time_ms = self.clock.elapsed_ms(start);
                resume.complete(text, parsed, parse_time_ms)?;
                self.store.create(&resume).await?;

                tracing::info!(
                    resume_id = %resume.id,
                    file_name = %resume.file_name,
                    parse_time_ms,
                    "Resume parsed"
                );
                if let Some(parsed) = &resume.parsed_data {
                    self.announce_parsed(&resume, parsed).await;
                }
                Ok(resume)
            }
            Err(e) => {
                tracing::warn!(
                    resume_id = %resume.id,
                    file_name = %resume.file_name,
                    error = %e,
                    "Resume parse failed"
                );
                resume.fail(e.to_string())?;
                self.store.create(&resume).await?;
                Err(e)
            }
        }
    }

    pub async fn get(&self, id: Uuid, include_raw_text: bool) -> IngestResult<Resume> {
        Ok(self.store.find_by_id(id, include_raw_text).await?)
    }

    pub async fn list(
        &self,
        owner_id: Option<String>,
        status: Option<ParseStatus>,
        page: u32,
        limit: u32,
    ) -> IngestResult<ResumePage> {
        validate_page(page, limit)?;

        let mut query = ResumeQuery::new();
        if let Some(owner_id) = owner_id {
            query = query.with_owner(owner_id);
        }
        if let Some(status) = status {
            query = query.with_status(status);
        }

        self.page(query, page, limit).await
    }

    /// Completed resumes listing any of `skills`, compared exactly.
    pub async fn search_by_skills(
        &self,
        skills: Vec<String>,
        page: u32,
        limit: u32,
    ) -> IngestResult<ResumePage> {
        validate_page(page, limit)?;
        if skills.is_empty() {
            return Err(IngestError::Validation("no skills given".to_string()));
        }

        let query = ResumeQuery::new()
            .with_status(ParseStatus::Completed)
            .with_skills(skills);

        self.page(query, page, limit).await
    }

    pub async fn delete(&self, id: Uuid) -> IngestResult<()> {
        let resume = self.store.find_by_id(id, false).await?;
        self.store.delete(id).await?;

        tracing::info!(resume_id = %id, "Resume deleted");
        self.announce(
            RESUME_DELETED,
            json!({
                "resumeId": id,
                "userId": resume.owner_id,
                "timestamp": Utc::now(),
            }),
        )
        .await;
        Ok(())
    }

    async fn page(&self, query: ResumeQuery, page: u32, limit: u32) -> IngestResult<ResumePage> {
        let total = self.store.count(&query).await?;
        let resumes = self.store.find(&query.with_page(page, limit)).await?;
        Ok(ResumePage::new(resumes, total, page, limit))
    }

    async fn announce_parsed(&self, resume: &Resume, parsed: &ParsedEntity) {
        self.announce(
            RESUME_PARSED,
            json!({
                "resumeId": resume.id,
                "userId": resume.owner_id,
                "parsedData": parsed,
                "timestamp": Utc::now(),
            }),
        )
        .await;
    }

    async fn announce(&self, topic: &str, payload: serde_json::Value) {
        if !self.publish_events {
            return;
        }
        if let Err(e) = self.publisher.publish(topic, payload).await {
            tracing::warn!(topic, error = %e, "Failed to publish event");
        }
    }
}

fn file_type_of(file_name: &str) -> IngestResult<FileType> {
    FileType::from_file_name(file_name)
        .ok_or_else(|| IngestError::Validation(format!("Unsupported file type: {file_name}")))
}

fn validate_page(page: u32, limit: u32) -> IngestResult<()> {
    if page == 0 {
        return Err(IngestError::Validation("page starts at 1".to_string()));
    }
    if !(1..=MAX_PAGE_SIZE).contains(&limit) {
        return Err(IngestError::Validation(format!(
            "limit must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }
    Ok(())
}
