use std::panic::{catch_unwind, AssertUnwindSafe};

use thiserror::Error;

use super::fields::ContactCascades;
use super::lists::ListCascades;
use super::records::{EducationSegmenter, ExperienceSegmenter, ProjectSegmenter};
use super::skills::SkillCascade;
use crate::entity::ParsedEntity;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Cascade for {field} failed: {message}")]
    Cascade {
        field: &'static str,
        message: String,
    },
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Turns normalized document text into a [`ParsedEntity`].
///
/// Holds only compiled patterns, so one parser can serve any number of
/// documents and concurrent callers.
pub struct EntityParser {
    contact: ContactCascades,
    skills: SkillCascade,
    lists: ListCascades,
    experience: ExperienceSegmenter,
    education: EducationSegmenter,
    projects: ProjectSegmenter,
}

impl EntityParser {
    pub fn new() -> ParseResult<Self> {
        Ok(Self {
            contact: ContactCascades::new()?,
            skills: SkillCascade::new()?,
            lists: ListCascades::new()?,
            experience: ExperienceSegmenter::new()?,
            education: EducationSegmenter::new()?,
            projects: ProjectSegmenter::new()?,
        })
    }

    /// Runs every field cascade over `text`. A failing cascade aborts the
    /// whole parse; no partial entity is returned.
    pub fn parse(&self, text: &str) -> ParseResult<ParsedEntity> {
        let entity = ParsedEntity {
            name: guarded("name", || self.contact.name(text))?,
            email: guarded("email", || self.contact.email(text))?,
            phone: guarded("phone", || self.contact.phone(text))?,
            location: guarded("location", || self.contact.location(text))?,
            summary: guarded("summary", || self.contact.summary(text))?,
            skills: guarded("skills", || self.skills.extract(text))?,
            experience: guarded("experience", || self.experience.segment(text))?,
            education: guarded("education", || self.education.segment(text))?,
            languages: guarded("languages", || self.lists.languages(text))?,
            certifications: guarded("certifications", || self.lists.certifications(text))?,
            projects: guarded("projects", || self.projects.segment(text))?,
            links: guarded("links", || self.contact.links(text))?,
        };

        tracing::debug!(
            skills = entity.skills.len(),
            experience = entity.experience.len(),
            education = entity.education.len(),
            projects = entity.projects.len(),
            "Parsed entity"
        );
        Ok(entity)
    }
}

fn guarded<T>(field: &'static str, cascade: impl FnOnce() -> T) -> ParseResult<T> {
    catch_unwind(AssertUnwindSafe(cascade)).map_err(|panic| {
        let message = panic
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown failure".to_string());
        tracing::error!(field, %message, "Cascade failed");
        ParseError::Cascade { field, message }
    })
}
