mod cascade;
mod extractor;
mod fields;
mod lists;
mod normalizer;
mod parser;
mod pipeline;
mod records;
mod section;
mod skills;

pub use cascade::{Capture, Cascade, Matcher, PatternMatcher};
pub use extractor::{
    CompositeExtractor, DocxExtractor, ExtractionError, ExtractionResult, Extractor, PdfExtractor,
};
pub use fields::{is_email, is_person_name, is_place, ContactCascades};
pub use lists::ListCascades;
pub use normalizer::{collapse_whitespace, is_bullet, normalize_text, strip_bullet};
pub use parser::{EntityParser, ParseError, ParseResult};
pub use pipeline::{IngestError, IngestResult, ResumePipeline, Upload, UploadGuard};
pub use records::{EducationSegmenter, ExperienceSegmenter, ProjectSegmenter, ScanState};
pub use section::SectionMatcher;
pub use skills::{dedup_exact, SkillCascade, TECH_DICTIONARY};
