use std::path::Path;

use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, TableCellContent, TableChild,
    TableRowChild,
};
use thiserror::Error;

use super::normalizer::normalize_text;
use crate::resume::FileType;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to extract text from PDF: {0}")]
    Pdf(String),
    #[error("Failed to extract text from DOCX: {0}")]
    Docx(String),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(FileType),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Turns document bytes of a known format into raw text.
#[async_trait::async_trait]
pub trait Extractor: Send + Sync {
    fn supported_types(&self) -> &[FileType];

    fn can_extract(&self, file_type: FileType) -> bool {
        self.supported_types().contains(&file_type)
    }

    async fn extract_bytes(&self, data: &[u8], file_type: FileType) -> ExtractionResult<String>;

    async fn extract_file(&self, path: &Path, file_type: FileType) -> ExtractionResult<String> {
        let data = tokio::fs::read(path).await?;
        self.extract_bytes(&data, file_type).await
    }
}

pub struct PdfExtractor;

#[async_trait::async_trait]
impl Extractor for PdfExtractor {
    fn supported_types(&self) -> &[FileType] {
        &[FileType::Pdf]
    }

    async fn extract_bytes(&self, data: &[u8], _file_type: FileType) -> ExtractionResult<String> {
        let owned = data.to_vec();

        // pdf-extract panics on some malformed streams; the blocking task contains it.
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&owned))
            .await
            .map_err(|e| ExtractionError::Pdf(format!("extractor aborted: {e}")))?
            .map_err(|e| ExtractionError::Pdf(e.to_string()))
    }
}

/// Reads WordprocessingML. Legacy `.doc` uploads are routed here too and
/// fail unless they are actually zip-packaged documents.
pub struct DocxExtractor;

#[async_trait::async_trait]
impl Extractor for DocxExtractor {
    fn supported_types(&self) -> &[FileType] {
        &[FileType::Docx, FileType::Doc]
    }

    async fn extract_bytes(&self, data: &[u8], _file_type: FileType) -> ExtractionResult<String> {
        let docx = docx_rs::read_docx(data).map_err(|e| ExtractionError::Docx(e.to_string()))?;

        let mut text = String::new();
        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(p) => push_paragraph(&mut text, p),
                DocumentChild::Table(table) => {
                    for row in &table.rows {
                        let TableChild::TableRow(row) = row;
                        for cell in &row.cells {
                            let TableRowChild::TableCell(cell) = cell;
                            for content in &cell.children {
                                if let TableCellContent::Paragraph(p) = content {
                                    push_paragraph(&mut text, p);
                                }
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(text)
    }
}

fn push_paragraph(text: &mut String, paragraph: &Paragraph) {
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
    }
    text.push('\n');
}

/// Dispatches on file type and normalizes the result.
pub struct CompositeExtractor {
    extractors: Vec<Box<dyn Extractor>>,
}

impl CompositeExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: Box<dyn Extractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    fn find_extractor(&self, file_type: FileType) -> Option<&dyn Extractor> {
        self.extractors
            .iter()
            .find(|e| e.can_extract(file_type))
            .map(AsRef::as_ref)
    }
}

impl Default for CompositeExtractor {
    fn default() -> Self {
        Self::new()
            .with_extractor(Box::new(PdfExtractor))
            .with_extractor(Box::new(DocxExtractor))
    }
}

#[async_trait::async_trait]
impl Extractor for CompositeExtractor {
    fn supported_types(&self) -> &[FileType] {
        &[FileType::Pdf, FileType::Docx, FileType::Doc]
    }

    fn can_extract(&self, file_type: FileType) -> bool {
        self.find_extractor(file_type).is_some()
    }

    async fn extract_bytes(&self, data: &[u8], file_type: FileType) -> ExtractionResult<String> {
        let extractor = self
            .find_extractor(file_type)
            .ok_or(ExtractionError::UnsupportedFormat(file_type))?;

        let raw = extractor.extract_bytes(data, file_type).await.map_err(|e| {
            tracing::error!(%file_type, error = %e, "text extraction failed");
            e
        })?;

        let text = normalize_text(&raw);
        tracing::info!(%file_type, chars = text.chars().count(), "extracted text");

        Ok(text)
    }
}
