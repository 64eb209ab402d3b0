use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{sqlite::SqlitePoolOptions, Pool, QueryBuilder, Sqlite};
use uuid::Uuid;

use crate::{
    entity::ParsedEntity,
    resume::{ParseStatus, Resume, ResumeMetadata},
    Error, Result,
};

const INIT_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS resumes (
    id TEXT PRIMARY KEY,
    owner_id TEXT,
    file_name TEXT NOT NULL,
    file_type TEXT NOT NULL,
    raw_text TEXT,
    parsed_data TEXT,
    parse_status TEXT NOT NULL DEFAULT 'pending',
    parse_error TEXT,
    file_size INTEGER,
    parse_time_ms INTEGER,
    extraction_method TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_resumes_owner ON resumes(owner_id, created_at);
CREATE INDEX IF NOT EXISTS idx_resumes_status ON resumes(parse_status);
CREATE INDEX IF NOT EXISTS idx_resumes_email ON resumes(json_extract(parsed_data, '$.email'));
"#;

const COLUMNS: &str = "id, owner_id, file_name, file_type, {raw}, parsed_data, parse_status, \
    parse_error, file_size, parse_time_ms, extraction_method, created_at, updated_at";

type ResumeRow = (
    String,
    Option<String>,
    String,
    String,
    Option<String>,
    Option<String>,
    String,
    Option<String>,
    Option<i64>,
    Option<i64>,
    Option<String>,
    String,
    String,
);

/// Filters for listing and counting resumes. Empty filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumeQuery {
    pub owner_id: Option<String>,
    pub status: Option<ParseStatus>,
    /// Matches resumes whose skills contain any of these, compared exactly.
    pub skills: Vec<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl ResumeQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: ParseStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_skills(mut self, skills: Vec<String>) -> Self {
        self.skills = skills;
        self
    }

    /// Restrict to one 1-based page of `limit` rows.
    #[must_use]
    pub fn with_page(mut self, page: u32, limit: u32) -> Self {
        self.limit = Some(limit);
        self.offset = page.saturating_sub(1).saturating_mul(limit);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ResumePage {
    pub resumes: Vec<Resume>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl ResumePage {
    #[must_use]
    pub fn new(resumes: Vec<Resume>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit))
        };
        Self {
            resumes,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

/// Persistence operations the pipeline depends on.
#[async_trait::async_trait]
pub trait ResumeStore: Send + Sync {
    async fn create(&self, resume: &Resume) -> Result<()>;

    /// Raw text is only loaded when `include_raw_text` is set.
    async fn find_by_id(&self, id: Uuid, include_raw_text: bool) -> Result<Resume>;

    async fn find(&self, query: &ResumeQuery) -> Result<Vec<Resume>>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    async fn count(&self, query: &ResumeQuery) -> Result<u64>;
}

pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn open(path: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&format!("sqlite:{path}?mode=rwc"))
            .await?;

        sqlx::query(INIT_SQL).execute(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn open_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        sqlx::query(INIT_SQL).execute(&pool).await?;

        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl ResumeStore for Storage {
    async fn create(&self, resume: &Resume) -> Result<()> {
        let parsed_json = resume
            .parsed_data
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r#"
            INSERT INTO resumes (id, owner_id, file_name, file_type, raw_text, parsed_data,
                parse_status, parse_error, file_size, parse_time_ms, extraction_method,
                created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(resume.id.to_string())
        .bind(&resume.owner_id)
        .bind(&resume.file_name)
        .bind(resume.file_type.as_str())
        .bind(&resume.raw_text)
        .bind(parsed_json)
        .bind(resume.parse_status.as_str())
        .bind(&resume.parse_error)
        .bind(resume.metadata.file_size.map(to_db_int))
        .bind(resume.metadata.parse_time_ms.map(to_db_int))
        .bind(&resume.metadata.extraction_method)
        .bind(format_timestamp(resume.created_at))
        .bind(format_timestamp(resume.updated_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid, include_raw_text: bool) -> Result<Resume> {
        let sql = format!("SELECT {} FROM resumes WHERE id = ?", columns(include_raw_text));

        let row: ResumeRow = sqlx::query_as(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(Error::ResumeNotFound(id))?;

        parse_resume_row(row)
    }

    async fn find(&self, query: &ResumeQuery) -> Result<Vec<Resume>> {
        let mut builder =
            QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM resumes", columns(false)));
        push_filters(&mut builder, query);
        builder.push(" ORDER BY created_at DESC, id DESC");

        if let Some(limit) = query.limit {
            builder
                .push(" LIMIT ")
                .push_bind(i64::from(limit))
                .push(" OFFSET ")
                .push_bind(i64::from(query.offset));
        }

        let rows: Vec<ResumeRow> = builder.build_query_as().fetch_all(&self.pool).await?;

        rows.into_iter().map(parse_resume_row).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::ResumeNotFound(id));
        }

        Ok(())
    }

    async fn count(&self, query: &ResumeQuery) -> Result<u64> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM resumes");
        push_filters(&mut builder, query);

        let (count,): (i64,) = builder.build_query_as().fetch_one(&self.pool).await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}

fn columns(include_raw_text: bool) -> String {
    let raw = if include_raw_text {
        "raw_text"
    } else {
        "NULL AS raw_text"
    };
    COLUMNS.replace("{raw}", raw)
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, query: &ResumeQuery) {
    builder.push(" WHERE 1 = 1");

    if let Some(owner_id) = &query.owner_id {
        builder.push(" AND owner_id = ").push_bind(owner_id.clone());
    }

    if let Some(status) = query.status {
        builder.push(" AND parse_status = ").push_bind(status.as_str());
    }

    if !query.skills.is_empty() {
        builder.push(
            " AND EXISTS (SELECT 1 FROM json_each(resumes.parsed_data, '$.skills') \
             WHERE json_each.value IN (",
        );
        let mut values = builder.separated(", ");
        for skill in &query.skills {
            values.push_bind(skill.clone());
        }
        builder.push("))");
    }
}

fn to_db_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::CorruptRow(format!("bad timestamp {value}: {e}")))
}

fn parse_resume_row(row: ResumeRow) -> Result<Resume> {
    let (
        id,
        owner_id,
        file_name,
        file_type,
        raw_text,
        parsed_json,
        parse_status,
        parse_error,
        file_size,
        parse_time_ms,
        extraction_method,
        created_at,
        updated_at,
    ) = row;

    let parsed_data: Option<ParsedEntity> = parsed_json
        .as_deref()
        .map(serde_json::from_str)
        .transpose()?;

    Ok(Resume {
        id: id
            .parse()
            .map_err(|_| Error::CorruptRow(format!("bad resume id {id}")))?,
        owner_id,
        file_name,
        file_type: file_type.parse()?,
        raw_text,
        parsed_data,
        parse_status: parse_status.parse()?,
        parse_error,
        metadata: ResumeMetadata {
            file_size: file_size.and_then(|v| u64::try_from(v).ok()),
            parse_time_ms: parse_time_ms.and_then(|v| u64::try_from(v).ok()),
            extraction_method,
        },
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::FileType;

    fn completed(file_name: &str, owner: Option<&str>, skills: &[&str]) -> Resume {
        let mut resume = Resume::new(file_name.to_string(), FileType::Pdf)
            .with_owner(owner.map(String::from))
            .with_file_size(1024);
        let parsed = ParsedEntity {
            email: Some("jane@example.com".to_string()),
            skills: skills.iter().map(|s| (*s).to_string()).collect(),
            ..ParsedEntity::default()
        };
        resume
            .complete("raw resume text".to_string(), parsed, 7)
            .unwrap();
        resume
    }

    #[tokio::test]
    async fn test_resume_crud() {
        let storage = Storage::open_memory().await.unwrap();
        let resume = completed("cv.pdf", Some("user-1"), &["Rust", "Go"]);

        storage.create(&resume).await.unwrap();

        let loaded = storage.find_by_id(resume.id, false).await.unwrap();
        assert_eq!(loaded.file_name, "cv.pdf");
        assert_eq!(loaded.parse_status, ParseStatus::Completed);
        assert_eq!(loaded.parsed_data, resume.parsed_data);
        assert_eq!(loaded.metadata, resume.metadata);
        assert!(loaded.raw_text.is_none());

        let with_raw = storage.find_by_id(resume.id, true).await.unwrap();
        assert_eq!(with_raw.raw_text.as_deref(), Some("raw resume text"));

        storage.delete(resume.id).await.unwrap();
        assert!(matches!(
            storage.find_by_id(resume.id, false).await,
            Err(Error::ResumeNotFound(_))
        ));
        assert!(matches!(
            storage.delete(resume.id).await,
            Err(Error::ResumeNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_resume_roundtrip() {
        let storage = Storage::open_memory().await.unwrap();
        let mut resume = Resume::new("broken.pdf".to_string(), FileType::Pdf);
        resume.fail("Failed to extract text from PDF").unwrap();

        storage.create(&resume).await.unwrap();

        let loaded = storage.find_by_id(resume.id, true).await.unwrap();
        assert_eq!(loaded.parse_status, ParseStatus::Failed);
        assert!(loaded.parsed_data.is_none());
        assert!(loaded.raw_text.is_none());
        assert_eq!(
            loaded.parse_error.as_deref(),
            Some("Failed to extract text from PDF")
        );
    }

    #[tokio::test]
    async fn test_query_filters_and_count() {
        let storage = Storage::open_memory().await.unwrap();

        storage
            .create(&completed("a.pdf", Some("alice"), &["Rust", "Docker"]))
            .await
            .unwrap();
        storage
            .create(&completed("b.pdf", Some("alice"), &["Python"]))
            .await
            .unwrap();
        storage
            .create(&completed("c.pdf", Some("bob"), &["rust"]))
            .await
            .unwrap();

        let mut failed = Resume::new("d.pdf".to_string(), FileType::Pdf)
            .with_owner(Some("alice".to_string()));
        failed.fail("boom").unwrap();
        storage.create(&failed).await.unwrap();

        let alice = ResumeQuery::new().with_owner("alice");
        assert_eq!(storage.count(&alice).await.unwrap(), 3);

        let alice_done = alice.clone().with_status(ParseStatus::Completed);
        assert_eq!(storage.find(&alice_done).await.unwrap().len(), 2);

        let rust = ResumeQuery::new()
            .with_status(ParseStatus::Completed)
            .with_skills(vec!["Rust".to_string(), "Haskell".to_string()]);
        let found = storage.find(&rust).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].file_name, "a.pdf");
        assert!(found[0].raw_text.is_none());

        assert_eq!(storage.count(&ResumeQuery::new()).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_pagination_newest_first() {
        let storage = Storage::open_memory().await.unwrap();

        for name in ["first.pdf", "second.pdf", "third.pdf"] {
            storage
                .create(&completed(name, Some("alice"), &[]))
                .await
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let page_one = storage
            .find(&ResumeQuery::new().with_owner("alice").with_page(1, 2))
            .await
            .unwrap();
        let names: Vec<_> = page_one.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(names, vec!["third.pdf", "second.pdf"]);

        let page_two = storage
            .find(&ResumeQuery::new().with_owner("alice").with_page(2, 2))
            .await
            .unwrap();
        assert_eq!(page_two.len(), 1);
        assert_eq!(page_two[0].file_name, "first.pdf");
    }

    #[test]
    fn test_page_math() {
        let page = ResumePage::new(Vec::new(), 21, 1, 10);
        assert_eq!(page.total_pages, 3);

        let empty = ResumePage::new(Vec::new(), 0, 1, 10);
        assert_eq!(empty.total_pages, 0);
    }
}
