use super::cascade::{Cascade, PatternMatcher};
use super::normalizer::collapse_whitespace;
use super::section::SectionMatcher;
use crate::entity::Links;

const NAME: &str = r"[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+){1,3}";
const HANDLE: &str = r"[A-Za-z0-9_-]+";

const SECTION_WORDS: &[&str] = &[
    "professional",
    "technical",
    "education",
    "experience",
    "skills",
    "summary",
    "objective",
    "profile",
    "curriculum",
    "resume",
];

/// Summary blocks shorter than this keep reading past nearby headers.
pub const SUMMARY_MIN_CHARS: usize = 50;
pub const SUMMARY_MAX_CHARS: usize = 800;

/// Cascades for the single-valued contact and profile fields.
pub struct ContactCascades {
    name: Cascade,
    email: Cascade,
    phone: Cascade,
    location: Cascade,
    summary: Cascade,
    linkedin: Cascade,
    github: Cascade,
    portfolio: Cascade,
}

impl ContactCascades {
    pub fn new() -> Result<Self, regex::Error> {
        let name = Cascade::new("name")
            .with(PatternMatcher::new(
                "document-lead",
                &format!(r"^(?s:.){{0,50}}?({NAME})"),
            )?)
            .with(PatternMatcher::new(
                "before-contact",
                &format!(r"({NAME})(?s:.){{0,50}}?(?:[\d+()-]+|@)"),
            )?)
            .with(PatternMatcher::new("line-start", &format!(r"(?m)^({NAME})"))?)
            .with(PatternMatcher::new(
                "label",
                &format!(r"(?i:\bname)[:\s]+({NAME})"),
            )?)
            .accepting(is_person_name);

        let email = Cascade::new("email").with(PatternMatcher::new(
            "address",
            r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}",
        )?)
        .accepting(is_email);

        let phone = Cascade::new("phone")
            .with(PatternMatcher::new("loose", r"[+(\d][\d\-. ()]{9,15}\d")?)
            .with(PatternMatcher::new(
                "north-american",
                r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}",
            )?)
            .with(PatternMatcher::new(
                "international",
                r"\+\d{1,3}[-.\s]?\d{10}",
            )?);

        let location = Cascade::new("location")
            .with(PatternMatcher::new(
                "label",
                r"(?i:\b(?:location|address|city))[: \t]+([A-Za-z ,]+)",
            )?)
            .with(PatternMatcher::new(
                "before-contact",
                r"([A-Z][a-z]+(?:,[ \t]*[A-Z][a-z]+)+)\s*(?:[+(\d]|[A-Za-z0-9._%+-]+@)",
            )?)
            .with(PatternMatcher::new(
                "city-region",
                r"\b([A-Z][a-z]+,[ \t]*[A-Z][a-z]+)\b",
            )?)
            .accepting(is_place);

        let summary_ends = "education|experience|skills|technical";
        let summary = Cascade::new("summary")
            .with(
                SectionMatcher::new("summary", r"(?:professional[ \t]+)?summary", summary_ends)?
                    .bounded(SUMMARY_MIN_CHARS, SUMMARY_MAX_CHARS),
            )
            .with(
                SectionMatcher::new("objective", r"(?:career[ \t]+)?objective", summary_ends)?
                    .bounded(SUMMARY_MIN_CHARS, SUMMARY_MAX_CHARS),
            )
            .with(
                SectionMatcher::new("profile", "profile", summary_ends)?
                    .bounded(SUMMARY_MIN_CHARS, SUMMARY_MAX_CHARS),
            )
            .with(
                SectionMatcher::new("about", r"about[ \t]+me", summary_ends)?
                    .bounded(SUMMARY_MIN_CHARS, SUMMARY_MAX_CHARS),
            );

        Ok(Self {
            name,
            email,
            phone,
            location,
            summary,
            linkedin: profile_cascade("linkedin", r"linkedin\.com/in/")?,
            github: profile_cascade("github", r"github\.com/")?,
            portfolio: Cascade::new("portfolio")
                .with(PatternMatcher::new(
                    "portfolio",
                    r"(?i:\bportfolio)[:\s]+(https?://\S+)",
                )?)
                .with(PatternMatcher::new(
                    "website",
                    r"(?i:\bwebsite)[:\s]+(https?://\S+)",
                )?)
                .with(PatternMatcher::new(
                    "personal-site",
                    r"(?i:\bpersonal\s+site)[:\s]+(https?://\S+)",
                )?),
        })
    }

    pub fn name(&self, text: &str) -> Option<String> {
        self.name.value(text).map(String::from)
    }

    pub fn email(&self, text: &str) -> Option<String> {
        self.email.value(text).map(str::to_lowercase)
    }

    pub fn phone(&self, text: &str) -> Option<String> {
        self.phone.value(text).map(String::from)
    }

    pub fn location(&self, text: &str) -> Option<String> {
        self.location
            .value(text)
            .map(|v| v.trim_end_matches([',', ' ']).to_string())
    }

    pub fn summary(&self, text: &str) -> Option<String> {
        self.summary.value(text).map(collapse_whitespace)
    }

    pub fn links(&self, text: &str) -> Links {
        Links {
            linkedin: self
                .linkedin
                .value(text)
                .map(|handle| format!("https://linkedin.com/in/{handle}")),
            github: self
                .github
                .value(text)
                .map(|handle| format!("https://github.com/{handle}")),
            portfolio: self.portfolio.value(text).map(String::from),
        }
    }
}

/// URL form, bare "Label: handle" form, then labelled URL form.
fn profile_cascade(site: &'static str, url_prefix: &str) -> Result<Cascade, regex::Error> {
    Ok(Cascade::new(site)
        .with(PatternMatcher::new(
            "url",
            &format!(r"(?i){url_prefix}({HANDLE})"),
        )?)
        .with(PatternMatcher::new(
            "label",
            &format!(r"(?i)\b{site}[ \t]*:?[ \t]*({HANDLE})"),
        )?)
        .with(PatternMatcher::new(
            "labelled-url",
            &format!(r"(?i)\b{site}[:\s]+(?:https?://)?(?:www\.)?{url_prefix}({HANDLE})"),
        )?))
}

/// Rejects captures that are really a section heading.
pub fn is_person_name(candidate: &str) -> bool {
    let lower = candidate.to_lowercase();
    !SECTION_WORDS.iter().any(|word| lower.starts_with(word))
}

pub fn is_place(candidate: &str) -> bool {
    candidate.trim_end_matches([',', ' ']).contains(',')
}

pub fn is_email(candidate: &str) -> bool {
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !local.is_empty()
        && !host.is_empty()
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
}
