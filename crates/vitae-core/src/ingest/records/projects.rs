use regex::Regex;

use super::{date_range_pattern, lines, trim_separators, RECORD_TERMINATORS};
use crate::entity::Project;
use crate::ingest::cascade::Cascade;
use crate::ingest::normalizer::{is_bullet, strip_bullet};
use crate::ingest::section::SectionMatcher;

const MAX_NAME_LINE: usize = 60;
const MIN_DESCRIPTION_LINE: usize = 20;

pub struct ProjectSegmenter {
    section: Cascade,
    date: Regex,
}

impl ProjectSegmenter {
    pub fn new() -> Result<Self, regex::Error> {
        let section = Cascade::new("projects").with(SectionMatcher::new(
            "projects",
            r"(?:key[ \t]+|personal[ \t]+|academic[ \t]+|selected[ \t]+)?projects",
            RECORD_TERMINATORS,
        )?);
        let date = Regex::new(&format!(r"{}|\b(?:19|20)\d{{2}}\b", date_range_pattern()))?;

        Ok(Self { section, date })
    }

    pub fn segment(&self, text: &str) -> Vec<Project> {
        let Some(block) = self.section.value(text) else {
            return Vec::new();
        };

        self.split(&lines(block))
            .iter()
            .filter_map(|record| self.scan(record))
            .collect()
    }

    fn split<'a>(&self, lines: &[&'a str]) -> Vec<Vec<&'a str>> {
        let mut records: Vec<Vec<&'a str>> = Vec::new();
        let mut current: Vec<&'a str> = Vec::new();

        for &line in lines {
            let opens = !is_bullet(line)
                && !current.is_empty()
                && (self.date.is_match(line) || (current.len() > 1 && looks_like_title(line)));
            if opens {
                records.push(std::mem::take(&mut current));
            }
            current.push(line);
        }

        if !current.is_empty() {
            records.push(current);
        }
        records
    }

    fn scan(&self, record: &[&str]) -> Option<Project> {
        let (&first, body) = record.split_first()?;

        let (name, duration) = match self.date.find(first) {
            Some(m) => {
                let before = trim_separators(&first[..m.start()]);
                let name = if before.is_empty() {
                    trim_separators(&first[m.end()..])
                } else {
                    before
                };
                (name, Some(m.as_str().trim().to_string()))
            }
            None => (trim_separators(strip_bullet(first)), None),
        };

        if name.is_empty() {
            return None;
        }

        let description = body
            .iter()
            .filter(|line| is_bullet(line) || line.chars().count() > MIN_DESCRIPTION_LINE)
            .map(|line| strip_bullet(line))
            .collect::<Vec<_>>()
            .join(" ");

        Some(Project {
            name: name.to_string(),
            duration,
            description,
        })
    }
}

/// Short capitalised line without a closing full stop.
fn looks_like_title(line: &str) -> bool {
    let starts_title = line
        .chars()
        .next()
        .is_some_and(|c| c.is_uppercase() || c.is_ascii_digit());
    starts_title && line.chars().count() <= MAX_NAME_LINE && !line.ends_with('.')
}
