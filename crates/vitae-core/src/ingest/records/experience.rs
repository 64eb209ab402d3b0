use regex::Regex;

use super::{date_range_pattern, lines, trim_separators, PLACE, RECORD_TERMINATORS};
use crate::entity::{Experience, NOT_SPECIFIED};
use crate::ingest::cascade::Cascade;
use crate::ingest::normalizer::{is_bullet, strip_bullet};
use crate::ingest::section::SectionMatcher;

/// Only this many leading lines of a record are searched for header fields.
const HEADER_WINDOW: usize = 4;
const MAX_LOCATION_LINE: usize = 40;

/// Scanner position while reading one experience record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    SeekDate,
    SeekCompany,
    SeekTitle,
    SeekLocation,
    CollectDescription,
}

pub struct ExperienceSegmenter {
    section: Cascade,
    date: Regex,
    place: Regex,
}

impl ExperienceSegmenter {
    pub fn new() -> Result<Self, regex::Error> {
        let section = Cascade::new("experience")
            .with(SectionMatcher::new(
                "experience",
                r"(?:professional[ \t]+|relevant[ \t]+)?experience",
                RECORD_TERMINATORS,
            )?)
            .with(SectionMatcher::new(
                "work",
                r"work[ \t]+(?:experience|history)",
                RECORD_TERMINATORS,
            )?)
            .with(SectionMatcher::new(
                "employment",
                r"employment[ \t]+history",
                RECORD_TERMINATORS,
            )?);

        Ok(Self {
            section,
            date: Regex::new(&date_range_pattern())?,
            place: Regex::new(PLACE)?,
        })
    }

    pub fn segment(&self, text: &str) -> Vec<Experience> {
        let Some(block) = self.section.value(text) else {
            return Vec::new();
        };

        self.split(&lines(block))
            .iter()
            .filter_map(|record| self.scan(record))
            .collect()
    }

    /// Each non-bullet line carrying a date range opens a record. When the
    /// previous record ended with bullets, a trailing plain line is taken
    /// as the next record's title and moves along with the date line.
    fn split<'a>(&self, lines: &[&'a str]) -> Vec<Vec<&'a str>> {
        let mut records = Vec::new();
        let mut current: Vec<&'a str> = Vec::new();
        let mut dated = false;

        for &line in lines {
            if is_bullet(line) || !self.date.is_match(line) {
                current.push(line);
                continue;
            }

            let has_bullets = current.iter().any(|l| is_bullet(l));
            if dated || has_bullets {
                let carry = dated && has_bullets && current.last().is_some_and(|l| !is_bullet(l));
                let carried = if carry { current.pop() } else { None };
                records.push(std::mem::take(&mut current));
                current.extend(carried);
            }
            current.push(line);
            dated = true;
        }

        if !current.is_empty() {
            records.push(current);
        }
        records
    }

    fn scan(&self, record: &[&str]) -> Option<Experience> {
        let mut scan = RecordScan::default();
        for (index, &line) in record.iter().enumerate() {
            scan.step(self, index, line);
        }
        scan.finish(self, record)
    }

    fn location_line(&self, line: &str) -> Option<String> {
        if is_bullet(line) || line.chars().count() > MAX_LOCATION_LINE {
            return None;
        }
        self.place.find(line).map(|m| m.as_str().to_string())
    }
}

#[derive(Debug)]
struct RecordScan<'a> {
    state: ScanState,
    preamble: Vec<&'a str>,
    company: Option<String>,
    title: Option<String>,
    duration: Option<String>,
    location: Option<String>,
    body: Vec<&'a str>,
}

impl Default for RecordScan<'_> {
    fn default() -> Self {
        Self {
            state: ScanState::SeekDate,
            preamble: Vec::new(),
            company: None,
            title: None,
            duration: None,
            location: None,
            body: Vec::new(),
        }
    }
}

impl<'a> RecordScan<'a> {
    fn step(&mut self, seg: &ExperienceSegmenter, index: usize, line: &'a str) {
        if index >= HEADER_WINDOW {
            self.close_header();
        }

        match self.state {
            ScanState::SeekDate => {
                if is_bullet(line) {
                    self.collect(line);
                } else if let Some(m) = seg.date.find(line) {
                    self.duration = Some(m.as_str().trim().to_string());
                    let lead = trim_separators(&line[..m.start()]);
                    if !lead.is_empty() {
                        self.company = Some(lead.to_string());
                        self.state = ScanState::SeekTitle;
                    } else if let Some(previous) = self.preamble.pop() {
                        self.company = Some(previous.to_string());
                        self.state = ScanState::SeekTitle;
                    } else {
                        self.state = ScanState::SeekCompany;
                    }
                } else {
                    self.preamble.push(line);
                }
            }
            ScanState::SeekCompany => {
                if is_bullet(line) {
                    self.collect(line);
                } else {
                    self.company = Some(line.to_string());
                    self.state = ScanState::SeekTitle;
                }
            }
            ScanState::SeekTitle => {
                if is_bullet(line) {
                    self.collect(line);
                } else {
                    self.title = Some(line.to_string());
                    self.state = ScanState::SeekLocation;
                }
            }
            ScanState::SeekLocation => {
                self.state = ScanState::CollectDescription;
                match seg.location_line(line) {
                    Some(place) => self.location = Some(place),
                    None => self.body.push(line),
                }
            }
            ScanState::CollectDescription => self.body.push(line),
        }
    }

    fn collect(&mut self, line: &'a str) {
        self.close_header();
        self.body.push(line);
    }

    /// Settle header fields from whatever was seen before the description.
    fn close_header(&mut self) {
        if self.state == ScanState::CollectDescription {
            return;
        }

        if self.duration.is_none() {
            let mut preamble = std::mem::take(&mut self.preamble).into_iter();
            self.company = preamble.next().map(String::from);
            self.title = preamble.next().map(String::from);
            self.preamble = preamble.collect();
        } else if self.title.is_none() {
            self.title = self.preamble.pop().map(String::from);
        }

        let mut leftover = std::mem::take(&mut self.preamble);
        leftover.append(&mut self.body);
        self.body = leftover;
        self.state = ScanState::CollectDescription;
    }

    fn finish(mut self, seg: &ExperienceSegmenter, record: &[&str]) -> Option<Experience> {
        self.close_header();

        if self.company.is_none() && self.title.is_none() {
            return None;
        }

        if self.location.is_none() {
            self.location = record
                .iter()
                .filter(|line| Some(**line) != self.title.as_deref())
                .find_map(|line| seg.location_line(line));
        }

        let description = match self.body.iter().position(|line| is_bullet(line)) {
            Some(first) => self.body[first..]
                .iter()
                .map(|line| strip_bullet(line))
                .collect::<Vec<_>>()
                .join(" "),
            None => self.body.join(" "),
        };

        Some(Experience {
            title: self.title.unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            company: self.company.unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            duration: self.duration,
            location: self.location,
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str) -> Vec<Experience> {
        ExperienceSegmenter::new().unwrap().segment(text)
    }

    #[test]
    fn test_company_date_then_title() {
        let text = "Experience\n\
                    Acme Corp | Jan 2020 - Present\n\
                    Senior Engineer\n\
                    San Francisco, CA\n\
                    • Built the billing platform\n\
                    • Led a team of five\n\
                    Globex 2017 - 2019\n\
                    Developer\n\
                    Wrote internal tools for the sales team\n\
                    Education\n\
                    State University";
        let jobs = segment(text);

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].company, "Acme Corp");
        assert_eq!(jobs[0].title, "Senior Engineer");
        assert_eq!(jobs[0].duration.as_deref(), Some("Jan 2020 - Present"));
        assert_eq!(jobs[0].location.as_deref(), Some("San Francisco, CA"));
        assert_eq!(
            jobs[0].description,
            "Built the billing platform Led a team of five"
        );

        assert_eq!(jobs[1].company, "Globex");
        assert_eq!(jobs[1].title, "Developer");
        assert_eq!(jobs[1].duration.as_deref(), Some("2017 - 2019"));
        assert_eq!(jobs[1].location, None);
        assert_eq!(jobs[1].description, "Wrote internal tools for the sales team");
    }

    #[test]
    fn test_title_before_company_line() {
        let text = "Work Experience:\n\
                    Staff Engineer\n\
                    Initech, 2019 - 2022\n\
                    - Migrated the monolith\n\
                    Engineer\n\
                    Hooli 2016 - 2019\n\
                    - Scaled search";
        let jobs = segment(text);

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].title, "Staff Engineer");
        assert_eq!(jobs[0].company, "Initech");
        assert_eq!(jobs[0].description, "Migrated the monolith");
        assert_eq!(jobs[1].title, "Engineer");
        assert_eq!(jobs[1].company, "Hooli");
        assert_eq!(jobs[1].duration.as_deref(), Some("2016 - 2019"));
    }

    #[test]
    fn test_date_on_its_own_line() {
        let text = "Employment History\n\
                    Umbrella Labs\n\
                    Mar 2015 - Feb 2018\n\
                    Research Scientist\n\
                    * Designed assays";
        let jobs = segment(text);

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].company, "Umbrella Labs");
        assert_eq!(jobs[0].title, "Research Scientist");
        assert_eq!(jobs[0].duration.as_deref(), Some("Mar 2015 - Feb 2018"));
        assert_eq!(jobs[0].description, "Designed assays");
    }

    #[test]
    fn test_undated_record_falls_back_to_first_lines() {
        let text = "Experience:\nFreelance Consultant\nIndependent\nAdvised startups on architecture";
        let jobs = segment(text);

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].company, "Freelance Consultant");
        assert_eq!(jobs[0].title, "Independent");
        assert_eq!(jobs[0].duration, None);
        assert_eq!(jobs[0].description, "Advised startups on architecture");
    }

    #[test]
    fn test_missing_title_uses_placeholder() {
        let jobs = segment("Experience\nAcme 2020 - 2021\n• Shipped features");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].company, "Acme");
        assert_eq!(jobs[0].title, NOT_SPECIFIED);
    }

    #[test]
    fn test_no_section() {
        assert!(segment("Acme 2020 - 2021\nEngineer").is_empty());
    }

    #[test]
    fn test_scan_states_progress() {
        let seg = ExperienceSegmenter::new().unwrap();
        let mut scan = RecordScan::default();
        assert_eq!(scan.state, ScanState::SeekDate);

        scan.step(&seg, 0, "Jan 2020 - Present");
        assert_eq!(scan.state, ScanState::SeekCompany);
        scan.step(&seg, 1, "Acme");
        assert_eq!(scan.state, ScanState::SeekTitle);
        scan.step(&seg, 2, "Engineer");
        assert_eq!(scan.state, ScanState::SeekLocation);
        scan.step(&seg, 3, "Austin, TX");
        assert_eq!(scan.state, ScanState::CollectDescription);
        assert_eq!(scan.location.as_deref(), Some("Austin, TX"));
    }
}
