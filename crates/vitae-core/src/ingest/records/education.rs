use regex::Regex;

use super::{date_range_pattern, lines, trim_separators, RECORD_TERMINATORS};
use crate::entity::{Education, NOT_SPECIFIED};
use crate::ingest::cascade::Cascade;
use crate::ingest::section::SectionMatcher;

const DEGREE: &str =
    r"(?i:\b(?:bachelor|master|doctor|associate))|\b(?:Ph\.?D|B\.[A-Z]|M\.[A-Z]|BSc|MSc|BS|MS|MBA)\b";
const INSTITUTION: &str = r"(?i)\b(?:university|institute|college|school|academy|polytechnic)\b";
const YEAR: &str = r"\b(?:19|20)\d{2}\b";
const GPA: &str = r"(?i)\bc?gpa[:\s]*([0-9]+(?:\.[0-9]+)?)(?:[ \t]*/[ \t]*[0-9]+(?:\.[0-9]+)?)?";

pub struct EducationSegmenter {
    section: Cascade,
    degree: Regex,
    institution: Regex,
    date: Regex,
    year: Regex,
    gpa: Regex,
    split: Regex,
}

impl EducationSegmenter {
    pub fn new() -> Result<Self, regex::Error> {
        let section = Cascade::new("education").with(SectionMatcher::new(
            "education",
            r"education|academic[ \t]+background",
            RECORD_TERMINATORS,
        )?);

        Ok(Self {
            section,
            degree: Regex::new(DEGREE)?,
            institution: Regex::new(INSTITUTION)?,
            date: Regex::new(&date_range_pattern())?,
            year: Regex::new(YEAR)?,
            gpa: Regex::new(GPA)?,
            split: Regex::new(r"[ \t]*(?:,|\||–|—|[ \t]-[ \t])[ \t]*")?,
        })
    }

    pub fn segment(&self, text: &str) -> Vec<Education> {
        let Some(block) = self.section.value(text) else {
            return Vec::new();
        };

        self.split_records(&lines(block))
            .iter()
            .filter_map(|record| self.scan(record))
            .collect()
    }

    /// A record closes when a second degree line or a second institution
    /// line turns up.
    fn split_records<'a>(&self, lines: &[&'a str]) -> Vec<Vec<&'a str>> {
        let mut records = Vec::new();
        let mut current: Vec<&'a str> = Vec::new();
        let (mut has_degree, mut has_institution) = (false, false);

        for &line in lines {
            let degree = self.degree.is_match(line);
            let institution = self.institution.is_match(line);

            if (degree && has_degree) || (institution && has_institution) {
                records.push(std::mem::take(&mut current));
                has_degree = false;
                has_institution = false;
            }

            has_degree |= degree;
            has_institution |= institution;
            current.push(line);
        }

        if !current.is_empty() {
            records.push(current);
        }
        records
    }

    fn scan(&self, record: &[&str]) -> Option<Education> {
        let year = record.iter().find_map(|line| {
            self.date
                .find(line)
                .or_else(|| self.year.find(line))
                .map(|m| m.as_str().trim().to_string())
        });

        let details = record
            .iter()
            .find_map(|line| self.gpa.captures(line))
            .and_then(|caps| caps.get(1))
            .map(|gpa| format!("GPA: {}", gpa.as_str()))
            .unwrap_or_default();

        let cleaned: Vec<String> = record
            .iter()
            .map(|line| self.strip_fragments(line))
            .filter(|line| !line.is_empty())
            .collect();

        let mut degree = None;
        let mut institution = None;
        let mut used = vec![false; cleaned.len()];

        for (index, line) in cleaned.iter().enumerate() {
            let has_degree = self.degree.is_match(line);
            let has_institution = self.institution.is_match(line);

            if has_degree && has_institution {
                for part in self.split.split(line).map(trim_separators) {
                    if institution.is_none() && self.institution.is_match(part) {
                        institution = Some(part.to_string());
                    } else if degree.is_none() && self.degree.is_match(part) {
                        degree = Some(part.to_string());
                    }
                }
                used[index] = true;
            } else if has_institution && institution.is_none() {
                institution = Some(line.clone());
                used[index] = true;
            } else if has_degree && degree.is_none() {
                degree = Some(line.clone());
                used[index] = true;
            }
        }

        let mut unused = cleaned
            .iter()
            .zip(&used)
            .filter(|(_, used)| !**used)
            .map(|(line, _)| line.clone());
        if institution.is_none() {
            institution = unused.next();
        }
        if degree.is_none() {
            degree = unused.next();
        }

        if degree.is_none() && institution.is_none() {
            return None;
        }

        Some(Education {
            degree: degree.unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            institution: institution.unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            year,
            details,
        })
    }

    /// Drops year and grade fragments so they do not leak into names.
    fn strip_fragments(&self, line: &str) -> String {
        let line = self.gpa.replace_all(line, "");
        let line = self.date.replace_all(&line, "");
        let line = self.year.replace_all(&line, "");
        trim_separators(&line).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str) -> Vec<Education> {
        EducationSegmenter::new().unwrap().segment(text)
    }

    #[test]
    fn test_degree_and_institution_on_separate_lines() {
        let text = "Education\n\
                    Bachelor of Science in Computer Science\n\
                    State University, 2012 - 2016\n\
                    GPA: 3.8/4.0\n\
                    Skills\n\
                    Rust";
        let schools = segment(text);

        assert_eq!(schools.len(), 1);
        assert_eq!(schools[0].degree, "Bachelor of Science in Computer Science");
        assert_eq!(schools[0].institution, "State University");
        assert_eq!(schools[0].year.as_deref(), Some("2012 - 2016"));
        assert_eq!(schools[0].details, "GPA: 3.8");
    }

    #[test]
    fn test_combined_line_is_split() {
        let schools = segment("Education:\nMSc Data Science, Imperial College 2019");

        assert_eq!(schools.len(), 1);
        assert_eq!(schools[0].degree, "MSc Data Science");
        assert_eq!(schools[0].institution, "Imperial College");
        assert_eq!(schools[0].year.as_deref(), Some("2019"));
        assert_eq!(schools[0].details, "");
    }

    #[test]
    fn test_multiple_records() {
        let text = "Academic Background\n\
                    Master of Engineering\n\
                    Technical University of Munich\n\
                    Bachelor of Arts\n\
                    Oberlin College\n\
                    2010";
        let schools = segment(text);

        assert_eq!(schools.len(), 2);
        assert_eq!(schools[0].degree, "Master of Engineering");
        assert_eq!(schools[0].institution, "Technical University of Munich");
        assert_eq!(schools[0].year, None);
        assert_eq!(schools[1].degree, "Bachelor of Arts");
        assert_eq!(schools[1].institution, "Oberlin College");
        assert_eq!(schools[1].year.as_deref(), Some("2010"));
    }

    #[test]
    fn test_state_code_is_not_a_degree() {
        let text = "Education\n\
                    Harvard University\n\
                    Cambridge, MA\n\
                    Bachelor of Arts in History\n\
                    2010 - 2014";
        let schools = segment(text);

        assert_eq!(schools.len(), 1);
        assert_eq!(schools[0].institution, "Harvard University");
        assert_eq!(schools[0].degree, "Bachelor of Arts in History");
        assert_eq!(schools[0].year.as_deref(), Some("2010 - 2014"));
    }

    #[test]
    fn test_positional_fallback() {
        let schools = segment("Education\nEcole Normale\nLicence en Physique");

        assert_eq!(schools.len(), 1);
        assert_eq!(schools[0].institution, "Ecole Normale");
        assert_eq!(schools[0].degree, "Licence en Physique");
    }

    #[test]
    fn test_empty_section() {
        assert!(segment("Education\n2015").is_empty());
        assert!(segment("No schooling listed").is_empty());
    }
}
