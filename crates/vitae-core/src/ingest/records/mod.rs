mod education;
mod experience;
mod projects;

pub use education::EducationSegmenter;
pub use experience::{ExperienceSegmenter, ScanState};
pub use projects::ProjectSegmenter;

const MONTH: &str = r"(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\.?";

/// "Month YYYY – Month YYYY|Present" or "YYYY – YYYY|Present".
fn date_range_pattern() -> String {
    format!(
        r"\b{MONTH}[ \t]+\d{{4}}[ \t]*[-–—][ \t]*(?:(?:{MONTH}[ \t]+)?\d{{4}}|(?i:present|current))|\b\d{{4}}[ \t]*[-–—][ \t]*(?:\d{{4}}|(?i:present|current))"
    )
}

/// "City, Region", where the region may be a two-letter code.
const PLACE: &str =
    r"\b[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)*,[ \t]*(?:[A-Z]{2}\b|[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)*)";

/// Section headers that end any multi-record block.
const RECORD_TERMINATORS: &str = "summary|objective|profile|experience|work[ \\t]+history\
    |employment[ \\t]+history|education|skills|competencies|projects|certifications\
    |languages|awards|publications|interests|references";

fn lines(block: &str) -> Vec<&str> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Trim separators left behind after cutting a token out of a line.
fn trim_separators(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || matches!(c, '|' | ',' | '-' | '–' | '—' | '@' | ':' | '(' | ')'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_date_range_shapes() {
        let date = Regex::new(&date_range_pattern()).unwrap();
        let find = |s: &str| date.find(s).map(|m| m.as_str().to_string());

        assert_eq!(find("Acme | Jan 2020 - Present").as_deref(), Some("Jan 2020 - Present"));
        assert_eq!(find("September 2018 – March 2020").as_deref(), Some("September 2018 – March 2020"));
        assert_eq!(find("Globex 2017 - 2019").as_deref(), Some("2017 - 2019"));
        assert_eq!(find("Mar 2021 - 2023").as_deref(), Some("Mar 2021 - 2023"));
        assert_eq!(find("Graduated 2019"), None);
    }

    #[test]
    fn test_trim_separators() {
        assert_eq!(trim_separators(" Acme Corp | "), "Acme Corp");
        assert_eq!(trim_separators("Project Atlas –"), "Project Atlas");
    }
}
