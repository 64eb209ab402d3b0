use regex::Regex;

use super::normalizer::strip_bullet;
use super::section::SectionMatcher;
use super::skills::{dedup_ignore_case, is_stopword};

/// Spoken languages and certifications: single-header sections split
/// into one entry per line or bullet.
pub struct ListCascades {
    languages: SectionMatcher,
    programming: Regex,
    language_noise: Regex,
    certifications: SectionMatcher,
}

impl ListCascades {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            languages: SectionMatcher::ending_at_caps_heading(
                "languages",
                r"(?:spoken[ \t]+)?languages?",
                "skills|projects|experience|education|certifications",
            )?,
            programming: Regex::new(r"(?i)javascript|python|java|c\+\+|ruby|php")?,
            language_noise: Regex::new(r"(?i)programming|backend|frontend|technologies")?,
            certifications: SectionMatcher::new(
                "certifications",
                "certifications?|licenses",
                "projects|experience|skills|languages|education|awards",
            )?,
        })
    }

    /// Empty when the block looks like a mislabelled programming-language list.
    pub fn languages(&self, text: &str) -> Vec<String> {
        let Some(block) = self.languages.block(text) else {
            return Vec::new();
        };
        if self.programming.is_match(block) {
            return Vec::new();
        }

        dedup_ignore_case(
            block
                .split([',', ';', '•', '·', '\n'])
                .map(strip_bullet)
                .filter(|entry| (2..50).contains(&entry.chars().count()))
                .filter(|entry| !is_stopword(entry))
                .filter(|entry| !self.language_noise.is_match(entry))
                .map(String::from)
                .collect(),
        )
    }

    pub fn certifications(&self, text: &str) -> Vec<String> {
        let Some(block) = self.certifications.block(text) else {
            return Vec::new();
        };

        dedup_ignore_case(
            block
                .split(['•', '·', '\n'])
                .map(strip_bullet)
                .filter(|entry| (6..200).contains(&entry.chars().count()))
                .filter(|entry| !is_stopword(entry))
                .map(String::from)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spoken_languages() {
        let lists = ListCascades::new().unwrap();
        let text = "Languages: English, Spanish; French\nSkills: Rust";
        assert_eq!(lists.languages(text), vec!["English", "Spanish", "French"]);
    }

    #[test]
    fn test_short_language_names_are_kept() {
        let lists = ListCascades::new().unwrap();
        let text = "Languages\nThai, Urdu\nCertifications\nCertified Scrum Master";
        assert_eq!(lists.languages(text), vec!["Thai", "Urdu"]);
    }

    #[test]
    fn test_programming_languages_block_is_ignored() {
        let lists = ListCascades::new().unwrap();
        let text = "Programming Languages:\nPython, Go\nLanguages: Java, C++";
        assert!(lists.languages(text).is_empty());
    }

    #[test]
    fn test_language_noise_filtered() {
        let lists = ListCascades::new().unwrap();
        let text = "LANGUAGES\nEnglish\nFrontend Technologies\nGerman";
        assert_eq!(lists.languages(text), vec!["English", "German"]);
    }

    #[test]
    fn test_certifications() {
        let lists = ListCascades::new().unwrap();
        let text = "Certifications:\n• AWS Certified Solutions Architect\n• CKA\n- Scrum Master\nProjects:\nThing";
        assert_eq!(
            lists.certifications(text),
            vec!["AWS Certified Solutions Architect", "Scrum Master"]
        );
    }

    #[test]
    fn test_missing_sections() {
        let lists = ListCascades::new().unwrap();
        assert!(lists.languages("nothing here").is_empty());
        assert!(lists.certifications("nothing here").is_empty());
    }
}
