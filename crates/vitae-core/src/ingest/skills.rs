use regex::Regex;

use super::cascade::Cascade;
use super::normalizer::strip_bullet;
use super::section::SectionMatcher;

const STOPWORDS: &[&str] = &["and", "or", "with", "in", "at", "for"];

/// Technology names detected anywhere in the text, in reporting order.
pub const TECH_DICTIONARY: &[&str] = &[
    "JavaScript", "Python", "Java", "C++", "C#", "Ruby", "PHP", "Swift", "Kotlin",
    "React", "Angular", "Vue", "Node.js", "Django", "Flask", "Spring", "Express",
    "MongoDB", "MySQL", "PostgreSQL", "Redis", "Docker", "Kubernetes", "AWS", "Azure",
    "Git", "Linux", "REST", "GraphQL", "Machine Learning", "AI", "Data Science",
    "TypeScript", "Go", "Rust", "Scala", "R", "MATLAB", "TensorFlow", "PyTorch",
    ".NET", "Laravel", "Rails", "Flutter", "React Native", "Xamarin", "Unity",
    "Jenkins", "CircleCI", "Travis CI", "Terraform", "Ansible", "Elasticsearch",
];

pub struct SkillCascade {
    section: Cascade,
    category: Regex,
    dictionary: Vec<(&'static str, Regex)>,
}

impl SkillCascade {
    pub fn new() -> Result<Self, regex::Error> {
        let ends = "experience|projects|education|certifications";
        let section = Cascade::new("skills")
            .with(SectionMatcher::ending_at_caps_heading(
                "skills",
                r"(?:technical[ \t]+)?skills",
                ends,
            )?)
            .with(SectionMatcher::ending_at_caps_heading(
                "competencies",
                r"core[ \t]+competencies",
                ends,
            )?)
            .with(SectionMatcher::ending_at_caps_heading(
                "technologies",
                "technologies",
                ends,
            )?);

        let dictionary = TECH_DICTIONARY
            .iter()
            .map(|tech| {
                Regex::new(&format!(r"(?i)\b{}\b", regex::escape(tech))).map(|re| (*tech, re))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            section,
            category: Regex::new(r"(?m)[A-Za-z ]+:[ \t]*([^:\n]+)$")?,
            dictionary,
        })
    }

    /// Skills from the labelled section, then dictionary hits from the whole text.
    pub fn extract(&self, text: &str) -> Vec<String> {
        let listed = self
            .section
            .value(text)
            .map(|block| self.mine(block))
            .unwrap_or_default();

        dedup_exact(self.augment(text, listed))
    }

    /// Union of categorized items and flat tokens, unique ignoring case.
    pub fn mine(&self, block: &str) -> Vec<String> {
        let mut found = Vec::new();

        for caps in self.category.captures_iter(block) {
            found.extend(
                caps[1]
                    .split([',', ';'])
                    .map(str::trim)
                    .filter(|item| is_skill_length(item))
                    .map(String::from),
            );
        }

        found.extend(
            block
                .split([',', ';', '•', '·', '\n'])
                .map(strip_bullet)
                .filter(|token| is_skill_length(token))
                .filter(|token| !token.contains(':'))
                .filter(|token| !is_stopword(token))
                .map(String::from),
        );

        dedup_ignore_case(found)
    }

    /// Append dictionary hits not already present, compared ignoring case.
    pub fn augment(&self, text: &str, mut skills: Vec<String>) -> Vec<String> {
        for (tech, regex) in &self.dictionary {
            let present = skills.iter().any(|s| s.to_lowercase() == tech.to_lowercase());
            if !present && regex.is_match(text) {
                skills.push((*tech).to_string());
            }
        }
        skills
    }
}

fn is_skill_length(token: &str) -> bool {
    (2..50).contains(&token.chars().count())
}

pub(crate) fn is_stopword(token: &str) -> bool {
    STOPWORDS.iter().any(|w| token.eq_ignore_ascii_case(w))
}

pub(crate) fn dedup_ignore_case(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}

/// Drops exact repeats only; entries differing in case are both kept.
pub fn dedup_exact(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_flat_list() {
        let skills = SkillCascade::new().unwrap();
        assert_eq!(
            skills.mine("Python, Go; Docker\n• Kubernetes\nand"),
            strings(&["Python", "Go", "Docker", "Kubernetes"])
        );
    }

    #[test]
    fn test_categorized_lines() {
        let skills = SkillCascade::new().unwrap();
        let block = "Languages: Rust, Python\nTools: Docker, git\nPython";
        assert_eq!(
            skills.mine(block),
            strings(&["Rust", "Python", "Docker", "git"])
        );
    }

    #[test]
    fn test_cascade_dedup_ignores_case() {
        let skills = SkillCascade::new().unwrap();
        assert_eq!(
            skills.mine("Docker, docker, DOCKER, Go"),
            strings(&["Docker", "Go"])
        );
    }

    #[test]
    fn test_length_filter() {
        let skills = SkillCascade::new().unwrap();
        let long = "x".repeat(50);
        assert_eq!(
            skills.mine(&format!("C, Go, {long}")),
            strings(&["Go"])
        );
    }

    #[test]
    fn test_dictionary_respects_existing_casing() {
        let skills = SkillCascade::new().unwrap();
        let text = "We deploy with Docker and Kubernetes.\nSkills: docker";
        assert_eq!(skills.extract(text), strings(&["docker", "Kubernetes"]));
    }

    #[test]
    fn test_dictionary_word_boundaries() {
        let skills = SkillCascade::new().unwrap();
        let found = skills.extract("Went to Gotham to learn JavaScript and node.js");
        assert_eq!(found, strings(&["JavaScript", "Node.js"]));
    }

    #[test]
    fn test_final_dedup_is_case_sensitive() {
        assert_eq!(
            dedup_exact(strings(&["Docker", "docker", "Docker"])),
            strings(&["Docker", "docker"])
        );
    }

    #[test]
    fn test_section_variants() {
        let skills = SkillCascade::new().unwrap();
        let text = "CORE COMPETENCIES\nLeadership, Planning\nEXPERIENCE\nAcme";
        assert_eq!(
            skills.extract(text),
            strings(&["Leadership", "Planning"])
        );
    }
}
