use regex::Regex;

/// One candidate strategy for recovering a field from text.
pub trait Matcher: Send + Sync {
    fn label(&self) -> &'static str;

    fn capture<'t>(&self, text: &'t str) -> Option<&'t str>;
}

/// First match of a regex; yields group 1 when the pattern has one.
pub struct PatternMatcher {
    label: &'static str,
    regex: Regex,
}

impl PatternMatcher {
    pub fn new(label: &'static str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            label,
            regex: Regex::new(pattern)?,
        })
    }
}

impl Matcher for PatternMatcher {
    fn label(&self) -> &'static str {
        self.label
    }

    fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        let caps = self.regex.captures(text)?;
        caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture<'t> {
    pub matcher: &'static str,
    pub value: &'t str,
}

/// Ordered matchers for one field. The first non-empty capture that passes
/// the acceptance check wins and later matchers are never consulted.
pub struct Cascade {
    field: &'static str,
    matchers: Vec<Box<dyn Matcher>>,
    accept: fn(&str) -> bool,
}

impl Cascade {
    #[must_use]
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            matchers: Vec::new(),
            accept: |_| true,
        }
    }

    #[must_use]
    pub fn with(mut self, matcher: impl Matcher + 'static) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }

    #[must_use]
    pub fn accepting(mut self, accept: fn(&str) -> bool) -> Self {
        self.accept = accept;
        self
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn run<'t>(&self, text: &'t str) -> Option<Capture<'t>> {
        for matcher in &self.matchers {
            let Some(value) = matcher.capture(text).map(str::trim) else {
                continue;
            };
            if value.is_empty() || !(self.accept)(value) {
                tracing::trace!(field = self.field, matcher = matcher.label(), value, "rejected");
                continue;
            }
            tracing::debug!(field = self.field, matcher = matcher.label(), "matched");
            return Some(Capture {
                matcher: matcher.label(),
                value,
            });
        }
        None
    }

    pub fn value<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.run(text).map(|c| c.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits_then_words() -> Cascade {
        Cascade::new("demo")
            .with(PatternMatcher::new("digits", r"(\d+)").unwrap())
            .with(PatternMatcher::new("word", r"[a-z]+").unwrap())
    }

    #[test]
    fn test_first_matcher_wins() {
        let capture = digits_then_words().run("abc 123").unwrap();
        assert_eq!(capture.matcher, "digits");
        assert_eq!(capture.value, "123");
    }

    #[test]
    fn test_falls_through_to_later_matcher() {
        let capture = digits_then_words().run("only words").unwrap();
        assert_eq!(capture.matcher, "word");
        assert_eq!(capture.value, "only");
    }

    #[test]
    fn test_rejected_capture_continues_cascade() {
        let cascade = digits_then_words().accepting(|v| v.len() > 3);
        let capture = cascade.run("12 hello").unwrap();
        assert_eq!(capture.matcher, "word");
        assert_eq!(capture.value, "hello");
    }

    #[test]
    fn test_blank_capture_is_skipped() {
        let cascade = Cascade::new("blank")
            .with(PatternMatcher::new("spaces", r"x(\s*)x").unwrap())
            .with(PatternMatcher::new("fallback", r"y+").unwrap());
        assert_eq!(cascade.value("x  x yy"), Some("yy"));
        assert_eq!(cascade.value("nothing"), None);
    }
}
