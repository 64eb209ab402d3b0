use regex::Regex;

use super::cascade::Matcher;

/// Locates a labelled block of résumé text.
///
/// A header is a line holding one of the labels followed by a colon or the
/// end of the line. The block runs until the next line shaped like one of the
/// terminator headers (optionally preceded by one qualifier word, so
/// `education` also stops at "Academic Education:") or the end of the text.
pub struct SectionMatcher {
    label: &'static str,
    header: Regex,
    end: Regex,
    bounds: Option<(usize, usize)>,
}

impl SectionMatcher {
    pub fn new(label: &'static str, headers: &str, terminators: &str) -> Result<Self, regex::Error> {
        Self::build(label, headers, terminators, false)
    }

    /// Like [`SectionMatcher::new`], but an all-caps heading line also ends the block.
    pub fn ending_at_caps_heading(
        label: &'static str,
        headers: &str,
        terminators: &str,
    ) -> Result<Self, regex::Error> {
        Self::build(label, headers, terminators, true)
    }

    fn build(
        label: &'static str,
        headers: &str,
        terminators: &str,
        caps_heading: bool,
    ) -> Result<Self, regex::Error> {
        let header = Regex::new(&format!(r"(?im)^[ \t]*(?:{headers})[ \t]*(?::|$)"))?;

        let mut end = format!(r"(?im)^[ \t]*(?:[a-z]+[ \t]+)?(?:{terminators})[ \t]*(?::|$)");
        if caps_heading {
            end.push_str(r"|(?-i:^[ \t]*[A-Z][A-Z ]{3,}$)");
        }

        Ok(Self {
            label,
            header,
            end: Regex::new(&end)?,
            bounds: None,
        })
    }

    /// Only accept blocks of `min..=max` characters. A terminator closer than
    /// `min` is skipped; when nothing qualifies the nearest boundary is used.
    #[must_use]
    pub fn bounded(mut self, min: usize, max: usize) -> Self {
        self.bounds = Some((min, max));
        self
    }

    /// Block following the first header occurrence.
    pub fn block<'t>(&self, text: &'t str) -> Option<&'t str> {
        let header = self.header.find(text)?;
        let start = skip_whitespace(text, header.end());
        let end = self
            .end
            .find_at(text, start)
            .map_or(text.len(), |m| m.start());

        non_empty(&text[start..end])
    }

    /// Tries every header occurrence in order until one yields a block
    /// within the configured bounds.
    fn bounded_block<'t>(&self, text: &'t str, min: usize, max: usize) -> Option<&'t str> {
        for header in self.header.find_iter(text) {
            let start = skip_whitespace(text, header.end());
            let boundaries = self.boundaries(text, start);

            let chosen = boundaries
                .iter()
                .copied()
                .find(|&end| text[start..end].trim_end().chars().count() >= min)
                .or_else(|| boundaries.first().copied());

            let Some(end) = chosen else {
                continue;
            };
            let block = text[start..end].trim();
            if block.chars().count() <= max {
                if let Some(block) = non_empty(block) {
                    return Some(block);
                }
            }
        }
        None
    }

    /// Start offsets of every terminator after `start`, then the end of the text.
    fn boundaries(&self, text: &str, start: usize) -> Vec<usize> {
        let mut found = Vec::new();
        let mut pos = start;
        while let Some(m) = self.end.find_at(text, pos) {
            found.push(m.start());
            if m.end() <= pos {
                break;
            }
            pos = m.end();
        }
        found.push(text.len());
        found
    }
}

impl Matcher for SectionMatcher {
    fn label(&self) -> &'static str {
        self.label
    }

    fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        match self.bounds {
            Some((min, max)) => self.bounded_block(text, min, max),
            None => self.block(text),
        }
    }
}

fn skip_whitespace(text: &str, from: usize) -> usize {
    let rest = &text[from..];
    from + (rest.len() - rest.trim_start().len())
}

fn non_empty(block: &str) -> Option<&str> {
    let block = block.trim();
    (!block.is_empty()).then_some(block)
}
