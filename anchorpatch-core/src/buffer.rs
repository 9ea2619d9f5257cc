use std::fmt;

/// Whole-file text owned by a single engine run.
///
/// Operations take the buffer by value and hand back a new one, so each step
/// sees exactly the output of the step before it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceBuffer {
    text: String,
}

impl SourceBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }

    /// Non-overlapping occurrences of `needle`, scanning left to right.
    pub fn occurrences(&self, needle: &str) -> usize {
        if needle.is_empty() {
            return 0;
        }
        self.text.matches(needle).count()
    }

    /// Replaces every occurrence of `from` with `to`, returning the new buffer
    /// and the number of replacements made.
    pub fn replace_all(self, from: &str, to: &str) -> (Self, usize) {
        let count = self.occurrences(from);
        if count == 0 {
            return (self, 0);
        }
        (Self::new(self.text.replace(from, to)), count)
    }

    /// Like [`replace_all`](Self::replace_all), but leaves alone any `from`
    /// that already sits inside an occurrence of `to`.
    pub fn replace_uncovered(self, from: &str, to: &str) -> (Self, usize) {
        if from.is_empty() {
            return (self, 0);
        }
        let covered: Vec<(usize, usize)> = if to.is_empty() {
            Vec::new()
        } else {
            self.text
                .match_indices(to)
                .map(|(start, matched)| (start, start + matched.len()))
                .collect()
        };

        let mut patched = String::with_capacity(self.text.len());
        let mut cursor = 0;
        let mut count = 0;
        for (start, matched) in self.text.match_indices(from) {
            let end = start + matched.len();
            if covered.iter().any(|&(lo, hi)| lo <= start && end <= hi) {
                continue;
            }
            patched.push_str(&self.text[cursor..start]);
            patched.push_str(to);
            cursor = end;
            count += 1;
        }

        if count == 0 {
            return (self, 0);
        }
        patched.push_str(&self.text[cursor..]);
        (Self::new(patched), count)
    }
}

impl From<String> for SourceBuffer {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for SourceBuffer {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl AsRef<str> for SourceBuffer {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SourceBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
