//! Line store: the in-memory form of a configuration file.
//!
//! A file is split into lines, each keeping its own terminator so that a
//! file saved after a transfer differs from the original only in the lines
//! that were replaced. Lines are never inserted or removed.

/// Line terminator as found in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
    /// Final line without a terminator.
    None,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::None => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    text: String,
    ending: LineEnding,
}

/// Ordered, index-addressable lines of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineStore {
    lines: Vec<Line>,
}

impl LineStore {
    /// Split `content` into lines. An empty string yields an empty store.
    pub fn parse(content: &str) -> Self {
        let mut lines = Vec::new();
        let mut rest = content;
        while !rest.is_empty() {
            match rest.find('\n') {
                Some(pos) => {
                    let (raw, ending) = match rest[..pos].strip_suffix('\r') {
                        Some(stripped) => (stripped, LineEnding::CrLf),
                        None => (&rest[..pos], LineEnding::Lf),
                    };
                    lines.push(Line { text: raw.to_string(), ending });
                    rest = &rest[pos + 1..];
                }
                None => {
                    lines.push(Line { text: rest.to_string(), ending: LineEnding::None });
                    rest = "";
                }
            }
        }
        Self { lines }
    }

    /// Build a store from bare line texts, each terminated by `\n`.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines
                .into_iter()
                .map(|text| Line { text: text.into(), ending: LineEnding::Lf })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Text of line `index` without its terminator.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(|l| l.text.as_str())
    }

    pub fn ending(&self, index: usize) -> Option<LineEnding> {
        self.lines.get(index).map(|l| l.ending)
    }

    /// Iterate `(index, text)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.lines.iter().enumerate().map(|(i, l)| (i, l.text.as_str()))
    }

    /// Replace the text of line `index`, keeping its terminator.
    ///
    /// Returns `true` if the text actually changed. Out-of-range indices are
    /// ignored and return `false`.
    pub fn replace(&mut self, index: usize, text: impl Into<String>) -> bool {
        let Some(line) = self.lines.get_mut(index) else {
            return false;
        };
        let text = text.into();
        if line.text == text {
            return false;
        }
        line.text = text;
        true
    }

    /// Reassemble the file content.
    pub fn render(&self) -> String {
        let capacity = self.lines.iter().map(|l| l.text.len() + 2).sum();
        let mut out = String::with_capacity(capacity);
        for line in &self.lines {
            out.push_str(&line.text);
            out.push_str(line.ending.as_str());
        }
        out
    }
}
