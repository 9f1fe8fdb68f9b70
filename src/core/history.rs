//! Rendered shell output, oldest first.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// The prompt plus what the user typed.
    Echo,
    Output,
    /// Highlighted status line (the boot sequence's final line).
    Success,
    /// Vertical spacing.
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryLine {
    pub kind: LineKind,
    pub text: String,
}

impl HistoryLine {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Append-only log, cleared in full by the `clear` command.
///
/// Unbounded unless a limit is given; with a limit the oldest lines are
/// dropped first.
#[derive(Debug, Clone, Default)]
pub struct History {
    lines: Vec<HistoryLine>,
    limit: Option<usize>,
}

impl History {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            lines: Vec::new(),
            limit,
        }
    }

    pub fn push(&mut self, kind: LineKind, text: impl Into<String>) {
        self.lines.push(HistoryLine::new(kind, text));
        if let Some(limit) = self.limit {
            if self.lines.len() > limit {
                let excess = self.lines.len() - limit;
                self.lines.drain(0..excess);
            }
        }
    }

    pub fn output(&mut self, text: impl Into<String>) {
        self.push(LineKind::Output, text);
    }

    /// Mutable access to the newest line; the boot typer grows it in place.
    pub fn last_mut(&mut self) -> Option<&mut HistoryLine> {
        self.lines.last_mut()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[HistoryLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.text.as_str())
    }
}
