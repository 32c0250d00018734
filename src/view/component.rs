// src/view/component.rs

//! Immutable descriptions of terminal output
//!
//! A [`Component`] is rendered to fixed-width text: text is word-wrapped,
//! stacks concatenate their children, lists prefix each item with a bullet.
//! Empty components render to nothing, which lets the pipeline stack all
//! projections unconditionally.

/// Foreground color of a text component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Red,
    Green,
    Yellow,
    Cyan,
    Dim,
}

impl Color {
    fn sgr(self) -> Option<&'static str> {
        match self {
            Color::Default => None,
            Color::Red => Some("31"),
            Color::Green => Some("32"),
            Color::Yellow => Some("33"),
            Color::Cyan => Some("36"),
            Color::Dim => Some("2"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Text { content: String, color: Color },
    Stack(Vec<Component>),
    List(Vec<Component>),
}

const BULLET: &str = "• ";
const INDENT: &str = "  ";

impl Component {
    pub fn text(content: impl Into<String>) -> Self {
        Self::colored(content, Color::Default)
    }

    pub fn colored(content: impl Into<String>, color: Color) -> Self {
        Component::Text {
            content: content.into(),
            color,
        }
    }

    /// Stack children vertically, dropping the empty ones
    pub fn stack(children: impl IntoIterator<Item = Component>) -> Self {
        Component::Stack(children.into_iter().filter(|c| !c.is_empty()).collect())
    }

    /// Bulleted list, dropping empty items
    pub fn list(items: impl IntoIterator<Item = Component>) -> Self {
        Component::List(items.into_iter().filter(|c| !c.is_empty()).collect())
    }

    /// The component that renders to nothing
    pub fn empty() -> Self {
        Component::Stack(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Component::Text { .. } => false,
            Component::Stack(children) => children.iter().all(Component::is_empty),
            Component::List(items) => items.iter().all(Component::is_empty),
        }
    }

    /// Plain text, one line per row, no trailing newline
    pub fn render(&self, width: usize) -> String {
        self.lines(width, false).join("\n")
    }

    /// Like [`Component::render`], with ANSI colors
    pub fn render_styled(&self, width: usize) -> String {
        self.lines(width, true).join("\n")
    }

    fn lines(&self, width: usize, styled: bool) -> Vec<String> {
        match self {
            Component::Text { content, color } => {
                let mut lines = Vec::new();
                for paragraph in content.lines() {
                    lines.extend(wrap(paragraph, width));
                }
                if lines.is_empty() {
                    lines.push(String::new());
                }
                match color.sgr() {
                    Some(code) if styled => lines
                        .into_iter()
                        .map(|line| format!("\x1b[{code}m{line}\x1b[0m"))
                        .collect(),
                    _ => lines,
                }
            }
            Component::Stack(children) => children
                .iter()
                .flat_map(|child| child.lines(width, styled))
                .collect(),
            Component::List(items) => {
                let inner = width.saturating_sub(BULLET.chars().count()).max(1);
                let mut lines = Vec::new();
                for item in items {
                    for (i, line) in item.lines(inner, styled).into_iter().enumerate() {
                        let prefix = if i == 0 { BULLET } else { INDENT };
                        lines.push(format!("{prefix}{line}"));
                    }
                }
                lines
            }
        }
    }
}

/// Greedy word wrap; words wider than `width` are split
fn wrap(paragraph: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut used = 0;

    for word in paragraph.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for chunk in chars.chunks(width) {
            if used > 0 && used + 1 + chunk.len() > width {
                lines.push(std::mem::take(&mut line));
                used = 0;
            }
            if used > 0 {
                line.push(' ');
                used += 1;
            }
            line.extend(chunk);
            used += chunk.len();
        }
    }

    if used > 0 || lines.is_empty() {
        lines.push(line);
    }
    lines
}
