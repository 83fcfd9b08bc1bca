use std::fmt::Display;

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level as SnippetLevel, Snippet};
pub use text_size::TextRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Error,
    Warning,
}

/// A problem found in a source file, reported as a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    message: String,
    range: TextRange,
    level: Level,
}

impl Diagnostic {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }

    pub fn error(message: impl Into<String>, range: TextRange) -> Self {
        Self { message: message.into(), range, level: Level::Error }
    }

    pub fn warning(message: impl Into<String>, range: TextRange) -> Self {
        Self { message: message.into(), range, level: Level::Warning }
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let level = match self.level {
            Level::Error => SnippetLevel::Error,
            Level::Warning => SnippetLevel::Warning,
        };
        let message = level.title(&self.message).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(level.span(self.range.into()).label("here"))
                .fold(true),
        );
        renderer.render(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_snippet_with_origin() {
        let text = "class A {\n    int x\n}\n";
        let diagnostic = Diagnostic::error("expected `;`", TextRange::new(18.into(), 19.into()));

        let rendered = diagnostic.render(&Renderer::plain(), "a.cs", text).to_string();
        assert!(rendered.starts_with("error: expected `;`"), "{rendered}");
        assert!(rendered.contains("a.cs:2:9"), "{rendered}");
        assert!(rendered.contains("    int x"), "{rendered}");
    }

    #[test]
    fn warnings_are_not_errors() {
        let diagnostic = Diagnostic::warning("unused", TextRange::default());
        assert!(!diagnostic.is_error());
        assert_eq!(diagnostic.level(), Level::Warning);
    }
}
