use crate::diagnostic::Diagnostic;
use crate::rules::Severity;
use ariadne::{ColorGenerator, Config, Label, Report, ReportKind, Source};
use std::io;
use std::ops::Range;

/// Pretty-printable reports for lint diagnostics, with labeled lines of
/// JSON source.
///
/// This is a rendering convenience on top of the structured
/// [`Diagnostic`] values; nothing in the toolkit requires it.
pub struct DiagnosticReport<'a> {
    source: &'a str,
    colored: bool,
}

impl<'a> DiagnosticReport<'a> {
    /// Create a report renderer over the source the diagnostics refer to.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            colored: true,
        }
    }

    /// Disable colors, e.g. for tests or non-terminal output.
    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Write one report per diagnostic to `w`.
    pub fn write(&self, diagnostics: &[Diagnostic], mut w: impl io::Write) -> io::Result<()> {
        let mut colors = ColorGenerator::new();
        for diagnostic in diagnostics {
            let kind = match diagnostic.severity {
                Severity::Error => ReportKind::Error,
                Severity::Warning => ReportKind::Warning,
                Severity::Info | Severity::Hint => ReportKind::Advice,
            };
            let span: Range<usize> = diagnostic.span.into();

            let mut label = Label::new(span.clone()).with_message(diagnostic.rule.as_str());
            if self.colored {
                label = label.with_color(colors.next());
            }

            let mut builder = Report::build(kind, (), span.start)
                .with_config(Config::default().with_color(self.colored))
                .with_message(&diagnostic.message)
                .with_label(label);
            if let Some(fix) = &diagnostic.fix {
                builder = builder.with_help(&fix.description);
            }
            builder.finish().write(Source::from(self.source), &mut w)?;
        }
        Ok(())
    }

    /// Render all diagnostics into one string.
    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail.
        self.write(diagnostics, &mut buffer)
            .expect("in-memory write");
        String::from_utf8_lossy(&buffer).into_owned()
    }
}
