//! ucode_syntax: Parse orchestration over many sources.
//!
//! A [`SourceSet`] collects templates and programs, parses them in parallel
//! (one arena and one parser per source, a single shared interner) and
//! returns their diagnostics in a stable order.

use bumpalo::Bump;
use rayon::prelude::*;
use tracing::{debug, info};
use ucode_core::arena::ParseArena;
use ucode_core::intern::StringInterner;
use ucode_core::{LineAndColumn, LineMap};
use ucode_diagnostics::{render_diagnostics, Diagnostic, ParseError};
use ucode_options::{ParseOptions, SourceMode};
use ucode_parser::{ParseResult, Parser};

/// One source registered with a [`SourceSet`].
#[derive(Debug, Clone)]
pub struct SourceEntry {
    pub file_name: String,
    pub source_text: String,
    pub mode: SourceMode,
}

/// The outcome of parsing one source. The tree itself lives in a
/// per-source arena; use [`SourceSet::parse_with`] to inspect it.
#[derive(Debug, Clone)]
pub struct ParsedSource {
    pub file_name: String,
    pub mode: SourceMode,
    /// Number of top-level statements.
    pub statement_count: usize,
    /// Sorted by position.
    pub diagnostics: Vec<Diagnostic>,
    source_text: String,
    line_map: LineMap,
}

impl ParsedSource {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// The first error as a renderable [`ParseError`], or `self` when the
    /// source parsed cleanly.
    pub fn into_result(self) -> Result<ParsedSource, ParseError> {
        match self.diagnostics.iter().find(|d| d.is_error()) {
            Some(diagnostic) => Err(ParseError::from_diagnostic(diagnostic, &self.file_name, &self.source_text)),
            None => Ok(self),
        }
    }

    /// Zero-based line and column where `diagnostic` starts. `None` when
    /// the diagnostic has no span.
    pub fn location(&self, diagnostic: &Diagnostic) -> Option<LineAndColumn> {
        diagnostic.span.map(|span| self.line_map.line_and_column_of(span.start))
    }

    /// `file:line:column: message` for each diagnostic, one-based.
    pub fn summary_lines(&self) -> Vec<String> {
        self.diagnostics
            .iter()
            .map(|d| match self.location(d) {
                Some(location) => format!("{}:{}: {}", self.file_name, location, d.message_text),
                None => format!("{}: {}", self.file_name, d.message_text),
            })
            .collect()
    }

    /// Every diagnostic with a source snippet, without colours.
    pub fn render(&self) -> String {
        render_diagnostics(&self.diagnostics, &self.file_name, &self.source_text)
    }
}

/// A set of sources parsed together.
pub struct SourceSet {
    pub options: ParseOptions,
    /// Paths read by [`SourceSet::load_files`].
    pub root_files: Vec<String>,
    interner: StringInterner,
    sources: Vec<SourceEntry>,
}

impl SourceSet {
    pub fn new(root_files: Vec<String>, options: ParseOptions) -> Self {
        Self {
            options,
            root_files,
            interner: StringInterner::new(),
            sources: Vec::new(),
        }
    }

    /// Add a source parsed in the set's default mode.
    pub fn add_source(&mut self, file_name: String, source_text: String) {
        let mode = self.options.mode;
        self.add_source_with_mode(file_name, source_text, mode);
    }

    pub fn add_source_with_mode(&mut self, file_name: String, source_text: String, mode: SourceMode) {
        self.sources.push(SourceEntry {
            file_name,
            source_text,
            mode,
        });
    }

    /// Read every root file from disk. `.uc` files are parsed as programs,
    /// anything else in the set's default mode.
    pub fn load_files(&mut self) -> Result<(), std::io::Error> {
        for file in &self.root_files.clone() {
            let content = std::fs::read_to_string(file)?;
            let mode = if file.ends_with(".uc") {
                SourceMode::Program
            } else {
                self.options.mode
            };
            self.add_source_with_mode(file.clone(), content, mode);
        }
        Ok(())
    }

    pub fn sources(&self) -> &[SourceEntry] {
        &self.sources
    }

    /// Identifier table shared by every parse of this set.
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Parse every source in parallel. Results keep insertion order.
    pub fn parse_all(&self) -> Vec<ParsedSource> {
        self.parse_all_with_options(&self.options)
    }

    /// Parse every source in fail-fast mode and return the first error in
    /// insertion order.
    pub fn parse_all_fail_fast(&self) -> Result<Vec<ParsedSource>, ParseError> {
        let options = self.options.clone().with_fail_fast(true);
        self.parse_all_with_options(&options)
            .into_iter()
            .map(ParsedSource::into_result)
            .collect()
    }

    /// Parse every source and hand each tree to `f` while its arena is alive.
    pub fn parse_with<F, R>(&self, f: F) -> Vec<R>
    where
        F: Fn(&SourceEntry, &ParseResult<'_>) -> R + Sync,
        R: Send,
    {
        self.sources
            .par_iter()
            .map(|entry| {
                let arena = ParseArena::for_source(entry.source_text.len());
                let result = self.parse_entry(arena.bump(), entry, &self.options);
                f(entry, &result)
            })
            .collect()
    }

    /// Every diagnostic of an earlier [`SourceSet::parse_all`]: sources in
    /// insertion order, each sorted by position.
    pub fn collect_diagnostics(parsed: &[ParsedSource]) -> Vec<Diagnostic> {
        parsed.iter().flat_map(|p| p.diagnostics.iter().cloned()).collect()
    }

    fn parse_all_with_options(&self, options: &ParseOptions) -> Vec<ParsedSource> {
        let parsed: Vec<ParsedSource> = self
            .sources
            .par_iter()
            .map(|entry| {
                let arena = ParseArena::for_source(entry.source_text.len());
                let result = self.parse_entry(arena.bump(), entry, options);
                ParsedSource {
                    file_name: entry.file_name.clone(),
                    mode: entry.mode,
                    statement_count: result.source_file.statements.len(),
                    diagnostics: result.diagnostics,
                    source_text: entry.source_text.clone(),
                    line_map: LineMap::new(&entry.source_text),
                }
            })
            .collect();

        let errors: usize = parsed.iter().map(ParsedSource::error_count).sum();
        info!(sources = parsed.len(), errors, "parsed source set");
        parsed
    }

    fn parse_entry<'a>(&self, arena: &'a Bump, entry: &SourceEntry, options: &ParseOptions) -> ParseResult<'a> {
        let options = options.clone().with_mode(entry.mode);
        let result = Parser::new(arena, &entry.file_name, &entry.source_text, &options)
            .with_interner(self.interner.clone())
            .parse_source_file();
        debug!(
            file = %entry.file_name,
            statements = result.source_file.statements.len(),
            errors = result.errors().count(),
            "parsed source"
        );
        result
    }
}
