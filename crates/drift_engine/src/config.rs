//! Engine options and inline configuration parsing
//!
//! Containers and parallax elements carry their per-element configuration as
//! a text blob attached to the host element (`data-drift="offset: 120,
//! properties: { translateY: '100%', opacity: 0.6 }"`). The blob is parsed by
//! a strict `key: value` grammar: plain data only, never evaluated as code.
//!
//! # Error Handling
//!
//! Parsing is best-effort: all failures are collected into a diagnostics
//! array with line/column positions and logged via tracing at DEBUG level.
//! An element whose blob fails to parse falls back to defaults; the engine
//! keeps running.
//!
//! # Supported Syntax
//!
//! - Pairs: `key: value`, comma-separated, optional trailing comma
//! - Values: numbers (`120`, `-0.5`), quoted strings (`'100%'`), bare tokens
//!   (`100%`, `true`), or nested maps (`{ ... }`)
//! - Recognized keys: `offset` (number), `horizontal` (bool), `properties`
//!   (map of property name → number or unit string)

use drift_core::value::{PropertyMap, PropertyValue};
use nom::{
    branch::alt,
    bytes::complete::{take_until, take_while1},
    character::complete::{char, multispace0},
    combinator::{all_consuming, consumed, cut, map, opt},
    error::{context, VerboseError, VerboseErrorKind},
    multi::separated_list0,
    sequence::{delimited, preceded, terminated},
    Finish, IResult,
};
use tracing::debug;

/// Default selector locating containers under the scan scope.
pub const DEFAULT_PARENT_SELECTOR: &str = "[data-drift-parent]";

/// Default selector locating parallax elements within a container.
pub const DEFAULT_ELEMENTS_SELECTOR: &str = "[data-drift]";

// ============================================================================
// Engine Options
// ============================================================================

/// Construction options for one engine instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Traversal axis is horizontal (default: vertical).
    pub horizontal: bool,
    /// Global ratio zero-crossing shift, overridable per container.
    pub offset: f32,
    /// Selector locating containers; `None` uses [`DEFAULT_PARENT_SELECTOR`].
    pub parent_selector: Option<String>,
    /// Selector locating parallax elements; `None` uses
    /// [`DEFAULT_ELEMENTS_SELECTOR`].
    pub elements_selector: Option<String>,
    /// Freeze animations and pointer events on the frame while scrolling.
    pub performance_trick: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            horizontal: false,
            offset: 0.0,
            parent_selector: None,
            elements_selector: None,
            performance_trick: false,
        }
    }
}

impl Options {
    /// The container selector in effect.
    pub fn effective_parent_selector(&self) -> &str {
        self.parent_selector
            .as_deref()
            .unwrap_or(DEFAULT_PARENT_SELECTOR)
    }

    /// The parallax-element selector in effect.
    pub fn effective_elements_selector(&self) -> &str {
        self.elements_selector
            .as_deref()
            .unwrap_or(DEFAULT_ELEMENTS_SELECTOR)
    }
}

/// Partial options for [`set`](crate::engine::Parallax::set) merging.
///
/// Only the populated fields are applied; the merge is followed by a full
/// reload: there is no partial-option recompute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionsPatch {
    pub horizontal: Option<bool>,
    pub offset: Option<f32>,
    pub parent_selector: Option<String>,
    pub elements_selector: Option<String>,
    pub performance_trick: Option<bool>,
}

impl OptionsPatch {
    /// Empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the traversal axis flag.
    pub fn horizontal(mut self, horizontal: bool) -> Self {
        self.horizontal = Some(horizontal);
        self
    }

    /// Set the global offset.
    pub fn offset(mut self, offset: f32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the container selector.
    pub fn parent_selector(mut self, selector: impl Into<String>) -> Self {
        self.parent_selector = Some(selector.into());
        self
    }

    /// Set the parallax-element selector.
    pub fn elements_selector(mut self, selector: impl Into<String>) -> Self {
        self.elements_selector = Some(selector.into());
        self
    }

    /// Toggle the performance freeze.
    pub fn performance_trick(mut self, enabled: bool) -> Self {
        self.performance_trick = Some(enabled);
        self
    }

    /// Merge this patch into `options`.
    pub fn apply_to(&self, options: &mut Options) {
        if let Some(horizontal) = self.horizontal {
            options.horizontal = horizontal;
        }
        if let Some(offset) = self.offset {
            options.offset = offset;
        }
        if let Some(ref selector) = self.parent_selector {
            options.parent_selector = Some(selector.clone());
        }
        if let Some(ref selector) = self.elements_selector {
            options.elements_selector = Some(selector.clone());
        }
        if let Some(enabled) = self.performance_trick {
            options.performance_trick = enabled;
        }
    }
}

// ============================================================================
// Inline Configuration
// ============================================================================

/// Per-element configuration parsed from the attached blob.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineConfig {
    /// Ratio zero-crossing override (containers) or declared shift
    /// (elements; informational: the container's ratio is shared).
    pub offset: Option<f32>,
    /// Axis override for an element's default translate direction.
    pub horizontal: Option<bool>,
    /// Declared property map for a parallax element.
    pub properties: Option<PropertyMap>,
}

/// Severity of a configuration diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The blob could not be parsed.
    Error,
    /// The blob parsed but part of it was ignored.
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A positioned diagnostic produced while parsing a configuration blob.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    /// Severity level.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl std::fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "config {}: line {}, column {}: {}",
            self.severity, self.line, self.column, self.message
        )
    }
}

/// Result of parsing an inline configuration blob.
#[derive(Debug, Clone)]
pub struct ConfigParseResult {
    /// The parsed configuration (defaults where parsing failed).
    pub config: InlineConfig,
    /// Diagnostics collected during parsing.
    pub diagnostics: Vec<ConfigDiagnostic>,
}

impl ConfigParseResult {
    /// Whether any hard parse errors occurred.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Log all diagnostics via tracing.
    pub fn log_diagnostics(&self) {
        for diag in &self.diagnostics {
            debug!(
                severity = %diag.severity,
                line = diag.line,
                column = diag.column,
                message = %diag.message,
                "inline config diagnostic"
            );
        }
    }
}

// ============================================================================
// Grammar
// ============================================================================

type ParseResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// Raw parsed value before interpretation.
#[derive(Debug, Clone, PartialEq)]
enum RawValue<'a> {
    Scalar(&'a str),
    Map(Vec<RawPair<'a>>),
}

/// A `key: value` pair; `fragment` is the sub-slice it was parsed from,
/// kept for diagnostics positioning.
#[derive(Debug, Clone, PartialEq)]
struct RawPair<'a> {
    key: &'a str,
    value: RawValue<'a>,
    fragment: &'a str,
}

fn identifier(input: &str) -> ParseResult<'_, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

fn quoted(input: &str) -> ParseResult<'_, RawValue<'_>> {
    map(
        delimited(char('\''), take_until("'"), char('\'')),
        RawValue::Scalar,
    )(input)
}

fn bare_token(input: &str) -> ParseResult<'_, RawValue<'_>> {
    map(
        take_while1(|c: char| !c.is_whitespace() && !matches!(c, ',' | ':' | '{' | '}' | '\'')),
        RawValue::Scalar,
    )(input)
}

fn block(input: &str) -> ParseResult<'_, RawValue<'_>> {
    map(
        delimited(
            char('{'),
            pair_list,
            context("closing brace", cut(preceded(multispace0, char('}')))),
        ),
        RawValue::Map,
    )(input)
}

fn value(input: &str) -> ParseResult<'_, RawValue<'_>> {
    context("value", alt((block, quoted, bare_token)))(input)
}

fn pair(input: &str) -> ParseResult<'_, RawPair<'_>> {
    let (input, _) = multispace0(input)?;
    let (rest, (fragment, (key, raw))) = consumed(|input| {
        let (input, key) = context("key", identifier)(input)?;
        let (input, _) = preceded(multispace0, context("colon", cut(char(':'))))(input)?;
        let (input, raw) = preceded(multispace0, cut(value))(input)?;
        Ok((input, (key, raw)))
    })(input)?;
    Ok((
        rest,
        RawPair {
            key,
            value: raw,
            fragment,
        },
    ))
}

fn pair_list(input: &str) -> ParseResult<'_, Vec<RawPair<'_>>> {
    terminated(
        separated_list0(preceded(multispace0, char(',')), pair),
        opt(preceded(multispace0, char(','))),
    )(input)
}

fn blob(input: &str) -> ParseResult<'_, Vec<RawPair<'_>>> {
    all_consuming(terminated(pair_list, multispace0))(input)
}

/// Compute 1-indexed line/column of `fragment` within `original`.
///
/// `fragment` must be a suffix of `original`, as nom error fragments are.
fn calculate_position(original: &str, fragment: &str) -> (usize, usize) {
    let offset = original.len().saturating_sub(fragment.len());
    offset_position(original, offset)
}

/// Like [`calculate_position`] for interior sub-slices: every `RawPair`
/// fragment borrows from the original blob, so pointer arithmetic recovers
/// its byte offset even inside nested maps.
fn blob_position(original: &str, fragment: &str) -> (usize, usize) {
    let offset = fragment.as_ptr() as usize - original.as_ptr() as usize;
    offset_position(original, offset)
}

fn offset_position(original: &str, offset: usize) -> (usize, usize) {
    let consumed_input = &original[..offset.min(original.len())];
    let line = consumed_input.matches('\n').count() + 1;
    let column = consumed_input
        .rfind('\n')
        .map(|pos| offset - pos)
        .unwrap_or(offset + 1);
    (line, column)
}

fn format_verbose_error(err: &VerboseError<&str>) -> String {
    let mut parts = Vec::new();
    for (input, kind) in &err.errors {
        match kind {
            VerboseErrorKind::Context(ctx) => parts.push(format!("in {ctx}")),
            VerboseErrorKind::Char(c) => {
                let preview: String = input.chars().take(20).collect();
                parts.push(format!("expected '{c}' near \"{preview}\""));
            }
            VerboseErrorKind::Nom(kind) => parts.push(format!("{kind:?}")),
        }
    }
    if parts.is_empty() {
        "unknown parse error".to_owned()
    } else {
        parts.join(", ")
    }
}

// ============================================================================
// Interpretation
// ============================================================================

fn scalar_number(raw: &RawValue) -> Option<f32> {
    match raw {
        RawValue::Scalar(s) => s.parse().ok(),
        RawValue::Map(_) => None,
    }
}

fn scalar_bool(raw: &RawValue) -> Option<bool> {
    match raw {
        RawValue::Scalar("true") => Some(true),
        RawValue::Scalar("false") => Some(false),
        _ => None,
    }
}

fn property_value(raw: &RawValue) -> Option<PropertyValue> {
    match raw {
        RawValue::Scalar(s) => Some(
            s.parse::<f32>()
                .map(PropertyValue::Number)
                .unwrap_or_else(|_| PropertyValue::Text((*s).to_owned())),
        ),
        RawValue::Map(_) => None,
    }
}

/// Parse an inline configuration blob.
///
/// Never fails hard: syntax errors yield a default [`InlineConfig`] plus an
/// error diagnostic; recognized keys with bad values and unknown keys yield
/// warnings and are ignored.
pub fn parse_inline_config(input: &str) -> ConfigParseResult {
    let trimmed_empty = input.trim().is_empty();
    if trimmed_empty {
        return ConfigParseResult {
            config: InlineConfig::default(),
            diagnostics: Vec::new(),
        };
    }

    let pairs = match blob(input).finish() {
        Ok((_, pairs)) => pairs,
        Err(err) => {
            let (line, column) = err
                .errors
                .first()
                .map(|(frag, _)| calculate_position(input, frag))
                .unwrap_or((1, 1));
            return ConfigParseResult {
                config: InlineConfig::default(),
                diagnostics: vec![ConfigDiagnostic {
                    severity: Severity::Error,
                    message: format_verbose_error(&err),
                    line,
                    column,
                }],
            };
        }
    };

    let mut config = InlineConfig::default();
    let mut diagnostics = Vec::new();

    for pair in &pairs {
        let (line, column) = blob_position(input, pair.fragment);
        match pair.key {
            "offset" => match scalar_number(&pair.value) {
                Some(offset) => config.offset = Some(offset),
                None => diagnostics.push(ConfigDiagnostic {
                    severity: Severity::Warning,
                    message: "'offset' must be a number (ignored)".to_owned(),
                    line,
                    column,
                }),
            },
            "horizontal" => match scalar_bool(&pair.value) {
                Some(horizontal) => config.horizontal = Some(horizontal),
                None => diagnostics.push(ConfigDiagnostic {
                    severity: Severity::Warning,
                    message: "'horizontal' must be true or false (ignored)".to_owned(),
                    line,
                    column,
                }),
            },
            "properties" => match &pair.value {
                RawValue::Map(entries) => {
                    let mut properties = PropertyMap::new();
                    for entry in entries {
                        match property_value(&entry.value) {
                            Some(value) => {
                                properties.insert(entry.key.to_owned(), value);
                            }
                            None => {
                                let (line, column) = blob_position(input, entry.fragment);
                                diagnostics.push(ConfigDiagnostic {
                                    severity: Severity::Warning,
                                    message: format!(
                                        "property '{}' must be a number or string (ignored)",
                                        entry.key
                                    ),
                                    line,
                                    column,
                                });
                            }
                        }
                    }
                    config.properties = Some(properties);
                }
                RawValue::Scalar(_) => diagnostics.push(ConfigDiagnostic {
                    severity: Severity::Warning,
                    message: "'properties' must be a map (ignored)".to_owned(),
                    line,
                    column,
                }),
            },
            unknown => diagnostics.push(ConfigDiagnostic {
                severity: Severity::Warning,
                message: format!("unknown key '{unknown}' (ignored)"),
                line,
                column,
            }),
        }
    }

    ConfigParseResult {
        config,
        diagnostics,
    }
}
