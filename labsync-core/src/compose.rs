//! HTML body, subject and attachment naming for the two notification flows.
//!
//! Rendering goes through a single [`TemplateEngine`] built once at start-up
//! and shared read-only (`Arc`) by every tenant pipeline.

use std::path::Path;
use std::sync::Arc;

use handlebars::Handlebars;
use serde::Serialize;

use crate::{ComposedNotification, DateInterval, LabsyncError, ReportFlow, ResultSummaryRow};

const SUMMARY_SOURCE: &str = include_str!("../templates/summary.hbs");
const NO_RESULTS_SOURCE: &str = include_str!("../templates/no_results.hbs");

/// Immutable, thread-safe template registry holding the `summary` and
/// `no_results` templates.
#[derive(Debug)]
pub struct TemplateEngine {
    registry: Handlebars<'static>,
}

impl TemplateEngine {
    /// Name of the standard-flow template.
    pub const SUMMARY: &'static str = "summary";
    /// Name of the no-results template.
    pub const NO_RESULTS: &'static str = "no_results";

    /// Engine with the built-in templates.
    ///
    /// # Errors
    /// Returns `Render` if a built-in template fails to compile.
    pub fn builtin() -> Result<Self, LabsyncError> {
        let mut registry = strict_registry();
        register_source(&mut registry, Self::SUMMARY, SUMMARY_SOURCE)?;
        register_source(&mut registry, Self::NO_RESULTS, NO_RESULTS_SOURCE)?;
        Ok(Self { registry })
    }

    /// Engine that prefers `<dir>/summary.hbs` and `<dir>/no_results.hbs`,
    /// falling back to the built-in template for any file that is absent.
    ///
    /// # Errors
    /// Returns `Render` if a template file exists but cannot be read or compiled.
    pub fn from_dir(dir: &Path) -> Result<Self, LabsyncError> {
        let mut registry = strict_registry();
        for (name, builtin) in [
            (Self::SUMMARY, SUMMARY_SOURCE),
            (Self::NO_RESULTS, NO_RESULTS_SOURCE),
        ] {
            let path = dir.join(format!("{name}.hbs"));
            if path.is_file() {
                registry
                    .register_template_file(name, &path)
                    .map_err(|e| LabsyncError::render(name, e.to_string()))?;
            } else {
                register_source(&mut registry, name, builtin)?;
            }
        }
        Ok(Self { registry })
    }

    /// Render a registered template.
    ///
    /// # Errors
    /// Returns `Render` for unknown templates, missing context fields or
    /// helper failures.
    pub fn render<T: Serialize>(&self, name: &str, ctx: &T) -> Result<String, LabsyncError> {
        self.registry
            .render(name, ctx)
            .map_err(|e| LabsyncError::render(name, e.to_string()))
    }
}

fn strict_registry() -> Handlebars<'static> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry
}

fn register_source(
    registry: &mut Handlebars<'static>,
    name: &str,
    source: &str,
) -> Result<(), LabsyncError> {
    registry
        .register_template_string(name, source)
        .map_err(|e| LabsyncError::render(name, e.to_string()))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryContext<'a> {
    from_date: String,
    to_date: String,
    viral_loaders: &'a [ResultSummaryRow],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NoResultsContext {
    from_date: String,
    to_date: String,
}

/// Localized subject line for an interval.
#[must_use]
pub fn subject(interval: &DateInterval) -> String {
    format!(
        "Relatório de Sincronização de resultados lab de {} a {}",
        interval.formatted_start(),
        interval.formatted_end()
    )
}

/// Upper-cased tenant name usable as a single path component.
///
/// Characters other than letters, digits, `-` and `_` become `_`, so a
/// name such as `FGH/Echo` or `../x` stays inside its parent directory.
#[must_use]
pub fn file_segment(tenant: &str) -> String {
    let segment: String = tenant
        .to_uppercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if segment.is_empty() { "_".to_string() } else { segment }
}

/// `<prefix>_<TENANT>_<start>_a_<end>.xlsx` with dates as `dd-MM-yyyy`.
///
/// The tenant goes through [`file_segment`].
#[must_use]
pub fn attachment_name(prefix: &str, tenant: &str, interval: &DateInterval) -> String {
    format!(
        "{prefix}_{}_{}_a_{}.xlsx",
        file_segment(tenant),
        interval.formatted_start(),
        interval.formatted_end()
    )
}

/// Builds the [`ComposedNotification`] for either flow.
#[derive(Debug, Clone)]
pub struct Composer {
    engine: Arc<TemplateEngine>,
    attachment_prefix: String,
}

impl Composer {
    /// Create a composer over a shared engine.
    #[must_use]
    pub fn new(engine: Arc<TemplateEngine>, attachment_prefix: impl Into<String>) -> Self {
        Self {
            engine,
            attachment_prefix: attachment_prefix.into(),
        }
    }

    /// Standard flow: summary template, subject and attachment name.
    ///
    /// # Errors
    /// Returns `Render` if the summary template fails.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            target = "labsync::compose",
            skip(self, interval, summary),
            fields(rows = summary.len()),
        )
    )]
    pub fn standard(
        &self,
        tenant: &str,
        interval: &DateInterval,
        summary: &[ResultSummaryRow],
    ) -> Result<ComposedNotification, LabsyncError> {
        let ctx = SummaryContext {
            from_date: interval.formatted_start(),
            to_date: interval.formatted_end(),
            viral_loaders: summary,
        };
        Ok(ComposedNotification {
            flow: ReportFlow::Standard,
            subject: subject(interval),
            html_body: self.engine.render(TemplateEngine::SUMMARY, &ctx)?,
            attachment_name: Some(attachment_name(&self.attachment_prefix, tenant, interval)),
        })
    }

    /// No-results flow: no-results template and subject, no attachment.
    ///
    /// # Errors
    /// Returns `Render` if the no-results template fails.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(target = "labsync::compose", skip(self))
    )]
    pub fn no_results(&self, interval: &DateInterval) -> Result<ComposedNotification, LabsyncError> {
        let ctx = NoResultsContext {
            from_date: interval.formatted_start(),
            to_date: interval.formatted_end(),
        };
        Ok(ComposedNotification {
            flow: ReportFlow::NoResults,
            subject: subject(interval),
            html_body: self.engine.render(TemplateEngine::NO_RESULTS, &ctx)?,
            attachment_name: None,
        })
    }
}
