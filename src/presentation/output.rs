//! Output Rendering
//!
//! Provides a unified interface for rendering output to different formats.
//! Renderers return strings; the command layer decides where they go.

use std::fmt::Write as _;
use std::path::Path;

use is_terminal::IsTerminal;
use serde_json::json;

use crate::application::ReconcileResult;
use crate::domain::entities::Label;
use crate::domain::ports::{ResourceMap, ValidationReport};
use crate::domain::services::{Action, Diff, ResourceChange};

/// Output format for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

/// Icons for output rendering
struct Icons {
    check: &'static str,
    cross: &'static str,
    warn: &'static str,
    create: &'static str,
    update: &'static str,
    delete: &'static str,
}

impl Icons {
    fn unicode() -> Self {
        Self {
            check: "✓",
            cross: "✗",
            warn: "⚠",
            create: "+",
            update: "~",
            delete: "-",
        }
    }

    fn ascii() -> Self {
        Self {
            check: "[OK]",
            cross: "[FAIL]",
            warn: "[!]",
            create: "+",
            update: "~",
            delete: "-",
        }
    }

    fn action(&self, action: Action) -> &'static str {
        match action {
            Action::Create => self.create,
            Action::Update => self.update,
            Action::Delete => self.delete,
        }
    }
}

/// Renders command results
pub trait Renderer {
    fn reconcile(&self, instance_id: &str, result: &ReconcileResult) -> String;

    fn diff(&self, instance_id: &str, diff: &Diff) -> String;

    fn validation(&self, source: &Path, report: &ValidationReport) -> String;

    fn resources(&self, instance_id: &str, resources: &ResourceMap) -> String;

    fn instances(&self, instance_ids: &[String]) -> String;

    fn status(&self, label: &Label) -> String;

    fn types(&self, names: &[String]) -> String;
}

/// Text renderer
pub struct TextRenderer {
    /// Whether to use unicode
    pub unicode: bool,
    /// Verbosity level
    pub verbose: u8,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            unicode: true,
            verbose: 0,
        }
    }
}

impl TextRenderer {
    fn icons(&self) -> Icons {
        if self.unicode {
            Icons::unicode()
        } else {
            Icons::ascii()
        }
    }

    fn change_line(&self, icons: &Icons, change: &ResourceChange) -> String {
        let mut line = format!(
            "    {} {} {}",
            icons.action(change.action),
            change.kind,
            change.id
        );
        if !change.changes.is_empty() {
            let _ = write!(line, " ({})", change.changes.join(", "));
        }
        if self.verbose > 0 {
            for (key, new) in &change.new_metadata {
                match change.old_metadata.get(key) {
                    Some(old) => {
                        let _ = write!(line, "\n        {key}: {old} → {new}");
                    }
                    None => {
                        let _ = write!(line, "\n        {key}: {new}");
                    }
                }
            }
        }
        line
    }
}

impl Renderer for TextRenderer {
    fn reconcile(&self, instance_id: &str, result: &ReconcileResult) -> String {
        let icons = self.icons();
        let mut out = String::new();

        let headline = match (result.is_success(), result.dry_run, result.has_changes()) {
            (false, _, _) => format!("{} Reconcile finished with errors [{instance_id}]", icons.cross),
            (true, true, _) => format!("{} Dry run [{instance_id}] (nothing written)", icons.check),
            (true, false, false) => format!("{} Already up-to-date [{instance_id}]", icons.check),
            (true, false, true) => format!("{} Reconcile complete [{instance_id}]", icons.check),
        };
        let _ = writeln!(out, "{headline}");
        let _ = writeln!(out);
        let _ = writeln!(out, "  created:   {}", result.created);
        let _ = writeln!(out, "  updated:   {}", result.updated);
        let _ = writeln!(out, "  deleted:   {}", result.deleted);
        let _ = writeln!(out, "  unchanged: {}", result.unchanged);

        if !result.errors.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "  Errors ({}):", result.errors.len());
            for error in &result.errors {
                let _ = writeln!(out, "    {} {}", icons.cross, error);
            }
        }
        out
    }

    fn diff(&self, instance_id: &str, diff: &Diff) -> String {
        let icons = self.icons();
        let mut out = String::new();

        if diff.is_empty() {
            let _ = writeln!(out, "{} No changes [{instance_id}]", icons.check);
            return out;
        }

        let _ = writeln!(
            out,
            "Plan [{instance_id}]: {} to create, {} to update, {} to delete",
            diff.to_create.len(),
            diff.to_update.len(),
            diff.to_delete.len()
        );
        for (title, changes) in [
            ("Create", &diff.to_create),
            ("Update", &diff.to_update),
            ("Delete", &diff.to_delete),
        ] {
            if changes.is_empty() {
                continue;
            }
            let _ = writeln!(out);
            let _ = writeln!(out, "  {title} ({}):", changes.len());
            for change in changes {
                let _ = writeln!(out, "{}", self.change_line(&icons, change));
            }
        }
        out
    }

    fn validation(&self, source: &Path, report: &ValidationReport) -> String {
        let icons = self.icons();
        let mut out = String::new();

        if report.is_valid() {
            let _ = writeln!(out, "{} {} is valid", icons.check, source.display());
        } else {
            let _ = writeln!(
                out,
                "{} {} has {} error(s)",
                icons.cross,
                source.display(),
                report.errors.len()
            );
            for issue in &report.errors {
                let _ = writeln!(out, "    {} {}", icons.cross, issue);
            }
        }
        for issue in &report.warnings {
            let _ = writeln!(out, "    {} {}", icons.warn, issue);
        }
        out
    }

    fn resources(&self, instance_id: &str, resources: &ResourceMap) -> String {
        let mut out = String::new();
        if resources.is_empty() {
            let _ = writeln!(out, "No resources recorded for [{instance_id}]");
            return out;
        }

        let width = resources.keys().map(String::len).max().unwrap_or(0);
        let _ = writeln!(out, "Resources [{instance_id}] ({}):", resources.len());
        for resource in resources.values() {
            let _ = write!(
                out,
                "  {:width$}  {:9}  {}",
                resource.id,
                resource.kind.as_str(),
                resource.status.as_str(),
            );
            if self.verbose > 0 {
                let _ = write!(out, "  updated {}", resource.updated_at.to_rfc3339());
            }
            let _ = writeln!(out);
        }
        out
    }

    fn instances(&self, instance_ids: &[String]) -> String {
        if instance_ids.is_empty() {
            return "No instances found\n".to_string();
        }
        instance_ids.iter().map(|id| format!("{id}\n")).collect()
    }

    fn status(&self, label: &Label) -> String {
        format!(
            "Instance: {}\nModel:    {}\nState:    {}\nUpdated:  {}\n",
            label.instance_id,
            label.model_id,
            label.state,
            label.updated_at.to_rfc3339()
        )
    }

    fn types(&self, names: &[String]) -> String {
        names.iter().map(|name| format!("{name}\n")).collect()
    }
}

/// JSON renderer
pub struct JsonRenderer;

impl JsonRenderer {
    fn pretty(value: &serde_json::Value) -> String {
        let mut out = serde_json::to_string_pretty(value).unwrap_or_default();
        out.push('\n');
        out
    }
}

impl Renderer for JsonRenderer {
    fn reconcile(&self, instance_id: &str, result: &ReconcileResult) -> String {
        Self::pretty(&json!({
            "instance": instance_id,
            "success": result.is_success(),
            "result": result,
        }))
    }

    fn diff(&self, instance_id: &str, diff: &Diff) -> String {
        Self::pretty(&json!({
            "instance": instance_id,
            "empty": diff.is_empty(),
            "diff": diff,
        }))
    }

    fn validation(&self, source: &Path, report: &ValidationReport) -> String {
        Self::pretty(&json!({
            "file": source.display().to_string(),
            "valid": report.is_valid(),
            "errors": report.errors,
            "warnings": report.warnings,
        }))
    }

    fn resources(&self, instance_id: &str, resources: &ResourceMap) -> String {
        Self::pretty(&json!({
            "instance": instance_id,
            "resources": resources,
        }))
    }

    fn instances(&self, instance_ids: &[String]) -> String {
        Self::pretty(&json!({ "instances": instance_ids }))
    }

    fn status(&self, label: &Label) -> String {
        Self::pretty(&json!(label))
    }

    fn types(&self, names: &[String]) -> String {
        Self::pretty(&json!({ "types": names }))
    }
}

/// Create a renderer based on format
pub fn create_renderer(format: OutputFormat, unicode: bool, verbose: u8) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Text => Box::new(TextRenderer { unicode, verbose }),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}

/// Unicode icons only on an interactive, non-dumb terminal.
pub fn supports_unicode() -> bool {
    std::io::stdout().is_terminal() && std::env::var("TERM").map_or(true, |t| t != "dumb")
}
