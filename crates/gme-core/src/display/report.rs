use crate::core::cascade::{CascadeAbort, CascadeMode, CascadeReport, DeletedAsset};
use crate::core::services::types::AssetKind;
use crate::error::{AppError, CliError, DisplayError};
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(CliError::InvalidArguments(format!(
                "Unknown output format '{}': expected 'table' or 'json'",
                other
            ))
            .into()),
        }
    }
}

#[derive(Serialize)]
struct AbortJson<'a> {
    status: &'static str,
    step: String,
    asset_id: &'a str,
    reason: String,
    deleted: &'a [DeletedAsset],
}

/// Renders cascade outcomes for the terminal
pub struct ReportDisplay {
    use_colors: bool,
}

impl ReportDisplay {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn bold_header(&self, text: &str) -> Cell {
        let cell = Cell::new(text).add_attribute(Attribute::Bold);
        if self.use_colors {
            cell.fg(Color::Cyan)
        } else {
            cell
        }
    }

    fn kind_cell(&self, kind: AssetKind) -> Cell {
        let cell = Cell::new(kind.to_string());
        if !self.use_colors {
            return cell;
        }
        match kind {
            AssetKind::Table => cell.fg(Color::Magenta),
            AssetKind::Layer => cell.fg(Color::Blue),
            AssetKind::Map => cell.fg(Color::Green),
        }
    }

    fn deleted_table(&self, deleted: &[DeletedAsset], status: &str) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec![
            self.bold_header("#"),
            self.bold_header("Kind"),
            self.bold_header("Asset ID"),
            self.bold_header("Status"),
        ]);

        for (index, asset) in deleted.iter().enumerate() {
            table.add_row(vec![
                Cell::new(index + 1),
                self.kind_cell(asset.kind),
                Cell::new(&asset.id),
                Cell::new(status),
            ]);
        }

        table
    }

    /// Table of everything the cascade removed, followed by a one-line summary.
    pub fn render_report(&self, report: &CascadeReport) -> String {
        let (status, verb) = match report.mode {
            CascadeMode::Execute => ("deleted", "Deleted"),
            CascadeMode::DryRun => ("would delete", "Would delete"),
        };

        let table = self.deleted_table(&report.deleted, status);
        format!(
            "{}\n{} table {}, {} layer(s) and {} map(s)",
            table,
            verb,
            report.table_id,
            report.count(AssetKind::Layer),
            report.count(AssetKind::Map)
        )
    }

    /// What was already removed when a cascade stopped.
    pub fn render_abort(&self, abort: &CascadeAbort) -> String {
        if abort.deleted.is_empty() {
            return "Nothing was deleted.".to_string();
        }

        let table = self.deleted_table(&abort.deleted, "deleted");
        format!(
            "The following {} asset(s) were deleted before the failure:\n{}",
            abort.deleted.len(),
            table
        )
    }

    pub fn report_json(&self, report: &CascadeReport) -> Result<String, AppError> {
        serde_json::to_string_pretty(report)
            .map_err(|e| DisplayError::Serialization(e.to_string()).into())
    }

    pub fn abort_json(&self, abort: &CascadeAbort) -> Result<String, AppError> {
        let body = AbortJson {
            status: "aborted",
            step: abort.step.to_string(),
            asset_id: abort.error.asset_id(),
            reason: abort.error.to_string(),
            deleted: &abort.deleted,
        };
        serde_json::to_string_pretty(&body)
            .map_err(|e| DisplayError::Serialization(e.to_string()).into())
    }
}

impl Default for ReportDisplay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cascade::CascadeStep;
    use crate::error::CascadeError;

    fn asset(id: &str, kind: AssetKind) -> DeletedAsset {
        DeletedAsset {
            id: id.to_string(),
            kind,
        }
    }

    fn sample_report(mode: CascadeMode) -> CascadeReport {
        CascadeReport {
            table_id: "T1".to_string(),
            mode,
            layer_ids: vec!["L1".to_string()],
            deleted: vec![
                asset("M1", AssetKind::Map),
                asset("L1", AssetKind::Layer),
                asset("T1", AssetKind::Table),
            ],
        }
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_report() {
        let display = ReportDisplay::new().with_colors(false);
        let output = display.render_report(&sample_report(CascadeMode::Execute));

        assert!(output.contains("Asset ID"));
        assert!(output.contains("M1"));
        assert!(output.contains("Deleted table T1, 1 layer(s) and 1 map(s)"));

        let output = display.render_report(&sample_report(CascadeMode::DryRun));
        assert!(output.contains("would delete"));
        assert!(output.contains("Would delete table T1"));
    }

    #[test]
    fn test_render_abort() {
        let display = ReportDisplay::new().with_colors(false);
        let mut abort = CascadeAbort {
            step: CascadeStep::DeleteTable,
            error: CascadeError::DeleteFailed {
                asset_id: "T1".to_string(),
                kind: AssetKind::Table,
                source: crate::error::ApiError::Http {
                    status: 500,
                    endpoint: "/tables/T1/delete".to_string(),
                    message: "Backend Error".to_string(),
                },
            },
            deleted: vec![asset("L1", AssetKind::Layer)],
        };

        let output = display.render_abort(&abort);
        assert!(output.contains("1 asset(s) were deleted"));
        assert!(output.contains("L1"));

        let json: serde_json::Value =
            serde_json::from_str(&display.abort_json(&abort).unwrap()).unwrap();
        assert_eq!(json["status"], "aborted");
        assert_eq!(json["step"], "table deletion");
        assert_eq!(json["asset_id"], "T1");
        assert_eq!(json["deleted"][0]["id"], "L1");

        abort.deleted.clear();
        assert_eq!(display.render_abort(&abort), "Nothing was deleted.");
    }

    #[test]
    fn test_report_json() {
        let display = ReportDisplay::new();
        let json: serde_json::Value = serde_json::from_str(
            &display
                .report_json(&sample_report(CascadeMode::DryRun))
                .unwrap(),
        )
        .unwrap();
        assert_eq!(json["mode"], "dry_run");
        assert_eq!(json["deleted"].as_array().unwrap().len(), 3);
    }
}
