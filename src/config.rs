//! Grid and backend configuration.
//!
//! Both structs deserialize from camelCase JSON with every field defaulted, so
//! the host page only needs to pass the values it wants to change.

use serde::{Deserialize, Serialize};

use crate::error::{Result, XlgridError};

pub const DEFAULT_CELL_WIDTH: f32 = 100.0;
pub const DEFAULT_CELL_HEIGHT: f32 = 24.0;
pub const DEFAULT_OVERSCAN: u32 = 3;
pub const DEFAULT_MAX_ROWS: u32 = 100_000;
pub const DEFAULT_MAX_COLS: u32 = 1_000;

/// Layout and navigation settings for one grid instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Fixed cell width in CSS pixels.
    pub cell_width: f32,
    /// Fixed cell height in CSS pixels.
    pub cell_height: f32,
    /// Extra rows/cols rendered beyond the viewport on each axis.
    pub overscan: u32,
    /// Hard upper bound on addressable rows.
    pub max_rows: u32,
    /// Hard upper bound on addressable columns.
    pub max_cols: u32,
    /// Rows materialized before any growth.
    pub initial_rows: u32,
    /// Columns materialized before any growth.
    pub initial_cols: u32,
    /// Rows added per growth step.
    pub row_growth_batch: u32,
    /// Columns added per growth step.
    pub col_growth_batch: u32,
    /// Distance (in cells) from the materialized edge that triggers growth.
    pub growth_margin: u32,
    /// Rows moved by PageUp/PageDown.
    pub page_rows: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
            max_rows: DEFAULT_MAX_ROWS,
            max_cols: DEFAULT_MAX_COLS,
            initial_rows: 100,
            initial_cols: 26,
            row_growth_batch: 30,
            col_growth_batch: 10,
            growth_margin: 5,
            page_rows: 20,
        }
    }
}

impl GridConfig {
    /// Parse from JSON text and validate.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// Returns [`XlgridError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !(self.cell_width.is_finite() && self.cell_width > 0.0) {
            return Err(XlgridError::Config(format!(
                "cellWidth must be positive, got {}",
                self.cell_width
            )));
        }
        if !(self.cell_height.is_finite() && self.cell_height > 0.0) {
            return Err(XlgridError::Config(format!(
                "cellHeight must be positive, got {}",
                self.cell_height
            )));
        }
        if self.max_rows == 0 || self.max_cols == 0 {
            return Err(XlgridError::Config(
                "maxRows and maxCols must be non-zero".into(),
            ));
        }
        if self.initial_rows == 0 || self.initial_cols == 0 {
            return Err(XlgridError::Config(
                "initialRows and initialCols must be non-zero".into(),
            ));
        }
        if self.initial_rows > self.max_rows || self.initial_cols > self.max_cols {
            return Err(XlgridError::Config(
                "initial bounds exceed maxRows/maxCols".into(),
            ));
        }
        if self.row_growth_batch == 0 || self.col_growth_batch == 0 {
            return Err(XlgridError::Config("growth batches must be non-zero".into()));
        }
        Ok(())
    }
}

/// Where and how the grid talks to its backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackendConfig {
    /// Base URL of the backend, without trailing slash.
    pub base_url: String,
    /// Workbook every request is scoped to.
    pub workbook_id: String,
    /// Re-fetch the whole sheet after each successful commit.
    pub refresh_after_commit: bool,
    /// Request timeout (native builds only; the browser owns fetch timeouts).
    pub timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            workbook_id: String::new(),
            refresh_after_commit: true,
            timeout_ms: 30_000,
        }
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>, workbook_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            workbook_id: workbook_id.into(),
            ..Self::default()
        }
    }

    /// Parse from JSON text and validate.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed or a required field is empty.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns [`XlgridError::Config`] when `baseUrl` or `workbookId` is empty.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(XlgridError::Config("baseUrl is required".into()));
        }
        if self.workbook_id.trim().is_empty() {
            return Err(XlgridError::Config("workbookId is required".into()));
        }
        Ok(())
    }

    /// Base URL with any trailing slash removed.
    pub fn api_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GridConfig::from_json(r#"{"cellHeight": 20, "overscan": 5}"#).unwrap();
        assert_eq!(config.cell_height, 20.0);
        assert_eq!(config.overscan, 5);
        assert_eq!(config.cell_width, DEFAULT_CELL_WIDTH);
        assert_eq!(config.max_rows, DEFAULT_MAX_ROWS);
    }

    #[test]
    fn test_zero_cell_width_rejected() {
        let err = GridConfig::from_json(r#"{"cellWidth": 0}"#).unwrap_err();
        assert!(matches!(err, XlgridError::Config(_)));
    }

    #[test]
    fn test_initial_above_max_rejected() {
        let config = GridConfig {
            initial_rows: 10,
            max_rows: 5,
            ..GridConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backend_requires_workbook() {
        let err = BackendConfig::from_json(r#"{"baseUrl": "http://localhost:8000"}"#).unwrap_err();
        assert!(err.to_string().contains("workbookId"));
    }

    #[test]
    fn test_api_base_trims_slash() {
        let config = BackendConfig::new("http://localhost:8000/", "wb-1");
        assert_eq!(config.api_base(), "http://localhost:8000");
        assert!(config.refresh_after_commit);
    }
}
