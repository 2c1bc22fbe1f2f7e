//! Litchi Chart - OOXML chart and extended-properties model for spreadsheet files
//!
//! This library reads and writes the chart parts (`xl/charts/chartN.xml`)
//! and the extended document properties (`docProps/app.xml`) of Office Open
//! XML spreadsheets. Callers describe charts with a compact model (series,
//! axes, legend, styling) instead of authoring DrawingML by hand.
//!
//! # Features
//!
//! - **Schema tree**: order-preserving typed mirror of the chart schema with
//!   three-state optional values
//! - **Public model**: 34 chart types over 15 plot-area containers, configurable
//!   from YAML through serde
//! - **Transforms**: `encode`/`decode` between model and tree, driven by a
//!   static chart-kind table
//! - **Extended properties**: lossless `docProps/app.xml` handling
//!
//! # Example - Writing and reading a chart
//!
//! ```
//! use litchi_chart::ooxml::charts::{
//!     Chart, ChartSeries, ChartType, EncodeContext, StaticDataProvider, encode, decode,
//! };
//! use litchi_chart::ooxml::charts::schema::ChartSpace;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = StaticDataProvider::new()
//!     .with("Sheet1!$A$2:$A$3", ["Apples", "Pears"])
//!     .with("Sheet1!$B$2:$B$3", ["4", "7"]);
//! let chart = Chart::new(ChartType::Pie)
//!     .with_title("Fruit")
//!     .with_series(ChartSeries::new("Sheet1!$B$1", "Sheet1!$A$2:$A$3", "Sheet1!$B$2:$B$3"));
//!
//! let bytes = encode(&chart, &EncodeContext::new(&provider))?.to_bytes();
//! let loaded = decode(&ChartSpace::from_bytes(&bytes)?)?;
//! assert_eq!(loaded.title[0].text, "Fruit");
//! assert_eq!(loaded.series[0].cache.categories[1].value, "Pears");
//! # Ok(())
//! # }
//! ```

/// Shared XML mechanics
pub mod common;

/// OOXML chart and properties parts
pub mod ooxml;

// Re-export commonly used types for convenience
pub use ooxml::charts::{Chart, ChartSeries, ChartType};
pub use ooxml::{AppProperties, OoxmlError, Result};
