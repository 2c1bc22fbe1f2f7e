//! Office Open XML chart and extended-properties parts.
//!
//! # Architecture
//!
//! 1. **Package seam** (`package`): part bytes by name, independent of the
//!    archive format
//! 2. **Charts** (`charts`): the DrawingML chart schema tree, the public
//!    chart model and the transforms between them
//! 3. **Extended properties** (`app_properties`): `docProps/app.xml`
//!
//! # Example
//!
//! ```rust
//! use litchi_chart::ooxml::{AppProperties, MemoryPartStore, load_app_properties, save_app_properties};
//!
//! let mut store = MemoryPartStore::new();
//! save_app_properties(&mut store, &AppProperties::new().company("Contoso"))?;
//! assert_eq!(load_app_properties(&store)?.company.as_deref(), Some("Contoso"));
//! # Ok::<(), litchi_chart::ooxml::OoxmlError>(())
//! ```
pub mod app_properties;
pub mod charts;
pub mod error;
pub mod package;

pub use app_properties::{
    AppProperties, Properties, get_app_properties, load_app_properties, save_app_properties,
    set_app_properties,
};
pub use charts::{Chart, ChartSeries, ChartType, add_chart, load_chart, load_charts, save_chart};
pub use error::{OoxmlError, Result};
pub use package::{MemoryPartStore, PartStore};
