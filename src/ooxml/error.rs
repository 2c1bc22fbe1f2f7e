/// Error types for chart and properties operations.
use thiserror::Error;

/// Result type for chart and properties operations.
pub type Result<T> = std::result::Result<T, OoxmlError>;

/// Error types for chart and properties operations.
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// Chart kind name not in the supported catalogue
    #[error("Unsupported chart type: {0}")]
    UnsupportedChartType(String),

    /// A series data range could not be resolved against the worksheet
    #[error("Cannot resolve series range '{formula}': {reason}")]
    SeriesResolution { formula: String, reason: String },

    /// More axes of one orientation than a plot area can hold
    #[error("Too many {orientation} axes: {count} (at most {limit})")]
    AxisLimitExceeded {
        orientation: &'static str,
        count: usize,
        limit: usize,
    },

    /// Plot area does not hold exactly one chart-kind container
    #[error("Malformed chart tree: {0}")]
    MalformedChartTree(String),

    /// An axis ID referenced by a chart group or axis has no matching axis
    #[error("Unresolved axis reference {axis_id} in {context}")]
    AxisReferenceUnresolved { axis_id: u32, context: String },

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Part not found
    #[error("Part not found: {0}")]
    PartNotFound(String),

    /// Invalid format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for OoxmlError {
    fn from(err: quick_xml::Error) -> Self {
        OoxmlError::Xml(err.to_string())
    }
}
