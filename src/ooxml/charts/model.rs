//! Public chart model.
//!
//! This is the configuration surface callers build charts with. It hides
//! axis IDs, container selection and cache bookkeeping; [`super::encode`]
//! and [`super::decode`] translate it to and from the schema tree.
//!
//! Every type is serde-enabled with field defaults, so a chart can be
//! described in YAML:
//!
//! ```
//! use litchi_chart::ooxml::charts::{Chart, ChartType};
//!
//! let chart = Chart::from_yaml(
//!     "chart_type: col\nseries:\n  - name: Sheet1!$A$2\n    values: Sheet1!$B$2:$D$2\n",
//! )
//! .unwrap();
//! assert_eq!(chart.chart_type, ChartType::Col);
//! assert_eq!(chart.gap_width, 150);
//! ```

use crate::ooxml::charts::types::{
    ChartType, DataLabelPosition, LegendPosition, LineType, MarkerSymbol, ScatterStyle,
    ShowBlanksAs,
};
use crate::ooxml::error::{OoxmlError, Result};
use serde::{Deserialize, Serialize};

/// Schema default of `bubbleScale`.
pub const DEFAULT_BUBBLE_SCALE: u32 = 100;
/// Schema default of `holeSize`.
pub const DEFAULT_HOLE_SIZE: u32 = 10;
/// Schema default of `gapWidth`.
pub const DEFAULT_GAP_WIDTH: u32 = 150;

/// A chart as callers describe it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Chart {
    /// Chart type
    pub chart_type: ChartType,
    /// Data series
    pub series: Vec<ChartSeries>,
    /// Title runs; empty means no title
    pub title: Vec<RichTextRun>,
    /// Whether the automatic title is suppressed
    pub auto_title_deleted: bool,
    /// Legend settings
    pub legend: ChartLegend,
    /// Vary colours by point; `None` leaves it to the application
    pub vary_colors: Option<bool>,
    /// Horizontal (category or X) axis
    pub x_axis: ChartAxis,
    /// Vertical (value or Y) axis
    pub y_axis: ChartAxis,
    /// Plot-area data label settings
    pub plot_area: ChartPlotArea,
    /// Chart area border
    pub border: ChartLine,
    /// How blank cells are plotted
    pub show_blanks_as: ShowBlanksAs,
    /// Bubble scale in percent (bubble charts)
    pub bubble_size: u32,
    /// Hole size in percent (doughnut charts)
    pub hole_size: u32,
    /// Gap between bar clusters in percent (bar, column and of-pie charts)
    pub gap_width: u32,
    /// Bar overlap in percent, -100 to 100 (2-D bar and column charts)
    pub overlap: i32,
    /// Angle of the first slice in degrees (pie and doughnut charts)
    pub first_slice_angle: u32,
    /// Scatter drawing style (scatter charts)
    pub scatter_style: ScatterStyle,
}

impl Chart {
    /// Create an empty chart of the given type.
    #[inline]
    pub fn new(chart_type: ChartType) -> Self {
        Self {
            chart_type,
            series: Vec::new(),
            title: Vec::new(),
            auto_title_deleted: false,
            legend: ChartLegend::default(),
            vary_colors: None,
            x_axis: ChartAxis::default(),
            y_axis: ChartAxis::default(),
            plot_area: ChartPlotArea::default(),
            border: ChartLine::default(),
            show_blanks_as: ShowBlanksAs::default(),
            bubble_size: DEFAULT_BUBBLE_SCALE,
            hole_size: DEFAULT_HOLE_SIZE,
            gap_width: DEFAULT_GAP_WIDTH,
            overlap: 0,
            first_slice_angle: 0,
            scatter_style: ScatterStyle::default(),
        }
    }

    /// Add a series.
    #[inline]
    pub fn with_series(mut self, series: ChartSeries) -> Self {
        self.series.push(series);
        self
    }

    /// Set a plain-text title.
    #[inline]
    pub fn with_title(mut self, text: impl Into<String>) -> Self {
        self.title = vec![RichTextRun::new(text)];
        self
    }

    /// Set the legend position.
    #[inline]
    pub fn with_legend(mut self, position: LegendPosition) -> Self {
        self.legend.position = position;
        self
    }

    /// Parse a chart description from YAML.
    ///
    /// An unknown `chart_type` fails with [`OoxmlError::UnsupportedChartType`].
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        fn invalid(e: impl std::fmt::Display) -> OoxmlError {
            OoxmlError::InvalidFormat(format!("Invalid chart YAML: {}", e))
        }
        let kind: ChartKindTag = serde_saphyr::from_str(yaml).map_err(invalid)?;
        if let Some(tag) = kind.chart_type {
            tag.parse::<ChartType>()?;
        }
        serde_saphyr::from_str(yaml).map_err(invalid)
    }

    /// Render the chart description as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self)
            .map_err(|e| OoxmlError::InvalidFormat(format!("Failed to serialize chart: {}", e)))
    }
}

/// Just the type tag of a chart description, read before the full model.
#[derive(Deserialize)]
struct ChartKindTag {
    #[serde(default)]
    chart_type: Option<String>,
}

impl Default for Chart {
    #[inline]
    fn default() -> Self {
        Self::new(ChartType::default())
    }
}

/// One data series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSeries {
    /// Formula of the series name cell, e.g. `Sheet1!$A$2`
    pub name: String,
    /// Formula of the category (or X value) range
    pub categories: String,
    /// Formula of the value (or Y value) range
    pub values: String,
    /// Formula of the bubble size range (bubble charts)
    pub sizes: String,
    /// Solid fill colour as `RRGGBB`
    pub fill: Option<String>,
    /// Series line
    pub line: ChartLine,
    /// Point marker (line, scatter and radar charts)
    pub marker: ChartMarker,
    /// Data label position; must be valid for the chart type
    pub data_label_position: Option<DataLabelPosition>,
    /// Values cached in the chart part. Filled on load, rebuilt on save.
    pub cache: SeriesCache,
}

impl ChartSeries {
    /// Create a series from its name, category and value formulas.
    #[inline]
    pub fn new(
        name: impl Into<String>,
        categories: impl Into<String>,
        values: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            categories: categories.into(),
            values: values.into(),
            ..Default::default()
        }
    }

    /// Set the bubble size formula.
    #[inline]
    pub fn with_sizes(mut self, sizes: impl Into<String>) -> Self {
        self.sizes = sizes.into();
        self
    }

    /// Set the fill colour.
    #[inline]
    pub fn with_fill(mut self, rgb: impl Into<String>) -> Self {
        self.fill = Some(rgb.into());
        self
    }
}

/// Cached points of one series, as stored in the chart part.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesCache {
    pub categories: Vec<CachedPoint>,
    pub values: Vec<CachedPoint>,
    pub sizes: Vec<CachedPoint>,
}

/// One cached value with its 0-based point index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CachedPoint {
    pub index: u32,
    pub value: String,
}

impl CachedPoint {
    #[inline]
    pub fn new(index: u32, value: impl Into<String>) -> Self {
        Self {
            index,
            value: value.into(),
        }
    }
}

/// Line settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLine {
    pub line_type: LineType,
    /// Smoothed line (line and scatter series)
    pub smooth: bool,
    /// Width in points; zero leaves the width unspecified
    pub width: f64,
}

/// Marker settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartMarker {
    pub symbol: Option<MarkerSymbol>,
    /// Marker size in points, 2 to 72
    pub size: Option<u32>,
}

/// Legend settings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLegend {
    pub position: LegendPosition,
    pub show_legend_key: bool,
}

/// Number format of an axis or data labels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartNumFmt {
    /// Format code; empty means the default format
    pub custom_num_fmt: String,
    /// Follow the source cells' format
    pub source_linked: bool,
}

/// Axis settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartAxis {
    /// Hide the axis
    pub none: bool,
    pub major_grid_lines: bool,
    pub minor_grid_lines: bool,
    /// Distance between major ticks (value axes)
    pub major_unit: Option<f64>,
    /// Show every n-th tick label (category axes)
    pub tick_label_skip: Option<u32>,
    /// Plot from maximum to minimum
    pub reverse_order: bool,
    /// Place the axis on the far side of the plot area
    pub secondary: bool,
    pub maximum: Option<f64>,
    pub minimum: Option<f64>,
    /// Tick label font
    pub font: Font,
    /// Logarithmic base, 2 to 1000
    pub log_base: Option<f64>,
    pub num_fmt: ChartNumFmt,
    /// Axis title runs; empty means no title
    pub title: Vec<RichTextRun>,
}

/// Data label settings of the plot area.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartPlotArea {
    /// Number of values in the second plot (pie-of-pie and bar-of-pie)
    pub second_plot_values: u32,
    pub show_bubble_size: bool,
    pub show_cat_name: bool,
    pub show_leader_lines: bool,
    pub show_percent: bool,
    pub show_ser_name: bool,
    pub show_val: bool,
    pub num_fmt: ChartNumFmt,
}

/// Character formatting of a title run or tick labels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Font {
    pub bold: bool,
    pub italic: bool,
    /// Underline style such as `sng` or `dbl`
    pub underline: Option<String>,
    pub strike: bool,
    /// Typeface name
    pub family: Option<String>,
    /// Size in points
    pub size: Option<f64>,
    /// Colour as `RRGGBB`
    pub color: Option<String>,
}

/// A run of title text with optional formatting.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RichTextRun {
    pub text: String,
    pub font: Option<Font>,
}

impl RichTextRun {
    #[inline]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: None,
        }
    }

    #[inline]
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = Some(font);
        self
    }
}
