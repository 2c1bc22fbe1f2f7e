//! Public chart enumerations.
//!
//! These are the user-facing names for chart kinds, legend placement, data
//! label placement, markers and line styles. The mapping onto schema values
//! lives next to each enum.

use crate::ooxml::error::OoxmlError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chart type enumeration.
///
/// Several public types share one plot-area container; they differ in bar
/// direction, grouping or a container flag. Deserialization goes through
/// [`FromStr`], so configuration names are case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "String")]
pub enum ChartType {
    /// Area chart
    Area,
    /// Stacked area chart
    AreaStacked,
    /// 100% stacked area chart
    AreaPercentStacked,
    /// 3-D area chart
    Area3D,
    /// 3-D stacked area chart
    Area3DStacked,
    /// 3-D 100% stacked area chart
    Area3DPercentStacked,
    /// Clustered horizontal bar chart
    Bar,
    /// Stacked horizontal bar chart
    BarStacked,
    /// 100% stacked horizontal bar chart
    BarPercentStacked,
    /// 3-D clustered horizontal bar chart
    Bar3DClustered,
    /// 3-D stacked horizontal bar chart
    Bar3DStacked,
    /// 3-D 100% stacked horizontal bar chart
    Bar3DPercentStacked,
    /// Clustered column chart
    #[default]
    Col,
    /// Stacked column chart
    ColStacked,
    /// 100% stacked column chart
    ColPercentStacked,
    /// 3-D column chart
    Col3D,
    /// 3-D clustered column chart
    Col3DClustered,
    /// 3-D stacked column chart
    Col3DStacked,
    /// 3-D 100% stacked column chart
    Col3DPercentStacked,
    /// Doughnut chart
    Doughnut,
    /// Line chart
    Line,
    /// 3-D line chart
    Line3D,
    /// Pie chart
    Pie,
    /// 3-D pie chart
    Pie3D,
    /// Pie of pie chart
    PieOfPie,
    /// Bar of pie chart
    BarOfPie,
    /// Radar chart
    Radar,
    /// Scatter (XY) chart
    Scatter,
    /// 3-D surface chart
    Surface3D,
    /// 3-D wireframe surface chart
    WireframeSurface3D,
    /// Contour chart
    Contour,
    /// Wireframe contour chart
    WireframeContour,
    /// Bubble chart
    Bubble,
    /// 3-D bubble chart
    Bubble3D,
}

impl ChartType {
    /// Every supported chart type.
    pub const ALL: [ChartType; 34] = [
        Self::Area,
        Self::AreaStacked,
        Self::AreaPercentStacked,
        Self::Area3D,
        Self::Area3DStacked,
        Self::Area3DPercentStacked,
        Self::Bar,
        Self::BarStacked,
        Self::BarPercentStacked,
        Self::Bar3DClustered,
        Self::Bar3DStacked,
        Self::Bar3DPercentStacked,
        Self::Col,
        Self::ColStacked,
        Self::ColPercentStacked,
        Self::Col3D,
        Self::Col3DClustered,
        Self::Col3DStacked,
        Self::Col3DPercentStacked,
        Self::Doughnut,
        Self::Line,
        Self::Line3D,
        Self::Pie,
        Self::Pie3D,
        Self::PieOfPie,
        Self::BarOfPie,
        Self::Radar,
        Self::Scatter,
        Self::Surface3D,
        Self::WireframeSurface3D,
        Self::Contour,
        Self::WireframeContour,
        Self::Bubble,
        Self::Bubble3D,
    ];

    /// Configuration name of the chart type.
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Area => "area",
            Self::AreaStacked => "areaStacked",
            Self::AreaPercentStacked => "areaPercentStacked",
            Self::Area3D => "area3D",
            Self::Area3DStacked => "area3DStacked",
            Self::Area3DPercentStacked => "area3DPercentStacked",
            Self::Bar => "bar",
            Self::BarStacked => "barStacked",
            Self::BarPercentStacked => "barPercentStacked",
            Self::Bar3DClustered => "bar3DClustered",
            Self::Bar3DStacked => "bar3DStacked",
            Self::Bar3DPercentStacked => "bar3DPercentStacked",
            Self::Col => "col",
            Self::ColStacked => "colStacked",
            Self::ColPercentStacked => "colPercentStacked",
            Self::Col3D => "col3D",
            Self::Col3DClustered => "col3DClustered",
            Self::Col3DStacked => "col3DStacked",
            Self::Col3DPercentStacked => "col3DPercentStacked",
            Self::Doughnut => "doughnut",
            Self::Line => "line",
            Self::Line3D => "line3D",
            Self::Pie => "pie",
            Self::Pie3D => "pie3D",
            Self::PieOfPie => "pieOfPie",
            Self::BarOfPie => "barOfPie",
            Self::Radar => "radar",
            Self::Scatter => "scatter",
            Self::Surface3D => "surface3D",
            Self::WireframeSurface3D => "wireframeSurface3D",
            Self::Contour => "contour",
            Self::WireframeContour => "wireframeContour",
            Self::Bubble => "bubble",
            Self::Bubble3D => "bubble3D",
        }
    }

    /// Returns true if the chart draws horizontal bars.
    #[inline]
    pub const fn is_horizontal(&self) -> bool {
        matches!(
            self,
            Self::Bar
                | Self::BarStacked
                | Self::BarPercentStacked
                | Self::Bar3DClustered
                | Self::Bar3DStacked
                | Self::Bar3DPercentStacked
        )
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartType {
    type Err = OoxmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| OoxmlError::UnsupportedChartType(s.to_string()))
    }
}

impl TryFrom<String> for ChartType {
    type Error = OoxmlError;

    #[inline]
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Legend position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendPosition {
    /// No legend
    None,
    Top,
    #[default]
    Bottom,
    Left,
    Right,
    TopRight,
}

impl LegendPosition {
    /// Schema value of `legendPos`; `None` has no element.
    #[inline]
    pub const fn xml_value(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Top => Some("t"),
            Self::Bottom => Some("b"),
            Self::Left => Some("l"),
            Self::Right => Some("r"),
            Self::TopRight => Some("tr"),
        }
    }

    /// Parse a `legendPos` value. Unknown values fall back to the schema default (right).
    #[inline]
    pub fn from_xml(s: &str) -> Self {
        match s {
            "t" => Self::Top,
            "b" => Self::Bottom,
            "l" => Self::Left,
            "tr" => Self::TopRight,
            _ => Self::Right,
        }
    }
}

/// Data label position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataLabelPosition {
    BestFit,
    Below,
    Center,
    InsideBase,
    InsideEnd,
    Left,
    OutsideEnd,
    Right,
    Above,
}

impl DataLabelPosition {
    #[inline]
    pub const fn xml_value(&self) -> &'static str {
        match self {
            Self::BestFit => "bestFit",
            Self::Below => "b",
            Self::Center => "ctr",
            Self::InsideBase => "inBase",
            Self::InsideEnd => "inEnd",
            Self::Left => "l",
            Self::OutsideEnd => "outEnd",
            Self::Right => "r",
            Self::Above => "t",
        }
    }

    #[inline]
    pub fn from_xml(s: &str) -> Option<Self> {
        match s {
            "bestFit" => Some(Self::BestFit),
            "b" => Some(Self::Below),
            "ctr" => Some(Self::Center),
            "inBase" => Some(Self::InsideBase),
            "inEnd" => Some(Self::InsideEnd),
            "l" => Some(Self::Left),
            "outEnd" => Some(Self::OutsideEnd),
            "r" => Some(Self::Right),
            "t" => Some(Self::Above),
            _ => None,
        }
    }
}

/// Marker symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerSymbol {
    Auto,
    Circle,
    Dash,
    Diamond,
    Dot,
    None,
    Picture,
    Plus,
    Square,
    Star,
    Triangle,
    X,
}

impl MarkerSymbol {
    #[inline]
    pub const fn xml_value(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Circle => "circle",
            Self::Dash => "dash",
            Self::Diamond => "diamond",
            Self::Dot => "dot",
            Self::None => "none",
            Self::Picture => "picture",
            Self::Plus => "plus",
            Self::Square => "square",
            Self::Star => "star",
            Self::Triangle => "triangle",
            Self::X => "x",
        }
    }

    #[inline]
    pub fn from_xml(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(Self::Auto),
            "circle" => Some(Self::Circle),
            "dash" => Some(Self::Dash),
            "diamond" => Some(Self::Diamond),
            "dot" => Some(Self::Dot),
            "none" => Some(Self::None),
            "picture" => Some(Self::Picture),
            "plus" => Some(Self::Plus),
            "square" => Some(Self::Square),
            "star" => Some(Self::Star),
            "triangle" => Some(Self::Triangle),
            "x" => Some(Self::X),
            _ => None,
        }
    }
}

/// Line style of a series or the chart border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    /// Nothing specified; the application decides
    #[default]
    Unset,
    Solid,
    None,
    Automatic,
}

/// How blank cells are plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowBlanksAs {
    #[default]
    Gap,
    Span,
    Zero,
}

impl ShowBlanksAs {
    #[inline]
    pub const fn xml_value(&self) -> &'static str {
        match self {
            Self::Gap => "gap",
            Self::Span => "span",
            Self::Zero => "zero",
        }
    }

    /// Parse a `dispBlanksAs` value. Unknown values fall back to the schema default (zero).
    #[inline]
    pub fn from_xml(s: &str) -> Self {
        match s {
            "gap" => Self::Gap,
            "span" => Self::Span,
            _ => Self::Zero,
        }
    }
}

/// Scatter chart drawing style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScatterStyle {
    None,
    Line,
    LineMarker,
    #[default]
    Marker,
    Smooth,
    SmoothMarker,
}

impl ScatterStyle {
    #[inline]
    pub const fn xml_value(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Line => "line",
            Self::LineMarker => "lineMarker",
            Self::Marker => "marker",
            Self::Smooth => "smooth",
            Self::SmoothMarker => "smoothMarker",
        }
    }

    /// Parse a `scatterStyle` value. Unknown values fall back to the schema default (marker).
    #[inline]
    pub fn from_xml(s: &str) -> Self {
        match s {
            "none" => Self::None,
            "line" => Self::Line,
            "lineMarker" => Self::LineMarker,
            "smooth" => Self::Smooth,
            "smoothMarker" => Self::SmoothMarker,
            _ => Self::Marker,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_type_names() {
        for t in ChartType::ALL {
            assert_eq!(t.name().parse::<ChartType>().unwrap(), t);
        }
        assert_eq!("COL3dclustered".parse::<ChartType>().unwrap(), ChartType::Col3DClustered);
        assert!(matches!(
            "stock".parse::<ChartType>(),
            Err(OoxmlError::UnsupportedChartType(name)) if name == "stock"
        ));
    }

    #[test]
    fn test_legend_position_values() {
        assert_eq!(LegendPosition::None.xml_value(), None);
        assert_eq!(LegendPosition::TopRight.xml_value(), Some("tr"));
        assert_eq!(LegendPosition::from_xml("b"), LegendPosition::Bottom);
        assert_eq!(LegendPosition::from_xml("?"), LegendPosition::Right);
    }

    #[test]
    fn test_data_label_values() {
        for pos in [
            DataLabelPosition::BestFit,
            DataLabelPosition::Below,
            DataLabelPosition::Center,
            DataLabelPosition::InsideBase,
            DataLabelPosition::InsideEnd,
            DataLabelPosition::Left,
            DataLabelPosition::OutsideEnd,
            DataLabelPosition::Right,
            DataLabelPosition::Above,
        ] {
            assert_eq!(DataLabelPosition::from_xml(pos.xml_value()), Some(pos));
        }
    }
}
