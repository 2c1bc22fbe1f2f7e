//! Chart-kind dispatch table.
//!
//! One static row per public [`ChartType`] records which plot-area container
//! it populates, the container attributes that tell it apart from siblings
//! sharing the container, its axis topology, the optional public fields it
//! honours and the data label positions it accepts. Encode reads the row to
//! build the container; decode matches a parsed container back to a row.

use crate::ooxml::charts::model::{
    Chart, ChartAxis, ChartLine, ChartNumFmt, ChartPlotArea, ChartSeries, DEFAULT_BUBBLE_SCALE,
    DEFAULT_GAP_WIDTH, DEFAULT_HOLE_SIZE, Font, RichTextRun,
};
use crate::ooxml::charts::schema::{ChartGroup, ContainerKind, flag_of, value_of};
use crate::ooxml::charts::types::{ChartType, DataLabelPosition, LineType, ScatterStyle};
use bitflags::bitflags;
use tracing::debug;

bitflags! {
    /// Optional public fields a chart kind honours.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChartFields: u32 {
        /// `Chart::vary_colors`
        const VARY_COLORS = 1 << 0;
        /// `Chart::gap_width`
        const GAP_WIDTH = 1 << 1;
        /// `Chart::overlap`
        const OVERLAP = 1 << 2;
        /// `Chart::hole_size`
        const HOLE_SIZE = 1 << 3;
        /// `Chart::first_slice_angle`
        const FIRST_SLICE_ANGLE = 1 << 4;
        /// `Chart::bubble_size`
        const BUBBLE_SCALE = 1 << 5;
        /// `Chart::scatter_style`
        const SCATTER_STYLE = 1 << 6;
        /// `ChartPlotArea::second_plot_values`
        const SECOND_PLOT = 1 << 7;
        /// `ChartSeries::marker`
        const SERIES_MARKER = 1 << 8;
        /// `ChartLine::smooth` on series
        const SERIES_SMOOTH = 1 << 9;
        /// `ChartSeries::sizes`
        const BUBBLE_SIZES = 1 << 10;
        /// Group data labels, `ChartPlotArea` and `ChartLegend::show_legend_key`
        const DATA_LABELS = 1 << 11;
    }
}

/// Axes a chart kind requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisTopology {
    /// Pie-like charts have no axes
    None,
    /// Category axis plus value axis
    CategoryValue,
    /// Two value axes (X and Y)
    ValueValue,
    /// Category, value and series axes
    CategoryValueSeries,
}

impl AxisTopology {
    #[inline]
    pub const fn axis_count(&self) -> usize {
        match self {
            Self::None => 0,
            Self::CategoryValue | Self::ValueValue => 2,
            Self::CategoryValueSeries => 3,
        }
    }

    /// Whether the X axis is a category axis.
    #[inline]
    pub const fn has_category_axis(&self) -> bool {
        matches!(self, Self::CategoryValue | Self::CategoryValueSeries)
    }
}

/// Default 3-D view of a chart kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View3DSpec {
    pub rot_x: i32,
    pub rot_y: u32,
    pub r_ang_ax: bool,
    pub perspective: Option<u32>,
}

/// One row of the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartKindSpec {
    pub chart_type: ChartType,
    pub container: ContainerKind,
    pub bar_dir: Option<&'static str>,
    pub grouping: Option<&'static str>,
    pub wireframe: Option<bool>,
    pub of_pie_type: Option<&'static str>,
    pub bubble_3d: Option<bool>,
    pub topology: AxisTopology,
    pub view_3d: Option<View3DSpec>,
    pub fields: ChartFields,
    pub label_positions: &'static [DataLabelPosition],
}

impl ChartKindSpec {
    /// Whether `pos` is accepted as a data label position.
    #[inline]
    pub fn accepts_label_position(&self, pos: DataLabelPosition) -> bool {
        self.label_positions.contains(&pos)
    }
}

use DataLabelPosition as P;

const LABELS_NONE: &[DataLabelPosition] = &[];
const LABELS_BAR_CLUSTERED: &[DataLabelPosition] =
    &[P::Center, P::InsideBase, P::InsideEnd, P::OutsideEnd];
const LABELS_BAR_STACKED: &[DataLabelPosition] = &[P::Center, P::InsideBase, P::InsideEnd];
const LABELS_POINT: &[DataLabelPosition] = &[P::Above, P::Below, P::Center, P::Left, P::Right];
const LABELS_PIE: &[DataLabelPosition] = &[P::BestFit, P::Center, P::InsideEnd, P::OutsideEnd];

const VIEW_3D_BOX: Option<View3DSpec> = Some(View3DSpec {
    rot_x: 15,
    rot_y: 20,
    r_ang_ax: true,
    perspective: None,
});
const VIEW_3D_PIE: Option<View3DSpec> = Some(View3DSpec {
    rot_x: 30,
    rot_y: 0,
    r_ang_ax: false,
    perspective: Some(30),
});
const VIEW_3D_SURFACE: Option<View3DSpec> = Some(View3DSpec {
    rot_x: 15,
    rot_y: 20,
    r_ang_ax: false,
    perspective: Some(30),
});
const VIEW_3D_CONTOUR: Option<View3DSpec> = Some(View3DSpec {
    rot_x: 90,
    rot_y: 0,
    r_ang_ax: false,
    perspective: Some(0),
});

const F_AREA: ChartFields = ChartFields::VARY_COLORS.union(ChartFields::DATA_LABELS);
const F_BAR: ChartFields = F_AREA
    .union(ChartFields::GAP_WIDTH)
    .union(ChartFields::OVERLAP);
const F_BAR_3D: ChartFields = F_AREA.union(ChartFields::GAP_WIDTH);
const F_LINE: ChartFields = F_AREA
    .union(ChartFields::SERIES_MARKER)
    .union(ChartFields::SERIES_SMOOTH);
const F_PIE: ChartFields = F_AREA.union(ChartFields::FIRST_SLICE_ANGLE);
const F_DOUGHNUT: ChartFields = F_PIE.union(ChartFields::HOLE_SIZE);
const F_OF_PIE: ChartFields = F_AREA
    .union(ChartFields::GAP_WIDTH)
    .union(ChartFields::SECOND_PLOT);
const F_RADAR: ChartFields = F_AREA.union(ChartFields::SERIES_MARKER);
const F_SCATTER: ChartFields = F_LINE.union(ChartFields::SCATTER_STYLE);
const F_BUBBLE: ChartFields = F_AREA
    .union(ChartFields::BUBBLE_SCALE)
    .union(ChartFields::BUBBLE_SIZES);
const F_SURFACE: ChartFields = ChartFields::empty();

const fn row(chart_type: ChartType, container: ContainerKind) -> ChartKindSpec {
    ChartKindSpec {
        chart_type,
        container,
        bar_dir: None,
        grouping: None,
        wireframe: None,
        of_pie_type: None,
        bubble_3d: None,
        topology: AxisTopology::CategoryValue,
        view_3d: None,
        fields: F_AREA,
        label_positions: LABELS_NONE,
    }
}

const fn area(chart_type: ChartType, grouping: &'static str) -> ChartKindSpec {
    ChartKindSpec {
        grouping: Some(grouping),
        ..row(chart_type, ContainerKind::Area)
    }
}

const fn area_3d(chart_type: ChartType, grouping: &'static str, topology: AxisTopology) -> ChartKindSpec {
    ChartKindSpec {
        grouping: Some(grouping),
        topology,
        view_3d: VIEW_3D_BOX,
        ..row(chart_type, ContainerKind::Area3D)
    }
}

const fn bar(
    chart_type: ChartType,
    bar_dir: &'static str,
    grouping: &'static str,
    label_positions: &'static [DataLabelPosition],
) -> ChartKindSpec {
    ChartKindSpec {
        bar_dir: Some(bar_dir),
        grouping: Some(grouping),
        fields: F_BAR,
        label_positions,
        ..row(chart_type, ContainerKind::Bar)
    }
}

const fn bar_3d(
    chart_type: ChartType,
    bar_dir: &'static str,
    grouping: &'static str,
    topology: AxisTopology,
) -> ChartKindSpec {
    ChartKindSpec {
        bar_dir: Some(bar_dir),
        grouping: Some(grouping),
        topology,
        view_3d: VIEW_3D_BOX,
        fields: F_BAR_3D,
        ..row(chart_type, ContainerKind::Bar3D)
    }
}

const fn surface(
    chart_type: ChartType,
    container: ContainerKind,
    wireframe: bool,
    view_3d: Option<View3DSpec>,
) -> ChartKindSpec {
    ChartKindSpec {
        wireframe: Some(wireframe),
        topology: AxisTopology::CategoryValueSeries,
        view_3d,
        fields: F_SURFACE,
        ..row(chart_type, container)
    }
}

const fn bubble(chart_type: ChartType, bubble_3d: bool) -> ChartKindSpec {
    ChartKindSpec {
        bubble_3d: Some(bubble_3d),
        topology: AxisTopology::ValueValue,
        fields: F_BUBBLE,
        label_positions: LABELS_POINT,
        ..row(chart_type, ContainerKind::Bubble)
    }
}

const fn of_pie(chart_type: ChartType, of_pie_type: &'static str) -> ChartKindSpec {
    ChartKindSpec {
        of_pie_type: Some(of_pie_type),
        topology: AxisTopology::None,
        fields: F_OF_PIE,
        label_positions: LABELS_PIE,
        ..row(chart_type, ContainerKind::OfPie)
    }
}

/// The dispatch table, in [`ChartType`] declaration order.
static CHART_KINDS: [ChartKindSpec; 34] = [
    area(ChartType::Area, "standard"),
    area(ChartType::AreaStacked, "stacked"),
    area(ChartType::AreaPercentStacked, "percentStacked"),
    area_3d(ChartType::Area3D, "standard", AxisTopology::CategoryValueSeries),
    area_3d(ChartType::Area3DStacked, "stacked", AxisTopology::CategoryValue),
    area_3d(ChartType::Area3DPercentStacked, "percentStacked", AxisTopology::CategoryValue),
    bar(ChartType::Bar, "bar", "clustered", LABELS_BAR_CLUSTERED),
    bar(ChartType::BarStacked, "bar", "stacked", LABELS_BAR_STACKED),
    bar(ChartType::BarPercentStacked, "bar", "percentStacked", LABELS_BAR_STACKED),
    bar_3d(ChartType::Bar3DClustered, "bar", "clustered", AxisTopology::CategoryValue),
    bar_3d(ChartType::Bar3DStacked, "bar", "stacked", AxisTopology::CategoryValue),
    bar_3d(ChartType::Bar3DPercentStacked, "bar", "percentStacked", AxisTopology::CategoryValue),
    bar(ChartType::Col, "col", "clustered", LABELS_BAR_CLUSTERED),
    bar(ChartType::ColStacked, "col", "stacked", LABELS_BAR_STACKED),
    bar(ChartType::ColPercentStacked, "col", "percentStacked", LABELS_BAR_STACKED),
    bar_3d(ChartType::Col3D, "col", "standard", AxisTopology::CategoryValueSeries),
    bar_3d(ChartType::Col3DClustered, "col", "clustered", AxisTopology::CategoryValue),
    bar_3d(ChartType::Col3DStacked, "col", "stacked", AxisTopology::CategoryValue),
    bar_3d(ChartType::Col3DPercentStacked, "col", "percentStacked", AxisTopology::CategoryValue),
    ChartKindSpec {
        topology: AxisTopology::None,
        fields: F_DOUGHNUT,
        ..row(ChartType::Doughnut, ContainerKind::Doughnut)
    },
    ChartKindSpec {
        grouping: Some("standard"),
        fields: F_LINE,
        label_positions: LABELS_POINT,
        ..row(ChartType::Line, ContainerKind::Line)
    },
    ChartKindSpec {
        grouping: Some("standard"),
        topology: AxisTopology::CategoryValueSeries,
        view_3d: VIEW_3D_BOX,
        ..row(ChartType::Line3D, ContainerKind::Line3D)
    },
    ChartKindSpec {
        topology: AxisTopology::None,
        fields: F_PIE,
        label_positions: LABELS_PIE,
        ..row(ChartType::Pie, ContainerKind::Pie)
    },
    ChartKindSpec {
        topology: AxisTopology::None,
        view_3d: VIEW_3D_PIE,
        label_positions: LABELS_PIE,
        ..row(ChartType::Pie3D, ContainerKind::Pie3D)
    },
    of_pie(ChartType::PieOfPie, "pie"),
    of_pie(ChartType::BarOfPie, "bar"),
    ChartKindSpec {
        fields: F_RADAR,
        ..row(ChartType::Radar, ContainerKind::Radar)
    },
    ChartKindSpec {
        topology: AxisTopology::ValueValue,
        fields: F_SCATTER,
        label_positions: LABELS_POINT,
        ..row(ChartType::Scatter, ContainerKind::Scatter)
    },
    surface(ChartType::Surface3D, ContainerKind::Surface3D, false, VIEW_3D_SURFACE),
    surface(ChartType::WireframeSurface3D, ContainerKind::Surface3D, true, VIEW_3D_SURFACE),
    surface(ChartType::Contour, ContainerKind::Surface, false, VIEW_3D_CONTOUR),
    surface(ChartType::WireframeContour, ContainerKind::Surface, true, VIEW_3D_CONTOUR),
    bubble(ChartType::Bubble, false),
    bubble(ChartType::Bubble3D, true),
];

/// The dispatch row of a chart type.
#[inline]
pub fn spec_for(chart_type: ChartType) -> &'static ChartKindSpec {
    &CHART_KINDS[chart_type as usize]
}

/// Rows sharing a container, in table order.
pub fn specs_for_container(container: ContainerKind) -> impl Iterator<Item = &'static ChartKindSpec> {
    CHART_KINDS.iter().filter(move |s| s.container == container)
}

/// Match a parsed container to its dispatch row.
///
/// Missing attributes take their schema defaults. A container whose
/// attributes fit no row maps to the first row sharing the container.
pub fn match_container(group: &ChartGroup) -> &'static ChartKindSpec {
    let bar_dir = value_of(&group.bar_dir).unwrap_or_else(|| "col".to_string());
    let grouping = value_of(&group.grouping).unwrap_or_else(|| match group.kind {
        ContainerKind::Bar | ContainerKind::Bar3D => "clustered".to_string(),
        _ => "standard".to_string(),
    });
    let wireframe = flag_of(&group.wireframe).unwrap_or(false);
    let of_pie_type = value_of(&group.of_pie_type).unwrap_or_else(|| "pie".to_string());
    let bubble_3d = flag_of(&group.bubble3d).unwrap_or(false);

    specs_for_container(group.kind)
        .find(|s| {
            s.bar_dir.is_none_or(|d| d == bar_dir)
                && s.grouping.is_none_or(|g| g == grouping)
                && s.wireframe.is_none_or(|w| w == wireframe)
                && s.of_pie_type.is_none_or(|t| t == of_pie_type)
                && s.bubble_3d.is_none_or(|b| b == bubble_3d)
        })
        .or_else(|| specs_for_container(group.kind).next())
        .unwrap_or(&CHART_KINDS[0])
}

/// Reset every field the chart kind does not honour to its default and
/// canonicalise values the schema cannot carry verbatim.
///
/// Encode applies this before building the tree, and decode applies it to
/// its result, so `decode(encode(c)) == normalize(c)`.
pub fn normalize(chart: &Chart) -> Chart {
    let spec = spec_for(chart.chart_type);
    let fields = spec.fields;
    let mut out = chart.clone();

    macro_rules! reset {
        ($flag:expr, $($field:ident).+, $default:expr) => {
            if !fields.contains($flag) && out.$($field).+ != $default {
                debug!(
                    chart_type = %chart.chart_type,
                    field = stringify!($($field).+),
                    "ignoring field not used by this chart type"
                );
                out.$($field).+ = $default;
            }
        };
    }

    reset!(ChartFields::VARY_COLORS, vary_colors, None);
    reset!(ChartFields::GAP_WIDTH, gap_width, DEFAULT_GAP_WIDTH);
    reset!(ChartFields::OVERLAP, overlap, 0);
    reset!(ChartFields::HOLE_SIZE, hole_size, DEFAULT_HOLE_SIZE);
    reset!(ChartFields::FIRST_SLICE_ANGLE, first_slice_angle, 0);
    reset!(ChartFields::BUBBLE_SCALE, bubble_size, DEFAULT_BUBBLE_SCALE);
    reset!(ChartFields::SCATTER_STYLE, scatter_style, ScatterStyle::default());
    reset!(ChartFields::SECOND_PLOT, plot_area.second_plot_values, 0);
    reset!(ChartFields::DATA_LABELS, plot_area, ChartPlotArea::default());
    reset!(ChartFields::DATA_LABELS, legend.show_legend_key, false);

    out.gap_width = out.gap_width.min(500);
    out.overlap = out.overlap.clamp(-100, 100);
    out.hole_size = out.hole_size.clamp(1, 90);
    out.first_slice_angle = out.first_slice_angle.min(360);
    out.bubble_size = out.bubble_size.min(300);

    out.plot_area.num_fmt = normalize_num_fmt(&out.plot_area.num_fmt);
    out.border = normalize_line(&out.border);
    out.border.smooth = false;
    out.title = normalize_runs(&out.title);

    if spec.topology == AxisTopology::None {
        if out.x_axis != ChartAxis::default() || out.y_axis != ChartAxis::default() {
            debug!(chart_type = %chart.chart_type, "ignoring axes of a chart without axes");
        }
        out.x_axis = ChartAxis::default();
        out.y_axis = ChartAxis::default();
    } else {
        out.x_axis = normalize_axis(&out.x_axis, spec.topology.has_category_axis());
        out.y_axis = normalize_axis(&out.y_axis, false);
    }

    for series in &mut out.series {
        normalize_series(series, spec);
    }
    out
}

fn normalize_series(series: &mut ChartSeries, spec: &ChartKindSpec) {
    let fields = spec.fields;
    if !fields.contains(ChartFields::SERIES_MARKER) {
        series.marker = Default::default();
    }
    if series.marker.size.is_some_and(|s| !(2..=72).contains(&s)) {
        series.marker.size = None;
    }
    if !fields.contains(ChartFields::BUBBLE_SIZES) {
        series.sizes.clear();
    }
    if let Some(pos) = series.data_label_position
        && !spec.accepts_label_position(pos)
    {
        debug!(chart_type = %spec.chart_type, position = ?pos, "ignoring data label position");
        series.data_label_position = None;
    }
    series.fill = series.fill.as_deref().and_then(normalize_color);
    series.line = normalize_line(&series.line);
    if !fields.contains(ChartFields::SERIES_SMOOTH) {
        series.line.smooth = false;
    }
    if series.categories.is_empty() {
        series.cache.categories.clear();
    }
    if series.values.is_empty() {
        series.cache.values.clear();
    }
    if series.sizes.is_empty() {
        series.cache.sizes.clear();
    }
}

fn normalize_axis(axis: &ChartAxis, category: bool) -> ChartAxis {
    let mut out = axis.clone();
    if category {
        out.major_unit = None;
    } else {
        out.tick_label_skip = None;
    }
    out.major_unit = out.major_unit.filter(|u| u.is_finite() && *u > 0.0);
    out.tick_label_skip = out.tick_label_skip.filter(|s| *s >= 1);
    out.log_base = out.log_base.filter(|b| (2.0..=1000.0).contains(b));
    out.maximum = out.maximum.filter(|v| v.is_finite());
    out.minimum = out.minimum.filter(|v| v.is_finite());
    out.num_fmt = normalize_num_fmt(&out.num_fmt);
    out.font = normalize_font(&out.font);
    out.title = normalize_runs(&out.title);
    out
}

fn normalize_num_fmt(num_fmt: &ChartNumFmt) -> ChartNumFmt {
    if num_fmt.custom_num_fmt.is_empty() {
        ChartNumFmt::default()
    } else {
        num_fmt.clone()
    }
}

/// Width is stored in whole EMU, so it survives a round trip only at that precision.
pub(crate) fn normalize_line(line: &ChartLine) -> ChartLine {
    let mut out = *line;
    out.width = if line.width.is_finite() && line.width > 0.0 {
        (line.width.min(MAX_LINE_WIDTH) * EMU_PER_POINT).round() / EMU_PER_POINT
    } else {
        0.0
    };
    if out.line_type == LineType::Unset && out.width > 0.0 {
        out.line_type = LineType::Automatic;
    }
    out
}

fn normalize_runs(runs: &[RichTextRun]) -> Vec<RichTextRun> {
    runs.iter()
        .map(|run| RichTextRun {
            text: run.text.clone(),
            font: run.font.as_ref().map(normalize_font),
        })
        .collect()
}

pub(crate) fn normalize_font(font: &Font) -> Font {
    Font {
        bold: font.bold,
        italic: font.italic,
        underline: font.underline.clone().filter(|u| !u.is_empty() && u != "none"),
        strike: font.strike,
        family: font.family.clone().filter(|f| !f.is_empty()),
        size: font
            .size
            .map(|s| (s * 100.0).round() / 100.0)
            .filter(|s| *s > 0.0 && *s <= MAX_FONT_SIZE),
        color: font.color.as_deref().and_then(normalize_color),
    }
}

/// Canonical `RRGGBB` form of a colour; empty input means no colour.
pub(crate) fn normalize_color(color: &str) -> Option<String> {
    let hex = color.trim().trim_start_matches('#');
    (!hex.is_empty()).then(|| hex.to_ascii_uppercase())
}

/// EMU per typographic point.
pub const EMU_PER_POINT: f64 = 12_700.0;

/// Widest line in points that DrawingML can express.
pub const MAX_LINE_WIDTH: f64 = 1_584.0;

/// Largest font size in points that DrawingML can express.
pub const MAX_FONT_SIZE: f64 = 4_000.0;
