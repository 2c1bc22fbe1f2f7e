//! Schema tree → public model.
//!
//! Decode is lenient about sparse trees: anything absent takes the public
//! default. It fails only on structural defects, i.e. a plot area without
//! exactly one chart-kind container, or an axis reference that does not
//! resolve within the plot area.

use crate::ooxml::charts::dispatch::{EMU_PER_POINT, match_container, normalize};
use crate::ooxml::charts::model::{
    CachedPoint, Chart, ChartAxis, ChartLegend, ChartLine, ChartMarker, ChartNumFmt,
    ChartPlotArea, ChartSeries, DEFAULT_BUBBLE_SCALE, DEFAULT_GAP_WIDTH, DEFAULT_HOLE_SIZE, Font,
    RichTextRun, SeriesCache,
};
use crate::ooxml::charts::schema::{
    Axis, ChartGroup, ChartSpace, DLbls, DataSource, Ln, NumFmt, PlotArea, RunProps, Series,
    SolidFill, TextBody, Title, flag_of, value_of,
};
use crate::ooxml::charts::types::{
    DataLabelPosition, LegendPosition, LineType, MarkerSymbol, ScatterStyle, ShowBlanksAs,
};
use crate::ooxml::error::{OoxmlError, Result};
use tracing::debug;

/// Build the public model from a parsed chart part.
pub fn decode(space: &ChartSpace) -> Result<Chart> {
    let chart_el = &space.chart;
    let plot_area = &chart_el.plot_area;
    let group = single_group(plot_area)?;
    check_axis_references(plot_area, group)?;

    let spec = match_container(group);
    debug!(
        container = %group.kind,
        chart_type = %spec.chart_type,
        series = group.ser.len(),
        "decoding chart"
    );

    let ids = group.axis_ids();
    let axis_at = |n: usize| {
        ids.get(n)
            .and_then(|id| plot_area.axis_by_id(*id))
            .map(|(_, axis)| decode_axis(axis))
            .unwrap_or_default()
    };

    let mut series: Vec<&Series> = group.ser.iter().collect();
    series.sort_by_key(|s| s.order.val.unwrap_or(u32::MAX));

    let labels = group.d_lbls.as_ref();
    let chart = Chart {
        chart_type: spec.chart_type,
        series: series.into_iter().map(decode_series).collect(),
        title: chart_el.title.as_ref().map(decode_title).unwrap_or_default(),
        auto_title_deleted: flag_of(&chart_el.auto_title_deleted).unwrap_or(false),
        legend: ChartLegend {
            position: match &chart_el.legend {
                None => LegendPosition::None,
                Some(legend) => value_of(&legend.legend_pos)
                    .map_or(LegendPosition::Right, |p| LegendPosition::from_xml(&p)),
            },
            show_legend_key: labels
                .and_then(|l| flag_of(&l.show_legend_key))
                .unwrap_or(false),
        },
        vary_colors: flag_of(&group.vary_colors),
        x_axis: axis_at(0),
        y_axis: axis_at(1),
        plot_area: decode_plot_area(group, labels),
        border: decode_line(space.sp_pr.as_ref().and_then(|sp| sp.ln.as_ref())),
        show_blanks_as: value_of(&chart_el.disp_blanks_as)
            .map_or_else(ShowBlanksAs::default, |v| ShowBlanksAs::from_xml(&v)),
        bubble_size: value_of(&group.bubble_scale).unwrap_or(DEFAULT_BUBBLE_SCALE),
        hole_size: value_of(&group.hole_size).unwrap_or(DEFAULT_HOLE_SIZE),
        gap_width: value_of(&group.gap_width).unwrap_or(DEFAULT_GAP_WIDTH),
        overlap: value_of(&group.overlap).unwrap_or(0),
        first_slice_angle: value_of(&group.first_slice_ang).unwrap_or(0),
        scatter_style: value_of(&group.scatter_style)
            .map_or_else(ScatterStyle::default, |s| ScatterStyle::from_xml(&s)),
    };
    Ok(normalize(&chart))
}

fn single_group(plot_area: &PlotArea) -> Result<&ChartGroup> {
    match plot_area.groups.as_slice() {
        [group] => Ok(group),
        [] => Err(OoxmlError::MalformedChartTree(
            "plot area has no chart-kind container".to_string(),
        )),
        groups => Err(OoxmlError::MalformedChartTree(format!(
            "plot area has {} chart-kind containers ({})",
            groups.len(),
            groups
                .iter()
                .map(|g| g.kind.tag())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// Every axis a container references must exist, and every `crossAx` must
/// point at a different existing axis.
pub fn check_axis_references(plot_area: &PlotArea, group: &ChartGroup) -> Result<()> {
    for id in group.axis_ids() {
        if plot_area.axis_by_id(id).is_none() {
            return Err(OoxmlError::AxisReferenceUnresolved {
                axis_id: id,
                context: format!("<c:{}>", group.kind.tag()),
            });
        }
    }
    for (kind, axis) in plot_area.axes() {
        let Some(cross) = axis.crosses_axis() else {
            continue;
        };
        let resolved = axis.id() != Some(cross) && plot_area.axis_by_id(cross).is_some();
        if !resolved {
            return Err(OoxmlError::AxisReferenceUnresolved {
                axis_id: cross,
                context: format!(
                    "crossAx of <c:{}> {}",
                    kind.tag(),
                    axis.id().map_or_else(|| "?".to_string(), |id| id.to_string())
                ),
            });
        }
    }
    Ok(())
}

fn decode_series(ser: &Series) -> ChartSeries {
    let categories = ser.cat.as_ref().or(ser.x_val.as_ref());
    let values = ser.val.as_ref().or(ser.y_val.as_ref());
    let sizes = ser.bubble_size.as_ref();
    let sp_pr = ser.sp_pr.as_ref();

    let mut line = decode_line(sp_pr.and_then(|sp| sp.ln.as_ref()));
    line.smooth = flag_of(&ser.smooth).unwrap_or(false);

    ChartSeries {
        name: ser
            .tx
            .as_ref()
            .and_then(|tx| {
                tx.str_ref
                    .as_ref()
                    .map(|r| r.f.clone())
                    .or_else(|| tx.v.clone())
            })
            .unwrap_or_default(),
        categories: formula_of(categories),
        values: formula_of(values),
        sizes: formula_of(sizes),
        fill: sp_pr
            .and_then(|sp| sp.solid_fill.as_ref())
            .and_then(SolidFill::rgb_value)
            .map(str::to_string),
        line,
        marker: ser
            .marker
            .as_ref()
            .map(|m| ChartMarker {
                symbol: value_of(&m.symbol).and_then(|s| MarkerSymbol::from_xml(&s)),
                size: value_of(&m.size),
            })
            .unwrap_or_default(),
        data_label_position: ser
            .d_lbls
            .as_ref()
            .and_then(|l| value_of(&l.d_lbl_pos))
            .and_then(|p| DataLabelPosition::from_xml(&p)),
        cache: SeriesCache {
            categories: cached_points(categories),
            values: cached_points(values),
            sizes: cached_points(sizes),
        },
    }
}

fn formula_of(source: Option<&DataSource>) -> String {
    source
        .and_then(DataSource::reference)
        .map(|r| r.f.clone())
        .unwrap_or_default()
}

fn cached_points(source: Option<&DataSource>) -> Vec<CachedPoint> {
    let Some(reference) = source.and_then(DataSource::reference) else {
        return Vec::new();
    };
    let Some(cache) = reference.cache.as_ref() else {
        return Vec::new();
    };
    if cache.declared_count() as usize != cache.pt.len() {
        debug!(
            formula = %reference.f,
            declared = cache.declared_count(),
            points = cache.pt.len(),
            "cached point count differs from ptCount"
        );
    }
    cache
        .pt
        .iter()
        .map(|pt| CachedPoint::new(pt.idx, pt.v.as_str()))
        .collect()
}

pub(crate) fn decode_line(ln: Option<&Ln>) -> ChartLine {
    let Some(ln) = ln else {
        return ChartLine::default();
    };
    let line_type = if ln.no_fill.is_some() {
        LineType::None
    } else if ln.solid_fill.is_some() {
        LineType::Solid
    } else {
        LineType::Automatic
    };
    ChartLine {
        line_type,
        smooth: false,
        width: ln.w.map_or(0.0, |w| w as f64 / EMU_PER_POINT),
    }
}

fn decode_axis(axis: &Axis) -> ChartAxis {
    let scaling = axis.scaling.as_ref();
    ChartAxis {
        none: flag_of(&axis.delete).unwrap_or(false),
        major_grid_lines: axis.major_gridlines.is_some(),
        minor_grid_lines: axis.minor_gridlines.is_some(),
        major_unit: value_of(&axis.major_unit),
        tick_label_skip: value_of(&axis.tick_lbl_skip),
        reverse_order: scaling
            .and_then(|s| value_of(&s.orientation))
            .is_some_and(|o| o == "maxMin"),
        secondary: matches!(axis.position(), Some("r" | "t")),
        maximum: scaling.and_then(|s| value_of(&s.max)),
        minimum: scaling.and_then(|s| value_of(&s.min)),
        font: axis
            .tx_pr
            .as_ref()
            .and_then(default_run_props)
            .map(decode_font)
            .unwrap_or_default(),
        log_base: scaling.and_then(|s| value_of(&s.log_base)),
        num_fmt: decode_num_fmt(axis.num_fmt.as_ref()),
        title: axis.title.as_ref().map(decode_title).unwrap_or_default(),
    }
}

fn decode_plot_area(group: &ChartGroup, labels: Option<&DLbls>) -> ChartPlotArea {
    let labels = labels.cloned().unwrap_or_default();
    ChartPlotArea {
        second_plot_values: value_of(&group.split_pos)
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map_or(0, |v| v as u32),
        show_bubble_size: flag_of(&labels.show_bubble_size).unwrap_or(false),
        show_cat_name: flag_of(&labels.show_cat_name).unwrap_or(false),
        show_leader_lines: flag_of(&labels.show_leader_lines).unwrap_or(false),
        show_percent: flag_of(&labels.show_percent).unwrap_or(false),
        show_ser_name: flag_of(&labels.show_ser_name).unwrap_or(false),
        show_val: flag_of(&labels.show_val).unwrap_or(false),
        num_fmt: decode_num_fmt(labels.num_fmt.as_ref()),
    }
}

fn decode_num_fmt(fmt: Option<&NumFmt>) -> ChartNumFmt {
    fmt.map(|f| ChartNumFmt {
        custom_num_fmt: f.format_code.clone(),
        source_linked: f.source_linked.unwrap_or(false),
    })
    .unwrap_or_default()
}

fn decode_title(title: &Title) -> Vec<RichTextRun> {
    let Some(tx) = title.tx.as_ref() else {
        return Vec::new();
    };
    if let Some(rich) = tx.rich.as_ref() {
        return rich
            .p
            .iter()
            .flat_map(|p| p.r.iter())
            .map(|r| RichTextRun {
                text: r.t.clone(),
                font: r.r_pr.as_ref().map(decode_font),
            })
            .collect();
    }
    // A title linked to a cell keeps its last value in the reference cache.
    tx.str_ref
        .as_ref()
        .and_then(|r| r.cache.as_ref())
        .map(|cache| cache.pt.iter().map(|pt| RichTextRun::new(pt.v.as_str())).collect())
        .unwrap_or_default()
}

fn default_run_props(body: &TextBody) -> Option<&RunProps> {
    body.p.first()?.p_pr.as_ref()?.def_r_pr.as_ref()
}

pub(crate) fn decode_font(props: &RunProps) -> Font {
    let family = [&props.latin, &props.ea, &props.cs]
        .into_iter()
        .flatten()
        .map(|f| f.typeface.as_str())
        .find(|t| !t.is_empty())
        .map(str::to_string);
    Font {
        bold: props.b.unwrap_or(false),
        italic: props.i.unwrap_or(false),
        underline: props.u.clone(),
        strike: props.strike.as_deref().is_some_and(|s| s != "noStrike"),
        family,
        size: props.sz.map(|sz| f64::from(sz) / 100.0),
        color: props
            .solid_fill
            .as_ref()
            .and_then(SolidFill::rgb_value)
            .map(str::to_string),
    }
}
