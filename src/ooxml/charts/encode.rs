//! Public model → schema tree.
//!
//! The chart is normalised against its dispatch row first, so every field
//! written here is one the chart kind honours. Caches are rebuilt from the
//! data provider on every save; the cached points carried by the public
//! model are ignored.

use crate::common::xml::XmlElement;
use crate::ooxml::charts::dispatch::{
    AxisTopology, ChartFields, ChartKindSpec, EMU_PER_POINT, normalize, spec_for,
};
use crate::ooxml::charts::model::{
    Chart, ChartAxis, ChartLine, ChartMarker, ChartNumFmt, ChartSeries, DEFAULT_BUBBLE_SCALE,
    DEFAULT_GAP_WIDTH, DEFAULT_HOLE_SIZE, Font, RichTextRun,
};
use crate::ooxml::charts::provider::EncodeContext;
use crate::ooxml::charts::schema::{
    Axis, AxisKind, BodyPr, ChartElement, ChartGroup, ChartLines, ChartSpace, ContainerKind,
    DLbls, DataCache, DataReference, DataSource, Empty, Legend, Ln, Marker, NumFmt, PageMargins,
    Paragraph, ParagraphProps, PlotArea, PrintSettings, Pt, Run, RunProps, Scaling, Series,
    ShapeProperties, SolidFill, TextBody, TextFont, Title, Tx, View3D, WallFloor, val,
};
use crate::ooxml::charts::types::LineType;
use crate::ooxml::error::{OoxmlError, Result};
use tracing::debug;

/// Axes one plot area may hold per orientation: a primary and a secondary.
pub const MAX_AXES_PER_ORIENTATION: usize = 2;

/// Build the schema tree of `chart`.
///
/// Fields the chart kind does not use are dropped. Series caches are
/// resolved through `ctx.provider`; a range that cannot be resolved fails
/// the whole encode with [`OoxmlError::SeriesResolution`].
pub fn encode(chart: &Chart, ctx: &EncodeContext<'_>) -> Result<ChartSpace> {
    let chart = normalize(chart);
    let spec = spec_for(chart.chart_type);
    let axis_ids = (0..spec.topology.axis_count() as u32)
        .map(|n| ctx.axis_id(n))
        .collect::<Result<Vec<u32>>>()?;

    debug!(
        chart_type = %chart.chart_type,
        container = %spec.container,
        series = chart.series.len(),
        axis_ids = ?axis_ids,
        "encoding chart"
    );

    let mut group = chart_group(&chart, spec);
    for (i, series) in chart.series.iter().enumerate() {
        group.ser.push(encode_series(&chart, spec, series, i as u32, ctx)?);
    }
    group.ax_id = axis_ids.iter().map(|&id| id.into()).collect();

    let mut plot_area = PlotArea {
        layout: Some(XmlElement::new("c:layout")),
        groups: vec![group],
        ..Default::default()
    };
    encode_axes(&chart, spec, &axis_ids, &ctx.lang, &mut plot_area);
    check_axis_limits(&plot_area)?;

    let is_3d = spec.view_3d.is_some();
    let wall = || {
        is_3d.then(|| WallFloor {
            thickness: val(0),
            sp_pr: None,
        })
    };

    Ok(ChartSpace {
        namespaces: Vec::new(),
        date1904: val(false),
        lang: val(ctx.lang.clone()),
        rounded_corners: val(false),
        style: None,
        chart: ChartElement {
            title: encode_title(&chart.title, &ctx.lang),
            auto_title_deleted: val(chart.auto_title_deleted),
            view3d: spec.view_3d.map(|v| View3D {
                rot_x: val(v.rot_x),
                h_percent: None,
                rot_y: val(v.rot_y),
                depth_percent: None,
                r_ang_ax: val(v.r_ang_ax),
                perspective: v.perspective.and_then(val),
            }),
            floor: wall(),
            side_wall: wall(),
            back_wall: wall(),
            plot_area,
            legend: chart.legend.position.xml_value().map(|pos| Legend {
                legend_pos: val(pos.to_string()),
                overlay: val(false),
                ..Default::default()
            }),
            plot_vis_only: val(true),
            disp_blanks_as: val(chart.show_blanks_as.xml_value().to_string()),
            show_d_lbls_over_max: None,
        },
        sp_pr: encode_line(&chart.border, None).map(|ln| ShapeProperties {
            ln: Some(ln),
            ..Default::default()
        }),
        tx_pr: None,
        external_data: None,
        print_settings: Some(PrintSettings {
            header_footer: Some(XmlElement::new("c:headerFooter")),
            page_margins: Some(PageMargins::default()),
            page_setup: Some(XmlElement::new("c:pageSetup")),
        }),
    })
}

/// Reject plot areas holding more than a primary and a secondary axis in
/// either orientation. Series axes are not counted.
pub fn check_axis_limits(plot_area: &PlotArea) -> Result<()> {
    let mut horizontal = 0;
    let mut vertical = 0;
    for (kind, axis) in plot_area.axes() {
        if kind == AxisKind::Ser {
            continue;
        }
        match axis.position() {
            Some("b" | "t") => horizontal += 1,
            Some("l" | "r") => vertical += 1,
            _ => {},
        }
    }
    for (orientation, count) in [("horizontal", horizontal), ("vertical", vertical)] {
        if count > MAX_AXES_PER_ORIENTATION {
            return Err(OoxmlError::AxisLimitExceeded {
                orientation,
                count,
                limit: MAX_AXES_PER_ORIENTATION,
            });
        }
    }
    Ok(())
}

fn chart_group(chart: &Chart, spec: &ChartKindSpec) -> ChartGroup {
    let fields = spec.fields;
    let mut group = ChartGroup::new(spec.container);
    group.bar_dir = spec.bar_dir.and_then(|d| val(d.to_string()));
    group.grouping = spec.grouping.and_then(|g| val(g.to_string()));
    group.wireframe = spec.wireframe.and_then(val);
    group.of_pie_type = spec.of_pie_type.and_then(|t| val(t.to_string()));
    group.vary_colors = chart.vary_colors.and_then(val);

    match spec.container {
        ContainerKind::Radar => group.radar_style = val("marker".to_string()),
        ContainerKind::Scatter => {
            group.scatter_style = val(chart.scatter_style.xml_value().to_string());
        },
        ContainerKind::Bubble => {
            group.bubble3d = spec.bubble_3d.and_then(val);
            group.show_neg_bubbles = val(false);
        },
        ContainerKind::Line => group.marker = val(true),
        ContainerKind::Bar3D => group.shape = val("box".to_string()),
        ContainerKind::OfPie => {
            if chart.plot_area.second_plot_values > 0 {
                group.split_type = val("pos".to_string());
                group.split_pos = val(f64::from(chart.plot_area.second_plot_values));
            }
            group.ser_lines = Some(ChartLines::default());
        },
        _ => {},
    }

    if fields.contains(ChartFields::DATA_LABELS) {
        group.d_lbls = Some(data_labels(chart, None));
    }
    if fields.contains(ChartFields::GAP_WIDTH) && chart.gap_width != DEFAULT_GAP_WIDTH {
        group.gap_width = val(chart.gap_width);
    }
    if fields.contains(ChartFields::OVERLAP) && chart.overlap != 0 {
        group.overlap = val(chart.overlap);
    }
    if fields.contains(ChartFields::HOLE_SIZE) && chart.hole_size != DEFAULT_HOLE_SIZE {
        group.hole_size = val(chart.hole_size);
    }
    if fields.contains(ChartFields::FIRST_SLICE_ANGLE) && chart.first_slice_angle != 0 {
        group.first_slice_ang = val(chart.first_slice_angle);
    }
    if fields.contains(ChartFields::BUBBLE_SCALE) && chart.bubble_size != DEFAULT_BUBBLE_SCALE {
        group.bubble_scale = val(chart.bubble_size);
    }
    group
}

fn data_labels(chart: &Chart, position: Option<&str>) -> DLbls {
    let pa = &chart.plot_area;
    DLbls {
        num_fmt: num_fmt(&pa.num_fmt),
        d_lbl_pos: position.and_then(|p| val(p.to_string())),
        show_legend_key: val(chart.legend.show_legend_key),
        show_val: val(pa.show_val),
        show_cat_name: val(pa.show_cat_name),
        show_ser_name: val(pa.show_ser_name),
        show_percent: val(pa.show_percent),
        show_bubble_size: val(pa.show_bubble_size),
        show_leader_lines: val(pa.show_leader_lines),
        ..Default::default()
    }
}

fn num_fmt(fmt: &ChartNumFmt) -> Option<NumFmt> {
    (!fmt.custom_num_fmt.is_empty()).then(|| NumFmt {
        format_code: fmt.custom_num_fmt.clone(),
        source_linked: Some(fmt.source_linked),
    })
}

fn encode_series(
    chart: &Chart,
    spec: &ChartKindSpec,
    series: &ChartSeries,
    index: u32,
    ctx: &EncodeContext<'_>,
) -> Result<Series> {
    let fields = spec.fields;
    let coordinates = spec.topology == AxisTopology::ValueValue;

    let mut ser = Series {
        idx: index.into(),
        order: index.into(),
        ..Default::default()
    };
    if !series.name.is_empty() {
        ser.tx = Some(Tx {
            str_ref: Some(DataReference {
                f: series.name.clone(),
                cache: None,
            }),
            ..Default::default()
        });
    }

    let ln = encode_line(&series.line, series.fill.as_deref());
    if series.fill.is_some() || ln.is_some() {
        ser.sp_pr = Some(ShapeProperties {
            solid_fill: series.fill.as_deref().map(SolidFill::rgb),
            ln,
            ..Default::default()
        });
    }

    if matches!(
        spec.container,
        ContainerKind::Bar | ContainerKind::Bar3D | ContainerKind::Bubble
    ) {
        ser.invert_if_negative = val(false);
    }
    if fields.contains(ChartFields::SERIES_MARKER) {
        ser.marker = encode_marker(&series.marker);
    }
    if let Some(pos) = series.data_label_position {
        ser.d_lbls = Some(data_labels(chart, Some(pos.xml_value())));
    }

    if !series.categories.is_empty() {
        let source = DataSource {
            str_ref: Some(resolve(ctx, &series.categories, None)?),
            num_ref: None,
        };
        if coordinates {
            ser.x_val = Some(source);
        } else {
            ser.cat = Some(source);
        }
    }
    if !series.values.is_empty() {
        let source = DataSource {
            num_ref: Some(resolve(ctx, &series.values, Some("General"))?),
            str_ref: None,
        };
        if coordinates {
            ser.y_val = Some(source);
        } else {
            ser.val = Some(source);
        }
    }
    if fields.contains(ChartFields::SERIES_SMOOTH) {
        ser.smooth = val(series.line.smooth);
    }
    if fields.contains(ChartFields::BUBBLE_SIZES) {
        if !series.sizes.is_empty() {
            ser.bubble_size = Some(DataSource {
                num_ref: Some(resolve(ctx, &series.sizes, Some("General"))?),
                str_ref: None,
            });
        }
        ser.bubble3d = spec.bubble_3d.and_then(val);
    }
    Ok(ser)
}

/// Resolve a series range into a reference with a freshly built cache.
fn resolve(ctx: &EncodeContext<'_>, formula: &str, format_code: Option<&str>) -> Result<DataReference> {
    let points = ctx.provider.resolve_range(formula).map_err(|e| match e {
        OoxmlError::SeriesResolution { .. } => e,
        other => OoxmlError::SeriesResolution {
            formula: formula.to_string(),
            reason: other.to_string(),
        },
    })?;
    let pt = points
        .into_iter()
        .map(|(idx, v)| Pt { idx, v })
        .collect::<Vec<_>>();
    Ok(DataReference {
        f: formula.to_string(),
        cache: Some(DataCache::from_points(format_code.map(str::to_string), pt)),
    })
}

fn encode_marker(marker: &ChartMarker) -> Option<Marker> {
    if marker.symbol.is_none() && marker.size.is_none() {
        return None;
    }
    Some(Marker {
        symbol: marker.symbol.and_then(|s| val(s.xml_value().to_string())),
        size: marker.size.and_then(val),
        sp_pr: None,
    })
}

/// Line properties; `None` when the line is left entirely to the application.
pub(crate) fn encode_line(line: &ChartLine, color: Option<&str>) -> Option<Ln> {
    let w = (line.width > 0.0).then(|| (line.width * EMU_PER_POINT).round() as i64);
    let mut ln = Ln {
        w,
        ..Default::default()
    };
    match line.line_type {
        LineType::Unset if w.is_none() => return None,
        LineType::Solid => {
            ln.solid_fill = Some(color.map_or_else(|| SolidFill::scheme("tx1"), SolidFill::rgb));
        },
        LineType::None => ln.no_fill = Some(Empty),
        LineType::Unset | LineType::Automatic => {},
    }
    Some(ln)
}

fn encode_axes(
    chart: &Chart,
    spec: &ChartKindSpec,
    ids: &[u32],
    lang: &str,
    plot_area: &mut PlotArea,
) {
    let horizontal = spec.chart_type.is_horizontal();
    match spec.topology {
        AxisTopology::None => {},
        AxisTopology::CategoryValue | AxisTopology::CategoryValueSeries => {
            let (x_pos, y_pos) = if horizontal { ("l", "b") } else { ("b", "l") };
            plot_area.cat_ax.push(encode_axis(
                &chart.x_axis,
                AxisKind::Cat,
                ids[0],
                ids[1],
                axis_position(x_pos, chart.x_axis.secondary),
                lang,
                spec,
            ));
            plot_area.val_ax.push(encode_axis(
                &chart.y_axis,
                AxisKind::Val,
                ids[1],
                ids[0],
                axis_position(y_pos, chart.y_axis.secondary),
                lang,
                spec,
            ));
            if spec.topology == AxisTopology::CategoryValueSeries {
                plot_area.ser_ax.push(encode_axis(
                    &ChartAxis::default(),
                    AxisKind::Ser,
                    ids[2],
                    ids[1],
                    "b",
                    lang,
                    spec,
                ));
            }
        },
        AxisTopology::ValueValue => {
            plot_area.val_ax.push(encode_axis(
                &chart.x_axis,
                AxisKind::Val,
                ids[0],
                ids[1],
                axis_position("b", chart.x_axis.secondary),
                lang,
                spec,
            ));
            plot_area.val_ax.push(encode_axis(
                &chart.y_axis,
                AxisKind::Val,
                ids[1],
                ids[0],
                axis_position("l", chart.y_axis.secondary),
                lang,
                spec,
            ));
        },
    }
}

/// The far side of the plot area for secondary axes.
fn axis_position(primary: &'static str, secondary: bool) -> &'static str {
    match (primary, secondary) {
        ("b", true) => "t",
        ("l", true) => "r",
        _ => primary,
    }
}

fn encode_axis(
    axis: &ChartAxis,
    kind: AxisKind,
    id: u32,
    cross: u32,
    position: &str,
    lang: &str,
    spec: &ChartKindSpec,
) -> Axis {
    let mut out = Axis {
        ax_id: id.into(),
        scaling: Some(Scaling {
            log_base: axis.log_base.and_then(val),
            orientation: val((if axis.reverse_order { "maxMin" } else { "minMax" }).to_string()),
            max: axis.maximum.and_then(val),
            min: axis.minimum.and_then(val),
        }),
        delete: val(axis.none),
        ax_pos: val(position.to_string()),
        major_gridlines: axis.major_grid_lines.then(ChartLines::default),
        minor_gridlines: axis.minor_grid_lines.then(ChartLines::default),
        title: encode_title(&axis.title, lang),
        num_fmt: num_fmt(&axis.num_fmt),
        major_tick_mark: val("out".to_string()),
        minor_tick_mark: val("none".to_string()),
        tick_lbl_pos: val("nextTo".to_string()),
        tx_pr: (axis.font != Font::default()).then(|| font_text_body(&axis.font, lang)),
        cross_ax: val(cross),
        crosses: val((if axis.secondary { "max" } else { "autoZero" }).to_string()),
        ..Default::default()
    };
    match kind {
        AxisKind::Cat => {
            out.auto = val(true);
            out.lbl_algn = val("ctr".to_string());
            out.lbl_offset = val(100);
            out.tick_lbl_skip = axis.tick_label_skip.and_then(val);
            out.no_multi_lvl_lbl = val(false);
        },
        AxisKind::Val => {
            let between = if spec.topology == AxisTopology::ValueValue {
                "midCat"
            } else {
                "between"
            };
            out.cross_between = val(between.to_string());
            out.major_unit = axis.major_unit.and_then(val);
        },
        AxisKind::Ser => {},
    }
    out
}

/// Rich-text title; `None` for an empty run list.
fn encode_title(runs: &[RichTextRun], lang: &str) -> Option<Title> {
    if runs.is_empty() {
        return None;
    }
    let paragraph = Paragraph {
        p_pr: Some(ParagraphProps {
            def_r_pr: Some(RunProps::default()),
        }),
        r: runs
            .iter()
            .map(|run| Run {
                r_pr: run.font.as_ref().map(|f| run_props(f, lang)),
                t: run.text.clone(),
            })
            .collect(),
        end_para_r_pr: None,
    };
    Some(Title {
        tx: Some(Tx {
            rich: Some(TextBody {
                body_pr: Some(BodyPr::default()),
                lst_style: Some(Empty),
                p: vec![paragraph],
            }),
            ..Default::default()
        }),
        overlay: val(false),
        ..Default::default()
    })
}

/// Text body whose default run properties carry `font`, as used by `c:txPr`.
fn font_text_body(font: &Font, lang: &str) -> TextBody {
    TextBody {
        body_pr: Some(BodyPr::default()),
        lst_style: Some(Empty),
        p: vec![Paragraph {
            p_pr: Some(ParagraphProps {
                def_r_pr: Some(run_props(font, lang)),
            }),
            r: Vec::new(),
            end_para_r_pr: Some(RunProps {
                lang: Some(lang.to_string()),
                ..Default::default()
            }),
        }],
    }
}

pub(crate) fn run_props(font: &Font, lang: &str) -> RunProps {
    let family = font.family.as_deref().map(TextFont::new);
    RunProps {
        lang: Some(lang.to_string()),
        b: Some(font.bold),
        i: Some(font.italic),
        sz: font.size.map(|s| (s * 100.0).round() as u32),
        u: font.underline.clone(),
        strike: Some((if font.strike { "sngStrike" } else { "noStrike" }).to_string()),
        baseline: Some(0),
        solid_fill: font.color.as_deref().map(SolidFill::rgb),
        latin: family.clone(),
        ea: family.clone(),
        cs: family,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::charts::model::ChartLegend;
    use crate::ooxml::charts::provider::StaticDataProvider;
    use crate::ooxml::charts::schema::{flag_of, value_of};
    use crate::ooxml::charts::types::{ChartType, DataLabelPosition, LegendPosition};

    fn provider() -> StaticDataProvider {
        StaticDataProvider::new()
            .with("Sheet1!$A$2:$A$4", ["North", "South", "West"])
            .with("Sheet1!$B$2:$B$4", ["10", "20", "30"])
            .with("Sheet1!$C$2:$C$4", ["5", "15", "25"])
            .with("Sheet1!$D$2:$D$4", ["1", "2", "3"])
            .with("Sheet1!$E$2:$E$4", Vec::<String>::new())
    }

    fn two_series(chart_type: ChartType) -> Chart {
        Chart::new(chart_type)
            .with_series(ChartSeries::new("Sheet1!$B$1", "Sheet1!$A$2:$A$4", "Sheet1!$B$2:$B$4"))
            .with_series(ChartSeries::new("Sheet1!$C$1", "Sheet1!$A$2:$A$4", "Sheet1!$C$2:$C$4"))
    }

    #[test]
    fn test_bar_chart_with_two_axes() {
        let provider = provider();
        let ctx = EncodeContext::new(&provider);
        let space = encode(&two_series(ChartType::Col), &ctx).unwrap();
        let plot_area = &space.chart.plot_area;

        assert_eq!(plot_area.groups.len(), 1);
        let bar = plot_area.container(ContainerKind::Bar).unwrap();
        assert_eq!(value_of(&bar.bar_dir).as_deref(), Some("col"));
        assert_eq!(bar.ser.len(), 2);
        let ids = bar.axis_ids();
        assert_eq!(ids.len(), 2);
        assert_eq!(plot_area.cat_ax.len(), 1);
        assert_eq!(plot_area.val_ax.len(), 1);
        assert_eq!(plot_area.cat_ax[0].id(), Some(ids[0]));
        assert_eq!(plot_area.val_ax[0].id(), Some(ids[1]));
        assert_eq!(plot_area.cat_ax[0].crosses_axis(), Some(ids[1]));
        assert_eq!(plot_area.val_ax[0].crosses_axis(), Some(ids[0]));

        let values = bar.ser[0].val.as_ref().and_then(|v| v.num_ref.as_ref()).unwrap();
        let cache = values.cache.as_ref().unwrap();
        assert_eq!(cache.declared_count(), 3);
        assert_eq!(cache.pt.len(), 3);
        assert_eq!(cache.format_code.as_deref(), Some("General"));
        let categories = bar.ser[1].cat.as_ref().and_then(|c| c.str_ref.as_ref()).unwrap();
        assert_eq!(categories.cache.as_ref().unwrap().pt[2].v, "West");
    }

    #[test]
    fn test_default_suppression() {
        let provider = provider();
        let ctx = EncodeContext::new(&provider);
        let mut chart = two_series(ChartType::Col);
        let space = encode(&chart, &ctx).unwrap();
        let bar = &space.chart.plot_area.groups[0];
        assert!(bar.gap_width.is_none());
        assert!(bar.overlap.is_none());
        assert!(bar.d_lbls.is_some());
        assert_eq!(value_of(&space.chart.disp_blanks_as).as_deref(), Some("gap"));

        chart.gap_width = 80;
        chart.overlap = -20;
        let space = encode(&chart, &ctx).unwrap();
        let bar = &space.chart.plot_area.groups[0];
        assert_eq!(value_of(&bar.gap_width), Some(80));
        assert_eq!(value_of(&bar.overlap), Some(-20));
    }

    #[test]
    fn test_pie_has_no_axes() {
        let provider = provider();
        let ctx = EncodeContext::new(&provider);
        let mut chart = two_series(ChartType::Pie);
        chart.hole_size = 60;
        chart.first_slice_angle = 45;
        let space = encode(&chart, &ctx).unwrap();
        let plot_area = &space.chart.plot_area;
        let pie = plot_area.container(ContainerKind::Pie).unwrap();
        assert!(pie.ax_id.is_empty());
        assert!(pie.hole_size.is_none());
        assert_eq!(value_of(&pie.first_slice_ang), Some(45));
        assert_eq!(plot_area.axes().count(), 0);
    }

    #[test]
    fn test_scatter_uses_coordinates() {
        let provider = provider();
        let ctx = EncodeContext::new(&provider).with_order(1);
        let space = encode(&two_series(ChartType::Scatter), &ctx).unwrap();
        let plot_area = &space.chart.plot_area;
        let scatter = plot_area.container(ContainerKind::Scatter).unwrap();
        assert_eq!(value_of(&scatter.scatter_style).as_deref(), Some("marker"));
        assert!(scatter.ser[0].x_val.is_some());
        assert!(scatter.ser[0].y_val.is_some());
        assert!(scatter.ser[0].cat.is_none());
        assert_eq!(plot_area.val_ax.len(), 2);
        assert_eq!(scatter.axis_ids(), vec![100_000_016, 100_000_017]);
        assert_eq!(
            value_of(&plot_area.val_ax[0].cross_between).as_deref(),
            Some("midCat")
        );
    }

    #[test]
    fn test_three_axis_topology() {
        let provider = provider();
        let ctx = EncodeContext::new(&provider);
        let space = encode(&two_series(ChartType::Col3D), &ctx).unwrap();
        let plot_area = &space.chart.plot_area;
        assert_eq!(plot_area.groups[0].axis_ids().len(), 3);
        assert_eq!(plot_area.ser_ax.len(), 1);
        assert!(space.chart.view3d.is_some());
        assert_eq!(value_of(&plot_area.groups[0].shape).as_deref(), Some("box"));
    }

    #[test]
    fn test_bubble_sizes() {
        let provider = provider();
        let ctx = EncodeContext::new(&provider);
        let chart = Chart::new(ChartType::Bubble3D).with_series(
            ChartSeries::new("", "Sheet1!$A$2:$A$4", "Sheet1!$B$2:$B$4")
                .with_sizes("Sheet1!$D$2:$D$4"),
        );
        let space = encode(&chart, &ctx).unwrap();
        let group = &space.chart.plot_area.groups[0];
        assert_eq!(flag_of(&group.bubble3d), Some(true));
        let ser = &group.ser[0];
        assert!(ser.tx.is_none());
        assert_eq!(flag_of(&ser.bubble3d), Some(true));
        let sizes = ser.bubble_size.as_ref().and_then(|s| s.num_ref.as_ref()).unwrap();
        assert_eq!(sizes.cache.as_ref().unwrap().pt.len(), 3);
    }

    #[test]
    fn test_empty_range_yields_empty_cache() {
        let provider = provider();
        let ctx = EncodeContext::new(&provider);
        let chart = Chart::new(ChartType::Line).with_series(ChartSeries::new(
            "Sheet1!$E$1",
            "",
            "Sheet1!$E$2:$E$4",
        ));
        let space = encode(&chart, &ctx).unwrap();
        let ser = &space.chart.plot_area.groups[0].ser[0];
        let cache = ser.val.as_ref().and_then(|v| v.num_ref.as_ref()).and_then(|r| r.cache.as_ref()).unwrap();
        assert_eq!(cache.declared_count(), 0);
        assert!(cache.pt_count.is_some());
        assert!(cache.pt.is_empty());
        assert!(ser.cat.is_none());
    }

    #[test]
    fn test_unresolved_range_fails() {
        let provider = provider();
        let ctx = EncodeContext::new(&provider);
        let chart = Chart::new(ChartType::Col).with_series(ChartSeries::new(
            "Sheet1!$B$1",
            "Sheet1!$A$2:$A$4",
            "Sheet9!$Z$1:$Z$9",
        ));
        assert!(matches!(
            encode(&chart, &ctx),
            Err(OoxmlError::SeriesResolution { formula, .. }) if formula == "Sheet9!$Z$1:$Z$9"
        ));
    }

    #[test]
    fn test_ordinal_overflow_fails() {
        let provider = provider();
        let ctx = EncodeContext::new(&provider).with_order(u32::MAX / 16);
        assert!(matches!(
            encode(&two_series(ChartType::Line), &ctx),
            Err(OoxmlError::InvalidFormat(_))
        ));
        // Charts without axes never allocate IDs.
        let pie = Chart::new(ChartType::Pie);
        assert!(encode(&pie, &ctx).is_ok());
    }

    #[test]
    fn test_secondary_and_horizontal_positions() {
        let provider = provider();
        let ctx = EncodeContext::new(&provider);
        let mut chart = two_series(ChartType::Bar);
        chart.y_axis.secondary = true;
        let space = encode(&chart, &ctx).unwrap();
        let plot_area = &space.chart.plot_area;
        assert_eq!(plot_area.cat_ax[0].position(), Some("l"));
        assert_eq!(plot_area.val_ax[0].position(), Some("t"));
        assert_eq!(value_of(&plot_area.val_ax[0].crosses).as_deref(), Some("max"));
    }

    #[test]
    fn test_axis_limit() {
        let mut plot_area = PlotArea::default();
        for (id, pos) in [(1, "b"), (2, "t"), (3, "b")] {
            plot_area.cat_ax.push(Axis {
                ax_id: id.into(),
                ax_pos: val(pos.to_string()),
                ..Default::default()
            });
        }
        match check_axis_limits(&plot_area) {
            Err(OoxmlError::AxisLimitExceeded {
                orientation,
                count,
                limit,
            }) => {
                assert_eq!(orientation, "horizontal");
                assert_eq!(count, 3);
                assert_eq!(limit, 2);
            },
            other => panic!("unexpected result: {:?}", other),
        }
        plot_area.cat_ax.pop();
        assert!(check_axis_limits(&plot_area).is_ok());
    }

    #[test]
    fn test_labels_legend_and_lines() {
        let provider = provider();
        let ctx = EncodeContext::new(&provider);
        let mut chart = two_series(ChartType::Line).with_legend(LegendPosition::None);
        chart.legend = ChartLegend {
            position: LegendPosition::None,
            show_legend_key: true,
        };
        chart.plot_area.show_val = true;
        chart.series[0].data_label_position = Some(DataLabelPosition::Above);
        chart.series[0].fill = Some("#ff0000".to_string());
        chart.series[0].line = ChartLine {
            line_type: LineType::Solid,
            smooth: true,
            width: 2.25,
        };
        let space = encode(&chart, &ctx).unwrap();
        assert!(space.chart.legend.is_none());

        let group = &space.chart.plot_area.groups[0];
        assert_eq!(flag_of(&group.marker), Some(true));
        let labels = group.d_lbls.as_ref().unwrap();
        assert_eq!(flag_of(&labels.show_val), Some(true));
        assert_eq!(flag_of(&labels.show_legend_key), Some(true));

        let ser = &group.ser[0];
        let ser_labels = ser.d_lbls.as_ref().unwrap();
        assert_eq!(value_of(&ser_labels.d_lbl_pos).as_deref(), Some("t"));
        let sp_pr = ser.sp_pr.as_ref().unwrap();
        assert_eq!(sp_pr.solid_fill.as_ref().and_then(SolidFill::rgb_value), Some("FF0000"));
        let ln = sp_pr.ln.as_ref().unwrap();
        assert_eq!(ln.w, Some(28_575));
        assert_eq!(ln.solid_fill.as_ref().and_then(SolidFill::rgb_value), Some("FF0000"));
        assert_eq!(flag_of(&ser.smooth), Some(true));
        assert!(group.ser[1].sp_pr.is_none());
    }

    #[test]
    fn test_serialized_chart_space() {
        let provider = provider();
        let ctx = EncodeContext::new(&provider).with_lang("de-DE");
        let chart = two_series(ChartType::Doughnut).with_title("Share");
        let bytes = encode(&chart, &ctx).unwrap().to_bytes();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("<?xml"));
        assert!(text.contains(r#"<c:lang val="de-DE"/>"#));
        assert!(text.contains("<c:doughnutChart>"));
        assert!(text.contains("<a:t>Share</a:t>"));
        let title = text.find("<c:title>").unwrap();
        let plot = text.find("<c:plotArea>").unwrap();
        let legend = text.find("<c:legend>").unwrap();
        assert!(title < plot && plot < legend);
    }
}
