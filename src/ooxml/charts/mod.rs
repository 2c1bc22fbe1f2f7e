//! Chart parts of spreadsheet documents.
//!
//! Three layers make up this module:
//!
//! - [`schema`]: a typed, order-preserving mirror of the DrawingML chart
//!   schema, parsed from and written to chart part bytes
//! - [`model`] and [`types`]: the public chart model callers configure
//! - [`encode()`] and [`decode()`]: the transforms between the two, driven
//!   by the static chart-kind table in [`dispatch`]
//!
//! # Example
//!
//! ```
//! use litchi_chart::ooxml::charts::{
//!     Chart, ChartSeries, ChartType, EncodeContext, StaticDataProvider, load_chart, save_chart,
//! };
//! use litchi_chart::ooxml::package::MemoryPartStore;
//!
//! let provider = StaticDataProvider::new()
//!     .with("Sheet1!$A$2:$A$4", ["Jan", "Feb", "Mar"])
//!     .with("Sheet1!$B$2:$B$4", ["100", "150", "200"]);
//! let chart = Chart::new(ChartType::Col)
//!     .with_title("Q1 Sales")
//!     .with_series(ChartSeries::new("Sheet1!$B$1", "Sheet1!$A$2:$A$4", "Sheet1!$B$2:$B$4"));
//!
//! let mut store = MemoryPartStore::new();
//! save_chart(&mut store, "xl/charts/chart1.xml", &chart, &EncodeContext::new(&provider))?;
//!
//! let loaded = load_chart(&store, "xl/charts/chart1.xml")?;
//! assert_eq!(loaded.chart_type, ChartType::Col);
//! assert_eq!(loaded.series[0].cache.values.len(), 3);
//! # Ok::<(), litchi_chart::ooxml::OoxmlError>(())
//! ```

pub mod decode;
pub mod dispatch;
pub mod encode;
pub mod model;
pub mod provider;
pub mod schema;
pub mod types;

pub use decode::decode;
pub use dispatch::{AxisTopology, ChartFields, ChartKindSpec, match_container, normalize, spec_for};
pub use encode::{check_axis_limits, encode};
pub use model::{
    CachedPoint, Chart, ChartAxis, ChartLegend, ChartLine, ChartMarker, ChartNumFmt,
    ChartPlotArea, ChartSeries, Font, RichTextRun, SeriesCache,
};
pub use provider::{DataProvider, EncodeContext, StaticDataProvider};
pub use schema::ChartSpace;
pub use types::{
    ChartType, DataLabelPosition, LegendPosition, LineType, MarkerSymbol, ScatterStyle,
    ShowBlanksAs,
};

use crate::ooxml::error::Result;
use crate::ooxml::package::{CHART_PART_TEMPLATE, PartStore};
use tracing::warn;

/// Encode `chart` and store it as `part_name`.
///
/// Nothing is written if encoding fails.
pub fn save_chart<S: PartStore + ?Sized>(
    store: &mut S,
    part_name: &str,
    chart: &Chart,
    ctx: &EncodeContext<'_>,
) -> Result<()> {
    let bytes = encode(chart, ctx)?.to_bytes();
    store.write_part(part_name, bytes)
}

/// Encode `chart` into the next free chart part and return its name.
pub fn add_chart<S: PartStore + ?Sized>(
    store: &mut S,
    chart: &Chart,
    ctx: &EncodeContext<'_>,
) -> Result<String> {
    let part_name = store.next_part_name(CHART_PART_TEMPLATE)?;
    save_chart(store, &part_name, chart, ctx)?;
    Ok(part_name)
}

/// Parse and decode the chart stored as `part_name`.
pub fn load_chart<S: PartStore + ?Sized>(store: &S, part_name: &str) -> Result<Chart> {
    let bytes = store.read_part(part_name)?;
    decode(&ChartSpace::from_bytes(&bytes)?)
}

/// Load every chart part of the package.
///
/// Each chart gets its own result, so one malformed chart does not prevent
/// its siblings from loading.
pub fn load_charts<S: PartStore + ?Sized>(store: &S) -> Vec<(String, Result<Chart>)> {
    let mut names: Vec<String> = store
        .part_names()
        .into_iter()
        .filter(|name| is_chart_part(name))
        .collect();
    names.sort_by_key(|name| chart_number(name));
    names
        .into_iter()
        .map(|name| {
            let result = load_chart(store, &name);
            if let Err(ref e) = result {
                warn!(part = %name, error = %e, "failed to load chart");
            }
            (name, result)
        })
        .collect()
}

fn is_chart_part(name: &str) -> bool {
    chart_number(name).is_some()
}

fn chart_number(name: &str) -> Option<u32> {
    let name = name.strip_prefix('/').unwrap_or(name);
    name.strip_prefix("xl/charts/chart")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::error::OoxmlError;
    use crate::ooxml::package::MemoryPartStore;

    fn provider() -> StaticDataProvider {
        StaticDataProvider::new()
            .with("Sheet1!$A$2:$A$3", ["a", "b"])
            .with("Sheet1!$B$2:$B$3", ["1", "2"])
    }

    fn sample(chart_type: ChartType) -> Chart {
        Chart::new(chart_type).with_series(ChartSeries::new(
            "Sheet1!$B$1",
            "Sheet1!$A$2:$A$3",
            "Sheet1!$B$2:$B$3",
        ))
    }

    #[test]
    fn test_add_and_load_charts() {
        let provider = provider();
        let mut store = MemoryPartStore::new();
        for (order, chart_type) in [ChartType::Pie, ChartType::Radar].into_iter().enumerate() {
            let ctx = EncodeContext::new(&provider).with_order(order as u32);
            add_chart(&mut store, &sample(chart_type), &ctx).unwrap();
        }
        store
            .write_part("xl/charts/chart10.xml", b"<c:chartSpace xmlns:c=\"c\"/>".to_vec())
            .unwrap();
        store.write_part("xl/workbook.xml", b"<workbook/>".to_vec()).unwrap();

        let loaded = load_charts(&store);
        let names: Vec<_> = loaded.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            ["xl/charts/chart1.xml", "xl/charts/chart2.xml", "xl/charts/chart10.xml"]
        );
        assert_eq!(loaded[0].1.as_ref().unwrap().chart_type, ChartType::Pie);
        assert_eq!(loaded[1].1.as_ref().unwrap().chart_type, ChartType::Radar);
        assert!(matches!(loaded[2].1, Err(OoxmlError::MalformedChartTree(_))));
    }

    #[test]
    fn test_failed_encode_writes_nothing() {
        let provider = StaticDataProvider::new();
        let mut store = MemoryPartStore::new();
        let ctx = EncodeContext::new(&provider);
        assert!(save_chart(&mut store, "xl/charts/chart1.xml", &sample(ChartType::Col), &ctx).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_part() {
        let store = MemoryPartStore::new();
        assert!(matches!(
            load_chart(&store, "xl/charts/chart1.xml"),
            Err(OoxmlError::PartNotFound(_))
        ));
    }

    #[test]
    fn test_chart_part_names() {
        assert_eq!(chart_number("/xl/charts/chart7.xml"), Some(7));
        assert_eq!(chart_number("xl/charts/chart.xml"), None);
        assert_eq!(chart_number("xl/drawings/drawing1.xml"), None);
        assert!(!is_chart_part("xl/charts/_rels/chart1.xml.rels"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::ooxml::charts::decode::check_axis_references;
    use proptest::prelude::*;

    fn word() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9]{0,8}"
    }

    fn color() -> impl Strategy<Value = String> {
        "[0-9A-F]{6}"
    }

    fn half_steps(range: std::ops::Range<i32>) -> impl Strategy<Value = f64> {
        range.prop_map(|n| f64::from(n) * 0.5)
    }

    fn font() -> impl Strategy<Value = Font> {
        (
            any::<bool>(),
            any::<bool>(),
            prop::option::of(Just("sng".to_string())),
            any::<bool>(),
            prop::option::of(prop::sample::select(vec!["Calibri", "Arial"]).prop_map(String::from)),
            prop::option::of(half_steps(0..200)),
            prop::option::of(color()),
        )
            .prop_map(|(bold, italic, underline, strike, family, size, color)| Font {
                bold,
                italic,
                underline,
                strike,
                family,
                size,
                color,
            })
    }

    fn runs() -> impl Strategy<Value = Vec<RichTextRun>> {
        prop::collection::vec(
            (word(), prop::option::of(font())).prop_map(|(text, font)| RichTextRun { text, font }),
            0..3,
        )
    }

    fn line() -> impl Strategy<Value = ChartLine> {
        (
            prop::sample::select(vec![
                LineType::Unset,
                LineType::Solid,
                LineType::None,
                LineType::Automatic,
            ]),
            any::<bool>(),
            (0u32..40).prop_map(|n| f64::from(n) * 0.25),
        )
            .prop_map(|(line_type, smooth, width)| ChartLine {
                line_type,
                smooth,
                width,
            })
    }

    fn num_fmt() -> impl Strategy<Value = ChartNumFmt> {
        (
            prop::option::of(prop::sample::select(vec!["0.00", "General", "0%"])),
            any::<bool>(),
        )
            .prop_map(|(code, source_linked)| ChartNumFmt {
                custom_num_fmt: code.unwrap_or_default().to_string(),
                source_linked,
            })
    }

    fn axis() -> impl Strategy<Value = ChartAxis> {
        (
            (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()),
            prop::option::of(half_steps(-4..40)),
            prop::option::of(0u32..5),
            prop::option::of(half_steps(-200..200)),
            prop::option::of(half_steps(-200..200)),
            prop::option::of(prop::sample::select(vec![1.0, 2.0, 10.0])),
            font(),
            num_fmt(),
            runs(),
        )
            .prop_map(
                |(
                    (none, major_grid_lines, minor_grid_lines, reverse_order, secondary),
                    major_unit,
                    tick_label_skip,
                    maximum,
                    minimum,
                    log_base,
                    font,
                    num_fmt,
                    title,
                )| ChartAxis {
                    none,
                    major_grid_lines,
                    minor_grid_lines,
                    major_unit,
                    tick_label_skip,
                    reverse_order,
                    secondary,
                    maximum,
                    minimum,
                    font,
                    log_base,
                    num_fmt,
                    title,
                },
            )
    }

    fn plot_area() -> impl Strategy<Value = ChartPlotArea> {
        (0u32..5, prop::array::uniform6(any::<bool>()), num_fmt()).prop_map(|(second, flags, num_fmt)| {
            ChartPlotArea {
                second_plot_values: second,
                show_bubble_size: flags[0],
                show_cat_name: flags[1],
                show_leader_lines: flags[2],
                show_percent: flags[3],
                show_ser_name: flags[4],
                show_val: flags[5],
                num_fmt,
            }
        })
    }

    /// Series content before formulas are assigned.
    #[derive(Debug, Clone)]
    struct SeriesParts {
        name: Option<String>,
        categories: Option<Vec<String>>,
        values: Vec<String>,
        sizes: Option<Vec<String>>,
        fill: Option<String>,
        line: ChartLine,
        marker: ChartMarker,
        label: Option<DataLabelPosition>,
    }

    fn series_parts() -> impl Strategy<Value = SeriesParts> {
        let cells = || prop::collection::vec("[0-9]{1,3}", 0..5);
        (
            prop::option::of(word()),
            prop::option::of(prop::collection::vec(word(), 0..5)),
            cells(),
            prop::option::of(cells()),
            prop::option::of(color()),
            line(),
            (
                prop::option::of(prop::sample::select(vec![
                    MarkerSymbol::Circle,
                    MarkerSymbol::Diamond,
                    MarkerSymbol::None,
                    MarkerSymbol::X,
                ])),
                prop::option::of(0u32..80),
            ),
            prop::option::of(prop::sample::select(vec![
                DataLabelPosition::BestFit,
                DataLabelPosition::Center,
                DataLabelPosition::InsideEnd,
                DataLabelPosition::OutsideEnd,
                DataLabelPosition::Above,
            ])),
        )
            .prop_map(
                |(name, categories, values, sizes, fill, line, (symbol, size), label)| SeriesParts {
                    name,
                    categories,
                    values,
                    sizes,
                    fill,
                    line,
                    marker: ChartMarker { symbol, size },
                    label,
                },
            )
    }

    fn points(values: &[String]) -> Vec<CachedPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| CachedPoint::new(i as u32, v.as_str()))
            .collect()
    }

    /// Register one range and return its formula and cache.
    fn range(
        provider: &mut StaticDataProvider,
        formula: String,
        values: Option<&Vec<String>>,
    ) -> (String, Vec<CachedPoint>) {
        match values {
            Some(values) => {
                provider.insert(formula.as_str(), values.iter().cloned());
                (formula, points(values))
            },
            None => (String::new(), Vec::new()),
        }
    }

    fn build_series(parts: &[SeriesParts], provider: &mut StaticDataProvider) -> Vec<ChartSeries> {
        parts
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let (categories, cat_cache) =
                    range(provider, format!("Data!$A${}", i + 1), p.categories.as_ref());
                let (values, val_cache) =
                    range(provider, format!("Data!$B${}", i + 1), Some(&p.values));
                let (sizes, size_cache) =
                    range(provider, format!("Data!$C${}", i + 1), p.sizes.as_ref());
                ChartSeries {
                    name: p.name.clone().unwrap_or_default(),
                    categories,
                    values,
                    sizes,
                    fill: p.fill.clone(),
                    line: p.line,
                    marker: p.marker,
                    data_label_position: p.label,
                    cache: SeriesCache {
                        categories: cat_cache,
                        values: val_cache,
                        sizes: size_cache,
                    },
                }
            })
            .collect()
    }

    fn chart_with_provider() -> impl Strategy<Value = (Chart, StaticDataProvider)> {
        (
            prop::sample::select(ChartType::ALL.to_vec()),
            prop::collection::vec(series_parts(), 0..4),
            (runs(), any::<bool>()),
            (
                prop::sample::select(vec![
                    LegendPosition::None,
                    LegendPosition::Top,
                    LegendPosition::Bottom,
                    LegendPosition::Left,
                    LegendPosition::Right,
                    LegendPosition::TopRight,
                ]),
                any::<bool>(),
            ),
            prop::option::of(any::<bool>()),
            (axis(), axis()),
            plot_area(),
            line(),
            prop::sample::select(vec![ShowBlanksAs::Gap, ShowBlanksAs::Span, ShowBlanksAs::Zero]),
            (0u32..400, 0u32..100, 0u32..600, -150i32..150, 0u32..400),
            prop::sample::select(vec![
                ScatterStyle::None,
                ScatterStyle::Line,
                ScatterStyle::LineMarker,
                ScatterStyle::Marker,
                ScatterStyle::Smooth,
                ScatterStyle::SmoothMarker,
            ]),
        )
            .prop_map(
                |(
                    chart_type,
                    parts,
                    (title, auto_title_deleted),
                    (position, show_legend_key),
                    vary_colors,
                    (x_axis, y_axis),
                    plot_area,
                    border,
                    show_blanks_as,
                    (bubble_size, hole_size, gap_width, overlap, first_slice_angle),
                    scatter_style,
                )| {
                    let mut provider = StaticDataProvider::new();
                    let chart = Chart {
                        chart_type,
                        series: build_series(&parts, &mut provider),
                        title,
                        auto_title_deleted,
                        legend: ChartLegend {
                            position,
                            show_legend_key,
                        },
                        vary_colors,
                        x_axis,
                        y_axis,
                        plot_area,
                        border,
                        show_blanks_as,
                        bubble_size,
                        hole_size,
                        gap_width,
                        overlap,
                        first_slice_angle,
                        scatter_style,
                    };
                    (chart, provider)
                },
            )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn prop_round_trip_matches_normalized((chart, provider) in chart_with_provider()) {
            let ctx = EncodeContext::new(&provider);
            let bytes = encode(&chart, &ctx).unwrap().to_bytes();
            let decoded = decode(&ChartSpace::from_bytes(&bytes).unwrap()).unwrap();
            prop_assert_eq!(decoded, normalize(&chart));
        }

        #[test]
        fn prop_encoded_tree_is_well_formed((chart, provider) in chart_with_provider()) {
            let ctx = EncodeContext::new(&provider).with_order(3);
            let space = encode(&chart, &ctx).unwrap();
            let plot_area = &space.chart.plot_area;

            prop_assert_eq!(plot_area.groups.len(), 1);
            let group = &plot_area.groups[0];
            prop_assert_eq!(group.kind, spec_for(chart.chart_type).container);
            prop_assert!(check_axis_references(plot_area, group).is_ok());
            prop_assert!(check_axis_limits(plot_area).is_ok());
            prop_assert_eq!(
                group.axis_ids().len(),
                spec_for(chart.chart_type).topology.axis_count()
            );

            for ser in &group.ser {
                let sources = [&ser.cat, &ser.val, &ser.x_val, &ser.y_val, &ser.bubble_size];
                for source in sources.into_iter().flatten() {
                    if let Some(cache) = source.reference().and_then(|r| r.cache.as_ref()) {
                        prop_assert_eq!(cache.declared_count() as usize, cache.pt.len());
                    }
                }
            }

            prop_assert_eq!(space.to_bytes(), encode(&chart, &ctx).unwrap().to_bytes());
        }

        #[test]
        fn prop_normalize_is_idempotent((chart, _provider) in chart_with_provider()) {
            let once = normalize(&chart);
            prop_assert_eq!(normalize(&once), once);
        }
    }
}
