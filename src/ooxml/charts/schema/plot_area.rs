//! Plot area: chart-kind containers and axes.

use super::drawing::{ShapeProperties, TextBody};
use super::series::{DLbls, Series};
use super::{
    SchemaElement, ValBool, ValFloat, ValInt, ValStr, ValUint, attr_of, many, opt, push_all,
    push_attr_opt, push_opt, required,
};
use crate::common::xml::XmlElement;
use crate::ooxml::error::{OoxmlError, Result};
use phf::phf_map;
use std::fmt;

/// The mutually exclusive chart-kind containers a plot area can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Area,
    Area3D,
    Bar,
    Bar3D,
    Bubble,
    Doughnut,
    Line,
    Line3D,
    Pie,
    Pie3D,
    OfPie,
    Radar,
    Scatter,
    Surface,
    Surface3D,
}

static CONTAINER_TAGS: phf::Map<&'static str, ContainerKind> = phf_map! {
    "areaChart" => ContainerKind::Area,
    "area3DChart" => ContainerKind::Area3D,
    "barChart" => ContainerKind::Bar,
    "bar3DChart" => ContainerKind::Bar3D,
    "bubbleChart" => ContainerKind::Bubble,
    "doughnutChart" => ContainerKind::Doughnut,
    "lineChart" => ContainerKind::Line,
    "line3DChart" => ContainerKind::Line3D,
    "pieChart" => ContainerKind::Pie,
    "pie3DChart" => ContainerKind::Pie3D,
    "ofPieChart" => ContainerKind::OfPie,
    "radarChart" => ContainerKind::Radar,
    "scatterChart" => ContainerKind::Scatter,
    "surfaceChart" => ContainerKind::Surface,
    "surface3DChart" => ContainerKind::Surface3D,
};

impl ContainerKind {
    /// Local element name of the container.
    #[inline]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Area => "areaChart",
            Self::Area3D => "area3DChart",
            Self::Bar => "barChart",
            Self::Bar3D => "bar3DChart",
            Self::Bubble => "bubbleChart",
            Self::Doughnut => "doughnutChart",
            Self::Line => "lineChart",
            Self::Line3D => "line3DChart",
            Self::Pie => "pieChart",
            Self::Pie3D => "pie3DChart",
            Self::OfPie => "ofPieChart",
            Self::Radar => "radarChart",
            Self::Scatter => "scatterChart",
            Self::Surface => "surfaceChart",
            Self::Surface3D => "surface3DChart",
        }
    }

    /// Look up a container by local element name.
    #[inline]
    pub fn from_tag(tag: &str) -> Option<Self> {
        CONTAINER_TAGS.get(tag).copied()
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Axis element flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisKind {
    Cat,
    Val,
    Ser,
}

impl AxisKind {
    #[inline]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Cat => "catAx",
            Self::Val => "valAx",
            Self::Ser => "serAx",
        }
    }
}

/// The `c:plotArea` element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotArea {
    pub layout: Option<XmlElement>,
    /// Chart-kind containers in document order. A valid chart has exactly one.
    pub groups: Vec<ChartGroup>,
    pub cat_ax: Vec<Axis>,
    pub val_ax: Vec<Axis>,
    pub ser_ax: Vec<Axis>,
    pub d_table: Option<XmlElement>,
    pub sp_pr: Option<ShapeProperties>,
}

impl PlotArea {
    /// The container of the given kind, if populated.
    pub fn container(&self, kind: ContainerKind) -> Option<&ChartGroup> {
        self.groups.iter().find(|g| g.kind == kind)
    }

    /// All axes with their flavour, in write order.
    pub fn axes(&self) -> impl Iterator<Item = (AxisKind, &Axis)> {
        self.cat_ax
            .iter()
            .map(|a| (AxisKind::Cat, a))
            .chain(self.val_ax.iter().map(|a| (AxisKind::Val, a)))
            .chain(self.ser_ax.iter().map(|a| (AxisKind::Ser, a)))
    }

    /// Find an axis by its ID.
    pub fn axis_by_id(&self, id: u32) -> Option<(AxisKind, &Axis)> {
        self.axes().find(|(_, a)| a.id() == Some(id))
    }
}

impl SchemaElement for PlotArea {
    fn from_element(el: &XmlElement) -> Result<Self> {
        let groups = el
            .elements()
            .filter(|child| ContainerKind::from_tag(child.local_name()).is_some())
            .map(ChartGroup::from_element)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            layout: opt(el, "layout")?,
            groups,
            cat_ax: many(el, "catAx")?,
            val_ax: many(el, "valAx")?,
            ser_ax: many(el, "serAx")?,
            d_table: opt(el, "dTable")?,
            sp_pr: opt(el, "spPr")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_opt(&mut el, "c:layout", &self.layout);
        for group in &self.groups {
            el.push_child(group.to_element(&format!("c:{}", group.kind.tag())));
        }
        push_all(&mut el, "c:catAx", &self.cat_ax);
        push_all(&mut el, "c:valAx", &self.val_ax);
        push_all(&mut el, "c:serAx", &self.ser_ax);
        push_opt(&mut el, "c:dTable", &self.d_table);
        push_opt(&mut el, "c:spPr", &self.sp_pr);
        el
    }
}

/// Union of every chart-kind container's content.
///
/// Each container only uses a subset; the write order below is compatible
/// with the schema sequence of every container kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGroup {
    pub kind: ContainerKind,
    pub bar_dir: Option<ValStr>,
    pub grouping: Option<ValStr>,
    pub radar_style: Option<ValStr>,
    pub scatter_style: Option<ValStr>,
    pub of_pie_type: Option<ValStr>,
    pub wireframe: Option<ValBool>,
    pub vary_colors: Option<ValBool>,
    pub ser: Vec<Series>,
    pub d_lbls: Option<DLbls>,
    pub drop_lines: Option<ChartLines>,
    pub bubble3d: Option<ValBool>,
    pub bubble_scale: Option<ValUint>,
    pub show_neg_bubbles: Option<ValBool>,
    pub first_slice_ang: Option<ValUint>,
    pub hole_size: Option<ValUint>,
    pub gap_width: Option<ValUint>,
    pub gap_depth: Option<ValUint>,
    pub overlap: Option<ValInt>,
    pub split_type: Option<ValStr>,
    pub split_pos: Option<ValFloat>,
    pub second_pie_size: Option<ValUint>,
    pub ser_lines: Option<ChartLines>,
    pub shape: Option<ValStr>,
    pub marker: Option<ValBool>,
    pub smooth: Option<ValBool>,
    pub ax_id: Vec<ValUint>,
}

impl ChartGroup {
    /// An empty container of the given kind.
    pub fn new(kind: ContainerKind) -> Self {
        Self {
            kind,
            bar_dir: None,
            grouping: None,
            radar_style: None,
            scatter_style: None,
            of_pie_type: None,
            wireframe: None,
            vary_colors: None,
            ser: Vec::new(),
            d_lbls: None,
            drop_lines: None,
            bubble3d: None,
            bubble_scale: None,
            show_neg_bubbles: None,
            first_slice_ang: None,
            hole_size: None,
            gap_width: None,
            gap_depth: None,
            overlap: None,
            split_type: None,
            split_pos: None,
            second_pie_size: None,
            ser_lines: None,
            shape: None,
            marker: None,
            smooth: None,
            ax_id: Vec::new(),
        }
    }

    /// Referenced axis IDs, skipping entries without a value.
    pub fn axis_ids(&self) -> Vec<u32> {
        self.ax_id.iter().filter_map(|a| a.val).collect()
    }
}

impl SchemaElement for ChartGroup {
    fn from_element(el: &XmlElement) -> Result<Self> {
        let kind = ContainerKind::from_tag(el.local_name()).ok_or_else(|| {
            OoxmlError::MalformedChartTree(format!("<{}> is not a chart container", el.name))
        })?;
        Ok(Self {
            kind,
            bar_dir: opt(el, "barDir")?,
            grouping: opt(el, "grouping")?,
            radar_style: opt(el, "radarStyle")?,
            scatter_style: opt(el, "scatterStyle")?,
            of_pie_type: opt(el, "ofPieType")?,
            wireframe: opt(el, "wireframe")?,
            vary_colors: opt(el, "varyColors")?,
            ser: many(el, "ser")?,
            d_lbls: opt(el, "dLbls")?,
            drop_lines: opt(el, "dropLines")?,
            bubble3d: opt(el, "bubble3D")?,
            bubble_scale: opt(el, "bubbleScale")?,
            show_neg_bubbles: opt(el, "showNegBubbles")?,
            first_slice_ang: opt(el, "firstSliceAng")?,
            hole_size: opt(el, "holeSize")?,
            gap_width: opt(el, "gapWidth")?,
            gap_depth: opt(el, "gapDepth")?,
            overlap: opt(el, "overlap")?,
            split_type: opt(el, "splitType")?,
            split_pos: opt(el, "splitPos")?,
            second_pie_size: opt(el, "secondPieSize")?,
            ser_lines: opt(el, "serLines")?,
            shape: opt(el, "shape")?,
            marker: opt(el, "marker")?,
            smooth: opt(el, "smooth")?,
            ax_id: many(el, "axId")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_opt(&mut el, "c:barDir", &self.bar_dir);
        push_opt(&mut el, "c:grouping", &self.grouping);
        push_opt(&mut el, "c:radarStyle", &self.radar_style);
        push_opt(&mut el, "c:scatterStyle", &self.scatter_style);
        push_opt(&mut el, "c:ofPieType", &self.of_pie_type);
        push_opt(&mut el, "c:wireframe", &self.wireframe);
        push_opt(&mut el, "c:varyColors", &self.vary_colors);
        push_all(&mut el, "c:ser", &self.ser);
        push_opt(&mut el, "c:dLbls", &self.d_lbls);
        push_opt(&mut el, "c:dropLines", &self.drop_lines);
        push_opt(&mut el, "c:bubble3D", &self.bubble3d);
        push_opt(&mut el, "c:bubbleScale", &self.bubble_scale);
        push_opt(&mut el, "c:showNegBubbles", &self.show_neg_bubbles);
        push_opt(&mut el, "c:firstSliceAng", &self.first_slice_ang);
        push_opt(&mut el, "c:holeSize", &self.hole_size);
        push_opt(&mut el, "c:gapWidth", &self.gap_width);
        push_opt(&mut el, "c:gapDepth", &self.gap_depth);
        push_opt(&mut el, "c:overlap", &self.overlap);
        push_opt(&mut el, "c:splitType", &self.split_type);
        push_opt(&mut el, "c:splitPos", &self.split_pos);
        push_opt(&mut el, "c:secondPieSize", &self.second_pie_size);
        push_opt(&mut el, "c:serLines", &self.ser_lines);
        push_opt(&mut el, "c:shape", &self.shape);
        push_opt(&mut el, "c:marker", &self.marker);
        push_opt(&mut el, "c:smooth", &self.smooth);
        push_all(&mut el, "c:axId", &self.ax_id);
        el
    }
}

/// Line furniture such as gridlines, drop lines and series lines.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartLines {
    pub sp_pr: Option<ShapeProperties>,
}

impl SchemaElement for ChartLines {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            sp_pr: opt(el, "spPr")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_opt(&mut el, "c:spPr", &self.sp_pr);
        el
    }
}

/// Axis scaling.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scaling {
    pub log_base: Option<ValFloat>,
    pub orientation: Option<ValStr>,
    pub max: Option<ValFloat>,
    pub min: Option<ValFloat>,
}

impl SchemaElement for Scaling {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            log_base: opt(el, "logBase")?,
            orientation: opt(el, "orientation")?,
            max: opt(el, "max")?,
            min: opt(el, "min")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_opt(&mut el, "c:logBase", &self.log_base);
        push_opt(&mut el, "c:orientation", &self.orientation);
        push_opt(&mut el, "c:max", &self.max);
        push_opt(&mut el, "c:min", &self.min);
        el
    }
}

/// Number format (`c:numFmt`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumFmt {
    pub format_code: String,
    pub source_linked: Option<bool>,
}

impl SchemaElement for NumFmt {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            format_code: el.attr("formatCode").unwrap_or_default().to_string(),
            source_linked: attr_of(el, "sourceLinked")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name).with_attr("formatCode", self.format_code.as_str());
        push_attr_opt(&mut el, "sourceLinked", &self.source_linked);
        el
    }
}

/// Shared shape of `c:catAx`, `c:valAx` and `c:serAx`.
///
/// Category-only and value-only children are disjoint, so one write order
/// serves all three flavours.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Axis {
    pub ax_id: ValUint,
    pub scaling: Option<Scaling>,
    pub delete: Option<ValBool>,
    pub ax_pos: Option<ValStr>,
    pub major_gridlines: Option<ChartLines>,
    pub minor_gridlines: Option<ChartLines>,
    pub title: Option<super::chart_space::Title>,
    pub num_fmt: Option<NumFmt>,
    pub major_tick_mark: Option<ValStr>,
    pub minor_tick_mark: Option<ValStr>,
    pub tick_lbl_pos: Option<ValStr>,
    pub sp_pr: Option<ShapeProperties>,
    pub tx_pr: Option<TextBody>,
    pub cross_ax: Option<ValUint>,
    pub crosses: Option<ValStr>,
    pub crosses_at: Option<ValFloat>,
    pub cross_between: Option<ValStr>,
    pub major_unit: Option<ValFloat>,
    pub minor_unit: Option<ValFloat>,
    pub auto: Option<ValBool>,
    pub lbl_algn: Option<ValStr>,
    pub lbl_offset: Option<ValUint>,
    pub tick_lbl_skip: Option<ValUint>,
    pub tick_mark_skip: Option<ValUint>,
    pub no_multi_lvl_lbl: Option<ValBool>,
}

impl Axis {
    #[inline]
    pub fn id(&self) -> Option<u32> {
        self.ax_id.val
    }

    #[inline]
    pub fn crosses_axis(&self) -> Option<u32> {
        self.cross_ax.as_ref().and_then(|c| c.val)
    }

    /// Axis position (`b`, `l`, `r`, `t`), if set.
    #[inline]
    pub fn position(&self) -> Option<&str> {
        self.ax_pos.as_ref().and_then(|p| p.val.as_deref())
    }
}

impl SchemaElement for Axis {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            ax_id: required(el, "axId")?,
            scaling: opt(el, "scaling")?,
            delete: opt(el, "delete")?,
            ax_pos: opt(el, "axPos")?,
            major_gridlines: opt(el, "majorGridlines")?,
            minor_gridlines: opt(el, "minorGridlines")?,
            title: opt(el, "title")?,
            num_fmt: opt(el, "numFmt")?,
            major_tick_mark: opt(el, "majorTickMark")?,
            minor_tick_mark: opt(el, "minorTickMark")?,
            tick_lbl_pos: opt(el, "tickLblPos")?,
            sp_pr: opt(el, "spPr")?,
            tx_pr: opt(el, "txPr")?,
            cross_ax: opt(el, "crossAx")?,
            crosses: opt(el, "crosses")?,
            crosses_at: opt(el, "crossesAt")?,
            cross_between: opt(el, "crossBetween")?,
            major_unit: opt(el, "majorUnit")?,
            minor_unit: opt(el, "minorUnit")?,
            auto: opt(el, "auto")?,
            lbl_algn: opt(el, "lblAlgn")?,
            lbl_offset: opt(el, "lblOffset")?,
            tick_lbl_skip: opt(el, "tickLblSkip")?,
            tick_mark_skip: opt(el, "tickMarkSkip")?,
            no_multi_lvl_lbl: opt(el, "noMultiLvlLbl")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        el.push_child(self.ax_id.to_element("c:axId"));
        push_opt(&mut el, "c:scaling", &self.scaling);
        push_opt(&mut el, "c:delete", &self.delete);
        push_opt(&mut el, "c:axPos", &self.ax_pos);
        push_opt(&mut el, "c:majorGridlines", &self.major_gridlines);
        push_opt(&mut el, "c:minorGridlines", &self.minor_gridlines);
        push_opt(&mut el, "c:title", &self.title);
        push_opt(&mut el, "c:numFmt", &self.num_fmt);
        push_opt(&mut el, "c:majorTickMark", &self.major_tick_mark);
        push_opt(&mut el, "c:minorTickMark", &self.minor_tick_mark);
        push_opt(&mut el, "c:tickLblPos", &self.tick_lbl_pos);
        push_opt(&mut el, "c:spPr", &self.sp_pr);
        push_opt(&mut el, "c:txPr", &self.tx_pr);
        push_opt(&mut el, "c:crossAx", &self.cross_ax);
        push_opt(&mut el, "c:crosses", &self.crosses);
        push_opt(&mut el, "c:crossesAt", &self.crosses_at);
        push_opt(&mut el, "c:crossBetween", &self.cross_between);
        push_opt(&mut el, "c:majorUnit", &self.major_unit);
        push_opt(&mut el, "c:minorUnit", &self.minor_unit);
        push_opt(&mut el, "c:auto", &self.auto);
        push_opt(&mut el, "c:lblAlgn", &self.lbl_algn);
        push_opt(&mut el, "c:lblOffset", &self.lbl_offset);
        push_opt(&mut el, "c:tickLblSkip", &self.tick_lbl_skip);
        push_opt(&mut el, "c:tickMarkSkip", &self.tick_mark_skip);
        push_opt(&mut el, "c:noMultiLvlLbl", &self.no_multi_lvl_lbl);
        el
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::charts::schema::{val, value_of};

    #[test]
    fn test_container_tags_roundtrip() {
        let kinds = [
            ContainerKind::Area,
            ContainerKind::Area3D,
            ContainerKind::Bar,
            ContainerKind::Bar3D,
            ContainerKind::Bubble,
            ContainerKind::Doughnut,
            ContainerKind::Line,
            ContainerKind::Line3D,
            ContainerKind::Pie,
            ContainerKind::Pie3D,
            ContainerKind::OfPie,
            ContainerKind::Radar,
            ContainerKind::Scatter,
            ContainerKind::Surface,
            ContainerKind::Surface3D,
        ];
        for kind in kinds {
            assert_eq!(ContainerKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(ContainerKind::from_tag("stockChart"), None);
    }

    #[test]
    fn test_plot_area_collects_containers_and_axes() {
        let xml = br#"<c:plotArea xmlns:c="c">
            <c:layout/>
            <c:barChart>
                <c:barDir val="col"/><c:grouping val="clustered"/>
                <c:gapWidth val="80"/>
                <c:axId val="7"/><c:axId val="8"/>
            </c:barChart>
            <c:catAx><c:axId val="7"/><c:axPos val="b"/><c:crossAx val="8"/></c:catAx>
            <c:valAx><c:axId val="8"/><c:axPos val="l"/><c:crossAx val="7"/></c:valAx>
        </c:plotArea>"#;
        let area = PlotArea::from_element(&XmlElement::parse(xml).unwrap()).unwrap();
        assert_eq!(area.groups.len(), 1);
        let bar = area.container(ContainerKind::Bar).unwrap();
        assert_eq!(value_of(&bar.bar_dir).as_deref(), Some("col"));
        assert_eq!(value_of(&bar.gap_width), Some(80));
        assert_eq!(bar.axis_ids(), vec![7, 8]);
        assert_eq!(area.axis_by_id(8).map(|(k, _)| k), Some(AxisKind::Val));
        assert_eq!(area.cat_ax[0].position(), Some("b"));
        assert_eq!(area.cat_ax[0].crosses_axis(), Some(8));
    }

    #[test]
    fn test_group_write_order() {
        let mut group = ChartGroup::new(ContainerKind::Bar3D);
        group.ax_id = vec![ValUint { val: Some(1) }, ValUint { val: Some(2) }];
        group.shape = val("box".to_string());
        group.gap_depth = val(150);
        group.gap_width = val(150);
        group.bar_dir = val("bar".to_string());
        let el = group.to_element("c:bar3DChart");
        let names: Vec<_> = el.elements().map(|c| c.local_name()).collect();
        assert_eq!(names, ["barDir", "gapWidth", "gapDepth", "shape", "axId", "axId"]);
    }

    #[test]
    fn test_axis_requires_id() {
        let xml = br#"<c:valAx xmlns:c="c"><c:delete val="0"/></c:valAx>"#;
        assert!(Axis::from_element(&XmlElement::parse(xml).unwrap()).is_err());
    }
}
