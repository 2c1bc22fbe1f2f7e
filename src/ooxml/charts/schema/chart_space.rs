//! Chart part root: `c:chartSpace`, `c:chart` and their direct furniture.

use super::drawing::{ShapeProperties, TextBody};
use super::plot_area::PlotArea;
use super::series::DataReference;
use super::{
    NS_CHART, NS_DRAWING, NS_RELATIONSHIPS, SchemaElement, ValBool, ValInt, ValStr, ValUint,
    attr_of, foreign_namespaces, many, opt, push_all, push_attr_opt, push_opt, text_of,
};
use crate::common::xml::XmlElement;
use crate::ooxml::error::{OoxmlError, Result};

const FIXED_NAMESPACES: [&str; 3] = ["xmlns:c", "xmlns:a", "xmlns:r"];

/// Root of a chart part.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSpace {
    /// Root namespace declarations besides `c`, `a` and `r`, kept for opaque subtrees
    pub namespaces: Vec<(String, String)>,
    pub date1904: Option<ValBool>,
    pub lang: Option<ValStr>,
    pub rounded_corners: Option<ValBool>,
    pub style: Option<ValUint>,
    pub chart: ChartElement,
    pub sp_pr: Option<ShapeProperties>,
    pub tx_pr: Option<TextBody>,
    pub external_data: Option<XmlElement>,
    pub print_settings: Option<PrintSettings>,
}

impl ChartSpace {
    /// Parse a serialized chart part.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let root = XmlElement::parse(bytes)?;
        if root.local_name() != "chartSpace" {
            return Err(OoxmlError::InvalidFormat(format!(
                "Expected <c:chartSpace> root, found <{}>",
                root.name
            )));
        }
        Self::from_element(&root)
    }

    /// Serialize as a complete chart part.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_element("c:chartSpace").to_document()
    }
}

impl SchemaElement for ChartSpace {
    fn from_element(el: &XmlElement) -> Result<Self> {
        let chart = match el.child("chart") {
            Some(chart) => ChartElement::from_element(chart)?,
            None => {
                return Err(OoxmlError::MalformedChartTree(
                    "chartSpace has no chart element".to_string(),
                ));
            },
        };
        Ok(Self {
            namespaces: foreign_namespaces(el, &FIXED_NAMESPACES),
            date1904: opt(el, "date1904")?,
            lang: opt(el, "lang")?,
            rounded_corners: opt(el, "roundedCorners")?,
            style: opt(el, "style")?,
            chart,
            sp_pr: opt(el, "spPr")?,
            tx_pr: opt(el, "txPr")?,
            external_data: opt(el, "externalData")?,
            print_settings: opt(el, "printSettings")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name)
            .with_attr("xmlns:c", NS_CHART)
            .with_attr("xmlns:a", NS_DRAWING)
            .with_attr("xmlns:r", NS_RELATIONSHIPS);
        for (prefix, uri) in &self.namespaces {
            el.push_attr(prefix.as_str(), uri.as_str());
        }
        push_opt(&mut el, "c:date1904", &self.date1904);
        push_opt(&mut el, "c:lang", &self.lang);
        push_opt(&mut el, "c:roundedCorners", &self.rounded_corners);
        push_opt(&mut el, "c:style", &self.style);
        el.push_child(self.chart.to_element("c:chart"));
        push_opt(&mut el, "c:spPr", &self.sp_pr);
        push_opt(&mut el, "c:txPr", &self.tx_pr);
        push_opt(&mut el, "c:externalData", &self.external_data);
        push_opt(&mut el, "c:printSettings", &self.print_settings);
        el
    }
}

/// The `c:chart` element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartElement {
    pub title: Option<Title>,
    pub auto_title_deleted: Option<ValBool>,
    pub view3d: Option<View3D>,
    pub floor: Option<WallFloor>,
    pub side_wall: Option<WallFloor>,
    pub back_wall: Option<WallFloor>,
    pub plot_area: PlotArea,
    pub legend: Option<Legend>,
    pub plot_vis_only: Option<ValBool>,
    pub disp_blanks_as: Option<ValStr>,
    pub show_d_lbls_over_max: Option<ValBool>,
}

impl SchemaElement for ChartElement {
    fn from_element(el: &XmlElement) -> Result<Self> {
        let plot_area = match el.child("plotArea") {
            Some(plot_area) => PlotArea::from_element(plot_area)?,
            None => {
                return Err(OoxmlError::MalformedChartTree(
                    "chart has no plotArea element".to_string(),
                ));
            },
        };
        Ok(Self {
            title: opt(el, "title")?,
            auto_title_deleted: opt(el, "autoTitleDeleted")?,
            view3d: opt(el, "view3D")?,
            floor: opt(el, "floor")?,
            side_wall: opt(el, "sideWall")?,
            back_wall: opt(el, "backWall")?,
            plot_area,
            legend: opt(el, "legend")?,
            plot_vis_only: opt(el, "plotVisOnly")?,
            disp_blanks_as: opt(el, "dispBlanksAs")?,
            show_d_lbls_over_max: opt(el, "showDLblsOverMax")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_opt(&mut el, "c:title", &self.title);
        push_opt(&mut el, "c:autoTitleDeleted", &self.auto_title_deleted);
        push_opt(&mut el, "c:view3D", &self.view3d);
        push_opt(&mut el, "c:floor", &self.floor);
        push_opt(&mut el, "c:sideWall", &self.side_wall);
        push_opt(&mut el, "c:backWall", &self.back_wall);
        el.push_child(self.plot_area.to_element("c:plotArea"));
        push_opt(&mut el, "c:legend", &self.legend);
        push_opt(&mut el, "c:plotVisOnly", &self.plot_vis_only);
        push_opt(&mut el, "c:dispBlanksAs", &self.disp_blanks_as);
        push_opt(&mut el, "c:showDLblsOverMax", &self.show_d_lbls_over_max);
        el
    }
}

/// Chart or axis title.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Title {
    pub tx: Option<Tx>,
    pub layout: Option<XmlElement>,
    pub overlay: Option<ValBool>,
    pub sp_pr: Option<ShapeProperties>,
    pub tx_pr: Option<TextBody>,
}

impl SchemaElement for Title {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            tx: opt(el, "tx")?,
            layout: opt(el, "layout")?,
            overlay: opt(el, "overlay")?,
            sp_pr: opt(el, "spPr")?,
            tx_pr: opt(el, "txPr")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_opt(&mut el, "c:tx", &self.tx);
        push_opt(&mut el, "c:layout", &self.layout);
        push_opt(&mut el, "c:overlay", &self.overlay);
        push_opt(&mut el, "c:spPr", &self.sp_pr);
        push_opt(&mut el, "c:txPr", &self.tx_pr);
        el
    }
}

/// Text source of a title (`rich` or `strRef`) or a series name (`strRef` or `v`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tx {
    pub str_ref: Option<DataReference>,
    pub rich: Option<TextBody>,
    pub v: Option<String>,
}

impl SchemaElement for Tx {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            str_ref: opt(el, "strRef")?,
            rich: opt(el, "rich")?,
            v: text_of(el, "v"),
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_opt(&mut el, "c:strRef", &self.str_ref);
        push_opt(&mut el, "c:rich", &self.rich);
        super::push_text_opt(&mut el, "c:v", &self.v);
        el
    }
}

/// 3-D view settings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct View3D {
    pub rot_x: Option<ValInt>,
    pub h_percent: Option<ValUint>,
    pub rot_y: Option<ValUint>,
    pub depth_percent: Option<ValUint>,
    pub r_ang_ax: Option<ValBool>,
    pub perspective: Option<ValUint>,
}

impl SchemaElement for View3D {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            rot_x: opt(el, "rotX")?,
            h_percent: opt(el, "hPercent")?,
            rot_y: opt(el, "rotY")?,
            depth_percent: opt(el, "depthPercent")?,
            r_ang_ax: opt(el, "rAngAx")?,
            perspective: opt(el, "perspective")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_opt(&mut el, "c:rotX", &self.rot_x);
        push_opt(&mut el, "c:hPercent", &self.h_percent);
        push_opt(&mut el, "c:rotY", &self.rot_y);
        push_opt(&mut el, "c:depthPercent", &self.depth_percent);
        push_opt(&mut el, "c:rAngAx", &self.r_ang_ax);
        push_opt(&mut el, "c:perspective", &self.perspective);
        el
    }
}

/// Floor, side wall or back wall of a 3-D chart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WallFloor {
    pub thickness: Option<ValUint>,
    pub sp_pr: Option<ShapeProperties>,
}

impl SchemaElement for WallFloor {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            thickness: opt(el, "thickness")?,
            sp_pr: opt(el, "spPr")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_opt(&mut el, "c:thickness", &self.thickness);
        push_opt(&mut el, "c:spPr", &self.sp_pr);
        el
    }
}

/// Chart legend.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Legend {
    pub legend_pos: Option<ValStr>,
    pub legend_entry: Vec<LegendEntry>,
    pub layout: Option<XmlElement>,
    pub overlay: Option<ValBool>,
    pub sp_pr: Option<ShapeProperties>,
    pub tx_pr: Option<TextBody>,
}

impl SchemaElement for Legend {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            legend_pos: opt(el, "legendPos")?,
            legend_entry: many(el, "legendEntry")?,
            layout: opt(el, "layout")?,
            overlay: opt(el, "overlay")?,
            sp_pr: opt(el, "spPr")?,
            tx_pr: opt(el, "txPr")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_opt(&mut el, "c:legendPos", &self.legend_pos);
        push_all(&mut el, "c:legendEntry", &self.legend_entry);
        push_opt(&mut el, "c:layout", &self.layout);
        push_opt(&mut el, "c:overlay", &self.overlay);
        push_opt(&mut el, "c:spPr", &self.sp_pr);
        push_opt(&mut el, "c:txPr", &self.tx_pr);
        el
    }
}

/// Per-entry legend override.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LegendEntry {
    pub idx: Option<ValUint>,
    pub delete: Option<ValBool>,
    pub tx_pr: Option<TextBody>,
}

impl SchemaElement for LegendEntry {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            idx: opt(el, "idx")?,
            delete: opt(el, "delete")?,
            tx_pr: opt(el, "txPr")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_opt(&mut el, "c:idx", &self.idx);
        push_opt(&mut el, "c:delete", &self.delete);
        push_opt(&mut el, "c:txPr", &self.tx_pr);
        el
    }
}

/// Print settings of the chart part.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrintSettings {
    pub header_footer: Option<XmlElement>,
    pub page_margins: Option<PageMargins>,
    pub page_setup: Option<XmlElement>,
}

impl SchemaElement for PrintSettings {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            header_footer: opt(el, "headerFooter")?,
            page_margins: opt(el, "pageMargins")?,
            page_setup: opt(el, "pageSetup")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_opt(&mut el, "c:headerFooter", &self.header_footer);
        push_opt(&mut el, "c:pageMargins", &self.page_margins);
        push_opt(&mut el, "c:pageSetup", &self.page_setup);
        el
    }
}

/// Page margins in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageMargins {
    pub b: f64,
    pub l: f64,
    pub r: f64,
    pub t: f64,
    pub header: f64,
    pub footer: f64,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            b: 0.75,
            l: 0.7,
            r: 0.7,
            t: 0.75,
            header: 0.3,
            footer: 0.3,
        }
    }
}

impl SchemaElement for PageMargins {
    fn from_element(el: &XmlElement) -> Result<Self> {
        let d = Self::default();
        Ok(Self {
            b: attr_of(el, "b")?.unwrap_or(d.b),
            l: attr_of(el, "l")?.unwrap_or(d.l),
            r: attr_of(el, "r")?.unwrap_or(d.r),
            t: attr_of(el, "t")?.unwrap_or(d.t),
            header: attr_of(el, "header")?.unwrap_or(d.header),
            footer: attr_of(el, "footer")?.unwrap_or(d.footer),
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_attr_opt(&mut el, "b", &Some(self.b));
        push_attr_opt(&mut el, "l", &Some(self.l));
        push_attr_opt(&mut el, "r", &Some(self.r));
        push_attr_opt(&mut el, "t", &Some(self.t));
        push_attr_opt(&mut el, "header", &Some(self.header));
        push_attr_opt(&mut el, "footer", &Some(self.footer));
        el
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
  <c:date1904 val="0"/>
  <c:lang val="en-US"/>
  <c:chart>
    <c:autoTitleDeleted val="1"/>
    <c:plotArea><c:layout/></c:plotArea>
    <c:plotVisOnly/>
    <c:dispBlanksAs val="zero"/>
  </c:chart>
  <c:printSettings><c:pageMargins b="1" l="0.5" r="0.5" t="1" header="0.3" footer="0.3"/></c:printSettings>
</c:chartSpace>"#;

    #[test]
    fn test_parse_minimal_chart_space() {
        let space = ChartSpace::from_bytes(MINIMAL).unwrap();
        assert_eq!(super::super::value_of(&space.lang).as_deref(), Some("en-US"));
        assert_eq!(super::super::flag_of(&space.date1904), Some(false));
        assert!(space.rounded_corners.is_none());
        assert_eq!(super::super::flag_of(&space.chart.plot_vis_only), Some(true));
        assert_eq!(
            super::super::value_of(&space.chart.disp_blanks_as).as_deref(),
            Some("zero")
        );
        assert!(space.chart.plot_area.layout.is_some());
        let margins = space.print_settings.as_ref().unwrap().page_margins.unwrap();
        assert_eq!(margins.b, 1.0);
        assert_eq!(margins.l, 0.5);
    }

    #[test]
    fn test_chart_space_reserialize_is_stable() {
        let space = ChartSpace::from_bytes(MINIMAL).unwrap();
        let bytes = space.to_bytes();
        let again = ChartSpace::from_bytes(&bytes).unwrap();
        assert_eq!(again, space);
        let text = String::from_utf8(bytes).unwrap();
        let lang = text.find("<c:lang").unwrap();
        let chart = text.find("<c:chart>").unwrap();
        let print = text.find("<c:printSettings>").unwrap();
        assert!(lang < chart && chart < print);
    }

    #[test]
    fn test_extra_namespace_declarations_survive() {
        let xml = br#"<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:c16r2="http://schemas.microsoft.com/office/drawing/2015/06/chart" xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006">
  <c:chart><c:plotArea><c:layout/></c:plotArea></c:chart>
  <c:externalData r:id="rId1"><c16r2:autoUpdate val="0"/></c:externalData>
</c:chartSpace>"#;
        let space = ChartSpace::from_bytes(xml).unwrap();
        assert_eq!(
            space.namespaces,
            [
                (
                    "xmlns:c16r2".to_string(),
                    "http://schemas.microsoft.com/office/drawing/2015/06/chart".to_string()
                ),
                (
                    "xmlns:mc".to_string(),
                    "http://schemas.openxmlformats.org/markup-compatibility/2006".to_string()
                ),
            ]
        );

        let bytes = space.to_bytes();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains(
            r#"xmlns:c16r2="http://schemas.microsoft.com/office/drawing/2015/06/chart""#
        ));
        assert!(text.contains("<c16r2:autoUpdate"));
        assert_eq!(text.matches("xmlns:c=").count(), 1);
        assert_eq!(text.matches("xmlns:r=").count(), 1);
        assert_eq!(ChartSpace::from_bytes(&bytes).unwrap(), space);
    }

    #[test]
    fn test_missing_plot_area_is_malformed() {
        let xml = br#"<c:chartSpace xmlns:c="c"><c:chart/></c:chartSpace>"#;
        assert!(matches!(
            ChartSpace::from_bytes(xml),
            Err(OoxmlError::MalformedChartTree(_))
        ));
    }

    #[test]
    fn test_wrong_root_rejected() {
        assert!(matches!(
            ChartSpace::from_bytes(b"<Properties/>"),
            Err(OoxmlError::InvalidFormat(_))
        ));
    }
}
