//! Series, data references with their caches, markers and data labels.

use super::chart_space::Tx;
use super::drawing::{ShapeProperties, TextBody};
use super::plot_area::{ChartLines, NumFmt};
use super::{
    SchemaElement, ValBool, ValStr, ValUint, attr_of, many, opt, push_all, push_opt,
    push_text_opt, required, text_of,
};
use crate::common::xml::XmlElement;
use crate::ooxml::error::{OoxmlError, Result};

/// One data series (`c:ser`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    pub idx: ValUint,
    pub order: ValUint,
    pub tx: Option<Tx>,
    pub sp_pr: Option<ShapeProperties>,
    pub invert_if_negative: Option<ValBool>,
    pub marker: Option<Marker>,
    pub explosion: Option<ValUint>,
    pub d_pt: Vec<DPt>,
    pub d_lbls: Option<DLbls>,
    pub cat: Option<DataSource>,
    pub val: Option<DataSource>,
    pub x_val: Option<DataSource>,
    pub y_val: Option<DataSource>,
    pub smooth: Option<ValBool>,
    pub bubble_size: Option<DataSource>,
    pub bubble3d: Option<ValBool>,
}

impl SchemaElement for Series {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            idx: required(el, "idx")?,
            order: required(el, "order")?,
            tx: opt(el, "tx")?,
            sp_pr: opt(el, "spPr")?,
            invert_if_negative: opt(el, "invertIfNegative")?,
            marker: opt(el, "marker")?,
            explosion: opt(el, "explosion")?,
            d_pt: many(el, "dPt")?,
            d_lbls: opt(el, "dLbls")?,
            cat: opt(el, "cat")?,
            val: opt(el, "val")?,
            x_val: opt(el, "xVal")?,
            y_val: opt(el, "yVal")?,
            smooth: opt(el, "smooth")?,
            bubble_size: opt(el, "bubbleSize")?,
            bubble3d: opt(el, "bubble3D")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        el.push_child(self.idx.to_element("c:idx"));
        el.push_child(self.order.to_element("c:order"));
        push_opt(&mut el, "c:tx", &self.tx);
        push_opt(&mut el, "c:spPr", &self.sp_pr);
        push_opt(&mut el, "c:invertIfNegative", &self.invert_if_negative);
        push_opt(&mut el, "c:marker", &self.marker);
        push_opt(&mut el, "c:explosion", &self.explosion);
        push_all(&mut el, "c:dPt", &self.d_pt);
        push_opt(&mut el, "c:dLbls", &self.d_lbls);
        push_opt(&mut el, "c:cat", &self.cat);
        push_opt(&mut el, "c:val", &self.val);
        push_opt(&mut el, "c:xVal", &self.x_val);
        push_opt(&mut el, "c:yVal", &self.y_val);
        push_opt(&mut el, "c:smooth", &self.smooth);
        push_opt(&mut el, "c:bubbleSize", &self.bubble_size);
        push_opt(&mut el, "c:bubble3D", &self.bubble3d);
        el
    }
}

/// Data source of `cat`, `val`, `xVal`, `yVal` and `bubbleSize`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataSource {
    pub num_ref: Option<DataReference>,
    pub str_ref: Option<DataReference>,
}

impl DataSource {
    /// The populated reference, numeric first.
    #[inline]
    pub fn reference(&self) -> Option<&DataReference> {
        self.num_ref.as_ref().or(self.str_ref.as_ref())
    }
}

impl SchemaElement for DataSource {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            num_ref: opt(el, "numRef")?,
            str_ref: opt(el, "strRef")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_opt(&mut el, "c:numRef", &self.num_ref);
        push_opt(&mut el, "c:strRef", &self.str_ref);
        el
    }
}

/// A worksheet formula plus its cached values (`c:strRef` / `c:numRef`).
///
/// The cache element name follows the reference flavour: `strCache` under
/// `strRef`, `numCache` under `numRef`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataReference {
    pub f: String,
    pub cache: Option<DataCache>,
}

impl SchemaElement for DataReference {
    fn from_element(el: &XmlElement) -> Result<Self> {
        let cache = match el.child("numCache") {
            Some(cache) => Some(DataCache::from_element(cache)?),
            None => opt(el, "strCache")?,
        };
        Ok(Self {
            f: text_of(el, "f").unwrap_or_default(),
            cache,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        el.push_child(XmlElement::new("c:f").with_text(self.f.as_str()));
        let cache_name = if name.ends_with("numRef") {
            "c:numCache"
        } else {
            "c:strCache"
        };
        push_opt(&mut el, cache_name, &self.cache);
        el
    }
}

/// Cached literal values of a data reference.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataCache {
    pub format_code: Option<String>,
    pub pt_count: Option<ValUint>,
    pub pt: Vec<Pt>,
}

impl DataCache {
    /// Build a cache whose count matches its points.
    pub fn from_points(format_code: Option<String>, pt: Vec<Pt>) -> Self {
        Self {
            format_code,
            pt_count: super::val(pt.len() as u32),
            pt,
        }
    }

    /// Declared point count; absent counts as zero.
    #[inline]
    pub fn declared_count(&self) -> u32 {
        super::value_of(&self.pt_count).unwrap_or(0)
    }
}

impl SchemaElement for DataCache {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            format_code: text_of(el, "formatCode"),
            pt_count: opt(el, "ptCount")?,
            pt: many(el, "pt")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_text_opt(&mut el, "c:formatCode", &self.format_code);
        push_opt(&mut el, "c:ptCount", &self.pt_count);
        push_all(&mut el, "c:pt", &self.pt);
        el
    }
}

/// One cached point. Indices are 0-based and may skip blanks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pt {
    pub idx: u32,
    pub v: String,
}

impl SchemaElement for Pt {
    fn from_element(el: &XmlElement) -> Result<Self> {
        let idx = attr_of(el, "idx")?.ok_or_else(|| {
            OoxmlError::InvalidFormat("<c:pt> is missing its idx attribute".to_string())
        })?;
        Ok(Self {
            idx,
            v: text_of(el, "v").unwrap_or_default(),
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name).with_attr("idx", itoa::Buffer::new().format(self.idx));
        el.push_child(XmlElement::new("c:v").with_text(self.v.as_str()));
        el
    }
}

/// Series marker.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Marker {
    pub symbol: Option<ValStr>,
    pub size: Option<ValUint>,
    pub sp_pr: Option<ShapeProperties>,
}

impl SchemaElement for Marker {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            symbol: opt(el, "symbol")?,
            size: opt(el, "size")?,
            sp_pr: opt(el, "spPr")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_opt(&mut el, "c:symbol", &self.symbol);
        push_opt(&mut el, "c:size", &self.size);
        push_opt(&mut el, "c:spPr", &self.sp_pr);
        el
    }
}

/// Per-point formatting override.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DPt {
    pub idx: ValUint,
    pub invert_if_negative: Option<ValBool>,
    pub marker: Option<Marker>,
    pub bubble3d: Option<ValBool>,
    pub explosion: Option<ValUint>,
    pub sp_pr: Option<ShapeProperties>,
}

impl SchemaElement for DPt {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            idx: required(el, "idx")?,
            invert_if_negative: opt(el, "invertIfNegative")?,
            marker: opt(el, "marker")?,
            bubble3d: opt(el, "bubble3D")?,
            explosion: opt(el, "explosion")?,
            sp_pr: opt(el, "spPr")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        el.push_child(self.idx.to_element("c:idx"));
        push_opt(&mut el, "c:invertIfNegative", &self.invert_if_negative);
        push_opt(&mut el, "c:marker", &self.marker);
        push_opt(&mut el, "c:bubble3D", &self.bubble3d);
        push_opt(&mut el, "c:explosion", &self.explosion);
        push_opt(&mut el, "c:spPr", &self.sp_pr);
        el
    }
}

/// Data label settings of a chart group or a series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DLbls {
    pub d_lbl: Vec<XmlElement>,
    pub delete: Option<ValBool>,
    pub num_fmt: Option<NumFmt>,
    pub sp_pr: Option<ShapeProperties>,
    pub tx_pr: Option<TextBody>,
    pub d_lbl_pos: Option<ValStr>,
    pub show_legend_key: Option<ValBool>,
    pub show_val: Option<ValBool>,
    pub show_cat_name: Option<ValBool>,
    pub show_ser_name: Option<ValBool>,
    pub show_percent: Option<ValBool>,
    pub show_bubble_size: Option<ValBool>,
    pub separator: Option<String>,
    pub show_leader_lines: Option<ValBool>,
    pub leader_lines: Option<ChartLines>,
}

impl SchemaElement for DLbls {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            d_lbl: many(el, "dLbl")?,
            delete: opt(el, "delete")?,
            num_fmt: opt(el, "numFmt")?,
            sp_pr: opt(el, "spPr")?,
            tx_pr: opt(el, "txPr")?,
            d_lbl_pos: opt(el, "dLblPos")?,
            show_legend_key: opt(el, "showLegendKey")?,
            show_val: opt(el, "showVal")?,
            show_cat_name: opt(el, "showCatName")?,
            show_ser_name: opt(el, "showSerName")?,
            show_percent: opt(el, "showPercent")?,
            show_bubble_size: opt(el, "showBubbleSize")?,
            separator: text_of(el, "separator"),
            show_leader_lines: opt(el, "showLeaderLines")?,
            leader_lines: opt(el, "leaderLines")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_all(&mut el, "c:dLbl", &self.d_lbl);
        push_opt(&mut el, "c:delete", &self.delete);
        push_opt(&mut el, "c:numFmt", &self.num_fmt);
        push_opt(&mut el, "c:spPr", &self.sp_pr);
        push_opt(&mut el, "c:txPr", &self.tx_pr);
        push_opt(&mut el, "c:dLblPos", &self.d_lbl_pos);
        push_opt(&mut el, "c:showLegendKey", &self.show_legend_key);
        push_opt(&mut el, "c:showVal", &self.show_val);
        push_opt(&mut el, "c:showCatName", &self.show_cat_name);
        push_opt(&mut el, "c:showSerName", &self.show_ser_name);
        push_opt(&mut el, "c:showPercent", &self.show_percent);
        push_opt(&mut el, "c:showBubbleSize", &self.show_bubble_size);
        push_text_opt(&mut el, "c:separator", &self.separator);
        push_opt(&mut el, "c:showLeaderLines", &self.show_leader_lines);
        push_opt(&mut el, "c:leaderLines", &self.leader_lines);
        el
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::charts::schema::value_of;

    #[test]
    fn test_series_with_caches() {
        let xml = br#"<c:ser xmlns:c="c">
            <c:idx val="0"/><c:order val="0"/>
            <c:tx><c:strRef><c:f>Sheet1!$B$1</c:f></c:strRef></c:tx>
            <c:cat><c:strRef><c:f>Sheet1!$A$2:$A$4</c:f>
                <c:strCache><c:ptCount val="3"/>
                    <c:pt idx="0"><c:v>Q1</c:v></c:pt>
                    <c:pt idx="2"><c:v>Q3</c:v></c:pt>
                </c:strCache></c:strRef></c:cat>
            <c:val><c:numRef><c:f>Sheet1!$B$2:$B$4</c:f>
                <c:numCache><c:formatCode>General</c:formatCode><c:ptCount val="1"/>
                    <c:pt idx="0"><c:v>12.5</c:v></c:pt>
                </c:numCache></c:numRef></c:val>
        </c:ser>"#;
        let ser = Series::from_element(&XmlElement::parse(xml).unwrap()).unwrap();
        assert_eq!(ser.idx.val, Some(0));
        let name = ser.tx.as_ref().and_then(|t| t.str_ref.as_ref()).unwrap();
        assert_eq!(name.f, "Sheet1!$B$1");
        assert!(name.cache.is_none());

        let cat = ser.cat.as_ref().and_then(DataSource::reference).unwrap();
        let cache = cat.cache.as_ref().unwrap();
        assert_eq!(cache.declared_count(), 3);
        assert_eq!(cache.pt.iter().map(|p| p.idx).collect::<Vec<_>>(), [0, 2]);

        let val = ser.val.as_ref().and_then(|v| v.num_ref.as_ref()).unwrap();
        let cache = val.cache.as_ref().unwrap();
        assert_eq!(cache.format_code.as_deref(), Some("General"));
        assert_eq!(cache.pt[0].v, "12.5");
    }

    #[test]
    fn test_cache_element_follows_reference_flavour() {
        let reference = DataReference {
            f: "Sheet1!$A$1:$A$2".to_string(),
            cache: Some(DataCache::from_points(
                None,
                vec![Pt { idx: 0, v: "a".into() }, Pt { idx: 1, v: "b".into() }],
            )),
        };
        let str_el = reference.to_element("c:strRef");
        assert!(str_el.child("strCache").is_some());
        let num_el = reference.to_element("c:numRef");
        assert!(num_el.child("numCache").is_some());
        let cache = num_el.child("numCache").unwrap();
        assert_eq!(cache.child("ptCount").and_then(|c| c.attr("val")), Some("2"));
    }

    #[test]
    fn test_data_labels_order() {
        let labels = DLbls {
            show_val: super::super::val(true),
            d_lbl_pos: super::super::val("outEnd".to_string()),
            show_legend_key: super::super::val(false),
            ..Default::default()
        };
        let el = labels.to_element("c:dLbls");
        let names: Vec<_> = el.elements().map(|c| c.local_name()).collect();
        assert_eq!(names, ["dLblPos", "showLegendKey", "showVal"]);
        let parsed = DLbls::from_element(&el).unwrap();
        assert_eq!(value_of(&parsed.d_lbl_pos).as_deref(), Some("outEnd"));
    }

    #[test]
    fn test_point_requires_index() {
        let xml = br#"<c:pt xmlns:c="c"><c:v>1</c:v></c:pt>"#;
        assert!(Pt::from_element(&XmlElement::parse(xml).unwrap()).is_err());
    }
}
