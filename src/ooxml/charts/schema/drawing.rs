//! DrawingML shape and text properties used inside chart parts.

use super::{
    SchemaElement, ValInt, ValStr, attr_of, many, opt, push_all, push_attr_opt, push_opt,
};
use crate::common::xml::XmlElement;
use crate::ooxml::error::Result;

/// Element whose presence alone carries meaning, e.g. `<a:noFill/>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Empty;

impl SchemaElement for Empty {
    #[inline]
    fn from_element(_el: &XmlElement) -> Result<Self> {
        Ok(Empty)
    }

    #[inline]
    fn to_element(&self, name: &str) -> XmlElement {
        XmlElement::new(name)
    }
}

/// Shape properties (`spPr`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeProperties {
    pub no_fill: Option<Empty>,
    pub solid_fill: Option<SolidFill>,
    pub ln: Option<Ln>,
    pub effect_lst: Option<XmlElement>,
    pub sp3d: Option<XmlElement>,
}

impl SchemaElement for ShapeProperties {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            no_fill: opt(el, "noFill")?,
            solid_fill: opt(el, "solidFill")?,
            ln: opt(el, "ln")?,
            effect_lst: opt(el, "effectLst")?,
            sp3d: opt(el, "sp3d")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_opt(&mut el, "a:noFill", &self.no_fill);
        push_opt(&mut el, "a:solidFill", &self.solid_fill);
        push_opt(&mut el, "a:ln", &self.ln);
        push_opt(&mut el, "a:effectLst", &self.effect_lst);
        push_opt(&mut el, "a:sp3d", &self.sp3d);
        el
    }
}

/// Solid fill with either a theme or an explicit RGB colour.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolidFill {
    pub scheme_clr: Option<SchemeClr>,
    pub srgb_clr: Option<ValStr>,
}

impl SolidFill {
    /// Fill with an explicit `RRGGBB` colour.
    #[inline]
    pub fn rgb(hex: &str) -> Self {
        Self {
            scheme_clr: None,
            srgb_clr: super::val(hex.trim_start_matches('#').to_uppercase()),
        }
    }

    /// Fill with a theme colour such as `tx1` or `accent1`.
    #[inline]
    pub fn scheme(val: &str) -> Self {
        Self {
            scheme_clr: Some(SchemeClr {
                val: val.to_string(),
                ..Default::default()
            }),
            srgb_clr: None,
        }
    }

    /// The explicit RGB colour, if this fill carries one.
    #[inline]
    pub fn rgb_value(&self) -> Option<&str> {
        self.srgb_clr.as_ref().and_then(|c| c.val.as_deref())
    }
}

impl SchemaElement for SolidFill {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            scheme_clr: opt(el, "schemeClr")?,
            srgb_clr: opt(el, "srgbClr")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_opt(&mut el, "a:schemeClr", &self.scheme_clr);
        push_opt(&mut el, "a:srgbClr", &self.srgb_clr);
        el
    }
}

/// Theme colour with optional luminance modulation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemeClr {
    pub val: String,
    pub lum_mod: Option<ValInt>,
    pub lum_off: Option<ValInt>,
}

impl SchemaElement for SchemeClr {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            val: el.attr("val").unwrap_or_default().to_string(),
            lum_mod: opt(el, "lumMod")?,
            lum_off: opt(el, "lumOff")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name).with_attr("val", self.val.as_str());
        push_opt(&mut el, "a:lumMod", &self.lum_mod);
        push_opt(&mut el, "a:lumOff", &self.lum_off);
        el
    }
}

/// Line properties (`a:ln`). Width is in EMU.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ln {
    pub w: Option<i64>,
    pub cap: Option<String>,
    pub cmpd: Option<String>,
    pub algn: Option<String>,
    pub no_fill: Option<Empty>,
    pub solid_fill: Option<SolidFill>,
    pub prst_dash: Option<ValStr>,
    pub round: Option<Empty>,
}

impl SchemaElement for Ln {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            w: attr_of(el, "w")?,
            cap: attr_of(el, "cap")?,
            cmpd: attr_of(el, "cmpd")?,
            algn: attr_of(el, "algn")?,
            no_fill: opt(el, "noFill")?,
            solid_fill: opt(el, "solidFill")?,
            prst_dash: opt(el, "prstDash")?,
            round: opt(el, "round")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_attr_opt(&mut el, "w", &self.w);
        push_attr_opt(&mut el, "cap", &self.cap);
        push_attr_opt(&mut el, "cmpd", &self.cmpd);
        push_attr_opt(&mut el, "algn", &self.algn);
        push_opt(&mut el, "a:noFill", &self.no_fill);
        push_opt(&mut el, "a:solidFill", &self.solid_fill);
        push_opt(&mut el, "a:prstDash", &self.prst_dash);
        push_opt(&mut el, "a:round", &self.round);
        el
    }
}

/// Text body used by both `c:txPr` and `c:rich`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextBody {
    pub body_pr: Option<BodyPr>,
    pub lst_style: Option<Empty>,
    pub p: Vec<Paragraph>,
}

impl SchemaElement for TextBody {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            body_pr: opt(el, "bodyPr")?,
            lst_style: opt(el, "lstStyle")?,
            p: many(el, "p")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_opt(&mut el, "a:bodyPr", &self.body_pr);
        push_opt(&mut el, "a:lstStyle", &self.lst_style);
        push_all(&mut el, "a:p", &self.p);
        el
    }
}

/// Text body properties. Child elements such as `a:spAutoFit` are kept opaque.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BodyPr {
    pub rot: Option<i32>,
    pub vert: Option<String>,
    pub wrap: Option<String>,
    pub anchor: Option<String>,
    pub anchor_ctr: Option<bool>,
    pub extra: Vec<XmlElement>,
}

impl SchemaElement for BodyPr {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            rot: attr_of(el, "rot")?,
            vert: attr_of(el, "vert")?,
            wrap: attr_of(el, "wrap")?,
            anchor: attr_of(el, "anchor")?,
            anchor_ctr: attr_of(el, "anchorCtr")?,
            extra: el.elements().cloned().collect(),
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_attr_opt(&mut el, "rot", &self.rot);
        push_attr_opt(&mut el, "vert", &self.vert);
        push_attr_opt(&mut el, "wrap", &self.wrap);
        push_attr_opt(&mut el, "anchor", &self.anchor);
        push_attr_opt(&mut el, "anchorCtr", &self.anchor_ctr);
        for child in &self.extra {
            el.push_child(child.clone());
        }
        el
    }
}

/// Text paragraph (`a:p`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    pub p_pr: Option<ParagraphProps>,
    pub r: Vec<Run>,
    pub end_para_r_pr: Option<RunProps>,
}

impl SchemaElement for Paragraph {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            p_pr: opt(el, "pPr")?,
            r: many(el, "r")?,
            end_para_r_pr: opt(el, "endParaRPr")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_opt(&mut el, "a:pPr", &self.p_pr);
        push_all(&mut el, "a:r", &self.r);
        push_opt(&mut el, "a:endParaRPr", &self.end_para_r_pr);
        el
    }
}

/// Paragraph properties; only the default run properties are modelled.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParagraphProps {
    pub def_r_pr: Option<RunProps>,
}

impl SchemaElement for ParagraphProps {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            def_r_pr: opt(el, "defRPr")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_opt(&mut el, "a:defRPr", &self.def_r_pr);
        el
    }
}

/// Text run (`a:r`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Run {
    pub r_pr: Option<RunProps>,
    pub t: String,
}

impl SchemaElement for Run {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            r_pr: opt(el, "rPr")?,
            t: super::text_of(el, "t").unwrap_or_default(),
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_opt(&mut el, "a:rPr", &self.r_pr);
        el.push_child(XmlElement::new("a:t").with_text(self.t.as_str()));
        el
    }
}

/// Character properties shared by `a:rPr`, `a:defRPr` and `a:endParaRPr`.
///
/// `sz` is in hundredths of a point.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunProps {
    pub lang: Option<String>,
    pub alt_lang: Option<String>,
    pub b: Option<bool>,
    pub i: Option<bool>,
    pub sz: Option<u32>,
    pub u: Option<String>,
    pub strike: Option<String>,
    pub kern: Option<i32>,
    pub baseline: Option<i32>,
    pub spc: Option<i32>,
    pub solid_fill: Option<SolidFill>,
    pub latin: Option<TextFont>,
    pub ea: Option<TextFont>,
    pub cs: Option<TextFont>,
}

impl SchemaElement for RunProps {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            lang: attr_of(el, "lang")?,
            alt_lang: attr_of(el, "altLang")?,
            b: attr_of(el, "b")?,
            i: attr_of(el, "i")?,
            sz: attr_of(el, "sz")?,
            u: attr_of(el, "u")?,
            strike: attr_of(el, "strike")?,
            kern: attr_of(el, "kern")?,
            baseline: attr_of(el, "baseline")?,
            spc: attr_of(el, "spc")?,
            solid_fill: opt(el, "solidFill")?,
            latin: opt(el, "latin")?,
            ea: opt(el, "ea")?,
            cs: opt(el, "cs")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        push_attr_opt(&mut el, "lang", &self.lang);
        push_attr_opt(&mut el, "altLang", &self.alt_lang);
        push_attr_opt(&mut el, "b", &self.b);
        push_attr_opt(&mut el, "i", &self.i);
        push_attr_opt(&mut el, "sz", &self.sz);
        push_attr_opt(&mut el, "u", &self.u);
        push_attr_opt(&mut el, "strike", &self.strike);
        push_attr_opt(&mut el, "kern", &self.kern);
        push_attr_opt(&mut el, "baseline", &self.baseline);
        push_attr_opt(&mut el, "spc", &self.spc);
        push_opt(&mut el, "a:solidFill", &self.solid_fill);
        push_opt(&mut el, "a:latin", &self.latin);
        push_opt(&mut el, "a:ea", &self.ea);
        push_opt(&mut el, "a:cs", &self.cs);
        el
    }
}

/// Font reference (`a:latin`, `a:ea`, `a:cs`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextFont {
    pub typeface: String,
    pub pitch_family: Option<String>,
    pub charset: Option<String>,
}

impl TextFont {
    #[inline]
    pub fn new(typeface: impl Into<String>) -> Self {
        Self {
            typeface: typeface.into(),
            ..Default::default()
        }
    }
}

impl SchemaElement for TextFont {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            typeface: el.attr("typeface").unwrap_or_default().to_string(),
            pitch_family: attr_of(el, "pitchFamily")?,
            charset: attr_of(el, "charset")?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name).with_attr("typeface", self.typeface.as_str());
        push_attr_opt(&mut el, "pitchFamily", &self.pitch_family);
        push_attr_opt(&mut el, "charset", &self.charset);
        el
    }
}
