//! Typed mirror of the DrawingML chart schema.
//!
//! Every optional schema element is an `Option`, so an absent element stays
//! distinguishable from a present one carrying a default or zero value.
//! Elements whose only payload is a `val` attribute use [`AttrVal`], which
//! adds a third state: present without a value (for booleans the schema
//! then implies `true`).
//!
//! Child order on write follows the schema sequence of each type. Reading
//! matches local names, so the namespace prefix used by the producer does
//! not matter.

pub mod chart_space;
pub mod drawing;
pub mod plot_area;
pub mod series;

pub use chart_space::{
    ChartElement, ChartSpace, Legend, LegendEntry, PageMargins, PrintSettings, Title, Tx, View3D,
    WallFloor,
};
pub use drawing::{
    BodyPr, Empty, Ln, Paragraph, ParagraphProps, Run, RunProps, SchemeClr, ShapeProperties,
    SolidFill, TextBody, TextFont,
};
pub use plot_area::{Axis, AxisKind, ChartGroup, ChartLines, ContainerKind, NumFmt, PlotArea, Scaling};
pub use series::{DLbls, DPt, DataCache, DataReference, DataSource, Marker, Pt, Series};

use crate::common::xml::XmlElement;
use crate::ooxml::error::{OoxmlError, Result};

/// DrawingML chart namespace.
pub const NS_CHART: &str = "http://schemas.openxmlformats.org/drawingml/2006/chart";
/// DrawingML main namespace.
pub const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
/// Office document relationships namespace.
pub const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// A schema type that maps to and from one XML element.
pub trait SchemaElement: Sized {
    /// Build the typed value from a parsed element.
    fn from_element(el: &XmlElement) -> Result<Self>;

    /// Render the value as an element with the given qualified name.
    fn to_element(&self, name: &str) -> XmlElement;
}

/// A scalar that can live in an attribute value.
pub trait XmlValue: Sized {
    fn parse_value(s: &str) -> Result<Self>;
    fn format_value(&self) -> String;
}

impl XmlValue for bool {
    fn parse_value(s: &str) -> Result<Self> {
        match s.trim() {
            "1" | "true" | "on" => Ok(true),
            "0" | "false" | "off" => Ok(false),
            other => Err(OoxmlError::InvalidFormat(format!(
                "Invalid boolean value: {}",
                other
            ))),
        }
    }

    #[inline]
    fn format_value(&self) -> String {
        (if *self { "1" } else { "0" }).to_string()
    }
}

macro_rules! impl_int_value {
    ($($ty:ty),*) => {$(
        impl XmlValue for $ty {
            fn parse_value(s: &str) -> Result<Self> {
                s.trim().parse::<$ty>().map_err(|e| {
                    OoxmlError::InvalidFormat(format!("Invalid integer '{}': {}", s, e))
                })
            }

            #[inline]
            fn format_value(&self) -> String {
                itoa::Buffer::new().format(*self).to_string()
            }
        }
    )*};
}

impl_int_value!(u32, i32, i64);

impl XmlValue for f64 {
    fn parse_value(s: &str) -> Result<Self> {
        fast_float2::parse::<f64, _>(s.trim())
            .map_err(|_| OoxmlError::InvalidFormat(format!("Invalid number: {}", s)))
    }

    #[inline]
    fn format_value(&self) -> String {
        format_number(*self)
    }
}

impl XmlValue for String {
    #[inline]
    fn parse_value(s: &str) -> Result<Self> {
        Ok(s.to_string())
    }

    #[inline]
    fn format_value(&self) -> String {
        self.clone()
    }
}

/// Render a double the way spreadsheet producers do: integral values
/// without a fractional part, everything else in shortest round-trip form.
pub fn format_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        itoa::Buffer::new().format(v as i64).to_string()
    } else {
        ryu::Buffer::new().format(v).to_string()
    }
}

/// Element whose payload is a single optional `val` attribute.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttrVal<T> {
    pub val: Option<T>,
}

pub type ValBool = AttrVal<bool>;
pub type ValInt = AttrVal<i32>;
pub type ValUint = AttrVal<u32>;
pub type ValFloat = AttrVal<f64>;
pub type ValStr = AttrVal<String>;

impl<T> From<T> for AttrVal<T> {
    #[inline]
    fn from(v: T) -> Self {
        Self { val: Some(v) }
    }
}

/// A present element carrying `v`.
#[inline]
pub fn val<T>(v: T) -> Option<AttrVal<T>> {
    Some(AttrVal { val: Some(v) })
}

impl<T: XmlValue> SchemaElement for AttrVal<T> {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            val: el.attr("val").map(T::parse_value).transpose()?,
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name);
        if let Some(ref v) = self.val {
            el.push_attr("val", v.format_value());
        }
        el
    }
}

/// Value of an optional `val` element, if both the element and its attribute are present.
#[inline]
pub fn value_of<T: Clone>(v: &Option<AttrVal<T>>) -> Option<T> {
    v.as_ref().and_then(|a| a.val.clone())
}

/// Value of an optional boolean element. A present element without `val` means `true`.
#[inline]
pub fn flag_of(v: &Option<ValBool>) -> Option<bool> {
    v.as_ref().map(|a| a.val.unwrap_or(true))
}

/// Opaque subtree kept as parsed; written back under the requested name.
impl SchemaElement for XmlElement {
    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(el.clone())
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = self.clone();
        el.name = name.to_string();
        el
    }
}

pub(crate) fn opt<T: SchemaElement>(el: &XmlElement, local: &str) -> Result<Option<T>> {
    el.child(local).map(T::from_element).transpose()
}

pub(crate) fn many<T: SchemaElement>(el: &XmlElement, local: &str) -> Result<Vec<T>> {
    el.children_named(local).map(T::from_element).collect()
}

pub(crate) fn required<T: SchemaElement>(el: &XmlElement, local: &str) -> Result<T> {
    match el.child(local) {
        Some(child) => T::from_element(child),
        None => Err(OoxmlError::InvalidFormat(format!(
            "<{}> is missing required <{}>",
            el.name, local
        ))),
    }
}

pub(crate) fn push_opt<T: SchemaElement>(parent: &mut XmlElement, name: &str, v: &Option<T>) {
    if let Some(v) = v {
        parent.push_child(v.to_element(name));
    }
}

pub(crate) fn push_all<T: SchemaElement>(parent: &mut XmlElement, name: &str, items: &[T]) {
    for item in items {
        parent.push_child(item.to_element(name));
    }
}

pub(crate) fn attr_of<T: XmlValue>(el: &XmlElement, local: &str) -> Result<Option<T>> {
    el.attr(local).map(T::parse_value).transpose()
}

pub(crate) fn push_attr_opt<T: XmlValue>(el: &mut XmlElement, name: &str, v: &Option<T>) {
    if let Some(v) = v {
        el.push_attr(name, v.format_value());
    }
}

/// Namespace declarations on `el` other than the `fixed` ones a writer always emits.
pub(crate) fn foreign_namespaces(el: &XmlElement, fixed: &[&str]) -> Vec<(String, String)> {
    el.namespace_declarations()
        .filter(|(name, _)| !fixed.contains(name))
        .map(|(name, uri)| (name.to_string(), uri.to_string()))
        .collect()
}

/// Text content of an optional leaf child such as `<c:f>` or `<a:t>`.
pub(crate) fn text_of(el: &XmlElement, local: &str) -> Option<String> {
    el.child(local).map(XmlElement::text)
}

pub(crate) fn push_text_opt(parent: &mut XmlElement, name: &str, v: &Option<String>) {
    if let Some(text) = v {
        parent.push_child(XmlElement::new(name).with_text(text.as_str()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_state_flag() {
        let absent: Option<ValBool> = None;
        let bare = Some(ValBool::from_element(&XmlElement::new("c:delete")).unwrap());
        let off = Some(
            ValBool::from_element(&XmlElement::new("c:delete").with_attr("val", "0")).unwrap(),
        );
        assert_eq!(flag_of(&absent), None);
        assert_eq!(flag_of(&bare), Some(true));
        assert_eq!(flag_of(&off), Some(false));
    }

    #[test]
    fn test_attr_val_rendering() {
        let el = val(150u32).unwrap().to_element("c:gapWidth");
        assert_eq!(el.attr("val"), Some("150"));
        let bare = ValStr::default().to_element("c:lang");
        assert!(bare.attributes.is_empty());
    }

    #[test]
    fn test_number_format() {
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(-2.0), "-2");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(f64::parse_value("1.5E2").unwrap(), 150.0);
        assert!(f64::parse_value("abc").is_err());
    }

    #[test]
    fn test_bool_values() {
        assert!(bool::parse_value("true").unwrap());
        assert!(!bool::parse_value("0").unwrap());
        assert!(bool::parse_value("yes").is_err());
    }
}
