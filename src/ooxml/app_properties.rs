//! Extended document properties (`docProps/app.xml`).
//!
//! [`Properties`] mirrors the whole extended-properties root so a part can
//! be rewritten without losing anything. Vector and signature payloads
//! (`HeadingPairs`, `TitlesOfParts`, `HLinks`, `DigSig`) are kept as opaque
//! subtrees. [`AppProperties`] is the small subset callers usually set.

use crate::common::xml::XmlElement;
use crate::ooxml::charts::schema::{SchemaElement, XmlValue, foreign_namespaces, text_of};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::package::{APP_PROPERTIES_PART, PartStore};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Extended-properties namespace.
pub const NS_EXTENDED_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties";
/// Variant types namespace used by the vector payloads.
pub const NS_DOC_PROPS_VTYPES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes";

/// The `Properties` root of an extended-properties part.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Properties {
    pub template: Option<String>,
    pub manager: Option<String>,
    pub company: Option<String>,
    pub pages: Option<i32>,
    pub words: Option<i32>,
    pub characters: Option<i32>,
    pub presentation_format: Option<String>,
    pub lines: Option<i32>,
    pub paragraphs: Option<i32>,
    pub slides: Option<i32>,
    pub notes: Option<i32>,
    /// Total editing time in minutes
    pub total_time: Option<i32>,
    pub hidden_slides: Option<i32>,
    pub mm_clips: Option<i32>,
    pub scale_crop: Option<bool>,
    pub heading_pairs: Option<XmlElement>,
    pub titles_of_parts: Option<XmlElement>,
    pub links_up_to_date: Option<bool>,
    pub characters_with_spaces: Option<i32>,
    pub shared_doc: Option<bool>,
    pub hyperlink_base: Option<String>,
    pub h_links: Option<XmlElement>,
    pub hyperlinks_changed: Option<bool>,
    pub dig_sig: Option<XmlElement>,
    pub application: Option<String>,
    pub app_version: Option<String>,
    pub doc_security: Option<i32>,
    /// Children outside the schema, written back after the known elements
    pub extra: Vec<XmlElement>,
    /// Root namespace declarations besides the default and `vt`
    pub namespaces: Vec<(String, String)>,
}

const KNOWN_ELEMENTS: [&str; 27] = [
    "Template",
    "Manager",
    "Company",
    "Pages",
    "Words",
    "Characters",
    "PresentationFormat",
    "Lines",
    "Paragraphs",
    "Slides",
    "Notes",
    "TotalTime",
    "HiddenSlides",
    "MMClips",
    "ScaleCrop",
    "HeadingPairs",
    "TitlesOfParts",
    "LinksUpToDate",
    "CharactersWithSpaces",
    "SharedDoc",
    "HyperlinkBase",
    "HLinks",
    "HyperlinksChanged",
    "DigSig",
    "Application",
    "AppVersion",
    "DocSecurity",
];

impl Properties {
    /// Parse an extended-properties part.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let root = XmlElement::parse(bytes)?;
        if root.local_name() != "Properties" {
            return Err(OoxmlError::InvalidFormat(format!(
                "Expected <Properties> root, found <{}>",
                root.name
            )));
        }
        Self::from_element(&root)
    }

    /// Serialize as a complete part.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_element("Properties").to_document()
    }

    /// The caller-facing subset of these properties.
    pub fn app_properties(&self) -> AppProperties {
        AppProperties {
            application: self.application.clone(),
            scale_crop: self.scale_crop,
            doc_security: self.doc_security,
            company: self.company.clone(),
            links_up_to_date: self.links_up_to_date,
            hyperlinks_changed: self.hyperlinks_changed,
            app_version: self.app_version.clone(),
        }
    }

    /// Overwrite every field `app` sets; fields it leaves `None` keep their
    /// current value.
    pub fn merge(&mut self, app: &AppProperties) {
        fn set<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                target.clone_from(value);
            }
        }
        set(&mut self.application, &app.application);
        set(&mut self.scale_crop, &app.scale_crop);
        set(&mut self.doc_security, &app.doc_security);
        set(&mut self.company, &app.company);
        set(&mut self.links_up_to_date, &app.links_up_to_date);
        set(&mut self.hyperlinks_changed, &app.hyperlinks_changed);
        set(&mut self.app_version, &app.app_version);
    }
}

/// Typed text content of an optional leaf child.
fn leaf<T: XmlValue>(el: &XmlElement, local: &str) -> Result<Option<T>> {
    text_of(el, local).map(|t| T::parse_value(&t)).transpose()
}

fn push_leaf<T: XmlValue>(parent: &mut XmlElement, name: &str, v: &Option<T>) {
    if let Some(v) = v {
        parent.push_child(XmlElement::new(name).with_text(v.format_value()));
    }
}

/// Extended properties spell booleans out.
fn push_flag(parent: &mut XmlElement, name: &str, v: Option<bool>) {
    if let Some(v) = v {
        parent.push_child(XmlElement::new(name).with_text(if v { "true" } else { "false" }));
    }
}

fn push_subtree(parent: &mut XmlElement, name: &str, v: &Option<XmlElement>) {
    if let Some(v) = v {
        parent.push_child(v.to_element(name));
    }
}

impl SchemaElement for Properties {
    fn from_element(el: &XmlElement) -> Result<Self> {
        let subtree = |local: &str| el.child(local).cloned();
        Ok(Self {
            template: leaf(el, "Template")?,
            manager: leaf(el, "Manager")?,
            company: leaf(el, "Company")?,
            pages: leaf(el, "Pages")?,
            words: leaf(el, "Words")?,
            characters: leaf(el, "Characters")?,
            presentation_format: leaf(el, "PresentationFormat")?,
            lines: leaf(el, "Lines")?,
            paragraphs: leaf(el, "Paragraphs")?,
            slides: leaf(el, "Slides")?,
            notes: leaf(el, "Notes")?,
            total_time: leaf(el, "TotalTime")?,
            hidden_slides: leaf(el, "HiddenSlides")?,
            mm_clips: leaf(el, "MMClips")?,
            scale_crop: leaf(el, "ScaleCrop")?,
            heading_pairs: subtree("HeadingPairs"),
            titles_of_parts: subtree("TitlesOfParts"),
            links_up_to_date: leaf(el, "LinksUpToDate")?,
            characters_with_spaces: leaf(el, "CharactersWithSpaces")?,
            shared_doc: leaf(el, "SharedDoc")?,
            hyperlink_base: leaf(el, "HyperlinkBase")?,
            h_links: subtree("HLinks"),
            hyperlinks_changed: leaf(el, "HyperlinksChanged")?,
            dig_sig: subtree("DigSig"),
            application: leaf(el, "Application")?,
            app_version: leaf(el, "AppVersion")?,
            doc_security: leaf(el, "DocSecurity")?,
            extra: el
                .elements()
                .filter(|child| !KNOWN_ELEMENTS.contains(&child.local_name()))
                .cloned()
                .collect(),
            namespaces: foreign_namespaces(el, &["xmlns", "xmlns:vt"]),
        })
    }

    fn to_element(&self, name: &str) -> XmlElement {
        let mut el = XmlElement::new(name)
            .with_attr("xmlns", NS_EXTENDED_PROPERTIES)
            .with_attr("xmlns:vt", NS_DOC_PROPS_VTYPES);
        for (prefix, uri) in &self.namespaces {
            el.push_attr(prefix.as_str(), uri.as_str());
        }
        push_leaf(&mut el, "Template", &self.template);
        push_leaf(&mut el, "Manager", &self.manager);
        push_leaf(&mut el, "Company", &self.company);
        push_leaf(&mut el, "Pages", &self.pages);
        push_leaf(&mut el, "Words", &self.words);
        push_leaf(&mut el, "Characters", &self.characters);
        push_leaf(&mut el, "PresentationFormat", &self.presentation_format);
        push_leaf(&mut el, "Lines", &self.lines);
        push_leaf(&mut el, "Paragraphs", &self.paragraphs);
        push_leaf(&mut el, "Slides", &self.slides);
        push_leaf(&mut el, "Notes", &self.notes);
        push_leaf(&mut el, "TotalTime", &self.total_time);
        push_leaf(&mut el, "HiddenSlides", &self.hidden_slides);
        push_leaf(&mut el, "MMClips", &self.mm_clips);
        push_flag(&mut el, "ScaleCrop", self.scale_crop);
        push_subtree(&mut el, "HeadingPairs", &self.heading_pairs);
        push_subtree(&mut el, "TitlesOfParts", &self.titles_of_parts);
        push_flag(&mut el, "LinksUpToDate", self.links_up_to_date);
        push_leaf(&mut el, "CharactersWithSpaces", &self.characters_with_spaces);
        push_flag(&mut el, "SharedDoc", self.shared_doc);
        push_leaf(&mut el, "HyperlinkBase", &self.hyperlink_base);
        push_subtree(&mut el, "HLinks", &self.h_links);
        push_flag(&mut el, "HyperlinksChanged", self.hyperlinks_changed);
        push_subtree(&mut el, "DigSig", &self.dig_sig);
        push_leaf(&mut el, "Application", &self.application);
        push_leaf(&mut el, "AppVersion", &self.app_version);
        push_leaf(&mut el, "DocSecurity", &self.doc_security);
        for child in &self.extra {
            el.push_child(child.clone());
        }
        el
    }
}

/// Application properties callers read and set.
///
/// `None` means "not recorded" when reading and "leave unchanged" when
/// setting.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppProperties {
    /// Name of the producing application
    pub application: Option<String>,
    /// Scale the thumbnail instead of cropping it
    pub scale_crop: Option<bool>,
    /// Security level: 0 none, 1 password protected, 2 read-only
    /// recommended, 4 read-only enforced, 8 locked for annotation
    pub doc_security: Option<i32>,
    pub company: Option<String>,
    /// Whether hyperlinks were up to date when last saved
    pub links_up_to_date: Option<bool>,
    /// Whether hyperlinks changed and need refreshing
    pub hyperlinks_changed: Option<bool>,
    /// Version of the producing application, `XX.YYYY`
    pub app_version: Option<String>,
}

impl AppProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn application(mut self, application: &str) -> Self {
        self.application = Some(application.to_string());
        self
    }

    pub fn company(mut self, company: &str) -> Self {
        self.company = Some(company.to_string());
        self
    }

    pub fn app_version(mut self, version: &str) -> Self {
        self.app_version = Some(version.to_string());
        self
    }

    pub fn doc_security(mut self, level: i32) -> Self {
        self.doc_security = Some(level);
        self
    }

    pub fn scale_crop(mut self, scale_crop: bool) -> Self {
        self.scale_crop = Some(scale_crop);
        self
    }

    pub fn links_up_to_date(mut self, up_to_date: bool) -> Self {
        self.links_up_to_date = Some(up_to_date);
        self
    }

    pub fn hyperlinks_changed(mut self, changed: bool) -> Self {
        self.hyperlinks_changed = Some(changed);
        self
    }
}

/// Read the caller-facing properties out of a parsed tree.
#[inline]
pub fn get_app_properties(props: &Properties) -> AppProperties {
    props.app_properties()
}

/// Merge `app` into `props`, keeping every element `app` does not set.
#[inline]
pub fn set_app_properties(props: &mut Properties, app: &AppProperties) {
    props.merge(app);
}

/// Merge `app` into the package's extended-properties part, creating the
/// part if the package has none.
pub fn save_app_properties<S: PartStore + ?Sized>(store: &mut S, app: &AppProperties) -> Result<()> {
    let mut props = if store.contains_part(APP_PROPERTIES_PART) {
        Properties::from_bytes(&store.read_part(APP_PROPERTIES_PART)?)?
    } else {
        debug!("creating extended properties part");
        Properties::default()
    };
    set_app_properties(&mut props, app);
    store.write_part(APP_PROPERTIES_PART, props.to_bytes())
}

/// Application properties of the package. A package without the part
/// reads as all-unset.
pub fn load_app_properties<S: PartStore + ?Sized>(store: &S) -> Result<AppProperties> {
    if !store.contains_part(APP_PROPERTIES_PART) {
        return Ok(AppProperties::default());
    }
    let props = Properties::from_bytes(&store.read_part(APP_PROPERTIES_PART)?)?;
    Ok(get_app_properties(&props))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::package::MemoryPartStore;

    const APP_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
  <Application>Microsoft Excel</Application>
  <DocSecurity>0</DocSecurity>
  <ScaleCrop>false</ScaleCrop>
  <HeadingPairs>
    <vt:vector size="2" baseType="variant">
      <vt:variant><vt:lpstr>Worksheets</vt:lpstr></vt:variant>
      <vt:variant><vt:i4>1</vt:i4></vt:variant>
    </vt:vector>
  </HeadingPairs>
  <TitlesOfParts>
    <vt:vector size="1" baseType="lpstr"><vt:lpstr>Sheet1</vt:lpstr></vt:vector>
  </TitlesOfParts>
  <Company>Contoso</Company>
  <LinksUpToDate>false</LinksUpToDate>
  <SharedDoc>false</SharedDoc>
  <HyperlinksChanged>false</HyperlinksChanged>
  <AppVersion>16.0300</AppVersion>
</Properties>"#;

    #[test]
    fn test_parse_excel_part() {
        let props = Properties::from_bytes(APP_XML.as_bytes()).unwrap();
        assert_eq!(props.application.as_deref(), Some("Microsoft Excel"));
        assert_eq!(props.doc_security, Some(0));
        assert_eq!(props.scale_crop, Some(false));
        assert_eq!(props.shared_doc, Some(false));
        assert_eq!(props.pages, None);
        assert!(props.extra.is_empty());

        let heading_pairs = props.heading_pairs.as_ref().unwrap();
        let vector = heading_pairs.child("vector").unwrap();
        assert_eq!(vector.attr("size"), Some("2"));
        assert_eq!(vector.children_named("variant").count(), 2);

        let app = get_app_properties(&props);
        assert_eq!(app.company.as_deref(), Some("Contoso"));
        assert_eq!(app.app_version.as_deref(), Some("16.0300"));
        assert_eq!(app.hyperlinks_changed, Some(false));
    }

    #[test]
    fn test_write_order_and_opaque_payloads() {
        let props = Properties::from_bytes(APP_XML.as_bytes()).unwrap();
        let bytes = props.to_bytes();
        let xml = String::from_utf8(bytes.clone()).unwrap();

        let order: Vec<usize> = ["<Company>", "<ScaleCrop>", "<HeadingPairs>", "<Application>"]
            .iter()
            .map(|tag| xml.find(tag).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]), "{}", xml);
        assert!(xml.contains("<ScaleCrop>false</ScaleCrop>"));
        assert!(xml.contains("<vt:lpstr>Sheet1</vt:lpstr>"));

        assert_eq!(Properties::from_bytes(&bytes).unwrap(), props);
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut props = Properties::from_bytes(APP_XML.as_bytes()).unwrap();
        let app = AppProperties::new()
            .company("Fabrikam")
            .doc_security(2)
            .links_up_to_date(true);
        set_app_properties(&mut props, &app);

        assert_eq!(props.company.as_deref(), Some("Fabrikam"));
        assert_eq!(props.doc_security, Some(2));
        assert_eq!(props.links_up_to_date, Some(true));
        assert_eq!(props.application.as_deref(), Some("Microsoft Excel"));
        assert!(props.titles_of_parts.is_some());
    }

    #[test]
    fn test_unknown_children_survive() {
        let xml = r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>Calc</Application><Custom>x</Custom></Properties>"#;
        let props = Properties::from_bytes(xml.as_bytes()).unwrap();
        assert_eq!(props.extra.len(), 1);
        let written = String::from_utf8(props.to_bytes()).unwrap();
        assert!(written.contains("<Application>Calc</Application><Custom>x</Custom>"));
    }

    #[test]
    fn test_extension_namespaces_survive() {
        let xml = r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes" xmlns:ext="urn:example:ext"><Company>Contoso</Company><ext:Custom>x</ext:Custom></Properties>"#;
        let props = Properties::from_bytes(xml.as_bytes()).unwrap();
        assert_eq!(
            props.namespaces,
            [("xmlns:ext".to_string(), "urn:example:ext".to_string())]
        );

        let written = String::from_utf8(props.to_bytes()).unwrap();
        assert!(written.contains(r#"xmlns:ext="urn:example:ext""#));
        assert!(written.contains("<ext:Custom>x</ext:Custom>"));
        assert_eq!(written.matches("xmlns:vt=").count(), 1);
        assert_eq!(Properties::from_bytes(written.as_bytes()).unwrap(), props);
    }

    #[test]
    fn test_rejects_foreign_root() {
        assert!(matches!(
            Properties::from_bytes(b"<coreProperties/>"),
            Err(OoxmlError::InvalidFormat(_))
        ));
        assert!(matches!(
            Properties::from_bytes(b"<Properties><Pages>many</Pages></Properties>"),
            Err(OoxmlError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_save_and_load_through_store() {
        let mut store = MemoryPartStore::new();
        assert_eq!(load_app_properties(&store).unwrap(), AppProperties::default());

        save_app_properties(&mut store, &AppProperties::new().application("litchi")).unwrap();
        save_app_properties(&mut store, &AppProperties::new().app_version("1.0000")).unwrap();

        let app = load_app_properties(&store).unwrap();
        assert_eq!(app.application.as_deref(), Some("litchi"));
        assert_eq!(app.app_version.as_deref(), Some("1.0000"));
        assert_eq!(app.company, None);
    }

    #[test]
    fn test_yaml_configuration() {
        let app: AppProperties =
            serde_saphyr::from_str("company: Contoso\nscale_crop: true\n").unwrap();
        assert_eq!(app, AppProperties::new().company("Contoso").scale_crop(true));
    }
}
