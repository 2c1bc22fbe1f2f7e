//! XML helpers shared by every part: entity escaping and the owned element tree.

pub mod escape;
pub mod tree;

pub use escape::{escape_xml, unescape_xml};
pub use tree::{XML_DECLARATION, XmlElement, XmlNode};
