//! Common types and utilities shared across parts.

pub mod xml;

pub use xml::{XmlElement, XmlNode};
