//! Document archive seam.
//!
//! Charts and properties are stored as parts of an OPC package. Zip
//! handling lives with the caller; this layer only needs to read and write
//! part bytes by name.

use crate::ooxml::error::{OoxmlError, Result};
use std::collections::BTreeMap;

/// Part name template of worksheet charts; `%d` is the 1-based chart number.
pub const CHART_PART_TEMPLATE: &str = "xl/charts/chart%d.xml";

/// Part name of the extended properties.
pub const APP_PROPERTIES_PART: &str = "docProps/app.xml";

/// Read and write access to the parts of a package.
pub trait PartStore {
    /// Raw bytes of a part. Fails with [`OoxmlError::PartNotFound`] if absent.
    fn read_part(&self, name: &str) -> Result<Vec<u8>>;

    /// Create or replace a part.
    fn write_part(&mut self, name: &str, bytes: Vec<u8>) -> Result<()>;

    /// Names of all parts, in a stable order.
    fn part_names(&self) -> Vec<String>;

    fn contains_part(&self, name: &str) -> bool {
        self.part_names().iter().any(|n| n == name)
    }

    /// First unused part name produced by replacing `%d` in `template`
    /// with 1, 2, 3 and so on.
    fn next_part_name(&self, template: &str) -> Result<String> {
        (1..=10_000u32)
            .map(|n| template.replace("%d", itoa::Buffer::new().format(n)))
            .find(|candidate| !self.contains_part(candidate))
            .ok_or_else(|| {
                OoxmlError::InvalidFormat(format!("No free part name for template {}", template))
            })
    }
}

/// In-memory package, keyed by part name.
#[derive(Debug, Clone, Default)]
pub struct MemoryPartStore {
    parts: BTreeMap<String, Vec<u8>>,
}

impl MemoryPartStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn remove_part(&mut self, name: &str) -> Option<Vec<u8>> {
        self.parts.remove(normalize_name(name))
    }
}

/// Part names are stored without the leading slash of a pack URI.
#[inline]
fn normalize_name(name: &str) -> &str {
    name.strip_prefix('/').unwrap_or(name)
}

impl PartStore for MemoryPartStore {
    fn read_part(&self, name: &str) -> Result<Vec<u8>> {
        self.parts
            .get(normalize_name(name))
            .cloned()
            .ok_or_else(|| OoxmlError::PartNotFound(name.to_string()))
    }

    fn write_part(&mut self, name: &str, bytes: Vec<u8>) -> Result<()> {
        self.parts.insert(normalize_name(name).to_string(), bytes);
        Ok(())
    }

    fn part_names(&self) -> Vec<String> {
        self.parts.keys().cloned().collect()
    }

    #[inline]
    fn contains_part(&self, name: &str) -> bool {
        self.parts.contains_key(normalize_name(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryPartStore::new();
        assert!(store.is_empty());
        store.write_part("/docProps/app.xml", b"<Properties/>".to_vec()).unwrap();
        assert_eq!(store.read_part("docProps/app.xml").unwrap(), b"<Properties/>");
        assert!(store.contains_part("/docProps/app.xml"));
        assert!(matches!(
            store.read_part("docProps/core.xml"),
            Err(OoxmlError::PartNotFound(_))
        ));
        assert_eq!(store.remove_part("docProps/app.xml").map(|b| b.len()), Some(13));
        assert!(store.is_empty());
    }

    #[test]
    fn test_next_part_name() {
        let mut store = MemoryPartStore::new();
        assert_eq!(store.next_part_name(CHART_PART_TEMPLATE).unwrap(), "xl/charts/chart1.xml");
        store.write_part("xl/charts/chart1.xml", Vec::new()).unwrap();
        store.write_part("xl/charts/chart2.xml", Vec::new()).unwrap();
        assert_eq!(store.next_part_name(CHART_PART_TEMPLATE).unwrap(), "xl/charts/chart3.xml");
        assert_eq!(store.len(), 2);
    }
}
