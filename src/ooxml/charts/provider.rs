//! Worksheet data seam used while encoding.
//!
//! Caches in a chart part mirror the worksheet cells the series formulas
//! point at. The chart layer does not evaluate formulas itself; it asks a
//! [`DataProvider`] for the current values when a chart is saved.

use crate::ooxml::error::{OoxmlError, Result};
use std::collections::HashMap;

/// First axis ID handed out within a sheet.
pub const AXIS_ID_BASE: u32 = 100_000_000;

/// Axis IDs reserved per chart ordinal.
pub const AXIS_ID_BLOCK: u32 = 16;

/// Resolves worksheet range formulas to cell values.
pub trait DataProvider {
    /// Resolve `formula` (e.g. `Sheet1!$B$2:$B$4`) to `(index, value)`
    /// pairs in range order. Indices are 0-based; blank cells may be
    /// skipped. An empty range resolves to an empty vector.
    fn resolve_range(&self, formula: &str) -> Result<Vec<(u32, String)>>;
}

impl<T: DataProvider + ?Sized> DataProvider for &T {
    #[inline]
    fn resolve_range(&self, formula: &str) -> Result<Vec<(u32, String)>> {
        (**self).resolve_range(formula)
    }
}

/// Provider backed by a fixed formula → values map.
#[derive(Debug, Clone, Default)]
pub struct StaticDataProvider {
    ranges: HashMap<String, Vec<(u32, String)>>,
}

impl StaticDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a contiguous range of values starting at index 0.
    pub fn insert<I, S>(&mut self, formula: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let points = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i as u32, v.into()))
            .collect();
        self.ranges.insert(formula.into(), points);
    }

    /// Register a range with explicit point indices.
    pub fn insert_points(&mut self, formula: impl Into<String>, points: Vec<(u32, String)>) {
        self.ranges.insert(formula.into(), points);
    }

    /// Builder form of [`StaticDataProvider::insert`].
    pub fn with<I, S>(mut self, formula: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(formula, values);
        self
    }
}

impl DataProvider for StaticDataProvider {
    fn resolve_range(&self, formula: &str) -> Result<Vec<(u32, String)>> {
        self.ranges
            .get(formula)
            .cloned()
            .ok_or_else(|| OoxmlError::SeriesResolution {
                formula: formula.to_string(),
                reason: "range is not defined".to_string(),
            })
    }
}

/// Per-save settings for [`super::encode`].
pub struct EncodeContext<'a> {
    /// Position of the chart among the charts of its sheet
    pub order: u32,
    /// Editing language written to `c:lang`
    pub lang: String,
    /// Source of cached series values
    pub provider: &'a dyn DataProvider,
}

impl<'a> EncodeContext<'a> {
    pub fn new(provider: &'a dyn DataProvider) -> Self {
        Self {
            order: 0,
            lang: "en-US".to_string(),
            provider,
        }
    }

    #[inline]
    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    #[inline]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// The `n`-th axis ID of this chart's block. Identical configurations
    /// always receive identical IDs.
    ///
    /// Fails with [`OoxmlError::InvalidFormat`] when the ordinal is too large
    /// for the block to fit in the 32-bit ID space.
    pub fn axis_id(&self, n: u32) -> Result<u32> {
        self.order
            .checked_mul(AXIS_ID_BLOCK)
            .and_then(|offset| offset.checked_add(AXIS_ID_BASE))
            .and_then(|start| start.checked_add(n))
            .ok_or_else(|| {
                OoxmlError::InvalidFormat(format!(
                    "Chart ordinal {} leaves no room for axis IDs",
                    self.order
                ))
            })
    }
}

impl std::fmt::Debug for EncodeContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodeContext")
            .field("order", &self.order)
            .field("lang", &self.lang)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_provider() {
        let provider = StaticDataProvider::new().with("Sheet1!$A$1:$A$3", ["a", "b", "c"]);
        let points = provider.resolve_range("Sheet1!$A$1:$A$3").unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[2], (2, "c".to_string()));
        match provider.resolve_range("Sheet2!$A$1") {
            Err(OoxmlError::SeriesResolution { formula, .. }) => assert_eq!(formula, "Sheet2!$A$1"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_axis_id_blocks() {
        let provider = StaticDataProvider::new();
        let first = EncodeContext::new(&provider);
        let third = EncodeContext::new(&provider).with_order(2);
        assert_eq!(first.axis_id(0).unwrap(), 100_000_000);
        assert_eq!(first.axis_id(1).unwrap(), 100_000_001);
        assert_eq!(third.axis_id(0).unwrap(), 100_000_032);
        assert_eq!(third.lang, "en-US");
    }

    #[test]
    fn test_axis_id_overflow() {
        let provider = StaticDataProvider::new();
        let last = (u32::MAX - AXIS_ID_BASE) / AXIS_ID_BLOCK;
        let fits = EncodeContext::new(&provider).with_order(last - 1);
        assert!(fits.axis_id(2).is_ok());
        for order in [last + 1, u32::MAX / AXIS_ID_BLOCK, u32::MAX] {
            let ctx = EncodeContext::new(&provider).with_order(order);
            assert!(matches!(ctx.axis_id(0), Err(OoxmlError::InvalidFormat(_))));
        }
    }
}
