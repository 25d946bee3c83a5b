//! Series color resolution
//!
//! Colors are assigned by ordinal position of the series key: the first
//! distinct key gets the first palette entry, and the palette cycles when
//! there are more series than colors. An explicit `SeriesConfig::color`
//! always wins.

use crate::{SeriesEntry, colors};

#[derive(Debug, Clone, PartialEq)]
pub struct ColorResolver {
    palette: Vec<String>,
    order: Vec<String>,
}

impl ColorResolver {
    /// Resolver over the default palette
    pub fn new() -> Self {
        Self::with_palette(colors::PALETTE.iter().map(|c| c.to_string()).collect())
    }

    /// Resolver over a custom palette; an empty palette falls back to the default
    pub fn with_palette(palette: Vec<String>) -> Self {
        let palette = if palette.is_empty() {
            colors::PALETTE.iter().map(|c| c.to_string()).collect()
        } else {
            palette
        };
        Self {
            palette,
            order: Vec::new(),
        }
    }

    /// Register series keys in display order (first registration wins)
    pub fn register<'a>(mut self, keys: impl IntoIterator<Item = &'a str>) -> Self {
        for key in keys {
            if !self.order.iter().any(|k| k == key) {
                self.order.push(key.to_string());
            }
        }
        self
    }

    /// Resolver seeded with the configured series, in order
    pub fn for_series(series: &[SeriesEntry], palette: Vec<String>) -> Self {
        Self::with_palette(palette).register(series.iter().map(|s| s.key.as_str()))
    }

    /// Ordinal index of a key; unregistered keys are placed after registered ones
    /// by a stable hash so the same key always maps to the same slot
    fn ordinal(&self, key: &str) -> usize {
        self.order.iter().position(|k| k == key).unwrap_or_else(|| {
            let hash = key
                .bytes()
                .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
            self.order.len() + hash
        })
    }

    /// Palette color for `key`
    pub fn color_for(&self, key: &str) -> &str {
        &self.palette[self.ordinal(key) % self.palette.len()]
    }

    /// Color for a configured series (explicit color wins)
    pub fn resolve<'a>(&'a self, entry: &'a SeriesEntry) -> &'a str {
        entry
            .config
            .color
            .as_deref()
            .unwrap_or_else(|| self.color_for(&entry.key))
    }
}

impl Default for ColorResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SeriesConfig;

    #[test]
    fn test_ordinal_assignment_cycles() {
        let resolver = ColorResolver::with_palette(vec!["red".into(), "blue".into()])
            .register(["a", "b", "c"]);

        assert_eq!(resolver.color_for("a"), "red");
        assert_eq!(resolver.color_for("b"), "blue");
        assert_eq!(resolver.color_for("c"), "red");
    }

    #[test]
    fn test_duplicate_registration_keeps_first_slot() {
        let resolver = ColorResolver::with_palette(vec!["red".into(), "blue".into()])
            .register(["a", "b", "a"]);
        assert_eq!(resolver.color_for("a"), "red");
        assert_eq!(resolver.color_for("b"), "blue");
    }

    #[test]
    fn test_explicit_color_wins() {
        let series = vec![
            SeriesEntry::new("a", SeriesConfig::new("A").color("#123456")),
            SeriesEntry::plain("b"),
        ];
        let resolver = ColorResolver::for_series(&series, vec![]);
        assert_eq!(resolver.resolve(&series[0]), "#123456");
        assert_eq!(resolver.resolve(&series[1]), colors::PALETTE[1]);
    }

    #[test]
    fn test_unregistered_key_is_deterministic() {
        let resolver = ColorResolver::new();
        assert_eq!(resolver.color_for("zeta"), resolver.color_for("zeta"));
    }
}
