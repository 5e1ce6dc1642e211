//! Android density tiers and dp → px conversion.
//!
//! The table is a constant: resolvers receive `DensityTier` values by copy,
//! there is no global mutable state.

use crate::error::BuildError;

/// Baseline density (mdpi), the "1 dp == 1 px" tier.
pub const BASELINE: u32 = 160;

/// A named density bucket with its dots-per-inch scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct DensityTier {
    pub name: &'static str,
    pub scale: u32,
}

impl DensityTier {
    pub const fn new(name: &'static str, scale: u32) -> Self {
        Self { name, scale }
    }

    /// Convert device-independent pixels to pixels for this tier.
    #[inline]
    pub const fn px(self, dp: u32) -> u32 {
        px(dp, self)
    }

    /// Scale factor relative to the baseline (mdpi = 1.0).
    #[inline]
    pub fn ratio(self) -> f64 {
        f64::from(self.scale) / f64::from(BASELINE)
    }
}

impl std::fmt::Display for DensityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

/// `floor(dp * scale / 160)`.
///
/// Integer truncation, not rounding. Saturates at `u32::MAX`.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn px(dp: u32, tier: DensityTier) -> u32 {
    let px = dp as u64 * tier.scale as u64 / BASELINE as u64;
    if px > u32::MAX as u64 { u32::MAX } else { px as u32 }
}

/// Read-only table of known density tiers.
#[derive(Debug, Clone, Copy)]
pub struct DensityTable {
    tiers: &'static [DensityTier],
}

impl DensityTable {
    /// The Android density buckets.
    pub const ANDROID: Self = Self {
        tiers: &[
            DensityTier::new("ldpi", 120),
            DensityTier::new("mdpi", 160),
            DensityTier::new("tvdpi", 213),
            DensityTier::new("hdpi", 240),
            DensityTier::new("xhdpi", 320),
            DensityTier::new("xxhdpi", 480),
            DensityTier::new("xxxhdpi", 640),
        ],
    };

    pub fn get(&self, name: &str) -> Option<DensityTier> {
        self.tiers.iter().copied().find(|t| t.name == name)
    }

    /// Resolve requested tier names, in request order.
    ///
    /// Fails on the first unknown name. Duplicates are dropped.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<DensityTier>, BuildError> {
        let mut resolved: Vec<DensityTier> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let tier = self
                .get(name)
                .ok_or_else(|| BuildError::UnknownDensityTier(name.to_string()))?;
            if !resolved.contains(&tier) {
                resolved.push(tier);
            }
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MDPI: DensityTier = DensityTier::new("mdpi", 160);
    const HDPI: DensityTier = DensityTier::new("hdpi", 240);
    const LDPI: DensityTier = DensityTier::new("ldpi", 120);

    #[test]
    fn test_px_baseline_identity() {
        for tier in DensityTable::ANDROID.tiers {
            assert_eq!(px(160, *tier), tier.scale, "failed for {}", tier.name);
        }
    }

    #[test]
    fn test_px_truncates() {
        // 5 * 120 / 160 = 3.75
        assert_eq!(px(5, LDPI), 3);
        // 13 * 240 / 160 = 19.5
        assert_eq!(px(13, HDPI), 19);
        assert_eq!(px(24, MDPI), 24);
        assert_eq!(px(0, HDPI), 0);
    }

    #[test]
    fn test_px_monotonic() {
        for tier in DensityTable::ANDROID.tiers {
            let mut prev = 0;
            for dp in 0..2000 {
                let cur = px(dp, *tier);
                assert!(cur >= prev, "{} not monotonic at {dp}", tier.name);
                prev = cur;
            }
        }
    }

    #[test]
    fn test_px_no_overflow() {
        assert_eq!(px(u32::MAX, MDPI), u32::MAX);
        assert_eq!(px(u32::MAX, DensityTier::new("xxxhdpi", 640)), u32::MAX);
        assert_eq!(px(u32::MAX, LDPI), (u64::from(u32::MAX) * 3 / 4) as u32);
    }

    #[test]
    fn test_resolve_known() {
        let tiers = DensityTable::ANDROID
            .resolve(&["xhdpi", "mdpi", "xhdpi"])
            .unwrap();
        let names: Vec<_> = tiers.iter().map(|t| t.name).collect();
        assert_eq!(names, ["xhdpi", "mdpi"]);
    }

    #[test]
    fn test_resolve_unknown() {
        let err = DensityTable::ANDROID
            .resolve(&["mdpi", "retina"])
            .unwrap_err();
        assert!(matches!(err, BuildError::UnknownDensityTier(ref n) if n == "retina"));
    }

    #[test]
    fn test_ratio() {
        assert_eq!(HDPI.ratio(), 1.5);
        assert_eq!(LDPI.ratio(), 0.75);
    }
}
