//! Knowledge bases: static per-family tables that fill attributes the vendor
//! text left out (release year, canonical chip, generation, screen size).
//!
//! Enrichment only *adds*: a value the extractor set is never overwritten.
//!
//! ## Lookup keys
//!
//! Entries are first narrowed by everything already known (device type,
//! screen size, explicit year, named variant), then selected by the most
//! specific key present:
//!
//! 1. hardware identifier
//! 2. chip named in the text
//! 3. generation number
//! 4. release year
//! 5. screen size alone, which resolves to the *oldest* entry of that size
//!
//! When the key selects several entries, only the values they all agree on
//! are filled.

pub mod galaxy;
pub mod ipad;
pub mod iphone;
pub mod mac;
pub mod macbook;

use crate::core::context::MappingContext;
use crate::core::features::ExtractedFeatures;
use crate::core::types::{Chip, DeviceFamily, DeviceType, Variant};
use crate::parsing::patterns::has_word;

pub use galaxy::GalaxyKnowledge;
pub use ipad::IPadKnowledge;
pub use iphone::IPhoneKnowledge;
pub use mac::MacDesktopKnowledge;
pub use macbook::MacBookKnowledge;

/// Chips referenced by the tables
pub mod chips {
    use crate::core::types::{Chip, ChipTier};

    pub const M1: Chip = Chip::apple_m(1, ChipTier::Base);
    pub const M1_PRO: Chip = Chip::apple_m(1, ChipTier::Pro);
    pub const M1_MAX: Chip = Chip::apple_m(1, ChipTier::Max);
    pub const M1_ULTRA: Chip = Chip::apple_m(1, ChipTier::Ultra);
    pub const M2: Chip = Chip::apple_m(2, ChipTier::Base);
    pub const M2_PRO: Chip = Chip::apple_m(2, ChipTier::Pro);
    pub const M2_MAX: Chip = Chip::apple_m(2, ChipTier::Max);
    pub const M2_ULTRA: Chip = Chip::apple_m(2, ChipTier::Ultra);
    pub const M3: Chip = Chip::apple_m(3, ChipTier::Base);
    pub const M3_PRO: Chip = Chip::apple_m(3, ChipTier::Pro);
    pub const M3_MAX: Chip = Chip::apple_m(3, ChipTier::Max);
    pub const M3_ULTRA: Chip = Chip::apple_m(3, ChipTier::Ultra);
    pub const M4: Chip = Chip::apple_m(4, ChipTier::Base);
    pub const M4_PRO: Chip = Chip::apple_m(4, ChipTier::Pro);
    pub const M4_MAX: Chip = Chip::apple_m(4, ChipTier::Max);
    pub const M5: Chip = Chip::apple_m(5, ChipTier::Base);

    pub const A9: Chip = Chip::apple_a(9);
    pub const A9X: Chip = Chip::apple_a_suffixed(9, 'X');
    pub const A10: Chip = Chip::apple_a(10);
    pub const A10X: Chip = Chip::apple_a_suffixed(10, 'X');
    pub const A11: Chip = Chip::apple_a(11);
    pub const A12: Chip = Chip::apple_a(12);
    pub const A12X: Chip = Chip::apple_a_suffixed(12, 'X');
    pub const A12Z: Chip = Chip::apple_a_suffixed(12, 'Z');
    pub const A13: Chip = Chip::apple_a(13);
    pub const A14: Chip = Chip::apple_a(14);
    pub const A15: Chip = Chip::apple_a(15);
    pub const A16: Chip = Chip::apple_a(16);
    pub const A17_PRO: Chip = Chip::apple_a_pro(17);
    pub const A18: Chip = Chip::apple_a(18);
    pub const A18_PRO: Chip = Chip::apple_a_pro(18);
}

/// Fills unset features from static tables. Never fails the pipeline.
pub trait KnowledgeBase: Send + Sync {
    fn family(&self) -> DeviceFamily;

    fn enrich(&self, features: ExtractedFeatures, ctx: &mut MappingContext) -> ExtractedFeatures;
}

/// One known hardware revision
#[derive(Debug, Clone, Copy)]
pub struct DeviceSpec {
    pub device_type: DeviceType,
    pub generation: Option<u16>,
    pub variant: Option<Variant>,
    pub year: u16,
    /// Every chip the revision shipped with
    pub chips: &'static [Chip],
    /// Marketing sizes (inches); empty when not size-specific
    pub screen_sizes: &'static [f32],
    /// Hardware id prefixes ("A2991", "SM-S918")
    pub hardware_ids: &'static [&'static str],
    /// Word that must appear in the text ("xs" for iPhone XS)
    pub marker: Option<&'static str>,
}

impl DeviceSpec {
    pub const fn new(device_type: DeviceType, year: u16) -> Self {
        Self {
            device_type,
            generation: None,
            variant: None,
            year,
            chips: &[],
            screen_sizes: &[],
            hardware_ids: &[],
            marker: None,
        }
    }

    pub const fn generation(mut self, generation: u16) -> Self {
        self.generation = Some(generation);
        self
    }

    pub const fn variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }

    pub const fn chips(mut self, chips: &'static [Chip]) -> Self {
        self.chips = chips;
        self
    }

    pub const fn sizes(mut self, sizes: &'static [f32]) -> Self {
        self.screen_sizes = sizes;
        self
    }

    pub const fn ids(mut self, ids: &'static [&'static str]) -> Self {
        self.hardware_ids = ids;
        self
    }

    pub const fn marker(mut self, marker: &'static str) -> Self {
        self.marker = Some(marker);
        self
    }

    fn fits_known(&self, features: &ExtractedFeatures) -> bool {
        if features.device_type.is_some_and(|t| t != self.device_type) {
            return false;
        }
        if let Some(size) = features.screen_size {
            if !self.screen_sizes.is_empty()
                && !self.screen_sizes.iter().any(|s| (s - size).abs() < 0.05)
            {
                return false;
            }
        }
        if features.year.is_some_and(|y| y != self.year) {
            return false;
        }
        if let (Some(wanted), Some(own)) = (features.variant, self.variant) {
            if wanted != own {
                return false;
            }
        }
        self.marker
            .map_or(true, |marker| has_word(&features.original_text, marker))
    }

    fn has_hardware_id(&self, hardware_id: &str) -> bool {
        self.hardware_ids
            .iter()
            .any(|prefix| hardware_id.starts_with(prefix))
    }

    fn has_chip(&self, chip: &Chip) -> bool {
        self.chips.iter().any(|own| own.is_consistent_with(chip))
    }
}

/// Which key selected the entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey {
    HardwareId,
    Chip,
    Generation,
    Year,
    ScreenSize,
}

impl LookupKey {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HardwareId => "hardware_id",
            Self::Chip => "chip",
            Self::Generation => "generation",
            Self::Year => "year",
            Self::ScreenSize => "screen_size",
        }
    }
}

/// Entries selected for `features`, with the key that selected them
#[must_use]
pub fn lookup(
    table: &'static [DeviceSpec],
    features: &ExtractedFeatures,
) -> Option<(LookupKey, Vec<&'static DeviceSpec>)> {
    let mut pool: Vec<&'static DeviceSpec> = table.iter().filter(|s| s.fits_known(features)).collect();

    // A hardware id overrides the device type the text suggested
    if let Some(id) = &features.hardware_id {
        let mut by_id: Vec<_> = table.iter().filter(|s| s.has_hardware_id(id)).collect();
        if !by_id.is_empty() {
            if let Some(year) = features.year {
                narrow(&mut by_id, |s| s.year == year);
            }
            if let Some(chip) = features.explicit_chip() {
                narrow(&mut by_id, |s| s.has_chip(chip));
            }
            return Some((LookupKey::HardwareId, by_id));
        }
    }

    if let Some(chip) = features.explicit_chip() {
        pool.retain(|s| s.has_chip(chip));
        return (!pool.is_empty()).then_some((LookupKey::Chip, pool));
    }

    if let Some(generation) = features.generation {
        pool.retain(|s| s.generation == Some(generation));
        return (!pool.is_empty()).then_some((LookupKey::Generation, pool));
    }

    if features.year.is_some() && features.device_type.is_some() {
        return (!pool.is_empty()).then_some((LookupKey::Year, pool));
    }

    if features.screen_size.is_some() && features.device_type.is_some() {
        let oldest = pool.iter().copied().min_by_key(|s| s.year)?;
        return Some((LookupKey::ScreenSize, vec![oldest]));
    }

    None
}

/// Keep only entries passing `keep`, unless that would leave none
fn narrow(entries: &mut Vec<&'static DeviceSpec>, keep: impl Fn(&DeviceSpec) -> bool) {
    if entries.iter().any(|e| keep(e)) {
        entries.retain(|e| keep(e));
    }
}

/// Value shared by every entry, if any
fn common<T: PartialEq + Copy>(
    entries: &[&DeviceSpec],
    get: impl Fn(&DeviceSpec) -> Option<T>,
) -> Option<T> {
    let first = get(entries.first()?)?;
    entries
        .iter()
        .all(|e| get(e) == Some(first))
        .then_some(first)
}

/// Look `features` up in `table` and fill what the selected entries agree on
pub fn enrich_from_table(
    table: &'static [DeviceSpec],
    mut features: ExtractedFeatures,
    ctx: &mut MappingContext,
) -> ExtractedFeatures {
    let Some((key, entries)) = lookup(table, &features) else {
        ctx.debug("knowledge base: no entry for these features");
        return features;
    };

    let mut filled = Vec::new();
    if let Some(device_type) = common(&entries, |e| Some(e.device_type)) {
        if features.fill_device_type(device_type) {
            filled.push("device_type");
        }
    }
    if let Some(generation) = common(&entries, |e| e.generation) {
        if features.fill_generation(generation) {
            filled.push("generation");
        }
    }
    if let Some(variant) = common(&entries, |e| e.variant) {
        if features.fill_variant(variant) {
            filled.push("variant");
        }
    }
    if let Some(year) = common(&entries, |e| Some(e.year)) {
        if features.fill_year(year) {
            filled.push("year");
        }
    }
    let single_chip = |e: &DeviceSpec| match e.chips {
        [chip] => Some(*chip),
        _ => None,
    };
    if let Some(chip) = common(&entries, single_chip) {
        if features.fill_cpu(chip) {
            filled.push("cpu");
        }
    }
    let single_size = |e: &DeviceSpec| match e.screen_sizes {
        [size] => Some(*size),
        _ => None,
    };
    if let Some(size) = common(&entries, single_size) {
        if features.fill_screen_size(size) {
            filled.push("screen_size");
        }
    }

    ctx.debug(format!(
        "knowledge base: {} entries by {}, filled [{}]",
        entries.len(),
        key.as_str(),
        filled.join(", ")
    ));
    ctx.set_metadata("knowledge_key", key.as_str());
    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::MappingInput;
    use super::chips::{A12Z, M1, M2, M3_MAX, M3_PRO};

    static TABLE: &[DeviceSpec] = &[
        DeviceSpec::new(DeviceType::IPadPro, 2020)
            .generation(4)
            .chips(&[A12Z])
            .sizes(&[12.9]),
        DeviceSpec::new(DeviceType::IPadPro, 2021)
            .generation(5)
            .chips(&[M1])
            .sizes(&[12.9]),
        DeviceSpec::new(DeviceType::IPadPro, 2022)
            .generation(6)
            .chips(&[M2])
            .sizes(&[12.9]),
    ];

    fn context() -> MappingContext {
        MappingContext::new(MappingInput::new("iPad Pro").unwrap())
    }

    fn ipad_pro(size: f32) -> ExtractedFeatures {
        let mut features = ExtractedFeatures::new("iPad Pro");
        features.device_type = Some(DeviceType::IPadPro);
        features.screen_size = Some(size);
        features
    }

    #[test]
    fn test_chip_beats_generation() {
        let mut features = ipad_pro(12.9);
        features.cpu = Some(M2);
        features.generation = Some(5);
        // Chip key wins, then the explicit generation is kept untouched
        let (key, entries) = lookup(TABLE, &features).unwrap();
        assert_eq!(key, LookupKey::Chip);
        assert_eq!(entries.len(), 1);

        let enriched = enrich_from_table(TABLE, features, &mut context());
        assert_eq!(enriched.year, Some(2022));
        assert_eq!(enriched.generation, Some(5));
    }

    #[test]
    fn test_size_only_resolves_to_oldest() {
        let enriched = enrich_from_table(TABLE, ipad_pro(12.9), &mut context());
        assert_eq!(enriched.year, Some(2020));
        assert_eq!(enriched.generation, Some(4));
        assert!(enriched.is_inferred("year"));
        assert!(enriched.is_inferred("cpu"));
    }

    #[test]
    fn test_explicit_year_narrows_the_pool() {
        let mut features = ipad_pro(12.9);
        features.year = Some(2021);
        let enriched = enrich_from_table(TABLE, features, &mut context());
        assert_eq!(enriched.generation, Some(5));
        assert!(!enriched.is_inferred("year"));
    }

    #[test]
    fn test_unknown_size_fills_nothing() {
        let enriched = enrich_from_table(TABLE, ipad_pro(15.0), &mut context());
        assert_eq!(enriched.year, None);
        assert!(enriched.inferred_fields.is_empty());
    }

    #[test]
    fn test_only_agreed_values_are_filled() {
        static SHARED: &[DeviceSpec] = &[
            DeviceSpec::new(DeviceType::MacBookPro, 2023)
                .chips(&[M3_PRO])
                .sizes(&[16.0])
                .ids(&["A2991"]),
            DeviceSpec::new(DeviceType::MacBookPro, 2023)
                .chips(&[M3_MAX])
                .sizes(&[16.0])
                .ids(&["A2991"]),
        ];
        let mut features = ExtractedFeatures::new("A2991");
        features.hardware_id = Some("A2991".to_string());
        let enriched = enrich_from_table(SHARED, features, &mut context());
        assert_eq!(enriched.year, Some(2023));
        assert_eq!(enriched.device_type, Some(DeviceType::MacBookPro));
        assert_eq!(enriched.cpu, None);
    }
}
