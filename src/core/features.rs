use serde::{Deserialize, Serialize};

use crate::core::types::{Chip, DeviceFamily, DeviceType, Variant};

/// Boolean view of the named variant, kept for callers that expect flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantFlags {
    pub is_pro: bool,
    pub is_max: bool,
    pub is_plus: bool,
    pub is_mini: bool,
    pub is_air: bool,
    pub is_ultra: bool,
    pub is_se: bool,
    pub is_fe: bool,
}

impl VariantFlags {
    fn from_variant(variant: Variant) -> Self {
        Self {
            is_pro: matches!(variant, Variant::Pro | Variant::ProMax),
            is_max: matches!(variant, Variant::ProMax | Variant::Max),
            is_plus: matches!(variant, Variant::Plus),
            is_mini: matches!(variant, Variant::Mini),
            is_air: matches!(variant, Variant::Air),
            is_ultra: matches!(variant, Variant::Ultra),
            is_se: matches!(variant, Variant::Se),
            is_fe: matches!(variant, Variant::Fe),
        }
    }
}

/// Attributes recovered from one vendor record (or one catalog description).
///
/// Written by the extractor, then only *added to* by the knowledge base: every
/// `fill_*` method leaves a value the extractor already set untouched and
/// records the field name in `inferred_fields` when it does write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFeatures {
    pub family: Option<DeviceFamily>,
    pub device_type: Option<DeviceType>,
    pub brand: Option<String>,
    pub generation: Option<u16>,
    pub year: Option<u16>,
    pub month: Option<u8>,
    pub storage_gb: Option<u32>,
    pub screen_size: Option<f32>,
    pub variant: Option<Variant>,
    #[serde(flatten)]
    pub flags: VariantFlags,
    pub cpu: Option<Chip>,
    pub cpu_cores: Option<u8>,
    pub gpu_cores: Option<u8>,
    pub hardware_id: Option<String>,
    pub has_wifi: bool,
    pub has_cellular: bool,
    /// False when connectivity was defaulted to Wi-Fi only
    pub connectivity_explicit: bool,
    /// Fields written by a knowledge base rather than read from text
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inferred_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    pub confidence: f64,
    pub original_text: String,
}

impl ExtractedFeatures {
    pub fn new(original_text: impl Into<String>) -> Self {
        Self {
            original_text: original_text.into(),
            has_wifi: true,
            ..Self::default()
        }
    }

    pub fn set_variant(&mut self, variant: Variant) {
        self.variant = Some(variant);
        self.flags = VariantFlags::from_variant(variant);
    }

    pub fn set_connectivity(&mut self, cellular: bool, explicit: bool) {
        self.has_wifi = true;
        self.has_cellular = cellular;
        self.connectivity_explicit = explicit;
    }

    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Whether `field` came from a knowledge base instead of the text
    #[must_use]
    pub fn is_inferred(&self, field: &str) -> bool {
        self.inferred_fields.iter().any(|f| f == field)
    }

    /// Chip named in the text itself (not inferred)
    #[must_use]
    pub fn explicit_chip(&self) -> Option<&Chip> {
        self.cpu.as_ref().filter(|_| !self.is_inferred("cpu"))
    }

    /// Generation named in the text itself (not inferred)
    #[must_use]
    pub fn explicit_generation(&self) -> Option<u16> {
        self.generation.filter(|_| !self.is_inferred("generation"))
    }

    /// Year read from the text itself (not inferred)
    #[must_use]
    pub fn explicit_year(&self) -> Option<u16> {
        self.year.filter(|_| !self.is_inferred("year"))
    }

    /// Generation a knowledge base filled in
    #[must_use]
    pub fn inferred_generation(&self) -> Option<u16> {
        self.generation.filter(|_| self.is_inferred("generation"))
    }

    /// Year a knowledge base filled in
    #[must_use]
    pub fn inferred_year(&self) -> Option<u16> {
        self.year.filter(|_| self.is_inferred("year"))
    }

    /// Named variant (anything but the regular model)
    #[must_use]
    pub fn named_variant(&self) -> Option<Variant> {
        self.variant.filter(Variant::is_named)
    }

    pub fn fill_year(&mut self, year: u16) -> bool {
        let filled = fill(&mut self.year, year);
        self.mark_inferred(filled, "year")
    }

    pub fn fill_generation(&mut self, generation: u16) -> bool {
        let filled = fill(&mut self.generation, generation);
        self.mark_inferred(filled, "generation")
    }

    pub fn fill_cpu(&mut self, chip: Chip) -> bool {
        let filled = fill(&mut self.cpu, chip);
        self.mark_inferred(filled, "cpu")
    }

    pub fn fill_screen_size(&mut self, size: f32) -> bool {
        let filled = fill(&mut self.screen_size, size);
        self.mark_inferred(filled, "screen_size")
    }

    pub fn fill_cpu_cores(&mut self, cores: u8) -> bool {
        let filled = fill(&mut self.cpu_cores, cores);
        self.mark_inferred(filled, "cpu_cores")
    }

    pub fn fill_device_type(&mut self, device_type: DeviceType) -> bool {
        let filled = fill(&mut self.device_type, device_type);
        self.mark_inferred(filled, "device_type")
    }

    pub fn fill_variant(&mut self, variant: Variant) -> bool {
        if self.variant.is_some() {
            return false;
        }
        self.set_variant(variant);
        self.mark_inferred(true, "variant")
    }

    fn mark_inferred(&mut self, filled: bool, field: &str) -> bool {
        if filled {
            self.inferred_fields.push(field.to_string());
        }
        filled
    }
}

fn fill<T>(slot: &mut Option<T>, value: T) -> bool {
    if slot.is_some() {
        return false;
    }
    *slot = Some(value);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ChipTier;

    #[test]
    fn test_fill_never_overwrites() {
        let mut features = ExtractedFeatures::new("iPad Pro 2021");
        features.year = Some(2021);

        assert!(!features.fill_year(2018));
        assert_eq!(features.year, Some(2021));
        assert!(!features.is_inferred("year"));

        assert!(features.fill_cpu(Chip::apple_m(1, ChipTier::Base)));
        assert!(features.is_inferred("cpu"));
        assert!(features.explicit_chip().is_none());
    }

    #[test]
    fn test_variant_flags() {
        let mut features = ExtractedFeatures::new("iPhone 15 Pro Max");
        features.set_variant(Variant::ProMax);
        assert!(features.flags.is_pro);
        assert!(features.flags.is_max);
        assert!(!features.flags.is_plus);
        assert_eq!(features.named_variant(), Some(Variant::ProMax));

        features.set_variant(Variant::Base);
        assert_eq!(features.flags, VariantFlags::default());
        assert_eq!(features.named_variant(), None);
    }

    #[test]
    fn test_default_connectivity_is_wifi_only() {
        let features = ExtractedFeatures::new("iPad 10th generation");
        assert!(features.has_wifi);
        assert!(!features.has_cellular);
        assert!(!features.connectivity_explicit);
    }
}
