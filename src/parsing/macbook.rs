use crate::core::features::ExtractedFeatures;
use crate::core::types::{DeviceFamily, DeviceType, Variant};
use crate::parsing::patterns::{self, has_word};
use crate::parsing::{describe_common, FeatureExtractor};

#[derive(Debug, Clone, Copy, Default)]
pub struct MacBookExtractor;

impl MacBookExtractor {
    fn device_type(text: &str) -> Option<(DeviceType, Variant)> {
        if has_word(text, "macbook pro") {
            Some((DeviceType::MacBookPro, Variant::Pro))
        } else if has_word(text, "macbook air") {
            Some((DeviceType::MacBookAir, Variant::Air))
        } else if has_word(text, "macbook") {
            Some((DeviceType::MacBook, Variant::Base))
        } else {
            None
        }
    }
}

/// Chip, core counts and cores shared by every Mac
pub(crate) fn describe_mac_hardware(features: &mut ExtractedFeatures, text: &str) {
    features.screen_size = patterns::parse_screen_size(text);
    features.cpu = patterns::parse_apple_m_chip(text).or_else(|| patterns::parse_intel_chip(text));
    let (cpu_cores, gpu_cores) = patterns::parse_core_counts(text);
    features.cpu_cores = cpu_cores;
    features.gpu_cores = gpu_cores;
}

impl FeatureExtractor for MacBookExtractor {
    fn family(&self) -> DeviceFamily {
        DeviceFamily::MacBook
    }

    fn detects(&self, text: &str) -> bool {
        has_word(text, "macbook")
    }

    fn describe(&self, text: &str) -> ExtractedFeatures {
        let mut features = ExtractedFeatures::new(text);
        features.family = Some(DeviceFamily::MacBook);
        features.brand = Some(DeviceFamily::MacBook.brand().to_string());

        if let Some((device_type, variant)) = Self::device_type(text) {
            features.device_type = Some(device_type);
            features.set_variant(variant);
        }
        describe_mac_hardware(&mut features, text);
        describe_common(&mut features, text);
        features.hardware_id = self.hardware_id(text);
        features
    }

    fn hardware_id(&self, text: &str) -> Option<String> {
        patterns::parse_apple_hardware_id(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Chip, ChipKind, ChipTier};

    #[test]
    fn test_apple_silicon_listing() {
        let features = MacBookExtractor
            .describe("MacBook Pro 16\" M3 Max 16-Core CPU 40-Core GPU 48GB 1TB A2991 10/2023");
        assert_eq!(features.device_type, Some(DeviceType::MacBookPro));
        assert_eq!(features.cpu, Some(Chip::apple_m(3, ChipTier::Max)));
        assert_eq!(features.cpu_cores, Some(16));
        assert_eq!(features.gpu_cores, Some(40));
        assert_eq!(features.storage_gb, Some(1024));
        assert_eq!(features.hardware_id.as_deref(), Some("A2991"));
        assert_eq!(features.year, Some(2023));
        assert_eq!(features.month, Some(10));
        assert!(features.screen_size.is_some_and(|s| (s - 16.0).abs() < 0.001));
    }

    #[test]
    fn test_intel_listing() {
        let features = MacBookExtractor.describe("MacBook Pro 15-inch 2019 Core i9 2.3GHz 512GB");
        let chip = features.cpu.unwrap();
        assert_eq!(chip.kind, ChipKind::IntelCore);
        assert_eq!(chip.generation, Some(9));
        assert_eq!(features.year, Some(2019));
        assert!(features.screen_size.is_some_and(|s| (s - 15.0).abs() < 0.001));
    }

    #[test]
    fn test_air_and_plain() {
        let air = MacBookExtractor.describe("MacBook Air 13.6 M2 8GB 256GB");
        assert_eq!(air.device_type, Some(DeviceType::MacBookAir));
        assert_eq!(air.variant, Some(Variant::Air));
        assert_eq!(air.storage_gb, Some(256));

        let plain = MacBookExtractor.describe("MacBook 12 2017 256GB");
        assert_eq!(plain.device_type, Some(DeviceType::MacBook));
        assert_eq!(plain.variant, Some(Variant::Base));
    }
}
