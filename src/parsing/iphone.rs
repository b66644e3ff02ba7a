use regex::Regex;
use std::sync::LazyLock;

use crate::core::features::ExtractedFeatures;
use crate::core::types::{DeviceFamily, DeviceType, Variant};
use crate::parsing::patterns::{self, has_word};
use crate::parsing::{describe_common, FeatureExtractor};

static RE_IPHONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\biphone\s*(\d{1,2})\b").expect("Invalid regex"));

static RE_IPHONE_X: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\biphone\s*(x[sr]?)\b").expect("Invalid regex"));

/// Generation number used for the X, XS and XR line
pub const X_SERIES_GENERATION: u16 = 10;

#[derive(Debug, Clone, Copy, Default)]
pub struct IPhoneExtractor;

impl IPhoneExtractor {
    fn variant(text: &str) -> Variant {
        if has_word(text, "pro max") {
            Variant::ProMax
        } else if has_word(text, "pro") {
            Variant::Pro
        } else if has_word(text, "plus") {
            Variant::Plus
        } else if has_word(text, "mini") {
            Variant::Mini
        } else if has_word(text, "se") {
            Variant::Se
        } else if has_word(text, "max") {
            // iPhone XS Max
            Variant::Max
        } else {
            Variant::Base
        }
    }

    fn generation(text: &str, variant: Variant) -> Option<u16> {
        if variant == Variant::Se {
            return patterns::parse_ordinal_generation(text);
        }
        if RE_IPHONE_X.is_match(text) {
            return Some(X_SERIES_GENERATION);
        }
        RE_IPHONE_NUMBER
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u16>().ok())
            .filter(|g| (3..=20).contains(g))
    }
}

impl FeatureExtractor for IPhoneExtractor {
    fn family(&self) -> DeviceFamily {
        DeviceFamily::IPhone
    }

    fn detects(&self, text: &str) -> bool {
        has_word(text, "iphone")
    }

    fn describe(&self, text: &str) -> ExtractedFeatures {
        let mut features = ExtractedFeatures::new(text);
        features.family = Some(DeviceFamily::IPhone);
        features.brand = Some(DeviceFamily::IPhone.brand().to_string());

        if has_word(text, "iphone") {
            features.device_type = Some(DeviceType::IPhone);
            features.set_variant(Self::variant(text));
        }
        features.generation = features
            .variant
            .and_then(|variant| Self::generation(text, variant));
        features.cpu = patterns::parse_apple_a_chip(text);
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
    use crate::core::types::Chip;

    #[test]
    fn test_numbered_generations_and_variants() {
        let cases = [
            ("iPhone 13 Pro 128GB", 13, Variant::Pro),
            ("Apple iPhone 15 Pro Max 256 GB Titanio", 15, Variant::ProMax),
            ("iphone 14 plus", 14, Variant::Plus),
            ("iPhone 12 mini 64GB", 12, Variant::Mini),
            ("iPhone 11", 11, Variant::Base),
            ("iPhone X 64GB", 10, Variant::Base),
            ("iPhone XS Max 256GB", 10, Variant::Max),
        ];
        for (text, generation, variant) in cases {
            let features = IPhoneExtractor.describe(text);
            assert_eq!(features.generation, Some(generation), "{text}");
            assert_eq!(features.variant, Some(variant), "{text}");
            assert_eq!(features.device_type, Some(DeviceType::IPhone));
        }
    }

    #[test]
    fn test_se_uses_ordinal_generation() {
        let features = IPhoneExtractor.describe("iPhone SE (3rd generation) 64GB");
        assert_eq!(features.variant, Some(Variant::Se));
        assert_eq!(features.generation, Some(3));
        assert!(features.flags.is_se);

        let features = IPhoneExtractor.describe("iPhone SE 2020");
        assert_eq!(features.generation, None);
        assert_eq!(features.year, Some(2020));
    }

    #[test]
    fn test_chip_storage_and_id() {
        let features = IPhoneExtractor.describe("iPhone 13 A15 Bionic 1TB A2483");
        assert_eq!(features.cpu, Some(Chip::apple_a(15)));
        assert_eq!(features.storage_gb, Some(1024));
        assert_eq!(features.hardware_id.as_deref(), Some("A2483"));
    }

    #[test]
    fn test_detects() {
        assert!(IPhoneExtractor.detects("Apple IPHONE 13"));
        assert!(!IPhoneExtractor.detects("iPad Pro"));
    }
}
