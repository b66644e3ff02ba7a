use regex::Regex;
use std::sync::LazyLock;

use crate::core::features::ExtractedFeatures;
use crate::core::types::{DeviceFamily, DeviceType, Variant};
use crate::parsing::patterns::{self, has_word};
use crate::parsing::{describe_common, FeatureExtractor};

static RE_FOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:z\s*)?fold\s*(\d)?\b").expect("Invalid regex"));

static RE_FLIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:z\s*)?flip\s*(\d)?\b").expect("Invalid regex"));

static RE_NOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bnote\s*(\d{1,2})\b").expect("Invalid regex"));

/// "S23", "S23+", "S 24"
static RE_S_SERIES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bS\s?(\d{2})(\+)?").expect("Invalid regex"));

static RE_A_SERIES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bA(\d{2})\b").expect("Invalid regex"));

#[derive(Debug, Clone, Copy, Default)]
pub struct GalaxyExtractor;

fn captured_number(re: &Regex, text: &str) -> Option<u16> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

impl GalaxyExtractor {
    /// Device type, generation and the variant the line itself implies
    fn line(text: &str) -> Option<(DeviceType, Option<u16>, Variant)> {
        if RE_FOLD.is_match(text) {
            return Some((DeviceType::GalaxyZFold, captured_number(&RE_FOLD, text), Variant::Fold));
        }
        if RE_FLIP.is_match(text) {
            return Some((DeviceType::GalaxyZFlip, captured_number(&RE_FLIP, text), Variant::Flip));
        }
        if let Some(generation) = captured_number(&RE_NOTE, text) {
            return Some((DeviceType::GalaxyNote, Some(generation), Variant::Base));
        }
        if let Some(caps) = RE_S_SERIES.captures(text) {
            let generation = caps.get(1).and_then(|m| m.as_str().parse().ok());
            let variant = if caps.get(2).is_some() {
                Variant::Plus
            } else {
                Variant::Base
            };
            return Some((DeviceType::GalaxyS, generation, variant));
        }
        if let Some(generation) = captured_number(&RE_A_SERIES, text) {
            return Some((DeviceType::GalaxyA, Some(generation), Variant::Base));
        }
        None
    }

    fn variant(text: &str, line_variant: Variant) -> Variant {
        if has_word(text, "ultra") {
            Variant::Ultra
        } else if has_word(text, "plus") {
            Variant::Plus
        } else if has_word(text, "fe") {
            Variant::Fe
        } else {
            line_variant
        }
    }
}

impl FeatureExtractor for GalaxyExtractor {
    fn family(&self) -> DeviceFamily {
        DeviceFamily::Galaxy
    }

    fn detects(&self, text: &str) -> bool {
        has_word(text, "galaxy")
            || has_word(text, "samsung")
            || patterns::parse_samsung_hardware_id(text).is_some()
    }

    fn describe(&self, text: &str) -> ExtractedFeatures {
        let mut features = ExtractedFeatures::new(text);
        features.family = Some(DeviceFamily::Galaxy);
        features.brand = Some(DeviceFamily::Galaxy.brand().to_string());

        // Strip the model code first so "SM-S918B" is not read as an S-series name
        let hardware_id = self.hardware_id(text);
        let name = match &hardware_id {
            Some(_) => RE_SAMSUNG_CODE_TEXT.replace_all(text, " ").into_owned(),
            None => text.to_string(),
        };

        if let Some((device_type, generation, line_variant)) = Self::line(&name) {
            features.device_type = Some(device_type);
            features.generation = generation;
            features.set_variant(Self::variant(&name, line_variant));
        }
        describe_common(&mut features, &name);
        features.hardware_id = hardware_id;
        features
    }

    fn hardware_id(&self, text: &str) -> Option<String> {
        patterns::parse_samsung_hardware_id(text)
    }
}

static RE_SAMSUNG_CODE_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bSM-?\s?[A-Z]\d{3}[A-Z0-9]{0,4}\b").expect("Invalid regex")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines() {
        let cases = [
            ("Samsung Galaxy S23 Ultra 256GB", DeviceType::GalaxyS, Some(23), Variant::Ultra),
            ("Galaxy S24+ 512GB", DeviceType::GalaxyS, Some(24), Variant::Plus),
            ("Galaxy S23 FE 128GB", DeviceType::GalaxyS, Some(23), Variant::Fe),
            ("Galaxy Z Fold5 512GB", DeviceType::GalaxyZFold, Some(5), Variant::Fold),
            ("Galaxy Z Flip 6 256GB", DeviceType::GalaxyZFlip, Some(6), Variant::Flip),
            ("Galaxy Note 20 Ultra 5G", DeviceType::GalaxyNote, Some(20), Variant::Ultra),
            ("Galaxy A54 5G 128GB", DeviceType::GalaxyA, Some(54), Variant::Base),
        ];
        for (text, device_type, generation, variant) in cases {
            let features = GalaxyExtractor.describe(text);
            assert_eq!(features.device_type, Some(device_type), "{text}");
            assert_eq!(features.generation, generation, "{text}");
            assert_eq!(features.variant, Some(variant), "{text}");
        }
    }

    #[test]
    fn test_model_code_is_not_a_series_name() {
        let features = GalaxyExtractor.describe("Samsung SM-S918B 256GB");
        assert_eq!(features.hardware_id.as_deref(), Some("SM-S918B"));
        assert_eq!(features.device_type, None);
        assert_eq!(features.storage_gb, Some(256));
    }

    #[test]
    fn test_detects_brand_and_code() {
        assert!(GalaxyExtractor.detects("S23 Ultra Samsung"));
        assert!(GalaxyExtractor.detects("SM-F946B"));
        assert!(!GalaxyExtractor.detects("iPhone 15"));
    }
}
