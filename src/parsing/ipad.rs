use regex::Regex;
use std::sync::LazyLock;

use crate::core::features::ExtractedFeatures;
use crate::core::types::{DeviceFamily, DeviceType, Variant};
use crate::parsing::patterns::{self, has_word};
use crate::parsing::{describe_common, FeatureExtractor};

/// "iPad Air 5", "iPad mini 6"
static RE_LINE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bipad\s+(?:air|mini)\s*(\d)\b").expect("Invalid regex")
});

/// "iPad 9"; the second group catches sizes and capacities ("iPad 10.2", "iPad 64GB")
static RE_BASE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bipad\s+(\d{1,2})([.,]\d|\s*(?:-?\s*inch|"|”|pulgadas|gb|tb))?"#)
        .expect("Invalid regex")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct IPadExtractor;

impl IPadExtractor {
    fn device_type(text: &str) -> Option<DeviceType> {
        if has_word(text, "ipad pro") {
            Some(DeviceType::IPadPro)
        } else if has_word(text, "ipad air") {
            Some(DeviceType::IPadAir)
        } else if has_word(text, "ipad mini") {
            Some(DeviceType::IPadMini)
        } else if has_word(text, "ipad") {
            Some(DeviceType::IPad)
        } else {
            None
        }
    }

    fn generation(text: &str, device_type: DeviceType) -> Option<u16> {
        if let Some(generation) = patterns::parse_ordinal_generation(text) {
            return Some(generation);
        }
        let number = match device_type {
            DeviceType::IPadAir | DeviceType::IPadMini => RE_LINE_NUMBER
                .captures(text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse().ok()),
            DeviceType::IPad => RE_BASE_NUMBER
                .captures(text)
                .filter(|caps| caps.get(2).is_none())
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse().ok()),
            _ => None,
        };
        number.filter(|g: &u16| (1..=12).contains(g))
    }
}

fn line_variant(device_type: DeviceType) -> Variant {
    match device_type {
        DeviceType::IPadPro => Variant::Pro,
        DeviceType::IPadAir => Variant::Air,
        DeviceType::IPadMini => Variant::Mini,
        _ => Variant::Base,
    }
}

impl FeatureExtractor for IPadExtractor {
    fn family(&self) -> DeviceFamily {
        DeviceFamily::IPad
    }

    fn detects(&self, text: &str) -> bool {
        has_word(text, "ipad")
    }

    fn describe(&self, text: &str) -> ExtractedFeatures {
        let mut features = ExtractedFeatures::new(text);
        features.family = Some(DeviceFamily::IPad);
        features.brand = Some(DeviceFamily::IPad.brand().to_string());

        if let Some(device_type) = Self::device_type(text) {
            features.device_type = Some(device_type);
            features.set_variant(line_variant(device_type));
            features.generation = Self::generation(text, device_type);
        }
        features.screen_size = patterns::parse_screen_size(text);
        features.cpu =
            patterns::parse_apple_m_chip(text).or_else(|| patterns::parse_apple_a_chip(text));
        match patterns::parse_connectivity(text) {
            Some(cellular) => features.set_connectivity(cellular, true),
            None => features.set_connectivity(false, false),
        }
        describe_common(&mut features, text);
        features.hardware_id = self.hardware_id(text);
        features
    }

    fn hardware_id(&self, text: &str) -> Option<String> {
        patterns::parse_apple_hardware_id(text)
    }
}
