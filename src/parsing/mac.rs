use crate::core::features::ExtractedFeatures;
use crate::core::types::{DeviceFamily, DeviceType, Variant};
use crate::parsing::macbook::describe_mac_hardware;
use crate::parsing::patterns::{self, has_word};
use crate::parsing::{describe_common, FeatureExtractor};

/// Product-line tokens, most specific first
const DESKTOP_LINES: &[(&str, DeviceType)] = &[
    ("imac pro", DeviceType::IMacPro),
    ("imac", DeviceType::IMac),
    ("mac mini", DeviceType::MacMini),
    ("mac studio", DeviceType::MacStudio),
    ("mac pro", DeviceType::MacPro),
];

/// iMac, Mac mini, Mac Studio, Mac Pro
#[derive(Debug, Clone, Copy, Default)]
pub struct MacDesktopExtractor;

impl FeatureExtractor for MacDesktopExtractor {
    fn family(&self) -> DeviceFamily {
        DeviceFamily::MacDesktop
    }

    fn detects(&self, text: &str) -> bool {
        DESKTOP_LINES.iter().any(|(token, _)| has_word(text, token))
    }

    fn describe(&self, text: &str) -> ExtractedFeatures {
        let mut features = ExtractedFeatures::new(text);
        features.family = Some(DeviceFamily::MacDesktop);
        features.brand = Some(DeviceFamily::MacDesktop.brand().to_string());

        if let Some(&(_, device_type)) = DESKTOP_LINES.iter().find(|(token, _)| has_word(text, token)) {
            features.device_type = Some(device_type);
            if device_type == DeviceType::IMacPro {
                features.set_variant(Variant::Pro);
            }
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
    fn test_desktop_lines() {
        let cases = [
            ("iMac 24\" M3 8-Core CPU 256GB", DeviceType::IMac),
            ("iMac Pro 2017 Xeon W 3.2GHz 1TB", DeviceType::IMacPro),
            ("Mac mini M2 Pro 512GB", DeviceType::MacMini),
            ("Mac Studio M2 Ultra 1TB", DeviceType::MacStudio),
            ("Mac Pro 2019 8-Core Xeon W 3.5GHz 256GB SSD", DeviceType::MacPro),
        ];
        for (text, expected) in cases {
            assert!(MacDesktopExtractor.detects(text), "{text}");
            assert_eq!(MacDesktopExtractor.describe(text).device_type, Some(expected), "{text}");
        }
    }

    #[test]
    fn test_macbook_is_not_a_desktop() {
        assert!(!MacDesktopExtractor.detects("MacBook Pro 14 M3"));
    }

    #[test]
    fn test_xeon_cores_and_clock() {
        let features = MacDesktopExtractor.describe("Mac Pro 2019 8-Core Xeon W 3.5GHz 256GB SSD");
        let chip = features.cpu.unwrap();
        assert_eq!(chip.kind, ChipKind::IntelXeon);
        assert!(chip.clock_ghz.is_some_and(|c| (c - 3.5).abs() < 0.001));
        assert_eq!(features.cpu_cores, Some(8));
        assert_eq!(features.year, Some(2019));
        assert_eq!(features.storage_gb, Some(256));
    }

    #[test]
    fn test_studio_ultra() {
        let features = MacDesktopExtractor.describe("Mac Studio M2 Ultra 1TB");
        assert_eq!(features.cpu, Some(Chip::apple_m(2, ChipTier::Ultra)));
        assert_eq!(features.variant, None);
    }
}
