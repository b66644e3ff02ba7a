use crate::core::context::MappingContext;
use crate::core::features::ExtractedFeatures;
use crate::core::types::{DeviceFamily, DeviceType, Variant};
use crate::knowledge::{enrich_from_table, DeviceSpec, KnowledgeBase};

const fn s(generation: u16, variant: Variant, year: u16) -> DeviceSpec {
    DeviceSpec::new(DeviceType::GalaxyS, year)
        .generation(generation)
        .variant(variant)
}

const fn fold(generation: u16, year: u16) -> DeviceSpec {
    DeviceSpec::new(DeviceType::GalaxyZFold, year)
        .generation(generation)
        .variant(Variant::Fold)
}

const fn flip(generation: u16, year: u16) -> DeviceSpec {
    DeviceSpec::new(DeviceType::GalaxyZFlip, year)
        .generation(generation)
        .variant(Variant::Flip)
}

const fn note(generation: u16, variant: Variant, year: u16) -> DeviceSpec {
    DeviceSpec::new(DeviceType::GalaxyNote, year)
        .generation(generation)
        .variant(variant)
}

const fn a(generation: u16, year: u16) -> DeviceSpec {
    DeviceSpec::new(DeviceType::GalaxyA, year)
        .generation(generation)
        .variant(Variant::Base)
}

/// Model code prefixes drop the region letter ("SM-S918B" -> "SM-S918")
pub static GALAXIES: &[DeviceSpec] = &[
    s(20, Variant::Base, 2020).ids(&["SM-G980", "SM-G981"]),
    s(20, Variant::Plus, 2020).ids(&["SM-G985", "SM-G986"]),
    s(20, Variant::Ultra, 2020).ids(&["SM-G988"]),
    s(20, Variant::Fe, 2020).ids(&["SM-G780", "SM-G781"]),
    s(21, Variant::Base, 2021).ids(&["SM-G991"]),
    s(21, Variant::Plus, 2021).ids(&["SM-G996"]),
    s(21, Variant::Ultra, 2021).ids(&["SM-G998"]),
    s(21, Variant::Fe, 2022).ids(&["SM-G990"]),
    s(22, Variant::Base, 2022).ids(&["SM-S901"]),
    s(22, Variant::Plus, 2022).ids(&["SM-S906"]),
    s(22, Variant::Ultra, 2022).ids(&["SM-S908"]),
    s(23, Variant::Base, 2023).ids(&["SM-S911"]),
    s(23, Variant::Plus, 2023).ids(&["SM-S916"]),
    s(23, Variant::Ultra, 2023).ids(&["SM-S918"]),
    s(23, Variant::Fe, 2023).ids(&["SM-S711"]),
    s(24, Variant::Base, 2024).ids(&["SM-S921"]),
    s(24, Variant::Plus, 2024).ids(&["SM-S926"]),
    s(24, Variant::Ultra, 2024).ids(&["SM-S928"]),
    s(24, Variant::Fe, 2024).ids(&["SM-S721"]),
    s(25, Variant::Base, 2025).ids(&["SM-S931"]),
    s(25, Variant::Plus, 2025).ids(&["SM-S936"]),
    s(25, Variant::Ultra, 2025).ids(&["SM-S938"]),
    note(10, Variant::Base, 2019).ids(&["SM-N970"]),
    note(10, Variant::Plus, 2019).ids(&["SM-N975", "SM-N976"]),
    note(20, Variant::Base, 2020).ids(&["SM-N980", "SM-N981"]),
    note(20, Variant::Ultra, 2020).ids(&["SM-N985", "SM-N986"]),
    fold(2, 2020).ids(&["SM-F916"]),
    fold(3, 2021).ids(&["SM-F926"]),
    fold(4, 2022).ids(&["SM-F936"]),
    fold(5, 2023).ids(&["SM-F946"]),
    fold(6, 2024).ids(&["SM-F956"]),
    flip(3, 2021).ids(&["SM-F711"]),
    flip(4, 2022).ids(&["SM-F721"]),
    flip(5, 2023).ids(&["SM-F731"]),
    flip(6, 2024).ids(&["SM-F741"]),
    a(34, 2023).ids(&["SM-A346"]),
    a(54, 2023).ids(&["SM-A546"]),
    a(55, 2024).ids(&["SM-A556"]),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct GalaxyKnowledge;

impl KnowledgeBase for GalaxyKnowledge {
    fn family(&self) -> DeviceFamily {
        DeviceFamily::Galaxy
    }

    fn enrich(&self, features: ExtractedFeatures, ctx: &mut MappingContext) -> ExtractedFeatures {
        enrich_from_table(GALAXIES, features, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::MappingInput;
    use crate::parsing::{FeatureExtractor, GalaxyExtractor};

    fn enrich(text: &str) -> ExtractedFeatures {
        let mut ctx = MappingContext::new(MappingInput::new(text).unwrap());
        GalaxyKnowledge.enrich(GalaxyExtractor.describe(text), &mut ctx)
    }

    #[test]
    fn test_model_code_names_the_device() {
        let features = enrich("Samsung SM-S918B 256GB");
        assert_eq!(features.device_type, Some(DeviceType::GalaxyS));
        assert_eq!(features.generation, Some(23));
        assert_eq!(features.variant, Some(Variant::Ultra));
        assert_eq!(features.year, Some(2023));
        assert!(features.is_inferred("generation"));
    }

    #[test]
    fn test_fe_released_a_year_later() {
        assert_eq!(enrich("Galaxy S21 FE 128GB").year, Some(2022));
        assert_eq!(enrich("Galaxy S21 128GB").year, Some(2021));
    }

    #[test]
    fn test_foldables() {
        assert_eq!(enrich("Galaxy Z Fold5 512GB").year, Some(2023));
        assert_eq!(enrich("Galaxy Z Flip 6 256GB").year, Some(2024));
    }

    #[test]
    fn test_unknown_generation_fills_nothing() {
        let features = enrich("Galaxy S9 64GB");
        assert_eq!(features.year, None);
    }
}
