use crate::core::context::MappingContext;
use crate::core::features::ExtractedFeatures;
use crate::core::types::{Chip, DeviceFamily, DeviceType, Variant};
use crate::knowledge::chips::{
    M1, M1_MAX, M1_ULTRA, M2, M2_MAX, M2_PRO, M2_ULTRA, M3, M3_ULTRA, M4, M4_MAX, M4_PRO,
};
use crate::knowledge::{enrich_from_table, DeviceSpec, KnowledgeBase};

const I5_3_1: Chip = Chip::intel_core(5, 3.1);
const I5_3_3: Chip = Chip::intel_core(5, 3.3);
const I7_3_8: Chip = Chip::intel_core(7, 3.8);
const I9_3_6: Chip = Chip::intel_core(9, 3.6);
const I3_3_6: Chip = Chip::intel_core(3, 3.6);
const I5_3_0: Chip = Chip::intel_core(5, 3.0);
const XEON_3_2: Chip = Chip::xeon(3.2);
const XEON_3_5: Chip = Chip::xeon(3.5);
const XEON_3_7: Chip = Chip::xeon(3.7);

const fn imac(year: u16) -> DeviceSpec {
    DeviceSpec::new(DeviceType::IMac, year)
}

const fn mini(year: u16) -> DeviceSpec {
    DeviceSpec::new(DeviceType::MacMini, year)
}

const fn studio(year: u16) -> DeviceSpec {
    DeviceSpec::new(DeviceType::MacStudio, year)
}

const fn mac_pro(year: u16) -> DeviceSpec {
    DeviceSpec::new(DeviceType::MacPro, year)
}

pub static MAC_DESKTOPS: &[DeviceSpec] = &[
    imac(2021).chips(&[M1]).sizes(&[24.0]).ids(&["A2438", "A2439"]),
    imac(2023).chips(&[M3]).sizes(&[24.0]).ids(&["A2873", "A2874"]),
    imac(2024).chips(&[M4]).sizes(&[24.0]),
    imac(2020).chips(&[I5_3_1, I5_3_3, I7_3_8]).sizes(&[27.0]).ids(&["A2115"]),
    imac(2019).chips(&[I9_3_6, I5_3_1]).sizes(&[27.0]).ids(&["A2115"]),
    imac(2019).chips(&[I3_3_6, I5_3_0]).sizes(&[21.5]).ids(&["A2116"]),
    DeviceSpec::new(DeviceType::IMacPro, 2017)
        .variant(Variant::Pro)
        .chips(&[XEON_3_2])
        .sizes(&[27.0])
        .ids(&["A1862"]),
    mini(2020).chips(&[M1]).ids(&["A2348"]),
    mini(2023).chips(&[M2, M2_PRO]).ids(&["A2686", "A2816"]),
    mini(2024).chips(&[M4, M4_PRO]),
    studio(2022).chips(&[M1_MAX, M1_ULTRA]).ids(&["A2615"]),
    studio(2023).chips(&[M2_MAX, M2_ULTRA]).ids(&["A2901"]),
    studio(2025).chips(&[M4_MAX, M3_ULTRA]),
    mac_pro(2013).chips(&[XEON_3_7]).ids(&["A1481"]),
    mac_pro(2019).chips(&[XEON_3_5]).ids(&["A1991"]),
    mac_pro(2023).chips(&[M2_ULTRA]).ids(&["A2786"]),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct MacDesktopKnowledge;

impl KnowledgeBase for MacDesktopKnowledge {
    fn family(&self) -> DeviceFamily {
        DeviceFamily::MacDesktop
    }

    fn enrich(&self, features: ExtractedFeatures, ctx: &mut MappingContext) -> ExtractedFeatures {
        enrich_from_table(MAC_DESKTOPS, features, ctx)
    }
}
