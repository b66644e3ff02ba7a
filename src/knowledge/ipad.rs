use crate::core::context::MappingContext;
use crate::core::features::ExtractedFeatures;
use crate::core::types::{DeviceFamily, DeviceType};
use crate::knowledge::chips::{
    A10, A10X, A12, A12X, A12Z, A13, A14, A15, A16, A17_PRO, A9, A9X, M1, M2, M3, M4, M5,
};
use crate::knowledge::{enrich_from_table, DeviceSpec, KnowledgeBase};

const fn ipad(device_type: DeviceType, generation: u16, year: u16) -> DeviceSpec {
    DeviceSpec::new(device_type, year).generation(generation)
}

/// The variant lives in the device type (Air, mini, Pro), so entries carry none.
/// iPad Pro generations are counted per screen size.
pub static IPADS: &[DeviceSpec] = &[
    ipad(DeviceType::IPad, 5, 2017).chips(&[A9]).sizes(&[9.7]),
    ipad(DeviceType::IPad, 6, 2018).chips(&[A10]).sizes(&[9.7]),
    ipad(DeviceType::IPad, 7, 2019).chips(&[A10]).sizes(&[10.2]),
    ipad(DeviceType::IPad, 8, 2020).chips(&[A12]).sizes(&[10.2]),
    ipad(DeviceType::IPad, 9, 2021).chips(&[A13]).sizes(&[10.2]),
    ipad(DeviceType::IPad, 10, 2022).chips(&[A14]).sizes(&[10.9]),
    ipad(DeviceType::IPad, 11, 2025).chips(&[A16]).sizes(&[11.0]),
    ipad(DeviceType::IPadAir, 3, 2019).chips(&[A12]).sizes(&[10.5]),
    ipad(DeviceType::IPadAir, 4, 2020).chips(&[A14]).sizes(&[10.9]),
    ipad(DeviceType::IPadAir, 5, 2022).chips(&[M1]).sizes(&[10.9]),
    ipad(DeviceType::IPadAir, 6, 2024).chips(&[M2]).sizes(&[11.0, 13.0]),
    ipad(DeviceType::IPadAir, 7, 2025).chips(&[M3]).sizes(&[11.0, 13.0]),
    ipad(DeviceType::IPadMini, 5, 2019).chips(&[A12]).sizes(&[7.9]),
    ipad(DeviceType::IPadMini, 6, 2021).chips(&[A15]).sizes(&[8.3]),
    ipad(DeviceType::IPadMini, 7, 2024).chips(&[A17_PRO]).sizes(&[8.3]),
    ipad(DeviceType::IPadPro, 1, 2015).chips(&[A9X]).sizes(&[12.9]),
    ipad(DeviceType::IPadPro, 2, 2017).chips(&[A10X]).sizes(&[12.9]),
    ipad(DeviceType::IPadPro, 3, 2018).chips(&[A12X]).sizes(&[12.9]),
    ipad(DeviceType::IPadPro, 4, 2020).chips(&[A12Z]).sizes(&[12.9]),
    ipad(DeviceType::IPadPro, 5, 2021).chips(&[M1]).sizes(&[12.9]),
    ipad(DeviceType::IPadPro, 6, 2022).chips(&[M2]).sizes(&[12.9]),
    ipad(DeviceType::IPadPro, 1, 2018).chips(&[A12X]).sizes(&[11.0]),
    ipad(DeviceType::IPadPro, 2, 2020).chips(&[A12Z]).sizes(&[11.0]),
    ipad(DeviceType::IPadPro, 3, 2021).chips(&[M1]).sizes(&[11.0]),
    ipad(DeviceType::IPadPro, 4, 2022).chips(&[M2]).sizes(&[11.0]),
    DeviceSpec::new(DeviceType::IPadPro, 2016).chips(&[A9X]).sizes(&[9.7]),
    DeviceSpec::new(DeviceType::IPadPro, 2017).chips(&[A10X]).sizes(&[10.5]),
    DeviceSpec::new(DeviceType::IPadPro, 2024).chips(&[M4]).sizes(&[11.0, 13.0]),
    DeviceSpec::new(DeviceType::IPadPro, 2025).chips(&[M5]).sizes(&[11.0, 13.0]),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct IPadKnowledge;

impl KnowledgeBase for IPadKnowledge {
    fn family(&self) -> DeviceFamily {
        DeviceFamily::IPad
    }

    fn enrich(&self, features: ExtractedFeatures, ctx: &mut MappingContext) -> ExtractedFeatures {
        enrich_from_table(IPADS, features, ctx)
    }
}
