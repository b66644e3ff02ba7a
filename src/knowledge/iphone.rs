use crate::core::context::MappingContext;
use crate::core::features::ExtractedFeatures;
use crate::core::types::{DeviceFamily, DeviceType, Variant};
use crate::knowledge::chips::{A11, A12, A13, A14, A15, A16, A17_PRO, A18, A18_PRO, A9};
use crate::knowledge::{enrich_from_table, DeviceSpec, KnowledgeBase};

const fn iphone(generation: u16, variant: Variant, year: u16) -> DeviceSpec {
    DeviceSpec::new(DeviceType::IPhone, year)
        .generation(generation)
        .variant(variant)
}

pub static IPHONES: &[DeviceSpec] = &[
    iphone(8, Variant::Base, 2017).chips(&[A11]),
    iphone(8, Variant::Plus, 2017).chips(&[A11]),
    iphone(10, Variant::Base, 2017).chips(&[A11]).marker("x"),
    iphone(10, Variant::Base, 2018).chips(&[A12]).marker("xs"),
    iphone(10, Variant::Max, 2018).chips(&[A12]).marker("xs"),
    iphone(10, Variant::Base, 2018).chips(&[A12]).marker("xr"),
    iphone(11, Variant::Base, 2019).chips(&[A13]),
    iphone(11, Variant::Pro, 2019).chips(&[A13]),
    iphone(11, Variant::ProMax, 2019).chips(&[A13]),
    iphone(12, Variant::Base, 2020).chips(&[A14]),
    iphone(12, Variant::Mini, 2020).chips(&[A14]),
    iphone(12, Variant::Pro, 2020).chips(&[A14]),
    iphone(12, Variant::ProMax, 2020).chips(&[A14]),
    iphone(13, Variant::Base, 2021).chips(&[A15]),
    iphone(13, Variant::Mini, 2021).chips(&[A15]),
    iphone(13, Variant::Pro, 2021).chips(&[A15]),
    iphone(13, Variant::ProMax, 2021).chips(&[A15]),
    iphone(14, Variant::Base, 2022).chips(&[A15]),
    iphone(14, Variant::Plus, 2022).chips(&[A15]),
    iphone(14, Variant::Pro, 2022).chips(&[A16]),
    iphone(14, Variant::ProMax, 2022).chips(&[A16]),
    iphone(15, Variant::Base, 2023).chips(&[A16]),
    iphone(15, Variant::Plus, 2023).chips(&[A16]),
    iphone(15, Variant::Pro, 2023).chips(&[A17_PRO]),
    iphone(15, Variant::ProMax, 2023).chips(&[A17_PRO]),
    iphone(16, Variant::Base, 2024).chips(&[A18]),
    iphone(16, Variant::Plus, 2024).chips(&[A18]),
    iphone(16, Variant::Pro, 2024).chips(&[A18_PRO]),
    iphone(16, Variant::ProMax, 2024).chips(&[A18_PRO]),
    iphone(1, Variant::Se, 2016).chips(&[A9]),
    iphone(2, Variant::Se, 2020).chips(&[A13]),
    iphone(3, Variant::Se, 2022).chips(&[A15]),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct IPhoneKnowledge;

impl KnowledgeBase for IPhoneKnowledge {
    fn family(&self) -> DeviceFamily {
        DeviceFamily::IPhone
    }

    fn enrich(&self, features: ExtractedFeatures, ctx: &mut MappingContext) -> ExtractedFeatures {
        enrich_from_table(IPHONES, features, ctx)
    }
}
