use crate::core::context::MappingContext;
use crate::core::features::ExtractedFeatures;
use crate::core::types::{Chip, DeviceFamily, DeviceType};
use crate::knowledge::chips::{M1, M1_MAX, M1_PRO, M2, M2_MAX, M2_PRO, M3, M3_MAX, M3_PRO, M4, M4_MAX, M4_PRO};
use crate::knowledge::{enrich_from_table, DeviceSpec, KnowledgeBase};

const I3_1_1: Chip = Chip::intel_core(3, 1.1);
const I5_1_1: Chip = Chip::intel_core(5, 1.1);
const I5_1_4: Chip = Chip::intel_core(5, 1.4);
const I5_1_6: Chip = Chip::intel_core(5, 1.6);
const I5_2_0: Chip = Chip::intel_core(5, 2.0);
const I7_1_2: Chip = Chip::intel_core(7, 1.2);
const I7_2_2: Chip = Chip::intel_core(7, 2.2);
const I7_2_3: Chip = Chip::intel_core(7, 2.3);
const I7_2_6: Chip = Chip::intel_core(7, 2.6);
const I9_2_3: Chip = Chip::intel_core(9, 2.3);
const I9_2_4: Chip = Chip::intel_core(9, 2.4);
const I9_2_9: Chip = Chip::intel_core(9, 2.9);

const fn air(year: u16) -> DeviceSpec {
    DeviceSpec::new(DeviceType::MacBookAir, year)
}

const fn pro(year: u16) -> DeviceSpec {
    DeviceSpec::new(DeviceType::MacBookPro, year)
}

pub static MACBOOKS: &[DeviceSpec] = &[
    air(2020).chips(&[M1]).sizes(&[13.0]).ids(&["A2337"]),
    air(2022).chips(&[M2]).sizes(&[13.0]).ids(&["A2681"]),
    air(2023).chips(&[M2]).sizes(&[15.0]).ids(&["A2941"]),
    air(2024).chips(&[M3]).sizes(&[13.0, 15.0]).ids(&["A3113", "A3114"]),
    air(2025).chips(&[M4]).sizes(&[13.0, 15.0]),
    pro(2020).chips(&[M1]).sizes(&[13.0]).ids(&["A2338"]),
    pro(2021).chips(&[M1_PRO, M1_MAX]).sizes(&[14.0]).ids(&["A2442"]),
    pro(2021).chips(&[M1_PRO, M1_MAX]).sizes(&[16.0]).ids(&["A2485"]),
    pro(2022).chips(&[M2]).sizes(&[13.0]).ids(&["A2338"]),
    pro(2023).chips(&[M2_PRO, M2_MAX]).sizes(&[14.0]).ids(&["A2779"]),
    pro(2023).chips(&[M2_PRO, M2_MAX]).sizes(&[16.0]).ids(&["A2780"]),
    pro(2023).chips(&[M3]).sizes(&[14.0]).ids(&["A2918"]),
    pro(2023).chips(&[M3_PRO, M3_MAX]).sizes(&[14.0]).ids(&["A2992"]),
    pro(2023).chips(&[M3_PRO, M3_MAX]).sizes(&[16.0]).ids(&["A2991"]),
    pro(2024).chips(&[M4, M4_PRO, M4_MAX]).sizes(&[14.0]),
    pro(2024).chips(&[M4_PRO, M4_MAX]).sizes(&[16.0]),
    pro(2019).chips(&[I7_2_6, I9_2_3, I9_2_4]).sizes(&[16.0]).ids(&["A2141"]),
    pro(2018).chips(&[I7_2_2, I7_2_6, I9_2_9]).sizes(&[15.0]).ids(&["A1990"]),
    pro(2019).chips(&[I7_2_6, I9_2_3, I9_2_4]).sizes(&[15.0]).ids(&["A1990"]),
    pro(2020).chips(&[I5_1_4, I5_2_0, I7_2_3]).sizes(&[13.0]).ids(&["A2289", "A2251"]),
    air(2020).chips(&[I3_1_1, I5_1_1, I7_1_2]).sizes(&[13.0]).ids(&["A2179"]),
    air(2019).chips(&[I5_1_6]).sizes(&[13.0]).ids(&["A1932"]),
    DeviceSpec::new(DeviceType::MacBook, 2017).sizes(&[12.0]).ids(&["A1534"]),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct MacBookKnowledge;

impl KnowledgeBase for MacBookKnowledge {
    fn family(&self) -> DeviceFamily {
        DeviceFamily::MacBook
    }

    fn enrich(&self, features: ExtractedFeatures, ctx: &mut MappingContext) -> ExtractedFeatures {
        enrich_from_table(MACBOOKS, features, ctx)
    }
}
