use serde::{Deserialize, Serialize};

/// Identifier of a model row in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(pub u64);

impl ModelId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a capacity row (a storage variant of a model)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapacityId(pub u64);

impl CapacityId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CapacityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Top-level product line. Selects the extractor / knowledge base / engine triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeviceFamily {
    #[serde(rename = "iphone")]
    IPhone,
    #[serde(rename = "ipad")]
    IPad,
    #[serde(rename = "macbook")]
    MacBook,
    #[serde(rename = "mac_desktop")]
    MacDesktop,
    #[serde(rename = "galaxy")]
    Galaxy,
}

impl DeviceFamily {
    pub const ALL: [DeviceFamily; 5] = [
        DeviceFamily::IPad,
        DeviceFamily::IPhone,
        DeviceFamily::MacBook,
        DeviceFamily::MacDesktop,
        DeviceFamily::Galaxy,
    ];

    /// Parse a family from its machine name ("iphone", "mac_desktop", ...)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "iphone" => Some(Self::IPhone),
            "ipad" => Some(Self::IPad),
            "macbook" => Some(Self::MacBook),
            "mac_desktop" | "mac" | "desktop" => Some(Self::MacDesktop),
            "galaxy" | "samsung" => Some(Self::Galaxy),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IPhone => "iphone",
            Self::IPad => "ipad",
            Self::MacBook => "macbook",
            Self::MacDesktop => "mac_desktop",
            Self::Galaxy => "galaxy",
        }
    }

    /// Brand that owns this product line
    #[must_use]
    pub fn brand(&self) -> &'static str {
        match self {
            Self::Galaxy => "Samsung",
            _ => "Apple",
        }
    }
}

impl std::fmt::Display for DeviceFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IPhone => write!(f, "iPhone"),
            Self::IPad => write!(f, "iPad"),
            Self::MacBook => write!(f, "MacBook"),
            Self::MacDesktop => write!(f, "Mac desktop"),
            Self::Galaxy => write!(f, "Galaxy"),
        }
    }
}

/// Concrete product line inside a family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    #[serde(rename = "iphone")]
    IPhone,
    #[serde(rename = "ipad")]
    IPad,
    #[serde(rename = "ipad_air")]
    IPadAir,
    #[serde(rename = "ipad_pro")]
    IPadPro,
    #[serde(rename = "ipad_mini")]
    IPadMini,
    MacBook,
    MacBookAir,
    MacBookPro,
    #[serde(rename = "imac")]
    IMac,
    #[serde(rename = "imac_pro")]
    IMacPro,
    MacMini,
    MacStudio,
    MacPro,
    GalaxyS,
    GalaxyNote,
    GalaxyZFold,
    GalaxyZFlip,
    GalaxyA,
}

impl DeviceType {
    /// Marketing label, also used as a catalog search term
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::IPhone => "iPhone",
            Self::IPad => "iPad",
            Self::IPadAir => "iPad Air",
            Self::IPadPro => "iPad Pro",
            Self::IPadMini => "iPad mini",
            Self::MacBook => "MacBook",
            Self::MacBookAir => "MacBook Air",
            Self::MacBookPro => "MacBook Pro",
            Self::IMac => "iMac",
            Self::IMacPro => "iMac Pro",
            Self::MacMini => "Mac mini",
            Self::MacStudio => "Mac Studio",
            Self::MacPro => "Mac Pro",
            Self::GalaxyS => "Galaxy S",
            Self::GalaxyNote => "Galaxy Note",
            Self::GalaxyZFold => "Galaxy Z Fold",
            Self::GalaxyZFlip => "Galaxy Z Flip",
            Self::GalaxyA => "Galaxy A",
        }
    }

    #[must_use]
    pub fn family(&self) -> DeviceFamily {
        match self {
            Self::IPhone => DeviceFamily::IPhone,
            Self::IPad | Self::IPadAir | Self::IPadPro | Self::IPadMini => DeviceFamily::IPad,
            Self::MacBook | Self::MacBookAir | Self::MacBookPro => DeviceFamily::MacBook,
            Self::IMac | Self::IMacPro | Self::MacMini | Self::MacStudio | Self::MacPro => {
                DeviceFamily::MacDesktop
            }
            Self::GalaxyS
            | Self::GalaxyNote
            | Self::GalaxyZFold
            | Self::GalaxyZFlip
            | Self::GalaxyA => DeviceFamily::Galaxy,
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Named sub-model within a generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Regular model, no named variant
    Base,
    Pro,
    ProMax,
    Plus,
    Mini,
    Air,
    Max,
    Ultra,
    Se,
    Fe,
    Fold,
    Flip,
}

impl Variant {
    /// True for any variant other than the regular model
    #[must_use]
    pub fn is_named(&self) -> bool {
        !matches!(self, Self::Base)
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Base => "base",
            Self::Pro => "Pro",
            Self::ProMax => "Pro Max",
            Self::Plus => "Plus",
            Self::Mini => "mini",
            Self::Air => "Air",
            Self::Max => "Max",
            Self::Ultra => "Ultra",
            Self::Se => "SE",
            Self::Fe => "FE",
            Self::Fold => "Fold",
            Self::Flip => "Flip",
        };
        write!(f, "{label}")
    }
}

/// Processor line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChipKind {
    /// Apple silicon for Macs and iPads (M1, M2 Pro, ...)
    AppleM,
    /// Apple mobile SoC (A15 Bionic, A12X, ...)
    AppleA,
    /// Intel Core i3/i5/i7/i9
    IntelCore,
    /// Intel Xeon (W, E5)
    IntelXeon,
}

/// Chip tier within a generation; the "chip variant" axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChipTier {
    #[default]
    Base,
    Pro,
    Max,
    Ultra,
}

impl std::fmt::Display for ChipTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Base => Ok(()),
            Self::Pro => write!(f, " Pro"),
            Self::Max => write!(f, " Max"),
            Self::Ultra => write!(f, " Ultra"),
        }
    }
}

/// A processor identified in text or inferred from a knowledge base
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chip {
    pub kind: ChipKind,
    /// M2 -> 2, A15 -> 15, i7 -> 7; None for Xeon
    pub generation: Option<u8>,
    pub tier: ChipTier,
    /// Letter suffix of A-series iPad chips (A12X, A12Z)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock_ghz: Option<f32>,
}

impl Chip {
    #[must_use]
    pub const fn apple_m(generation: u8, tier: ChipTier) -> Self {
        Self {
            kind: ChipKind::AppleM,
            generation: Some(generation),
            tier,
            suffix: None,
            clock_ghz: None,
        }
    }

    #[must_use]
    pub const fn apple_a(generation: u8) -> Self {
        Self {
            kind: ChipKind::AppleA,
            generation: Some(generation),
            tier: ChipTier::Base,
            suffix: None,
            clock_ghz: None,
        }
    }

    #[must_use]
    pub const fn apple_a_suffixed(generation: u8, suffix: char) -> Self {
        Self {
            kind: ChipKind::AppleA,
            generation: Some(generation),
            tier: ChipTier::Base,
            suffix: Some(suffix),
            clock_ghz: None,
        }
    }

    #[must_use]
    pub const fn apple_a_pro(generation: u8) -> Self {
        Self {
            kind: ChipKind::AppleA,
            generation: Some(generation),
            tier: ChipTier::Pro,
            suffix: None,
            clock_ghz: None,
        }
    }

    #[must_use]
    pub const fn intel_core(generation: u8, clock_ghz: f32) -> Self {
        Self {
            kind: ChipKind::IntelCore,
            generation: Some(generation),
            tier: ChipTier::Base,
            suffix: None,
            clock_ghz: Some(clock_ghz),
        }
    }

    #[must_use]
    pub const fn xeon(clock_ghz: f32) -> Self {
        Self {
            kind: ChipKind::IntelXeon,
            generation: None,
            tier: ChipTier::Base,
            suffix: None,
            clock_ghz: Some(clock_ghz),
        }
    }

    /// Canonical display name ("M2 Pro", "A15", "Intel Core i7 2.6GHz")
    #[must_use]
    pub fn name(&self) -> String {
        let generation = self.generation.map(|g| g.to_string()).unwrap_or_default();
        let clock = self
            .clock_ghz
            .map(|c| format!(" {c}GHz"))
            .unwrap_or_default();
        match self.kind {
            ChipKind::AppleM => format!("M{generation}{}", self.tier),
            ChipKind::AppleA => {
                let suffix = self.suffix.map(String::from).unwrap_or_default();
                format!("A{generation}{suffix}{}", self.tier)
            }
            ChipKind::IntelCore => format!("Intel Core i{generation}{clock}"),
            ChipKind::IntelXeon => format!("Intel Xeon{clock}"),
        }
    }

    /// Two chips are consistent when no attribute known on both sides differs.
    #[must_use]
    pub fn is_consistent_with(&self, other: &Chip) -> bool {
        if self.kind != other.kind {
            return false;
        }
        if let (Some(a), Some(b)) = (self.generation, other.generation) {
            if a != b {
                return false;
            }
        }
        if let (Some(a), Some(b)) = (self.suffix, other.suffix) {
            if a != b {
                return false;
            }
        }
        if let (Some(a), Some(b)) = (self.clock_ghz, other.clock_ghz) {
            if (a - b).abs() > 0.05 {
                return false;
            }
        }
        self.tier == other.tier
    }
}

impl std::fmt::Display for Chip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Retrieval strategy that produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Unique hardware identifier (strongest key)
    Identifier,
    /// Device type + generation or named variant
    Name,
    /// Device type + generation (+ year) fallback
    Generation,
}

impl MatchStrategy {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Name => "name",
            Self::Generation => "generation",
        }
    }
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Machine status of a mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Success,
    NoMatch,
    Error,
    /// Tied top candidates the tie-break could not order
    Ambiguous,
}

impl MatchStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::NoMatch => "no_match",
            Self::Error => "error",
            Self::Ambiguous => "ambiguous",
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Confidence level for a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 0.90 {
            Self::High
        } else if score >= 0.75 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_parse() {
        assert_eq!(DeviceFamily::parse("iPhone"), Some(DeviceFamily::IPhone));
        assert_eq!(DeviceFamily::parse("mac-desktop"), Some(DeviceFamily::MacDesktop));
        assert_eq!(DeviceFamily::parse("Samsung"), Some(DeviceFamily::Galaxy));
        assert_eq!(DeviceFamily::parse("pixel"), None);
    }

    #[test]
    fn test_chip_names() {
        assert_eq!(Chip::apple_m(2, ChipTier::Pro).name(), "M2 Pro");
        assert_eq!(Chip::apple_a(15).name(), "A15");
        assert_eq!(Chip::apple_a_suffixed(12, 'Z').name(), "A12Z");
        assert_eq!(Chip::apple_a_pro(17).name(), "A17 Pro");
        assert_eq!(Chip::intel_core(7, 2.6).name(), "Intel Core i7 2.6GHz");
        assert_eq!(Chip::xeon(3.2).name(), "Intel Xeon 3.2GHz");
    }

    #[test]
    fn test_chip_consistency() {
        let m2 = Chip::apple_m(2, ChipTier::Base);
        assert!(m2.is_consistent_with(&Chip::apple_m(2, ChipTier::Base)));
        assert!(!m2.is_consistent_with(&Chip::apple_m(2, ChipTier::Pro)));
        assert!(!m2.is_consistent_with(&Chip::apple_m(3, ChipTier::Base)));
        assert!(!m2.is_consistent_with(&Chip::apple_a(15)));

        // Clock only compared when both sides know it
        let i7 = Chip::intel_core(7, 2.6);
        let mut i7_no_clock = i7;
        i7_no_clock.clock_ghz = None;
        assert!(i7.is_consistent_with(&i7_no_clock));
        assert!(!i7.is_consistent_with(&Chip::intel_core(7, 2.2)));
    }

    #[test]
    fn test_confidence_from_score() {
        assert_eq!(Confidence::from_score(0.95), Confidence::High);
        assert_eq!(Confidence::from_score(0.80), Confidence::Medium);
        assert_eq!(Confidence::from_score(0.70), Confidence::Low);
    }
}
