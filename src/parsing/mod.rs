//! Feature extractors: noisy vendor text to [`ExtractedFeatures`].
//!
//! One extractor per device family. Extraction is a pure function of the text
//! and static patterns; a signal that cannot be found is logged and left unset.
//! Only an undetectable device family is an error.
//!
//! The same extractor parses catalog descriptions (via
//! [`FeatureExtractor::describe`]), so vendor text and catalog rows are compared
//! on the same terms.
//!
//! ## Precedence
//!
//! | Order | Signal | Example |
//! |-------|--------|---------|
//! | 1 | Family-defining token | "iPad Pro", "Galaxy Z Fold" |
//! | 2 | Generation / model number | "13", "6th generation", "S23" |
//! | 3 | Screen size | `12.9"`, "11 pulgadas", "12 9-inch" |
//! | 4 | Chip | "M2 Pro", "A15", "Core i7 2.6GHz" |
//! | 5 | Core counts | "10-Core CPU" |
//! | 6 | Connectivity | "Wi-Fi + Cellular" (defaults to Wi-Fi only) |
//! | 7 | Storage | "256GB", "1TB SSD" |
//! | 8 | Hardware id | "A2991", "SM-S918B" |
//! | 9 | Explicit date | "10/2023", "Late 2019" |

pub mod galaxy;
pub mod ipad;
pub mod iphone;
pub mod mac;
pub mod macbook;
pub mod patterns;

use crate::core::context::MappingContext;
use crate::core::error::MappingError;
use crate::core::features::ExtractedFeatures;
use crate::core::input::MappingInput;
use crate::core::types::DeviceFamily;
use crate::utils::validation::normalize_hardware_id;

pub use galaxy::GalaxyExtractor;
pub use ipad::IPadExtractor;
pub use iphone::IPhoneExtractor;
pub use mac::MacDesktopExtractor;
pub use macbook::MacBookExtractor;

/// Text to features for one device family
pub trait FeatureExtractor: Send + Sync {
    fn family(&self) -> DeviceFamily;

    /// Cheap family detector over the record's searchable text
    fn detects(&self, text: &str) -> bool;

    /// Parse free text. Pure; used for vendor names and catalog descriptions.
    fn describe(&self, text: &str) -> ExtractedFeatures;

    /// Canonical hardware id found in `text`
    fn hardware_id(&self, text: &str) -> Option<String>;

    /// Extract features from one vendor record.
    ///
    /// Explicit input fields win over the name text: `hardware_code` over an
    /// id found in the name, `capacity` over a storage amount in the name.
    ///
    /// # Errors
    ///
    /// Returns `MappingError::UndetectedDeviceType` when the record does not
    /// belong to this family.
    fn extract(
        &self,
        input: &MappingInput,
        ctx: &mut MappingContext,
    ) -> Result<ExtractedFeatures, MappingError> {
        if !self.detects(&input.searchable_text()) {
            return Err(MappingError::UndetectedDeviceType(
                input.model_name().to_string(),
            ));
        }

        let mut features = self.describe(input.model_name());
        apply_input_fields(self, &mut features, input, ctx);
        log_missing_signals(&features, ctx);
        features.confidence = extraction_confidence(&features);

        ctx.debug(format!(
            "extracted {} features (confidence {:.2})",
            self.family(),
            features.confidence
        ));
        Ok(features)
    }
}

fn apply_input_fields<E: FeatureExtractor + ?Sized>(
    extractor: &E,
    features: &mut ExtractedFeatures,
    input: &MappingInput,
    ctx: &mut MappingContext,
) {
    if let Some(code) = input.hardware_code() {
        let id = extractor
            .hardware_id(code)
            .or_else(|| normalize_hardware_id(code));
        if id.is_some() && id != features.hardware_id {
            ctx.debug(format!("hardware code field overrides name: {code}"));
            features.hardware_id = id;
        }
    }

    if let Some(capacity) = input.capacity() {
        match patterns::parse_storage_gb(capacity) {
            Some(gb) => features.storage_gb = Some(gb),
            None => {
                ctx.warn(format!("unparsable capacity field '{capacity}'"));
                features.note(format!("capacity field ignored: {capacity}"));
            }
        }
    }

    if let Some(brand) = input.brand() {
        features.brand = Some(brand.to_string());
    }
}

fn log_missing_signals(features: &ExtractedFeatures, ctx: &mut MappingContext) {
    if features.device_type.is_none() {
        ctx.debug("no device type token found");
    }
    if features.storage_gb.is_none() {
        ctx.debug("no storage amount found");
    }
    if features.generation.is_none() && features.cpu.is_none() && features.hardware_id.is_none() {
        ctx.debug("no generation, chip or hardware id found");
    }
}

/// Share of the identifying signals the text carried
fn extraction_confidence(features: &ExtractedFeatures) -> f64 {
    let mut confidence = 0.4;
    if features.device_type.is_some() {
        confidence += 0.2;
    }
    if features.generation.is_some() || features.cpu.is_some() || features.hardware_id.is_some() {
        confidence += 0.2;
    }
    if features.storage_gb.is_some() {
        confidence += 0.1;
    }
    if features.year.is_some() || features.screen_size.is_some() || features.named_variant().is_some() {
        confidence += 0.1;
    }
    f64::min(confidence, 1.0)
}

/// Fields every family reads the same way: storage, date, Apple hardware id
pub(crate) fn describe_common(features: &mut ExtractedFeatures, text: &str) {
    features.storage_gb = patterns::parse_storage_gb(text);
    let (year, month) = patterns::parse_explicit_date(text);
    features.year = year;
    features.month = month;
}
