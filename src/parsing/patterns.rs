//! Text patterns shared by every family extractor.
//!
//! All patterns are unanchored and case-insensitive so vendor prefixes,
//! suffixes and mixed case do not matter.

use regex::Regex;
use std::sync::LazyLock;

use crate::catalog::contains_term;
use crate::core::types::{Chip, ChipKind, ChipTier};

static RE_STORAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\b(ssd|hdd|flash|storage|almacenamiento|ram|memory|memoria)\s*:?\s*)?\b(\d{1,4}(?:[.,]\d{1,2})?)\s*(gb|tb)\b(?:\s*(?:de\s+)?(ssd|hdd|flash|storage|almacenamiento|ram|memory|memoria|unified\s+memory|unified))?",
    )
    .expect("Invalid regex")
});

static RE_SCREEN_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(\d{1,2}(?:[.,]\d{1,2})?)\s*-?\s*(?:inch(?:es)?\b|in\b|"|”|″|''|pulgadas\b|pulg\b|zoll\b|pouces\b)"#,
    )
    .expect("Invalid regex")
});

static RE_SCREEN_SPACED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(\d{1,2})\s(\d)\s*-?\s*(?:inch(?:es)?\b|"|”|″|pulgadas\b|pulg\b|zoll\b)"#)
        .expect("Invalid regex")
});

static RE_SCREEN_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:ipad\s+pro|ipad\s+air|ipad\s+mini|macbook\s+pro|macbook\s+air|macbook|imac)\s+(\d{1,2}(?:[.,]\d)?)\b",
    )
    .expect("Invalid regex")
});

static RE_APPLE_M: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bM([1-5])(?:\s*(Pro|Max|Ultra))?\b").expect("Invalid regex")
});

static RE_APPLE_A: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bA(\d{1,2})([XZ])?(?:\s*(Pro|Bionic))?\b").expect("Invalid regex")
});

static RE_INTEL_CORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:intel\s+)?(?:core\s+)?i([3579])(?:-\d{4,5}[a-z]{0,2})?\b")
        .expect("Invalid regex")
});

static RE_XEON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bxeon\b").expect("Invalid regex"));

static RE_CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d(?:[.,]\d{1,2})?)\s*ghz\b").expect("Invalid regex")
});

static RE_CORES_BEFORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s*-?\s*(?:cores?|c|núcleos|nucleos)\s*(cpu|gpu)\b")
        .expect("Invalid regex")
});

static RE_CORES_AFTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(cpu|gpu)\s*(?:de\s+)?(\d{1,2})\s*-?\s*(?:cores?|c|núcleos|nucleos)\b")
        .expect("Invalid regex")
});

static RE_CORES_XEON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s*-?\s*core\s+(?:intel\s+)?xeon\b").expect("Invalid regex")
});

static RE_CELLULAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:cellular|celular|lte|4g|5g)\b").expect("Invalid regex")
});

static RE_WIFI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bwi-?fi\b").expect("Invalid regex"));

static RE_APPLE_HW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(A\d{4})\b").expect("Invalid regex"));

static RE_SAMSUNG_HW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bSM-?\s?([A-Z]\d{3}[A-Z0-9]{0,4})\b").expect("Invalid regex")
});

static RE_DATE_NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(1[0-2]|0?[1-9])\s*/\s*((?:19|20)\d{2})\b").expect("Invalid regex")
});

static RE_DATE_MONTH_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(january|february|march|april|may|june|july|august|september|october|november|december|enero|febrero|marzo|abril|mayo|junio|julio|agosto|septiembre|octubre|noviembre|diciembre|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)\.?\s+(?:de\s+|del\s+)?((?:19|20)\d{2})\b",
    )
    .expect("Invalid regex")
});

static RE_DATE_SEASON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:early|mid|late|principios\s+de|mediados\s+de|finales\s+de)\s+((?:19|20)\d{2})\b",
    )
    .expect("Invalid regex")
});

static RE_BARE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(20[0-3]\d)\b").expect("Invalid regex"));

static RE_ORDINAL_GENERATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,2})\s*(?:st|nd|rd|th|ª|º|°|a|o)?\.?\s*(?:generation|generación|generacion|gen)\b",
    )
    .expect("Invalid regex")
});

static RE_ORDINAL_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth|eleventh)\s+(?:generation|gen)\b",
    )
    .expect("Invalid regex")
});

/// Marketing screen sizes (inches) a device description can carry
const PLAUSIBLE_SCREEN_SIZES: &[f32] = &[
    7.9, 8.3, 9.7, 10.2, 10.5, 10.9, 11.0, 12.0, 12.9, 13.0, 14.0, 15.0, 16.0, 17.0, 20.0, 21.5, 24.0,
    27.0,
];

/// Earliest and latest year accepted as a bare four-digit date
const MIN_YEAR: u16 = 2007;
const MAX_YEAR: u16 = 2039;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AmountKind {
    Storage,
    Memory,
    Unqualified,
}

fn qualifier_kind(qualifier: &str) -> AmountKind {
    match qualifier.to_lowercase().as_str() {
        "ram" | "memory" | "memoria" => AmountKind::Memory,
        q if q.starts_with("unified") => AmountKind::Memory,
        _ => AmountKind::Storage,
    }
}

fn parse_decimal(s: &str) -> Option<f64> {
    s.replace(',', ".").parse::<f64>().ok()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn amount_to_gb(amount: f64, unit: &str) -> Option<u32> {
    let gb = if unit.eq_ignore_ascii_case("tb") {
        amount * 1024.0
    } else {
        amount
    };
    (gb >= 1.0 && gb < f64::from(u32::MAX)).then(|| gb.round() as u32)
}

/// Storage size in GB.
///
/// Every GB/TB amount is collected. An amount qualified as SSD or storage
/// wins; amounts qualified as RAM or memory are skipped; otherwise the
/// largest amount is storage. TB is converted with a factor of 1024.
#[must_use]
pub fn parse_storage_gb(text: &str) -> Option<u32> {
    let mut largest: Option<u32> = None;
    for caps in RE_STORAGE.captures_iter(text) {
        let Some(gb) = caps
            .get(2)
            .and_then(|m| parse_decimal(m.as_str()))
            .zip(caps.get(3))
            .and_then(|(amount, unit)| amount_to_gb(amount, unit.as_str()))
        else {
            continue;
        };

        // A leading qualifier ("RAM 16GB") binds tighter than a trailing one
        let kind = caps
            .get(1)
            .or_else(|| caps.get(4))
            .map_or(AmountKind::Unqualified, |q| qualifier_kind(q.as_str()));

        match kind {
            AmountKind::Storage => return Some(gb),
            AmountKind::Memory => {}
            AmountKind::Unqualified => largest = Some(largest.map_or(gb, |l| l.max(gb))),
        }
    }
    largest
}

/// Capacity of a catalog label ("256 GB", "1 TB") in GB
#[must_use]
pub fn parse_capacity_label(label: &str) -> Option<u32> {
    RE_STORAGE.captures(label).and_then(|caps| {
        let amount = parse_decimal(caps.get(2)?.as_str())?;
        amount_to_gb(amount, caps.get(3)?.as_str())
    })
}

/// Fold panel sizes onto the marketing size used in catalog descriptions
fn canonical_screen_size(size: f32) -> f32 {
    const ALIASES: &[(f32, f32)] = &[
        (13.3, 13.0),
        (13.6, 13.0),
        (14.2, 14.0),
        (15.3, 15.0),
        (15.4, 15.0),
        (16.2, 16.0),
        (23.5, 24.0),
    ];
    ALIASES
        .iter()
        .find(|(alias, _)| (alias - size).abs() < 0.05)
        .map_or(size, |&(_, canonical)| canonical)
}

fn plausible_screen_size(size: f32) -> Option<f32> {
    let size = canonical_screen_size(size);
    PLAUSIBLE_SCREEN_SIZES
        .iter()
        .any(|known| (known - size).abs() < 0.05)
        .then_some(size)
}

#[allow(clippy::cast_possible_truncation)]
fn parse_size(s: &str) -> Option<f32> {
    parse_decimal(s).map(|v| v as f32)
}

/// Screen size in inches.
///
/// Accepts "11-inch", `12.9"`, "11 pulgadas", comma decimals ("12,9"), a
/// space used as the decimal point ("12 9-inch", only when the result is a
/// known size) and a bare number right after the product line ("iPad Pro 11").
#[must_use]
pub fn parse_screen_size(text: &str) -> Option<f32> {
    if let Some(size) = RE_SCREEN_SPACED.captures(text).and_then(|caps| {
        let size = parse_size(&format!("{}.{}", caps.get(1)?.as_str(), caps.get(2)?.as_str()))?;
        plausible_screen_size(size)
    }) {
        return Some(size);
    }

    let with_unit = RE_SCREEN_UNIT
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).and_then(|m| parse_size(m.as_str())))
        .find_map(plausible_screen_size);
    if with_unit.is_some() {
        return with_unit;
    }

    RE_SCREEN_LABEL
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).and_then(|m| parse_size(m.as_str())))
        .find_map(plausible_screen_size)
}

fn parse_tier(s: Option<&str>) -> ChipTier {
    match s.map(str::to_lowercase).as_deref() {
        Some("pro") => ChipTier::Pro,
        Some("max") => ChipTier::Max,
        Some("ultra") => ChipTier::Ultra,
        _ => ChipTier::Base,
    }
}

/// Apple silicon (M1 .. M5 with Pro/Max/Ultra tiers)
#[must_use]
pub fn parse_apple_m_chip(text: &str) -> Option<Chip> {
    let caps = RE_APPLE_M.captures(text)?;
    let generation = caps.get(1)?.as_str().parse().ok()?;
    Some(Chip::apple_m(
        generation,
        parse_tier(caps.get(2).map(|m| m.as_str())),
    ))
}

/// Apple A-series SoC (A9 .. A18, X/Z suffixes, Pro tier)
#[must_use]
pub fn parse_apple_a_chip(text: &str) -> Option<Chip> {
    RE_APPLE_A.captures_iter(text).find_map(|caps| {
        let generation: u8 = caps.get(1)?.as_str().parse().ok()?;
        if !(4..=20).contains(&generation) {
            return None;
        }
        let suffix = caps
            .get(2)
            .and_then(|m| m.as_str().chars().next())
            .map(|c| c.to_ascii_uppercase());
        let tier = parse_tier(caps.get(3).map(|m| m.as_str()));
        Some(Chip {
            kind: ChipKind::AppleA,
            generation: Some(generation),
            tier,
            suffix,
            clock_ghz: None,
        })
    })
}

/// Clock speed in GHz ("2.6GHz", "3,2 GHz")
#[must_use]
pub fn parse_clock_ghz(text: &str) -> Option<f32> {
    RE_CLOCK
        .captures(text)
        .and_then(|caps| parse_size(caps.get(1)?.as_str()))
}

/// Intel Core iX or Xeon, with the clock when present
#[must_use]
pub fn parse_intel_chip(text: &str) -> Option<Chip> {
    let clock_ghz = parse_clock_ghz(text);
    if RE_XEON.is_match(text) {
        return Some(Chip {
            kind: ChipKind::IntelXeon,
            generation: None,
            tier: ChipTier::Base,
            suffix: None,
            clock_ghz,
        });
    }
    let caps = RE_INTEL_CORE.captures(text)?;
    let generation = caps.get(1)?.as_str().parse().ok()?;
    Some(Chip {
        kind: ChipKind::IntelCore,
        generation: Some(generation),
        tier: ChipTier::Base,
        suffix: None,
        clock_ghz,
    })
}

/// CPU and GPU core counts ("10-Core CPU", "GPU de 16 núcleos", "8-core Xeon")
#[must_use]
pub fn parse_core_counts(text: &str) -> (Option<u8>, Option<u8>) {
    let mut cpu = None;
    let mut gpu = None;
    let mut record = |kind: &str, count: &str| {
        let Ok(count) = count.parse::<u8>() else {
            return;
        };
        let slot = if kind.eq_ignore_ascii_case("gpu") {
            &mut gpu
        } else {
            &mut cpu
        };
        slot.get_or_insert(count);
    };

    // "16-Core CPU 40-Core GPU" and "CPU 8 cores GPU 10 cores" overlap when
    // read with the other pattern; whichever form starts first wins.
    let before_at = RE_CORES_BEFORE.find(text).map(|m| m.start());
    let after_at = RE_CORES_AFTER.find(text).map(|m| m.start());
    let count_first = match (before_at, after_at) {
        (Some(b), Some(a)) => b <= a,
        (b, _) => b.is_some(),
    };

    if count_first {
        for caps in RE_CORES_BEFORE.captures_iter(text) {
            if let (Some(count), Some(kind)) = (caps.get(1), caps.get(2)) {
                record(kind.as_str(), count.as_str());
            }
        }
    } else {
        for caps in RE_CORES_AFTER.captures_iter(text) {
            if let (Some(kind), Some(count)) = (caps.get(1), caps.get(2)) {
                record(kind.as_str(), count.as_str());
            }
        }
    }
    if let Some(count) = RE_CORES_XEON.captures(text).and_then(|caps| caps.get(1)) {
        record("cpu", count.as_str());
    }
    (cpu, gpu)
}

/// `Some(true)` for cellular, `Some(false)` for explicit Wi-Fi only,
/// `None` when the text says nothing about connectivity
#[must_use]
pub fn parse_connectivity(text: &str) -> Option<bool> {
    if RE_CELLULAR.is_match(text) {
        Some(true)
    } else if RE_WIFI.is_match(text) {
        Some(false)
    } else {
        None
    }
}

/// Apple model number ("A2991")
#[must_use]
pub fn parse_apple_hardware_id(text: &str) -> Option<String> {
    RE_APPLE_HW
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_uppercase())
}

/// Samsung model code, normalized to "SM-S918B"
#[must_use]
pub fn parse_samsung_hardware_id(text: &str) -> Option<String> {
    RE_SAMSUNG_HW
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| format!("SM-{}", m.as_str().to_uppercase()))
}

fn month_number(name: &str) -> Option<u8> {
    let name = name.to_lowercase();
    let month = match name.get(..3)? {
        "jan" | "ene" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" | "abr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" | "ago" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" | "dic" => 12,
        _ => return None,
    };
    Some(month)
}

fn valid_year(s: &str) -> Option<u16> {
    s.parse::<u16>()
        .ok()
        .filter(|y| (MIN_YEAR..=MAX_YEAR).contains(y))
}

/// Release date written in the text: "10/2023", "Oct 2023", "Late 2019",
/// "(2021)" or a bare year
#[must_use]
pub fn parse_explicit_date(text: &str) -> (Option<u16>, Option<u8>) {
    if let Some(caps) = RE_DATE_NUMERIC.captures(text) {
        let month = caps.get(1).and_then(|m| m.as_str().parse().ok());
        if let Some(year) = caps.get(2).and_then(|m| valid_year(m.as_str())) {
            return (Some(year), month);
        }
    }
    if let Some(caps) = RE_DATE_MONTH_NAME.captures(text) {
        let month = caps.get(1).and_then(|m| month_number(m.as_str()));
        if let Some(year) = caps.get(2).and_then(|m| valid_year(m.as_str())) {
            return (Some(year), month);
        }
    }
    if let Some(year) = RE_DATE_SEASON
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| valid_year(m.as_str()))
    {
        return (Some(year), None);
    }
    let year = RE_BARE_YEAR
        .captures_iter(text)
        .find_map(|caps| caps.get(1).and_then(|m| valid_year(m.as_str())));
    (year, None)
}

/// Ordinal generation ("6th generation", "10ª generación", "third gen")
#[must_use]
pub fn parse_ordinal_generation(text: &str) -> Option<u16> {
    if let Some(generation) = RE_ORDINAL_GENERATION
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
    {
        return Some(generation);
    }
    let word = RE_ORDINAL_WORD.captures(text)?.get(1)?.as_str().to_lowercase();
    let generation = match word.as_str() {
        "first" => 1,
        "second" => 2,
        "third" => 3,
        "fourth" => 4,
        "fifth" => 5,
        "sixth" => 6,
        "seventh" => 7,
        "eighth" => 8,
        "ninth" => 9,
        "tenth" => 10,
        _ => 11,
    };
    Some(generation)
}

/// Whole-word, case-insensitive containment
#[must_use]
pub fn has_word(text: &str, word: &str) -> bool {
    contains_term(text, word)
}
