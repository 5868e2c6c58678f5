//! Narrative atoms: normalised lines with an inferred organ, side and kind.
//!
//! Classification is a pure function of the section title, the line text and an optional
//! source key. Each classifier is an ordered rule list evaluated top to bottom, so the first
//! (most specific) rule wins.

use crate::components::section::TitledSection;
use crate::constants::PRIORITY_SECTION_STRIDE;
use crate::text::normalize_line;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Anatomical grouping. Declaration order is the canonical body order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Organ {
    Liver,
    GallbladderCbd,
    Pancreas,
    Spleen,
    Kidneys,
    Bladder,
    Uterus,
    Ovaries,
    Prostate,
    Peritoneum,
    Misc,
}

impl Organ {
    /// Every organ in canonical body order.
    pub const CANONICAL: [Organ; 11] = [
        Organ::Liver,
        Organ::GallbladderCbd,
        Organ::Pancreas,
        Organ::Spleen,
        Organ::Kidneys,
        Organ::Bladder,
        Organ::Uterus,
        Organ::Ovaries,
        Organ::Prostate,
        Organ::Peritoneum,
        Organ::Misc,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Organ::Liver => "liver",
            Organ::GallbladderCbd => "gallbladder_cbd",
            Organ::Pancreas => "pancreas",
            Organ::Spleen => "spleen",
            Organ::Kidneys => "kidneys",
            Organ::Bladder => "bladder",
            Organ::Uterus => "uterus",
            Organ::Ovaries => "ovaries",
            Organ::Prostate => "prostate",
            Organ::Peritoneum => "peritoneum",
            Organ::Misc => "misc",
        }
    }

    /// Heading used in the composed narrative.
    pub fn label(&self) -> &'static str {
        match self {
            Organ::Liver => "Liver",
            Organ::GallbladderCbd => "Gallbladder and CBD",
            Organ::Pancreas => "Pancreas",
            Organ::Spleen => "Spleen",
            Organ::Kidneys => "Kidneys",
            Organ::Bladder => "Urinary bladder",
            Organ::Uterus => "Uterus",
            Organ::Ovaries => "Ovaries",
            Organ::Prostate => "Prostate",
            Organ::Peritoneum => "Peritoneum",
            Organ::Misc => "Other findings",
        }
    }
}

/// Laterality of a statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "R")]
    Right,
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "B")]
    Bilateral,
    #[serde(rename = "N")]
    Unsided,
}

/// Polarity/shape of a statement, deciding where it lands in a paragraph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtomKind {
    Negative,
    Measurement,
    Status,
    Positive,
}

/// One normalised, classified line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeAtom {
    pub organ: Organ,
    pub side: Side,
    pub kind: AtomKind,
    /// Input position (`section * 100 + line`); lower is earlier.
    pub priority: u32,
    pub text: String,
}

impl NarrativeAtom {
    /// Normalise and classify one line. Returns `None` for blank lines.
    pub fn classify(
        section_title: &str,
        line: &str,
        source_key: Option<&str>,
        priority: u32,
    ) -> Option<Self> {
        let text = normalize_line(line);
        if text.is_empty() {
            return None;
        }

        Some(Self {
            organ: infer_organ(section_title, &text, source_key),
            side: infer_side(&text, source_key),
            kind: infer_kind(&text),
            priority,
            text,
        })
    }
}

/// Source key prefixes, checked as prefixes first and then as substrings.
const SOURCE_KEY_PREFIXES: &[(&str, Organ)] = &[
    ("liv_", Organ::Liver),
    ("hep_", Organ::Liver),
    ("gbl_", Organ::GallbladderCbd),
    ("cbd_", Organ::GallbladderCbd),
    ("panc_", Organ::Pancreas),
    ("spl_", Organ::Spleen),
    ("kid_r_", Organ::Kidneys),
    ("kid_l_", Organ::Kidneys),
    ("kid_", Organ::Kidneys),
    ("ren_", Organ::Kidneys),
    ("ubl_", Organ::Bladder),
    ("blad_", Organ::Bladder),
    ("uter_", Organ::Uterus),
    ("endo_", Organ::Uterus),
    ("ovy_", Organ::Ovaries),
    ("ovr_", Organ::Ovaries),
    ("pros_", Organ::Prostate),
    ("asc_", Organ::Peritoneum),
    ("aff_", Organ::Peritoneum),
];

/// Keyword table shared by title and line scans. Gallbladder precedes bladder so
/// "gallbladder" is never read as the urinary bladder.
const ORGAN_KEYWORDS: &[(&[&str], Organ)] = &[
    (
        &["gallbladder", "gall bladder", "biliary", "bile duct", "cbd"],
        Organ::GallbladderCbd,
    ),
    (&["liver", "hepatic"], Organ::Liver),
    (&["pancrea"], Organ::Pancreas),
    (&["spleen", "splenic"], Organ::Spleen),
    (&["kidney", "renal", "hydronephrosis"], Organ::Kidneys),
    (&["bladder"], Organ::Bladder),
    (&["uterus", "uterine", "endometri", "myometri"], Organ::Uterus),
    (&["ovary", "ovaries", "ovarian", "adnex"], Organ::Ovaries),
    (&["prostat"], Organ::Prostate),
    (&["ascites", "peritone", "free fluid"], Organ::Peritoneum),
];

pub(crate) static NEGATIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*no\s+").expect("valid regex"));

static MEASUREMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:measures?|measuring|diameter|length|size|bipolar)\b|\b\d+(?:\.\d+)?\s*(?:cm|mm)\b",
    )
    .expect("valid regex")
});

static STATUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:normal|unremarkable|not dilated|preserved|satisfactory)\b")
        .expect("valid regex")
});

/// Words, keeping hyphenated compounds whole so "right-sided" is not "right".
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+(?:-[A-Za-z]+)*").expect("valid regex"));

/// Infer the organ from the source key, then the section title, then the line text.
pub fn infer_organ(section_title: &str, text: &str, source_key: Option<&str>) -> Organ {
    if let Some(organ) = source_key.and_then(organ_from_source_key) {
        return organ;
    }
    if let Some(organ) = organ_from_keywords(section_title) {
        return organ;
    }
    organ_from_keywords(text).unwrap_or(Organ::Misc)
}

fn organ_from_source_key(key: &str) -> Option<Organ> {
    let key = key.to_ascii_lowercase();
    SOURCE_KEY_PREFIXES
        .iter()
        .find(|(prefix, _)| key.starts_with(prefix))
        .or_else(|| {
            SOURCE_KEY_PREFIXES
                .iter()
                .find(|(prefix, _)| key.contains(prefix))
        })
        .map(|(_, organ)| *organ)
}

fn organ_from_keywords(text: &str) -> Option<Organ> {
    let lower = text.to_lowercase();
    ORGAN_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, organ)| *organ)
}

/// Infer the statement kind: negative, then measurement, then status, else positive.
pub fn infer_kind(text: &str) -> AtomKind {
    if NEGATIVE_RE.is_match(text) {
        AtomKind::Negative
    } else if MEASUREMENT_RE.is_match(text) {
        AtomKind::Measurement
    } else if STATUS_RE.is_match(text) {
        AtomKind::Status
    } else {
        AtomKind::Positive
    }
}

/// Infer laterality from `_r_`/`_l_` source key markers, then whole words in the text.
pub fn infer_side(text: &str, source_key: Option<&str>) -> Side {
    if let Some(key) = source_key {
        let key = key.to_ascii_lowercase();
        if key.contains("_r_") || key.ends_with("_r") {
            return Side::Right;
        }
        if key.contains("_l_") || key.ends_with("_l") {
            return Side::Left;
        }
    }

    let mut right = false;
    let mut left = false;
    for word in WORD_RE.find_iter(text) {
        match word.as_str().to_ascii_lowercase().as_str() {
            "bilateral" | "bilaterally" | "both" => return Side::Bilateral,
            "right" => right = true,
            "left" => left = true,
            _ => {}
        }
    }

    match (right, left) {
        (true, true) => Side::Bilateral,
        (true, false) => Side::Right,
        (false, true) => Side::Left,
        (false, false) => Side::Unsided,
    }
}

/// Whether `word` occurs in `text` as a whole word (case-insensitive).
pub(crate) fn mentions_word(text: &str, word: &str) -> bool {
    WORD_RE
        .find_iter(text)
        .any(|w| w.as_str().eq_ignore_ascii_case(word))
}

/// Flatten titled sections into classified atoms, skipping blank lines.
///
/// Priority is `section_index * PRIORITY_SECTION_STRIDE + line_index`, which stays ordered as
/// long as no section holds more than `PRIORITY_SECTION_STRIDE` lines. Larger sections are
/// still flattened, with a warning.
pub fn sections_to_atoms(sections: &[TitledSection]) -> Vec<NarrativeAtom> {
    let mut atoms = Vec::new();
    for (section_index, section) in sections.iter().enumerate() {
        if section.lines.len() > PRIORITY_SECTION_STRIDE as usize {
            tracing::warn!(
                "section {:?} has {} lines, more than {}; priorities overlap the next section",
                section.title,
                section.lines.len(),
                PRIORITY_SECTION_STRIDE
            );
        }
        for (line_index, line) in section.lines.iter().enumerate() {
            let priority = section_index as u32 * PRIORITY_SECTION_STRIDE + line_index as u32;
            if let Some(atom) = NarrativeAtom::classify(
                &section.title,
                &line.text,
                line.source_key.as_deref(),
                priority,
            ) {
                atoms.push(atom);
            }
        }
    }
    atoms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::section::SectionLine;

    #[test]
    fn organ_from_source_key_wins() {
        assert_eq!(
            infer_organ("Liver", "Measures 10 cm", Some("kid_r_length")),
            Organ::Kidneys
        );
        assert_eq!(infer_organ("", "", Some("cbd_diam")), Organ::GallbladderCbd);
        assert_eq!(infer_organ("", "", Some("report_asc_volume")), Organ::Peritoneum);
    }

    #[test]
    fn organ_from_title_then_text() {
        assert_eq!(infer_organ("Left Kidney", "Normal", None), Organ::Kidneys);
        assert_eq!(infer_organ("Biliary tree", "Normal", None), Organ::GallbladderCbd);
        assert_eq!(infer_organ("Free fluid", "None seen", None), Organ::Peritoneum);
        assert_eq!(
            infer_organ("Findings", "Common bile duct is not dilated", None),
            Organ::GallbladderCbd
        );
        assert_eq!(infer_organ("Findings", "Urinary bladder is distended", None), Organ::Bladder);
        assert_eq!(infer_organ("Findings", "Bowel loops are collapsed", None), Organ::Misc);
    }

    #[test]
    fn kind_precedence() {
        assert_eq!(infer_kind("No hydronephrosis"), AtomKind::Negative);
        assert_eq!(infer_kind("  no free fluid"), AtomKind::Negative);
        assert_eq!(infer_kind("Right kidney measures 10.2 cm"), AtomKind::Measurement);
        assert_eq!(infer_kind("CBD 4mm"), AtomKind::Measurement);
        assert_eq!(infer_kind("Spleen is normal"), AtomKind::Status);
        assert_eq!(infer_kind("Common bile duct is not dilated"), AtomKind::Status);
        assert_eq!(infer_kind("Coarse echotexture"), AtomKind::Positive);
        assert_eq!(infer_kind("Nodular contour"), AtomKind::Positive);
    }

    #[test]
    fn side_from_key_and_words() {
        assert_eq!(infer_side("Measures 10 cm", Some("kid_r_len")), Side::Right);
        assert_eq!(infer_side("Measures 10 cm", Some("kid_l_len")), Side::Left);
        assert_eq!(infer_side("Right kidney measures 10.2 cm", None), Side::Right);
        assert_eq!(infer_side("LEFT ovary is normal", None), Side::Left);
        assert_eq!(infer_side("Both kidneys are normal", None), Side::Bilateral);
        assert_eq!(infer_side("Right and left ovaries seen", None), Side::Bilateral);
        assert_eq!(infer_side("Right-sided pleural effusion", None), Side::Unsided);
        assert_eq!(infer_side("Copyright notice", None), Side::Unsided);
    }

    #[test]
    fn sections_flatten_with_priorities() {
        let sections = vec![
            TitledSection::new("Liver", ["Liver is normal.", "   "]),
            TitledSection::new(
                "Kidneys",
                vec![
                    SectionLine::from("No hydronephrosis"),
                    SectionLine::keyed("Measures 10 cm", "kid_l_len"),
                ],
            ),
        ];
        let atoms = sections_to_atoms(&sections);
        assert_eq!(atoms.len(), 3);
        assert_eq!(atoms[0].text, "Liver is normal");
        assert_eq!(atoms[0].priority, 0);
        assert_eq!(atoms[1].priority, 100);
        assert_eq!(atoms[1].kind, AtomKind::Negative);
        assert_eq!(atoms[2].priority, 101);
        assert_eq!(atoms[2].side, Side::Left);
        assert_eq!(atoms[2].kind, AtomKind::Measurement);
    }

    #[test]
    fn oversized_section_is_still_flattened() {
        let long: Vec<String> = (0..120).map(|i| format!("Liver finding {i}")).collect();
        let sections = vec![
            TitledSection::new("Liver", long),
            TitledSection::new("Spleen", ["Spleen is normal"]),
        ];
        let atoms = sections_to_atoms(&sections);

        assert_eq!(atoms.len(), 121);
        assert_eq!(atoms[119].priority, 119);
        assert_eq!(atoms[120].priority, PRIORITY_SECTION_STRIDE);
        assert_eq!(atoms[120].organ, Organ::Spleen);
    }

    #[test]
    fn canonical_order_matches_ordering() {
        let mut sorted = Organ::CANONICAL;
        sorted.sort();
        assert_eq!(sorted, Organ::CANONICAL);
        assert_eq!(Organ::GallbladderCbd.key(), "gallbladder_cbd");
    }
}
