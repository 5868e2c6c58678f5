//! Per-organ paragraph composition.
//!
//! Most organs use one generic sentence skeleton. Kidneys and the gallbladder/CBD have their
//! own rules because their statements are routinely split by side or by structure.

use super::atoms::{mentions_word, AtomKind, NarrativeAtom, Organ, Side, NEGATIVE_RE};
use crate::config::NarrativeConfig;
use crate::text::{capitalize_first, dedupe_key, join_and, join_or, lowercase_first};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Leading organ phrases stripped from fragments ("The liver ...", "Right kidney ...").
static ORGAN_PHRASE_RES: LazyLock<Vec<(Organ, Regex)>> = LazyLock::new(|| {
    [
        (Organ::Liver, r"liver"),
        (Organ::GallbladderCbd, r"gall\s*bladder"),
        (Organ::Pancreas, r"pancreas"),
        (Organ::Spleen, r"spleen"),
        (Organ::Kidneys, r"(?:(?:right|left|both)\s+)?kidneys?"),
        (Organ::Bladder, r"(?:urinary\s+)?bladder"),
        (Organ::Uterus, r"uterus"),
        (Organ::Ovaries, r"(?:(?:right|left|both)\s+)?ovar(?:y|ies)"),
        (Organ::Prostate, r"prostate(?:\s+gland)?"),
        (Organ::Peritoneum, r"peritoneum|peritoneal\s+cavity"),
    ]
    .into_iter()
    .map(|(organ, phrase)| {
        let re = Regex::new(&format!(r"(?i)^(?:the\s+)?(?:{phrase})\s+")).expect("valid regex");
        (organ, re)
    })
    .collect()
});

static SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*(cm|mm)\b").expect("valid regex"));

static CORTICOMEDULLARY_NOUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)corticomedullary\s+(differentiation|distinction|junction|ratio)")
        .expect("valid regex")
});

static CORTICOMEDULLARY_QUALIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:preserved|maintained|normal|well[- ]defined|reduced|poor|lost|increased)\b")
        .expect("valid regex")
});

static CBD_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bcbd\b").expect("valid regex"));

static CBD_PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:the\s+)?(?:common\s+bile\s+duct|cbd)\b[:\s]*").expect("valid regex")
});

static IS_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^is\s+").expect("valid regex"));

static VERB_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:is|measures|measure|shows)\b").expect("valid regex"));

/// Compose the paragraph for one organ from its atoms.
///
/// Atoms are deduplicated first; the result holds at most `max_sentences` sentences and is
/// empty when nothing can be said.
pub fn compose_organ_paragraph(
    organ: Organ,
    atoms: &[NarrativeAtom],
    config: &NarrativeConfig,
) -> String {
    let atoms = dedupe_atoms(atoms);
    let sentences = match organ {
        Organ::Kidneys => kidney_sentences(&atoms, config),
        Organ::GallbladderCbd => gallbladder_sentences(&atoms, config),
        _ => generic_sentences(organ, &atoms, config),
    };

    sentences
        .into_iter()
        .take(config.max_sentences())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sort by priority and keep the first atom of each case/whitespace-insensitive text.
pub fn dedupe_atoms(atoms: &[NarrativeAtom]) -> Vec<NarrativeAtom> {
    let mut sorted = atoms.to_vec();
    sorted.sort_by_key(|atom| atom.priority);

    let mut seen = HashSet::new();
    sorted.retain(|atom| seen.insert(dedupe_key(&atom.text)));
    sorted
}

/// Compress negative statements into an `or`-joined body without the leading "no".
///
/// Duplicates are dropped case-insensitively and at most `max_items` are kept. Returns `None`
/// when there is nothing to say.
pub fn compress_negatives<S: AsRef<str>>(texts: &[S], max_items: usize) -> Option<String> {
    let mut seen = HashSet::new();
    let mut items: Vec<String> = Vec::new();

    for text in texts {
        let body = NEGATIVE_RE.replace(text.as_ref(), "");
        let body = body.trim();
        if body.is_empty() || !seen.insert(dedupe_key(body)) {
            continue;
        }
        items.push(lowercase_first(body));
    }

    items.truncate(max_items);
    if items.is_empty() {
        None
    } else {
        Some(join_or(&items))
    }
}

/// Atoms split by kind, each keeping priority order.
struct Buckets<'a> {
    status: Vec<&'a NarrativeAtom>,
    positive: Vec<&'a NarrativeAtom>,
    measurement: Vec<&'a NarrativeAtom>,
    negative: Vec<&'a NarrativeAtom>,
}

impl<'a> Buckets<'a> {
    fn split(atoms: impl IntoIterator<Item = &'a NarrativeAtom>) -> Self {
        let mut buckets = Buckets {
            status: Vec::new(),
            positive: Vec::new(),
            measurement: Vec::new(),
            negative: Vec::new(),
        };
        for atom in atoms {
            match atom.kind {
                AtomKind::Status => buckets.status.push(atom),
                AtomKind::Positive => buckets.positive.push(atom),
                AtomKind::Measurement => buckets.measurement.push(atom),
                AtomKind::Negative => buckets.negative.push(atom),
            }
        }
        buckets
    }

    /// First status, then every positive, then every measurement.
    fn descriptive(&self) -> Vec<&'a NarrativeAtom> {
        self.status
            .iter()
            .take(1)
            .chain(&self.positive)
            .chain(&self.measurement)
            .copied()
            .collect()
    }

    fn negative_sentence(&self, config: &NarrativeConfig) -> Option<String> {
        let texts: Vec<&str> = self.negative.iter().map(|a| a.text.as_str()).collect();
        compress_negatives(&texts, config.max_negatives()).map(|body| format!("No {body}."))
    }
}

fn strip_organ_phrase(organ: Organ, text: &str) -> String {
    match ORGAN_PHRASE_RES.iter().find(|(o, _)| *o == organ) {
        Some((_, re)) => re.replace(text, "").into_owned(),
        None => text.to_string(),
    }
}

fn fragments(organ: Organ, atoms: &[&NarrativeAtom]) -> Vec<String> {
    atoms
        .iter()
        .map(|atom| lowercase_first(strip_organ_phrase(organ, &atom.text).trim()))
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

fn generic_sentences(
    organ: Organ,
    atoms: &[NarrativeAtom],
    config: &NarrativeConfig,
) -> Vec<String> {
    let buckets = Buckets::split(atoms);
    let fragments = fragments(organ, &buckets.descriptive());

    let mut sentences = Vec::new();
    if !fragments.is_empty() {
        let body = join_and(&fragments);
        sentences.push(match organ {
            Organ::Misc => format!("{}.", capitalize_first(&body)),
            _ => format!("The {} {body}.", organ.label().to_lowercase()),
        });
    }
    sentences.extend(buckets.negative_sentence(config));
    sentences
}

fn kidney_sentences(atoms: &[NarrativeAtom], config: &NarrativeConfig) -> Vec<String> {
    let buckets = Buckets::split(atoms);
    let sided_positive = buckets
        .positive
        .iter()
        .any(|atom| matches!(atom.side, Side::Right | Side::Left));

    let mut sentences = Vec::new();
    if sided_positive {
        for (side, word) in [(Side::Right, "right"), (Side::Left, "left")] {
            let side_atoms: Vec<&NarrativeAtom> = atoms
                .iter()
                .filter(|atom| atom.side == side && atom.kind != AtomKind::Negative)
                .collect();
            let fragments = fragments(Organ::Kidneys, &side_atoms);
            if !fragments.is_empty() {
                sentences.push(format!("The {word} kidney {}.", join_and(&fragments)));
            }
        }
    } else {
        let mut clause = match (
            side_measurement(atoms, Side::Right),
            side_measurement(atoms, Side::Left),
        ) {
            (Some(right), Some(left)) => {
                format!("Both kidneys measure {right} (right) and {left} (left)")
            }
            (Some(right), None) => format!("The right kidney measures {right}"),
            (None, Some(left)) => format!("The left kidney measures {left}"),
            (None, None) => "Both kidneys are assessed".to_string(),
        };

        if let Some(descriptor) = corticomedullary_descriptor(atoms) {
            clause = format!("{clause} with {descriptor}");
        }

        sentences.push(format!("{clause}."));
    }

    sentences.extend(buckets.negative_sentence(config));
    sentences
}

/// First size on `side` from a measurement atom that does not mention the other side.
fn side_measurement(atoms: &[NarrativeAtom], side: Side) -> Option<String> {
    let other = match side {
        Side::Right => "left",
        Side::Left => "right",
        Side::Bilateral | Side::Unsided => return None,
    };

    atoms
        .iter()
        .filter(|atom| atom.kind == AtomKind::Measurement && atom.side == side)
        .filter(|atom| !mentions_word(&atom.text, other))
        .find_map(|atom| {
            SIZE_RE
                .captures(&atom.text)
                .map(|caps| format!("{} {}", &caps[1], caps[2].to_lowercase()))
        })
}

fn mentions_corticomedullary(text: &str) -> bool {
    text.to_lowercase().contains("corticomedullary")
}

/// E.g. "Corticomedullary differentiation is preserved" -> "preserved corticomedullary differentiation".
fn corticomedullary_descriptor(atoms: &[NarrativeAtom]) -> Option<String> {
    let atom = atoms.iter().find(|atom| {
        matches!(atom.kind, AtomKind::Status | AtomKind::Positive)
            && mentions_corticomedullary(&atom.text)
    })?;

    let noun = CORTICOMEDULLARY_NOUN_RE
        .captures(&atom.text)
        .map(|caps| caps[1].to_lowercase())
        .unwrap_or_else(|| "differentiation".to_string());

    Some(match CORTICOMEDULLARY_QUALIFIER_RE.find(&atom.text) {
        Some(qualifier) => format!(
            "{} corticomedullary {noun}",
            qualifier.as_str().to_lowercase()
        ),
        None => format!("corticomedullary {noun}"),
    })
}

fn mentions_cbd(text: &str) -> bool {
    text.to_lowercase().contains("common bile duct") || CBD_WORD_RE.is_match(text)
}

fn gallbladder_sentences(atoms: &[NarrativeAtom], config: &NarrativeConfig) -> Vec<String> {
    let (cbd, gallbladder): (Vec<&NarrativeAtom>, Vec<&NarrativeAtom>) =
        atoms.iter().partition(|atom| mentions_cbd(&atom.text));

    let buckets = Buckets::split(gallbladder);
    let fragments = fragments(Organ::GallbladderCbd, &buckets.descriptive());
    let mut gb_clause = if fragments.is_empty() {
        "is unremarkable".to_string()
    } else {
        join_and(&fragments)
    };

    let negatives: Vec<&str> = buckets.negative.iter().map(|a| a.text.as_str()).collect();
    if let Some(body) = compress_negatives(&negatives, config.max_negatives()) {
        gb_clause = format!("{gb_clause} with no {body}");
    }

    if cbd.is_empty() {
        return vec![format!("The gallbladder {gb_clause}.")];
    }

    vec![format!(
        "The gallbladder {gb_clause}, and the CBD {}.",
        cbd_clause(&cbd)
    )]
}

/// Clause describing the CBD, preferring a "not dilated" statement.
fn cbd_clause(atoms: &[&NarrativeAtom]) -> String {
    let chosen = atoms
        .iter()
        .find(|atom| atom.text.to_lowercase().contains("not dilated"))
        .or_else(|| atoms.iter().find(|atom| atom.kind != AtomKind::Negative))
        .or_else(|| atoms.first());
    let Some(atom) = chosen else {
        return "is unremarkable".to_string();
    };

    if atom.kind == AtomKind::Negative {
        return format!("shows {}", lowercase_first(&atom.text));
    }

    let rest = CBD_PHRASE_RE.replace(&atom.text, "");
    let rest = IS_PREFIX_RE.replace(rest.trim(), "");
    let rest = rest.trim();

    if rest.is_empty() {
        "is unremarkable".to_string()
    } else if VERB_RE.is_match(rest) {
        lowercase_first(rest)
    } else {
        format!("is {}", lowercase_first(rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(organ: Organ, side: Side, kind: AtomKind, priority: u32, text: &str) -> NarrativeAtom {
        NarrativeAtom {
            organ,
            side,
            kind,
            priority,
            text: text.to_string(),
        }
    }

    fn compose(organ: Organ, atoms: &[NarrativeAtom]) -> String {
        compose_organ_paragraph(organ, atoms, &NarrativeConfig::default())
    }

    fn sentence_count(paragraph: &str) -> usize {
        paragraph.matches(". ").count() + usize::from(paragraph.ends_with('.'))
    }

    #[test]
    fn kidneys_measure_both_sides_and_compress_negatives() {
        let atoms = vec![
            atom(Organ::Kidneys, Side::Right, AtomKind::Measurement, 0, "Right kidney measures 10.2 cm"),
            atom(Organ::Kidneys, Side::Left, AtomKind::Measurement, 1, "Left kidney measures 10.0 cm"),
            atom(Organ::Kidneys, Side::Right, AtomKind::Negative, 2, "No hydronephrosis"),
            atom(Organ::Kidneys, Side::Left, AtomKind::Negative, 3, "No hydronephrosis"),
            atom(Organ::Kidneys, Side::Left, AtomKind::Negative, 4, "No renal calculi"),
        ];
        let paragraph = compose(Organ::Kidneys, &atoms);
        assert!(paragraph.contains("Both kidneys measure 10.2 cm (right) and 10.0 cm (left)"));
        assert!(paragraph.contains("No hydronephrosis or renal calculi."));
        assert_eq!(
            paragraph,
            "Both kidneys measure 10.2 cm (right) and 10.0 cm (left). No hydronephrosis or renal calculi."
        );
        assert_eq!(sentence_count(&paragraph), 2);
    }

    #[test]
    fn kidneys_single_side_and_corticomedullary() {
        let atoms = vec![
            atom(Organ::Kidneys, Side::Left, AtomKind::Measurement, 0, "Left kidney measures 98 mm"),
            atom(Organ::Kidneys, Side::Unsided, AtomKind::Status, 1, "Corticomedullary differentiation is preserved"),
        ];
        assert_eq!(
            compose(Organ::Kidneys, &atoms),
            "The left kidney measures 98 mm with preserved corticomedullary differentiation."
        );
    }

    #[test]
    fn kidneys_without_sizes_are_assessed() {
        let atoms = vec![atom(Organ::Kidneys, Side::Unsided, AtomKind::Negative, 0, "No hydronephrosis")];
        assert_eq!(
            compose(Organ::Kidneys, &atoms),
            "Both kidneys are assessed. No hydronephrosis."
        );
    }

    #[test]
    fn kidney_measurement_mentioning_other_side_is_skipped() {
        let atoms = vec![
            atom(Organ::Kidneys, Side::Right, AtomKind::Measurement, 0, "Right kidney measures 10 cm, larger than left"),
            atom(Organ::Kidneys, Side::Right, AtomKind::Measurement, 1, "Right kidney length 10.4 cm"),
        ];
        assert_eq!(
            compose(Organ::Kidneys, &atoms),
            "The right kidney measures 10.4 cm."
        );
    }

    #[test]
    fn unsided_positive_keeps_measurement_sentence_grammatical() {
        let atoms = vec![
            atom(Organ::Kidneys, Side::Unsided, AtomKind::Positive, 0, "Kidneys show increased cortical echogenicity"),
            atom(Organ::Kidneys, Side::Unsided, AtomKind::Negative, 1, "No hydronephrosis"),
        ];
        let paragraph = compose(Organ::Kidneys, &atoms);
        assert_eq!(paragraph, "Both kidneys are assessed. No hydronephrosis.");
        assert!(!paragraph.contains("; show"));
    }

    #[test]
    fn sided_positive_switches_to_per_side_sentences() {
        let atoms = vec![
            atom(Organ::Kidneys, Side::Right, AtomKind::Positive, 0, "Right kidney shows a simple cortical cyst"),
            atom(Organ::Kidneys, Side::Left, AtomKind::Status, 1, "Left kidney is normal"),
            atom(Organ::Kidneys, Side::Unsided, AtomKind::Negative, 2, "No hydronephrosis"),
        ];
        assert_eq!(
            compose(Organ::Kidneys, &atoms),
            "The right kidney shows a simple cortical cyst. The left kidney is normal."
        );
    }

    #[test]
    fn gallbladder_with_cbd_clause() {
        let atoms = vec![
            atom(Organ::GallbladderCbd, Side::Unsided, AtomKind::Status, 0, "Gallbladder is unremarkable"),
            atom(Organ::GallbladderCbd, Side::Unsided, AtomKind::Negative, 1, "No wall thickening"),
            atom(Organ::GallbladderCbd, Side::Unsided, AtomKind::Status, 2, "Common bile duct is not dilated"),
        ];
        let paragraph = compose(Organ::GallbladderCbd, &atoms);
        assert!(paragraph.contains("The gallbladder"));
        assert!(paragraph.contains("and the CBD is not dilated"));
        assert_eq!(
            paragraph,
            "The gallbladder is unremarkable with no wall thickening, and the CBD is not dilated."
        );
        assert!(sentence_count(&paragraph) <= 2);
    }

    #[test]
    fn gallbladder_defaults_and_cbd_measurement() {
        let atoms = vec![atom(
            Organ::GallbladderCbd,
            Side::Unsided,
            AtomKind::Measurement,
            0,
            "CBD measures 4 mm",
        )];
        assert_eq!(
            compose(Organ::GallbladderCbd, &atoms),
            "The gallbladder is unremarkable, and the CBD measures 4 mm."
        );

        let atoms = vec![atom(Organ::GallbladderCbd, Side::Unsided, AtomKind::Positive, 0, "Gallbladder contains multiple calculi")];
        assert_eq!(
            compose(Organ::GallbladderCbd, &atoms),
            "The gallbladder contains multiple calculi."
        );
    }

    #[test]
    fn generic_sentence_uses_first_status_then_positives_then_measurements() {
        let atoms = vec![
            atom(Organ::Liver, Side::Unsided, AtomKind::Measurement, 3, "Liver span measures 14 cm"),
            atom(Organ::Liver, Side::Unsided, AtomKind::Status, 0, "The liver is normal in outline"),
            atom(Organ::Liver, Side::Unsided, AtomKind::Status, 1, "Portal vein flow is satisfactory"),
            atom(Organ::Liver, Side::Unsided, AtomKind::Positive, 2, "Liver shows increased echogenicity"),
            atom(Organ::Liver, Side::Unsided, AtomKind::Negative, 4, "No focal lesion"),
        ];
        assert_eq!(
            compose(Organ::Liver, &atoms),
            "The liver is normal in outline, shows increased echogenicity, and span measures 14 cm. No focal lesion."
        );
    }

    #[test]
    fn negatives_are_capped_and_deduplicated() {
        let texts = [
            "No ascites",
            "no Ascites",
            "No pleural effusion",
            "No collection",
            "No free air",
        ];
        assert_eq!(
            compress_negatives(&texts, 3).as_deref(),
            Some("ascites, pleural effusion or collection")
        );
        assert_eq!(compress_negatives::<&str>(&[], 3), None);
    }

    #[test]
    fn sentences_are_truncated_to_limit() {
        let config = NarrativeConfig::new("{name}: {value}".into(), ", ".into(), 3, 1).unwrap();
        let atoms = vec![
            atom(Organ::Spleen, Side::Unsided, AtomKind::Status, 0, "Spleen is normal"),
            atom(Organ::Spleen, Side::Unsided, AtomKind::Negative, 1, "No splenic lesion"),
        ];
        assert_eq!(
            compose_organ_paragraph(Organ::Spleen, &atoms, &config),
            "The spleen is normal."
        );
    }

    #[test]
    fn dedupe_keeps_first_by_priority() {
        let atoms = vec![
            atom(Organ::Misc, Side::Unsided, AtomKind::Positive, 5, "Bowel  gas"),
            atom(Organ::Misc, Side::Unsided, AtomKind::Positive, 1, "bowel gas"),
        ];
        let deduped = dedupe_atoms(&atoms);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].priority, 1);
        assert_eq!(compose(Organ::Misc, &atoms), "Bowel gas.");
    }
}
