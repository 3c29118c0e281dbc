/// Sentinel label used when no rule matches.
pub const OTHER_CATEGORY: &str = "Other";

/// Topic rules, applied in declaration order. A document gets a label when
/// any trigger occurs as a case-insensitive substring of its text.
pub const CATEGORY_RULES: [(&str, &[&str]); 7] = [
    (
        "Plant Biology",
        &["plant", "arabidopsis", "seedling", "photosynthesis", "root growth"],
    ),
    (
        "Rodent Research",
        &["mouse", "mice", "rodent", "murine", "rat "],
    ),
    (
        "Microbiology",
        &["bacteria", "microbial", "microbiome", "biofilm", "fungal"],
    ),
    (
        "Human Physiology",
        &["astronaut", "crew health", "cardiovascular", "immune system"],
    ),
    (
        "Bone & Muscle",
        &["bone loss", "bone density", "muscle atrophy", "skeletal", "osteoblast"],
    ),
    (
        "Radiation Biology",
        &["radiation", "cosmic ray", "irradiation", "dosimetry"],
    ),
    (
        "Gene Expression",
        &["rna-seq", "transcriptom", "gene expression", "methylation", "epigen"],
    ),
];

/// Labels matching `text`, in rule-table order; `["Other"]` when nothing
/// matches. The result is never empty.
pub fn classify(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();

    let mut labels: Vec<String> = CATEGORY_RULES
        .iter()
        .filter(|(_, triggers)| triggers.iter().any(|trigger| lowered.contains(trigger)))
        .map(|(label, _)| (*label).to_string())
        .collect();

    if labels.is_empty() {
        labels.push(OTHER_CATEGORY.to_string());
    }

    labels
}

#[cfg(test)]
mod tests {
    use super::{classify, OTHER_CATEGORY};

    #[test]
    fn unmatched_text_gets_the_sentinel() {
        assert_eq!(classify("completely unrelated prose"), vec![OTHER_CATEGORY]);
    }

    #[test]
    fn classification_is_never_empty() {
        assert!(!classify("").is_empty());
    }

    #[test]
    fn matching_triggers_are_case_insensitive() {
        let labels = classify("Effects of MICROGRAVITY RADIATION on Arabidopsis");
        assert!(labels.contains(&"Plant Biology".to_string()));
        assert!(labels.contains(&"Radiation Biology".to_string()));
    }

    #[test]
    fn labels_follow_table_order() {
        let labels = classify("radiation exposure altered plant tissue");
        assert_eq!(labels, vec!["Plant Biology", "Radiation Biology"]);
    }

    #[test]
    fn sentinel_is_absent_when_a_rule_matches() {
        let labels = classify("bone loss in mice");
        assert!(!labels.contains(&OTHER_CATEGORY.to_string()));
    }
}
