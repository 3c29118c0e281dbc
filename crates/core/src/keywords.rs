use crate::error::Result;
use regex::Regex;
use std::collections::HashMap;

/// Token rule: case-folded alphabetic runs, four characters or longer.
const TOKEN_PATTERN: &str = r"[a-z]{4,}";

/// Common English tokens excluded from keyword counts. Tokens shorter
/// than four characters never reach this filter.
const STOP_WORDS: [&str; 44] = [
    "about", "above", "after", "against", "also", "among", "because", "been", "before", "being",
    "below", "between", "both", "could", "during", "each", "from", "have", "here", "into", "more",
    "most", "only", "other", "over", "shall", "should", "some", "such", "than", "that", "their",
    "them", "then", "there", "these", "they", "this", "those", "under", "were", "when", "which",
    "with",
];

/// Most frequent keywords of `text`, highest count first, ties broken by
/// first appearance. At most `limit` pairs are returned.
pub fn top_keywords(text: &str, limit: usize) -> Result<Vec<(String, usize)>> {
    Ok(count_tokens(text)?.into_iter().take(limit).collect())
}

/// Merged keyword counts across several texts, ranked like
/// [`top_keywords`]; first-seen order spans the texts in input order.
pub fn keyword_profile<'a, I>(texts: I, limit: usize) -> Result<Vec<(String, usize)>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();
    let token_re = Regex::new(TOKEN_PATTERN)?;

    for text in texts {
        tally(&token_re, text, &mut counts, &mut first_seen);
    }

    Ok(rank(counts, first_seen, limit))
}

fn count_tokens(text: &str) -> Result<Vec<(String, usize)>> {
    let token_re = Regex::new(TOKEN_PATTERN)?;
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: Vec<String> = Vec::new();

    tally(&token_re, text, &mut counts, &mut first_seen);

    Ok(rank(counts, first_seen, usize::MAX))
}

fn tally(
    token_re: &Regex,
    text: &str,
    counts: &mut HashMap<String, usize>,
    first_seen: &mut Vec<String>,
) {
    let lowered = text.to_lowercase();
    for token in token_re.find_iter(&lowered) {
        let token = token.as_str();
        if STOP_WORDS.contains(&token) {
            continue;
        }
        match counts.get_mut(token) {
            Some(count) => *count += 1,
            None => {
                counts.insert(token.to_string(), 1);
                first_seen.push(token.to_string());
            }
        }
    }
}

fn rank(
    counts: HashMap<String, usize>,
    first_seen: Vec<String>,
    limit: usize,
) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = first_seen
        .into_iter()
        .filter_map(|token| {
            let count = counts.get(&token).copied()?;
            Some((token, count))
        })
        .collect();

    // Stable sort keeps first-seen order among equal counts.
    ranked.sort_by(|left, right| right.1.cmp(&left.1));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::{keyword_profile, top_keywords, STOP_WORDS};

    #[test]
    fn most_frequent_tokens_come_first() {
        let text = "microgravity bone bone bone muscle muscle plant";
        let ranked = top_keywords(text, 10).expect("tokenizer pattern is valid");

        assert_eq!(ranked[0], ("bone".to_string(), 3));
        assert_eq!(ranked[1], ("muscle".to_string(), 2));
        assert!(ranked.iter().all(|(_, count)| *count >= 1));
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let ranked = top_keywords("zebra apple zebra apple", 10).expect("valid pattern");
        assert_eq!(ranked[0].0, "zebra");
        assert_eq!(ranked[1].0, "apple");
    }

    #[test]
    fn short_tokens_and_stop_words_are_dropped() {
        let ranked = top_keywords("the rat ran with these cells", 10).expect("valid pattern");
        let tokens: Vec<&str> = ranked.iter().map(|(token, _)| token.as_str()).collect();

        assert!(tokens.contains(&"cells"));
        assert!(!tokens.contains(&"rat"));
        assert!(!tokens.contains(&"with"));
        assert!(!tokens.contains(&"these"));
        assert!(tokens.iter().all(|token| token.len() >= 4));
        assert!(tokens.iter().all(|token| !STOP_WORDS.contains(token)));
    }

    #[test]
    fn limit_caps_the_result() {
        let ranked = top_keywords("alpha beta gamma delta epsilon", 2).expect("valid pattern");
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn case_is_folded_before_counting() {
        let ranked = top_keywords("Plant PLANT plant", 10).expect("valid pattern");
        assert_eq!(ranked, vec![("plant".to_string(), 3)]);
    }

    #[test]
    fn profile_merges_counts_across_texts() {
        let ranked =
            keyword_profile(["bone muscle", "bone plant"], 10).expect("valid pattern");
        assert_eq!(ranked[0], ("bone".to_string(), 2));
        assert_eq!(ranked.len(), 3);
    }
}
