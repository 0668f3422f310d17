//! Answer normalization applied identically to both sides of a comparison.

/// Punctuation removed before comparison. Apostrophes are handled separately
/// so contractions can be expanded first.
const STRIPPED_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '"'];

/// Contraction expansions (normalized to expanded form).
static CONTRACTIONS: &[(&str, &str)] = &[
    ("i'm", "i am"),
    ("i've", "i have"),
    ("i'll", "i will"),
    ("i'd", "i would"),
    ("you're", "you are"),
    ("you've", "you have"),
    ("he's", "he is"),
    ("she's", "she is"),
    ("it's", "it is"),
    ("we're", "we are"),
    ("they're", "they are"),
    ("that's", "that is"),
    ("what's", "what is"),
    ("there's", "there is"),
    ("let's", "let us"),
    ("isn't", "is not"),
    ("aren't", "are not"),
    ("wasn't", "was not"),
    ("weren't", "were not"),
    ("don't", "do not"),
    ("doesn't", "does not"),
    ("didn't", "did not"),
    ("haven't", "have not"),
    ("hasn't", "has not"),
    ("won't", "will not"),
    ("wouldn't", "would not"),
    ("can't", "cannot"),
    ("couldn't", "could not"),
    ("shouldn't", "should not"),
];

/// British spellings and their American equivalents.
static SPELLING_VARIANTS: &[(&str, &str)] = &[
    ("colour", "color"),
    ("favourite", "favorite"),
    ("travelling", "traveling"),
    ("centre", "center"),
    ("theatre", "theater"),
    ("realise", "realize"),
    ("organise", "organize"),
    ("grey", "gray"),
    ("programme", "program"),
    ("behaviour", "behavior"),
    ("neighbour", "neighbor"),
];

/// Normalize an answer for comparison.
///
/// Lowercases, expands contractions, strips punctuation and collapses
/// whitespace. Normalizing an already normalized string is a no-op.
pub fn normalize(s: &str) -> String {
    let lowered = s.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'");
    let stripped: String = lowered
        .chars()
        .map(|c| if STRIPPED_PUNCTUATION.contains(&c) { ' ' } else { c })
        .collect();

    let mut words: Vec<String> = Vec::new();
    for token in stripped.split_whitespace() {
        let expanded = expand_contraction(token.trim_matches('\''));
        for word in expanded.split_whitespace() {
            let word = word.replace('\'', "");
            if !word.is_empty() {
                words.push(word);
            }
        }
    }

    words.join(" ")
}

fn expand_contraction(token: &str) -> &str {
    CONTRACTIONS
        .iter()
        .find(|(short, _)| *short == token)
        .map(|(_, long)| *long)
        .unwrap_or(token)
}

/// Rewrite British spellings in a normalized string to American ones.
pub fn americanize(normalized: &str) -> String {
    normalized
        .split(' ')
        .map(|word| {
            SPELLING_VARIANTS
                .iter()
                .fold(word.to_string(), |acc, (british, american)| {
                    acc.replace(british, american)
                })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tokens of a normalized string, sorted alphabetically.
pub fn sorted_tokens(normalized: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = normalized.split_whitespace().collect();
    tokens.sort_unstable();
    tokens
}

pub fn token_count(normalized: &str) -> usize {
    normalized.split_whitespace().count()
}
