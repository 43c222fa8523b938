use ndarray::Array2;
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?u)\b\w\w+\b").expect("valid token regex"));

/// English stop words. "none" is included so the "None" sentinel never carries weight.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "almost", "also", "am", "among",
    "an", "and", "any", "are", "around", "as", "at", "be", "because", "been", "before", "being",
    "below", "between", "both", "but", "by", "can", "cannot", "could", "did", "do", "does",
    "doing", "down", "during", "each", "either", "else", "enough", "etc", "even", "ever",
    "every", "few", "for", "from", "further", "get", "had", "has", "have", "having", "he", "her",
    "here", "hers", "herself", "him", "himself", "his", "how", "however", "i", "if", "in",
    "into", "is", "it", "its", "itself", "just", "least", "less", "made", "many", "may", "me",
    "might", "more", "most", "much", "must", "my", "myself", "neither", "no", "nobody", "none",
    "nor", "not", "nothing", "now", "of", "off", "often", "on", "once", "one", "only", "or",
    "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per",
    "perhaps", "rather", "same", "several", "she", "should", "since", "so", "some", "still",
    "such", "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there",
    "these", "they", "this", "those", "though", "through", "thus", "to", "together", "too",
    "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were", "what",
    "whatever", "when", "where", "whether", "which", "while", "who", "whole", "whom", "whose",
    "why", "will", "with", "within", "without", "would", "yet", "you", "your", "yours",
    "yourself", "yourselves",
];

/// IDF-weighted bag of n-grams with L2-normalised rows
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_ngram: usize,
    max_features: Option<usize>,
    stop_words: HashSet<&'static str>,
}

impl TfidfVectorizer {
    pub fn new(max_ngram: usize, max_features: Option<usize>) -> Self {
        Self {
            max_ngram: max_ngram.max(1),
            max_features,
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    /// Unigrams and bigrams, as used for the categorical feature text
    pub fn bigrams(max_features: usize) -> Self {
        Self::new(2, Some(max_features))
    }

    pub fn unigrams(max_features: usize) -> Self {
        Self::new(1, Some(max_features))
    }

    /// Fits the vocabulary on `documents` and returns the document-term matrix.
    /// An empty vocabulary yields an N×0 matrix.
    pub fn fit_transform(&self, documents: &[&str]) -> Array2<f64> {
        let analyzed: Vec<Vec<String>> = documents.iter().map(|d| self.analyze(d)).collect();
        let vocabulary = self.vocabulary(&analyzed);

        let n_docs = documents.len();
        let mut matrix = Array2::<f64>::zeros((n_docs, vocabulary.len()));
        let mut document_frequency = vec![0usize; vocabulary.len()];

        for (row, terms) in analyzed.iter().enumerate() {
            for term in terms {
                if let Some(&col) = vocabulary.get(term) {
                    if matrix[[row, col]] == 0.0 {
                        document_frequency[col] += 1;
                    }
                    matrix[[row, col]] += 1.0;
                }
            }
        }

        // Smooth idf: ln((1 + n) / (1 + df)) + 1
        for (col, df) in document_frequency.iter().enumerate() {
            let idf = ((1.0 + n_docs as f64) / (1.0 + *df as f64)).ln() + 1.0;
            matrix.column_mut(col).mapv_inplace(|tf| tf * idf);
        }

        for mut row in matrix.rows_mut() {
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|v| v / norm);
            }
        }

        matrix
    }

    /// Lower-cased tokens with stop words removed, expanded to 1..=max_ngram grams
    pub fn analyze(&self, document: &str) -> Vec<String> {
        let lowered = document.to_lowercase();
        let tokens: Vec<&str> = TOKEN
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(t))
            .collect();

        let mut terms = Vec::with_capacity(tokens.len() * self.max_ngram);
        for n in 1..=self.max_ngram {
            if tokens.len() < n {
                break;
            }
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }

    /// Term -> column, columns in alphabetical term order. With a feature cap the
    /// most frequent terms across the corpus are kept, ties broken alphabetically.
    fn vocabulary(&self, analyzed: &[Vec<String>]) -> HashMap<String, usize> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for terms in analyzed {
            for term in terms {
                *counts.entry(term.as_str()).or_default() += 1;
            }
        }

        let mut kept: Vec<&str> = match self.max_features {
            Some(limit) if counts.len() > limit => {
                let mut by_frequency: Vec<(&str, usize)> = counts.into_iter().collect();
                by_frequency.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
                by_frequency.truncate(limit);
                by_frequency.into_iter().map(|(term, _)| term).collect()
            }
            _ => counts.into_keys().collect(),
        };
        kept.sort_unstable();

        kept.into_iter()
            .enumerate()
            .map(|(idx, term)| (term.to_string(), idx))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_drops_stop_words_and_short_tokens() {
        let vectorizer = TfidfVectorizer::bigrams(500);
        let terms = vectorizer.analyze("Italian Pizzeria None a Casual");

        assert_eq!(
            terms,
            vec![
                "italian",
                "pizzeria",
                "casual",
                "italian pizzeria",
                "pizzeria casual",
            ]
        );
    }

    #[test]
    fn test_rows_are_unit_length() {
        let docs = ["Italian Casual", "Italian Fine dining", "Indian Casual"];
        let matrix = TfidfVectorizer::bigrams(500).fit_transform(&docs);

        for row in matrix.rows() {
            assert!((row.dot(&row) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rare_terms_weigh_more() {
        let docs = ["pizza pasta", "pizza burger", "pizza sushi"];
        let matrix = TfidfVectorizer::unigrams(100).fit_transform(&docs);
        // columns: burger, pasta, pizza, sushi
        assert!(matrix[[0, 1]] > matrix[[0, 2]]);
    }

    #[test]
    fn test_max_features_keeps_most_frequent_terms() {
        let docs = ["chowder chowder chowder", "chowder stew", "oysters"];
        let matrix = TfidfVectorizer::unigrams(1).fit_transform(&docs);

        assert_eq!(matrix.ncols(), 1);
        assert_eq!(matrix[[2, 0]], 0.0);
        assert!(matrix[[0, 0]] > 0.0);
    }

    #[test]
    fn test_empty_corpus_has_no_columns() {
        let matrix = TfidfVectorizer::unigrams(100).fit_transform(&["", "the and"]);
        assert_eq!(matrix.dim(), (2, 0));
    }
}
