use crate::domain::Sentiment;

const MIN_TEXT_LEN: usize = 10;
const DOMINANCE_RATIO: f64 = 1.5;

const POSITIVE_WORDS: [&str; 26] = [
    "excellent", "amazing", "great", "wonderful", "fantastic", "delicious", "perfect", "love",
    "best", "recommend", "awesome", "incredible", "outstanding", "superb", "brilliant",
    "exceptional", "lovely", "enjoyed", "friendly", "pleasant", "welcoming", "impressed",
    "spectacular", "tasty", "fresh", "quality",
];

const NEGATIVE_WORDS: [&str; 23] = [
    "terrible", "bad", "awful", "horrible", "disappointing", "worst", "poor", "disgusting",
    "never", "waste", "overpriced", "rude", "slow", "cold", "dirty", "bland", "mediocre",
    "unfriendly", "avoid", "regret", "unpleasant", "unfortunate", "lacking",
];

const MIXED_INDICATORS: [&str; 12] = [
    "but", "however", "although", "except", "unfortunately", "wish", "could be better",
    "not bad but", "decent but", "good but", "nice but", "okay but",
];

/// Lexicon classifier with a numeric-rating fallback.
///
/// Words are matched as substrings of the lower-cased text, so "never" also hits "nevertheless".
pub fn classify(review_text: &str, rating: Option<f64>) -> Sentiment {
    if review_text.trim().chars().count() < MIN_TEXT_LEN {
        return from_rating(rating);
    }

    let text = review_text.to_lowercase();
    let positive = count_hits(&text, &POSITIVE_WORDS);
    let negative = count_hits(&text, &NEGATIVE_WORDS);
    let hedged = MIXED_INDICATORS.iter().any(|w| text.contains(w));

    match (positive, negative) {
        (0, 0) => from_rating(rating),
        (_, 0) => Sentiment::Good,
        (0, _) => Sentiment::Bad,
        _ if hedged => Sentiment::Mixed,
        (p, n) => compare_counts(p, n),
    }
}

fn compare_counts(positive: usize, negative: usize) -> Sentiment {
    let (p, n) = (positive as f64, negative as f64);
    if p > n * DOMINANCE_RATIO {
        Sentiment::Good
    } else if n > p * DOMINANCE_RATIO {
        Sentiment::Bad
    } else {
        Sentiment::Mixed
    }
}

fn from_rating(rating: Option<f64>) -> Sentiment {
    match rating {
        Some(r) if r >= 4.0 => Sentiment::Good,
        Some(r) if r <= 2.0 => Sentiment::Bad,
        _ => Sentiment::Mixed,
    }
}

fn count_hits(text: &str, lexicon: &[&str]) -> usize {
    lexicon.iter().filter(|w| text.contains(*w)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_uses_rating() {
        assert_eq!(classify("ok", Some(5.0)), Sentiment::Good);
        assert_eq!(classify("", Some(1.0)), Sentiment::Bad);
        assert_eq!(classify("meh", Some(3.0)), Sentiment::Mixed);
        assert_eq!(classify("meh", None), Sentiment::Mixed);
    }

    #[test]
    fn test_purely_positive_text() {
        assert_eq!(
            classify("Delicious food and friendly staff", Some(2.0)),
            Sentiment::Good
        );
    }

    #[test]
    fn test_purely_negative_text() {
        assert_eq!(classify("Rude staff, cold chips", Some(5.0)), Sentiment::Bad);
    }

    #[test]
    fn test_hedged_text_with_both_signals_is_mixed() {
        assert_eq!(
            classify("Great pizza however the service was slow", None),
            Sentiment::Mixed
        );
    }

    #[test]
    fn test_dominant_positive_wins_without_hedge() {
        assert_eq!(
            classify("Amazing, delicious, fresh and lovely. Bit cold inside.", None),
            Sentiment::Good
        );
    }

    #[test]
    fn test_no_lexicon_hits_falls_back_to_rating() {
        assert_eq!(classify("We had the soup of the day", Some(4.0)), Sentiment::Good);
    }
}
