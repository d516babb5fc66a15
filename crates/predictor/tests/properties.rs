//! Property tests for ranking and lookup.

use proptest::prelude::*;
use std::collections::HashMap;
use workbench_predictor::{tokenize, NGramModel};

fn word() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "c", "d", "e"]).prop_map(String::from)
}

// Reference counts of (previous token -> next token) for a bigram model.
fn bigram_counts(tokens: &[String]) -> HashMap<(String, String), u64> {
    let mut counts = HashMap::new();
    for pair in tokens.windows(2) {
        *counts
            .entry((pair[0].clone(), pair[1].clone()))
            .or_insert(0) += 1;
    }
    counts
}

proptest! {
    #[test]
    fn predictions_were_observed_after_context(
        words in prop::collection::vec(word(), 1..60),
        context in word(),
    ) {
        let text = words.join(" ");
        let mut model = NGramModel::new(2).unwrap();
        model.feed(&text);

        let counts = bigram_counts(&tokenize(&text));
        for prediction in model.predict_scored(&context) {
            let observed = counts
                .get(&(context.clone(), prediction.token.clone()))
                .copied()
                .unwrap_or(0);
            prop_assert!(observed > 0);
            prop_assert_eq!(observed, prediction.count);
        }
    }

    #[test]
    fn ranking_is_monotone_in_count(
        words in prop::collection::vec(word(), 1..80),
        context in word(),
    ) {
        let mut model = NGramModel::new(2).unwrap();
        model.feed(&words.join(" "));

        let scored = model.predict_scored(&context);
        prop_assert!(scored.len() <= model.top_k());
        for pair in scored.windows(2) {
            prop_assert!(pair[0].count >= pair[1].count);
        }
    }

    #[test]
    fn repeated_queries_are_stable(
        words in prop::collection::vec(word(), 1..40),
        context in word(),
    ) {
        let mut model = NGramModel::new(2).unwrap();
        model.feed(&words.join(" "));
        prop_assert_eq!(model.predict(&context), model.predict(&context));
    }
}
