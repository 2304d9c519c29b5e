//! Corpus build properties over random token streams:
//! - `sentences[0] == 0` and the rest strictly increasing
//! - every feature column has exactly one entry per token
//! - columns read back the source values in order
//! - empty sentences (repeated breaks) never produce a sentence

use corpix::{verify_corpus, Corpus, ReadMode};
use proptest::prelude::*;
use tempfile::TempDir;

use crate::common::{build_text, column_strings};

type Token = (String, String);

fn sentences() -> impl Strategy<Value = Vec<Vec<Token>>> {
    let token = ("[a-d]{1,2}", "[A-C]");
    prop::collection::vec(prop::collection::vec(token, 0..5), 0..20)
}

fn render(sentences: &[Vec<Token>], blank_breaks: bool) -> String {
    let mut out = String::from("word\tpos\n");
    for (i, sentence) in sentences.iter().enumerate() {
        out.push_str(if blank_breaks && i % 2 == 1 { "\n" } else { "# sentence\n" });
        for (word, pos) in sentence {
            out.push_str(&format!("{}\t{}\n", word, pos));
        }
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(60))]

    #[test]
    fn prop_corpus_invariants(sentences in sentences(), blank_breaks: bool) {
        let dir = TempDir::new().unwrap();
        let summary = build_text(dir.path(), &render(&sentences, blank_breaks));
        let corpus = Corpus::open(&summary.path, ReadMode::Mmap).unwrap();

        let tokens: Vec<&Token> = sentences.iter().flatten().collect();
        let mut expected_starts = vec![0u64];
        let mut position = 0u64;
        for sentence in sentences.iter().filter(|s| !s.is_empty()) {
            expected_starts.push(position);
            position += sentence.len() as u64;
        }

        prop_assert_eq!(corpus.num_words(), tokens.len());
        prop_assert_eq!(corpus.sentence_starts().to_vec(), expected_starts.clone());
        prop_assert_eq!(corpus.num_sentences(), expected_starts.len() - 1);
        prop_assert!(verify_corpus(&corpus).unwrap().is_empty());

        let words: Vec<String> = tokens.iter().map(|(w, _)| w.clone()).collect();
        let tags: Vec<String> = tokens.iter().map(|(_, p)| p.clone()).collect();
        prop_assert_eq!(column_strings(&corpus, "word"), words);
        prop_assert_eq!(column_strings(&corpus, "pos"), tags);

        for (n, sentence) in sentences.iter().filter(|s| !s.is_empty()).enumerate() {
            prop_assert_eq!(corpus.sentence(n + 1).unwrap().len(), sentence.len());
        }
    }
}
