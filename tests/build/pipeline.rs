//! End-to-end build tests: source text in, corpus directory out.

use std::fs;
use std::io::Cursor;

use corpix::corpus::{feature_path, FEATURES_FILE, SENTENCES_FILE};
use corpix::{
    build_corpus, build_corpus_file, verify_corpus, BuildOptions, Corpus, CorpixError, ElemWidth, IntArray,
    ReadMode,
};
use tempfile::TempDir;

use crate::common::{build_text, build_with, column_strings, synthetic_source, write_source, SCENARIO_SOURCE};

#[test]
fn test_scenario_arrays() {
    let dir = TempDir::new().unwrap();
    let summary = build_text(dir.path(), SCENARIO_SOURCE);
    assert_eq!((summary.tokens, summary.sentences), (3, 2));

    let corpus = Corpus::open(&summary.path, ReadMode::Mmap).unwrap();
    assert_eq!(corpus.sentence_starts().to_vec(), vec![0, 0, 2]);
    assert_eq!(column_strings(&corpus, "word"), vec!["the", "cat", "sat"]);
    assert_eq!(column_strings(&corpus, "pos"), vec!["ART", "SUBST", "VERB"]);
}

#[test]
fn test_directory_layout() {
    let dir = TempDir::new().unwrap();
    let summary = build_text(dir.path(), SCENARIO_SOURCE);
    let root = &summary.path;

    let features: Vec<String> =
        serde_json::from_str(&fs::read_to_string(root.join(FEATURES_FILE)).unwrap()).unwrap();
    assert_eq!(features, vec!["word", "pos"]);

    for name in ["word", "pos"] {
        let base = feature_path(root, name);
        assert!(base.exists());
        assert!(base.with_file_name(format!("feature.{}.strings", name)).exists());
        assert!(base.with_file_name(format!("feature.{}.starts", name)).exists());
    }

    // Pool blob is the sorted, deduplicated vocabulary concatenated.
    assert_eq!(
        fs::read(root.join("feature.word.strings")).unwrap(),
        b"catsatthe"
    );

    // Three tokens: max sentence start is 2, one byte per entry.
    let sentences = IntArray::open(root.join(SENTENCES_FILE), ReadMode::Buffered).unwrap();
    assert_eq!(sentences.elem_width(), ElemWidth::One);
    assert_eq!(
        fs::read(root.join(SENTENCES_FILE)).unwrap(),
        vec![3, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 2]
    );
}

#[test]
fn test_short_rows_padded_with_empty_value() {
    let dir = TempDir::new().unwrap();
    let summary = build_text(dir.path(), "word\tlemma\tpos\nthe\tthe\tART\ncats\n");
    let corpus = Corpus::open(&summary.path, ReadMode::Mmap).unwrap();
    assert_eq!(column_strings(&corpus, "lemma"), vec!["the", ""]);
    assert_eq!(column_strings(&corpus, "pos"), vec!["ART", ""]);
}

#[test]
fn test_crlf_source() {
    let dir = TempDir::new().unwrap();
    let summary = build_text(dir.path(), "word\tpos\r\n# sentence\r\nthe\tART\r\n\r\ncat\tSUBST\r\n");
    assert_eq!(summary.sentences, 2);
    let corpus = Corpus::open(&summary.path, ReadMode::Mmap).unwrap();
    assert_eq!(column_strings(&corpus, "pos"), vec!["ART", "SUBST"]);
}

#[test]
fn test_trailing_whitespace_not_part_of_values() {
    let dir = TempDir::new().unwrap();
    let summary = build_text(dir.path(), "word\tpos\nthe\tART\t\ncat\tSUBST \n");
    assert_eq!(summary.tokens, 2);
    let corpus = Corpus::open(&summary.path, ReadMode::Mmap).unwrap();
    assert_eq!(column_strings(&corpus, "word"), vec!["the", "cat"]);
    assert_eq!(column_strings(&corpus, "pos"), vec!["ART", "SUBST"]);
    assert!(corpus.intern("pos", b"SUBST").is_ok());
}

#[test]
fn test_pool_file_collision_rejected() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("w.corpus");
    let err = build_corpus(
        Cursor::new(b"w\tw.strings\nabc\tx\nde\ty\n".to_vec()),
        &target,
        &BuildOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CorpixError::MalformedHeader { .. }));
    assert!(!target.exists());
    assert!(!dir.path().join("w.corpus.partial").exists());
}

#[test]
fn test_file_build_uses_default_dir() {
    let dir = TempDir::new().unwrap();
    let input = write_source(dir.path(), "bnc.csv", SCENARIO_SOURCE);
    let summary = build_corpus_file(&input, None, &BuildOptions::default()).unwrap();
    assert_eq!(summary.path, dir.path().join("bnc.corpus"));
    assert!(dir.path().join("bnc.corpus").is_dir());
    assert!(!dir.path().join("bnc.corpus.partial").exists());
}

#[test]
fn test_rebuild_replaces_corpus() {
    let dir = TempDir::new().unwrap();
    build_text(dir.path(), SCENARIO_SOURCE);
    let summary = build_text(dir.path(), "lemma\nx\ny\n");

    let corpus = Corpus::open(&summary.path, ReadMode::Mmap).unwrap();
    assert_eq!(corpus.features(), ["lemma"]);
    assert_eq!(corpus.num_words(), 2);
    // Old feature files are gone, not merged.
    assert!(!summary.path.join("feature.word").exists());
    assert!(!dir.path().join("t.corpus.old").exists());
}

#[test]
fn test_stale_staging_dir_is_cleared() {
    let dir = TempDir::new().unwrap();
    let staging = dir.path().join("t.corpus.partial");
    fs::create_dir_all(&staging).unwrap();
    fs::write(staging.join("junk"), b"left over").unwrap();

    let summary = build_text(dir.path(), SCENARIO_SOURCE);
    assert!(!staging.exists());
    assert!(!summary.path.join("junk").exists());
}

#[test]
fn test_malformed_inputs_leave_nothing() {
    let dir = TempDir::new().unwrap();
    let input = write_source(dir.path(), "bad.csv", "word word\nx\n");
    let err = build_corpus_file(&input, None, &BuildOptions::default()).unwrap_err();
    assert!(matches!(err, CorpixError::MalformedHeader { .. }));
    assert!(!dir.path().join("bad.corpus").exists());
    assert!(!dir.path().join("bad.corpus.partial").exists());
}

#[test]
fn test_marker_option() {
    let dir = TempDir::new().unwrap();
    let options = BuildOptions {
        sentence_marker: b"<s>".to_vec(),
        ..BuildOptions::default()
    };
    let summary = build_with(dir.path(), "w\n<s>\na\n# sentence\nb\n<s> id=2\nc\n", &options);
    // "# sentence" is an ordinary token under a different marker.
    assert_eq!(summary.tokens, 4);
    assert_eq!(summary.sentences, 2);
}

#[test]
fn test_synthetic_corpus_is_consistent() {
    let dir = TempDir::new().unwrap();
    let summary = build_text(dir.path(), &synthetic_source(1000, 10));
    assert_eq!(summary.tokens, 10_000);
    assert_eq!(summary.sentences, 1000);

    let corpus = Corpus::open(&summary.path, ReadMode::Mmap).unwrap();
    assert!(verify_corpus(&corpus).unwrap().is_empty());
    assert_eq!(corpus.sentence_starts().elem_width(), ElemWidth::Two);
    assert_eq!(corpus.feature("word").unwrap().ids().elem_width(), ElemWidth::One);
    assert_eq!(corpus.sentence(1000).unwrap().len(), 10);
}
