use super::*;
use crate::catalog::{BookRecord, PaperRecord};

/// Deterministic bag-of-words embedder over a tiny fixed vocabulary. Enough
/// structure for cosine ranking without a real model.
struct VocabEmbedder {
    vocab: &'static [&'static str],
}

impl VocabEmbedder {
    fn new() -> Self {
        Self {
            vocab: &[
                "deep",
                "shallow",
                "learning",
                "gardening",
                "basics",
                "image",
                "recognition",
                "attention",
                "networks",
            ],
        }
    }
}

impl Embedder for VocabEmbedder {
    fn model_name(&self) -> &str {
        "vocab-test-model"
    }

    fn embed(&self, text: &str) -> crate::Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.vocab.len()];
        for word in text.split_whitespace() {
            if let Some(pos) = self.vocab.iter().position(|v| *v == word) {
                vector[pos] += 1.0;
            }
        }
        Ok(vector)
    }

    fn embed_batch(&self, texts: &[String]) -> crate::Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

fn book(id: &str, title: &str, rating: Option<f64>) -> CatalogItem {
    CatalogItem::from_book(BookRecord {
        id: id.to_string(),
        title: Some(title.to_string()),
        authors: None,
        publisher: None,
        description: None,
        published_year: None,
        average_rating: rating,
        preview_link: None,
    })
}

fn paper(id: &str, title: &str, citations: Option<u64>) -> CatalogItem {
    CatalogItem::from_paper(PaperRecord {
        id: id.to_string(),
        title: Some(title.to_string()),
        authors: None,
        venue: None,
        abstract_text: None,
        year: None,
        citation_count: citations,
        url: None,
    })
}

fn service_with_books() -> RecommendationService {
    let service = RecommendationService::new(Arc::new(VocabEmbedder::new()));
    service
        .build_and_install(vec![
            book("b1", "Deep Learning", Some(4.5)),
            book("b2", "Shallow Learning", Some(4.0)),
            book("b3", "Gardening Basics", Some(4.9)),
        ])
        .expect("build should succeed");
    service
}

#[test]
fn recommend_before_build_fails() {
    let service = RecommendationService::new(Arc::new(VocabEmbedder::new()));
    let err = service.recommend("anything", 5, 5).expect_err("should fail");
    assert!(matches!(err, RecError::IndexNotBuilt));
}

#[test]
fn negative_counts_are_invalid() {
    let service = service_with_books();
    let err = service.recommend("query", -1, 5).expect_err("should fail");
    assert!(matches!(err, RecError::InvalidArgument(_)));

    let err = service.recommend("query", 5, -3).expect_err("should fail");
    assert!(matches!(err, RecError::InvalidArgument(_)));
}

#[test]
fn scenario_deep_learning_query() {
    let service = service_with_books();
    let result = service
        .recommend("deep learning for image recognition", 2, 5)
        .expect("recommend should succeed");

    let titles: Vec<&str> = result
        .books
        .entries
        .iter()
        .map(|e| e.item.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Deep Learning", "Shallow Learning"]);

    // Papers were never indexed: empty result, not an error, and the
    // response says only books were served
    assert!(result.papers.is_empty());
    assert_eq!(result.served_categories, vec![Category::Book]);
}

#[test]
fn results_are_sorted_and_bounded() {
    let service = service_with_books();
    let result = service
        .recommend("learning", 2, 0)
        .expect("recommend should succeed");

    assert!(result.books.len() <= 2);
    for pair in result.books.entries.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    assert!(result.papers.is_empty());
}

#[test]
fn recommend_is_deterministic() {
    let service = service_with_books();
    let first = service
        .recommend("deep learning", 3, 3)
        .expect("recommend should succeed");
    let second = service
        .recommend("deep learning", 3, 3)
        .expect("recommend should succeed");

    assert_eq!(first, second);
}

#[test]
fn identical_text_ties_break_by_popularity() {
    let service = RecommendationService::new(Arc::new(VocabEmbedder::new()));
    service
        .build_and_install(vec![
            book("low", "Deep Learning", Some(2.0)),
            book("high", "Deep Learning", Some(4.8)),
        ])
        .expect("build should succeed");

    let result = service
        .recommend("deep learning", 2, 0)
        .expect("recommend should succeed");

    assert_eq!(result.books.entries[0].item.id, "high");
    assert_eq!(result.books.entries[1].item.id, "low");
}

#[test]
fn empty_query_is_legal_and_deterministic() {
    let service = service_with_books();
    let first = service.recommend("", 3, 3).expect("recommend should succeed");
    let second = service.recommend("", 3, 3).expect("recommend should succeed");

    assert_eq!(first, second);
    assert_eq!(first.books.len(), 3);
}

#[test]
fn both_categories_are_served_when_indexed() {
    let service = RecommendationService::new(Arc::new(VocabEmbedder::new()));
    service
        .build_and_install(vec![
            book("b1", "Deep Learning", Some(4.5)),
            paper("p1", "Attention networks", Some(1200)),
        ])
        .expect("build should succeed");

    let result = service
        .recommend("attention networks", 5, 5)
        .expect("recommend should succeed");

    assert_eq!(
        result.served_categories,
        vec![Category::Book, Category::Paper]
    );
    assert_eq!(result.papers.entries[0].item.id, "p1");
}

#[test]
fn rebuild_swaps_results() {
    let service = service_with_books();
    service
        .build_and_install(vec![book("only", "Gardening Basics", Some(3.0))])
        .expect("rebuild should succeed");

    let result = service
        .recommend("gardening basics", 5, 5)
        .expect("recommend should succeed");
    assert_eq!(result.books.len(), 1);
    assert_eq!(result.books.entries[0].item.id, "only");
}

#[test]
fn install_rejects_foreign_model_index() {
    struct OtherModel(VocabEmbedder);
    impl Embedder for OtherModel {
        fn model_name(&self) -> &str {
            "other-model"
        }
        fn embed(&self, text: &str) -> crate::Result<Vec<f32>> {
            self.0.embed(text)
        }
        fn embed_batch(&self, texts: &[String]) -> crate::Result<Vec<Vec<f32>>> {
            self.0.embed_batch(texts)
        }
    }

    let foreign = CatalogIndex::build(
        vec![book("b1", "Deep Learning", Some(4.0))],
        &OtherModel(VocabEmbedder::new()),
    )
    .expect("build should succeed");

    let service = RecommendationService::new(Arc::new(VocabEmbedder::new()));
    let err = service.install_index(foreign).expect_err("should reject");
    assert!(matches!(err, RecError::Config(_)));
}
