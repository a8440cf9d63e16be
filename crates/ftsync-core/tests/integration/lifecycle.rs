//! Insert/update synchronization of a realistic entity.

use ftsync_core::{Searchable, Synchronizer, UnitOfWork, Weight};

use crate::common::Article;

#[test]
fn test_insert_computes_both_vectors() {
    let mut articles = vec![
        Article::new("hello")
            .with_tags(&["x", "y"])
            .with_body("Full text search in Postgres")
            .by("Ada", "Lovelace"),
    ];

    let mut sync = Synchronizer::new();
    let written = sync.pre_insert(&mut articles).expect("metadata loads");
    assert_eq!(written, 2);

    let title = articles[0].title_search.as_ref().expect("title vector set");
    assert_eq!(title.text, "hello x y");
    assert_eq!(title.weight, Weight::A);
    assert_eq!(title.language.as_str(), "english");

    let body = articles[0].body_search.as_ref().expect("body vector set");
    assert_eq!(body.text, "Full text search in Postgres Ada Lovelace");
    assert_eq!(body.weight, Weight::D);
    assert_eq!(body.language.as_str(), "simple");
}

#[test]
fn test_null_body_is_skipped() {
    let mut articles = vec![Article::new("untitled").by("Grace", "Hopper")];
    Synchronizer::new().pre_insert(&mut articles).unwrap();
    assert_eq!(
        articles[0].body_search.as_ref().unwrap().text,
        "Grace Hopper"
    );
}

#[test]
fn test_update_follows_edits() {
    let mut uow = UnitOfWork::new();
    uow.schedule_insert(Article::new("draft"));
    let mut sync = Synchronizer::new();
    let plan = uow.prepare_flush(&mut sync).unwrap();

    let mut article = plan.insertions.into_iter().next().unwrap();
    // An empty tag list still contributes its (empty) part.
    assert_eq!(article.title_search.as_ref().unwrap().text, "draft ");

    article.title = "published".to_string();
    article.tags = vec!["news".to_string()];
    uow.schedule_update(article);
    let plan = uow.prepare_flush(&mut sync).unwrap();

    assert_eq!(plan.vectors_written, 2);
    assert_eq!(
        plan.updates[0].title_search.as_ref().unwrap().text,
        "published news"
    );
}

#[test]
fn test_mapping_nullability() {
    let metadata = ftsync_core::MetadataLoader::load(&Article::schema()).unwrap();
    // title + tags are both NOT NULL
    assert!(!metadata.mapping("title_search").unwrap().nullable);
    // body is nullable
    assert!(metadata.mapping("body_search").unwrap().nullable);
    assert_eq!(metadata.mapping("title_search").unwrap().column_name, "title_fts");
}
