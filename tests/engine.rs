// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use semdex::api::status_code;
use semdex::embedding::{HashEmbedder, ModelHandle};
use semdex::engine::{Engine, IngestRequest};
use semdex::{Error, Result};

fn hash_engine() -> Engine {
    Engine::new(Arc::new(ModelHandle::ready(Box::new(HashEmbedder::default()))))
}

fn words(n: usize) -> String {
    (0..n).map(|i| format!("word{}", i)).collect::<Vec<_>>().join(" ")
}

fn ingest(engine: &Engine, id: &str, text: &str) -> Result<semdex::api::IngestResponse> {
    engine.ingest(IngestRequest {
        id: Some(id.to_string()),
        text: text.to_string(),
        ..Default::default()
    })
}

#[test]
fn six_hundred_words_make_three_chunks() {
    let engine = hash_engine();
    let response = ingest(&engine, "long", &words(600)).unwrap();
    // stride 200 -> windows at 0, 200, 400
    assert_eq!(response.chunks_added, 3);

    let listing = engine.list_documents();
    assert_eq!(listing.total_docs, 1);
    assert_eq!(listing.total_chunks, 3);
    assert_eq!(listing.docs[0].chunk_count, 3);
    let indices: Vec<usize> = listing.docs[0].chunks.iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn three_word_ingest_then_exact_match() {
    let engine = hash_engine();
    let response = ingest(&engine, "tiny", "overlapping word windows").unwrap();
    assert_eq!(response.chunks_added, 1);

    let matched = engine
        .match_query("overlapping word windows", None, None)
        .unwrap();
    assert_eq!(matched.results[0].doc_id, "tiny");
    assert_eq!(matched.results[0].chunk_index, 0);
    assert!((matched.results[0].score - 1.0).abs() < 1e-6);
}

#[test]
fn match_on_empty_store_is_not_found() {
    let engine = hash_engine();
    let err = engine.match_query("anything", None, None).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(status_code(&err), 404);
}

#[test]
fn empty_query_is_validation() {
    let engine = hash_engine();
    ingest(&engine, "doc", "some words here").unwrap();
    let err = engine.match_query("", None, None).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(status_code(&err), 400);
}

#[test]
fn unloaded_model_maps_to_service_unavailable() {
    let engine = Engine::new(Arc::new(ModelHandle::unloaded()));
    let err = ingest(&engine, "doc", "some words here").unwrap_err();
    assert!(matches!(err, Error::ModelNotReady));
    assert_eq!(status_code(&err), 503);

    // Nothing was committed by the failed ingest.
    assert_eq!(engine.list_documents().total_docs, 0);
    assert_eq!(engine.health().store.chunks, 0);
}

#[test]
fn failed_ingest_leaves_previous_generation_intact() {
    let engine = hash_engine();
    ingest(&engine, "doc", "first generation text").unwrap();

    // Empty text fails validation before any store write.
    let err = ingest(&engine, "doc", "   ").unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let listing = engine.list_documents();
    assert_eq!(listing.docs[0].chunk_count, 1);
    assert_eq!(listing.docs[0].chunks[0].text, "first generation text");
}

#[test]
fn context_follows_document_edges() {
    let engine = hash_engine();
    // 10 words at chunk_words=2, overlap=0 -> 5 chunks, indices 0..4.
    engine
        .ingest(IngestRequest {
            id: Some("doc".to_string()),
            text: "a0 a1 b0 b1 c0 c1 d0 d1 e0 e1".to_string(),
            chunk_words: Some(2),
            overlap_words: Some(0),
        })
        .unwrap();

    let hit = |query: &str| {
        engine
            .match_query(query, Some(1), Some(true))
            .unwrap()
            .results
            .remove(0)
    };

    let first = hit("a0 a1");
    assert_eq!(first.chunk_index, 0);
    let context = first.context.unwrap();
    assert!(context.before.is_none());
    assert_eq!(context.after.as_deref(), Some("b0 b1"));

    let middle = hit("c0 c1");
    assert_eq!(middle.chunk_index, 2);
    let context = middle.context.unwrap();
    assert_eq!(context.before.as_deref(), Some("b0 b1"));
    assert_eq!(context.after.as_deref(), Some("d0 d1"));

    let last = hit("e0 e1");
    assert_eq!(last.chunk_index, 4);
    let context = last.context.unwrap();
    assert_eq!(context.before.as_deref(), Some("d0 d1"));
    assert!(context.after.is_none());
}

#[test]
fn listing_json_never_contains_embeddings() {
    let engine = hash_engine();
    ingest(&engine, "doc", "hello embedding world").unwrap();
    let json = serde_json::to_string(&engine.list_documents()).unwrap();
    assert!(!json.contains("\"embedding\""));
}

#[test]
fn embed_reports_usage() {
    let engine = hash_engine();
    let response = engine
        .embed(&["one two".to_string(), "three four five".to_string()])
        .unwrap();
    assert_eq!(response.embeddings.len(), 2);
    assert_eq!(response.usage.prompt_tokens, 5);
    assert_eq!(response.usage.total_tokens, 5);
}
