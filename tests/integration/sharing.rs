// Integration tests for artifact sharing
//
// Sharable providers that resolve to the same concrete location and
// artifact type hold the same Arc. Production happens exactly once per
// cache slot, including under concurrency.

use std::sync::atomic::Ordering;
use std::sync::{Arc, Barrier};

use anyhow::Result;

use larc::test_utils::{CountingTextProducer, MapProducer, TextProducer, redirect_to};
use larc::{ArtifactCache, Context, MemoryLoader, Outcome, ResourceProvider};

#[test]
fn test_sharable_providers_hold_one_artifact() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    let blobs = MemoryLoader::new();
    blobs.insert_text("shared.bin", "shared model");
    let cache = ArtifactCache::new();

    let first = ResourceProvider::new("first", TextProducer)
        .with_loader(blobs.clone())
        .with_location("mem:shared.bin")
        .with_cache(cache.clone());
    let second = ResourceProvider::new("second", TextProducer)
        .with_loader(blobs.clone())
        .with_location("mem:shared.bin")
        .with_cache(cache.clone());

    assert_eq!(first.configure(&Context::new())?, Outcome::Produced);
    assert_eq!(second.configure(&Context::new())?, Outcome::Shared);
    assert!(Arc::ptr_eq(&first.artifact().unwrap(), &second.artifact().unwrap()));
    assert_eq!(cache.len(), 1);
    Ok(())
}

#[test]
fn test_different_locations_do_not_share() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    let blobs = MemoryLoader::new();
    blobs.insert_text("en.bin", "english");
    blobs.insert_text("de.bin", "german");
    let cache = ArtifactCache::new();

    let build = |name: &str| {
        ResourceProvider::new(name, TextProducer)
            .with_loader(blobs.clone())
            .with_location("mem:${language}.bin")
            .with_cache(cache.clone())
    };

    let english = build("english");
    english.configure(&Context::new().with_language("en"))?;
    let german = build("german");
    german.configure(&Context::new().with_language("de"))?;

    assert!(!Arc::ptr_eq(&english.artifact().unwrap(), &german.artifact().unwrap()));
    assert_eq!(cache.len(), 2);
    Ok(())
}

#[test]
fn test_same_location_different_types_coexist() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    // One resource, two artifact types. The cache key includes the type,
    // so both productions happen and coexist.
    let blobs = MemoryLoader::new();
    blobs.insert_text("tagger.properties", "tagset = ptb\n");
    let cache = ArtifactCache::new();

    let text = ResourceProvider::new("as-text", TextProducer)
        .with_loader(blobs.clone())
        .with_location("mem:tagger.properties")
        .with_cache(cache.clone());
    let map = ResourceProvider::new("as-map", MapProducer)
        .with_loader(blobs.clone())
        .with_location("mem:tagger.properties")
        .with_cache(cache.clone());

    assert_eq!(text.configure(&Context::new())?, Outcome::Produced);
    assert_eq!(map.configure(&Context::new())?, Outcome::Produced);
    assert_eq!(cache.len(), 2);
    assert_eq!(map.artifact().unwrap().get("tagset").map(String::as_str), Some("ptb"));
    Ok(())
}

#[test]
fn test_non_sharable_provider_bypasses_cache() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    let blobs = MemoryLoader::new();
    blobs.insert_text("solo.bin", "solo model");
    let cache = ArtifactCache::new();

    let cached = ResourceProvider::new("cached", TextProducer)
        .with_loader(blobs.clone())
        .with_location("mem:solo.bin")
        .with_cache(cache.clone());
    let private = ResourceProvider::new("private", TextProducer)
        .with_loader(blobs.clone())
        .with_location("mem:solo.bin");

    assert_eq!(cached.configure(&Context::new())?, Outcome::Produced);
    assert_eq!(private.configure(&Context::new())?, Outcome::Produced);
    assert!(!Arc::ptr_eq(&cached.artifact().unwrap(), &private.artifact().unwrap()));
    assert_eq!(cache.len(), 1);
    Ok(())
}

#[test]
fn test_aliases_share_through_redirects() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    // Two providers configured with different alias locations share once
    // the redirects land on the same concrete resource.
    let blobs = MemoryLoader::new();
    blobs.insert_text("alias-a.desc", redirect_to("mem:real.bin", &[]));
    blobs.insert_text("alias-b.desc", redirect_to("mem:real.bin", &[]));
    blobs.insert_text("real.bin", "the one model");
    let cache = ArtifactCache::new();

    let a = ResourceProvider::new("alias-a", TextProducer)
        .with_loader(blobs.clone())
        .with_location("mem:alias-a.desc")
        .with_cache(cache.clone());
    let b = ResourceProvider::new("alias-b", TextProducer)
        .with_loader(blobs.clone())
        .with_location("mem:alias-b.desc")
        .with_cache(cache.clone());

    assert_eq!(a.configure(&Context::new())?, Outcome::Produced);
    assert_eq!(b.configure(&Context::new())?, Outcome::Shared);
    assert!(Arc::ptr_eq(&a.artifact().unwrap(), &b.artifact().unwrap()));
    Ok(())
}

#[test]
fn test_concurrent_configure_produces_once() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    const WORKERS: usize = 8;

    let blobs = MemoryLoader::new();
    blobs.insert_text("contended.bin", "contended model");
    let cache = ArtifactCache::new();

    let mut providers = Vec::new();
    let mut counters = Vec::new();
    for i in 0..WORKERS {
        let producer = CountingTextProducer::new();
        counters.push(producer.invocations());
        providers.push(
            ResourceProvider::new(format!("worker-{i}"), producer)
                .with_loader(blobs.clone())
                .with_location("mem:contended.bin")
                .with_cache(cache.clone()),
        );
    }

    let barrier = Barrier::new(WORKERS);
    let outcomes = std::thread::scope(|scope| {
        let handles: Vec<_> = providers
            .iter()
            .map(|provider| {
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    provider.configure(&Context::new())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().expect("worker panicked")).collect::<Vec<_>>()
    });

    let produced = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, Ok(Outcome::Produced)))
        .count();
    assert_eq!(produced, 1, "exactly one worker should produce");
    assert!(outcomes.iter().all(|outcome| outcome.is_ok()));

    let total: usize = counters.iter().map(|c| c.load(Ordering::SeqCst)).sum();
    assert_eq!(total, 1, "the producer must run exactly once across workers");

    let reference = providers[0].artifact().unwrap();
    for provider in &providers[1..] {
        assert!(Arc::ptr_eq(&reference, &provider.artifact().unwrap()));
    }
    Ok(())
}
