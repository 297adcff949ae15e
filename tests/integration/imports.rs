// Integration tests for cross-provider imports
//
// An import binds one provider's configuration key to another provider's
// resolved metadata. Resolution is depth-first: the source configures for
// the same context first, and cycles anywhere along the chain are errors.

use std::sync::Arc;

use anyhow::Result;

use larc::test_utils::{MapProducer, TextProducer, descriptor};
use larc::{Context, Error, MemoryLoader, Outcome, ResourceProvider};

#[test]
fn test_model_tagset_selects_mapping() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    // The model resource declares which tagset it was trained on; the
    // mapping provider imports that declaration to pick a matching file.
    let blobs = MemoryLoader::new();
    blobs.insert_text("model-en.desc", descriptor(&[("tagset", "mytags2")]));
    blobs.insert_text("model-de.desc", descriptor(&[("tagset", "mytags1")]));
    blobs.insert_text("en-mytags2.map", "english mapping");
    blobs.insert_text("de-mytags1.map", "german mapping");

    let model = Arc::new(
        ResourceProvider::new("tagger-model", TextProducer)
            .with_loader(blobs.clone())
            .with_location("mem:model-${language}.desc"),
    );
    let mapping = ResourceProvider::new("tagset-mapping", TextProducer)
        .with_loader(blobs.clone())
        .with_location("mem:${language}-${tagset}.map");
    mapping.add_import("tagset", model.clone());

    mapping.configure(&Context::new().with_language("en"))?;
    assert_eq!(mapping.artifact().unwrap().as_str(), "english mapping");

    mapping.configure(&Context::new().with_language("de"))?;
    assert_eq!(mapping.artifact().unwrap().as_str(), "german mapping");
    assert_eq!(
        mapping.resolved_configuration().get("tagset").map(String::as_str),
        Some("mytags1")
    );
    Ok(())
}

#[test]
fn test_import_as_renames_metadata_key() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    let blobs = MemoryLoader::new();
    blobs.insert_text("model.desc", descriptor(&[("pos.tagset", "stts")]));
    blobs.insert_text("stts.map", "stts mapping");

    let model = Arc::new(
        ResourceProvider::new("model", TextProducer)
            .with_loader(blobs.clone())
            .with_location("mem:model.desc"),
    );
    let mapping = ResourceProvider::new("mapping", TextProducer)
        .with_loader(blobs.clone())
        .with_location("mem:${tagset}.map");
    mapping.add_import_as("tagset", "pos.tagset", model);

    mapping.configure(&Context::new())?;
    assert_eq!(mapping.artifact().unwrap().as_str(), "stts mapping");
    Ok(())
}

#[test]
fn test_import_cycle_reports_chain() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    let blobs = MemoryLoader::new();
    blobs.insert_text("a.txt", "a");
    blobs.insert_text("b.txt", "b");

    let a = Arc::new(
        ResourceProvider::new("provider-a", TextProducer)
            .with_loader(blobs.clone())
            .with_location("mem:a.txt"),
    );
    let b = Arc::new(
        ResourceProvider::new("provider-b", TextProducer)
            .with_loader(blobs.clone())
            .with_location("mem:b.txt"),
    );
    a.add_import("from-b", b.clone());
    b.add_import("from-a", a.clone());

    let err = a.configure(&Context::new()).unwrap_err();
    assert!(matches!(err, Error::ImportCycle { .. }));
    assert_eq!(
        err.to_string(),
        "Circular import detected: provider-a → provider-b → provider-a"
    );
    Ok(())
}

#[test]
fn test_diamond_imports_resolve_without_cycle() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    // a imports from b and c; both b and c import from d. Sharing a source
    // is not a cycle and must not deadlock.
    let blobs = MemoryLoader::new();
    blobs.insert_text("d.desc", descriptor(&[("shared", "common")]));
    blobs.insert_text("b-common.desc", descriptor(&[("left", "from-b")]));
    blobs.insert_text("c-common.desc", descriptor(&[("right", "from-c")]));
    blobs.insert_text("a-from-b-from-c.txt", "diamond payload");

    let d = Arc::new(
        ResourceProvider::new("provider-d", TextProducer)
            .with_loader(blobs.clone())
            .with_location("mem:d.desc"),
    );
    let b = Arc::new(
        ResourceProvider::new("provider-b", TextProducer)
            .with_loader(blobs.clone())
            .with_location("mem:b-${shared}.desc"),
    );
    b.add_import("shared", d.clone());
    let c = Arc::new(
        ResourceProvider::new("provider-c", TextProducer)
            .with_loader(blobs.clone())
            .with_location("mem:c-${shared}.desc"),
    );
    c.add_import("shared", d.clone());

    let a = ResourceProvider::new("provider-a", TextProducer)
        .with_loader(blobs.clone())
        .with_location("mem:a-${left}-${right}.txt");
    a.add_import("left", b.clone());
    a.add_import("right", c.clone());

    assert_eq!(a.configure(&Context::new())?, Outcome::Produced);
    assert_eq!(a.artifact().unwrap().as_str(), "diamond payload");
    Ok(())
}

#[test]
fn test_unavailable_import_falls_back_to_default() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    let blobs = MemoryLoader::new();
    blobs.insert_text("default.map", "default mapping");

    let source = Arc::new(
        ResourceProvider::new("optional-source", TextProducer)
            .with_loader(blobs.clone())
            .with_location("mem:absent.desc"),
    );
    source.set_not_required("location");

    let mapping = ResourceProvider::new("mapping", TextProducer)
        .with_loader(blobs.clone())
        .with_location("mem:${tagset}.map")
        .with_default("tagset", "default");
    mapping.add_import("tagset", source);

    assert_eq!(mapping.configure(&Context::new())?, Outcome::Produced);
    assert_eq!(mapping.artifact().unwrap().as_str(), "default mapping");
    Ok(())
}

#[test]
fn test_failing_import_source_propagates() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    let blobs = MemoryLoader::new();
    blobs.insert_text("default.map", "default mapping");

    // The source requires its resource; its failure aborts the importing
    // provider's configure.
    let source = Arc::new(
        ResourceProvider::new("broken-source", TextProducer)
            .with_loader(blobs.clone())
            .with_location("mem:absent.desc"),
    );

    let mapping = ResourceProvider::new("mapping", TextProducer)
        .with_loader(blobs.clone())
        .with_location("mem:${tagset}.map")
        .with_default("tagset", "default");
    mapping.add_import("tagset", source);

    let err = mapping.configure(&Context::new()).unwrap_err();
    assert!(matches!(
        err,
        Error::ResourceNotFound { ref location } if location == "mem:absent.desc"
    ));
    Ok(())
}

#[test]
fn test_structured_model_metadata_via_map_producer() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    // A MapProducer artifact and the provider metadata see the same pairs:
    // the descriptor is both the payload and the metadata source.
    let blobs = MemoryLoader::new();
    blobs.insert_text(
        "tagger.properties",
        descriptor(&[("tagset", "ptb"), ("version", "3")]),
    );

    let provider = ResourceProvider::new("properties", MapProducer)
        .with_loader(blobs.clone())
        .with_location("mem:tagger.properties");
    provider.configure(&Context::new())?;

    let artifact = provider.artifact().unwrap();
    assert_eq!(artifact.get("tagset").map(String::as_str), Some("ptb"));
    assert_eq!(provider.metadata_value("version").as_deref(), Some("3"));
    Ok(())
}
