// Integration tests for declarative provider specs
//
// A TOML spec captures the static provider setup: location template,
// defaults, variant table, and whether artifacts are sharable.

use std::sync::Arc;

use anyhow::Result;

use larc::test_utils::TextProducer;
use larc::{ArtifactCache, Context, Error, MemoryLoader, Outcome, ProviderSpec, ResourceProvider};

use crate::common::TestFiles;

const MAPPING_SPEC: &str = r#"
location = "mem:${language}-${variant}.map"
sharable = true

[defaults]
variant = "default"

[default_variants]
en = "v2"
de = "v1"
"#;

#[test]
fn test_spec_file_drives_provider() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    let files = TestFiles::new()?;
    let spec_path = files.write("pos-mapping.toml", MAPPING_SPEC)?;
    let spec = ProviderSpec::from_toml_path(&spec_path)?;

    let blobs = MemoryLoader::new();
    blobs.insert_text("en-v2.map", "english v2");
    blobs.insert_text("fr-default.map", "french default");

    let cache = ArtifactCache::new();
    let provider = ResourceProvider::from_spec("pos-mapping", &spec, TextProducer, &cache)
        .with_loader(blobs.clone());
    assert!(provider.is_sharable());

    provider.configure(&Context::new().with_language("en"))?;
    assert_eq!(provider.artifact().unwrap().as_str(), "english v2");

    // A language missing from the table falls back to the default variant.
    provider.configure(&Context::new().with_language("fr"))?;
    assert_eq!(provider.artifact().unwrap().as_str(), "french default");
    Ok(())
}

#[test]
fn test_sharable_spec_pair_shares_artifacts() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    let spec = ProviderSpec::from_toml_str(MAPPING_SPEC)?;
    let blobs = MemoryLoader::new();
    blobs.insert_text("en-v2.map", "english v2");
    let cache = ArtifactCache::new();

    let first = ResourceProvider::from_spec("first", &spec, TextProducer, &cache)
        .with_loader(blobs.clone());
    let second = ResourceProvider::from_spec("second", &spec, TextProducer, &cache)
        .with_loader(blobs.clone());

    let context = Context::new().with_language("en");
    assert_eq!(first.configure(&context)?, Outcome::Produced);
    assert_eq!(second.configure(&context)?, Outcome::Shared);
    assert!(Arc::ptr_eq(&first.artifact().unwrap(), &second.artifact().unwrap()));
    Ok(())
}

#[test]
fn test_non_sharable_spec_skips_cache() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    let spec = ProviderSpec::from_toml_str(
        r#"
location = "mem:fixed.bin"
sharable = false
"#,
    )?;
    let blobs = MemoryLoader::new();
    blobs.insert_text("fixed.bin", "fixed");
    let cache = ArtifactCache::new();

    let provider = ResourceProvider::from_spec("private", &spec, TextProducer, &cache)
        .with_loader(blobs.clone());
    assert!(!provider.is_sharable());

    assert_eq!(provider.configure(&Context::new())?, Outcome::Produced);
    assert!(cache.is_empty());
    Ok(())
}

#[test]
fn test_spec_defaults_can_be_overridden() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    let spec = ProviderSpec::from_toml_str(MAPPING_SPEC)?;
    let blobs = MemoryLoader::new();
    blobs.insert_text("en-v9.map", "experimental");

    let cache = ArtifactCache::new();
    let provider = ResourceProvider::from_spec("experimental", &spec, TextProducer, &cache)
        .with_loader(blobs.clone());
    provider.set_override("variant", "v9");

    provider.configure(&Context::new().with_language("en"))?;
    assert_eq!(provider.artifact().unwrap().as_str(), "experimental");
    Ok(())
}

#[test]
fn test_invalid_spec_file_is_rejected() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    let files = TestFiles::new()?;
    let path = files.write("broken.toml", "location = \"   \"\n")?;

    let err = ProviderSpec::from_toml_path(&path).unwrap_err();
    assert!(matches!(err, Error::SpecValidationError { .. }));
    assert!(err.to_string().contains("location template is empty"));
    Ok(())
}
