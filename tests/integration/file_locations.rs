// Integration tests for file-backed resolution
//
// Providers resolving against the filesystem: base directories for
// relative locations, file: scheme handling, and redirect descriptors
// stored as plain files.

use anyhow::Result;

use larc::test_utils::{TextProducer, descriptor, redirect_to};
use larc::{Context, Error, FileLoader, ResourceProvider};

use crate::common::TestFiles;

#[test]
fn test_relative_locations_resolve_against_base_dir() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    let files = TestFiles::new()?;
    files.write("models/tagger-en.bin", "english tagger")?;
    files.write("models/tagger-de.bin", "german tagger")?;

    let provider = ResourceProvider::new("tagger", TextProducer)
        .with_loader(FileLoader::new().with_base_dir(files.root()))
        .with_location("models/tagger-${language}.bin");

    provider.configure(&Context::new().with_language("en"))?;
    assert_eq!(provider.artifact().unwrap().as_str(), "english tagger");

    provider.configure(&Context::new().with_language("de"))?;
    assert_eq!(provider.artifact().unwrap().as_str(), "german tagger");
    Ok(())
}

#[test]
fn test_file_scheme_with_absolute_path() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    let files = TestFiles::new()?;
    let path = files.write("lexicon.txt", "entries")?;

    let provider = ResourceProvider::new("lexicon", TextProducer)
        .with_loader(FileLoader::new())
        .with_location(format!("file://{}", path.display()));

    provider.configure(&Context::new())?;
    assert_eq!(provider.artifact().unwrap().as_str(), "entries");
    Ok(())
}

#[test]
fn test_on_disk_redirect_descriptor() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    let files = TestFiles::new()?;
    files.write("current.desc", &redirect_to("models/v2.bin", &[("generation", "2")]))?;
    files.write("models/v2.bin", "version two weights")?;

    let provider = ResourceProvider::new("versioned", TextProducer)
        .with_loader(FileLoader::new().with_base_dir(files.root()))
        .with_location("current.desc");

    provider.configure(&Context::new())?;
    assert_eq!(provider.artifact().unwrap().as_str(), "version two weights");
    assert_eq!(provider.last_resolved_location().as_deref(), Some("models/v2.bin"));
    assert_eq!(provider.metadata_value("generation").as_deref(), Some("2"));
    Ok(())
}

#[test]
fn test_descriptor_comments_are_ignored() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    let files = TestFiles::new()?;
    let content = format!(
        "# mapping descriptor\n! legacy comment style\n\n{}",
        descriptor(&[("tagset", "universal")])
    );
    files.write("mapping.properties", &content)?;

    let provider = ResourceProvider::new("mapping", TextProducer)
        .with_loader(FileLoader::new().with_base_dir(files.root()))
        .with_location("mapping.properties");

    provider.configure(&Context::new())?;
    assert_eq!(provider.metadata_value("tagset").as_deref(), Some("universal"));
    assert_eq!(provider.artifact().unwrap().as_str(), content);
    Ok(())
}

#[test]
fn test_missing_file_is_resource_not_found() -> Result<()> {
    larc::test_utils::init_test_logging(None);

    let files = TestFiles::new()?;
    let provider = ResourceProvider::new("absent", TextProducer)
        .with_loader(FileLoader::new().with_base_dir(files.root()))
        .with_location("never-written.bin");

    let err = provider.configure(&Context::new()).unwrap_err();
    assert!(matches!(
        err,
        Error::ResourceNotFound { ref location } if location == "never-written.bin"
    ));
    Ok(())
}
