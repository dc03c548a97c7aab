//! Unit tests for error.rs
//!
//! Tests all Error variants and the engine_err!/engine_bail! macros.

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("framebuffer incomplete".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("framebuffer incomplete"));
}

#[test]
fn test_out_of_memory_display() {
    let err = Error::OutOfMemory;
    assert_eq!(format!("{}", err), "Out of GPU memory");
}

#[test]
fn test_invalid_resource_display() {
    let err = Error::InvalidResource("Texture not found".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid resource"));
    assert!(display.contains("Texture not found"));
}

#[test]
fn test_invalid_configuration_display() {
    let err = Error::InvalidConfiguration("Unknown blend kind 'multiply'".to_string());
    let display = format!("{}", err);
    assert!(display.starts_with("Invalid configuration"));
    assert!(display.contains("multiply"));
}

// ============================================================================
// TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::OutOfMemory;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_clone() {
    let err1 = Error::InitializationFailed("no device".to_string());
    let err2 = err1.clone();
    assert_eq!(format!("{}", err1), format!("{}", err2));
}

// ============================================================================
// MACROS
// ============================================================================

fn bail_with_default_variant() -> Result<()> {
    crate::engine_bail!("nova3d::Test", "failed with code {}", 7);
}

fn bail_with_explicit_variant() -> Result<u32> {
    crate::engine_bail!("nova3d::Test", InvalidConfiguration => "bad kind '{}'", "hexagons");
}

#[test]
fn test_engine_bail_default_variant() {
    match bail_with_default_variant() {
        Err(Error::BackendError(msg)) => assert_eq!(msg, "failed with code 7"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_engine_bail_explicit_variant() {
    match bail_with_explicit_variant() {
        Err(Error::InvalidConfiguration(msg)) => assert!(msg.contains("hexagons")),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_engine_err_builds_value() {
    let err = crate::engine_err!("nova3d::Test", InvalidResource => "missing '{}'", "tDiffuse");
    assert!(matches!(err, Error::InvalidResource(ref m) if m == "missing 'tDiffuse'"));
}
