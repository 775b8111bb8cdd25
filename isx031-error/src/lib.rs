//! Unified error handling for the ISX031 sensor control crates
//!
//! This crate provides a single error type used across all components.
//! It uses thiserror for ergonomic error definitions with proper Display and Error trait impls.

use std::io;
use std::path::PathBuf;

/// Result type alias using Isx031Error
pub type Result<T> = std::result::Result<T, Isx031Error>;

/// Unified error type for all sensor control operations
#[derive(thiserror::Error, Debug)]
pub enum Isx031Error {
    // ============================================================================
    // I/O and Register Bus Errors
    // ============================================================================
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("bus transfer incomplete: {0}")]
    BusTransfer(String),

    #[error("register access length {len} out of range (1-4)")]
    InvalidLength { len: u16 },

    #[error("failed to open bus device {path}: {source}")]
    BusOpen {
        path: PathBuf,
        source: io::Error,
    },

    // ============================================================================
    // Power Sequencing Errors
    // ============================================================================
    #[error("sensor did not power on: {0}")]
    PowerOnTimeout(String),

    #[error("GPIO access failed at {path}: {reason}")]
    Gpio {
        path: PathBuf,
        reason: String,
    },

    // ============================================================================
    // Identification Errors
    // ============================================================================
    #[error("invalid module ID: expected 0x{expected:04X}, got 0x{found:04X}")]
    ModuleMismatch {
        expected: u16,
        found: u16,
    },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("no drive mode for {lanes} lanes at {fps} fps")]
    DriveModeNotFound {
        lanes: u8,
        fps: u32,
    },

    #[error("invalid configuration value for {field}: {reason}")]
    InvalidConfig {
        field: String,
        reason: String,
    },

    #[error("failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: io::Error,
    },

    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: io::Error,
    },

    #[error("file too large: {path} ({size} bytes, max {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Generic(String),
}

impl Isx031Error {
    /// Create a generic error from a string
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic(msg.into())
    }

    /// Create a bus transfer error from a string
    pub fn bus_transfer(msg: impl Into<String>) -> Self {
        Self::BusTransfer(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a GPIO error
    pub fn gpio(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Gpio {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

// Allow converting from String to Isx031Error
impl From<String> for Isx031Error {
    fn from(s: String) -> Self {
        Self::Generic(s)
    }
}

// Allow converting from &str to Isx031Error
impl From<&str> for Isx031Error {
    fn from(s: &str) -> Self {
        Self::Generic(s.to_string())
    }
}
