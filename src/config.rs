//! Command-line configuration for rawprobe.
//!
//! Options can be given as flags or through environment variables with the
//! `RAWPROBE_` prefix:
//!
//! - `RAWPROBE_MAX_IFDS` - Maximum IFDs parsed per file (default: 100)
//! - `RAWPROBE_MAX_DEPTH` - Maximum sub-IFD nesting depth (default: 10)
//! - `RAWPROBE_JSON` - Print one JSON object per file (default: false)

use std::path::PathBuf;

use clap::Parser;

use crate::format::tiff::{ParseLimits, DEFAULT_MAX_IFDS, DEFAULT_MAX_SUB_IFD_DEPTH};

// =============================================================================
// Default Values
// =============================================================================

/// Upper bound accepted for `--max-ifds`.
pub const MAX_IFDS_CEILING: usize = 65_536;

/// Upper bound accepted for `--max-depth`.
pub const MAX_DEPTH_CEILING: usize = 64;

// =============================================================================
// CLI Arguments
// =============================================================================

/// rawprobe - identify camera RAW files.
///
/// Parses the TIFF container of each file, walks its directory tree and
/// reports which RAW decoder would handle it.
#[derive(Parser, Debug, Clone)]
#[command(name = "rawprobe")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Files to probe.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    // =========================================================================
    // Parse Limits
    // =========================================================================
    /// Maximum number of IFDs parsed per file, sub-IFDs included.
    #[arg(long, default_value_t = DEFAULT_MAX_IFDS, env = "RAWPROBE_MAX_IFDS")]
    pub max_ifds: usize,

    /// Maximum sub-IFD nesting depth.
    #[arg(long, default_value_t = DEFAULT_MAX_SUB_IFD_DEPTH, env = "RAWPROBE_MAX_DEPTH")]
    pub max_depth: usize,

    // =========================================================================
    // Output
    // =========================================================================
    /// Print one JSON object per file instead of text.
    #[arg(long, default_value_t = false, env = "RAWPROBE_JSON")]
    pub json: bool,

    /// Dump the directory tree of each file.
    #[arg(long, default_value_t = false)]
    pub tree: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.files.is_empty() {
            return Err("At least one file is required".to_string());
        }

        if self.max_ifds == 0 || self.max_ifds > MAX_IFDS_CEILING {
            return Err(format!("max_ifds must be between 1 and {}", MAX_IFDS_CEILING));
        }

        if self.max_depth > MAX_DEPTH_CEILING {
            return Err(format!("max_depth must be at most {}", MAX_DEPTH_CEILING));
        }

        if self.json && self.tree {
            return Err("--tree cannot be combined with --json".to_string());
        }

        Ok(())
    }

    /// Parse limits to apply to every file.
    pub fn parse_limits(&self) -> ParseLimits {
        ParseLimits {
            max_ifds: self.max_ifds,
            max_sub_ifd_depth: self.max_depth,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
