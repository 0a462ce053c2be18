//! Shared constants.

/// Application name, used for cache directories and environment variables.
pub const APP_NAME: &str = "compbuild";

/// Environment variable that overrides the cache root.
pub const CACHE_DIR_ENV: &str = "COMPBUILD_CACHE_DIR";

/// Workspace settings file name.
pub const SETTINGS_FILENAME: &str = "compbuild.json";

/// Primary package-level override file.
pub const FILENAME_TSCONFIG: &str = "tsconfig.json";

/// Secondary package-level override file, consulted only when the primary is absent.
pub const FILENAME_TSCONFIG_BUILD: &str = "tsconfig.build.json";

/// Default output directory name, relative to each package directory.
pub const DEFAULT_DIST_DIRNAME: &str = "dist";

/// Default compiler id, also the last segment of the cache root.
pub const DEFAULT_COMPILER_ID: &str = "typescript";

/// Patterns excluded from every component build.
pub const DEFAULT_BUILD_IGNORE_PATTERNS: &[&str] = &["**/__docs__/**", "**/__test__/**", "**/__tests__/**"];

/// Extension every compiled file is emitted with.
pub const OUTPUT_EXTENSION: &str = "js";

/// Length of the fingerprint stamp file names (hex chars of the config path hash).
pub const STAMP_NAME_LEN: usize = 20;
