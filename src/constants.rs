//! Application constants for census tally
//!
//! This module contains the default catalogs, bracket presets, column naming
//! conventions and default values used throughout the engine. Everything
//! here is only a default: the engine receives catalogs and bracket lists
//! through [`crate::config::EngineConfig`].

// =============================================================================
// Area Catalog
// =============================================================================

/// Default area catalog (barangays), in canonical export order
pub const DEFAULT_AREAS: &[&str] = &[
    "Aplaya",
    "Balabag",
    "Binaton",
    "Cogon",
    "Colorado",
    "Dawis",
    "Dulangan",
    "Goma",
    "Igpit",
    "Kapatagan",
    "Kiagot",
    "Lungag",
    "Mahayahay",
    "Matti",
];

/// Default name of the column holding the area code
pub const DEFAULT_AREA_COLUMN: &str = "BARANGAY";

// =============================================================================
// Age Bracket Presets
// =============================================================================

/// Bracket preset identifiers accepted in configuration files
pub mod presets {
    /// Coarse preset used by the import/export engine
    pub const COARSE: &str = "coarse";

    /// Fine-grained preset used by the analytics screens
    pub const FINE: &str = "fine";
}

/// Coarse bracket list as `(code, label)` pairs, in canonical order
pub const COARSE_BRACKETS: &[(&str, &str)] = &[
    ("UNDER_1", "UNDER 1"),
    ("1_4", "1-4"),
    ("5_9", "5-9"),
    ("10_14", "10-14"),
    ("15_19", "15-19"),
    ("20_24", "20-24"),
    ("25_29", "25-29"),
];

/// Fine-grained bracket list as `(code, label)` pairs, in canonical order
///
/// Shares its first seven entries with [`COARSE_BRACKETS`] but is not a
/// refinement of it; the two lists are kept apart on purpose.
pub const FINE_BRACKETS: &[(&str, &str)] = &[
    ("UNDER_1", "UNDER 1"),
    ("1_4", "1-4"),
    ("5_9", "5-9"),
    ("10_14", "10-14"),
    ("15_19", "15-19"),
    ("20_24", "20-24"),
    ("25_29", "25-29"),
    ("30_34", "30-34"),
    ("35_39", "35-39"),
    ("40_44", "40-44"),
    ("45_49", "45-49"),
    ("50_54", "50-54"),
    ("55_59", "55-59"),
    ("60_64", "60-64"),
    ("65_69", "65-69"),
    ("70_74", "70-74"),
    ("75_79", "75-79"),
    ("80_84", "80-84"),
    ("85_89", "85-89"),
    ("90_AND_OVER", "90 AND OVER"),
];

// =============================================================================
// Column Naming
// =============================================================================

/// Column suffixes appended to a bracket label (`"<label> <suffix>"`)
pub mod suffixes {
    pub const MALE: &str = "M";
    pub const FEMALE: &str = "F";
    pub const TOTAL: &str = "TOTAL";
}

/// Grand-total column names
pub mod grand_total_columns {
    pub const MALE: &str = "TOTAL M";
    pub const FEMALE: &str = "TOTAL F";
    pub const TOTAL: &str = "TOTAL";
}

/// Area label written on the synthetic grand-total export row
pub const GRAND_TOTAL_ROW_LABEL: &str = "TOTAL";

// =============================================================================
// Engine Defaults
// =============================================================================

/// Largest count accepted in a single cell
///
/// Keeps every per-row sum well inside `u64`.
pub const MAX_CELL_COUNT: u64 = 1_000_000_000_000;

/// Number of zero-count rows added to a generated template after the example row
pub const DEFAULT_TEMPLATE_BLANK_ROWS: usize = 3;

/// Maximum number of per-record failure messages reported to the user
pub const DEFAULT_MAX_REPORTED_FAILURES: usize = 10;

/// Directory name used under the user data directory for the default record store
pub const DATA_DIR_NAME: &str = "census-tally";

/// Default record store filename (JSON lines)
pub const DEFAULT_STORE_FILENAME: &str = "records.jsonl";

/// Configuration file looked up under the user config directory when `--config` is absent
pub const DEFAULT_CONFIG_FILENAME: &str = "config.json";
