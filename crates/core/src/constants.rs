/// Storage key of the raw disposal sequence.
pub const DISPOSALS_STORAGE_KEY: &str = "formulaire_2086";

/// Storage key holding a stored disposal value that could not be fully decoded,
/// kept before the sequence is next written.
pub const DISPOSALS_BACKUP_STORAGE_KEY: &str = "formulaire_2086_sauvegarde";

/// Storage key of the last computed aggregate gain or loss.
pub const GAIN_TOTAL_STORAGE_KEY: &str = "pv";

/// Storage key of the capital fraction carried over from the previous filing.
pub const CARRY_IN_FRACTION_STORAGE_KEY: &str = "fraction_capital_initiale";

/// Flat tax rate ("prélèvement forfaitaire unique") applied to the aggregate.
pub const FLAT_TAX_RATE: f64 = 0.30;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Suffix appended to every displayed amount.
pub const CURRENCY_SUFFIX: &str = "€";

/// Date format of disposal dates, both in storage and in edit requests.
pub const DISPOSAL_DATE_FORMAT: &str = "%Y-%m-%d";
