pub mod format_utils;
pub mod number_utils;
