//! Utility functions for number, date and string formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{
    age_display, format_delta, format_delta_decimal, format_grouped, format_indian_number,
    format_rupees, month_from_name, month_name, truncate,
};
