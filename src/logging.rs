//! Logging abstraction
//!
//! Provides unified logging macros that work across different targets:
//! - Embedded (`defmt` feature): Uses defmt
//! - Host tests: Uses println!
//! - Host non-test: No-op

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        ::defmt::info!($($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        {
            extern crate std;
            std::println!("[INFO] {}", std::format!($($arg)*));
        }
    };
}

/// Log warning message
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        {
            extern crate std;
            std::println!("[WARN] {}", std::format!($($arg)*));
        }
    };
}

/// Log error message
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        ::defmt::error!($($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        {
            extern crate std;
            std::eprintln!("[ERROR] {}", std::format!($($arg)*));
        }
    };
}

/// Log debug message
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($arg)*);

        #[cfg(all(not(feature = "defmt"), test))]
        {
            extern crate std;
            std::println!("[DEBUG] {}", std::format!($($arg)*));
        }
    };
}
