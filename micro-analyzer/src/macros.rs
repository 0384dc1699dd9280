// Forward to whichever logging backend is enabled. Both understand `{}`.

macro_rules! info {
    ($($arg:tt)*) => {{
        #[cfg(feature = "logging")]
        defmt::info!($($arg)*);
        #[cfg(feature = "log")]
        log::info!($($arg)*);
    }};
}

macro_rules! debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "logging")]
        defmt::debug!($($arg)*);
        #[cfg(feature = "log")]
        log::debug!($($arg)*);
    }};
}
