pub mod compile_time {
    pub mod catalog {
        /// Maximum catalog or tracker file size accepted for loading (16MB)
        /// SECURITY: Prevents memory exhaustion from oversized payloads
        pub const MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

        /// Maximum number of controls kept from a single catalog payload
        /// RESOURCE: NIST 800-53 rev5 has roughly 1200 controls + enhancements
        pub const MAX_CONTROLS: usize = 50_000;

        /// Maximum accepted control identifier length
        pub const MAX_CONTROL_ID_LENGTH: usize = 64;
    }

    pub mod query {
        /// Default quiescent interval for search input debouncing
        pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

        /// Upper bound for a configured debounce interval
        pub const MAX_DEBOUNCE_MS: u64 = 10_000;

        /// Default number of controls rendered per page
        pub const DEFAULT_PAGE_SIZE: usize = 12;

        /// Upper bound for a configured page size
        /// RESOURCE: Keeps a single rendered page bounded
        pub const MAX_PAGE_SIZE: usize = 500;

        /// Maximum search term length considered by the filter
        /// SECURITY: Bounds substring matching cost per keystroke
        pub const MAX_SEARCH_LENGTH: usize = 256;
    }

    pub mod logging {
        /// Memory logger ring buffer size
        pub const LOG_BUFFER_SIZE: usize = 10_000;

        /// Maximum log message length before truncation
        pub const MAX_LOG_MESSAGE_LENGTH: usize = 4_096;
    }
}
