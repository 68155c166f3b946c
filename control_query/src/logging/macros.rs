//! Type-safe logging macros using Code types with Display support

/// Log error with Code type - accepts Display types for context values
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr) => {
        $crate::logging::log_with_context(
            $crate::logging::LogLevel::Error,
            $code,
            $message,
            vec![],
        )
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_with_context(
                $crate::logging::LogLevel::Error,
                $code,
                $message,
                context_refs,
            )
        }
    };
}

/// Log warning with Code type
#[macro_export]
macro_rules! log_warning {
    ($code:expr, $message:expr) => {
        $crate::logging::log_with_context(
            $crate::logging::LogLevel::Warning,
            $code,
            $message,
            vec![],
        )
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_with_context(
                $crate::logging::LogLevel::Warning,
                $code,
                $message,
                context_refs,
            )
        }
    };
}

/// Log success with Code type
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr) => {
        $crate::logging::log_with_context(
            $crate::logging::LogLevel::Info,
            $code,
            $message,
            vec![],
        )
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_with_context(
                $crate::logging::LogLevel::Info,
                $code,
                $message,
                context_refs,
            )
        }
    };
}

/// Log informational message without a specific code
#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        $crate::logging::log_with_context(
            $crate::logging::LogLevel::Info,
            $crate::logging::Code::new("I000"),
            $message,
            vec![],
        )
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_with_context(
                $crate::logging::LogLevel::Info,
                $crate::logging::Code::new("I000"),
                $message,
                context_refs,
            )
        }
    };
}

/// Log debug message with Code type; context is only formatted when debug is enabled
#[macro_export]
macro_rules! log_debug {
    ($code:expr, $message:expr) => {
        if $crate::logging::debug_enabled() {
            $crate::logging::log_with_context(
                $crate::logging::LogLevel::Debug,
                $code,
                $message,
                vec![],
            )
        }
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        if $crate::logging::debug_enabled() {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings.iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_with_context(
                $crate::logging::LogLevel::Debug,
                $code,
                $message,
                context_refs,
            )
        }
    };
}
