//! Logging macros
//!
//! Every macro builds a [`LogEvent`](crate::logging::LogEvent) and hands it to
//! [`emit`](crate::logging::emit) together with `"key" => value` context
//! pairs. Values only need `Display`. Nothing is formatted until the global
//! logger exists.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_emit {
    ($event:expr $(, $key:expr => $value:expr)*) => {
        if $crate::logging::is_initialized() {
            let context: Vec<(&str, String)> = vec![$(($key, $value.to_string())),*];
            $crate::logging::emit($event, &context);
        }
    };
}

/// `log_error!(code, message, span = span, "key" => value)`
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr, span = $span:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__log_emit!(
            $crate::logging::LogEvent::error($code, $message).with_span($span)
            $(, $key => $value)*
        )
    };
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__log_emit!($crate::logging::LogEvent::error($code, $message) $(, $key => $value)*)
    };
}

/// `log_warning!(code = code, message, span = span, "key" => value)`; code and
/// span are optional
#[macro_export]
macro_rules! log_warning {
    (code = $code:expr, $message:expr, span = $span:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__log_emit!(
            $crate::logging::LogEvent::warning_with_code($code, $message).with_span($span)
            $(, $key => $value)*
        )
    };
    (code = $code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__log_emit!(
            $crate::logging::LogEvent::warning_with_code($code, $message)
            $(, $key => $value)*
        )
    };
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__log_emit!($crate::logging::LogEvent::warning($message) $(, $key => $value)*)
    };
}

#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__log_emit!($crate::logging::LogEvent::success($code, $message) $(, $key => $value)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::__log_emit!($crate::logging::LogEvent::info($message) $(, $key => $value)*)
    };
}

/// Debug events are dropped before formatting unless the level allows them
#[macro_export]
macro_rules! log_debug {
    ($message:expr $(, $key:expr => $value:expr)* $(,)?) => {
        if $crate::logging::config::get_min_log_level() >= $crate::logging::LogLevel::Debug {
            $crate::__log_emit!($crate::logging::LogEvent::debug($message) $(, $key => $value)*)
        }
    };
}

/// Success event for a timed stage, with `duration_ms` added to the context
#[macro_export]
macro_rules! log_performance {
    ($code:expr, $message:expr, duration = $duration:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::log_success!($code, $message,
            "duration_ms" => $duration.as_secs_f64() * 1000.0
            $(, $key => $value)*
        )
    };
}
