// src/macros.rs

/// Logs a line tagged with a component, on top of the fern format that
/// already carries timestamp, level, pid and tid.
/// Usage:
/// ```ignore
/// use log::Level;
/// netguard::netguard_log!(Level::Info, "registry", "Store ready");
/// netguard::netguard_log!(Level::Warn, "unknown", "Unclassifiable address {}", addr);
/// ```
/// The format string cannot capture variables inline (`{addr}`); pass them
/// as arguments.
///
/// Logs like:
/// ```text
/// [2025-04-25T16:32:10+02:00][INFO ][netguard::network::registry][pid=4568][tid=ThreadId(1)] [registry] Store ready
/// ```
#[macro_export]
macro_rules! netguard_log {
    ($level:expr, $component:literal, $fmt:literal $(, $($arg:tt)+)?) => {
        ::log::log!(
            $level,
            concat!("[", $component, "] ", $fmt)
            $(, $($arg)+)?
        )
    };
}
