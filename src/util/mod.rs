#[macro_export]
#[cfg(debug_assertions)]
macro_rules! println_debug {
    ($($x:tt)*) => {{
        eprint!("[debug] ");
        eprintln!($($x)*);
    }}
}

#[macro_export]
#[cfg(not(debug_assertions))]
macro_rules! println_debug {
    ($($x:tt)*) => {}
}

/// Prints a log line to stderr if `$enabled` is true, regardless of build profile.
#[macro_export]
macro_rules! verbose {
    ($enabled:expr, $($x:tt)*) => {{
        if $enabled {
            eprint!("[verbose] ");
            eprintln!($($x)*);
        }
    }}
}

#[inline]
pub fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

#[inline]
pub fn is_numeric(c: char) -> bool {
    c.is_ascii_digit()
}

#[inline]
pub fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[inline]
pub fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}
