// src/macros.rs

/// `String` shorthand: `s!()` is empty, `s!(x)` is `String::from(x)`.
#[macro_export]
macro_rules! s {
    () => { ::std::string::String::new() };
    ($expr:expr) => { ::std::string::String::from($expr) };
}

/// Concatenate string slices into a new `String`.
#[macro_export]
macro_rules! join {
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut out = ::std::string::String::from($first);
        $( out.push_str($rest); )+
        out
    }};
}

/// `qerr!(Format, "line {n}: ...")` builds a `QualisError` variant from a format string.
#[macro_export]
macro_rules! qerr {
    ($kind:ident, $($arg:tt)*) => {
        $crate::error::QualisError::$kind(::std::format!($($arg)*))
    };
}
