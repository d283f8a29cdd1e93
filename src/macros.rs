// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!
    () => {
        ::std::string::String::new()
    };
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

#[macro_export]
macro_rules! non_empty {
    // Cleaned text → Option<String>; "" becomes None.
    ($expr:expr) => {{
        let v: ::std::string::String = ::std::string::String::from($expr);
        if v.is_empty() { None } else { Some(v) }
    }};
}
