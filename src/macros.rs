// src/macros.rs

/// Owned `String` from anything `String: From` accepts; `s!()` is empty.
///
/// Used for category names, error payloads and record cells.
#[macro_export]
macro_rules! s {
    () => {
        ::std::string::String::new()
    };
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

/// Concatenate string slices into one owned `String`, e.g. file names:
/// `join!(category, ".", CSV_EXT)`.
#[macro_export]
macro_rules! join {
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut out = ::std::string::String::from($first);
        $( out.push_str(::core::convert::AsRef::<str>::as_ref(&$rest)); )+
        out
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn join_builds_file_names() {
        let category = s!("accept-oral");
        assert_eq!(join!(category.as_str(), ".", "csv"), "accept-oral.csv");
        assert_eq!(s!(), "");
    }
}
