// Process-wide environment table
//
// Every forked child inherits it; nothing a child does flows back.

use std::ffi::CString;
use std::io;

pub fn get_var(name: &str) -> Option<String> {
    std::env::var_os(name).map(|v| v.to_string_lossy().into_owned())
}

/// Set `name` to `value`, overwriting any existing value.
pub fn set_var(name: &str, value: &str) -> io::Result<()> {
    let c_name = CString::new(name).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let c_value = CString::new(value).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    // setenv rejects empty names and names containing '=' with EINVAL
    let ret = unsafe { libc::setenv(c_name.as_ptr(), c_value.as_ptr(), 1) };
    if ret == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Split `NAME=value` on the first `=`.
pub fn split_assignment(verb: &str) -> Option<(&str, &str)> {
    verb.split_once('=')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_split_assignment_first_equal() {
        assert_eq!(split_assignment("X=5"), Some(("X", "5")));
        assert_eq!(split_assignment("A=b=c"), Some(("A", "b=c")));
        assert_eq!(split_assignment("EMPTY="), Some(("EMPTY", "")));
        assert_eq!(split_assignment("plain"), None);
    }

    #[test]
    #[serial]
    fn test_set_and_get() {
        set_var("MINISH_ENV_TEST", "first").unwrap();
        set_var("MINISH_ENV_TEST", "second").unwrap();
        assert_eq!(get_var("MINISH_ENV_TEST").as_deref(), Some("second"));
    }

    #[test]
    #[serial]
    fn test_set_empty_name_fails() {
        assert!(set_var("", "value").is_err());
    }
}
