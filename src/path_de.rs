//! Deserialize with JSON-path context in error messages (config files, fixture suites).
use std::fmt;

use serde::de::DeserializeOwned;

/// A decode failure and where in the document it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathedError {
    pub path: String,
    pub message: String,
}

impl fmt::Display for PathedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at JSON path {} → {}", self.path, self.message)
    }
}

impl std::error::Error for PathedError {}

pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, PathedError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(pathed)
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, PathedError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(pathed)
}

fn pathed(err: serde_path_to_error::Error<serde_json::Error>) -> PathedError {
    PathedError {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Outer {
        #[allow(dead_code)]
        inner: Vec<Inner>,
    }

    #[derive(Debug, Deserialize)]
    struct Inner {
        #[allow(dead_code)]
        n: u32,
    }

    #[test]
    fn reports_the_failing_path() {
        let err = from_str_with_path::<Outer>(r#"{"inner": [{"n": 1}, {"n": "x"}]}"#).unwrap_err();
        assert_eq!(err.path, "inner[1].n");
        assert!(err.to_string().starts_with("at JSON path inner[1].n"));
    }

    #[test]
    fn slices_decode_too() {
        let ok = from_slice_with_path::<Outer>(br#"{"inner": []}"#);
        assert!(ok.is_ok());
    }
}
