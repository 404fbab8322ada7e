use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{what}: declared {declared}, found {actual}")]
    CountMismatch {
        what: &'static str,
        declared: u64,
        actual: u64,
    },
    #[error("{field} is too large to count exactly")]
    Overflow { field: &'static str },
    #[error("utilization {0} saturates the link")]
    Saturated(f64),
    #[error("{0} collisions exceeds the 16 attempts allowed before abort")]
    ExcessiveCollisions(u32),
    #[error("invalid hex token '{0}', expected two hex digits followed by 'h'")]
    InvalidHexToken(String),
    #[error("symbol '{0}' has no hex value in the symbol table")]
    UnknownSymbol(String),
    #[error("invalid IPv4 address '{0}'")]
    InvalidAddress(String),
    #[error("routing prefix '{0}' may only contain 0, 1 and spaces")]
    InvalidPrefix(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::NotFinite { field })
    }
}

/// Rejects anything that cannot be used as a divisor or a size.
pub(crate) fn positive(field: &'static str, value: f64) -> Result<f64> {
    if finite(field, value)? > 0.0 {
        Ok(value)
    } else {
        Err(Error::NotPositive { field, value })
    }
}

pub(crate) fn non_negative(field: &'static str, value: f64) -> Result<f64> {
    if finite(field, value)? >= 0.0 {
        Ok(value)
    } else {
        Err(Error::Negative { field, value })
    }
}

pub(crate) fn nonzero(field: &'static str, value: u64) -> Result<u64> {
    if value == 0 {
        Err(Error::NotPositive {
            field,
            value: 0.0,
        })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guards() {
        assert_eq!(positive("rate", 2.0), Ok(2.0));
        assert_eq!(
            positive("rate", 0.0),
            Err(Error::NotPositive {
                field: "rate",
                value: 0.0
            })
        );
        assert_eq!(
            positive("rate", f64::NAN),
            Err(Error::NotFinite { field: "rate" })
        );
        assert!(non_negative("start", 0.0).is_ok());
        assert!(non_negative("start", -0.5).is_err());
        assert!(nonzero("count", 0).is_err());
    }

    #[test]
    fn messages_name_the_field() {
        let err = Error::CountMismatch {
            what: "sender_count vs file sizes",
            declared: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "sender_count vs file sizes: declared 3, found 2");
    }
}
