use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("Cannot convert {from} to {to}")]
    IncompatibleUnits { from: String, to: String },
}

pub type CalcResult<T> = Result<T, CalcError>;

/// Shorthand for building a validation error from anything printable.
pub(crate) fn invalid<S: Into<String>>(message: S) -> CalcError {
    CalcError::Validation(message.into())
}

/// Rejects NaN and infinities with a message naming the offending input.
pub(crate) fn require_finite(name: &str, value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid(format!("{} must be a finite number", name)))
    }
}

pub(crate) fn require_positive(name: &str, value: f64) -> CalcResult<f64> {
    require_finite(name, value)?;
    if value <= 0.0 {
        return Err(invalid(format!("{} must be positive", name)));
    }
    Ok(value)
}

pub(crate) fn require_non_negative(name: &str, value: f64) -> CalcResult<f64> {
    require_finite(name, value)?;
    if value < 0.0 {
        return Err(invalid(format!("{} must not be negative", name)));
    }
    Ok(value)
}

pub(crate) fn require_percent(name: &str, value: f64) -> CalcResult<f64> {
    require_finite(name, value)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(invalid(format!("{} must be between 0 and 100 (got {})", name, value)));
    }
    Ok(value)
}
