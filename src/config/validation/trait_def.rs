//! Validation trait definition

/// Validation trait for configuration structures
pub trait Validate {
    /// Check the structure, describing the first problem found
    fn validate(&self) -> Result<(), String>;
}
