//! Particle field error types.

/// Errors that can occur while building a particle field.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    /// Template is not of the form `rgba(R, G, B, %opacity%)`
    #[error("Invalid color template '{0}': expected rgba(R, G, B, %opacity%)")]
    InvalidTemplate(String),

    /// Template has no opacity slot, or more than one
    #[error("Color template '{template}' must contain exactly one %opacity% slot, found {found}")]
    OpacitySlot { template: String, found: usize },

    /// A color channel is outside 0..=255
    #[error("Color channel {channel} out of range in '{template}'")]
    ChannelOutOfRange { template: String, channel: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_display() {
        let error = FieldError::InvalidTemplate("hsl(1, 2, 3)".to_string());
        assert!(error.to_string().contains("hsl(1, 2, 3)"));

        let error = FieldError::OpacitySlot {
            template: "rgba(1, 2, 3, 0.5)".to_string(),
            found: 0,
        };
        assert!(error.to_string().contains("exactly one %opacity%"));
        assert!(error.to_string().contains("found 0"));

        let error = FieldError::ChannelOutOfRange {
            template: "rgba(300, 2, 3, %opacity%)".to_string(),
            channel: "300".to_string(),
        };
        assert!(error.to_string().contains("300"));
    }
}
