//! Designer requests forwarded to the engine

use bytes::Bytes;

use crate::domain::parameter::ParameterBag;

/// Designer sub-operation answered with a downloadable scheme document
pub const DOWNLOAD_SCHEME_OPERATION: &str = "downloadscheme";

/// Opaque designer call: merged parameters plus the first uploaded file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesignerRequest {
    pub parameters: ParameterBag,
    pub file: Option<Bytes>,
}

impl DesignerRequest {
    pub fn new(parameters: ParameterBag) -> Self {
        Self {
            parameters,
            file: None,
        }
    }

    pub fn with_file(mut self, file: Option<Bytes>) -> Self {
        self.file = file;
        self
    }

    pub fn operation(&self) -> Option<&str> {
        self.parameters.get("operation")
    }

    /// Whether the response must be sent as a scheme download
    pub fn is_download(&self) -> bool {
        self.operation() == Some(DOWNLOAD_SCHEME_OPERATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_download_matches_exact_operation() {
        let request = DesignerRequest::new([("operation", "downloadscheme")].into_iter().collect());
        assert!(request.is_download());

        let request = DesignerRequest::new([("operation", "DownloadScheme")].into_iter().collect());
        assert!(!request.is_download());

        assert!(!DesignerRequest::default().is_download());
    }
}
