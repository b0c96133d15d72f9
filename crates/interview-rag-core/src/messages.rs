use interview_rag_synthesis::SynthesisErrorKind;

/// The fixed text shown in place of an answer when synthesis fails.
///
/// Upstream details are never surfaced here; they go to the log.
pub fn failure_message(kind: SynthesisErrorKind) -> &'static str {
    match kind {
        SynthesisErrorKind::Configuration => {
            "Gemini API key not configured. An operator needs to set the GEMINI_API_KEY environment variable and restart the assistant."
        }
        SynthesisErrorKind::Network => {
            "Network error: could not reach the Gemini API. Please check your connection and try again."
        }
        SynthesisErrorKind::Timeout => {
            "The Gemini API did not respond in time. Please check your connection and try again."
        }
        SynthesisErrorKind::Upstream | SynthesisErrorKind::MalformedResponse => {
            "Something went wrong while generating a response. Please try again."
        }
        SynthesisErrorKind::Cancelled => "Request cancelled before a response arrived.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_message_addresses_operator() {
        let message = failure_message(SynthesisErrorKind::Configuration);
        assert!(message.contains("GEMINI_API_KEY"));
        assert!(!message.contains("try again"));
    }

    #[test]
    fn test_network_message_suggests_retry() {
        assert!(failure_message(SynthesisErrorKind::Network).contains("try again"));
    }

    #[test]
    fn test_upstream_message_is_generic() {
        assert_eq!(
            failure_message(SynthesisErrorKind::Upstream),
            failure_message(SynthesisErrorKind::MalformedResponse)
        );
        assert!(failure_message(SynthesisErrorKind::Upstream).starts_with("Something went wrong"));
    }
}
