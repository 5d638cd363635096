//! Speech-to-text input capability.
//!
//! The platform recognizer is injected as a [`SpeechRecognizer`]. When the
//! platform has none, the input runs with [`SpeechCapability::Unsupported`].
//! A capture is started explicitly and resolved by exactly one
//! [`SpeechEvent`]; every event ends with `listening == false`.

use crate::error::{AssistError, Result};

/// Platform speech recognizer.
pub trait SpeechRecognizer: Send {
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self);
}

/// Outcome reported by the platform for the current capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    Result(String),
    Error(String),
    End,
}

pub enum SpeechCapability {
    Supported(Box<dyn SpeechRecognizer>),
    Unsupported,
}

impl std::fmt::Debug for SpeechCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeechCapability::Supported(_) => f.write_str("SpeechCapability::Supported"),
            SpeechCapability::Unsupported => f.write_str("SpeechCapability::Unsupported"),
        }
    }
}

/// Listening state around an optional recognizer.
#[derive(Debug)]
pub struct SpeechInput {
    capability: SpeechCapability,
    listening: bool,
}

impl SpeechInput {
    pub fn new(capability: SpeechCapability) -> Self {
        Self {
            capability,
            listening: false,
        }
    }

    pub fn unsupported() -> Self {
        Self::new(SpeechCapability::Unsupported)
    }

    pub fn is_supported(&self) -> bool {
        matches!(self.capability, SpeechCapability::Supported(_))
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Starts a capture, or stops the running one.
    ///
    /// Returns the listening flag after the call. Stopping does not clear the
    /// flag: the recognizer reports `End`, which does.
    pub fn toggle(&mut self) -> Result<bool> {
        let recognizer = match &mut self.capability {
            SpeechCapability::Supported(recognizer) => recognizer,
            SpeechCapability::Unsupported => return Err(AssistError::SpeechUnsupported),
        };

        if self.listening {
            recognizer.stop();
            return Ok(true);
        }

        self.listening = true;
        if let Err(e) = recognizer.start() {
            self.listening = false;
            return Err(e);
        }
        Ok(true)
    }

    /// Applies a platform event to `input`. Transcripts are appended with a
    /// separating space when `input` already has text.
    pub fn handle_event(&mut self, event: SpeechEvent, input: &mut String) -> Result<()> {
        self.listening = false;
        match event {
            SpeechEvent::Result(transcript) => {
                if input.is_empty() {
                    input.push_str(&transcript);
                } else {
                    input.push(' ');
                    input.push_str(&transcript);
                }
                Ok(())
            }
            SpeechEvent::Error(reason) => {
                tracing::error!("[SpeechInput] Speech recognition error: {}", reason);
                Err(AssistError::Speech(reason))
            }
            SpeechEvent::End => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Calls {
        starts: usize,
        stops: usize,
    }

    struct FakeRecognizer {
        calls: Arc<Mutex<Calls>>,
        fail_start: bool,
    }

    impl SpeechRecognizer for FakeRecognizer {
        fn start(&mut self) -> Result<()> {
            self.calls.lock().unwrap().starts += 1;
            if self.fail_start {
                return Err(AssistError::Speech("microphone busy".to_string()));
            }
            Ok(())
        }

        fn stop(&mut self) {
            self.calls.lock().unwrap().stops += 1;
        }
    }

    fn supported(fail_start: bool) -> (SpeechInput, Arc<Mutex<Calls>>) {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let recognizer = FakeRecognizer {
            calls: calls.clone(),
            fail_start,
        };
        (
            SpeechInput::new(SpeechCapability::Supported(Box::new(recognizer))),
            calls,
        )
    }

    #[test]
    fn test_unsupported() {
        let mut speech = SpeechInput::unsupported();
        assert!(!speech.is_supported());
        assert_eq!(speech.toggle().unwrap_err(), AssistError::SpeechUnsupported);
        assert!(!speech.is_listening());
    }

    #[test]
    fn test_result_appends_and_stops_listening() {
        let (mut speech, calls) = supported(false);
        let mut input = "Tell me about".to_string();

        assert!(speech.toggle().unwrap());
        assert!(speech.is_listening());
        assert_eq!(calls.lock().unwrap().starts, 1);

        speech
            .handle_event(SpeechEvent::Result("RPA pricing".to_string()), &mut input)
            .unwrap();
        assert_eq!(input, "Tell me about RPA pricing");
        assert!(!speech.is_listening());
    }

    #[test]
    fn test_error_and_end_clear_listening() {
        let (mut speech, _) = supported(false);
        let mut input = String::new();

        speech.toggle().unwrap();
        assert!(speech
            .handle_event(SpeechEvent::Error("no-speech".to_string()), &mut input)
            .is_err());
        assert!(!speech.is_listening());

        speech.toggle().unwrap();
        speech.handle_event(SpeechEvent::End, &mut input).unwrap();
        assert!(!speech.is_listening());
        assert!(input.is_empty());
    }

    #[test]
    fn test_toggle_while_listening_stops() {
        let (mut speech, calls) = supported(false);
        speech.toggle().unwrap();
        speech.toggle().unwrap();
        assert_eq!(calls.lock().unwrap().stops, 1);
    }

    #[test]
    fn test_failed_start_resets_flag() {
        let (mut speech, _) = supported(true);
        assert!(speech.toggle().is_err());
        assert!(!speech.is_listening());
    }
}
