//! Read-along playback state machine
//!
//! The pure core of the read-along controller: a transition function over
//! `(state, event)` that yields the adapter commands to issue and the signals
//! to surface. All side effects (speaking, listening) live behind ports in the
//! application layer; this module never touches them, which keeps every
//! transition testable without audio hardware.
//!
//! Phases:
//! - `Idle`: nothing in flight. Entered on pause, restart, completion, and any
//!   adapter failure. Always re-enterable via start.
//! - `Speaking`: an utterance for the current word is in flight.
//! - `Listening`: a recognition session is waiting for the child's attempt.
//! - `Transitioning`: an accepted attempt advanced the word index and the next
//!   utterance has been requested but not yet started.
//!
//! Invariant: at most one utterance and one listening session are outstanding
//! at any time. The machine enforces this by emitting a stop/cancel command
//! before every new speak/listen command of the same kind.

use serde::Serialize;

use crate::{matcher, value_objects::SpeechRate};

/// Playback phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Nothing in flight
    Idle,
    /// Speaking the current word
    Speaking,
    /// Listening for the child's attempt
    Listening,
    /// Accepted attempt, next utterance requested
    Transitioning,
}

/// Why a listening session failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum ListenFailure {
    /// No speech detected before the recognizer timed out (recoverable)
    NoSpeech,
    /// Microphone permission denied (not recoverable without user action)
    PermissionDenied,
    /// Recognition capability is not available on this platform
    Unavailable,
    /// Any other engine-reported recognition error
    Recognition(String),
}

/// An event delivered to the state machine
///
/// User commands and adapter completions arrive through the same funnel, in
/// strict arrival order. Adapter errors are events here, never panics.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// Start or resume playback
    Start,
    /// Pause playback
    Pause,
    /// Restart from the first word
    Restart,
    /// Adjust the speech rate
    SetRate(SpeechRate),
    /// The user granted microphone access
    MicrophoneGranted,
    /// The requested utterance began playing
    SpeechStarted,
    /// The current utterance finished
    SpeechEnded,
    /// The current utterance failed mid-flight
    SpeechFailed(String),
    /// The recognizer produced a transcript update
    TranscriptReceived(String),
    /// The listening session ended without a usable transcript
    ListeningEnded,
    /// The listening session failed
    ListeningFailed(ListenFailure),
}

/// A side effect the controller must carry out via its adapters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackCommand {
    /// Speak the word at this index
    Speak { index: usize },
    /// Cancel any in-flight utterance
    CancelSpeech,
    /// Begin a listening session
    StartListening,
    /// Stop the active listening session
    StopListening,
}

/// A user-facing notification emitted by a transition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "signal")]
pub enum PlaybackSignal {
    /// The child read the word; playback moved to `index`
    WordAdvanced { index: usize },
    /// The attempt did not match; the word at `index` is being repeated
    WordRetry { index: usize },
    /// The final word was read; the session is complete
    Completed,
    /// Speech synthesis failed; playback fell back to idle
    SynthesisFault { reason: String },
    /// Listening failed; playback fell back to idle
    ListeningFault { failure: ListenFailure },
}

/// Result of applying one event: commands to execute and signals to surface
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Step {
    pub commands: Vec<PlaybackCommand>,
    pub signals: Vec<PlaybackSignal>,
}

impl Step {
    fn none() -> Self {
        Self::default()
    }
}

/// The controller's per-session state
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    word_index: usize,
    phase: Phase,
    mic_permission: bool,
    last_transcript: Option<String>,
    rate: SpeechRate,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackState {
    /// Initial state: idle at the first word, microphone not yet confirmed
    pub fn new() -> Self {
        Self {
            word_index: 0,
            phase: Phase::Idle,
            mic_permission: false,
            last_transcript: None,
            rate: SpeechRate::default(),
        }
    }

    /// Current word index, always within `[0, words.len())` for a non-empty story
    pub const fn word_index(&self) -> usize {
        self.word_index
    }

    /// Current playback phase
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether microphone access has been confirmed
    pub const fn microphone_granted(&self) -> bool {
        self.mic_permission
    }

    /// The most recent transcript heard, if any
    pub fn last_transcript(&self) -> Option<&str> {
        self.last_transcript.as_deref()
    }

    /// Current speech rate
    pub const fn rate(&self) -> SpeechRate {
        self.rate
    }

    /// Apply one event, mutating the state and returning the commands and
    /// signals the transition produced.
    ///
    /// Total over all `(state, event)` pairs: events that make no sense in the
    /// current phase (e.g. a transcript arriving after listening stopped) are
    /// discarded as stale.
    pub fn apply(&mut self, event: PlaybackEvent, words: &[String]) -> Step {
        match event {
            PlaybackEvent::Start => self.on_start(words),
            PlaybackEvent::Pause => self.on_pause(),
            PlaybackEvent::Restart => self.on_restart(),
            PlaybackEvent::SetRate(rate) => {
                self.rate = rate;
                Step::none()
            },
            PlaybackEvent::MicrophoneGranted => {
                self.mic_permission = true;
                Step::none()
            },
            PlaybackEvent::SpeechStarted => {
                if self.phase == Phase::Transitioning {
                    self.phase = Phase::Speaking;
                }
                Step::none()
            },
            PlaybackEvent::SpeechEnded => self.on_speech_ended(words),
            PlaybackEvent::SpeechFailed(reason) => self.on_speech_failed(reason),
            PlaybackEvent::TranscriptReceived(text) => self.on_transcript(&text, words),
            PlaybackEvent::ListeningEnded => {
                if self.phase == Phase::Listening {
                    self.phase = Phase::Idle;
                }
                Step::none()
            },
            PlaybackEvent::ListeningFailed(failure) => self.on_listening_failed(failure),
        }
    }

    fn on_start(&mut self, words: &[String]) -> Step {
        if self.phase != Phase::Idle || words.is_empty() {
            return Step::none();
        }

        self.phase = Phase::Speaking;
        Step {
            commands: vec![PlaybackCommand::Speak {
                index: self.word_index,
            }],
            signals: vec![],
        }
    }

    fn on_pause(&mut self) -> Step {
        let commands = match self.phase {
            Phase::Idle => return Step::none(),
            Phase::Speaking | Phase::Transitioning => vec![PlaybackCommand::CancelSpeech],
            Phase::Listening => vec![PlaybackCommand::StopListening],
        };

        self.phase = Phase::Idle;
        Step {
            commands,
            signals: vec![],
        }
    }

    fn on_restart(&mut self) -> Step {
        self.word_index = 0;
        self.phase = Phase::Idle;
        self.last_transcript = None;

        // Both adapters are told to stand down unconditionally; cancel and
        // stop are no-ops when nothing is in flight, which keeps restart
        // idempotent.
        Step {
            commands: vec![
                PlaybackCommand::CancelSpeech,
                PlaybackCommand::StopListening,
            ],
            signals: vec![],
        }
    }

    fn on_speech_ended(&mut self, words: &[String]) -> Step {
        if self.phase != Phase::Speaking {
            return Step::none();
        }

        if self.mic_permission {
            self.phase = Phase::Listening;
            return Step {
                commands: vec![PlaybackCommand::StartListening],
                signals: vec![],
            };
        }

        // Read-only playback: without microphone access the words are spoken
        // straight through, never listening.
        if self.word_index + 1 < words.len() {
            self.word_index += 1;
            Step {
                commands: vec![PlaybackCommand::Speak {
                    index: self.word_index,
                }],
                signals: vec![PlaybackSignal::WordAdvanced {
                    index: self.word_index,
                }],
            }
        } else {
            self.phase = Phase::Idle;
            Step {
                commands: vec![],
                signals: vec![PlaybackSignal::Completed],
            }
        }
    }

    fn on_speech_failed(&mut self, reason: String) -> Step {
        if !matches!(self.phase, Phase::Speaking | Phase::Transitioning) {
            return Step::none();
        }

        self.phase = Phase::Idle;
        Step {
            commands: vec![],
            signals: vec![PlaybackSignal::SynthesisFault { reason }],
        }
    }

    fn on_transcript(&mut self, text: &str, words: &[String]) -> Step {
        // Stale event from a cancelled session
        if self.phase != Phase::Listening {
            return Step::none();
        }

        let attempt = matcher::collapse_repeats(text);
        self.last_transcript = Some(text.to_string());

        // Interim updates with no usable content keep the session open
        if matcher::normalize(&attempt).is_empty() {
            return Step::none();
        }

        let Some(target) = words.get(self.word_index) else {
            return Step::none();
        };

        if matcher::matches(&attempt, target) {
            if self.word_index + 1 < words.len() {
                self.word_index += 1;
                self.phase = Phase::Transitioning;
                Step {
                    commands: vec![
                        PlaybackCommand::StopListening,
                        PlaybackCommand::Speak {
                            index: self.word_index,
                        },
                    ],
                    signals: vec![PlaybackSignal::WordAdvanced {
                        index: self.word_index,
                    }],
                }
            } else {
                self.phase = Phase::Idle;
                Step {
                    commands: vec![PlaybackCommand::StopListening],
                    signals: vec![PlaybackSignal::Completed],
                }
            }
        } else {
            // Corrective feedback: repeat the same word, index unchanged
            self.phase = Phase::Speaking;
            Step {
                commands: vec![
                    PlaybackCommand::StopListening,
                    PlaybackCommand::Speak {
                        index: self.word_index,
                    },
                ],
                signals: vec![PlaybackSignal::WordRetry {
                    index: self.word_index,
                }],
            }
        }
    }

    fn on_listening_failed(&mut self, failure: ListenFailure) -> Step {
        if self.phase != Phase::Listening {
            return Step::none();
        }

        self.phase = Phase::Idle;
        if matches!(
            failure,
            ListenFailure::PermissionDenied | ListenFailure::Unavailable
        ) {
            // Degrade to read-only playback; no further listening transitions
            // until permission is granted again.
            self.mic_permission = false;
        }

        Step {
            commands: vec![],
            signals: vec![PlaybackSignal::ListeningFault { failure }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story_words() -> Vec<String> {
        ["The", "cat", "sat."].map(String::from).to_vec()
    }

    fn listening_state(words: &[String]) -> PlaybackState {
        let mut state = PlaybackState::new();
        state.apply(PlaybackEvent::MicrophoneGranted, words);
        state.apply(PlaybackEvent::Start, words);
        state.apply(PlaybackEvent::SpeechEnded, words);
        assert_eq!(state.phase(), Phase::Listening);
        state
    }

    #[test]
    fn initial_state_is_idle_at_word_zero() {
        let state = PlaybackState::new();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.word_index(), 0);
        assert!(!state.microphone_granted());
    }

    #[test]
    fn start_speaks_current_word() {
        let words = story_words();
        let mut state = PlaybackState::new();

        let step = state.apply(PlaybackEvent::Start, &words);

        assert_eq!(state.phase(), Phase::Speaking);
        assert_eq!(step.commands, vec![PlaybackCommand::Speak { index: 0 }]);
    }

    #[test]
    fn start_on_empty_story_stays_idle() {
        let mut state = PlaybackState::new();
        let step = state.apply(PlaybackEvent::Start, &[]);

        assert_eq!(state.phase(), Phase::Idle);
        assert!(step.commands.is_empty());
    }

    #[test]
    fn start_while_speaking_is_ignored() {
        let words = story_words();
        let mut state = PlaybackState::new();
        state.apply(PlaybackEvent::Start, &words);

        let step = state.apply(PlaybackEvent::Start, &words);
        assert!(step.commands.is_empty());
        assert_eq!(state.phase(), Phase::Speaking);
    }

    #[test]
    fn speech_ended_with_permission_starts_listening() {
        let words = story_words();
        let mut state = PlaybackState::new();
        state.apply(PlaybackEvent::MicrophoneGranted, &words);
        state.apply(PlaybackEvent::Start, &words);

        let step = state.apply(PlaybackEvent::SpeechEnded, &words);

        assert_eq!(state.phase(), Phase::Listening);
        assert_eq!(step.commands, vec![PlaybackCommand::StartListening]);
    }

    #[test]
    fn speech_ended_without_permission_reads_straight_through() {
        let words = story_words();
        let mut state = PlaybackState::new();
        state.apply(PlaybackEvent::Start, &words);

        let step = state.apply(PlaybackEvent::SpeechEnded, &words);

        assert_eq!(state.phase(), Phase::Speaking);
        assert_eq!(state.word_index(), 1);
        assert_eq!(step.commands, vec![PlaybackCommand::Speak { index: 1 }]);
        assert_eq!(step.signals, vec![PlaybackSignal::WordAdvanced { index: 1 }]);
    }

    #[test]
    fn read_only_playback_completes_after_last_word() {
        let words = story_words();
        let mut state = PlaybackState::new();
        state.apply(PlaybackEvent::Start, &words);
        state.apply(PlaybackEvent::SpeechEnded, &words);
        state.apply(PlaybackEvent::SpeechEnded, &words);

        let step = state.apply(PlaybackEvent::SpeechEnded, &words);

        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(step.signals, vec![PlaybackSignal::Completed]);
        assert!(step.commands.is_empty());
    }

    #[test]
    fn matching_transcript_advances_and_speaks_next_word() {
        let words = story_words();
        let mut state = listening_state(&words);

        let step = state.apply(
            PlaybackEvent::TranscriptReceived("the".to_string()),
            &words,
        );

        assert_eq!(state.word_index(), 1);
        assert_eq!(state.phase(), Phase::Transitioning);
        assert_eq!(
            step.commands,
            vec![
                PlaybackCommand::StopListening,
                PlaybackCommand::Speak { index: 1 },
            ]
        );
        assert_eq!(step.signals, vec![PlaybackSignal::WordAdvanced { index: 1 }]);
    }

    #[test]
    fn speech_started_moves_transitioning_to_speaking() {
        let words = story_words();
        let mut state = listening_state(&words);
        state.apply(
            PlaybackEvent::TranscriptReceived("the".to_string()),
            &words,
        );

        state.apply(PlaybackEvent::SpeechStarted, &words);
        assert_eq!(state.phase(), Phase::Speaking);
    }

    #[test]
    fn rejected_transcript_retries_same_word() {
        let words = story_words();
        let mut state = listening_state(&words);

        let step = state.apply(
            PlaybackEvent::TranscriptReceived("dog".to_string()),
            &words,
        );

        assert_eq!(state.word_index(), 0);
        assert_eq!(state.phase(), Phase::Speaking);
        assert_eq!(
            step.commands,
            vec![
                PlaybackCommand::StopListening,
                PlaybackCommand::Speak { index: 0 },
            ]
        );
        assert_eq!(step.signals, vec![PlaybackSignal::WordRetry { index: 0 }]);
    }

    #[test]
    fn match_on_final_word_completes_without_further_speaking() {
        let words = story_words();
        let mut state = listening_state(&words);
        state.apply(
            PlaybackEvent::TranscriptReceived("the".to_string()),
            &words,
        );
        state.apply(PlaybackEvent::SpeechStarted, &words);
        state.apply(PlaybackEvent::SpeechEnded, &words);
        state.apply(
            PlaybackEvent::TranscriptReceived("cat".to_string()),
            &words,
        );
        state.apply(PlaybackEvent::SpeechStarted, &words);
        state.apply(PlaybackEvent::SpeechEnded, &words);

        let step = state.apply(
            PlaybackEvent::TranscriptReceived("sat".to_string()),
            &words,
        );

        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(step.signals, vec![PlaybackSignal::Completed]);
        assert!(
            !step
                .commands
                .iter()
                .any(|c| matches!(c, PlaybackCommand::Speak { .. }))
        );
    }

    #[test]
    fn transcript_while_not_listening_is_discarded() {
        let words = story_words();
        let mut state = PlaybackState::new();
        state.apply(PlaybackEvent::Start, &words);

        let before = state.clone();
        let step = state.apply(
            PlaybackEvent::TranscriptReceived("the".to_string()),
            &words,
        );

        assert_eq!(state, before);
        assert_eq!(step, Step::none());
    }

    #[test]
    fn empty_transcript_keeps_listening() {
        let words = story_words();
        let mut state = listening_state(&words);

        let step = state.apply(PlaybackEvent::TranscriptReceived("?!".to_string()), &words);

        assert_eq!(state.phase(), Phase::Listening);
        assert!(step.commands.is_empty());
    }

    #[test]
    fn repeated_word_run_still_matches() {
        let words = story_words();
        let mut state = listening_state(&words);

        let step = state.apply(
            PlaybackEvent::TranscriptReceived("the the the".to_string()),
            &words,
        );

        assert_eq!(step.signals, vec![PlaybackSignal::WordAdvanced { index: 1 }]);
    }

    #[test]
    fn pause_while_speaking_cancels_speech() {
        let words = story_words();
        let mut state = PlaybackState::new();
        state.apply(PlaybackEvent::Start, &words);

        let step = state.apply(PlaybackEvent::Pause, &words);

        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(step.commands, vec![PlaybackCommand::CancelSpeech]);
    }

    #[test]
    fn pause_while_listening_stops_listening() {
        let words = story_words();
        let mut state = listening_state(&words);

        let step = state.apply(PlaybackEvent::Pause, &words);

        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(step.commands, vec![PlaybackCommand::StopListening]);
    }

    #[test]
    fn pause_is_idempotent() {
        let words = story_words();
        let mut state = PlaybackState::new();
        state.apply(PlaybackEvent::Start, &words);
        state.apply(PlaybackEvent::Pause, &words);
        let once = state.clone();

        let step = state.apply(PlaybackEvent::Pause, &words);

        assert_eq!(state, once);
        assert_eq!(step, Step::none());
    }

    #[test]
    fn restart_resets_index_and_stops_both_adapters() {
        let words = story_words();
        let mut state = listening_state(&words);
        state.apply(
            PlaybackEvent::TranscriptReceived("the".to_string()),
            &words,
        );

        let step = state.apply(PlaybackEvent::Restart, &words);

        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.word_index(), 0);
        assert!(state.last_transcript().is_none());
        assert_eq!(
            step.commands,
            vec![
                PlaybackCommand::CancelSpeech,
                PlaybackCommand::StopListening,
            ]
        );
    }

    #[test]
    fn restart_is_idempotent() {
        let words = story_words();
        let mut state = PlaybackState::new();
        state.apply(PlaybackEvent::Restart, &words);
        let once = state.clone();

        state.apply(PlaybackEvent::Restart, &words);
        assert_eq!(state, once);
    }

    #[test]
    fn speech_failure_falls_back_to_idle() {
        let words = story_words();
        let mut state = PlaybackState::new();
        state.apply(PlaybackEvent::Start, &words);

        let step = state.apply(PlaybackEvent::SpeechFailed("engine died".to_string()), &words);

        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(
            step.signals,
            vec![PlaybackSignal::SynthesisFault {
                reason: "engine died".to_string()
            }]
        );
    }

    #[test]
    fn no_speech_timeout_is_recoverable() {
        let words = story_words();
        let mut state = listening_state(&words);

        let step = state.apply(
            PlaybackEvent::ListeningFailed(ListenFailure::NoSpeech),
            &words,
        );

        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.microphone_granted());
        assert_eq!(
            step.signals,
            vec![PlaybackSignal::ListeningFault {
                failure: ListenFailure::NoSpeech
            }]
        );
    }

    #[test]
    fn permission_denied_revokes_microphone() {
        let words = story_words();
        let mut state = listening_state(&words);

        state.apply(
            PlaybackEvent::ListeningFailed(ListenFailure::PermissionDenied),
            &words,
        );

        assert_eq!(state.phase(), Phase::Idle);
        assert!(!state.microphone_granted());

        // Resuming now reads straight through instead of listening
        state.apply(PlaybackEvent::Start, &words);
        let step = state.apply(PlaybackEvent::SpeechEnded, &words);
        assert!(!step.commands.contains(&PlaybackCommand::StartListening));
    }

    #[test]
    fn set_rate_applies_in_any_phase() {
        let words = story_words();
        let mut state = listening_state(&words);

        state.apply(PlaybackEvent::SetRate(SpeechRate::new(1.5)), &words);

        assert!((state.rate().value() - 1.5).abs() < f32::EPSILON);
        assert_eq!(state.phase(), Phase::Listening);
    }

    #[test]
    fn resume_after_completion_speaks_last_word_again() {
        let words = story_words();
        let mut state = listening_state(&words);
        for attempt in ["the", "cat", "sat"] {
            state.apply(
                PlaybackEvent::TranscriptReceived(attempt.to_string()),
                &words,
            );
            state.apply(PlaybackEvent::SpeechStarted, &words);
            state.apply(PlaybackEvent::SpeechEnded, &words);
        }
        assert_eq!(state.phase(), Phase::Idle);

        let step = state.apply(PlaybackEvent::Start, &words);
        assert_eq!(step.commands, vec![PlaybackCommand::Speak { index: 2 }]);
    }
}
