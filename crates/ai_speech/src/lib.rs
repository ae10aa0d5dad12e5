//! AI Speech - Speech-to-Text and Text-to-Speech abstractions
//!
//! Provides traits and implementations for the two speech directions of
//! read-along playback:
//! - `TextToSpeech` - Synthesize spoken words from text (TTS)
//! - `SpeechToText` - Transcribe the child's attempt to text (STT)
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains concrete implementations (adapters)
//! - `audio_io` defines where synthesized audio goes and where captured
//!   audio comes from
//!
//! # Example
//!
//! ```ignore
//! use ai_speech::{HttpSpeechProvider, SpeechToText, TextToSpeech};
//!
//! let provider = HttpSpeechProvider::new(config)?;
//!
//! // Speak a word
//! let audio = provider.synthesize("cat", 1.0).await?;
//!
//! // Transcribe an attempt
//! let transcription = provider.transcribe(captured, "en-US").await?;
//! println!("Heard: {}", transcription.text);
//! ```

pub mod audio_io;
pub mod config;
pub mod error;
pub mod ports;
pub mod providers;
pub mod types;

pub use audio_io::{AudioSink, AudioSource, MemorySink, NullSink, QueueSource, SilenceSource};
pub use config::SpeechConfig;
pub use error::SpeechError;
pub use ports::{SpeechToText, TextToSpeech};
pub use providers::http_speech::HttpSpeechProvider;
pub use types::{AudioData, AudioFormat, Transcription};
