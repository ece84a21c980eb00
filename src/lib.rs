//! PitchCast - record a pitch on camera and turn it into an MVP document
//!
//! This crate provides the core functionality for recording a pitch
//! with the webcam and microphone and running it through an upload,
//! transcription and document-generation pipeline.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core business logic, value objects, entities, and errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (capture hardware, HTTP API, etc.)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
