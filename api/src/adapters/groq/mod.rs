//! Groq adapter for the chat-completion port

pub mod client;

pub use client::{GroqClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
