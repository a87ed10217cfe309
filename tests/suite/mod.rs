mod config;
mod gemini;
mod properties;
mod tutoring;
