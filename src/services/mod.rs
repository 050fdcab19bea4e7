// src/services/mod.rs
pub mod gemini;
pub mod image_processor;

pub use gemini::{GeminiService, RenovationAi};
pub use image_processor::ImageProcessor;
