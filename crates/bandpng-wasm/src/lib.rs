//! Bandpng WASM - WebAssembly bindings for Bandpng
//!
//! This crate provides WASM bindings to expose the bandpng-core PNG encoder
//! to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for raster data
//! - `encode` - PNG encoding bindings
//!
//! # Usage
//!
//! ```typescript
//! import init, { encode_png } from '@bandpng/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const png = encode_png(imageData.data, imageData.width, imageData.height, 'rgba', 9);
//! const blob = new Blob([png], { type: 'image/png' });
//! ```

use wasm_bindgen::prelude::*;

mod encode;
mod types;

// Re-export public types
pub use encode::{encode_png, encode_png_with_options};
pub use types::JsRasterImage;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
