//! # Voxel Stream Demo Entry Point
//!
//! Calls into the library's `run()` function, which streams Perlin terrain around a
//! flying camera without a window.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

fn main() {
    if let Err(error) = voxel_stream::run() {
        log::error!("{error}");
        std::process::exit(1);
    }
}
