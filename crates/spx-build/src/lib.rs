//! spx native build engine
//!
//! Cross-compiles the generated source module into distributable native
//! artifacts:
//! - Desktop shared libraries, one per requested architecture
//! - iOS static archives assembled into an xcframework bundle
//! - Android shared libraries per ABI via the NDK clang wrappers
//! - A WebAssembly module for the web export
//!
//! External toolchains (code generator, Go cross-compiler, SDK locators,
//! archive/linker tools) are invoked synchronously with an explicit working
//! directory per call; the engine never mutates process-wide state.

pub mod android;
pub mod codegen;
pub mod command;
pub mod desktop;
pub mod error;
pub mod ios;
pub mod toolchain;
pub mod wasm;

// Re-export main types
pub use android::{AndroidBuild, NDK_ROOT_ENV};
pub use error::{BuildError, BuildResult};
pub use toolchain::{
    desktop_archs, expand_archs, host_go_arch, host_os, lib_file_name, ndk_host_tag, LIB_NAME,
};
pub use wasm::WASM_OUTPUT;
