//! # conspec-gen — Example Value Generation
//!
//! Turns a [`Spec`] into a stream of values that satisfy it, for use as
//! test fixtures.
//!
//! Compilation ([`build_generator`]) resolves the whole spec tree up front
//! and fails with a [`GeneratorError`] if any leaf is not a recognised
//! shape predicate. Drawing happens lazily through a seeded, restartable
//! [`ValueStream`].
//!
//! ```no_run
//! use conspec_core::{Key, Schema, Spec};
//! use conspec_gen::generate;
//!
//! let spec: Spec = Schema::map()
//!     .key(Key::symbol("name"), Spec::binary())
//!     .key(Key::symbol("age"), Spec::integer())
//!     .into();
//! let users = generate(&spec)?.take_values(10)?;
//! # Ok::<(), conspec_gen::GeneratorError>(())
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod shape;
pub mod stream;

use conspec_core::Spec;

pub use config::{GeneratorConfig, DEFAULT_MAX_FILTER_ATTEMPTS};
pub use error::GeneratorError;
pub use generator::{build_generator, Generator};
pub use shape::BaseShape;
pub use stream::ValueStream;

/// Compile `spec` and open a stream with default settings.
///
/// # Errors
///
/// Returns [`GeneratorError::Unresolvable`] before yielding anything if the
/// spec contains a leaf with no generator.
pub fn generate(spec: &Spec) -> Result<ValueStream, GeneratorError> {
    generate_with(spec, &GeneratorConfig::default())
}

/// Compile `spec` and open a stream with the given settings.
///
/// # Errors
///
/// Same as [`generate`].
pub fn generate_with(spec: &Spec, config: &GeneratorConfig) -> Result<ValueStream, GeneratorError> {
    let generator = build_generator(spec)?;
    Ok(ValueStream::new(generator, config.clone()))
}
