//! Crate error type. Grounded on `merkle-tox-core::error`'s `thiserror`
//! enum + `...Result<T>` alias pattern. The protocol layer itself is
//! infallible-by-drop (see `spec.md` §7); the only fallible path left is
//! opening the optional diagnostic files at construction time.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DfloodError {
    #[error("failed to open diagnostic file: {0}")]
    Io(#[from] std::io::Error),
}

pub type DfloodResult<T> = Result<T, DfloodError>;
