//! External service clients.

pub mod cep;

pub use cep::{CepAddress, CepClient, CepError};
