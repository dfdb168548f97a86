//! Postal code (CEP) validation.

use serde::{Deserialize, Serialize};

/// Number of digits in a CEP.
pub const CEP_LEN: usize = 8;

/// Request body accepted by both services.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CepRequest {
    pub cep: String,
}

/// Returns true iff `code` is exactly eight ASCII digits.
pub fn validate_cep(code: &str) -> bool {
    code.len() == CEP_LEN && code.bytes().all(|b| b.is_ascii_digit())
}

/// A postal code that passed [`validate_cep`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cep(String);

impl Cep {
    /// Parse a raw code, returning `None` if it is not eight digits.
    pub fn parse(code: &str) -> Option<Self> {
        validate_cep(code).then(|| Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<CepRequest> for Cep {
    type Error = CepRequest;

    fn try_from(request: CepRequest) -> Result<Self, Self::Error> {
        if validate_cep(&request.cep) {
            Ok(Self(request.cep))
        } else {
            Err(request)
        }
    }
}
