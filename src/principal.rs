use axum::http::{HeaderName, HeaderValue};
use headers::{Error, Header};

/// Header set by the upstream session layer for authenticated requests.
///
/// The value is trusted as-is. The upstream layer must strip or overwrite
/// any `x-principal-id` sent by the client.
pub static X_PRINCIPAL_ID: HeaderName = HeaderName::from_static("x-principal-id");

/// Numeric id of the authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrincipalId(pub i64);

impl Header for PrincipalId {
    fn name() -> &'static HeaderName {
        &X_PRINCIPAL_ID
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, Error>
    where
        I: Iterator<Item = &'i HeaderValue>,
    {
        values
            .next()
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
            .map(PrincipalId)
            .ok_or_else(Error::invalid)
    }

    fn encode<E>(&self, values: &mut E)
    where
        E: Extend<HeaderValue>,
    {
        values.extend(std::iter::once(HeaderValue::from(self.0)));
    }
}
