//! Conversions from external infrastructure errors into domain errors.

use actasti_domain::ActasError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ActasError);

impl From<InfraError> for ActasError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ActasError> for InfraError {
    fn from(value: ActasError) -> Self {
        InfraError(value)
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ActasError */
/* -------------------------------------------------------------------------- */

fn http_into_actas(err: HttpError) -> ActasError {
    if err.is_timeout() {
        return ActasError::Network("HTTP request timed out".into());
    }

    #[cfg(not(target_arch = "wasm32"))]
    if err.is_connect() {
        return ActasError::Network("HTTP connection failure".into());
    }

    if let Some(status) = err.status() {
        let message = format!(
            "HTTP {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("unknown status")
        );
        return ActasError::from_status(status.as_u16(), message);
    }

    if err.is_builder() {
        return ActasError::InvalidInput(format!("invalid HTTP request: {err}"));
    }

    ActasError::Network(err.to_string())
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(http_into_actas(value))
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn http_status_401_maps_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: ActasError = InfraError::from(error).into();
        match mapped {
            ActasError::Unauthorized(msg) => assert!(msg.contains("401")),
            other => panic!("expected unauthorized, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn refused_connection_maps_to_network() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(format!("http://{addr}")).send().await.unwrap_err();

        let mapped: ActasError = InfraError::from(error).into();
        assert!(matches!(mapped, ActasError::Network(_)), "got {mapped:?}");
    }
}
