use crate::error::{ProcessingError, Result};
use crate::utils::constants::USER_AGENT;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

/// Anything that can return the body of a GET request
pub trait PageSource {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<String>;
}

/// Blocking HTTP client for the upstream station pages
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }
}

impl PageSource for HttpClient {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<String> {
        debug!(url, timeout_secs = timeout.as_secs(), "GET");
        let response = self.client.get(url).timeout(timeout).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProcessingError::Fetch {
                url: url.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let bytes = response.bytes()?;
        Ok(decode_body(&bytes))
    }
}

/// UTF-8 when valid, otherwise windows-1252
pub fn decode_body(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            text.into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_body("Presión".as_bytes()), "Presión");
    }

    #[test]
    fn test_decode_latin_fallback() {
        // "Presión" in windows-1252
        let bytes = [0x50, 0x72, 0x65, 0x73, 0x69, 0xF3, 0x6E];
        assert_eq!(decode_body(&bytes), "Presión");
    }
}
