use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;

use crate::error::{FetchError, GeneCacheError};

pub trait Fetcher: Send + Sync {
    /// Issues one GET and returns the body of a `200 OK` response.
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self, GeneCacheError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| GeneCacheError::HttpClient(err.to_string()))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| FetchError::Network(err.to_string()))?;
        // Dropping the response on the error path releases the connection.
        if response.status() != StatusCode::OK {
            return Err(FetchError::Status(response.status().as_u16()));
        }
        let bytes = response
            .bytes()
            .map_err(|err| FetchError::Network(err.to_string()))?;
        Ok(bytes.to_vec())
    }
}
