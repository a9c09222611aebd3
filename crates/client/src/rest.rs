use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::{ClientError, Record, ResourceClient};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking REST client. Collections map onto paths:
/// `GET {base}/{collection}`, `GET {base}/{collection}/{id}`, and
/// `POST {base}/{collection}/{id}/{command}`.
#[derive(Debug, Clone)]
pub struct RestClient {
    base: Url,
    http: Client,
}

impl RestClient {
    pub fn new(server: &str) -> Result<Self, ClientError> {
        let base = Url::parse(server).map_err(|err| ClientError::InvalidUrl(err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!(
                "'{server}' cannot be used as a base url"
            )));
        }
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { base, http })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidUrl("base url has no path".into()))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    fn check(&self, response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status,
                path: response.url().path().to_string(),
            });
        }
        Ok(response)
    }
}

impl ResourceClient for RestClient {
    fn list(&self, collection: &str) -> Result<Vec<Record>, ClientError> {
        let url = self.endpoint(&[collection])?;
        log::debug!("GET {url}");
        let body = self.check(self.http.get(url).send()?)?.bytes()?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn get(&self, collection: &str, id: &str) -> Result<Record, ClientError> {
        let url = self.endpoint(&[collection, id])?;
        log::debug!("GET {url}");
        let body = self.check(self.http.get(url).send()?)?.bytes()?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn invoke(&self, collection: &str, id: &str, command: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&[collection, id, command])?;
        log::info!("POST {url}");
        self.check(self.http.post(url).send()?)?;
        Ok(())
    }
}
