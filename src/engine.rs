// HTTP engine for authorisation-check
// Uses a blocking reqwest client; routes are probed one at a time

use crate::error::RequestError;
use crate::models::HttpResponse;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use reqwest::Url;
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

/// Performs anonymous GET requests.
pub trait HttpRequester {
    /// GET `url`, following at most `max_redirects` redirects. When the limit
    /// is reached the last redirect response is returned, not an error.
    fn get(&self, url: &str, max_redirects: usize) -> Result<HttpResponse, RequestError>;
}

pub struct ReqwestRequester {
    timeout: Duration,
    // Redirect policy is fixed per client, so keep one client per limit
    clients: RefCell<HashMap<usize, Client>>,
}

impl ReqwestRequester {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            clients: RefCell::new(HashMap::new()),
        }
    }

    fn client(&self, max_redirects: usize) -> Result<Client, RequestError> {
        if let Some(client) = self.clients.borrow().get(&max_redirects) {
            return Ok(client.clone());
        }
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("authorisation-check/", env!("CARGO_PKG_VERSION")))
            .redirect(Policy::custom(move |attempt| {
                if attempt.previous().len() > max_redirects {
                    attempt.stop()
                } else {
                    attempt.follow()
                }
            }))
            .build()
            .map_err(|e| RequestError::Client(e.to_string()))?;
        self.clients.borrow_mut().insert(max_redirects, client.clone());
        Ok(client)
    }
}

impl HttpRequester for ReqwestRequester {
    fn get(&self, url: &str, max_redirects: usize) -> Result<HttpResponse, RequestError> {
        let parsed = Url::parse(url).map_err(|e| RequestError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let client = self.client(max_redirects)?;
        let resp = client.get(parsed.clone()).send()?;

        // Url normalises (e.g. adds a root slash); report the caller's string
        // unless a redirect actually moved us
        let final_url = if resp.url() == &parsed {
            url.to_string()
        } else {
            resp.url().to_string()
        };

        Ok(HttpResponse {
            status: resp.status().as_u16(),
            final_url,
        })
    }
}
