use crate::prelude::{eprintln, *};
use log::debug;
use serde_json::Value;
use skyctl_core::config::QueryParams;

/// Performs XRPC calls against a single service.
///
/// `method` is the NSID of the procedure (e.g. `app.bsky.feed.getTimeline`).
/// Network failures and non-JSON bodies surface as [`Error::Network`]; a
/// non-2xx answer surfaces as [`Error::Http`]. A decoded JSON body is always
/// returned as-is, even when it lacks the keys the caller expects.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// GET with `params` serialized as the query string.
    async fn get(
        &self,
        method: &str,
        params: &QueryParams,
        token: Option<&str>,
    ) -> std::result::Result<Value, Error>;

    /// POST with `body` serialized as JSON.
    async fn post(
        &self,
        method: &str,
        body: &Value,
        token: Option<&str>,
    ) -> std::result::Result<Value, Error>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    verbose: bool,
}

impl HttpTransport {
    pub fn new(base_url: &str, verbose: bool) -> Result<Self> {
        use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("skyctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            verbose,
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }

    fn trace(&self, verb: &str, url: &str) {
        debug!("{verb} {url}");
        if self.verbose {
            eprintln!("{verb} {url}");
        }
    }
}

impl Transport for HttpTransport {
    async fn get(
        &self,
        method: &str,
        params: &QueryParams,
        token: Option<&str>,
    ) -> std::result::Result<Value, Error> {
        let url = self.url(method);
        self.trace("GET", &url);

        let mut request = self.client.get(&url).query(params);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(f!("{method}: {e}")))?;
        decode(method, response).await
    }

    async fn post(
        &self,
        method: &str,
        body: &Value,
        token: Option<&str>,
    ) -> std::result::Result<Value, Error> {
        let url = self.url(method);
        self.trace("POST", &url);

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Network(f!("{method}: {e}")))?;
        decode(method, response).await
    }
}

async fn decode(method: &str, response: reqwest::Response) -> std::result::Result<Value, Error> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Http {
            method: method.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| Error::Network(f!("{method}: response is not JSON: {e}")))
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scripted transport for exercising the client without a network.

    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// A request as seen by the transport.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Call {
        pub verb: &'static str,
        pub method: String,
        pub params: QueryParams,
        pub body: Option<Value>,
        pub token: Option<String>,
    }

    /// Answers requests from a queue, in order, and records every call.
    #[derive(Debug, Default)]
    pub struct ScriptedTransport {
        responses: RefCell<VecDeque<std::result::Result<Value, Error>>>,
        calls: RefCell<Vec<Call>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, value: Value) -> Self {
            self.responses.borrow_mut().push_back(Ok(value));
            self
        }

        pub fn fail(self, error: Error) -> Self {
            self.responses.borrow_mut().push_back(Err(error));
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        fn next(&self, call: Call) -> std::result::Result<Value, Error> {
            self.calls.borrow_mut().push(call);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Network("no scripted response left".to_string())))
        }
    }

    impl Transport for ScriptedTransport {
        async fn get(
            &self,
            method: &str,
            params: &QueryParams,
            token: Option<&str>,
        ) -> std::result::Result<Value, Error> {
            self.next(Call {
                verb: "GET",
                method: method.to_string(),
                params: params.clone(),
                body: None,
                token: token.map(str::to_string),
            })
        }

        async fn post(
            &self,
            method: &str,
            body: &Value,
            token: Option<&str>,
        ) -> std::result::Result<Value, Error> {
            self.next(Call {
                verb: "POST",
                method: method.to_string(),
                params: Vec::new(),
                body: Some(body.clone()),
                token: token.map(str::to_string),
            })
        }
    }
}
