//! Streaming chat transport over reqwest.
//!
//! Sends the chat request as a JSON POST and hands back the chunked response
//! body as-is; framing is left to the decoder in the application layer.

use super::error::HttpError;
use assist_application::{
    ChatRequest, ReadChunk, ResponseReader, TransportAdapter, TransportError,
};
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use std::time::Duration;
use tracing::debug;

/// [`TransportAdapter`] backed by a shared [`reqwest::Client`].
#[derive(Clone)]
pub struct HttpStreamTransport {
    client: reqwest::Client,
}

impl HttpStreamTransport {
    /// Build a client with a connect timeout only: a reply may legitimately
    /// stream for longer than any fixed request timeout.
    pub fn new(connect_timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TransportAdapter for HttpStreamTransport {
    async fn open(
        &self,
        endpoint: &str,
        payload: &ChatRequest,
        auth_token: Option<&str>,
    ) -> Result<Box<dyn ResponseReader>, TransportError> {
        let mut request = self
            .client
            .post(endpoint)
            .header("Accept", "text/event-stream")
            .json(payload);
        if let Some(token) = auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(HttpError::from)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpError::from_status(status, body).into());
        }
        debug!(endpoint, %status, "Chat stream opened");

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()))
            .boxed();
        Ok(Box::new(HttpResponseReader { body: Some(body) }))
    }
}

/// Reader over one streaming response body.
///
/// Aborting drops the body, which closes the connection.
pub struct HttpResponseReader {
    body: Option<BoxStream<'static, reqwest::Result<Vec<u8>>>>,
}

#[async_trait]
impl ResponseReader for HttpResponseReader {
    async fn read_next(&mut self) -> Result<ReadChunk, TransportError> {
        let Some(body) = self.body.as_mut() else {
            return Ok(ReadChunk::end());
        };
        match body.next().await {
            Some(Ok(bytes)) => Ok(ReadChunk::data(bytes)),
            Some(Err(e)) => {
                self.body = None;
                Err(TransportError::Interrupted(e.to_string()))
            }
            None => {
                self.body = None;
                Ok(ReadChunk::end())
            }
        }
    }

    fn abort(&mut self) {
        if self.body.take().is_some() {
            debug!("Chat stream aborted");
        }
    }
}
