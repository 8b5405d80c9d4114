//! gRPC client for the dish's local diagnostic endpoint.
//!
//! Speaks unary gRPC directly over HTTP/2 (prior knowledge, plaintext),
//! which is all the dish exposes on its LAN address.

use super::proto::{self, HANDLE_PATH};
use super::{DishError, StatusClient, StatusSnapshot};

use prost::Message;
use reqwest::header::{HeaderMap, CONTENT_TYPE, TE};
use std::future::Future;
use std::time::Duration;

/// Compressed flag (1 byte) plus big-endian message length (4 bytes).
const FRAME_HEADER_LEN: usize = 5;

/// Client for the `Device/Handle` RPC.
#[derive(Clone)]
pub struct GrpcClient {
    http: reqwest::Client,
    url: String,
}

impl GrpcClient {
    /// Create a client for the dish at `address` (host:port, optionally
    /// with an `http://` scheme).
    pub fn new(address: &str, connect_timeout: Duration) -> Result<Self, DishError> {
        let base = if address.starts_with("http://") || address.starts_with("https://") {
            address.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", address)
        };

        let http = reqwest::Client::builder()
            .http2_prior_knowledge()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| DishError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            url: format!("{}{}", base, HANDLE_PATH),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one `get_status` request and decode the dish status.
    pub async fn get_status(&self) -> Result<StatusSnapshot, DishError> {
        let request = proto::Request {
            get_status: Some(proto::GetStatusRequest {}),
        };

        let response = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "application/grpc")
            .header(TE, "trailers")
            .body(encode_frame(&request))
            .send()
            .await
            .map_err(|e| DishError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DishError::Protocol(format!("unexpected HTTP status {}", status)));
        }

        check_grpc_status(response.headers())?;

        let body = response
            .bytes()
            .await
            .map_err(|e| DishError::Transport(e.to_string()))?;

        let payload = decode_frame(&body)?;
        let decoded = proto::Response::decode(payload)?;
        let dish_status = decoded.dish_get_status.ok_or(DishError::MissingStatus)?;

        Ok(StatusSnapshot::from(dish_status))
    }
}

impl StatusClient for GrpcClient {
    fn fetch(&self) -> impl Future<Output = Result<StatusSnapshot, DishError>> + Send {
        self.get_status()
    }
}

/// Wrap a message in a gRPC length-prefixed frame.
pub fn encode_frame<M: Message>(message: &M) -> Vec<u8> {
    let payload = message.encode_to_vec();
    let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + payload.len());
    frame.push(0);
    frame.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    frame.extend_from_slice(&payload);
    frame
}

/// Extract the message bytes of the first frame in a response body.
pub fn decode_frame(body: &[u8]) -> Result<&[u8], DishError> {
    if body.is_empty() {
        return Err(DishError::Protocol("empty response body".to_string()));
    }
    if body.len() < FRAME_HEADER_LEN {
        return Err(DishError::Protocol(format!(
            "truncated frame header: {} bytes",
            body.len()
        )));
    }
    if body[0] != 0 {
        return Err(DishError::Protocol(
            "compressed responses are not supported".to_string(),
        ));
    }

    let len = u32::from_be_bytes([body[1], body[2], body[3], body[4]]) as usize;
    let payload = &body[FRAME_HEADER_LEN..];
    if payload.len() < len {
        return Err(DishError::Protocol(format!(
            "truncated message: expected {} bytes, got {}",
            len,
            payload.len()
        )));
    }

    Ok(&payload[..len])
}

/// Fail on a trailers-only response carrying a non-zero `grpc-status`.
fn check_grpc_status(headers: &HeaderMap) -> Result<(), DishError> {
    let Some(value) = headers.get("grpc-status") else {
        return Ok(());
    };

    let code = value
        .to_str()
        .ok()
        .and_then(|s| s.trim().parse::<i32>().ok())
        .ok_or_else(|| DishError::Protocol(format!("invalid grpc-status header: {:?}", value)))?;

    if code == 0 {
        return Ok(());
    }

    let message = headers
        .get("grpc-message")
        .and_then(|m| m.to_str().ok())
        .unwrap_or_default()
        .to_string();

    Err(DishError::Status { code, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_encode_frame_prefix() {
        let request = proto::Request {
            get_status: Some(proto::GetStatusRequest {}),
        };
        let frame = encode_frame(&request);
        assert_eq!(frame[..FRAME_HEADER_LEN], [0, 0, 0, 0, 3]);
        assert_eq!(frame.len(), FRAME_HEADER_LEN + 3);
    }

    #[test]
    fn test_decode_frame_returns_payload() {
        let response = proto::Response {
            dish_get_status: Some(proto::DishGetStatusResponse {
                downlink_throughput_bps: Some(50_000_000.0),
                pop_ping_latency_ms: Some(25.0),
                ..Default::default()
            }),
        };
        let mut body = encode_frame(&response);
        // Trailing bytes after the first frame are ignored.
        body.extend_from_slice(&[0xff, 0xff]);

        let payload = decode_frame(&body).unwrap();
        let decoded = proto::Response::decode(payload).unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn test_decode_frame_errors() {
        assert!(matches!(decode_frame(&[]), Err(DishError::Protocol(_))));
        assert!(matches!(decode_frame(&[0, 0, 0]), Err(DishError::Protocol(_))));
        assert!(matches!(
            decode_frame(&[1, 0, 0, 0, 1, 0]),
            Err(DishError::Protocol(_))
        ));
        assert!(matches!(
            decode_frame(&[0, 0, 0, 0, 10, 1, 2]),
            Err(DishError::Protocol(_))
        ));
    }

    #[test]
    fn test_check_grpc_status() {
        let mut headers = HeaderMap::new();
        assert!(check_grpc_status(&headers).is_ok());

        headers.insert("grpc-status", HeaderValue::from_static("0"));
        assert!(check_grpc_status(&headers).is_ok());

        headers.insert("grpc-status", HeaderValue::from_static("14"));
        headers.insert("grpc-message", HeaderValue::from_static("unavailable"));
        match check_grpc_status(&headers) {
            Err(DishError::Status { code, message }) => {
                assert_eq!(code, 14);
                assert_eq!(message, "unavailable");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_client_url() {
        let client = GrpcClient::new("192.168.100.1:9200", Duration::from_secs(2)).unwrap();
        assert_eq!(
            client.url(),
            "http://192.168.100.1:9200/SpaceX.API.Device.Device/Handle"
        );
    }

    #[tokio::test]
    async fn test_get_status_unreachable() {
        let client = GrpcClient::new("127.0.0.1:1", Duration::from_millis(200)).unwrap();
        let err = tokio_test::assert_err!(client.get_status().await);
        assert!(matches!(err, DishError::Transport(_)));
    }
}
