use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use tracing::debug;
use crate::core::{
    Credentials,
    OptimizerSettings,
    ResourcePage,
    TransformationRequest,
    TransformationResult,
};
use crate::remote::{sign_params, MediaService};
use crate::utils::{OptimizerError, OptimizerResult};

/// Error body returned by the service on non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

/// HTTP client for the Cloudinary admin and upload APIs.
pub struct CloudinaryClient {
    http: Client,
    credentials: Credentials,
    api_base: String,
    delivery_base: String,
}

impl CloudinaryClient {
    pub fn new(credentials: &Credentials, settings: &OptimizerSettings) -> OptimizerResult<Self> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| OptimizerError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(http, credentials, settings))
    }

    /// Wraps an already configured HTTP client
    pub fn with_client(http: Client, credentials: &Credentials, settings: &OptimizerSettings) -> Self {
        Self {
            http,
            credentials: credentials.clone(),
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            delivery_base: settings.delivery_base.trim_end_matches('/').to_string(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/v1_1/{}/{}", self.api_base, self.credentials.cloud_name, path)
    }

    /// Public URL of a stored asset, used as the upload source.
    ///
    /// Each folder level of `public_id` becomes its own percent-encoded path segment.
    fn delivery_url(&self, access_type: &str, public_id: &str) -> OptimizerResult<String> {
        let mut url = Url::parse(&self.delivery_base)
            .map_err(|e| OptimizerError::config(format!("Invalid delivery base '{}': {}", self.delivery_base, e)))?;
        url.path_segments_mut()
            .map_err(|_| OptimizerError::config(format!("Delivery base '{}' cannot carry a path", self.delivery_base)))?
            .pop_if_empty()
            .extend([self.credentials.cloud_name.as_str(), "image", access_type])
            .extend(public_id.split('/'));
        Ok(url.to_string())
    }

    /// Signed form for an upload that derives a new asset from an existing one
    fn upload_form(
        &self,
        request: &TransformationRequest,
        timestamp: i64,
    ) -> OptimizerResult<Vec<(&'static str, String)>> {
        let mut params = vec![
            ("public_id", request.destination_public_id.clone()),
            ("asset_folder", request.destination_folder.clone()),
            ("type", request.access_type.clone()),
            ("transformation", request.transformation.clone()),
            ("async", (!request.synchronous).to_string()),
            ("timestamp", timestamp.to_string()),
        ];
        let signature = sign_params(&params, &self.credentials.api_secret);

        params.push(("file", self.delivery_url(&request.access_type, &request.source_public_id)?));
        params.push(("api_key", self.credentials.api_key.clone()));
        params.push(("signature", signature));
        params.push(("signature_algorithm", "sha256".to_string()));
        Ok(params)
    }

    /// Turns non-2xx responses into errors carrying the service's message
    async fn check_status(response: Response) -> OptimizerResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or(body);
        Err(OptimizerError::remote(format!("{}: {}", status, message)))
    }
}

#[async_trait]
impl MediaService for CloudinaryClient {
    async fn list_page(
        &self,
        prefix: &str,
        max_results: u32,
        next_cursor: Option<&str>,
    ) -> OptimizerResult<ResourcePage> {
        let mut query = vec![
            ("prefix", prefix.to_string()),
            ("max_results", max_results.to_string()),
        ];
        if let Some(cursor) = next_cursor {
            query.push(("next_cursor", cursor.to_string()));
        }

        let response = self.http
            .get(self.api_url("resources/image/upload"))
            .basic_auth(&self.credentials.api_key, Some(&self.credentials.api_secret))
            .query(&query)
            .send()
            .await?;

        let page: ResourcePage = Self::check_status(response).await?.json().await?;
        Ok(page)
    }

    async fn transform(&self, request: &TransformationRequest) -> OptimizerResult<TransformationResult> {
        debug!(
            "Requesting transformation {} for {}",
            request.transformation, request.source_public_id
        );

        let form = self.upload_form(request, chrono::Utc::now().timestamp())?;
        let response = self.http
            .post(self.api_url("image/upload"))
            .form(&form)
            .send()
            .await?;

        let result: TransformationResult = Self::check_status(response).await?.json().await?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc::{self, Receiver};
    use std::thread;

    fn credentials() -> Credentials {
        Credentials {
            cloud_name: "demo".to_string(),
            api_key: "1234".to_string(),
            api_secret: "secret".to_string(),
        }
    }

    fn client() -> CloudinaryClient {
        CloudinaryClient::new(&credentials(), &OptimizerSettings::default()).unwrap()
    }

    /// Client whose API calls go to `api_base`
    fn client_for(api_base: &str) -> CloudinaryClient {
        let settings = OptimizerSettings { api_base: api_base.to_string(), ..OptimizerSettings::default() };
        let http = Client::builder().no_proxy().build().unwrap();
        CloudinaryClient::with_client(http, &credentials(), &settings)
    }

    /// Serves a single canned response on a local port and hands back the
    /// raw request it received.
    fn serve_once(status: &'static str, body: &'static str) -> (String, Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];

            let header_end = loop {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break raw.len();
                }
                raw.extend_from_slice(&buf[..n]);
                if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8_lossy(&raw[..header_end]).to_lowercase();
            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            while raw.len() < header_end + content_length {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            tx.send(String::from_utf8_lossy(&raw).into_owned()).unwrap();
        });

        (format!("http://{}", addr), rx)
    }

    fn request() -> TransformationRequest {
        TransformationRequest {
            source_public_id: "french-dandy/a".to_string(),
            access_type: "upload".to_string(),
            transformation: "c_limit,w_1960/f_auto/q_80".to_string(),
            synchronous: true,
            destination_public_id: "french-dandy/a_optimized".to_string(),
            destination_folder: "french-dandy".to_string(),
        }
    }

    fn value<'a>(form: &'a [(&'static str, String)], key: &str) -> &'a str {
        form.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str()).unwrap()
    }

    #[test]
    fn builds_endpoint_urls() {
        let client = client();
        assert_eq!(
            client.api_url("resources/image/upload"),
            "https://api.cloudinary.com/v1_1/demo/resources/image/upload"
        );
        assert_eq!(
            client.delivery_url("upload", "french-dandy/a").unwrap(),
            "https://res.cloudinary.com/demo/image/upload/french-dandy/a"
        );
    }

    #[test]
    fn delivery_url_encodes_each_segment() {
        assert_eq!(
            client().delivery_url("upload", "french-dandy/summer shoot #1").unwrap(),
            "https://res.cloudinary.com/demo/image/upload/french-dandy/summer%20shoot%20%231"
        );
        assert_eq!(
            client().delivery_url("upload", "french-dandy/what?.png").unwrap(),
            "https://res.cloudinary.com/demo/image/upload/french-dandy/what%3F.png"
        );
    }

    #[test]
    fn upload_form_is_synchronous_and_signed() {
        let form = client().upload_form(&request(), 1_700_000_000).unwrap();

        assert_eq!(value(&form, "async"), "false");
        assert_eq!(value(&form, "public_id"), "french-dandy/a_optimized");
        assert_eq!(value(&form, "file"), "https://res.cloudinary.com/demo/image/upload/french-dandy/a");

        let signed = [
            ("public_id", "french-dandy/a_optimized".to_string()),
            ("asset_folder", "french-dandy".to_string()),
            ("type", "upload".to_string()),
            ("transformation", "c_limit,w_1960/f_auto/q_80".to_string()),
            ("async", "false".to_string()),
            ("timestamp", "1700000000".to_string()),
        ];
        assert_eq!(value(&form, "signature"), sign_params(&signed, "secret"));
    }

    #[tokio::test]
    async fn rejected_credentials_surface_the_service_message() {
        let (base, _requests) = serve_once("401 Unauthorized", r#"{"error":{"message":"Invalid api_key"}}"#);

        let err = client_for(&base).list_page("french-dandy", 500, None).await.unwrap_err();
        assert!(
            matches!(err, OptimizerError::RemoteService(ref msg) if msg == "401 Unauthorized: Invalid api_key"),
            "unexpected error: {}", err
        );
    }

    #[tokio::test]
    async fn record_without_size_is_a_malformed_response() {
        let (base, _requests) = serve_once(
            "200 OK",
            r#"{"resources":[{"public_id":"french-dandy/a","format":"png"}]}"#,
        );

        let err = client_for(&base).list_page("french-dandy", 500, None).await.unwrap_err();
        assert!(
            matches!(err, OptimizerError::RemoteService(ref msg) if msg.contains("Malformed response")),
            "unexpected error: {}", err
        );
    }

    #[tokio::test]
    async fn listing_sends_page_size_and_cursor() {
        let (base, requests) = serve_once(
            "200 OK",
            r#"{"resources":[{"public_id":"french-dandy/a","bytes":600000,"format":"png"}],"next_cursor":"c2"}"#,
        );

        let page = client_for(&base).list_page("french-dandy", 500, Some("c1")).await.unwrap();
        assert_eq!(page.resources.len(), 1);
        assert_eq!(page.resources[0].bytes, 600_000);
        assert_eq!(page.next_cursor.as_deref(), Some("c2"));

        let raw = requests.recv().unwrap();
        let request_line = raw.lines().next().unwrap();
        assert!(request_line.starts_with("GET /v1_1/demo/resources/image/upload?"));
        assert!(request_line.contains("prefix=french-dandy"));
        assert!(request_line.contains("max_results=500"));
        assert!(request_line.contains("next_cursor=c1"));
        assert!(raw.to_lowercase().contains("authorization: basic "));
    }

    #[tokio::test]
    async fn transform_posts_signed_synchronous_upload() {
        let (base, requests) = serve_once(
            "200 OK",
            r#"{"public_id":"french-dandy/a_optimized","bytes":150000,"format":"webp","width":1960}"#,
        );

        let result = client_for(&base).transform(&request()).await.unwrap();
        assert_eq!(result, TransformationResult {
            public_id: "french-dandy/a_optimized".to_string(),
            bytes: 150_000,
            format: "webp".to_string(),
        });

        let raw = requests.recv().unwrap();
        assert!(raw.starts_with("POST /v1_1/demo/image/upload "));
        assert!(raw.contains("async=false"));
        assert!(raw.contains("signature_algorithm=sha256"));
        assert!(raw.contains("api_key=1234"));
    }
}
