//! HTTP client for the timetable API.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::RemoteStore;
use crate::error::{Result, RosterError};
use crate::roster::RosterDocument;

/// Talks to `{base_url}/timetable/{tenant}` with a bearer token.
pub struct HttpStore {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpStore {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - API root, without trailing slash
    /// * `token` - Bearer token from the identity provider
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(RosterError::persistence)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn timetable_url(&self, tenant_id: &str) -> String {
        format!("{}/timetable/{}", self.base_url, tenant_id)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let req = req.header("Content-Type", "application/json");
        match self.token {
            Some(ref token) => req.bearer_auth(token),
            None => req,
        }
    }
}

/// Map a non-success status to the error taxonomy. The server may put a
/// human-readable `message` in the body.
fn status_error(status: StatusCode, body: &str) -> RosterError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string));

    match status {
        StatusCode::UNAUTHORIZED => {
            RosterError::Persistence("Session expired. Please log in again.".to_string())
        }
        StatusCode::FORBIDDEN => {
            RosterError::Permission("You don't have permission to perform this action.".to_string())
        }
        StatusCode::NOT_FOUND => {
            RosterError::NotFound("The requested resource was not found.".to_string())
        }
        _ => RosterError::Persistence(
            message.unwrap_or_else(|| format!("Request failed ({})", status.as_u16())),
        ),
    }
}

fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(status_error(status, &body))
}

impl RemoteStore for HttpStore {
    fn load(&self, tenant_id: &str) -> Result<Option<RosterDocument>> {
        let url = self.timetable_url(tenant_id);
        debug!(%url, "loading roster");

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .map_err(RosterError::persistence)?;

        let response = match check(response) {
            Ok(r) => r,
            Err(RosterError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        let text = response.text().map_err(RosterError::persistence)?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        let value: Value = serde_json::from_str(&text)?;
        RosterDocument::from_response(value)
    }

    fn save(&self, tenant_id: &str, document: &RosterDocument) -> Result<()> {
        let url = self.timetable_url(tenant_id);
        let body = serde_json::to_vec(document)?;
        debug!(%url, bytes = body.len(), "saving roster");

        let response = self
            .authorize(self.client.put(&url))
            .body(body)
            .send()
            .map_err(RosterError::persistence)?;

        check(response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Answer a single request with a canned response. The handle yields the
    /// raw request text.
    fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut request = String::new();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 {
                    break;
                }
                let lower = line.to_ascii_lowercase();
                if let Some(value) = lower.strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap();
                }
                request.push_str(&line);
                if line == "\r\n" {
                    break;
                }
            }
            let mut body = vec![0; content_length];
            reader.read_exact(&mut body).unwrap();
            request.push_str(&String::from_utf8(body).unwrap());
            reader.get_mut().write_all(response.as_bytes()).unwrap();
            request
        });
        (base, handle)
    }

    fn load_with(status: &str, body: &str) -> Result<Option<RosterDocument>> {
        let (base, server) = serve_once(status, body);
        let store = HttpStore::new(base, Some("tok".into())).unwrap();
        let result = store.load("school-1");
        let request = server.join().unwrap();
        assert!(request.starts_with("GET /timetable/school-1 HTTP/1.1"));
        result
    }

    #[test]
    fn test_load_not_found_is_none() {
        assert!(load_with("404 Not Found", "").unwrap().is_none());
    }

    #[test]
    fn test_load_empty_body_is_none() {
        assert!(load_with("200 OK", "").unwrap().is_none());
        assert!(load_with("200 OK", "  ").unwrap().is_none());
    }

    #[test]
    fn test_load_body_without_people_is_none() {
        assert!(load_with("200 OK", "{}").unwrap().is_none());
    }

    #[test]
    fn test_load_document() {
        let doc = load_with("200 OK", r#"{"peopleList": ["Alice"], "classList": ["Maths"]}"#)
            .unwrap()
            .unwrap();
        assert_eq!(doc.people_list, vec!["Alice"]);
        assert_eq!(doc.class_list, vec!["Maths"]);
    }

    #[test]
    fn test_load_server_error() {
        let err = load_with("500 Internal Server Error", r#"{"message": "table offline"}"#).unwrap_err();
        assert_eq!(err, RosterError::Persistence("table offline".to_string()));
    }

    #[test]
    fn test_save_puts_document_with_token() {
        let (base, server) = serve_once("200 OK", "{}");
        let store = HttpStore::new(base, Some("tok".into())).unwrap();
        let doc = RosterDocument {
            people_list: vec!["Alice".into()],
            ..RosterDocument::default()
        };
        store.save("school-1", &doc).unwrap();

        let request = server.join().unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("PUT /timetable/school-1 HTTP/1.1"));
        assert!(lower.contains("authorization: bearer tok"));
        assert!(request.contains(r#""peopleList":["Alice"]"#));
    }

    #[test]
    fn test_save_forbidden() {
        let (base, server) = serve_once("403 Forbidden", "");
        let store = HttpStore::new(base, None).unwrap();
        let err = store.save("school-1", &RosterDocument::default()).unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, RosterError::Permission(_)));
    }

    #[test]
    fn test_timetable_url() {
        let store = HttpStore::new("https://api.example.test/prod/", None).unwrap();
        assert_eq!(
            store.timetable_url("school-1"),
            "https://api.example.test/prod/timetable/school-1"
        );
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, ""),
            RosterError::Persistence(_)
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, ""),
            RosterError::Permission(_)
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, ""),
            RosterError::NotFound(_)
        ));
    }

    #[test]
    fn test_status_error_uses_server_message() {
        let err = status_error(StatusCode::BAD_REQUEST, r#"{"message": "schoolId missing"}"#);
        assert_eq!(err, RosterError::Persistence("schoolId missing".to_string()));

        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err, RosterError::Persistence("Request failed (500)".to_string()));
    }
}
