//! Single-use request builder and raw response.
//!
//! A [`SaiseiRequest`] is plain data: verb, path, query fragments in the order
//! they were added, and an optional JSON body. It is consumed by
//! [`Connection::execute`], which hands back a [`RawResponse`] to decode.

use crate::client::Connection;
use crate::{Error, Result};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{self, Display};
use std::str::FromStr;
use url::form_urlencoded;
use url::Url;

/// HTTP verbs the REST API understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Read
    Get,
    /// Update
    Put,
    /// Create
    Post,
    /// Remove
    Delete,
}

impl Verb {
    /// Returns the verb as sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }

    /// Returns all supported verbs.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Get, Self::Put, Self::Post, Self::Delete]
    }

    pub(crate) fn as_method(self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Put => Method::PUT,
            Self::Post => Method::POST,
            Self::Delete => Method::DELETE,
        }
    }
}

impl FromStr for Verb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "GET" => Ok(Self::Get),
            "PUT" => Ok(Self::Put),
            "POST" => Ok(Self::Post),
            "DELETE" => Ok(Self::Delete),
            other => Err(Error::InvalidMethod(other.to_string())),
        }
    }
}

impl Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One HTTP request against the REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaiseiRequest {
    pub(crate) verb: Verb,
    pub(crate) path: String,
    pub(crate) query: Vec<String>,
    pub(crate) body: Option<String>,
}

impl SaiseiRequest {
    /// Start a request for `path` (absolute, starting with `/`).
    pub fn new(verb: Verb, path: impl Into<String>) -> Self {
        Self {
            verb,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Start a request from a verb name such as `"GET"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMethod`] unless the name is GET, PUT, POST or
    /// DELETE.
    pub fn from_method(method: &str, path: impl Into<String>) -> Result<Self> {
        Ok(Self::new(method.parse()?, path))
    }

    /// Append one `name=value` query fragment, form-urlencoded.
    #[must_use]
    pub fn query_param(mut self, name: &str, value: impl Display) -> Self {
        let fragment = form_urlencoded::Serializer::new(String::new())
            .append_pair(name, &value.to_string())
            .finish();
        self.query.push(fragment);
        self
    }

    /// Append several query fragments, keeping their order.
    #[must_use]
    pub fn query_pairs<K, V>(self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Display,
    {
        pairs
            .into_iter()
            .fold(self, |request, (name, value)| request.query_param(name.as_ref(), value))
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if `body` cannot be encoded as JSON.
    pub fn body<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let encoded =
            serde_json::to_string(body).map_err(|err| Error::Serialization(err.to_string()))?;
        self.body = Some(encoded);
        Ok(self)
    }

    /// The request verb.
    #[must_use]
    pub const fn verb(&self) -> Verb {
        self.verb
    }

    /// The request path, without query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The encoded JSON body, if one was attached.
    #[must_use]
    pub fn json_body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// `""` when no parameters were added, otherwise `?a=1&b=2`.
    #[must_use]
    pub fn query_string(&self) -> String {
        if self.query.is_empty() {
            String::new()
        } else {
            format!("?{}", self.query.join("&"))
        }
    }

    /// Build the full request URL on the appliance base URL.
    ///
    /// Scheme, host and port always come from `base`; the path only ever
    /// replaces the path component.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] unless the path starts with exactly
    /// one `/`.
    pub fn url(&self, base: &Url) -> Result<Url> {
        if !self.path.starts_with('/') || self.path.starts_with("//") {
            return Err(Error::InvalidEndpoint(format!(
                "Saisei path must start with a single `/`: `{}`",
                self.path
            )));
        }

        let mut url = base.clone();
        url.set_path(&self.path);
        if self.query.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&self.query.join("&")));
        }
        Ok(url)
    }

    /// Send the request over `connection`.
    ///
    /// # Errors
    ///
    /// See [`Connection::execute`].
    pub async fn execute(self, connection: &Connection) -> Result<RawResponse> {
        connection.execute(self).await
    }
}

/// Status and body of an executed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    status: u16,
    body: String,
}

impl RawResponse {
    /// Wrap a status code and raw body.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// The HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// The raw response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Consume the response, returning the raw body.
    #[must_use]
    pub fn into_body(self) -> String {
        self.body
    }

    /// Decode the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the body is not valid JSON or does not
    /// match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|err| Error::Decode(err.to_string()))
    }

    /// Decode the body as an untyped JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the body is not valid JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        self.decode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    const ROOT: &str = "/rest/top/configurations/running";

    #[test]
    fn supported_verbs_parse() {
        for verb in Verb::all() {
            assert_eq!(verb.as_str().parse::<Verb>().unwrap(), *verb);
        }
    }

    #[test]
    fn unsupported_verbs_are_rejected() {
        for name in ["PATCH", "HEAD", "OPTIONS", "get", "Post", ""] {
            let err = SaiseiRequest::from_method(name, ROOT).unwrap_err();
            assert_eq!(err, Error::InvalidMethod(name.to_string()));
        }
    }

    #[test]
    fn query_string_empty_without_params() {
        let request = SaiseiRequest::new(Verb::Get, format!("{ROOT}/interfaces/"));
        assert_eq!(request.query_string(), "");
    }

    #[test]
    fn query_string_keeps_insertion_order() {
        let request = SaiseiRequest::new(Verb::Get, format!("{ROOT}/interfaces/"))
            .query_param("select", "name,description")
            .query_param("limit", 10)
            .query_param("order", "<name");

        assert_eq!(
            request.query_string(),
            "?select=name%2Cdescription&limit=10&order=%3Cname"
        );
    }

    #[test]
    fn query_pairs_appends_in_order() {
        let request = SaiseiRequest::new(Verb::Get, ROOT)
            .query_param("a", 1)
            .query_pairs([("b", "2"), ("c", "three four")]);
        assert_eq!(request.query_string(), "?a=1&b=2&c=three+four");
    }

    #[test]
    fn url_joins_base_path_and_query() {
        let base = Url::parse("https://appliance:5029").unwrap();
        let request = SaiseiRequest::new(Verb::Get, format!("{ROOT}/fibs/fib0/hosts/h1"))
            .query_param("level", "full");

        let url = request.url(&base).unwrap();
        assert_eq!(
            url.as_str(),
            "https://appliance:5029/rest/top/configurations/running/fibs/fib0/hosts/h1?level=full"
        );
    }

    #[test]
    fn url_without_query_has_no_question_mark() {
        let base = Url::parse("http://10.1.1.1:5000").unwrap();
        let request = SaiseiRequest::new(Verb::Post, format!("{ROOT}/users/"));
        let url = request.url(&base).unwrap();
        assert_eq!(url.as_str(), "http://10.1.1.1:5000/rest/top/configurations/running/users/");
        assert!(url.query().is_none());
    }

    #[test]
    fn url_rejects_paths_that_name_another_host() {
        let base = Url::parse("https://appliance:5029").unwrap();
        for path in [
            "//other-host/x",
            "http://other-host/x",
            "https://other-host/x",
            "users/",
            "",
        ] {
            let err = SaiseiRequest::new(Verb::Get, path).url(&base).unwrap_err();
            assert!(matches!(err, Error::InvalidEndpoint(_)), "{path:?} gave {err:?}");
        }
    }

    #[test]
    fn url_keeps_base_host_for_odd_paths() {
        let base = Url::parse("https://appliance:5029").unwrap();
        for path in ["/\\other-host/x", "/users/../../x", "/users/a@other-host"] {
            let url = SaiseiRequest::new(Verb::Get, path).url(&base).unwrap();
            assert_eq!(url.host_str(), Some("appliance"), "{path:?} gave {url}");
            assert_eq!(url.port(), Some(5029));
            assert_eq!(url.scheme(), "https");
        }
    }

    #[test]
    fn body_is_encoded_as_json() {
        let request = SaiseiRequest::new(Verb::Post, format!("{ROOT}/users/"))
            .body(&json!({"name": "alice"}))
            .unwrap();
        assert_eq!(request.json_body(), Some(r#"{"name":"alice"}"#));
    }

    #[test]
    fn unencodable_body_is_a_serialization_error() {
        let mut map = HashMap::new();
        map.insert((1u8, 2u8), "tuple keys are not JSON object keys");

        let err = SaiseiRequest::new(Verb::Post, format!("{ROOT}/users/"))
            .body(&map)
            .unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn body_round_trips_through_echoed_response() {
        #[derive(Debug, Serialize, serde::Deserialize, PartialEq)]
        struct User {
            name: String,
            enabled: bool,
        }

        let user = User {
            name: "alice".to_string(),
            enabled: true,
        };
        let request = SaiseiRequest::new(Verb::Post, format!("{ROOT}/users/"))
            .body(&user)
            .unwrap();

        let echoed = RawResponse::new(201, request.json_body().unwrap());
        assert_eq!(echoed.decode::<User>().unwrap(), user);
    }

    #[test]
    fn decode_array_body() {
        let response = RawResponse::new(200, r#"[{"name":"eth0"},{"name":"eth1"}]"#);
        let value = response.json().unwrap();
        assert_eq!(value, json!([{"name": "eth0"}, {"name": "eth1"}]));
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        for body in ["{not json", "", "<html>500</html>"] {
            let err = RawResponse::new(200, body).json().unwrap_err();
            assert!(matches!(err, Error::Decode(_)), "{body:?} gave {err:?}");
        }
    }

    #[test]
    fn raw_response_accessors() {
        let response = RawResponse::new(202, "{}");
        assert_eq!(response.status(), 202);
        assert_eq!(response.body(), "{}");
        assert_eq!(response.into_body(), "{}");
    }
}
