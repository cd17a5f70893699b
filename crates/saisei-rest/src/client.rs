//! Asynchronous client for the Saisei running-configuration API.
//!
//! Each resource in [`Resource`] gets the same five operations. The per-resource
//! methods are generated from one table by `resource_methods!` and delegate to
//! the generic [`SaiseiClient::list`], [`SaiseiClient::get`],
//! [`SaiseiClient::add`], [`SaiseiClient::modify`] and
//! [`SaiseiClient::delete`].

use crate::models::ListOptions;
use crate::Result;
use saisei_core::config::{Credentials, SaiseiConfig, Scheme};
use saisei_core::types::root_path;
use saisei_core::{Connection, Error, RawResponse, Resource, SaiseiRequest, StatusPolicy, Verb};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Builder for [`SaiseiClient`].
#[derive(Debug)]
pub struct SaiseiClientBuilder {
    config: SaiseiConfig,
    credentials: Option<Credentials>,
}

impl SaiseiClientBuilder {
    /// Create a builder for the appliance at `host` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the host is empty or not a valid
    /// URL host.
    pub fn new(host: impl Into<String>) -> Result<Self> {
        Ok(Self::from_config(SaiseiConfig::new(host)?))
    }

    /// Create a builder from an existing configuration.
    #[must_use]
    pub fn from_config(config: SaiseiConfig) -> Self {
        Self {
            config,
            credentials: None,
        }
    }

    /// Override the REST API port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.config = self.config.with_port(port);
        self
    }

    /// Override the URL scheme.
    #[must_use]
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.config = self.config.with_scheme(scheme);
        self
    }

    /// Turn TLS certificate verification on or off.
    #[must_use]
    pub fn with_tls_verify(mut self, verify: bool) -> Self {
        self.config = self.config.with_tls_verify(verify);
        self
    }

    /// Override the request timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.config = self.config.with_timeout(seconds);
        self
    }

    /// Override the response status policy.
    #[must_use]
    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.config = self.config.with_status_policy(policy);
        self
    }

    /// Enable or disable verbose request logging.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.config = self.config.with_verbose(verbose);
        self
    }

    /// Configure HTTP basic authentication credentials.
    #[must_use]
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials::new(username, password));
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if no credentials were supplied or the
    /// configuration is invalid.
    pub fn build(self) -> Result<SaiseiClient> {
        let credentials = self.credentials.ok_or_else(|| {
            Error::ConfigError("basic auth credentials are required".to_string())
        })?;
        let connection = Connection::new(&self.config, credentials)?;
        Ok(SaiseiClient {
            inner: Arc::new(connection),
        })
    }
}

/// Asynchronous Saisei client.
#[derive(Debug, Clone)]
pub struct SaiseiClient {
    inner: Arc<Connection>,
}

macro_rules! resource_methods {
    ($(
        $resource:ident ($one:literal, $many:literal) =>
            $list:ident, $get:ident, $add:ident, $modify:ident, $delete:ident;
    )*) => {
        $(
            #[doc = concat!("List ", $many, ".")]
            pub async fn $list(&self, options: &ListOptions) -> Result<Value> {
                self.list(Resource::$resource, options).await
            }

            #[doc = concat!("Fetch one ", $one, " by name.")]
            pub async fn $get(&self, id: &str) -> Result<Value> {
                self.get(Resource::$resource, id).await
            }

            #[doc = concat!("Create a ", $one, " from `data`.")]
            pub async fn $add<B>(&self, data: &B) -> Result<Value>
            where
                B: Serialize + ?Sized,
            {
                self.add(Resource::$resource, data).await
            }

            #[doc = concat!("Replace fields of an existing ", $one, " with `data`.")]
            pub async fn $modify<B>(&self, id: &str, data: &B) -> Result<Value>
            where
                B: Serialize + ?Sized,
            {
                self.modify(Resource::$resource, id, data).await
            }

            #[doc = concat!("Delete a ", $one, ".")]
            pub async fn $delete(&self, id: &str) -> Result<Value> {
                self.delete(Resource::$resource, id).await
            }
        )*
    };
}

impl SaiseiClient {
    /// Start a builder for the appliance at `host`.
    ///
    /// # Errors
    ///
    /// See [`SaiseiClientBuilder::new`].
    pub fn builder(host: impl Into<String>) -> Result<SaiseiClientBuilder> {
        SaiseiClientBuilder::new(host)
    }

    /// Construct a client from configuration and credentials.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configuration is invalid.
    pub fn from_config(config: &SaiseiConfig, credentials: Credentials) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(Connection::new(config, credentials)?),
        })
    }

    /// Return the underlying connection.
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.inner
    }

    resource_methods! {
        Interfaces("interface", "interfaces") =>
            get_interfaces, get_interface, add_interface, modify_interface, delete_interface;
        Hosts("host", "hosts") =>
            get_hosts, get_host, add_host, modify_host, delete_host;
        Users("user", "users") =>
            get_users, get_user, add_user, modify_user, delete_user;
        Policies("policy", "policies") =>
            get_policies, get_policy, add_policy, modify_policy, delete_policy;
        FlowClasses("flow class", "flow classes") =>
            get_flow_classes, get_flow_class, add_flow_class, modify_flow_class, delete_flow_class;
    }

    /// Fetch the running configuration root.
    pub async fn get_running_configuration(&self) -> Result<Value> {
        self.execute_json(SaiseiRequest::new(Verb::Get, root_path())).await
    }

    /// List a collection.
    pub async fn list(&self, resource: Resource, options: &ListOptions) -> Result<Value> {
        let request = SaiseiRequest::new(Verb::Get, resource.collection_path())
            .query_pairs(options.to_pairs());
        self.execute_json(request).await
    }

    /// Fetch one item of a collection.
    pub async fn get(&self, resource: Resource, id: &str) -> Result<Value> {
        let path = resource.item_path(id)?;
        self.execute_json(SaiseiRequest::new(Verb::Get, path)).await
    }

    /// Create an item in a collection.
    pub async fn add<B>(&self, resource: Resource, data: &B) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let request = SaiseiRequest::new(Verb::Post, resource.collection_path()).body(data)?;
        self.execute_json(request).await
    }

    /// Update an item of a collection.
    pub async fn modify<B>(&self, resource: Resource, id: &str, data: &B) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let request = SaiseiRequest::new(Verb::Put, resource.item_path(id)?).body(data)?;
        self.execute_json(request).await
    }

    /// Delete an item of a collection.
    pub async fn delete(&self, resource: Resource, id: &str) -> Result<Value> {
        let path = resource.item_path(id)?;
        self.execute_json(SaiseiRequest::new(Verb::Delete, path)).await
    }

    /// Run an arbitrary request and return the raw response.
    pub async fn execute(&self, request: SaiseiRequest) -> Result<RawResponse> {
        self.inner.execute(request).await
    }

    /// Run an arbitrary request and decode the JSON body.
    pub async fn execute_json<T>(&self, request: SaiseiRequest) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.execute(request).await?.decode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{basic_auth, body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn test_client(server: &MockServer) -> SaiseiClient {
        let address = server.address();
        SaiseiClient::builder(address.ip().to_string())
            .unwrap()
            .with_scheme(Scheme::Http)
            .with_port(address.port())
            .with_basic_auth("admin", "admin")
            .build()
            .unwrap()
    }

    #[test]
    fn build_requires_credentials() {
        let err = SaiseiClient::builder("appliance").unwrap().build().unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn builder_rejects_empty_host() {
        assert!(SaiseiClient::builder("").is_err());
    }

    #[tokio::test]
    async fn get_host_issues_item_get_without_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/top/configurations/running/fibs/fib0/hosts/h1"))
            .and(basic_auth("admin", "admin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "h1",
                "address": "10.0.0.1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let host = client.get_host("h1").await.unwrap();
        assert_eq!(host["name"], "h1");

        let received: Vec<Request> = server.received_requests().await.unwrap();
        assert!(received[0].body.is_empty());
        assert!(received[0].url.query().is_none());
    }

    #[tokio::test]
    async fn add_user_posts_to_collection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/top/configurations/running/users/"))
            .and(body_json(json!({"name": "alice"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "name": "alice",
                "link": {"href": "/rest/top/configurations/running/users/alice"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let user = client.add_user(&json!({"name": "alice"})).await.unwrap();
        assert_eq!(user["name"], "alice");
    }

    #[tokio::test]
    async fn modify_policy_sends_its_own_input() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/rest/top/configurations/running/policies/gold"))
            .and(body_json(json!({"assured_rate": 1000})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "gold",
                "assured_rate": 1000
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let policy = client
            .modify_policy("gold", &json!({"assured_rate": 1000}))
            .await
            .unwrap();
        assert_eq!(policy["assured_rate"], 1000);
    }

    #[tokio::test]
    async fn delete_flow_class_hits_item_path() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/top/configurations/running/flow_classes/voip"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.delete_flow_class("voip").await.unwrap();
    }

    #[tokio::test]
    async fn get_interfaces_forwards_list_options() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/top/configurations/running/interfaces/"))
            .and(query_param("select", "name,state"))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "collection": [{"name": "eth0"}, {"name": "eth1"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let options = ListOptions::new().with_select(["name", "state"]).with_limit(2);
        let interfaces = client.get_interfaces(&options).await.unwrap();
        assert_eq!(interfaces["collection"].as_array().unwrap().len(), 2);

        let received = server.received_requests().await.unwrap();
        assert_eq!(received[0].url.query(), Some("select=name%2Cstate&limit=2"));
    }

    #[tokio::test]
    async fn empty_identifier_never_reaches_the_server() {
        let server = MockServer::start().await;
        let client = test_client(&server);

        let err = client.delete_user("").await.unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn status_errors_pass_through_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.get_interface("eth0").await.unwrap_err();
        assert_eq!(
            err,
            Error::HttpStatus {
                code: 401,
                body: "unauthorized".to_string()
            }
        );
    }

    #[tokio::test]
    async fn malformed_json_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"name\": "))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.get_user("bob").await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn running_configuration_root() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/top/configurations/running/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "running"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let root = client.get_running_configuration().await.unwrap();
        assert_eq!(root["name"], "running");
    }
}
