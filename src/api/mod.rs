//! HTTP client for the ComplexApp API.
//!
//! Every call takes a [`CancellationToken`]. Cancelling it drops the in-flight
//! request and yields [`ClientError::Cancelled`], which callers treat as a
//! normal outcome rather than a failure.

pub mod models;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

pub use models::{format_date, Person, Post, ProfileCounts, ProfileData};

use crate::constants::CLIENT_USER_AGENT;
use crate::error::ClientError;
use crate::session::User;
use models::{
    EmailBody, LoginBody, PostBody, RegisterBody, SearchBody, TokenBody, UsernameBody,
};

/// Cheaply cloneable API client bound to one base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the API at `base_url`.
    ///
    /// No request timeout is configured; requests end when they complete or
    /// when their cancellation token fires.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        let client = Client::builder().user_agent(CLIENT_USER_AGENT).build()?;

        Ok(Self { client, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `POST /checkToken` - whether the stored token is still accepted.
    pub async fn check_token(
        &self,
        token: &str,
        cancel: &CancellationToken,
    ) -> Result<bool, ClientError> {
        let value = self
            .post_json(&["checkToken"], &TokenBody { token }, cancel)
            .await?;
        Ok(decode(value)?)
    }

    /// `POST /login` - `None` when the credentials are rejected.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<User>, ClientError> {
        let value = self
            .post_json(&["login"], &LoginBody { username, password }, cancel)
            .await?;
        match value {
            Value::Object(_) => Ok(Some(decode(value)?)),
            _ => Ok(None),
        }
    }

    /// `POST /register` - the newly created account.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        cancel: &CancellationToken,
    ) -> Result<User, ClientError> {
        let body = RegisterBody {
            username,
            email,
            password,
        };
        let value = self.post_json(&["register"], &body, cancel).await?;
        Ok(decode(value)?)
    }

    /// `POST /doesUsernameExist`
    pub async fn does_username_exist(
        &self,
        username: &str,
        cancel: &CancellationToken,
    ) -> Result<bool, ClientError> {
        let value = self
            .post_json(&["doesUsernameExist"], &UsernameBody { username }, cancel)
            .await?;
        Ok(decode(value)?)
    }

    /// `POST /doesEmailExist`
    pub async fn does_email_exist(
        &self,
        email: &str,
        cancel: &CancellationToken,
    ) -> Result<bool, ClientError> {
        let value = self
            .post_json(&["doesEmailExist"], &EmailBody { email }, cancel)
            .await?;
        Ok(decode(value)?)
    }

    /// `GET /post/:id` - a missing post is reported as [`ClientError::NotFound`].
    pub async fn fetch_post(
        &self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<Post, ClientError> {
        let value = self.get_json(&["post", id], cancel).await?;
        decode_object(value)
    }

    /// `POST /post/:id/edit`
    pub async fn edit_post(
        &self,
        id: &str,
        title: &str,
        body: &str,
        token: &str,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        let payload = PostBody { title, body, token };
        self.post_json(&["post", id, "edit"], &payload, cancel)
            .await?;
        Ok(())
    }

    /// `DELETE /post/:id` - returns the server's acknowledgement text.
    pub async fn delete_post(
        &self,
        id: &str,
        token: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ClientError> {
        let request = self
            .request(Method::DELETE, &["post", id])?
            .json(&TokenBody { token });
        let value = self.send(request, cancel).await?;
        Ok(match value {
            Value::String(text) => text,
            other => other.to_string(),
        })
    }

    /// `POST /create-post` - returns the id of the new post.
    pub async fn create_post(
        &self,
        title: &str,
        body: &str,
        token: &str,
        cancel: &CancellationToken,
    ) -> Result<String, ClientError> {
        let payload = PostBody { title, body, token };
        let value = self.post_json(&["create-post"], &payload, cancel).await?;
        Ok(decode(value)?)
    }

    /// `POST /profile/:username`
    pub async fn fetch_profile(
        &self,
        username: &str,
        token: &str,
        cancel: &CancellationToken,
    ) -> Result<ProfileData, ClientError> {
        let value = self
            .post_json(&["profile", username], &TokenBody { token }, cancel)
            .await?;
        decode_object(value)
    }

    /// `GET /profile/:username/posts`
    pub async fn fetch_profile_posts(
        &self,
        username: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Post>, ClientError> {
        let value = self.get_json(&["profile", username, "posts"], cancel).await?;
        Ok(decode(value)?)
    }

    /// `GET /profile/:username/followers`
    pub async fn fetch_followers(
        &self,
        username: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Person>, ClientError> {
        let value = self
            .get_json(&["profile", username, "followers"], cancel)
            .await?;
        Ok(decode(value)?)
    }

    /// `GET /profile/:username/following`
    pub async fn fetch_following(
        &self,
        username: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Person>, ClientError> {
        let value = self
            .get_json(&["profile", username, "following"], cancel)
            .await?;
        Ok(decode(value)?)
    }

    /// `POST /addFollow/:username`
    pub async fn add_follow(
        &self,
        username: &str,
        token: &str,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        self.post_json(&["addFollow", username], &TokenBody { token }, cancel)
            .await?;
        Ok(())
    }

    /// `POST /removeFollow/:username`
    pub async fn remove_follow(
        &self,
        username: &str,
        token: &str,
        cancel: &CancellationToken,
    ) -> Result<(), ClientError> {
        self.post_json(&["removeFollow", username], &TokenBody { token }, cancel)
            .await?;
        Ok(())
    }

    /// `POST /search`
    pub async fn search(
        &self,
        search_term: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Post>, ClientError> {
        let value = self
            .post_json(&["search"], &SearchBody { search_term }, cancel)
            .await?;
        Ok(decode(value)?)
    }

    /// `POST /getHomeFeed`
    pub async fn home_feed(
        &self,
        token: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Post>, ClientError> {
        let value = self
            .post_json(&["getHomeFeed"], &TokenBody { token }, cancel)
            .await?;
        Ok(decode(value)?)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ClientError> {
        Ok(self.client.request(method, self.endpoint(segments)?))
    }

    async fn get_json(
        &self,
        segments: &[&str],
        cancel: &CancellationToken,
    ) -> Result<Value, ClientError> {
        let request = self.request(Method::GET, segments)?;
        self.send(request, cancel).await
    }

    async fn post_json<B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
        cancel: &CancellationToken,
    ) -> Result<Value, ClientError> {
        let request = self.request(Method::POST, segments)?.json(body);
        self.send(request, cancel).await
    }

    async fn send(
        &self,
        request: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<Value, ClientError> {
        let request = request.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(method = %method, path = %path, "Sending API request");

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(path = %path, "API request cancelled");
                return Err(ClientError::Cancelled);
            }
            result = self.client.execute(request) => result?,
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound);
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                path,
            });
        }

        let bytes = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ClientError::Cancelled),
            result = response.bytes() => result?,
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        // Some endpoints answer with bare text such as `Success`
        Ok(serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).trim().to_string())))
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(value)
}

/// The API answers lookups for absent records with a non-object (`false` or `null`).
fn decode_object<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    match value {
        Value::Object(_) => Ok(decode(value)?),
        _ => Err(ClientError::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_escapes_segments() {
        let api = ApiClient::new("http://localhost:8080").unwrap();
        let url = api.endpoint(&["profile", "a b/c", "posts"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/profile/a%20b%2Fc/posts");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = ApiClient::new("http://localhost:8080/api/").unwrap();
        let url = api.endpoint(&["checkToken"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/checkToken");
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(ApiClient::new("mailto:someone@example.com").is_err());
        assert!(ApiClient::new("not a url").is_err());
    }

    #[test]
    fn test_decode_object_not_found() {
        let result: Result<Post, _> = decode_object(Value::Bool(false));
        assert!(matches!(result, Err(ClientError::NotFound)));
        let result: Result<Post, _> = decode_object(Value::Null);
        assert!(matches!(result, Err(ClientError::NotFound)));
    }
}
