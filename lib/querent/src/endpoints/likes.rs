//! Like and unlike commands.

use std::sync::LazyLock;

use querent_core::{
    BuildMode, EndpointFamily, FieldDecl, Method, OperationKind, ParameterSet, Rule, RuleTable,
    WireToken,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::{ApiClient, HttpClient, Result};

/// The likes endpoint family.
#[derive(Debug, Clone, Copy)]
pub struct Likes;

/// Operation kinds of [`Likes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LikeKind {
    /// `POST users/{id}/likes` with `{"tweet_id": ..}`.
    Like,
    /// `DELETE users/{id}/likes/{tweet_id}`.
    Unlike,
}

impl WireToken for LikeKind {
    fn wire_token(&self) -> &'static str {
        match self {
            Self::Like => "Like",
            Self::Unlike => "Unlike",
        }
    }
}

impl OperationKind for LikeKind {
    fn from_token(token: &str) -> Option<Self> {
        [Self::Like, Self::Unlike]
            .into_iter()
            .find(|kind| kind.wire_token() == token)
    }

    fn mode(&self) -> BuildMode {
        match self {
            Self::Like => BuildMode::Body,
            Self::Unlike => BuildMode::Path,
        }
    }

    fn path_template(&self) -> &'static str {
        match self {
            Self::Like => "users/{id}/likes",
            Self::Unlike => "users/{id}/likes/{tweet_id}",
        }
    }

    fn method(&self) -> Method {
        match self {
            Self::Like => Method::Post,
            Self::Unlike => Method::Delete,
        }
    }
}

impl EndpointFamily for Likes {
    type Kind = LikeKind;

    const NAME: &'static str = "likes";

    const FIELDS: &'static [FieldDecl] = &[
        FieldDecl::selector("Type"),
        FieldDecl::path("UserID", "id"),
        FieldDecl::path("TweetID", "tweet_id"),
    ];

    fn rules() -> &'static RuleTable<LikeKind> {
        static RULES: LazyLock<RuleTable<LikeKind>> = LazyLock::new(|| {
            let both = Rule::new().require("UserID").require("TweetID");
            RuleTable::new()
                .rule(LikeKind::Like, both.clone())
                .rule(LikeKind::Unlike, both)
        });
        &RULES
    }
}

/// Payload of a like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LikedTweet<'a> {
    /// Tweet to like.
    pub tweet_id: &'a str,
}

/// Outcome of a like or unlike.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LikedResponse {
    /// Present when the API acknowledged the command.
    #[serde(default)]
    pub data: Option<LikedData>,
}

/// Like state after the command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct LikedData {
    /// `true` after a like, `false` after an unlike.
    pub liked: bool,
}

impl LikedResponse {
    /// Like state, if the API reported one.
    #[must_use]
    pub fn liked(&self) -> Option<bool> {
        self.data.map(|data| data.liked)
    }
}

/// Blank arguments count as missing.
fn like_params(user_id: &str, tweet_id: &str) -> ParameterSet {
    [("UserID", user_id), ("TweetID", tweet_id)]
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .collect()
}

impl<C: HttpClient> ApiClient<C> {
    /// Like a tweet on behalf of a user.
    ///
    /// # Errors
    ///
    /// [`crate::Error::MissingRequiredField`] for a blank ID, before anything is sent;
    /// then transport, HTTP and deserialization errors.
    pub async fn like(&self, user_id: &str, tweet_id: &str, cancel: &CancellationToken) -> Result<LikedResponse> {
        let payload = LikedTweet { tweet_id };
        self.command::<Likes, _, LikedResponse>(
            LikeKind::Like,
            Some(like_params(user_id, tweet_id)),
            Some(&payload),
            cancel,
        )
        .await
        .map(|result| result.value)
    }

    /// Remove a user's like.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::like`].
    pub async fn unlike(&self, user_id: &str, tweet_id: &str, cancel: &CancellationToken) -> Result<LikedResponse> {
        self.command::<Likes, (), LikedResponse>(
            LikeKind::Unlike,
            Some(like_params(user_id, tweet_id)),
            None,
            cancel,
        )
        .await
        .map(|result| result.value)
    }
}
