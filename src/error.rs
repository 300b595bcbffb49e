//! Error types. Content failures never leave the provider (they collapse into
//! an empty question list); game errors are reported back to the client.

use thiserror::Error;

/// Failure while talking to the remote content API.
#[derive(Debug, Error)]
pub enum ContentError {
  #[error("could not build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("request to {url} failed: {source}")]
  Transport {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("content endpoint {url} answered HTTP {status}")]
  Status { url: String, status: reqwest::StatusCode },

  #[error("malformed content from {url}: {source}")]
  Body {
    url: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("no content endpoint configured for tier '{0}'")]
  NoEndpoint(String),
}

/// A user intent the game core refuses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
  #[error("unknown player: {0}")]
  UnknownPlayer(String),

  #[error("questions are still loading")]
  Loading,

  #[error("no game in progress")]
  NoActiveGame,

  #[error("this action belongs to the {expected} game")]
  WrongMode { expected: &'static str },

  #[error("fill every blank before confirming")]
  IncompleteGuess,

  #[error("select an option before moving on")]
  NoSelection,

  #[error("the session is already finished")]
  SessionFinished,

  #[error("nothing to restart")]
  NothingToRestart,

  #[error("screen '{0}' can only be reached by starting a game")]
  ForbiddenNavigation(&'static str),

  #[error(transparent)]
  InvalidOption(#[from] ParseOptionKeyError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid option letter '{0}', expected a-e")]
pub struct ParseOptionKeyError(pub String);
