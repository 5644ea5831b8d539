//! Repository locator parsing.
//!
//! Accepts repository slugs (`org/repo`), scheme-less GitHub URLs (`github.com/org/repo`), full
//! URLs, and VCS locators (`git+https://github.com/org/repo@ref`), normalizing all of them to
//! `<scheme>://<host>/<org>/<repo>`.

// std
use std::str::FromStr;
// self
use crate::_prelude::*;

const DEFAULT_HOST: &str = "github.com";
const DEFAULT_SCHEME: &str = "https";
const LOCATOR_PREFIX: &str = "git+";

/// Errors emitted when parsing a repository locator.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum RepoLocatorError {
	/// Input looks like a URL but cannot be parsed as one.
	#[error("Repository locator `{input}` is not a valid URL.")]
	InvalidUrl {
		/// The offending input.
		input: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Path does not name both an organization and a repository.
	#[error("URL path needs to have an org and repo: `{input}`.")]
	MissingRepository {
		/// The offending input.
		input: String,
	},
}

/// Normalized repository location.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoLocator {
	/// URL scheme without any `git+` prefix.
	pub scheme: String,
	/// Host name, `github.com` unless the input named another.
	pub host: String,
	/// Owning organization or user.
	pub org: String,
	/// Repository name, stripped of any `@ref` suffix.
	pub repo: String,
}
impl RepoLocator {
	/// Parses any supported locator form.
	pub fn parse(input: &str) -> Result<Self, RepoLocatorError> {
		let raw = if input.starts_with(DEFAULT_HOST) {
			format!("{DEFAULT_SCHEME}://{input}")
		} else {
			input.to_owned()
		};
		let (scheme, host, path) = if raw.contains("://") {
			let url = Url::parse(&raw).map_err(|source| RepoLocatorError::InvalidUrl {
				input: input.to_owned(),
				source,
			})?;
			let host = url.host_str().unwrap_or_default().to_owned();

			(url.scheme().to_owned(), host, url.path().to_owned())
		} else {
			let path = raw.split(['?', '#']).next().unwrap_or_default().to_owned();

			(String::new(), String::new(), path)
		};
		let mut parts = path.trim_start_matches('/').split('/');
		let (org, repo) = match (parts.next(), parts.next()) {
			(Some(org), Some(repo)) if !org.is_empty() && !repo.is_empty() => (org, repo),
			_ => return Err(RepoLocatorError::MissingRepository { input: input.to_owned() }),
		};
		let repo = match scheme.strip_prefix(LOCATOR_PREFIX) {
			Some(_) => repo.split_once('@').map_or(repo, |(name, _)| name),
			None => repo,
		};
		let scheme = match scheme.trim_start_matches(LOCATOR_PREFIX) {
			"" => DEFAULT_SCHEME,
			scheme => scheme,
		};
		let host = if host.is_empty() { DEFAULT_HOST } else { host.as_str() };

		Ok(Self {
			scheme: scheme.to_owned(),
			host: host.to_owned(),
			org: org.to_owned(),
			repo: repo.to_owned(),
		})
	}

	/// `org/repo` slug.
	pub fn slug(&self) -> String {
		format!("{}/{}", self.org, self.repo)
	}
}
impl FromStr for RepoLocator {
	type Err = RepoLocatorError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}
impl Display for RepoLocator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}://{}/{}/{}", self.scheme, self.host, self.org, self.repo)
	}
}

/// Normalizes a repository locator string into a repository URL.
pub fn repo_from_string(input: &str) -> Result<String, RepoLocatorError> {
	RepoLocator::parse(input).map(|locator| locator.to_string())
}
