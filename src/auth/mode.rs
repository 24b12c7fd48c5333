//! Output shapes a caller can request from the broker.

// self
use crate::_prelude::*;

/// Shape of the value returned (and cached) for a token request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
	/// Access token prefixed with `Bearer `, ready for an `Authorization` header.
	Bearer,
	/// Bare access token string.
	#[default]
	Token,
	/// Full decoded token endpoint response.
	Raw,
}
impl OutputMode {
	/// Every supported mode.
	pub const ALL: [Self; 3] = [Self::Bearer, Self::Token, Self::Raw];

	/// Returns the stable label used for parsing, cache keys, and span fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OutputMode::Bearer => "bearer",
			OutputMode::Token => "token",
			OutputMode::Raw => "raw",
		}
	}
}
impl Display for OutputMode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for OutputMode {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL.into_iter().find(|mode| mode.as_str() == s).ok_or_else(|| {
			Error::InvalidArgument {
				reason: format!("invalid mode `{s}`, expected one of `bearer`, `token`, or `raw`"),
			}
		})
	}
}
