use reqwest::StatusCode;

use crate::errors::LookupError;
use crate::model::StatsResponse;

/// Stats endpoint queried when neither the config file nor
/// `MAXVIEW_API_URL` overrides it.
pub const DEFAULT_BASE_URL: &str = "https://osrs-stats.richard-h-misiak.workers.dev";

/// Thin client for the stats endpoint: one GET per lookup, no retry, no
/// caching. Cloning shares the underlying connection pool.
#[derive(Clone, Debug)]
pub struct HiscoresClient {
    http: reqwest::Client,
    base_url: String,
}

impl HiscoresClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the stats payload for a player. The username is sent trimmed;
    /// the server decides whether it is valid. Any non-200 status becomes
    /// `LookupError::Status`, an undecodable body becomes
    /// `LookupError::InvalidResponse`.
    pub async fn lookup(&self, user: &str) -> Result<StatsResponse, LookupError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&query_user(user))
            .send()
            .await
            .map_err(|err| LookupError::Transport(err.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| LookupError::Transport(err.to_string()))?;
        decode_stats(&body)
    }
}

/// The single query parameter of the stats endpoint. The username goes
/// out trimmed; whitespace-only input still produces a (blank) query and
/// the server decides validity.
fn query_user(user: &str) -> [(&'static str, &str); 1] {
    [("user", user.trim())]
}

/// Shape check at the API boundary: the payload either decodes into the
/// typed response or the lookup fails as an invalid response, never a
/// silent misrender.
fn decode_stats(body: &[u8]) -> Result<StatsResponse, LookupError> {
    serde_json::from_slice(body).map_err(|err| LookupError::InvalidResponse(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_trims_the_username() {
        assert_eq!(query_user("  zezima  "), [("user", "zezima")]);
        assert_eq!(query_user("lynx titan"), [("user", "lynx titan")]);
        assert_eq!(query_user("   "), [("user", "")]);
    }

    #[test]
    fn decodes_the_expected_payload_shape() {
        let body = br#"{"skills":[
            {"id":0,"name":"Overall","rank":1,"level":2277,"xp":4600000000},
            {"id":1,"name":"Attack","rank":-1,"level":50,"xp":100000}
        ]}"#;
        let stats = decode_stats(body).expect("payload should decode");
        assert_eq!(stats.skills.len(), 2);
        assert_eq!(stats.skills[1].name, "Attack");
        assert_eq!(stats.skills[1].rank, -1);
    }

    #[test]
    fn mismatched_shape_is_an_invalid_response() {
        let err = decode_stats(b"{\"players\":[]}").unwrap_err();
        assert!(matches!(err, LookupError::InvalidResponse(_)));

        let err = decode_stats(b"<html>down for maintenance</html>").unwrap_err();
        assert!(matches!(err, LookupError::InvalidResponse(_)));
    }
}
