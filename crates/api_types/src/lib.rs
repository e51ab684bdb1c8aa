use serde::{Deserialize, Serialize};

/// Number of attribute slots the minting API expects on every dispense
/// request. The client always sends them zeroed.
pub const ATTRIBUTE_SLOTS: usize = 5;

pub mod user {
    use super::*;

    /// Request body for `POST /v2/user/login/`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub username: String,
        pub password: String,
    }

    /// Response body for a successful login.
    ///
    /// The API omits `token` entirely on bad credentials, so the field is
    /// optional rather than the response being a distinct error shape.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub token: Option<String>,
    }
}

pub mod contract {
    use super::*;

    /// A minting authority deployed on a blockchain network.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Contract {
        pub id: i64,
        pub name: String,
        pub address: String,
    }

    /// Request body for `POST /v2/contracts/`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContractNew {
        pub network: i64,
        pub name: String,
        pub symbol: String,
        pub private_key: String,
    }

    /// Response body for `GET /v2/contracts/?self=true`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ContractsResponse {
        pub results: Vec<Contract>,
    }
}

pub mod series {
    use super::*;

    /// A named batch of mintable tokens under a contract.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Series {
        pub id: i64,
        pub name: String,
        /// Owning contract id; the list endpoint filters by contract
        /// address, so some deployments omit this field.
        #[serde(default)]
        pub contract: Option<i64>,
    }

    /// Request body for `POST /v2/series/`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SeriesNew {
        pub name: String,
        pub contract: i64,
        pub private_key: String,
    }

    /// Response body for `GET /v2/series/?contract={address}`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SeriesResponse {
        pub results: Vec<Series>,
    }
}

pub mod network {
    use super::*;

    /// A blockchain network a contract can be deployed to.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Network {
        pub id: i64,
        pub name: String,
        pub network_id: i64,
    }

    /// Response body for `GET /v2/networks/`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct NetworksResponse {
        pub results: Vec<Network>,
    }
}

pub mod token {
    use super::*;

    /// Request body for `PUT /v2/tokens/dispense/`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TokenDispense {
        pub series: i64,
        pub attributes: [i64; ATTRIBUTE_SLOTS],
    }

    impl TokenDispense {
        /// Dispense request for a series with all attribute slots zeroed.
        pub fn for_series(series: i64) -> Self {
            Self {
                series,
                attributes: [0; ATTRIBUTE_SLOTS],
            }
        }
    }

    /// Response body for a dispense: the redemption code reserving the token.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DispenseResponse {
        pub code: Option<String>,
    }

    /// Request body for `POST /v2/tokens/exchange/`: binds a reserved token
    /// to an owner address.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TokenExchange {
        pub code: String,
        pub owner: String,
    }

    /// Response body for an exchange.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExchangeResponse {
        pub id: Option<i64>,
    }

    /// Server-side lifecycle state of a token, from `GET /v2/tokens/{id}/`.
    /// A `status` of `"error"` is an application-level failure even when the
    /// HTTP status is 200.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TokenStatus {
        pub status: Option<String>,
    }

    /// Request body for `PUT /v2/tokens/{id}/` (metadata update).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TokenUpdate {
        pub name: String,
    }
}

pub mod error {
    use super::*;

    /// Error body shape used by the API on failure responses.
    ///
    /// Some endpoints populate `detail`, others `message`; the client shows
    /// whichever is present.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct FailureBody {
        #[serde(default)]
        pub detail: Option<String>,
        #[serde(default)]
        pub message: Option<String>,
    }

    impl FailureBody {
        /// The human-readable failure text, falling back to a generic one.
        pub fn text(&self) -> &str {
            self.detail
                .as_deref()
                .or(self.message.as_deref())
                .unwrap_or("unknown error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispense_serializes_five_zeroed_attributes() {
        let payload = token::TokenDispense::for_series(7);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["series"], 7);
        assert_eq!(json["attributes"], serde_json::json!([0, 0, 0, 0, 0]));
    }

    #[test]
    fn failure_body_prefers_detail_over_message() {
        let body: error::FailureBody =
            serde_json::from_str(r#"{"detail":"nope","message":"other"}"#).unwrap();
        assert_eq!(body.text(), "nope");

        let body: error::FailureBody = serde_json::from_str(r#"{"message":"other"}"#).unwrap();
        assert_eq!(body.text(), "other");

        let body: error::FailureBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.text(), "unknown error");
    }

    #[test]
    fn series_tolerates_missing_contract_field() {
        let series: series::Series =
            serde_json::from_str(r#"{"id":3,"name":"Spring drop"}"#).unwrap();
        assert_eq!(series.contract, None);
    }
}
