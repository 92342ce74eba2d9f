use std::fmt;

use serde::Deserialize;

use crate::horizon::HorizonError;

/// The fields of a Horizon account record that the provider uses. Unknown fields are ignored.
#[derive(Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct AccountResponse {
    /// The account strkey
    pub id: String,
    /// The current sequence number, as a decimal string
    pub sequence: String,
}

impl AccountResponse {
    /// Parse the sequence number.
    pub fn sequence_number(&self) -> Result<u64, HorizonError> {
        self.sequence
            .parse()
            .map_err(|_| HorizonError::InvalidSequence(self.sequence.clone()))
    }
}

/// An RFC 7807 problem document, as returned by Horizon for failed requests.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Problem {
    /// The problem type URL
    #[serde(default, rename = "type")]
    pub kind: String,
    /// A short summary
    #[serde(default)]
    pub title: String,
    /// The HTTP status
    #[serde(default)]
    pub status: u16,
    /// A longer explanation
    #[serde(default)]
    pub detail: String,
    /// Problem-specific data, e.g. result codes of a failed transaction
    #[serde(default)]
    pub extras: Option<serde_json::Value>,
}

impl Problem {
    /// Parse a problem document from a response body. Bodies that are not problem documents
    /// are kept verbatim as the detail.
    pub fn from_body(status: u16, body: &str) -> Self {
        let mut problem = serde_json::from_str::<Problem>(body).unwrap_or_else(|_| Problem {
            title: "Unexpected response".to_owned(),
            detail: body.to_owned(),
            ..Default::default()
        });
        if problem.status == 0 {
            problem.status = status;
        }
        problem
    }

    /// The `result_codes` of a failed transaction submission, if present.
    pub fn result_codes(&self) -> Option<&serde_json::Value> {
        self.extras.as_ref()?.get("result_codes")
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Horizon error {}: {}", self.status, self.title)?;
        if !self.detail.is_empty() {
            write!(f, ". {}", self.detail)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_parses_account_records() {
        let json = r#"{
            "id": "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF",
            "account_id": "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF",
            "sequence": "3298702387052545",
            "subentry_count": 0,
            "balances": [{"balance": "10000.0000000", "asset_type": "native"}]
        }"#;
        let record: AccountResponse = serde_json::from_str(json).unwrap();
        assert_eq!(record.sequence_number().unwrap(), 3_298_702_387_052_545);

        let bad = AccountResponse {
            sequence: "-1".to_owned(),
            ..record
        };
        assert!(matches!(
            bad.sequence_number(),
            Err(HorizonError::InvalidSequence(_))
        ));
    }

    #[test]
    fn it_parses_problems() {
        let json = r#"{
            "type": "https://stellar.org/horizon-errors/transaction_failed",
            "title": "Transaction Failed",
            "status": 400,
            "detail": "The transaction failed when submitted to the network.",
            "extras": {
                "result_codes": {"transaction": "tx_bad_seq"},
                "result_xdr": "AAAAAAAAAGT////7AAAAAA=="
            }
        }"#;
        let problem = Problem::from_body(400, json);
        assert_eq!(problem.title, "Transaction Failed");
        assert_eq!(
            problem.result_codes().unwrap()["transaction"],
            "tx_bad_seq"
        );
        assert!(problem.to_string().starts_with("Horizon error 400: Transaction Failed"));

        let raw = Problem::from_body(502, "Bad Gateway");
        assert_eq!(raw.status, 502);
        assert_eq!(raw.detail, "Bad Gateway");
        assert_eq!(raw.result_codes(), None);
    }
}
