//! Query parameters for account search.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_with::{NoneAsEmptyString, serde_as};

use crate::domain::account_filter::AccountQuery;

/// Query string of `GET /api/account/filter`.
///
/// Uses `serde_with` to parse numbers and booleans from query strings. An
/// empty value (`page=`) is the same as leaving the key out.
/// Semantic checks (sort field, page bounds) happen in the domain layer.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountFilterParams {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub has_residents: Option<bool>,

    pub number: Option<String>,

    #[serde(default, with = "optional_rfc3339")]
    pub active_on_date: Option<DateTime<Utc>>,

    pub resident_first_name: Option<String>,

    #[serde(alias = "residentSecondName")]
    pub resident_last_name: Option<String>,

    pub resident_middle_name: Option<String>,

    pub address: Option<String>,

    pub sort_by: Option<String>,

    pub sort_direction: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl From<AccountFilterParams> for AccountQuery {
    fn from(p: AccountFilterParams) -> Self {
        AccountQuery {
            has_residents: p.has_residents,
            number: p.number,
            active_on_date: p.active_on_date,
            resident_first_name: p.resident_first_name,
            resident_last_name: p.resident_last_name,
            resident_middle_name: p.resident_middle_name,
            address: p.address,
            sort_by: p.sort_by,
            sort_direction: p.sort_direction,
            page: p.page,
            page_size: p.page_size,
        }
    }
}

/// Custom Serde deserializer for RFC3339 datetime strings. An empty value
/// means no filter.
mod optional_rfc3339 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<String> = Option::deserialize(deserializer)?;
        match opt.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(serde::de::Error::custom),
        }
    }
}
