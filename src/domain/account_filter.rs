//! Account search: filtering, sorting and pagination.
//!
//! [`AccountQuery`] is the raw request as it arrives from the API layer.
//! [`AccountFilter::from_query`] validates it into a typed [`AccountFilter`],
//! rejecting unknown sort fields and out-of-range paging before any storage
//! call. Repositories then evaluate the typed filter: PostgreSQL translates
//! it into SQL, the in-memory store calls [`AccountFilter::apply`].
//!
//! Evaluation order is fixed:
//!
//! 1. residency presence
//! 2. account number substring
//! 3. lease active on a given instant
//! 4. resident first / last / middle name substrings
//! 5. address substring
//! 6. ordering
//! 7. pagination

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::entities::{Account, AccountDetails, Resident};
use crate::error::AppError;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Account attributes accepted by `sortBy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    AccountNumber,
    StartDate,
    EndDate,
    Address,
    Area,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::AccountNumber,
        SortField::StartDate,
        SortField::EndDate,
        SortField::Address,
        SortField::Area,
    ];

    /// Name used in query strings and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::AccountNumber => "accountNumber",
            SortField::StartDate => "startDate",
            SortField::EndDate => "endDate",
            SortField::Address => "address",
            SortField::Area => "area",
        }
    }

    fn compare(&self, a: &Account, b: &Account) -> Ordering {
        match self {
            SortField::AccountNumber => a.account_number.cmp(&b.account_number),
            SortField::StartDate => a.start_date.cmp(&b.start_date),
            SortField::EndDate => a.end_date.cmp(&b.end_date),
            SortField::Address => a.address.cmp(&b.address),
            SortField::Area => a.area.cmp(&b.area),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = AppError;

    /// Accepts camelCase, PascalCase and snake_case spellings, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        SortField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| {
                let allowed: Vec<&str> = SortField::ALL.iter().map(SortField::as_str).collect();
                AppError::bad_request(
                    "Unknown sort field",
                    json!({ "sortBy": s, "allowed": allowed }),
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(AppError::bad_request(
                "Unknown sort direction",
                json!({ "sortDirection": s, "allowed": ["asc", "desc"] }),
            ))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSort {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Unvalidated search request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountQuery {
    pub has_residents: Option<bool>,
    pub number: Option<String>,
    pub active_on_date: Option<DateTime<Utc>>,
    pub resident_first_name: Option<String>,
    pub resident_last_name: Option<String>,
    pub resident_middle_name: Option<String>,
    pub address: Option<String>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Validated account search.
///
/// Empty substring filters are dropped during validation, so every `Some`
/// here is a real constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountFilter {
    pub has_residents: bool,
    pub number: Option<String>,
    pub active_on_date: Option<DateTime<Utc>>,
    pub resident_first_name: Option<String>,
    pub resident_last_name: Option<String>,
    pub resident_middle_name: Option<String>,
    pub address: Option<String>,
    pub sort: Option<AccountSort>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for AccountFilter {
    fn default() -> Self {
        Self {
            has_residents: false,
            number: None,
            active_on_date: None,
            resident_first_name: None,
            resident_last_name: None,
            resident_middle_name: None,
            address: None,
            sort: None,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl AccountFilter {
    /// Validates a raw query.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - `sort_by` is not a [`SortField`]
    /// - `sort_direction` is neither `asc` nor `desc`
    /// - `page` is 0
    /// - `page_size` is outside `1..=MAX_PAGE_SIZE`
    pub fn from_query(query: AccountQuery) -> Result<Self, AppError> {
        let page = query.page.unwrap_or(DEFAULT_PAGE);
        if page == 0 {
            return Err(AppError::bad_request(
                "Page must be greater than 0",
                json!({ "page": page }),
            ));
        }

        let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::bad_request(
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
                json!({ "pageSize": page_size }),
            ));
        }

        let direction = match non_empty(query.sort_direction) {
            Some(d) => d.parse::<SortDirection>()?,
            None => SortDirection::default(),
        };

        let sort = match non_empty(query.sort_by) {
            Some(field) => Some(AccountSort {
                field: field.parse()?,
                direction,
            }),
            None => None,
        };

        Ok(Self {
            has_residents: query.has_residents.unwrap_or(false),
            number: non_empty(query.number),
            active_on_date: query.active_on_date,
            resident_first_name: non_empty(query.resident_first_name),
            resident_last_name: non_empty(query.resident_last_name),
            resident_middle_name: non_empty(query.resident_middle_name),
            address: non_empty(query.address),
            sort,
            page,
            page_size,
        })
    }

    /// Number of rows skipped before the requested page.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    /// Returns `true` if the account passes every filter (sorting and paging aside).
    pub fn matches(&self, details: &AccountDetails) -> bool {
        let account = &details.account;

        if self.has_residents && !details.has_residents() {
            return false;
        }

        if let Some(number) = &self.number
            && !account.account_number.contains(number.as_str())
        {
            return false;
        }

        if let Some(at) = self.active_on_date
            && !account.is_active_on(at)
        {
            return false;
        }

        if let Some(first) = &self.resident_first_name
            && !any_resident(&details.residents, |r| r.first_name.contains(first.as_str()))
        {
            return false;
        }

        if let Some(last) = &self.resident_last_name
            && !any_resident(&details.residents, |r| r.last_name.contains(last.as_str()))
        {
            return false;
        }

        if let Some(middle) = &self.resident_middle_name
            && !any_resident(&details.residents, |r| {
                r.middle_name
                    .as_deref()
                    .is_some_and(|m| m.contains(middle.as_str()))
            })
        {
            return false;
        }

        if let Some(address) = &self.address
            && !account.address.contains(address.as_str())
        {
            return false;
        }

        true
    }

    /// Filters, orders and paginates an in-memory account set.
    ///
    /// Without a sort the input order is preserved.
    pub fn apply(&self, accounts: Vec<AccountDetails>) -> Vec<Account> {
        let mut matched: Vec<Account> = accounts
            .into_iter()
            .filter(|details| self.matches(details))
            .map(|details| details.account)
            .collect();

        if let Some(sort) = self.sort {
            matched.sort_by(|a, b| {
                let ordering = sort.field.compare(a, b);
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        matched
            .into_iter()
            .skip(self.offset() as usize)
            .take(self.page_size as usize)
            .collect()
    }
}

fn any_resident(residents: &[Resident], predicate: impl Fn(&Resident) -> bool) -> bool {
    residents.iter().any(predicate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn account(number: &str, address: &str, area: i32) -> Account {
        Account::new(
            Uuid::new_v4(),
            number.to_string(),
            at(2024, 1, 1),
            at(2025, 1, 1),
            address.to_string(),
            area,
        )
    }

    fn resident(account_id: Uuid, first: &str, last: &str, middle: Option<&str>) -> Resident {
        Resident {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            middle_name: middle.map(str::to_string),
            birth_date: None,
            account_id,
        }
    }

    fn details(account: Account, residents: Vec<Resident>) -> AccountDetails {
        AccountDetails { account, residents }
    }

    fn filter(query: AccountQuery) -> AccountFilter {
        AccountFilter::from_query(query).unwrap()
    }

    #[test]
    fn test_defaults() {
        let f = filter(AccountQuery::default());
        assert_eq!(f, AccountFilter::default());
        assert_eq!(f.offset(), 0);
        assert_eq!(f.limit(), 10);
    }

    #[test]
    fn test_empty_strings_are_ignored() {
        let f = filter(AccountQuery {
            number: Some(String::new()),
            address: Some(String::new()),
            sort_by: Some(String::new()),
            ..Default::default()
        });

        assert!(f.number.is_none());
        assert!(f.address.is_none());
        assert!(f.sort.is_none());
    }

    #[test]
    fn test_unknown_sort_field_rejected() {
        let result = AccountFilter::from_query(AccountQuery {
            sort_by: Some("residents".to_string()),
            ..Default::default()
        });

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_unknown_sort_direction_rejected() {
        let result = AccountFilter::from_query(AccountQuery {
            sort_by: Some("area".to_string()),
            sort_direction: Some("sideways".to_string()),
            ..Default::default()
        });

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_sort_field_spellings() {
        for spelling in ["accountNumber", "AccountNumber", "account_number", "ACCOUNTNUMBER"] {
            assert_eq!(
                spelling.parse::<SortField>().unwrap(),
                SortField::AccountNumber
            );
        }
        assert_eq!("StartDate".parse::<SortField>().unwrap(), SortField::StartDate);
        assert_eq!("end_date".parse::<SortField>().unwrap(), SortField::EndDate);
    }

    #[test]
    fn test_sort_direction_case_insensitive() {
        assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert_eq!("Asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
    }

    #[test]
    fn test_page_zero_rejected() {
        let result = AccountFilter::from_query(AccountQuery {
            page: Some(0),
            ..Default::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_page_size_bounds() {
        for bad in [0, MAX_PAGE_SIZE + 1] {
            let result = AccountFilter::from_query(AccountQuery {
                page_size: Some(bad),
                ..Default::default()
            });
            assert!(result.is_err(), "page size {bad} should be rejected");
        }

        for good in [1, MAX_PAGE_SIZE] {
            let result = AccountFilter::from_query(AccountQuery {
                page_size: Some(good),
                ..Default::default()
            });
            assert!(result.is_ok(), "page size {good} should be accepted");
        }
    }

    #[test]
    fn test_has_residents_excludes_empty_accounts() {
        let occupied = account("1000000001", "A", 10);
        let empty = account("1000000002", "B", 10);
        let occupied_id = occupied.id;

        let set = vec![
            details(occupied, vec![resident(occupied_id, "Ivan", "Petrov", None)]),
            details(empty, vec![]),
        ];

        let result = filter(AccountQuery {
            has_residents: Some(true),
            ..Default::default()
        })
        .apply(set);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, occupied_id);
    }

    #[test]
    fn test_has_residents_false_is_no_filter() {
        let set = vec![
            details(account("1000000001", "A", 10), vec![]),
            details(account("1000000002", "B", 10), vec![]),
        ];

        let result = filter(AccountQuery {
            has_residents: Some(false),
            ..Default::default()
        })
        .apply(set);

        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_number_substring() {
        let set = vec![
            details(account("0001230000", "A", 10), vec![]),
            details(account("9999999999", "B", 10), vec![]),
            details(account("1230000000", "C", 10), vec![]),
        ];

        let result = filter(AccountQuery {
            number: Some("123".to_string()),
            ..Default::default()
        })
        .apply(set);

        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|a| a.account_number.contains("123")));
    }

    #[test]
    fn test_active_on_date() {
        let mut expired = account("1000000001", "A", 10);
        expired.start_date = at(2020, 1, 1);
        expired.end_date = at(2021, 1, 1);
        let current = account("1000000002", "B", 10);
        let current_id = current.id;

        let result = filter(AccountQuery {
            active_on_date: Some(at(2024, 6, 1)),
            ..Default::default()
        })
        .apply(vec![details(expired, vec![]), details(current, vec![])]);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, current_id);
    }

    #[test]
    fn test_resident_name_filters_combine_with_and() {
        let a = account("1000000001", "A", 10);
        let b = account("1000000002", "B", 10);
        let (a_id, b_id) = (a.id, b.id);

        let set = vec![
            details(
                a,
                vec![
                    resident(a_id, "Ivan", "Petrov", None),
                    resident(a_id, "Maria", "Sidorova", Some("Ivanovna")),
                ],
            ),
            details(b, vec![resident(b_id, "Ivan", "Smirnov", None)]),
        ];

        // first name from one resident, last name from another: still a match
        let result = filter(AccountQuery {
            resident_first_name: Some("Mar".to_string()),
            resident_last_name: Some("Petrov".to_string()),
            ..Default::default()
        })
        .apply(set.clone());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, a_id);

        let result = filter(AccountQuery {
            resident_first_name: Some("Ivan".to_string()),
            ..Default::default()
        })
        .apply(set.clone());
        assert_eq!(result.len(), 2);

        let result = filter(AccountQuery {
            resident_first_name: Some("Ivan".to_string()),
            resident_last_name: Some("Smirnov".to_string()),
            ..Default::default()
        })
        .apply(set);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, b_id);
    }

    #[test]
    fn test_middle_name_missing_never_matches() {
        let a = account("1000000001", "A", 10);
        let a_id = a.id;

        let result = filter(AccountQuery {
            resident_middle_name: Some("a".to_string()),
            ..Default::default()
        })
        .apply(vec![details(a, vec![resident(a_id, "Ivan", "Petrov", None)])]);

        assert!(result.is_empty());
    }

    #[test]
    fn test_address_substring_is_case_sensitive() {
        let set = vec![
            details(account("1000000001", "12 Main St", 10), vec![]),
            details(account("1000000002", "main road", 10), vec![]),
        ];

        let result = filter(AccountQuery {
            address: Some("Main".to_string()),
            ..Default::default()
        })
        .apply(set);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].address, "12 Main St");
    }

    #[test]
    fn test_sort_by_area_desc() {
        let set = vec![
            details(account("1000000001", "A", 30), vec![]),
            details(account("1000000002", "B", 90), vec![]),
            details(account("1000000003", "C", 60), vec![]),
        ];

        let result = filter(AccountQuery {
            sort_by: Some("area".to_string()),
            sort_direction: Some("desc".to_string()),
            ..Default::default()
        })
        .apply(set);

        let areas: Vec<i32> = result.iter().map(|a| a.area).collect();
        assert_eq!(areas, vec![90, 60, 30]);
    }

    #[test]
    fn test_sort_defaults_to_ascending() {
        let set = vec![
            details(account("1000000003", "A", 1), vec![]),
            details(account("1000000001", "B", 1), vec![]),
            details(account("1000000002", "C", 1), vec![]),
        ];

        let result = filter(AccountQuery {
            sort_by: Some("accountNumber".to_string()),
            ..Default::default()
        })
        .apply(set);

        let numbers: Vec<&str> = result.iter().map(|a| a.account_number.as_str()).collect();
        assert_eq!(numbers, vec!["1000000001", "1000000002", "1000000003"]);
    }

    #[test]
    fn test_second_page_of_twelve() {
        let set: Vec<AccountDetails> = (1..=12)
            .map(|i| details(account(&format!("{i:010}"), "A", i), vec![]))
            .collect();

        let result = filter(AccountQuery {
            sort_by: Some("area".to_string()),
            page: Some(2),
            page_size: Some(5),
            ..Default::default()
        })
        .apply(set);

        let areas: Vec<i32> = result.iter().map(|a| a.area).collect();
        assert_eq!(areas, vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let set: Vec<AccountDetails> = (1..=3)
            .map(|i| details(account(&format!("{i:010}"), "A", i), vec![]))
            .collect();

        let result = filter(AccountQuery {
            page: Some(5),
            ..Default::default()
        })
        .apply(set);

        assert!(result.is_empty());
    }
}
