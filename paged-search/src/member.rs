//! Member/team search domain
//!
//! Members optionally belong to a team. Searches run over a member-left-join-team
//! projection ([`MemberTeamRow`]); only `team_name` lives on the joined
//! relation, so counts that do not filter on it can skip the join.
//!
//! # Example
//!
//! ```rust
//! use paged_search::member::MemberSearchCondition;
//! use paged_search::query::SearchCondition;
//!
//! let condition = MemberSearchCondition::new()
//!     .team_name("teamB")
//!     .age_goe(35)
//!     .age_loe(40);
//!
//! assert_eq!(
//!     condition.to_filter().to_string(),
//!     "team_name = 'teamB' AND age >= 35 AND age <= 40"
//! );
//! ```

use serde::{Deserialize, Serialize};

use crate::query::{all_of, FieldValue, FilterBuilder, FilterCondition, FilterExpression, SearchCondition};
use crate::search::PagedSearch;
use crate::store::{InMemoryRecordStore, Record, Schema};

/// Field names understood by the member store
pub mod fields {
    /// Member primary key
    pub const MEMBER_ID: &str = "member_id";
    /// Member username
    pub const USERNAME: &str = "username";
    /// Member age
    pub const AGE: &str = "age";
    /// Foreign key to the team; stored on the member row
    pub const TEAM_ID: &str = "team_id";
    /// Team name; requires the team join
    pub const TEAM_NAME: &str = "team_name";
}

/// Name of the joined team relation
pub const TEAM_RELATION: &str = "team";

/// Schema of the member-left-join-team projection
pub fn member_schema() -> Schema {
    Schema::new("member")
        .field(fields::MEMBER_ID)
        .field(fields::USERNAME)
        .field(fields::AGE)
        .field(fields::TEAM_ID)
        .joined_field(TEAM_RELATION, fields::TEAM_NAME)
}

/// Paged search over an in-memory member table
pub type MemberSearch = PagedSearch<InMemoryRecordStore<MemberTeamRow>>;

/// Sparse member search criteria; every absent field places no restriction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSearchCondition {
    /// Exact username
    #[serde(default)]
    pub username: Option<String>,
    /// Exact team name
    #[serde(default)]
    pub team_name: Option<String>,
    /// Inclusive lower age bound
    #[serde(default)]
    pub age_goe: Option<i32>,
    /// Inclusive upper age bound
    #[serde(default)]
    pub age_loe: Option<i32>,
}

impl MemberSearchCondition {
    /// Condition with every field absent
    pub fn new() -> Self {
        Self::default()
    }

    /// Require this username
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Require this team name
    #[must_use]
    pub fn team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = Some(team_name.into());
        self
    }

    /// Require `age >= age_goe`
    #[must_use]
    pub fn age_goe(mut self, age_goe: i32) -> Self {
        self.age_goe = Some(age_goe);
        self
    }

    /// Require `age <= age_loe`
    #[must_use]
    pub fn age_loe(mut self, age_loe: i32) -> Self {
        self.age_loe = Some(age_loe);
        self
    }

    /// Compose by accumulating present fields into a [`FilterBuilder`]
    pub fn filter_by_builder(&self) -> FilterExpression {
        FilterBuilder::new()
            .and_option(username_eq(self.username.as_deref()))
            .and_option(team_name_eq(self.team_name.as_deref()))
            .and_option(age_goe(self.age_goe))
            .and_option(age_loe(self.age_loe))
            .build()
    }

    /// Compose from one optional predicate per field
    pub fn filter_by_parts(&self) -> FilterExpression {
        all_of([
            username_eq(self.username.as_deref()),
            team_name_eq(self.team_name.as_deref()),
            age_goe(self.age_goe),
            age_loe(self.age_loe),
        ])
    }
}

impl SearchCondition for MemberSearchCondition {
    fn to_filter(&self) -> FilterExpression {
        self.filter_by_parts()
    }
}

/// Text that is present and not blank
pub fn has_text(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// `username = ?` when a username is given
pub fn username_eq(username: Option<&str>) -> Option<FilterExpression> {
    has_text(username).map(|u| FilterCondition::eq(fields::USERNAME, u).into())
}

/// `team_name = ?` when a team name is given
pub fn team_name_eq(team_name: Option<&str>) -> Option<FilterExpression> {
    has_text(team_name).map(|t| FilterCondition::eq(fields::TEAM_NAME, t).into())
}

/// `age >= ?` when a lower bound is given
pub fn age_goe(age_goe: Option<i32>) -> Option<FilterExpression> {
    age_goe.map(|age| FilterCondition::gte(fields::AGE, age).into())
}

/// `age <= ?` when an upper bound is given
pub fn age_loe(age_loe: Option<i32>) -> Option<FilterExpression> {
    age_loe.map(|age| FilterCondition::lte(fields::AGE, age).into())
}

/// `username = ? AND age = ?` over the present fields; `None` if both are absent
pub fn all_eq(username: Option<&str>, age: Option<i32>) -> Option<FilterExpression> {
    let filter = all_of([
        username_eq(username),
        age.map(|age| FilterCondition::eq(fields::AGE, age).into()),
    ]);
    (!filter.is_all()).then_some(filter)
}

/// One row of the member-left-join-team projection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberTeamRow {
    /// Member primary key
    pub member_id: i64,
    /// Username, if set
    pub username: Option<String>,
    /// Age in years
    pub age: i32,
    /// Team foreign key; `None` for members without a team
    pub team_id: Option<i64>,
    /// Name of the joined team; `None` when there is no team
    pub team_name: Option<String>,
}

impl MemberTeamRow {
    /// Member without a team
    pub fn new(member_id: i64, username: impl Into<String>, age: i32) -> Self {
        Self {
            member_id,
            username: Some(username.into()),
            age,
            team_id: None,
            team_name: None,
        }
    }

    /// Attach the member to a team
    #[must_use]
    pub fn with_team(mut self, team_id: i64, team_name: impl Into<String>) -> Self {
        self.team_id = Some(team_id);
        self.team_name = Some(team_name.into());
        self
    }
}

impl Record for MemberTeamRow {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            fields::MEMBER_ID => Some(self.member_id.into()),
            fields::USERNAME => Some(self.username.clone().into()),
            fields::AGE => Some(self.age.into()),
            fields::TEAM_ID => Some(self.team_id.into()),
            fields::TEAM_NAME => Some(self.team_name.clone().into()),
            _ => None,
        }
    }
}
