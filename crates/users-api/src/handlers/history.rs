use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use serde_json::Value;

use entity::{user_job, user_school};

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::serializers::history::{education_json, employment_json};
use crate::util::generate_guid;
use crate::validation::{require_text, DateRange, UserValidationError};

/// Attributes accepted for an education or employment entry. Absent
/// fields keep their current value on update.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryAttributes {
    pub institution: Option<String>,
    pub department: Option<String>,
    pub degree: Option<String>,
    pub title: Option<String>,
    pub start_month: Option<i32>,
    pub start_year: Option<i32>,
    pub end_month: Option<i32>,
    pub end_year: Option<i32>,
    pub ongoing: Option<bool>,
}

impl HistoryAttributes {
    pub fn from_json(value: &Value) -> ApiResult<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| ApiError::Validation(format!("Invalid attributes: {e}")))
    }
}

/// Fields shared by schools and jobs. `role` is the degree or the title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct HistoryEntry {
    institution: String,
    department: String,
    role: String,
    dates: DateRange,
}

impl HistoryEntry {
    fn apply(mut self, attrs: &HistoryAttributes, role: Option<&String>) -> Self {
        if let Some(v) = &attrs.institution {
            self.institution = v.trim().to_string();
        }
        if let Some(v) = &attrs.department {
            self.department = v.trim().to_string();
        }
        if let Some(v) = role {
            self.role = v.trim().to_string();
        }
        if attrs.start_month.is_some() {
            self.dates.start_month = attrs.start_month;
        }
        if attrs.start_year.is_some() {
            self.dates.start_year = attrs.start_year;
        }
        if attrs.end_month.is_some() {
            self.dates.end_month = attrs.end_month;
        }
        if attrs.end_year.is_some() {
            self.dates.end_year = attrs.end_year;
        }
        if let Some(ongoing) = attrs.ongoing {
            self.dates.ongoing = ongoing;
        }
        self.dates = self.dates.normalized();
        self
    }

    fn validate(&self) -> Result<(), UserValidationError> {
        require_text("institution", &self.institution)?;
        self.dates.validate()
    }
}

fn invalid(e: UserValidationError) -> ApiError {
    ApiError::InvalidModelValue(e.to_string())
}

fn school_entry(s: &user_school::Model) -> HistoryEntry {
    HistoryEntry {
        institution: s.institution.clone(),
        department: s.department.clone(),
        role: s.degree.clone(),
        dates: DateRange {
            start_month: s.start_month,
            start_year: s.start_year,
            end_month: s.end_month,
            end_year: s.end_year,
            ongoing: s.ongoing,
        },
    }
}

fn job_entry(j: &user_job::Model) -> HistoryEntry {
    HistoryEntry {
        institution: j.institution.clone(),
        department: j.department.clone(),
        role: j.title.clone(),
        dates: DateRange {
            start_month: j.start_month,
            start_year: j.start_year,
            end_month: j.end_month,
            end_year: j.end_year,
            ongoing: j.ongoing,
        },
    }
}

pub async fn list_education<C>(db: &C, ctx: &RequestContext, user_id: &str) -> ApiResult<Vec<Value>>
where
    C: ConnectionTrait,
{
    let urls = ctx.urls();
    Ok(user_school::Entity::find()
        .filter(user_school::Column::UserId.eq(user_id))
        .order_by_asc(user_school::Column::SortOrder)
        .all(db)
        .await?
        .iter()
        .map(|s| education_json(&urls, s))
        .collect())
}

pub async fn list_employment<C>(db: &C, ctx: &RequestContext, user_id: &str) -> ApiResult<Vec<Value>>
where
    C: ConnectionTrait,
{
    let urls = ctx.urls();
    Ok(user_job::Entity::find()
        .filter(user_job::Column::UserId.eq(user_id))
        .order_by_asc(user_job::Column::SortOrder)
        .all(db)
        .await?
        .iter()
        .map(|j| employment_json(&urls, j))
        .collect())
}

pub async fn create_education<C>(
    db: &C,
    ctx: &RequestContext,
    user_id: &str,
    attrs: &HistoryAttributes,
) -> ApiResult<Value>
where
    C: ConnectionTrait,
{
    ctx.require_self(user_id)?;
    let entry = HistoryEntry::default().apply(attrs, attrs.degree.as_ref());
    entry.validate().map_err(invalid)?;

    let position = user_school::Entity::find()
        .filter(user_school::Column::UserId.eq(user_id))
        .count(db)
        .await?;

    let school = user_school::ActiveModel {
        id: Set(generate_guid()),
        user_id: Set(user_id.to_string()),
        institution: Set(entry.institution),
        department: Set(entry.department),
        degree: Set(entry.role),
        start_month: Set(entry.dates.start_month),
        start_year: Set(entry.dates.start_year),
        end_month: Set(entry.dates.end_month),
        end_year: Set(entry.dates.end_year),
        ongoing: Set(entry.dates.ongoing),
        sort_order: Set(i32::try_from(position).unwrap_or(i32::MAX)),
    }
    .insert(db)
    .await?;

    tracing::info!(user_id, education_id = %school.id, "education entry added");
    Ok(education_json(&ctx.urls(), &school))
}

pub async fn update_education<C>(
    db: &C,
    ctx: &RequestContext,
    user_id: &str,
    education_id: &str,
    attrs: &HistoryAttributes,
) -> ApiResult<Value>
where
    C: ConnectionTrait,
{
    ctx.require_self(user_id)?;
    let existing = user_school::Entity::find_by_id(education_id.to_string())
        .filter(user_school::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Education `{education_id}` not found.")))?;

    let entry = school_entry(&existing).apply(attrs, attrs.degree.as_ref());
    entry.validate().map_err(invalid)?;

    let mut active: user_school::ActiveModel = existing.into();
    active.institution = Set(entry.institution);
    active.department = Set(entry.department);
    active.degree = Set(entry.role);
    active.start_month = Set(entry.dates.start_month);
    active.start_year = Set(entry.dates.start_year);
    active.end_month = Set(entry.dates.end_month);
    active.end_year = Set(entry.dates.end_year);
    active.ongoing = Set(entry.dates.ongoing);
    let school = active.update(db).await?;

    Ok(education_json(&ctx.urls(), &school))
}

pub async fn create_employment<C>(
    db: &C,
    ctx: &RequestContext,
    user_id: &str,
    attrs: &HistoryAttributes,
) -> ApiResult<Value>
where
    C: ConnectionTrait,
{
    ctx.require_self(user_id)?;
    let entry = HistoryEntry::default().apply(attrs, attrs.title.as_ref());
    entry.validate().map_err(invalid)?;

    let position = user_job::Entity::find()
        .filter(user_job::Column::UserId.eq(user_id))
        .count(db)
        .await?;

    let job = user_job::ActiveModel {
        id: Set(generate_guid()),
        user_id: Set(user_id.to_string()),
        institution: Set(entry.institution),
        department: Set(entry.department),
        title: Set(entry.role),
        start_month: Set(entry.dates.start_month),
        start_year: Set(entry.dates.start_year),
        end_month: Set(entry.dates.end_month),
        end_year: Set(entry.dates.end_year),
        ongoing: Set(entry.dates.ongoing),
        sort_order: Set(i32::try_from(position).unwrap_or(i32::MAX)),
    }
    .insert(db)
    .await?;

    tracing::info!(user_id, employment_id = %job.id, "employment entry added");
    Ok(employment_json(&ctx.urls(), &job))
}

pub async fn update_employment<C>(
    db: &C,
    ctx: &RequestContext,
    user_id: &str,
    employment_id: &str,
    attrs: &HistoryAttributes,
) -> ApiResult<Value>
where
    C: ConnectionTrait,
{
    ctx.require_self(user_id)?;
    let existing = user_job::Entity::find_by_id(employment_id.to_string())
        .filter(user_job::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Employment `{employment_id}` not found.")))?;

    let entry = job_entry(&existing).apply(attrs, attrs.title.as_ref());
    entry.validate().map_err(invalid)?;

    let mut active: user_job::ActiveModel = existing.into();
    active.institution = Set(entry.institution);
    active.department = Set(entry.department);
    active.title = Set(entry.role);
    active.start_month = Set(entry.dates.start_month);
    active.start_year = Set(entry.dates.start_year);
    active.end_month = Set(entry.dates.end_month);
    active.end_year = Set(entry.dates.end_year);
    active.ongoing = Set(entry.dates.ongoing);
    let job = active.update(db).await?;

    Ok(employment_json(&ctx.urls(), &job))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ongoing_entries_drop_their_end_date() {
        let attrs = HistoryAttributes::from_json(&json!({
            "institution": " Uni ",
            "start_year": 2019,
            "end_month": 3,
            "end_year": 2021,
            "ongoing": true,
        }))
        .unwrap();
        let entry = HistoryEntry::default().apply(&attrs, None);

        assert_eq!(entry.institution, "Uni");
        assert_eq!(entry.dates.end_month, None);
        assert_eq!(entry.dates.end_year, None);
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn blank_institution_is_invalid() {
        let entry = HistoryEntry::default().apply(&HistoryAttributes::default(), None);
        assert_eq!(entry.validate(), Err(UserValidationError::Blank("institution")));
    }

    #[test]
    fn wrongly_typed_attributes_are_rejected() {
        assert!(HistoryAttributes::from_json(&json!({ "start_month": "March" })).is_err());
    }
}
