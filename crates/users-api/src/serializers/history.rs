use serde_json::Value;

use entity::{user_job, user_school};

use crate::urls::Urls;

pub const EDUCATION_TYPE: &str = "education";
pub const EMPLOYMENT_TYPE: &str = "employment";

pub fn education_json(urls: &Urls, school: &user_school::Model) -> Value {
    serde_json::json!({
        "id": school.id,
        "type": EDUCATION_TYPE,
        "attributes": {
            "institution": school.institution,
            "department": school.department,
            "degree": school.degree,
            "start_month": school.start_month,
            "start_year": school.start_year,
            "end_month": school.end_month,
            "end_year": school.end_year,
            "ongoing": school.ongoing,
        },
        "links": { "html": urls.user_profile_page(&school.user_id) },
    })
}

pub fn employment_json(urls: &Urls, job: &user_job::Model) -> Value {
    serde_json::json!({
        "id": job.id,
        "type": EMPLOYMENT_TYPE,
        "attributes": {
            "institution": job.institution,
            "department": job.department,
            "title": job.title,
            "start_month": job.start_month,
            "start_year": job.start_year,
            "end_month": job.end_month,
            "end_year": job.end_year,
            "ongoing": job.ongoing,
        },
        "links": { "html": urls.user_profile_page(&job.user_id) },
    })
}
