pub mod addons;
pub mod history;
pub mod institutions;
pub mod user;

pub use addons::user_addon_json;
pub use history::{education_json, employment_json};
pub use institutions::{related_institution_json, user_institutions_relationship_json};
pub use user::{filter_condition, profile_image_url, projects_in_common, user_json, FILTERABLE_FIELDS};
