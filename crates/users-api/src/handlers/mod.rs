pub mod addons;
pub mod history;
pub mod institutions;
pub mod migrations;
pub mod users;
