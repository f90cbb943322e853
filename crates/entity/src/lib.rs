pub mod user;
pub mod institution;
pub mod user_institution;
pub mod user_school;
pub mod user_job;
pub mod node;
pub mod node_contributor;
pub mod external_account;
pub mod user_addon_settings;
pub mod node_addon_settings;
pub mod preprint;
pub mod node_preprint;
pub mod preprint_contributor;
pub mod permission_group;
pub mod group_user;

pub use user::Entity as User;
pub use institution::Entity as Institution;
pub use user_institution::Entity as UserInstitution;
pub use user_school::Entity as UserSchool;
pub use user_job::Entity as UserJob;
pub use node::Entity as Node;
pub use node_contributor::Entity as NodeContributor;
pub use external_account::Entity as ExternalAccount;
pub use user_addon_settings::Entity as UserAddonSettings;
pub use node_addon_settings::Entity as NodeAddonSettings;
pub use preprint::Entity as Preprint;
pub use node_preprint::Entity as NodePreprint;
pub use preprint_contributor::Entity as PreprintContributor;
pub use permission_group::Entity as PermissionGroup;
pub use group_user::Entity as GroupUser;
