use crate::config::ApiConfig;

/// Canonical absolute links for API resources and web pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Urls {
    api: String,
    web: String,
}

impl Urls {
    pub fn new(api_base_url: &str, web_base_url: &str) -> Self {
        Self {
            api: api_base_url.to_string(),
            web: web_base_url.to_string(),
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(&config.api_base_url, &config.web_base_url)
    }

    fn api(&self, path: &str) -> String {
        format!("{}{path}", self.api)
    }

    pub fn user_detail(&self, user_id: &str) -> String {
        self.api(&format!("users/{user_id}/"))
    }

    pub fn user_nodes(&self, user_id: &str) -> String {
        self.api(&format!("users/{user_id}/nodes/"))
    }

    pub fn user_registrations(&self, user_id: &str) -> String {
        self.api(&format!("users/{user_id}/registrations/"))
    }

    pub fn user_institutions(&self, user_id: &str) -> String {
        self.api(&format!("users/{user_id}/institutions/"))
    }

    pub fn user_institutions_relationship(&self, user_id: &str) -> String {
        self.api(&format!("users/{user_id}/relationships/institutions/"))
    }

    pub fn user_education(&self, user_id: &str) -> String {
        self.api(&format!("users/{user_id}/education/"))
    }

    pub fn user_employment(&self, user_id: &str) -> String {
        self.api(&format!("users/{user_id}/employment/"))
    }

    pub fn user_addon_detail(&self, user_id: &str, provider: &str) -> String {
        self.api(&format!("users/{user_id}/addons/{provider}/"))
    }

    pub fn user_external_account_detail(
        &self,
        user_id: &str,
        provider: &str,
        account_id: &str,
    ) -> String {
        self.api(&format!(
            "users/{user_id}/addons/{provider}/accounts/{account_id}/"
        ))
    }

    pub fn node_detail(&self, node_id: &str) -> String {
        self.api(&format!("nodes/{node_id}/"))
    }

    pub fn institution_detail(&self, institution_id: &str) -> String {
        self.api(&format!("institutions/{institution_id}/"))
    }

    /// Public profile page.
    pub fn user_profile_page(&self, user_id: &str) -> String {
        format!("{}{user_id}/", self.web)
    }

    pub fn confirm_email(&self, user_id: &str, token: &str) -> String {
        format!("{}confirm/{user_id}/{token}/", self.web)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls() -> Urls {
        Urls::new("https://api.example.org/v2/", "https://example.org/")
    }

    #[test]
    fn user_links() {
        let u = urls();
        assert_eq!(u.user_detail("abc12"), "https://api.example.org/v2/users/abc12/");
        assert_eq!(
            u.user_institutions_relationship("abc12"),
            "https://api.example.org/v2/users/abc12/relationships/institutions/"
        );
        assert_eq!(u.user_profile_page("abc12"), "https://example.org/abc12/");
    }

    #[test]
    fn addon_links() {
        let u = urls();
        assert_eq!(
            u.user_external_account_detail("abc12", "github", "acc99"),
            "https://api.example.org/v2/users/abc12/addons/github/accounts/acc99/"
        );
    }

    #[test]
    fn confirmation_link_carries_token() {
        assert_eq!(
            urls().confirm_email("abc12", "deadbeef"),
            "https://example.org/confirm/abc12/deadbeef/"
        );
    }
}
