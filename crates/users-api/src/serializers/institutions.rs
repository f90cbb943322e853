use serde_json::Value;

use entity::institution;

use crate::urls::Urls;

pub const INSTITUTION_TYPE: &str = "institutions";

pub fn related_institution_json(urls: &Urls, institution: &institution::Model) -> Value {
    serde_json::json!({
        "id": institution.id,
        "type": INSTITUTION_TYPE,
        "links": { "self": urls.institution_detail(&institution.id) },
    })
}

/// Relationship document listing a user's affiliated institutions.
pub fn user_institutions_relationship_json(
    urls: &Urls,
    user_id: &str,
    institutions: &[institution::Model],
) -> Value {
    let data: Vec<Value> = institutions
        .iter()
        .map(|i| related_institution_json(urls, i))
        .collect();

    serde_json::json!({
        "data": data,
        "links": {
            "self": urls.user_institutions_relationship(user_id),
            "html": urls.user_institutions(user_id),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relationship_document_links_back_to_user() {
        let urls = Urls::new("https://api.example.org/v2/", "https://example.org/");
        let inst = institution::Model {
            id: "cos".into(),
            name: "Center".into(),
            created_at: 0,
        };
        let doc = user_institutions_relationship_json(&urls, "abc12", &[inst]);

        assert_eq!(doc["data"][0]["type"], "institutions");
        assert_eq!(
            doc["data"][0]["links"]["self"],
            "https://api.example.org/v2/institutions/cos/"
        );
        assert_eq!(
            doc["links"]["self"],
            "https://api.example.org/v2/users/abc12/relationships/institutions/"
        );
    }
}
