//! Social-network profile handles and the profile URLs derived from them.
//!
//! Handles are stored on the user as a JSON object keyed by provider. Reads
//! are lenient (anything unrecognised is "no data"); writes go through
//! [`SocialUpdate::from_json`] which only accepts known providers holding a
//! string, a list of strings or `null`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SocialProvider {
    PersonalWebsite,
    Github,
    Scholar,
    Twitter,
    Linkedin,
    Impactstory,
    Orcid,
    Researcherid,
    Researchgate,
    AcademiaInstitution,
    AcademiaProfileId,
    BaiduScholar,
    Ssrn,
}

impl SocialProvider {
    pub const ALL: [SocialProvider; 13] = [
        SocialProvider::PersonalWebsite,
        SocialProvider::Github,
        SocialProvider::Scholar,
        SocialProvider::Twitter,
        SocialProvider::Linkedin,
        SocialProvider::Impactstory,
        SocialProvider::Orcid,
        SocialProvider::Researcherid,
        SocialProvider::Researchgate,
        SocialProvider::AcademiaInstitution,
        SocialProvider::AcademiaProfileId,
        SocialProvider::BaiduScholar,
        SocialProvider::Ssrn,
    ];

    /// Key in the stored `users.social` object.
    pub fn storage_key(self) -> &'static str {
        match self {
            SocialProvider::PersonalWebsite => "profileWebsites",
            SocialProvider::Github => "github",
            SocialProvider::Scholar => "scholar",
            SocialProvider::Twitter => "twitter",
            SocialProvider::Linkedin => "linkedIn",
            SocialProvider::Impactstory => "impactStory",
            SocialProvider::Orcid => "orcid",
            SocialProvider::Researcherid => "researcherId",
            SocialProvider::Researchgate => "researchGate",
            SocialProvider::AcademiaInstitution => "academiaInstitution",
            SocialProvider::AcademiaProfileId => "academiaProfileID",
            SocialProvider::BaiduScholar => "baiduScholar",
            SocialProvider::Ssrn => "ssrn",
        }
    }

    /// Key in the serialized `social` links object.
    pub fn link_field(self) -> &'static str {
        match self {
            SocialProvider::PersonalWebsite => "personal_website",
            SocialProvider::Github => "github",
            SocialProvider::Scholar => "scholar",
            SocialProvider::Twitter => "twitter",
            SocialProvider::Linkedin => "linkedin",
            SocialProvider::Impactstory => "impactstory",
            SocialProvider::Orcid => "orcid",
            SocialProvider::Researcherid => "researcherid",
            SocialProvider::Researchgate => "researchgate",
            SocialProvider::AcademiaInstitution => "academia_institution",
            SocialProvider::AcademiaProfileId => "academia_profile_id",
            SocialProvider::BaiduScholar => "baiduscholar",
            SocialProvider::Ssrn => "ssrn",
        }
    }

    /// URL template; `{}` is replaced by the handle. Personal websites are
    /// stored as full URLs and have none.
    pub fn template(self) -> Option<&'static str> {
        match self {
            SocialProvider::PersonalWebsite => None,
            SocialProvider::Github => Some("http://github.com/{}/"),
            SocialProvider::Scholar => Some("http://scholar.google.com/citations?user={}"),
            SocialProvider::Twitter => Some("http://twitter.com/{}"),
            SocialProvider::Linkedin => Some("https://www.linkedin.com/{}"),
            SocialProvider::Impactstory => Some("https://impactstory.org/{}"),
            SocialProvider::Orcid => Some("http://orcid.org/{}"),
            SocialProvider::Researcherid => Some("http://researcherid.com/rid/{}"),
            SocialProvider::Researchgate => Some("https://researchgate.net/profile/{}"),
            SocialProvider::AcademiaInstitution => Some("https://{}"),
            SocialProvider::AcademiaProfileId => Some(".academia.edu/{}"),
            SocialProvider::BaiduScholar => Some("http://xueshu.baidu.com/scholarID/{}"),
            SocialProvider::Ssrn => {
                Some("http://papers.ssrn.com/sol3/cf_dev/AbsByAuth.cfm?per_id={}")
            }
        }
    }

    pub fn format(self, handle: &str) -> String {
        match self.template() {
            Some(template) => template.replacen("{}", handle, 1),
            None => handle.to_string(),
        }
    }

    /// Accepts either the storage key or the link field name.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.storage_key() == key || p.link_field() == key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SocialHandles {
    One(String),
    Many(Vec<String>),
}

impl SocialHandles {
    /// Single handles are treated as a one-element list.
    pub fn as_slice(&self) -> &[String] {
        match self {
            SocialHandles::One(handle) => std::slice::from_ref(handle),
            SocialHandles::Many(handles) => handles,
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            SocialHandles::One(handle) => handle.is_empty(),
            SocialHandles::Many(handles) => handles.is_empty(),
        }
    }

    fn from_stored(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(SocialHandles::One(s.clone())),
            Value::Array(items) => Some(SocialHandles::Many(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
            )),
            _ => None,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            SocialHandles::One(s) => Value::String(s.clone()),
            SocialHandles::Many(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialAccounts {
    handles: BTreeMap<SocialProvider, SocialHandles>,
}

impl SocialAccounts {
    /// Reads the stored mapping, ignoring unknown keys and malformed values.
    pub fn from_stored(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };

        let handles = SocialProvider::ALL
            .into_iter()
            .filter_map(|p| {
                map.get(p.storage_key())
                    .and_then(SocialHandles::from_stored)
                    .map(|h| (p, h))
            })
            .collect();

        Self { handles }
    }

    /// Profile URLs for one provider, in stored order. A missing key or an
    /// empty handle yields nothing.
    pub fn links(&self, provider: SocialProvider) -> Vec<String> {
        match self.handles.get(&provider) {
            Some(handles) if !handles.is_empty() => handles
                .as_slice()
                .iter()
                .map(|h| provider.format(h))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Validated partial update of a user's social handles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialUpdate(BTreeMap<SocialProvider, Option<SocialHandles>>);

impl SocialUpdate {
    pub fn from_json(value: &Value) -> Result<Self, ApiError> {
        let Some(map) = value.as_object() else {
            return Err(ApiError::Validation(
                "`social` must be an object keyed by provider.".to_string(),
            ));
        };

        let mut out = BTreeMap::new();
        for (key, raw) in map {
            let provider = SocialProvider::from_key(key).ok_or_else(|| {
                ApiError::Validation(format!("`{key}` is not a supported social provider."))
            })?;
            let handles = match raw {
                Value::Null => None,
                Value::String(s) => Some(SocialHandles::One(s.trim().to_string())),
                Value::Array(items) => {
                    let mut list = Vec::with_capacity(items.len());
                    for item in items {
                        let Some(s) = item.as_str() else {
                            return Err(ApiError::Validation(format!(
                                "`{key}` entries must be strings."
                            )));
                        };
                        list.push(s.trim().to_string());
                    }
                    Some(SocialHandles::Many(list))
                }
                _ => {
                    return Err(ApiError::Validation(format!(
                        "`{key}` must be a string or a list of strings."
                    )))
                }
            };
            out.insert(provider, handles);
        }

        Ok(Self(out))
    }

    /// Applies the update to a stored mapping. Keys it does not name,
    /// including ones no provider reads, are left as they were.
    pub fn apply_to(&self, stored: &Value) -> Value {
        let mut map = stored.as_object().cloned().unwrap_or_default();
        for (provider, handles) in &self.0 {
            match handles {
                Some(h) => {
                    map.insert(provider.storage_key().to_string(), h.to_json());
                }
                None => {
                    map.remove(provider.storage_key());
                }
            }
        }
        Value::Object(map)
    }
}
