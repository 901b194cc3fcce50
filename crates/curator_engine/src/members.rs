use curator_core::{Curation, FetchError};
use reqwest::Method;
use serde::Serialize;

use crate::envelope::SuccessPolicy;
use crate::ReqwestCurationApi;

/// Profile edit. Unset optional fields are left out of the body so the
/// backend keeps the current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUpdate {
    pub member_id: i64,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    pub introduce: String,
}

impl ReqwestCurationApi {
    /// Single curation for a detail view. Any `2xx` code is accepted.
    pub async fn fetch_curation(&self, id: i64) -> Result<Curation, FetchError> {
        let url = self.endpoint(&["api", "v1", "curation", &id.to_string()])?;
        self.execute(self.request(Method::GET, url), SuccessPolicy::AnyTwoHundred)
            .await
    }

    pub async fn update_member(&self, update: &MemberUpdate) -> Result<(), FetchError> {
        let url = self.endpoint(&["api", "v1", "members", &update.member_id.to_string()])?;
        let builder = Self::with_json(self.request(Method::PUT, url), update)?;
        self.send(builder).await.map(|_| ())
    }

    /// Deletes the member behind the api key.
    pub async fn delete_account(&self) -> Result<(), FetchError> {
        let url = self.endpoint(&["api", "v1", "members", "delete"])?;
        self.send(self.request(Method::DELETE, url)).await.map(|_| ())
    }
}
