use serde::{Deserialize, Serialize};

use crate::Profile;

/// Who is signed in, passed explicitly to whatever needs it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionContext {
    member: Option<Profile>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init(&mut self, member: Profile) {
        self.member = Some(member);
    }

    pub fn clear(&mut self) {
        self.member = None;
    }

    pub fn is_logged_in(&self) -> bool {
        self.member.is_some()
    }

    pub fn member(&self) -> Option<&Profile> {
        self.member.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.member.as_ref().map(|member| member.username.as_str())
    }
}
