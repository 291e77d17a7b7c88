use crate::models::User;

/// In-memory record of who is currently signed in.
///
/// `is_loading` is true from creation until the first resolution attempt
/// completes, and again around explicit login calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub is_loading: bool,
}

impl Session {
    /// A session is authenticated exactly when a user is present
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        // App-start state: nobody signed in, resolution pending
        Self {
            user: None,
            is_loading: true,
        }
    }
}

/// Partial update applied to the signed-in user (profile edits made
/// elsewhere in the console push their changes through this).
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub name: Option<String>,
    pub username: Option<String>,
    pub hostel_id: Option<String>,
    pub profile_picture: Option<String>,
}

impl User {
    /// Shallow-merge the patch into this user, field by field
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(username) = patch.username {
            self.username = Some(username);
        }
        if let Some(hostel_id) = patch.hostel_id {
            self.hostel_id = Some(hostel_id);
        }
        if let Some(profile_picture) = patch.profile_picture {
            self.profile_picture = Some(profile_picture);
        }
    }
}
