use std::fmt::Display;

/// Failure reasons reported by the sign-in provider.
///
/// Unrecognised provider codes map to [`AuthErrorKind::Unknown`] so a
/// provider adding codes never breaks sign-in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    InvalidEmail,
    UserDisabled,
    UserNotFound,
    WrongPassword,
    TooManyRequests,
    ConfigurationNotFound,
    Unknown,
}

impl AuthErrorKind {
    pub const ALL: [AuthErrorKind; 7] = [
        AuthErrorKind::InvalidEmail,
        AuthErrorKind::UserDisabled,
        AuthErrorKind::UserNotFound,
        AuthErrorKind::WrongPassword,
        AuthErrorKind::TooManyRequests,
        AuthErrorKind::ConfigurationNotFound,
        AuthErrorKind::Unknown,
    ];

    pub fn from_code(code: &str) -> Self {
        match code {
            "auth/invalid-email" => AuthErrorKind::InvalidEmail,
            "auth/user-disabled" => AuthErrorKind::UserDisabled,
            "auth/user-not-found" => AuthErrorKind::UserNotFound,
            "auth/wrong-password" => AuthErrorKind::WrongPassword,
            "auth/too-many-requests" => AuthErrorKind::TooManyRequests,
            "auth/configuration-not-found" => AuthErrorKind::ConfigurationNotFound,
            _ => AuthErrorKind::Unknown,
        }
    }

    /// Provider code for this kind, `None` for [`AuthErrorKind::Unknown`].
    pub fn code(&self) -> Option<&'static str> {
        match self {
            AuthErrorKind::InvalidEmail => Some("auth/invalid-email"),
            AuthErrorKind::UserDisabled => Some("auth/user-disabled"),
            AuthErrorKind::UserNotFound => Some("auth/user-not-found"),
            AuthErrorKind::WrongPassword => Some("auth/wrong-password"),
            AuthErrorKind::TooManyRequests => Some("auth/too-many-requests"),
            AuthErrorKind::ConfigurationNotFound => Some("auth/configuration-not-found"),
            AuthErrorKind::Unknown => None,
        }
    }

    /// Text shown to the user after a failed email/password login.
    pub fn login_message(&self) -> &'static str {
        match self {
            AuthErrorKind::InvalidEmail => "Invalid email address",
            AuthErrorKind::UserDisabled => "This account has been disabled",
            AuthErrorKind::UserNotFound => "No account found with this email",
            AuthErrorKind::WrongPassword => "Incorrect password",
            AuthErrorKind::TooManyRequests => {
                "Too many failed login attempts. Please try again later"
            }
            AuthErrorKind::ConfigurationNotFound => {
                "Authentication configuration error. Please contact support."
            }
            AuthErrorKind::Unknown => "Failed to login. Please try again.",
        }
    }
}

/// Google sign-in failures all read the same to the user.
pub const GOOGLE_SIGN_IN_MESSAGE: &str = "Failed to sign in with Google. Please try again.";

impl Display for AuthErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code().unwrap_or("auth/unknown"))
    }
}
