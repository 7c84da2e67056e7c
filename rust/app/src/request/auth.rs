//! Auth requests.

use super::request_path;

#[derive(Debug, Clone)]
pub struct LoginReq {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct RegisterReq {
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub password: String,
}

/// Sign out and forget the session.
#[derive(Debug, Clone, Default)]
pub struct LogoutReq;

request_path! {
    LoginReq => "auth/login",
    RegisterReq => "auth/register",
    LogoutReq => "auth/logout",
}
