mod accounts;
mod auth;
mod errors;

pub use accounts::{
    Role, SignupPayload, User, find_user, hash_password, insert_user, normalize_email,
    verify_credentials,
};
pub use auth::{
    AuthResponse, SigninPayload, require_admin, signin_endpoint, signup_endpoint,
    user_id_from_headers,
};
pub use errors::UserError;
