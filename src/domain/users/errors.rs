#[derive(Debug, PartialEq, thiserror::Error)]
pub enum UserError {
    #[error("Please provide a {0}")]
    MissingField(&'static str),
    #[error("Please provide a valid email")]
    InvalidEmail,
    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),
    #[error("User already exists")]
    AlreadyExists,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Forbidden")]
    AdminRequired,
}
