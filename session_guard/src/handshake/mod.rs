mod errors;
mod login;

pub use errors::HandshakeError;
pub use login::{current_principal, login, prepare_csrf_response, prepare_logout_response};
