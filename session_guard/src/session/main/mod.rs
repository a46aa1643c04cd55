pub(crate) mod cookie;
mod csrf;
mod store;

pub use csrf::{authenticate_request, is_mutating_method};

pub(crate) use cookie::{clear_cookie, set_cookie};
pub(crate) use store::{
    create_session, get_session_id_from_headers, invalidate_session, lookup_session,
    rotate_csrf_token,
};
