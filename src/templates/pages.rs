//! Server-rendered pages. Every view answers with one of these; form
//! markup is produced by the form types and handed in as a ready
//! fragment.

use crate::router::paths;

use super::escape;

fn base(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n\
         <html lang=\"en\">\n\
         <head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n\
         {body}\n\
         </body>\n\
         </html>"
    )
}

pub fn home(username: Option<&str>, csrf_token: &str) -> String {
    let body = match username {
        Some(name) => format!(
            "<h1>Welcome</h1>\n\
             <p>You are logged in as <strong>{}</strong>.</p>\n\
             <form method=\"post\" action=\"{}\">\n\
             <input type=\"hidden\" name=\"csrf_token\" value=\"{}\">\n\
             <button type=\"submit\">Log out</button>\n\
             </form>",
            escape(name),
            paths::LOGOUT,
            escape(csrf_token),
        ),
        None => format!(
            "<h1>Welcome</h1>\n\
             <p><a href=\"{}\">Log in</a> or <a href=\"{}\">sign up</a>.</p>",
            paths::LOGIN,
            paths::SIGNUP,
        ),
    };

    base("Home", &body)
}

pub fn signup(form: &str) -> String {
    base("Sign up", &format!("<h1>Sign up</h1>\n{form}"))
}

pub fn login(form: &str) -> String {
    base("Log in", &format!("<h1>Log in</h1>\n{form}"))
}

pub fn password_change(form: &str) -> String {
    base(
        "Password change",
        &format!("<h1>Password change</h1>\n{form}"),
    )
}

pub fn password_change_done() -> String {
    base(
        "Password change successful",
        "<h1>Password change successful</h1>\n<p>Your password was changed.</p>",
    )
}

pub fn forbidden_page() -> String {
    base(
        "403 Forbidden",
        "<h1>403 Forbidden</h1>\n<p>CSRF verification failed. Request aborted.</p>",
    )
}

pub fn server_error_page() -> String {
    base(
        "Server error",
        "<h1>Server Error (500)</h1>\n<p>Something went wrong. Please try again later.</p>",
    )
}
