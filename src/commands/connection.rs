/*!
 * Connection-scoped command shorthands (`PING`, `ECHO`, `SELECT`, `AUTH`,
 * `QUIT`). Distinct from the transport-level [`crate::connection`] module —
 * these are just `Request` builders, same as every other shorthand here.
 */

use smol_str::SmolStr;

use crate::request::Request;

use super::normalize::Data;
use super::Builder;

pub fn ping(message: Option<impl Into<Data>>) -> Request {
    let mut b = Builder::new("PING");
    if let Some(m) = message {
        b = b.data(m);
    }
    b.build()
}

pub fn echo(message: impl Into<Data>) -> Request {
    Builder::new("ECHO").data(message).build()
}

pub fn select(index: i64) -> Request {
    Builder::new("SELECT").text(index.to_string()).build()
}

pub fn auth(username: Option<impl Into<SmolStr>>, password: impl Into<SmolStr>) -> Request {
    let mut b = Builder::new("AUTH");
    if let Some(u) = username {
        b = b.text(u);
    }
    b.text(password).build()
}

pub fn quit() -> Request {
    Builder::new("QUIT").build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Arg;

    #[test]
    fn ping_without_message_has_no_arguments() {
        let r = ping(None::<&str>);
        assert!(r.arguments().is_empty());
    }

    #[test]
    fn auth_with_username_prepends_it() {
        let r = auth(Some("default"), "secret");
        assert_eq!(r.arguments(), &[Arg::text("default"), Arg::text("secret")]);
    }
}
