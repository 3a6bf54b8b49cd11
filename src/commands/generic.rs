/*!
 * Key-space commands that aren't specific to a value type: expiry,
 * renaming, scanning, sorting, and cross-instance `COPY`/`MIGRATE`.
 */

use smol_str::SmolStr;

use crate::request::Request;

use super::normalize::UnixTime;
use super::Builder;

pub fn del(keys: impl IntoIterator<Item = impl Into<SmolStr>>) -> Request {
    Builder::new("DEL").texts(keys).build()
}

pub fn unlink(keys: impl IntoIterator<Item = impl Into<SmolStr>>) -> Request {
    Builder::new("UNLINK").texts(keys).build()
}

pub fn exists(keys: impl IntoIterator<Item = impl Into<SmolStr>>) -> Request {
    Builder::new("EXISTS").texts(keys).build()
}

pub fn touch(keys: impl IntoIterator<Item = impl Into<SmolStr>>) -> Request {
    Builder::new("TOUCH").texts(keys).build()
}

pub fn expire(key: impl Into<SmolStr>, seconds: i64) -> Request {
    Builder::new("EXPIRE")
        .text(key)
        .text(seconds.to_string())
        .build()
}

pub fn pexpire(key: impl Into<SmolStr>, millis: i64) -> Request {
    Builder::new("PEXPIRE")
        .text(key)
        .text(millis.to_string())
        .build()
}

/// `EXPIREAT key timestamp` — `when` is normalized to whole UNIX seconds
/// (spec.md §4.1).
pub fn expireat(key: impl Into<SmolStr>, when: UnixTime) -> Request {
    Builder::new("EXPIREAT")
        .text(key)
        .text(when.as_expireat_seconds())
        .build()
}

/// `PEXPIREAT key timestamp` — `when` is normalized by the ×1000 scaling
/// rule the spec calls out for this command (spec.md §4.1).
pub fn pexpireat(key: impl Into<SmolStr>, when: UnixTime) -> Request {
    Builder::new("PEXPIREAT")
        .text(key)
        .text(when.as_pexpireat_units())
        .build()
}

pub fn persist(key: impl Into<SmolStr>) -> Request {
    Builder::new("PERSIST").text(key).build()
}

pub fn ttl(key: impl Into<SmolStr>) -> Request {
    Builder::new("TTL").text(key).build()
}

pub fn pttl(key: impl Into<SmolStr>) -> Request {
    Builder::new("PTTL").text(key).build()
}

pub fn r#type(key: impl Into<SmolStr>) -> Request {
    Builder::new("TYPE").text(key).build()
}

pub fn rename(key: impl Into<SmolStr>, new_key: impl Into<SmolStr>) -> Request {
    Builder::new("RENAME").text(key).text(new_key).build()
}

pub fn renamenx(key: impl Into<SmolStr>, new_key: impl Into<SmolStr>) -> Request {
    Builder::new("RENAMENX").text(key).text(new_key).build()
}

pub fn keys(pattern: impl Into<SmolStr>) -> Request {
    Builder::new("KEYS").text(pattern).build()
}

pub fn randomkey() -> Request {
    Builder::new("RANDOMKEY").build()
}

pub fn dump(key: impl Into<SmolStr>) -> Request {
    Builder::new("DUMP").text(key).build()
}

/// `RESTORE key ttl serialized_value` — the serialized value is always
/// opaque bytes, carried as a payload-backed placeholder.
pub fn restore(key: impl Into<SmolStr>, ttl_millis: i64, serialized: Vec<u8>) -> Request {
    Builder::new("RESTORE")
        .text(key)
        .text(ttl_millis.to_string())
        .data(serialized)
        .build()
}

/// Options accepted by [`copy`]; the key-order flattening rule turns this
/// into `[DB n] [REPLACE]` (spec.md §4.1: boolean-true contributes only the
/// key, boolean-false is omitted).
#[derive(Debug, Clone, Default)]
pub struct CopyOptions {
    pub db: Option<i64>,
    pub replace: bool,
}

pub fn copy(source: impl Into<SmolStr>, destination: impl Into<SmolStr>, opts: CopyOptions) -> Request {
    Builder::new("COPY")
        .text(source)
        .text(destination)
        .opt("DB", opts.db.map(|n| n.to_string()))
        .flag("REPLACE", opts.replace)
        .build()
}

/// Credentials for [`migrate`]'s `AUTH`/`AUTH2` clause.
#[derive(Debug, Clone)]
pub enum MigrateAuth {
    Password(SmolStr),
    UserPass(SmolStr, SmolStr),
}

#[derive(Debug, Clone, Default)]
pub struct MigrateOptions {
    pub copy: bool,
    pub replace: bool,
    pub auth: Option<MigrateAuth>,
}

/// `MIGRATE host port key-or-empty db timeout [COPY] [REPLACE] [AUTH2 user
/// pass | AUTH pass] [KEYS k1 k2 …]`, assembled in the fixed order spec.md
/// §4.1 requires. A single key goes in the positional slot; more than one
/// key leaves that slot empty and appends a trailing `KEYS` clause instead.
pub fn migrate(
    host: impl Into<SmolStr>,
    port: u16,
    keys: impl IntoIterator<Item = impl Into<SmolStr>>,
    db: i64,
    timeout_millis: i64,
    opts: MigrateOptions,
) -> Request {
    let keys: Vec<SmolStr> = keys.into_iter().map(Into::into).collect();
    let single_key = if keys.len() == 1 {
        keys[0].clone()
    } else {
        SmolStr::default()
    };

    let mut b = Builder::new("MIGRATE")
        .text(host)
        .text(port.to_string())
        .text(single_key)
        .text(db.to_string())
        .text(timeout_millis.to_string())
        .flag("COPY", opts.copy)
        .flag("REPLACE", opts.replace);

    b = match opts.auth {
        Some(MigrateAuth::UserPass(user, pass)) => b.text("AUTH2").text(user).text(pass),
        Some(MigrateAuth::Password(pass)) => b.text("AUTH").text(pass),
        None => b,
    };

    if keys.len() > 1 {
        b = b.text("KEYS").texts(keys);
    }
    b.build()
}

/// Options accepted by [`scan`]/[`hscan`]/[`sscan`]/[`zscan`]'s shared
/// `MATCH`/`COUNT`/`TYPE` clauses.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub pattern: Option<SmolStr>,
    pub count: Option<i64>,
    /// `TYPE` filter; only meaningful for the top-level `SCAN` command.
    pub type_filter: Option<SmolStr>,
}

pub fn scan(cursor: u64, opts: ScanOptions) -> Request {
    Builder::new("SCAN")
        .text(cursor.to_string())
        .opt("MATCH", opts.pattern)
        .opt("COUNT", opts.count.map(|n| n.to_string()))
        .opt("TYPE", opts.type_filter)
        .build()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Options accepted by [`sort`]. `get_patterns` expands to one `GET
/// pattern` pair per entry, preserving order (spec.md §4.1).
#[derive(Debug, Clone, Default)]
pub struct SortOptions {
    pub by: Option<SmolStr>,
    pub limit: Option<(i64, i64)>,
    pub get_patterns: Vec<SmolStr>,
    pub order: Option<SortOrder>,
    pub alpha: bool,
    pub store: Option<SmolStr>,
}

pub fn sort(key: impl Into<SmolStr>, opts: SortOptions) -> Request {
    let mut b = Builder::new("SORT").text(key);
    b = b.opt("BY", opts.by);
    if let Some((offset, count)) = opts.limit {
        b = b.text("LIMIT").text(offset.to_string()).text(count.to_string());
    }
    b = b.repeated("GET", opts.get_patterns);
    b = match opts.order {
        Some(SortOrder::Asc) => b.text("ASC"),
        Some(SortOrder::Desc) => b.text("DESC"),
        None => b,
    };
    b = b.flag("ALPHA", opts.alpha);
    b = b.opt("STORE", opts.store);
    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_request;

    #[test]
    fn expireat_normalizes_to_whole_seconds() {
        let r = expireat("k", UnixTime::from_unix_seconds(1_700_000_000.0));
        assert_eq!(
            encode_request(&r).unwrap(),
            b"*3\r\n$9\r\nEXPIREAT\r\n$1\r\nk\r\n$10\r\n1700000000\r\n".to_vec()
        );
    }

    #[test]
    fn pexpireat_scales_by_1000() {
        let r = pexpireat("k", UnixTime::from_unix_seconds(1_700_000_000.0));
        let bytes = encode_request(&r).unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("1700000000000"));
    }

    #[test]
    fn copy_flattens_options_in_order() {
        let r = copy(
            "src",
            "dst",
            CopyOptions {
                db: Some(1),
                replace: true,
            },
        );
        assert_eq!(
            r.arguments(),
            &[
                crate::value::Arg::text("src"),
                crate::value::Arg::text("dst"),
                crate::value::Arg::text("DB"),
                crate::value::Arg::text("1"),
                crate::value::Arg::text("REPLACE"),
            ]
        );
    }

    #[test]
    fn copy_omits_false_flag_entirely() {
        let r = copy("src", "dst", CopyOptions::default());
        assert_eq!(
            r.arguments(),
            &[crate::value::Arg::text("src"), crate::value::Arg::text("dst")]
        );
    }

    #[test]
    fn migrate_assembles_fixed_order_with_single_key() {
        let r = migrate(
            "10.0.0.1",
            6379,
            ["onlykey"],
            0,
            1000,
            MigrateOptions {
                copy: true,
                replace: false,
                auth: Some(MigrateAuth::Password("secret".into())),
            },
        );
        assert_eq!(r.command(), "MIGRATE");
        let texts: Vec<&str> = r
            .arguments()
            .iter()
            .map(|a| match a {
                crate::value::Arg::Text(s) => s.as_str(),
                crate::value::Arg::Placeholder => "<ph>",
            })
            .collect();
        assert_eq!(
            texts,
            vec![
                "10.0.0.1", "6379", "onlykey", "0", "1000", "COPY", "AUTH", "secret"
            ]
        );
    }

    #[test]
    fn migrate_with_multiple_keys_appends_keys_clause() {
        let r = migrate("h", 1, ["a", "b"], 0, 5, MigrateOptions::default());
        let texts: Vec<&str> = r
            .arguments()
            .iter()
            .map(|a| match a {
                crate::value::Arg::Text(s) => s.as_str(),
                crate::value::Arg::Placeholder => "<ph>",
            })
            .collect();
        assert_eq!(texts, vec!["h", "1", "", "0", "5", "KEYS", "a", "b"]);
    }

    #[test]
    fn sort_expands_get_clauses_in_order() {
        let r = sort(
            "mylist",
            SortOptions {
                get_patterns: vec!["w_*".into(), "#".into()],
                order: Some(SortOrder::Desc),
                alpha: true,
                ..Default::default()
            },
        );
        let texts: Vec<&str> = r
            .arguments()
            .iter()
            .map(|a| match a {
                crate::value::Arg::Text(s) => s.as_str(),
                crate::value::Arg::Placeholder => "<ph>",
            })
            .collect();
        assert_eq!(
            texts,
            vec!["mylist", "GET", "w_*", "GET", "#", "DESC", "ALPHA"]
        );
    }
}
